//! Opening the hand-off link outside the app.

use thiserror::Error;

/// Failure to open the hand-off link.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The browser refused to open a new context (popup blocker)
    #[error("The chat window was blocked; allow popups and try again")]
    Blocked,

    /// The platform reported an error
    #[error("Could not open chat link: {0}")]
    Failed(String),
}

/// Opens a URI in a new browsing context.
pub trait HandoffLauncher {
    /// Open `uri`.
    fn open(&mut self, uri: &str) -> Result<(), LaunchError>;
}

/// Records links instead of opening them.
#[derive(Debug, Default)]
pub struct RecordingLauncher {
    opened: Vec<String>,
    fail_next: bool,
}

impl RecordingLauncher {
    /// Create a launcher that accepts every link.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `open` fail as if blocked.
    pub fn fail_next(&mut self) {
        self.fail_next = true;
    }

    /// Links opened so far, oldest first.
    pub fn opened(&self) -> &[String] {
        &self.opened
    }
}

impl HandoffLauncher for RecordingLauncher {
    fn open(&mut self, uri: &str) -> Result<(), LaunchError> {
        if std::mem::take(&mut self.fail_next) {
            return Err(LaunchError::Blocked);
        }
        self.opened.push(uri.to_string());
        Ok(())
    }
}

/// Opens links with `window.open(uri, "_blank")` (WASM only).
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct WindowLauncher;

#[cfg(target_arch = "wasm32")]
impl HandoffLauncher for WindowLauncher {
    fn open(&mut self, uri: &str) -> Result<(), LaunchError> {
        let window =
            web_sys::window().ok_or_else(|| LaunchError::Failed("No window object available".to_string()))?;
        match window.open_with_url_and_target(uri, "_blank") {
            Ok(Some(_)) => Ok(()),
            Ok(None) => Err(LaunchError::Blocked),
            Err(e) => Err(LaunchError::Failed(format!("{:?}", e))),
        }
    }
}

/// Opens links in the system browser.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct SystemBrowser;

#[cfg(not(target_arch = "wasm32"))]
impl HandoffLauncher for SystemBrowser {
    fn open(&mut self, uri: &str) -> Result<(), LaunchError> {
        webbrowser::open(uri).map_err(|e| LaunchError::Failed(e.to_string()))
    }
}
