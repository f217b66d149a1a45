//! Registration submission.
//!
//! Validates the customer's contact and order fields, merges them with the
//! product chosen on the previous page, logs the result in the handoff store
//! and hands the order off to a human operator through a chat deep link.

mod flow;
mod form;
mod launcher;
mod link;

pub use flow::{
    FlowState, RegistrationFlow, STORE_FAILURE_NOTICE, SUCCESS_NOTICE, SubmitError, SubmitReceipt,
};
pub use form::{Field, RegistrationDetails, RegistrationForm, ValidationError, ValidationErrors};
#[cfg(not(target_arch = "wasm32"))]
pub use launcher::SystemBrowser;
#[cfg(target_arch = "wasm32")]
pub use launcher::WindowLauncher;
pub use launcher::{HandoffLauncher, LaunchError, RecordingLauncher};
pub use link::{HandoffTarget, summary_message};
