//! Registration submission state machine.
//!
//! ```text
//! Editing -> Validating -> Invalid -> Editing
//!                       -> Valid -> Submitting -> Submitted
//! ```
//!
//! A failed submission (invalid fields, storage error, blocked hand-off)
//! always ends back in `Editing` with the form contents untouched. After a
//! blocked hand-off the record is already logged; submitting the same details
//! again only re-opens the link.

use thiserror::Error;

use super::{
    Field, HandoffLauncher, HandoffTarget, LaunchError, RegistrationForm, ValidationErrors,
    summary_message,
};
use crate::clock::{Clock, SystemClock};
use crate::handoff::{HandoffStore, StoreError};
use crate::model::{Product, RegistrationRecord};
use crate::notice::NoticeBoard;
use crate::storage::TabStorage;

/// Banner shown after a successful hand-off.
pub const SUCCESS_NOTICE: &str = "Registration successful! Redirecting to WhatsApp...";

/// Banner shown when the registration could not be logged.
pub const STORE_FAILURE_NOTICE: &str = "Could not save your registration. Please try again.";

/// State of the registration flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    /// Accepting input
    Editing,
    /// Checking fields
    Validating,
    /// At least one field failed
    Invalid,
    /// Every field passed
    Valid,
    /// Logging the record and opening the hand-off
    Submitting,
    /// Hand-off opened; the form has been cleared
    Submitted,
}

/// Why a submission did not complete.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// One or more fields failed validation
    #[error("Invalid registration: {0}")]
    Invalid(ValidationErrors),

    /// The record could not be appended to the log
    #[error("Failed to log registration: {0}")]
    Store(#[from] StoreError),

    /// The record was logged but the chat link could not be opened.
    /// Resubmitting unchanged details retries the link without logging again.
    #[error(transparent)]
    Handoff(#[from] LaunchError),
}

/// Outcome of a successful submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitReceipt {
    /// The record appended to the log
    pub record: RegistrationRecord,
    /// Plain-text summary sent to the operator
    pub message: String,
    /// Deep link that was opened
    pub uri: String,
}

/// Drives one registration view.
pub struct RegistrationFlow<S, L, C = SystemClock> {
    store: HandoffStore<S>,
    launcher: L,
    clock: C,
    target: HandoffTarget,
    form: RegistrationForm,
    errors: ValidationErrors,
    state: FlowState,
    trace: Vec<FlowState>,
    notices: NoticeBoard,
    pending: Option<SubmitReceipt>,
}

impl<S: TabStorage, L: HandoffLauncher> RegistrationFlow<S, L, SystemClock> {
    /// Create a flow using the system clock.
    pub fn new(store: HandoffStore<S>, launcher: L, target: HandoffTarget) -> Self {
        Self::with_clock(store, launcher, target, SystemClock)
    }
}

impl<S: TabStorage, L: HandoffLauncher, C: Clock> RegistrationFlow<S, L, C> {
    /// Create a flow with an explicit clock.
    pub fn with_clock(store: HandoffStore<S>, launcher: L, target: HandoffTarget, clock: C) -> Self {
        Self {
            store,
            launcher,
            clock,
            target,
            form: RegistrationForm::new(),
            errors: ValidationErrors::default(),
            state: FlowState::Editing,
            trace: vec![FlowState::Editing],
            notices: NoticeBoard::default(),
            pending: None,
        }
    }

    /// Replace the banner board (to change banner lifetime).
    pub fn with_notices(mut self, notices: NoticeBoard) -> Self {
        self.notices = notices;
        self
    }

    /// Current state.
    pub fn state(&self) -> FlowState {
        self.state
    }

    /// States visited by the last submission, starting from `Editing`.
    pub fn trace(&self) -> &[FlowState] {
        &self.trace
    }

    /// Current form contents.
    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    /// Errors from the last failed validation.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Error message for `field`, if it failed last validation.
    pub fn error_for(&self, field: Field) -> Option<String> {
        self.errors.for_field(field).map(|e| e.to_string())
    }

    /// Banner board.
    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    /// Mutable banner board (for ticking and dismissal).
    pub fn notices_mut(&mut self) -> &mut NoticeBoard {
        &mut self.notices
    }

    /// The handoff store this flow reads and appends to.
    pub fn store(&self) -> &HandoffStore<S> {
        &self.store
    }

    /// The launcher used for hand-offs.
    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Product currently selected for registration, read fresh from the store.
    pub fn product(&self) -> Option<Product> {
        self.store.selected_product()
    }

    /// Update a field. Editing after a submission starts a new entry.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.form.set(field, value);
        self.state = FlowState::Editing;
    }

    /// Validate, log and hand off the registration.
    pub fn submit(&mut self) -> Result<SubmitReceipt, SubmitError> {
        // A submission always starts from Editing, even right after a success
        self.state = FlowState::Editing;
        self.trace.clear();
        self.trace.push(FlowState::Editing);
        self.enter(FlowState::Validating);

        let details = match self.form.validate() {
            Ok(details) => details,
            Err(errors) => {
                log::debug!("Registration invalid: {}", errors);
                self.enter(FlowState::Invalid);
                self.errors = errors.clone();
                self.enter(FlowState::Editing);
                return Err(SubmitError::Invalid(errors));
            }
        };
        self.errors = ValidationErrors::default();
        self.enter(FlowState::Valid);
        self.enter(FlowState::Submitting);

        let product = self.store.selected_product();
        if let Some(pending) = self.pending.take() {
            let unchanged = details
                .clone()
                .into_record(product.clone(), pending.record.timestamp)
                == pending.record;
            if unchanged {
                log::debug!("Retrying hand-off of an already logged registration");
                return self.hand_off(pending);
            }
        }

        let message = summary_message(&details, product.as_ref().map(|p| p.name.as_str()));
        let record = details.into_record(product, self.clock.now());

        if let Err(e) = self.store.append_registration(&record) {
            log::warn!("Failed to log registration: {}", e);
            self.notices.error(STORE_FAILURE_NOTICE);
            self.enter(FlowState::Editing);
            return Err(e.into());
        }

        let uri = self.target.deep_link(&message);
        self.hand_off(SubmitReceipt {
            record,
            message,
            uri,
        })
    }

    /// Registration logged by the last submission whose link was blocked.
    pub fn pending_handoff(&self) -> Option<&SubmitReceipt> {
        self.pending.as_ref()
    }

    fn hand_off(&mut self, receipt: SubmitReceipt) -> Result<SubmitReceipt, SubmitError> {
        if let Err(e) = self.launcher.open(&receipt.uri) {
            log::warn!("Hand-off failed: {}", e);
            self.notices.error(e.to_string());
            self.pending = Some(receipt);
            self.enter(FlowState::Editing);
            return Err(e.into());
        }

        log::info!(
            "Registration handed off to {}/{}",
            self.target.host(),
            self.target.destination()
        );
        self.notices.success(SUCCESS_NOTICE);
        self.form.clear();
        self.enter(FlowState::Submitted);
        Ok(receipt)
    }

    fn enter(&mut self, state: FlowState) {
        log::trace!("Registration flow: {:?} -> {:?}", self.state, state);
        self.state = state;
        self.trace.push(state);
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::clock::SteppingClock;
    use crate::registration::RecordingLauncher;
    use crate::storage::{MemoryStorage, StorageError};

    type TestFlow = RegistrationFlow<Rc<MemoryStorage>, RecordingLauncher, SteppingClock>;

    fn flow_with_lamp() -> (TestFlow, Rc<MemoryStorage>) {
        let storage = Rc::new(MemoryStorage::new());
        let list_view = HandoffStore::new(Rc::clone(&storage));
        list_view
            .set_selected_product(&Product::new(7, "Lamp", 19.99))
            .unwrap();

        let clock = SteppingClock::new(
            Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
            Duration::seconds(1),
        );
        let flow = RegistrationFlow::with_clock(
            HandoffStore::new(Rc::clone(&storage)),
            RecordingLauncher::new(),
            HandoffTarget::default(),
            clock,
        );
        (flow, storage)
    }

    fn fill(flow: &mut TestFlow) {
        flow.set_field(Field::Name, "Alex");
        flow.set_field(Field::Email, "a@x.com");
        flow.set_field(Field::Phone, "5551234");
        flow.set_field(Field::Location, "Cairo");
        flow.set_field(Field::Quantity, "2");
    }

    #[test]
    fn test_valid_submission() {
        let (mut flow, _) = flow_with_lamp();
        fill(&mut flow);

        let receipt = flow.submit().unwrap();
        assert_eq!(receipt.record.product_name(), Some("Lamp"));
        for needle in ["Lamp", "Alex", "2"] {
            assert!(receipt.message.contains(needle), "missing {}", needle);
        }
        assert_eq!(flow.store().registrations(), vec![receipt.record.clone()]);
        assert_eq!(flow.launcher().opened(), [receipt.uri.clone()]);
        assert!(receipt.uri.starts_with("https://wa.me/201126811159?text=Hello%2C"));

        assert_eq!(flow.state(), FlowState::Submitted);
        assert_eq!(
            flow.trace(),
            [
                FlowState::Editing,
                FlowState::Validating,
                FlowState::Valid,
                FlowState::Submitting,
                FlowState::Submitted
            ]
        );
        assert_eq!(flow.form(), &RegistrationForm::new());
        assert_eq!(flow.notices().current().unwrap().message, SUCCESS_NOTICE);
    }

    #[test]
    fn test_invalid_quantity_keeps_form() {
        let (mut flow, _) = flow_with_lamp();
        fill(&mut flow);
        flow.set_field(Field::Quantity, "0");

        let err = flow.submit().unwrap_err();
        let SubmitError::Invalid(errors) = err else {
            panic!("expected validation failure");
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(
            flow.error_for(Field::Quantity).as_deref(),
            Some("Please Enter a Valid Number of Items")
        );
        assert!(flow.store().registrations().is_empty());
        assert!(flow.launcher().opened().is_empty());

        assert_eq!(flow.state(), FlowState::Editing);
        assert_eq!(
            flow.trace(),
            [
                FlowState::Editing,
                FlowState::Validating,
                FlowState::Invalid,
                FlowState::Editing
            ]
        );
        assert_eq!(flow.form().name, "Alex");
        assert_eq!(flow.form().quantity, "0");
    }

    #[test]
    fn test_errors_cleared_after_fix() {
        let (mut flow, _) = flow_with_lamp();
        fill(&mut flow);
        flow.set_field(Field::Location, " ");
        assert!(flow.submit().is_err());
        assert!(flow.error_for(Field::Location).is_some());

        flow.set_field(Field::Location, "Giza");
        flow.submit().unwrap();
        assert!(flow.errors().is_empty());
    }

    #[test]
    fn test_two_submissions_append_two_records() {
        let (mut flow, _) = flow_with_lamp();
        fill(&mut flow);
        let first = flow.submit().unwrap();
        fill(&mut flow);
        let second = flow.submit().unwrap();

        let log = flow.store().registrations();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0], first.record);
        assert_eq!(log[1], second.record);
        assert_ne!(log[0].timestamp, log[1].timestamp);
    }

    #[test]
    fn test_submission_without_product() {
        let (mut flow, storage) = flow_with_lamp();
        storage.clear().unwrap();
        fill(&mut flow);

        let receipt = flow.submit().unwrap();
        assert!(receipt.record.product.is_none());
        assert!(receipt.message.contains("product: N/A."));
    }

    #[test]
    fn test_blocked_handoff_keeps_record_and_form() {
        let (mut flow, _) = flow_with_lamp();
        fill(&mut flow);
        flow.launcher.fail_next();

        let err = flow.submit().unwrap_err();
        assert!(matches!(err, SubmitError::Handoff(LaunchError::Blocked)));
        assert_eq!(flow.store().registrations().len(), 1);
        assert_eq!(flow.state(), FlowState::Editing);
        assert_eq!(flow.form().name, "Alex");

        let notice = flow.notices().current().unwrap();
        assert_eq!(notice.kind, crate::notice::NoticeKind::Error);
    }

    #[test]
    fn test_resubmit_after_success_traces_from_editing() {
        let (mut flow, _) = flow_with_lamp();
        fill(&mut flow);
        flow.submit().unwrap();
        assert_eq!(flow.state(), FlowState::Submitted);

        let Err(SubmitError::Invalid(_)) = flow.submit() else {
            panic!("expected validation failure on the cleared form");
        };
        assert_eq!(
            flow.trace(),
            [
                FlowState::Editing,
                FlowState::Validating,
                FlowState::Invalid,
                FlowState::Editing
            ]
        );
    }

    #[test]
    fn test_retry_after_blocked_handoff_logs_once() {
        let (mut flow, _) = flow_with_lamp();
        fill(&mut flow);
        flow.launcher.fail_next();
        assert!(flow.submit().is_err());
        let blocked = flow.pending_handoff().unwrap().clone();

        let retried = flow.submit().unwrap();
        assert_eq!(retried, blocked);
        assert_eq!(flow.store().registrations(), vec![blocked.record]);
        assert_eq!(flow.launcher().opened(), [retried.uri]);
        assert!(flow.pending_handoff().is_none());
        assert_eq!(flow.state(), FlowState::Submitted);
    }

    #[test]
    fn test_edit_after_blocked_handoff_logs_new_record() {
        let (mut flow, _) = flow_with_lamp();
        fill(&mut flow);
        flow.launcher.fail_next();
        assert!(flow.submit().is_err());

        flow.set_field(Field::Quantity, "5");
        let receipt = flow.submit().unwrap();
        assert_eq!(receipt.record.quantity, 5);

        let log = flow.store().registrations();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].quantity, 2);
        assert_eq!(log[1].quantity, 5);
    }

    struct ReadOnlyStorage(MemoryStorage);

    impl TabStorage for ReadOnlyStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.get(key)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Access("quota exceeded".to_string()))
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.0.remove(key)
        }

        fn clear(&self) -> Result<(), StorageError> {
            self.0.clear()
        }
    }

    #[test]
    fn test_store_failure_returns_to_editing() {
        let mut flow = RegistrationFlow::new(
            HandoffStore::new(ReadOnlyStorage(MemoryStorage::new())),
            RecordingLauncher::new(),
            HandoffTarget::default(),
        );
        flow.set_field(Field::Name, "Alex");
        flow.set_field(Field::Email, "a@x.com");
        flow.set_field(Field::Phone, "5551234");
        flow.set_field(Field::Location, "Cairo");
        flow.set_field(Field::Quantity, "1");

        let err = flow.submit().unwrap_err();
        assert!(matches!(err, SubmitError::Store(_)));
        assert!(flow.launcher().opened().is_empty());
        assert_eq!(flow.state(), FlowState::Editing);
        assert_eq!(flow.notices().current().unwrap().message, STORE_FAILURE_NOTICE);
    }
}
