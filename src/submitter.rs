use crate::endpoint::Endpoint;
use crate::types::PracticePayload;
use crate::ui::{ConfettiBurst, Popup, StatusMessage, CONFETTI_PIECES};
use log::{debug, error, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};

pub const SUBMITTING: &str = "Submitting...";
pub const MISSING_FIELDS: &str = "Please fill in name, event, and minutes.";
pub const LOGGED: &str = "Practice logged! Great work.";
pub const LOGGED_POPUP: &str = "Practice logged. Great work!";
pub const SENT_UNCONFIRMED: &str = "Submitted! If it doesn't show up, tell your coach.";
pub const SENT_UNCONFIRMED_POPUP: &str = "Submitted! (If it doesn't appear, tell your coach.)";
pub const REJECTED: &str = "The log sheet did not accept this practice. Please tell your coach.";
pub const FAILED: &str = "Something went wrong. Please tell your coach.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PracticeForm {
    pub name: String,
    pub event: String,
    pub minutes: String,
    pub notes: String,
}

impl PracticeForm {
    /// The submission body, or `None` while a required field is empty.
    pub fn payload(&self) -> Option<PracticePayload> {
        if self.name.is_empty() || self.event.is_empty() || self.minutes.is_empty() {
            return None;
        }
        Some(PracticePayload {
            name: self.name.clone(),
            event: self.event.clone(),
            minutes: self.minutes.clone(),
            notes: self.notes.clone(),
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Another submission from the same submitter was still in flight.
    Ignored,
    MissingFields,
    /// The sheet answered with a success status.
    Confirmed,
    /// Delivered through the fallback beacon; nothing could be confirmed.
    Unconfirmed,
    /// The sheet answered but did not report success.
    Rejected { message: Option<String> },
    Failed,
}

impl SubmitOutcome {
    pub fn status(&self) -> Option<StatusMessage> {
        match self {
            SubmitOutcome::Ignored => None,
            SubmitOutcome::MissingFields => Some(StatusMessage::error(MISSING_FIELDS)),
            SubmitOutcome::Confirmed => Some(StatusMessage::success(LOGGED)),
            SubmitOutcome::Unconfirmed => Some(StatusMessage::success(SENT_UNCONFIRMED)),
            SubmitOutcome::Rejected { .. } => Some(StatusMessage::error(REJECTED)),
            SubmitOutcome::Failed => Some(StatusMessage::error(FAILED)),
        }
    }

    pub fn popup_text(&self) -> Option<&'static str> {
        match self {
            SubmitOutcome::Confirmed => Some(LOGGED_POPUP),
            SubmitOutcome::Unconfirmed => Some(SENT_UNCONFIRMED_POPUP),
            _ => None,
        }
    }

    /// Whether the form should be cleared and celebrated.
    pub fn is_delivered(&self) -> bool {
        matches!(self, SubmitOutcome::Confirmed | SubmitOutcome::Unconfirmed)
    }
}

/// Sends practice entries, falling back to a one-way beacon when the
/// confirmable POST cannot be completed.
pub struct PracticeSubmitter<'a, E> {
    endpoint: &'a E,
    in_flight: AtomicBool,
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<'a, E: Endpoint> PracticeSubmitter<'a, E> {
    pub fn new(endpoint: &'a E) -> Self {
        Self {
            endpoint,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub async fn submit(&self, form: &PracticeForm) -> SubmitOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Submission already in flight, ignoring");
            return SubmitOutcome::Ignored;
        }
        let _guard = InFlightGuard(&self.in_flight);

        let Some(payload) = form.payload() else {
            return SubmitOutcome::MissingFields;
        };

        match self.endpoint.post_log(&payload).await {
            Ok(response) if response.is_success() => {
                info!("Practice logged for {}", payload.name);
                SubmitOutcome::Confirmed
            }
            Ok(response) => {
                error!(
                    "Log sheet rejected practice (status {:?}): {}",
                    response.status,
                    response.message.as_deref().unwrap_or("no message")
                );
                SubmitOutcome::Rejected {
                    message: response.message,
                }
            }
            Err(e) => {
                warn!("Primary POST failed, using fallback: {}", e);
                match self.endpoint.beacon_log(&payload).await {
                    Ok(()) => SubmitOutcome::Unconfirmed,
                    Err(e) => {
                        error!("Fallback beacon failed: {}", e);
                        SubmitOutcome::Failed
                    }
                }
            }
        }
    }
}

/// The "log practice" pane: form, message region, popup and confetti.
#[derive(Debug, Clone, Default)]
pub struct LogPanel {
    pub form: PracticeForm,
    pub status: StatusMessage,
    pub popup: Popup,
    pub confetti: Option<ConfettiBurst>,
    reduce_motion: bool,
}

impl LogPanel {
    pub fn new(form: PracticeForm, reduce_motion: bool) -> Self {
        Self {
            form,
            reduce_motion,
            ..Self::default()
        }
    }

    pub async fn submit<E: Endpoint>(&mut self, submitter: &PracticeSubmitter<'_, E>) -> SubmitOutcome {
        if submitter.is_in_flight() {
            return SubmitOutcome::Ignored;
        }
        self.status = StatusMessage::neutral(SUBMITTING);
        let outcome = submitter.submit(&self.form).await;
        self.apply(&outcome);
        outcome
    }

    pub fn apply(&mut self, outcome: &SubmitOutcome) {
        if let Some(status) = outcome.status() {
            self.status = status;
        }
        if !outcome.is_delivered() {
            return;
        }

        self.form.reset();
        if let Some(text) = outcome.popup_text() {
            self.popup.show(text);
        }
        if !self.reduce_motion {
            self.confetti = Some(ConfettiBurst::new(CONFETTI_PIECES));
        }
    }
}
