//! Form state controller: owns the draft, validates it, and drives one
//! submission at a time through a [`ListingGateway`].

use shared::{
    domain::{BusinessListingDraft, FieldEdit, FieldErrorKind, FieldKey, Weekday},
    error::{SubmissionError, ValidationErrors},
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::gateway::ListingGateway;

pub const SUCCESS_MESSAGE: &str = "Business listing saved successfully!";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed(SubmissionError),
}

/// One-shot outcome shown to the user after a submission finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Failure { message: String },
}

impl Notification {
    pub fn message(&self) -> &str {
        match self {
            Notification::Success(message) => message,
            Notification::Failure { message } => message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldEditError {
    #[error("{day} hours are not editable")]
    DayNotEditable { day: Weekday },
    #[error("the listing cannot be edited while a submission is in flight")]
    SubmissionInFlight,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("listing has invalid fields: {0}")]
    Invalid(ValidationErrors),
    #[error("a submission is already in flight")]
    InFlight,
    #[error("{0}")]
    Submission(#[from] SubmissionError),
}

/// Checks every required field of `draft`.
pub fn validate_draft(draft: &BusinessListingDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    let address = &draft.address;
    let required_text = [
        (FieldKey::Name, &draft.name),
        (FieldKey::StreetLineOne, &address.street_line_one),
        (FieldKey::City, &address.city),
        (FieldKey::State, &address.state),
        (FieldKey::ZipCode, &address.zip_code),
    ];
    for (key, value) in required_text {
        if value.is_empty() {
            errors.insert(key, FieldErrorKind::MissingValue);
        }
    }

    for (day, hours) in draft.weekly_hours.iter() {
        if hours.is_closed {
            continue;
        }
        if hours.open.is_none() {
            errors.insert(FieldKey::DayOpen(day), FieldErrorKind::MissingValue);
        }
        if hours.close.is_none() {
            errors.insert(FieldKey::DayClose(day), FieldErrorKind::MissingValue);
        }
    }

    if draft.tags.is_empty() {
        errors.insert(FieldKey::Tags, FieldErrorKind::EmptySelection);
    }

    errors
}

#[derive(Debug, Default)]
pub struct FormController {
    draft: BusinessListingDraft,
    errors: ValidationErrors,
    status: SubmissionStatus,
    notification: Option<Notification>,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &BusinessListingDraft {
        &self.draft
    }

    /// Errors stored by the last rejected submit, minus those fixed since.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn error_for(&self, key: FieldKey) -> Option<FieldErrorKind> {
        self.errors.get(key)
    }

    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    pub fn can_submit(&self) -> bool {
        self.status != SubmissionStatus::Submitting
    }

    pub fn set_field(&mut self, edit: FieldEdit) -> Result<(), FieldEditError> {
        if self.status == SubmissionStatus::Submitting {
            warn!(?edit, "rejected field edit during submission");
            return Err(FieldEditError::SubmissionInFlight);
        }
        if let Some(day) = edit.day().filter(|day| !day.is_editable()) {
            warn!(%day, "rejected edit of non-editable day");
            return Err(FieldEditError::DayNotEditable { day });
        }

        debug!(?edit, "field edit");
        let keys = edit.affected_keys();
        self.draft.apply(edit);

        if matches!(
            self.status,
            SubmissionStatus::Succeeded | SubmissionStatus::Failed(_)
        ) {
            self.status = SubmissionStatus::Idle;
        }

        if keys.iter().any(|key| self.errors.contains(*key)) {
            let current = validate_draft(&self.draft);
            for key in keys {
                if !current.contains(key) {
                    self.errors.remove(key);
                }
            }
        }

        Ok(())
    }

    /// Open/close selectors are shown only for days that are not closed.
    pub fn is_day_expanded(&self, day: Weekday) -> bool {
        !self.draft.weekly_hours.get(day).is_closed
    }

    pub fn validate(&self) -> ValidationErrors {
        validate_draft(&self.draft)
    }

    /// Validates and, on success, moves to `Submitting` and hands back the
    /// snapshot to send. Pair with [`FormController::finish_submit`].
    pub fn begin_submit(&mut self) -> Result<BusinessListingDraft, SubmitError> {
        if self.status == SubmissionStatus::Submitting {
            warn!("submit ignored; a submission is already in flight");
            return Err(SubmitError::InFlight);
        }

        let errors = self.validate();
        if !errors.is_empty() {
            info!(fields = errors.len(), "listing failed validation: {errors}");
            self.errors = errors.clone();
            self.status = SubmissionStatus::Idle;
            return Err(SubmitError::Invalid(errors));
        }

        self.errors = ValidationErrors::new();
        self.status = SubmissionStatus::Submitting;
        info!(
            name = %self.draft.name,
            tags = self.draft.tags.len(),
            "submitting business listing"
        );
        Ok(self.draft.clone())
    }

    pub fn finish_submit(&mut self, outcome: Result<(), SubmissionError>) {
        if self.status != SubmissionStatus::Submitting {
            warn!("submission outcome arrived with no submission in flight");
            return;
        }

        match outcome {
            Ok(()) => {
                info!("business listing saved");
                self.draft = BusinessListingDraft::default();
                self.errors = ValidationErrors::new();
                self.status = SubmissionStatus::Succeeded;
                self.notification = Some(Notification::Success(SUCCESS_MESSAGE.to_string()));
            }
            Err(err) => {
                warn!(kind = ?err.kind, "business listing submission failed: {err}");
                self.notification = Some(Notification::Failure {
                    message: err.message().to_string(),
                });
                self.status = SubmissionStatus::Failed(err);
            }
        }
    }

    pub async fn submit<G>(&mut self, gateway: &G) -> Result<(), SubmitError>
    where
        G: ListingGateway + ?Sized,
    {
        let snapshot = self.begin_submit()?;
        let outcome = gateway.submit(&snapshot).await;
        self.finish_submit(outcome.clone());
        outcome.map_err(SubmitError::from)
    }

    pub fn take_notification(&mut self) -> Option<Notification> {
        self.notification.take()
    }
}
