use std::sync::Arc;

use async_trait::async_trait;
use shared::{
    domain::{BusinessListingDraft, FieldEdit, FieldErrorKind, FieldKey, Tag, TimeSlot, Weekday},
    error::SubmissionError,
    protocol::InsertLocationParams,
};
use tokio::sync::Mutex;

use crate::{
    form::SUCCESS_MESSAGE, validate_draft, FieldEditError, FormController, ListingGateway,
    Notification, SubmissionStatus, SubmitError,
};

struct RecordingGateway {
    calls: Arc<Mutex<Vec<BusinessListingDraft>>>,
    fail_with: Option<SubmissionError>,
}

impl RecordingGateway {
    fn ok() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    fn failing(err: SubmissionError) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(err),
        }
    }

    async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

#[async_trait]
impl ListingGateway for RecordingGateway {
    async fn submit(&self, draft: &BusinessListingDraft) -> Result<(), SubmissionError> {
        self.calls.lock().await.push(draft.clone());
        match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

fn slot(value: &str) -> TimeSlot {
    value.parse().expect("slot")
}

fn fill_required(controller: &mut FormController) {
    let edits = [
        FieldEdit::Name("Joe's Cafe".to_string()),
        FieldEdit::StreetLineOne("12 Harbor Rd".to_string()),
        FieldEdit::City("Portland".to_string()),
        FieldEdit::State("ME".to_string()),
        FieldEdit::ZipCode("04101".to_string()),
        FieldEdit::Tag {
            tag: Tag::Coffee,
            selected: true,
        },
    ];
    for edit in edits {
        controller.set_field(edit).expect("edit");
    }
}

#[test]
fn fully_populated_draft_has_no_errors() {
    let mut controller = FormController::new();
    fill_required(&mut controller);
    assert!(controller.validate().is_empty());
}

#[test]
fn default_draft_reports_every_required_field() {
    let errors = validate_draft(&BusinessListingDraft::default());
    let keys: Vec<FieldKey> = errors.keys().collect();
    assert_eq!(
        keys,
        vec![
            FieldKey::Name,
            FieldKey::StreetLineOne,
            FieldKey::City,
            FieldKey::State,
            FieldKey::ZipCode,
            FieldKey::Tags,
        ]
    );
    assert_eq!(errors.get(FieldKey::Tags), Some(FieldErrorKind::EmptySelection));
}

#[test]
fn each_missing_field_is_reported_alone() {
    let blanks = [
        (FieldEdit::Name(String::new()), FieldKey::Name),
        (FieldEdit::StreetLineOne(String::new()), FieldKey::StreetLineOne),
        (FieldEdit::City(String::new()), FieldKey::City),
        (FieldEdit::State(String::new()), FieldKey::State),
        (FieldEdit::ZipCode(String::new()), FieldKey::ZipCode),
        (
            FieldEdit::Tag {
                tag: Tag::Coffee,
                selected: false,
            },
            FieldKey::Tags,
        ),
        (
            FieldEdit::DayOpen {
                day: Weekday::Tuesday,
                slot: None,
            },
            FieldKey::DayOpen(Weekday::Tuesday),
        ),
        (
            FieldEdit::DayClose {
                day: Weekday::Sunday,
                slot: None,
            },
            FieldKey::DayClose(Weekday::Sunday),
        ),
    ];

    for (edit, key) in blanks {
        let mut controller = FormController::new();
        fill_required(&mut controller);
        controller.set_field(edit).expect("edit");

        let errors = controller.validate();
        assert_eq!(errors.len(), 1, "expected only {key}: {errors}");
        let expected = if key == FieldKey::Tags {
            FieldErrorKind::EmptySelection
        } else {
            FieldErrorKind::MissingValue
        };
        assert_eq!(errors.get(key), Some(expected));
    }
}

#[test]
fn whitespace_only_text_counts_as_filled_in() {
    let mut controller = FormController::new();
    fill_required(&mut controller);
    controller
        .set_field(FieldEdit::Name("   ".to_string()))
        .expect("edit");
    assert!(controller.validate().is_empty());
}

#[test]
fn street_line_two_is_optional() {
    let mut controller = FormController::new();
    fill_required(&mut controller);
    controller
        .set_field(FieldEdit::StreetLineTwo(String::new()))
        .expect("edit");
    assert!(controller.validate().is_empty());
}

#[test]
fn closed_day_needs_no_times_and_collapses() {
    let mut controller = FormController::new();
    fill_required(&mut controller);
    controller
        .set_field(FieldEdit::DayOpen {
            day: Weekday::Monday,
            slot: None,
        })
        .expect("edit");
    assert!(controller.is_day_expanded(Weekday::Monday));
    assert!(!controller.validate().is_empty());

    controller
        .set_field(FieldEdit::DayClosed {
            day: Weekday::Monday,
            closed: true,
        })
        .expect("edit");
    assert!(!controller.is_day_expanded(Weekday::Monday));
    assert!(controller.validate().is_empty());

    controller
        .set_field(FieldEdit::DayClosed {
            day: Weekday::Monday,
            closed: false,
        })
        .expect("edit");
    assert!(controller.is_day_expanded(Weekday::Monday));
}

#[test]
fn friday_and_saturday_edits_are_rejected() {
    let mut controller = FormController::new();
    let err = controller
        .set_field(FieldEdit::DayClosed {
            day: Weekday::Friday,
            closed: true,
        })
        .expect_err("friday is not editable");
    assert_eq!(
        err,
        FieldEditError::DayNotEditable {
            day: Weekday::Friday
        }
    );
    assert!(controller
        .set_field(FieldEdit::DayOpen {
            day: Weekday::Saturday,
            slot: Some(slot("06:00")),
        })
        .is_err());
    assert_eq!(controller.draft(), &BusinessListingDraft::default());
}

#[test]
fn stored_errors_clear_as_fields_are_corrected() {
    let mut controller = FormController::new();
    let err = controller.begin_submit().expect_err("empty draft");
    assert!(matches!(err, SubmitError::Invalid(_)));
    assert_eq!(controller.errors().len(), 6);

    controller
        .set_field(FieldEdit::Name("Joe's Cafe".to_string()))
        .expect("edit");
    assert_eq!(controller.error_for(FieldKey::Name), None);
    assert_eq!(
        controller.error_for(FieldKey::City),
        Some(FieldErrorKind::MissingValue)
    );

    controller
        .set_field(FieldEdit::City(String::new()))
        .expect("edit");
    assert!(controller.errors().contains(FieldKey::City));

    controller
        .set_field(FieldEdit::Tag {
            tag: Tag::Walk,
            selected: true,
        })
        .expect("edit");
    assert!(!controller.errors().contains(FieldKey::Tags));
}

#[test]
fn edits_do_not_add_errors_before_submit() {
    let mut controller = FormController::new();
    controller
        .set_field(FieldEdit::Name(String::new()))
        .expect("edit");
    assert!(controller.errors().is_empty());
}

#[tokio::test]
async fn valid_submission_sends_snapshot_and_resets_draft() {
    let gateway = RecordingGateway::ok();
    let mut controller = FormController::new();
    fill_required(&mut controller);
    controller
        .set_field(FieldEdit::DayClosed {
            day: Weekday::Sunday,
            closed: true,
        })
        .expect("edit");

    controller.submit(&gateway).await.expect("submit");

    let calls = gateway.calls.lock().await;
    assert_eq!(calls.len(), 1);
    let params = InsertLocationParams::from_draft(&calls[0]);
    assert_eq!(params.name_input, "Joe's Cafe");
    assert_eq!(params.day_times(Weekday::Sunday), ("", ""));
    assert_eq!(params.day_times(Weekday::Monday), ("09:00", "17:00"));
    assert_eq!(params.tags_input, vec!["Coffee".to_string()]);

    assert_eq!(controller.draft(), &BusinessListingDraft::default());
    assert_eq!(controller.status(), &SubmissionStatus::Succeeded);
    assert_eq!(
        controller.take_notification(),
        Some(Notification::Success(SUCCESS_MESSAGE.to_string()))
    );
    assert_eq!(controller.take_notification(), None);
}

#[tokio::test]
async fn invalid_draft_never_reaches_gateway() {
    let gateway = RecordingGateway::ok();
    let mut controller = FormController::new();
    fill_required(&mut controller);
    controller
        .set_field(FieldEdit::Name(String::new()))
        .expect("edit");

    let err = controller.submit(&gateway).await.expect_err("invalid");
    match err {
        SubmitError::Invalid(errors) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors.get(FieldKey::Name), Some(FieldErrorKind::MissingValue));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(gateway.call_count().await, 0);
    assert_eq!(controller.status(), &SubmissionStatus::Idle);
    assert_eq!(controller.take_notification(), None);
}

#[tokio::test]
async fn server_error_keeps_draft_and_surfaces_literal_message() {
    let gateway = RecordingGateway::failing(SubmissionError::server(409, "duplicate listing"));
    let mut controller = FormController::new();
    fill_required(&mut controller);
    let before = controller.draft().clone();

    let err = controller.submit(&gateway).await.expect_err("server error");
    assert_eq!(err.to_string(), "duplicate listing");
    assert_eq!(gateway.call_count().await, 1);
    assert_eq!(controller.draft(), &before);
    assert!(matches!(controller.status(), SubmissionStatus::Failed(failure) if failure.message() == "duplicate listing"));
    assert_eq!(
        controller.take_notification(),
        Some(Notification::Failure {
            message: "duplicate listing".to_string()
        })
    );

    controller
        .set_field(FieldEdit::ZipCode("04102".to_string()))
        .expect("edit after failure");
    assert_eq!(controller.status(), &SubmissionStatus::Idle);
}

#[test]
fn second_submit_while_in_flight_is_rejected() {
    let mut controller = FormController::new();
    fill_required(&mut controller);

    let snapshot = controller.begin_submit().expect("first submit");
    assert_eq!(&snapshot, controller.draft());
    assert!(!controller.can_submit());
    assert_eq!(controller.begin_submit(), Err(SubmitError::InFlight));
    assert_eq!(
        controller.set_field(FieldEdit::Name("Other".to_string())),
        Err(FieldEditError::SubmissionInFlight)
    );

    controller.finish_submit(Err(SubmissionError::transport("connection reset")));
    assert!(controller.can_submit());
    assert_eq!(controller.draft(), &snapshot);
    assert!(controller.begin_submit().is_ok());
}

#[test]
fn stray_outcome_without_submission_is_ignored() {
    let mut controller = FormController::new();
    fill_required(&mut controller);
    let before = controller.draft().clone();

    controller.finish_submit(Ok(()));
    assert_eq!(controller.draft(), &before);
    assert_eq!(controller.status(), &SubmissionStatus::Idle);
    assert_eq!(controller.take_notification(), None);
}
