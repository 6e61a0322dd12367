//! Client side of business listing intake: the form controller that owns the
//! draft and the gateway that ships it to the backend procedure.

pub mod form;
pub mod gateway;

pub use form::{
    validate_draft, FieldEditError, FormController, Notification, SubmissionStatus, SubmitError,
};
pub use gateway::{GatewayConfig, ListingGateway, MissingListingGateway, RpcListingGateway};

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod form_tests;

#[cfg(test)]
#[path = "tests/gateway_tests.rs"]
mod gateway_tests;
