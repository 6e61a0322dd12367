use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{FieldErrorKind, FieldKey};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not one of the selectable times (06:00 .. 23:00, 00:00)")]
pub struct TimeSlotParseError {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not a known listing tag")]
pub struct TagParseError {
    pub value: String,
}

/// Error object returned by the backend when the procedure call fails.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RpcErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionErrorKind {
    Transport,
    Server,
    Unavailable,
}

/// The remote call failed. Carries the message to show to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SubmissionError {
    pub kind: SubmissionErrorKind,
    pub status: Option<u16>,
    pub message: String,
}

impl SubmissionError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: SubmissionErrorKind::Transport,
            status: None,
            message: message.into(),
        }
    }

    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: SubmissionErrorKind::Server,
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SubmissionErrorKind::Unavailable,
            status: None,
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Field-level validation failures, ordered by form position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<FieldKey, FieldErrorKind>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: FieldKey, kind: FieldErrorKind) {
        self.fields.insert(key, kind);
    }

    pub fn remove(&mut self, key: FieldKey) -> Option<FieldErrorKind> {
        self.fields.remove(&key)
    }

    pub fn get(&self, key: FieldKey) -> Option<FieldErrorKind> {
        self.fields.get(&key).copied()
    }

    pub fn contains(&self, key: FieldKey) -> bool {
        self.fields.contains_key(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = FieldKey> + '_ {
        self.fields.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, FieldErrorKind)> + '_ {
        self.fields.iter().map(|(key, kind)| (*key, *kind))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, _) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{key}: {}", key.message())?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
