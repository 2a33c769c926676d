//! Event model for completed-form notifications.
//!
//! An [`EventRecord`] is the provider-agnostic description of one finished
//! form submission. Its [`FormNode`]s are rendered in order by every
//! integration.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

use crate::error::RenderError;

/// Kinds of events an integration can announce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// A form was completed by a respondent
    #[serde(rename = "form.finished")]
    FormFinished,
}

impl EventKind {
    /// Wire identifier of this event kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FormFinished => "form.finished",
        }
    }

    /// Parse a wire identifier, returning `None` for unknown kinds.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "form.finished" => Some(Self::FormFinished),
            _ => None,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One completed-form event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Headline of the notification
    pub title: String,
    /// Text of the link back to the submission
    pub link_text: String,
    /// Target of the link back to the submission
    pub link_url: String,
    /// Translated heading for the form section
    #[serde(default)]
    pub form_translation: String,
    /// Contact details left by the respondent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<ContactInfo>,
    /// Answered form nodes, in form order
    #[serde(default)]
    pub nodes: Vec<FormNode>,
}

/// A single answered element of a form.
///
/// Each variant carries exactly the payload matching its kind. Kinds this
/// crate does not know deserialize to [`FormNode::Unknown`] and are skipped
/// by every renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FormNode {
    Choice {
        #[serde(default)]
        label: String,
        choice: ChoiceInfo,
    },
    Select {
        #[serde(default)]
        label: String,
        select: SelectInfo,
    },
    Contact {
        #[serde(default)]
        label: String,
        contact: ContactInfo,
    },
    Rating {
        #[serde(default)]
        label: String,
        rating: RatingInfo,
    },
    #[serde(other)]
    Unknown,
}

impl FormNode {
    /// Translated label of the node, if the node kind is known.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Choice { label, .. }
            | Self::Select { label, .. }
            | Self::Contact { label, .. }
            | Self::Rating { label, .. } => Some(label.as_str()),
            Self::Unknown => None,
        }
    }

    /// Short name of the node kind, used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Choice { .. } => "choice",
            Self::Select { .. } => "select",
            Self::Contact { .. } => "contact",
            Self::Rating { .. } => "rating",
            Self::Unknown => "unknown",
        }
    }
}

/// Free-form contact details. Empty fields are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company: String,
    pub phone: String,
    pub details: String,
}

impl ContactInfo {
    /// Labelled non-empty fields, in display order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("First Name", self.first_name.as_str()),
            ("Last Name", self.last_name.as_str()),
            ("Email", self.email.as_str()),
            ("Company", self.company.as_str()),
            ("Phone", self.phone.as_str()),
            ("Details", self.details.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
    }

    /// True when no field carries a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields().next().is_none()
    }
}

/// Options picked in a single- or multi-select question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectInfo {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub options: Vec<String>,
}

/// Answers to a rating-scale question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingInfo {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub elements: Vec<RatingElement>,
}

/// One rated item, scored out of ten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingElement {
    pub label: String,
    pub value: u8,
}

/// Answers to an open-ended choice question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceInfo {
    #[serde(default)]
    pub elements: Vec<ChoiceElement>,
}

/// One choice with its optional free-text answers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceElement {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_answer: Option<String>,
}

impl ChoiceElement {
    /// Present answers, short before long. Empty strings count as absent.
    pub fn answers(&self) -> impl Iterator<Item = &str> {
        [self.short_answer.as_deref(), self.long_answer.as_deref()]
            .into_iter()
            .flatten()
            .filter(|answer| !answer.is_empty())
    }
}

/// Event payload handed to the dispatcher.
///
/// Callers either pass a typed record or raw JSON received from elsewhere.
/// Raw JSON is checked against the shape the event kind needs before any
/// rendering happens.
#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    FormFinished(EventRecord),
    Json(serde_json::Value),
}

impl EventPayload {
    /// Recover the form record required by `form.finished`.
    ///
    /// # Errors
    /// Returns [`RenderError::TypeMismatch`] when the payload is raw JSON that
    /// does not decode into an [`EventRecord`].
    pub fn form_record(&self) -> Result<Cow<'_, EventRecord>, RenderError> {
        match self {
            Self::FormFinished(record) => Ok(Cow::Borrowed(record)),
            Self::Json(value) => EventRecord::deserialize(value)
                .map(Cow::Owned)
                .map_err(|e| RenderError::TypeMismatch {
                    event_kind: EventKind::FormFinished.to_string(),
                    reason: e.to_string(),
                }),
        }
    }
}

impl From<EventRecord> for EventPayload {
    fn from(record: EventRecord) -> Self {
        Self::FormFinished(record)
    }
}
