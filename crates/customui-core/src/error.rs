//! Error types.
//!
//! Structural errors abort the parse of the subtree they occur in; parsing
//! keeps going across sibling elements so a document reports as many problems
//! as possible in one pass. Lifecycle errors mean a core invariant was broken.

use thiserror::Error;

use crate::WidgetId;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum UiError {
    #[error("element must be <{expected}>")]
    TagMismatch { expected: &'static str, found: String },

    #[error("id must be a positive integer")]
    InvalidId,

    #[error("duplicate id {0}")]
    DuplicateId(WidgetId),

    #[error("invalid value for attribute 'layout': {0:?}")]
    InvalidLayout(String),

    #[error("extra elements in layout")]
    ExtraElements,

    #[error("<br> is only allowed in grid layout")]
    BreakOutsideGrid,

    #[error("invalid element <{0}>")]
    UnknownElement(String),

    #[error("invalid element <{found}> inside <{parent}>")]
    UnexpectedChild { parent: &'static str, found: String },

    #[error("markup error: {0}")]
    Markup(String),

    #[error("native handle already bound")]
    AlreadyBound,

    #[error("widget {0} has been destroyed")]
    Destroyed(WidgetId),

    #[error("<{class}> does not support {operation}")]
    Unsupported {
        class: &'static str,
        operation: &'static str,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid state blob: {0}")]
    State(String),
}

impl UiError {
    /// Errors that make a document unusable.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            UiError::TagMismatch { .. }
                | UiError::InvalidId
                | UiError::DuplicateId(_)
                | UiError::InvalidLayout(_)
                | UiError::ExtraElements
                | UiError::BreakOutsideGrid
                | UiError::UnknownElement(_)
                | UiError::UnexpectedChild { .. }
                | UiError::Markup(_)
        )
    }

    pub fn is_lifecycle(&self) -> bool {
        matches!(self, UiError::AlreadyBound | UiError::Destroyed(_))
    }
}

impl From<serde_json::Error> for UiError {
    fn from(e: serde_json::Error) -> Self {
        UiError::State(e.to_string())
    }
}

/// Accumulated human-readable parse failures for one document.
#[derive(Debug, Default, Error, Clone, PartialEq)]
#[error("{}", .messages.join("; "))]
pub struct ParseErrors {
    pub messages: Vec<String>,
}

impl ParseErrors {
    pub fn push(&mut self, e: impl Into<ParseErrors>) {
        self.messages.extend(e.into().messages);
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.messages.iter().any(|m| m.contains(needle))
    }

    /// `Ok(value)` when nothing was collected.
    pub fn into_result<T>(self, value: T) -> Result<T, ParseErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl From<UiError> for ParseErrors {
    fn from(e: UiError) -> Self {
        ParseErrors {
            messages: vec![e.to_string()],
        }
    }
}
