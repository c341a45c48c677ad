//! Concrete widget kinds.
//!
//! Every kind parses its own attributes (falling back to defaults on
//! malformed values) and implements [`Behavior`]: how it reacts to host
//! mutations, to native user input, and to synchronous queries.

pub mod container;
pub mod controls;
pub mod dataflow;
pub mod plot;
pub mod table;
pub mod tree;
pub mod view_state;

pub use container::{Container, Group, Layout, Row, Slot, Tab, Tabs, Window, WindowFlags, WindowOp};
pub use controls::*;
pub use dataflow::{Connection, Dataflow, DataflowOp, Node};
pub use plot::{Curve, CurveKind, CurveStyle, MouseOptions, Plot, PlotOp, Range};
pub use table::{SelectionBehavior, SelectionMode, SortOrder, Table, TableItem, TableOp};
pub use tree::{Tree, TreeItem, TreeOp};
pub use view_state::{Selection, SortKey, ViewState};

use crate::error::UiError;
use crate::event::{Event, UserInput};
use crate::mutation::Mutation;
use crate::query::{Query, Value};

/// An event ready to be delivered, with the markup handler it maps to.
#[derive(Clone, Debug, PartialEq)]
pub struct Emit {
    pub event: Event,
    pub handler: Option<String>,
}

impl Emit {
    pub fn new(event: Event, handler: &Option<String>) -> Self {
        Self {
            event,
            handler: handler.clone(),
        }
    }
}

/// Per-kind reaction to mutations, input and queries.
///
/// `None` from `apply`/`query` means the kind does not understand the
/// request; the caller turns that into [`UiError::Unsupported`].
pub trait Behavior {
    fn apply(&mut self, _mutation: &Mutation) -> Option<Result<(), UiError>> {
        None
    }

    fn input(&mut self, _input: UserInput) -> Option<Emit> {
        None
    }

    fn query(&self, _query: &Query) -> Option<Result<Value, UiError>> {
        None
    }
}

pub(crate) fn ok() -> Option<Result<(), UiError>> {
    Some(Ok(()))
}

pub(crate) fn value(v: Value) -> Option<Result<Value, UiError>> {
    Some(Ok(v))
}

pub(crate) fn out_of_range(what: &str, index: impl std::fmt::Display) -> UiError {
    UiError::InvalidArgument(format!("{what} {index} out of range"))
}
