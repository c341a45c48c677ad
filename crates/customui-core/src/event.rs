//! Interaction events.
//!
//! [`UserInput`] is what a native control reports: "the user did X".
//! [`Event`] is what the host sees after the widget model has absorbed the
//! input, wrapped in a [`Notification`] that names the originating proxy,
//! widget id and the handler declared in markup.

use bitflags::bitflags;

use crate::geometry::Point;
use crate::ids::{ProxyHandle, WidgetId};
use crate::kinds::dataflow::Connection;
use crate::kinds::table::SortOrder;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const SHIFT = 1 << 0;
        const CONTROL = 1 << 1;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseEventKind {
    Press,
    Release,
    DoubleClick,
    Move,
}

#[derive(Clone, Debug, PartialEq)]
pub enum UserInput {
    Clicked,
    IntChanged(i32),
    DoubleChanged(f64),
    TextChanged(String),
    EditingFinished,
    Toggled(bool),
    IndexChanged(i32),
    LinkActivated(String),
    CellActivated { row: usize, column: usize },
    CellSelected { row: i32, column: i32 },
    CellEdited { row: usize, column: usize, text: String },
    SortChanged { column: usize, order: SortOrder },
    ColumnResized { column: usize, width: i32 },
    TreeItemSelected(Option<i32>),
    PlottableClicked { curve: String, index: usize },
    LegendClicked { curve: String },
    Mouse {
        kind: MouseEventKind,
        modifiers: KeyModifiers,
        x: i32,
        y: i32,
    },
    NodeCreated {
        pos: Point,
        text: String,
        inlets: u32,
        outlets: u32,
    },
    NodeDeleted(i32),
    NodeMoved { node: i32, pos: Point },
    NodeTextEdited { node: i32, text: String },
    ConnectionCreated(Connection),
    ConnectionDeleted(Connection),
    CloseRequested,
}

/// Host-visible interaction payloads.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Clicked,
    ValueChangedInt(i32),
    ValueChangedDouble(f64),
    ValueChangedString(String),
    EditingFinished(String),
    LinkActivated(String),
    CellActivated {
        row: usize,
        column: usize,
        value: String,
    },
    TableSelectionChanged {
        row: i32,
        column: i32,
    },
    TreeSelectionChanged {
        item: Option<i32>,
    },
    PlottableClicked {
        curve: String,
        index: usize,
        x: f64,
        y: f64,
    },
    LegendClicked {
        curve: String,
    },
    Mouse {
        kind: MouseEventKind,
        modifiers: KeyModifiers,
        x: i32,
        y: i32,
    },
    NodeAdded {
        node: i32,
        pos: Point,
        text: String,
        inlets: u32,
        outlets: u32,
    },
    NodeRemoved {
        node: i32,
    },
    NodePosChanged {
        node: i32,
        pos: Point,
    },
    NodeTextChanged {
        node: i32,
        text: String,
    },
    ConnectionAdded(Connection),
    ConnectionRemoved(Connection),
    WindowClosed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub proxy: ProxyHandle,
    pub widget: WidgetId,
    pub handler: Option<String>,
    pub event: Event,
}
