//! Host-issued state changes.
//!
//! A mutation is applied to the widget model on the render context and then
//! mirrored onto the native control. Grouped per kind where a kind has more
//! than one or two operations.

use crate::geometry::Geometry;
use crate::kinds::{DataflowOp, PlotOp, TableOp, TreeOp, WindowOp};

#[derive(Clone, Debug, PartialEq)]
pub enum ComboboxOp {
    Insert { index: usize, text: String },
    Remove { index: usize },
    SetItems { items: Vec<String>, selected: i32 },
    SetSelected(i32),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Mutation {
    SetEnabled(bool),
    SetVisible(bool),
    SetStyle(String),
    SetGeometry(Geometry),
    SetText(String),
    SetPressed(bool),
    SetInt(i32),
    SetDouble(f64),
    SetChecked(bool),
    SetUrl(String),
    SetImage {
        data: Vec<u8>,
        width: u32,
        height: u32,
    },
    SetCurrentTab(usize),
    Window(WindowOp),
    Combobox(ComboboxOp),
    Table(TableOp),
    Tree(TreeOp),
    Plot(PlotOp),
    Dataflow(DataflowOp),
}

impl Mutation {
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::SetEnabled(_) => "set-enabled",
            Mutation::SetVisible(_) => "set-visible",
            Mutation::SetStyle(_) => "set-style",
            Mutation::SetGeometry(_) => "set-geometry",
            Mutation::SetText(_) => "set-text",
            Mutation::SetPressed(_) => "set-pressed",
            Mutation::SetInt(_) => "set-int",
            Mutation::SetDouble(_) => "set-double",
            Mutation::SetChecked(_) => "set-checked",
            Mutation::SetUrl(_) => "set-url",
            Mutation::SetImage { .. } => "set-image",
            Mutation::SetCurrentTab(_) => "set-current-tab",
            Mutation::Window(_) => "window operation",
            Mutation::Combobox(_) => "combobox operation",
            Mutation::Table(_) => "table operation",
            Mutation::Tree(_) => "tree operation",
            Mutation::Plot(_) => "plot operation",
            Mutation::Dataflow(_) => "dataflow operation",
        }
    }
}
