//! Synchronous read-back of widget state.

use crate::geometry::Geometry;

#[derive(Clone, Debug, PartialEq)]
pub enum Query {
    Value,
    Text,
    Checked,
    Enabled,
    Visible,
    Style,
    Geometry,
    Title,
    CurrentIndex,
    Items,
    TableItem { row: usize, column: usize },
    RowCount,
    ColumnCount,
    TableSelection,
    TreeSelection,
    SaveState,
    CurveNames,
    NodeIds,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Int(i32),
    Double(f64),
    Text(String),
    List(Vec<String>),
    Cell { row: i32, column: i32 },
    Geometry(Geometry),
}

impl Value {
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            Value::Int(v) => Some(f64::from(*v)),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}
