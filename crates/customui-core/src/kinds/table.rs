//! Editable grid of text cells.

use serde::{Deserialize, Serialize};

use crate::error::{ParseErrors, UiError};
use crate::event::{Event, UserInput};
use crate::kinds::view_state::{Selection, SortKey, ViewState};
use crate::kinds::{Behavior, Emit, out_of_range, value};
use crate::markup::Element;
use crate::mutation::Mutation;
use crate::query::{Query, Value};

pub const DEFAULT_COLUMN_WIDTH: i32 = 100;
pub const DEFAULT_ROW_HEIGHT: i32 = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionBehavior {
    Items,
    Rows,
    Columns,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionMode {
    None,
    Single,
    Multi,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableItem {
    pub text: String,
    pub editable: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TableOp {
    Clear,
    SetRowCount(usize),
    SetColumnCount(usize),
    SetItem {
        row: usize,
        column: usize,
        text: String,
    },
    SetRowHeaderText {
        row: usize,
        text: String,
    },
    SetColumnHeaderText {
        column: usize,
        text: String,
    },
    SetItemEditable {
        row: usize,
        column: usize,
        editable: bool,
    },
    SetRowHeight {
        row: usize,
        height: i32,
    },
    SetColumnWidth {
        column: usize,
        width: i32,
        min: Option<i32>,
        max: Option<i32>,
    },
    /// `(-1, -1)` clears the selection.
    SetSelection {
        row: i32,
        column: i32,
    },
    SetEditable(bool),
    RestoreState(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct TableColumn {
    pub header: String,
    pub width: i32,
    pub min_width: Option<i32>,
    pub max_width: Option<i32>,
}

impl TableColumn {
    fn new(header: String) -> Self {
        Self {
            header,
            width: DEFAULT_COLUMN_WIDTH,
            min_width: None,
            max_width: None,
        }
    }

    fn set_width(&mut self, width: i32) {
        let mut w = width.max(0);
        if let Some(min) = self.min_width {
            w = w.max(min);
        }
        if let Some(max) = self.max_width {
            w = w.min(max);
        }
        self.width = w;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TableRow {
    pub header: String,
    pub height: i32,
    pub items: Vec<TableItem>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<TableRow>,
    pub show_horizontal_header: bool,
    pub show_vertical_header: bool,
    pub autosize_horizontal_header: bool,
    pub autosize_vertical_header: bool,
    pub show_grid: bool,
    pub editable: bool,
    pub sortable: bool,
    pub selection_behavior: SelectionBehavior,
    pub selection_mode: SelectionMode,
    pub selection: (i32, i32),
    pub sort: Option<SortKey>,
    pub onchange: Option<String>,
    pub onselectionchange: Option<String>,
    pub oncellactivate: Option<String>,
}

impl Table {
    pub fn parse(el: &Element) -> Result<Self, ParseErrors> {
        let mut errors = ParseErrors::default();
        let editable = el.bool_or("editable", true);
        let mut headers = Vec::new();
        let mut rows = Vec::new();
        for child in &el.children {
            match child.tag.as_str() {
                "header" => headers = Self::items(child, &mut errors),
                "row" => rows.push(Self::items(child, &mut errors)),
                other => errors.push(UiError::UnexpectedChild {
                    parent: "table",
                    found: other.to_string(),
                }),
            }
        }

        let width = rows.iter().map(Vec::len).fold(headers.len(), usize::max);
        headers.resize(width, String::new());
        let columns = headers.into_iter().map(TableColumn::new).collect();
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(i, mut cells)| {
                cells.resize(width, String::new());
                TableRow {
                    header: (i + 1).to_string(),
                    height: DEFAULT_ROW_HEIGHT,
                    items: cells
                        .into_iter()
                        .map(|text| TableItem { text, editable })
                        .collect(),
                }
            })
            .collect();

        errors.into_result(Self {
            columns,
            rows,
            show_horizontal_header: el.bool_or("show-horizontal-header", true),
            show_vertical_header: el.bool_or("show-vertical-header", false),
            autosize_horizontal_header: el.bool_or("autosize-horizontal-header", false),
            autosize_vertical_header: el.bool_or("autosize-vertical-header", false),
            show_grid: el.bool_or("show-grid", true),
            editable,
            sortable: el.bool_or("sortable", false),
            selection_behavior: el.keyword_or(
                "selection-behavior",
                SelectionBehavior::Items,
                &[
                    ("items", SelectionBehavior::Items),
                    ("rows", SelectionBehavior::Rows),
                    ("columns", SelectionBehavior::Columns),
                ],
            ),
            selection_mode: el.keyword_or(
                "selection-mode",
                SelectionMode::Single,
                &[
                    ("none", SelectionMode::None),
                    ("single", SelectionMode::Single),
                    ("multi", SelectionMode::Multi),
                ],
            ),
            selection: (-1, -1),
            sort: None,
            onchange: el.handler("onchange"),
            onselectionchange: el.handler("onselectionchange"),
            oncellactivate: el.handler("oncellactivate"),
        })
    }

    fn items(el: &Element, errors: &mut ParseErrors) -> Vec<String> {
        let mut out = Vec::new();
        for child in &el.children {
            if child.tag == "item" {
                out.push(child.text.clone());
            } else {
                errors.push(UiError::UnexpectedChild {
                    parent: "table",
                    found: child.tag.clone(),
                });
            }
        }
        out
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn item(&self, row: usize, column: usize) -> Option<&TableItem> {
        self.rows.get(row)?.items.get(column)
    }

    fn item_mut(&mut self, row: usize, column: usize) -> Result<&mut TableItem, UiError> {
        let row_ref = self
            .rows
            .get_mut(row)
            .ok_or_else(|| out_of_range("row", row))?;
        row_ref
            .items
            .get_mut(column)
            .ok_or_else(|| out_of_range("column", column))
    }

    fn column_mut(&mut self, column: usize) -> Result<&mut TableColumn, UiError> {
        self.columns
            .get_mut(column)
            .ok_or_else(|| out_of_range("column", column))
    }

    fn valid_cell(&self, row: i32, column: i32) -> bool {
        (row, column) == (-1, -1)
            || (row >= 0
                && column >= 0
                && (row as usize) < self.rows.len()
                && (column as usize) < self.columns.len())
    }

    fn set_selection(&mut self, row: i32, column: i32) -> Result<(), UiError> {
        if !self.valid_cell(row, column) {
            return Err(UiError::InvalidArgument(format!(
                "cell ({row}, {column}) out of range"
            )));
        }
        self.selection = (row, column);
        Ok(())
    }

    pub fn save_state(&self) -> Result<String, UiError> {
        let selection = (self.selection.0 >= 0).then_some(Selection::Cell {
            row: self.selection.0,
            column: self.selection.1,
        });
        ViewState {
            version: 0,
            column_widths: self.columns.iter().map(|c| c.width).collect(),
            sort: self.sort,
            selection,
        }
        .to_blob()
    }

    pub fn restore_state(&mut self, blob: &str) -> Result<(), UiError> {
        let state = ViewState::from_blob(blob)?;
        for (column, width) in self.columns.iter_mut().zip(&state.column_widths) {
            column.set_width(*width);
        }
        self.sort = state.sort.filter(|s| s.column < self.columns.len());
        self.selection = match state.selection {
            Some(Selection::Cell { row, column }) if self.valid_cell(row, column) => (row, column),
            _ => (-1, -1),
        };
        Ok(())
    }

    pub fn run(&mut self, op: &TableOp) -> Result<(), UiError> {
        match op {
            TableOp::Clear => {
                self.rows.clear();
                self.selection = (-1, -1);
            }
            TableOp::SetRowCount(count) => {
                let columns = self.columns.len();
                let editable = self.editable;
                let mut next = self.rows.len();
                self.rows.resize_with(*count, || {
                    next += 1;
                    TableRow {
                        header: next.to_string(),
                        height: DEFAULT_ROW_HEIGHT,
                        items: vec![
                            TableItem {
                                text: String::new(),
                                editable,
                            };
                            columns
                        ],
                    }
                });
                if self.selection.0 >= *count as i32 {
                    self.selection = (-1, -1);
                }
            }
            TableOp::SetColumnCount(count) => {
                self.columns
                    .resize_with(*count, || TableColumn::new(String::new()));
                let editable = self.editable;
                for row in &mut self.rows {
                    row.items.resize(
                        *count,
                        TableItem {
                            text: String::new(),
                            editable,
                        },
                    );
                }
                if self.selection.1 >= *count as i32 {
                    self.selection = (-1, -1);
                }
                if self.sort.is_some_and(|s| s.column >= *count) {
                    self.sort = None;
                }
            }
            TableOp::SetItem { row, column, text } => {
                self.item_mut(*row, *column)?.text = text.clone();
            }
            TableOp::SetRowHeaderText { row, text } => {
                self.rows
                    .get_mut(*row)
                    .ok_or_else(|| out_of_range("row", row))?
                    .header = text.clone();
            }
            TableOp::SetColumnHeaderText { column, text } => {
                self.column_mut(*column)?.header = text.clone();
            }
            TableOp::SetItemEditable {
                row,
                column,
                editable,
            } => {
                self.item_mut(*row, *column)?.editable = *editable;
            }
            TableOp::SetRowHeight { row, height } => {
                self.rows
                    .get_mut(*row)
                    .ok_or_else(|| out_of_range("row", row))?
                    .height = (*height).max(0);
            }
            TableOp::SetColumnWidth {
                column,
                width,
                min,
                max,
            } => {
                let c = self.column_mut(*column)?;
                c.min_width = *min;
                c.max_width = *max;
                c.set_width(*width);
            }
            TableOp::SetSelection { row, column } => self.set_selection(*row, *column)?,
            TableOp::SetEditable(editable) => {
                self.editable = *editable;
                for item in self.rows.iter_mut().flat_map(|r| r.items.iter_mut()) {
                    item.editable = *editable;
                }
            }
            TableOp::RestoreState(blob) => self.restore_state(blob)?,
        }
        Ok(())
    }
}

impl Behavior for Table {
    fn apply(&mut self, mutation: &Mutation) -> Option<Result<(), UiError>> {
        match mutation {
            Mutation::Table(op) => Some(self.run(op)),
            _ => None,
        }
    }

    fn input(&mut self, input: UserInput) -> Option<Emit> {
        match input {
            UserInput::CellActivated { row, column } => {
                let value = self.item(row, column)?.text.clone();
                Some(Emit::new(
                    Event::CellActivated { row, column, value },
                    &self.oncellactivate,
                ))
            }
            UserInput::CellSelected { row, column } => {
                self.set_selection(row, column).ok()?;
                Some(Emit::new(
                    Event::TableSelectionChanged { row, column },
                    &self.onselectionchange,
                ))
            }
            UserInput::CellEdited { row, column, text } => {
                let item = self.item_mut(row, column).ok()?;
                if !item.editable {
                    return None;
                }
                item.text = text.clone();
                Some(Emit::new(Event::ValueChangedString(text), &self.onchange))
            }
            UserInput::SortChanged { column, order } => {
                if column < self.columns.len() {
                    self.sort = Some(SortKey { column, order });
                }
                None
            }
            UserInput::ColumnResized { column, width } => {
                if let Ok(c) = self.column_mut(column) {
                    c.set_width(width);
                }
                None
            }
            _ => None,
        }
    }

    fn query(&self, query: &Query) -> Option<Result<Value, UiError>> {
        match query {
            Query::TableItem { row, column } => Some(
                self.item(*row, *column)
                    .map(|i| Value::Text(i.text.clone()))
                    .ok_or_else(|| {
                        UiError::InvalidArgument(format!("cell ({row}, {column}) out of range"))
                    }),
            ),
            Query::RowCount => value(Value::Int(self.rows.len() as i32)),
            Query::ColumnCount => value(Value::Int(self.columns.len() as i32)),
            Query::TableSelection => value(Value::Cell {
                row: self.selection.0,
                column: self.selection.1,
            }),
            Query::SaveState => Some(self.save_state().map(Value::Text)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let el = Element::new("table")
            .with_child(
                Element::new("header")
                    .with_child(Element::new("item").with_text("Name"))
                    .with_child(Element::new("item").with_text("Mass")),
            )
            .with_child(
                Element::new("row")
                    .with_child(Element::new("item").with_text("a"))
                    .with_child(Element::new("item").with_text("1.0")),
            )
            .with_child(Element::new("row").with_child(Element::new("item").with_text("b")));
        Table::parse(&el).unwrap()
    }

    #[test]
    fn test_parse_pads_short_rows() {
        let t = sample();
        assert_eq!((t.row_count(), t.column_count()), (2, 2));
        assert_eq!(t.item(1, 1).map(|i| i.text.as_str()), Some(""));
        assert_eq!(t.columns[0].header, "Name");
    }

    #[test]
    fn test_state_blob_restores_widths_and_selection() {
        let mut t = sample();
        t.run(&TableOp::SetColumnWidth {
            column: 1,
            width: 42,
            min: None,
            max: None,
        })
        .unwrap();
        t.run(&TableOp::SetSelection { row: 1, column: 0 }).unwrap();
        let blob = t.save_state().unwrap();

        let mut fresh = sample();
        fresh.restore_state(&blob).unwrap();
        assert_eq!(fresh.columns[1].width, 42);
        assert_eq!(fresh.selection, (1, 0));
        assert_eq!(fresh.save_state().unwrap(), blob);
    }

    #[test]
    fn test_selection_bounds() {
        let mut t = sample();
        assert!(t.run(&TableOp::SetSelection { row: 5, column: 0 }).is_err());
        t.run(&TableOp::SetSelection { row: -1, column: -1 }).unwrap();
        assert_eq!(t.selection, (-1, -1));
    }

    #[test]
    fn test_column_width_limits() {
        let mut t = sample();
        t.run(&TableOp::SetColumnWidth {
            column: 0,
            width: 500,
            min: Some(10),
            max: Some(200),
        })
        .unwrap();
        assert_eq!(t.columns[0].width, 200);
    }

    #[test]
    fn test_cell_edit_respects_editable() {
        let mut t = sample();
        t.run(&TableOp::SetItemEditable {
            row: 0,
            column: 0,
            editable: false,
        })
        .unwrap();
        let edit = UserInput::CellEdited {
            row: 0,
            column: 0,
            text: "x".into(),
        };
        assert!(t.input(edit).is_none());
        assert_eq!(t.item(0, 0).unwrap().text, "a");
    }
}
