//! Hierarchical multi-column list.
//!
//! Items are addressed by a host-chosen integer id. Items declared in markup
//! without an id get a negative one, unique within the tree.

use std::collections::BTreeMap;

use crate::error::{ParseErrors, UiError};
use crate::event::{Event, UserInput};
use crate::kinds::table::DEFAULT_COLUMN_WIDTH;
use crate::kinds::view_state::{Selection, SortKey, ViewState};
use crate::kinds::{Behavior, Emit, out_of_range, value};
use crate::markup::Element;
use crate::mutation::Mutation;
use crate::query::{Query, Value};

#[derive(Clone, Debug, PartialEq)]
pub struct TreeItem {
    pub id: i32,
    pub parent: Option<i32>,
    pub text: Vec<String>,
    pub expanded: bool,
    pub children: Vec<i32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TreeColumn {
    pub header: String,
    pub width: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TreeOp {
    Clear,
    SetColumnCount(usize),
    SetColumnHeaderText {
        column: usize,
        text: String,
    },
    SetColumnWidth {
        column: usize,
        width: i32,
    },
    AddItem {
        id: i32,
        parent: Option<i32>,
        text: Vec<String>,
        expanded: bool,
    },
    UpdateItemText {
        id: i32,
        text: Vec<String>,
    },
    UpdateItemParent {
        id: i32,
        parent: Option<i32>,
    },
    RemoveItem(i32),
    SetSelection(Option<i32>),
    ExpandAll,
    CollapseAll,
    ExpandToDepth(u32),
    RestoreState(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tree {
    pub columns: Vec<TreeColumn>,
    pub items: BTreeMap<i32, TreeItem>,
    pub roots: Vec<i32>,
    pub selection: Option<i32>,
    pub sort: Option<SortKey>,
    pub sortable: bool,
    pub show_header: bool,
    pub onselectionchange: Option<String>,
    next_auto: i32,
}

impl Tree {
    pub fn parse(el: &Element) -> Result<Self, ParseErrors> {
        let mut errors = ParseErrors::default();
        let mut tree = Tree {
            columns: Vec::new(),
            items: BTreeMap::new(),
            roots: Vec::new(),
            selection: None,
            sort: None,
            sortable: el.bool_or("sortable", false),
            show_header: el.bool_or("show-header", true),
            onselectionchange: el.handler("onselectionchange"),
            next_auto: -1,
        };
        for child in &el.children {
            match child.tag.as_str() {
                "header" => {
                    tree.columns = child
                        .children_named("item")
                        .map(|c| TreeColumn {
                            header: c.text.clone(),
                            width: DEFAULT_COLUMN_WIDTH,
                        })
                        .collect();
                }
                "row" => tree.parse_row(child, None, &mut errors),
                other => errors.push(UiError::UnexpectedChild {
                    parent: "tree",
                    found: other.to_string(),
                }),
            }
        }
        let width = tree.items.values().map(|i| i.text.len()).max().unwrap_or(0);
        tree.resize_columns(width.max(tree.columns.len()));
        errors.into_result(tree)
    }

    fn parse_row(&mut self, el: &Element, parent: Option<i32>, errors: &mut ParseErrors) {
        let id = match el.try_int("id") {
            Ok(Some(id)) => id,
            Ok(None) => self.auto_id(),
            Err(e) => {
                log::debug!("tree row: {e}; using an automatic id");
                self.auto_id()
            }
        };
        let text = el.children_named("item").map(|c| c.text.clone()).collect();
        if let Err(e) = self.add(id, parent, text, el.bool_or("expanded", false)) {
            errors.push(e);
            return;
        }
        for child in &el.children {
            match child.tag.as_str() {
                "item" => {}
                "row" => self.parse_row(child, Some(id), errors),
                other => errors.push(UiError::UnexpectedChild {
                    parent: "row",
                    found: other.to_string(),
                }),
            }
        }
    }

    fn auto_id(&mut self) -> i32 {
        while self.items.contains_key(&self.next_auto) {
            self.next_auto -= 1;
        }
        let id = self.next_auto;
        self.next_auto -= 1;
        id
    }

    fn resize_columns(&mut self, count: usize) {
        self.columns.resize_with(count, || TreeColumn {
            header: String::new(),
            width: DEFAULT_COLUMN_WIDTH,
        });
    }

    fn siblings_mut(&mut self, parent: Option<i32>) -> &mut Vec<i32> {
        match parent.and_then(|p| self.items.get_mut(&p)) {
            Some(p) => &mut p.children,
            None => &mut self.roots,
        }
    }

    fn add(
        &mut self,
        id: i32,
        parent: Option<i32>,
        text: Vec<String>,
        expanded: bool,
    ) -> Result<(), UiError> {
        if self.items.contains_key(&id) {
            return Err(UiError::InvalidArgument(format!("duplicate tree item id {id}")));
        }
        if let Some(p) = parent
            && !self.items.contains_key(&p)
        {
            return Err(UiError::InvalidArgument(format!("no tree item with id {p}")));
        }
        self.items.insert(
            id,
            TreeItem {
                id,
                parent,
                text,
                expanded,
                children: Vec::new(),
            },
        );
        self.siblings_mut(parent).push(id);
        Ok(())
    }

    fn item_mut(&mut self, id: i32) -> Result<&mut TreeItem, UiError> {
        self.items
            .get_mut(&id)
            .ok_or_else(|| UiError::InvalidArgument(format!("no tree item with id {id}")))
    }

    pub fn depth(&self, id: i32) -> Option<u32> {
        let mut depth = 0;
        let mut cur = self.items.get(&id)?.parent;
        while let Some(p) = cur {
            depth += 1;
            cur = self.items.get(&p)?.parent;
        }
        Some(depth)
    }

    fn is_descendant(&self, id: i32, ancestor: i32) -> bool {
        let mut cur = Some(id);
        while let Some(c) = cur {
            if c == ancestor {
                return true;
            }
            cur = self.items.get(&c).and_then(|i| i.parent);
        }
        false
    }

    fn reparent(&mut self, id: i32, parent: Option<i32>) -> Result<(), UiError> {
        if let Some(p) = parent {
            if !self.items.contains_key(&p) {
                return Err(UiError::InvalidArgument(format!("no tree item with id {p}")));
            }
            if self.is_descendant(p, id) {
                return Err(UiError::InvalidArgument(format!(
                    "tree item {id} cannot become a child of its descendant {p}"
                )));
            }
        }
        let old = self.item_mut(id)?.parent;
        self.siblings_mut(old).retain(|c| *c != id);
        self.siblings_mut(parent).push(id);
        self.item_mut(id)?.parent = parent;
        Ok(())
    }

    fn remove(&mut self, id: i32) -> Result<(), UiError> {
        let parent = self.item_mut(id)?.parent;
        self.siblings_mut(parent).retain(|c| *c != id);
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(item) = self.items.remove(&next) {
                pending.extend(item.children);
            }
        }
        if self.selection.is_some_and(|s| !self.items.contains_key(&s)) {
            self.selection = None;
        }
        Ok(())
    }

    fn set_selection(&mut self, selection: Option<i32>) -> Result<(), UiError> {
        if let Some(id) = selection {
            self.item_mut(id)?;
        }
        self.selection = selection;
        Ok(())
    }

    pub fn save_state(&self) -> Result<String, UiError> {
        ViewState {
            version: 0,
            column_widths: self.columns.iter().map(|c| c.width).collect(),
            sort: self.sort,
            selection: self.selection.map(Selection::Item),
        }
        .to_blob()
    }

    pub fn restore_state(&mut self, blob: &str) -> Result<(), UiError> {
        let state = ViewState::from_blob(blob)?;
        for (column, width) in self.columns.iter_mut().zip(&state.column_widths) {
            column.width = (*width).max(0);
        }
        self.sort = state.sort.filter(|s| s.column < self.columns.len());
        self.selection = match state.selection {
            Some(Selection::Item(id)) if self.items.contains_key(&id) => Some(id),
            _ => None,
        };
        Ok(())
    }

    pub fn run(&mut self, op: &TreeOp) -> Result<(), UiError> {
        match op {
            TreeOp::Clear => {
                self.items.clear();
                self.roots.clear();
                self.selection = None;
            }
            TreeOp::SetColumnCount(count) => self.resize_columns(*count),
            TreeOp::SetColumnHeaderText { column, text } => {
                self.columns
                    .get_mut(*column)
                    .ok_or_else(|| out_of_range("column", column))?
                    .header = text.clone();
            }
            TreeOp::SetColumnWidth { column, width } => {
                self.columns
                    .get_mut(*column)
                    .ok_or_else(|| out_of_range("column", column))?
                    .width = (*width).max(0);
            }
            TreeOp::AddItem {
                id,
                parent,
                text,
                expanded,
            } => self.add(*id, *parent, text.clone(), *expanded)?,
            TreeOp::UpdateItemText { id, text } => self.item_mut(*id)?.text = text.clone(),
            TreeOp::UpdateItemParent { id, parent } => self.reparent(*id, *parent)?,
            TreeOp::RemoveItem(id) => self.remove(*id)?,
            TreeOp::SetSelection(selection) => self.set_selection(*selection)?,
            TreeOp::ExpandAll => self.items.values_mut().for_each(|i| i.expanded = true),
            TreeOp::CollapseAll => self.items.values_mut().for_each(|i| i.expanded = false),
            TreeOp::ExpandToDepth(depth) => {
                let depths: Vec<(i32, u32)> = self
                    .items
                    .keys()
                    .filter_map(|id| Some((*id, self.depth(*id)?)))
                    .collect();
                for (id, d) in depths {
                    if let Some(item) = self.items.get_mut(&id) {
                        item.expanded = d <= *depth;
                    }
                }
            }
            TreeOp::RestoreState(blob) => self.restore_state(blob)?,
        }
        Ok(())
    }
}

impl Behavior for Tree {
    fn apply(&mut self, mutation: &Mutation) -> Option<Result<(), UiError>> {
        match mutation {
            Mutation::Tree(op) => Some(self.run(op)),
            _ => None,
        }
    }

    fn input(&mut self, input: UserInput) -> Option<Emit> {
        match input {
            UserInput::TreeItemSelected(item) => {
                self.set_selection(item).ok()?;
                Some(Emit::new(
                    Event::TreeSelectionChanged { item },
                    &self.onselectionchange,
                ))
            }
            UserInput::SortChanged { column, order } => {
                if column < self.columns.len() {
                    self.sort = Some(SortKey { column, order });
                }
                None
            }
            UserInput::ColumnResized { column, width } => {
                if let Some(c) = self.columns.get_mut(column) {
                    c.width = width.max(0);
                }
                None
            }
            _ => None,
        }
    }

    fn query(&self, query: &Query) -> Option<Result<Value, UiError>> {
        match query {
            Query::TreeSelection => value(self.selection.map_or(Value::None, Value::Int)),
            Query::ColumnCount => value(Value::Int(self.columns.len() as i32)),
            Query::SaveState => Some(self.save_state().map(Value::Text)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::table::SortOrder;

    fn row(id: Option<&str>, text: &str) -> Element {
        let el = Element::new("row").with_child(Element::new("item").with_text(text));
        match id {
            Some(id) => el.with_attr("id", id),
            None => el,
        }
    }

    fn sample() -> Tree {
        let el = Element::new("tree")
            .with_child(
                Element::new("header").with_child(Element::new("item").with_text("Object")),
            )
            .with_child(
                row(Some("1"), "robot")
                    .with_child(row(Some("2"), "arm").with_child(row(Some("3"), "gripper")))
                    .with_child(row(None, "base")),
            )
            .with_child(row(Some("10"), "floor"));
        Tree::parse(&el).unwrap()
    }

    #[test]
    fn test_nested_rows() {
        let t = sample();
        assert_eq!(t.roots, vec![1, 10]);
        assert_eq!(t.items[&1].children, vec![2, -1]);
        assert_eq!(t.depth(3), Some(2));
        assert_eq!(t.columns.len(), 1);
    }

    #[test]
    fn test_duplicate_item_id_rejected() {
        let el = Element::new("tree")
            .with_child(row(Some("4"), "a"))
            .with_child(row(Some("4"), "b"));
        let err = Tree::parse(&el).unwrap_err();
        assert!(err.contains("duplicate tree item id 4"));
    }

    #[test]
    fn test_reparent_rejects_cycle() {
        let mut t = sample();
        assert!(t
            .run(&TreeOp::UpdateItemParent {
                id: 1,
                parent: Some(3)
            })
            .is_err());
        t.run(&TreeOp::UpdateItemParent { id: 3, parent: None })
            .unwrap();
        assert_eq!(t.roots, vec![1, 10, 3]);
        assert!(t.items[&2].children.is_empty());
    }

    #[test]
    fn test_remove_is_recursive_and_clears_selection() {
        let mut t = sample();
        t.run(&TreeOp::SetSelection(Some(3))).unwrap();
        t.run(&TreeOp::RemoveItem(2)).unwrap();
        assert!(!t.items.contains_key(&3));
        assert_eq!(t.selection, None);
        assert_eq!(t.items[&1].children, vec![-1]);
    }

    #[test]
    fn test_expand_to_depth() {
        let mut t = sample();
        t.run(&TreeOp::ExpandToDepth(0)).unwrap();
        assert!(t.items[&1].expanded);
        assert!(!t.items[&2].expanded);
    }

    #[test]
    fn test_state_restores_selection() {
        let mut t = sample();
        t.run(&TreeOp::SetColumnWidth {
            column: 0,
            width: 250,
        })
        .unwrap();
        t.run(&TreeOp::SetSelection(Some(2))).unwrap();
        t.input(UserInput::SortChanged {
            column: 0,
            order: SortOrder::Descending,
        });
        let blob = t.save_state().unwrap();
        let mut fresh = sample();
        assert_eq!(fresh.sort, None);
        fresh.restore_state(&blob).unwrap();
        assert_eq!(fresh.selection, Some(2));
        assert_eq!(fresh.columns[0].width, 250);
        assert_eq!(
            fresh.sort,
            Some(SortKey {
                column: 0,
                order: SortOrder::Descending
            })
        );
    }

    #[test]
    fn test_malformed_row_id_gets_auto_id() {
        let el = Element::new("tree")
            .with_child(row(Some("abc"), "loose"))
            .with_child(row(Some("7"), "kept"));
        let t = Tree::parse(&el).unwrap();
        assert_eq!(t.roots, vec![-1, 7]);
        assert_eq!(t.items[&-1].text, vec!["loose".to_string()]);
    }
}
