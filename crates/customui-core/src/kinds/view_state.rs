//! Persistable table/tree header state.
//!
//! The blob is opaque to the host: whatever `save_state` returned can be fed
//! back through `RestoreState` later, possibly into a fresh widget.

use serde::{Deserialize, Serialize};

use crate::error::UiError;
use crate::kinds::table::SortOrder;

const VERSION: u32 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub column: usize,
    pub order: SortOrder,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
    Cell { row: i32, column: i32 },
    Item(i32),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub column_widths: Vec<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<Selection>,
}

impl ViewState {
    pub fn to_blob(&self) -> Result<String, UiError> {
        let mut state = self.clone();
        state.version = VERSION;
        Ok(serde_json::to_string(&state)?)
    }

    pub fn from_blob(blob: &str) -> Result<Self, UiError> {
        let state: ViewState = serde_json::from_str(blob)?;
        if state.version > VERSION {
            return Err(UiError::State(format!(
                "unsupported version {}",
                state.version
            )));
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_survives_restore() {
        let state = ViewState {
            version: 0,
            column_widths: vec![80, 120],
            sort: Some(SortKey {
                column: 1,
                order: SortOrder::Descending,
            }),
            selection: Some(Selection::Item(7)),
        };
        let blob = state.to_blob().unwrap();
        let back = ViewState::from_blob(&blob).unwrap();
        assert_eq!(back.column_widths, vec![80, 120]);
        assert_eq!(back.sort, state.sort);
        assert_eq!(back.selection, Some(Selection::Item(7)));
    }

    #[test]
    fn test_garbage_blob_rejected() {
        assert!(matches!(
            ViewState::from_blob("not json"),
            Err(UiError::State(_))
        ));
        assert!(matches!(
            ViewState::from_blob(r#"{"version":99}"#),
            Err(UiError::State(_))
        ));
    }
}
