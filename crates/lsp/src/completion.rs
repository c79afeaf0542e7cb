//! Completion provider for prelude names and control operators.
//!
//! The initial list is cheap: labels plus, for control operators, the
//! short detail line. The expensive parts (prelude detail, insert-text
//! rewriting) happen in `completionItem/resolve`. Each item carries its
//! own table/index in `data`, so resolve never depends on which list
//! was computed last -- interleaved requests for different documents
//! resolve correctly.

use lsp_types::{
    CompletionItem, CompletionItemKind, Documentation, MarkupContent, MarkupKind, Position,
};
use serde::{Deserialize, Serialize};

use crate::position::position_to_offset;
use crate::reference::{CONTROL_OPERATORS, STANDARD_PRELUDE};

/// Round-trip payload stored in `CompletionItem::data`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CompletionData {
    pub table: CompletionTable,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompletionTable {
    ControlOperator,
    StandardPrelude,
}

/// Compute the completion list for the given cursor position.
///
/// When the byte immediately before the cursor is a dot the list is the
/// control operators (labels keep the dot, matching what the editor has
/// typed); everywhere else it is the standard prelude.
pub fn compute_completions(text: &str, position: Position) -> Vec<CompletionItem> {
    let after_dot = position_to_offset(text, position)
        .map_or(false, |offset| offset > 0 && text.as_bytes()[offset - 1] == b'.');

    if after_dot {
        CONTROL_OPERATORS
            .iter()
            .enumerate()
            .map(|(index, entry)| CompletionItem {
                label: entry.label.to_string(),
                kind: Some(CompletionItemKind::KEYWORD),
                detail: Some(entry.detail.to_string()),
                documentation: entry.documentation.map(markdown),
                data: item_data(CompletionTable::ControlOperator, index),
                ..Default::default()
            })
            .collect()
    } else {
        STANDARD_PRELUDE
            .iter()
            .enumerate()
            .map(|(index, entry)| CompletionItem {
                label: entry.label.to_string(),
                kind: Some(CompletionItemKind::KEYWORD),
                data: item_data(CompletionTable::StandardPrelude, index),
                ..Default::default()
            })
            .collect()
    }
}

/// Fill in the lazy parts of a completion item.
///
/// Control operators get an insert text with the leading dot stripped,
/// so accepting `.size` after a typed dot does not produce `..size`.
/// Prelude items get their detail line. Items without a recognizable
/// payload are returned unchanged.
pub fn resolve_completion(mut item: CompletionItem) -> CompletionItem {
    let data = match item.data.take() {
        Some(value) => value,
        None => return item,
    };
    let parsed: CompletionData = match serde_json::from_value(data) {
        Ok(parsed) => parsed,
        Err(_) => return item,
    };

    match parsed.table {
        CompletionTable::ControlOperator => {
            if let Some(entry) = CONTROL_OPERATORS.get(parsed.index) {
                item.insert_text = Some(entry.label.chars().skip(1).collect());
            }
        }
        CompletionTable::StandardPrelude => {
            if let Some(entry) = STANDARD_PRELUDE.get(parsed.index) {
                item.detail = Some(entry.detail.to_string());
                if item.documentation.is_none() {
                    item.documentation = entry.documentation.map(markdown);
                }
            }
        }
    }
    item
}

fn item_data(table: CompletionTable, index: usize) -> Option<serde_json::Value> {
    serde_json::to_value(CompletionData { table, index }).ok()
}

fn markdown(value: &str) -> Documentation {
    Documentation::MarkupContent(MarkupContent {
        kind: MarkupKind::Markdown,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_context_offers_control_operators() {
        let items = compute_completions("a = bstr .", Position::new(0, 10));
        assert_eq!(items.len(), CONTROL_OPERATORS.len());
        assert!(items.iter().all(|i| i.label.starts_with('.')));
        assert!(items.iter().all(|i| i.data.is_some()));
    }

    #[test]
    fn general_context_offers_the_prelude() {
        let items = compute_completions("a = ", Position::new(0, 4));
        assert_eq!(items.len(), STANDARD_PRELUDE.len());
        assert!(items.iter().any(|i| i.label == "tstr"));
        assert!(items.iter().all(|i| i.detail.is_none()));
    }

    #[test]
    fn resolving_a_control_item_strips_the_dot_from_insert_text() {
        let items = compute_completions("a = bstr .", Position::new(0, 10));
        let size = items.into_iter().find(|i| i.label == ".size").expect("listed");
        let resolved = resolve_completion(size);
        assert_eq!(resolved.insert_text.as_deref(), Some("size"));
        assert_eq!(resolved.label, ".size");
    }

    #[test]
    fn resolving_a_prelude_item_attaches_its_detail() {
        let items = compute_completions("", Position::new(0, 0));
        let tstr = items.into_iter().find(|i| i.label == "tstr").expect("listed");
        let resolved = resolve_completion(tstr);
        assert_eq!(resolved.detail.as_deref(), Some("tstr = #3"));
    }

    #[test]
    fn resolve_reads_the_item_not_server_state() {
        // Compute a control list, then a prelude list, then resolve an
        // item from the first. The payload travels with the item.
        let control = compute_completions("x = uint .", Position::new(0, 10));
        let _prelude = compute_completions("y = ", Position::new(0, 4));
        let lt = control.into_iter().find(|i| i.label == ".lt").expect("listed");
        let resolved = resolve_completion(lt);
        assert_eq!(resolved.insert_text.as_deref(), Some("lt"));
    }

    #[test]
    fn items_without_data_pass_through() {
        let item = CompletionItem {
            label: "custom".to_string(),
            ..Default::default()
        };
        let resolved = resolve_completion(item);
        assert_eq!(resolved.label, "custom");
        assert!(resolved.insert_text.is_none());
    }
}
