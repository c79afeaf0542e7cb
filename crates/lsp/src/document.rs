//! Document state management for open files in the editor.

use std::collections::HashMap;

use cddl_core::Rule;

/// Tracks which documents are currently open in the editor.
pub struct DocumentState {
    documents: HashMap<String, DocumentInfo>,
}

/// Information about a single open document.
pub struct DocumentInfo {
    /// Editor-reported version number.
    pub version: i32,
    /// Latest content from the editor.
    pub content: String,
    /// Rules from the last clean parse, if any.
    pub rules: Option<RuleCache>,
}

/// Parsed rules tagged with the document version they came from. The
/// cache survives edits that break the parse, so `version` may lag
/// behind `DocumentInfo::version`.
pub struct RuleCache {
    pub version: i32,
    pub rules: Vec<Rule>,
}

impl Default for DocumentState {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentState {
    pub fn new() -> Self {
        Self {
            documents: HashMap::new(),
        }
    }

    /// Track a newly opened document.
    pub fn open(&mut self, uri: &str, version: i32, content: String) {
        self.documents.insert(
            uri.to_owned(),
            DocumentInfo {
                version,
                content,
                rules: None,
            },
        );
    }

    /// Update content for an already-open document. The rule cache is
    /// left in place until the next clean parse replaces it.
    pub fn change(&mut self, uri: &str, version: i32, content: String) {
        if let Some(doc) = self.documents.get_mut(uri) {
            doc.version = version;
            doc.content = content;
        }
    }

    /// Remove a closed document from tracking.
    pub fn close(&mut self, uri: &str) {
        self.documents.remove(uri);
    }

    /// Get information about an open document.
    pub fn get(&self, uri: &str) -> Option<&DocumentInfo> {
        self.documents.get(uri)
    }

    /// Store freshly parsed rules for a document.
    pub fn cache_rules(&mut self, uri: &str, version: i32, rules: Vec<Rule>) {
        if let Some(doc) = self.documents.get_mut(uri) {
            doc.rules = Some(RuleCache { version, rules });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_survives_a_broken_edit() {
        let mut state = DocumentState::new();
        state.open("file:///a.cddl", 1, "a = tstr".to_string());
        let rules = cddl_core::parse("a = tstr").expect("parses");
        state.cache_rules("file:///a.cddl", 1, rules);

        state.change("file:///a.cddl", 2, "a = ".to_string());

        let doc = state.get("file:///a.cddl").expect("still open");
        assert_eq!(doc.version, 2);
        let cache = doc.rules.as_ref().expect("cache kept");
        assert_eq!(cache.version, 1);
        assert_eq!(cache.rules.len(), 1);
    }

    #[test]
    fn close_forgets_the_document() {
        let mut state = DocumentState::new();
        state.open("file:///a.cddl", 1, String::new());
        state.close("file:///a.cddl");
        assert!(state.get("file:///a.cddl").is_none());
    }
}
