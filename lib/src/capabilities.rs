use serde::{Deserialize, Serialize};

/// What a graph allows. Fixed when the graph is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    /// `size()` reports the exact number of stored triples.
    pub size_accurate: bool,
    pub add_allowed: bool,
    /// Every triple may be added, not only some.
    pub add_allowed_checked: bool,
    pub delete_allowed: bool,
    /// Every stored triple may be deleted, not only some.
    pub delete_allowed_checked: bool,
    /// False for layered graphs whose axioms survive `clear`.
    pub can_be_empty: bool,
    pub iterator_remove_allowed: bool,
    /// Literals match by value; otherwise only identical terms match.
    pub handles_literal_typing: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            size_accurate: true,
            add_allowed: true,
            add_allowed_checked: true,
            delete_allowed: true,
            delete_allowed_checked: true,
            can_be_empty: true,
            iterator_remove_allowed: true,
            handles_literal_typing: true,
        }
    }
}

impl Capabilities {
    /// A graph that only answers queries.
    pub fn read_only() -> Self {
        Self {
            add_allowed: false,
            add_allowed_checked: false,
            delete_allowed: false,
            delete_allowed_checked: false,
            iterator_remove_allowed: false,
            ..Self::default()
        }
    }

    pub fn add_allowed(&self, every: bool) -> bool {
        if every {
            self.add_allowed_checked
        } else {
            self.add_allowed
        }
    }

    pub fn delete_allowed(&self, every: bool) -> bool {
        if every {
            self.delete_allowed_checked
        } else {
            self.delete_allowed
        }
    }
}
