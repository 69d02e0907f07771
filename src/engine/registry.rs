//! Widget Registry - id → handle lookup for one window.
//!
//! Introspection and escape hatch only: a component never finds its
//! children through the registry, and the registry never keeps a handle
//! alive. Entries are written on mount and removed by the destroy observer
//! that mount installs, so the table mirrors the live tree.
//!
//! - `register(id, handle)` - last write for an id wins
//! - `unregister(id, handle)` - removes only if the entry is still `handle`
//! - `get(id)` / `require(id)` - lookups

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::types::Handle;

/// Per-window id → handle table. Clones share the same table.
#[derive(Clone, Default)]
pub struct Registry {
    entries: Rc<RefCell<HashMap<String, Handle>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point `id` at `handle`, returning the handle it replaced.
    pub fn register(&self, id: &str, handle: Handle) -> Option<Handle> {
        self.entries.borrow_mut().insert(id.to_string(), handle)
    }

    /// Remove `id` only while it still resolves to `handle`.
    ///
    /// A newer registration under a reused id is left alone.
    pub fn unregister(&self, id: &str, handle: Handle) -> bool {
        let mut entries = self.entries.borrow_mut();
        match entries.get(id) {
            Some(&current) if current == handle => {
                entries.remove(id);
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, id: &str) -> Option<Handle> {
        self.entries.borrow().get(id).copied()
    }

    /// Like [`Registry::get`], but an unknown id is a [`Error::Lookup`].
    pub fn require(&self, id: &str) -> Result<Handle> {
        self.get(id).ok_or_else(|| Error::Lookup { id: id.to_string() })
    }

    /// Registered ids, sorted.
    pub fn all_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.entries.borrow().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.entries, &other.entries)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.borrow().iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_get() {
        let registry = Registry::new();
        assert_eq!(registry.register("status_label", Handle(3)), None);
        assert_eq!(registry.get("status_label"), Some(Handle(3)));
        assert_eq!(registry.get("missing"), None);
    }

    #[test]
    fn test_last_write_wins() {
        let registry = Registry::new();
        registry.register("task_input", Handle(1));
        assert_eq!(registry.register("task_input", Handle(2)), Some(Handle(1)));
        assert_eq!(registry.get("task_input"), Some(Handle(2)));
    }

    #[test]
    fn test_unregister_guards_newer_entry() {
        let registry = Registry::new();
        registry.register("row", Handle(1));
        registry.register("row", Handle(2));

        // Stale destroy notification for the old handle.
        assert!(!registry.unregister("row", Handle(1)));
        assert_eq!(registry.get("row"), Some(Handle(2)));

        assert!(registry.unregister("row", Handle(2)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_require_unknown_is_lookup_error() {
        let registry = Registry::new();
        let err = registry.require("nope").unwrap_err();
        assert_eq!(err, Error::Lookup { id: "nope".into() });
    }

    #[test]
    fn test_all_ids_sorted() {
        let registry = Registry::new();
        registry.register("b", Handle(1));
        registry.register("a", Handle(2));
        assert_eq!(registry.all_ids(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_clones_share_table() {
        let registry = Registry::new();
        let view = registry.clone();
        registry.register("x", Handle(9));
        assert_eq!(view.get("x"), Some(Handle(9)));
        assert!(view.ptr_eq(&registry));
    }
}
