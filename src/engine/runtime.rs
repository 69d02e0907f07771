//! Runtime - the explicit context every component is mounted through.
//!
//! Holds the host toolkit, the runtime configuration, the configured store
//! and one [`Registry`] per top-level window. Nothing here is ambient: a
//! component reaches the store only through the runtime it was mounted with.

use std::any::type_name;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::registry::Registry;
use crate::config::RuntimeConfig;
use crate::error::{Error, Result};
use crate::host::Toolkit;
use crate::state::{AnyStore, Dispatcher, Store};
use crate::types::Handle;

struct RuntimeInner {
    toolkit: Rc<dyn Toolkit>,
    config: RuntimeConfig,
    store: RefCell<Option<Rc<dyn AnyStore>>>,
    registries: RefCell<HashMap<Handle, Registry>>,
    debug_frames: Cell<usize>,
}

/// Shared runtime context. Clones refer to the same runtime.
#[derive(Clone)]
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl Runtime {
    pub fn new(toolkit: Rc<dyn Toolkit>) -> Self {
        Self::with_config(toolkit, RuntimeConfig::default())
    }

    pub fn with_config(toolkit: Rc<dyn Toolkit>, config: RuntimeConfig) -> Self {
        Self {
            inner: Rc::new(RuntimeInner {
                toolkit,
                config,
                store: RefCell::new(None),
                registries: RefCell::new(HashMap::new()),
                debug_frames: Cell::new(0),
            }),
        }
    }

    pub fn toolkit(&self) -> &Rc<dyn Toolkit> {
        &self.inner.toolkit
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.inner.config
    }

    // =========================================================================
    // Store
    // =========================================================================

    /// Install the store components read through `use_store_selector`.
    pub fn configure_store<S: 'static>(&self, store: Store<S>) {
        let previous = self.inner.store.replace(Some(Rc::new(store)));
        if previous.is_some() {
            tracing::debug!(state = type_name::<S>(), "store replaced");
        }
    }

    /// The configured store, typed.
    ///
    /// Fails with [`Error::Configuration`] before `configure_store`, or when
    /// the installed store holds a different state type.
    pub fn store<S: 'static>(&self) -> Result<Store<S>> {
        let slot = self.inner.store.borrow();
        let Some(store) = slot.as_ref() else {
            return Err(Error::configuration("no store installed"));
        };
        store
            .as_any()
            .downcast_ref::<Store<S>>()
            .cloned()
            .ok_or_else(|| {
                Error::configuration(format!(
                    "store holds {}, requested {}",
                    store.type_name(),
                    type_name::<S>()
                ))
            })
    }

    /// Dispatch handle for the configured store, whatever its state type.
    pub fn dispatcher(&self) -> Result<Dispatcher> {
        self.inner
            .store
            .borrow()
            .as_ref()
            .map(|store| Dispatcher::from_erased(Rc::clone(store)))
            .ok_or_else(|| Error::configuration("no store installed"))
    }

    pub fn has_store(&self) -> bool {
        self.inner.store.borrow().is_some()
    }

    // =========================================================================
    // Registries
    // =========================================================================

    /// Create (or return) the registry scoped to a top-level window.
    pub fn attach_registry(&self, window: Handle) -> Registry {
        self.inner
            .registries
            .borrow_mut()
            .entry(window)
            .or_default()
            .clone()
    }

    pub(crate) fn detach_registry(&self, window: Handle) {
        self.inner.registries.borrow_mut().remove(&window);
    }

    /// Registry of the window `handle` lives in, if that window has one.
    pub fn registry_for(&self, handle: Handle) -> Option<Registry> {
        let window = self.inner.toolkit.toplevel(handle)?;
        self.inner.registries.borrow().get(&window).cloned()
    }

    // =========================================================================
    // Debug borders
    // =========================================================================

    /// Next palette colour when debug borders are on.
    pub(crate) fn next_debug_color(&self) -> Option<String> {
        if !self.inner.config.debug_borders {
            return None;
        }
        let n = self.inner.debug_frames.get();
        self.inner.debug_frames.set(n + 1);
        self.inner.config.debug_color(n).map(str::to_string)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("config", &self.inner.config)
            .field("store", &self.has_store())
            .field("windows", &self.inner.registries.borrow().len())
            .finish()
    }
}
