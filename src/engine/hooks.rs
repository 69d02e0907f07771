//! Hooks - component-local state slots.
//!
//! Each component owns an ordered array of slots, each backed by an
//! [`Observable`]. A build pass resets the slot cursor to 0 and every hook
//! accessor consumes the next slot, so a component must call its hooks in
//! the same order on every build. The first call at an index allocates the
//! slot from the initial value; later calls return the existing cell and
//! ignore the new initial value.
//!
//! `use_named_state` keys a slot by a static name instead of by position,
//! for state that is only read on some builds.
//!
//! # Example
//!
//! ```ignore
//! impl Build for Counter {
//!     fn build(&self, cx: &mut BuildContext<'_>) -> Result<Option<ChildSpec>> {
//!         let (count, set_count) = cx.use_state(0)?;
//!         let total = cx.use_store_selector(|s: &AppState| s.total)?;
//!         // ...
//!     }
//! }
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use super::component::{Component, ComponentRef};
use super::runtime::Runtime;
use crate::error::{Error, Result};
use crate::reactive::{Equality, Observable};
use crate::state::Dispatcher;
use crate::types::{ComponentId, Handle};

// =============================================================================
// Slot storage
// =============================================================================

/// Slot array plus cursor. Owned by `ComponentCore`.
#[derive(Default)]
pub(crate) struct HookSlots {
    slots: Vec<Box<dyn Any>>,
    named: HashMap<&'static str, Box<dyn Any>>,
    cursor: usize,
}

impl HookSlots {
    pub(crate) fn reset_cursor(&mut self) {
        self.cursor = 0;
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.named.clear();
        self.cursor = 0;
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len() + self.named.len()
    }
}

// =============================================================================
// Setter
// =============================================================================

/// Writes a hook slot, then runs the owner's re-render trampoline.
///
/// A no-op once the owner is disposed.
pub struct Setter<T> {
    slot: Observable<T>,
    owner: Weak<dyn Component>,
}

impl<T> Clone for Setter<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
            owner: Weak::clone(&self.owner),
        }
    }
}

impl<T: Clone + 'static> Setter<T> {
    pub fn set(&self, value: T) -> Result<()> {
        let Some(owner) = self.owner.upgrade() else {
            return Ok(());
        };
        if owner.core().is_disposed() {
            return Ok(());
        }
        self.slot.set(value);
        owner.on_state_changed()
    }

    /// Read-modify-write against the current value.
    pub fn update(&self, f: impl FnOnce(&T) -> T) -> Result<()> {
        let next = self.slot.with(f);
        self.set(next)
    }

    pub fn observable(&self) -> &Observable<T> {
        &self.slot
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for Setter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Setter").field("slot", &self.slot).finish()
    }
}

// =============================================================================
// BuildContext
// =============================================================================

/// Handed to build logic; exposes the component's hooks.
///
/// Creating one resets the component's slot cursor.
pub struct BuildContext<'a> {
    component: ComponentRef,
    runtime: &'a Runtime,
    container: Handle,
}

impl<'a> BuildContext<'a> {
    pub(crate) fn new(component: ComponentRef, runtime: &'a Runtime, container: Handle) -> Self {
        component.core().hooks.borrow_mut().reset_cursor();
        Self {
            component,
            runtime,
            container,
        }
    }

    pub fn runtime(&self) -> &'a Runtime {
        self.runtime
    }

    /// Native element this build mounts its children into.
    pub fn container(&self) -> Handle {
        self.container
    }

    pub fn id(&self) -> &ComponentId {
        self.component.core().id()
    }

    /// Next positional slot, seeded from `initial` on first use.
    pub fn use_state<T>(&mut self, initial: T) -> Result<(Observable<T>, Setter<T>)>
    where
        T: Clone + PartialEq + 'static,
    {
        let slot = self.positional_slot(|| Observable::new(initial))?;
        let setter = self.setter(&slot);
        Ok((slot, setter))
    }

    /// [`BuildContext::use_state`] with a custom equality.
    pub fn use_state_with<T>(
        &mut self,
        initial: T,
        equality: impl Fn(&T, &T) -> bool + 'static,
    ) -> Result<(Observable<T>, Setter<T>)>
    where
        T: Clone + 'static,
    {
        let slot = self.positional_slot(|| Observable::with_equality(initial, equality))?;
        let setter = self.setter(&slot);
        Ok((slot, setter))
    }

    /// Slot keyed by name; call order does not matter.
    pub fn use_named_state<T>(&mut self, key: &'static str, initial: T) -> Result<(Observable<T>, Setter<T>)>
    where
        T: Clone + PartialEq + 'static,
    {
        let slot = {
            let mut hooks = self.component.core().hooks.borrow_mut();
            let entry = hooks
                .named
                .entry(key)
                .or_insert_with(|| Box::new(Observable::new(initial)));
            entry.downcast_ref::<Observable<T>>().cloned().ok_or_else(|| {
                Error::validation(format!(
                    "named hook {key:?} of {} holds a different type",
                    self.component.core().id()
                ))
            })?
        };
        let setter = self.setter(&slot);
        Ok((slot, setter))
    }

    /// Dispatch handle for the runtime's store.
    pub fn use_dispatch(&self) -> Result<Dispatcher> {
        self.runtime.dispatcher()
    }

    /// Observable projection of the store, compared with `PartialEq`.
    pub fn use_store_selector<S, T>(&mut self, selector: impl Fn(&S) -> T + 'static) -> Result<Observable<T>>
    where
        S: 'static,
        T: Clone + PartialEq + 'static,
    {
        self.use_store_selector_with(selector, |a: &T, b: &T| a == b)
    }

    /// Observable projection of the store.
    ///
    /// The first build seeds a slot with `selector(state)`. The first time a
    /// given slot is acquired it also subscribes to the store: each
    /// notification recomputes the projection and, when `equality` says it
    /// changed, pushes it through the slot's setter (re-rendering the owner).
    /// The subscription is released when the component is disposed.
    pub fn use_store_selector_with<S, T>(
        &mut self,
        selector: impl Fn(&S) -> T + 'static,
        equality: impl Fn(&T, &T) -> bool + 'static,
    ) -> Result<Observable<T>>
    where
        S: 'static,
        T: Clone + 'static,
    {
        let store = self.runtime.store::<S>()?;
        let seed = selector(&store.get_state());
        let equality: Equality<T> = Rc::new(equality);

        let slot_equality = Rc::clone(&equality);
        let slot = self.positional_slot(move || Observable::with_shared_equality(seed, slot_equality))?;

        if slot.mark_store_bound() {
            let setter = self.setter(&slot);
            let owner = Rc::downgrade(&self.component);
            let source = store.downgrade();
            let watched = slot.clone();

            let subscription = store.subscribe(move || {
                let (Some(owner), Some(store)) = (owner.upgrade(), source.upgrade()) else {
                    return Ok(());
                };
                if owner.core().is_disposed() {
                    return Ok(());
                }
                let next = selector(&store.get_state());
                if watched.with(|current| equality(&next, current)) {
                    return Ok(());
                }
                setter.set(next)
            });
            self.component.core().track_subscription(subscription);
        }

        Ok(slot)
    }

    fn positional_slot<T: Clone + 'static>(&mut self, make: impl FnOnce() -> Observable<T>) -> Result<Observable<T>> {
        let core = self.component.core();
        let mut hooks = core.hooks.borrow_mut();
        let index = hooks.cursor;
        hooks.cursor += 1;

        if index == hooks.slots.len() {
            hooks.slots.push(Box::new(make()));
        }

        hooks.slots[index]
            .downcast_ref::<Observable<T>>()
            .cloned()
            .ok_or_else(|| {
                Error::validation(format!(
                    "hook slot {index} of {} holds a different type; hooks must run in the same order on every build",
                    core.id()
                ))
            })
    }

    fn setter<T>(&self, slot: &Observable<T>) -> Setter<T> {
        Setter {
            slot: slot.clone(),
            owner: Rc::downgrade(&self.component),
        }
    }
}
