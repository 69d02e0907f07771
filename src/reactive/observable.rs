//! Observable - single-value reactive cell with change notification.
//!
//! # Example
//!
//! ```ignore
//! use spark_retained::reactive::Observable;
//!
//! let count = Observable::new(0);
//! let sub = count.subscribe(|v| println!("count = {v}"));
//!
//! count.set(1); // prints
//! count.set(1); // equal value, no notification
//!
//! sub.unsubscribe();
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use super::subscription::{Listeners, Subscription};

/// Equality used to decide whether a `set` is a change.
pub type Equality<T> = Rc<dyn Fn(&T, &T) -> bool>;

struct ObservableInner<T> {
    value: RefCell<T>,
    equality: Equality<T>,
    subscribers: Rc<Listeners<dyn Fn(&T)>>,
    /// One-time marker: set once a store subscription feeds this cell.
    store_bound: Cell<bool>,
}

/// Reactive value cell. Clones share the same cell.
pub struct Observable<T> {
    inner: Rc<ObservableInner<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + 'static> Observable<T> {
    /// Cell compared with `PartialEq`.
    pub fn new(value: T) -> Self
    where
        T: PartialEq,
    {
        Self::with_equality(value, |a: &T, b: &T| a == b)
    }

    /// Cell compared with a caller-supplied equality.
    pub fn with_equality(value: T, equality: impl Fn(&T, &T) -> bool + 'static) -> Self {
        Self::with_shared_equality(value, Rc::new(equality))
    }

    pub(crate) fn with_shared_equality(value: T, equality: Equality<T>) -> Self {
        Self {
            inner: Rc::new(ObservableInner {
                value: RefCell::new(value),
                equality,
                subscribers: Listeners::new(),
                store_bound: Cell::new(false),
            }),
        }
    }

    /// Current value (cloned). No side effects.
    pub fn value(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Borrow the current value without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Store `value` and notify subscribers, unless it equals the current value.
    ///
    /// Returns whether the value changed.
    pub fn set(&self, value: T) -> bool {
        let unchanged = {
            let current = self.inner.value.borrow();
            (self.inner.equality)(&value, &current)
        };
        if unchanged {
            return false;
        }

        *self.inner.value.borrow_mut() = value.clone();

        let subscribers = self.inner.subscribers.snapshot();
        tracing::trace!(subscribers = subscribers.len(), "observable changed");
        for subscriber in subscribers {
            subscriber(&value);
        }
        true
    }

    /// Append a subscriber called with each new value.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let callback: Rc<dyn Fn(&T)> = Rc::new(callback);
        self.inner.subscribers.add(callback)
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.len()
    }

    /// Whether two handles refer to the same cell.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Set the store-bound marker. Returns true only the first time.
    pub(crate) fn mark_store_bound(&self) -> bool {
        !self.inner.store_bound.replace(true)
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &*self.inner.value.borrow())
            .field("subscribers", &self.inner.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn recorder<T: Clone + 'static>(obs: &Observable<T>) -> (Rc<RefCell<Vec<T>>>, Subscription) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let sub = obs.subscribe(move |v: &T| seen_clone.borrow_mut().push(v.clone()));
        (seen, sub)
    }

    #[test]
    fn test_set_equal_is_noop() {
        let obs = Observable::new(1);
        let (seen, _sub) = recorder(&obs);

        assert!(!obs.set(1));
        assert!(obs.set(2));
        assert!(!obs.set(2));

        assert_eq!(*seen.borrow(), vec![2]);
        assert_eq!(obs.value(), 2);
    }

    #[test]
    fn test_notification_order_is_subscription_order() {
        let obs = Observable::new(0);
        let order = Rc::new(RefCell::new(Vec::new()));

        let mut subs = Vec::new();
        for tag in ["a", "b", "c"] {
            let order = order.clone();
            subs.push(obs.subscribe(move |_| order.borrow_mut().push(tag)));
        }

        obs.set(1);
        assert_eq!(*order.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_custom_equality() {
        let obs = Observable::with_equality("Hello".to_string(), |a: &String, b: &String| {
            a.eq_ignore_ascii_case(b)
        });
        let (seen, _sub) = recorder(&obs);

        obs.set("HELLO".into());
        obs.set("world".into());

        assert_eq!(*seen.borrow(), vec!["world".to_string()]);
    }

    #[test]
    fn test_subscribe_during_notification_waits_for_next_round() {
        let obs = Observable::new(0);
        let late_calls = Rc::new(Cell::new(0));
        let late_subs = Rc::new(RefCell::new(Vec::new()));

        let obs_clone = obs.clone();
        let late_calls_clone = late_calls.clone();
        let late_subs_clone = late_subs.clone();
        let _sub = obs.subscribe(move |_| {
            let late_calls = late_calls_clone.clone();
            let sub = obs_clone.subscribe(move |_| late_calls.set(late_calls.get() + 1));
            late_subs_clone.borrow_mut().push(sub);
        });

        obs.set(1);
        assert_eq!(late_calls.get(), 0);

        obs.set(2);
        assert_eq!(late_calls.get(), 1);
    }

    #[test]
    fn test_unsubscribe_during_notification_keeps_snapshot() {
        let obs = Observable::new(0);
        let calls = Rc::new(RefCell::new(Vec::new()));

        let second: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let second_clone = second.clone();
        let calls_first = calls.clone();
        let _first = obs.subscribe(move |_| {
            calls_first.borrow_mut().push("first");
            if let Some(sub) = second_clone.borrow().as_ref() {
                sub.unsubscribe();
            }
        });
        let calls_second = calls.clone();
        *second.borrow_mut() = Some(obs.subscribe(move |_| calls_second.borrow_mut().push("second")));

        obs.set(1);
        assert_eq!(*calls.borrow(), vec!["first", "second"]);

        obs.set(2);
        assert_eq!(*calls.borrow(), vec!["first", "second", "first"]);
        assert_eq!(obs.subscriber_count(), 1);
    }

    #[test]
    fn test_store_bound_marker_is_one_shot() {
        let obs = Observable::new(0);
        assert!(obs.mark_store_bound());
        assert!(!obs.mark_store_bound());
        assert!(!obs.clone().mark_store_bound());
    }

    proptest! {
        #[test]
        fn prop_fires_once_per_distinct_set(values in proptest::collection::vec(0u8..4, 0..64)) {
            let obs = Observable::new(0u8);
            let (seen, _sub) = recorder(&obs);

            let mut expected = Vec::new();
            let mut previous = 0u8;
            for v in values {
                if v != previous {
                    expected.push(v);
                    previous = v;
                }
                obs.set(v);
            }

            prop_assert_eq!(&*seen.borrow(), &expected);
        }
    }
}
