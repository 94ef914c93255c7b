//! Stable callbacks - handles whose identity survives re-renders.
//!
//! Every handler handed to a host (the outer surface, the inner reorder
//! engine) is a [`StableCallback`]. The host keeps the handle it was given
//! once; the owner swaps the body behind it on every reconfiguration, so the
//! host always runs the latest logic without re-subscribing.
//!
//! # Example
//!
//! ```
//! use spark_nestable::StableCallback;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let seen = Rc::new(Cell::new(0));
//! let seen_a = seen.clone();
//! let handle = StableCallback::new(move |v: &i32| seen_a.set(*v));
//!
//! let seen_b = seen.clone();
//! let same = handle.wrap(move |v: &i32| seen_b.set(*v * 10));
//!
//! same.call(&4);
//! assert_eq!(seen.get(), 40);
//! assert!(handle.same_identity(&same));
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Shared body type stored in the slot.
type Body<A> = Rc<dyn Fn(&A)>;

/// A callback handle with stable identity and a replaceable body.
pub struct StableCallback<A: ?Sized + 'static> {
    slot: Rc<RefCell<Body<A>>>,
}

impl<A: ?Sized + 'static> StableCallback<A> {
    /// Create a handle with an initial body.
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(&A) + 'static,
    {
        let body: Body<A> = Rc::new(body);
        Self {
            slot: Rc::new(RefCell::new(body)),
        }
    }

    /// A handle whose body does nothing.
    pub fn noop() -> Self {
        Self::new(|_: &A| {})
    }

    /// Replace the body and return the (unchanged) handle.
    pub fn wrap<F>(&self, body: F) -> Self
    where
        F: Fn(&A) + 'static,
    {
        *self.slot.borrow_mut() = Rc::new(body);
        self.clone()
    }

    /// Invoke the current body.
    ///
    /// The body is cloned out of the slot first, so it may itself call
    /// [`wrap`](Self::wrap) on this handle.
    pub fn call(&self, arg: &A) {
        let body = self.slot.borrow().clone();
        body(arg);
    }

    /// True if both handles refer to the same slot.
    pub fn same_identity(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.slot, &other.slot)
    }
}

impl<A: ?Sized + 'static> Clone for StableCallback<A> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<A: ?Sized + 'static> fmt::Debug for StableCallback<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StableCallback")
            .field("slot", &Rc::as_ptr(&self.slot))
            .finish()
    }
}
