//=========================================================================
// Deferred
//=========================================================================
//
// Explicitly resolved, single-threaded future.
//
// Returned by scene stack operations, transitions and camera focus so
// callers can await completion. Resolution happens from the frame loop;
// awaiting tasks are woken on the same thread.
//
//=========================================================================

use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

//=== Deferred ============================================================

struct DeferredState<T> {
    value: Option<T>,
    wakers: Vec<Waker>,
}

/// A value that becomes available exactly once.
///
/// Clones observe the same resolution.
pub struct Deferred<T> {
    state: Rc<RefCell<DeferredState<T>>>,
}

impl<T> Deferred<T> {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(DeferredState {
                value: None,
                wakers: Vec::new(),
            })),
        }
    }

    /// An already completed deferred value.
    pub fn resolved(value: T) -> Self {
        let deferred = Self::new();
        deferred.resolve(value);
        deferred
    }

    /// Completes the value and wakes every awaiting task.
    ///
    /// Returns `false` (and drops `value`) if already resolved.
    pub fn resolve(&self, value: T) -> bool {
        let wakers = {
            let mut state = self.state.borrow_mut();
            if state.value.is_some() {
                return false;
            }
            state.value = Some(value);
            std::mem::take(&mut state.wakers)
        };

        for waker in wakers {
            waker.wake();
        }
        true
    }

    pub fn is_resolved(&self) -> bool {
        self.state.borrow().value.is_some()
    }

    /// `true` if both handles share the same state.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl<T: Clone> Deferred<T> {
    /// The resolved value, if any.
    pub fn value(&self) -> Option<T> {
        self.state.borrow().value.clone()
    }
}

//--- Trait Implementations -----------------------------------------------

impl<T> Clone for Deferred<T> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<T> Default for Deferred<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

impl<T: Clone> Future for Deferred<T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        let mut state = self.state.borrow_mut();
        if let Some(value) = &state.value {
            return Poll::Ready(value.clone());
        }
        if !state.wakers.iter().any(|w| w.will_wake(cx.waker())) {
            state.wakers.push(cx.waker().clone());
        }
        Poll::Pending
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;

    #[test]
    fn pending_until_resolved() {
        let deferred = Deferred::<u8>::new();
        assert!(deferred.clone().now_or_never().is_none());

        assert!(deferred.resolve(3));
        assert_eq!(deferred.clone().now_or_never(), Some(3));
    }

    #[test]
    fn second_resolve_is_ignored() {
        let deferred = Deferred::new();
        assert!(deferred.resolve("first"));
        assert!(!deferred.resolve("second"));
        assert_eq!(deferred.value(), Some("first"));
    }

    #[test]
    fn clones_share_resolution() {
        let deferred = Deferred::new();
        let observer = deferred.clone();

        deferred.resolve(());

        assert!(observer.is_resolved());
        assert!(observer.ptr_eq(&deferred));
    }

    #[test]
    fn resolved_constructor_is_ready() {
        let deferred = Deferred::resolved(true);
        assert_eq!(deferred.now_or_never(), Some(true));
    }
}
