//=========================================================================
// Signal
//=========================================================================
//
// Typed, single-threaded publish/subscribe primitive.
//
// Architecture:
//   connect() ──► slots: Vec<Rc<Slot<T>>> ──► emit() (snapshot, in order)
//                      │
//   0 → 1 slots ───────┴──► init hook ──► teardown stored
//   1 → 0 slots ───────────────────────► teardown runs
//
// Emission is synchronous and depth-first: a handler that emits on another
// signal runs that emission to completion before the outer emission
// continues. Slots removed mid-emission are skipped; slots added
// mid-emission only see later emissions.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

//=== SignalContext =======================================================

static NEXT_CONTEXT: AtomicU64 = AtomicU64::new(1);
static NEXT_SLOT: AtomicU64 = AtomicU64::new(1);

/// Identity token grouping slots by owner.
///
/// A context lets its owner disconnect everything it connected in one call,
/// and lets a signal deliver exclusively to one owner (see
/// [`Signal::emit_to`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignalContext(u64);

impl SignalContext {
    /// Creates a fresh, unique context.
    pub fn new() -> Self {
        Self(NEXT_CONTEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for SignalContext {
    fn default() -> Self {
        Self::new()
    }
}

//=== SlotId ==============================================================

/// Handle returned by `connect`, used to disconnect a single slot.
///
/// Ids are unique across all signals, so a foreign id never matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(u64);

//=== Internal Types ======================================================

type Handler<T> = Rc<dyn Fn(&T)>;
type Teardown = Box<dyn FnOnce()>;
type Init<T> = Rc<dyn Fn(&Signal<T>) -> Teardown>;

struct Slot<T: 'static> {
    id: SlotId,
    context: Option<SignalContext>,
    handler: Handler<T>,
    connected: Cell<bool>,
}

struct SignalInner<T: 'static> {
    slots: RefCell<Vec<Rc<Slot<T>>>>,
    init: Option<Init<T>>,
    teardown: RefCell<Option<Teardown>>,
}

//=== Signal ==============================================================

/// Multi-subscriber event dispatcher carrying payloads of type `T`.
///
/// `Signal` is a cheap handle: clones share the same slot list.
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use lantern_engine::core::signal::Signal;
///
/// let signal = Signal::<u32>::new();
/// let seen = Rc::new(Cell::new(0));
/// let sink = Rc::clone(&seen);
/// let slot = signal.connect(move |v| sink.set(*v));
///
/// signal.emit(&7);
/// assert_eq!(seen.get(), 7);
///
/// signal.disconnect(slot);
/// signal.emit(&9);
/// assert_eq!(seen.get(), 7);
/// ```
pub struct Signal<T: 'static> {
    inner: Rc<SignalInner<T>>,
}

impl<T: 'static> Signal<T> {
    //--- Construction -----------------------------------------------------

    /// Creates a signal without lazy wiring.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Creates a signal whose `init` hook runs when the first slot connects.
    ///
    /// The closure returned by `init` runs when the last slot disconnects.
    /// The cycle can repeat any number of times.
    pub fn with_init<F>(init: F) -> Self
    where
        F: Fn(&Signal<T>) -> Box<dyn FnOnce()> + 'static,
    {
        Self::build(Some(Rc::new(init)))
    }

    fn build(init: Option<Init<T>>) -> Self {
        Self {
            inner: Rc::new(SignalInner {
                slots: RefCell::new(Vec::new()),
                init,
                teardown: RefCell::new(None),
            }),
        }
    }

    //--- Connection -------------------------------------------------------

    /// Connects a handler without a context.
    pub fn connect<F>(&self, handler: F) -> SlotId
    where
        F: Fn(&T) + 'static,
    {
        self.add_slot(None, Rc::new(handler))
    }

    /// Connects a handler owned by `context`.
    pub fn connect_with<F>(&self, context: &SignalContext, handler: F) -> SlotId
    where
        F: Fn(&T) + 'static,
    {
        self.add_slot(Some(context.clone()), Rc::new(handler))
    }

    /// Removes one slot. Unknown ids are ignored.
    pub fn disconnect(&self, slot: SlotId) {
        let removed = {
            let mut slots = self.inner.slots.borrow_mut();
            match slots.iter().position(|s| s.id == slot) {
                Some(pos) => {
                    slots.remove(pos).connected.set(false);
                    true
                }
                None => false,
            }
        };

        if removed && self.is_empty() {
            self.run_teardown();
        }
    }

    /// Removes every slot connected with `context`.
    pub fn disconnect_context(&self, context: &SignalContext) {
        let removed = {
            let mut slots = self.inner.slots.borrow_mut();
            let before = slots.len();
            slots.retain(|s| {
                let keep = s.context.as_ref() != Some(context);
                if !keep {
                    s.connected.set(false);
                }
                keep
            });
            before - slots.len()
        };

        if removed > 0 && self.is_empty() {
            self.run_teardown();
        }
    }

    /// Drops every slot of this signal.
    ///
    /// Runs this signal's own teardown if it was wired. Signals derived via
    /// [`filter`](Self::filter) keep their own subscribers; their owners
    /// must disconnect them.
    pub fn clear(&self) {
        let slots = std::mem::take(&mut *self.inner.slots.borrow_mut());
        for slot in &slots {
            slot.connected.set(false);
        }
        if !slots.is_empty() {
            self.run_teardown();
        }
    }

    //--- Emission ---------------------------------------------------------

    /// Invokes every connected slot, in connection order.
    pub fn emit(&self, value: &T) {
        let slots = self.snapshot();
        for slot in slots {
            if slot.connected.get() {
                (slot.handler)(value);
            }
        }
    }

    /// Invokes only the slots connected with `context`.
    pub fn emit_to(&self, context: &SignalContext, value: &T) {
        let slots = self.snapshot();
        for slot in slots {
            if slot.connected.get() && slot.context.as_ref() == Some(context) {
                (slot.handler)(value);
            }
        }
    }

    //--- Derivation -------------------------------------------------------

    /// Returns a signal that re-emits only values matching `predicate`.
    ///
    /// The derived signal subscribes to `self` only while it has slots of
    /// its own. Filters compose: `s.filter(a).filter(b)` emits values
    /// satisfying both.
    pub fn filter<P>(&self, predicate: P) -> Signal<T>
    where
        P: Fn(&T) -> bool + 'static,
    {
        let parent = self.clone();
        let predicate = Rc::new(predicate);

        Signal::with_init(move |derived: &Signal<T>| {
            let weak = derived.downgrade();
            let predicate = Rc::clone(&predicate);
            let slot = parent.connect(move |value: &T| {
                if predicate(value) {
                    if let Some(derived) = weak.upgrade() {
                        derived.emit(value);
                    }
                }
            });

            let parent = parent.clone();
            Box::new(move || parent.disconnect(slot))
        })
    }

    //--- Queries ----------------------------------------------------------

    /// Number of connected slots.
    pub fn slot_count(&self) -> usize {
        self.inner.slots.borrow().len()
    }

    /// `true` when nothing is connected.
    pub fn is_empty(&self) -> bool {
        self.inner.slots.borrow().is_empty()
    }

    //--- Internal Helpers -------------------------------------------------

    fn add_slot(&self, context: Option<SignalContext>, handler: Handler<T>) -> SlotId {
        let id = SlotId(NEXT_SLOT.fetch_add(1, Ordering::Relaxed));

        let was_empty = {
            let mut slots = self.inner.slots.borrow_mut();
            let was_empty = slots.is_empty();
            slots.push(Rc::new(Slot {
                id,
                context,
                handler,
                connected: Cell::new(true),
            }));
            was_empty
        };

        if was_empty {
            self.run_init();
        }
        id
    }

    fn snapshot(&self) -> Vec<Rc<Slot<T>>> {
        self.inner.slots.borrow().clone()
    }

    fn run_init(&self) {
        if let Some(init) = self.inner.init.clone() {
            let teardown = init(self);
            *self.inner.teardown.borrow_mut() = Some(teardown);
        }
    }

    fn run_teardown(&self) {
        let teardown = self.inner.teardown.borrow_mut().take();
        if let Some(teardown) = teardown {
            teardown();
        }
    }

    fn downgrade(&self) -> WeakSignal<T> {
        WeakSignal {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

//--- Trait Implementations -----------------------------------------------

impl<T: 'static> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("slots", &self.slot_count())
            .field("lazy", &self.inner.init.is_some())
            .finish()
    }
}

//=== WeakSignal ==========================================================

struct WeakSignal<T: 'static> {
    inner: Weak<SignalInner<T>>,
}

impl<T: 'static> WeakSignal<T> {
    fn upgrade(&self) -> Option<Signal<T>> {
        self.inner.upgrade().map(|inner| Signal { inner })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //--- Test Helpers -----------------------------------------------------

    fn recorder<T: Clone + 'static>() -> (Rc<RefCell<Vec<T>>>, impl Fn(&T) + 'static) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        (log, move |v: &T| sink.borrow_mut().push(v.clone()))
    }

    //=====================================================================
    // Connect / Emit / Disconnect
    //=====================================================================

    #[test]
    fn connect_then_emit_invokes_once() {
        let signal = Signal::<i32>::new();
        let (log, handler) = recorder();
        signal.connect(handler);

        signal.emit(&5);

        assert_eq!(*log.borrow(), vec![5]);
    }

    #[test]
    fn disconnect_then_emit_invokes_nothing() {
        let signal = Signal::<i32>::new();
        let (log, handler) = recorder();
        let slot = signal.connect(handler);

        signal.disconnect(slot);
        signal.emit(&5);

        assert!(log.borrow().is_empty());
        assert!(signal.is_empty());
    }

    #[test]
    fn emit_without_slots_is_noop() {
        let signal = Signal::<i32>::new();
        signal.emit(&1);
        assert_eq!(signal.slot_count(), 0);
    }

    #[test]
    fn disconnect_unknown_slot_is_noop() {
        let signal = Signal::<i32>::new();
        let other = Signal::<i32>::new();
        let (log, handler) = recorder();
        signal.connect(handler);
        let foreign = other.connect(|_| {});

        signal.disconnect(foreign);
        signal.disconnect(foreign);
        signal.emit(&3);

        assert_eq!(*log.borrow(), vec![3]);
        assert_eq!(signal.slot_count(), 1);
        assert_eq!(other.slot_count(), 1);
    }

    #[test]
    fn slot_ids_differ_across_signals() {
        let first = Signal::<i32>::new();
        let second = Signal::<i32>::new();

        let a = first.connect(|_| {});
        let b = second.connect(|_| {});

        assert_ne!(a, b);
        first.disconnect(b);
        assert_eq!(first.slot_count(), 1);
    }

    #[test]
    fn slots_run_in_connection_order() {
        let signal = Signal::<()>::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for name in ["a", "b", "c"] {
            let order = Rc::clone(&order);
            signal.connect(move |_| order.borrow_mut().push(name));
        }

        signal.emit(&());

        assert_eq!(*order.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn nested_emission_runs_depth_first() {
        let outer = Signal::<()>::new();
        let inner = Signal::<()>::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        {
            let order = Rc::clone(&order);
            let inner = inner.clone();
            outer.connect(move |_| {
                order.borrow_mut().push("outer-1");
                inner.emit(&());
            });
        }
        {
            let order = Rc::clone(&order);
            inner.connect(move |_| order.borrow_mut().push("inner"));
        }
        {
            let order = Rc::clone(&order);
            outer.connect(move |_| order.borrow_mut().push("outer-2"));
        }

        outer.emit(&());

        assert_eq!(*order.borrow(), vec!["outer-1", "inner", "outer-2"]);
    }

    #[test]
    fn slot_disconnected_during_emit_is_skipped() {
        let signal = Signal::<()>::new();
        let hits = Rc::new(Cell::new(0));
        let victim = Rc::new(Cell::new(None));

        {
            let signal = signal.clone();
            let victim = Rc::clone(&victim);
            signal.clone().connect(move |_| {
                if let Some(slot) = victim.get() {
                    signal.disconnect(slot);
                }
            });
        }
        {
            let hits = Rc::clone(&hits);
            victim.set(Some(signal.connect(move |_| hits.set(hits.get() + 1))));
        }

        signal.emit(&());

        assert_eq!(hits.get(), 0);
        assert_eq!(signal.slot_count(), 1);
    }

    //=====================================================================
    // Contexts
    //=====================================================================

    #[test]
    fn disconnect_context_removes_all_its_slots() {
        let signal = Signal::<i32>::new();
        let owner = SignalContext::new();
        let (log, handler) = recorder();
        signal.connect_with(&owner, |_| panic!("should be disconnected"));
        signal.connect_with(&owner, |_| panic!("should be disconnected"));
        signal.connect(handler);

        signal.disconnect_context(&owner);
        signal.emit(&1);

        assert_eq!(signal.slot_count(), 1);
        assert_eq!(*log.borrow(), vec![1]);
    }

    #[test]
    fn emit_to_reaches_only_the_context() {
        let signal = Signal::<i32>::new();
        let owner = SignalContext::new();
        let (owned, owned_handler) = recorder();
        let (other, other_handler) = recorder();
        signal.connect_with(&owner, owned_handler);
        signal.connect(other_handler);

        signal.emit_to(&owner, &4);

        assert_eq!(*owned.borrow(), vec![4]);
        assert!(other.borrow().is_empty());
    }

    #[test]
    fn contexts_are_unique() {
        assert_ne!(SignalContext::new(), SignalContext::new());
    }

    //=====================================================================
    // Lazy Init / Teardown
    //=====================================================================

    #[test]
    fn init_and_teardown_run_once_across_overlapping_slots() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let signal = {
            let events = Rc::clone(&events);
            Signal::<()>::with_init(move |_| {
                events.borrow_mut().push("init");
                let events = Rc::clone(&events);
                Box::new(move || events.borrow_mut().push("teardown"))
            })
        };

        let a = signal.connect(|_| {});
        let b = signal.connect(|_| {});
        signal.disconnect(a);
        signal.disconnect(b);

        assert_eq!(*events.borrow(), vec!["init", "teardown"]);
    }

    #[test]
    fn init_cycle_repeats_after_teardown() {
        let inits = Rc::new(Cell::new(0));
        let signal = {
            let inits = Rc::clone(&inits);
            Signal::<()>::with_init(move |_| {
                inits.set(inits.get() + 1);
                Box::new(|| {})
            })
        };

        let a = signal.connect(|_| {});
        signal.disconnect(a);
        let b = signal.connect(|_| {});
        signal.disconnect(b);

        assert_eq!(inits.get(), 2);
    }

    #[test]
    fn clear_runs_own_teardown() {
        let torn_down = Rc::new(Cell::new(false));
        let signal = {
            let torn_down = Rc::clone(&torn_down);
            Signal::<()>::with_init(move |_| {
                let torn_down = Rc::clone(&torn_down);
                Box::new(move || torn_down.set(true))
            })
        };
        signal.connect(|_| {});
        signal.connect(|_| {});

        signal.clear();

        assert!(torn_down.get());
        assert!(signal.is_empty());
    }

    //=====================================================================
    // Filtering
    //=====================================================================

    #[test]
    fn filter_emits_only_matching_values() {
        let signal = Signal::<i32>::new();
        let evens = signal.filter(|v| v % 2 == 0);
        let (log, handler) = recorder();
        evens.connect(handler);

        for v in 0..6 {
            signal.emit(&v);
        }

        assert_eq!(*log.borrow(), vec![0, 2, 4]);
    }

    #[test]
    fn filters_compose() {
        let signal = Signal::<i32>::new();
        let filtered = signal.filter(|v| v % 2 == 0).filter(|v| *v > 2);
        let (log, handler) = recorder();
        filtered.connect(handler);

        for v in 0..8 {
            signal.emit(&v);
        }

        assert_eq!(*log.borrow(), vec![4, 6]);
    }

    #[test]
    fn filter_connects_to_parent_only_while_subscribed() {
        let signal = Signal::<i32>::new();
        let filtered = signal.filter(|_| true);
        assert_eq!(signal.slot_count(), 0);

        let slot = filtered.connect(|_| {});
        assert_eq!(signal.slot_count(), 1);

        filtered.disconnect(slot);
        assert_eq!(signal.slot_count(), 0);
    }

    #[test]
    fn clear_leaves_derived_subscribers_in_place() {
        let signal = Signal::<i32>::new();
        let filtered = signal.filter(|_| true);
        let (log, handler) = recorder();
        filtered.connect(handler);

        signal.clear();
        signal.emit(&1);

        assert!(log.borrow().is_empty());
        assert_eq!(filtered.slot_count(), 1);
    }
}
