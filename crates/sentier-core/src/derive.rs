//! Derived stores.
//!
//! A derived store computes its value from one or more source stores. It is
//! lazy: sources are only subscribed while the derived store itself has
//! subscribers, and it recomputes once per settled change. When several
//! sources change as a consequence of the same `set` (a diamond), the
//! derivation waits until every invalidated source has delivered before
//! recomputing, so downstream subscribers never see a mixed state.

use core::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::store::{ReadStore, Readable, Setter, StopFn, Subscription};

/// Tracks which sources have been invalidated but not yet delivered.
struct Gate {
	pending: RefCell<Vec<bool>>,
	inited: Cell<bool>,
}

impl Gate {
	fn new(arity: usize) -> Self {
		Self {
			pending: RefCell::new(vec![false; arity]),
			inited: Cell::new(false),
		}
	}

	fn is_settled(&self) -> bool {
		!self.pending.borrow().iter().any(|pending| *pending)
	}

	fn mark(&self, index: usize, pending: bool) {
		if let Some(slot) = self.pending.borrow_mut().get_mut(index) {
			*slot = pending;
		}
	}
}

type SyncFn = Rc<dyn Fn()>;
type Slot<X> = Rc<RefCell<Option<X>>>;

fn track<X: Clone + 'static>(
	source: &ReadStore<X>,
	index: usize,
	slot: Slot<X>,
	gate: &Rc<Gate>,
	sync: &SyncFn,
) -> Subscription {
	let run_gate = Rc::clone(gate);
	let invalidate_gate = Rc::clone(gate);
	let sync = Rc::clone(sync);
	source.subscribe_with_invalidate(
		move |value| {
			*slot.borrow_mut() = Some(value.clone());
			run_gate.mark(index, false);
			if run_gate.inited.get() {
				sync();
			}
		},
		move || invalidate_gate.mark(index, true),
	)
}

fn build<T, K, C>(initial: T, arity: usize, compute: K, connect: C) -> ReadStore<T>
where
	T: Clone + PartialEq + 'static,
	K: Fn() -> Option<T> + 'static,
	C: Fn(&Rc<Gate>, &SyncFn) -> Vec<Subscription> + 'static,
{
	let compute = Rc::new(compute);
	ReadStore::with_start(initial, move |setter: Setter<T>| {
		let gate = Rc::new(Gate::new(arity));
		let sync: SyncFn = {
			let gate = Rc::clone(&gate);
			let compute = Rc::clone(&compute);
			Rc::new(move || {
				if !gate.is_settled() {
					return;
				}
				if let Some(value) = compute() {
					setter.set(value);
				}
			})
		};

		let subscriptions = connect(&gate, &sync);
		gate.inited.set(true);
		sync();

		Some(Box::new(move || {
			for subscription in subscriptions {
				subscription.unsubscribe();
			}
		}) as StopFn)
	})
}

/// Derives a store from a single source.
///
/// # Example
///
/// ```
/// use sentier_core::{Writable, derived};
///
/// let path = Writable::new("/blog/*".to_string());
/// let base = derived(&path, |p: &String| p.trim_end_matches("/*").to_string());
///
/// assert_eq!(base.get(), "/blog");
/// path.set("/docs/*".to_string());
/// assert_eq!(base.get(), "/docs");
/// ```
pub fn derived<A, T, S, F>(source: &S, f: F) -> ReadStore<T>
where
	A: Clone + 'static,
	T: Clone + PartialEq + 'static,
	S: Readable<A>,
	F: Fn(&A) -> T + 'static,
{
	let source = source.read_only();
	let initial = f(&source.get());
	let slot: Slot<A> = Rc::new(RefCell::new(None));

	let read = Rc::clone(&slot);
	build(
		initial,
		1,
		move || read.borrow().as_ref().map(&f),
		move |gate, sync| vec![track(&source, 0, Rc::clone(&slot), gate, sync)],
	)
}

/// Derives a store from two sources of different types.
pub fn derived2<A, B, T, SA, SB, F>(a: &SA, b: &SB, f: F) -> ReadStore<T>
where
	A: Clone + 'static,
	B: Clone + 'static,
	T: Clone + PartialEq + 'static,
	SA: Readable<A>,
	SB: Readable<B>,
	F: Fn(&A, &B) -> T + 'static,
{
	let a = a.read_only();
	let b = b.read_only();
	let initial = f(&a.get(), &b.get());
	let slot_a: Slot<A> = Rc::new(RefCell::new(None));
	let slot_b: Slot<B> = Rc::new(RefCell::new(None));

	let read_a = Rc::clone(&slot_a);
	let read_b = Rc::clone(&slot_b);
	build(
		initial,
		2,
		move || {
			let a = read_a.borrow();
			let b = read_b.borrow();
			match (a.as_ref(), b.as_ref()) {
				(Some(a), Some(b)) => Some(f(a, b)),
				_ => None,
			}
		},
		move |gate, sync| {
			vec![
				track(&a, 0, Rc::clone(&slot_a), gate, sync),
				track(&b, 1, Rc::clone(&slot_b), gate, sync),
			]
		},
	)
}

/// Derives a store from any number of sources of the same type.
pub fn derived_all<A, T, F>(sources: &[ReadStore<A>], f: F) -> ReadStore<T>
where
	A: Clone + 'static,
	T: Clone + PartialEq + 'static,
	F: Fn(&[A]) -> T + 'static,
{
	let sources: Vec<ReadStore<A>> = sources.to_vec();
	let current: Vec<A> = sources.iter().map(ReadStore::get).collect();
	let initial = f(current.as_slice());
	let slots: Vec<Slot<A>> = sources
		.iter()
		.map(|_| Rc::new(RefCell::new(None)))
		.collect();

	let read = slots.clone();
	build(
		initial,
		sources.len(),
		move || {
			let values: Option<Vec<A>> = read.iter().map(|slot| slot.borrow().clone()).collect();
			values.map(|values| f(values.as_slice()))
		},
		move |gate, sync| {
			sources
				.iter()
				.zip(&slots)
				.enumerate()
				.map(|(index, (source, slot))| track(source, index, Rc::clone(slot), gate, sync))
				.collect()
		},
	)
}
