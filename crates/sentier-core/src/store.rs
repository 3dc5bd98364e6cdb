//! Store - Publish/Subscribe Value Container
//!
//! A store holds a single value and pushes it to subscribers. Subscribing
//! delivers the current value immediately; afterwards every observable change
//! is delivered once per `set`, in subscription order.
//!
//! ## Change Detection
//!
//! Whether a `set` is observable is decided by the store's equality predicate:
//!
//! - [`Writable::new`] uses [`safe_eq`]: `PartialEq`, with self-unequal values
//!   (NaN) treated as equal to each other.
//! - [`Writable::always_notify`] treats every `set` as a change, matching
//!   identity semantics for values without a meaningful equality.
//! - [`Writable::with_eq`] takes an arbitrary predicate.
//!
//! ## Example
//!
//! ```
//! use sentier_core::Writable;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let count = Writable::new(0);
//! let seen = Rc::new(RefCell::new(Vec::new()));
//!
//! let log = seen.clone();
//! let subscription = count.subscribe(move |n| log.borrow_mut().push(*n));
//!
//! count.set(1);
//! count.set(1); // unchanged, not delivered
//! count.update(|n| n + 1);
//!
//! assert_eq!(*seen.borrow(), vec![0, 1, 2]);
//! subscription.unsubscribe();
//! ```

use core::cell::{Cell, RefCell};
use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};
use std::rc::{Rc, Weak};

use crate::queue;

/// Equality predicate deciding whether a new value is observably the same.
pub type EqFn<T> = Rc<dyn Fn(&T, &T) -> bool>;

/// Callback run when the last subscriber leaves a store with a start notifier.
pub type StopFn = Box<dyn FnOnce()>;

type StartFn<T> = Rc<dyn Fn(Setter<T>) -> Option<StopFn>>;

/// NaN-safe equality.
///
/// Two values are the same when `a == b`, or when both are unequal to
/// themselves (the NaN case), so setting NaN over NaN does not notify.
#[allow(clippy::eq_op)]
pub fn safe_eq<T: PartialEq>(a: &T, b: &T) -> bool {
	a == b || (a != a && b != b)
}

fn next_subscriber_id() -> u64 {
	static COUNTER: AtomicU64 = AtomicU64::new(0);
	COUNTER.fetch_add(1, Ordering::Relaxed)
}

struct Subscriber<T> {
	id: u64,
	run: Box<dyn Fn(&T)>,
	invalidate: Box<dyn Fn()>,
	active: Cell<bool>,
}

struct Inner<T: 'static> {
	value: RefCell<T>,
	subscribers: RefCell<Vec<Rc<Subscriber<T>>>>,
	eq: EqFn<T>,
	start: Option<StartFn<T>>,
	stop: RefCell<Option<StopFn>>,
	/// Set once the start notifier has returned; notifications are only
	/// delivered while running.
	running: Cell<bool>,
}

/// Shared store core behind [`Writable`] and [`ReadStore`].
struct Store<T: 'static> {
	inner: Rc<Inner<T>>,
}

impl<T: 'static> Clone for Store<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<T: Clone + 'static> Store<T> {
	fn new(value: T, eq: EqFn<T>, start: Option<StartFn<T>>) -> Self {
		Self {
			inner: Rc::new(Inner {
				value: RefCell::new(value),
				subscribers: RefCell::new(Vec::new()),
				eq,
				start,
				stop: RefCell::new(None),
				running: Cell::new(false),
			}),
		}
	}

	fn set(&self, new_value: T) {
		if (self.inner.eq)(&self.inner.value.borrow(), &new_value) {
			return;
		}
		*self.inner.value.borrow_mut() = new_value;

		if !self.inner.running.get() {
			return;
		}

		let run_queue = queue::is_idle();
		let subscribers: Vec<_> = self.inner.subscribers.borrow().clone();
		let value = self.inner.value.borrow().clone();
		for subscriber in subscribers {
			(subscriber.invalidate)();
			let value = value.clone();
			queue::push(Box::new(move || {
				if subscriber.active.get() {
					(subscriber.run)(&value);
				}
			}));
		}
		if run_queue {
			queue::drain();
		}
	}

	fn update<F>(&self, f: F)
	where
		F: FnOnce(&T) -> T,
	{
		let next = {
			let current = self.inner.value.borrow();
			f(&current)
		};
		self.set(next);
	}

	fn subscribe_with_invalidate(
		&self,
		run: Box<dyn Fn(&T)>,
		invalidate: Box<dyn Fn()>,
	) -> Subscription {
		let subscriber = Rc::new(Subscriber {
			id: next_subscriber_id(),
			run,
			invalidate,
			active: Cell::new(true),
		});

		let first = {
			let mut subscribers = self.inner.subscribers.borrow_mut();
			subscribers.push(Rc::clone(&subscriber));
			subscribers.len() == 1
		};
		if first {
			self.start();
		}

		let value = self.inner.value.borrow().clone();
		(subscriber.run)(&value);

		// The handle owns the store until it unsubscribes, so a derived store
		// reached only through its subscriptions keeps running.
		let inner = Rc::clone(&self.inner);
		let id = subscriber.id;
		Subscription::new(move || Store::remove_subscriber(&inner, id))
	}

	fn start(&self) {
		if let Some(start) = self.inner.start.clone() {
			tracing::trace!("store start notifier running");
			let stop = start(Setter {
				inner: Rc::downgrade(&self.inner),
			});
			*self.inner.stop.borrow_mut() = stop;
		}
		self.inner.running.set(true);
	}

	fn remove_subscriber(inner: &Rc<Inner<T>>, id: u64) {
		let now_empty = {
			let mut subscribers = inner.subscribers.borrow_mut();
			let Some(index) = subscribers.iter().position(|s| s.id == id) else {
				return;
			};
			let removed = subscribers.remove(index);
			removed.active.set(false);
			subscribers.is_empty()
		};

		if now_empty {
			inner.running.set(false);
			let stop = inner.stop.borrow_mut().take();
			if let Some(stop) = stop {
				tracing::trace!("store stop notifier running");
				stop();
			}
		}
	}

	fn get(&self) -> T {
		if self.inner.running.get() || self.inner.start.is_none() {
			return self.inner.value.borrow().clone();
		}
		let slot = Rc::new(RefCell::new(None));
		let write = Rc::clone(&slot);
		let subscription = self.subscribe_with_invalidate(
			Box::new(move |value: &T| *write.borrow_mut() = Some(value.clone())),
			Box::new(|| {}),
		);
		subscription.unsubscribe();
		let value = slot.borrow_mut().take();
		value.unwrap_or_else(|| self.inner.value.borrow().clone())
	}

	fn subscriber_count(&self) -> usize {
		self.inner.subscribers.borrow().len()
	}
}

/// Handle returned by `subscribe`.
///
/// The handle keeps its store alive. Dropping it leaves the subscriber
/// registered; call [`Subscription::unsubscribe`] to remove it, which also
/// runs the store's stop notifier when it was the last subscriber.
#[must_use = "dropping a Subscription does not unsubscribe; call `unsubscribe()`"]
pub struct Subscription {
	remove: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
	pub(crate) fn new(remove: impl FnOnce() + 'static) -> Self {
		Self {
			remove: Some(Box::new(remove)),
		}
	}

	/// Removes the subscriber from its store.
	pub fn unsubscribe(mut self) {
		if let Some(remove) = self.remove.take() {
			remove();
		}
	}
}

impl fmt::Debug for Subscription {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Subscription")
			.field("active", &self.remove.is_some())
			.finish()
	}
}

/// Write access handed to a start notifier.
///
/// Holds a weak reference, so a notifier that outlives its store silently
/// stops writing.
pub struct Setter<T: 'static> {
	inner: Weak<Inner<T>>,
}

impl<T: 'static> Clone for Setter<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Weak::clone(&self.inner),
		}
	}
}

impl<T: Clone + 'static> Setter<T> {
	/// Sets the store's value, notifying subscribers if it changed.
	pub fn set(&self, value: T) {
		if let Some(inner) = self.inner.upgrade() {
			Store { inner }.set(value);
		}
	}

	/// Replaces the store's value with `f(current)`.
	pub fn update<F>(&self, f: F)
	where
		F: FnOnce(&T) -> T,
	{
		if let Some(inner) = self.inner.upgrade() {
			Store { inner }.update(f);
		}
	}
}

/// Conversion into a read-only store view.
///
/// Implemented by [`Writable`] and [`ReadStore`], so derivations accept either.
pub trait Readable<T: Clone + 'static> {
	/// Returns a read-only handle sharing this store's state.
	fn read_only(&self) -> ReadStore<T>;
}

/// A store that can be read, subscribed to and written.
pub struct Writable<T: 'static> {
	store: Store<T>,
}

impl<T: 'static> Clone for Writable<T> {
	fn clone(&self) -> Self {
		Self {
			store: self.store.clone(),
		}
	}
}

impl<T: Clone + PartialEq + 'static> Writable<T> {
	/// Creates a store using [`safe_eq`] for change detection.
	pub fn new(value: T) -> Self {
		Self::with_eq(value, safe_eq::<T>)
	}
}

impl<T: Clone + 'static> Writable<T> {
	/// Creates a store with a custom "is the same value" predicate.
	pub fn with_eq<E>(value: T, eq: E) -> Self
	where
		E: Fn(&T, &T) -> bool + 'static,
	{
		Self {
			store: Store::new(value, Rc::new(eq), None),
		}
	}

	/// Creates a store that notifies on every `set`.
	pub fn always_notify(value: T) -> Self {
		Self::with_eq(value, |_, _| false)
	}

	/// Sets a new value, notifying subscribers if it is observably different.
	pub fn set(&self, value: T) {
		self.store.set(value);
	}

	/// Replaces the value with `f(current)`.
	pub fn update<F>(&self, f: F)
	where
		F: FnOnce(&T) -> T,
	{
		self.store.update(f);
	}

	/// Subscribes to the store. `run` receives the current value immediately.
	pub fn subscribe<F>(&self, run: F) -> Subscription
	where
		F: Fn(&T) + 'static,
	{
		self.store
			.subscribe_with_invalidate(Box::new(run), Box::new(|| {}))
	}

	/// Subscribes with an additional `invalidate` callback, invoked
	/// synchronously on every change before the new value is queued.
	pub fn subscribe_with_invalidate<F, I>(&self, run: F, invalidate: I) -> Subscription
	where
		F: Fn(&T) + 'static,
		I: Fn() + 'static,
	{
		self.store
			.subscribe_with_invalidate(Box::new(run), Box::new(invalidate))
	}

	/// Returns the current value.
	pub fn get(&self) -> T {
		self.store.get()
	}

	/// Returns the number of live subscribers.
	pub fn subscriber_count(&self) -> usize {
		self.store.subscriber_count()
	}
}

impl<T: Clone + 'static> Readable<T> for Writable<T> {
	fn read_only(&self) -> ReadStore<T> {
		ReadStore {
			store: self.store.clone(),
		}
	}
}

impl<T: fmt::Debug + Clone + 'static> fmt::Debug for Writable<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Writable")
			.field("value", &*self.store.inner.value.borrow())
			.field("subscribers", &self.store.subscriber_count())
			.finish()
	}
}

/// A read-only store: either a view of a [`Writable`] or a derived store.
pub struct ReadStore<T: 'static> {
	store: Store<T>,
}

impl<T: 'static> Clone for ReadStore<T> {
	fn clone(&self) -> Self {
		Self {
			store: self.store.clone(),
		}
	}
}

impl<T: Clone + PartialEq + 'static> ReadStore<T> {
	/// Creates a read-only store driven by a start notifier.
	///
	/// `start` runs when the first subscriber arrives and receives a
	/// [`Setter`]; values it sets before returning are not broadcast but are
	/// delivered to the subscriber that triggered the start. The optional
	/// [`StopFn`] it returns runs when the last subscriber leaves.
	pub fn with_start<S>(initial: T, start: S) -> Self
	where
		S: Fn(Setter<T>) -> Option<StopFn> + 'static,
	{
		Self {
			store: Store::new(initial, Rc::new(safe_eq::<T>), Some(Rc::new(start))),
		}
	}
}

impl<T: Clone + 'static> ReadStore<T> {
	/// Subscribes to the store. `run` receives the current value immediately.
	pub fn subscribe<F>(&self, run: F) -> Subscription
	where
		F: Fn(&T) + 'static,
	{
		self.store
			.subscribe_with_invalidate(Box::new(run), Box::new(|| {}))
	}

	/// Subscribes with an additional `invalidate` callback.
	pub fn subscribe_with_invalidate<F, I>(&self, run: F, invalidate: I) -> Subscription
	where
		F: Fn(&T) + 'static,
		I: Fn() + 'static,
	{
		self.store
			.subscribe_with_invalidate(Box::new(run), Box::new(invalidate))
	}

	/// Returns the current value, starting and stopping the store if it has
	/// no subscribers.
	pub fn get(&self) -> T {
		self.store.get()
	}

	/// Returns the number of live subscribers.
	pub fn subscriber_count(&self) -> usize {
		self.store.subscriber_count()
	}

	/// Returns `true` if both handles refer to the same store.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.store.inner, &other.store.inner)
	}
}

impl<T: Clone + 'static> Readable<T> for ReadStore<T> {
	fn read_only(&self) -> ReadStore<T> {
		self.clone()
	}
}

impl<T: fmt::Debug + Clone + 'static> fmt::Debug for ReadStore<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ReadStore")
			.field("value", &*self.store.inner.value.borrow())
			.field("subscribers", &self.store.subscriber_count())
			.finish()
	}
}

/// Reads a store's current value through a throwaway subscription.
pub fn get<T, S>(store: &S) -> T
where
	T: Clone + 'static,
	S: Readable<T>,
{
	store.read_only().get()
}
