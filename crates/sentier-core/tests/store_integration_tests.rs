//! Integration tests for the reactive store system
//!
//! These tests verify:
//! 1. Cascading `set` calls are delivered breadth-first and in order
//! 2. Subscribing in the middle of a cascade delivers exactly once
//! 3. Derived stores stay consistent across diamond-shaped dependencies
//! 4. Start/stop notifiers connect and disconnect external sources

use proptest::prelude::*;
use rstest::rstest;
use sentier_core::{
	ReadStore, Readable, Setter, StopFn, Subscription, Writable, derived, derived2, get,
};
use std::cell::RefCell;
use std::rc::Rc;

fn log<T>() -> Rc<RefCell<Vec<T>>> {
	Rc::new(RefCell::new(Vec::new()))
}

#[rstest]
fn test_cascade_is_breadth_first_across_stores() {
	let a = Writable::new(0);
	let b = Writable::new(0);
	let events = log::<String>();

	let b_writer = b.clone();
	let sink = events.clone();
	let _a_first = a.subscribe(move |v| {
		sink.borrow_mut().push(format!("a1:{v}"));
		b_writer.set(*v * 10);
	});
	let sink = events.clone();
	let _a_second = a.subscribe(move |v| sink.borrow_mut().push(format!("a2:{v}")));
	let sink = events.clone();
	let _b = b.subscribe(move |v| sink.borrow_mut().push(format!("b:{v}")));

	events.borrow_mut().clear();
	a.set(1);

	// `b` is notified only after every subscriber of `a` saw the value.
	assert_eq!(*events.borrow(), vec!["a1:1", "a2:1", "b:10"]);
}

#[rstest]
fn test_repeated_nested_sets_deliver_monotonically() {
	let counter = Writable::new(0);
	let seen = log::<i32>();

	let writer = counter.clone();
	let _stepper = counter.subscribe(move |v| {
		if *v > 0 && *v < 5 {
			writer.set(v + 1);
		}
	});
	let sink = seen.clone();
	let _observer = counter.subscribe(move |v| sink.borrow_mut().push(*v));

	counter.set(1);

	assert_eq!(*seen.borrow(), vec![0, 1, 2, 3, 4, 5]);
}

#[rstest]
fn test_subscribe_mid_cascade_delivers_exactly_once() {
	let store = Writable::new(0);
	let late = log::<i32>();
	let late_subscription: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

	let inner_store = store.clone();
	let sink = late.clone();
	let holder = late_subscription.clone();
	let _trigger = store.subscribe(move |v| {
		if *v == 1 && holder.borrow().is_none() {
			inner_store.set(2);
			let sink = sink.clone();
			let subscription = inner_store.subscribe(move |v| sink.borrow_mut().push(*v));
			*holder.borrow_mut() = Some(subscription);
		}
	});

	store.set(1);
	assert_eq!(*late.borrow(), vec![2]);

	store.set(3);
	assert_eq!(*late.borrow(), vec![2, 3]);

	if let Some(subscription) = late_subscription.borrow_mut().take() {
		subscription.unsubscribe();
	}
}

#[rstest]
fn test_unsubscribe_mid_cascade_skips_queued_notification() {
	let store = Writable::new(0);
	let seen = log::<i32>();
	let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

	let holder = victim.clone();
	let _killer = store.subscribe(move |v| {
		if *v == 1 {
			if let Some(subscription) = holder.borrow_mut().take() {
				subscription.unsubscribe();
			}
		}
	});
	let sink = seen.clone();
	*victim.borrow_mut() = Some(store.subscribe(move |v| sink.borrow_mut().push(*v)));

	store.set(1);

	assert_eq!(*seen.borrow(), vec![0]);
	assert_eq!(store.subscriber_count(), 1);
}

#[rstest]
fn test_diamond_recomputes_once_per_change() {
	let source = Writable::new(1);
	let left = derived(&source, |n: &i32| n + 1);
	let right = derived(&source, |n: &i32| n * 10);
	let calls = Rc::new(RefCell::new(0));
	let counter = calls.clone();
	let combined = derived2(&left, &right, move |l: &i32, r: &i32| {
		*counter.borrow_mut() += 1;
		(*l, *r)
	});

	let seen = log::<(i32, i32)>();
	let sink = seen.clone();
	let _subscription = combined.subscribe(move |pair| sink.borrow_mut().push(*pair));
	*calls.borrow_mut() = 0;

	source.set(2);

	// Never observes (3, 10) or (2, 20).
	assert_eq!(*seen.borrow(), vec![(2, 10), (3, 20)]);
	assert_eq!(*calls.borrow(), 1);
}

#[rstest]
fn test_start_notifier_feeds_external_source() {
	let external: Rc<RefCell<Option<Setter<String>>>> = Rc::new(RefCell::new(None));
	let connected = external.clone();
	let store = ReadStore::with_start(String::new(), move |set: Setter<String>| {
		set.set("connected".to_string());
		*connected.borrow_mut() = Some(set);
		let disconnected = connected.clone();
		Some(Box::new(move || {
			disconnected.borrow_mut().take();
		}) as StopFn)
	});

	let seen = log::<String>();
	let sink = seen.clone();
	let subscription = store.subscribe(move |v| sink.borrow_mut().push(v.clone()));

	if let Some(setter) = external.borrow().as_ref() {
		setter.set("event".to_string());
	}
	subscription.unsubscribe();

	assert_eq!(*seen.borrow(), vec!["connected", "event"]);
	assert!(external.borrow().is_none());
}

#[rstest]
fn test_subscription_keeps_unnamed_derived_store_running() {
	let source = Writable::new(1);
	let seen = log::<i32>();

	let sink = seen.clone();
	let subscription = derived(&source, |n: &i32| n * 2).subscribe(move |n| sink.borrow_mut().push(*n));
	source.set(5);

	assert_eq!(*seen.borrow(), vec![2, 10]);
	assert_eq!(source.subscriber_count(), 1);

	subscription.unsubscribe();
	source.set(6);

	assert_eq!(*seen.borrow(), vec![2, 10]);
	assert_eq!(source.subscriber_count(), 0);
}

#[rstest]
fn test_unsubscribe_releases_chain_of_unnamed_derivations() {
	let source = Writable::new("/".to_string());
	let seen = log::<usize>();

	let sink = seen.clone();
	let subscription = derived(&derived(&source, |path: &String| path.len()), |len: &usize| len + 1)
		.subscribe(move |n| sink.borrow_mut().push(*n));
	source.set("/blog".to_string());

	assert_eq!(*seen.borrow(), vec![2, 6]);

	subscription.unsubscribe();
	assert_eq!(source.subscriber_count(), 0);
}

#[rstest]
fn test_get_on_derived_of_started_store() {
	let base = Writable::new("/app".to_string());
	let child = derived(&base.read_only(), |b: &String| format!("{b}/blog"));

	assert_eq!(get(&child), "/app/blog");
	assert_eq!(base.subscriber_count(), 0);
}

proptest! {
	#[test]
	fn prop_last_set_wins_and_no_duplicates(values in proptest::collection::vec(-50i32..50, 1..40)) {
		let store = Writable::new(0);
		let seen = log::<i32>();
		let sink = seen.clone();
		let subscription = store.subscribe(move |v| sink.borrow_mut().push(*v));

		for value in &values {
			store.set(*value);
		}
		subscription.unsubscribe();

		let seen = seen.borrow();
		prop_assert_eq!(seen.last().copied(), values.last().copied());
		prop_assert!(seen.windows(2).all(|pair| pair[0] != pair[1]));
	}
}
