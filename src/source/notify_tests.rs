//! Tests for change notification.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{ChangeNotifier, Listener, Subscription};

fn counting_listener() -> (Arc<AtomicUsize>, Listener) {
    let count = Arc::new(AtomicUsize::new(0));
    let listener_count = Arc::clone(&count);
    let listener: Listener = Arc::new(move || {
        listener_count.fetch_add(1, Ordering::SeqCst);
    });
    (count, listener)
}

#[test]
fn notify_reaches_every_subscriber() {
    let notifier = ChangeNotifier::new();
    let (first, first_listener) = counting_listener();
    let (second, second_listener) = counting_listener();

    let _a = notifier.subscribe(first_listener);
    let _b = notifier.subscribe(second_listener);
    notifier.notify();

    assert_eq!(first.load(Ordering::SeqCst), 1);
    assert_eq!(second.load(Ordering::SeqCst), 1);
    assert_eq!(notifier.subscriber_count(), 2);
}

#[test]
fn dropping_handle_unsubscribes() {
    let notifier = ChangeNotifier::new();
    let (count, listener) = counting_listener();

    let subscription = notifier.subscribe(listener);
    assert!(subscription.is_active());
    drop(subscription);
    notifier.notify();

    assert_eq!(count.load(Ordering::SeqCst), 0);
    assert_eq!(notifier.subscriber_count(), 0);
}

#[test]
fn cancel_only_removes_its_own_listener() {
    let notifier = ChangeNotifier::new();
    let (kept, kept_listener) = counting_listener();
    let (cancelled, cancelled_listener) = counting_listener();

    let _kept = notifier.subscribe(kept_listener);
    notifier.subscribe(cancelled_listener).cancel();
    notifier.notify();

    assert_eq!(kept.load(Ordering::SeqCst), 1);
    assert_eq!(cancelled.load(Ordering::SeqCst), 0);
}

#[test]
fn listener_may_subscribe_during_notify() {
    let notifier = ChangeNotifier::new();
    let inner = notifier.clone();
    let handles = Arc::new(std::sync::Mutex::new(Vec::new()));
    let handles_in_listener = Arc::clone(&handles);

    let _outer = notifier.subscribe(Arc::new(move || {
        let handle = inner.subscribe(Arc::new(|| {}));
        handles_in_listener.lock().unwrap().push(handle);
    }));
    notifier.notify();

    assert_eq!(notifier.subscriber_count(), 2);
}

#[test]
fn detached_subscription_is_inactive() {
    let subscription = Subscription::detached();
    assert!(!subscription.is_active());
}

#[test]
fn handle_outliving_notifier_is_harmless() {
    let notifier = ChangeNotifier::new();
    let (_, listener) = counting_listener();
    let subscription = notifier.subscribe(listener);

    drop(notifier);

    assert!(!subscription.is_active());
    drop(subscription);
}
