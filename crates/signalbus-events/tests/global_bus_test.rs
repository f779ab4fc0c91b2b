//! Integration tests for the process-wide event bus.
//!
//! Every test touches the same global manager, so they hold `LOCK` and start
//! from a cleared bus.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::json;
use signalbus_events::{global, Callback, Event, EventManager, ManagerConfig};

static LOCK: Mutex<()> = Mutex::new(());

fn setup() -> MutexGuard<'static, ()> {
    let guard = LOCK.lock().unwrap_or_else(|e| e.into_inner());
    global::init(ManagerConfig::new().with_name("global-test"));
    global::clear();
    guard
}

fn counter(count: &Arc<AtomicUsize>) -> Callback {
    let count = count.clone();
    Callback::new(move |_, _| {
        count.fetch_add(1, Ordering::SeqCst);
        Ok(None)
    })
}

#[test]
fn test_global_trigger() {
    let _guard = setup();
    let i = Arc::new(AtomicUsize::new(0));
    let j = Arc::new(AtomicUsize::new(0));

    global::on("test1", counter(&i));
    global::on("test2", counter(&j));

    global::trigger("test1", vec![]).unwrap();

    assert_eq!(i.load(Ordering::SeqCst), 1);
    assert_eq!(j.load(Ordering::SeqCst), 0);
}

#[test]
fn test_global_trigger_priority() {
    let _guard = setup();
    let i = Arc::new(AtomicUsize::new(0));
    let j = Arc::new(AtomicUsize::new(0));

    let (i2, j2) = (i.clone(), j.clone());
    global::on(
        "test",
        Callback::new(move |_, _| {
            if j2.load(Ordering::SeqCst) > 0 {
                i2.fetch_add(1, Ordering::SeqCst);
            }
            Ok(None)
        }),
    );
    global::on_with_priority("test", counter(&j), EventManager::PRIORITY_HIGH);

    global::trigger("test", vec![]).unwrap();

    assert_eq!(i.load(Ordering::SeqCst), 1);
    assert_eq!(j.load(Ordering::SeqCst), 1);
}

#[test]
fn test_global_trigger_arguments() {
    let _guard = setup();
    let event = {
        global::on("test", Callback::new(|_, args| Ok(Some(json!(args.len())))));
        global::trigger("test", vec![json!(2), json!(true)]).unwrap()
    };

    assert_eq!(event.result(), Some(&json!(2)));
    assert_eq!(event.data().get_index(1), Some(&json!(true)));
}

#[test]
fn test_global_off() {
    let _guard = setup();
    let i = Arc::new(AtomicUsize::new(0));

    global::on("test", counter(&i));
    global::on("test", counter(&i));

    assert!(global::off("test", None));
    global::trigger("test", vec![]).unwrap();

    assert!(!global::has("test"));
    assert_eq!(i.load(Ordering::SeqCst), 0);
}

#[test]
fn test_global_off_callback() {
    let _guard = setup();
    let i = Arc::new(AtomicUsize::new(0));
    let j = Arc::new(AtomicUsize::new(0));
    let callback = counter(&i);

    global::on("test", callback.clone());
    global::on("test", counter(&j));

    assert!(global::off("test", Some(&callback)));
    global::trigger("test", vec![]).unwrap();

    assert_eq!(i.load(Ordering::SeqCst), 0);
    assert_eq!(j.load(Ordering::SeqCst), 1);
}

#[test]
fn test_global_dispatch_and_clear() {
    let _guard = setup();

    global::on(
        "test",
        Callback::new(|event, _| {
            event.stop_propagation();
            Ok(None)
        }),
    );

    let mut event = Event::new("test");
    global::dispatch(&mut event).unwrap();
    assert!(event.is_propagation_stopped());

    global::clear();
    assert!(!global::has("test"));
}

#[test]
fn test_global_init_only_once() {
    let _guard = setup();

    assert!(!global::init(ManagerConfig::new().with_name("late")));
    assert_eq!(global::manager().config().name, "global-test");
}
