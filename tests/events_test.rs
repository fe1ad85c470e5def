//! Registry event emission: ordering, payloads and listener management.

mod common;

use common::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use storehouse_core::{Registry, RegistryEvent, RegistryEventKind};

#[test]
fn test_first_add_emits_before_default_and_added() {
    let registry = Registry::new();
    let recorder = EventRecorder::attach(&registry);

    registry.add_manager("main", TestManager::new("main").arc()).unwrap();
    registry.add_manager("replica", TestManager::new("replica").arc()).unwrap();

    assert_eq!(
        recorder.names(),
        vec![
            "manager:before:add",
            "manager:default:changed",
            "manager:added",
            "manager:before:add",
            "manager:added",
        ]
    );
    assert!(matches!(
        &recorder.events()[1],
        RegistryEvent::DefaultManagerChanged { previous: None, current } if current == "main"
    ));
}

#[test]
fn test_rejected_add_still_emits_before_add() {
    let registry = Registry::new();
    registry.add_manager("main", TestManager::new("main").arc()).unwrap();
    let recorder = EventRecorder::attach(&registry);

    assert!(registry.add_manager("main", TestManager::new("main").arc()).is_err());
    assert!(registry.add_manager("", TestManager::new("blank").arc()).is_err());

    assert_eq!(
        recorder.names(),
        vec!["manager:before:add", "manager:before:add"]
    );
}

#[test]
fn test_set_default_reports_previous() {
    let registry = Registry::new();
    registry.add_manager("main", TestManager::new("main").arc()).unwrap();
    let recorder = EventRecorder::attach(&registry);

    registry.set_default_manager("replica");
    assert!(matches!(
        recorder.events().as_slice(),
        [RegistryEvent::DefaultManagerChanged { previous: Some(previous), current }]
            if previous == "main" && current == "replica"
    ));
}

#[test]
fn test_model_access_reports_explicit_manager_only() {
    let registry = Registry::new();
    registry
        .add_manager("main", TestManager::new("main").with_models(&["users"]).arc())
        .unwrap();
    let recorder = EventRecorder::attach(&registry);

    registry.get_model("users", None);
    registry.get_model("main", Some("orders"));

    let events = recorder.events();
    assert!(matches!(
        &events[0],
        RegistryEvent::ModelAccessed { manager: None, model, found: true } if model == "users"
    ));
    assert!(matches!(
        &events[1],
        RegistryEvent::ModelAccessed { manager: Some(manager), model, found: false }
            if manager == "main" && model == "orders"
    ));
}

#[tokio::test]
async fn test_destroy_event_sequence() {
    let registry = Registry::new();
    registry.add_manager("a", TestManager::new("a").arc()).unwrap();
    registry.add_manager("b", TestManager::new("b").arc()).unwrap();
    let recorder = EventRecorder::attach(&registry);

    registry.destroy().await.unwrap();

    assert_eq!(
        recorder.names(),
        vec![
            "registry:before:destroy",
            "connections:before:close:all",
            "connections:closed:all",
            "registry:destroyed",
        ]
    );
    assert!(matches!(
        recorder.events().last(),
        Some(RegistryEvent::RegistryDestroyed { count: 2 })
    ));
}

#[test]
fn test_listeners_run_in_registration_order() {
    let registry = Registry::new();
    let order = call_log();

    for label in ["first", "second", "third"] {
        let order = order.clone();
        registry.on(RegistryEventKind::ManagerAdded, move |_| {
            order.lock().push(label.to_string());
        });
    }

    registry.add_manager("main", TestManager::new("main").arc()).unwrap();
    assert_eq!(*order.lock(), vec!["first", "second", "third"]);
}

#[test]
fn test_once_and_off() {
    let registry = Registry::new();
    let once_calls = Arc::new(AtomicUsize::new(0));
    let on_calls = Arc::new(AtomicUsize::new(0));

    let counter = once_calls.clone();
    registry.once(RegistryEventKind::ManagerAdded, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let counter = on_calls.clone();
    let id = registry.on(RegistryEventKind::ManagerAdded, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    assert_eq!(registry.listener_count(RegistryEventKind::ManagerAdded), 2);

    registry.add_manager("a", TestManager::new("a").arc()).unwrap();
    registry.add_manager("b", TestManager::new("b").arc()).unwrap();
    assert_eq!(once_calls.load(Ordering::SeqCst), 1);
    assert_eq!(on_calls.load(Ordering::SeqCst), 2);

    assert!(registry.off(id));
    assert!(!registry.off(id));
    registry.add_manager("c", TestManager::new("c").arc()).unwrap();
    assert_eq!(on_calls.load(Ordering::SeqCst), 2);
    assert_eq!(registry.listener_count(RegistryEventKind::ManagerAdded), 0);
}

#[test]
fn test_remove_all_listeners() {
    let registry = Registry::new();
    let _recorder = EventRecorder::attach(&registry);

    assert_eq!(
        registry.remove_all_listeners(Some(RegistryEventKind::ManagerAdded)),
        1
    );
    assert_eq!(registry.listener_count(RegistryEventKind::ManagerAdded), 0);
    assert_eq!(registry.listener_count(RegistryEventKind::ManagerRemoved), 1);

    let remaining = RegistryEventKind::ALL.len() - 1;
    assert_eq!(registry.remove_all_listeners(None), remaining);
}

#[test]
fn test_listener_may_call_back_into_registry() {
    let registry = Arc::new(Registry::new());
    let seen = call_log();

    let inner = Arc::downgrade(&registry);
    let names = seen.clone();
    registry.on(RegistryEventKind::ManagerAdded, move |_| {
        if let Some(registry) = inner.upgrade() {
            names.lock().extend(registry.manager_names());
        }
    });

    registry.add_manager("main", TestManager::new("main").arc()).unwrap();
    assert_eq!(*seen.lock(), vec!["main"]);
}

#[test]
#[should_panic(expected = "listener failure")]
fn test_panicking_listener_propagates() {
    let registry = Registry::new();
    registry.on(RegistryEventKind::ManagerAdded, |_| panic!("listener failure"));
    let _ = registry.add_manager("main", TestManager::new("main").arc());
}

#[tokio::test]
async fn test_broadcast_subscription_mirrors_events() {
    let registry = Registry::new();
    let mut receiver = registry.subscribe();

    registry.add_manager("main", TestManager::new("main").arc()).unwrap();
    registry.get_connection(None);

    let mut kinds = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        kinds.push(event.kind());
    }
    assert_eq!(
        kinds,
        vec![
            RegistryEventKind::ManagerBeforeAdd,
            RegistryEventKind::DefaultManagerChanged,
            RegistryEventKind::ManagerAdded,
            RegistryEventKind::ConnectionAccessed,
        ]
    );
}
