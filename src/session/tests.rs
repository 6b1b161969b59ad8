use super::*;
use crate::kv::tests::MemoryKv;
use shopfront_shared::Role;
use std::rc::Rc;

fn make_profile(name: &str) -> UserProfile {
    serde_json::from_str(&format!(
        r#"{{"id":1,"name":"{name}","email":"{name}@example.com","role":"user"}}"#
    ))
    .unwrap()
}

#[test]
fn set_session_persists_and_survives_reload() {
    let kv = Rc::new(MemoryKv::new());
    let store = SessionStore::new(kv.clone());

    store.set_session("tok-1".into(), Role::User, Some(make_profile("ada")));

    // Simulate a full page reload: a fresh store over the same backend
    let reloaded = SessionStore::new(kv);
    let snap = reloaded.snapshot();
    assert_eq!(snap.token.as_deref(), Some("tok-1"));
    assert_eq!(snap.role, Some(Role::User));
    assert_eq!(snap.profile.unwrap().name, "ada");
}

#[test]
fn clear_session_removes_every_key() {
    let kv = Rc::new(MemoryKv::new());
    let store = SessionStore::new(kv.clone());

    store.set_session("tok-1".into(), Role::User, Some(make_profile("ada")));
    store.clear_session();

    assert!(!kv.contains("token"));
    assert!(!kv.contains("role"));
    assert!(!kv.contains("user"));
    assert_eq!(store.snapshot(), SessionSnapshot::default());
}

#[test]
fn listeners_observe_full_snapshots_in_mutation_order() {
    let kv = Rc::new(MemoryKv::new());
    let store = SessionStore::new(kv);

    let seen: Rc<std::cell::RefCell<Vec<(Option<String>, Option<Role>)>>> =
        Rc::new(std::cell::RefCell::new(Vec::new()));
    let sink = seen.clone();
    store.subscribe(move |snap| {
        // Token and role always change together: never a half-applied snapshot
        assert_eq!(snap.token.is_some(), snap.role.is_some());
        sink.borrow_mut()
            .push((snap.token.clone(), snap.role));
    });

    store.set_session("tok-a".into(), Role::User, None);
    store.set_session("tok-b".into(), Role::Admin, None);
    store.clear_session();

    let seen = seen.borrow();
    assert_eq!(
        *seen,
        vec![
            (Some("tok-a".to_string()), Some(Role::User)),
            (Some("tok-b".to_string()), Some(Role::Admin)),
            (None, None),
        ]
    );
}

#[test]
fn token_without_role_loads_as_anonymous() {
    let kv = Rc::new(MemoryKv::new());
    kv.write("token", "orphan");

    let store = SessionStore::new(kv);
    assert!(!store.snapshot().is_authenticated());
}

#[test]
fn reload_from_backend_picks_up_cross_tab_logout() {
    let kv = Rc::new(MemoryKv::new());
    let store = SessionStore::new(kv.clone());
    store.set_session("tok-1".into(), Role::User, None);

    let notified = Rc::new(std::cell::Cell::new(0));
    let counter = notified.clone();
    store.subscribe(move |_| counter.set(counter.get() + 1));

    // Another tab clears the backing store out from under us
    kv.remove("token");
    kv.remove("role");
    kv.remove("user");
    store.reload_from_backend();

    assert_eq!(notified.get(), 1);
    assert!(!store.snapshot().is_authenticated());

    // Unchanged backend: no extra notification
    store.reload_from_backend();
    assert_eq!(notified.get(), 1);
}

#[test]
fn set_profile_is_dropped_after_logout() {
    let kv = Rc::new(MemoryKv::new());
    let store = SessionStore::new(kv.clone());
    store.set_session("tok-1".into(), Role::User, None);
    store.clear_session();

    // A late /auth/me response must not resurrect session state
    store.set_profile(make_profile("ghost"));
    assert_eq!(store.snapshot(), SessionSnapshot::default());
    assert!(!kv.contains("user"));
}
