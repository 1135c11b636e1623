use super::*;
use crate::state::credentials::{REMEMBER_KEY, TOKEN_KEY, USERNAME_KEY};
use crate::test_helpers::{MockApi, memory_store};
use crate::util::storage::{KeyValueStorage, MemoryStorage};

fn machine(api: &Rc<MockApi>) -> (SessionMachine, Rc<CredentialStore>, Rc<MemoryStorage>) {
    let (store, storage) = memory_store();
    let machine = SessionMachine::new(store.clone(), api.clone());
    (machine, store, storage)
}

fn login_request(username: &str, password: &str) -> LoginRequest {
    LoginRequest { username: username.to_owned(), password: password.to_owned(), remember: false }
}

// =============================================================
// boot
// =============================================================

#[tokio::test]
async fn new_machine_starts_unknown() {
    let api = MockApi::new();
    let (machine, _, _) = machine(&api);
    assert_eq!(machine.state(), AuthState::Unknown);
    assert!(!machine.is_busy());
}

#[tokio::test]
async fn boot_without_token_is_unauthenticated_without_backend_call() {
    let api = MockApi::new();
    let (machine, _, _) = machine(&api);
    assert_eq!(machine.boot().await, AuthState::Unauthenticated);
    assert_eq!(api.validate_calls.get(), 0);
}

#[tokio::test]
async fn boot_with_valid_token_authenticates() {
    let api = MockApi::new().with_user("tok-valid", "alice");
    let (machine, store, _) = machine(&api);
    store.set_token("tok-valid", "alice", false);

    let state = machine.boot().await;
    assert_eq!(state.status(), AuthStatus::Authenticated);
    assert_eq!(machine.identity().unwrap().username, "alice");
}

#[tokio::test]
async fn boot_identity_comes_from_backend_not_storage() {
    let api = MockApi::new().with_user("tok-valid", "alice");
    let (machine, store, _) = machine(&api);
    store.set_token("tok-valid", "mallory", false);

    machine.boot().await;
    assert_eq!(machine.identity().unwrap().username, "alice");
}

#[tokio::test]
async fn boot_with_rejected_token_clears_credentials() {
    let api = MockApi::new();
    let (machine, store, storage) = machine(&api);
    store.set_token("tok-stale", "alice", true);

    assert_eq!(machine.boot().await, AuthState::Unauthenticated);
    assert_eq!(storage.get(TOKEN_KEY), None);
    assert_eq!(storage.get(USERNAME_KEY), None);
    assert_eq!(storage.get(REMEMBER_KEY), None);
}

#[tokio::test]
async fn boot_with_unreachable_backend_keeps_token() {
    let api = MockApi::new().with_user("tok-valid", "alice");
    api.unreachable.set(true);
    let (machine, store, _) = machine(&api);
    store.set_token("tok-valid", "alice", false);

    assert_eq!(machine.boot().await, AuthState::Unauthenticated);
    assert!(machine.identity().is_none());
    assert_eq!(store.token().as_deref(), Some("tok-valid"));
    assert_eq!(store.get().username.as_deref(), Some("alice"));
}

#[tokio::test]
async fn retained_token_is_retried_on_next_boot() {
    let api = MockApi::new().with_user("tok-valid", "alice");
    api.unreachable.set(true);
    let (first, store, _) = machine(&api);
    store.set_token("tok-valid", "alice", false);
    first.boot().await;

    api.unreachable.set(false);
    let second = SessionMachine::new(store, api.clone());
    assert!(second.boot().await.is_authenticated());
}

#[tokio::test]
async fn boot_runs_only_once() {
    let api = MockApi::new().with_user("tok-valid", "alice");
    let (machine, store, _) = machine(&api);
    store.set_token("tok-valid", "alice", false);

    machine.boot().await;
    machine.logout();
    assert_eq!(machine.boot().await, AuthState::Unauthenticated);
    assert_eq!(api.validate_calls.get(), 1);
}

#[tokio::test]
async fn boot_is_authenticating_without_identity_while_validating() {
    let api = MockApi::new().with_user("tok-valid", "alice");
    let (machine, store, _) = machine(&api);
    store.set_token("tok-valid", "alice", false);
    let gate = api.gate_next_validation();

    let (state, ()) = tokio::join!(machine.boot(), async {
        assert_eq!(machine.state(), AuthState::Authenticating);
        assert!(machine.identity().is_none());
        assert!(machine.is_busy());
        gate.send(()).unwrap();
    });

    assert!(state.is_authenticated());
    assert!(!machine.is_busy());
}

#[tokio::test]
async fn subscribers_see_final_state() {
    let api = MockApi::new().with_user("tok-valid", "alice");
    let (machine, store, _) = machine(&api);
    store.set_token("tok-valid", "alice", false);
    let mut rx = machine.subscribe();

    machine.boot().await;
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().identity().unwrap().username, "alice");
}

// =============================================================
// login
// =============================================================

#[tokio::test]
async fn login_stores_token_and_authenticates() {
    let api = MockApi::new().with_account("alice", "secret", "tok-alice");
    let (machine, store, _) = machine(&api);
    machine.boot().await;

    let request = LoginRequest { remember: true, ..login_request("alice", "secret") };
    let identity = machine.login(&request).await.unwrap();

    assert_eq!(identity.username, "alice");
    assert!(machine.state().is_authenticated());
    let record = store.get();
    assert_eq!(record.token.as_deref(), Some("tok-alice"));
    assert_eq!(record.username.as_deref(), Some("alice"));
    assert!(record.remember);
}

#[tokio::test]
async fn login_with_bad_credentials_surfaces_detail_and_touches_nothing() {
    let api = MockApi::new().with_account("alice", "secret", "tok-alice");
    let (machine, _, storage) = machine(&api);
    machine.boot().await;

    let err = machine.login(&login_request("alice", "wrongpass")).await.unwrap_err();

    assert_eq!(err.to_string(), "bad credentials");
    assert_eq!(machine.state(), AuthState::Unauthenticated);
    assert!(storage.is_empty());
    assert_eq!(api.validate_calls.get(), 0);
}

#[tokio::test]
async fn login_network_failure_leaves_state_unchanged() {
    let api = MockApi::new().with_account("alice", "secret", "tok-alice");
    let (machine, _, storage) = machine(&api);
    machine.boot().await;
    api.unreachable.set(true);

    let err = machine.login(&login_request("alice", "secret")).await.unwrap_err();
    assert!(matches!(err, AuthError::Network(_)));
    assert_eq!(machine.state(), AuthState::Unauthenticated);
    assert!(storage.is_empty());
}

#[tokio::test]
async fn login_with_token_rejected_on_validation_clears_store() {
    let api = MockApi::new();
    api.accounts
        .borrow_mut()
        .insert(("alice".to_owned(), "secret".to_owned()), "tok-orphan".to_owned());
    let (machine, store, _) = machine(&api);
    machine.boot().await;

    let err = machine.login(&login_request("alice", "secret")).await.unwrap_err();
    assert_eq!(err, AuthError::Unauthorized);
    assert_eq!(machine.state(), AuthState::Unauthenticated);
    assert_eq!(store.token(), None);
}

#[tokio::test]
async fn login_while_boot_in_flight_is_rejected() {
    let api = MockApi::new()
        .with_user("tok-valid", "alice")
        .with_account("bob", "secret", "tok-bob");
    let (machine, store, _) = machine(&api);
    store.set_token("tok-valid", "alice", false);
    let gate = api.gate_next_validation();

    let (state, login) = tokio::join!(machine.boot(), async {
        let result = machine.login(&login_request("bob", "secret")).await;
        gate.send(()).unwrap();
        result
    });

    assert_eq!(login, Err(AuthError::Busy));
    assert_eq!(api.login_calls.get(), 0);
    assert_eq!(state.identity().unwrap().username, "alice");
    assert_eq!(store.token().as_deref(), Some("tok-valid"));
}

#[tokio::test]
async fn relogin_replaces_identity() {
    let api = MockApi::new()
        .with_account("alice", "secret", "tok-alice")
        .with_account("bob", "hunter2", "tok-bob");
    let (machine, store, _) = machine(&api);
    machine.boot().await;

    machine.login(&login_request("alice", "secret")).await.unwrap();
    machine.login(&login_request("bob", "hunter2")).await.unwrap();

    assert_eq!(machine.identity().unwrap().username, "bob");
    assert_eq!(store.token().as_deref(), Some("tok-bob"));
}

// =============================================================
// logout
// =============================================================

#[tokio::test]
async fn logout_clears_everything_but_language() {
    let api = MockApi::new().with_account("alice", "secret", "tok-alice");
    let (machine, store, _) = machine(&api);
    store.set_language(crate::state::language::Language::En);
    machine.boot().await;
    let request = LoginRequest { remember: true, ..login_request("alice", "secret") };
    machine.login(&request).await.unwrap();

    machine.logout();

    assert_eq!(machine.state(), AuthState::Unauthenticated);
    assert!(machine.identity().is_none());
    let record = store.get();
    assert_eq!(record.token, None);
    assert_eq!(record.username, None);
    assert!(!record.remember);
    assert_eq!(record.language, crate::state::language::Language::En);
}

#[tokio::test]
async fn logout_discards_in_flight_boot_validation() {
    let api = MockApi::new().with_user("tok-valid", "alice");
    let (machine, store, _) = machine(&api);
    store.set_token("tok-valid", "alice", false);
    let gate = api.gate_next_validation();

    let (state, ()) = tokio::join!(machine.boot(), async {
        machine.logout();
        gate.send(()).unwrap();
    });

    assert_eq!(state, AuthState::Unauthenticated);
    assert_eq!(store.token(), None);
    assert!(!machine.is_busy());
}

#[tokio::test]
async fn logout_during_login_validation_supersedes_login() {
    let api = MockApi::new().with_account("alice", "secret", "tok-alice");
    let (machine, store, _) = machine(&api);
    machine.boot().await;
    let gate = api.gate_next_validation();
    let request = login_request("alice", "secret");

    let (login, ()) = tokio::join!(machine.login(&request), async {
        machine.logout();
        gate.send(()).unwrap();
    });

    assert_eq!(login, Err(AuthError::Superseded));
    assert_eq!(machine.state(), AuthState::Unauthenticated);
    assert_eq!(store.token(), None);

    // The flight slot is released, so a fresh login goes through.
    assert!(machine.login(&request).await.is_ok());
}
