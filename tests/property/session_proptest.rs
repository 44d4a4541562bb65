//! Property-based tests for session consistency and guard decisions

use std::sync::Arc;

use finboard::session::{GuardDecision, MemoryNavigator, RouteGuard, SessionStore};
use finboard::shared::{AppConfig, Role, Session, SessionStatus, User};
use proptest::prelude::*;

fn arb_role() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::Admin), Just(Role::User), Just(Role::Other)]
}

fn arb_user() -> impl Strategy<Value = User> {
    (1i64..10_000, "[a-z]{1,12}", arb_role()).prop_map(|(id, username, role)| User {
        id,
        username,
        role,
    })
}

fn arb_status() -> impl Strategy<Value = SessionStatus> {
    prop_oneof![
        Just(SessionStatus::Unknown),
        Just(SessionStatus::Authenticated),
        Just(SessionStatus::Unauthenticated),
    ]
}

fn arb_session() -> impl Strategy<Value = Session> {
    prop_oneof![
        Just(Session::Unknown),
        Just(Session::Unauthenticated),
        arb_user().prop_map(Session::Authenticated),
    ]
}

fn arb_path() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("/".to_string()),
        Just("/login".to_string()),
        Just("/register/".to_string()),
        Just("/accounts".to_string()),
        Just("/history?page=2".to_string()),
        (1i64..500).prop_map(|id| format!("/expenses/{}", id)),
        (1i64..500).prop_map(|id| format!("/employees/{}", id)),
        "/[a-z]{1,8}(/[a-z0-9]{1,4})?",
    ]
}

fn guard() -> RouteGuard {
    RouteGuard::new(
        &AppConfig::default(),
        SessionStore::new(),
        Arc::new(MemoryNavigator::default()),
    )
}

proptest! {
    #[test]
    fn test_user_present_iff_authenticated(status in arb_status(), user in proptest::option::of(arb_user())) {
        let has_user = user.is_some();
        match Session::new(status, user) {
            Ok(session) => {
                prop_assert_eq!(session.status(), status);
                prop_assert_eq!(session.user().is_some(), status == SessionStatus::Authenticated);
                prop_assert_eq!(has_user, status == SessionStatus::Authenticated);
            }
            Err(_) => prop_assert_ne!(has_user, status == SessionStatus::Authenticated),
        }
    }

    #[test]
    fn test_admin_only_when_authenticated_admin(session in arb_session()) {
        let expected = matches!(&session, Session::Authenticated(u) if u.role == Role::Admin);
        prop_assert_eq!(session.is_admin(), expected);
    }

    #[test]
    fn test_guard_redirects_only_unauthenticated_on_protected(session in arb_session(), path in arb_path()) {
        let guard = guard();
        let decision = guard.decide(&session, &path);
        let public = AppConfig::default().is_public(&path);
        match decision {
            GuardDecision::Redirect { to } => {
                prop_assert_eq!(&session, &Session::Unauthenticated);
                prop_assert!(!public);
                prop_assert_eq!(to, "/login");
            }
            GuardDecision::Loading => prop_assert!(session.is_unknown()),
            GuardDecision::Render { chrome, .. } => {
                prop_assert!(!session.is_unknown());
                prop_assert_eq!(chrome.navbar, !public);
                prop_assert!(!chrome.admin_sidebar || session.is_admin());
            }
        }
    }

    #[test]
    fn test_store_never_holds_inconsistent_pair(writes in proptest::collection::vec(arb_session(), 1..20)) {
        let store = SessionStore::new();
        for session in writes {
            store.set_session(session.clone());
            let snapshot = store.snapshot();
            prop_assert_eq!(&snapshot, &session);
            prop_assert_eq!(snapshot.user().is_some(), snapshot.status() == SessionStatus::Authenticated);
        }
    }
}
