use super::*;
use shopfront_shared::Role;

fn anonymous() -> SessionSnapshot {
    SessionSnapshot::default()
}

fn session(role: Role) -> SessionSnapshot {
    SessionSnapshot {
        token: Some("tok".into()),
        role: Some(role),
        profile: None,
    }
}

const PUBLIC: RoutePolicy = RoutePolicy::PUBLIC;
const USER_ONLY: RoutePolicy = RoutePolicy::allow(&[Role::User]);
const ADMIN_ONLY: RoutePolicy = RoutePolicy::allow(&[Role::Admin]);
const NO_ADMINS: RoutePolicy = RoutePolicy::restrict(&[Role::Admin]);

/// Full decision table: 3 sessions x 4 policies, every outcome pinned.
#[test]
fn decision_table_is_total() {
    use RouteDecision::*;

    let cases: [(SessionSnapshot, RoutePolicy, RouteDecision); 12] = [
        // anonymous
        (anonymous(), PUBLIC, Allow),
        (anonymous(), USER_ONLY, RedirectTo("/")),
        (anonymous(), ADMIN_ONLY, RedirectTo("/")),
        // restriction-only routes stay reachable while logged out
        (anonymous(), NO_ADMINS, Allow),
        // user
        (session(Role::User), PUBLIC, Allow),
        (session(Role::User), USER_ONLY, Allow),
        (session(Role::User), ADMIN_ONLY, RedirectTo("/")),
        (session(Role::User), NO_ADMINS, Allow),
        // admin
        (session(Role::Admin), PUBLIC, Allow),
        (session(Role::Admin), USER_ONLY, RedirectTo("/")),
        (session(Role::Admin), ADMIN_ONLY, Allow),
        (session(Role::Admin), NO_ADMINS, RedirectTo("/admin")),
    ];

    for (snapshot, policy, expected) in cases {
        assert_eq!(
            decide(&snapshot, &policy),
            expected,
            "session={:?} policy={:?}",
            snapshot.role,
            policy
        );
    }
}

/// Restriction wins even when the role is also in the allowed set.
#[test]
fn restriction_takes_precedence_over_allowance() {
    let policy = RoutePolicy {
        allowed: &[Role::Admin],
        restricted: &[Role::Admin],
    };
    assert_eq!(
        decide(&session(Role::Admin), &policy),
        RouteDecision::RedirectTo("/admin")
    );
}

/// A token without a role violates the session invariant; treat as anonymous.
#[test]
fn half_session_is_anonymous() {
    let broken = SessionSnapshot {
        token: Some("tok".into()),
        role: None,
        profile: None,
    };
    assert_eq!(decide(&broken, &USER_ONLY), RouteDecision::RedirectTo("/"));
    assert_eq!(decide(&broken, &NO_ADMINS), RouteDecision::Allow);
}
