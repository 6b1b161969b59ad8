use super::*;
use crate::badge::{CartBadge, CartCountSource};
use crate::kv::tests::MemoryKv;
use std::cell::RefCell;
use std::rc::Rc;

// =========================================================
// Shared Mock Components
// =========================================================

struct TestContext {
    /// Operation log to verify calling order and counts
    log: RefCell<Vec<String>>,
    /// Role the fake API assigns on successful auth
    role: RefCell<Role>,
    /// Whether login/register should fail
    fail_auth: RefCell<bool>,
    /// Whether cart-add should fail
    fail_cart: RefCell<bool>,
    /// Line items the fake cart currently holds
    cart_items: RefCell<usize>,
}

impl TestContext {
    fn new() -> Rc<Self> {
        Rc::new(Self {
            log: RefCell::new(Vec::new()),
            role: RefCell::new(Role::User),
            fail_auth: RefCell::new(false),
            fail_cart: RefCell::new(false),
            cart_items: RefCell::new(0),
        })
    }

    fn auth_response(&self) -> AuthResponse {
        let role = *self.role.borrow();
        AuthResponse {
            token: "tok-fresh".into(),
            user: serde_json::from_str(&format!(
                r#"{{"id":1,"name":"Ada","email":"ada@example.com","role":"{}"}}"#,
                role.as_str()
            ))
            .unwrap(),
        }
    }

    fn cart_add_count(&self) -> usize {
        self.log
            .borrow()
            .iter()
            .filter(|entry| entry.starts_with("cart:add"))
            .count()
    }
}

struct TestApi {
    ctx: Rc<TestContext>,
}

#[async_trait(?Send)]
impl AuthBackend for TestApi {
    async fn login(&self, request: &LoginRequest) -> StoreResult<AuthResponse> {
        self.ctx
            .log
            .borrow_mut()
            .push(format!("auth:login:{}", request.email));
        if *self.ctx.fail_auth.borrow() {
            return Err(StoreError::unauthorized("Invalid credentials"));
        }
        Ok(self.ctx.auth_response())
    }

    async fn register(&self, request: &RegisterRequest) -> StoreResult<AuthResponse> {
        self.ctx
            .log
            .borrow_mut()
            .push(format!("auth:register:{}", request.email));
        if *self.ctx.fail_auth.borrow() {
            return Err(StoreError::validation(
                "Email already taken.".to_string(),
                vec!["Email already taken.".into()],
            ));
        }
        Ok(self.ctx.auth_response())
    }

    async fn add_cart_item(&self, product_id: u64, quantity: u32) -> StoreResult<()> {
        self.ctx
            .log
            .borrow_mut()
            .push(format!("cart:add:{}:{}", product_id, quantity));
        if *self.ctx.fail_cart.borrow() {
            return Err(StoreError::server("cart unavailable"));
        }
        *self.ctx.cart_items.borrow_mut() += 1;
        Ok(())
    }
}

#[async_trait(?Send)]
impl CartCountSource for TestApi {
    async fn line_item_count(&self) -> StoreResult<usize> {
        self.ctx.log.borrow_mut().push("cart:count".into());
        Ok(*self.ctx.cart_items.borrow())
    }
}

struct TestEnv {
    ctx: Rc<TestContext>,
    kv: Rc<MemoryKv>,
    session: Rc<SessionStore<Rc<MemoryKv>>>,
    intent: Rc<IntentSlot<Rc<MemoryKv>>>,
    flow: AuthFlow<TestApi, Rc<MemoryKv>>,
}

fn setup() -> TestEnv {
    let ctx = TestContext::new();
    let kv = Rc::new(MemoryKv::new());
    let session = Rc::new(SessionStore::new(kv.clone()));
    let intent = Rc::new(IntentSlot::new(kv.clone()));
    let flow = AuthFlow::new(
        TestApi { ctx: ctx.clone() },
        session.clone(),
        intent.clone(),
    );
    TestEnv {
        ctx,
        kv,
        session,
        intent,
        flow,
    }
}

fn login_form() -> AuthForm {
    AuthForm {
        name: String::new(),
        email: "ada@example.com".into(),
        password: "secret".into(),
    }
}

// =========================================================
// Tests
// =========================================================

#[tokio::test]
async fn login_replays_stored_intent_exactly_once() {
    let env = setup();
    env.intent.defer(7, 3);

    let outcome = env.flow.submit(AuthMode::Login, &login_form()).await.unwrap();

    assert_eq!(outcome.role, Role::User);
    assert!(outcome.replayed);
    assert!(outcome.replay_error.is_none());

    let log = env.ctx.log.borrow();
    assert_eq!(
        *log,
        vec![
            "auth:login:ada@example.com".to_string(),
            "cart:add:7:3".to_string(),
        ]
    );
    drop(log);

    // Intent is gone: a second take finds nothing
    assert_eq!(env.intent.take_if_present(), None);
    assert!(!env.kv.contains("pendingAddToCart"));
}

#[tokio::test]
async fn failed_replay_still_clears_the_intent() {
    let env = setup();
    env.intent.defer(7, 3);
    *env.ctx.fail_cart.borrow_mut() = true;

    let outcome = env.flow.submit(AuthMode::Login, &login_form()).await.unwrap();

    assert!(outcome.replayed);
    assert!(outcome.replay_error.is_some());
    assert_eq!(env.ctx.cart_add_count(), 1);
    // Cleared regardless of the replay result: no second attempt possible
    assert!(!env.kv.contains("pendingAddToCart"));
}

#[tokio::test]
async fn admin_login_discards_intent_without_replay() {
    let env = setup();
    env.intent.defer(7, 3);
    *env.ctx.role.borrow_mut() = Role::Admin;

    let outcome = env.flow.submit(AuthMode::Login, &login_form()).await.unwrap();

    assert_eq!(outcome.role, Role::Admin);
    assert!(!outcome.replayed);
    assert_eq!(env.ctx.cart_add_count(), 0);
    assert!(!env.kv.contains("pendingAddToCart"));
}

#[tokio::test]
async fn login_without_intent_replays_nothing() {
    let env = setup();

    let outcome = env.flow.submit(AuthMode::Login, &login_form()).await.unwrap();

    assert!(!outcome.replayed);
    assert_eq!(env.ctx.cart_add_count(), 0);
}

#[tokio::test]
async fn failed_login_leaves_session_and_intent_untouched() {
    let env = setup();
    env.intent.defer(7, 3);
    *env.ctx.fail_auth.borrow_mut() = true;

    let err = env
        .flow
        .submit(AuthMode::Login, &login_form())
        .await
        .unwrap_err();

    assert!(err.is_unauthorized());
    assert!(!env.session.snapshot().is_authenticated());
    // A failed attempt is not abandonment: the intent stays for a retry
    // within the still-open flow (discard happens when the flow is closed)
    assert!(env.kv.contains("pendingAddToCart"));
}

#[tokio::test]
async fn register_sets_session_with_default_user_role() {
    let env = setup();

    let form = AuthForm {
        name: "Ada".into(),
        email: "ada@example.com".into(),
        password: "secret".into(),
    };
    let outcome = env.flow.submit(AuthMode::Register, &form).await.unwrap();

    assert_eq!(outcome.role, Role::User);
    let snap = env.session.snapshot();
    assert_eq!(snap.token.as_deref(), Some("tok-fresh"));
    assert_eq!(snap.role, Some(Role::User));
    assert_eq!(snap.profile.unwrap().name, "Ada");
}

/// End-to-end: anonymous visitor defers (7, 3), authenticates as a user,
/// the intent is replayed as a single cart add, cleared, and the badge
/// refresh reflects the new cart.
#[tokio::test]
async fn deferred_add_to_cart_end_to_end() {
    let env = setup();

    // Anonymous visitor on the product page: quantity 3, product 7
    assert!(!env.session.snapshot().is_authenticated());
    env.intent.defer(7, 3);

    // Authentication prompt -> valid credentials for a `user` account
    let outcome = env.flow.submit(AuthMode::Login, &login_form()).await.unwrap();
    assert_eq!(outcome.role, Role::User);
    assert!(outcome.replayed);

    // Badge refresh sees the replayed line item
    let badge = CartBadge::new(TestApi { ctx: env.ctx.clone() }, env.session.clone());
    assert_eq!(badge.refresh().await.unwrap(), 1);

    let log = env.ctx.log.borrow();
    assert_eq!(
        *log,
        vec![
            "auth:login:ada@example.com".to_string(),
            "cart:add:7:3".to_string(),
            "cart:count".to_string(),
        ]
    );
    drop(log);
    assert!(!env.kv.contains("pendingAddToCart"));
}
