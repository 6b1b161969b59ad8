use super::*;
use crate::error::StoreError;
use crate::kv::tests::MemoryKv;
use shopfront_shared::Role;

// =========================================================
// Mock count source
// =========================================================

struct TestContext {
    calls: RefCell<u32>,
    count: RefCell<usize>,
    fail: RefCell<bool>,
    /// Cleared mid-request to simulate a logout racing the response
    session_to_clear: RefCell<Option<Rc<SessionStore<Rc<MemoryKv>>>>>,
}

impl TestContext {
    fn new() -> Rc<Self> {
        Rc::new(Self {
            calls: RefCell::new(0),
            count: RefCell::new(0),
            fail: RefCell::new(false),
            session_to_clear: RefCell::new(None),
        })
    }
}

struct TestSource {
    ctx: Rc<TestContext>,
}

#[async_trait(?Send)]
impl CartCountSource for TestSource {
    async fn line_item_count(&self) -> StoreResult<usize> {
        *self.ctx.calls.borrow_mut() += 1;
        if *self.ctx.fail.borrow() {
            return Err(StoreError::server("cart unavailable"));
        }
        // The session may be torn down while this "request" is in flight
        if let Some(session) = self.ctx.session_to_clear.borrow_mut().take() {
            session.clear_session();
        }
        Ok(*self.ctx.count.borrow())
    }
}

fn setup(ctx: &Rc<TestContext>) -> (Rc<SessionStore<Rc<MemoryKv>>>, CartBadge<TestSource, Rc<MemoryKv>>) {
    let session = Rc::new(SessionStore::new(Rc::new(MemoryKv::new())));
    let badge = CartBadge::new(TestSource { ctx: ctx.clone() }, session.clone());
    (session, badge)
}

// =========================================================
// Tests
// =========================================================

#[tokio::test]
async fn anonymous_refresh_zeroes_without_network() {
    let ctx = TestContext::new();
    let (_, badge) = setup(&ctx);

    assert_eq!(badge.refresh().await.unwrap(), 0);
    assert_eq!(*ctx.calls.borrow(), 0);
}

#[tokio::test]
async fn refresh_reflects_server_line_items() {
    let ctx = TestContext::new();
    let (session, badge) = setup(&ctx);
    session.set_session("tok".into(), Role::User, None);
    *ctx.count.borrow_mut() = 4;

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    badge.on_change(move |n| sink.borrow_mut().push(n));

    assert_eq!(badge.refresh().await.unwrap(), 4);
    assert_eq!(badge.count(), 4);
    assert_eq!(*seen.borrow(), vec![4]);
}

/// Two back-to-back refreshes against an unchanged cart: same count both
/// times, one network call each — no duplicate-count artifacts.
#[tokio::test]
async fn refresh_is_idempotent() {
    let ctx = TestContext::new();
    let (session, badge) = setup(&ctx);
    session.set_session("tok".into(), Role::User, None);
    *ctx.count.borrow_mut() = 2;

    assert_eq!(badge.refresh().await.unwrap(), 2);
    assert_eq!(badge.refresh().await.unwrap(), 2);
    assert_eq!(badge.count(), 2);
    assert_eq!(*ctx.calls.borrow(), 2);
}

#[tokio::test]
async fn failure_keeps_prior_count() {
    let ctx = TestContext::new();
    let (session, badge) = setup(&ctx);
    session.set_session("tok".into(), Role::User, None);

    *ctx.count.borrow_mut() = 3;
    badge.refresh().await.unwrap();

    *ctx.fail.borrow_mut() = true;
    assert!(badge.refresh().await.is_err());
    assert_eq!(badge.count(), 3);
}

/// A logout that lands while the count request is in flight must win:
/// the late response is dropped instead of resurrecting a stale count.
#[tokio::test]
async fn stale_response_after_logout_is_dropped() {
    let ctx = TestContext::new();
    let (session, badge) = setup(&ctx);
    session.set_session("tok".into(), Role::User, None);

    *ctx.count.borrow_mut() = 5;
    badge.refresh().await.unwrap();
    assert_eq!(badge.count(), 5);

    // Cart "grows" to 9, but the session dies while the request is in flight
    *ctx.count.borrow_mut() = 9;
    *ctx.session_to_clear.borrow_mut() = Some(session.clone());
    badge.refresh().await.unwrap();

    // The late 9 is dropped; the next (anonymous) refresh zeroes the badge
    assert_eq!(badge.count(), 5);
    assert_eq!(badge.refresh().await.unwrap(), 0);
    assert_eq!(badge.count(), 0);
}
