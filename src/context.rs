//! 应用上下文
//!
//! 会话存储、延迟意图、API 客户端与事件总线的组装点。
//! 组件通过 Context 注入获取，不做全局查找。

use crate::api::StoreApi;
use crate::bus::{EventBus, UiEvent};
use crate::gateway::{ApiGateway, SessionAccess};
use crate::intent::IntentSlot;
use crate::kv::{KEY_ROLE, KEY_TOKEN, KEY_USER};
use crate::session::{SessionSnapshot, SessionStore};
use crate::web::{BrowserStorage, FetchTransport};
use leptos::prelude::*;
use std::rc::Rc;

pub type AppApi = StoreApi<FetchTransport>;
pub type AppSessionStore = SessionStore<BrowserStorage>;
pub type AppIntentSlot = IntentSlot<BrowserStorage>;

/// 网关侧的会话桥接：读 token、销毁会话
struct SessionBridge {
    store: Rc<AppSessionStore>,
}

impl SessionAccess for SessionBridge {
    fn token(&self) -> Option<String> {
        self.store.snapshot().token
    }

    fn invalidate(&self) {
        self.store.clear_session();
    }
}

/// 应用级共享状态
#[derive(Clone)]
pub struct AppContext {
    pub session: Rc<AppSessionStore>,
    pub intent: Rc<AppIntentSlot>,
    pub api: AppApi,
    pub bus: Rc<EventBus>,
    /// 会话快照的信号镜像（只读消费）
    snapshot: RwSignal<SessionSnapshot>,
}

// `leptos::provide_context`/`use_context` require `Send + Sync` for arena storage,
// but this app only ever runs single-threaded in the browser (wasm32, no threads).
unsafe impl Send for AppContext {}
unsafe impl Sync for AppContext {}

impl AppContext {
    pub fn new(base_url: &str) -> Self {
        let session = Rc::new(SessionStore::new(BrowserStorage));
        let intent = Rc::new(IntentSlot::new(BrowserStorage));
        let bus = Rc::new(EventBus::new());

        // 会话变更镜像到信号，驱动视图层
        let snapshot = RwSignal::new(session.snapshot());
        session.subscribe(move |snap| snapshot.set(snap.clone()));

        // 跨标签页同步：storage 事件触发重新加载（最后写入为准）。
        // key 为 None 表示整库被清空（另一标签页登出）。
        {
            let session = session.clone();
            BrowserStorage::on_external_change(move |key| {
                let session_key = key
                    .map(|k| matches!(k.as_str(), KEY_TOKEN | KEY_ROLE | KEY_USER))
                    .unwrap_or(true);
                if session_key {
                    session.reload_from_backend();
                }
            });
        }

        let gateway = Rc::new(ApiGateway::new(
            FetchTransport,
            Rc::new(SessionBridge {
                store: session.clone(),
            }),
            base_url,
        ));
        {
            let bus = bus.clone();
            gateway.on_session_expired(move || bus.emit(UiEvent::SessionExpired));
        }

        Self {
            session,
            intent,
            api: StoreApi::new(gateway),
            bus,
            snapshot,
        }
    }

    /// 会话快照信号
    pub fn snapshot(&self) -> Signal<SessionSnapshot> {
        self.snapshot.read_only().into()
    }
}

/// 从 Context 获取应用上下文
pub fn use_app() -> AppContext {
    use_context::<AppContext>().expect("AppContext should be provided")
}
