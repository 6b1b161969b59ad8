//! 路由服务模块 - 核心引擎
//!
//! 封装 web_sys 的 History API，实现"监听 -> 守卫 -> 处理 -> 加载"
//! 的导航流程。守卫决策委托给纯函数 `guard::decide`，会话状态以
//! 信号注入，路由服务不直接持有会话存储。

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::route::AppRoute;
use crate::guard::{RouteDecision, decide};
use crate::session::SessionSnapshot;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 路由器服务
///
/// 所有对 window.history 的操作都集中在此模块。
/// 每次导航（主动调用、popstate、会话变化）都重新执行守卫决策。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    /// 会话快照（注入的信号，实现解耦）
    session: Signal<SessionSnapshot>,
}

impl RouterService {
    fn new(session: Signal<SessionSnapshot>) -> Self {
        let initial_route = AppRoute::from_path(&current_path());
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            session,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// **核心方法：导航与守卫**
    pub fn navigate(&self, path: &str) {
        self.navigate_to_route(AppRoute::from_path(path), true);
    }

    /// 对目标路由执行守卫决策，返回实际应加载的路由
    fn resolve(&self, target: AppRoute) -> AppRoute {
        let snapshot = self.session.get_untracked();
        match decide(&snapshot, &target.policy()) {
            RouteDecision::Allow => target,
            RouteDecision::RedirectTo(path) => {
                web_sys::console::log_1(
                    &format!("[Router] Access denied for {}, redirecting to {}", target, path)
                        .into(),
                );
                AppRoute::from_path(path)
            }
        }
    }

    /// 导航到指定路由
    ///
    /// # Arguments
    /// * `use_push` - true 使用 pushState, false 使用 replaceState
    fn navigate_to_route(&self, target: AppRoute, use_push: bool) {
        let resolved = self.resolve(target);
        let redirected = resolved != target;

        // 重定向一律用 replaceState，避免把被拒绝的地址留在历史里
        if use_push && !redirected {
            push_history_state(&resolved.to_path());
        } else {
            replace_history_state(&resolved.to_path());
        }
        self.set_route.set(resolved);
    }

    /// 初始化浏览器后退/前进按钮监听
    ///
    /// popstate 时同样执行守卫逻辑。
    fn init_popstate_listener(&self) {
        let this = *self;

        let closure = Closure::<dyn Fn()>::new(move || {
            let target = AppRoute::from_path(&current_path());
            this.navigate_to_route(target, false);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 会话变化时重新校验当前路由
    ///
    /// 登出时停留在受保护页面会被送回首页；管理员登录后访问店面
    /// 页面会被送到后台，反之亦然。
    fn setup_session_revalidation(&self) {
        let this = *self;
        let session = self.session;

        Effect::new(move |_| {
            // 追踪会话信号；路由本身用 untracked 读取
            let _ = session.get();
            let current = this.current_route.get_untracked();
            let resolved = this.resolve(current);
            if resolved != current {
                web_sys::console::log_1(
                    &format!("[Router] Session changed, moving to {}", resolved).into(),
                );
                replace_history_state(&resolved.to_path());
                this.set_route.set(resolved);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(session: Signal<SessionSnapshot>) -> RouterService {
    let router = RouterService::new(session);

    // 初始路由也要过守卫（直接打开受保护地址的场景）
    router.navigate_to_route(router.current_route.get_untracked(), false);
    router.init_popstate_listener();
    router.setup_session_revalidation();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 会话快照信号
    session: Signal<SessionSnapshot>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(session);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}
