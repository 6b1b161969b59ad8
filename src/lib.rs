//! Shopfront 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `session` / `intent` / `guard` / `gateway` / `badge`: 会话与购物车
//!   协调核心，纯 Rust，可在宿主环境测试
//! - `web`: 浏览器原生 API 的薄适配层（存储、fetch、History 路由）
//! - `components` / `pages`: UI 组件层

mod api;
mod auth_flow;
mod badge;
mod bus;
mod context;
mod error;
mod gateway;
mod guard;
mod intent;
mod kv;
mod session;

mod components {
    pub mod auth_modal;
    pub mod confirm_dialog;
    pub mod icons;
    pub mod navbar;
    pub mod pagination;
    pub mod toast;
}

mod pages {
    pub mod admin;
    pub mod cart;
    pub mod home;
    pub mod orders;
    pub mod product_detail;
}

// 浏览器原生 API 封装模块
pub(crate) mod web {
    pub mod http;
    pub mod route;
    pub mod router;
    mod storage;
    mod timer;

    pub use http::FetchTransport;
    pub use storage::BrowserStorage;
    pub use timer::Interval;
}

use crate::bus::UiEvent;
use crate::components::auth_modal::AuthModal;
use crate::components::confirm_dialog::ConfirmDialog;
use crate::components::navbar::Navbar;
use crate::context::AppContext;
use crate::pages::admin::AdminDashboardPage;
use crate::pages::admin::product_form::{ProductFormMode, ProductFormPage};
use crate::pages::cart::CartPage;
use crate::pages::home::HomePage;
use crate::pages::orders::OrdersPage;
use crate::pages::product_detail::ProductDetailPage;
use crate::web::route::AppRoute;
use crate::web::router::{Router, RouterOutlet, use_router};

use leptos::prelude::*;
use shopfront_shared::DEFAULT_API_BASE_URL;

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Home => view! { <HomePage /> }.into_any(),
        AppRoute::ProductDetail(id) => view! { <ProductDetailPage id=id /> }.into_any(),
        AppRoute::Cart => view! { <CartPage /> }.into_any(),
        AppRoute::Orders => view! { <OrdersPage /> }.into_any(),
        AppRoute::Admin => view! { <AdminDashboardPage /> }.into_any(),
        AppRoute::AdminProductCreate => {
            view! { <ProductFormPage mode=ProductFormMode::Create /> }.into_any()
        }
        AppRoute::AdminProductEdit { id, page } => {
            view! { <ProductFormPage mode={ProductFormMode::Edit { id, page }} /> }.into_any()
        }
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

/// 会话过期对话框
///
/// 网关发出过期信号后给访客两个选择：重新登录或回到首页。
#[component]
fn SessionExpiredGate(
    open: ReadSignal<bool>,
    set_open: WriteSignal<bool>,
    set_show_auth: WriteSignal<bool>,
) -> impl IntoView {
    let router = use_router();

    view! {
        <ConfirmDialog
            open=open
            title="Session expired"
            message="Your session has expired. Please login again."
            confirm_label="Login"
            cancel_label="Cancel"
            on_confirm=move |_: ()| {
                set_open.set(false);
                set_show_auth.set(true);
            }
            on_cancel=move |_: ()| {
                set_open.set(false);
                router.navigate("/");
            }
        />
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 组装应用上下文（会话、意图、网关、总线）
    let app_ctx = AppContext::new(DEFAULT_API_BASE_URL);
    provide_context(app_ctx.clone());

    let session = app_ctx.snapshot();

    // 2. 全局弹层状态：认证弹窗与会话过期对话框
    let (show_auth, set_show_auth) = signal(false);
    let (session_expired, set_session_expired) = signal(false);

    app_ctx.bus.subscribe(move |event| match event {
        UiEvent::OpenAuthModal => set_show_auth.set(true),
        UiEvent::SessionExpired => set_session_expired.set(true),
        // 角标刷新由导航栏自行订阅
        UiEvent::RefreshCartBadge => {}
    });

    // 认证被放弃（弹窗关闭而未登录成功）时丢弃延迟加购意图；
    // 成功路径里意图已被消费，重复丢弃是无害的空操作
    let intent = StoredValue::new_local(app_ctx.intent.clone());
    let close_auth = move |_: ()| {
        set_show_auth.set(false);
        intent.with_value(|intent| intent.discard());
    };

    view! {
        // 3. 路由器注入会话信号实现守卫
        <Router session=session>
            <Navbar />
            <RouterOutlet matcher=route_matcher />

            <Show when=move || show_auth.get()>
                <AuthModal on_close=close_auth />
            </Show>

            <SessionExpiredGate
                open=session_expired
                set_open=set_session_expired
                set_show_auth=set_show_auth
            />
        </Router>
    }
}
