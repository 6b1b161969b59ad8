use crate::badge::CartBadge;
use crate::bus::UiEvent;
use crate::components::icons::{LogOut, ShoppingCart, X};
use crate::context::use_app;
use crate::web::router::use_router;
use leptos::prelude::*;
use leptos::task::spawn_local;
use shopfront_shared::{Role, date};
use std::rc::Rc;

/// 顶部导航栏
///
/// 持有购物车角标的视图状态；角标数量由同步器派生，
/// 在初次加载、token 变化和总线刷新信号时重算。
#[component]
pub fn Navbar() -> impl IntoView {
    let app = use_app();
    let router = use_router();
    let session = app.snapshot();

    let (show_profile, set_show_profile) = signal(false);

    // 角标同步器：数量变化接到信号上
    let badge = Rc::new(CartBadge::new(app.api.clone(), app.session.clone()));
    let (cart_count, set_cart_count) = signal(badge.count());
    badge.on_change(move |count| set_cart_count.set(count));

    let do_refresh = {
        let badge = badge.clone();
        move || {
            let badge = badge.clone();
            spawn_local(async move {
                if let Err(err) = badge.refresh().await {
                    web_sys::console::error_1(
                        &format!("[Badge] Cart count refresh failed: {}", err).into(),
                    );
                }
            });
        }
    };

    // 初次加载 + token 变化时刷新
    let token = Memo::new(move |_| session.get().token);
    {
        let do_refresh = do_refresh.clone();
        Effect::new(move |_| {
            let _ = token.get();
            do_refresh();
        });
    }

    // 任意组件完成购物车变更后经总线触发刷新
    app.bus.subscribe(move |event| {
        if event == UiEvent::RefreshCartBadge {
            do_refresh();
        }
    });

    let is_admin = move || session.get().has_role(Role::Admin);
    let is_user = move || session.get().has_role(Role::User);
    let is_authenticated = move || session.get().is_authenticated();

    // 视图内的闭包必须 Send，Rc 持有的上下文经由 local StoredValue 间接捕获
    let app = StoredValue::new_local(app);

    let open_profile = move |_| {
        if !is_authenticated() {
            app.with_value(|app| app.bus.emit(UiEvent::OpenAuthModal));
            return;
        }
        set_show_profile.set(true);
        // 懒加载最新资料；会话已失效时由存储层丢弃回写
        let app = app.get_value();
        spawn_local(async move {
            match app.api.me().await {
                Ok(response) => app.session.set_profile(response.user),
                Err(err) => web_sys::console::error_1(
                    &format!("[Navbar] Failed to fetch profile: {}", err).into(),
                ),
            }
        });
    };

    let on_logout = move |_| {
        app.with_value(|app| app.session.clear_session());
        set_show_profile.set(false);
        router.navigate("/");
    };

    let nav_to = move |path: &'static str| move |_| router.navigate(path);

    view! {
        <nav class="navbar bg-base-100 shadow-lg px-4 md:px-8">
            <div class="flex-1">
                <Show
                    when=is_admin
                    fallback=move || {
                        view! {
                            <button class="btn btn-ghost text-xl text-primary" on:click=nav_to("/")>
                                "Demo E-Commerce"
                            </button>
                        }
                    }
                >
                    <button class="btn btn-ghost text-xl text-primary" on:click=nav_to("/admin")>
                        "Admin Panel"
                    </button>
                </Show>
            </div>

            <div class="flex-none items-center gap-3">
                <Show when=is_user>
                    <button class="btn btn-ghost btn-sm" on:click=nav_to("/orders")>
                        "My Orders"
                    </button>
                </Show>

                <Show when=move || !is_admin()>
                    <button class="btn btn-ghost btn-circle" on:click=nav_to("/cart")>
                        <div class="indicator">
                            <ShoppingCart attr:class="h-6 w-6" />
                            <Show when=move || (cart_count.get() > 0)>
                                <span class="badge badge-sm badge-primary indicator-item">
                                    {move || cart_count.get()}
                                </span>
                            </Show>
                        </div>
                    </button>

                    <button class="btn btn-primary btn-sm" on:click=open_profile>
                        {move || {
                            if is_authenticated() { "My Account" } else { "Login / Register" }
                        }}
                    </button>
                </Show>

                <Show when=is_authenticated>
                    <button class="btn btn-outline btn-error btn-sm gap-2" on:click=on_logout>
                        <LogOut attr:class="h-4 w-4" /> "Logout"
                    </button>
                </Show>
            </div>

            // 资料弹层
            <Show when=move || show_profile.get() && session.get().profile.is_some()>
                <div class="absolute right-8 top-16 card bg-base-200 border border-base-300 w-80 shadow-xl z-50">
                    <div class="card-body p-5">
                        <div class="flex justify-between items-center">
                            <h3 class="card-title text-primary">"Profile"</h3>
                            <button
                                class="btn btn-ghost btn-xs btn-circle"
                                on:click=move |_| set_show_profile.set(false)
                            >
                                <X attr:class="h-4 w-4" />
                            </button>
                        </div>
                        {move || {
                            session
                                .get()
                                .profile
                                .map(|profile| {
                                    view! {
                                        <div class="space-y-1 text-sm">
                                            <p>
                                                <span class="font-semibold">"Name: "</span>
                                                {profile.name.clone()}
                                            </p>
                                            <p>
                                                <span class="font-semibold">"Email: "</span>
                                                {profile.email.clone()}
                                            </p>
                                            {profile
                                                .created_at
                                                .map(|dt| {
                                                    view! {
                                                        <p class="text-xs text-base-content/50">
                                                            "Member since: " {date::format_display(&dt)}
                                                        </p>
                                                    }
                                                })}
                                        </div>
                                    }
                                })
                        }}
                    </div>
                </div>
            </Show>
        </nav>
    }
}
