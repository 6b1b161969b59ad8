use crate::components::confirm_dialog::ConfirmDialog;
use crate::components::icons::{Pencil, Trash2};
use crate::components::pagination::Pagination;
use crate::components::toast::NotificationToast;
use crate::context::use_app;
use crate::web::router::use_router;
use leptos::prelude::*;
use leptos::task::spawn_local;
use shopfront_shared::{AdminUser, DashboardStats, Order, PageMeta, Product, date};

pub mod product_form;

/// 后台标签页
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Overview,
    Products,
    Orders,
    Users,
}

impl Tab {
    const ALL: [Tab; 4] = [Tab::Overview, Tab::Products, Tab::Orders, Tab::Users];

    fn label(&self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Products => "Products",
            Tab::Orders => "Orders",
            Tab::Users => "Users",
        }
    }
}

/// 标签页数据
#[derive(Debug, Clone, PartialEq)]
enum TabData {
    Empty,
    Products(Vec<Product>),
    Orders(Vec<Order>),
    Users(Vec<AdminUser>),
}

/// 后台面板
///
/// 总览统计 + 商品/订单/用户三个分页列表；商品支持增删改入口，
/// 删除先过确认对话框，成功后刷新列表与统计。
#[component]
pub fn AdminDashboardPage() -> impl IntoView {
    let app = use_app();
    let router = use_router();

    let (active_tab, set_active_tab) = signal(Tab::Overview);
    let (active_page, set_active_page) = signal(1u32);
    let (stats, set_stats) = signal(Option::<DashboardStats>::None);
    let (data, set_data) = signal(TabData::Empty);
    let (meta, set_meta) = signal(Option::<PageMeta>::None);
    let (loading, set_loading) = signal(true);
    let (pending_delete, set_pending_delete) = signal(Option::<u64>::None);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None);

    let fetch_stats = {
        let app = app.clone();
        move || {
            let app = app.clone();
            spawn_local(async move {
                match app.api.admin_dashboard().await {
                    Ok(result) => set_stats.set(Some(result)),
                    // 鉴权失败由网关统一接管，这里只记录其余失败
                    Err(err) => web_sys::console::error_1(
                        &format!("[Admin] Failed to fetch dashboard stats: {}", err).into(),
                    ),
                }
                set_loading.set(false);
            });
        }
    };

    let fetch_tab = {
        let app = app.clone();
        move |tab: Tab, requested: u32| {
            let app = app.clone();
            set_loading.set(true);
            spawn_local(async move {
                let stale = || {
                    active_tab.get_untracked() != tab || active_page.get_untracked() != requested
                };
                let outcome = match tab {
                    Tab::Overview => Ok((TabData::Empty, None)),
                    Tab::Products => app
                        .api
                        .admin_products(requested)
                        .await
                        .map(|r| (TabData::Products(r.data), r.meta)),
                    Tab::Orders => app
                        .api
                        .admin_orders(requested)
                        .await
                        .map(|r| (TabData::Orders(r.data), r.meta)),
                    Tab::Users => app
                        .api
                        .admin_users(requested)
                        .await
                        .map(|r| (TabData::Users(r.data), r.meta)),
                };
                if stale() {
                    return;
                }
                match outcome {
                    Ok((tab_data, tab_meta)) => {
                        set_data.set(tab_data);
                        set_meta.set(tab_meta);
                    }
                    Err(err) => {
                        set_notification.set(Some((
                            format!("Failed to fetch {}: {}", tab.label(), err.user_message()),
                            true,
                        )));
                    }
                }
                set_loading.set(false);
            });
        }
    };

    // 初次加载统计
    {
        let fetch_stats = fetch_stats.clone();
        Effect::new(move |_| {
            fetch_stats();
        });
    }

    // 标签或页码变化时拉取列表
    {
        let fetch_tab = fetch_tab.clone();
        Effect::new(move |_| {
            let tab = active_tab.get();
            let page = active_page.get();
            if tab != Tab::Overview {
                fetch_tab(tab, page);
            } else {
                set_loading.set(false);
            }
        });
    }

    let confirm_delete = {
        let app = app.clone();
        let fetch_tab = fetch_tab.clone();
        let fetch_stats = fetch_stats.clone();
        move |_: ()| {
            let Some(id) = pending_delete.get_untracked() else {
                return;
            };
            set_pending_delete.set(None);
            let app = app.clone();
            let fetch_tab = fetch_tab.clone();
            let fetch_stats = fetch_stats.clone();
            spawn_local(async move {
                match app.api.admin_delete_product(id).await {
                    Ok(()) => {
                        set_notification
                            .set(Some(("Product has been deleted.".to_string(), false)));
                        fetch_tab(Tab::Products, active_page.get_untracked());
                        fetch_stats();
                    }
                    Err(err) => {
                        set_notification.set(Some((
                            format!("Failed to delete the product: {}", err.user_message()),
                            true,
                        )));
                    }
                }
            });
        }
    };

    let select_tab = move |tab: Tab| {
        set_active_page.set(1);
        set_active_tab.set(tab);
    };

    view! {
        <main class="min-h-screen bg-base-200 p-6 md:p-10">
            <NotificationToast notification=notification set_notification=set_notification />

            <div class="max-w-6xl mx-auto">
                // 标签切换
                <div class="tabs tabs-boxed bg-base-100 w-fit mb-8">
                    {Tab::ALL
                        .into_iter()
                        .map(|tab| {
                            view! {
                                <button
                                    class=move || {
                                        if active_tab.get() == tab {
                                            "tab tab-active"
                                        } else {
                                            "tab"
                                        }
                                    }
                                    on:click=move |_| select_tab(tab)
                                >
                                    {tab.label()}
                                </button>
                            }
                        })
                        .collect_view()}
                </div>

                <Show when=move || loading.get()>
                    <div class="flex justify-center items-center h-[50vh]">
                        <span class="loading loading-spinner loading-lg text-primary"></span>
                    </div>
                </Show>

                // 总览
                <Show when=move || {
                    !loading.get() && active_tab.get() == Tab::Overview && stats.get().is_some()
                }>
                    <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                        <div class="stat">
                            <div class="stat-title">"Users"</div>
                            <div class="stat-value text-primary">
                                {move || stats.get().map(|s| s.total_users).unwrap_or(0)}
                            </div>
                        </div>
                        <div class="stat">
                            <div class="stat-title">"Products"</div>
                            <div class="stat-value text-primary">
                                {move || stats.get().map(|s| s.total_products).unwrap_or(0)}
                            </div>
                        </div>
                        <div class="stat">
                            <div class="stat-title">"Revenue"</div>
                            <div class="stat-value text-primary">
                                "₹"
                                {move || {
                                    stats
                                        .get()
                                        .map(|s| s.total_revenue.to_string())
                                        .unwrap_or_default()
                                }}
                            </div>
                        </div>
                    </div>
                </Show>

                // 商品列表
                <Show when=move || !loading.get() && active_tab.get() == Tab::Products>
                    <div class="card bg-base-100 shadow-xl p-6">
                        <div class="flex justify-between items-center mb-4">
                            <h2 class="text-2xl font-semibold text-primary">"Products"</h2>
                            <button
                                class="btn btn-primary btn-sm"
                                on:click=move |_| router.navigate("/admin/products/create")
                            >
                                "Add Product"
                            </button>
                        </div>

                        {move || {
                            let TabData::Products(products) = data.get() else {
                                return ().into_any();
                            };
                            if products.is_empty() {
                                return view! {
                                    <p class="text-base-content/50">"No products found."</p>
                                }
                                    .into_any();
                            }
                            view! {
                                <div class="overflow-x-auto">
                                    <table class="table table-zebra w-full">
                                        <thead>
                                            <tr>
                                                <th>"ID"</th>
                                                <th>"Name"</th>
                                                <th>"Price"</th>
                                                <th>"Stock"</th>
                                                <th class="text-center">"Actions"</th>
                                            </tr>
                                        </thead>
                                        <tbody>
                                            {products
                                                .into_iter()
                                                .map(|product| {
                                                    let id = product.id;
                                                    view! {
                                                        <tr>
                                                            <td>{product.id}</td>
                                                            <td>{product.name.clone()}</td>
                                                            <td>"₹" {product.price.to_string()}</td>
                                                            <td>{product.stock}</td>
                                                            <td class="text-center space-x-2">
                                                                <button
                                                                    class="btn btn-ghost btn-xs text-info"
                                                                    title="Edit"
                                                                    on:click=move |_| {
                                                                        router
                                                                            .navigate(
                                                                                &format!(
                                                                                    "/admin/products/edit/{}/{}",
                                                                                    id,
                                                                                    active_page.get_untracked(),
                                                                                ),
                                                                            )
                                                                    }
                                                                >
                                                                    <Pencil attr:class="h-4 w-4" />
                                                                </button>
                                                                <button
                                                                    class="btn btn-ghost btn-xs text-error"
                                                                    title="Delete"
                                                                    on:click=move |_| set_pending_delete.set(Some(id))
                                                                >
                                                                    <Trash2 attr:class="h-4 w-4" />
                                                                </button>
                                                            </td>
                                                        </tr>
                                                    }
                                                })
                                                .collect_view()}
                                        </tbody>
                                    </table>
                                </div>
                            }
                                .into_any()
                        }}

                        <div class="mt-4">
                            <Pagination meta=meta on_page=move |p| set_active_page.set(p) />
                        </div>
                    </div>
                </Show>

                // 订单列表
                <Show when=move || !loading.get() && active_tab.get() == Tab::Orders>
                    <div class="card bg-base-100 shadow-xl p-6">
                        <h2 class="text-2xl font-semibold text-primary mb-4">"Orders"</h2>
                        {move || {
                            let TabData::Orders(orders) = data.get() else {
                                return ().into_any();
                            };
                            if orders.is_empty() {
                                return view! {
                                    <p class="text-base-content/50">"No orders found."</p>
                                }
                                    .into_any();
                            }
                            view! {
                                <ul class="space-y-3">
                                    {orders
                                        .into_iter()
                                        .map(|order| {
                                            let placed = order
                                                .created_at
                                                .map(|dt| date::format_display(&dt))
                                                .unwrap_or_default();
                                            view! {
                                                <li class="p-4 bg-base-200 rounded-lg">
                                                    <div class="flex justify-between">
                                                        <span>"Order #" {order.id}</span>
                                                        <span class="badge badge-outline">
                                                            {order.status.to_string()}
                                                        </span>
                                                    </div>
                                                    <p class="text-sm text-base-content/50">
                                                        "Total: ₹" {order.total.to_string()} " | Placed on "
                                                        {placed}
                                                    </p>
                                                </li>
                                            }
                                        })
                                        .collect_view()}
                                </ul>
                            }
                                .into_any()
                        }}
                        <div class="mt-4">
                            <Pagination meta=meta on_page=move |p| set_active_page.set(p) />
                        </div>
                    </div>
                </Show>

                // 用户列表
                <Show when=move || !loading.get() && active_tab.get() == Tab::Users>
                    <div class="card bg-base-100 shadow-xl p-6">
                        <h2 class="text-2xl font-semibold text-primary mb-4">"Users"</h2>
                        {move || {
                            let TabData::Users(users) = data.get() else {
                                return ().into_any();
                            };
                            if users.is_empty() {
                                return view! {
                                    <p class="text-base-content/50">"No users found."</p>
                                }
                                    .into_any();
                            }
                            view! {
                                <ul class="space-y-3">
                                    {users
                                        .into_iter()
                                        .map(|user| {
                                            view! {
                                                <li class="p-4 bg-base-200 rounded-lg flex justify-between">
                                                    <span>{user.name.clone()}</span>
                                                    <span class="text-base-content/50">
                                                        {user.email.clone()}
                                                    </span>
                                                </li>
                                            }
                                        })
                                        .collect_view()}
                                </ul>
                            }
                                .into_any()
                        }}
                        <div class="mt-4">
                            <Pagination meta=meta on_page=move |p| set_active_page.set(p) />
                        </div>
                    </div>
                </Show>
            </div>

            <ConfirmDialog
                open=Signal::derive(move || pending_delete.get().is_some())
                title="Are you sure?"
                message="This action will permanently delete the product!"
                confirm_label="Yes, delete it!"
                cancel_label="Cancel"
                on_confirm=confirm_delete
                on_cancel=move |_: ()| set_pending_delete.set(None)
            />
        </main>
    }
}
