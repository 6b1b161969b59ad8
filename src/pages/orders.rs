use crate::components::icons::X;
use crate::components::pagination::Pagination;
use crate::components::toast::NotificationToast;
use crate::context::use_app;
use crate::web::router::use_router;
use leptos::prelude::*;
use leptos::task::spawn_local;
use shopfront_shared::{Order, OrderStatus, PageMeta, date};

fn status_badge_class(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Completed => "badge badge-success badge-outline",
        OrderStatus::Pending => "badge badge-warning badge-outline",
        OrderStatus::Other => "badge badge-ghost",
    }
}

/// 订单历史页
#[component]
pub fn OrdersPage() -> impl IntoView {
    let app = use_app();
    let router = use_router();

    let (orders, set_orders) = signal(Vec::<Order>::new());
    let (meta, set_meta) = signal(Option::<PageMeta>::None);
    let (page, set_page) = signal(1u32);
    let (loading, set_loading) = signal(true);
    let (selected_order, set_selected_order) = signal(Option::<Order>::None);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None);

    // 视图内的闭包必须 Send，上下文经 local StoredValue 捕获
    let app = StoredValue::new_local(app);

    Effect::new(move |_| {
        let requested = page.get();
        let app = app.get_value();
        spawn_local(async move {
            let result = app.api.orders(requested).await;
            if page.get_untracked() != requested {
                return;
            }
            match result {
                Ok(result) => {
                    set_orders.set(result.data);
                    set_meta.set(result.meta);
                }
                Err(err) => {
                    set_notification.set(Some((
                        format!("Failed to fetch order history: {}", err.user_message()),
                        true,
                    )));
                }
            }
            set_loading.set(false);
        });
    });

    let open_order = move |id: u64| {
        let app = app.get_value();
        spawn_local(async move {
            match app.api.order(id).await {
                Ok(order) => set_selected_order.set(Some(order)),
                Err(err) => {
                    set_notification.set(Some((
                        format!("Failed to load order details: {}", err.user_message()),
                        true,
                    )));
                }
            }
        });
    };

    let placed_on = |order: &Order| {
        order
            .created_at
            .map(|dt| format!("Placed on: {}", date::format_display(&dt)))
            .unwrap_or_default()
    };

    view! {
        <main class="min-h-screen bg-base-200 p-6 md:p-10">
            <NotificationToast notification=notification set_notification=set_notification />

            <Show when=move || loading.get()>
                <div class="flex justify-center items-center h-[60vh]">
                    <span class="loading loading-spinner loading-lg text-primary"></span>
                </div>
            </Show>

            <Show when=move || !loading.get()>
                <div class="max-w-4xl mx-auto">
                    <div class="flex flex-col md:flex-row md:items-center md:justify-between mb-8 gap-4">
                        <h1 class="text-4xl font-bold text-primary">"My Orders"</h1>
                        <div class="flex items-center gap-4">
                            <Pagination meta=meta on_page=move |p| set_page.set(p) />
                            <button
                                class="btn btn-sm btn-ghost"
                                on:click=move |_| router.navigate("/")
                            >
                                "Back"
                            </button>
                        </div>
                    </div>

                    <Show when=move || orders.with(|o| o.is_empty())>
                        <p class="text-base-content/50">"You have no orders yet."</p>
                    </Show>

                    <div class="space-y-4">
                        <For
                            each=move || orders.get()
                            key=|order| order.id
                            children=move |order| {
                                let id = order.id;
                                let placed = placed_on(&order);
                                view! {
                                    <div
                                        class="card bg-base-100 shadow-md p-5 cursor-pointer hover:bg-base-300 transition"
                                        on:click=move |_| open_order(id)
                                    >
                                        <div class="flex justify-between items-center">
                                            <div>
                                                <p class="text-primary font-semibold">
                                                    "Order #" {order.id}
                                                </p>
                                                <p class="text-sm text-base-content/50">{placed}</p>
                                            </div>
                                            <div class="text-right space-y-1">
                                                <p class="font-semibold text-primary">
                                                    "₹" {order.total.to_string()}
                                                </p>
                                                <span class=status_badge_class(order.status)>
                                                    {order.status.to_string()}
                                                </span>
                                            </div>
                                        </div>
                                    </div>
                                }
                            }
                        />
                    </div>
                </div>
            </Show>

            // 订单详情弹层
            <Show when=move || selected_order.get().is_some()>
                <div class="modal modal-open">
                    <div class="modal-box max-w-lg">
                        <button
                            class="btn btn-sm btn-circle btn-ghost absolute right-3 top-3"
                            on:click=move |_| set_selected_order.set(None)
                        >
                            <X attr:class="h-4 w-4" />
                        </button>

                        {move || {
                            selected_order
                                .get()
                                .map(|order| {
                                    let placed = order
                                        .created_at
                                        .map(|dt| format!(
                                            "Placed on: {}",
                                            date::format_display(&dt),
                                        ))
                                        .unwrap_or_default();
                                    view! {
                                        <h2 class="text-2xl font-semibold text-primary mb-2">
                                            "Order Details #" {order.id}
                                        </h2>
                                        <p class="text-sm text-base-content/50 mb-4">{placed}</p>

                                        <div class="space-y-3 border-t border-base-300 pt-4 max-h-60 overflow-y-auto">
                                            {order
                                                .items
                                                .iter()
                                                .map(|item| {
                                                    view! {
                                                        <div class="flex justify-between items-center border-b border-base-300 pb-2">
                                                            <div>
                                                                <p class="font-semibold">
                                                                    {item.product_name.clone()}
                                                                </p>
                                                                <p class="text-sm text-base-content/50">
                                                                    "Qty: " {item.quantity}
                                                                </p>
                                                            </div>
                                                            <span>
                                                                "₹" {item.price.to_string()} " × "
                                                                {item.quantity}
                                                            </span>
                                                        </div>
                                                    }
                                                })
                                                .collect_view()}
                                        </div>

                                        <div class="flex justify-between font-semibold mt-6 text-lg">
                                            <span>"Total:"</span>
                                            <span>"₹" {order.total.to_string()}</span>
                                        </div>

                                        <div class="flex justify-end mt-6">
                                            <button
                                                class="btn btn-primary"
                                                on:click=move |_| set_selected_order.set(None)
                                            >
                                                "Close"
                                            </button>
                                        </div>
                                    }
                                })
                        }}
                    </div>
                </div>
            </Show>
        </main>
    }
}
