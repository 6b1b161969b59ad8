use crate::bus::UiEvent;
use crate::components::icons::Trash2;
use crate::components::toast::NotificationToast;
use crate::context::use_app;
use crate::web::router::use_router;
use leptos::prelude::*;
use leptos::task::spawn_local;
use shopfront_shared::{CartEntry, Price};

/// 购物车页
///
/// 匿名访客看到登录提示态，不发起任何请求。
/// 每次变更（数量、删除、结算）之后都重新拉取服务端购物车并刷新角标。
#[component]
pub fn CartPage() -> impl IntoView {
    let app = use_app();
    let router = use_router();
    let session = app.snapshot();

    let (entries, set_entries) = signal(Vec::<CartEntry>::new());
    let (loading, set_loading) = signal(true);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None);

    // 视图内的闭包必须 Send，上下文经 local StoredValue 捕获
    let app = StoredValue::new_local(app);

    let fetch_cart = move || {
        let app = app.get_value();
        spawn_local(async move {
            let result = app.api.cart().await;
            // 请求期间登出：丢弃迟到的响应
            if !app.session.snapshot().is_authenticated() {
                return;
            }
            match result {
                Ok(envelope) => set_entries.set(envelope.cart),
                Err(_) => set_entries.set(Vec::new()),
            }
            set_loading.set(false);
        });
    };

    // 初次加载（有会话才拉取）
    Effect::new(move |_| {
        if session.get().is_authenticated() {
            fetch_cart();
        }
    });

    let update_quantity = move |product_id: u64, quantity: u32| {
        let app = app.get_value();
        set_loading.set(true);
        spawn_local(async move {
            match app.api.update_cart_item(product_id, quantity).await {
                Ok(()) => {
                    fetch_cart();
                    app.bus.emit(UiEvent::RefreshCartBadge);
                }
                Err(err) => {
                    set_loading.set(false);
                    set_notification.set(Some((
                        format!("Failed to update quantity: {}", err.user_message()),
                        true,
                    )));
                }
            }
        });
    };

    let remove_item = move |product_id: u64| {
        let app = app.get_value();
        set_loading.set(true);
        spawn_local(async move {
            match app.api.remove_cart_item(product_id).await {
                Ok(()) => {
                    fetch_cart();
                    app.bus.emit(UiEvent::RefreshCartBadge);
                }
                Err(err) => {
                    set_loading.set(false);
                    set_notification.set(Some((
                        format!("Failed to remove item: {}", err.user_message()),
                        true,
                    )));
                }
            }
        });
    };

    let on_checkout = move |_| {
        let app = app.get_value();
        set_loading.set(true);
        spawn_local(async move {
            match app.api.checkout().await {
                Ok(response) => {
                    set_notification.set(Some((
                        response
                            .message
                            .unwrap_or_else(|| "Your order has been placed.".to_string()),
                        false,
                    )));
                    app.bus.emit(UiEvent::RefreshCartBadge);
                    router.navigate("/");
                }
                Err(err) => {
                    set_loading.set(false);
                    set_notification.set(Some((
                        format!("Checkout failed: {}", err.user_message()),
                        true,
                    )));
                }
            }
        });
    };

    let total_price = move || {
        entries.with(|entries| {
            entries
                .iter()
                .map(|entry| entry.product.price.value() * entry.quantity as f64)
                .sum::<f64>()
        })
    };
    let total_items =
        move || entries.with(|entries| entries.iter().map(|entry| entry.quantity).sum::<u32>());

    view! {
        <main class="min-h-screen bg-base-200 p-6 md:p-10">
            <NotificationToast notification=notification set_notification=set_notification />

            <Show
                when=move || session.get().is_authenticated()
                fallback=move || {
                    view! {
                        <div class="flex flex-col items-center justify-center h-[70vh] gap-4">
                            <h2 class="text-3xl font-semibold">"Login to view your cart"</h2>
                            <button class="btn btn-primary" on:click=move |_| router.navigate("/")>
                                "Go Home"
                            </button>
                        </div>
                    }
                }
            >
                <Show when=move || loading.get()>
                    <div class="flex justify-center items-center h-[60vh]">
                        <span class="loading loading-spinner loading-lg text-primary"></span>
                    </div>
                </Show>

                <Show when=move || !loading.get() && entries.with(|e| e.is_empty())>
                    <div class="flex flex-col items-center justify-center h-[70vh] gap-4">
                        <h2 class="text-3xl font-semibold">"Your Cart is Empty"</h2>
                        <button class="btn btn-primary" on:click=move |_| router.navigate("/")>
                            "Go Shopping"
                        </button>
                    </div>
                </Show>

                <Show when=move || !loading.get() && entries.with(|e| !e.is_empty())>
                    <div class="max-w-6xl mx-auto">
                        <div class="flex items-center justify-between mb-8">
                            <h1 class="text-4xl font-bold text-primary">"Shopping Cart"</h1>
                            <button
                                class="btn btn-sm btn-ghost"
                                on:click=move |_| router.navigate("/")
                            >
                                "Back"
                            </button>
                        </div>

                        <div class="flex flex-col lg:flex-row gap-8">
                            <div class="flex-1 space-y-4">
                                <For
                                    each=move || entries.get()
                                    key=|entry| (entry.product_id, entry.quantity)
                                    children=move |entry| {
                                        let product_id = entry.product_id;
                                        let quantity = entry.quantity;
                                        let image = entry
                                            .product
                                            .image_list()
                                            .into_iter()
                                            .next()
                                            .unwrap_or_else(|| {
                                                "https://placehold.co/128x128?text=Item".to_string()
                                            });
                                        let line_total = entry.product.price.value()
                                            * quantity as f64;

                                        view! {
                                            <div class="card card-side bg-base-100 shadow-md p-4 gap-4">
                                                <figure class="w-28 h-28 shrink-0">
                                                    <img
                                                        src=image
                                                        alt=entry.product.name.clone()
                                                        class="w-full h-full object-cover rounded-md"
                                                    />
                                                </figure>
                                                <div class="flex flex-col flex-1">
                                                    <h3 class="text-lg font-semibold">
                                                        {entry.product.name.clone()}
                                                    </h3>
                                                    <p class="text-sm text-base-content/60">
                                                        {entry.product.description.clone()}
                                                    </p>
                                                    <div class="flex items-center gap-2 mt-3">
                                                        <button
                                                            class="btn btn-xs"
                                                            on:click=move |_| {
                                                                if quantity > 1 {
                                                                    update_quantity(product_id, quantity - 1);
                                                                }
                                                            }
                                                        >
                                                            "-"
                                                        </button>
                                                        <span class="px-2">{quantity}</span>
                                                        <button
                                                            class="btn btn-xs"
                                                            on:click=move |_| update_quantity(
                                                                product_id,
                                                                quantity + 1,
                                                            )
                                                        >
                                                            "+"
                                                        </button>
                                                        <button
                                                            class="btn btn-xs btn-ghost text-error gap-1 ml-3"
                                                            on:click=move |_| remove_item(product_id)
                                                        >
                                                            <Trash2 attr:class="h-4 w-4" /> "Delete"
                                                        </button>
                                                    </div>
                                                </div>
                                                <div class="text-right w-28">
                                                    <p class="text-lg font-semibold text-primary">
                                                        "₹" {Price(line_total).to_string()}
                                                    </p>
                                                    <p class="text-xs text-base-content/50">
                                                        "₹" {entry.product.price.to_string()} "/unit"
                                                    </p>
                                                </div>
                                            </div>
                                        }
                                    }
                                />
                            </div>

                            // 订单摘要
                            <div class="lg:w-1/3">
                                <div class="card bg-base-100 shadow-md p-6">
                                    <h2 class="text-2xl font-semibold text-primary mb-4">
                                        "Order Summary"
                                    </h2>
                                    <div class="flex justify-between mb-2 text-base-content/70">
                                        <span>"Total Items:"</span>
                                        <span>{total_items}</span>
                                    </div>
                                    <div class="flex justify-between text-lg font-semibold mb-6">
                                        <span>"Total Price:"</span>
                                        <span>"₹" {move || Price(total_price()).to_string()}</span>
                                    </div>
                                    <button
                                        class="btn btn-primary w-full"
                                        disabled=move || loading.get()
                                        on:click=on_checkout
                                    >
                                        "Proceed to Checkout"
                                    </button>
                                </div>
                            </div>
                        </div>
                    </div>
                </Show>
            </Show>
        </main>
    }
}
