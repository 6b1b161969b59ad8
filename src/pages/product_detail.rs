use crate::bus::UiEvent;
use crate::components::icons::{ChevronLeft, ChevronRight};
use crate::components::toast::NotificationToast;
use crate::context::use_app;
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use leptos::prelude::*;
use leptos::task::spawn_local;
use shopfront_shared::Product;

/// 商品详情页
///
/// 匿名访客点击加购：暂存延迟意图并打开认证弹窗，重放由认证流程
/// 负责（只重放一次，这里不重试）。已登录则直接提交并刷新角标。
#[component]
pub fn ProductDetailPage(id: u64) -> impl IntoView {
    let app = use_app();
    let router = use_router();
    let session = app.snapshot();

    let (product, set_product) = signal(Option::<Product>::None);
    let (loading, set_loading) = signal(true);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (current_image, set_current_image) = signal(0usize);
    let (quantity, set_quantity) = signal(1u32);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None);

    // 拉取商品；离开本页后迟到的响应直接丢弃
    {
        let app = app.clone();
        spawn_local(async move {
            let result = app.api.product(id).await;
            if router.current_route().get_untracked() != AppRoute::ProductDetail(id) {
                return;
            }
            match result {
                Ok(data) => set_product.set(Some(data)),
                Err(_) => set_error_msg.set(Some("Failed to load product details.".to_string())),
            }
            set_loading.set(false);
        });
    }

    let images = Memo::new(move |_| {
        product
            .get()
            .map(|p| p.image_list())
            .unwrap_or_default()
    });

    let prev_image = move |_| {
        let count = images.with(|i| i.len());
        if count > 0 {
            set_current_image.update(|i| *i = if *i == 0 { count - 1 } else { *i - 1 });
        }
    };
    let next_image = move |_| {
        let count = images.with(|i| i.len());
        if count > 0 {
            set_current_image.update(|i| *i = (*i + 1) % count);
        }
    };

    let decrease_quantity = move |_| set_quantity.update(|q| *q = (*q).max(2) - 1);
    let increase_quantity = move |_| {
        let stock = product.get_untracked().map(|p| p.stock).unwrap_or(0);
        set_quantity.update(|q| {
            if *q < stock {
                *q += 1;
            }
        });
    };

    // 视图内的闭包必须 Send，上下文经 local StoredValue 捕获
    let app = StoredValue::new_local(app);

    let on_add_to_cart = move |_| {
        let Some(product) = product.get_untracked() else {
            return;
        };
        let quantity = quantity.get_untracked();

        if !session.get_untracked().is_authenticated() {
            // 意图落盘，认证成功后由认证流程重放
            app.with_value(|app| {
                app.intent.defer(product.id, quantity);
                app.bus.emit(UiEvent::OpenAuthModal);
            });
            return;
        }

        let app = app.get_value();
        spawn_local(async move {
            match app.api.add_cart_item(product.id, quantity).await {
                Ok(()) => {
                    set_notification.set(Some((format!("{} added to cart!", product.name), false)));
                    app.bus.emit(UiEvent::RefreshCartBadge);
                }
                Err(err) => {
                    set_notification.set(Some((
                        format!("Failed to add to cart: {}", err.user_message()),
                        true,
                    )));
                }
            }
        });
    };

    view! {
        <main class="min-h-screen bg-base-200 py-8 px-6 md:px-12">
            <NotificationToast notification=notification set_notification=set_notification />

            <Show when=move || loading.get()>
                <div class="flex justify-center items-center h-[60vh]">
                    <span class="loading loading-spinner loading-lg text-primary"></span>
                </div>
            </Show>

            <Show when=move || error_msg.get().is_some()>
                <p class="text-center text-error text-lg mt-10">
                    {move || error_msg.get().unwrap()}
                </p>
            </Show>

            <Show when=move || product.get().is_some()>
                <div class="grid grid-cols-1 lg:grid-cols-2 gap-10 max-w-6xl mx-auto">
                    // 图片区
                    <div class="flex flex-col items-center">
                        <button
                            class="btn btn-sm btn-ghost self-start mb-4"
                            on:click=move |_| router.navigate("/")
                        >
                            "Back"
                        </button>

                        <div class="relative w-full h-[420px] bg-base-300 rounded-lg overflow-hidden flex items-center justify-center">
                            <button
                                class="btn btn-circle btn-sm absolute left-3 z-10"
                                on:click=prev_image
                            >
                                <ChevronLeft attr:class="h-5 w-5" />
                            </button>
                            <img
                                src=move || {
                                    images
                                        .get()
                                        .get(current_image.get())
                                        .cloned()
                                        .unwrap_or_else(|| {
                                            "https://placehold.co/600x400?text=Product".to_string()
                                        })
                                }
                                alt=move || product.get().map(|p| p.name).unwrap_or_default()
                                class="w-full h-full object-contain"
                            />
                            <button
                                class="btn btn-circle btn-sm absolute right-3 z-10"
                                on:click=next_image
                            >
                                <ChevronRight attr:class="h-5 w-5" />
                            </button>
                        </div>

                        <div class="flex mt-4 gap-2 flex-wrap justify-center">
                            <For
                                each=move || images.get().into_iter().enumerate()
                                key=|(index, _)| *index
                                children=move |(index, src)| {
                                    view! {
                                        <img
                                            src=src
                                            class=move || {
                                                if current_image.get() == index {
                                                    "h-16 w-16 object-cover rounded-md cursor-pointer ring-2 ring-primary"
                                                } else {
                                                    "h-16 w-16 object-cover rounded-md cursor-pointer opacity-70 hover:opacity-100"
                                                }
                                            }
                                            on:mouseenter=move |_| set_current_image.set(index)
                                        />
                                    }
                                }
                            />
                        </div>
                    </div>

                    // 商品信息
                    <div class="flex flex-col justify-center">
                        <h2 class="text-3xl font-semibold mb-3">
                            {move || product.get().map(|p| p.name).unwrap_or_default()}
                        </h2>
                        <p class="text-base-content/70 mb-4">
                            {move || product.get().map(|p| p.description).unwrap_or_default()}
                        </p>
                        <p class="text-primary text-2xl font-bold mb-6">
                            "₹"
                            {move || {
                                product.get().map(|p| p.price.to_string()).unwrap_or_default()
                            }}
                        </p>

                        <div class="flex items-center gap-4 mb-6">
                            <span class="text-base-content/60">"Quantity:"</span>
                            <div class="join">
                                <button class="join-item btn btn-sm" on:click=decrease_quantity>
                                    "-"
                                </button>
                                <span class="join-item btn btn-sm btn-ghost pointer-events-none">
                                    {move || quantity.get()}
                                </span>
                                <button class="join-item btn btn-sm" on:click=increase_quantity>
                                    "+"
                                </button>
                            </div>
                        </div>

                        <button class="btn btn-primary btn-lg" on:click=on_add_to_cart>
                            "Add to Cart"
                        </button>
                    </div>
                </div>
            </Show>
        </main>
    }
}
