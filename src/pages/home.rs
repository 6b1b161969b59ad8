use crate::components::pagination::Pagination;
use crate::context::use_app;
use crate::web::Interval;
use crate::web::router::use_router;
use leptos::prelude::*;
use leptos::task::spawn_local;
use shopfront_shared::{PageMeta, Product};

/// 商品目录页
#[component]
pub fn HomePage() -> impl IntoView {
    let app = use_app();

    let (products, set_products) = signal(Vec::<Product>::new());
    let (meta, set_meta) = signal(Option::<PageMeta>::None);
    let (loading, set_loading) = signal(true);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (page, set_page) = signal(1u32);

    // 页码变化即拉取；迟到的响应按请求时的页码丢弃
    Effect::new(move |_| {
        let requested = page.get();
        let api = app.api.clone();
        set_loading.set(true);
        spawn_local(async move {
            let result = api.products(requested).await;
            // 页码已经变了：这是一条迟到的响应
            if page.get_untracked() != requested {
                return;
            }
            match result {
                Ok(result) => {
                    set_products.set(result.data);
                    set_meta.set(result.meta);
                    set_error_msg.set(None);
                }
                Err(err) => set_error_msg.set(Some(err.user_message())),
            }
            set_loading.set(false);
        });
    });

    view! {
        <main class="min-h-screen bg-base-200 p-6 md:p-10">
            <div class="max-w-7xl mx-auto">
                <div class="flex flex-col md:flex-row md:items-center md:justify-between mb-8 gap-4">
                    <h1 class="text-4xl font-bold text-primary">"Product Catalogue"</h1>
                    <Pagination meta=meta on_page=move |p| set_page.set(p) />
                </div>

                <Show when=move || error_msg.get().is_some()>
                    <p class="text-center text-error text-lg mt-10">
                        {move || error_msg.get().unwrap()}
                    </p>
                </Show>

                <Show when=move || loading.get() && products.with(|p| p.is_empty())>
                    <div class="flex justify-center items-center h-[60vh]">
                        <span class="loading loading-spinner loading-lg text-primary"></span>
                    </div>
                </Show>

                <Show when=move || {
                    !loading.get() && error_msg.get().is_none() && products.with(|p| p.is_empty())
                }>
                    <p class="text-center text-base-content/50 mt-10">"No products found."</p>
                </Show>

                <div class="grid gap-6 grid-cols-1 sm:grid-cols-2 md:grid-cols-3 lg:grid-cols-5">
                    <For
                        each=move || products.get()
                        key=|product| product.id
                        children=move |product| {
                            view! { <ProductCard product=product /> }
                        }
                    />
                </div>
            </div>
        </main>
    }
}

/// 商品卡片
///
/// 悬停时每 1.4 秒轮换一张图片，移开后回到首图。
#[component]
fn ProductCard(product: Product) -> impl IntoView {
    let router = use_router();

    let images = product.image_list();
    let image_count = images.len();
    let (image_index, set_image_index) = signal(0usize);
    let carousel = StoredValue::new_local(Option::<Interval>::None);

    let on_enter = move |_| {
        if image_count > 1 {
            carousel.set_value(Some(Interval::new(1400, move || {
                set_image_index.update(|i| *i = (*i + 1) % image_count);
            })));
        }
    };
    let on_leave = move |_| {
        carousel.set_value(None);
        set_image_index.set(0);
    };

    let id = product.id;
    let main_image = {
        let images = images.clone();
        move || {
            images
                .get(image_index.get())
                .cloned()
                .unwrap_or_else(|| "https://placehold.co/400x250?text=Product".to_string())
        }
    };

    view! {
        <div
            class="card bg-base-100 shadow-xl cursor-pointer hover:shadow-2xl transition-shadow"
            on:click=move |_| router.navigate(&format!("/product/{}", id))
            on:mouseenter=on_enter
            on:mouseleave=on_leave
        >
            <figure class="h-64 overflow-hidden">
                <img src=main_image alt=product.name.clone() class="w-full h-full object-cover" />
            </figure>
            <div class="card-body p-5">
                <h3 class="card-title text-base">{product.name.clone()}</h3>
                <p class="text-sm text-base-content/60 line-clamp-2">
                    {product.description.clone()}
                </p>
                <p class="text-primary font-semibold text-lg">"₹" {product.price.to_string()}</p>
            </div>
        </div>
    }
}
