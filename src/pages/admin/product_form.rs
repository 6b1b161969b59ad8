use crate::components::icons::{Plus, Trash2};
use crate::components::toast::NotificationToast;
use crate::context::use_app;
use crate::web::router::use_router;
use leptos::prelude::*;
use leptos::task::spawn_local;
use shopfront_shared::Product;
use shopfront_shared::protocol::ProductPayload;

/// 表单模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductFormMode {
    Create,
    /// 编辑；page 是来源列表页，商品从该页的列表数据中取出
    Edit { id: u64, page: u32 },
}

/// 表单状态
///
/// 将零散的 signal 整合为一个结构体，负责数据持有与到载荷的转换。
/// `RwSignal` 实现了 `Copy`，适合在闭包间传递。
#[derive(Clone, Copy)]
struct ProductFormState {
    name: RwSignal<String>,
    description: RwSignal<String>,
    price: RwSignal<String>,
    stock: RwSignal<String>,
    images: RwSignal<Vec<String>>,
    new_image: RwSignal<String>,
}

impl ProductFormState {
    fn new() -> Self {
        Self {
            name: RwSignal::new(String::new()),
            description: RwSignal::new(String::new()),
            price: RwSignal::new(String::new()),
            stock: RwSignal::new(String::new()),
            images: RwSignal::new(Vec::new()),
            new_image: RwSignal::new(String::new()),
        }
    }

    fn fill_from(&self, product: &Product) {
        self.name.set(product.name.clone());
        self.description.set(product.description.clone());
        self.price.set(product.price.to_string());
        self.stock.set(product.stock.to_string());
        self.images.set(product.image_list());
    }

    /// 转换为 API 载荷；数值字段解析失败按 0 处理（表单有 required 约束）
    fn to_payload(&self) -> ProductPayload {
        ProductPayload {
            name: self.name.get(),
            description: self.description.get(),
            price: self.price.get().trim().parse().unwrap_or(0.0),
            stock: self.stock.get().trim().parse().unwrap_or(0),
            images: serde_json::to_string(&self.images.get()).unwrap_or_else(|_| "[]".into()),
        }
    }
}

/// 商品创建/编辑表单
#[component]
pub fn ProductFormPage(mode: ProductFormMode) -> impl IntoView {
    let app = use_app();
    let router = use_router();

    let form = ProductFormState::new();
    let (loading, set_loading) = signal(matches!(mode, ProductFormMode::Edit { .. }));
    let (submitting, set_submitting) = signal(false);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None);

    // 视图内的闭包必须 Send，上下文经 local StoredValue 捕获
    let app = StoredValue::new_local(app);

    // 编辑模式：从来源列表页的数据里找到目标商品回填表单
    if let ProductFormMode::Edit { id, page } = mode {
        let app = app.get_value();
        spawn_local(async move {
            match app.api.admin_products(page).await {
                Ok(result) => {
                    match result.data.iter().find(|product| product.id == id) {
                        Some(product) => form.fill_from(product),
                        None => set_notification
                            .set(Some(("Product not found on this page.".to_string(), true))),
                    }
                }
                Err(err) => {
                    set_notification.set(Some((
                        format!("Failed to fetch product: {}", err.user_message()),
                        true,
                    )));
                }
            }
            set_loading.set(false);
        });
    }

    let add_image = move |_| {
        let url = form.new_image.get().trim().to_string();
        if url.is_empty() {
            return;
        }
        form.images.update(|images| images.push(url));
        form.new_image.set(String::new());
    };

    let remove_image = move |index: usize| {
        form.images.update(|images| {
            images.remove(index);
        });
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();

        if form.images.get_untracked().is_empty() {
            set_notification.set(Some((
                "At least one image is required. Please add at least one image link.".to_string(),
                true,
            )));
            return;
        }

        let payload = form.to_payload();
        set_submitting.set(true);
        let app = app.get_value();
        spawn_local(async move {
            let result = match mode {
                ProductFormMode::Create => app.api.admin_create_product(&payload).await,
                ProductFormMode::Edit { id, .. } => {
                    app.api.admin_update_product(id, &payload).await
                }
            };
            match result {
                Ok(()) => match mode {
                    ProductFormMode::Create => {
                        set_notification
                            .set(Some(("Product created successfully!".to_string(), false)));
                        router.navigate("/admin");
                    }
                    ProductFormMode::Edit { .. } => {
                        set_notification
                            .set(Some(("Product updated successfully!".to_string(), false)));
                    }
                },
                Err(err) => {
                    set_notification.set(Some((
                        format!("Error saving product: {}", err.user_message()),
                        true,
                    )));
                }
            }
            set_submitting.set(false);
        });
    };

    let heading = match mode {
        ProductFormMode::Create => "Create Product",
        ProductFormMode::Edit { .. } => "Edit Product",
    };
    let submit_label = match mode {
        ProductFormMode::Create => "Create Product",
        ProductFormMode::Edit { .. } => "Update Product",
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
                <div class="max-w-5xl mx-auto">
                    <div class="flex justify-between items-center mb-8">
                        <h1 class="text-3xl font-bold text-primary">{heading}</h1>
                        <button
                            class="btn btn-sm btn-ghost"
                            on:click=move |_| router.navigate("/admin")
                        >
                            "Back"
                        </button>
                    </div>

                    <form
                        class="grid grid-cols-1 lg:grid-cols-2 gap-8 card bg-base-100 shadow-xl p-8"
                        on:submit=on_submit
                    >
                        // 左列：基础信息
                        <div class="space-y-4">
                            <div class="form-control">
                                <label class="label" for="product-name">
                                    <span class="label-text">"Product Name"</span>
                                </label>
                                <input
                                    id="product-name"
                                    type="text"
                                    required
                                    class="input input-bordered w-full"
                                    prop:value=form.name
                                    on:input=move |ev| form.name.set(event_target_value(&ev))
                                />
                            </div>

                            <div class="form-control">
                                <label class="label" for="product-description">
                                    <span class="label-text">"Description"</span>
                                </label>
                                <textarea
                                    id="product-description"
                                    rows="5"
                                    class="textarea textarea-bordered w-full"
                                    prop:value=form.description
                                    on:input=move |ev| {
                                        form.description.set(event_target_value(&ev))
                                    }
                                ></textarea>
                            </div>

                            <div class="form-control">
                                <label class="label" for="product-price">
                                    <span class="label-text">"Price"</span>
                                </label>
                                <input
                                    id="product-price"
                                    type="number"
                                    min="0"
                                    step="any"
                                    required
                                    class="input input-bordered w-full"
                                    prop:value=form.price
                                    on:input=move |ev| form.price.set(event_target_value(&ev))
                                />
                            </div>

                            <div class="form-control">
                                <label class="label" for="product-stock">
                                    <span class="label-text">"Stock"</span>
                                </label>
                                <input
                                    id="product-stock"
                                    type="number"
                                    min="0"
                                    required
                                    class="input input-bordered w-full"
                                    prop:value=form.stock
                                    on:input=move |ev| form.stock.set(event_target_value(&ev))
                                />
                            </div>
                        </div>

                        // 右列：图片列表 + 提交
                        <div class="flex flex-col justify-between">
                            <div>
                                <label class="label">
                                    <span class="label-text font-semibold">"Product Images"</span>
                                </label>

                                <div class="join w-full mb-4">
                                    <input
                                        type="text"
                                        placeholder="Enter image URL then click +"
                                        class="input input-bordered join-item w-full"
                                        prop:value=form.new_image
                                        on:input=move |ev| {
                                            form.new_image.set(event_target_value(&ev))
                                        }
                                    />
                                    <button
                                        type="button"
                                        class="btn btn-primary join-item"
                                        title="Add image"
                                        on:click=add_image
                                    >
                                        <Plus attr:class="h-4 w-4" />
                                    </button>
                                </div>

                                <Show
                                    when=move || !form.images.get().is_empty()
                                    fallback=|| {
                                        view! {
                                            <p class="text-base-content/50 text-sm">
                                                "No images added yet. Please add at least one."
                                            </p>
                                        }
                                    }
                                >
                                    <div class="space-y-2 max-h-[340px] overflow-y-auto pr-1">
                                        <For
                                            each=move || {
                                                form.images.get().into_iter().enumerate()
                                            }
                                            key=|(index, url)| (*index, url.clone())
                                            children=move |(index, url)| {
                                                view! {
                                                    <div class="flex items-center justify-between bg-base-200 rounded-md px-3 py-2">
                                                        <div class="flex items-center gap-3 min-w-0">
                                                            <img
                                                                src=url.clone()
                                                                class="w-12 h-12 object-cover rounded-md shrink-0"
                                                            />
                                                            <span class="text-sm truncate">{url.clone()}</span>
                                                        </div>
                                                        <button
                                                            type="button"
                                                            class="btn btn-ghost btn-xs text-error"
                                                            title="Remove"
                                                            on:click=move |_| remove_image(index)
                                                        >
                                                            <Trash2 attr:class="h-4 w-4" />
                                                        </button>
                                                    </div>
                                                }
                                            }
                                        />
                                    </div>
                                </Show>
                            </div>

                            <button
                                type="submit"
                                class="btn btn-primary btn-lg mt-6"
                                disabled=move || submitting.get()
                            >
                                {move || {
                                    if submitting.get() {
                                        view! {
                                            <span class="loading loading-spinner"></span>
                                            "Saving..."
                                        }
                                            .into_any()
                                    } else {
                                        submit_label.into_any()
                                    }
                                }}
                            </button>
                        </div>
                    </form>
                </div>
            </Show>
        </main>
    }
}
