//! 分页控件
//!
//! 只有一页时不渲染任何内容。

use leptos::prelude::*;
use shopfront_shared::PageMeta;

#[component]
pub fn Pagination(
    /// 分页元信息
    #[prop(into)]
    meta: Signal<Option<PageMeta>>,
    /// 页码变更回调
    #[prop(into)]
    on_page: Callback<u32>,
) -> impl IntoView {
    let visible = move || meta.get().map(|m| m.last_page > 1).unwrap_or(false);

    view! {
        <Show when=visible>
            <div class="flex flex-col items-center gap-1">
                <div class="join">
                    <button
                        class="join-item btn btn-sm"
                        disabled=move || meta.get().map(|m| m.current_page <= 1).unwrap_or(true)
                        on:click=move |_| {
                            if let Some(m) = meta.get() {
                                on_page.run(m.current_page - 1);
                            }
                        }
                    >
                        "Prev"
                    </button>
                    <span class="join-item btn btn-sm btn-ghost pointer-events-none">
                        {move || {
                            meta.get()
                                .map(|m| format!("Page {} of {}", m.current_page, m.last_page))
                                .unwrap_or_default()
                        }}
                    </span>
                    <button
                        class="join-item btn btn-sm"
                        disabled=move || {
                            meta.get().map(|m| m.current_page >= m.last_page).unwrap_or(true)
                        }
                        on:click=move |_| {
                            if let Some(m) = meta.get() {
                                on_page.run(m.current_page + 1);
                            }
                        }
                    >
                        "Next"
                    </button>
                </div>
                <Show when=move || meta.get().and_then(|m| m.total).is_some()>
                    <p class="text-xs text-base-content/50">
                        "Total items: " {move || meta.get().and_then(|m| m.total).unwrap_or(0)}
                    </p>
                </Show>
            </div>
        </Show>
    }
}
