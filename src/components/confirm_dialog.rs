//! 确认对话框
//!
//! 基于原生 dialog 元素的模态确认，open 信号驱动显隐。

use leptos::prelude::*;

#[component]
pub fn ConfirmDialog(
    /// 是否打开
    #[prop(into)]
    open: Signal<bool>,
    /// 标题
    #[prop(into)]
    title: String,
    /// 正文
    #[prop(into)]
    message: String,
    /// 确认按钮文案
    #[prop(into)]
    confirm_label: String,
    /// 取消按钮文案
    #[prop(into)]
    cancel_label: String,
    /// 确认回调
    #[prop(into)]
    on_confirm: UnsyncCallback<()>,
    /// 取消回调（含点击遮罩关闭）
    #[prop(into)]
    on_cancel: UnsyncCallback<()>,
) -> impl IntoView {
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            if open.get() {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    // ESC/遮罩触发的 close 才算取消；程序性关闭（open 已复位）不再回调
    let on_native_close = move |_| {
        if open.get_untracked() {
            on_cancel.run(());
        }
    };

    view! {
        <dialog class="modal" node_ref=dialog_ref on:close=on_native_close>
            <div class="modal-box">
                <h3 class="font-bold text-lg">{title}</h3>
                <p class="py-4 text-base-content/70">{message}</p>
                <div class="modal-action">
                    <button type="button" class="btn btn-ghost" on:click=move |_| on_cancel.run(())>
                        {cancel_label}
                    </button>
                    <button type="button" class="btn btn-primary" on:click=move |_| on_confirm.run(())>
                        {confirm_label}
                    </button>
                </div>
            </div>
            <form method="dialog" class="modal-backdrop">
                <button>"close"</button>
            </form>
        </dialog>
    }
}
