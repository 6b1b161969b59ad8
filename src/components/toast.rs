//! 页面级通知提示框
//!
//! 信号内容为 (消息, 是否出错)，设值后 3 秒自动清除。

use leptos::prelude::*;

#[component]
pub fn NotificationToast(
    /// 通知内容信号
    notification: ReadSignal<Option<(String, bool)>>,
    /// 清除通知
    set_notification: WriteSignal<Option<(String, bool)>>,
) -> impl IntoView {
    // 3秒后清除通知
    Effect::new(move |_| {
        if notification.get().is_some() {
            set_timeout(
                move || set_notification.set(None),
                std::time::Duration::from_secs(3),
            );
        }
    });

    view! {
        <Show when=move || notification.get().is_some()>
            <div class="toast toast-top toast-end z-50">
                <div class=move || {
                    let (_, is_err) = notification.get().unwrap();
                    if is_err {
                        "alert alert-error shadow-lg"
                    } else {
                        "alert alert-success shadow-lg"
                    }
                }>
                    <span>{move || notification.get().unwrap().0}</span>
                </div>
            </div>
        </Show>
    }
}
