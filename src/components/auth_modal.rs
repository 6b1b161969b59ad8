use crate::auth_flow::{AuthFlow, AuthForm, AuthMode};
use crate::bus::UiEvent;
use crate::components::icons::X;
use crate::context::use_app;
use crate::web::router::use_router;
use leptos::prelude::*;
use leptos::task::spawn_local;
use shopfront_shared::Role;

/// 登录/注册弹窗
///
/// 提交成功后由认证流程完成会话建立与延迟意图处理；
/// 这里只负责表单、错误展示和成功后的导航/角标刷新。
#[component]
pub fn AuthModal(#[prop(into)] on_close: Callback<()>) -> impl IntoView {
    let app = use_app();
    let router = use_router();
    // 提交闭包挂在表单上，必须 Send：上下文经 local StoredValue 捕获
    let app = StoredValue::new_local(app);

    let (is_login, set_is_login) = signal(true);
    let (name, set_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let toggle_mode = move |_| {
        set_is_login.update(|v| *v = !*v);
        set_error_msg.set(None);
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();

        let mode = if is_login.get() {
            AuthMode::Login
        } else {
            AuthMode::Register
        };
        let form = AuthForm {
            name: name.get(),
            email: email.get(),
            password: password.get(),
        };
        if form.email.is_empty()
            || form.password.is_empty()
            || (mode == AuthMode::Register && form.name.is_empty())
        {
            set_error_msg.set(Some("Please fill in all fields".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let app = app.get_value();
        spawn_local(async move {
            let flow = AuthFlow::new(app.api.clone(), app.session.clone(), app.intent.clone());
            match flow.submit(mode, &form).await {
                Ok(outcome) => {
                    if let Some(err) = &outcome.replay_error {
                        web_sys::console::error_1(
                            &format!("[Auth] Pending add-to-cart replay failed: {}", err).into(),
                        );
                    } else if outcome.replayed {
                        web_sys::console::log_1(&"[Auth] Replayed pending add-to-cart".into());
                    }
                    match outcome.role {
                        Role::Admin => router.navigate("/admin"),
                        Role::User => app.bus.emit(UiEvent::RefreshCartBadge),
                    }
                    on_close.run(());
                }
                Err(err) => {
                    set_error_msg.set(Some(err.user_message()));
                }
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="modal modal-open">
            <div class="modal-box max-w-sm">
                <button
                    class="btn btn-sm btn-circle btn-ghost absolute right-3 top-3"
                    on:click=move |_| on_close.run(())
                >
                    <X attr:class="h-4 w-4" />
                </button>

                <h3 class="font-bold text-2xl text-center text-primary mb-6">
                    {move || if is_login.get() { "Login" } else { "Sign Up" }}
                </h3>

                <form class="flex flex-col gap-4" on:submit=on_submit>
                    <Show when=move || !is_login.get()>
                        <input
                            type="text"
                            placeholder="Full Name"
                            class="input input-bordered w-full"
                            on:input=move |ev| set_name.set(event_target_value(&ev))
                            prop:value=name
                        />
                    </Show>

                    <input
                        type="email"
                        placeholder="Email"
                        class="input input-bordered w-full"
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                        prop:value=email
                        required
                    />

                    <input
                        type="password"
                        placeholder="Password"
                        class="input input-bordered w-full"
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                        prop:value=password
                        required
                    />

                    <Show when=move || error_msg.get().is_some()>
                        <p class="text-error text-sm text-center">
                            {move || error_msg.get().unwrap()}
                        </p>
                    </Show>

                    <button class="btn btn-primary" disabled=move || is_submitting.get()>
                        {move || {
                            if is_submitting.get() {
                                view! {
                                    <span class="loading loading-spinner"></span>
                                    "Please wait..."
                                }
                                    .into_any()
                            } else if is_login.get() {
                                "Login".into_any()
                            } else {
                                "Sign Up".into_any()
                            }
                        }}
                    </button>
                </form>

                <p class="text-base-content/60 text-sm mt-4 text-center">
                    {move || {
                        if is_login.get() {
                            "Don't have an account? "
                        } else {
                            "Already have an account? "
                        }
                    }}
                    <button type="button" class="link link-primary" on:click=toggle_mode>
                        {move || if is_login.get() { "Sign Up" } else { "Login" }}
                    </button>
                </p>
            </div>
        </div>
    }
}
