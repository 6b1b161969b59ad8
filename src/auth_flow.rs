//! 认证流程编排
//!
//! 登录/注册成功后的状态收束点：
//! 1. 建立会话（token + 角色 + 资料快照）
//! 2. 角色为 admin：同步丢弃延迟加购意图（管理员没有购物车）
//! 3. 角色为 user：若存在延迟意图则重放一次，随后无论成败都已清空
//!
//! 重放失败不会中断流程——意图不会被重试，错误交给调用方提示。

use crate::error::{StoreError, StoreResult};
use crate::intent::IntentSlot;
use crate::kv::KvBackend;
use crate::session::SessionStore;
use async_trait::async_trait;
use shopfront_shared::Role;
use shopfront_shared::protocol::{AuthResponse, LoginRequest, RegisterRequest};
use std::rc::Rc;

/// 认证流程依赖的 API 面
#[async_trait(?Send)]
pub trait AuthBackend {
    async fn login(&self, request: &LoginRequest) -> StoreResult<AuthResponse>;
    async fn register(&self, request: &RegisterRequest) -> StoreResult<AuthResponse>;
    async fn add_cart_item(&self, product_id: u64, quantity: u32) -> StoreResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

/// 提交的表单内容（注册模式才使用 name）
#[derive(Debug, Clone, Default)]
pub struct AuthForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// 认证成功的结果
#[derive(Debug)]
pub struct AuthOutcome {
    pub role: Role,
    /// 是否执行了延迟意图重放
    pub replayed: bool,
    /// 重放失败时的错误（意图此时已被清空，不会重试）
    pub replay_error: Option<StoreError>,
}

pub struct AuthFlow<A: AuthBackend, B: KvBackend> {
    api: A,
    session: Rc<SessionStore<B>>,
    intent: Rc<IntentSlot<B>>,
}

impl<A: AuthBackend, B: KvBackend> AuthFlow<A, B> {
    pub fn new(api: A, session: Rc<SessionStore<B>>, intent: Rc<IntentSlot<B>>) -> Self {
        Self {
            api,
            session,
            intent,
        }
    }

    /// 提交登录/注册并完成会话建立与意图处理
    pub async fn submit(&self, mode: AuthMode, form: &AuthForm) -> StoreResult<AuthOutcome> {
        let response = match mode {
            AuthMode::Login => {
                self.api
                    .login(&LoginRequest {
                        email: form.email.clone(),
                        password: form.password.clone(),
                    })
                    .await?
            }
            AuthMode::Register => {
                self.api
                    .register(&RegisterRequest {
                        name: form.name.clone(),
                        email: form.email.clone(),
                        password: form.password.clone(),
                    })
                    .await?
            }
        };

        let role = response.user.role;
        self.session
            .set_session(response.token, role, Some(response.user));

        if role == Role::Admin {
            // 角色确定的瞬间清掉残留意图，而不是等后台页面去收拾
            self.intent.discard();
            return Ok(AuthOutcome {
                role,
                replayed: false,
                replay_error: None,
            });
        }

        let mut replayed = false;
        let mut replay_error = None;
        if let Some(intent) = self.intent.take_if_present() {
            replayed = true;
            // 意图已出槽：重放只有这一次机会
            if let Err(err) = self
                .api
                .add_cart_item(intent.product_id, intent.quantity)
                .await
            {
                replay_error = Some(err);
            }
        }

        Ok(AuthOutcome {
            role,
            replayed,
            replay_error,
        })
    }
}

#[cfg(test)]
mod tests;
