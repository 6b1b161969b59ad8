//! API 网关拦截器
//!
//! 所有出站请求的唯一通道：
//! - 出站：按当前会话附加 `Authorization: Bearer` 头
//! - 入站：集中处理鉴权失败——带 token 的受保护请求收到 401（或
//!   标志性的 invalid token 消息）时销毁会话并发出过期信号；
//!   公共/鉴权端点的失败原样透传（密码输错不应导致会话被清）
//!
//! 这里从不重试原始请求，错误最终都交还调用方。

use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use shopfront_shared::protocol::{ErrorBody, MSG_INVALID_TOKEN, is_public_path};
use std::cell::RefCell;
use std::rc::Rc;

// =========================================================
// 传输层抽象
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

/// 待执行的请求
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// 原始响应
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// 请求执行器
///
/// 传输层失败（网络不可达等）返回 Err；HTTP 错误状态属于正常响应，
/// 由网关归类。
#[async_trait(?Send)]
pub trait HttpTransport {
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, String>;
}

// =========================================================
// 会话接口
// =========================================================

/// 网关需要的最小会话视图：读 token、销毁会话
pub trait SessionAccess {
    fn token(&self) -> Option<String>;
    fn invalidate(&self);
}

// =========================================================
// 网关
// =========================================================

pub struct ApiGateway<T: HttpTransport> {
    transport: T,
    session: Rc<dyn SessionAccess>,
    base_url: String,
    expired_hook: RefCell<Option<Box<dyn Fn()>>>,
}

impl<T: HttpTransport> ApiGateway<T> {
    pub fn new(transport: T, session: Rc<dyn SessionAccess>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            transport,
            session,
            base_url,
            expired_hook: RefCell::new(None),
        }
    }

    /// 注册会话过期回调（由 UI 层弹出重新登录的选择）
    pub fn on_session_expired(&self, hook: impl Fn() + 'static) {
        *self.expired_hook.borrow_mut() = Some(Box::new(hook));
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// 执行请求并做集中错误归类；成功时返回原始响应
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> StoreResult<TransportResponse> {
        let token = self.session.token();

        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        if let Some(token) = &token {
            headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
        }

        let request = TransportRequest {
            method,
            url: self.url(path),
            headers,
            body,
        };

        let response = self
            .transport
            .execute(request)
            .await
            .map_err(StoreError::network)?;

        if (200..300).contains(&response.status) {
            return Ok(response);
        }

        let parsed: ErrorBody = serde_json::from_str(&response.body).unwrap_or_default();
        let fields = parsed.field_messages();
        let message = parsed.extract_message();

        // 会话过期流程仅针对：带 token 发出、目标不是公共/鉴权端点
        let auth_failure = response.status == 401 || message == MSG_INVALID_TOKEN;
        if auth_failure && token.is_some() && !is_public_path(path) {
            self.session.invalidate();
            if let Some(hook) = self.expired_hook.borrow().as_ref() {
                hook();
            }
            return Err(StoreError::unauthorized(message));
        }

        Err(StoreError::from_status(response.status, message, fields))
    }

    async fn request_json<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> StoreResult<R> {
        let response = self.request(method, path, body).await?;
        serde_json::from_str(&response.body)
            .map_err(|e| StoreError::serialization(format!("{} {}: {}", method.as_str(), path, e)))
    }

    // --- Typed helpers ---

    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> StoreResult<R> {
        self.request_json(Method::Get, path, None).await
    }

    pub async fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> StoreResult<R> {
        let body = serde_json::to_string(body).map_err(|e| StoreError::serialization(e.to_string()))?;
        self.request_json(Method::Post, path, Some(body)).await
    }

    /// POST 无请求体（如 /checkout）
    pub async fn post_empty<R: DeserializeOwned>(&self, path: &str) -> StoreResult<R> {
        self.request_json(Method::Post, path, None).await
    }

    // 不关心响应体的变体（删除、数量更新等场景调用后统一重新拉取）

    pub async fn post_ignore<B: Serialize>(&self, path: &str, body: &B) -> StoreResult<()> {
        let body = serde_json::to_string(body).map_err(|e| StoreError::serialization(e.to_string()))?;
        self.request(Method::Post, path, Some(body)).await?;
        Ok(())
    }

    pub async fn put_ignore<B: Serialize>(&self, path: &str, body: &B) -> StoreResult<()> {
        let body = serde_json::to_string(body).map_err(|e| StoreError::serialization(e.to_string()))?;
        self.request(Method::Put, path, Some(body)).await?;
        Ok(())
    }

    pub async fn patch_ignore<B: Serialize>(&self, path: &str, body: &B) -> StoreResult<()> {
        let body = serde_json::to_string(body).map_err(|e| StoreError::serialization(e.to_string()))?;
        self.request(Method::Patch, path, Some(body)).await?;
        Ok(())
    }

    pub async fn delete_ignore(&self, path: &str) -> StoreResult<()> {
        self.request(Method::Delete, path, None).await?;
        Ok(())
    }
}
