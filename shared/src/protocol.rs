//! API 协议层
//!
//! 定义客户端与远端 REST API 之间的请求/响应载荷，以及网关拦截器
//! 依赖的公共路径判定和错误消息提取规则。

use crate::{CartEntry, Order, Product, UserProfile};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =========================================================
// 鉴权相关
// =========================================================

/// 鉴权失败的标志性消息
///
/// 网关拦截器把它与 401 状态码等价对待（服务端部分场景以 200 以外的
/// 状态码携带该消息返回）。
pub const MSG_INVALID_TOKEN: &str = "Unauthorized or invalid token";

/// 公共/鉴权端点判定
///
/// 命中的请求即使返回鉴权失败也不触发会话销毁（例如密码输错是预期内
/// 的失败），见网关拦截器。
pub fn is_public_path(path: &str) -> bool {
    const PUBLIC_MARKERS: [&str; 4] = ["/auth/", "/public/", "/register", "/login"];
    PUBLIC_MARKERS.iter().any(|marker| path.contains(marker))
}

// =========================================================
// 请求载荷
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddCartItemRequest {
    pub product_id: u64,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCartItemRequest {
    pub quantity: u32,
}

/// 商品创建/更新载荷
///
/// `images` 与存储格式一致：JSON 编码的字符串数组。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPayload {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: u32,
    pub images: String,
}

// =========================================================
// 响应载荷
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    pub user: UserProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartEnvelope {
    #[serde(default)]
    pub cart: Vec<CartEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductEnvelope {
    pub data: Product,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderEnvelope {
    pub data: Order,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResponse {
    #[serde(default)]
    pub message: Option<String>,
}

// =========================================================
// 错误响应
// =========================================================

/// 服务端错误响应体
///
/// 三种形态并存：字段级校验错误 `errors`、顶层 `message`、顶层 `error`。
/// 提取顺序与展示约定见 [`ErrorBody::extract_message`]。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

impl ErrorBody {
    /// 字段级错误消息，按字段名顺序展平
    pub fn field_messages(&self) -> Vec<String> {
        self.errors
            .as_ref()
            .map(|map| map.values().flatten().cloned().collect())
            .unwrap_or_default()
    }

    /// 提取用户可读消息：字段错误 -> message -> error -> 兜底文案
    pub fn extract_message(&self) -> String {
        let fields = self.field_messages();
        if !fields.is_empty() {
            return fields.join(" ");
        }
        if let Some(message) = &self.message {
            return message.clone();
        }
        if let Some(error) = &self.error {
            return error.clone();
        }
        "Something went wrong.".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_path_detection() {
        assert!(is_public_path("/auth/login"));
        assert!(is_public_path("/auth/me"));
        assert!(is_public_path("/public/products?page=2"));
        assert!(is_public_path("/register"));
        assert!(!is_public_path("/cart"));
        assert!(!is_public_path("/orders/3"));
        assert!(!is_public_path("/admin/dashboard"));
    }

    #[test]
    fn error_body_prefers_field_errors() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"message":"The given data was invalid.","errors":{"email":["Email is taken."],"password":["Too short."]}}"#,
        )
        .unwrap();
        assert_eq!(body.extract_message(), "Email is taken. Too short.");
    }

    #[test]
    fn error_body_falls_back_to_message_then_error() {
        let body: ErrorBody = serde_json::from_str(r#"{"message":"Invalid credentials"}"#).unwrap();
        assert_eq!(body.extract_message(), "Invalid credentials");

        let body: ErrorBody = serde_json::from_str(r#"{"error":"boom"}"#).unwrap();
        assert_eq!(body.extract_message(), "boom");

        let body = ErrorBody::default();
        assert_eq!(body.extract_message(), "Something went wrong.");
    }
}
