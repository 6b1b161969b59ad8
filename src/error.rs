use std::fmt;

// =========================================================
// 错误状态枚举
// =========================================================

/// 错误类别
/// 对应 HTTP 状态语义与本地失败场景
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    /// 网络不可达、请求未能发出
    Network,
    /// 响应体解析失败（非预期的载荷形态）
    Serialization,
    /// 401: 鉴权失败
    Unauthorized,
    /// 404: 资源未找到
    NotFound,
    /// 400/422: 业务校验失败
    Validation,
    /// 5xx 及其它服务端失败
    Server,
}

impl StoreErrorKind {
    pub fn error_code(&self) -> &'static str {
        match self {
            StoreErrorKind::Network => "NETWORK_ERROR",
            StoreErrorKind::Serialization => "JSON_PARSE_ERROR",
            StoreErrorKind::Unauthorized => "UNAUTHORIZED",
            StoreErrorKind::NotFound => "RESOURCE_NOT_FOUND",
            StoreErrorKind::Validation => "INVALID_INPUT",
            StoreErrorKind::Server => "SERVER_ERROR",
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

/// 客户端领域错误
///
/// - kind: 错误类别
/// - message: 用户可读消息
/// - fields: 字段级校验消息（仅 Validation 场景非空）
#[derive(Debug, Clone, PartialEq)]
pub struct StoreError {
    pub kind: StoreErrorKind,
    pub message: String,
    pub fields: Vec<String>,
}

impl StoreError {
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    // --- Convenience constructors ---

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Network, message)
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Serialization, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Unauthorized, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::NotFound, message)
    }

    pub fn validation(message: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            kind: StoreErrorKind::Validation,
            message: message.into(),
            fields,
        }
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Server, message)
    }

    /// 按 HTTP 状态码归类
    pub fn from_status(status: u16, message: String, fields: Vec<String>) -> Self {
        match status {
            400 | 422 => Self::validation(message, fields),
            401 | 403 => Self::unauthorized(message),
            404 => Self::not_found(message),
            _ => Self::server(message),
        }
    }

    // --- Accessors ---

    pub fn error_code(&self) -> &'static str {
        self.kind.error_code()
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == StoreErrorKind::Unauthorized
    }

    /// 面向用户的完整消息（字段错误并入）
    pub fn user_message(&self) -> String {
        if self.fields.is_empty() {
            self.message.clone()
        } else {
            self.fields.join(" ")
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.message)
    }
}

impl std::error::Error for StoreError {}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        assert_eq!(
            StoreError::from_status(401, "no".into(), vec![]).kind,
            StoreErrorKind::Unauthorized
        );
        assert_eq!(
            StoreError::from_status(404, "gone".into(), vec![]).kind,
            StoreErrorKind::NotFound
        );
        assert_eq!(
            StoreError::from_status(422, "bad".into(), vec![]).kind,
            StoreErrorKind::Validation
        );
        assert_eq!(
            StoreError::from_status(503, "down".into(), vec![]).kind,
            StoreErrorKind::Server
        );
    }

    #[test]
    fn display_includes_code() {
        let err = StoreError::unauthorized("Session expired");
        assert_eq!(err.to_string(), "[UNAUTHORIZED] Session expired");
    }

    #[test]
    fn user_message_prefers_field_errors() {
        let err = StoreError::validation(
            "The given data was invalid.".to_string(),
            vec!["Email is taken.".into(), "Too short.".into()],
        );
        assert_eq!(err.user_message(), "Email is taken. Too short.");
    }
}
