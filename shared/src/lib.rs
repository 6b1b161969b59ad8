use serde::{Deserialize, Deserializer, Serialize};

pub mod date;
pub mod protocol;

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 默认的 API 基础地址（可在应用启动时覆盖）
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 账户角色
///
/// API 在用户对象中以小写字符串返回；注册响应缺省时按 `user` 处理。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// 从持久化的字符串恢复角色；未知值视为无效
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// 用户资料
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, deserialize_with = "date::deserialize_lenient")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// 商品价格
///
/// API 可能返回 JSON 数字，也可能返回带千分位分隔符的字符串（如 "1,299"）。
/// 反序列化时统一折算为 f64；无法解析的字符串按 0 处理。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
#[serde(transparent)]
pub struct Price(pub f64);

impl Price {
    #[inline]
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl From<f64> for Price {
    fn from(v: f64) -> Self {
        Self(v)
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{}", self.0 as i64)
        } else {
            write!(f, "{:.2}", self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PriceVisitor;

        impl serde::de::Visitor<'_> for PriceVisitor {
            type Value = Price;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a number or a numeric string")
            }

            fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Price, E> {
                Ok(Price(v))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Price, E> {
                Ok(Price(v as f64))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Price, E> {
                Ok(Price(v as f64))
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Price, E> {
                // 剔除千分位分隔符后再解析
                let cleaned: String = v.chars().filter(|c| *c != ',').collect();
                Ok(Price(cleaned.trim().parse::<f64>().unwrap_or(0.0)))
            }
        }

        deserializer.deserialize_any(PriceVisitor)
    }
}

/// 商品
///
/// `images` 字段是 API 原样存储的 JSON 编码字符串数组，
/// 展示层通过 [`Product::image_list`] 解码。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub images: String,
}

impl Product {
    /// 解码图片列表；格式异常时返回空列表而不是失败
    pub fn image_list(&self) -> Vec<String> {
        serde_json::from_str(&self.images).unwrap_or_default()
    }
}

/// 购物车行项目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    pub product_id: u64,
    pub quantity: u32,
    pub product: Product,
}

/// 订单状态
///
/// 服务端可能引入新的状态值，未知值统一归入 `Other`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OrderStatus {
    Completed,
    Pending,
    Other,
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "Completed" => OrderStatus::Completed,
            "Pending" => OrderStatus::Pending,
            _ => OrderStatus::Other,
        })
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Completed => write!(f, "Completed"),
            OrderStatus::Pending => write!(f, "Pending"),
            OrderStatus::Other => write!(f, "Processing"),
        }
    }
}

/// 订单行项目（仅详情接口返回）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_name: String,
    pub quantity: u32,
    pub price: Price,
}

/// 订单
///
/// 列表接口不返回 `items`，详情接口返回完整行项目。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub total: Price,
    pub status: OrderStatus,
    #[serde(default, deserialize_with = "date::deserialize_lenient")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// 后台总览统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_users: u64,
    pub total_products: u64,
    pub total_revenue: Price,
}

/// 后台用户列表条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: u64,
    pub name: String,
    pub email: String,
}

// =========================================================
// 分页
// =========================================================

/// 分页元信息
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub current_page: u32,
    pub last_page: u32,
    #[serde(default)]
    pub total: Option<u64>,
}

/// 分页响应包
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: Option<PageMeta>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_from_number() {
        let p: Price = serde_json::from_str("1299.5").unwrap();
        assert_eq!(p.value(), 1299.5);
        let p: Price = serde_json::from_str("700").unwrap();
        assert_eq!(p.value(), 700.0);
    }

    #[test]
    fn price_from_string_with_separators() {
        let p: Price = serde_json::from_str("\"1,299\"").unwrap();
        assert_eq!(p.value(), 1299.0);
        let p: Price = serde_json::from_str("\"garbage\"").unwrap();
        assert_eq!(p.value(), 0.0);
    }

    #[test]
    fn price_display() {
        assert_eq!(Price(700.0).to_string(), "700");
        assert_eq!(Price(12.5).to_string(), "12.50");
    }

    #[test]
    fn role_round_trip() {
        assert_eq!(Role::parse("user"), Some(Role::User));
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("root"), None);
        assert_eq!(Role::Admin.as_str(), "admin");
    }

    #[test]
    fn product_image_list_tolerates_malformed_payload() {
        let mut product = Product {
            id: 1,
            name: "Lamp".into(),
            description: String::new(),
            price: Price(10.0),
            stock: 3,
            images: "[\"a.jpg\",\"b.jpg\"]".into(),
        };
        assert_eq!(product.image_list(), vec!["a.jpg", "b.jpg"]);

        product.images = "not json".into();
        assert!(product.image_list().is_empty());
    }

    #[test]
    fn order_status_unknown_value_maps_to_other() {
        let status: OrderStatus = serde_json::from_str("\"Shipped\"").unwrap();
        assert_eq!(status, OrderStatus::Other);
        let status: OrderStatus = serde_json::from_str("\"Completed\"").unwrap();
        assert_eq!(status, OrderStatus::Completed);
    }

    #[test]
    fn order_list_entry_has_no_items() {
        let order: Order = serde_json::from_str(
            r#"{"id":9,"total":"2,500","status":"Pending","created_at":"2026-01-12T08:30:00Z"}"#,
        )
        .unwrap();
        assert!(order.items.is_empty());
        assert_eq!(order.total.value(), 2500.0);
    }

    #[test]
    fn user_profile_defaults_role_to_user() {
        let user: UserProfile =
            serde_json::from_str(r#"{"id":1,"name":"Ada","email":"ada@example.com"}"#).unwrap();
        assert_eq!(user.role, Role::User);
    }
}
