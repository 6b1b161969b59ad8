//! 路由定义模块 - 领域模型
//!
//! 纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义应用的所有路由、路径互转及各自的访问策略。

use crate::guard::RoutePolicy;
use shopfront_shared::Role;
use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 商品目录 (默认路由)
    #[default]
    Home,
    /// 商品详情
    ProductDetail(u64),
    /// 购物车
    Cart,
    /// 订单历史 (仅 user)
    Orders,
    /// 后台面板 (仅 admin)
    Admin,
    /// 后台新建商品
    AdminProductCreate,
    /// 后台编辑商品；page 记录来源列表页便于返回
    AdminProductEdit { id: u64, page: u32 },
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Self::Home,
            ["product", id] => id
                .parse()
                .map(Self::ProductDetail)
                .unwrap_or(Self::NotFound),
            ["cart"] => Self::Cart,
            ["orders"] => Self::Orders,
            ["admin"] => Self::Admin,
            ["admin", "products", "create"] => Self::AdminProductCreate,
            ["admin", "products", "edit", id, page] => match (id.parse(), page.parse()) {
                (Ok(id), Ok(page)) => Self::AdminProductEdit { id, page },
                _ => Self::NotFound,
            },
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::ProductDetail(id) => format!("/product/{}", id),
            Self::Cart => "/cart".to_string(),
            Self::Orders => "/orders".to_string(),
            Self::Admin => "/admin".to_string(),
            Self::AdminProductCreate => "/admin/products/create".to_string(),
            Self::AdminProductEdit { id, page } => format!("/admin/products/edit/{}/{}", id, page),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// **路由的访问策略**：守卫据此决策
    ///
    /// 店面页面对管理员关闭（送回后台），后台页面仅管理员可见，
    /// 订单历史仅普通用户可见。
    pub fn policy(&self) -> RoutePolicy {
        match self {
            Self::Home | Self::ProductDetail(_) | Self::Cart => {
                RoutePolicy::restrict(&[Role::Admin])
            }
            Self::Orders => RoutePolicy::allow(&[Role::User]),
            Self::Admin | Self::AdminProductCreate | Self::AdminProductEdit { .. } => {
                RoutePolicy::allow(&[Role::Admin])
            }
            Self::NotFound => RoutePolicy::PUBLIC,
        }
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_print_round_trip() {
        let routes = [
            AppRoute::Home,
            AppRoute::ProductDetail(7),
            AppRoute::Cart,
            AppRoute::Orders,
            AppRoute::Admin,
            AppRoute::AdminProductCreate,
            AppRoute::AdminProductEdit { id: 12, page: 3 },
        ];
        for route in routes {
            assert_eq!(AppRoute::from_path(&route.to_path()), route);
        }
    }

    #[test]
    fn unknown_and_malformed_paths_fall_through() {
        assert_eq!(AppRoute::from_path("/nope"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/product/abc"), AppRoute::NotFound);
        assert_eq!(
            AppRoute::from_path("/admin/products/edit/7"),
            AppRoute::NotFound
        );
    }

    #[test]
    fn trailing_slash_is_tolerated() {
        assert_eq!(AppRoute::from_path("/cart/"), AppRoute::Cart);
        assert_eq!(AppRoute::from_path("/"), AppRoute::Home);
    }

    #[test]
    fn storefront_routes_are_closed_to_admins() {
        for route in [AppRoute::Home, AppRoute::ProductDetail(1), AppRoute::Cart] {
            assert_eq!(route.policy().restricted, &[Role::Admin]);
            assert!(route.policy().allowed.is_empty());
        }
    }

    #[test]
    fn back_office_routes_are_admin_only() {
        for route in [
            AppRoute::Admin,
            AppRoute::AdminProductCreate,
            AppRoute::AdminProductEdit { id: 1, page: 1 },
        ] {
            assert_eq!(route.policy().allowed, &[Role::Admin]);
        }
    }
}
