//! 路由守卫 - 纯决策函数
//!
//! 不依赖 DOM 与路由器实现：输入当前会话快照与路由策略，
//! 输出放行或重定向。判定顺序是语义的一部分：
//! 受限角色检查优先于许可角色检查，角色不符一律静默重定向回首页。

use crate::session::SessionSnapshot;
use shopfront_shared::Role;

/// 守卫决策
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    RedirectTo(&'static str),
}

/// 路由访问策略
///
/// - 两个集合都为空：公开路由
/// - `allowed` 非空：仅列出的角色可访问
/// - `restricted` 非空：列出的角色被拒之门外（优先生效）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoutePolicy {
    pub allowed: &'static [Role],
    pub restricted: &'static [Role],
}

impl RoutePolicy {
    pub const PUBLIC: RoutePolicy = RoutePolicy {
        allowed: &[],
        restricted: &[],
    };

    pub const fn allow(roles: &'static [Role]) -> Self {
        Self {
            allowed: roles,
            restricted: &[],
        }
    }

    pub const fn restrict(roles: &'static [Role]) -> Self {
        Self {
            allowed: &[],
            restricted: roles,
        }
    }

    pub fn is_public(&self) -> bool {
        self.allowed.is_empty() && self.restricted.is_empty()
    }
}

/// **核心守卫逻辑**
///
/// 1. 无任何策略 -> 放行（公开路由）
/// 2. 匿名会话：仅当路由没有许可角色要求时放行，否则回首页
/// 3. 命中受限集合：管理员送回 /admin，其余回首页
/// 4. 有许可集合但角色不在其中：回首页
/// 5. 其余放行
pub fn decide(session: &SessionSnapshot, policy: &RoutePolicy) -> RouteDecision {
    if policy.is_public() {
        return RouteDecision::Allow;
    }

    let role = match (&session.token, session.role) {
        (Some(_), Some(role)) => role,
        // 不变式兜底：token 与 role 任一缺失都按匿名处理
        _ => {
            if !policy.allowed.is_empty() {
                return RouteDecision::RedirectTo("/");
            }
            return RouteDecision::Allow;
        }
    };

    if policy.restricted.contains(&role) {
        return match role {
            Role::Admin => RouteDecision::RedirectTo("/admin"),
            _ => RouteDecision::RedirectTo("/"),
        };
    }

    if !policy.allowed.is_empty() && !policy.allowed.contains(&role) {
        return RouteDecision::RedirectTo("/");
    }

    RouteDecision::Allow
}

#[cfg(test)]
mod tests;
