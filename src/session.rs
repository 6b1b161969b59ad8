//! 会话存储
//!
//! 持有 token / 角色 / 用户资料的唯一所有者。其它组件只读快照，
//! 变更必须经由这里的操作（set_session / clear_session / set_profile）。
//!
//! 保证：任何一次变更都先完成完整的快照替换再通知订阅者，
//! 并发读取只会看到全旧或全新的快照，不存在半新半旧的状态。

use crate::kv::{KEY_ROLE, KEY_TOKEN, KEY_USER, KvBackend};
use shopfront_shared::{Role, UserProfile};
use std::cell::RefCell;

/// 会话快照
///
/// 不变式：`role` 存在当且仅当 `token` 存在；二者任一缺失即匿名。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionSnapshot {
    pub token: Option<String>,
    pub role: Option<Role>,
    pub profile: Option<UserProfile>,
}

impl SessionSnapshot {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == Some(role)
    }
}

type Listener = Box<dyn Fn(&SessionSnapshot)>;

/// 会话存储
///
/// 进程内单例（由应用上下文持有），写穿后端存储以跨页面刷新存活。
pub struct SessionStore<B: KvBackend> {
    backend: B,
    state: RefCell<SessionSnapshot>,
    listeners: RefCell<Vec<Listener>>,
}

impl<B: KvBackend> SessionStore<B> {
    pub fn new(backend: B) -> Self {
        let initial = Self::load(&backend);
        Self {
            backend,
            state: RefCell::new(initial),
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// 从后端存储恢复快照
    ///
    /// token 与 role 必须同时有效，否则一律视为匿名（不变式兜底，
    /// 比如其它标签页只清掉了其中一个键）。
    fn load(backend: &B) -> SessionSnapshot {
        let token = backend.read(KEY_TOKEN);
        let role = backend.read(KEY_ROLE).as_deref().and_then(Role::parse);

        match (token, role) {
            (Some(token), Some(role)) => {
                let profile = backend
                    .read(KEY_USER)
                    .and_then(|raw| serde_json::from_str(&raw).ok());
                SessionSnapshot {
                    token: Some(token),
                    role: Some(role),
                    profile,
                }
            }
            _ => SessionSnapshot::default(),
        }
    }

    /// 当前快照（纯读取，无副作用）
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    /// 建立会话：写穿存储，替换快照，通知订阅者
    pub fn set_session(&self, token: String, role: Role, profile: Option<UserProfile>) {
        self.backend.write(KEY_TOKEN, &token);
        self.backend.write(KEY_ROLE, role.as_str());
        match &profile {
            Some(profile) => {
                if let Ok(raw) = serde_json::to_string(profile) {
                    self.backend.write(KEY_USER, &raw);
                }
            }
            None => self.backend.remove(KEY_USER),
        }

        let next = SessionSnapshot {
            token: Some(token),
            role: Some(role),
            profile,
        };
        self.replace(next);
    }

    /// 销毁会话：清空存储键，替换为匿名快照，通知订阅者
    pub fn clear_session(&self) {
        self.backend.remove(KEY_TOKEN);
        self.backend.remove(KEY_ROLE);
        self.backend.remove(KEY_USER);
        self.replace(SessionSnapshot::default());
    }

    /// 更新用户资料（懒加载 /auth/me 的回写）
    ///
    /// 会话已失效时丢弃——这是对迟到响应的防御。
    pub fn set_profile(&self, profile: UserProfile) {
        let mut next = self.snapshot();
        if next.token.is_none() {
            return;
        }
        if let Ok(raw) = serde_json::to_string(&profile) {
            self.backend.write(KEY_USER, &raw);
        }
        next.profile = Some(profile);
        self.replace(next);
    }

    /// 注册订阅者；任何代码路径引起的会话变更都会回调
    pub fn subscribe(&self, listener: impl Fn(&SessionSnapshot) + 'static) {
        self.listeners.borrow_mut().push(Box::new(listener));
    }

    /// 从后端存储重新加载（跨标签页 storage 事件入口）
    ///
    /// 后端以最后写入为准；快照未变化时不通知。
    pub fn reload_from_backend(&self) {
        let next = Self::load(&self.backend);
        if next == *self.state.borrow() {
            return;
        }
        self.replace(next);
    }

    /// 原子替换快照后再派发通知
    fn replace(&self, next: SessionSnapshot) {
        *self.state.borrow_mut() = next.clone();
        for listener in self.listeners.borrow().iter() {
            listener(&next);
        }
    }
}

#[cfg(test)]
mod tests;
