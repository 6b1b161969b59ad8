//! 持久化键值存储抽象
//!
//! 会话与延迟意图的唯一持久化出口。生产实现是浏览器 LocalStorage
//! （`web::BrowserStorage`），测试注入内存实现。

use std::rc::Rc;

// =========================================================
// 存储键
// =========================================================

pub const KEY_TOKEN: &str = "token";
pub const KEY_ROLE: &str = "role";
pub const KEY_USER: &str = "user";
pub const KEY_PENDING_CART: &str = "pendingAddToCart";

// =========================================================
// 抽象存储接口
// =========================================================

pub trait KvBackend {
    /// 读取键对应的值；不存在或读取失败返回 None
    fn read(&self, key: &str) -> Option<String>;
    /// 写入键值（覆盖）
    fn write(&self, key: &str, value: &str);
    /// 删除键
    fn remove(&self, key: &str);
}

impl<B: KvBackend> KvBackend for Rc<B> {
    fn read(&self, key: &str) -> Option<String> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key)
    }
}

// =========================================================
// 测试环境实现 (Mock)
// =========================================================

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// 内存键值存储，用于宿主环境测试
    #[derive(Default)]
    pub struct MemoryKv {
        data: RefCell<HashMap<String, String>>,
    }

    impl MemoryKv {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn contains(&self, key: &str) -> bool {
            self.data.borrow().contains_key(key)
        }
    }

    impl KvBackend for MemoryKv {
        fn read(&self, key: &str) -> Option<String> {
            self.data.borrow().get(key).cloned()
        }

        fn write(&self, key: &str, value: &str) {
            self.data
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
        }

        fn remove(&self, key: &str) {
            self.data.borrow_mut().remove(key);
        }
    }
}
