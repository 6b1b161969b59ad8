//! 延迟加购意图
//!
//! 匿名访客点击加购时，把意图暂存到持久化存储，等认证完成后重放。
//! 全程最多存在一条意图：新的尝试覆盖旧的。

use crate::kv::{KEY_PENDING_CART, KvBackend};
use serde::{Deserialize, Serialize};

/// 暂存的加购意图
///
/// 存储格式沿用 camelCase JSON（`{"productId":7,"quantity":3}`）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeferredIntent {
    pub product_id: u64,
    pub quantity: u32,
}

/// 单槽位意图队列
pub struct IntentSlot<B: KvBackend> {
    backend: B,
}

impl<B: KvBackend> IntentSlot<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// 暂存意图，覆盖已有的
    pub fn defer(&self, product_id: u64, quantity: u32) {
        let intent = DeferredIntent {
            product_id,
            quantity,
        };
        if let Ok(raw) = serde_json::to_string(&intent) {
            self.backend.write(KEY_PENDING_CART, &raw);
        }
    }

    /// 取出并清空意图；槽位为空时返回 None
    ///
    /// 坏数据也会被清掉，避免反复触发失败的重放。
    pub fn take_if_present(&self) -> Option<DeferredIntent> {
        let raw = self.backend.read(KEY_PENDING_CART)?;
        self.backend.remove(KEY_PENDING_CART);
        serde_json::from_str(&raw).ok()
    }

    /// 直接丢弃意图（管理员登录等场景）
    pub fn discard(&self) {
        self.backend.remove(KEY_PENDING_CART);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::tests::MemoryKv;
    use std::rc::Rc;

    #[test]
    fn single_slot_keeps_only_the_latest_intent() {
        let kv = Rc::new(MemoryKv::new());
        let slot = IntentSlot::new(kv);

        slot.defer(1, 1);
        slot.defer(2, 2);

        assert_eq!(
            slot.take_if_present(),
            Some(DeferredIntent {
                product_id: 2,
                quantity: 2
            })
        );
        // Slot is now empty; a second take is a safe no-op
        assert_eq!(slot.take_if_present(), None);
    }

    #[test]
    fn stored_payload_uses_camel_case_keys() {
        let kv = Rc::new(MemoryKv::new());
        let slot = IntentSlot::new(kv.clone());

        slot.defer(7, 3);
        let raw = kv.read("pendingAddToCart").unwrap();
        assert_eq!(raw, r#"{"productId":7,"quantity":3}"#);
    }

    #[test]
    fn malformed_payload_is_cleared_not_replayed() {
        let kv = Rc::new(MemoryKv::new());
        kv.write("pendingAddToCart", "{broken");

        let slot = IntentSlot::new(kv.clone());
        assert_eq!(slot.take_if_present(), None);
        assert!(!kv.contains("pendingAddToCart"));
    }

    #[test]
    fn discard_clears_without_returning() {
        let kv = Rc::new(MemoryKv::new());
        let slot = IntentSlot::new(kv.clone());

        slot.defer(5, 1);
        slot.discard();
        assert!(!kv.contains("pendingAddToCart"));
    }
}
