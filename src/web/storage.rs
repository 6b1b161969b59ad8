//! LocalStorage 封装模块
//!
//! 使用 `web_sys::Storage` 提供简洁的本地存储接口，并暴露跨标签页
//! 的 storage 事件订阅（同一标签页内的写入不会触发该事件）。

use crate::kv::KvBackend;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

/// 本地存储操作封装
///
/// 作为会话与延迟意图的生产环境 KvBackend。
#[derive(Clone, Copy, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    /// 获取 LocalStorage 实例
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    /// 订阅其它标签页引起的存储变化
    ///
    /// 回调参数是发生变化的键（整库清空时为 None）。
    /// 监听器与页面同生命周期，闭包泄漏以保持存活。
    pub fn on_external_change(callback: impl Fn(Option<String>) + 'static) {
        let closure = Closure::<dyn Fn(web_sys::StorageEvent)>::new(
            move |event: web_sys::StorageEvent| {
                callback(event.key());
            },
        );

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("storage", closure.as_ref().unchecked_ref());
        }

        closure.forget();
    }
}

impl KvBackend for BrowserStorage {
    fn read(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn write(&self, key: &str, value: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.set_item(key, value);
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}
