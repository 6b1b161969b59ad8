//! 购物车角标同步器
//!
//! 角标数量是派生值：服务端购物车才是事实来源，这里只负责重新计算。
//! 匿名会话直接归零且不发请求；请求失败保留旧值；会话在请求期间
//! 发生变化时丢弃迟到的响应。

use crate::error::StoreResult;
use crate::kv::KvBackend;
use crate::session::SessionStore;
use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// 角标数量来源（行项目数）
#[async_trait(?Send)]
pub trait CartCountSource {
    async fn line_item_count(&self) -> StoreResult<usize>;
}

pub struct CartBadge<S: CartCountSource, B: KvBackend> {
    source: S,
    session: Rc<SessionStore<B>>,
    count: Cell<usize>,
    on_change: RefCell<Option<Box<dyn Fn(usize)>>>,
}

impl<S: CartCountSource, B: KvBackend> CartBadge<S, B> {
    pub fn new(source: S, session: Rc<SessionStore<B>>) -> Self {
        Self {
            source,
            session,
            count: Cell::new(0),
            on_change: RefCell::new(None),
        }
    }

    /// 注册数量变化回调（视图层把它接到信号上）
    pub fn on_change(&self, hook: impl Fn(usize) + 'static) {
        *self.on_change.borrow_mut() = Some(Box::new(hook));
    }

    pub fn count(&self) -> usize {
        self.count.get()
    }

    /// 重新计算角标
    ///
    /// 失败时返回 Err 且旧值保持不变，由调用方决定是否记录日志。
    pub async fn refresh(&self) -> StoreResult<usize> {
        let token = match self.session.snapshot().token {
            Some(token) => token,
            None => {
                self.apply(0);
                return Ok(0);
            }
        };

        let count = self.source.line_item_count().await?;

        // 请求期间会话被清除或更换：这是一条迟到的响应，丢弃
        if self.session.snapshot().token.as_deref() != Some(token.as_str()) {
            return Ok(self.count.get());
        }

        self.apply(count);
        Ok(count)
    }

    fn apply(&self, count: usize) {
        self.count.set(count);
        if let Some(hook) = self.on_change.borrow().as_ref() {
            hook(count);
        }
    }
}

#[cfg(test)]
mod tests;
