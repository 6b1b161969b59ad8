//! 进程内事件总线
//!
//! 互不相识的组件之间的跨组件信号（打开登录框、刷新购物车角标、
//! 会话过期），取代挂在全局对象上的临时触发器。

use std::cell::RefCell;

/// 类型化的 UI 事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    /// 请求打开认证弹窗
    OpenAuthModal,
    /// 请求重新计算购物车角标
    RefreshCartBadge,
    /// 网关判定会话已失效
    SessionExpired,
}

type Handler = Box<dyn Fn(UiEvent)>;

/// 事件总线
///
/// 单线程事件循环内使用；emit 同步派发给所有订阅者。
#[derive(Default)]
pub struct EventBus {
    listeners: RefCell<Vec<Handler>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, handler: impl Fn(UiEvent) + 'static) {
        self.listeners.borrow_mut().push(Box::new(handler));
    }

    pub fn emit(&self, event: UiEvent) {
        for listener in self.listeners.borrow().iter() {
            listener(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn every_subscriber_sees_every_event() {
        let bus = EventBus::new();
        let log: Rc<RefCell<Vec<(u8, UiEvent)>>> = Rc::new(RefCell::new(Vec::new()));

        for id in 0..2u8 {
            let sink = log.clone();
            bus.subscribe(move |ev| sink.borrow_mut().push((id, ev)));
        }

        bus.emit(UiEvent::OpenAuthModal);
        bus.emit(UiEvent::RefreshCartBadge);

        assert_eq!(
            *log.borrow(),
            vec![
                (0, UiEvent::OpenAuthModal),
                (1, UiEvent::OpenAuthModal),
                (0, UiEvent::RefreshCartBadge),
                (1, UiEvent::RefreshCartBadge),
            ]
        );
    }
}
