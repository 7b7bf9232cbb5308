//! 事件处理器（EventHandler）
//!
//! 定义正向处理 `handle` 与补偿 `rollback` 两个能力，以及匹配与排序所需的元信息
//! （名称、订阅的事件、优先级、启用状态）。
//!
use crate::error::DomainResult;
use crate::event::{Event, EventContext};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandledEventType {
    One(String),
    Many(Vec<String>),
    All,
}

impl HandledEventType {
    pub fn matches(&self, event_name: &str) -> bool {
        match self {
            HandledEventType::All => true,
            HandledEventType::One(name) => name == event_name,
            HandledEventType::Many(names) => names.iter().any(|n| n == event_name),
        }
    }
}

/// 事件处理器
pub trait EventHandler: Send + Sync {
    /// 处理器名称（用于诊断信息）
    fn handler_name(&self) -> &str;

    /// 处理事件
    fn handle(&self, context: &EventContext, event: &Event) -> DomainResult<()>;

    /// 撤销 `handle` 的效果
    ///
    /// `handle` 失败时同样会被调用，实现需要容忍只完成了一部分的 `handle`。
    fn rollback(&self, context: &EventContext, event: &Event) -> DomainResult<()>;

    /// 订阅的事件，默认全部
    fn handled_event_type(&self) -> HandledEventType {
        HandledEventType::All
    }

    /// 优先级，数值越大越先执行
    fn priority(&self) -> i32 {
        0
    }

    fn is_enabled(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handled_event_type_matching() {
        assert!(HandledEventType::All.matches("anything"));
        assert!(HandledEventType::One("a".into()).matches("a"));
        assert!(!HandledEventType::One("a".into()).matches("b"));

        let many = HandledEventType::Many(vec!["a".into(), "b".into()]);
        assert!(many.matches("b"));
        assert!(!many.matches("c"));
    }
}
