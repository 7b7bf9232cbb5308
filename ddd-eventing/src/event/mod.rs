//! 事件与处理上下文
//!
//! `Event` 是处理器消费的具名事件（名称 + 属性集合），
//! `EventContext` 承载一次处理链路的横切信息（关联追踪、执行主体等）。

mod event_context;
mod named_event;

pub use event_context::EventContext;
pub use named_event::Event;
