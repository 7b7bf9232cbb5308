//! 命令（Command）：一次处理器调用的不可变记录
//!
use crate::error::DomainResult;
use crate::event::{Event, EventContext};
use crate::handler::EventHandler;
use std::fmt;
use std::sync::Arc;

/// 记录处理器与调用它时的上下文、事件，仅用于补偿
pub struct Command {
    handler: Arc<dyn EventHandler>,
    context: EventContext,
    event: Event,
}

impl Command {
    pub fn new(handler: Arc<dyn EventHandler>, context: EventContext, event: Event) -> Self {
        Self {
            handler,
            context,
            event,
        }
    }

    pub fn handler(&self) -> &Arc<dyn EventHandler> {
        &self.handler
    }

    pub fn handler_name(&self) -> &str {
        self.handler.handler_name()
    }

    pub fn context(&self) -> &EventContext {
        &self.context
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    pub(crate) fn handle(&self) -> DomainResult<()> {
        self.handler.handle(&self.context, &self.event)
    }

    pub(crate) fn rollback(&self) -> DomainResult<()> {
        self.handler.rollback(&self.context, &self.event)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("handler", &self.handler_name())
            .field("context", &self.context)
            .field("event", &self.event)
            .finish()
    }
}
