//! 命令栈（CommandStack）
//!
//! 一个实例对应一次可补偿的逻辑事务：
//! - `execute` 先将命令入栈，再调用处理器，因此失败的处理器自身也会被补偿；
//! - 成功的命令保留在栈中，以便后续处理器失败时一并撤销；
//! - 任一处理器失败即逆序弹出全部命令并调用 `rollback`，补偿失败只记录不中断；
//! - 最终以 `AggregatedError` 返回：主错误恒为触发失败的原始错误。
//!
//! `execute` 需要 `&mut self`，同一实例无法在多个事务间并发共享。
//!
use crate::command::Command;
use crate::error::{AggregatedError, DomainError, RollbackFailure};
use crate::event::{Event, EventContext};
use crate::handler::EventHandler;
use std::sync::Arc;
use tracing::{debug, error, warn};

#[derive(Debug, Default)]
pub struct CommandStack {
    commands: Vec<Command>,
}

impl CommandStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// 待补偿的命令（按入栈顺序）
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// 执行处理器；失败时补偿全部已入栈命令并返回聚合错误
    pub fn execute(
        &mut self,
        handler: Arc<dyn EventHandler>,
        context: EventContext,
        event: Event,
    ) -> Result<(), AggregatedError> {
        let index = self.commands.len();
        self.commands.push(Command::new(handler, context, event));

        let command = &self.commands[index];
        debug!(
            handler = command.handler_name(),
            event = command.event().event_name(),
            depth = index + 1,
            "executing handler"
        );

        if let Err(err) = command.handle() {
            let handler_name = command.handler_name().to_string();
            let event_name = command.event().event_name().to_string();
            warn!(
                handler = %handler_name,
                event = %event_name,
                error = %err,
                pending = self.commands.len(),
                "handler failed, rolling back"
            );
            return Err(self.rollback(err, &handler_name, &event_name));
        }

        Ok(())
    }

    fn rollback(
        &mut self,
        original: DomainError,
        handler_name: &str,
        event_name: &str,
    ) -> AggregatedError {
        let mut failures = Vec::new();
        let mut lines = vec![format!(
            "error occurred in handler: {handler_name} for event: {event_name}"
        )];

        while let Some(command) = self.commands.pop() {
            let handler = command.handler_name();
            let event = command.event().event_name();

            match command.rollback() {
                Ok(()) => debug!(handler, event, "rollback completed"),
                Err(err) => {
                    error!(handler, event, error = %err, "rollback failed");
                    lines.push(format!(
                        "rollback failed for handler: {handler} on event: {event}"
                    ));
                    failures.push(RollbackFailure::new(handler, event, err));
                }
            }
        }

        AggregatedError::new(original, failures, lines.join("\n"))
    }
}
