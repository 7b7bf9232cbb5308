//! 补偿式事件处理基础库（ddd-eventing）
//!
//! 按顺序执行一组事件处理器，任一处理器失败时，按逆序调用此前已进入的处理器的
//! 补偿逻辑（`rollback`），最终以单个聚合错误向调用方报告：
//! - 事件（`event`）：事件本体与处理时携带的业务上下文；
//! - 处理器（`handler`）：正向处理 `handle` 与补偿 `rollback` 的协议；
//! - 命令（`command`）：一次处理器调用的记录，仅用于补偿；
//! - 命令栈（`command_stack`）：先入栈再调用、失败时逆序回滚的核心状态机；
//! - 管道（`pipeline`）：为单个事件挑选处理器，并在全新的命令栈中依次执行。
//!
//! 本 crate 不关心处理器做什么，也不定义“撤销”的业务含义，只保证调用 `handle`
//! 与 `rollback` 的顺序以及失败的聚合方式。
//!
pub mod command;
pub mod command_stack;
pub mod error;
pub mod event;
pub mod handler;
pub mod pipeline;

pub use command::Command;
pub use command_stack::CommandStack;
pub use error::{AggregatedError, DomainError, DomainResult, RollbackFailure};
pub use event::{Event, EventContext};
pub use handler::{EventHandler, HandledEventType};
pub use pipeline::{EventPipeline, HandlerOrdering, PipelineConfig};
