//! 统一错误定义
//!
//! - `DomainError`：处理器在 `handle`/`rollback` 中抛出的错误，对命令栈不透明；
//! - `AggregatedError`：命令栈唯一产出的错误，携带触发失败的主错误与补偿阶段的全部失败。
//!
use thiserror::Error;

/// 处理器错误（对命令栈而言仅需可展示与可追溯 cause 链）
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("event handler error: handler={handler}, reason={reason}")]
    EventHandler { handler: String, reason: String },
    #[error("rollback error: handler={handler}, reason={reason}")]
    Rollback { handler: String, reason: String },
    #[error("invalid event: {reason}")]
    InvalidEvent { reason: String },
    #[error("invalid state: {reason}")]
    InvalidState { reason: String },
    #[error("serialization error: {source}")]
    Serde {
        #[from]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// 统一 Result 类型别名
pub type DomainResult<T> = Result<T, DomainError>;

/// 单条补偿失败记录
#[derive(Debug, Error)]
#[error("rollback failed for handler: {handler} on event: {event}")]
pub struct RollbackFailure {
    handler: String,
    event: String,
    #[source]
    error: DomainError,
}

impl RollbackFailure {
    pub(crate) fn new(
        handler: impl Into<String>,
        event: impl Into<String>,
        error: DomainError,
    ) -> Self {
        Self {
            handler: handler.into(),
            event: event.into(),
            error,
        }
    }

    pub fn handler(&self) -> &str {
        &self.handler
    }

    pub fn event(&self) -> &str {
        &self.event
    }

    pub fn error(&self) -> &DomainError {
        &self.error
    }
}

/// 聚合错误：一个主错误 + 按发生顺序排列的补偿失败
///
/// `source()` 总是指向主错误；补偿失败不会替换或隐藏它，
/// 但可以通过 `rollback_failures()` 逐一检查。
#[derive(Debug, Error)]
#[error("{message}")]
pub struct AggregatedError {
    #[source]
    primary_cause: DomainError,
    rollback_failures: Vec<RollbackFailure>,
    message: String,
}

impl AggregatedError {
    pub(crate) fn new(
        primary_cause: DomainError,
        rollback_failures: Vec<RollbackFailure>,
        message: String,
    ) -> Self {
        Self {
            primary_cause,
            rollback_failures,
            message,
        }
    }

    /// 触发补偿的原始错误
    pub fn primary_cause(&self) -> &DomainError {
        &self.primary_cause
    }

    /// 补偿阶段的失败（栈顶在前）
    pub fn rollback_failures(&self) -> &[RollbackFailure] {
        &self.rollback_failures
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// 所有补偿均成功
    pub fn is_clean_unwind(&self) -> bool {
        self.rollback_failures.is_empty()
    }

    pub fn into_parts(self) -> (DomainError, Vec<RollbackFailure>, String) {
        (self.primary_cause, self.rollback_failures, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn aggregated_error_sources_primary_cause() {
        let err = AggregatedError::new(
            DomainError::EventHandler {
                handler: "h2".into(),
                reason: "boom".into(),
            },
            vec![RollbackFailure::new(
                "h1",
                "user.created",
                DomainError::Rollback {
                    handler: "h1".into(),
                    reason: "undo failed".into(),
                },
            )],
            "error occurred in handler: h2 for event: user.created".into(),
        );

        assert_eq!(
            err.to_string(),
            "error occurred in handler: h2 for event: user.created"
        );
        let source = err.source().expect("primary cause as source");
        assert_eq!(
            source.to_string(),
            "event handler error: handler=h2, reason=boom"
        );
        assert!(!err.is_clean_unwind());

        let failure = &err.rollback_failures()[0];
        assert_eq!(failure.handler(), "h1");
        assert_eq!(failure.event(), "user.created");
        assert_eq!(
            failure.source().map(|e| e.to_string()),
            Some("rollback error: handler=h1, reason=undo failed".to_string())
        );
    }

    #[test]
    fn anyhow_errors_keep_their_message() {
        let err: DomainError = anyhow::anyhow!("downstream unavailable").into();
        assert_eq!(err.to_string(), "downstream unavailable");
    }
}
