//! 事件管道（EventPipeline）
//!
//! 为单个事件挑选匹配的处理器，并在全新的 `CommandStack` 中依次执行：
//! - 每次 `handle_event` 独占一个命令栈，管道本身可跨线程共享；
//! - 按配置的顺序执行，首个失败即停止，后续处理器不会进入；
//! - 失败时由命令栈完成补偿并返回 `AggregatedError`。
//!
use crate::command_stack::CommandStack;
use crate::error::AggregatedError;
use crate::event::{Event, EventContext};
use crate::handler::EventHandler;
use bon::Builder;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::sync::Arc;
use tracing::{debug, info_span};

// 导入由 bon::Builder 生成的 typestate 模块与状态转换别名
use self::event_pipeline_builder::{IsUnset, SetRegistry, State as BuilderState};

#[derive(Builder)]
pub struct EventPipeline {
    #[builder(setters(vis = "pub(crate)"))]
    registry: HandlerRegistry,
    #[builder(default)]
    config: PipelineConfig,
}

impl<S: BuilderState> EventPipelineBuilder<S> {
    pub fn handlers(
        self,
        handlers: Vec<Arc<dyn EventHandler>>,
    ) -> EventPipelineBuilder<SetRegistry<S>>
    where
        <S as BuilderState>::Registry: IsUnset,
    {
        self.registry(HandlerRegistry::new(handlers))
    }
}

impl EventPipeline {
    pub fn new(handlers: Vec<Arc<dyn EventHandler>>) -> Self {
        Self::builder().handlers(handlers).build()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// 按配置顺序返回将处理该事件的处理器
    pub fn handlers_for(&self, event: &Event) -> Vec<Arc<dyn EventHandler>> {
        let mut selected: Vec<Arc<dyn EventHandler>> = self
            .registry
            .matching(event.event_name())
            .filter(|h| !self.config.skip_disabled || h.is_enabled())
            .collect();

        if self.config.ordering == HandlerOrdering::Priority {
            // 稳定排序：同优先级保持注册顺序
            selected.sort_by_key(|h| Reverse(h.priority()));
        }
        selected
    }

    /// 处理单个事件，返回实际执行的处理器数量
    pub fn handle_event(
        &self,
        context: &EventContext,
        event: &Event,
    ) -> Result<usize, AggregatedError> {
        let span = info_span!(
            "handle_event",
            event = event.event_name(),
            event_id = event.event_id()
        );
        let _guard = span.enter();

        let handlers = self.handlers_for(event);
        if handlers.is_empty() {
            debug!("no handler registered for event");
            return Ok(0);
        }

        let mut stack = CommandStack::new();
        for handler in handlers {
            stack.execute(handler, context.clone(), event.clone())?;
        }

        debug!(executed = stack.len(), "event handled");
        Ok(stack.len())
    }
}

struct HandlerRegistry {
    handlers: Vec<Arc<dyn EventHandler>>,
}

impl HandlerRegistry {
    fn new(handlers: Vec<Arc<dyn EventHandler>>) -> Self {
        Self { handlers }
    }

    fn matching<'a>(
        &'a self,
        event_name: &'a str,
    ) -> impl Iterator<Item = Arc<dyn EventHandler>> + 'a {
        self.handlers
            .iter()
            .filter(move |h| h.handled_event_type().matches(event_name))
            .cloned()
    }
}

/// 处理器执行顺序
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlerOrdering {
    /// 注册顺序
    Registration,
    /// 优先级从高到低，同级按注册顺序
    #[default]
    Priority,
}

/// 事件管道配置
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub ordering: HandlerOrdering,
    /// 跳过 `is_enabled() == false` 的处理器
    pub skip_disabled: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            ordering: HandlerOrdering::Priority,
            skip_disabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn config_defaults_fill_missing_fields() {
        let cfg: PipelineConfig =
            serde_json::from_value(json!({ "ordering": "registration" })).unwrap();
        assert_eq!(cfg.ordering, HandlerOrdering::Registration);
        assert!(cfg.skip_disabled);

        let cfg: PipelineConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(cfg, PipelineConfig::default());
    }

    #[test]
    fn empty_pipeline_handles_nothing() {
        let pipeline = EventPipeline::new(vec![]);
        let n = pipeline
            .handle_event(&EventContext::default(), &Event::new("noop"))
            .unwrap();
        assert_eq!(n, 0);
    }
}
