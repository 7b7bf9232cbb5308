use crate::error::{DomainError, DomainResult};
use bon::Builder;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// 具名事件
///
/// 事件名用于处理器匹配与诊断信息，属性集合对命令栈不透明。
#[derive(Builder, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[builder(default = Uuid::new_v4().to_string())]
    event_id: String,
    #[builder(into)]
    event_name: String,
    #[builder(default = Utc::now())]
    occurred_at: DateTime<Utc>,
    #[builder(default)]
    #[serde(default)]
    properties: Map<String, Value>,
}

impl Event {
    pub fn new(event_name: impl Into<String>) -> Self {
        Self::builder().event_name(event_name).build()
    }

    /// 追加一个属性（同名覆盖）
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub fn occurred_at(&self) -> &DateTime<Utc> {
        &self.occurred_at
    }

    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// 按类型读取属性；缺失返回 `Ok(None)`，类型不符返回 `DomainError::Serde`
    pub fn property_as<T: DeserializeOwned>(&self, key: &str) -> DomainResult<Option<T>> {
        self.properties
            .get(key)
            .map(|v| serde_json::from_value(v.clone()).map_err(DomainError::from))
            .transpose()
    }

    /// 读取必需属性
    pub fn require_property<T: DeserializeOwned>(&self, key: &str) -> DomainResult<T> {
        self.property_as(key)?.ok_or_else(|| DomainError::InvalidEvent {
            reason: format!("event {} missing property {key}", self.event_name),
        })
    }
}
