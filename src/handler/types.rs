//! Custom-resource request and response envelopes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Lifecycle action requested by the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestType {
    Create,
    Update,
    Delete,
}

/// Incoming custom-resource event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomResourceEvent {
    pub request_type: RequestType,
    #[serde(rename = "ResponseURL", default)]
    pub response_url: String,
    #[serde(default)]
    pub stack_id: String,
    #[serde(default)]
    pub request_id: String,
    #[serde(default)]
    pub logical_resource_id: String,
    /// Free-form parameters; `VpcId` and `Sizes` are read from here
    #[serde(default)]
    pub resource_properties: Map<String, Value>,
}

/// Invocation context supplied by the runtime
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Used as the physical resource id in responses
    pub log_stream_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    Success,
    Failed,
}

/// Payload returned on success
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResponseData {
    pub cidr_blocks: Vec<String>,
}

/// Body sent back to the orchestrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResponseBody {
    pub status: ResponseStatus,
    pub physical_resource_id: String,
    pub stack_id: String,
    pub request_id: String,
    pub logical_resource_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
}

impl ResponseBody {
    pub fn new(event: &CustomResourceEvent, context: &Context, status: ResponseStatus) -> Self {
        ResponseBody {
            status,
            physical_resource_id: context.log_stream_name.clone(),
            stack_id: event.stack_id.clone(),
            request_id: event.request_id.clone(),
            logical_resource_id: event.logical_resource_id.clone(),
            reason: None,
            data: None,
        }
    }

    pub fn success(event: &CustomResourceEvent, context: &Context) -> Self {
        Self::new(event, context, ResponseStatus::Success)
    }

    pub fn failed(event: &CustomResourceEvent, context: &Context, reason: impl Into<String>) -> Self {
        ResponseBody {
            reason: Some(reason.into()),
            ..Self::new(event, context, ResponseStatus::Failed)
        }
    }

    pub fn with_cidr_blocks(mut self, cidr_blocks: Vec<String>) -> Self {
        self.data = Some(ResponseData { cidr_blocks });
        self
    }
}
