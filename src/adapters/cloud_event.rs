//! CloudEvents adapter.
//!
//! Supports the two HTTP bindings:
//! - structured mode: `content-type: application/cloudevents+json`, the body is the envelope
//! - binary mode: attributes in `ce-*` headers, the body is the event data

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::adapters::{read_body, respond};
use crate::error::InvocationError;
use crate::function::user::CloudEventFunction;
use crate::function::NormalizedHandler;

const STRUCTURED_CONTENT_TYPE: &str = "application/cloudevents+json";

/// A CloudEvents envelope.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CloudEvent {
    pub id: String,
    pub source: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub specversion: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datacontenttype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn required(headers: &HeaderMap, name: &str) -> Result<String, InvocationError> {
    header_str(headers, name)
        .map(str::to_string)
        .ok_or_else(|| {
            InvocationError::MalformedPayload(format!("missing required header '{}'", name))
        })
}

/// Build a cloud event from an HTTP request's headers and body.
pub fn parse_cloud_event(headers: &HeaderMap, body: &[u8]) -> Result<CloudEvent, InvocationError> {
    let content_type = header_str(headers, header::CONTENT_TYPE.as_str());

    if content_type.is_some_and(|ct| ct.starts_with(STRUCTURED_CONTENT_TYPE)) {
        return serde_json::from_slice(body).map_err(|e| {
            InvocationError::MalformedPayload(format!("invalid structured cloud event: {}", e))
        });
    }

    let data = if body.is_empty() {
        None
    } else {
        Some(serde_json::from_slice(body).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(body).into_owned())
        }))
    };

    Ok(CloudEvent {
        id: required(headers, "ce-id")?,
        source: required(headers, "ce-source")?,
        event_type: required(headers, "ce-type")?,
        specversion: required(headers, "ce-specversion")?,
        subject: header_str(headers, "ce-subject").map(str::to_string),
        time: header_str(headers, "ce-time").map(str::to_string),
        datacontenttype: content_type.map(str::to_string),
        data,
    })
}

/// Adapt a cloud-event function.
pub fn adapt(function: CloudEventFunction) -> NormalizedHandler {
    NormalizedHandler::new(move |request| {
        let function = function.clone();
        async move {
            let headers = request.headers().clone();
            let body = read_body(request).await?;
            let event = parse_cloud_event(&headers, &body)?;
            tracing::debug!(event_id = %event.id, event_type = %event.event_type, "Dispatching cloud event");
            Ok(respond(function(event).await))
        }
    })
}
