//! Legacy event adapter.
//!
//! Accepts either `{"data": ..., "context": {...}}` or the flat form where
//! `eventId`, `timestamp`, `eventType` and `resource` sit beside `data`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::adapters::{read_body, respond};
use crate::error::InvocationError;
use crate::function::user::{CallbackEventFunction, EventCallback, EventFunction};
use crate::function::NormalizedHandler;

/// Metadata delivered alongside legacy event data.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventContext {
    pub event_id: Option<String>,
    pub timestamp: Option<String>,
    pub event_type: Option<String>,
    pub resource: Option<Value>,
}

/// Split a legacy event body into its data and context.
pub fn parse_event(body: &[u8]) -> Result<(Value, EventContext), InvocationError> {
    let mut payload: Value = serde_json::from_slice(body)
        .map_err(|e| InvocationError::MalformedPayload(format!("invalid event JSON: {}", e)))?;

    let Some(object) = payload.as_object_mut() else {
        return Err(InvocationError::MalformedPayload(
            "event body must be a JSON object".to_string(),
        ));
    };

    let data = object.remove("data").unwrap_or(Value::Null);
    let context = match object.remove("context") {
        Some(context) => context,
        None => Value::Object(std::mem::take(object)),
    };
    let context = serde_json::from_value(context)
        .map_err(|e| InvocationError::MalformedPayload(format!("invalid event context: {}", e)))?;

    Ok((data, context))
}

/// Adapt a two-argument event function.
pub fn adapt(function: EventFunction) -> NormalizedHandler {
    NormalizedHandler::new(move |request| {
        let function = function.clone();
        async move {
            let body = read_body(request).await?;
            let (data, context) = parse_event(&body)?;
            Ok(respond(function(data, context).await))
        }
    })
}

/// Adapt a three-argument event function that completes through its callback.
pub fn adapt_callback(function: CallbackEventFunction) -> NormalizedHandler {
    NormalizedHandler::new(move |request| {
        let function = function.clone();
        async move {
            let body = read_body(request).await?;
            let (data, context) = parse_event(&body)?;

            let (callback, completion) = EventCallback::new();
            function(data, context, callback);
            let result = completion
                .await
                .map_err(|_| InvocationError::CallbackDropped)?;
            Ok(respond(result))
        }
    })
}
