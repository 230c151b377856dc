//! Shared frame model and codecs for the realtime game channel.
//!
//! This crate owns the wire representation used by every transport that
//! carries game events. A frame is a named event with a JSON payload; it can
//! travel as JSON text (`{"event": ..., "data": ...}`) or as compact protobuf
//! binary. The typed [`ClientEvent`] / [`ServerEvent`] enums live in
//! [`event`].

pub mod event;

pub use event::{AdminLogin, ClientEvent, ServerEvent, StateSnapshot};

use prost::Message;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Error returned by the decode functions and typed event conversions.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The raw bytes could not be decoded as a protobuf `WireFrame`.
    #[error("failed to decode protobuf frame: {0}")]
    Decode(#[from] prost::DecodeError),
    /// The text could not be parsed as a JSON frame.
    #[error("failed to decode json frame: {0}")]
    Json(#[from] serde_json::Error),
    /// The event name is not part of the game protocol.
    #[error("unknown event: {0}")]
    UnknownEvent(String),
    /// The event name is known but its payload does not match the schema.
    #[error("invalid payload for {event}: {source}")]
    Payload {
        event: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A single named event on the realtime channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Event name, e.g. `"updatePlayers"`.
    pub event: String,
    /// Milliseconds since the Unix epoch when the frame was created; `0`
    /// when the sender did not stamp it.
    #[serde(default)]
    pub ts: i64,
    /// Arbitrary JSON payload; `{}` for events without one.
    #[serde(default = "empty_object")]
    pub data: Value,
}

impl Frame {
    /// Build an unstamped frame.
    #[must_use]
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            ts: 0,
            data,
        }
    }

    /// Stamp the frame with a creation time.
    #[must_use]
    pub fn with_ts(mut self, ts: i64) -> Self {
        self.ts = ts;
        self
    }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// Encode a frame into protobuf bytes.
#[must_use]
pub fn encode_frame(frame: &Frame) -> Vec<u8> {
    let wire = frame_to_wire(frame);

    let mut out = Vec::with_capacity(wire.encoded_len());
    // Encoding into a growable Vec cannot hit `BufferTooSmall`.
    wire.encode(&mut out).unwrap_or_default();
    out
}

/// Decode protobuf bytes into a frame.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] for malformed bytes.
pub fn decode_frame(bytes: &[u8]) -> Result<Frame, CodecError> {
    let wire = WireFrame::decode(bytes)?;
    Ok(wire_to_frame(wire))
}

/// Encode a frame as a JSON text message.
///
/// The timestamp is omitted when unset so the text form stays compatible
/// with plain `{"event", "data"}` peers.
#[must_use]
pub fn encode_text(frame: &Frame) -> String {
    let mut map = Map::new();
    map.insert("event".to_owned(), Value::String(frame.event.clone()));
    if frame.ts != 0 {
        map.insert("ts".to_owned(), Value::from(frame.ts));
    }
    map.insert("data".to_owned(), frame.data.clone());
    Value::Object(map).to_string()
}

/// Decode a JSON text message into a frame.
///
/// # Errors
///
/// Returns [`CodecError::Json`] when the text is not a JSON object with a
/// string `event` field.
pub fn decode_text(text: &str) -> Result<Frame, CodecError> {
    let mut frame: Frame = serde_json::from_str(text)?;
    if frame.data.is_null() {
        frame.data = empty_object();
    }
    Ok(frame)
}

fn frame_to_wire(frame: &Frame) -> WireFrame {
    WireFrame {
        event: frame.event.clone(),
        ts: frame.ts,
        data: Some(json_to_proto_value(&frame.data)),
    }
}

fn wire_to_frame(wire: WireFrame) -> Frame {
    Frame {
        event: wire.event,
        ts: wire.ts,
        data: wire.data.map_or_else(empty_object, |v| proto_to_json_value(&v)),
    }
}

fn json_to_proto_value(value: &Value) -> prost_types::Value {
    let kind = match value {
        Value::Null => {
            prost_types::value::Kind::NullValue(prost_types::NullValue::NullValue as i32)
        }
        Value::Bool(v) => prost_types::value::Kind::BoolValue(*v),
        Value::Number(v) => prost_types::value::Kind::NumberValue(v.as_f64().unwrap_or(0.0)),
        Value::String(v) => prost_types::value::Kind::StringValue(v.clone()),
        Value::Array(v) => prost_types::value::Kind::ListValue(prost_types::ListValue {
            values: v.iter().map(json_to_proto_value).collect(),
        }),
        Value::Object(v) => prost_types::value::Kind::StructValue(prost_types::Struct {
            fields: v
                .iter()
                .map(|(k, v)| (k.clone(), json_to_proto_value(v)))
                .collect(),
        }),
    };

    prost_types::Value { kind: Some(kind) }
}

fn proto_to_json_value(value: &prost_types::Value) -> Value {
    let Some(kind) = &value.kind else {
        return Value::Null;
    };

    match kind {
        prost_types::value::Kind::NullValue(_) => Value::Null,
        prost_types::value::Kind::NumberValue(v) => {
            serde_json::Number::from_f64(*v).map_or(Value::Null, Value::Number)
        }
        prost_types::value::Kind::StringValue(v) => Value::String(v.clone()),
        prost_types::value::Kind::BoolValue(v) => Value::Bool(*v),
        prost_types::value::Kind::StructValue(v) => Value::Object(
            v.fields
                .iter()
                .map(|(k, v)| (k.clone(), proto_to_json_value(v)))
                .collect(),
        ),
        prost_types::value::Kind::ListValue(v) => {
            Value::Array(v.values.iter().map(proto_to_json_value).collect())
        }
    }
}

#[derive(Clone, PartialEq, Message)]
struct WireFrame {
    #[prost(string, tag = "1")]
    event: String,
    #[prost(int64, tag = "2")]
    ts: i64,
    #[prost(message, optional, tag = "3")]
    data: Option<prost_types::Value>,
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
