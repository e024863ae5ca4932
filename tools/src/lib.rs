//! Inspection and decoding tools for tagnet event captures.
//!
//! A capture is the raw bytes of one event envelope: sender id, event code,
//! tagged payload. This crate turns captures into structured JSON and
//! one-line summaries:
//!
//! - Decode the tagged payload into a JSON tree
//! - Summarize reserved replication events (entity create/update, player
//!   directory traffic) by decoding their bodies
//!
//! # Design Principles
//!
//! - **First-class tooling** - These tools are part of the product, not afterthoughts.
//! - **Human-readable output** - Make it easy to understand what is on the wire.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use codec::{CustomArray, NetworkEvent, Serializer, Value};
use serde::Serialize;
use serde_json::json;
use wire::{
    ComponentAddBody, ComponentRemoveBody, EntityCreateBody, EntityDestroyBody, EntityUpdateBody,
    Limits, PlayerListBody, PlayerUpdateBody, COMPONENT_ADD, COMPONENT_REMOVE, ENTITY_CREATE,
    ENTITY_DESTROY, ENTITY_UPDATE, PLAYER_JOIN, PLAYER_LIST, PLAYER_UPDATE, RPC,
};

/// One inspected capture.
#[derive(Debug, Serialize)]
pub struct InspectReport {
    /// Sending client ID.
    pub sender: i32,
    /// Raw event code.
    pub code: u8,
    /// Human name for the code (`entity_update`, `app(17)`, ...).
    pub code_name: String,
    /// Whether the code sits in the reserved replication band.
    pub reserved: bool,
    /// Total capture size in bytes.
    pub byte_len: usize,
    /// One-line structural summary of the payload.
    pub summary: String,
}

/// Decodes a capture into a structural report.
pub fn inspect_event(bytes: &[u8], limits: &Limits) -> Result<InspectReport> {
    let serializer = Serializer::new();
    let event = serializer
        .decode_event(bytes)
        .context("decode event envelope")?;
    let summary = summarize(&event, limits)?;
    Ok(InspectReport {
        sender: event.sender.raw(),
        code: event.code.raw(),
        code_name: code_name(event.code.raw()),
        reserved: event.code.is_reserved(),
        byte_len: bytes.len(),
        summary,
    })
}

/// Decodes a capture into a JSON tree.
///
/// Reserved replication events additionally get their body decoded under a
/// `"body"` key; application payloads appear under `"data"`.
pub fn decode_event_json(bytes: &[u8], limits: &Limits) -> Result<serde_json::Value> {
    let serializer = Serializer::new();
    let event = serializer
        .decode_event(bytes)
        .context("decode event envelope")?;

    let mut output = json!({
        "sender": event.sender.raw(),
        "code": event.code.raw(),
        "code_name": code_name(event.code.raw()),
        "reserved": event.code.is_reserved(),
        "data": value_to_json(&event.data)?,
    });
    if event.code.is_reserved() {
        if let Value::ByteArray(body) = &event.data {
            output["body"] = body_to_json(event.code.raw(), body, limits)?;
        }
    }
    Ok(output)
}

/// Renders decoded JSON as indented `key: value` lines.
#[must_use]
pub fn format_decode_pretty(value: &serde_json::Value) -> String {
    let mut out = String::new();
    append_pretty(value, 0, &mut out);
    out
}

fn code_name(code: u8) -> String {
    let name = if code == ENTITY_CREATE.raw() {
        "entity_create"
    } else if code == ENTITY_DESTROY.raw() {
        "entity_destroy"
    } else if code == ENTITY_UPDATE.raw() {
        "entity_update"
    } else if code == COMPONENT_ADD.raw() {
        "component_add"
    } else if code == COMPONENT_REMOVE.raw() {
        "component_remove"
    } else if code == PLAYER_JOIN.raw() {
        "player_join"
    } else if code == PLAYER_LIST.raw() {
        "player_list"
    } else if code == PLAYER_UPDATE.raw() {
        "player_update"
    } else if code == RPC.raw() {
        "rpc"
    } else {
        return format!("app({code})");
    };
    name.to_string()
}

fn summarize(event: &NetworkEvent, limits: &Limits) -> Result<String> {
    if !event.code.is_reserved() {
        return Ok(format!("{} payload", payload_brief(&event.data)));
    }
    let Value::ByteArray(body) = &event.data else {
        return Ok(format!(
            "reserved event with non-byte-array payload ({})",
            event.data.kind_name()
        ));
    };

    let code = event.code.raw();
    let summary = if code == ENTITY_CREATE.raw() {
        let body = EntityCreateBody::decode(body, limits).context("decode entity create body")?;
        format!(
            "entity {} type {:?} owner {}",
            body.entity.raw(),
            body.type_name,
            body.owner.raw()
        )
    } else if code == ENTITY_DESTROY.raw() {
        let body = EntityDestroyBody::decode(body, limits).context("decode entity destroy body")?;
        format!("entity {}", body.entity.raw())
    } else if code == ENTITY_UPDATE.raw() {
        let body = EntityUpdateBody::decode(body, limits).context("decode entity update body")?;
        let payload: usize = body.components.iter().map(|c| c.bytes.len()).sum();
        format!(
            "entity {} with {} changed components ({payload} payload bytes)",
            body.entity.raw(),
            body.components.len()
        )
    } else if code == COMPONENT_ADD.raw() {
        let body = ComponentAddBody::decode(body, limits).context("decode component add body")?;
        format!(
            "entity {} slot {} type {:?} ({} bytes)",
            body.entity.raw(),
            body.component.raw(),
            body.type_name,
            body.bytes.len()
        )
    } else if code == COMPONENT_REMOVE.raw() {
        let body =
            ComponentRemoveBody::decode(body, limits).context("decode component remove body")?;
        format!("entity {} slot {}", body.entity.raw(), body.component.raw())
    } else if code == PLAYER_JOIN.raw() || code == PLAYER_UPDATE.raw() {
        let body = PlayerUpdateBody::decode(body, limits).context("decode player body")?;
        format!("{} player bytes", body.bytes.len())
    } else if code == PLAYER_LIST.raw() {
        let body = PlayerListBody::decode(body, limits).context("decode player list body")?;
        format!("{} roster entries", body.players.len())
    } else {
        format!("{} opaque bytes", body.len())
    };
    Ok(summary)
}

fn payload_brief(value: &Value) -> String {
    match value {
        Value::ObjectArray(items) => format!("object_array[{}]", items.len()),
        Value::ByteArray(bytes) => format!("byte_array[{}]", bytes.len()),
        Value::CustomArray(array) => {
            format!("custom_array<{}>[{}]", array.element_name(), array.len())
        }
        other => other.kind_name().to_string(),
    }
}

fn body_to_json(code: u8, body: &[u8], limits: &Limits) -> Result<serde_json::Value> {
    let json = if code == ENTITY_CREATE.raw() {
        let body = EntityCreateBody::decode(body, limits).context("decode entity create body")?;
        json!({
            "entity": body.entity.raw(),
            "owner": body.owner.raw(),
            "type_name": body.type_name,
        })
    } else if code == ENTITY_DESTROY.raw() {
        let body = EntityDestroyBody::decode(body, limits).context("decode entity destroy body")?;
        json!({ "entity": body.entity.raw() })
    } else if code == ENTITY_UPDATE.raw() {
        let body = EntityUpdateBody::decode(body, limits).context("decode entity update body")?;
        let components: Vec<serde_json::Value> = body
            .components
            .iter()
            .map(|update| {
                json!({
                    "component": update.component.raw(),
                    "bytes": hex_string(&update.bytes),
                })
            })
            .collect();
        json!({ "entity": body.entity.raw(), "components": components })
    } else if code == COMPONENT_ADD.raw() {
        let body = ComponentAddBody::decode(body, limits).context("decode component add body")?;
        json!({
            "entity": body.entity.raw(),
            "component": body.component.raw(),
            "type_name": body.type_name,
            "bytes": hex_string(&body.bytes),
        })
    } else if code == COMPONENT_REMOVE.raw() {
        let body =
            ComponentRemoveBody::decode(body, limits).context("decode component remove body")?;
        json!({ "entity": body.entity.raw(), "component": body.component.raw() })
    } else if code == PLAYER_JOIN.raw() || code == PLAYER_UPDATE.raw() {
        let body = PlayerUpdateBody::decode(body, limits).context("decode player body")?;
        json!({ "bytes": hex_string(&body.bytes) })
    } else if code == PLAYER_LIST.raw() {
        let body = PlayerListBody::decode(body, limits).context("decode player list body")?;
        let players: Vec<serde_json::Value> = body
            .players
            .iter()
            .map(|(client, bytes)| {
                json!({ "client": client.raw(), "bytes": hex_string(bytes) })
            })
            .collect();
        json!({ "players": players })
    } else {
        json!({ "opaque": hex_string(body) })
    };
    Ok(json)
}

fn value_to_json(value: &Value) -> Result<serde_json::Value> {
    let json = match value {
        Value::Null => serde_json::Value::Null,
        Value::Byte(v) => json!(v),
        Value::Bool(v) => json!(v),
        Value::Short(v) => json!(v),
        Value::Int(v) => json!(v),
        Value::Long(v) => json!(v),
        Value::Float(v) => json!(v),
        Value::Double(v) => json!(v),
        Value::String(v) => json!(v),
        Value::ByteArray(bytes) => json!({ "byte_array": hex_string(bytes) }),
        Value::ObjectArray(items) => {
            let items: Result<Vec<serde_json::Value>> = items.iter().map(value_to_json).collect();
            serde_json::Value::Array(items?)
        }
        Value::Custom(custom) => custom_to_json(custom.type_name(), |out| {
            custom.encode_value(out)
        })?,
        Value::CustomArray(array) => custom_array_to_json(array)?,
    };
    Ok(json)
}

fn custom_to_json(
    type_name: &str,
    encode: impl FnOnce(&mut buffer::ByteWriter) -> codec::CodecResult<()>,
) -> Result<serde_json::Value> {
    let mut writer = buffer::ByteWriter::new();
    encode(&mut writer).context("re-encode custom payload")?;
    Ok(json!({ "custom": type_name, "payload": hex_string(writer.as_slice()) }))
}

fn custom_array_to_json(array: &CustomArray) -> Result<serde_json::Value> {
    let items: Result<Vec<serde_json::Value>> = array
        .items()
        .iter()
        .map(|item| {
            let mut writer = buffer::ByteWriter::new();
            item.encode_value(&mut writer)
                .context("re-encode custom array element")?;
            Ok(json!(hex_string(writer.as_slice())))
        })
        .collect();
    Ok(json!({
        "custom_array": array.element_name(),
        "items": items?,
    }))
}

fn hex_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

fn append_pretty(value: &serde_json::Value, depth: usize, out: &mut String) {
    let pad = "  ".repeat(depth);
    match value {
        serde_json::Value::Object(map) => {
            for (key, inner) in map {
                if inner.is_object() || inner.is_array() {
                    let _ = writeln!(out, "{pad}{key}:");
                    append_pretty(inner, depth + 1, out);
                } else {
                    let _ = writeln!(out, "{pad}{key}: {inner}");
                }
            }
        }
        serde_json::Value::Array(items) => {
            for (index, inner) in items.iter().enumerate() {
                if inner.is_object() || inner.is_array() {
                    let _ = writeln!(out, "{pad}[{index}]:");
                    append_pretty(inner, depth + 1, out);
                } else {
                    let _ = writeln!(out, "{pad}[{index}]: {inner}");
                }
            }
        }
        scalar => {
            let _ = writeln!(out, "{pad}{scalar}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buffer::ByteWriter;
    use codec::{ClientId, EventCode};
    use wire::{ComponentId, ComponentUpdate, EntityId};

    fn encode_envelope(sender: i32, code: EventCode, data: Value) -> Vec<u8> {
        let mut serializer = Serializer::new();
        serializer
            .encode_event(&NetworkEvent {
                sender: ClientId::new(sender),
                code,
                data,
            })
            .unwrap()
    }

    #[test]
    fn inspect_application_event() {
        let code = EventCode::application(17).unwrap();
        let data = Value::ObjectArray(vec![Value::Int(1), Value::String("x".to_string())]);
        let bytes = encode_envelope(4, code, data);

        let report = inspect_event(&bytes, &Limits::default()).unwrap();
        assert_eq!(report.sender, 4);
        assert_eq!(report.code, 17);
        assert_eq!(report.code_name, "app(17)");
        assert!(!report.reserved);
        assert_eq!(report.byte_len, bytes.len());
        assert!(report.summary.contains("object_array[2]"));
    }

    #[test]
    fn inspect_entity_update_summary() {
        let body = EntityUpdateBody {
            entity: EntityId::new(2001),
            components: vec![
                ComponentUpdate {
                    component: ComponentId::new(1),
                    bytes: vec![0, 0, 0, 7],
                },
                ComponentUpdate {
                    component: ComponentId::new(3),
                    bytes: vec![1],
                },
            ],
        };
        let mut writer = ByteWriter::new();
        body.encode(&mut writer).unwrap();
        let bytes = encode_envelope(2, ENTITY_UPDATE, Value::ByteArray(writer.finish()));

        let report = inspect_event(&bytes, &Limits::default()).unwrap();
        assert_eq!(report.code_name, "entity_update");
        assert!(report.reserved);
        assert!(report.summary.contains("entity 2001"));
        assert!(report.summary.contains("2 changed components"));
        assert!(report.summary.contains("5 payload bytes"));
    }

    #[test]
    fn decode_entity_create_to_json() {
        let body = EntityCreateBody {
            entity: EntityId::new(1001),
            owner: ClientId::new(1),
            type_name: "ship".to_string(),
        };
        let mut writer = ByteWriter::new();
        body.encode(&mut writer).unwrap();
        let bytes = encode_envelope(1, ENTITY_CREATE, Value::ByteArray(writer.finish()));

        let json = decode_event_json(&bytes, &Limits::default()).unwrap();
        assert_eq!(json["sender"], 1);
        assert_eq!(json["code_name"], "entity_create");
        assert_eq!(json["body"]["entity"], 1001);
        assert_eq!(json["body"]["type_name"], "ship");
    }

    #[test]
    fn decode_application_values_to_json() {
        let code = EventCode::application(9).unwrap();
        let data = Value::ObjectArray(vec![
            Value::Null,
            Value::Bool(true),
            Value::Double(2.5),
            Value::ByteArray(vec![0xAB, 0xCD]),
        ]);
        let bytes = encode_envelope(3, code, data);

        let json = decode_event_json(&bytes, &Limits::default()).unwrap();
        assert_eq!(json["data"][0], serde_json::Value::Null);
        assert_eq!(json["data"][1], true);
        assert_eq!(json["data"][2], 2.5);
        assert_eq!(json["data"][3]["byte_array"], "abcd");
    }

    #[test]
    fn truncated_capture_is_an_error() {
        let bytes = encode_envelope(1, EventCode::application(9).unwrap(), Value::Int(5));
        assert!(inspect_event(&bytes[..3], &Limits::default()).is_err());
    }

    #[test]
    fn pretty_output_indents_nested_structures() {
        let json = json!({
            "code": 201,
            "body": { "entity": 1001 },
        });
        let pretty = format_decode_pretty(&json);
        assert!(pretty.contains("code: 201"));
        assert!(pretty.contains("body:"));
        assert!(pretty.contains("  entity: 1001"));
    }

    #[test]
    fn hex_rendering() {
        assert_eq!(hex_string(&[0x00, 0x0F, 0xFF]), "000fff");
        assert_eq!(hex_string(&[]), "");
    }
}
