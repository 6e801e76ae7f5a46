//! DynamicValue codec
//!
//! Terraform sends resource values as msgpack objects keyed by attribute
//! name. Unknown values are msgpack extension values; a null object is nil.
//! Stored state arrives as JSON (or the legacy flatmap) during upgrades.

use rmpv::Value;

use crate::error::{ProviderError, Result};
use crate::plugin::proto::tfplugin6::{DynamicValue, RawState};
use crate::provider::{AttrValue, ObjectValue, Schema};

/// Extension type cty uses for unknown values
const UNKNOWN_EXT_TYPE: i8 = 0;

/// Decode a DynamicValue; an absent or null value is `None`
pub fn decode_dynamic(value: Option<&DynamicValue>) -> Result<Option<ObjectValue>> {
    let Some(value) = value else {
        return Ok(None);
    };

    if !value.msgpack.is_empty() {
        decode_msgpack(&value.msgpack)
    } else if !value.json.is_empty() {
        decode_json(&value.json)
    } else {
        Ok(None)
    }
}

/// Encode a value as msgpack, laid out per schema
pub fn encode_dynamic(value: Option<&ObjectValue>, schema: &Schema) -> Result<DynamicValue> {
    Ok(DynamicValue {
        msgpack: encode_msgpack(value, schema)?,
        json: Vec::new(),
    })
}

/// Decode stored state handed to UpgradeResourceState
pub fn decode_raw_state(raw: Option<&RawState>) -> Result<Option<ObjectValue>> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    if !raw.json.is_empty() {
        return decode_json(&raw.json);
    }
    if raw.flatmap.is_empty() {
        return Ok(None);
    }

    let obj = raw
        .flatmap
        .iter()
        // count markers of collections
        .filter(|(key, _)| !key.ends_with(".%") && !key.ends_with(".#"))
        .fold(ObjectValue::new(), |obj, (key, value)| {
            obj.with(key, AttrValue::known(value.clone()))
        });
    Ok(Some(obj))
}

pub fn decode_msgpack(bytes: &[u8]) -> Result<Option<ObjectValue>> {
    let mut reader = bytes;
    let value = rmpv::decode::read_value(&mut reader)?;

    match value {
        Value::Nil => Ok(None),
        Value::Map(entries) => {
            let mut obj = ObjectValue::new();
            for (key, value) in entries {
                let key = match key {
                    Value::String(s) => s
                        .into_str()
                        .ok_or_else(|| ProviderError::value("attribute name is not UTF-8"))?,
                    other => {
                        return Err(ProviderError::value(format!(
                            "expected attribute name, found {}",
                            other
                        )))
                    }
                };
                let attr = attr_from_msgpack(&key, value)?;
                obj.set(&key, attr);
            }
            Ok(Some(obj))
        }
        Value::Ext(..) => Err(ProviderError::value("the whole object value is unknown")),
        other => Err(ProviderError::value(format!(
            "expected an object, found {}",
            other
        ))),
    }
}

fn attr_from_msgpack(name: &str, value: Value) -> Result<AttrValue> {
    match value {
        Value::Nil => Ok(AttrValue::Null),
        Value::Ext(..) => Ok(AttrValue::Unknown),
        Value::String(s) => s
            .into_str()
            .map(AttrValue::Known)
            .ok_or_else(|| ProviderError::value_attr(name, "string is not UTF-8")),
        other => Err(ProviderError::value_attr(
            name,
            format!("expected a string, found {}", other),
        )),
    }
}

pub fn encode_msgpack(value: Option<&ObjectValue>, schema: &Schema) -> Result<Vec<u8>> {
    let encoded = match value {
        None => Value::Nil,
        Some(obj) => Value::Map(
            schema
                .names()
                .map(|name| (Value::from(name), attr_to_msgpack(obj.get(name))))
                .collect(),
        ),
    };

    let mut buf = Vec::new();
    rmpv::encode::write_value(&mut buf, &encoded)?;
    Ok(buf)
}

fn attr_to_msgpack(value: &AttrValue) -> Value {
    match value {
        AttrValue::Null => Value::Nil,
        AttrValue::Unknown => Value::Ext(UNKNOWN_EXT_TYPE, vec![0]),
        AttrValue::Known(s) => Value::from(s.as_str()),
    }
}

pub fn decode_json(bytes: &[u8]) -> Result<Option<ObjectValue>> {
    let value: serde_json::Value = serde_json::from_slice(bytes)?;

    match value {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Object(map) => {
            let mut obj = ObjectValue::new();
            for (key, value) in map {
                let attr = match value {
                    serde_json::Value::Null => AttrValue::Null,
                    serde_json::Value::String(s) => AttrValue::Known(s),
                    serde_json::Value::Number(n) => AttrValue::Known(n.to_string()),
                    serde_json::Value::Bool(b) => AttrValue::Known(b.to_string()),
                    other => {
                        return Err(ProviderError::value_attr(
                            &key,
                            format!("expected a string, found {}", other),
                        ))
                    }
                };
                obj.set(&key, attr);
            }
            Ok(Some(obj))
        }
        other => Err(ProviderError::value(format!(
            "expected a JSON object, found {}",
            other
        ))),
    }
}
