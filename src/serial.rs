//! Binary snapshots of rules and their `when` trees.
//!
//! A snapshot is a 32-byte fixed header followed by a bincode-encoded
//! payload. Handles ([`GroupId`](crate::GroupId), [`ConditionId`](crate::ConditionId))
//! are not part of the payload; a decoded rule gets a freshly built tree.
//!
//! ## Wire Format
//!
//! ```text
//! Offset  Size  Field
//! 0       4     Magic bytes: b"WHEN"
//! 4       2     Format version (u16, little-endian)
//! 6       2     Engine version (u16, little-endian)
//! 8       4     Flags (u32, reserved)
//! 12      4     Payload length in bytes (u32, little-endian)
//! 16      16    BLAKE3 hash of the payload (truncated to 16 bytes)
//! 32..    var   Bincode-encoded payload
//! ```
//!
//! ## Versioning
//!
//! The format version in the header must match exactly. If it does not,
//! decoding fails immediately with [`DeserializeError::IncompatibleVersion`].
//! The engine version is informational only.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Condition, ConditionTree, Group, LogicOperator, Rule, Value};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MAGIC: &[u8; 4] = b"WHEN";
const FORMAT_VERSION: u16 = 1;
const ENGINE_VERSION: u16 = 1;
const HEADER_SIZE: usize = 32;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when serializing a [`Rule`](crate::Rule) to bytes.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("failed to encode rule: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("I/O error during serialization: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur when deserializing a [`Rule`](crate::Rule) from bytes.
#[derive(Debug, Error)]
pub enum DeserializeError {
    #[error("not a whentree snapshot: invalid magic bytes")]
    BadMagic,

    #[error("incompatible format version: blob is v{blob}, engine supports v{supported}")]
    IncompatibleVersion { blob: u16, supported: u16 },

    #[error("integrity check failed: BLAKE3 checksum mismatch")]
    ChecksumMismatch,

    #[error("payload length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: u32, actual: usize },

    #[error("failed to decode payload: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("I/O error during deserialization: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Serialized type hierarchy
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
struct SerializedRule {
    metadata: RuleMetadata,
    name: String,
    when: Option<SerializedGroup>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RuleMetadata {
    group_count: usize,
    condition_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SerializedGroup {
    operator: Option<SerializedOperator>,
    items: Vec<SerializedCondition>,
    groups: Vec<SerializedGroup>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SerializedCondition {
    attributes: Vec<(String, SerializedValue)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum SerializedValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
enum SerializedOperator {
    And,
    Or,
}

// ---------------------------------------------------------------------------
// Leaf conversion
// ---------------------------------------------------------------------------

fn serialize_operator(op: LogicOperator) -> SerializedOperator {
    match op {
        LogicOperator::And => SerializedOperator::And,
        LogicOperator::Or => SerializedOperator::Or,
    }
}

fn deserialize_operator(op: SerializedOperator) -> LogicOperator {
    match op {
        SerializedOperator::And => LogicOperator::And,
        SerializedOperator::Or => LogicOperator::Or,
    }
}

fn serialize_value(value: &Value) -> SerializedValue {
    match value {
        Value::Int(v) => SerializedValue::Int(*v),
        Value::Float(v) => SerializedValue::Float(*v),
        Value::Bool(v) => SerializedValue::Bool(*v),
        Value::String(v) => SerializedValue::Str(v.clone()),
    }
}

fn deserialize_value(value: SerializedValue) -> Value {
    match value {
        SerializedValue::Int(v) => Value::Int(v),
        SerializedValue::Float(v) => Value::Float(v),
        SerializedValue::Bool(v) => Value::Bool(v),
        SerializedValue::Str(v) => Value::String(v),
    }
}

// ---------------------------------------------------------------------------
// Group conversion
// ---------------------------------------------------------------------------

fn group_to_serialized(group: &Group) -> SerializedGroup {
    SerializedGroup {
        operator: group.operator.map(serialize_operator),
        items: group
            .items
            .iter()
            .map(|c| SerializedCondition {
                attributes: c
                    .iter()
                    .map(|(k, v)| (k.to_owned(), serialize_value(v)))
                    .collect(),
            })
            .collect(),
        groups: group.groups.iter().map(group_to_serialized).collect(),
    }
}

fn serialized_to_group(ser: SerializedGroup) -> Group {
    Group {
        operator: ser.operator.map(deserialize_operator),
        items: ser
            .items
            .into_iter()
            .map(|c| {
                c.attributes
                    .into_iter()
                    .fold(Condition::new(), |cond, (k, v)| {
                        cond.with(&k, deserialize_value(v))
                    })
            })
            .collect(),
        groups: ser.groups.into_iter().map(serialized_to_group).collect(),
    }
}

fn count_nodes(group: &SerializedGroup) -> (usize, usize) {
    group
        .groups
        .iter()
        .map(count_nodes)
        .fold((1, group.items.len()), |(g, c), (cg, cc)| (g + cg, c + cc))
}

// ---------------------------------------------------------------------------
// Rule <-> SerializedRule
// ---------------------------------------------------------------------------

fn rule_to_serialized(rule: &Rule) -> SerializedRule {
    SerializedRule {
        metadata: RuleMetadata {
            group_count: rule.when.group_count(),
            condition_count: rule.when.condition_count(),
        },
        name: rule.name.clone(),
        when: rule.when.root_group().as_ref().map(group_to_serialized),
    }
}

fn serialized_to_rule(ser: SerializedRule) -> Result<Rule, DeserializeError> {
    validate(&ser)?;

    let when = match ser.when {
        Some(group) => ConditionTree::from_group(&serialized_to_group(group)),
        None => ConditionTree::new(),
    };
    Ok(Rule {
        name: ser.name,
        when,
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(ser: &SerializedRule) -> Result<(), DeserializeError> {
    let (group_count, condition_count) = ser.when.as_ref().map_or((0, 0), count_nodes);

    if ser.metadata.group_count != group_count {
        return Err(DeserializeError::Validation(format!(
            "metadata says {} groups but payload has {}",
            ser.metadata.group_count, group_count
        )));
    }
    if ser.metadata.condition_count != condition_count {
        return Err(DeserializeError::Validation(format!(
            "metadata says {} conditions but payload has {}",
            ser.metadata.condition_count, condition_count
        )));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Header I/O
// ---------------------------------------------------------------------------

fn write_header(buf: &mut Vec<u8>, payload: &[u8]) {
    let hash = blake3::hash(payload);
    let hash_bytes = hash.as_bytes();

    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    buf.extend_from_slice(&ENGINE_VERSION.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes()); // flags (reserved)
    #[allow(clippy::cast_possible_truncation)] // payload will never exceed 4 GiB
    let payload_len = payload.len() as u32;
    buf.extend_from_slice(&payload_len.to_le_bytes());
    buf.extend_from_slice(&hash_bytes[..16]);
}

#[allow(clippy::cast_possible_truncation)] // HEADER_SIZE is 32, always fits in u32
fn read_header(bytes: &[u8]) -> Result<(u16, u32, [u8; 16]), DeserializeError> {
    if bytes.len() < HEADER_SIZE {
        return Err(DeserializeError::LengthMismatch {
            expected: HEADER_SIZE as u32,
            actual: bytes.len(),
        });
    }

    if &bytes[0..4] != MAGIC {
        return Err(DeserializeError::BadMagic);
    }

    let format_version = u16::from_le_bytes([bytes[4], bytes[5]]);
    // bytes[6..8] is engine_version (informational, not used for checks)
    // bytes[8..12] is flags (reserved)
    let payload_len = u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]);

    let mut hash = [0u8; 16];
    hash.copy_from_slice(&bytes[16..32]);

    Ok((format_version, payload_len, hash))
}

// ---------------------------------------------------------------------------
// Public encode/decode
// ---------------------------------------------------------------------------

fn encode_serialized(serialized: &SerializedRule) -> Result<Vec<u8>, SerializeError> {
    let payload = bincode::serde::encode_to_vec(serialized, bincode::config::standard())?;

    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
    write_header(&mut buf, &payload);
    buf.extend_from_slice(&payload);
    Ok(buf)
}

pub(crate) fn encode(rule: &Rule) -> Result<Vec<u8>, SerializeError> {
    encode_serialized(&rule_to_serialized(rule))
}

pub(crate) fn decode(bytes: &[u8]) -> Result<Rule, DeserializeError> {
    let (format_version, payload_len, stored_hash) = read_header(bytes)?;

    if format_version != FORMAT_VERSION {
        return Err(DeserializeError::IncompatibleVersion {
            blob: format_version,
            supported: FORMAT_VERSION,
        });
    }

    let payload_start = HEADER_SIZE;
    let payload_end = payload_start + payload_len as usize;
    if bytes.len() != payload_end {
        return Err(DeserializeError::LengthMismatch {
            expected: payload_len,
            actual: bytes.len() - HEADER_SIZE,
        });
    }
    let payload = &bytes[payload_start..payload_end];

    let computed_hash = blake3::hash(payload);
    if computed_hash.as_bytes()[..16] != stored_hash {
        return Err(DeserializeError::ChecksumMismatch);
    }

    let (serialized, consumed): (SerializedRule, usize) =
        bincode::serde::decode_from_slice(payload, bincode::config::standard())?;
    if consumed != payload.len() {
        return Err(DeserializeError::LengthMismatch {
            expected: payload_len,
            actual: consumed,
        });
    }

    serialized_to_rule(serialized)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
