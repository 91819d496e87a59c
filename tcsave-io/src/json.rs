//! JSON-backed save codec.
//!
//! Stores the structured record as a JSON object. Useful for fixtures,
//! tooling and tests; it makes no attempt to match the game's binary layout.

use std::collections::BTreeSet;

use serde_json::Value;
use thiserror::Error;

use tcsave_core::codec::{SaveCodec, SaveRecord};

/// Kind prefix treated as codec bookkeeping by default.
pub const DEFAULT_VIRTUAL_PREFIX: &str = "Virtual";

#[derive(Error, Debug)]
pub enum JsonCodecError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Save document must be a JSON object, found {0}")]
    NotAnObject(&'static str),
}

#[derive(Debug, Clone)]
pub struct JsonCodec {
    virtual_prefix: Option<String>,
    virtual_kinds: BTreeSet<String>,
    pretty: bool,
}

impl Default for JsonCodec {
    fn default() -> Self {
        Self {
            virtual_prefix: Some(DEFAULT_VIRTUAL_PREFIX.to_string()),
            virtual_kinds: BTreeSet::new(),
            pretty: false,
        }
    }
}

impl JsonCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat kinds starting with `prefix` as virtual; `None` disables the rule.
    pub fn with_virtual_prefix(mut self, prefix: Option<&str>) -> Self {
        self.virtual_prefix = prefix.map(str::to_string);
        self
    }

    pub fn with_virtual_kind(mut self, kind: &str) -> Self {
        self.virtual_kinds.insert(kind.to_string());
        self
    }

    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl SaveCodec for JsonCodec {
    type Error = JsonCodecError;

    fn decode(&self, bytes: &[u8]) -> Result<SaveRecord, Self::Error> {
        match serde_json::from_slice::<Value>(bytes)? {
            Value::Object(record) => Ok(record),
            other => Err(JsonCodecError::NotAnObject(value_kind(&other))),
        }
    }

    fn encode(&self, record: &SaveRecord) -> Result<Vec<u8>, Self::Error> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(record)?
        } else {
            serde_json::to_vec(record)?
        };
        Ok(bytes)
    }

    fn is_virtual(&self, kind: &str) -> bool {
        self.virtual_kinds.contains(kind)
            || self
                .virtual_prefix
                .as_deref()
                .is_some_and(|prefix| kind.starts_with(prefix))
    }
}
