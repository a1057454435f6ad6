//! Output formatting helpers.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use serde_json::{Map, Value};

use agora_core::RawDocument;

/// Print a success message.
pub fn success(msg: &str) {
    eprintln!("{} {}", "✓".green(), msg);
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print a value as compact JSON.
pub fn json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    println!("{}", json);
    Ok(())
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// A record as one JSON object, its id alongside its fields.
pub fn document_value(doc: &RawDocument) -> Value {
    let mut object = Map::with_capacity(doc.fields.len() + 1);
    object.insert("id".to_string(), Value::String(doc.id.to_string()));
    object.extend(doc.fields.iter().map(|(k, v)| (k.clone(), v.clone())));
    Value::Object(object)
}

/// Print a record, compact or pretty.
pub fn document(doc: &RawDocument, pretty: bool) -> Result<()> {
    let value = document_value(doc);
    if pretty { json_pretty(&value) } else { json(&value) }
}
