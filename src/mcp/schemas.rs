//! JSON schema builders for MCP tools.

use crate::processing::SummaryLength;
use serde_json::{Map, Value};

/// Build the schema describing the `summarize` tool input.
pub(crate) fn summarize_input_schema() -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert(
        "text".into(),
        string_schema("Document text to summarize (any supported language)"),
    );

    let mut length_schema = Map::new();
    length_schema.insert("type".into(), Value::String("string".into()));
    length_schema.insert(
        "description".into(),
        Value::String("Summary size preset; unknown values fall back to 'medium'.".into()),
    );
    length_schema.insert(
        "enum".into(),
        Value::Array(
            SummaryLength::ALL
                .into_iter()
                .map(|preset| Value::String(preset.label().into()))
                .collect(),
        ),
    );
    length_schema.insert(
        "default".into(),
        Value::String(SummaryLength::default().label().into()),
    );
    properties.insert("length".into(), Value::Object(length_schema));

    properties.insert(
        "language".into(),
        string_schema("Optional language code (e.g. 'te', 'hi', 'en') that skips detection"),
    );

    finalize_object_schema(properties, &["text"])
}

/// Schema for tools that accept no arguments.
pub(crate) fn empty_object_schema() -> Map<String, Value> {
    finalize_object_schema(Map::new(), &[])
}

fn string_schema(description: &str) -> Value {
    let mut schema = Map::new();
    schema.insert("type".into(), Value::String("string".into()));
    schema.insert("description".into(), Value::String(description.into()));
    Value::Object(schema)
}

fn finalize_object_schema(properties: Map<String, Value>, required: &[&str]) -> Map<String, Value> {
    let mut schema = Map::new();
    schema.insert("type".into(), Value::String("object".into()));
    schema.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert(
            "required".into(),
            Value::Array(
                required
                    .iter()
                    .map(|&key| Value::String(key.into()))
                    .collect(),
            ),
        );
    }
    schema.insert("additionalProperties".into(), Value::Bool(false));
    schema
}
