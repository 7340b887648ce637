//! Schemas declared at runtime as JSON
//!
//! Lets hosts that cannot define Rust types (the C ABI, config files) describe
//! a target shape and receive a populated JSON object:
//!
//! ```json
//! {"fields": [
//!     {"name": "title", "type": "text", "keys": ["og:title"]},
//!     {"name": "images", "type": "collection", "fields": [
//!         {"name": "url", "type": "text", "keys": ["og:image", "og:image:url"]},
//!         {"name": "width", "type": "integer", "keys": ["og:image:width"]}
//!     ]}
//! ]}
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::document::Document;
use crate::engine::{self, Walker};
use crate::error::{ExtractError, Result};
use crate::schema::Schema;

/// Target structure for dynamic schemas.
pub type Record = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Integer,
    TextList,
    IntegerList,
    Nested,
    Collection,
}

impl FieldType {
    fn is_scalar(self) -> bool {
        !matches!(self, FieldType::Nested | FieldType::Collection)
    }

    fn zero(self) -> Value {
        match self {
            FieldType::Text => Value::String(String::new()),
            FieldType::Integer => Value::from(0),
            FieldType::TextList | FieldType::IntegerList | FieldType::Collection => Value::Array(Vec::new()),
            FieldType::Nested => Value::Object(Record::new()),
        }
    }

    fn accepts(self, value: &Value) -> bool {
        match self {
            FieldType::Text => value.is_string(),
            FieldType::Integer => value.is_i64(),
            FieldType::TextList | FieldType::IntegerList | FieldType::Collection => value.is_array(),
            FieldType::Nested => value.is_object(),
        }
    }
}

/// Single field declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Annotation keys in priority order (scalar and list fields)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keys: Vec<String>,
    /// Sub-fields (nested and collection fields)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaSpec {
    pub fields: Vec<FieldSpec>,
}

impl SchemaSpec {
    /// Parse and validate a JSON schema declaration.
    pub fn from_json(json: &str) -> Result<Self> {
        let spec: SchemaSpec = serde_json::from_str(json)?;
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> Result<()> {
        validate_fields(&self.fields, "")
    }

    pub fn compile(&self) -> Result<Schema<Record>> {
        self.validate()?;
        Ok(compile_fields(&self.fields))
    }

    /// Object with every declared field at its zero value.
    pub fn zero_record(&self) -> Record {
        let mut record = Record::new();
        fill_zero(&self.fields, &mut record);
        record
    }

    /// Populate a JSON object in place.
    ///
    /// Fields already present must have the declared JSON type. Missing
    /// fields are created at their zero value before the walk.
    pub fn populate(&self, document: &Document, target: &mut Value) -> Result<()> {
        let record = match target {
            Value::Object(record) => record,
            Value::Null => return Err(ExtractError::invalid_target("target is null")),
            other => {
                return Err(ExtractError::invalid_target(format!(
                    "target is {}, expected an object",
                    json_kind(other)
                )))
            }
        };

        let schema = self.compile()?;
        check_shape(&self.fields, record, "")?;
        fill_zero(&self.fields, record);
        engine::populate_with(&schema, document, record)
    }

    pub fn extract(&self, document: &Document) -> Result<Value> {
        let mut target = Value::Object(Record::new());
        self.populate(document, &mut target)?;
        Ok(target)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn validate_fields(fields: &[FieldSpec], prefix: &str) -> Result<()> {
    let mut seen = HashSet::new();

    for field in fields {
        let path = join_path(prefix, &field.name);

        if field.name.is_empty() {
            return Err(ExtractError::InvalidSchema(format!(
                "empty field name under `{prefix}`"
            )));
        }
        if !seen.insert(field.name.as_str()) {
            return Err(ExtractError::InvalidSchema(format!("duplicate field `{path}`")));
        }

        if field.field_type.is_scalar() {
            if field.keys.is_empty() {
                return Err(ExtractError::InvalidSchema(format!("field `{path}` has no keys")));
            }
            if !field.fields.is_empty() {
                return Err(ExtractError::InvalidSchema(format!(
                    "scalar field `{path}` cannot declare sub-fields"
                )));
            }
        } else {
            if !field.keys.is_empty() {
                return Err(ExtractError::InvalidSchema(format!(
                    "field `{path}` cannot have keys and sub-fields"
                )));
            }
            validate_fields(&field.fields, &path)?;
        }
    }

    Ok(())
}

fn compile_fields(fields: &[FieldSpec]) -> Schema<Record> {
    fields.iter().fold(Schema::<Record>::new(), |schema, field| {
        let key = field.name.clone();
        let name = field.name.clone();
        let keys = field.keys.clone();

        match field.field_type {
            FieldType::Text => schema.text(name, keys, move |record: &mut Record, value: String| {
                record.insert(key.clone(), Value::String(value));
            }),
            FieldType::Integer => schema.integer(name, keys, move |record: &mut Record, value: i64| {
                record.insert(key.clone(), Value::from(value));
            }),
            FieldType::TextList => schema.text_list(name, keys, move |record: &mut Record, value: String| {
                push_item(record, &key, Value::String(value));
            }),
            FieldType::IntegerList => schema.integer_list(name, keys, move |record: &mut Record, value: i64| {
                push_item(record, &key, Value::from(value));
            }),
            FieldType::Nested => {
                let sub = compile_fields(&field.fields);
                schema.nested_with(name, move |record: &mut Record, walker: &mut Walker| {
                    match record
                        .entry(key.clone())
                        .or_insert_with(|| Value::Object(Record::new()))
                    {
                        Value::Object(inner) => walker.walk(&sub, inner),
                        _ => Err(ExtractError::invalid_target(format!("field `{key}` is not an object"))),
                    }
                })
            }
            FieldType::Collection => {
                let sub = compile_fields(&field.fields);
                let item_fields = field.fields.clone();
                schema.collection_with(name, move |record: &mut Record, walker: &mut Walker| {
                    let zero = || {
                        let mut item = Record::new();
                        fill_zero(&item_fields, &mut item);
                        item
                    };
                    let items = walker.collect(&sub, zero)?;
                    match record
                        .entry(key.clone())
                        .or_insert_with(|| Value::Array(Vec::new()))
                    {
                        Value::Array(array) => {
                            array.extend(items.into_iter().map(Value::Object));
                            Ok(())
                        }
                        _ => Err(ExtractError::invalid_target(format!("field `{key}` is not an array"))),
                    }
                })
            }
        }
    })
}

fn push_item(record: &mut Record, key: &str, value: Value) {
    match record
        .entry(key.to_string())
        .or_insert_with(|| Value::Array(Vec::new()))
    {
        Value::Array(items) => items.push(value),
        slot => *slot = Value::Array(vec![value]),
    }
}

fn fill_zero(fields: &[FieldSpec], record: &mut Record) {
    for field in fields {
        let slot = record
            .entry(field.name.clone())
            .or_insert_with(|| field.field_type.zero());
        if let (FieldType::Nested, Value::Object(inner)) = (field.field_type, slot) {
            fill_zero(&field.fields, inner);
        }
    }
}

fn check_shape(fields: &[FieldSpec], record: &Record, prefix: &str) -> Result<()> {
    for field in fields {
        let Some(value) = record.get(&field.name) else {
            continue;
        };
        let path = join_path(prefix, &field.name);

        if !field.field_type.accepts(value) {
            return Err(ExtractError::invalid_target(format!(
                "field `{path}` is {}, expected {:?}",
                json_kind(value),
                field.field_type
            )));
        }
        if let Value::Object(inner) = value {
            check_shape(&field.fields, inner, &path)?;
        }
    }
    Ok(())
}
