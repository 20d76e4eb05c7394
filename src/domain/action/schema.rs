//! Declarative payload schemas for actions

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// JSON type a field must hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Boolean,
    Number,
    Integer,
    Object,
    Array,
    Any,
}

impl FieldType {
    fn matches(&self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Boolean => value.is_boolean(),
            FieldType::Number => value.is_number(),
            FieldType::Integer => value.is_i64() || value.is_u64(),
            FieldType::Object => value.is_object(),
            FieldType::Array => value.is_array(),
            FieldType::Any => true,
        }
    }
}

/// One field of an action payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub field_type: FieldType,
    pub required: bool,
    pub nullable: bool,
    pub description: String,
}

impl FieldSpec {
    /// A field that must be present and non-null
    pub fn required(name: &str, field_type: FieldType, description: &str) -> Self {
        Self {
            name: name.to_string(),
            field_type,
            required: true,
            nullable: false,
            description: description.to_string(),
        }
    }

    /// A field that may be absent or null
    pub fn optional(name: &str, field_type: FieldType, description: &str) -> Self {
        Self {
            name: name.to_string(),
            field_type,
            required: false,
            nullable: true,
            description: description.to_string(),
        }
    }

    /// Allow an explicit `null` for a required field
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// Object schema: a list of fields, extra keys ignored unless `strict`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSchema {
    pub fields: Vec<FieldSpec>,
    #[serde(default)]
    pub strict: bool,
}

impl ActionSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Reject keys that are not declared
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Check the schema itself is well formed
    pub fn check(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.trim().is_empty() {
                return Err("schema field with empty name".to_string());
            }
            if !seen.insert(field.name.as_str()) {
                return Err(format!("schema field '{}' declared twice", field.name));
            }
        }
        Ok(())
    }

    /// Check a payload against the schema
    pub fn validate(&self, payload: &Value) -> Result<(), String> {
        let object = payload
            .as_object()
            .ok_or_else(|| "payload must be a JSON object".to_string())?;

        for field in &self.fields {
            match object.get(&field.name) {
                None if field.required => {
                    return Err(format!("missing required field '{}'", field.name));
                }
                None => {}
                Some(Value::Null) if field.nullable || !field.required => {}
                Some(Value::Null) => {
                    return Err(format!("field '{}' must not be null", field.name));
                }
                Some(value) if !field.field_type.matches(value) => {
                    return Err(format!(
                        "field '{}' must be of type {:?}",
                        field.name, field.field_type
                    ));
                }
                Some(_) => {}
            }
        }

        if self.strict {
            self.reject_unknown(object)?;
        }

        Ok(())
    }

    fn reject_unknown(&self, object: &Map<String, Value>) -> Result<(), String> {
        for key in object.keys() {
            if !self.fields.iter().any(|f| &f.name == key) {
                return Err(format!("unexpected field '{}'", key));
            }
        }
        Ok(())
    }
}
