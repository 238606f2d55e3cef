//! Request payload validation.
//!
//! A payload is first checked against a declared [`Schema`] (field presence,
//! JSON types, forbidden and unknown keys), then converted into its typed
//! request struct and checked against that struct's `validator` constraints.
//! Handlers only ever see the typed value.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::{Validate, ValidationErrors};

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
    Number,
    Boolean,
}

impl FieldType {
    fn name(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Integer => {
                value.is_i64()
                    || value.is_u64()
                    || value.as_f64().map_or(false, |f| f.is_finite() && f.fract() == 0.0)
            }
            FieldType::Number => value.is_number(),
            FieldType::Boolean => value.is_boolean(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, ty: FieldType) -> Self {
        Self { name, ty, required: true }
    }

    pub const fn optional(name: &'static str, ty: FieldType) -> Self {
        Self { name, ty, required: false }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub fields: &'static [FieldSpec],
    /// Keys that must not appear at all, whatever their value.
    pub forbidden: &'static [&'static str],
    pub additional_properties: bool,
}

impl Schema {
    /// Returns every shape violation in a stable order, or `Ok` if there are none.
    pub fn check(&self, payload: &Value) -> Result<(), Vec<String>> {
        let Some(object) = payload.as_object() else {
            return Err(vec!["instance is not of a type(s) object".to_string()]);
        };

        let mut violations = Vec::new();

        for key in self.forbidden {
            if object.contains_key(*key) {
                violations.push(format!("instance.{key} is not allowed"));
            }
        }

        for field in self.fields {
            match object.get(field.name) {
                None if field.required => {
                    violations.push(format!("instance requires property \"{}\"", field.name));
                }
                None => {}
                Some(value) if !field.ty.matches(value) => {
                    violations.push(format!(
                        "instance.{} is not of a type(s) {}",
                        field.name,
                        field.ty.name()
                    ));
                }
                Some(_) => {}
            }
        }

        if !self.additional_properties {
            let mut extra: Vec<&String> = object
                .keys()
                .filter(|k| {
                    !self.fields.iter().any(|f| f.name == k.as_str())
                        && !self.forbidden.contains(&k.as_str())
                })
                .collect();
            extra.sort();
            for key in extra {
                violations.push(format!(
                    "instance is not allowed to have the additional property \"{key}\""
                ));
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    /// Rewrites integral floats in integer fields (`1100.0`) as integers so
    /// they convert into integer struct fields.
    fn normalize(&self, payload: &mut Value) {
        let Some(object) = payload.as_object_mut() else {
            return;
        };
        for field in self.fields.iter().filter(|f| f.ty == FieldType::Integer) {
            let Some(value) = object.get_mut(field.name) else {
                continue;
            };
            if value.is_f64() {
                if let Some(f) = value.as_f64() {
                    if f >= i64::MIN as f64 && f < i64::MAX as f64 {
                        *value = Value::from(f as i64);
                    }
                }
            }
        }
    }
}

/// Validates `payload` against `schema` and builds the typed value from it.
pub fn parse<T>(schema: &Schema, mut payload: Value) -> Result<T, ApiError>
where
    T: DeserializeOwned + Validate,
{
    schema.check(&payload).map_err(ApiError::Validation)?;
    schema.normalize(&mut payload);
    let value: T =
        serde_json::from_value(payload).map_err(|e| ApiError::Validation(vec![e.to_string()]))?;
    value
        .validate()
        .map_err(|errs| ApiError::Validation(constraint_messages(&errs)))?;
    Ok(value)
}

fn constraint_messages(errors: &ValidationErrors) -> Vec<String> {
    let sorted: BTreeMap<_, _> = errors.field_errors().into_iter().collect();
    sorted
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let detail = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("failed the {} constraint", e.code));
                format!("instance.{field} {detail}")
            })
        })
        .collect()
}
