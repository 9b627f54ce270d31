//! Declarative field tables for JSON payloads.
//!
//! A [`Schema`] is a static list of [`Field`]s walked over an untyped
//! `serde_json::Value`. The walk never stops at the first problem: every
//! missing or mistyped field, at any depth, ends up in the returned
//! [`ValidationErrors`] under its own (nested) name. On success the walk
//! yields the cleaned data, restricted to the declared fields, ready for
//! `serde_json::from_value`.

pub mod transaction;

use serde_json::{Map, Number, Value};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

pub use transaction::{validate_request, validate_response, REQUEST_SCHEMA, RESPONSE_SCHEMA};

/// Key used for errors that belong to an object as a whole.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

const MAX_INTEGER_STRING_LENGTH: usize = 1000;

/// Largest float magnitude still accepted as an integer.
const MAX_INTEGRAL_FLOAT: f64 = 1e16;

#[derive(Debug, Clone, Copy)]
pub enum Kind {
    /// String. Numbers are accepted and converted to their decimal text.
    Text { allow_blank: bool, allow_null: bool },
    /// Unbounded integer. Integral floats and integer-like strings are coerced.
    Integer,
    Object(&'static [Field]),
    ObjectList(&'static [Field]),
}

#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub kind: Kind,
}

impl Field {
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: Kind::Text {
                allow_blank: false,
                allow_null: false,
            },
        }
    }

    pub const fn blank_text(name: &'static str) -> Self {
        Self {
            name,
            kind: Kind::Text {
                allow_blank: true,
                allow_null: false,
            },
        }
    }

    pub const fn nullable_text(name: &'static str) -> Self {
        Self {
            name,
            kind: Kind::Text {
                allow_blank: false,
                allow_null: true,
            },
        }
    }

    pub const fn integer(name: &'static str) -> Self {
        Self {
            name,
            kind: Kind::Integer,
        }
    }

    pub const fn object(name: &'static str, fields: &'static [Field]) -> Self {
        Self {
            name,
            kind: Kind::Object(fields),
        }
    }

    pub const fn object_list(name: &'static str, fields: &'static [Field]) -> Self {
        Self {
            name,
            kind: Kind::ObjectList(fields),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Schema {
    fields: &'static [Field],
}

impl Schema {
    pub const fn new(fields: &'static [Field]) -> Self {
        Self { fields }
    }

    /// Validate `data`, returning the cleaned object or every violation found.
    pub fn validate(&self, data: &Value) -> Result<Value, ValidationErrors> {
        match data {
            Value::Object(map) => validate_object(self.fields, map).map(Value::Object),
            other => Err(non_field_error(not_a_dictionary(other))),
        }
    }
}

enum Violation {
    Field(ValidationError),
    Nested(ValidationErrorsKind),
}

fn validate_object(
    fields: &'static [Field],
    map: &Map<String, Value>,
) -> Result<Map<String, Value>, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let mut cleaned = Map::new();

    for field in fields {
        let Some(raw) = map.get(field.name) else {
            errors.add(field.name, violation("required", "This field is required."));
            continue;
        };

        match field.kind.clean(raw) {
            Ok(value) => {
                cleaned.insert(field.name.to_string(), value);
            }
            Err(Violation::Field(err)) => errors.add(field.name, err),
            Err(Violation::Nested(kind)) => {
                errors.errors_mut().insert(field.name, kind);
            }
        }
    }

    if errors.errors().is_empty() {
        Ok(cleaned)
    } else {
        Err(errors)
    }
}

impl Kind {
    fn clean(&self, raw: &Value) -> Result<Value, Violation> {
        if raw.is_null() {
            return match self {
                Kind::Text {
                    allow_null: true, ..
                } => Ok(Value::Null),
                _ => Err(Violation::Field(violation(
                    "null",
                    "This field may not be null.",
                ))),
            };
        }

        match *self {
            Kind::Text { allow_blank, .. } => clean_text(raw, allow_blank)
                .map(Value::String)
                .map_err(Violation::Field),
            Kind::Integer => clean_integer(raw)
                .map(Value::Number)
                .map_err(Violation::Field),
            Kind::Object(fields) => match raw {
                Value::Object(map) => validate_object(fields, map)
                    .map(Value::Object)
                    .map_err(nested),
                other => Err(nested(non_field_error(not_a_dictionary(other)))),
            },
            Kind::ObjectList(fields) => match raw {
                Value::Array(items) => clean_list(fields, items),
                other => Err(nested(non_field_error(owned_violation(
                    "not_a_list",
                    format!(
                        "Expected a list of items but got type \"{}\".",
                        type_name(other)
                    ),
                )))),
            },
        }
    }
}

fn clean_list(fields: &'static [Field], items: &[Value]) -> Result<Value, Violation> {
    let mut cleaned = Vec::with_capacity(items.len());
    let mut failures = BTreeMap::new();

    for (index, item) in items.iter().enumerate() {
        let result = match item {
            Value::Object(map) => validate_object(fields, map),
            other => Err(non_field_error(not_a_dictionary(other))),
        };
        match result {
            Ok(map) => cleaned.push(Value::Object(map)),
            Err(errors) => {
                failures.insert(index, Box::new(errors));
            }
        }
    }

    if failures.is_empty() {
        Ok(Value::Array(cleaned))
    } else {
        Err(Violation::Nested(ValidationErrorsKind::List(failures)))
    }
}

fn clean_text(raw: &Value, allow_blank: bool) -> Result<String, ValidationError> {
    let text = match raw {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return Err(violation("invalid", "Not a valid string.")),
    };

    if !allow_blank && text.trim().is_empty() {
        return Err(violation("blank", "This field may not be blank."));
    }

    if text.contains('\0') {
        return Err(violation(
            "null_characters_not_allowed",
            "Null characters are not allowed.",
        ));
    }

    Ok(text)
}

fn clean_integer(raw: &Value) -> Result<Number, ValidationError> {
    let invalid = || violation("invalid", "A valid integer is required.");

    match raw {
        Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(Number::from(i)),
            None if n.is_f64() => n
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < MAX_INTEGRAL_FLOAT)
                .map(|f| Number::from(f as i64))
                .ok_or_else(invalid),
            None => integer_from_digits(&n.to_string()).ok_or_else(invalid),
        },
        Value::String(s) if s.len() > MAX_INTEGER_STRING_LENGTH => Err(violation(
            "max_string_length",
            "String value too large.",
        )),
        Value::String(s) => parse_integer(s).ok_or_else(invalid),
        _ => Err(invalid()),
    }
}

/// Accepts `" 42 "`, `"42.000"`, `"+7"` and `"-007"`; rejects `"4.5"` and `"abc"`.
fn parse_integer(text: &str) -> Option<Number> {
    let trimmed = text.trim();
    let whole = match trimmed.split_once('.') {
        Some((whole, fraction)) if fraction.chars().all(|c| c == '0') => whole,
        Some(_) => return None,
        None => trimmed,
    };
    integer_from_digits(whole.trim())
}

/// Canonical integer for an optionally signed run of ASCII digits, of any length.
fn integer_from_digits(text: &str) -> Option<Number> {
    let (negative, digits) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let digits = match digits.trim_start_matches('0') {
        "" => return Some(Number::from(0)),
        rest => rest,
    };
    let canonical = if negative {
        format!("-{digits}")
    } else {
        digits.to_string()
    };

    match canonical.parse::<i64>() {
        Ok(value) => Some(Number::from(value)),
        Err(_) => serde_json::from_str(&canonical).ok(),
    }
}

fn nested(errors: ValidationErrors) -> Violation {
    Violation::Nested(ValidationErrorsKind::Struct(Box::new(errors)))
}

fn non_field_error(err: ValidationError) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(NON_FIELD_ERRORS, err);
    errors
}

fn not_a_dictionary(value: &Value) -> ValidationError {
    owned_violation(
        "invalid",
        format!(
            "Invalid data. Expected a dictionary, but got {}.",
            type_name(value)
        ),
    )
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "NoneType",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

fn violation(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError {
        code: Cow::Borrowed(code),
        message: Some(Cow::Borrowed(message)),
        params: HashMap::new(),
    }
}

fn owned_violation(code: &'static str, message: String) -> ValidationError {
    ValidationError {
        code: Cow::Borrowed(code),
        message: Some(Cow::Owned(message)),
        params: HashMap::new(),
    }
}
