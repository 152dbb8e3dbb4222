//! # Validation Engine
//!
//! A single generic routine interprets the rule tables in [`crate::schema`]
//! against an untyped JSON payload. Every field is checked independently and
//! all violations are collected; the typed entity is only produced when the
//! violation list is empty. Nothing here performs I/O.

use std::fmt;

use chrono::{DateTime, NaiveDate};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::{NewBoard, NewCard, NewCardUser, NewList, NewUser};
use crate::schema::{self, FieldSpec, FieldType, Presence, Rule, Schema};

/// Machine-readable name of the rule a field violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCode {
    Required,
    Type,
    NotEmpty,
    Length,
    Email,
    Date,
    Positive,
    Object,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: &'static str,
    pub rule: RuleCode,
    pub message: String,
}

impl Violation {
    fn new(field: &'static str, rule: RuleCode, message: impl Into<String>) -> Self {
        Self {
            field,
            rule,
            message: message.into(),
        }
    }
}

/// Non-empty, ordered list of field violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether any violation concerns `field`.
    pub fn touches(&self, field: &str) -> bool {
        self.0.iter().any(|v| v.field == field)
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", v.field, v.message)?;
        }
        Ok(())
    }
}

/// An input type whose shape is declared by a [`Schema`].
pub trait Validated: DeserializeOwned {
    const SCHEMA: &'static Schema;
}

impl Validated for NewUser {
    const SCHEMA: &'static Schema = &schema::USER;
}

impl Validated for NewBoard {
    const SCHEMA: &'static Schema = &schema::BOARD;
}

impl Validated for NewList {
    const SCHEMA: &'static Schema = &schema::LIST;
}

impl Validated for NewCard {
    const SCHEMA: &'static Schema = &schema::CARD;
}

impl Validated for NewCardUser {
    const SCHEMA: &'static Schema = &schema::CARD_USER;
}

/// Validate `raw` against `T`'s schema and build the typed value.
pub fn validate<T: Validated>(raw: &Value) -> Result<T, Violations> {
    let normalized = check(T::SCHEMA, raw)?;
    serde_json::from_value(Value::Object(normalized)).map_err(|e| {
        Violations(vec![Violation::new("body", RuleCode::Type, e.to_string())])
    })
}

/// Apply `schema` to `raw`, returning the payload restricted to declared
/// fields with coerced values.
pub fn check(schema: &Schema, raw: &Value) -> Result<Map<String, Value>, Violations> {
    let Some(object) = raw.as_object() else {
        return Err(Violations(vec![Violation::new(
            "body",
            RuleCode::Object,
            format!("{} payload must be a JSON object", schema.entity),
        )]));
    };

    let mut normalized = Map::new();
    let mut violations = Vec::new();

    for spec in schema.fields {
        match object.get(spec.name).filter(|v| !v.is_null()) {
            None => {
                if spec.presence == Presence::Required {
                    violations.push(Violation::new(
                        spec.name,
                        RuleCode::Required,
                        format!("{} is required", spec.name),
                    ));
                }
            }
            Some(value) => match coerce(spec, value) {
                Ok(coerced) => {
                    let before = violations.len();
                    apply_rules(spec, &coerced, &mut violations);
                    if violations.len() == before {
                        normalized.insert(spec.name.to_owned(), coerced);
                    }
                }
                Err(violation) => violations.push(violation),
            },
        }
    }

    if violations.is_empty() {
        Ok(normalized)
    } else {
        Err(Violations(violations))
    }
}

fn coerce(spec: &FieldSpec, value: &Value) -> Result<Value, Violation> {
    let field = spec.name;
    match spec.ty {
        FieldType::Text => match value {
            Value::String(_) => Ok(value.clone()),
            _ => Err(Violation::new(field, RuleCode::Type, format!("{field} must be a string"))),
        },
        FieldType::Identifier => {
            let parsed = match value {
                Value::Number(n) => n.as_i64(),
                Value::String(s) => s.trim().parse::<i64>().ok(),
                _ => None,
            };
            match parsed {
                Some(id) if id > 0 => Ok(Value::from(id)),
                Some(_) => Err(Violation::new(
                    field,
                    RuleCode::Positive,
                    format!("{field} must be a positive integer"),
                )),
                None => Err(Violation::new(
                    field,
                    RuleCode::Type,
                    format!("{field} must be an integer identifier"),
                )),
            }
        }
        FieldType::Boolean => match value {
            Value::Bool(_) => Ok(value.clone()),
            Value::String(s) if s == "true" || s == "false" => Ok(Value::Bool(s == "true")),
            _ => Err(Violation::new(field, RuleCode::Type, format!("{field} must be a boolean"))),
        },
        FieldType::Date => {
            let Value::String(s) = value else {
                return Err(Violation::new(
                    field,
                    RuleCode::Type,
                    format!("{field} must be an ISO-8601 date string"),
                ));
            };
            parse_date(s).map(|d| Value::String(d.format("%Y-%m-%d").to_string())).ok_or_else(
                || {
                    Violation::new(
                        field,
                        RuleCode::Date,
                        format!("{field} must be an ISO-8601 date (YYYY-MM-DD)"),
                    )
                },
            )
        }
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

fn apply_rules(spec: &FieldSpec, value: &Value, violations: &mut Vec<Violation>) {
    let Some(text) = value.as_str() else {
        return;
    };
    let field = spec.name;
    for rule in spec.rules {
        match *rule {
            Rule::NotEmpty if text.trim().is_empty() => violations.push(Violation::new(
                field,
                RuleCode::NotEmpty,
                format!("{field} must not be empty"),
            )),
            Rule::Length { min, max } => {
                let len = text.chars().count();
                if len < min || len > max {
                    violations.push(Violation::new(
                        field,
                        RuleCode::Length,
                        format!("{field} must be between {min} and {max} characters"),
                    ));
                }
            }
            Rule::Email if !text.trim().is_empty() && !looks_like_email(text) => violations.push(
                Violation::new(field, RuleCode::Email, format!("{field} must be an email address")),
            ),
            _ => {}
        }
    }
}

fn looks_like_email(text: &str) -> bool {
    match text.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !text.chars().any(char::is_whitespace)
        }
        None => false,
    }
}
