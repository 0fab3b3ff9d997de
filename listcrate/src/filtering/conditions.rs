//! Per-field predicate compilation.
//!
//! Each filterable field yields one predicate per operator that applies to its
//! kind (see [`FilterOperator::for_field`]). A predicate normalises the raw
//! client value and conjoins exactly one clause onto the scope it receives.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use sea_orm::{
    Value,
    sea_query::{Alias, Condition, ConditionExpression, Expr, SimpleExpr},
};
use serde_json::Value as Json;
use uuid::Uuid;

use super::fields::{FieldDescriptor, FieldKind};
use super::filter_set::{ArgumentSpec, FilterArgument, InputShape, Predicate};
use super::operators::FilterOperator;
use super::scope::Scope;
use super::search::{
    MAX_SEARCH_QUERY_LENGTH, build_array_element_condition, build_array_like_condition,
    build_like_condition, is_searchable,
};
use crate::ApiError;
use crate::core::hooks::DateConverter;

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Compile every generated filter argument for one field.
///
/// Fields of kinds without operators produce nothing.
#[must_use]
pub fn compile_field(
    field: &FieldDescriptor,
    date_converter: Option<&DateConverter>,
) -> Vec<FilterArgument> {
    FilterOperator::for_field(field)
        .into_iter()
        .map(|operator| {
            let name = operator.argument_name(&field.name);
            FilterArgument {
                spec: ArgumentSpec {
                    name: name.clone(),
                    field: Some(field.name.clone()),
                    operator: Some(operator),
                    shape: input_shape(&field.kind, operator),
                },
                predicate: compile_predicate(field.clone(), operator, name, date_converter.cloned()),
            }
        })
        .collect()
}

fn compile_predicate(
    field: FieldDescriptor,
    operator: FilterOperator,
    argument: String,
    date_converter: Option<DateConverter>,
) -> Predicate {
    Arc::new(move |scope: Scope, raw: &Json| -> Result<Scope, ApiError> {
        if is_absent(raw) {
            return Ok(scope);
        }
        let clause = match operator {
            FilterOperator::In => {
                let values = coerce_list(&field, raw, &argument)?;
                in_clause(&field, values)
            }
            FilterOperator::Has => {
                let Json::String(text) = raw else {
                    return Err(invalid_value(&argument, "a string"));
                };
                if !is_searchable(text) {
                    return Err(ApiError::bad_request(format!(
                        "Search term for filter `{argument}` exceeds {MAX_SEARCH_QUERY_LENGTH} characters"
                    )));
                }
                has_clause(&field, text)
            }
            _ => {
                let value =
                    coerce_scalar(&field, operator, raw, &argument, date_converter.as_ref())?;
                compare_clause(&field, operator, value)
            }
        };
        Ok(scope.and(clause))
    })
}

/// Blank strings and nulls narrow nothing.
fn is_absent(raw: &Json) -> bool {
    match raw {
        Json::Null => true,
        Json::String(text) => text.trim().is_empty(),
        _ => false,
    }
}

fn invalid_value(argument: &str, expected: &str) -> ApiError {
    ApiError::bad_request(format!(
        "Invalid value for filter `{argument}`: expected {expected}"
    ))
}

/// Element kind for array fields, the field kind otherwise.
fn value_kind(kind: &FieldKind) -> &FieldKind {
    match kind {
        FieldKind::Array(element) => element.as_ref(),
        other => other,
    }
}

fn input_shape(kind: &FieldKind, operator: FilterOperator) -> InputShape {
    let kind = value_kind(kind);
    match (kind, operator) {
        (FieldKind::Id, FilterOperator::In) => InputShape::IdList,
        (_, FilterOperator::In) => InputShape::StringList,
        (_, FilterOperator::Has) => InputShape::String,
        (FieldKind::Id, _) => InputShape::Id,
        (FieldKind::Integer, _) => InputShape::Integer,
        (FieldKind::Float, _) => InputShape::Float,
        (FieldKind::Boolean, _) => InputShape::Boolean,
        (FieldKind::Date, _) => InputShape::Date,
        (FieldKind::Time | FieldKind::DateTime, _) => InputShape::DateTime,
        _ => InputShape::String,
    }
}

fn coerce_list(field: &FieldDescriptor, raw: &Json, argument: &str) -> Result<Vec<Value>, ApiError> {
    let items = match raw {
        Json::Array(items) => items.as_slice(),
        single => std::slice::from_ref(single),
    };
    items
        .iter()
        .filter(|item| !is_absent(item))
        .map(|item| coerce_scalar(field, FilterOperator::In, item, argument, None))
        .collect()
}

fn coerce_scalar(
    field: &FieldDescriptor,
    operator: FilterOperator,
    raw: &Json,
    argument: &str,
    date_converter: Option<&DateConverter>,
) -> Result<Value, ApiError> {
    match value_kind(&field.kind) {
        FieldKind::Id => match raw {
            Json::Number(number) => number
                .as_i64()
                .map(Value::from)
                .ok_or_else(|| invalid_value(argument, "an identifier")),
            Json::String(text) => {
                let text = text.trim();
                Ok(Uuid::parse_str(text).map_or_else(|_| Value::from(text.to_string()), Value::from))
            }
            _ => Err(invalid_value(argument, "an identifier")),
        },
        FieldKind::ObjectId => match raw {
            Json::String(text) => Uuid::parse_str(text.trim())
                .map(Value::from)
                .map_err(|_| invalid_value(argument, "a UUID")),
            _ => Err(invalid_value(argument, "a UUID")),
        },
        kind if kind.is_textual() => match raw {
            Json::String(text) => Ok(Value::from(text.clone())),
            _ => Err(invalid_value(argument, "a string")),
        },
        FieldKind::Integer => match raw {
            Json::Number(number) => number.as_i64(),
            Json::String(text) => text.trim().parse::<i64>().ok(),
            _ => None,
        }
        .map(Value::from)
        .ok_or_else(|| invalid_value(argument, "an integer")),
        FieldKind::Float => match raw {
            Json::Number(number) => number.as_f64(),
            Json::String(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        }
        .map(Value::from)
        .ok_or_else(|| invalid_value(argument, "a number")),
        FieldKind::Boolean => match raw {
            Json::Bool(flag) => Some(*flag),
            Json::String(text) => text.trim().parse::<bool>().ok(),
            _ => None,
        }
        .map(Value::from)
        .ok_or_else(|| invalid_value(argument, "a boolean")),
        kind if kind.is_temporal() => match raw {
            Json::String(text) => {
                normalize_temporal(kind, operator, text.trim(), date_converter)?
                    .ok_or_else(|| invalid_value(argument, "a date or timestamp"))
            }
            _ => Err(invalid_value(argument, "a date or timestamp")),
        },
        _ => Err(invalid_value(argument, "a supported value")),
    }
}

enum Temporal {
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
}

/// Offset-bearing timestamps are converted to UTC.
fn parse_temporal(raw: &str) -> Option<Temporal> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(Temporal::Timestamp(timestamp.naive_utc()));
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(Temporal::Timestamp)
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .map(Temporal::Date)
        })
}

/// Turn a raw date/time filter value into the value bound in the clause.
///
/// A timestamp at exactly midnight goes through `date_converter`, and as an
/// upper bound (`_lte`) is moved forward one day so the whole day matches. A
/// plain date compared against a `Date` field binds as a date, unshifted.
///
/// Returns `Ok(None)` when `raw` is not a recognised date or timestamp.
///
/// # Errors
///
/// Propagates errors from `date_converter`, and rejects bounds that overflow.
pub fn normalize_temporal(
    kind: &FieldKind,
    operator: FilterOperator,
    raw: &str,
    date_converter: Option<&DateConverter>,
) -> Result<Option<Value>, ApiError> {
    let Some(temporal) = parse_temporal(raw) else {
        return Ok(None);
    };
    let mut timestamp = match temporal {
        Temporal::Date(date) if *kind == FieldKind::Date => return Ok(Some(Value::from(date))),
        Temporal::Date(date) => date.and_time(NaiveTime::MIN),
        Temporal::Timestamp(timestamp) => timestamp,
    };

    if timestamp.time() == NaiveTime::MIN {
        if let Some(convert) = date_converter {
            timestamp = (**convert)(timestamp)?;
        }
        if operator == FilterOperator::Lte {
            timestamp = timestamp
                .checked_add_signed(TimeDelta::days(1))
                .ok_or_else(|| ApiError::bad_request(format!("Date out of range: {raw}")))?;
        }
    }
    Ok(Some(Value::from(timestamp)))
}

fn column(field: &FieldDescriptor) -> Expr {
    Expr::col(Alias::new(field.name.as_str()))
}

fn compare_clause(field: &FieldDescriptor, operator: FilterOperator, value: Value) -> ConditionExpression {
    if matches!(field.kind, FieldKind::Array(_)) {
        let element = build_array_element_condition(&field.name, value);
        return match operator {
            FilterOperator::Ne => element.not(),
            _ => element,
        }
        .into();
    }

    let column = column(field);
    let expr: SimpleExpr = match operator {
        FilterOperator::Ne => column.ne(value),
        FilterOperator::Lt => column.lt(value),
        FilterOperator::Gt => column.gt(value),
        FilterOperator::Gte => column.gte(value),
        FilterOperator::Lte => column.lte(value),
        _ => column.eq(value),
    };
    expr.into()
}

fn in_clause(field: &FieldDescriptor, values: Vec<Value>) -> ConditionExpression {
    if matches!(field.kind, FieldKind::Array(_)) && !values.is_empty() {
        let any = values
            .into_iter()
            .fold(Condition::any(), |any, value| {
                any.add(build_array_element_condition(&field.name, value))
            });
        return any.into();
    }
    // an empty list matches nothing
    column(field).is_in(values).into()
}

fn has_clause(field: &FieldDescriptor, text: &str) -> ConditionExpression {
    if matches!(field.kind, FieldKind::Array(_)) {
        build_array_like_condition(&field.name, text).into()
    } else {
        build_like_condition(&field.name, text).into()
    }
}
