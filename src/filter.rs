//! # Where Conditions
//!
//! Request bodies carry their filters as an array of `[field, operator, value]`
//! triples, joined with AND:
//!
//! ```json
//! {"where": [["department", "=", "Sale"], ["age", ">=", 30], ["id", "in", [1, 2, 3]]]}
//! ```
//!
//! Supported operators: `=`, `<>` (or `!=`), `>`, `>=`, `<`, `<=`, `like`,
//! `in`, `not in`. Fields are checked against [`Resource::filterable_columns`].

use sea_orm::{ColumnTrait, Condition, Value, sea_query::SimpleExpr};
use serde::Deserialize;
use std::fmt;

use crate::errors::ApiError;
use crate::traits::{Resource, find_column};

// Basic safety limits
const MAX_FIELD_VALUE_LENGTH: usize = 10_000;
const MAX_LIST_LENGTH: usize = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Operator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "<>", alias = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = "like")]
    Like,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "not in")]
    NotIn,
}

impl Operator {
    const fn takes_list(self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Like => "like",
            Self::In => "in",
            Self::NotIn => "not in",
        };
        f.write_str(symbol)
    }
}

/// One `[field, operator, value]` triple.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Filter(pub String, pub Operator, pub serde_json::Value);

/// The `where` member of a request body.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Conditions(pub Vec<Filter>);

impl Conditions {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Compile the triples into a `Condition` over `R`'s columns.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::BadRequest` for unknown fields, values that do not
    /// suit the operator, or values that exceed the safety limits.
    pub fn to_condition<R: Resource>(&self) -> Result<Condition, ApiError> {
        let columns = R::filterable_columns();
        self.0
            .iter()
            .try_fold(Condition::all(), |condition, Filter(field, operator, value)| {
                let column = find_column(field, &columns)
                    .ok_or_else(|| ApiError::bad_request(format!("unknown field `{field}`")))?;
                let expr = build_expr(column, field, *operator, value)?;
                Ok(condition.add(expr))
            })
    }
}

fn build_expr<C: ColumnTrait>(
    column: C,
    field: &str,
    operator: Operator,
    value: &serde_json::Value,
) -> Result<SimpleExpr, ApiError> {
    if operator.takes_list() {
        let items = value.as_array().ok_or_else(|| {
            ApiError::bad_request(format!("`{field} {operator}` expects an array"))
        })?;
        if items.len() > MAX_LIST_LENGTH {
            return Err(ApiError::bad_request(format!(
                "`{field} {operator}` accepts at most {MAX_LIST_LENGTH} values"
            )));
        }
        let values = items
            .iter()
            .map(|item| scalar(field, item))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(match operator {
            Operator::NotIn => column.is_not_in(values),
            _ => column.is_in(values),
        });
    }

    if operator == Operator::Like {
        let pattern = value.as_str().ok_or_else(|| {
            ApiError::bad_request(format!("`{field} like` expects a string"))
        })?;
        check_length(field, pattern)?;
        return Ok(column.like(pattern));
    }

    let value = scalar(field, value)?;
    Ok(match operator {
        Operator::Ne => column.ne(value),
        Operator::Gt => column.gt(value),
        Operator::Gte => column.gte(value),
        Operator::Lt => column.lt(value),
        Operator::Lte => column.lte(value),
        _ => column.eq(value),
    })
}

/// Convert a JSON scalar into a bindable SQL value.
fn scalar(field: &str, value: &serde_json::Value) -> Result<Value, ApiError> {
    match value {
        serde_json::Value::Bool(b) => Ok((*b).into()),
        serde_json::Value::Number(n) => n
            .as_i64()
            .map(Value::from)
            .or_else(|| n.as_f64().map(Value::from))
            .ok_or_else(|| ApiError::bad_request(format!("`{field}` number is out of range"))),
        serde_json::Value::String(s) => {
            check_length(field, s)?;
            Ok(s.clone().into())
        }
        _ => Err(ApiError::bad_request(format!(
            "`{field}` expects a string, number or boolean"
        ))),
    }
}

fn check_length(field: &str, value: &str) -> Result<(), ApiError> {
    if value.len() > MAX_FIELD_VALUE_LENGTH {
        return Err(ApiError::bad_request(format!("`{field}` value is too long")));
    }
    Ok(())
}
