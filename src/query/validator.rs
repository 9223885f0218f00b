//! Filter validation and resolution
//!
//! Maps the parser's raw triples to resolved [`Filter`]s: aliases become
//! column names, missing operators pick up defaults, values normalize per
//! operator semantics, and the allow-list is enforced when a policy is
//! configured.

use crate::core::error::QueryError;
use crate::query::config::QueryBuilderConfig;
use crate::query::operator::FilterOperator;
use crate::query::params::{Filter, FilterValue, RawFilter};

/// Resolve raw filters, validating against a policy when one is configured.
///
/// Without a policy (or with an empty one), permissive mode applies: every
/// raw filter passes through with default-operator substitution and value
/// normalization only. With a policy, unresolvable names raise
/// [`QueryError::FilterNotAllowed`] and disallowed operators raise
/// [`QueryError::OperatorNotAllowed`] — unless the config opts into
/// dropping invalid filters silently.
///
/// Resolution is pure: the same input yields structurally equal output.
pub fn resolve_filters(
    raw_filters: Vec<RawFilter>,
    config: Option<&QueryBuilderConfig>,
) -> Result<Vec<Filter>, QueryError> {
    let policy = config.filter(|c| !c.is_empty());
    let ignore_invalid = config.is_some_and(|c| c.should_ignore_invalid());

    let mut resolved = Vec::with_capacity(raw_filters.len());
    for raw in raw_filters {
        match resolve_one(&raw, policy) {
            Ok(filter) => resolved.push(filter),
            Err(err) if ignore_invalid => {
                tracing::debug!(filter = %raw.alias_or_field, error = %err, "dropping invalid filter");
            }
            Err(err) => return Err(err),
        }
    }
    Ok(resolved)
}

fn resolve_one(
    raw: &RawFilter,
    policy: Option<&QueryBuilderConfig>,
) -> Result<Filter, QueryError> {
    let Some(policy) = policy else {
        // Permissive mode: no allow-list configured
        let operator = match raw.operator.as_deref() {
            Some(token) => token.parse::<FilterOperator>()?,
            None => FilterOperator::default(),
        };
        let (operator, value) =
            normalize_value(raw.values.clone(), operator, raw.operator.is_some());
        return Ok(Filter {
            field: raw.alias_or_field.clone(),
            operator,
            value,
        });
    };

    let allowed = policy
        .resolve(&raw.alias_or_field)
        .ok_or_else(|| QueryError::FilterNotAllowed {
            filter: raw.alias_or_field.clone(),
            allowed: policy.allowed_aliases(),
        })?;

    let operator = match raw.operator.as_deref() {
        Some(token) => {
            // An unparseable token is rejected the same way as a known but
            // unpermitted operator
            match token.parse::<FilterOperator>() {
                Ok(op) if allowed.is_operator_allowed(op) => op,
                _ => {
                    return Err(QueryError::OperatorNotAllowed {
                        filter: raw.alias_or_field.clone(),
                        operator: token.to_string(),
                        allowed: allowed.allowed_operator_tokens(),
                    });
                }
            }
        }
        None => allowed.default_operator(),
    };

    let (operator, value) = normalize_value(raw.values.clone(), operator, raw.operator.is_some());
    Ok(Filter {
        field: allowed.field().to_string(),
        operator,
        value,
    })
}

/// Normalize filter values based on operator and multiplicity.
///
/// - multiple values with no explicit operator upgrade `eq` to `in`;
/// - null checks collapse to a boolean ("true"/"1"/"yes", first value only);
/// - `in`/`nin` explode comma-separated tokens into a flat trimmed list;
/// - everything else passes through untouched (coercion happens in the
///   query builder's operator application).
fn normalize_value(
    values: Vec<String>,
    operator: FilterOperator,
    operator_was_explicit: bool,
) -> (FilterOperator, FilterValue) {
    let mut operator = operator;
    let value = if values.len() > 1 {
        if operator == FilterOperator::default() && !operator_was_explicit {
            operator = FilterOperator::In;
        }
        FilterValue::Many(values)
    } else {
        FilterValue::Single(values.into_iter().next().unwrap_or_default())
    };

    if matches!(operator, FilterOperator::IsNull | FilterOperator::IsNotNull) {
        let first = match &value {
            FilterValue::Single(s) => s.clone(),
            FilterValue::Many(v) => v.first().cloned().unwrap_or_else(|| "false".to_string()),
            FilterValue::Bool(b) => b.to_string(),
        };
        let truthy = matches!(first.to_lowercase().as_str(), "true" | "1" | "yes");
        return (operator, FilterValue::Bool(truthy));
    }

    if matches!(operator, FilterOperator::In | FilterOperator::Nin) {
        let exploded: Vec<String> = value
            .as_list()
            .iter()
            .flat_map(|element| element.split(','))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(String::from)
            .collect();
        return (operator, FilterValue::Many(exploded));
    }

    (operator, value)
}
