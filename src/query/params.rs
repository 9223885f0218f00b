//! Query parameter containers
//!
//! [`RawFilter`] is the unvalidated output of the lexical parser;
//! [`Filter`] is the resolved form produced by the validator; [`QueryParams`]
//! bundles everything a request can ask for: filters, sort, includes and
//! field selection.

use serde::{Deserialize, Serialize};

use crate::core::error::QueryError;
use crate::query::config::QueryBuilderConfig;
use crate::query::operator::FilterOperator;
use crate::query::{parser, validator};

/// A filter extracted lexically from the query string, before validation.
///
/// One raw filter per distinct `(field-or-alias, operator)` key group;
/// repeated keys accumulate into `values` in encounter order.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFilter {
    /// The name between the first brackets — alias or field, not yet resolved
    pub alias_or_field: String,
    /// The operator token between the second brackets, if present
    pub operator: Option<String>,
    /// All values supplied for this key group
    pub values: Vec<String>,
}

/// The value carried by a resolved filter.
///
/// Shape depends on the operator: scalar for comparisons and pattern
/// matches, a list for membership and ranges, a boolean for null checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Single(String),
    Many(Vec<String>),
    Bool(bool),
}

impl FilterValue {
    /// View the value as a list, coercing a scalar into a single element
    pub fn as_list(&self) -> Vec<String> {
        match self {
            FilterValue::Single(s) => vec![s.clone()],
            FilterValue::Many(v) => v.clone(),
            FilterValue::Bool(b) => vec![b.to_string()],
        }
    }

    /// View the value as a scalar; `None` for lists
    pub fn as_scalar(&self) -> Option<String> {
        match self {
            FilterValue::Single(s) => Some(s.clone()),
            FilterValue::Bool(b) => Some(b.to_string()),
            FilterValue::Many(_) => None,
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Single(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Single(value)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(values: Vec<String>) -> Self {
        FilterValue::Many(values)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

/// A single resolved filter condition, immutable once constructed
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// The underlying column name (aliases already resolved)
    pub field: String,
    /// The operator to apply
    pub operator: FilterOperator,
    /// The normalized value
    pub value: FilterValue,
}

impl Filter {
    pub fn new(
        field: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<FilterValue>,
    ) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }
}

/// Everything a request can ask of the query builder.
///
/// Insertion order of filters and sort directives is preserved and
/// determines application order.
///
/// # Wire format
/// ```text
/// filter[name]=Tech&filter[description][icontains]=innov
/// sort=-created_at,name
/// include=articles,author
/// fields=id,name
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    /// Resolved filter conditions
    pub filters: Vec<Filter>,
    /// Sort tokens; a leading `-` means descending
    pub sort: Vec<String>,
    /// Relation names to eager-load
    pub include: Vec<String>,
    /// Column projection; empty means full entity
    pub fields: Vec<String>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw (still percent-encoded) query string.
    ///
    /// With a config, filters are resolved against its allow-list; without
    /// one, permissive mode applies (see
    /// [`validator::resolve_filters`](crate::query::validator::resolve_filters)).
    pub fn from_query(
        query: &str,
        config: Option<&QueryBuilderConfig>,
    ) -> Result<Self, QueryError> {
        Self::from_pairs(&parser::parse_query_pairs(query), config)
    }

    /// Build from already-decoded key/value pairs, as supplied by a routing
    /// layer. Repeated `sort`/`include`/`fields` keys accumulate.
    pub fn from_pairs(
        pairs: &[(String, String)],
        config: Option<&QueryBuilderConfig>,
    ) -> Result<Self, QueryError> {
        let raw_filters = parser::parse_filter_pairs(pairs);
        let filters = validator::resolve_filters(raw_filters, config)?;

        let mut params = QueryParams {
            filters,
            ..Default::default()
        };
        for (key, value) in pairs {
            match key.as_str() {
                "sort" => params.sort.extend(split_csv(value)),
                "include" => params.include.extend(split_csv(value)),
                "fields" => params.fields.extend(split_csv(value)),
                _ => {}
            }
        }
        Ok(params)
    }
}

/// Comma-split, trim, drop empties
fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_value_as_list_coerces_scalar() {
        assert_eq!(FilterValue::from("x").as_list(), vec!["x".to_string()]);
        assert_eq!(
            FilterValue::Many(vec!["a".into(), "b".into()]).as_list(),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn test_from_query_permissive() {
        let params =
            QueryParams::from_query("filter[name]=John&sort=-created_at,name&fields=id,name", None)
                .unwrap();

        assert_eq!(params.filters.len(), 1);
        assert_eq!(params.filters[0].field, "name");
        assert_eq!(params.filters[0].operator, FilterOperator::Eq);
        assert_eq!(params.sort, vec!["-created_at", "name"]);
        assert_eq!(params.fields, vec!["id", "name"]);
        assert!(params.include.is_empty());
    }

    #[test]
    fn test_from_query_accumulates_repeated_directives() {
        let params = QueryParams::from_query("include=a&include=b,c", None).unwrap();
        assert_eq!(params.include, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_split_csv_trims_and_drops_empties() {
        assert_eq!(split_csv(" a, ,b ,"), vec!["a", "b"]);
    }
}
