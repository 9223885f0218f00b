//! Operators supported for filtering
//!
//! Defines the operator tokens accepted in the `filter[field][op]=value`
//! query-string grammar.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::error::QueryError;

/// Supported filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Contains,
    Icontains,
    StartsWith,
    IstartsWith,
    EndsWith,
    IendsWith,
    In,
    Nin,
    IsNull,
    IsNotNull,
    Between,
    NotBetween,
}

impl FilterOperator {
    /// All operators, in declaration order
    pub const ALL: &'static [FilterOperator] = &[
        FilterOperator::Eq,
        FilterOperator::Ne,
        FilterOperator::Gt,
        FilterOperator::Gte,
        FilterOperator::Lt,
        FilterOperator::Lte,
        FilterOperator::Contains,
        FilterOperator::Icontains,
        FilterOperator::StartsWith,
        FilterOperator::IstartsWith,
        FilterOperator::EndsWith,
        FilterOperator::IendsWith,
        FilterOperator::In,
        FilterOperator::Nin,
        FilterOperator::IsNull,
        FilterOperator::IsNotNull,
        FilterOperator::Between,
        FilterOperator::NotBetween,
    ];

    /// The query-string token for this operator
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "eq",
            FilterOperator::Ne => "ne",
            FilterOperator::Gt => "gt",
            FilterOperator::Gte => "gte",
            FilterOperator::Lt => "lt",
            FilterOperator::Lte => "lte",
            FilterOperator::Contains => "contains",
            FilterOperator::Icontains => "icontains",
            FilterOperator::StartsWith => "starts_with",
            FilterOperator::IstartsWith => "istarts_with",
            FilterOperator::EndsWith => "ends_with",
            FilterOperator::IendsWith => "iends_with",
            FilterOperator::In => "in",
            FilterOperator::Nin => "nin",
            FilterOperator::IsNull => "is_null",
            FilterOperator::IsNotNull => "is_not_null",
            FilterOperator::Between => "between",
            FilterOperator::NotBetween => "not_between",
        }
    }

    /// All operator tokens as strings
    pub fn all_tokens() -> Vec<String> {
        Self::ALL.iter().map(|op| op.as_str().to_string()).collect()
    }

    /// Ordering comparison operators
    pub const fn comparison_operators() -> &'static [FilterOperator] {
        &[
            FilterOperator::Eq,
            FilterOperator::Ne,
            FilterOperator::Gt,
            FilterOperator::Gte,
            FilterOperator::Lt,
            FilterOperator::Lte,
        ]
    }

    /// Pattern-matching operators on text columns
    pub const fn string_operators() -> &'static [FilterOperator] {
        &[
            FilterOperator::Contains,
            FilterOperator::Icontains,
            FilterOperator::StartsWith,
            FilterOperator::IstartsWith,
            FilterOperator::EndsWith,
            FilterOperator::IendsWith,
        ]
    }

    /// Membership operators
    pub const fn list_operators() -> &'static [FilterOperator] {
        &[FilterOperator::In, FilterOperator::Nin]
    }

    /// Null-check operators
    pub const fn null_operators() -> &'static [FilterOperator] {
        &[FilterOperator::IsNull, FilterOperator::IsNotNull]
    }

    /// Range operators
    pub const fn range_operators() -> &'static [FilterOperator] {
        &[FilterOperator::Between, FilterOperator::NotBetween]
    }
}

impl Default for FilterOperator {
    /// The operator applied when a filter carries none: equality
    fn default() -> Self {
        FilterOperator::Eq
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FilterOperator {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|op| op.as_str() == s)
            .copied()
            .ok_or_else(|| QueryError::UnknownOperator {
                operator: s.to_string(),
                supported: Self::all_tokens(),
            })
    }
}
