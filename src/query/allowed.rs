//! Allowed-filter configuration
//!
//! [`AllowedFilter`] declares how one exposed filter behaves: the default
//! operator applied when the URL names none, the set of operators a client
//! may request, an optional public alias, and an optional callback that
//! replaces standard predicate construction entirely.

use std::fmt;
use std::sync::Arc;

use crate::core::error::ConfigError;
use crate::query::operator::FilterOperator;
use crate::query::params::FilterValue;
use crate::query::statement::SelectStatement;

/// Custom per-filter query transform, invoked in place of the standard
/// operator-to-predicate mapping
pub type FilterCallback =
    Arc<dyn Fn(SelectStatement, &FilterValue) -> SelectStatement + Send + Sync>;

/// Declaration of a single allowed filter.
///
/// Constructing a declaration whose default operator is missing from the
/// allowed set fails immediately with a [`ConfigError`] — misconfiguration
/// surfaces at startup, not on the first matching request.
///
/// # Examples
/// ```rust,ignore
/// // exact matching on an enum-ish column
/// AllowedFilter::exact("status")
/// // partial matching with a public alias
/// AllowedFilter::partial("description").with_alias("text")
/// // explicit operator set for a date column
/// AllowedFilter::operator("created_at", FilterOperator::Gte,
///     vec![FilterOperator::Gte, FilterOperator::Lte])?
/// ```
#[derive(Clone)]
pub struct AllowedFilter {
    field: String,
    alias: String,
    default_operator: FilterOperator,
    allowed_operators: Vec<FilterOperator>,
    callback: Option<FilterCallback>,
}

impl AllowedFilter {
    /// Declare a filter with an explicit default operator and allowed set.
    ///
    /// An empty `allowed_operators` list means only the default is allowed.
    pub fn new(
        field: impl Into<String>,
        default_operator: FilterOperator,
        allowed_operators: Vec<FilterOperator>,
    ) -> Result<Self, ConfigError> {
        let field = field.into();
        let allowed_operators = if allowed_operators.is_empty() {
            vec![default_operator]
        } else {
            allowed_operators
        };

        if !allowed_operators.contains(&default_operator) {
            return Err(ConfigError::DefaultOperatorNotAllowed {
                field,
                default: default_operator.to_string(),
                allowed: allowed_operators.iter().map(|op| op.to_string()).collect(),
            });
        }

        Ok(Self {
            alias: field.clone(),
            field,
            default_operator,
            allowed_operators,
            callback: None,
        })
    }

    /// Exact-match filter: default `eq`, allowing `eq`, `ne`, `in`, `nin`.
    ///
    /// Suited to ids, enums and anything requiring whole-value matches.
    pub fn exact(field: impl Into<String>) -> Self {
        Self::preset(
            field,
            FilterOperator::Eq,
            vec![
                FilterOperator::Eq,
                FilterOperator::Ne,
                FilterOperator::In,
                FilterOperator::Nin,
            ],
        )
    }

    /// Partial-match filter: default `icontains`, allowing the full set of
    /// pattern operators plus `eq`
    pub fn partial(field: impl Into<String>) -> Self {
        Self::preset(
            field,
            FilterOperator::Icontains,
            vec![
                FilterOperator::Icontains,
                FilterOperator::Contains,
                FilterOperator::StartsWith,
                FilterOperator::IstartsWith,
                FilterOperator::EndsWith,
                FilterOperator::IendsWith,
                FilterOperator::Eq,
            ],
        )
    }

    /// Anchored prefix filter: default `istarts_with`
    pub fn begins_with(field: impl Into<String>) -> Self {
        Self::preset(
            field,
            FilterOperator::IstartsWith,
            vec![
                FilterOperator::IstartsWith,
                FilterOperator::StartsWith,
                FilterOperator::Icontains,
                FilterOperator::Contains,
                FilterOperator::Eq,
            ],
        )
    }

    /// Anchored suffix filter: default `iends_with`
    pub fn ends_with(field: impl Into<String>) -> Self {
        Self::preset(
            field,
            FilterOperator::IendsWith,
            vec![
                FilterOperator::IendsWith,
                FilterOperator::EndsWith,
                FilterOperator::Icontains,
                FilterOperator::Contains,
                FilterOperator::Eq,
            ],
        )
    }

    /// Fully explicit escape hatch, same contract as [`new`](Self::new)
    pub fn operator(
        field: impl Into<String>,
        default_operator: FilterOperator,
        allowed_operators: Vec<FilterOperator>,
    ) -> Result<Self, ConfigError> {
        Self::new(field, default_operator, allowed_operators)
    }

    // Preset defaults always contain their default operator
    fn preset(
        field: impl Into<String>,
        default_operator: FilterOperator,
        allowed_operators: Vec<FilterOperator>,
    ) -> Self {
        let field = field.into();
        Self {
            alias: field.clone(),
            field,
            default_operator,
            allowed_operators,
            callback: None,
        }
    }

    /// Set the public-facing alias exposed in the query string
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    /// Replace the allowed operator set, re-checking the default
    pub fn with_operators(
        self,
        allowed_operators: Vec<FilterOperator>,
    ) -> Result<Self, ConfigError> {
        let mut rebuilt = Self::new(self.field, self.default_operator, allowed_operators)?;
        rebuilt.alias = self.alias;
        rebuilt.callback = self.callback;
        Ok(rebuilt)
    }

    /// Attach a custom query transform, invoked instead of the standard
    /// operator mapping when this filter is applied
    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(SelectStatement, &FilterValue) -> SelectStatement + Send + Sync + 'static,
    {
        self.callback = Some(Arc::new(callback));
        self
    }

    /// The underlying column name
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The public filter name (defaults to the field name)
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// The operator substituted when the URL names none
    pub fn default_operator(&self) -> FilterOperator {
        self.default_operator
    }

    /// The permitted operators
    pub fn allowed_operators(&self) -> &[FilterOperator] {
        &self.allowed_operators
    }

    /// The permitted operator tokens, for error messages
    pub fn allowed_operator_tokens(&self) -> Vec<String> {
        self.allowed_operators
            .iter()
            .map(|op| op.to_string())
            .collect()
    }

    /// Check whether an operator may be requested for this filter
    pub fn is_operator_allowed(&self, operator: FilterOperator) -> bool {
        self.allowed_operators.contains(&operator)
    }

    /// The custom query transform, if any
    pub fn callback(&self) -> Option<&FilterCallback> {
        self.callback.as_ref()
    }
}

impl fmt::Debug for AllowedFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AllowedFilter")
            .field("field", &self.field)
            .field("alias", &self.alias)
            .field("default_operator", &self.default_operator)
            .field("allowed_operators", &self.allowed_operators)
            .field("callback", &self.callback.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Structural equality over field, alias, default operator and the allowed
/// set (order-insensitive); callbacks are not comparable and are ignored
impl PartialEq for AllowedFilter {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field
            && self.alias == other.alias
            && self.default_operator == other.default_operator
            && self.allowed_operators.len() == other.allowed_operators.len()
            && self
                .allowed_operators
                .iter()
                .all(|op| other.allowed_operators.contains(op))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_must_be_allowed() {
        let err = AllowedFilter::new(
            "x",
            FilterOperator::Lt,
            vec![FilterOperator::Gt],
        )
        .unwrap_err();

        match err {
            ConfigError::DefaultOperatorNotAllowed { field, default, .. } => {
                assert_eq!(field, "x");
                assert_eq!(default, "lt");
            }
        }
    }

    #[test]
    fn test_empty_allowed_set_defaults_to_default() {
        let filter = AllowedFilter::new("age", FilterOperator::Gte, vec![]).unwrap();
        assert_eq!(filter.allowed_operators(), &[FilterOperator::Gte]);
        assert!(filter.is_operator_allowed(FilterOperator::Gte));
        assert!(!filter.is_operator_allowed(FilterOperator::Eq));
    }

    #[test]
    fn test_exact_preset() {
        let filter = AllowedFilter::exact("status");
        assert_eq!(filter.default_operator(), FilterOperator::Eq);
        assert!(filter.is_operator_allowed(FilterOperator::In));
        assert!(filter.is_operator_allowed(FilterOperator::Nin));
        assert!(!filter.is_operator_allowed(FilterOperator::Gt));
        assert_eq!(filter.alias(), "status");
    }

    #[test]
    fn test_partial_preset() {
        let filter = AllowedFilter::partial("description");
        assert_eq!(filter.default_operator(), FilterOperator::Icontains);
        assert!(filter.is_operator_allowed(FilterOperator::Eq));
        assert!(!filter.is_operator_allowed(FilterOperator::In));
    }

    #[test]
    fn test_anchored_presets() {
        assert_eq!(
            AllowedFilter::begins_with("code").default_operator(),
            FilterOperator::IstartsWith
        );
        assert_eq!(
            AllowedFilter::ends_with("domain").default_operator(),
            FilterOperator::IendsWith
        );
    }

    #[test]
    fn test_with_alias() {
        let filter = AllowedFilter::exact("user_passport_full_name").with_alias("name");
        assert_eq!(filter.field(), "user_passport_full_name");
        assert_eq!(filter.alias(), "name");
    }

    #[test]
    fn test_with_operators_revalidates() {
        let result = AllowedFilter::exact("status").with_operators(vec![FilterOperator::Gt]);
        assert!(result.is_err());
    }

    #[test]
    fn test_structural_equality_ignores_operator_order() {
        let a = AllowedFilter::new(
            "age",
            FilterOperator::Gte,
            vec![FilterOperator::Gte, FilterOperator::Lte],
        )
        .unwrap();
        let b = AllowedFilter::new(
            "age",
            FilterOperator::Gte,
            vec![FilterOperator::Lte, FilterOperator::Gte],
        )
        .unwrap();
        assert_eq!(a, b);

        let c = b.with_alias("years");
        assert_ne!(a, c);
    }

    #[test]
    fn test_callback_excluded_from_equality() {
        let plain = AllowedFilter::exact("status");
        let with_cb = AllowedFilter::exact("status").with_callback(|stmt, _| stmt);
        assert_eq!(plain, with_cb);
        assert!(with_cb.callback().is_some());
    }
}
