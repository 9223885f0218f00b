//! Query builder
//!
//! Composes a [`SelectStatement`] for an entity type from resolved
//! [`QueryParams`], applying filters, sort, field projection and relation
//! includes — in that fixed order.
//!
//! Building is purely compositional and never raises: unknown fields,
//! operators with mismatched value shapes, and unknown relations are
//! skipped. Under policy mode the validator has already rejected anything
//! illegitimate; permissive mode deliberately lets arbitrary names flow
//! through, and the skips here are the defense-in-depth backstop.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::core::model::Model;
use crate::query::config::QueryBuilderConfig;
use crate::query::params::{Filter, QueryParams};
use crate::query::statement::{SelectStatement, SortOrder};

/// Incrementally builds a select statement for the entity type `M`
pub struct QueryBuilder<M: Model> {
    config: Option<Arc<QueryBuilderConfig>>,
    statement: SelectStatement,
    _model: PhantomData<M>,
}

impl<M: Model> Default for QueryBuilder<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Model> QueryBuilder<M> {
    pub fn new() -> Self {
        Self {
            config: None,
            statement: SelectStatement::new(),
            _model: PhantomData,
        }
    }

    /// Build with a config so per-filter callbacks can be looked up
    pub fn with_config(config: Arc<QueryBuilderConfig>) -> Self {
        Self {
            config: Some(config),
            statement: SelectStatement::new(),
            _model: PhantomData,
        }
    }

    /// Apply filter conditions.
    ///
    /// A filter whose declaration carries a callback hands the statement to
    /// the callback and skips the standard operator mapping entirely.
    pub fn apply_filters(mut self, filters: &[Filter]) -> Self {
        let mut statement = self.statement;

        for filter in filters {
            let declaration = self
                .config
                .as_ref()
                .and_then(|config| config.resolve(&filter.field));
            if let Some(callback) = declaration.and_then(|d| d.callback()) {
                statement = callback(statement, &filter.value);
                continue;
            }

            if !M::columns().contains(&filter.field.as_str()) {
                tracing::debug!(field = %filter.field, "skipping filter on unknown column");
                continue;
            }

            match filter.operator.predicate(&filter.field, &filter.value) {
                Some(predicate) => statement = statement.filter(predicate),
                None => {
                    tracing::debug!(
                        field = %filter.field,
                        operator = %filter.operator,
                        "skipping filter with mismatched value shape"
                    );
                }
            }
        }

        self.statement = statement;
        self
    }

    /// Apply sort directives; `-` prefix means descending
    pub fn apply_sort(mut self, sort: &[String]) -> Self {
        let mut statement = self.statement;

        for token in sort {
            let (field, order) = match token.strip_prefix('-') {
                Some(rest) => (rest, SortOrder::Desc),
                None => (token.as_str(), SortOrder::Asc),
            };
            if !M::columns().contains(&field) {
                tracing::debug!(field = %field, "skipping sort on unknown column");
                continue;
            }
            statement = statement.order_by(field, order);
        }

        self.statement = statement;
        self
    }

    /// Restrict the projection to the requested columns that exist on the
    /// model; an empty request leaves the full entity selected
    pub fn apply_fields(mut self, fields: &[String]) -> Self {
        if fields.is_empty() {
            return self;
        }

        let columns: Vec<String> = fields
            .iter()
            .filter(|f| M::columns().contains(&f.as_str()))
            .cloned()
            .collect();
        if !columns.is_empty() {
            self.statement = self.statement.with_columns(columns);
        }
        self
    }

    /// Attach eager-load directives for relations the model declares
    pub fn apply_includes(mut self, includes: &[String]) -> Self {
        let mut statement = self.statement;

        for relation in includes {
            if !M::relationships().contains(&relation.as_str()) {
                tracing::debug!(relation = %relation, "skipping unknown relation include");
                continue;
            }
            statement = statement.include(relation.clone());
        }

        self.statement = statement;
        self
    }

    /// Apply everything in the fixed order and return the statement
    pub fn apply(self, params: &QueryParams) -> SelectStatement {
        self.apply_filters(&params.filters)
            .apply_sort(&params.sort)
            .apply_fields(&params.fields)
            .apply_includes(&params.include)
            .statement
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::allowed::AllowedFilter;
    use crate::query::operator::FilterOperator;
    use crate::query::params::FilterValue;
    use crate::query::statement::{Comparison, Predicate};
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, Serialize, Deserialize)]
    struct Article {
        id: i64,
        title: String,
        views: i64,
    }

    crate::impl_model!(Article, "article", "articles",
        relationships: ["author", "comments"],
        fields: [id, title, views],
    );

    fn filter(field: &str, operator: FilterOperator, value: &str) -> Filter {
        Filter::new(field, operator, value)
    }

    #[test]
    fn test_apply_filters_builds_predicates() {
        let stmt = QueryBuilder::<Article>::new()
            .apply_filters(&[filter("title", FilterOperator::Eq, "Tech")])
            .apply(&QueryParams::default());

        assert_eq!(
            stmt.predicates(),
            &[Predicate::Compare {
                column: "title".to_string(),
                cmp: Comparison::Eq,
                value: "Tech".to_string(),
            }]
        );
    }

    #[test]
    fn test_unknown_field_skipped_silently() {
        let stmt = QueryBuilder::<Article>::new()
            .apply_filters(&[filter("ghost", FilterOperator::Eq, "x")])
            .apply(&QueryParams::default());
        assert!(stmt.predicates().is_empty());
    }

    #[test]
    fn test_mismatched_value_shape_skipped_silently() {
        let filters = vec![Filter::new(
            "title",
            FilterOperator::Eq,
            FilterValue::Many(vec!["a".to_string(), "b".to_string()]),
        )];
        let stmt = QueryBuilder::<Article>::new()
            .apply_filters(&filters)
            .apply(&QueryParams::default());
        assert!(stmt.predicates().is_empty());
    }

    #[test]
    fn test_callback_bypasses_operator_map() {
        let config = Arc::new(QueryBuilderConfig::new([AllowedFilter::exact("views")
            .with_callback(|stmt, value| {
                let minimum = value.as_scalar().unwrap_or_default();
                stmt.filter(Predicate::Compare {
                    column: "views".to_string(),
                    cmp: Comparison::Gte,
                    value: minimum,
                })
            })]));

        let stmt = QueryBuilder::<Article>::with_config(config)
            .apply_filters(&[filter("views", FilterOperator::Eq, "100")])
            .apply(&QueryParams::default());

        assert_eq!(
            stmt.predicates(),
            &[Predicate::Compare {
                column: "views".to_string(),
                cmp: Comparison::Gte,
                value: "100".to_string(),
            }]
        );
    }

    #[test]
    fn test_sort_direction_and_unknown_skip() {
        let params = QueryParams {
            sort: vec!["-views".to_string(), "title".to_string(), "ghost".to_string()],
            ..Default::default()
        };
        let stmt = QueryBuilder::<Article>::new().apply(&params);

        assert_eq!(stmt.order().len(), 2);
        assert_eq!(stmt.order()[0].column, "views");
        assert_eq!(stmt.order()[0].order, SortOrder::Desc);
        assert_eq!(stmt.order()[1].column, "title");
        assert_eq!(stmt.order()[1].order, SortOrder::Asc);
    }

    #[test]
    fn test_fields_intersect_with_columns() {
        let params = QueryParams {
            fields: vec!["id".to_string(), "ghost".to_string()],
            ..Default::default()
        };
        let stmt = QueryBuilder::<Article>::new().apply(&params);
        assert_eq!(stmt.projection(), Some(&["id".to_string()][..]));
    }

    #[test]
    fn test_empty_fields_mean_full_entity() {
        let stmt = QueryBuilder::<Article>::new().apply(&QueryParams::default());
        assert_eq!(stmt.projection(), None);
    }

    #[test]
    fn test_includes_checked_against_relationships() {
        let params = QueryParams {
            include: vec!["author".to_string(), "ghost".to_string()],
            ..Default::default()
        };
        let stmt = QueryBuilder::<Article>::new().apply(&params);
        assert_eq!(stmt.includes(), &["author".to_string()]);
    }

    #[test]
    fn test_builder_is_deterministic() {
        let params = QueryParams {
            filters: vec![
                filter("views", FilterOperator::Gt, "10"),
                filter("title", FilterOperator::Icontains, "rust"),
            ],
            sort: vec!["-views".to_string()],
            include: vec!["author".to_string()],
            fields: vec!["id".to_string(), "title".to_string()],
        };

        let first = QueryBuilder::<Article>::new().apply(&params);
        let second = QueryBuilder::<Article>::new().apply(&params);
        assert_eq!(first, second);
    }
}
