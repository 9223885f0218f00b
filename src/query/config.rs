//! Configuration for query parsing and building
//!
//! [`QueryBuilderConfig`] owns the allow-list for one exposed resource. The
//! alias and field lookup maps are built once here, at configuration time,
//! so per-request resolution is a pair of map probes.

use indexmap::IndexMap;

use crate::query::allowed::AllowedFilter;

/// Allow-list policy plus resolution behavior for one resource.
///
/// Registered once at startup and shared read-only across requests.
#[derive(Debug, Clone, Default)]
pub struct QueryBuilderConfig {
    by_alias: IndexMap<String, AllowedFilter>,
    by_field: IndexMap<String, AllowedFilter>,
    ignore_invalid: bool,
}

impl QueryBuilderConfig {
    /// Build the dual lookup maps from filter declarations.
    ///
    /// A later declaration with the same alias or field overrides an
    /// earlier one.
    pub fn new(filters: impl IntoIterator<Item = AllowedFilter>) -> Self {
        let mut by_alias = IndexMap::new();
        let mut by_field = IndexMap::new();
        for filter in filters {
            by_alias.insert(filter.alias().to_string(), filter.clone());
            by_field.insert(filter.field().to_string(), filter);
        }
        Self {
            by_alias,
            by_field,
            ignore_invalid: false,
        }
    }

    /// Silently drop unresolvable filters instead of raising
    pub fn ignore_invalid_filters(mut self, ignore: bool) -> Self {
        self.ignore_invalid = ignore;
        self
    }

    /// Whether unresolvable filters drop silently
    pub fn should_ignore_invalid(&self) -> bool {
        self.ignore_invalid
    }

    /// Resolve a requested name: alias map first, then field map
    pub fn resolve(&self, alias_or_field: &str) -> Option<&AllowedFilter> {
        self.by_alias
            .get(alias_or_field)
            .or_else(|| self.by_field.get(alias_or_field))
    }

    /// All public filter names, for "filter not allowed" errors
    pub fn allowed_aliases(&self) -> Vec<String> {
        self.by_alias.keys().cloned().collect()
    }

    /// True when no filters are declared (permissive mode applies)
    pub fn is_empty(&self) -> bool {
        self.by_alias.is_empty()
    }
}
