//! Integration tests for the full query pipeline: query string → parser →
//! validator → builder → statement → in-memory execution.

mod harness;

use harness::*;

use crud_kit::prelude::*;

fn build(query: &str, config: Option<&QueryBuilderConfig>) -> SelectStatement {
    let params = QueryParams::from_query(query, config).expect("query should resolve");
    match config {
        Some(cfg) => {
            QueryBuilder::<Category>::with_config(std::sync::Arc::new(cfg.clone())).apply(&params)
        }
        None => QueryBuilder::<Category>::new().apply(&params),
    }
}

fn run(query: &str, config: Option<&QueryBuilderConfig>) -> Vec<Category> {
    let store = seeded_store();
    let statement = build(query, config);
    BlockingSession::execute(&store, &statement).expect("execution should succeed")
}

#[test]
fn end_to_end_catalog_scenario() {
    // name equals "Tech" AND description icontains "innov",
    // ordered by created_at descending
    let config = catalog_config();
    let rows = run(
        "filter[name]=Tech&filter[description][icontains]=innov&sort=-created_at",
        Some(&config),
    );

    assert_eq!(ids(&rows), vec![2, 1]);
}

#[test]
fn permissive_mode_passes_arbitrary_fields_through() {
    let rows = run("filter[name]=Food&filter[nonexistent]=whatever", None);
    // the unknown column predicate is skipped by the builder
    assert_eq!(ids(&rows), vec![3]);
}

#[test]
fn repeated_keys_upgrade_to_membership() {
    let rows = run("filter[id]=1&filter[id]=3", None);
    assert_eq!(ids(&rows), vec![1, 3]);
}

#[test]
fn comma_separated_in_values_explode() {
    let rows = run("filter[id][in]=1,%202,3", None);
    assert_eq!(ids(&rows), vec![1, 2, 3]);
}

#[test]
fn nin_excludes_listed_ids() {
    let rows = run("filter[id][nin]=1,2,3", None);
    assert_eq!(ids(&rows), vec![4, 5]);
}

#[test]
fn range_filtering_on_dates() {
    let config = catalog_config();
    let rows = run(
        "filter[created_at][gte]=2024-06-03&sort=created_at",
        Some(&config),
    );
    assert_eq!(ids(&rows), vec![2, 5, 4]);
}

#[test]
fn default_operator_comes_from_policy() {
    let config = catalog_config();
    // `created_at` defaults to gte per the policy
    let rows = run("filter[created_at]=2024-06-04&sort=created_at", Some(&config));
    assert_eq!(ids(&rows), vec![5, 4]);
}

#[test]
fn null_check_filters() {
    let store = seeded_store();
    let mut archived = category(6, "Archive", "old", 1);
    archived.archived_at = Some(day(2));
    BlockingSession::add(&store, &archived).unwrap();

    let statement = build("filter[archived_at][is_not_null]=true", None);
    let rows = BlockingSession::execute(&store, &statement).unwrap();
    assert_eq!(ids(&rows), vec![6]);

    let statement = build("filter[archived_at][is_null]=true", None);
    let rows = BlockingSession::execute(&store, &statement).unwrap();
    assert_eq!(rows.len(), 5);
}

#[test]
fn policy_rejects_unknown_filter() {
    let config = catalog_config();
    let err = QueryParams::from_query("filter[rating]=5", Some(&config)).unwrap_err();
    match err {
        QueryError::FilterNotAllowed { filter, allowed } => {
            assert_eq!(filter, "rating");
            assert_eq!(allowed, vec!["name", "description", "created_at"]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn policy_rejects_disallowed_operator() {
    let config = catalog_config();
    let err = QueryParams::from_query("filter[name][gt]=Tech", Some(&config)).unwrap_err();
    match err {
        QueryError::OperatorNotAllowed {
            filter, operator, ..
        } => {
            assert_eq!(filter, "name");
            assert_eq!(operator, "gt");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn ignore_invalid_filters_drops_instead_of_raising() {
    let config = catalog_config().ignore_invalid_filters(true);
    let rows = run("filter[rating]=5&filter[name]=Food", Some(&config));
    assert_eq!(ids(&rows), vec![3]);
}

#[test]
fn non_filter_keys_are_inert() {
    let params =
        QueryParams::from_query("page=3&limit=10&search=abc&filter(name)=x", None).unwrap();
    assert!(params.filters.is_empty());
}

#[test]
fn fields_and_includes_reach_the_statement() {
    let statement = build("fields=id,name,ghost&include=articles,ghost", None);
    assert_eq!(
        statement.projection(),
        Some(&["id".to_string(), "name".to_string()][..])
    );
    assert_eq!(statement.includes(), &["articles".to_string()]);
}

#[test]
fn builder_output_is_deterministic() {
    let config = catalog_config();
    let query = "filter[name]=Tech&filter[description][icontains]=innov&sort=-created_at,name";

    let first = build(query, Some(&config));
    let second = build(query, Some(&config));
    assert_eq!(first, second);

    let store = seeded_store();
    let rows_a = BlockingSession::execute(&store, &first).unwrap();
    let rows_b = BlockingSession::execute(&store, &second).unwrap();
    assert_eq!(rows_a, rows_b);
}

#[test]
fn resolution_is_idempotent_across_calls() {
    let config = catalog_config();
    let query = "filter[description][icontains]=innov&filter[name]=Tech";

    let first = QueryParams::from_query(query, Some(&config)).unwrap();
    let second = QueryParams::from_query(query, Some(&config)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn custom_callback_replaces_standard_mapping() {
    // expose "top" as a filter that ignores its operator entirely and
    // filters on a minimum rating instead
    let config = QueryBuilderConfig::new([AllowedFilter::exact("rating")
        .with_alias("top")
        .with_callback(|statement, value| {
            let minimum = value.as_scalar().unwrap_or_default();
            statement.filter(
                FilterOperator::Gte
                    .predicate("rating", &FilterValue::Single(minimum))
                    .expect("scalar predicate"),
            )
        })]);

    let rows = run("filter[top]=4", Some(&config));
    assert_eq!(ids(&rows), vec![4, 5]);
}

#[test]
fn sort_applies_in_token_order() {
    let rows = run("sort=name,-id", None);
    let names: Vec<&str> = rows.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Food", "Science", "Tech", "Tech", "Travel"]);
    // within the Tech pair, descending id
    assert_eq!(ids(&rows), vec![3, 5, 2, 1, 4]);
}
