//! Shared test harness for the query pipeline and CRUD integration tests
//!
//! Provides `Category`, a model whose fields span the `FieldValue`
//! variants, plus helpers for seeding an in-memory store with a known
//! catalog.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! mod harness;
//! use harness::*;
//! ```

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crud_kit::prelude::*;

/// A catalog category with fields covering string, integer, float, boolean,
/// datetime and nullable columns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub rating: f64,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub archived_at: Option<DateTime<Utc>>,
}

impl Model for Category {
    fn entity_name() -> &'static str {
        "category"
    }

    fn entity_name_plural() -> &'static str {
        "categories"
    }

    fn columns() -> &'static [&'static str] {
        &[
            "id",
            "name",
            "description",
            "rating",
            "published",
            "created_at",
            "archived_at",
        ]
    }

    fn relationships() -> &'static [&'static str] {
        &["articles"]
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "id" => Some(self.id.into()),
            "name" => Some(self.name.clone().into()),
            "description" => Some(self.description.clone().into()),
            "rating" => Some(self.rating.into()),
            "published" => Some(self.published.into()),
            "created_at" => Some(self.created_at.into()),
            "archived_at" => Some(self.archived_at.into()),
            _ => None,
        }
    }
}

/// Install a log subscriber once; run with `RUST_LOG=crud_kit=debug` to see
/// the builder's skip-path diagnostics
pub fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

pub fn day(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap()
}

pub fn category(id: i64, name: &str, description: &str, created_day: u32) -> Category {
    Category {
        id,
        name: name.to_string(),
        description: description.to_string(),
        rating: id as f64,
        published: id % 2 == 1,
        created_at: day(created_day),
        archived_at: None,
    }
}

/// Seed the catalog used across the integration suites:
///
/// | id | name    | description               | created    |
/// |----|---------|---------------------------|------------|
/// | 1  | Tech    | all about innovation      | 2024-06-01 |
/// | 2  | Tech    | innovations, daily        | 2024-06-03 |
/// | 3  | Food    | recipes and reviews       | 2024-06-02 |
/// | 4  | Travel  | innovative destinations   | 2024-06-05 |
/// | 5  | Science | peer-reviewed innovation  | 2024-06-04 |
pub fn seeded_store() -> InMemoryStore<Category> {
    init_tracing();
    InMemoryStore::seeded([
        category(1, "Tech", "all about innovation", 1),
        category(2, "Tech", "innovations, daily", 3),
        category(3, "Food", "recipes and reviews", 2),
        category(4, "Travel", "innovative destinations", 5),
        category(5, "Science", "peer-reviewed innovation", 4),
    ])
    .expect("seed rows have primary keys")
}

/// The allow-list policy from the catalog example: exact name matching,
/// partial description matching, range operators on the creation date.
pub fn catalog_config() -> QueryBuilderConfig {
    QueryBuilderConfig::new([
        AllowedFilter::exact("name"),
        AllowedFilter::partial("description"),
        AllowedFilter::operator(
            "created_at",
            FilterOperator::Gte,
            vec![
                FilterOperator::Gte,
                FilterOperator::Lte,
                FilterOperator::Gt,
                FilterOperator::Lt,
            ],
        )
        .expect("default operator is allowed"),
    ])
}

pub fn ids(rows: &[Category]) -> Vec<i64> {
    rows.iter().map(|c| c.id).collect()
}
