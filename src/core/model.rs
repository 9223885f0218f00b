//! Model trait defining the entity metadata contract for the query pipeline
//!
//! The query builder and CRUD layer never see concrete database tables. They
//! work against this trait: column lookup for filters/sort/projection,
//! relationship lookup for eager-load includes, primary-key discovery for
//! get/update/delete, and serde-powered construction for create/update
//! payloads.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::core::field::FieldValue;

/// Entity metadata contract.
///
/// Implement this for every type exposed through the CRUD layer, or use the
/// [`impl_model!`](crate::impl_model) macro to generate the implementation.
///
/// # Example
/// ```rust,ignore
/// impl Model for Category {
///     fn entity_name() -> &'static str { "category" }
///     fn entity_name_plural() -> &'static str { "categories" }
///     fn columns() -> &'static [&'static str] {
///         &["id", "name", "description", "created_at"]
///     }
///     fn field_value(&self, field: &str) -> Option<FieldValue> { ... }
/// }
/// ```
pub trait Model:
    Clone + Send + Sync + Serialize + serde::de::DeserializeOwned + 'static
{
    /// The singular entity name, used in error messages (e.g., "category")
    fn entity_name() -> &'static str;

    /// The plural resource name, used in URLs (e.g., "categories")
    fn entity_name_plural() -> &'static str;

    /// All filterable/sortable/projectable column names
    fn columns() -> &'static [&'static str];

    /// Relation names that may be eager-loaded via `include=`
    fn relationships() -> &'static [&'static str] {
        &[]
    }

    /// The primary-key column.
    ///
    /// Defaults to the first of `id`, `uuid` present in [`columns`](Model::columns);
    /// override when the model declares a different key.
    fn primary_key() -> &'static str {
        if Self::columns().contains(&"id") {
            "id"
        } else if Self::columns().contains(&"uuid") {
            "uuid"
        } else {
            "id"
        }
    }

    /// Get the value of a specific column by name
    fn field_value(&self, field: &str) -> Option<FieldValue>;

    /// Get the primary-key value of this instance
    fn primary_key_value(&self) -> Option<FieldValue> {
        self.field_value(Self::primary_key())
    }

    /// Instantiate an entity from a mapping of attributes
    fn from_attributes(attrs: Map<String, Value>) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(attrs))
    }

    /// Produce a copy of this entity with the given attributes merged in.
    ///
    /// Only attributes that exist as columns on the model are applied;
    /// unknown keys are ignored.
    fn merge_attributes(&self, attrs: &Map<String, Value>) -> Result<Self, serde_json::Error> {
        let mut current = serde_json::to_value(self)?;
        if let Value::Object(obj) = &mut current {
            for (key, value) in attrs {
                if Self::columns().contains(&key.as_str()) {
                    obj.insert(key.clone(), value.clone());
                }
            }
        }
        serde_json::from_value(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Widget {
        id: i64,
        name: String,
        stock: i64,
    }

    impl Model for Widget {
        fn entity_name() -> &'static str {
            "widget"
        }

        fn entity_name_plural() -> &'static str {
            "widgets"
        }

        fn columns() -> &'static [&'static str] {
            &["id", "name", "stock"]
        }

        fn field_value(&self, field: &str) -> Option<FieldValue> {
            match field {
                "id" => Some(self.id.into()),
                "name" => Some(self.name.clone().into()),
                "stock" => Some(self.stock.into()),
                _ => None,
            }
        }
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    struct Keyed {
        uuid: String,
        label: String,
    }

    impl Model for Keyed {
        fn entity_name() -> &'static str {
            "keyed"
        }

        fn entity_name_plural() -> &'static str {
            "keyeds"
        }

        fn columns() -> &'static [&'static str] {
            &["uuid", "label"]
        }

        fn field_value(&self, field: &str) -> Option<FieldValue> {
            match field {
                "uuid" => Some(self.uuid.clone().into()),
                "label" => Some(self.label.clone().into()),
                _ => None,
            }
        }
    }

    #[test]
    fn test_primary_key_conventions() {
        assert_eq!(Widget::primary_key(), "id");
        assert_eq!(Keyed::primary_key(), "uuid");
    }

    #[test]
    fn test_from_attributes() {
        let mut attrs = Map::new();
        attrs.insert("id".to_string(), serde_json::json!(1));
        attrs.insert("name".to_string(), serde_json::json!("bolt"));
        attrs.insert("stock".to_string(), serde_json::json!(12));

        let widget = Widget::from_attributes(attrs).unwrap();
        assert_eq!(widget.name, "bolt");
        assert_eq!(widget.primary_key_value(), Some(FieldValue::Integer(1)));
    }

    #[test]
    fn test_from_attributes_invalid_payload() {
        let mut attrs = Map::new();
        attrs.insert("id".to_string(), serde_json::json!("not-a-number"));

        assert!(Widget::from_attributes(attrs).is_err());
    }

    #[test]
    fn test_merge_attributes_skips_unknown_keys() {
        let widget = Widget {
            id: 1,
            name: "bolt".to_string(),
            stock: 12,
        };

        let mut attrs = Map::new();
        attrs.insert("stock".to_string(), serde_json::json!(5));
        attrs.insert("nonexistent".to_string(), serde_json::json!("x"));

        let merged = widget.merge_attributes(&attrs).unwrap();
        assert_eq!(merged.stock, 5);
        assert_eq!(merged.name, "bolt");
    }
}
