//! Macros for reducing boilerplate when implementing the Model trait
//!
//! Writing `columns()` and `field_value()` by hand for every entity is
//! mechanical; this macro generates both from a single field list.

/// Implement [`Model`](crate::core::model::Model) for an existing struct.
///
/// Every listed field must convert into a
/// [`FieldValue`](crate::core::field::FieldValue) via `Into` (`String`,
/// `i64`, `f64`, `bool`, `Uuid`, `DateTime<Utc>`, and `Option`s thereof).
///
/// # Example
/// ```rust,ignore
/// #[derive(Clone, Debug, Serialize, Deserialize)]
/// struct Category {
///     id: i64,
///     name: String,
///     description: String,
///     created_at: DateTime<Utc>,
/// }
///
/// impl_model!(Category, "category", "categories",
///     relationships: ["articles"],
///     fields: [id, name, description, created_at],
/// );
/// ```
#[macro_export]
macro_rules! impl_model {
    (
        $type:ident, $singular:literal, $plural:literal,
        relationships: [$($rel:literal),* $(,)?],
        fields: [$($field:ident),+ $(,)?] $(,)?
    ) => {
        impl $crate::core::model::Model for $type {
            fn entity_name() -> &'static str {
                $singular
            }

            fn entity_name_plural() -> &'static str {
                $plural
            }

            fn columns() -> &'static [&'static str] {
                &[$(stringify!($field)),+]
            }

            fn relationships() -> &'static [&'static str] {
                &[$($rel),*]
            }

            fn field_value(&self, field: &str) -> Option<$crate::core::field::FieldValue> {
                match field {
                    $(stringify!($field) => Some(self.$field.clone().into()),)+
                    _ => None,
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::field::FieldValue;
    use crate::core::model::Model;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, Serialize, Deserialize)]
    struct Gadget {
        id: i64,
        label: String,
        price: f64,
        retired_at: Option<chrono::DateTime<chrono::Utc>>,
    }

    impl_model!(Gadget, "gadget", "gadgets",
        relationships: ["parts"],
        fields: [id, label, price, retired_at],
    );

    #[test]
    fn test_generated_metadata() {
        assert_eq!(Gadget::entity_name(), "gadget");
        assert_eq!(Gadget::entity_name_plural(), "gadgets");
        assert_eq!(Gadget::columns(), &["id", "label", "price", "retired_at"]);
        assert_eq!(Gadget::relationships(), &["parts"]);
        assert_eq!(Gadget::primary_key(), "id");
    }

    #[test]
    fn test_generated_field_value() {
        let gadget = Gadget {
            id: 7,
            label: "widget".to_string(),
            price: 9.5,
            retired_at: None,
        };

        assert_eq!(gadget.field_value("id"), Some(FieldValue::Integer(7)));
        assert_eq!(gadget.field_value("price"), Some(FieldValue::Float(9.5)));
        assert_eq!(gadget.field_value("retired_at"), Some(FieldValue::Null));
        assert_eq!(gadget.field_value("unknown"), None);
    }
}
