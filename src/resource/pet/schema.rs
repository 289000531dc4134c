//! Schema of the `random_pet` resource

use tfvalue::{Attribute, AttributeType, NestedObject, ObjectSchema, Schema};

/// Registered type name
pub const TYPE_NAME: &str = "random_pet";

/// Version new state is written with
///
/// - 0: a top-level `prefix` string
/// - 1: a single `component` object
/// - 2: a `components` list
pub const SCHEMA_VERSION: i64 = 2;

/// Words used when `length` is absent or unusable
pub const DEFAULT_LENGTH: u32 = 3;

/// Separator used when `separator` is absent or empty
pub const DEFAULT_SEPARATOR: &str = "-";

/// Separator between the generated words themselves
pub const WORD_SEPARATOR: &str = "-";

pub fn schema() -> Schema {
    Schema::new(
        SCHEMA_VERSION,
        ObjectSchema::new(vec![
            Attribute::computed("id", AttributeType::String)
                .with_description("The generated name, prefixes included"),
            Attribute::optional_computed("length", AttributeType::Number)
                .with_description("Number of words in the generated name"),
            Attribute::optional_computed("separator", AttributeType::String)
                .with_description("Joins each prefix to the rest of the name"),
            Attribute::optional(
                "components",
                AttributeType::Nested(NestedObject::list(component_schema())),
            )
            .with_description("Prefixes applied outermost first"),
        ]),
    )
}

fn component_schema() -> ObjectSchema {
    ObjectSchema::new(vec![
        Attribute::optional("prefix", AttributeType::String),
        Attribute::optional("secret", AttributeType::String).sensitive(),
        Attribute::optional_computed("computed", AttributeType::String)
            .with_description("The name from this component inward"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tfvalue::Type;

    #[test]
    fn test_schema_is_valid() {
        let schema = schema();
        assert!(schema.validate().is_ok());
        assert_eq!(schema.version, SCHEMA_VERSION);
    }

    #[test]
    fn test_value_type() {
        let component = Type::object([
            ("computed", Type::String),
            ("prefix", Type::String),
            ("secret", Type::String),
        ]);
        let expected = Type::object([
            ("components", Type::list(component)),
            ("id", Type::String),
            ("length", Type::Number),
            ("separator", Type::String),
        ]);
        assert_eq!(schema().value_type(), expected);
    }

    #[test]
    fn test_only_secret_is_sensitive() {
        let schema = schema();
        let Some(AttributeType::Nested(nested)) =
            schema.object.attribute("components").map(|a| &a.ty)
        else {
            panic!("components should be nested");
        };
        let sensitive: Vec<&str> = nested
            .object
            .attributes
            .iter()
            .filter(|a| a.sensitive)
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(sensitive, vec!["secret"]);
    }
}
