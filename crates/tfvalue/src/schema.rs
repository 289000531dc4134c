//! Schema descriptors: attributes, nested objects and their flags
//!
//! A [`Schema`] is supplied once at startup and never mutated. Its
//! [`ObjectSchema::value_type`] is the type node every resource value is
//! decoded and encoded against.

use crate::error::SchemaError;
use crate::path::{AttributePath, PathStep};
use crate::value::{Type, Value};
use serde::Serialize;
use std::collections::HashSet;

/// Primitive or nested type of an attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
    Number,
    Nested(NestedObject),
}

/// How many object values a nested attribute holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NestingMode {
    /// At most one object value
    Single,
    /// Ordered sequence of object values
    List,
}

/// An object schema used as an attribute's type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NestedObject {
    pub mode: NestingMode,
    pub object: ObjectSchema,
    /// Only meaningful for `NestingMode::List`; zero means unconstrained
    #[serde(skip_serializing_if = "is_zero")]
    pub min_items: usize,
    #[serde(skip_serializing_if = "is_zero")]
    pub max_items: usize,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl NestedObject {
    pub fn single(object: ObjectSchema) -> Self {
        Self {
            mode: NestingMode::Single,
            object,
            min_items: 0,
            max_items: 0,
        }
    }

    pub fn list(object: ObjectSchema) -> Self {
        Self {
            mode: NestingMode::List,
            object,
            min_items: 0,
            max_items: 0,
        }
    }

    /// Constrain the number of list items
    pub fn with_items(mut self, min_items: usize, max_items: usize) -> Self {
        self.min_items = min_items;
        self.max_items = max_items;
        self
    }

    pub fn value_type(&self) -> Type {
        let object = self.object.value_type();
        match self.mode {
            NestingMode::Single => object,
            NestingMode::List => Type::list(object),
        }
    }
}

/// A single attribute declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: AttributeType,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    /// Only affects display by the caller, never typing
    pub sensitive: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl Attribute {
    fn with_flags(name: &str, ty: AttributeType, required: bool, optional: bool, computed: bool) -> Self {
        Self {
            name: name.to_string(),
            ty,
            required,
            optional,
            computed,
            sensitive: false,
            description: String::new(),
        }
    }

    /// Must be supplied by the caller
    pub fn required(name: &str, ty: AttributeType) -> Self {
        Self::with_flags(name, ty, true, false, false)
    }

    /// May be supplied by the caller, otherwise null
    pub fn optional(name: &str, ty: AttributeType) -> Self {
        Self::with_flags(name, ty, false, true, false)
    }

    /// Always filled by the system
    pub fn computed(name: &str, ty: AttributeType) -> Self {
        Self::with_flags(name, ty, false, false, true)
    }

    /// Supplied by the caller or filled by the system
    pub fn optional_computed(name: &str, ty: AttributeType) -> Self {
        Self::with_flags(name, ty, false, true, true)
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Computed and not settable by the caller
    pub fn is_computed_only(&self) -> bool {
        self.computed && !self.optional && !self.required
    }

    pub fn value_type(&self) -> Type {
        match &self.ty {
            AttributeType::String => Type::String,
            AttributeType::Number => Type::Number,
            AttributeType::Nested(nested) => nested.value_type(),
        }
    }

    fn has_valid_flags(&self) -> bool {
        matches!(
            (self.required, self.optional, self.computed),
            (true, false, false) | (false, true, false) | (false, false, true) | (false, true, true)
        )
    }
}

/// Ordered set of attributes describing one object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ObjectSchema {
    pub attributes: Vec<Attribute>,
}

/// A configuration problem found by [`ObjectSchema::check_config`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: AttributePath,
    pub summary: String,
    pub detail: String,
}

impl ObjectSchema {
    pub fn new(attributes: Vec<Attribute>) -> Self {
        Self { attributes }
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// The attribute `path` points at, looking through nested objects
    ///
    /// List indexes are skipped. `None` for the root or an undeclared path.
    pub fn attribute_at(&self, path: &AttributePath) -> Option<&Attribute> {
        let mut object = Some(self);
        let mut found = None;
        for step in path.steps() {
            if let PathStep::Attribute(name) = step {
                let attr = object?.attribute(name)?;
                object = match &attr.ty {
                    AttributeType::Nested(nested) => Some(&nested.object),
                    _ => None,
                };
                found = Some(attr);
            }
        }
        found
    }

    /// The object type node for values of this schema
    pub fn value_type(&self) -> Type {
        Type::object(
            self.attributes
                .iter()
                .map(|a| (a.name.clone(), a.value_type())),
        )
    }

    /// Check declaration invariants recursively
    pub fn validate(&self) -> Result<(), SchemaError> {
        self.validate_at(&AttributePath::root())
    }

    fn validate_at(&self, base: &AttributePath) -> Result<(), SchemaError> {
        let mut seen = HashSet::new();
        for attr in &self.attributes {
            if !is_valid_name(&attr.name) {
                return Err(SchemaError::InvalidName {
                    name: attr.name.clone(),
                });
            }
            let path = base.join_attribute(&attr.name);
            if !seen.insert(attr.name.as_str()) {
                return Err(SchemaError::DuplicateAttribute { path });
            }
            if !attr.has_valid_flags() {
                return Err(SchemaError::InvalidFlags { path });
            }
            if let AttributeType::Nested(nested) = &attr.ty {
                if nested.max_items > 0 && nested.min_items > nested.max_items {
                    return Err(SchemaError::InvalidItemBounds {
                        path,
                        min: nested.min_items,
                        max: nested.max_items,
                    });
                }
                nested.object.validate_at(&path)?;
            }
        }
        Ok(())
    }

    /// Check a decoded configuration against the attribute flags
    ///
    /// Reports required attributes left null, computed-only attributes
    /// set by the caller, and list nestings outside their item bounds.
    /// Unknown values are never reported; they may still become valid.
    pub fn check_config(&self, config: &Value) -> Vec<Violation> {
        let mut violations = Vec::new();
        self.check_at(config, &AttributePath::root(), &mut violations);
        violations
    }

    fn check_at(&self, value: &Value, base: &AttributePath, out: &mut Vec<Violation>) {
        let Some(attrs) = value.as_object() else {
            return;
        };
        for attr in &self.attributes {
            let path = base.join_attribute(&attr.name);
            let attr_value = attrs.get(&attr.name).unwrap_or(&Value::Null);

            if attr.required && attr_value.is_null() {
                out.push(Violation {
                    path: path.clone(),
                    summary: "Missing required argument".to_string(),
                    detail: format!("The argument \"{}\" is required, but no definition was found.", attr.name),
                });
            }
            if attr.is_computed_only() && attr_value.is_known() {
                out.push(Violation {
                    path: path.clone(),
                    summary: "Value for unconfigurable attribute".to_string(),
                    detail: format!("Can't configure a value for \"{}\": its value will be decided automatically.", attr.name),
                });
            }

            if let AttributeType::Nested(nested) = &attr.ty {
                match (nested.mode, attr_value) {
                    (NestingMode::Single, Value::Object(_)) => {
                        nested.object.check_at(attr_value, &path, out);
                    }
                    (NestingMode::List, Value::List(items)) => {
                        check_item_bounds(nested, items.len(), &path, out);
                        for (i, item) in items.iter().enumerate() {
                            nested.object.check_at(item, &path.join_index(i), out);
                        }
                    }
                    (NestingMode::List, Value::Null) => {
                        check_item_bounds(nested, 0, &path, out);
                    }
                    _ => {}
                }
            }
        }
    }
}

fn check_item_bounds(nested: &NestedObject, count: usize, path: &AttributePath, out: &mut Vec<Violation>) {
    if count < nested.min_items {
        out.push(Violation {
            path: path.clone(),
            summary: "Insufficient items".to_string(),
            detail: format!("At least {} item(s) are required, but {count} were given.", nested.min_items),
        });
    }
    if nested.max_items > 0 && count > nested.max_items {
        out.push(Violation {
            path: path.clone(),
            summary: "Too many items".to_string(),
            detail: format!("No more than {} item(s) are allowed, but {count} were given.", nested.max_items),
        });
    }
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// A versioned resource schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    /// Bumped whenever the persisted shape changes
    pub version: i64,
    #[serde(rename = "block")]
    pub object: ObjectSchema,
}

impl Schema {
    pub fn new(version: i64, object: ObjectSchema) -> Self {
        Self { version, object }
    }

    pub fn value_type(&self) -> Type {
        self.object.value_type()
    }

    pub fn validate(&self) -> Result<(), SchemaError> {
        self.object.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Schema {
        Schema::new(
            1,
            ObjectSchema::new(vec![
                Attribute::computed("id", AttributeType::String),
                Attribute::required("name", AttributeType::String),
                Attribute::optional(
                    "tags",
                    AttributeType::Nested(
                        NestedObject::list(ObjectSchema::new(vec![
                            Attribute::optional("key", AttributeType::String),
                            Attribute::optional("value", AttributeType::String).sensitive(),
                        ]))
                        .with_items(0, 2),
                    ),
                ),
            ]),
        )
    }

    #[test]
    fn test_value_type_nests_list_objects() {
        let ty = sample().value_type();
        let Type::Object(attrs) = ty else {
            panic!("expected object type");
        };
        assert_eq!(attrs["id"], Type::String);
        assert!(matches!(&attrs["tags"], Type::List(elem) if matches!(**elem, Type::Object(_))));
    }

    #[test]
    fn test_validate_accepts_sample() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_flags() {
        let mut attr = Attribute::required("x", AttributeType::String);
        attr.computed = true;
        let schema = ObjectSchema::new(vec![attr]);
        assert!(matches!(schema.validate(), Err(SchemaError::InvalidFlags { .. })));

        let mut none = Attribute::optional("y", AttributeType::Number);
        none.optional = false;
        let schema = ObjectSchema::new(vec![none]);
        assert!(matches!(schema.validate(), Err(SchemaError::InvalidFlags { .. })));
    }

    #[test]
    fn test_validate_rejects_duplicates_and_names() {
        let schema = ObjectSchema::new(vec![
            Attribute::optional("a", AttributeType::String),
            Attribute::optional("a", AttributeType::Number),
        ]);
        assert!(matches!(schema.validate(), Err(SchemaError::DuplicateAttribute { .. })));

        let schema = ObjectSchema::new(vec![Attribute::optional("$bad", AttributeType::String)]);
        assert!(matches!(schema.validate(), Err(SchemaError::InvalidName { .. })));
    }

    #[test]
    fn test_attribute_at() {
        let schema = sample();
        let path = AttributePath::attribute("tags").join_index(1).join_attribute("value");
        assert!(schema.object.attribute_at(&path).is_some_and(|a| a.sensitive));
        assert_eq!(
            schema.object.attribute_at(&AttributePath::attribute("name")).map(|a| a.name.as_str()),
            Some("name")
        );
        assert!(schema.object.attribute_at(&AttributePath::attribute("name").join_attribute("x")).is_none());
        assert!(schema.object.attribute_at(&AttributePath::root()).is_none());
    }

    #[test]
    fn test_sensitive_does_not_change_type() {
        let plain = Attribute::optional("s", AttributeType::String);
        let secret = plain.clone().sensitive();
        assert_eq!(plain.value_type(), secret.value_type());
    }

    #[test]
    fn test_check_config_reports_violations() {
        let schema = sample();
        let tag = |k: &str| Value::object([("key", Value::from(k)), ("value", Value::Null)]);
        let config = Value::object([
            ("id", Value::from("set-by-caller")),
            ("name", Value::Null),
            ("tags", Value::List(vec![tag("a"), tag("b"), tag("c")])),
        ]);

        let violations = schema.object.check_config(&config);
        let paths: Vec<String> = violations.iter().map(|v| v.path.to_string()).collect();
        assert_eq!(paths, vec!["id", "name", "tags"]);
    }

    #[test]
    fn test_check_config_ignores_unknown() {
        let schema = sample();
        let config = Value::object([
            ("id", Value::Null),
            ("name", Value::Unknown),
            ("tags", Value::Unknown),
        ]);
        assert!(schema.object.check_config(&config).is_empty());
    }
}
