//! Typed values and the type nodes they are interpreted against

use std::collections::BTreeMap;
use std::fmt;

/// A type node describing the shape of a [`Value`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    String,
    Number,
    /// Ordered sequence of elements of one type
    List(Box<Type>),
    /// Fixed set of named attributes
    Object(BTreeMap<String, Type>),
}

impl Type {
    /// List of `element`
    pub fn list(element: Type) -> Self {
        Self::List(Box::new(element))
    }

    /// Object from `(name, type)` pairs
    pub fn object<I, S>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (S, Type)>,
        S: Into<String>,
    {
        Self::Object(
            attributes
                .into_iter()
                .map(|(name, ty)| (name.into(), ty))
                .collect(),
        )
    }

    /// Short name used in mismatch messages
    pub fn kind(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::List(_) => "list",
            Self::Object(_) => "object",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Number => write!(f, "number"),
            Self::List(elem) => write!(f, "list({elem})"),
            Self::Object(attrs) => {
                write!(f, "object({{")?;
                for (i, (name, ty)) in attrs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}={ty}")?;
                }
                write!(f, "}})")
            }
        }
    }
}

/// A value conforming to a [`Type`]
///
/// `Null` means the value is and remains absent. `Unknown` means a value
/// will exist once the resource is applied but is not determined yet.
/// Everything else is a known value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Unknown,
    String(String),
    Number(f64),
    List(Vec<Value>),
    /// Holds every attribute declared by the object type; absent ones are `Null`
    Object(BTreeMap<String, Value>),
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    /// Object from `(name, value)` pairs
    pub fn object<I, S>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        Self::Object(
            attributes
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        )
    }

    /// An object of `ty` with every attribute set to `Null`
    ///
    /// Returns `Null` when `ty` is not an object type.
    pub fn null_object(ty: &Type) -> Self {
        match ty {
            Type::Object(attrs) => {
                Self::Object(attrs.keys().map(|k| (k.clone(), Self::Null)).collect())
            }
            _ => Self::Null,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Neither null nor unknown
    pub fn is_known(&self) -> bool {
        !self.is_null() && !self.is_unknown()
    }

    /// True when no `Unknown` appears anywhere in the value
    pub fn is_wholly_known(&self) -> bool {
        match self {
            Self::Unknown => false,
            Self::List(items) => items.iter().all(Value::is_wholly_known),
            Self::Object(attrs) => attrs.values().all(Value::is_wholly_known),
            _ => true,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Object(attrs) => Some(attrs),
            _ => None,
        }
    }

    /// Look up an object attribute; `None` for non-objects and undeclared keys
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.as_object().and_then(|attrs| attrs.get(name))
    }

    /// Whether the value's shape matches `ty`
    ///
    /// Null and Unknown conform to every type. Objects must carry exactly
    /// the declared keys.
    pub fn conforms(&self, ty: &Type) -> bool {
        match (self, ty) {
            (Self::Null | Self::Unknown, _) => true,
            (Self::String(_), Type::String) => true,
            (Self::Number(n), Type::Number) => n.is_finite(),
            (Self::List(items), Type::List(elem)) => items.iter().all(|v| v.conforms(elem)),
            (Self::Object(attrs), Type::Object(types)) => {
                attrs.len() == types.len()
                    && types
                        .iter()
                        .all(|(name, ty)| attrs.get(name).is_some_and(|v| v.conforms(ty)))
            }
            _ => false,
        }
    }

    /// Short name of the value's state or kind, used in messages
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Unknown => "unknown",
            Self::String(_) => "string",
            Self::Number(_) => "number",
            Self::List(_) => "list",
            Self::Object(_) => "object",
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Compute a value from `inputs`, or `Unknown` if any input is unknown
///
/// The computation never sees an unknown input, so it cannot guess a
/// known result from undetermined data.
pub fn unknown_if_any<'a, I, F>(inputs: I, compute: F) -> Value
where
    I: IntoIterator<Item = &'a Value>,
    F: FnOnce() -> Value,
{
    if inputs.into_iter().any(|v| !v.is_wholly_known()) {
        Value::Unknown
    } else {
        compute()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component_type() -> Type {
        Type::object([("prefix", Type::String), ("computed", Type::String)])
    }

    #[test]
    fn test_conforms_object_requires_every_key() {
        let ty = component_type();
        let full = Value::object([("prefix", Value::from("a")), ("computed", Value::Null)]);
        let partial = Value::object([("prefix", Value::from("a"))]);
        assert!(full.conforms(&ty));
        assert!(!partial.conforms(&ty));
    }

    #[test]
    fn test_conforms_rejects_wrong_scalar() {
        assert!(!Value::from("3").conforms(&Type::Number));
        assert!(!Value::Number(f64::NAN).conforms(&Type::Number));
        assert!(Value::Unknown.conforms(&Type::list(Type::String)));
    }

    #[test]
    fn test_null_object() {
        let value = Value::null_object(&component_type());
        assert_eq!(value.get("prefix"), Some(&Value::Null));
        assert_eq!(value.get("computed"), Some(&Value::Null));
        assert!(value.conforms(&component_type()));
    }

    #[test]
    fn test_wholly_known() {
        let nested = Value::List(vec![Value::object([("prefix", Value::Unknown)])]);
        assert!(nested.is_known());
        assert!(!nested.is_wholly_known());
        assert!(Value::Null.is_wholly_known());
    }

    #[test]
    fn test_unknown_if_any() {
        let known = Value::from("a");
        let out = unknown_if_any([&known, &Value::Unknown], || Value::from("never"));
        assert!(out.is_unknown());

        let out = unknown_if_any([&known], || Value::from("a-fox"));
        assert_eq!(out, Value::from("a-fox"));
    }

    #[test]
    fn test_type_display() {
        let ty = Type::list(component_type());
        assert_eq!(ty.to_string(), "list(object({computed=string, prefix=string}))");
    }
}
