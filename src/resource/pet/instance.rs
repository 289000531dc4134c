//! Decoded `random_pet` instances and change detection

use super::schema::{DEFAULT_LENGTH, DEFAULT_SEPARATOR};
use tfvalue::Value;

/// One prefix layer of a pet name
#[derive(Debug, Clone, Default)]
pub struct Component {
    pub prefix: String,
    pub secret: Option<String>,
    /// The name from this component inward, once applied
    pub computed: Option<String>,
}

/// A `random_pet` with defaults applied
#[derive(Debug, Clone)]
pub struct PetInstance {
    /// Empty only while planned and not yet applied
    pub id: String,
    pub length: u32,
    pub separator: String,
    pub components: Vec<Component>,
}

impl PetInstance {
    /// Decode from a resource value, filling defaults
    ///
    /// Null and Unknown attributes are treated as absent.
    pub fn from_value(value: &Value) -> Self {
        let components = value
            .get("components")
            .and_then(Value::as_list)
            .map(|items| items.iter().map(Component::from_value).collect())
            .unwrap_or_default();

        Self {
            id: string_attr(value, "id").unwrap_or_default(),
            length: value
                .get("length")
                .and_then(parse_length)
                .unwrap_or(DEFAULT_LENGTH),
            separator: string_attr(value, "separator")
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_SEPARATOR.to_string()),
            components,
        }
    }

    pub fn to_value(&self) -> Value {
        Value::object([
            ("id", non_empty(&self.id)),
            ("length", Value::from(self.length)),
            ("separator", Value::from(self.separator.as_str())),
            (
                "components",
                Value::List(self.components.iter().map(Component::to_value).collect()),
            ),
        ])
    }

    pub fn prefixes(&self) -> Vec<&str> {
        self.components.iter().map(|c| c.prefix.as_str()).collect()
    }
}

impl Component {
    pub fn from_value(value: &Value) -> Self {
        Self {
            prefix: string_attr(value, "prefix").unwrap_or_default(),
            secret: string_attr(value, "secret"),
            computed: string_attr(value, "computed"),
        }
    }

    fn to_value(&self) -> Value {
        Value::object([
            ("prefix", non_empty(&self.prefix)),
            ("secret", Value::from(self.secret.clone())),
            ("computed", Value::from(self.computed.clone())),
        ])
    }
}

/// Whether two instances would produce the same name
///
/// Compares `length`, `separator` and each component's `prefix` and
/// `secret`. `id` and `computed` are outputs and never compared.
pub fn unchanged(a: &PetInstance, b: &PetInstance) -> bool {
    a.length == b.length
        && a.separator == b.separator
        && a.components.len() == b.components.len()
        && a
            .components
            .iter()
            .zip(&b.components)
            .all(|(x, y)| component_unchanged(x, y))
}

pub fn component_unchanged(a: &Component, b: &Component) -> bool {
    a.prefix == b.prefix && a.secret == b.secret
}

/// A usable word count, or `None` when the default applies
pub fn parse_length(value: &Value) -> Option<u32> {
    let n = value.as_f64()?;
    (n.fract() == 0.0 && n >= 1.0 && n <= f64::from(u32::MAX)).then_some(n as u32)
}

/// Whether a known `length` will be replaced by the default
pub fn length_is_defaulted(value: &Value) -> bool {
    value.is_known() && parse_length(value).is_none()
}

/// Fold prefixes around `base`, innermost (last) component first
///
/// Returns the full name and, per component, the name after its own
/// prefix was applied. Index 0 is the outermost layer, so its snapshot
/// is the full name. Empty prefixes contribute nothing.
pub fn fold(prefixes: &[&str], separator: &str, base: &str) -> (String, Vec<String>) {
    let mut name = base.to_string();
    let mut computed = vec![String::new(); prefixes.len()];
    for (i, prefix) in prefixes.iter().enumerate().rev() {
        if !prefix.is_empty() {
            name = format!("{prefix}{separator}{name}");
        }
        computed[i].clone_from(&name);
    }
    (name, computed)
}

/// Recover the base name from a folded `id`
///
/// `None` when the id does not carry the prefixes.
pub fn base_of<'a>(id: &'a str, prefixes: &[&str], separator: &str) -> Option<&'a str> {
    let mut rest = id;
    for prefix in prefixes.iter().filter(|p| !p.is_empty()) {
        rest = rest.strip_prefix(prefix)?.strip_prefix(separator)?;
    }
    Some(rest)
}

/// Per-component snapshots of a kept `id`
///
/// An id that does not carry the prefixes cannot be unfolded; every
/// component then records the id itself.
pub fn snapshots_of(id: &str, prefixes: &[&str], separator: &str) -> Vec<String> {
    match base_of(id, prefixes, separator) {
        Some(base) => fold(prefixes, separator, base).1,
        None => vec![id.to_string(); prefixes.len()],
    }
}

fn string_attr(value: &Value, name: &str) -> Option<String> {
    value.get(name).and_then(Value::as_str).map(str::to_string)
}

fn non_empty(s: &str) -> Value {
    if s.is_empty() {
        Value::Null
    } else {
        Value::from(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(length: Value, separator: Value, prefixes: &[&str]) -> Value {
        Value::object([
            ("id", Value::Null),
            ("length", length),
            ("separator", separator),
            (
                "components",
                Value::List(
                    prefixes
                        .iter()
                        .map(|p| {
                            Value::object([
                                ("prefix", Value::from(*p)),
                                ("secret", Value::Null),
                                ("computed", Value::Null),
                            ])
                        })
                        .collect(),
                ),
            ),
        ])
    }

    #[test]
    fn test_default_fill() {
        let pet = PetInstance::from_value(&config(Value::Null, Value::Null, &[]));
        assert_eq!(pet.length, 3);
        assert_eq!(pet.separator, "-");
        assert!(pet.id.is_empty());
        assert!(pet.components.is_empty());

        let pet = PetInstance::from_value(&config(Value::Number(0.0), Value::from(""), &[]));
        assert_eq!(pet.length, 3);
        assert_eq!(pet.separator, "-");
    }

    #[test]
    fn test_unusable_lengths_default() {
        for n in [-2.0, 2.5, 1e12] {
            let pet = PetInstance::from_value(&config(Value::Number(n), Value::Null, &[]));
            assert_eq!(pet.length, 3, "length {n}");
        }
        let pet = PetInstance::from_value(&config(Value::Unknown, Value::Null, &[]));
        assert_eq!(pet.length, 3);

        assert!(length_is_defaulted(&Value::Number(0.0)));
        assert!(!length_is_defaulted(&Value::Number(2.0)));
        assert!(!length_is_defaulted(&Value::Null));
    }

    #[test]
    fn test_missing_components_is_empty() {
        let value = Value::object([("id", Value::from("fox"))]);
        let pet = PetInstance::from_value(&value);
        assert_eq!(pet.id, "fox");
        assert!(pet.components.is_empty());
    }

    #[test]
    fn test_to_value_round_trip() {
        let mut pet = PetInstance::from_value(&config(Value::Number(2.0), Value::from("_"), &["a"]));
        pet.id = "a_brave-fox".into();
        pet.components[0].computed = Some("a_brave-fox".into());

        let back = PetInstance::from_value(&pet.to_value());
        assert_eq!(back.id, "a_brave-fox");
        assert_eq!(back.length, 2);
        assert_eq!(back.separator, "_");
        assert_eq!(back.components[0].computed.as_deref(), Some("a_brave-fox"));
    }

    #[test]
    fn test_unchanged_ignores_outputs() {
        let a = PetInstance::from_value(&config(Value::Number(2.0), Value::Null, &["a", "b"]));
        let mut b = a.clone();
        b.id = "x-y-z".into();
        b.components[1].computed = Some("b-z".into());
        assert!(unchanged(&a, &b));

        b.components[1].secret = Some("s".into());
        assert!(!unchanged(&a, &b));
    }

    #[test]
    fn test_unchanged_compares_inputs() {
        let a = PetInstance::from_value(&config(Value::Number(2.0), Value::Null, &["a"]));
        let longer = PetInstance::from_value(&config(Value::Number(3.0), Value::Null, &["a"]));
        let other_sep = PetInstance::from_value(&config(Value::Number(2.0), Value::from("."), &["a"]));
        let more = PetInstance::from_value(&config(Value::Number(2.0), Value::Null, &["a", "b"]));
        let renamed = PetInstance::from_value(&config(Value::Number(2.0), Value::Null, &["c"]));
        for other in [&longer, &other_sep, &more, &renamed] {
            assert!(!unchanged(&a, other));
        }
    }

    #[test]
    fn test_fold_order() {
        let (id, computed) = fold(&["a", "b"], "-", "fox");
        assert_eq!(id, "a-b-fox");
        assert_eq!(computed, vec!["a-b-fox", "b-fox"]);
    }

    #[test]
    fn test_fold_skips_empty_prefix() {
        let (id, computed) = fold(&["a", "", "c"], ".", "fox");
        assert_eq!(id, "a.c.fox");
        assert_eq!(computed, vec!["a.c.fox", "c.fox", "c.fox"]);
    }

    #[test]
    fn test_base_of() {
        assert_eq!(base_of("a-b-brave-fox", &["a", "b"], "-"), Some("brave-fox"));
        assert_eq!(base_of("a.c.fox", &["a", "", "c"], "."), Some("fox"));
        assert_eq!(base_of("imported", &["a"], "-"), None);
        assert_eq!(base_of("ab-fox", &["a"], "-"), None);
    }

    #[test]
    fn test_snapshots_of_kept_id() {
        assert_eq!(
            snapshots_of("a-b-brave-fox", &["a", "b"], "-"),
            vec!["a-b-brave-fox", "b-brave-fox"]
        );
        // Never longer than the id itself
        assert_eq!(snapshots_of("imported", &["a", "b"], "-"), vec!["imported", "imported"]);
        assert!(snapshots_of("fox", &[], "-").is_empty());
    }
}
