//! Upgrading persisted `random_pet` state to the current schema
//!
//! Every shape ever written is read leniently. Missing keys fall back to
//! defaults, extra keys are ignored, and unknown markers count as absent.

use super::instance::{Component, PetInstance, parse_length};
use super::schema::{DEFAULT_LENGTH, DEFAULT_SEPARATOR, SCHEMA_VERSION};
use provider::Diagnostic;
use serde_json::{Map, Value as Raw};
use tfvalue::{Value, codec};

/// Map raw state written at `version` onto the current schema
///
/// Null state upgrades to null.
pub fn upgrade(raw: &Raw, version: i64) -> Result<Value, Diagnostic> {
    if version > SCHEMA_VERSION {
        return Err(Diagnostic::error(
            "State written by a newer provider",
            format!(
                "State has schema version {version}, but this provider only understands versions up to {SCHEMA_VERSION}."
            ),
        ));
    }
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let Some(map) = raw.as_object() else {
        return Err(Diagnostic::error(
            "Error upgrading state",
            format!("Expected the persisted state to be an object, found {raw}"),
        ));
    };

    let pet = PetInstance {
        id: string_field(map, "id").unwrap_or_default(),
        length: field(map, "length")
            .and_then(raw_length)
            .unwrap_or(DEFAULT_LENGTH),
        separator: string_field(map, "separator")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SEPARATOR.to_string()),
        components: components(map),
    };
    Ok(pet.to_value())
}

/// Components from whichever shape the state carries
fn components(map: &Map<String, Raw>) -> Vec<Component> {
    if let Some(list) = field(map, "components") {
        return list
            .as_array()
            .map(|items| items.iter().filter_map(component).collect())
            .unwrap_or_default();
    }
    if let Some(single) = field(map, "component") {
        return component(single)
            .filter(|c| !c.prefix.is_empty())
            .into_iter()
            .collect();
    }
    string_field(map, "prefix")
        .filter(|p| !p.is_empty())
        .map(|prefix| Component {
            prefix,
            ..Component::default()
        })
        .into_iter()
        .collect()
}

/// A component object, or a bare string taken as its prefix
fn component(raw: &Raw) -> Option<Component> {
    match raw {
        Raw::String(prefix) => Some(Component {
            prefix: prefix.clone(),
            ..Component::default()
        }),
        Raw::Object(map) if !codec::is_unknown_marker(raw) => Some(Component {
            prefix: string_field(map, "prefix").unwrap_or_default(),
            secret: string_field(map, "secret"),
            computed: string_field(map, "computed"),
        }),
        _ => None,
    }
}

/// A present, non-null, non-unknown field
fn field<'a>(map: &'a Map<String, Raw>, name: &str) -> Option<&'a Raw> {
    map.get(name)
        .filter(|raw| !raw.is_null() && !codec::is_unknown_marker(raw))
}

fn string_field(map: &Map<String, Raw>, name: &str) -> Option<String> {
    field(map, name).and_then(Raw::as_str).map(str::to_string)
}

/// A length given as a number or a numeric string
fn raw_length(raw: &Raw) -> Option<u32> {
    let n = match raw {
        Raw::Number(n) => n.as_f64()?,
        Raw::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    parse_length(&Value::Number(n))
}
