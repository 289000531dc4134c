//! Human-readable plan output

use colored::Colorize;
use provider::{
    AttributeChange, ChangeKind, ChangeSummary, DynamicValue, PlanAction, attribute_changes,
};
use tfvalue::{AttributePath, AttributeType, ObjectSchema, Schema, Value};

use crate::ui;

const SENSITIVE: &str = "(sensitive value)";
const KNOWN_AFTER_APPLY: &str = "(known after apply)";

/// Print the attribute changes a plan makes
///
/// With `full`, also print a line diff of the two states.
pub fn plan(
    schema: &Schema,
    type_name: &str,
    prior: &DynamicValue,
    planned: &DynamicValue,
    requires_replace: &[AttributePath],
    full: bool,
) {
    let ty = schema.value_type();
    let (Ok(before), Ok(after)) = (prior.decode(&ty), planned.decode(&ty)) else {
        log::debug!("Plan values do not match the schema, skipping rendering");
        return;
    };

    let action = PlanAction::classify(&before, &after, requires_replace);
    // A new resource lists every attribute it will have
    let baseline = if before.is_null() {
        Value::null_object(&ty)
    } else {
        before
    };
    let changes = attribute_changes(&baseline, &after);
    let summary = ChangeSummary::from_changes(&changes);

    ui::header(&format!("{type_name}: {}", action_label(action)));
    if action == PlanAction::Delete {
        ui::dim("will be destroyed");
        return;
    }
    if !summary.has_changes() {
        ui::dim("No changes. The existing name is kept.");
        return;
    }

    for change in &changes {
        eprintln!("{}", change_line(&schema.object, change, requires_replace));
    }

    ui::dim(&format!(
        "{} to add, {} to change, {} to remove, {} known after apply",
        summary.additions, summary.updates, summary.removals, summary.unknowns
    ));

    if full {
        ui::section("State diff");
        show_text_diff(&schema.object, prior, planned);
    }
}

fn action_label(action: PlanAction) -> String {
    let label = match action {
        PlanAction::NoOp => "no changes".normal(),
        PlanAction::Create => "will be created".green(),
        PlanAction::Update => "will be updated in-place".yellow(),
        PlanAction::Replace => "must be replaced".red(),
        PlanAction::Delete => "will be destroyed".red(),
    };
    format!("{} {label}", action.symbol())
}

fn change_line(object: &ObjectSchema, change: &AttributeChange, replace: &[AttributePath]) -> String {
    let path = change.path.to_string();
    let forces = if replace.iter().any(|r| change.path.starts_with(r)) {
        format!(" {}", "# forces replacement".red())
    } else {
        String::new()
    };
    let before = display_at(object, &change.path, &change.before);
    let after = display_at(object, &change.path, &change.after);

    match change.kind {
        ChangeKind::Add => format!("  {} {path} = {after}{forces}", "+".green()),
        ChangeKind::Remove => format!("  {} {path} = {before}{forces}", "-".red()),
        ChangeKind::Update | ChangeKind::Unknown => {
            format!("  {} {path}: {before} → {after}{forces}", "~".yellow())
        }
    }
}

/// Display a value found at `path`, hiding sensitive parts
fn display_at(object: &ObjectSchema, path: &AttributePath, value: &Value) -> String {
    match object.attribute_at(path) {
        Some(attr) if attr.sensitive && value.is_known() => SENSITIVE.to_string(),
        Some(attr) => match &attr.ty {
            AttributeType::Nested(nested) => display(&redact(&nested.object, value)),
            _ => display(value),
        },
        None => display(&redact(object, value)),
    }
}

/// Replace known sensitive values inside `value`
///
/// `value` is an object of `object`, or a list of them.
fn redact(object: &ObjectSchema, value: &Value) -> Value {
    match value {
        Value::List(items) => Value::List(items.iter().map(|v| redact(object, v)).collect()),
        Value::Object(attrs) => Value::Object(
            attrs
                .iter()
                .map(|(name, v)| {
                    let redacted = match object.attribute(name) {
                        Some(attr) if attr.sensitive && v.is_known() => Value::from(SENSITIVE),
                        Some(attr) => match &attr.ty {
                            AttributeType::Nested(nested) => redact(&nested.object, v),
                            _ => v.clone(),
                        },
                        None => v.clone(),
                    };
                    (name.clone(), redacted)
                })
                .collect(),
        ),
        other => other.clone(),
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::Null => "null".dimmed().to_string(),
        Value::Unknown => KNOWN_AFTER_APPLY.dimmed().to_string(),
        Value::String(s) if s == SENSITIVE => s.clone(),
        Value::String(s) => format!("{s:?}"),
        Value::Number(n) if n.fract() == 0.0 => format!("{n:.0}"),
        Value::Number(n) => n.to_string(),
        Value::List(items) => {
            let items: Vec<String> = items.iter().map(display).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(attrs) => {
            let attrs: Vec<String> = attrs
                .iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| format!("{k} = {}", display(v)))
                .collect();
            format!("{{{}}}", attrs.join(", "))
        }
    }
}

/// Line diff of the two states as pretty JSON, sensitive values hidden
fn show_text_diff(object: &ObjectSchema, prior: &DynamicValue, planned: &DynamicValue) {
    let text = |state: &DynamicValue| {
        let redacted = redact_json(object, state.as_json());
        serde_json::to_string_pretty(&redacted).unwrap_or_default() + "\n"
    };
    let (text_a, text_b) = (text(prior), text(planned));

    let diff = similar::TextDiff::from_lines(&text_a, &text_b);
    for change in diff.iter_all_changes() {
        match change.tag() {
            similar::ChangeTag::Delete => eprint!("    {}", format!("- {change}").red()),
            similar::ChangeTag::Insert => eprint!("    {}", format!("+ {change}").green()),
            similar::ChangeTag::Equal => eprint!("    {}", format!("  {change}").dimmed()),
        }
    }
}

fn redact_json(object: &ObjectSchema, raw: &serde_json::Value) -> serde_json::Value {
    use serde_json::Value as Raw;

    match raw {
        Raw::Array(items) => Raw::Array(items.iter().map(|v| redact_json(object, v)).collect()),
        Raw::Object(map) if !tfvalue::codec::is_unknown_marker(raw) => Raw::Object(
            map.iter()
                .map(|(name, v)| {
                    let redacted = match object.attribute(name) {
                        Some(attr) if attr.sensitive && !v.is_null() => Raw::from(SENSITIVE),
                        Some(attr) => match &attr.ty {
                            AttributeType::Nested(nested) => redact_json(&nested.object, v),
                            _ => v.clone(),
                        },
                        None => v.clone(),
                    };
                    (name.clone(), redacted)
                })
                .collect(),
        ),
        other => other.clone(),
    }
}
