use anyhow::Result;
use tfvalue::{Attribute, AttributeType, NestingMode, ObjectSchema};

use crate::Context;
use crate::ui;

/// Print the schema of every registered resource
pub fn run(ctx: &Context, json: bool) -> Result<bool> {
    let schemas = ctx.registry.schemas();

    if json {
        println!("{}", ctx.config.to_json(&schemas)?);
        return Ok(true);
    }

    ui::header("Resource schemas");
    for (type_name, schema) in &schemas {
        ui::section(type_name);
        ui::kv("version", &schema.version.to_string());
        for (name, flags) in attribute_rows(&schema.object, "") {
            ui::kv(&name, &flags);
        }
    }
    Ok(true)
}

/// One `(path, description)` row per attribute, nested ones included
fn attribute_rows(object: &ObjectSchema, parent: &str) -> Vec<(String, String)> {
    let mut rows = Vec::new();
    for attr in &object.attributes {
        let name = if parent.is_empty() {
            attr.name.clone()
        } else {
            format!("{parent}.{}", attr.name)
        };
        rows.push((name.clone(), describe(attr)));
        if let AttributeType::Nested(nested) = &attr.ty {
            rows.extend(attribute_rows(&nested.object, &name));
        }
    }
    rows
}

fn describe(attr: &Attribute) -> String {
    let ty = match &attr.ty {
        AttributeType::String => "string",
        AttributeType::Number => "number",
        AttributeType::Nested(nested) => match nested.mode {
            NestingMode::Single => "object",
            NestingMode::List => "list of objects",
        },
    };

    let mut parts = vec![ty.to_string()];
    if attr.required {
        parts.push("required".into());
    }
    if attr.optional {
        parts.push("optional".into());
    }
    if attr.computed {
        parts.push("computed".into());
    }
    if attr.sensitive {
        parts.push("sensitive".into());
    }

    let mut line = parts.join(", ");
    if !attr.description.is_empty() {
        line.push_str(" - ");
        line.push_str(&attr.description);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::pet::schema::schema;

    #[test]
    fn test_attribute_rows() {
        let rows = attribute_rows(&schema().object, "");
        let names: Vec<&str> = rows.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "id",
                "length",
                "separator",
                "components",
                "components.prefix",
                "components.secret",
                "components.computed"
            ]
        );
        assert!(rows[5].1.starts_with("string, optional, sensitive"));
        assert!(rows[0].1.starts_with("string, computed"));
    }
}
