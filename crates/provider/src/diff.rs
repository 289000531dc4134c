//! Attribute-level diff between two resource values

use tfvalue::{AttributePath, Value};

/// What happens to one attribute between two values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Null before, known after
    Add,
    /// Known before, null after
    Remove,
    /// Known before and after, different
    Update,
    /// Will only be known after apply
    Unknown,
}

/// A change to one attribute
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeChange {
    pub path: AttributePath,
    pub kind: ChangeKind,
    pub before: Value,
    pub after: Value,
}

/// Compute the attribute changes turning `before` into `after`
///
/// Objects and lists are walked element by element; everything else is
/// compared as a leaf. Paths come out in attribute order.
pub fn attribute_changes(before: &Value, after: &Value) -> Vec<AttributeChange> {
    let mut changes = Vec::new();
    walk(&AttributePath::root(), before, after, &mut changes);
    changes
}

fn walk(path: &AttributePath, before: &Value, after: &Value, out: &mut Vec<AttributeChange>) {
    if before == after {
        return;
    }

    match (before, after) {
        (Value::Object(b), Value::Object(a)) => {
            let mut names: Vec<&String> = b.keys().chain(a.keys()).collect();
            names.sort();
            names.dedup();
            for name in names {
                walk(
                    &path.join_attribute(name),
                    b.get(name).unwrap_or(&Value::Null),
                    a.get(name).unwrap_or(&Value::Null),
                    out,
                );
            }
        }
        (Value::List(b), Value::List(a)) => {
            for i in 0..b.len().max(a.len()) {
                walk(
                    &path.join_index(i),
                    b.get(i).unwrap_or(&Value::Null),
                    a.get(i).unwrap_or(&Value::Null),
                    out,
                );
            }
        }
        _ => {
            let kind = if after.is_unknown() {
                ChangeKind::Unknown
            } else if before.is_null() || before.is_unknown() {
                ChangeKind::Add
            } else if after.is_null() {
                ChangeKind::Remove
            } else {
                ChangeKind::Update
            };
            out.push(AttributeChange {
                path: path.clone(),
                kind,
                before: before.clone(),
                after: after.clone(),
            });
        }
    }
}

/// What a plan does to the resource as a whole
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanAction {
    NoOp,
    Create,
    Update,
    Replace,
    Delete,
}

impl PlanAction {
    /// Classify a plan from prior state, planned state and replace paths
    pub fn classify(prior: &Value, planned: &Value, requires_replace: &[AttributePath]) -> Self {
        match (prior.is_null(), planned.is_null()) {
            (true, true) => Self::NoOp,
            (true, false) => Self::Create,
            (false, true) => Self::Delete,
            (false, false) => {
                let changes = attribute_changes(prior, planned);
                if changes.is_empty() {
                    Self::NoOp
                } else if changes
                    .iter()
                    .any(|c| requires_replace.iter().any(|r| c.path.starts_with(r)))
                {
                    Self::Replace
                } else {
                    Self::Update
                }
            }
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::NoOp => " ",
            Self::Create => "+",
            Self::Update => "~",
            Self::Replace => "-/+",
            Self::Delete => "-",
        }
    }
}

/// Diff summary statistics
#[derive(Debug, Clone, Default)]
pub struct ChangeSummary {
    pub additions: usize,
    pub removals: usize,
    pub updates: usize,
    /// Attributes known only after apply
    pub unknowns: usize,
}

impl ChangeSummary {
    /// Create a summary from a list of changes
    pub fn from_changes(changes: &[AttributeChange]) -> Self {
        let mut summary = Self::default();
        for change in changes {
            match change.kind {
                ChangeKind::Add => summary.additions += 1,
                ChangeKind::Remove => summary.removals += 1,
                ChangeKind::Update => summary.updates += 1,
                ChangeKind::Unknown => summary.unknowns += 1,
            }
        }
        summary
    }

    /// Total number of changes
    pub fn total(&self) -> usize {
        self.additions + self.removals + self.updates + self.unknowns
    }

    /// Check if there are any changes
    pub fn has_changes(&self) -> bool {
        self.total() > 0
    }
}
