//! GraphQL document builder.
//!
//! Field selections are described as a small tree in code and rendered to
//! query text. Rendering is deterministic: fields appear in insertion order.

use std::fmt::Write;

/// A selection inside a selection set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Field(Field),
    InlineFragment {
        type_condition: String,
        selections: Vec<Selection>,
    },
}

/// A field with optional arguments and sub-selections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: String,
    arguments: Vec<(String, String)>,
    selections: Vec<Selection>,
}

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
            selections: Vec::new(),
        }
    }

    /// Bind an argument to a value expression, usually a `$variable`.
    pub fn arg(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.arguments.push((name.into(), value.into()));
        self
    }

    /// Add scalar leaf fields.
    pub fn fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selections
            .extend(names.into_iter().map(|n| Selection::Field(Field::new(n))));
        self
    }

    /// Add a nested object field.
    pub fn field(mut self, field: Field) -> Self {
        self.selections.push(Selection::Field(field));
        self
    }

    pub fn typename(self) -> Self {
        self.fields(["__typename"])
    }

    /// Add an inline fragment `... on TypeName { ... }`.
    pub fn on(mut self, fragment: Fragment) -> Self {
        self.selections.push(Selection::InlineFragment {
            type_condition: fragment.type_condition,
            selections: fragment.selections,
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn render_into(&self, out: &mut String) {
        out.push_str(&self.name);
        if !self.arguments.is_empty() {
            out.push('(');
            for (i, (name, value)) in self.arguments.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                let _ = write!(out, "{}: {}", name, value);
            }
            out.push(')');
        }
        render_selection_set(&self.selections, out);
    }
}

/// Selection set of an inline fragment, applied when the object has the given type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    type_condition: String,
    selections: Vec<Selection>,
}

impl Fragment {
    pub fn on(type_condition: impl Into<String>) -> Self {
        Self {
            type_condition: type_condition.into(),
            selections: Vec::new(),
        }
    }

    pub fn fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selections
            .extend(names.into_iter().map(|n| Selection::Field(Field::new(n))));
        self
    }

    pub fn field(mut self, field: Field) -> Self {
        self.selections.push(Selection::Field(field));
        self
    }
}

fn render_selection_set(selections: &[Selection], out: &mut String) {
    if selections.is_empty() {
        return;
    }
    out.push_str(" {");
    for selection in selections {
        out.push(' ');
        match selection {
            Selection::Field(field) => field.render_into(out),
            Selection::InlineFragment {
                type_condition,
                selections,
            } => {
                let _ = write!(out, "... on {}", type_condition);
                render_selection_set(selections, out);
            }
        }
    }
    out.push_str(" }");
}

/// A GraphQL query operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    operation_name: String,
    variables: Vec<(String, String)>,
    selections: Vec<Selection>,
}

impl Document {
    pub fn query(operation_name: impl Into<String>) -> Self {
        Self {
            operation_name: operation_name.into(),
            variables: Vec::new(),
            selections: Vec::new(),
        }
    }

    /// Declare `$name: graphql_type`.
    pub fn variable(mut self, name: impl Into<String>, graphql_type: impl Into<String>) -> Self {
        self.variables.push((name.into(), graphql_type.into()));
        self
    }

    /// Add a root field.
    pub fn select(mut self, field: Field) -> Self {
        self.selections.push(Selection::Field(field));
        self
    }

    pub fn operation_name(&self) -> &str {
        &self.operation_name
    }

    /// Names of the root fields, in selection order.
    pub fn root_fields(&self) -> Vec<&str> {
        self.selections
            .iter()
            .filter_map(|s| match s {
                Selection::Field(f) => Some(f.name()),
                Selection::InlineFragment { .. } => None,
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let mut out = String::from("query ");
        out.push_str(&self.operation_name);
        if !self.variables.is_empty() {
            out.push('(');
            for (i, (name, ty)) in self.variables.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                let _ = write!(out, "${}: {}", name, ty);
            }
            out.push(')');
        }
        render_selection_set(&self.selections, &mut out);
        out
    }
}
