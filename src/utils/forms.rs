use std::collections::BTreeMap;

use lettre::Address;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Widget {
    Text,
    Email,
    Textarea,
}

/// Static description of one form field, rendered into the descriptor.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub widget: Widget,
    pub max_length: Option<usize>,
}

/// Form descriptor handed to the rendering layer: field layout, submitted
/// values and per-field error messages.
#[derive(Debug, Clone, Serialize)]
pub struct FormState {
    pub fields: &'static [FieldSpec],
    pub values: BTreeMap<&'static str, String>,
    pub errors: BTreeMap<&'static str, Vec<String>>,
}

impl FormState {
    pub fn empty(fields: &'static [FieldSpec]) -> Self {
        Self {
            fields,
            values: BTreeMap::new(),
            errors: BTreeMap::new(),
        }
    }

    /// Bind submitted data to `fields` and run the field checks.
    ///
    /// Values are trimmed before checking; a field missing from `submitted`
    /// counts as empty.
    pub fn bind(fields: &'static [FieldSpec], submitted: &[(&str, Option<&str>)]) -> Self {
        let mut state = Self::empty(fields);

        for field in fields {
            let value = submitted
                .iter()
                .find(|(name, _)| *name == field.name)
                .and_then(|(_, value)| *value)
                .unwrap_or("")
                .trim();

            if !value.is_empty() {
                state.values.insert(field.name, value.to_string());
            }
            state.check(field, value);
        }

        state
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Cleaned value of a field, empty when it was not submitted.
    pub fn value(&self, name: &str) -> String {
        self.values.get(name).cloned().unwrap_or_default()
    }

    pub fn add_error(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.entry(field).or_default().push(message.into());
    }

    fn check(&mut self, field: &FieldSpec, value: &str) {
        if value.is_empty() {
            if field.required {
                self.add_error(field.name, "This field is required.");
            }
            return;
        }

        if let Some(max) = field.max_length {
            let length = value.chars().count();
            if length > max {
                self.add_error(
                    field.name,
                    format!("Ensure this value has at most {max} characters (it has {length})."),
                );
            }
        }

        if field.widget == Widget::Email && !is_valid_email(value) {
            self.add_error(field.name, "Enter a valid email address.");
        }
    }
}

/// Address syntax as the SMTP transport parses it, plus a qualified domain:
/// at least two non-empty labels, `localhost`, or a bracketed IP literal.
pub fn is_valid_email(value: &str) -> bool {
    let Ok(address) = value.parse::<Address>() else {
        return false;
    };

    let domain = address.domain();
    if domain.eq_ignore_ascii_case("localhost") || domain.starts_with('[') {
        return true;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}
