use serde::Deserialize;

use crate::utils::forms::{FieldSpec, FormState, Widget};

pub const SHARE_FORM_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "name",
        label: "Your name",
        required: true,
        widget: Widget::Text,
        max_length: Some(25),
    },
    FieldSpec {
        name: "email",
        label: "Your e-mail",
        required: true,
        widget: Widget::Email,
        max_length: None,
    },
    FieldSpec {
        name: "to",
        label: "Recipient e-mail",
        required: true,
        widget: Widget::Email,
        max_length: None,
    },
    FieldSpec {
        name: "comments",
        label: "Comments",
        required: false,
        widget: Widget::Textarea,
        max_length: None,
    },
];

/// Raw "email this post" submission.
#[derive(Debug, Default, Deserialize)]
pub struct ShareForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub to: Option<String>,
    pub comments: Option<String>,
}

impl ShareForm {
    pub fn empty_state() -> FormState {
        FormState::empty(SHARE_FORM_FIELDS)
    }

    pub fn bind(&self) -> FormState {
        FormState::bind(
            SHARE_FORM_FIELDS,
            &[
                ("name", self.name.as_deref()),
                ("email", self.email.as_deref()),
                ("to", self.to.as_deref()),
                ("comments", self.comments.as_deref()),
            ],
        )
    }
}

/// Cleaned share request.
#[derive(Debug, Clone)]
pub struct ShareRequest {
    pub name: String,
    pub email: String,
    pub to: String,
    pub comments: String,
}

impl From<&FormState> for ShareRequest {
    fn from(form: &FormState) -> Self {
        ShareRequest {
            name: form.value("name"),
            email: form.value("email"),
            to: form.value("to"),
            comments: form.value("comments"),
        }
    }
}
