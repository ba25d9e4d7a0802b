use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::serialize_object_id_as_hex_string;
use serde::{Deserialize, Serialize};

use crate::utils::forms::{FieldSpec, FormState, Widget};

#[derive(Debug, Serialize, Clone)]
pub struct Comment {
    #[serde(serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,
    #[serde(serialize_with = "serialize_object_id_as_hex_string")]
    pub post_id: ObjectId,
    pub name: String,
    pub email: String,
    pub body: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    /// Moderation flag; comments start visible.
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub name: String,
    pub email: String,
    pub body: String,
}

impl Comment {
    pub fn new(post_id: ObjectId, new_comment: NewComment, now: DateTime<Utc>) -> Self {
        Comment {
            id: ObjectId::new(),
            post_id,
            name: new_comment.name,
            email: new_comment.email,
            body: new_comment.body,
            created: now,
            updated: now,
            active: true,
        }
    }
}

pub const COMMENT_FORM_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "name",
        label: "Name",
        required: true,
        widget: Widget::Text,
        max_length: Some(250),
    },
    FieldSpec {
        name: "email",
        label: "E-mail",
        required: true,
        widget: Widget::Email,
        max_length: Some(254),
    },
    FieldSpec {
        name: "body",
        label: "Comment",
        required: true,
        widget: Widget::Textarea,
        max_length: None,
    },
];

/// Raw comment submission. Every field is optional here so that a missing
/// field becomes a form error instead of a payload error.
#[derive(Debug, Default, Deserialize)]
pub struct CommentForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub body: Option<String>,
}

impl CommentForm {
    pub fn empty_state() -> FormState {
        FormState::empty(COMMENT_FORM_FIELDS)
    }

    pub fn bind(&self) -> FormState {
        FormState::bind(
            COMMENT_FORM_FIELDS,
            &[
                ("name", self.name.as_deref()),
                ("email", self.email.as_deref()),
                ("body", self.body.as_deref()),
            ],
        )
    }
}

impl From<&FormState> for NewComment {
    fn from(form: &FormState) -> Self {
        NewComment {
            name: form.value("name"),
            email: form.value("email"),
            body: form.value("body"),
        }
    }
}
