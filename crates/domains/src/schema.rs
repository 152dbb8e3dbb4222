//! # Entity Schemas
//!
//! One declarative rule table per entity. Field names are the JSON names of
//! the public API. The tables carry no behaviour; [`crate::validation`]
//! interprets them.

/// Shape a field value must have (after coercion).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    /// Positive integer; decimal strings are coerced.
    Identifier,
    /// `true`/`false`; the strings `"true"`/`"false"` are coerced.
    Boolean,
    /// ISO-8601 calendar date (`YYYY-MM-DD`) or an RFC 3339 timestamp,
    /// normalised to the date part.
    Date,
}

/// Constraint applied to a text value once its type is correct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Not empty once surrounding whitespace is trimmed.
    NotEmpty,
    /// Inclusive bounds on the number of characters.
    Length { min: usize, max: usize },
    /// `local@domain` shape.
    Email,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
    pub presence: Presence,
    pub rules: &'static [Rule],
}

impl FieldSpec {
    pub const fn required(name: &'static str, ty: FieldType, rules: &'static [Rule]) -> Self {
        Self {
            name,
            ty,
            presence: Presence::Required,
            rules,
        }
    }

    pub const fn optional(name: &'static str, ty: FieldType, rules: &'static [Rule]) -> Self {
        Self {
            name,
            ty,
            presence: Presence::Optional,
            rules,
        }
    }
}

/// Rule table for one entity.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub entity: &'static str,
    pub fields: &'static [FieldSpec],
}

impl Schema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

pub const USER: Schema = Schema {
    entity: "user",
    fields: &[
        FieldSpec::required("name", FieldType::Text, &[Rule::NotEmpty]),
        FieldSpec::required("email", FieldType::Text, &[Rule::NotEmpty, Rule::Email]),
    ],
};

pub const BOARD: Schema = Schema {
    entity: "board",
    fields: &[
        FieldSpec::required("name", FieldType::Text, &[Rule::NotEmpty]),
        FieldSpec::required("adminUserId", FieldType::Identifier, &[]),
    ],
};

pub const LIST: Schema = Schema {
    entity: "list",
    fields: &[
        FieldSpec::required("name", FieldType::Text, &[Rule::NotEmpty]),
        FieldSpec::required("boardId", FieldType::Identifier, &[]),
    ],
};

pub const CARD: Schema = Schema {
    entity: "card",
    fields: &[
        FieldSpec::required("title", FieldType::Text, &[Rule::Length { min: 5, max: 50 }]),
        FieldSpec::optional(
            "description",
            FieldType::Text,
            &[Rule::Length { min: 0, max: 255 }],
        ),
        FieldSpec::required("due_date", FieldType::Date, &[]),
        FieldSpec::required("listId", FieldType::Identifier, &[]),
        FieldSpec::optional("ownerUserId", FieldType::Identifier, &[]),
    ],
};

pub const CARD_USER: Schema = Schema {
    entity: "card_user",
    fields: &[
        FieldSpec::required("cardId", FieldType::Identifier, &[]),
        FieldSpec::required("userId", FieldType::Identifier, &[]),
        FieldSpec::optional("isOwner", FieldType::Boolean, &[]),
    ],
};
