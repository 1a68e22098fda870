//! Entity records, their schemas and edit drafts

mod draft;
mod envelope;
mod types;

use serde::{de::DeserializeOwned, Serialize};
use std::fmt;

pub use draft::*;
pub use envelope::*;
pub use types::*;

/// How a draft field is entered and validated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text
    Text,
    /// A number, typed as text until submitted
    Number,
    /// A list of line items
    List,
}

/// When a field must be filled in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Required for create and update
    Required,
    /// Required only when creating
    OnCreate,
    /// Never required
    Optional,
}

/// One editable field of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Wire name of the field
    pub name: &'static str,
    /// Input kind
    pub kind: FieldKind,
    /// Presence rule
    pub presence: Presence,
    /// Write-only fields are never copied from a record into an edit draft
    pub write_only: bool,
    /// Fields of each entry of a `List` field
    pub items: &'static [FieldSpec],
}

impl FieldSpec {
    /// A field required on every submission
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            presence: Presence::Required,
            write_only: false,
            items: &[],
        }
    }

    /// A field that may be left blank
    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            presence: Presence::Optional,
            write_only: false,
            items: &[],
        }
    }

    /// A required list whose entries have the fields `items`
    pub const fn list(name: &'static str, items: &'static [FieldSpec]) -> Self {
        Self {
            name,
            kind: FieldKind::List,
            presence: Presence::Required,
            write_only: false,
            items,
        }
    }

    /// A write-only secret (passwords) required when creating
    pub const fn secret(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
            presence: Presence::OnCreate,
            write_only: true,
            items: &[],
        }
    }
}

/// Per-entity configuration: endpoints, response envelope and editable fields
#[derive(Debug, PartialEq, Eq)]
pub struct EntitySchema {
    /// Human readable name used in notifications ("Expense")
    pub label: &'static str,
    /// Collection path used for list; update and delete append the record identifier
    pub resource: &'static str,
    /// Path used for create; differs from `resource` for users
    pub create_path: &'static str,
    /// Key wrapping a single record in create/update responses
    pub envelope_key: &'static str,
    /// Editable fields in form order
    pub fields: &'static [FieldSpec],
}

impl EntitySchema {
    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A persisted business object managed through a remote collection
pub trait Entity:
    Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Endpoint and field configuration for this entity
    fn schema() -> &'static EntitySchema;

    /// Server-assigned identifier; `None` for a record that was never persisted
    fn id(&self) -> Option<&str>;
}
