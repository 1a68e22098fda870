//! Modal edit session and delete confirmation prompt

use serde_json::Value;

use crate::entity::{Draft, Entity, EntitySchema};
use crate::error::Result;

/// What a form session will do when submitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    /// Create a new record
    Create,
    /// Update the record with this identifier
    Edit(String),
}

/// An open/closed modal bound to one draft.
///
/// Submitting never closes the session by itself; the controller closes it after a successful save,
/// so a failed submission keeps the user's input.
#[derive(Debug, Clone, PartialEq)]
pub struct FormSession {
    schema: &'static EntitySchema,
    open: bool,
    mode: FormMode,
    draft: Draft,
    session: u64,
}

impl FormSession {
    /// A closed session for entities described by `schema`
    pub fn new(schema: &'static EntitySchema) -> Self {
        Self {
            schema,
            open: false,
            mode: FormMode::Create,
            draft: Draft::blank(schema),
            session: 0,
        }
    }

    /// Open with a blank draft
    pub fn open_create(&mut self) {
        self.mode = FormMode::Create;
        self.draft = Draft::blank(self.schema);
        self.open = true;
        self.session += 1;
    }

    /// Open with the editable fields of `record`.
    ///
    /// A record without an identifier cannot be edited and is opened as a create.
    pub fn open_edit<E: Entity>(&mut self, record: &E) -> Result<()> {
        let draft = Draft::from_record(record)?;
        self.mode = match record.id() {
            Some(id) => FormMode::Edit(id.to_string()),
            None => FormMode::Create,
        };
        self.draft = draft;
        self.open = true;
        self.session += 1;
        Ok(())
    }

    /// Change one field of the draft
    pub fn set_field(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.draft.set(name, value)
    }

    /// Close and discard the draft
    pub fn close(&mut self) {
        self.open = false;
        self.mode = FormMode::Create;
        self.draft = Draft::blank(self.schema);
    }

    /// Whether the modal is visible
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Changes every time the modal is opened
    pub fn session_id(&self) -> u64 {
        self.session
    }

    /// Current mode
    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    /// The edit buffer
    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Mutable access to the edit buffer (list items)
    pub fn draft_mut(&mut self) -> &mut Draft {
        &mut self.draft
    }
}

/// First phase of a two-phase delete: remembers the target until confirmed or cancelled
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletePrompt {
    target: Option<String>,
}

impl DeletePrompt {
    /// Open the prompt for `id`, replacing any previous target
    pub fn open(&mut self, id: impl Into<String>) {
        self.target = Some(id.into());
    }

    /// Close the prompt without deleting
    pub fn close(&mut self) {
        self.target = None;
    }

    /// Identifier awaiting confirmation
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Whether the prompt is visible
    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::InventoryItem;
    use serde_json::json;

    fn rice() -> InventoryItem {
        InventoryItem {
            id: Some("inv1".to_string()),
            name: "Rice".to_string(),
            quantity: 4,
            price: 1500.0,
            created_at: None,
            owner: None,
        }
    }

    #[test]
    fn test_open_edit_then_close_discards_draft() {
        let mut form = FormSession::new(InventoryItem::schema());
        assert!(!form.is_open());

        form.open_edit(&rice()).unwrap();
        assert!(form.is_open());
        assert_eq!(form.mode(), &FormMode::Edit("inv1".to_string()));
        assert_eq!(form.draft().get("quantity"), Some(&json!(4)));

        form.set_field("quantity", "6").unwrap();
        assert_eq!(form.draft().get("quantity"), Some(&json!("6")));

        form.close();
        assert!(!form.is_open());
        assert_eq!(form.draft().get("quantity"), Some(&json!("")));
    }

    #[test]
    fn test_open_create_resets_previous_edit() {
        let mut form = FormSession::new(InventoryItem::schema());
        form.open_edit(&rice()).unwrap();
        form.open_create();
        assert_eq!(form.mode(), &FormMode::Create);
        assert_eq!(form.draft().get("name"), Some(&json!("")));
    }

    #[test]
    fn test_delete_prompt() {
        let mut prompt = DeletePrompt::default();
        assert!(!prompt.is_open());
        prompt.open("s1");
        assert_eq!(prompt.target(), Some("s1"));
        prompt.close();
        assert!(prompt.target().is_none());
    }
}
