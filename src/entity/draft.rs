//! Edit buffers for records that are being created or changed

use serde_json::{Map, Number, Value};

use super::{Entity, EntitySchema, FieldKind, FieldSpec, InventoryItem, Presence, SaleItem};
use crate::error::{Error, Result};

/// An in-progress edit of an entity's editable fields.
///
/// Values stay as entered (strings or numbers) until the draft is validated and turned into a payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    schema: &'static EntitySchema,
    fields: Map<String, Value>,
}

fn blank_value(kind: FieldKind) -> Value {
    match kind {
        FieldKind::Text | FieldKind::Number => Value::String(String::new()),
        FieldKind::List => Value::Array(Vec::new()),
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn as_number(value: &Value) -> Option<Number> {
    match value {
        Value::Number(n) => Some(n.clone()),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .map(Number::from)
                .or_else(|| s.parse::<f64>().ok().and_then(Number::from_f64))
        }
        _ => None,
    }
}

impl Draft {
    /// A blank draft for creating a new record
    pub fn blank(schema: &'static EntitySchema) -> Self {
        let fields = schema
            .fields
            .iter()
            .map(|f| (f.name.to_string(), blank_value(f.kind)))
            .collect();
        Self { schema, fields }
    }

    /// A draft holding the editable fields of an existing record.
    ///
    /// The identifier, server metadata and write-only fields are not copied.
    pub fn from_record<E: Entity>(record: &E) -> Result<Self> {
        let schema = E::schema();
        let value = serde_json::to_value(record)?;
        let mut draft = Self::blank(schema);

        for field in schema.fields.iter().filter(|f| !f.write_only) {
            if let Some(v) = value.get(field.name) {
                draft.fields.insert(field.name.to_string(), v.clone());
            }
        }
        Ok(draft)
    }

    /// The schema this draft edits
    pub fn schema(&self) -> &'static EntitySchema {
        self.schema
    }

    /// Current value of a field
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Replace one field's value
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        match self.fields.get_mut(name) {
            Some(slot) => {
                *slot = value.into();
                Ok(())
            }
            None => Err(Error::validation(format!(
                "{} has no field named '{}'",
                self.schema.label, name
            ))),
        }
    }

    /// Append an entry to a list field
    pub fn push_item(&mut self, name: &str, item: Value) -> Result<()> {
        match self.fields.get_mut(name) {
            Some(Value::Array(items)) => {
                items.push(item);
                Ok(())
            }
            _ => Err(Error::validation(format!("'{}' is not a list field", name))),
        }
    }

    /// Remove an entry from a list field; out-of-range indexes are ignored
    pub fn remove_item(&mut self, name: &str, index: usize) -> Result<()> {
        match self.fields.get_mut(name) {
            Some(Value::Array(items)) => {
                if index < items.len() {
                    items.remove(index);
                }
                Ok(())
            }
            _ => Err(Error::validation(format!("'{}' is not a list field", name))),
        }
    }

    /// Replace one field of entry `index` in list field `name`
    pub fn set_item_field(
        &mut self,
        name: &str,
        index: usize,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<()> {
        let entry = self.item_mut(name, index)?;
        entry.insert(field.to_string(), value.into());
        Ok(())
    }

    /// Set the product of sale line `index`, taking its price and inventory link from `inventory`.
    ///
    /// A product missing from `inventory` clears the price and the link.
    pub fn select_product(
        &mut self,
        index: usize,
        product: &str,
        inventory: &[InventoryItem],
    ) -> Result<()> {
        let selected = inventory.iter().find(|item| item.name == product);
        let price = selected
            .and_then(|item| Number::from_f64(item.price))
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(String::new()));
        let id = selected
            .and_then(|item| item.id.clone())
            .map(Value::String)
            .unwrap_or(Value::Null);

        let entry = self.item_mut("items", index)?;
        entry.insert("product".to_string(), Value::String(product.to_string()));
        entry.insert("price".to_string(), price);
        entry.insert("id".to_string(), id);
        Ok(())
    }

    /// Append a complete sale line
    pub fn push_sale_item(&mut self, item: &SaleItem) -> Result<()> {
        let value = serde_json::to_value(item)?;
        self.push_item("items", value)
    }

    fn item_mut(&mut self, name: &str, index: usize) -> Result<&mut Map<String, Value>> {
        let label = self.schema.label;
        match self.fields.get_mut(name) {
            Some(Value::Array(items)) => match items.get_mut(index) {
                Some(Value::Object(entry)) => Ok(entry),
                _ => Err(Error::validation(format!("{} has no {} entry {}", label, name, index + 1))),
            },
            _ => Err(Error::validation(format!("'{}' is not a list field", name))),
        }
    }

    /// Check required fields and number formats, including those of list entries.
    /// `creating` enables create-only requirements.
    pub fn validate(&self, creating: bool) -> Result<()> {
        check_fields(self.schema.fields, &self.fields, creating, "")
    }

    /// JSON body sent to the server: numbers parsed, blank optional and write-only fields dropped
    pub fn to_payload(&self) -> Value {
        Value::Object(normalize(self.schema.fields, &self.fields))
    }
}

fn check_fields(
    fields: &[FieldSpec],
    values: &Map<String, Value>,
    creating: bool,
    prefix: &str,
) -> Result<()> {
    for field in fields {
        let value = values.get(field.name).unwrap_or(&Value::Null);
        let required = match field.presence {
            Presence::Required => true,
            Presence::OnCreate => creating,
            Presence::Optional => false,
        };

        if is_blank(value) {
            if required {
                return Err(Error::validation(format!("{}{} is required", prefix, field.name)));
            }
            continue;
        }

        match field.kind {
            FieldKind::Number if as_number(value).is_none() => {
                return Err(Error::validation(format!(
                    "{}{} must be a number",
                    prefix, field.name
                )));
            }
            FieldKind::List if !field.items.is_empty() => {
                let Value::Array(entries) = value else {
                    return Err(Error::validation(format!("{}{} must be a list", prefix, field.name)));
                };
                for (i, entry) in entries.iter().enumerate() {
                    let entry_prefix = format!("{}{} {}: ", prefix, field.name, i + 1);
                    match entry {
                        Value::Object(entry) => check_fields(field.items, entry, creating, &entry_prefix)?,
                        _ => {
                            return Err(Error::validation(format!(
                                "{}expected an object",
                                entry_prefix
                            )))
                        }
                    }
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn normalize(fields: &[FieldSpec], values: &Map<String, Value>) -> Map<String, Value> {
    let mut body = values.clone();
    for field in fields {
        let Some(value) = values.get(field.name) else {
            continue;
        };
        if is_blank(value) && (field.write_only || field.presence == Presence::Optional) {
            body.remove(field.name);
            continue;
        }
        let value = match (field.kind, value) {
            (FieldKind::Number, _) => as_number(value).map(Value::Number).unwrap_or_else(|| value.clone()),
            (FieldKind::List, Value::Array(entries)) if !field.items.is_empty() => Value::Array(
                entries
                    .iter()
                    .map(|entry| match entry {
                        Value::Object(entry) => Value::Object(normalize(field.items, entry)),
                        other => other.clone(),
                    })
                    .collect(),
            ),
            _ => value.clone(),
        };
        body.insert(field.name.to_string(), value);
    }
    body
}
