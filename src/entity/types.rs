//! Concrete entities of the dashboard

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Entity, EntitySchema, FieldKind, FieldSpec};
use crate::auth::Role;

/// Reference to the user who recorded an entry; populated by the server on some routes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Owner {
    Populated {
        #[serde(rename = "_id", alias = "id", default)]
        id: Option<String>,
        #[serde(default)]
        name: Option<String>,
    },
    Id(String),
}

impl Owner {
    /// Display name of the owner, if the server populated it
    pub fn name(&self) -> Option<&str> {
        match self {
            Owner::Populated { name, .. } => name.as_deref(),
            Owner::Id(_) => None,
        }
    }
}

static EXPENSE_SCHEMA: EntitySchema = EntitySchema {
    label: "Expense",
    resource: "/expenses",
    create_path: "/expenses",
    envelope_key: "expense",
    fields: &[
        FieldSpec::required("description", FieldKind::Text),
        FieldSpec::required("amount", FieldKind::Number),
    ],
};

/// Money spent by the business
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub description: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Owner>,
}

impl Entity for Expense {
    fn schema() -> &'static EntitySchema {
        &EXPENSE_SCHEMA
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

static INCOME_SCHEMA: EntitySchema = EntitySchema {
    label: "Income",
    resource: "/income",
    create_path: "/income",
    envelope_key: "income",
    fields: &[
        FieldSpec::required("description", FieldKind::Text),
        FieldSpec::required("amount", FieldKind::Number),
    ],
};

/// Money received outside of sales
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub description: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Owner>,
}

impl Entity for Income {
    fn schema() -> &'static EntitySchema {
        &INCOME_SCHEMA
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

static INVENTORY_SCHEMA: EntitySchema = EntitySchema {
    label: "Inventory item",
    resource: "/inventory",
    create_path: "/inventory",
    envelope_key: "inventory",
    fields: &[
        FieldSpec::required("name", FieldKind::Text),
        FieldSpec::required("quantity", FieldKind::Number),
        FieldSpec::required("price", FieldKind::Number),
    ],
};

/// A stocked product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub quantity: i64,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Owner>,
}

impl InventoryItem {
    /// Value of the stock on hand
    pub fn stock_value(&self) -> f64 {
        self.quantity as f64 * self.price
    }
}

impl Entity for InventoryItem {
    fn schema() -> &'static EntitySchema {
        &INVENTORY_SCHEMA
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

static SALE_ITEM_FIELDS: [FieldSpec; 3] = [
    FieldSpec::required("product", FieldKind::Text),
    FieldSpec::required("quantity", FieldKind::Number),
    FieldSpec::optional("price", FieldKind::Number),
];

static SALE_SCHEMA: EntitySchema = EntitySchema {
    label: "Sale",
    resource: "/sales",
    create_path: "/sales",
    envelope_key: "sale",
    fields: &[FieldSpec::list("items", &SALE_ITEM_FIELDS)],
};

/// One line of a sale. `price` is filled in from the inventory by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleItem {
    pub product: String,
    pub quantity: i64,
    #[serde(default)]
    pub price: f64,
    #[serde(rename = "id", alias = "inventoryId", default, skip_serializing_if = "Option::is_none")]
    pub inventory_id: Option<String>,
}

impl SaleItem {
    /// A line for `quantity` units of `item`, priced from the inventory
    pub fn from_inventory(item: &InventoryItem, quantity: i64) -> Self {
        Self {
            product: item.name.clone(),
            quantity,
            price: item.price,
            inventory_id: item.id.clone(),
        }
    }

    /// A line for the product named `product`, looked up in `inventory`.
    ///
    /// Unknown products get a zero price and no inventory link; the server prices them.
    pub fn lookup(product: &str, quantity: i64, inventory: &[InventoryItem]) -> Self {
        match inventory.iter().find(|item| item.name == product) {
            Some(item) => Self::from_inventory(item, quantity),
            None => Self {
                product: product.to_string(),
                quantity,
                price: 0.0,
                inventory_id: None,
            },
        }
    }
}

/// A recorded sale of one or more inventory items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub items: Vec<SaleItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Owner>,
}

impl Sale {
    /// Sum of quantity times price over all lines
    pub fn items_total(&self) -> f64 {
        self.items
            .iter()
            .map(|item| item.quantity as f64 * item.price)
            .sum()
    }

    /// The server's total if present, otherwise the computed one
    pub fn total(&self) -> f64 {
        self.total_amount.unwrap_or_else(|| self.items_total())
    }
}

impl Entity for Sale {
    fn schema() -> &'static EntitySchema {
        &SALE_SCHEMA
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

static USER_SCHEMA: EntitySchema = EntitySchema {
    label: "User",
    resource: "/auth/users",
    create_path: "/auth/register",
    envelope_key: "user",
    fields: &[
        FieldSpec::required("name", FieldKind::Text),
        FieldSpec::required("email", FieldKind::Text),
        FieldSpec::required("role", FieldKind::Text),
        FieldSpec::secret("password"),
    ],
};

/// A dashboard account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Entity for User {
    fn schema() -> &'static EntitySchema {
        &USER_SCHEMA
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_expense_accepts_both_id_spellings() {
        let a: Expense = serde_json::from_value(json!({
            "_id": "e1", "description": "Fuel", "amount": 5000,
            "createdAt": "2024-05-01T10:00:00Z",
            "userId": { "_id": "u1", "name": "Ada" }
        }))
        .unwrap();
        let b: Expense =
            serde_json::from_value(json!({ "id": "e1", "description": "Fuel", "amount": 5000 }))
                .unwrap();

        assert_eq!(a.id(), Some("e1"));
        assert_eq!(b.id(), Some("e1"));
        assert_eq!(a.owner.as_ref().and_then(Owner::name), Some("Ada"));
    }

    #[test]
    fn test_owner_as_plain_id() {
        let income: Income = serde_json::from_value(json!({
            "_id": "i1", "description": "Rent", "amount": 12.5, "userId": "u7"
        }))
        .unwrap();
        assert_eq!(income.owner, Some(Owner::Id("u7".to_string())));
    }

    #[test]
    fn test_sale_totals() {
        let sale: Sale = serde_json::from_value(json!({
            "_id": "s1",
            "items": [
                { "product": "Rice", "quantity": 2, "price": 1500, "id": "inv1" },
                { "product": "Oil", "quantity": 1, "price": 800 }
            ]
        }))
        .unwrap();
        assert_eq!(sale.items_total(), 3800.0);
        assert_eq!(sale.total(), 3800.0);
        assert_eq!(sale.items[0].inventory_id.as_deref(), Some("inv1"));
    }

    #[test]
    fn test_sale_item_from_inventory() {
        let inventory = vec![
            InventoryItem {
                id: Some("inv1".to_string()),
                name: "Rice".to_string(),
                quantity: 40,
                price: 1500.0,
                created_at: None,
                owner: None,
            },
        ];

        let line = SaleItem::lookup("Rice", 3, &inventory);
        assert_eq!(line, SaleItem::from_inventory(&inventory[0], 3));
        assert_eq!(line.price, 1500.0);
        assert_eq!(line.inventory_id.as_deref(), Some("inv1"));
        assert_eq!(
            serde_json::to_value(&line).unwrap(),
            json!({ "product": "Rice", "quantity": 3, "price": 1500.0, "id": "inv1" })
        );

        let unknown = SaleItem::lookup("Sugar", 1, &inventory);
        assert_eq!(unknown.price, 0.0);
        assert!(unknown.inventory_id.is_none());
    }

    #[test]
    fn test_user_never_serializes_password() {
        let user: User = serde_json::from_value(json!({
            "_id": "u1", "name": "Ada", "email": "ada@example.com", "role": "admin"
        }))
        .unwrap();
        assert_eq!(user.role, Role::Admin);
        assert!(serde_json::to_value(&user).unwrap().get("password").is_none());
    }
}
