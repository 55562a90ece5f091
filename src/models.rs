use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Gender partition for the size chart.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// Product category. The set is fixed by the upstream catalog.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
pub enum Category {
    Running,
    Urbano,
}

/// A product row as the server reports it. Rows are read replicas: the
/// client never mutates one to reflect assumed server state, it refetches
/// or removes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Server-assigned, immutable, unique.
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub gender: Option<Gender>,
    pub size: f64,
    pub quantity: i64,
    pub normal_price: Decimal,
    /// Server-assigned on creation; display only.
    #[serde(default)]
    pub entry_date: Option<DateTime<Utc>>,
}

/// Canonical, validated payload for create and update calls. Absent
/// optionals serialize as explicit `null`, never as an empty string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPayload {
    pub name: String,
    pub quantity: i64,
    pub normal_price: Decimal,
    pub size: f64,
    pub brand: Option<String>,
    pub category: Option<Category>,
    pub gender: Option<Gender>,
}

/// One field edit, routed through the form controller's single mutation
/// entry point. Free-text and select fields carry the raw string as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldChange {
    Name(String),
    Brand(String),
    Category(String),
    Gender(Option<Gender>),
    Size(String),
    Quantity(String),
    NormalPrice(String),
}

/// Client-only shadow of a product under edit. Holds raw input strings;
/// it has no identity until a create call succeeds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub brand: String,
    pub category: String,
    pub gender: Option<Gender>,
    pub size: String,
    pub quantity: String,
    pub normal_price: String,
}

impl ProductDraft {
    /// Seed a draft from a fetched product for the update flow.
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            brand: product.brand.clone().unwrap_or_default(),
            category: product
                .category
                .map(|c| c.to_string())
                .unwrap_or_default(),
            gender: product.gender,
            size: format_size(product.size),
            quantity: product.quantity.to_string(),
            normal_price: product.normal_price.to_string(),
        }
    }

    /// Apply one field edit, yielding the next draft. Changing the gender
    /// always resets the size: a chosen size is only meaningful within one
    /// gender's chart.
    #[must_use]
    pub fn apply(&self, change: FieldChange) -> Self {
        let mut next = self.clone();
        match change {
            FieldChange::Name(value) => next.name = value,
            FieldChange::Brand(value) => next.brand = value,
            FieldChange::Category(value) => next.category = value,
            FieldChange::Gender(value) => {
                next.gender = value;
                next.size.clear();
            }
            FieldChange::Size(value) => next.size = value,
            FieldChange::Quantity(value) => next.quantity = value,
            FieldChange::NormalPrice(value) => next.normal_price = value,
        }
        next
    }
}

/// Whole sizes render without a trailing ".0" so drafts round-trip the way
/// a user would have typed them.
fn format_size(size: f64) -> String {
    if size.fract() == 0.0 {
        format!("{:.0}", size)
    } else {
        size.to_string()
    }
}
