//! Budget item entity - A single line of an event budget.
//!
//! Each item tracks what the church needs (name, category, supplier), what it was
//! expected to cost, what it actually costs once quoted or confirmed, and how it
//! will be paid. Payment fields only carry meaning once the item is confirmed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where an item stands in the purchasing flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Nothing agreed with a supplier yet
    #[default]
    #[serde(alias = "Pendente")]
    Pending,
    /// A supplier quote has been received
    #[serde(alias = "Cotado")]
    Quoted,
    /// The purchase is agreed and will be paid
    #[serde(alias = "Confirmado")]
    Confirmed,
}

impl ItemStatus {
    /// All statuses in display order.
    pub const ALL: [Self; 3] = [Self::Pending, Self::Quoted, Self::Confirmed];

    /// Whether `actual_price` counts towards the quoted total.
    #[must_use]
    pub const fn is_quoted_or_confirmed(self) -> bool {
        match self {
            Self::Pending => false,
            Self::Quoted | Self::Confirmed => true,
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "Pending",
            Self::Quoted => "Quoted",
            Self::Confirmed => "Confirmed",
        };
        f.write_str(label)
    }
}

/// Budget category of an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    /// Sound, lighting, furniture rental and the like
    #[default]
    #[serde(alias = "Equipamento")]
    Equipment,
    /// Hired services (cleaning, photography, transport)
    #[serde(alias = "Serviço")]
    Service,
    /// Catering and drinks
    #[serde(alias = "Alimentação")]
    Food,
    /// Flowers, banners, decoration
    #[serde(alias = "Decoração")]
    Decoration,
    /// Anything else
    #[serde(alias = "Outro")]
    Other,
}

impl ItemCategory {
    /// All categories in display order.
    pub const ALL: [Self; 5] = [
        Self::Equipment,
        Self::Service,
        Self::Food,
        Self::Decoration,
        Self::Other,
    ];
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Equipment => "Equipment",
            Self::Service => "Service",
            Self::Food => "Food",
            Self::Decoration => "Decoration",
            Self::Other => "Other",
        };
        f.write_str(label)
    }
}

/// Who hands the money to the supplier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// The church pays the supplier directly
    #[serde(alias = "Direto ao Fornecedor")]
    Direct,
    /// A member pays and is reimbursed afterwards
    #[serde(alias = "Reembolso")]
    Reimbursement,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => f.write_str("Direct to supplier"),
            Self::Reimbursement => f.write_str("Reimbursement"),
        }
    }
}

/// Whether the amount is paid at once or split.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentPlan {
    /// Single payment
    #[serde(alias = "À Vista")]
    Full,
    /// Split over `installments_count` payments
    #[serde(alias = "Parcelado")]
    Installments,
}

impl fmt::Display for PaymentPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => f.write_str("Paid in full"),
            Self::Installments => f.write_str("Installments"),
        }
    }
}

/// A budget line item owned by an [`Event`](super::Event).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetItem {
    /// Unique within the parent event
    pub id: String,
    /// What is being budgeted
    pub name: String,
    /// Budget category
    #[serde(default)]
    pub category: ItemCategory,
    /// Supplier name, free text
    #[serde(default)]
    pub supplier: String,
    /// Initially budgeted amount
    #[serde(default)]
    pub estimated_price: f64,
    /// Quoted or paid amount; never derived from `estimated_price`
    #[serde(default)]
    pub actual_price: f64,
    /// Purchasing status
    #[serde(default)]
    pub status: ItemStatus,
    /// Explanation for a gap between estimate and actual price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discrepancy_notes: Option<String>,
    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Who gets paid, set once the item is confirmed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    /// Single payment or installments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_plan: Option<PaymentPlan>,
    /// Number of installments, at least 2 when the plan is `Installments`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installments_count: Option<u32>,
    /// Person to reimburse
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reimbursement_recipient: Option<String>,
    /// Bank account or PIX key of the person to reimburse
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reimbursement_details: Option<String>,
}

/// User input for a new item, before an id is assigned.
///
/// A `status` present in the draft is ignored: new items always start `Pending`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDraft {
    /// Item name; must not be blank
    pub name: String,
    /// Budget category
    #[serde(default)]
    pub category: ItemCategory,
    /// Supplier name, free text
    #[serde(default)]
    pub supplier: String,
    /// Estimate; missing or non-numeric becomes zero
    #[serde(default)]
    pub estimated_price: Option<f64>,
    /// Quoted or paid amount; missing or non-numeric becomes zero
    #[serde(default)]
    pub actual_price: Option<f64>,
    /// Ignored on creation
    #[serde(default)]
    pub status: Option<ItemStatus>,
    /// Free-form notes
    #[serde(default)]
    pub notes: Option<String>,
}

impl ItemDraft {
    /// Starts a draft with just a name; everything else takes its default.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
