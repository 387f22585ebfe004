//! Budget item mutations.
//!
//! Every function takes the current event by reference and returns a new event
//! value; the input is never modified. Unknown item ids are a no-op and yield an
//! unchanged copy. Validation failures return an error and produce no event at all.

use crate::{
    entities::{BudgetItem, Event, ItemCategory, ItemDraft, ItemStatus, PaymentMethod, PaymentPlan},
    errors::{Error, Result},
};
use tracing::debug;
use uuid::Uuid;

/// Smallest allowed number of installments.
pub const MIN_INSTALLMENTS: u32 = 2;

/// A single editable field of a budget item together with its new value.
///
/// Status is deliberately absent: it changes only through [`set_item_status`],
/// which applies the on-confirm defaulting policy.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemField {
    /// New name; must not be blank
    Name(String),
    /// New category
    Category(ItemCategory),
    /// New supplier
    Supplier(String),
    /// New estimate; must be non-negative
    EstimatedPrice(f64),
    /// New actual price; must be non-negative
    ActualPrice(f64),
    /// Explanation for a price gap, or `None` to clear it
    DiscrepancyNotes(Option<String>),
    /// Free-form notes, or `None` to clear them
    Notes(Option<String>),
    /// Payment method, or `None` to clear it
    PaymentMethod(Option<PaymentMethod>),
    /// Payment plan, or `None` to clear it
    PaymentPlan(Option<PaymentPlan>),
    /// Number of installments; at least [`MIN_INSTALLMENTS`]
    InstallmentsCount(u32),
    /// Person to reimburse
    ReimbursementRecipient(Option<String>),
    /// Bank account or PIX key of the person to reimburse
    ReimbursementDetails(Option<String>),
}

/// Rejects negative or non-finite amounts.
fn validate_amount(amount: f64) -> Result<f64> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(amount)
}

/// Draft amounts: missing or non-numeric input counts as zero, negatives are rejected.
fn draft_amount(amount: Option<f64>) -> Result<f64> {
    match amount {
        Some(value) if value.is_finite() => validate_amount(value),
        _ => Ok(0.0),
    }
}

/// Returns a copy of `event` with `f` applied to the item matching `item_id`.
fn map_item<F>(event: &Event, item_id: &str, f: F) -> Result<Event>
where
    F: FnOnce(&mut BudgetItem) -> Result<()>,
{
    let mut updated = event.clone();
    match updated.items.iter_mut().find(|item| item.id == item_id) {
        Some(item) => f(item)?,
        None => debug!("No item {} in event {}, nothing to update", item_id, event.id),
    }
    Ok(updated)
}

/// Appends a new item built from `draft`.
///
/// The item gets a fresh id, missing amounts become zero and the status is
/// always `Pending`, whatever the draft says.
///
/// # Errors
/// Returns [`Error::Validation`] if the draft name is empty or blank and
/// [`Error::InvalidAmount`] if an amount is negative.
pub fn add_item(event: &Event, draft: ItemDraft) -> Result<Event> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(Error::validation("Item name cannot be empty"));
    }

    let item = BudgetItem {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        category: draft.category,
        supplier: draft.supplier,
        estimated_price: draft_amount(draft.estimated_price)?,
        actual_price: draft_amount(draft.actual_price)?,
        status: ItemStatus::Pending,
        discrepancy_notes: None,
        notes: draft.notes,
        payment_method: None,
        payment_plan: None,
        installments_count: None,
        reimbursement_recipient: None,
        reimbursement_details: None,
    };

    let mut updated = event.clone();
    updated.items.push(item);
    Ok(updated)
}

/// Removes the item with `item_id`. Never fails; an unknown id changes nothing.
#[must_use]
pub fn remove_item(event: &Event, item_id: &str) -> Event {
    let mut updated = event.clone();
    updated.items.retain(|item| item.id != item_id);
    updated
}

/// Replaces one field on the item with `item_id`.
///
/// # Errors
/// Returns [`Error::InvalidAmount`] for negative prices and [`Error::Validation`]
/// for an installment count below [`MIN_INSTALLMENTS`] or an empty name.
pub fn update_item_field(event: &Event, item_id: &str, field: ItemField) -> Result<Event> {
    map_item(event, item_id, |item| {
        match field {
            ItemField::Name(name) => {
                if name.trim().is_empty() {
                    return Err(Error::validation("Item name cannot be empty"));
                }
                item.name = name;
            }
            ItemField::Category(category) => item.category = category,
            ItemField::Supplier(supplier) => item.supplier = supplier,
            ItemField::EstimatedPrice(price) => item.estimated_price = validate_amount(price)?,
            ItemField::ActualPrice(price) => item.actual_price = validate_amount(price)?,
            ItemField::DiscrepancyNotes(notes) => item.discrepancy_notes = notes,
            ItemField::Notes(notes) => item.notes = notes,
            ItemField::PaymentMethod(method) => item.payment_method = method,
            ItemField::PaymentPlan(plan) => item.payment_plan = plan,
            ItemField::InstallmentsCount(count) => {
                if count < MIN_INSTALLMENTS {
                    return Err(Error::validation(format!(
                        "Installments must be at least {MIN_INSTALLMENTS}, got {count}"
                    )));
                }
                item.installments_count = Some(count);
            }
            ItemField::ReimbursementRecipient(recipient) => {
                item.reimbursement_recipient = recipient;
            }
            ItemField::ReimbursementDetails(details) => item.reimbursement_details = details,
        }
        Ok(())
    })
}

/// On-confirm defaulting policy.
///
/// When an item becomes `Confirmed` and has no payment method yet, it is set to
/// pay the supplier directly, in full. Items that already have a method keep it,
/// and leaving `Confirmed` later never clears these fields.
pub fn apply_on_confirm_defaults(item: &mut BudgetItem) {
    match item.status {
        ItemStatus::Confirmed => {
            if item.payment_method.is_none() {
                item.payment_method = Some(PaymentMethod::Direct);
                item.payment_plan = Some(PaymentPlan::Full);
            }
        }
        ItemStatus::Pending | ItemStatus::Quoted => {}
    }
}

/// Sets the status of the item with `item_id` and applies
/// [`apply_on_confirm_defaults`].
#[must_use]
pub fn set_item_status(event: &Event, item_id: &str, status: ItemStatus) -> Event {
    let mut updated = event.clone();
    if let Some(item) = updated.items.iter_mut().find(|item| item.id == item_id) {
        item.status = status;
        apply_on_confirm_defaults(item);
    }
    updated
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::{sample_event, sample_item};

    fn event_with_item() -> (Event, String) {
        let item = sample_item("Sound system", 500.0, 0.0, ItemStatus::Pending);
        let id = item.id.clone();
        (sample_event("Conference", "2025-07-12", vec![item]), id)
    }

    #[test]
    fn test_add_item_defaults() {
        let event = sample_event("Conference", "2025-07-12", Vec::new());
        let draft = ItemDraft {
            name: "Banner".to_string(),
            category: ItemCategory::Decoration,
            supplier: "PrintCo".to_string(),
            estimated_price: Some(120.0),
            actual_price: None,
            status: Some(ItemStatus::Confirmed),
            notes: None,
        };

        let updated = add_item(&event, draft).unwrap();
        assert!(event.items.is_empty(), "input must not be mutated");
        assert_eq!(updated.items.len(), 1);

        let item = &updated.items[0];
        assert_eq!(item.status, ItemStatus::Pending);
        assert_eq!(item.estimated_price, 120.0);
        assert_eq!(item.actual_price, 0.0);
        assert_eq!(item.category, ItemCategory::Decoration);
        assert!(item.payment_method.is_none());
        assert!(!item.id.is_empty());
    }

    #[test]
    fn test_add_item_appends_in_order_with_unique_ids() {
        let event = sample_event("Conference", "2025-07-12", Vec::new());
        let event = add_item(&event, ItemDraft::named("First")).unwrap();
        let event = add_item(&event, ItemDraft::named("Second")).unwrap();

        assert_eq!(event.items[0].name, "First");
        assert_eq!(event.items[1].name, "Second");
        assert_ne!(event.items[0].id, event.items[1].id);
    }

    #[test]
    fn test_add_item_empty_name_fails_without_mutation() {
        let (event, _) = event_with_item();
        for name in ["", "   "] {
            let result = add_item(&event, ItemDraft::named(name));
            assert!(matches!(result, Err(Error::Validation { .. })));
        }
        assert_eq!(event.items.len(), 1);
    }

    #[test]
    fn test_add_item_non_numeric_amount_counts_as_zero() {
        let event = sample_event("Conference", "2025-07-12", Vec::new());
        let draft = ItemDraft {
            estimated_price: Some(f64::NAN),
            ..ItemDraft::named("Chairs")
        };
        let updated = add_item(&event, draft).unwrap();
        assert_eq!(updated.items[0].estimated_price, 0.0);
    }

    #[test]
    fn test_add_item_negative_amount_fails() {
        let event = sample_event("Conference", "2025-07-12", Vec::new());
        let draft = ItemDraft {
            estimated_price: Some(-10.0),
            ..ItemDraft::named("Chairs")
        };
        assert!(matches!(
            add_item(&event, draft),
            Err(Error::InvalidAmount { amount: -10.0 })
        ));
    }

    #[test]
    fn test_remove_item() {
        let (event, id) = event_with_item();
        assert!(remove_item(&event, &id).items.is_empty());
        assert_eq!(remove_item(&event, "missing"), event);
    }

    #[test]
    fn test_update_item_field() {
        let (event, id) = event_with_item();

        let updated = update_item_field(&event, &id, ItemField::ActualPrice(450.0)).unwrap();
        assert_eq!(updated.items[0].actual_price, 450.0);
        assert_eq!(event.items[0].actual_price, 0.0);

        let updated = update_item_field(&updated, &id, ItemField::Supplier("LocaSom".into())).unwrap();
        assert_eq!(updated.items[0].supplier, "LocaSom");
        assert_eq!(updated.items[0].actual_price, 450.0);
    }

    #[test]
    fn test_update_item_field_unknown_id_is_noop() {
        let (event, _) = event_with_item();
        let updated = update_item_field(&event, "nope", ItemField::EstimatedPrice(1.0)).unwrap();
        assert_eq!(updated, event);
    }

    #[test]
    fn test_update_item_field_validation() {
        let (event, id) = event_with_item();
        assert!(update_item_field(&event, &id, ItemField::EstimatedPrice(-1.0))
            .unwrap_err()
            .is_validation());
        assert!(update_item_field(&event, &id, ItemField::InstallmentsCount(1))
            .unwrap_err()
            .is_validation());
        assert!(update_item_field(&event, &id, ItemField::Name(" ".into()))
            .unwrap_err()
            .is_validation());

        let updated = update_item_field(&event, &id, ItemField::InstallmentsCount(4)).unwrap();
        assert_eq!(updated.items[0].installments_count, Some(4));
    }

    #[test]
    fn test_confirm_seeds_payment_defaults() {
        let (event, id) = event_with_item();
        let updated = set_item_status(&event, &id, ItemStatus::Confirmed);

        let item = updated.item(&id).unwrap();
        assert_eq!(item.status, ItemStatus::Confirmed);
        assert_eq!(item.payment_method, Some(PaymentMethod::Direct));
        assert_eq!(item.payment_plan, Some(PaymentPlan::Full));
    }

    #[test]
    fn test_confirm_keeps_existing_payment_method() {
        let (event, id) = event_with_item();
        let event = update_item_field(
            &event,
            &id,
            ItemField::PaymentMethod(Some(PaymentMethod::Reimbursement)),
        )
        .unwrap();

        let updated = set_item_status(&event, &id, ItemStatus::Confirmed);
        let item = updated.item(&id).unwrap();
        assert_eq!(item.payment_method, Some(PaymentMethod::Reimbursement));
        assert_eq!(item.payment_plan, None);
    }

    #[test]
    fn test_unconfirm_keeps_payment_fields() {
        let (event, id) = event_with_item();
        let confirmed = set_item_status(&event, &id, ItemStatus::Confirmed);
        let reverted = set_item_status(&confirmed, &id, ItemStatus::Quoted);

        let item = reverted.item(&id).unwrap();
        assert_eq!(item.status, ItemStatus::Quoted);
        assert_eq!(item.payment_method, Some(PaymentMethod::Direct));
        assert_eq!(item.payment_plan, Some(PaymentPlan::Full));
    }

    #[test]
    fn test_non_confirm_status_does_not_seed() {
        let (event, id) = event_with_item();
        let updated = set_item_status(&event, &id, ItemStatus::Quoted);
        assert!(updated.item(&id).unwrap().payment_method.is_none());
    }

    #[test]
    fn test_on_confirm_policy_in_isolation() {
        let mut item = sample_item("Cake", 80.0, 75.0, ItemStatus::Pending);
        apply_on_confirm_defaults(&mut item);
        assert!(item.payment_method.is_none());

        item.status = ItemStatus::Confirmed;
        apply_on_confirm_defaults(&mut item);
        assert_eq!(item.payment_method, Some(PaymentMethod::Direct));
        assert_eq!(item.payment_plan, Some(PaymentPlan::Full));
    }
}
