//! Report formatting.
//!
//! This module turns events into display strings: the single supported currency
//! format, chart labels, the printable budget report, and the prompt sent to the
//! advisory service. All functions are framework-agnostic and return plain text.

use crate::{
    core::aggregate::{event_summary, has_discrepancy, item_budget, total_budget},
    core::date::format_event_date,
    entities::{Event, ItemStatus, PaymentMethod, PaymentPlan},
};
use std::fmt::Write;

/// Names longer than this are shortened on chart axes.
const CHART_LABEL_MAX: usize = 15;
/// Characters kept from a shortened chart label.
const CHART_LABEL_KEEP: usize = 12;

/// Formats an amount as Brazilian reais, e.g. `R$ 1.234,56`.
///
/// # Arguments
/// * `amount` - Amount in reais; negative amounts get a leading minus sign
///
/// # Returns
/// Formatted string like `"R$ 1.234,56"` or `"-R$ 30,00"`
#[must_use]
pub fn format_currency(amount: f64) -> String {
    // Cast safety: budget amounts are far below u64::MAX cents; rounding to cents is intended.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}R$ {grouped},{fraction:02}")
}

/// Shortens an event name for chart axes: `"Youth Conference 2025"` → `"Youth Confer..."`.
#[must_use]
pub fn chart_label(name: &str) -> String {
    if name.chars().count() > CHART_LABEL_MAX {
        let kept: String = name.chars().take(CHART_LABEL_KEEP).collect();
        format!("{kept}...")
    } else {
        name.to_string()
    }
}

/// Describes how a confirmed item will be paid, e.g.
/// `"Reimbursement (Installments x3) | To: Ana - PIX 123"`.
#[must_use]
pub fn payment_line(
    method: PaymentMethod,
    plan: Option<PaymentPlan>,
    installments: Option<u32>,
    recipient: Option<&str>,
    details: Option<&str>,
) -> String {
    let mut line = method.to_string();
    match plan {
        Some(PaymentPlan::Installments) => {
            let count = installments.unwrap_or(2);
            let _ = write!(line, " ({} x{count})", PaymentPlan::Installments);
        }
        Some(PaymentPlan::Full) => {
            let _ = write!(line, " ({})", PaymentPlan::Full);
        }
        None => {}
    }
    if method == PaymentMethod::Reimbursement {
        let _ = write!(
            line,
            " | To: {} - {}",
            recipient.unwrap_or_default(),
            details.unwrap_or_default()
        );
    }
    line
}

/// Renders the printable budget report for one event.
///
/// One line per item with category, supplier, status and the amount it
/// contributes, followed by payment details for confirmed items and the totals.
#[must_use]
pub fn render_event_report(event: &Event) -> String {
    let summary = event_summary(event);
    let date = format_event_date(&event.date).unwrap_or_else(|_| event.date.clone());

    let mut out = String::new();
    let _ = writeln!(out, "Budget report: {}", event.name);
    let _ = writeln!(out, "Date: {date} | Status: {}", event.status);
    if !event.description.is_empty() {
        let _ = writeln!(out, "{}", event.description);
    }
    let _ = writeln!(out);

    for item in &event.items {
        let amount = if item.status == ItemStatus::Pending {
            item.estimated_price
        } else {
            item.actual_price
        };
        let supplier = if item.supplier.is_empty() { "-" } else { item.supplier.as_str() };
        let _ = writeln!(
            out,
            "- {} [{}] {} | {} | {}",
            item.name,
            item.category,
            supplier,
            item.status,
            format_currency(amount)
        );

        if item.status == ItemStatus::Confirmed {
            if let Some(method) = item.payment_method {
                let _ = writeln!(
                    out,
                    "    Payment: {}",
                    payment_line(
                        method,
                        item.payment_plan,
                        item.installments_count,
                        item.reimbursement_recipient.as_deref(),
                        item.reimbursement_details.as_deref(),
                    )
                );
            }
            if has_discrepancy(item) {
                let _ = writeln!(
                    out,
                    "    Estimated {} | {}",
                    format_currency(item.estimated_price),
                    item.discrepancy_notes.as_deref().unwrap_or("no explanation given")
                );
            }
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Estimated total: {}", format_currency(summary.estimated));
    let _ = writeln!(out, "Quoted total: {}", format_currency(summary.quoted));
    let _ = writeln!(out, "Confirmed total: {}", format_currency(summary.confirmed));
    let _ = write!(out, "Event budget: {}", format_currency(total_budget(event)));
    out
}

/// Builds the text prompt sent to the advisory service for one event.
#[must_use]
pub fn advisory_prompt(event: &Event, language: &str) -> String {
    let summary = event_summary(event);
    let items = event
        .items
        .iter()
        .map(|item| {
            format!(
                "{} ({}, {}): {}",
                item.name,
                item.category,
                item.status,
                format_currency(item_budget(item))
            )
        })
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Review the budget of the church event \"{name}\".\n\
         Date: {date}.\n\
         Description: {description}.\n\
         Estimated total: {estimated}.\n\
         Confirmed total: {confirmed}.\n\
         Current items: {items}.\n\n\
         Give practical tips to save money and point out essential items that may be \
         missing for this kind of event. Be encouraging and specific to a church \
         context. Answer in {language}.",
        name = event.name,
        date = event.date,
        description = event.description,
        estimated = format_currency(summary.estimated),
        confirmed = format_currency(summary.confirmed),
    )
}
