//! Invoice arithmetic
//!
//! Line amounts and totals are computed here, never taken from the client.
//! Money is rounded to cents with midpoint-away-from-zero and every amount
//! must fit the `NUMERIC(12,2)` columns it is stored in.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use crate::models::invoice::InvoiceLine;
use crate::utils::errors::AppError;
use crate::utils::validation::{MAX_MONEY, MONEY_SCALE, TAX_RATE_SCALE};

#[derive(Debug, Clone, PartialEq)]
pub struct LineInput {
    pub description: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceTotals {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

fn too_large(what: &str) -> AppError {
    AppError::BadRequest(format!("{} exceeds the maximum of {}", what, *MAX_MONEY))
}

fn within_limit(value: Decimal, what: &str) -> Result<Decimal, AppError> {
    if value > *MAX_MONEY {
        return Err(too_large(what));
    }
    Ok(value)
}

/// Turn client lines into priced invoice lines
pub fn price_lines(inputs: Vec<LineInput>) -> Result<Vec<InvoiceLine>, AppError> {
    if inputs.is_empty() {
        return Err(AppError::BadRequest("An invoice needs at least one line".to_string()));
    }

    inputs
        .into_iter()
        .enumerate()
        .map(|(index, line)| {
            if line.description.trim().is_empty() {
                return Err(AppError::BadRequest(format!("Line {} has no description", index + 1)));
            }
            if line.quantity < 1 {
                return Err(AppError::BadRequest(format!("Line {} quantity must be at least 1", index + 1)));
            }
            if line.unit_price.is_sign_negative() {
                return Err(AppError::BadRequest(format!("Line {} unit price cannot be negative", index + 1)));
            }
            if line.unit_price.normalize().scale() > MONEY_SCALE {
                return Err(AppError::BadRequest(format!(
                    "Line {} unit price cannot have more than 2 decimal places",
                    index + 1
                )));
            }
            let label = format!("Line {} amount", index + 1);
            let unit_price = within_limit(line.unit_price, &format!("Line {} unit price", index + 1))?;
            let amount = unit_price
                .checked_mul(Decimal::from(line.quantity))
                .ok_or_else(|| too_large(&label))?;
            Ok(InvoiceLine {
                description: line.description.trim().to_string(),
                quantity: line.quantity,
                unit_price,
                amount: within_limit(round_money(amount), &label)?,
            })
        })
        .collect()
}

/// `total = (subtotal - discount) * (1 + tax_rate)`
pub fn compute_totals(
    lines: &[InvoiceLine],
    discount: Decimal,
    tax_rate: Decimal,
) -> Result<InvoiceTotals, AppError> {
    if discount.is_sign_negative() {
        return Err(AppError::BadRequest("Discount cannot be negative".to_string()));
    }
    if discount.normalize().scale() > MONEY_SCALE {
        return Err(AppError::BadRequest("Discount cannot have more than 2 decimal places".to_string()));
    }
    if tax_rate.is_sign_negative() || tax_rate > Decimal::ONE || tax_rate.normalize().scale() > TAX_RATE_SCALE {
        return Err(AppError::BadRequest(
            "Tax rate must be between 0 and 1 with at most 4 decimal places".to_string(),
        ));
    }

    let subtotal = lines
        .iter()
        .try_fold(Decimal::ZERO, |sum, line| sum.checked_add(line.amount))
        .ok_or_else(|| too_large("Subtotal"))?;
    let subtotal = within_limit(round_money(subtotal), "Subtotal")?;
    if discount > subtotal {
        return Err(AppError::BadRequest("Discount cannot exceed the subtotal".to_string()));
    }

    let taxable = subtotal - discount;
    let tax = taxable.checked_mul(tax_rate).map(round_money).ok_or_else(|| too_large("Tax"))?;
    let total = taxable.checked_add(tax).ok_or_else(|| too_large("Total"))?;

    Ok(InvoiceTotals {
        subtotal,
        discount,
        tax,
        total: within_limit(total, "Total")?,
    })
}

/// `INV-YYYYMMDD-XXXXXX`, suffix taken from the invoice id
pub fn invoice_number(date: NaiveDate, id: Uuid) -> String {
    let suffix: String = id.simple().to_string().chars().take(6).collect();
    format!("INV-{}-{}", date.format("%Y%m%d"), suffix.to_uppercase())
}
