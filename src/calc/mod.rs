//! Pure invoice arithmetic. Nothing in here touches the store.

use crate::Error;
use crate::data::currency::CurrencyValue;
use rust_decimal::Decimal;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct OrderTotals {
    pub total_amount: CurrencyValue,
    pub downpayment_amount: CurrencyValue,
    pub remaining_amount: CurrencyValue,
}

/// Splits an order total into a down payment and the remaining balance.
/// With no (or a zero) percentage the whole amount remains open.
pub fn compute_order_totals(
    base_price: &CurrencyValue,
    downpayment_percentage: Option<u32>,
) -> Result<OrderTotals, Error> {
    if base_price.is_negative() {
        return Err(Error::Validation("base price must not be negative".into()));
    }
    let total_amount = base_price.clone();
    match downpayment_percentage {
        None | Some(0) => Ok(OrderTotals {
            downpayment_amount: CurrencyValue::zero(),
            remaining_amount: total_amount.clone(),
            total_amount,
        }),
        Some(percentage) => {
            let downpayment_amount = downpayment_of(&total_amount, percentage)?;
            let remaining = total_amount
                .value
                .checked_sub(downpayment_amount.value)
                .ok_or_else(|| Error::Validation("amount out of range".into()))?;
            Ok(OrderTotals {
                downpayment_amount,
                remaining_amount: CurrencyValue::new_from_decimal(remaining),
                total_amount,
            })
        }
    }
}

/// The down-payment portion of a total, rounded to the whole unit.
pub fn downpayment_of(total: &CurrencyValue, percentage: u32) -> Result<CurrencyValue, Error> {
    if percentage > 100 {
        return Err(Error::Validation(
            "down payment percentage must be between 0 and 100".into(),
        ));
    }
    if total.is_negative() {
        return Err(Error::Validation("total must not be negative".into()));
    }
    let raw = total
        .value
        .checked_mul(Decimal::from(percentage))
        .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
        .ok_or_else(|| Error::Validation("amount out of range".into()))?;
    Ok(CurrencyValue::new_from_decimal(raw))
}

/// An invoice total is the subtotal plus tax; there is no upper bound.
pub fn compute_invoice_totals(
    subtotal: &CurrencyValue,
    tax_amount: &CurrencyValue,
) -> Result<CurrencyValue, Error> {
    if subtotal.is_negative() {
        return Err(Error::Validation("subtotal must not be negative".into()));
    }
    if tax_amount.is_negative() {
        return Err(Error::Validation("tax amount must not be negative".into()));
    }
    let total = subtotal
        .value
        .checked_add(tax_amount.value)
        .ok_or_else(|| Error::Validation("amount out of range".into()))?;
    Ok(CurrencyValue::new_from_decimal(total))
}
