use chrono::NaiveDate;
use uuid::Uuid;

use crate::Error;
use crate::calc;
use crate::data::currency::CurrencyValue;
use crate::data::{Customer, Order, OrderDraft, OrderStatus, ServiceOffering, ServiceSnapshot, none_if_blank};
use crate::db::DB;
use crate::messages::Messages;

/// The single parsing/validation step between the loose intake form and
/// a typed order. Fails fast; nothing is persisted on error.
pub fn order_from_draft(
    draft: OrderDraft,
    service: &ServiceOffering,
    submitted_on: NaiveDate,
) -> Result<Order, Error> {
    if draft.customer_name.trim().is_empty()
        || draft.customer_email.trim().is_empty()
        || draft.service_id.is_none()
    {
        return Err(Error::Validation(Messages::RequiredFieldsMissing.into()));
    }
    if draft.service_id != Some(service.id) {
        return Err(Error::Validation(
            "selected service does not match the offered one".into(),
        ));
    }
    if !service.is_active {
        return Err(Error::Validation(format!(
            "service {} is not offered anymore",
            service.name
        )));
    }

    let base_price = match draft.total_override {
        Some(ref value) if !value.is_zero() => value.clone(),
        _ => service.price.clone(),
    };
    let totals = calc::compute_order_totals(&base_price, draft.downpayment_percentage)?;

    Ok(Order {
        id: Uuid::now_v7(),
        created_on: submitted_on,
        customer: Customer {
            name: draft.customer_name.trim().to_owned(),
            email: draft.customer_email.trim().to_owned(),
            phone: none_if_blank(draft.customer_phone),
            address: none_if_blank(draft.customer_address),
        },
        service: ServiceSnapshot {
            id: service.id,
            name: service.name.clone(),
            price: service.price.clone(),
        },
        requirements: none_if_blank(draft.requirements),
        budget_range: none_if_blank(draft.budget_range),
        deadline: draft.deadline,
        total_amount: totals.total_amount,
        downpayment_percentage: draft.downpayment_percentage.unwrap_or(0),
        downpayment_amount: totals.downpayment_amount,
        remaining_amount: totals.remaining_amount,
        status: OrderStatus::Pending,
    })
}

pub fn submit_order(
    db: &DB,
    draft: OrderDraft,
    service: &ServiceOffering,
    submitted_on: NaiveDate,
) -> Result<Vec<Order>, Error> {
    let order = order_from_draft(draft, service, submitted_on)?;
    db.create_or_update_order_and_refetch(&order)
}

pub fn advance_status(db: &DB, order: &Order, next: OrderStatus) -> Result<Vec<Order>, Error> {
    if !order.status.can_transition_to(next) {
        return Err(Error::Validation(format!(
            "an order cannot move from {} to {}",
            order.status, next
        )));
    }
    let mut updated = order.clone();
    updated.status = next;
    db.create_or_update_order_and_refetch(&updated)
}

/// Staff edit of the order total; the down-payment split is recomputed
/// from the new amounts. A zero total falls back to the list price.
pub fn update_amounts(
    db: &DB,
    order: &Order,
    total_amount: CurrencyValue,
    downpayment_percentage: Option<u32>,
) -> Result<Vec<Order>, Error> {
    let base_price = if total_amount.is_zero() {
        order.service.price.clone()
    } else {
        total_amount
    };
    let totals = calc::compute_order_totals(&base_price, downpayment_percentage)?;

    let mut updated = order.clone();
    updated.total_amount = totals.total_amount;
    updated.downpayment_percentage = downpayment_percentage.unwrap_or(0);
    updated.downpayment_amount = totals.downpayment_amount;
    updated.remaining_amount = totals.remaining_amount;
    db.create_or_update_order_and_refetch(&updated)
}
