use chrono::NaiveDate;
use uuid::Uuid;

use crate::Error;
use crate::calc;
use crate::data::currency::CurrencyValue;
use crate::data::{
    CompanyProfile, DocumentLine, Invoice, InvoiceAmounts, InvoiceDocumentModel, InvoiceKind,
    InvoiceStatus, Order,
};
use crate::db::DB;

const FALLBACK_SERVICE_NAME: &str = "Digital Service";
pub const DEFAULT_PAYMENT_TERMS: &str = "30 days";

#[derive(Debug, Clone)]
pub struct InvoiceRequest {
    pub order: Order,
    pub kind: InvoiceKind,
    pub tax_amount: CurrencyValue,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub notes: Option<String>,
    pub payment_terms: Option<String>,
}

/// All amounts of an invoice, computed once per creation event from the
/// order's total as it stands right now. A down-payment invoice created
/// after the order total was edited therefore splits the edited total,
/// not the one the intake form saw.
pub fn compute_amounts(request: &InvoiceRequest) -> Result<InvoiceAmounts, Error> {
    let order_total = request.order.effective_total();
    let (subtotal, downpayment_amount, remaining_amount) = match request.kind {
        InvoiceKind::Full => (order_total.clone(), CurrencyValue::zero(), order_total),
        InvoiceKind::Downpayment { percentage } => {
            let downpayment = calc::downpayment_of(&order_total, percentage)?;
            let remaining = order_total
                .value()
                .checked_sub(downpayment.value())
                .ok_or_else(|| Error::Validation("amount out of range".into()))?;
            (
                downpayment.clone(),
                downpayment,
                CurrencyValue::new_from_decimal(remaining),
            )
        }
    };
    let total_amount = calc::compute_invoice_totals(&subtotal, &request.tax_amount)?;
    Ok(InvoiceAmounts {
        subtotal,
        tax_amount: request.tax_amount.clone(),
        total_amount,
        downpayment_amount,
        remaining_amount,
    })
}

/// Creates an invoice for an eligible order. The record is only written
/// once all amounts computed; for down-payment invoices the parent
/// order's split is overwritten afterwards, and a store failure there
/// surfaces as an error without rolling the created invoice back.
pub fn create_invoice(db: &DB, request: &InvoiceRequest) -> Result<Invoice, Error> {
    if !request.order.status.is_invoiceable() {
        return Err(Error::Validation(format!(
            "orders with status {} cannot be invoiced",
            request.order.status
        )));
    }

    let amounts = compute_amounts(request)?;
    let invoice_number = db.next_invoice_number()?;

    let invoice = Invoice {
        id: Uuid::now_v7(),
        invoice_number,
        order_id: request.order.id,
        customer: request.order.customer.clone(),
        service_name: request.order.service.name.clone(),
        kind: request.kind,
        status: InvoiceStatus::Draft,
        issue_date: request.issue_date,
        due_date: request.due_date,
        subtotal: amounts.subtotal.clone(),
        tax_amount: amounts.tax_amount.clone(),
        total_amount: amounts.total_amount.clone(),
        notes: request.notes.clone(),
        payment_terms: request.payment_terms.clone(),
    };
    db.create_invoice_and_refetch(&invoice)?;

    if let InvoiceKind::Downpayment { percentage } = request.kind {
        let mut order = request.order.clone();
        order.downpayment_percentage = percentage;
        order.downpayment_amount = amounts.downpayment_amount;
        order.remaining_amount = amounts.remaining_amount;
        db.create_or_update_order_and_refetch(&order)?;
    }

    Ok(invoice)
}

pub fn update_status(
    db: &DB,
    invoice_number: &str,
    next: InvoiceStatus,
) -> Result<Vec<Invoice>, Error> {
    let invoice = db
        .get_invoice(invoice_number)?
        .ok_or_else(|| Error::Store(format!("Invoice {invoice_number} does not exist.")))?;
    if !invoice.status.can_transition_to(next) {
        return Err(Error::Validation(format!(
            "an invoice cannot move from {} to {}",
            invoice.status.name(),
            next.name()
        )));
    }
    db.update_invoice_status_and_refetch(invoice_number, next)
}

/// Flattens an invoice into the self-contained snapshot the renderer
/// consumes. Down-payment invoices carry a single line suffixed with
/// " (DP)"; payment terms fall back to the default when unset.
pub fn document_model(invoice: &Invoice, company: &CompanyProfile) -> InvoiceDocumentModel {
    let service_name = if invoice.service_name.trim().is_empty() {
        FALLBACK_SERVICE_NAME
    } else {
        invoice.service_name.as_str()
    };
    let description = if invoice.kind.is_downpayment() {
        format!("{service_name} (DP)")
    } else {
        service_name.to_owned()
    };

    InvoiceDocumentModel {
        invoice_number: invoice.invoice_number.clone(),
        issue_date: invoice.issue_date,
        due_date: invoice.due_date,
        customer: invoice.customer.clone(),
        company: company.clone(),
        items: vec![DocumentLine {
            description,
            quantity: 1,
            price: invoice.subtotal.clone(),
            total: invoice.subtotal.clone(),
        }],
        subtotal: invoice.subtotal.clone(),
        tax_amount: invoice.tax_amount.clone(),
        total_amount: invoice.total_amount.clone(),
        notes: invoice.notes.clone(),
        payment_terms: invoice
            .payment_terms
            .clone()
            .or_else(|| Some(DEFAULT_PAYMENT_TERMS.to_owned())),
    }
}
