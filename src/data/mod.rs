use chrono::NaiveDate;
use currency::CurrencyValue;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

pub mod currency;

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// A catalog entry customers can order. Only active services are offered
/// at intake.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ServiceOffering {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: CurrencyValue,
    pub is_active: bool,
}

/// The selected service, denormalized into the order at intake time.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ServiceSnapshot {
    pub id: Uuid,
    pub name: String,
    pub price: CurrencyValue,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::InProgress => "in_progress",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (*self, next),
            (OrderStatus::Pending, OrderStatus::InProgress)
                | (OrderStatus::InProgress, OrderStatus::Completed)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
                | (OrderStatus::InProgress, OrderStatus::Cancelled)
        )
    }

    /// Orders become invoiceable once work has started.
    pub fn is_invoiceable(&self) -> bool {
        matches!(self, OrderStatus::InProgress | OrderStatus::Completed)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub created_on: NaiveDate,
    pub customer: Customer,
    pub service: ServiceSnapshot,
    pub requirements: Option<String>,
    pub budget_range: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub total_amount: CurrencyValue,
    pub downpayment_percentage: u32,
    pub downpayment_amount: CurrencyValue,
    pub remaining_amount: CurrencyValue,
    pub status: OrderStatus,
}

impl Order {
    /// The amount invoices are based on: the staff override when nonzero,
    /// the service list price otherwise.
    pub fn effective_total(&self) -> CurrencyValue {
        if self.total_amount.is_zero() {
            self.service.price.clone()
        } else {
            self.total_amount.clone()
        }
    }

    pub fn downpayment_enabled(&self) -> bool {
        self.downpayment_percentage > 0
    }
}

/// Raw order-form input as it arrives from the intake surface, before
/// the single parsing/validation step in `orders::order_from_draft`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderDraft {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub service_id: Option<Uuid>,
    pub requirements: String,
    pub budget_range: String,
    pub deadline: Option<NaiveDate>,
    pub total_override: Option<CurrencyValue>,
    pub downpayment_percentage: Option<u32>,
}

pub(crate) fn none_if_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
}

impl InvoiceStatus {
    pub fn name(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Sent => "sent",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
        }
    }

    pub fn can_transition_to(&self, next: InvoiceStatus) -> bool {
        matches!(
            (*self, next),
            (InvoiceStatus::Draft, InvoiceStatus::Sent)
                | (InvoiceStatus::Sent, InvoiceStatus::Paid)
                | (InvoiceStatus::Sent, InvoiceStatus::Overdue)
                | (InvoiceStatus::Overdue, InvoiceStatus::Paid)
        )
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum InvoiceKind {
    Full,
    /// The percentage is copied from the request at creation time and
    /// never recomputed afterwards.
    Downpayment {
        percentage: u32,
    },
}

impl InvoiceKind {
    pub fn is_downpayment(&self) -> bool {
        matches!(self, InvoiceKind::Downpayment { .. })
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub invoice_number: String,
    pub order_id: Uuid,
    pub customer: Customer,
    pub service_name: String,
    pub kind: InvoiceKind,
    pub status: InvoiceStatus,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub subtotal: CurrencyValue,
    pub tax_amount: CurrencyValue,
    pub total_amount: CurrencyValue,
    pub notes: Option<String>,
    pub payment_terms: Option<String>,
}

impl PartialOrd for Invoice {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Invoice {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.invoice_number.cmp(&other.invoice_number) {
            Ordering::Equal => {}
            ord => return ord,
        }
        self.id.cmp(&other.id)
    }
}

/// Derived once per invoice-creation event; never persisted on its own.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct InvoiceAmounts {
    pub subtotal: CurrencyValue,
    pub tax_amount: CurrencyValue,
    pub total_amount: CurrencyValue,
    pub downpayment_amount: CurrencyValue,
    pub remaining_amount: CurrencyValue,
}

/// The identity block printed on the right of every invoice.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub website: Option<String>,
    pub tax_number: Option<String>,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        Self {
            name: "Digital Service Company".into(),
            address: "Jl. Digital No. 123, Jakarta".into(),
            phone: "+62 21 1234567".into(),
            email: "info@digitalservice.com".into(),
            website: Some("www.digitalservice.com".into()),
            tax_number: Some("12.345.678.9-012.345".into()),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DocumentLine {
    pub description: String,
    pub quantity: u32,
    pub price: CurrencyValue,
    pub total: CurrencyValue,
}

/// Everything the renderer needs, resolved up front; rendering never
/// looks anything else up.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct InvoiceDocumentModel {
    pub invoice_number: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub customer: Customer,
    pub company: CompanyProfile,
    pub items: Vec<DocumentLine>,
    pub subtotal: CurrencyValue,
    pub tax_amount: CurrencyValue,
    pub total_amount: CurrencyValue,
    pub notes: Option<String>,
    pub payment_terms: Option<String>,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct LandingSection {
    pub id: Uuid,
    pub section_name: String,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub content: Option<String>,
    pub is_enabled: bool,
    pub section_order: i32,
}
