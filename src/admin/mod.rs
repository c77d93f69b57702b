use chrono::NaiveDate;
use log::error;
use std::path::PathBuf;
use uuid::Uuid;

use crate::data::currency::CurrencyValue;
use crate::data::{
    CompanyProfile, InvoiceStatus, LandingSection, Order, OrderDraft, OrderStatus, ServiceOffering,
};
use crate::db::DB;
use crate::invoices::{self, InvoiceRequest};
use crate::messages::Messages;
use crate::notify::Notifier;
use crate::util::export::invoice as invoice_pdf;
use crate::{Error, orders};

/// Every mutating operation of the panel. Queries go straight through
/// [`crate::db::DB`]; only mutations carry a success/error toast.
#[derive(Debug)]
pub enum Action {
    SubmitOrder {
        draft: OrderDraft,
        service: ServiceOffering,
        submitted_on: NaiveDate,
    },
    AdvanceOrder {
        order: Order,
        status: OrderStatus,
    },
    UpdateOrderAmounts {
        order: Order,
        total_amount: CurrencyValue,
        downpayment_percentage: Option<u32>,
    },
    CreateInvoice(Box<InvoiceRequest>),
    UpdateInvoiceStatus {
        invoice_number: String,
        status: InvoiceStatus,
    },
    ExportInvoicePdf {
        invoice_number: String,
        target_dir: PathBuf,
    },
    SaveLandingSection(LandingSection),
    DeleteLandingSection(Uuid),
}

/// Runs one panel action and reports the outcome on the notification
/// surface. Validation messages reach the user as-is; everything else
/// collapses into the action's generic failure text.
pub fn handle_action(db: &DB, notifier: &dyn Notifier, company: &CompanyProfile, action: Action) {
    match action {
        Action::SubmitOrder {
            draft,
            service,
            submitted_on,
        } => match orders::submit_order(db, draft, &service, submitted_on) {
            Ok(_) => notifier.notify_success(Messages::OrderSubmitted.msg()),
            Err(e) => {
                error!("Could not submit order: {e}");
                notify_failure(notifier, &e, Messages::CouldNotSubmitOrder);
            }
        },
        Action::AdvanceOrder { order, status } => {
            match orders::advance_status(db, &order, status) {
                Ok(_) => notifier.notify_success(Messages::OrderUpdated.msg()),
                Err(e) => {
                    error!("Could not advance order {}: {e}", order.id);
                    notify_failure(notifier, &e, Messages::CouldNotUpdateOrder);
                }
            }
        }
        Action::UpdateOrderAmounts {
            order,
            total_amount,
            downpayment_percentage,
        } => match orders::update_amounts(db, &order, total_amount, downpayment_percentage) {
            Ok(_) => notifier.notify_success(Messages::OrderUpdated.msg()),
            Err(e) => {
                error!("Could not update amounts of order {}: {e}", order.id);
                notify_failure(notifier, &e, Messages::CouldNotUpdateOrder);
            }
        },
        Action::CreateInvoice(request) => match invoices::create_invoice(db, &request) {
            Ok(_) => notifier.notify_success(Messages::InvoiceCreated.msg()),
            Err(e) => {
                error!("Could not create invoice for order {}: {e}", request.order.id);
                notify_failure(notifier, &e, Messages::CouldNotCreateInvoice);
            }
        },
        Action::UpdateInvoiceStatus {
            invoice_number,
            status,
        } => match invoices::update_status(db, &invoice_number, status) {
            Ok(_) => notifier.notify_success(Messages::InvoiceStatusUpdated.msg()),
            Err(e) => {
                error!("Could not update status of invoice {invoice_number}: {e}");
                notify_failure(notifier, &e, Messages::CouldNotUpdateInvoiceStatus);
            }
        },
        Action::ExportInvoicePdf {
            invoice_number,
            target_dir,
        } => match export_pdf(db, company, &invoice_number, &target_dir) {
            Ok(_) => notifier.notify_success(Messages::PDFExported.msg()),
            Err(e) => {
                error!("Could not export PDF for invoice {invoice_number}: {e}");
                notifier.notify_error(Messages::CouldNotExportPDF.msg());
            }
        },
        Action::SaveLandingSection(section) => {
            match db.upsert_landing_section_and_refetch(&section) {
                Ok(_) => notifier.notify_success(Messages::SectionSaved.msg()),
                Err(e) => {
                    error!("Could not save landing section {}: {e}", section.id);
                    notifier.notify_error(Messages::CouldNotSaveSection.msg());
                }
            }
        }
        Action::DeleteLandingSection(id) => match db.delete_landing_section_and_refetch(&id) {
            Ok(_) => notifier.notify_success(Messages::SectionDeleted.msg()),
            Err(e) => {
                error!("Could not delete landing section {id}: {e}");
                notifier.notify_error(Messages::CouldNotDeleteSection.msg());
            }
        },
    }
}

fn export_pdf(
    db: &DB,
    company: &CompanyProfile,
    invoice_number: &str,
    target_dir: &std::path::Path,
) -> Result<PathBuf, Error> {
    let invoice = db
        .get_invoice(invoice_number)?
        .ok_or_else(|| Error::Store(format!("Invoice {invoice_number} does not exist.")))?;
    let model = invoices::document_model(&invoice, company);
    invoice_pdf::export_invoice_pdf(target_dir, &model)
}

fn notify_failure(notifier: &dyn Notifier, error: &Error, fallback: Messages) {
    match error {
        Error::Validation(msg) => notifier.notify_error(msg),
        _ => notifier.notify_error(fallback.msg()),
    }
}
