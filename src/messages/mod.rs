use crate::get_language;

#[derive(Debug, Clone, Eq, PartialEq, Copy)]
pub enum Language {
    EN,
    ID,
}

impl Language {
    pub fn name(&self) -> &'static str {
        match self {
            Language::EN => "en",
            Language::ID => "id",
        }
    }
}

impl From<String> for Language {
    fn from(value: String) -> Self {
        match value.as_str() {
            "id" => Language::ID,
            _ => Language::EN,
        }
    }
}

impl From<&str> for Language {
    fn from(value: &str) -> Self {
        match value {
            "id" => Language::ID,
            _ => Language::EN,
        }
    }
}

#[derive(Debug)]
pub enum Messages {
    // Orders
    OrderSubmitted,
    CouldNotSubmitOrder,
    RequiredFieldsMissing,
    OrderUpdated,
    CouldNotUpdateOrder,

    // Invoices
    InvoiceCreated,
    CouldNotCreateInvoice,
    InvoiceStatusUpdated,
    CouldNotUpdateInvoiceStatus,
    PDFExported,
    CouldNotExportPDF,

    // Landing content
    SectionSaved,
    CouldNotSaveSection,
    SectionDeleted,
    CouldNotDeleteSection,
}

impl From<Messages> for &str {
    fn from(val: Messages) -> Self {
        val.msg()
    }
}

impl From<&Messages> for &str {
    fn from(val: &Messages) -> Self {
        val.msg()
    }
}

impl From<Messages> for String {
    fn from(val: Messages) -> Self {
        val.msg().to_owned()
    }
}

impl std::fmt::Display for Messages {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.msg())
    }
}

impl Messages {
    pub fn msg(&self) -> &'static str {
        match get_language() {
            Language::EN => match self {
                // Orders
                Messages::OrderSubmitted => "Order submitted! We will contact you shortly.",
                Messages::CouldNotSubmitOrder => "Could not submit the order. Please try again.",
                Messages::RequiredFieldsMissing => "Please fill in the required fields",
                Messages::OrderUpdated => "Order updated successfully",
                Messages::CouldNotUpdateOrder => "Could not update the order",

                // Invoices
                Messages::InvoiceCreated => "Invoice created successfully",
                Messages::CouldNotCreateInvoice => "Could not create the invoice",
                Messages::InvoiceStatusUpdated => "Invoice status updated successfully",
                Messages::CouldNotUpdateInvoiceStatus => "Could not update the invoice status",
                Messages::PDFExported => "Invoice PDF downloaded successfully",
                Messages::CouldNotExportPDF => "Could not download the invoice PDF",

                // Landing content
                Messages::SectionSaved => "Content saved successfully",
                Messages::CouldNotSaveSection => "Could not save the content",
                Messages::SectionDeleted => "Content deleted successfully",
                Messages::CouldNotDeleteSection => "Could not delete the content",
            },
            Language::ID => match self {
                // Orders
                Messages::OrderSubmitted => {
                    "Pesanan berhasil dikirim! Kami akan menghubungi Anda segera."
                }
                Messages::CouldNotSubmitOrder => "Gagal mengirim pesanan. Silakan coba lagi.",
                Messages::RequiredFieldsMissing => "Harap lengkapi data yang wajib diisi",
                Messages::OrderUpdated => "Pesanan berhasil diupdate",
                Messages::CouldNotUpdateOrder => "Gagal mengupdate pesanan",

                // Invoices
                Messages::InvoiceCreated => "Invoice berhasil dibuat",
                Messages::CouldNotCreateInvoice => "Gagal membuat invoice",
                Messages::InvoiceStatusUpdated => "Status invoice berhasil diupdate",
                Messages::CouldNotUpdateInvoiceStatus => "Gagal mengupdate status invoice",
                Messages::PDFExported => "PDF invoice berhasil diunduh",
                Messages::CouldNotExportPDF => "Gagal mengunduh PDF invoice",

                // Landing content
                Messages::SectionSaved => "Konten berhasil disimpan",
                Messages::CouldNotSaveSection => "Gagal menyimpan konten",
                Messages::SectionDeleted => "Konten berhasil dihapus",
                Messages::CouldNotDeleteSection => "Gagal menghapus konten",
            },
        }
    }
}
