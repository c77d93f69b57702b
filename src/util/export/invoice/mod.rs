use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use printpdf::{
    BuiltinFont, Color, Mm, PdfDocument, Point, Polygon, Rgb,
    path::{PaintMode, WindingOrder},
};

use crate::{Error, data::InvoiceDocumentModel, util::format_display_date};

use super::get_text_width;

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);

// All layout coordinates are millimeters measured from the top-left
// page corner, converted to PDF space only when the operations are
// replayed onto the page.
const LEFT: f32 = 20.0;
const RIGHT: f32 = 200.0;

const TITLE_SIZE: f32 = 24.0;
const BODY_SIZE: f32 = 12.0;
const SMALL_SIZE: f32 = 10.0;

const TITLE_TOP: f32 = 30.0;
const META_TOP: f32 = 50.0;
const META_PITCH: f32 = 10.0;
const COMPANY_TOP: f32 = 30.0;
const COMPANY_PITCH: f32 = 8.0;
const BILL_TO_TOP: f32 = 100.0;
const BILL_TO_NAME_TOP: f32 = 112.0;
const BILL_TO_EMAIL_TOP: f32 = 122.0;
const BILL_TO_ADDRESS_TOP: f32 = 132.0;
const TABLE_TOP: f32 = 150.0;
const TABLE_WIDTH: f32 = 170.0;
const TABLE_HEADER_HEIGHT: f32 = 12.0;
const TABLE_HEADER_BASELINE: f32 = 8.0;
const ROW_PITCH: f32 = 10.0;
const NOTE_LINE_PITCH: f32 = 5.0;
const NOTES_GAP: f32 = 20.0;
const TERMS_GAP: f32 = 15.0;
const SECTION_TEXT_GAP: f32 = 10.0;

// COL ANCHORS
const DESC_X: f32 = 25.0;
const QTY_X: f32 = 120.0;
const PRICE_X: f32 = 140.0;
const TOTAL_X: f32 = 170.0;
const TOTALS_LABEL_X: f32 = 130.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TextColor {
    /// #2563eb, the accent for the title and the grand total.
    Primary,
    /// #6b7280, the company identity block.
    Gray,
    /// #111827, everything else.
    Dark,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DrawOp {
    Text {
        text: String,
        size: f32,
        x: f32,
        top: f32,
        color: TextColor,
    },
    HeaderBand {
        x: f32,
        top: f32,
        width: f32,
        height: f32,
    },
}

fn text(ops: &mut Vec<DrawOp>, text: impl Into<String>, size: f32, x: f32, top: f32, color: TextColor) {
    ops.push(DrawOp::Text {
        text: text.into(),
        size,
        x,
        top,
        color,
    });
}

/// Lays the model out as an ordered list of draw operations. The
/// header, company, bill-to and table-start blocks sit at fixed
/// offsets; from the item rows on, an explicit cursor advances only
/// for lines actually drawn.
pub(crate) fn layout_document(model: &InvoiceDocumentModel) -> Result<Vec<DrawOp>, Error> {
    if model.invoice_number.trim().is_empty() {
        return Err(Error::Render("invoice number is missing".into()));
    }
    if model.items.is_empty() {
        return Err(Error::Render("invoice has no line items".into()));
    }

    let mut ops = Vec::new();

    // Title and invoice metadata
    text(&mut ops, "INVOICE", TITLE_SIZE, LEFT, TITLE_TOP, TextColor::Primary);
    text(
        &mut ops,
        format!("Invoice #: {}", model.invoice_number),
        BODY_SIZE,
        LEFT,
        META_TOP,
        TextColor::Dark,
    );
    text(
        &mut ops,
        format!("Issue Date: {}", format_display_date(&model.issue_date)),
        BODY_SIZE,
        LEFT,
        META_TOP + META_PITCH,
        TextColor::Dark,
    );
    text(
        &mut ops,
        format!("Due Date: {}", format_display_date(&model.due_date)),
        BODY_SIZE,
        LEFT,
        META_TOP + 2.0 * META_PITCH,
        TextColor::Dark,
    );

    // Company identity, right-aligned; absent lines are filtered out
    // up front so nothing leaves a gap.
    let mut company_lines = vec![
        model.company.name.clone(),
        model.company.address.clone(),
        model.company.phone.clone(),
        model.company.email.clone(),
        model.company.website.clone().unwrap_or_default(),
        model
            .company
            .tax_number
            .as_ref()
            .map(|nr| format!("NPWP: {nr}"))
            .unwrap_or_default(),
    ];
    company_lines.retain(|line| !line.is_empty());
    let mut company_top = COMPANY_TOP;
    for line in company_lines {
        let x = RIGHT - get_text_width(&line, SMALL_SIZE);
        text(&mut ops, line, SMALL_SIZE, x, company_top, TextColor::Gray);
        company_top += COMPANY_PITCH;
    }

    // Bill-to block
    text(&mut ops, "Bill To:", BODY_SIZE, LEFT, BILL_TO_TOP, TextColor::Dark);
    text(
        &mut ops,
        model.customer.name.clone(),
        SMALL_SIZE,
        LEFT,
        BILL_TO_NAME_TOP,
        TextColor::Dark,
    );
    text(
        &mut ops,
        model.customer.email.clone(),
        SMALL_SIZE,
        LEFT,
        BILL_TO_EMAIL_TOP,
        TextColor::Dark,
    );
    if let Some(address) = model.customer.address.as_deref().filter(|a| !a.trim().is_empty()) {
        text(
            &mut ops,
            address,
            SMALL_SIZE,
            LEFT,
            BILL_TO_ADDRESS_TOP,
            TextColor::Dark,
        );
    }

    // Item table
    ops.push(DrawOp::HeaderBand {
        x: LEFT,
        top: TABLE_TOP,
        width: TABLE_WIDTH,
        height: TABLE_HEADER_HEIGHT,
    });
    let header_baseline = TABLE_TOP + TABLE_HEADER_BASELINE;
    text(&mut ops, "Description", SMALL_SIZE, DESC_X, header_baseline, TextColor::Dark);
    text(&mut ops, "Qty", SMALL_SIZE, QTY_X, header_baseline, TextColor::Dark);
    text(&mut ops, "Price", SMALL_SIZE, PRICE_X, header_baseline, TextColor::Dark);
    text(&mut ops, "Total", SMALL_SIZE, TOTAL_X, header_baseline, TextColor::Dark);

    let mut cursor = TABLE_TOP + TABLE_HEADER_HEIGHT + 3.0;
    for item in &model.items {
        text(&mut ops, item.description.clone(), SMALL_SIZE, DESC_X, cursor, TextColor::Dark);
        text(&mut ops, item.quantity.to_string(), SMALL_SIZE, QTY_X, cursor, TextColor::Dark);
        text(&mut ops, item.price.to_rupiah_str(), SMALL_SIZE, PRICE_X, cursor, TextColor::Dark);
        text(&mut ops, item.total.to_rupiah_str(), SMALL_SIZE, TOTAL_X, cursor, TextColor::Dark);
        cursor += ROW_PITCH;
    }

    // Totals block; the tax line is only drawn when there is tax.
    cursor += ROW_PITCH;
    text(&mut ops, "Subtotal:", SMALL_SIZE, TOTALS_LABEL_X, cursor, TextColor::Dark);
    text(
        &mut ops,
        model.subtotal.to_rupiah_str(),
        SMALL_SIZE,
        TOTAL_X,
        cursor,
        TextColor::Dark,
    );
    if !model.tax_amount.is_zero() {
        cursor += ROW_PITCH;
        text(&mut ops, "Tax:", SMALL_SIZE, TOTALS_LABEL_X, cursor, TextColor::Dark);
        text(
            &mut ops,
            model.tax_amount.to_rupiah_str(),
            SMALL_SIZE,
            TOTAL_X,
            cursor,
            TextColor::Dark,
        );
    }
    cursor += ROW_PITCH;
    text(&mut ops, "Total:", BODY_SIZE, TOTALS_LABEL_X, cursor, TextColor::Primary);
    text(
        &mut ops,
        model.total_amount.to_rupiah_str(),
        BODY_SIZE,
        TOTAL_X,
        cursor,
        TextColor::Primary,
    );

    // Trailing sections, skipped entirely when absent
    if let Some(notes) = model.notes.as_deref().filter(|n| !n.trim().is_empty()) {
        cursor += NOTES_GAP;
        text(&mut ops, "Notes:", SMALL_SIZE, LEFT, cursor, TextColor::Dark);
        cursor += SECTION_TEXT_GAP;
        let mut line_top = cursor;
        for line in notes.lines() {
            text(&mut ops, line, SMALL_SIZE, LEFT, line_top, TextColor::Dark);
            line_top += NOTE_LINE_PITCH;
        }
    }
    if let Some(terms) = model.payment_terms.as_deref().filter(|t| !t.trim().is_empty()) {
        cursor += TERMS_GAP;
        text(&mut ops, "Payment Terms:", SMALL_SIZE, LEFT, cursor, TextColor::Dark);
        cursor += SECTION_TEXT_GAP;
        text(&mut ops, terms, SMALL_SIZE, LEFT, cursor, TextColor::Dark);
    }

    Ok(ops)
}

fn text_color(color: TextColor) -> Color {
    match color {
        TextColor::Primary => Color::Rgb(Rgb::new(37.0 / 255.0, 99.0 / 255.0, 235.0 / 255.0, None)),
        TextColor::Gray => {
            Color::Rgb(Rgb::new(107.0 / 255.0, 114.0 / 255.0, 128.0 / 255.0, None))
        }
        TextColor::Dark => Color::Rgb(Rgb::new(17.0 / 255.0, 24.0 / 255.0, 39.0 / 255.0, None)),
    }
}

fn band_color() -> Color {
    Color::Rgb(Rgb::new(245.0 / 255.0, 245.0 / 255.0, 245.0 / 255.0, None))
}

/// Renders the model to PDF bytes. The same model always produces the
/// same operations; no partial output exists on error.
pub fn create_invoice_pdf(model: &InvoiceDocumentModel) -> Result<Vec<u8>, Error> {
    let ops = layout_document(model)?;

    let (doc, page, layer) = PdfDocument::new("Invoice", PAGE_WIDTH, PAGE_HEIGHT, "layer");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| Error::Render(e.to_string()))?;
    let layer = doc.get_page(page).get_layer(layer);

    for op in &ops {
        match op {
            DrawOp::HeaderBand {
                x,
                top,
                width,
                height,
            } => {
                let upper = PAGE_HEIGHT.0 - top;
                let lower = PAGE_HEIGHT.0 - (top + height);
                layer.set_fill_color(band_color());
                layer.add_polygon(Polygon {
                    rings: vec![vec![
                        (Point::new(Mm(*x), Mm(upper)), false),
                        (Point::new(Mm(x + width), Mm(upper)), false),
                        (Point::new(Mm(x + width), Mm(lower)), false),
                        (Point::new(Mm(*x), Mm(lower)), false),
                    ]],
                    mode: PaintMode::Fill,
                    winding_order: WindingOrder::NonZero,
                });
            }
            DrawOp::Text {
                text,
                size,
                x,
                top,
                color,
            } => {
                layer.set_fill_color(text_color(*color));
                layer.use_text(text.as_str(), *size, Mm(*x), Mm(PAGE_HEIGHT.0 - top), &font);
            }
        }
    }

    let mut writer = BufWriter::new(Vec::<u8>::new());
    doc.save(&mut writer)
        .map_err(|e| Error::Render(e.to_string()))?;
    writer
        .into_inner()
        .map_err(|e| Error::Render(e.to_string()))
}

pub fn document_file_name(invoice_number: &str) -> String {
    format!("invoice-{invoice_number}.pdf")
}

/// Renders the model and writes it next to the other exports as
/// `invoice-<number>.pdf` (overwrites the file).
pub fn export_invoice_pdf(
    target_dir: &Path,
    model: &InvoiceDocumentModel,
) -> Result<PathBuf, Error> {
    let bytes = create_invoice_pdf(model)?;
    let path = target_dir.join(document_file_name(&model.invoice_number));
    let mut file = File::create(&path).map_err(|e| Error::Render(e.to_string()))?;
    file.write_all(&bytes)
        .map_err(|e| Error::Render(e.to_string()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::currency::CurrencyValue;
    use crate::data::{CompanyProfile, Customer, DocumentLine};
    use chrono::NaiveDate;

    fn sample_model() -> InvoiceDocumentModel {
        InvoiceDocumentModel {
            invoice_number: "INV-0007".into(),
            issue_date: NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2025, 4, 14).unwrap(),
            customer: Customer {
                name: "Budi Santoso".into(),
                email: "budi@example.com".into(),
                phone: None,
                address: None,
            },
            company: CompanyProfile::default(),
            items: vec![DocumentLine {
                description: "Company Profile Website".into(),
                quantity: 1,
                price: CurrencyValue::new(5_000_000),
                total: CurrencyValue::new(5_000_000),
            }],
            subtotal: CurrencyValue::new(5_000_000),
            tax_amount: CurrencyValue::zero(),
            total_amount: CurrencyValue::new(5_000_000),
            notes: None,
            payment_terms: Some("30 days".into()),
        }
    }

    fn texts(ops: &[DrawOp]) -> Vec<&str> {
        ops.iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                DrawOp::HeaderBand { .. } => None,
            })
            .collect()
    }

    fn find_text<'a>(ops: &'a [DrawOp], needle: &str) -> Option<&'a DrawOp> {
        ops.iter().find(|op| match op {
            DrawOp::Text { text, .. } => text == needle,
            DrawOp::HeaderBand { .. } => false,
        })
    }

    #[test]
    fn fixed_header_placement() {
        let ops = layout_document(&sample_model()).expect("valid model");

        match find_text(&ops, "INVOICE").expect("title exists") {
            DrawOp::Text { size, x, top, color, .. } => {
                assert_eq!(*size, TITLE_SIZE);
                assert_eq!(*x, LEFT);
                assert_eq!(*top, TITLE_TOP);
                assert_eq!(*color, TextColor::Primary);
            }
            DrawOp::HeaderBand { .. } => unreachable!(),
        }

        match find_text(&ops, "Invoice #: INV-0007").expect("number exists") {
            DrawOp::Text { top, .. } => assert_eq!(*top, 50.0),
            DrawOp::HeaderBand { .. } => unreachable!(),
        }
        assert!(find_text(&ops, "Issue Date: 15/3/2025").is_some());
        assert!(find_text(&ops, "Due Date: 14/4/2025").is_some());
    }

    #[test]
    fn company_block_is_right_aligned_without_gaps() {
        let mut model = sample_model();
        model.company.website = None;
        let ops = layout_document(&model).expect("valid model");

        let company_ops: Vec<(&str, f32, f32)> = ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, x, top, color, .. } if *color == TextColor::Gray => {
                    Some((text.as_str(), *x, *top))
                }
                _ => None,
            })
            .collect();

        // name, address, phone, email, tax number; the missing website
        // does not leave a hole in the pitch.
        assert_eq!(company_ops.len(), 5);
        assert_eq!(company_ops[0].0, "Digital Service Company");
        assert_eq!(company_ops[4].0, "NPWP: 12.345.678.9-012.345");
        for (i, (_, _, top)) in company_ops.iter().enumerate() {
            assert_eq!(*top, COMPANY_TOP + i as f32 * COMPANY_PITCH);
        }
        for (line, x, _) in &company_ops {
            let expected = RIGHT - get_text_width(line, SMALL_SIZE);
            assert!((x - expected).abs() < 0.001);
        }
    }

    #[test]
    fn zero_tax_omits_the_tax_line() {
        let ops = layout_document(&sample_model()).expect("valid model");
        assert!(find_text(&ops, "Tax:").is_none());
        assert!(find_text(&ops, "Subtotal:").is_some());
        assert!(find_text(&ops, "Total:").is_some());
        assert!(texts(&ops).contains(&"Rp 5.000.000"));
    }

    #[test]
    fn positive_tax_draws_three_totals_lines() {
        let mut model = sample_model();
        model.subtotal = CurrencyValue::new(8_000_000);
        model.tax_amount = CurrencyValue::new(800_000);
        model.total_amount = CurrencyValue::new(8_800_000);
        model.items[0].price = CurrencyValue::new(8_000_000);
        model.items[0].total = CurrencyValue::new(8_000_000);
        let ops = layout_document(&model).expect("valid model");

        let subtotal = find_text(&ops, "Subtotal:").expect("subtotal exists");
        let tax = find_text(&ops, "Tax:").expect("tax exists");
        let total = find_text(&ops, "Total:").expect("total exists");
        let tops: Vec<f32> = [subtotal, tax, total]
            .iter()
            .map(|op| match op {
                DrawOp::Text { top, .. } => *top,
                DrawOp::HeaderBand { .. } => unreachable!(),
            })
            .collect();
        assert_eq!(tops[1], tops[0] + ROW_PITCH);
        assert_eq!(tops[2], tops[1] + ROW_PITCH);
        assert!(texts(&ops).contains(&"Rp 800.000"));
        assert!(texts(&ops).contains(&"Rp 8.800.000"));

        match total {
            DrawOp::Text { size, color, .. } => {
                assert_eq!(*size, BODY_SIZE);
                assert_eq!(*color, TextColor::Primary);
            }
            DrawOp::HeaderBand { .. } => unreachable!(),
        }
    }

    #[test]
    fn optional_sections_are_skipped_entirely() {
        let mut model = sample_model();
        model.notes = None;
        model.payment_terms = None;
        let ops = layout_document(&model).expect("valid model");
        assert!(find_text(&ops, "Notes:").is_none());
        assert!(find_text(&ops, "Payment Terms:").is_none());

        model.notes = Some("Pembayaran pertama dari dua".into());
        model.payment_terms = Some("30 days".into());
        model.customer.address = Some("Jl. Melati No. 4, Bandung".into());
        let ops = layout_document(&model).expect("valid model");
        assert!(find_text(&ops, "Notes:").is_some());
        assert!(find_text(&ops, "Pembayaran pertama dari dua").is_some());
        assert!(find_text(&ops, "Payment Terms:").is_some());
        assert!(find_text(&ops, "Jl. Melati No. 4, Bandung").is_some());
    }

    #[test]
    fn table_rows_advance_by_fixed_pitch() {
        let mut model = sample_model();
        model.items.push(DocumentLine {
            description: "Maintenance".into(),
            quantity: 1,
            price: CurrencyValue::new(1_000_000),
            total: CurrencyValue::new(1_000_000),
        });
        let ops = layout_document(&model).expect("valid model");

        let band = ops
            .iter()
            .find(|op| matches!(op, DrawOp::HeaderBand { .. }))
            .expect("header band exists");
        match band {
            DrawOp::HeaderBand { x, top, width, height } => {
                assert_eq!(*x, LEFT);
                assert_eq!(*top, TABLE_TOP);
                assert_eq!(*width, TABLE_WIDTH);
                assert_eq!(*height, TABLE_HEADER_HEIGHT);
            }
            DrawOp::Text { .. } => unreachable!(),
        }

        let first = find_text(&ops, "Company Profile Website").expect("first row");
        let second = find_text(&ops, "Maintenance").expect("second row");
        match (first, second) {
            (DrawOp::Text { top: a, .. }, DrawOp::Text { top: b, .. }) => {
                assert_eq!(*a, TABLE_TOP + TABLE_HEADER_HEIGHT + 3.0);
                assert_eq!(*b, a + ROW_PITCH);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn layout_is_deterministic() {
        let model = sample_model();
        let first = layout_document(&model).expect("valid model");
        let second = layout_document(&model).expect("valid model");
        assert_eq!(first, second);
    }

    #[test]
    fn malformed_models_are_rejected() {
        let mut model = sample_model();
        model.invoice_number = "  ".into();
        assert!(matches!(
            layout_document(&model),
            Err(Error::Render(_))
        ));

        let mut model = sample_model();
        model.items.clear();
        assert!(layout_document(&model).is_err());
    }

    #[test]
    fn pdf_bytes_look_like_a_pdf() {
        let bytes = create_invoice_pdf(&sample_model()).expect("can render");
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn file_name_follows_the_invoice_number() {
        assert_eq!(document_file_name("INV-0007"), "invoice-INV-0007.pdf");
    }

    #[test]
    fn export_writes_the_named_file() {
        let dir = std::env::temp_dir().join(format!("faktur-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).expect("can create temp folder");
        let path = export_invoice_pdf(&dir, &sample_model()).expect("can export");
        assert!(path.ends_with("invoice-INV-0007.pdf"));
        let written = std::fs::read(&path).expect("file exists");
        assert!(written.starts_with(b"%PDF"));
    }
}
