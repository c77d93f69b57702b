pub mod invoice;

pub(crate) const PT_TO_MM: f32 = 0.352_778_f32;

// Adobe AFM advance widths for the built-in Helvetica face, in
// thousandths of an em, covering ASCII 0x20..=0x7e.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278,
    584, 584, 584, 556, 1015, 667, 667, 722, 722, 667, 611, 778, 722, 278,
    500, 667, 556, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 278, 278, 278, 469, 556, 333, 556, 556, 500, 556, 556,
    278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333, 500,
    278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

const DEFAULT_CHAR_WIDTH: u16 = 556;

/// Width of `text` in millimeters when set in Helvetica at `font_size`
/// points. Characters outside the table fall back to the digit width.
pub(crate) fn get_text_width(text: &str, font_size: f32) -> f32 {
    let units: u32 = text
        .chars()
        .map(|c| {
            let code = c as usize;
            if (0x20..=0x7e).contains(&code) {
                HELVETICA_WIDTHS[code - 0x20] as u32
            } else {
                DEFAULT_CHAR_WIDTH as u32
            }
        })
        .sum();
    units as f32 / 1000.0 * font_size * PT_TO_MM
}
