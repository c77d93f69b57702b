use chrono::NaiveDate;

use crate::DATE_FORMAT;

pub mod export;

pub(crate) fn format_display_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
