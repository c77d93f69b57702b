use messages::Language;
use once_cell::sync::Lazy;
use std::sync::Mutex;

pub mod admin;
pub mod calc;
pub mod config;
pub mod data;
pub mod db;
pub mod invoices;
pub mod messages;
pub mod notify;
pub mod orders;
pub mod util;

static LANGUAGE: Lazy<Mutex<Language>> = Lazy::new(|| Mutex::new(Language::EN));

pub fn update_language(new_val: &str) {
    let mut config = LANGUAGE.lock().expect("failed to get LANGUAGE lock");
    *config = Language::from(new_val);
}

pub(crate) fn get_language() -> Language {
    let config = LANGUAGE.lock().expect("failed to get LANGUAGE lock");
    *config
}

/// Dates on invoices are shown the way the id-ID locale writes them.
pub(crate) const DATE_FORMAT: &str = "%-d/%-m/%Y";

#[derive(Debug)]
pub enum Error {
    Validation(String),
    Render(String),
    Store(String),
}

impl From<&Error> for String {
    fn from(val: &Error) -> Self {
        match val {
            Error::Validation(msg) => msg.to_owned(),
            Error::Render(msg) => msg.to_owned(),
            Error::Store(msg) => msg.to_owned(),
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Validation(msg) => {
                write!(f, "{}", msg)
            }
            Error::Render(msg) => {
                write!(f, "{}", msg)
            }
            Error::Store(msg) => {
                write!(f, "{}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}
