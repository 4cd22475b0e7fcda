//! Outbound adapters for the third-party HTTP services the app leans on.
//!
//! - `bible` - verse lookup and keyword search
//! - `translator` - text translation

pub mod bible;
pub mod translator;

pub use bible::{BibleClient, VerseError};
pub use translator::{Translator, TranslateError};
