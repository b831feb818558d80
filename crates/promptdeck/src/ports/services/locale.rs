//! Locale Provider Port

use crate::domain::Locale;

/// Source of the active display locale
pub trait LocaleProvider: Send + Sync {
    fn current_locale(&self) -> Locale;
}

/// A fixed locale is its own provider
impl LocaleProvider for Locale {
    fn current_locale(&self) -> Locale {
        *self
    }
}
