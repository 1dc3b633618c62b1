//! Cross-field validation of the supported locale set.

use crate::schema::Config;
use std::borrow::Cow;
use std::collections::HashSet;
use validator::{ValidationError, ValidationErrors};

fn error(code: &'static str, message: String) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Owned(message));
    error
}

/// Checks that the active and fallback locales are supported and that the
/// supported set has no duplicates.
pub fn validate_locale_set(config: &Config) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if !config.supports(&config.locale) {
        errors.add(
            "locale",
            error(
                "locale_not_supported",
                format!("Initial locale '{}' is not in the supported locales", config.locale),
            ),
        );
    }

    if let Some(fallback) = &config.fallback {
        if !config.supports(fallback) {
            errors.add(
                "fallback",
                error(
                    "fallback_not_supported",
                    format!("Fallback locale '{fallback}' is not in the supported locales"),
                ),
            );
        }
    }

    let mut seen = HashSet::new();
    for locale in &config.locales {
        if !seen.insert(locale) {
            errors.add(
                "locales",
                error("duplicate_locale", format!("Locale '{locale}' is listed twice")),
            );
        }
    }

    if errors.errors().is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
