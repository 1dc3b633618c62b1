//! Built-in cardinal plural rules
//!
//! Each rule returns a form index in gettext order, so the index can be
//! used directly against a catalog's `msgstr[N]` list. Catalogs that ship
//! their own `Plural-Forms` header override these (see [`crate::Catalog`]).

use crate::error::{I18nError, I18nResult};
use polingo_common::Locale;
use tracing::debug;

/// CLDR plural category names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralCategory {
    /// The CLDR keyword for this category
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::One => "one",
            Self::Two => "two",
            Self::Few => "few",
            Self::Many => "many",
            Self::Other => "other",
        }
    }
}

/// Plural rule families, named after the languages that use them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralRule {
    /// `n == 1` is singular: English, German, Spanish, Italian...
    OneOther,
    /// `n <= 1` is singular: French, Brazilian Portuguese...
    ZeroOneOther,
    /// A single form: Japanese, Chinese, Korean...
    NoPlural,
    /// one/few/many by last digits: Russian, Ukrainian, Serbian...
    Slavic,
    /// one/few/many with a strict singular: Polish
    Polish,
    /// one/few/other by value: Czech, Slovak
    Czech,
    /// Six forms: Arabic
    Arabic,
}

const ONE_OTHER: &[&str] = &[
    "af", "bg", "ca", "da", "de", "el", "en", "eo", "es", "et", "eu", "fi", "fo", "fy", "gl",
    "he", "hu", "is", "it", "ka", "kk", "lb", "ml", "mn", "nb", "nl", "nn", "no", "pt", "sq",
    "sv", "sw", "ta", "te", "tr", "ur", "uz",
];
const ZERO_ONE_OTHER: &[&str] = &["ff", "fr", "hy", "kab"];
const NO_PLURAL: &[&str] = &["id", "ja", "km", "ko", "lo", "ms", "my", "th", "vi", "zh"];
const SLAVIC: &[&str] = &["be", "bs", "hr", "ru", "sr", "uk"];

impl PluralRule {
    /// Rule for `locale`, or `None` when the language has no built-in rule
    pub fn lookup(locale: &Locale) -> Option<Self> {
        let language = locale.language();

        // Brazilian Portuguese treats zero as singular, European does not.
        if language == "pt" && locale.region() == Some("BR") {
            return Some(Self::ZeroOneOther);
        }

        if ONE_OTHER.contains(&language) {
            Some(Self::OneOther)
        } else if ZERO_ONE_OTHER.contains(&language) {
            Some(Self::ZeroOneOther)
        } else if NO_PLURAL.contains(&language) {
            Some(Self::NoPlural)
        } else if SLAVIC.contains(&language) {
            Some(Self::Slavic)
        } else {
            match language {
                "pl" => Some(Self::Polish),
                "cs" | "sk" => Some(Self::Czech),
                "ar" => Some(Self::Arabic),
                _ => None,
            }
        }
    }

    /// Rule for `locale`, falling back to [`PluralRule::OneOther`] for unknown languages
    pub fn for_locale(locale: &Locale) -> Self {
        Self::lookup(locale).unwrap_or_else(|| {
            debug!("No plural rule for locale {}, using one/other", locale);
            Self::OneOther
        })
    }

    /// Strict variant of [`PluralRule::for_locale`]
    pub fn try_for_locale(locale: &Locale) -> I18nResult<Self> {
        Self::lookup(locale).ok_or_else(|| I18nError::UnsupportedLocale(locale.to_string()))
    }

    /// Categories in gettext form order
    pub const fn categories(self) -> &'static [PluralCategory] {
        use PluralCategory::{Few, Many, One, Other, Two, Zero};
        match self {
            Self::OneOther | Self::ZeroOneOther => &[One, Other],
            Self::NoPlural => &[Other],
            Self::Slavic | Self::Polish => &[One, Few, Many],
            Self::Czech => &[One, Few, Other],
            Self::Arabic => &[Zero, One, Two, Few, Many, Other],
        }
    }

    /// Number of plural forms a catalog for this rule carries
    pub const fn nplurals(self) -> usize {
        self.categories().len()
    }

    /// Form index for `count`; negative counts use their magnitude
    pub fn form_index(self, count: i64) -> usize {
        let n = count.unsigned_abs();
        let (n10, n100) = (n % 10, n % 100);
        let few_digits = (2..=4).contains(&n10) && !(12..=14).contains(&n100);

        match self {
            Self::OneOther => usize::from(n != 1),
            Self::ZeroOneOther => usize::from(n > 1),
            Self::NoPlural => 0,
            Self::Slavic => {
                if n10 == 1 && n100 != 11 {
                    0
                } else if few_digits {
                    1
                } else {
                    2
                }
            }
            Self::Polish => {
                if n == 1 {
                    0
                } else if few_digits {
                    1
                } else {
                    2
                }
            }
            Self::Czech => match n {
                1 => 0,
                2..=4 => 1,
                _ => 2,
            },
            Self::Arabic => match (n, n100) {
                (0, _) => 0,
                (1, _) => 1,
                (2, _) => 2,
                (_, 3..=10) => 3,
                (_, 11..=99) => 4,
                _ => 5,
            },
        }
    }

    /// CLDR category for `count`
    pub fn categorize(self, count: i64) -> PluralCategory {
        self.categories()[self.form_index(count)]
    }
}

/// Plural form index for `count` in `locale`
///
/// Unknown languages silently use the English one/other rule.
pub fn select_form(locale: &Locale, count: i64) -> usize {
    PluralRule::for_locale(locale).form_index(count)
}
