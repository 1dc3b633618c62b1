//! Per-locale message catalogs
//!
//! A [`Catalog`] maps `(context, msgid)` pairs to translated entries. It is
//! built once from a serialized document and then shared immutably; a newer
//! document replaces the whole catalog rather than patching it.
//!
//! An empty context is the same as no context, matching the gettext-parser
//! JSON layout where un-contextualized messages live under `""`.

use crate::error::LoadError;
use crate::plural::PluralRule;
use crate::plural_forms::PluralForms;
use polingo_common::Locale;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::warn;

/// Identifies a message within a catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageKey {
    pub context: Option<String>,
    pub msgid: String,
}

impl MessageKey {
    pub fn new(context: Option<&str>, msgid: impl Into<String>) -> Self {
        Self {
            context: context.filter(|c| !c.is_empty()).map(str::to_string),
            msgid: msgid.into(),
        }
    }
}

/// A translated message: one template, or one per plural form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageEntry {
    Single(String),
    Plural(Vec<String>),
}

impl MessageEntry {
    /// Build an entry from raw `msgstr` forms, or `None` when untranslated
    pub fn from_forms(mut forms: Vec<String>, plural: bool) -> Option<Self> {
        if forms.iter().all(String::is_empty) {
            return None;
        }
        if plural || forms.len() > 1 {
            Some(Self::Plural(forms))
        } else {
            forms.pop().map(Self::Single)
        }
    }

    /// The non-plural template (first form of a plural entry)
    pub fn singular(&self) -> Option<&str> {
        let text = match self {
            Self::Single(text) => text.as_str(),
            Self::Plural(forms) => forms.first()?.as_str(),
        };
        (!text.is_empty()).then_some(text)
    }

    /// The template at `index`; a single entry answers every index.
    ///
    /// An index past the last form is clamped to it.
    pub fn form(&self, index: usize) -> Option<&str> {
        let text = match self {
            Self::Single(text) => text.as_str(),
            Self::Plural(forms) => forms.get(index.min(forms.len().checked_sub(1)?))?.as_str(),
        };
        (!text.is_empty()).then_some(text)
    }
}

/// Translations for one locale
#[derive(Debug, Clone)]
pub struct Catalog {
    locale: Locale,
    messages: HashMap<String, HashMap<String, MessageEntry>>,
    headers: HashMap<String, String>,
    plural_forms: Option<PluralForms>,
    plural_rule: PluralRule,
}

impl Catalog {
    /// Create an empty catalog for `locale`
    pub fn new(locale: Locale) -> Self {
        let plural_rule = PluralRule::for_locale(&locale);
        Self {
            locale,
            messages: HashMap::new(),
            headers: HashMap::new(),
            plural_forms: None,
            plural_rule,
        }
    }

    /// Add or replace a message
    pub fn insert(&mut self, context: Option<&str>, msgid: impl Into<String>, entry: MessageEntry) {
        self.messages
            .entry(context.unwrap_or_default().to_string())
            .or_default()
            .insert(msgid.into(), entry);
    }

    /// Record a header; `Plural-Forms` is compiled on the way in.
    ///
    /// A malformed `Plural-Forms` value is logged and ignored, leaving the
    /// built-in rule for the locale in effect.
    pub fn set_header(&mut self, name: &str, value: &str) {
        let name = name.trim().to_ascii_lowercase();
        let value = value.trim().to_string();

        if name == "plural-forms" {
            match PluralForms::parse(&value) {
                Ok(forms) => self.plural_forms = Some(forms),
                Err(e) => warn!("Ignoring Plural-Forms for locale {}: {}", self.locale, e),
            }
        }

        self.headers.insert(name, value);
    }

    /// Parse the header block stored as the `msgstr` of the empty msgid
    pub fn set_headers_from_block(&mut self, block: &str) {
        for line in block.lines() {
            if let Some((name, value)) = line.split_once(':') {
                self.set_header(name, value);
            }
        }
    }

    /// Parse a gettext-parser JSON document
    pub fn from_json(locale: Locale, document: &str) -> Result<Self, LoadError> {
        let parsed: JsonCatalog =
            serde_json::from_str(document).map_err(|source| LoadError::Json {
                locale: locale.to_string(),
                source,
            })?;

        let mut catalog = Self::new(locale);

        for (name, value) in &parsed.headers {
            catalog.set_header(name, value);
        }

        for (context, messages) in parsed.translations {
            for (msgid, raw) in messages {
                if context.is_empty() && msgid.is_empty() {
                    if parsed.headers.is_empty() {
                        if let Some(block) = raw.msgstr.into_forms().first() {
                            catalog.set_headers_from_block(block);
                        }
                    }
                    continue;
                }

                let plural = raw.msgid_plural.is_some();
                let msgid = raw.msgid.unwrap_or(msgid);
                if let Some(entry) = MessageEntry::from_forms(raw.msgstr.into_forms(), plural) {
                    catalog.insert(Some(&context), msgid, entry);
                }
            }
        }

        Ok(catalog)
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Look up an entry; `None` and `Some("")` contexts are equivalent
    pub fn get(&self, context: Option<&str>, msgid: &str) -> Option<&MessageEntry> {
        self.messages
            .get(context.unwrap_or_default())
            .and_then(|messages| messages.get(msgid))
    }

    pub fn contains(&self, context: Option<&str>, msgid: &str) -> bool {
        self.get(context, msgid).is_some()
    }

    /// A header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// The compiled `Plural-Forms` header, if the document carried a valid one
    pub fn plural_forms(&self) -> Option<&PluralForms> {
        self.plural_forms.as_ref()
    }

    /// Plural form index for `count`, preferring the catalog's own header
    pub fn select_form(&self, count: i64) -> usize {
        match &self.plural_forms {
            Some(forms) => forms.index(count),
            None => self.plural_rule.form_index(count),
        }
    }

    /// Number of messages across all contexts
    pub fn len(&self) -> usize {
        self.messages.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every key in the catalog, in no particular order
    pub fn keys(&self) -> impl Iterator<Item = MessageKey> + '_ {
        self.messages.iter().flat_map(|(context, messages)| {
            messages
                .keys()
                .map(move |msgid| MessageKey::new(Some(context), msgid.clone()))
        })
    }
}

#[derive(Deserialize)]
struct JsonCatalog {
    #[serde(default)]
    headers: HashMap<String, String>,
    #[serde(default)]
    translations: HashMap<String, HashMap<String, JsonEntry>>,
}

#[derive(Deserialize)]
struct JsonEntry {
    #[serde(default)]
    msgid: Option<String>,
    #[serde(default)]
    msgid_plural: Option<String>,
    #[serde(default)]
    msgstr: JsonMsgStr,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonMsgStr {
    One(String),
    Many(Vec<String>),
}

impl Default for JsonMsgStr {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl JsonMsgStr {
    fn into_forms(self) -> Vec<String> {
        match self {
            Self::One(text) => vec![text],
            Self::Many(forms) => forms,
        }
    }
}
