//! Reader for gettext PO documents
//!
//! Supports the subset emitted by common extraction tools: `msgctxt`,
//! `msgid`, `msgid_plural`, `msgstr` / `msgstr[N]`, multi-line strings and
//! the standard C escapes. Entries flagged `fuzzy` and obsolete `#~` entries
//! are skipped; the header entry is always read.

use crate::catalog::{Catalog, MessageEntry};
use crate::error::LoadError;
use polingo_common::Locale;
use tracing::debug;

/// Highest `msgstr[N]` index accepted; no language needs more than six forms.
const MAX_PLURAL_INDEX: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Context,
    Id,
    IdPlural,
    Str(usize),
}

#[derive(Debug, Default)]
struct PoEntry {
    line: usize,
    context: Option<String>,
    msgid: Option<String>,
    msgid_plural: Option<String>,
    msgstr: Vec<String>,
    fuzzy: bool,
}

impl PoEntry {
    fn has_msgstr(&self) -> bool {
        !self.msgstr.is_empty()
    }

    fn start(&mut self, field: Field, text: String, line: usize) {
        if self.line == 0 {
            self.line = line;
        }
        match field {
            Field::Context => self.context = Some(text),
            Field::Id => self.msgid = Some(text),
            Field::IdPlural => self.msgid_plural = Some(text),
            Field::Str(index) => {
                if self.msgstr.len() <= index {
                    self.msgstr.resize(index + 1, String::new());
                }
                self.msgstr[index] = text;
            }
        }
    }

    fn append(&mut self, field: Field, text: &str) {
        let target = match field {
            Field::Context => self.context.as_mut(),
            Field::Id => self.msgid.as_mut(),
            Field::IdPlural => self.msgid_plural.as_mut(),
            Field::Str(index) => self.msgstr.get_mut(index),
        };
        if let Some(target) = target {
            target.push_str(text);
        }
    }

    fn flush_into(&mut self, catalog: &mut Catalog) -> Result<(), LoadError> {
        let entry = std::mem::take(self);

        let Some(msgid) = entry.msgid else {
            if entry.context.is_none() && entry.msgstr.is_empty() {
                return Ok(());
            }
            return Err(parse_error(entry.line, "entry has no msgid"));
        };

        if entry.msgstr.is_empty() {
            return Err(parse_error(
                entry.line,
                format!("msgid \"{msgid}\" has no msgstr"),
            ));
        }

        if msgid.is_empty() && entry.context.is_none() {
            if let Some(block) = entry.msgstr.first() {
                catalog.set_headers_from_block(block);
            }
            return Ok(());
        }

        if entry.fuzzy {
            debug!("Skipping fuzzy entry \"{}\" at line {}", msgid, entry.line);
            return Ok(());
        }

        let plural = entry.msgid_plural.is_some();
        if let Some(message) = MessageEntry::from_forms(entry.msgstr, plural) {
            catalog.insert(entry.context.as_deref(), msgid, message);
        }
        Ok(())
    }
}

/// Parse a PO document into a catalog for `locale`
pub fn parse_po(locale: Locale, document: &str) -> Result<Catalog, LoadError> {
    let mut catalog = Catalog::new(locale);
    let mut entry = PoEntry::default();
    let mut field: Option<Field> = None;

    for (index, raw) in document.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();

        if line.is_empty() {
            entry.flush_into(&mut catalog)?;
            field = None;
            continue;
        }

        if let Some(comment) = line.strip_prefix('#') {
            if entry.has_msgstr() {
                entry.flush_into(&mut catalog)?;
            }
            field = None;
            if let Some(flags) = comment.strip_prefix(',') {
                if flags.split(',').any(|flag| flag.trim() == "fuzzy") {
                    entry.fuzzy = true;
                }
            }
            continue;
        }

        if line.starts_with('"') {
            let text = unquote(line, line_no)?;
            match field {
                Some(current) => entry.append(current, &text),
                None => return Err(parse_error(line_no, "string without a keyword")),
            }
            continue;
        }

        let (keyword, rest) = line
            .split_once(char::is_whitespace)
            .ok_or_else(|| parse_error(line_no, format!("expected a keyword and a string, found '{line}'")))?;
        let next = parse_keyword(keyword, line_no)?;
        let text = unquote(rest.trim_start(), line_no)?;

        if matches!(next, Field::Context | Field::Id) && entry.has_msgstr() {
            entry.flush_into(&mut catalog)?;
        }

        entry.start(next, text, line_no);
        field = Some(next);
    }

    entry.flush_into(&mut catalog)?;
    Ok(catalog)
}

fn parse_keyword(keyword: &str, line: usize) -> Result<Field, LoadError> {
    match keyword {
        "msgctxt" => Ok(Field::Context),
        "msgid" => Ok(Field::Id),
        "msgid_plural" => Ok(Field::IdPlural),
        "msgstr" => Ok(Field::Str(0)),
        other => {
            let index: usize = other
                .strip_prefix("msgstr[")
                .and_then(|s| s.strip_suffix(']'))
                .and_then(|index| index.parse().ok())
                .ok_or_else(|| parse_error(line, format!("unknown keyword '{other}'")))?;
            if index > MAX_PLURAL_INDEX {
                return Err(parse_error(
                    line,
                    format!("plural index {index} exceeds {MAX_PLURAL_INDEX}"),
                ));
            }
            Ok(Field::Str(index))
        }
    }
}

fn unquote(raw: &str, line: usize) -> Result<String, LoadError> {
    let inner = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or_else(|| parse_error(line, format!("expected a quoted string, found '{raw}'")))?;

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some(other) => {
                    return Err(parse_error(line, format!("unknown escape '\\{other}'")));
                }
                None => return Err(parse_error(line, "unterminated string")),
            },
            '"' => return Err(parse_error(line, "unescaped quote inside string")),
            _ => out.push(c),
        }
    }
    Ok(out)
}

fn parse_error(line: usize, message: impl Into<String>) -> LoadError {
    LoadError::Parse {
        line,
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polingo_common::test_utils::catalog_fixtures;

    fn ru() -> Locale {
        Locale::parse("ru").unwrap()
    }

    #[test]
    fn test_parse_russian_fixture() {
        let catalog = parse_po(ru(), catalog_fixtures::RU_PO).unwrap();

        assert_eq!(catalog.header("Language"), Some("ru"));
        assert_eq!(catalog.plural_forms().map(|f| f.nplurals()), Some(3));
        assert_eq!(
            catalog.get(None, "hello").and_then(MessageEntry::singular),
            Some("Привет!")
        );
        assert_eq!(
            catalog.get(Some("menu"), "File").and_then(MessageEntry::singular),
            Some("Файл")
        );

        let item = catalog.get(None, "{n} item").unwrap();
        assert_eq!(item.form(catalog.select_form(1)), Some("{n} предмет"));
        assert_eq!(item.form(catalog.select_form(3)), Some("{n} предмета"));
        assert_eq!(item.form(catalog.select_form(11)), Some("{n} предметов"));
    }

    #[test]
    fn test_fuzzy_entries_skipped() {
        let catalog = parse_po(ru(), catalog_fixtures::RU_PO).unwrap();
        assert!(!catalog.contains(None, "draft"));
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_entries_without_blank_separator() {
        let document = "msgid \"a\"\nmsgstr \"A\"\nmsgid \"b\"\nmsgstr \"B\"\n";
        let catalog = parse_po(ru(), document).unwrap();
        assert_eq!(catalog.get(None, "a").and_then(MessageEntry::singular), Some("A"));
        assert_eq!(catalog.get(None, "b").and_then(MessageEntry::singular), Some("B"));
    }

    #[test]
    fn test_escapes_and_continuations() {
        let document = "msgid \"\"\n\"multi \"\n\"line\"\nmsgstr \"tab\\there \\\"quoted\\\"\\n\"\n";
        let catalog = parse_po(ru(), document).unwrap();
        assert_eq!(
            catalog.get(None, "multi line").and_then(MessageEntry::singular),
            Some("tab\there \"quoted\"\n")
        );
    }

    #[test]
    fn test_obsolete_and_untranslated_entries() {
        let document = "#~ msgid \"old\"\n#~ msgstr \"viejo\"\n\nmsgid \"todo\"\nmsgstr \"\"\n";
        let catalog = parse_po(ru(), document).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_parse_errors_carry_line() {
        let err = parse_po(ru(), "msgid \"a\"\nmsgstr oops\n").unwrap_err();
        assert!(matches!(err, LoadError::Parse { line: 2, .. }));

        let err = parse_po(ru(), "\n\nmsgfoo \"a\"\n").unwrap_err();
        assert!(matches!(err, LoadError::Parse { line: 3, .. }));

        let err = parse_po(ru(), "\"dangling\"\n").unwrap_err();
        assert!(matches!(err, LoadError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_oversized_plural_index_rejected() {
        let document = "msgid \"a\"\nmsgid_plural \"b\"\nmsgstr[18446744073709551615] \"x\"\n";
        let err = parse_po(ru(), document).unwrap_err();
        assert!(matches!(err, LoadError::Parse { line: 3, .. }));

        let err = parse_po(ru(), "msgid \"a\"\nmsgstr[16] \"x\"\n").unwrap_err();
        match err {
            LoadError::Parse { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("exceeds"));
            }
            other => panic!("unexpected error: {other}"),
        }

        let catalog = parse_po(ru(), "msgid \"a\"\nmsgid_plural \"b\"\nmsgstr[0] \"x\"\nmsgstr[15] \"y\"\n").unwrap();
        assert!(catalog.contains(None, "a"));
    }

    #[test]
    fn test_msgid_without_msgstr_is_error() {
        let err = parse_po(ru(), "msgid \"lonely\"\n\n").unwrap_err();
        assert!(matches!(err, LoadError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_bad_escape_rejected() {
        let err = parse_po(ru(), "msgid \"a\\q\"\nmsgstr \"b\"\n").unwrap_err();
        match err {
            LoadError::Parse { message, .. } => assert!(message.contains("escape")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
