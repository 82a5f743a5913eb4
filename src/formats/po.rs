//! Gettext PO catalog reading and writing.

use crate::formats::FormatError;
use crate::unit::{
    Comment,
    CommentKind,
    TranslationUnit,
};

/// Escapes text for a PO string literal.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Reverses [`escape`]. Unknown escape sequences keep the escaped character.
#[must_use]
pub fn unescape(text: &str) -> String {
    let mut unescaped = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            unescaped.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => unescaped.push('\n'),
            Some('t') => unescaped.push('\t'),
            Some(other) => unescaped.push(other),
            None => unescaped.push('\\'),
        }
    }
    unescaped
}

/// Serializes a unit sequence as a PO catalog. Units are separated by one
/// blank line; comment lines round-trip verbatim.
#[must_use]
pub fn serialize(units: &[TranslationUnit]) -> String {
    let mut out = String::new();
    for (i, unit) in units.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        serialize_unit(unit, &mut out);
    }
    out
}

/// Writes one unit in PO syntax.
fn serialize_unit(unit: &TranslationUnit, out: &mut String) {
    for comment in &unit.comments {
        out.push_str(&comment.text);
        out.push('\n');
    }
    if unit.fuzzy {
        out.push_str("#, fuzzy\n");
    }
    if let Some(context) = &unit.context {
        write_field(out, "msgctxt", context);
    }
    write_field(out, "msgid", &unit.source);
    if let Some(plural) = &unit.plural {
        write_field(out, "msgid_plural", &plural.source);
        write_field(out, "msgstr[0]", &unit.target);
        write_field(out, "msgstr[1]", &plural.target);
    } else {
        write_field(out, "msgstr", &unit.target);
    }
}

/// Writes one directive. Text with embedded newlines is wrapped the way
/// gettext wraps it: an empty string on the directive line, then one quoted
/// continuation line per segment.
fn write_field(out: &mut String, keyword: &str, text: &str) {
    if text.contains('\n') {
        out.push_str(&format!("{keyword} \"\"\n"));
        for segment in text.split_inclusive('\n') {
            out.push_str(&format!("\"{}\"\n", escape(segment)));
        }
    } else {
        out.push_str(&format!("{keyword} \"{}\"\n", escape(text)));
    }
}

/// The directive a continuation line appends to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    /// `msgctxt`
    Context,
    /// `msgid`
    Source,
    /// `msgid_plural`
    PluralSource,
    /// `msgstr` / `msgstr[0]`
    Target,
    /// `msgstr[1]`
    PluralTarget,
}

/// In-progress unit while parsing.
#[derive(Debug, Default)]
struct UnitBuilder {
    /// Unit accumulated so far.
    unit: TranslationUnit,
    /// Last directive seen, for continuation lines.
    last_field: Option<Field>,
    /// Whether any content line has been consumed.
    touched: bool,
    /// Set while the last directive was skipped, so its wrapped continuation
    /// lines are discarded instead of rejected.
    skipping: bool,
}

impl UnitBuilder {
    /// Appends `text` to the field a continuation line belongs to.
    fn append(&mut self, field: Field, text: &str) {
        self.skipping = false;
        let slot = match field {
            Field::Context => self.unit.context.get_or_insert_default(),
            Field::Source => &mut self.unit.source,
            Field::PluralSource => &mut self.unit.plural.get_or_insert_default().source,
            Field::Target => &mut self.unit.target,
            Field::PluralTarget => &mut self.unit.plural.get_or_insert_default().target,
        };
        slot.push_str(text);
        self.last_field = Some(field);
        self.touched = true;
    }

    /// Marks the last directive as skipped.
    fn skip(&mut self) {
        self.last_field = None;
        self.skipping = true;
        self.touched = true;
    }

    /// Finishes the unit, returning it when anything was accumulated.
    fn finish(self) -> Option<TranslationUnit> {
        self.touched.then_some(self.unit)
    }
}

/// Parses a PO catalog into a unit sequence (the header, if present, is the
/// first unit). Obsolete (`#~`) entries and plural forms beyond the second
/// are skipped with a warning; anything else unrecognized is an error.
pub fn parse(text: &str) -> Result<Vec<TranslationUnit>, FormatError> {
    let mut units = Vec::new();
    let mut builder = UnitBuilder::default();

    for (index, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        let line_number = index + 1;

        if line.is_empty() {
            if let Some(unit) = std::mem::take(&mut builder).finish() {
                units.push(unit);
            }
            continue;
        }

        if let Some(rest) = line.strip_prefix('#') {
            parse_comment(rest, &mut builder);
            continue;
        }

        if let Some(rest) = line.strip_prefix("msgctxt") {
            builder.append(Field::Context, &quoted(rest, line_number)?);
        } else if let Some(rest) = line.strip_prefix("msgid_plural") {
            builder.append(Field::PluralSource, &quoted(rest, line_number)?);
        } else if let Some(rest) = line.strip_prefix("msgid") {
            builder.append(Field::Source, &quoted(rest, line_number)?);
        } else if let Some(rest) = line.strip_prefix("msgstr[") {
            let (form, rest) = rest.split_once(']').ok_or_else(|| FormatError::Po {
                line: line_number,
                message: "unterminated plural form index".to_string(),
            })?;
            match form {
                "0" => builder.append(Field::Target, &quoted(rest, line_number)?),
                "1" => builder.append(Field::PluralTarget, &quoted(rest, line_number)?),
                _ => {
                    tracing::warn!(line = line_number, form, "skipping extra plural form");
                    builder.skip();
                }
            }
        } else if let Some(rest) = line.strip_prefix("msgstr") {
            builder.append(Field::Target, &quoted(rest, line_number)?);
        } else if line.starts_with('"') {
            if let Some(field) = builder.last_field {
                builder.append(field, &quoted(line, line_number)?);
            } else if !builder.skipping {
                return Err(FormatError::Po {
                    line: line_number,
                    message: "continuation line without a preceding directive".to_string(),
                });
            }
        } else {
            return Err(FormatError::Po {
                line: line_number,
                message: format!("unrecognized line: {line}"),
            });
        }
    }

    if let Some(unit) = builder.finish() {
        units.push(unit);
    }

    Ok(units)
}

/// Consumes one `#`-prefixed line into the builder.
fn parse_comment(rest: &str, builder: &mut UnitBuilder) {
    let kind = match rest.chars().next() {
        Some(',') => {
            if rest.contains("fuzzy") {
                builder.unit.fuzzy = true;
            }
            builder.touched = true;
            return;
        }
        Some('~') => {
            tracing::warn!("skipping obsolete entry line");
            return;
        }
        Some(':') => CommentKind::Location,
        Some('.') => CommentKind::Developer,
        _ => CommentKind::Translator,
    };
    builder.touched = true;
    builder.unit.comments.push(Comment { kind, text: format!("#{rest}") });
}

/// Extracts and unescapes the quoted payload of a directive line.
fn quoted(rest: &str, line_number: usize) -> Result<String, FormatError> {
    let trimmed = rest.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .map(unescape)
        .ok_or_else(|| FormatError::Po {
            line: line_number,
            message: "expected a quoted string".to_string(),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;
    use crate::unit::PluralText;

    #[rstest]
    #[case::quotes(r#"say "hi""#, r#"say \"hi\""#)]
    #[case::backslash(r"a\b", r"a\\b")]
    #[case::newline("a\nb", r"a\nb")]
    #[case::tab("a\tb", r"a\tb")]
    fn escape_round_trips(#[case] plain: &str, #[case] escaped: &str) {
        assert_that!(escape(plain), eq(escaped));
        assert_that!(unescape(escaped), eq(plain));
    }

    #[rstest]
    fn serializes_simple_unit() {
        let mut unit = TranslationUnit::new("Save");
        unit.add_location("dialog.label");
        unit.target = "Speichern".to_string();

        let text = serialize(std::slice::from_ref(&unit));

        assert_that!(
            text,
            eq("#: dialog.label\nmsgid \"Save\"\nmsgstr \"Speichern\"\n")
        );
    }

    #[rstest]
    fn serializes_plural_and_fuzzy() {
        let mut unit = TranslationUnit::new("%d file");
        unit.plural = Some(PluralText {
            source: "%d files".to_string(),
            target: "%d Dateien".to_string(),
        });
        unit.target = "%d Datei".to_string();
        unit.fuzzy = true;

        let text = serialize(std::slice::from_ref(&unit));

        assert_that!(text, contains_substring("#, fuzzy\n"));
        assert_that!(text, contains_substring("msgid_plural \"%d files\"\n"));
        assert_that!(text, contains_substring("msgstr[0] \"%d Datei\"\n"));
        assert_that!(text, contains_substring("msgstr[1] \"%d Dateien\"\n"));
    }

    #[rstest]
    fn serializes_context() {
        let mut unit = TranslationUnit::new("Open");
        unit.context = Some("menu.file.open".to_string());

        let text = serialize(std::slice::from_ref(&unit));

        assert_that!(text, contains_substring("msgctxt \"menu.file.open\"\n"));
    }

    #[rstest]
    fn wraps_multiline_targets_like_a_header() {
        let unit = TranslationUnit {
            target: "Content-Type: text/plain; charset=UTF-8\nContent-Transfer-Encoding: 8bit\n"
                .to_string(),
            ..TranslationUnit::default()
        };

        let text = serialize(std::slice::from_ref(&unit));

        assert_that!(
            text,
            contains_substring(
                "msgstr \"\"\n\"Content-Type: text/plain; charset=UTF-8\\n\"\n"
            )
        );

        let parsed = parse(&text).unwrap();
        assert_that!(parsed[0].target, eq(unit.target.as_str()));
    }

    #[rstest]
    fn parses_what_it_writes() {
        let mut unit = TranslationUnit::new("Save file");
        unit.add_location("dialog.label");
        unit.comments.insert(0, Comment::developer("shown in the toolbar"));
        unit.target = "Datei speichern".to_string();
        unit.fuzzy = true;

        let text = serialize(std::slice::from_ref(&unit));
        let parsed = parse(&text).unwrap();

        assert_that!(parsed, len(eq(1)));
        assert_that!(parsed[0], eq(&unit));
    }

    #[rstest]
    fn parses_multiline_strings() {
        let text = "msgid \"\"\n\"first \"\n\"second\"\nmsgstr \"\"\n";

        let parsed = parse(text).unwrap();

        assert_that!(parsed[0].source, eq("first second"));
    }

    #[rstest]
    fn parses_header_as_first_unit() {
        let text = concat!(
            "# extracted from app.dtd\n",
            "msgid \"\"\n",
            "msgstr \"\"\n",
            "\"Content-Type: text/plain; charset=UTF-8\\n\"\n",
            "\n",
            "#: dialog.label\n",
            "msgid \"Save\"\n",
            "msgstr \"\"\n",
        );

        let parsed = parse(text).unwrap();

        assert_that!(parsed, len(eq(2)));
        assert_that!(parsed[0].is_header(), eq(true));
        assert_that!(parsed[1].source, eq("Save"));
    }

    #[rstest]
    fn parses_plural_unit() {
        let text = concat!(
            "msgid \"%d file\"\n",
            "msgid_plural \"%d files\"\n",
            "msgstr[0] \"%d Datei\"\n",
            "msgstr[1] \"%d Dateien\"\n",
        );

        let parsed = parse(text).unwrap();
        let plural = parsed[0].plural.as_ref().unwrap();

        assert_that!(parsed[0].target, eq("%d Datei"));
        assert_that!(plural.source, eq("%d files"));
        assert_that!(plural.target, eq("%d Dateien"));
    }

    #[rstest]
    fn skips_wrapped_extra_plural_forms() {
        let text = concat!(
            "msgid \"%d file\"\n",
            "msgid_plural \"%d files\"\n",
            "msgstr[0] \"%d soubor\"\n",
            "msgstr[1] \"%d soubory\"\n",
            "msgstr[2] \"\"\n",
            "\"%d wrapped \"\n",
            "\"over two lines\"\n",
        );

        let parsed = parse(text).unwrap();
        let plural = parsed[0].plural.as_ref().unwrap();

        assert_that!(parsed, len(eq(1)));
        assert_that!(parsed[0].target, eq("%d soubor"));
        assert_that!(plural.target, eq("%d soubory"));
    }

    #[rstest]
    #[case::garbage("not a po line\n")]
    #[case::unquoted_directive("msgid Save\n")]
    #[case::dangling_continuation("\"floating\"\n")]
    fn rejects_malformed_input(#[case] text: &str) {
        assert_that!(parse(text), err(anything()));
    }

    #[rstest]
    fn error_carries_line_number() {
        let text = "msgid \"ok\"\nmsgstr \"ok\"\n\nnonsense\n";

        match parse(text) {
            Err(FormatError::Po { line, .. }) => assert_that!(line, eq(4)),
            other => panic!("expected PO error, got {other:?}"),
        }
    }
}
