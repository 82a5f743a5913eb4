//! Markup-entity (DTD) definition reading.

use std::collections::{
    HashMap,
    HashSet,
};

use crate::formats::FormatError;
use crate::unit::{
    Comment,
    TranslationUnit,
};

/// Localization note announcing an entity that must not be translated.
const DONT_TRANSLATE: &str = "DONT_TRANSLATE";

/// Note attached to size entities, which carry layout numbers rather than
/// translatable text.
const SIZE_NOTE: &str = "Do not translate this. Only change the numeric values if you need this \
                         dialogue box to appear bigger.";

/// Parses `<!ENTITY name "value">` definitions into a unit sequence.
///
/// `<!-- -->` comments preceding a definition become translator notes on it;
/// `LOCALIZATION NOTE (entity): text` comments become developer notes on the
/// named entity, except that a `DONT_TRANSLATE` note drops the entity
/// entirely. Parameter entities (`<!ENTITY % ...>`) are skipped.
pub fn parse(text: &str) -> Result<Vec<TranslationUnit>, FormatError> {
    let mut units = Vec::new();
    let mut pending_comments: Vec<String> = Vec::new();
    let mut notes: HashMap<String, String> = HashMap::new();
    let mut dont_translate: HashSet<String> = HashSet::new();

    let mut rest = text;
    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }

        if let Some(after) = rest.strip_prefix("<!--") {
            let Some((body, tail)) = after.split_once("-->") else {
                return Err(error_at(text, rest, "unterminated comment"));
            };
            collect_comment(body.trim(), &mut pending_comments, &mut notes, &mut dont_translate);
            rest = tail;
        } else if let Some(after) = rest.strip_prefix("<!ENTITY") {
            let (entity, tail) = parse_entity(text, after)?;
            rest = tail;
            let Some((name, value)) = entity else {
                continue;
            };
            if dont_translate.remove(&name) {
                pending_comments.clear();
                continue;
            }
            units.push(build_unit(&name, value, &mut pending_comments, &mut notes));
        } else {
            return Err(error_at(text, rest, "expected a comment or an entity definition"));
        }
    }

    Ok(units)
}

/// Parses one definition body after `<!ENTITY`. Returns `None` for parameter
/// entities, which carry no translatable text.
fn parse_entity<'t>(
    full_text: &str,
    after_keyword: &'t str,
) -> Result<(Option<(String, String)>, &'t str), FormatError> {
    let rest = after_keyword.trim_start();

    if rest.starts_with('%') {
        let Some((_, tail)) = rest.split_once('>') else {
            return Err(error_at(full_text, rest, "unterminated parameter entity"));
        };
        return Ok((None, tail));
    }

    let name_end = rest
        .find(char::is_whitespace)
        .ok_or_else(|| error_at(full_text, rest, "entity name without a definition"))?;
    let (name, rest) = rest.split_at(name_end);
    let rest = rest.trim_start();

    let quote = rest
        .chars()
        .next()
        .filter(|c| *c == '"' || *c == '\'')
        .ok_or_else(|| error_at(full_text, rest, "entity definition is not quoted"))?;
    let inner = rest.get(quote.len_utf8()..).unwrap_or_default();
    let Some((value, rest)) = inner.split_once(quote) else {
        return Err(error_at(full_text, rest, "unterminated entity definition"));
    };

    let rest = rest.trim_start();
    let Some(tail) = rest.strip_prefix('>') else {
        return Err(error_at(full_text, rest, "entity definition not closed with '>'"));
    };

    Ok((Some((name.to_string(), value.replace('\r', ""))), tail))
}

/// Sorts one comment body into pending translator notes, localization notes,
/// or the do-not-translate set.
fn collect_comment(
    body: &str,
    pending_comments: &mut Vec<String>,
    notes: &mut HashMap<String, String>,
    dont_translate: &mut HashSet<String>,
) {
    let Some((entity, note)) = parse_localization_note(body) else {
        if !body.is_empty() {
            pending_comments.push(body.to_string());
        }
        return;
    };

    if note.starts_with(DONT_TRANSLATE) {
        dont_translate.insert(entity);
    } else {
        notes.insert(entity, note);
    }
}

/// Parses `LOCALIZATION NOTE (entity): text`, returning the entity name and
/// the note text.
fn parse_localization_note(body: &str) -> Option<(String, String)> {
    let rest = body.strip_prefix("LOCALIZATION NOTE")?;
    let (_, rest) = rest.split_once('(')?;
    let (entity, rest) = rest.split_once(')')?;
    let (_, note) = rest.split_once(':')?;
    Some((entity.trim().to_string(), note.trim().to_string()))
}

/// Builds a unit for one entity, draining the comments collected for it.
fn build_unit(
    name: &str,
    value: String,
    pending_comments: &mut Vec<String>,
    notes: &mut HashMap<String, String>,
) -> TranslationUnit {
    let mut unit = TranslationUnit::new(value);
    unit.key = Some(name.to_string());

    for comment in pending_comments.drain(..) {
        unit.comments.push(Comment::translator(&comment));
    }
    if let Some(note) = notes.remove(name) {
        unit.comments.push(Comment::developer(&note));
    }
    if [".height", ".width", ".size"].iter().any(|suffix| name.ends_with(suffix)) {
        unit.comments.push(Comment::developer(SIZE_NOTE));
    }
    // Location last, matching the catalog comment order (#. before #:).
    unit.add_location(name);

    unit
}

/// Builds a parse error pointing at the line where `remainder` starts.
fn error_at(full_text: &str, remainder: &str, message: &str) -> FormatError {
    let consumed = full_text.len() - remainder.len();
    let line = full_text.get(..consumed).map_or(1, |prefix| prefix.matches('\n').count() + 1);
    FormatError::Dtd { line, message: message.to_string() }
}
