//! Single-unit resolution against a [`MatchIndex`].

use crate::matching::index::MatchIndex;
use crate::matching::normalize::simplify;
use crate::unit::TranslationUnit;

/// Outcome of resolving one incoming unit against the reference index.
#[derive(Debug, PartialEq, Eq)]
pub enum MatchResult<'u> {
    /// Exactly one reference unit matched.
    Matched(&'u TranslationUnit),
    /// More than one equally valid candidate. The caller must treat this as
    /// unmatched and may surface the candidates for diagnostics; it must
    /// never pick one arbitrarily.
    Ambiguous(Vec<&'u TranslationUnit>),
    /// No candidate at all.
    Unmatched,
}

/// Which slot of a plural reference unit the incoming text corresponds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluralSlot {
    /// The singular source text matched.
    Singular,
    /// The plural source text matched.
    Plural,
}

/// Resolves `incoming` using the ordered fallback strategy: unique location,
/// then exact source text, then normalized source text. The first strategy
/// that produces a result wins; this is a precision-over-recall policy.
#[must_use]
pub fn resolve<'u>(incoming: &TranslationUnit, index: &MatchIndex<'u>) -> MatchResult<'u> {
    let location = incoming.location_string();
    if !location.is_empty()
        && let Some(unit) = index.location(&location)
    {
        return MatchResult::Matched(unit);
    }

    if let Some(unit) = index.source(&incoming.source) {
        tracing::debug!(source = %incoming.source, "matched by exact text");
        return MatchResult::Matched(unit);
    }

    match index.simplified(&simplify(&incoming.source)) {
        Some(&[unit]) => {
            tracing::debug!(source = %incoming.source, "matched by normalized text");
            MatchResult::Matched(unit)
        }
        Some(bucket) => MatchResult::Ambiguous(bucket.to_vec()),
        None => MatchResult::Unmatched,
    }
}

/// Decides whether `incoming_source` corresponds to the singular or the
/// plural slot of a plural `reference` unit, comparing exact text first and
/// normalized text second. `None` means the slot cannot be determined and the
/// unit-level match must be downgraded to unmatched.
#[must_use]
pub fn resolve_plural_slot(
    incoming_source: &str,
    reference: &TranslationUnit,
) -> Option<PluralSlot> {
    let plural = reference.plural.as_ref()?;

    if incoming_source == reference.source {
        return Some(PluralSlot::Singular);
    }
    if incoming_source == plural.source {
        return Some(PluralSlot::Plural);
    }

    let normalized = simplify(incoming_source);
    if normalized == simplify(&reference.source) {
        return Some(PluralSlot::Singular);
    }
    if normalized == simplify(&plural.source) {
        return Some(PluralSlot::Plural);
    }

    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;
    use crate::matching::index::build_index;
    use crate::unit::PluralText;

    fn located(location: &str, source: &str) -> TranslationUnit {
        let mut unit = TranslationUnit::new(source);
        if !location.is_empty() {
            unit.add_location(location);
        }
        unit
    }

    #[rstest]
    fn location_beats_differing_text() {
        let reference = vec![located("dialog.label", "Save file")];
        let index = build_index(&reference);

        // Same location, completely different text: still a match.
        let incoming = located("dialog.label", "Totally rewritten");

        assert_that!(resolve(&incoming, &index), pat!(MatchResult::Matched(_)));
    }

    #[rstest]
    fn duplicate_location_falls_through_to_text() {
        let reference = vec![located("dup", "Alpha"), located("dup", "Beta")];
        let index = build_index(&reference);

        let by_text = located("dup", "Alpha");
        let matched = resolve(&by_text, &index);
        match matched {
            MatchResult::Matched(unit) => assert_that!(unit.source, eq("Alpha")),
            other => panic!("expected text match, got {other:?}"),
        }
    }

    #[rstest]
    fn exact_text_match_without_location() {
        let reference = vec![located("some.key", "Cancel")];
        let index = build_index(&reference);

        let incoming = TranslationUnit::new("Cancel");

        assert_that!(resolve(&incoming, &index), pat!(MatchResult::Matched(_)));
    }

    #[rstest]
    fn normalized_match_with_single_candidate() {
        let reference = vec![located("k", "Save file")];
        let index = build_index(&reference);

        let incoming = TranslationUnit::new("save FILE!");

        assert_that!(resolve(&incoming, &index), pat!(MatchResult::Matched(_)));
    }

    #[rstest]
    fn ambiguous_normalized_bucket_is_refused() {
        let reference = vec![located("", "Save"), located("", "SAVE")];
        let index = build_index(&reference);

        let incoming = TranslationUnit::new("save");
        match resolve(&incoming, &index) {
            MatchResult::Ambiguous(candidates) => assert_that!(candidates, len(eq(2))),
            other => panic!("expected ambiguous result, got {other:?}"),
        }
    }

    #[rstest]
    fn no_candidate_is_unmatched() {
        let reference = vec![located("k", "Save")];
        let index = build_index(&reference);

        let incoming = TranslationUnit::new("Quit");

        assert_that!(resolve(&incoming, &index), pat!(MatchResult::Unmatched));
    }

    fn plural_reference() -> TranslationUnit {
        let mut unit = located("files", "%d file");
        unit.plural = Some(PluralText { source: "%d files".to_string(), target: String::new() });
        unit
    }

    #[rstest]
    #[case::exact_singular("%d file", Some(PluralSlot::Singular))]
    #[case::exact_plural("%d files", Some(PluralSlot::Plural))]
    #[case::normalized_singular("%D FILE", Some(PluralSlot::Singular))]
    #[case::normalized_plural("%d files!", Some(PluralSlot::Plural))]
    #[case::neither("%d directories", None)]
    fn plural_slot_resolution(#[case] incoming: &str, #[case] expected: Option<PluralSlot>) {
        assert_that!(resolve_plural_slot(incoming, &plural_reference()), eq(expected));
    }

    #[rstest]
    fn plural_slot_requires_a_plural_reference() {
        let singular = located("k", "One");
        assert_that!(resolve_plural_slot("One", &singular), none());
    }
}
