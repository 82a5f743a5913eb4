//! Ordered merging of an incoming unit sequence against a reference catalog.

use crate::matching::index::build_index;
use crate::matching::resolve::{
    MatchResult,
    PluralSlot,
    resolve,
    resolve_plural_slot,
};
use crate::unit::TranslationUnit;

/// Result of a merge run: the merged sequence in incoming order plus the
/// diagnostic tallies. None of the diagnostics is fatal; the output sequence
/// is always complete.
#[derive(Debug, Default)]
pub struct MergeOutcome {
    /// Merged units, in the order of the incoming sequence.
    pub units: Vec<TranslationUnit>,
    /// Units with no candidate in the reference catalog.
    pub unmatched: usize,
    /// Units refused because more than one candidate was equally valid.
    pub ambiguous: usize,
}

/// Merges `incoming` against an optional `reference` catalog.
///
/// Without a reference this is a fresh conversion: every incoming unit is
/// emitted untranslated and no matching is attempted. With a reference, a
/// [`build_index`] is built once and each incoming unit is resolved in
/// original order; output order always equals incoming order. A leading
/// header unit is passed through verbatim rather than matched.
#[must_use]
pub fn merge(incoming: Vec<TranslationUnit>, reference: Option<&[TranslationUnit]>) -> MergeOutcome {
    let Some(reference) = reference else {
        let units = incoming
            .into_iter()
            .map(|mut unit| {
                unit.target.clear();
                if let Some(plural) = unit.plural.as_mut() {
                    plural.target.clear();
                }
                unit
            })
            .collect();
        return MergeOutcome { units, ..MergeOutcome::default() };
    };

    let index = build_index(reference);
    let mut outcome = MergeOutcome::default();
    let mut might_be_header = true;

    for unit in incoming {
        if might_be_header {
            might_be_header = false;
            if unit.is_header() {
                outcome.units.push(unit);
                continue;
            }
        }

        match resolve(&unit, &index) {
            MatchResult::Matched(matched) => {
                outcome.units.push(adopt_translation(unit, matched, &mut outcome.unmatched));
            }
            MatchResult::Ambiguous(candidates) => {
                tracing::warn!(
                    source = %unit.source,
                    candidates = candidates.len(),
                    "refusing ambiguous match",
                );
                outcome.ambiguous += 1;
                outcome.units.push(untranslated(unit));
            }
            MatchResult::Unmatched => {
                tracing::debug!(source = %unit.source, "no reference match");
                outcome.unmatched += 1;
                outcome.units.push(untranslated(unit));
            }
        }
    }

    outcome
}

/// Copies the reference translation onto the incoming unit's structure,
/// keeping the incoming provenance (comments, locations). A plural reference
/// first goes through slot resolution; an undecidable slot downgrades this
/// unit to unmatched.
fn adopt_translation(
    mut unit: TranslationUnit,
    matched: &TranslationUnit,
    unmatched: &mut usize,
) -> TranslationUnit {
    if matched.plural.is_some() {
        match resolve_plural_slot(&unit.source, matched) {
            Some(PluralSlot::Singular) => unit.target = matched.target.clone(),
            Some(PluralSlot::Plural) => {
                unit.target =
                    matched.plural.as_ref().map_or_else(String::new, |p| p.target.clone());
            }
            None => {
                tracing::warn!(
                    source = %unit.source,
                    reference = %matched.source,
                    "matched unit but could not align singular/plural slot",
                );
                *unmatched += 1;
                return untranslated(unit);
            }
        }
    } else {
        unit.target = matched.target.clone();
        if let (Some(plural), Some(reference_plural)) =
            (unit.plural.as_mut(), matched.plural.as_ref())
        {
            plural.target = reference_plural.target.clone();
        }
    }

    unit.fuzzy = matched.fuzzy;
    unit
}

/// Clears the translation fields of a unit that found no usable match.
fn untranslated(mut unit: TranslationUnit) -> TranslationUnit {
    unit.target.clear();
    if let Some(plural) = unit.plural.as_mut() {
        plural.target.clear();
    }
    unit
}
