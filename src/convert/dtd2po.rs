//! Conversion of markup-entity (DTD) files into PO catalogs.

use std::collections::{
    HashMap,
    HashSet,
};

use crate::accel::{
    PairRules,
    PairState,
    PairingState,
    find_pairable_keys,
    synthesize_pairs,
};
use crate::convert::duplicates::{
    DuplicateStyle,
    apply_duplicate_policy,
};
use crate::convert::{
    Conversion,
    ConvertError,
};
use crate::formats::{
    dtd,
    po,
};
use crate::header::{
    HeaderOptions,
    make_header,
};
use crate::matching::{
    MergeOutcome,
    merge,
};
use crate::unit::TranslationUnit;

/// Options for a DTD conversion run.
#[derive(Debug, Clone, Default)]
pub struct DtdOptions {
    /// Label/accesskey pairing rules.
    pub rules: PairRules,
    /// How colliding source texts are emitted.
    pub duplicate_style: DuplicateStyle,
    /// Emit a translation template, dropping every target.
    pub pot: bool,
}

/// Converts a DTD file into a PO catalog.
///
/// Without `translated`, every entity becomes an untranslated unit. With
/// `translated` (the same file in another language), translations are carried
/// over by entity key; pairing candidacy is decided by the original file and
/// imposed on the translated one.
///
/// # Errors
/// Returns [`ConvertError::Format`] when either input fails to parse.
pub fn dtd_to_po(
    original: &str,
    translated: Option<&str>,
    options: &DtdOptions,
) -> Result<Conversion, ConvertError> {
    let orig_units = dtd::parse(original)?;
    let orig_state = find_pairable_keys(&options.rules, &key_set(&orig_units));
    let (orig_units, orig_state) = synthesize_pairs(&options.rules, &orig_units, orig_state);
    tracing::debug!(
        combined = orig_state.count(PairState::Combined),
        failed = orig_state.count(PairState::Failed),
        "pair synthesis finished",
    );

    let outcome = match translated {
        None => merge(orig_units, None),
        Some(text) => {
            let trans_units = dtd::parse(text)?;
            let mut trans_state = find_pairable_keys(&options.rules, &key_set(&trans_units));
            trans_state.align_to(&orig_state);
            let (trans_units, trans_state) =
                synthesize_pairs(&options.rules, &trans_units, trans_state);
            carry_by_key(orig_units, &trans_units, &trans_state)
        }
    };

    let mut units = apply_duplicate_policy(outcome.units, options.duplicate_style);
    if options.pot {
        for unit in &mut units {
            unit.target.clear();
            if let Some(plural) = unit.plural.as_mut() {
                plural.target.clear();
            }
        }
    }

    let header = make_header(&HeaderOptions {
        accelerator_marker: Some(options.rules.marker),
        ..HeaderOptions::default()
    });
    units.insert(0, header);

    tracing::debug!(
        units = units.len() - 1,
        unmatched = outcome.unmatched,
        "dtd conversion finished",
    );

    Ok(Conversion {
        output: po::serialize(&units),
        unit_count: units.len() - 1,
        unmatched: outcome.unmatched,
        ambiguous: outcome.ambiguous,
    })
}

/// Entity keys present in a unit sequence.
fn key_set(units: &[TranslationUnit]) -> HashSet<String> {
    units.iter().filter_map(|unit| unit.key.clone()).collect()
}

/// Fills targets from the translated file's entity values, matched by key.
/// Keys absent from the translated file stay untranslated; keys the
/// translated file absorbed into a combined pair are not missing.
fn carry_by_key(
    orig_units: Vec<TranslationUnit>,
    trans_units: &[TranslationUnit],
    trans_state: &PairingState,
) -> MergeOutcome {
    let by_key: HashMap<&str, &TranslationUnit> =
        trans_units.iter().filter_map(|unit| unit.key.as_deref().map(|key| (key, unit))).collect();

    let mut outcome = MergeOutcome::default();
    for mut unit in orig_units {
        match unit.key.as_deref().and_then(|key| by_key.get(key)) {
            Some(translation) => unit.target = translation.source.clone(),
            None => {
                let combined = unit.key.as_deref().and_then(|key| trans_state.outcome(key))
                    == Some(PairState::Combined);
                if !combined {
                    tracing::debug!(key = ?unit.key, "entity missing from translated file");
                    outcome.unmatched += 1;
                }
            }
        }
        outcome.units.push(unit);
    }
    outcome
}
