//! Label/accesskey pair synthesis.
//!
//! Detects structurally related unit pairs (a label text and its
//! keyboard-accelerator companion, related by key suffix) and combines each
//! pair into a single unit carrying an inline accelerator marker, when and
//! only when the marker can be placed unambiguously. Pairs that cannot be
//! combined fall back to two independent units.

use std::collections::{
    HashMap,
    HashSet,
};

use crate::unit::TranslationUnit;

/// Key suffixes that identify the label side of a pair.
pub const LABEL_SUFFIXES: &[&str] = &[".label", ".title"];

/// Key suffixes that identify the accelerator side of a pair.
pub const ACCESSKEY_SUFFIXES: &[&str] = &[".accesskey", ".accessKey", ".akey"];

/// Suffix sets and marker character driving pair synthesis.
#[derive(Debug, Clone)]
pub struct PairRules {
    /// Suffixes of label keys.
    pub label_suffixes: Vec<String>,
    /// Suffixes of accelerator keys.
    pub accesskey_suffixes: Vec<String>,
    /// Single-character marker spliced into the label text.
    pub marker: char,
}

impl Default for PairRules {
    fn default() -> Self {
        Self {
            label_suffixes: LABEL_SUFFIXES.iter().map(ToString::to_string).collect(),
            accesskey_suffixes: ACCESSKEY_SUFFIXES.iter().map(ToString::to_string).collect(),
            marker: '&',
        }
    }
}

impl PairRules {
    /// Strips a label suffix from `key`, returning the shared prefix.
    fn label_base<'k>(&self, key: &'k str) -> Option<&'k str> {
        self.label_suffixes.iter().find_map(|suffix| key.strip_suffix(suffix.as_str()))
    }

    /// Strips an accelerator suffix from `key`, returning the shared prefix.
    fn accesskey_base<'k>(&self, key: &'k str) -> Option<&'k str> {
        self.accesskey_suffixes.iter().find_map(|suffix| key.strip_suffix(suffix.as_str()))
    }
}

/// Per-key synthesis state. Every candidate key ends a run in exactly one of
/// `Combined` or `Failed`; keys that never become candidates stay out of the
/// state entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairState {
    /// A companion key exists; synthesis has not been attempted yet.
    Candidate,
    /// The pair was combined; the key must not be emitted standalone again.
    Combined,
    /// The pair could not be combined; both sides stay independent.
    Failed,
}

/// Pairing decisions for one source file, threaded by value through
/// [`synthesize_pairs`] rather than kept in any global.
#[derive(Debug, Clone, Default)]
pub struct PairingState {
    /// Key → state of its pair within this file.
    states: HashMap<String, PairState>,
}

impl PairingState {
    /// The recorded state of `key`, if it ever became a candidate.
    #[must_use]
    pub fn outcome(&self, key: &str) -> Option<PairState> {
        self.states.get(key).copied()
    }

    /// Number of keys currently in `state`.
    #[must_use]
    pub fn count(&self, state: PairState) -> usize {
        self.states.values().filter(|s| **s == state).count()
    }

    fn set(&mut self, key: &str, state: PairState) {
        self.states.insert(key.to_string(), state);
    }

    /// Aligns this state's candidacies to those of `structural` (the original
    /// file in a two-file merge). Mixing is a structural property of the
    /// source, not the translation: keys the original does not consider
    /// pairable are dropped here, and keys it does are candidates here even
    /// if this file's own discovery disagreed.
    pub fn align_to(&mut self, structural: &Self) {
        self.states.retain(|key, _| structural.states.contains_key(key));
        for key in structural.states.keys() {
            self.states.entry(key.clone()).or_insert(PairState::Candidate);
        }
    }
}

/// Discovers candidate pairs in `keys`: a key with a label suffix whose
/// prefix also occurs with an accelerator suffix marks both keys.
#[must_use]
pub fn find_pairable_keys(rules: &PairRules, keys: &HashSet<String>) -> PairingState {
    let mut state = PairingState::default();
    for key in keys {
        let Some(base) = rules.label_base(key) else {
            continue;
        };
        for accesskey_suffix in &rules.accesskey_suffixes {
            let companion = format!("{base}{accesskey_suffix}");
            if keys.contains(&companion) {
                state.set(key, PairState::Candidate);
                state.set(&companion, PairState::Candidate);
            }
        }
    }
    state
}

/// Finds the byte position in `label` where the marker belongs: the first
/// case-sensitive occurrence of `accesskey`, or failing that the first
/// case-insensitive occurrence. Characters inside a markup-entity reference
/// (`&` .. `;`) are never considered, so the marker cannot land inside an
/// existing reference.
fn find_marker_position(label: &str, accesskey: char) -> Option<usize> {
    let mut fallback = None;
    let mut in_entity = false;

    for (idx, ch) in label.char_indices() {
        if ch == '&' {
            in_entity = true;
        } else if ch == ';' {
            in_entity = false;
        } else if !in_entity {
            if ch == accesskey {
                return Some(idx);
            }
            if fallback.is_none() && ch.to_lowercase().eq(accesskey.to_lowercase()) {
                fallback = Some(idx);
            }
        }
    }

    fallback
}

/// Combines a label unit and its accelerator unit into one unit whose source
/// text carries the inline marker. Returns `None` when the accelerator
/// character does not occur in the label outside entity references.
fn combine(
    rules: &PairRules,
    label: &TranslationUnit,
    accesskey: &TranslationUnit,
) -> Option<TranslationUnit> {
    let accesskey_char = accesskey.source.chars().next()?;
    let position = find_marker_position(&label.source, accesskey_char)?;

    let mut combined = label.clone();
    combined.source.insert(position, rules.marker);
    combined.target.clear();
    combined.comments.extend(accesskey.comments.iter().cloned());
    Some(combined)
}

/// Resolves which two keys form the pair containing `key`, in whichever order
/// the file presents them.
fn pair_for(
    rules: &PairRules,
    key: &str,
    key_index: &HashMap<&str, &TranslationUnit>,
) -> Option<(String, String)> {
    if let Some(base) = rules.label_base(key) {
        for accesskey_suffix in &rules.accesskey_suffixes {
            let companion = format!("{base}{accesskey_suffix}");
            if key_index.contains_key(companion.as_str()) {
                return Some((key.to_string(), companion));
            }
        }
    }
    if let Some(base) = rules.accesskey_base(key) {
        for label_suffix in &rules.label_suffixes {
            let companion = format!("{base}{label_suffix}");
            if key_index.contains_key(companion.as_str()) {
                return Some((companion, key.to_string()));
            }
        }
    }
    None
}

/// Walks `units` in order, combining each candidate pair at the position of
/// its first member and suppressing the companion. Non-candidates and failed
/// pairs pass through unchanged. Returns the transformed sequence together
/// with the final pairing decisions.
#[must_use]
pub fn synthesize_pairs(
    rules: &PairRules,
    units: &[TranslationUnit],
    mut state: PairingState,
) -> (Vec<TranslationUnit>, PairingState) {
    let key_index: HashMap<&str, &TranslationUnit> =
        units.iter().filter_map(|unit| unit.key.as_deref().map(|key| (key, unit))).collect();

    let mut output = Vec::with_capacity(units.len());

    for unit in units {
        let Some(key) = unit.key.as_deref() else {
            output.push(unit.clone());
            continue;
        };

        match state.outcome(key) {
            None | Some(PairState::Failed) => output.push(unit.clone()),
            Some(PairState::Combined) => {
                // Companion of a pair already emitted in combined form.
            }
            Some(PairState::Candidate) => {
                let Some((label_key, accesskey_key)) = pair_for(rules, key, &key_index) else {
                    // Candidacy imposed by the original file, but this file
                    // lacks the companion.
                    state.set(key, PairState::Failed);
                    output.push(unit.clone());
                    continue;
                };
                let (Some(label), Some(accesskey)) =
                    (key_index.get(label_key.as_str()), key_index.get(accesskey_key.as_str()))
                else {
                    state.set(key, PairState::Failed);
                    output.push(unit.clone());
                    continue;
                };

                if let Some(combined) = combine(rules, label, accesskey) {
                    tracing::debug!(label = %label_key, accesskey = %accesskey_key, "combined pair");
                    state.set(&label_key, PairState::Combined);
                    state.set(&accesskey_key, PairState::Combined);
                    output.push(combined);
                } else {
                    tracing::debug!(
                        label = %label_key,
                        accesskey = %accesskey_key,
                        "accelerator not found in label, keeping units independent",
                    );
                    state.set(&label_key, PairState::Failed);
                    state.set(&accesskey_key, PairState::Failed);
                    output.push(unit.clone());
                }
            }
        }
    }

    (output, state)
}
