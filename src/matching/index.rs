//! Lookup structures built over a reference catalog.

use std::collections::HashMap;

use crate::matching::normalize::simplify;
use crate::unit::TranslationUnit;

/// Indexes over a reference catalog, built once per merge run.
///
/// Units are borrowed from the caller-supplied reference sequence; nothing is
/// copied at build time.
#[derive(Debug, Default)]
pub struct MatchIndex<'u> {
    /// Location string → unit, only for locations that occur exactly once.
    by_location: HashMap<String, &'u TranslationUnit>,
    /// Exact source text → unit. Later duplicates overwrite earlier entries
    /// (last one wins); `by_location` is consulted first, so no duplicate
    /// tracking happens at this level.
    by_source: HashMap<&'u str, &'u TranslationUnit>,
    /// Normalized source text → candidate units. A bucket longer than one is
    /// an ambiguous match.
    by_simplified: HashMap<String, Vec<&'u TranslationUnit>>,
}

impl<'u> MatchIndex<'u> {
    /// Looks up a unit by its unique location string.
    #[must_use]
    pub fn location(&self, location: &str) -> Option<&'u TranslationUnit> {
        self.by_location.get(location).copied()
    }

    /// Looks up a unit by exact source text.
    #[must_use]
    pub fn source(&self, text: &str) -> Option<&'u TranslationUnit> {
        self.by_source.get(text).copied()
    }

    /// Looks up the normalized-text candidate bucket.
    #[must_use]
    pub fn simplified(&self, normalized: &str) -> Option<&[&'u TranslationUnit]> {
        self.by_simplified.get(normalized).map(Vec::as_slice)
    }
}

/// Builds the three lookup mappings over `reference`.
///
/// Blank units are skipped. A location string shared by more than one unit is
/// excluded from `by_location` entirely: the ambiguity is resolved by
/// refusing to index, never by guessing.
#[must_use]
pub fn build_index(reference: &[TranslationUnit]) -> MatchIndex<'_> {
    let mut index = MatchIndex::default();
    let mut duplicate_locations = Vec::new();

    for unit in reference {
        if unit.is_blank() {
            continue;
        }

        let location = unit.location_string();
        if !location.is_empty() {
            if index.by_location.contains_key(&location) {
                duplicate_locations.push(location);
            } else {
                index.by_location.insert(location, unit);
            }
        }

        // A colliding normalized bucket only grows when the exact text is
        // new; re-seeing an identical extraction resets the bucket so it
        // cannot manufacture ambiguity.
        let normalized = simplify(&unit.source);
        let seen_exact = index.by_source.contains_key(unit.source.as_str());
        let bucket = index.by_simplified.entry(normalized).or_default();
        if seen_exact {
            bucket.clear();
        }
        bucket.push(unit);

        index.by_source.insert(unit.source.as_str(), unit);
    }

    for location in duplicate_locations {
        if index.by_location.remove(&location).is_some() {
            tracing::debug!(%location, "excluded duplicate location from index");
        }
    }

    index
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    fn unit(location: &str, source: &str, target: &str) -> TranslationUnit {
        let mut unit = TranslationUnit::new(source);
        if !location.is_empty() {
            unit.add_location(location);
        }
        unit.target = target.to_string();
        unit
    }

    #[rstest]
    fn empty_reference_yields_empty_index() {
        let index = build_index(&[]);

        assert_that!(index.location("anything"), none());
        assert_that!(index.source("anything"), none());
        assert_that!(index.simplified("anything"), none());
    }

    #[rstest]
    fn indexes_by_location_source_and_simplified() {
        let units = vec![unit("dialog.label", "Save file", "Datei speichern")];
        let index = build_index(&units);

        assert_that!(index.location("dialog.label"), some(anything()));
        assert_that!(index.source("Save file"), some(anything()));
        assert_that!(index.simplified("save file").map(<[_]>::len), some(eq(1)));
    }

    #[rstest]
    fn duplicate_locations_are_excluded_entirely() {
        let units = vec![unit("dup.key", "One", ""), unit("dup.key", "Two", "")];
        let index = build_index(&units);

        assert_that!(index.location("dup.key"), none());
        // The texts stay reachable through the other strategies.
        assert_that!(index.source("One"), some(anything()));
        assert_that!(index.source("Two"), some(anything()));
    }

    #[rstest]
    fn later_duplicate_source_overwrites_earlier() {
        let units = vec![unit("a", "Save", "first"), unit("b", "Save", "second")];
        let index = build_index(&units);

        let matched = index.source("Save").unwrap();
        assert_that!(matched.target, eq("second"));
    }

    #[rstest]
    fn distinct_texts_with_same_normal_form_share_a_bucket() {
        let units = vec![unit("", "Save", "x"), unit("", "SAVE", "y")];
        let index = build_index(&units);

        assert_that!(index.simplified("save").map(<[_]>::len), some(eq(2)));
    }

    #[rstest]
    fn identical_re_extraction_does_not_grow_the_bucket() {
        let units = vec![unit("a", "Save", "x"), unit("b", "Save", "y")];
        let index = build_index(&units);

        assert_that!(index.simplified("save").map(<[_]>::len), some(eq(1)));
    }

    #[rstest]
    fn blank_units_are_skipped() {
        let blank = TranslationUnit::default();
        let index = build_index(std::slice::from_ref(&blank));

        assert_that!(index.source(""), none());
        assert_that!(index.simplified(""), none());
    }
}
