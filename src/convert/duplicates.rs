//! Handling of units whose source texts collide.

use std::collections::HashMap;

use clap::ValueEnum;
use serde::{
    Deserialize,
    Serialize,
};

use crate::unit::{
    CommentKind,
    TranslationUnit,
};

/// How units with identical source text but distinct provenance are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateStyle {
    /// Keep every colliding unit, disambiguated by a context string derived
    /// from its locations.
    #[default]
    Msgctxt,
    /// Collapse colliding units into one, accumulating their locations.
    Merge,
}

/// Applies `style` to a unit sequence. Blank and header units are never
/// considered duplicates of anything.
#[must_use]
pub fn apply_duplicate_policy(
    units: Vec<TranslationUnit>,
    style: DuplicateStyle,
) -> Vec<TranslationUnit> {
    match style {
        DuplicateStyle::Msgctxt => disambiguate_with_context(units),
        DuplicateStyle::Merge => merge_duplicates(units),
    }
}

/// Gives every member of a colliding group a context string from its first
/// location. Units that already carry a context keep it.
fn disambiguate_with_context(units: Vec<TranslationUnit>) -> Vec<TranslationUnit> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for unit in units.iter().filter(|u| !u.is_blank()) {
        *counts.entry(unit.source.as_str()).or_default() += 1;
    }
    let colliding: Vec<String> = counts
        .iter()
        .filter(|(_, count)| **count > 1)
        .map(|(source, _)| (*source).to_string())
        .collect();

    units
        .into_iter()
        .map(|mut unit| {
            if !unit.is_blank()
                && unit.context.is_none()
                && colliding.iter().any(|source| *source == unit.source)
            {
                let location = unit.locations().next().map(str::to_string);
                if let Some(location) = location {
                    unit.context = Some(location);
                }
            }
            unit
        })
        .collect()
}

/// Collapses colliding units onto their first occurrence, carrying the later
/// units' location comments over. The first occurrence's translation wins.
fn merge_duplicates(units: Vec<TranslationUnit>) -> Vec<TranslationUnit> {
    let mut output: Vec<TranslationUnit> = Vec::with_capacity(units.len());
    let mut first_occurrence: HashMap<String, usize> = HashMap::new();

    for unit in units {
        if unit.is_blank() {
            output.push(unit);
            continue;
        }
        match first_occurrence.get(&unit.source) {
            Some(&position) => {
                if let Some(existing) = output.get_mut(position) {
                    existing
                        .comments
                        .extend(unit.comments.into_iter().filter(|c| c.kind == CommentKind::Location));
                }
            }
            None => {
                first_occurrence.insert(unit.source.clone(), output.len());
                output.push(unit);
            }
        }
    }

    output
}
