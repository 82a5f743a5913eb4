//! Conversion of delimited-record (CSV) catalogs into PO catalogs.

use crate::convert::duplicates::{
    DuplicateStyle,
    apply_duplicate_policy,
};
use crate::convert::{
    Conversion,
    ConvertError,
};
use crate::formats::{
    csv,
    po,
};
use crate::header::{
    HeaderOptions,
    make_header,
};
use crate::matching::merge;
use crate::unit::TranslationUnit;

/// Options for a CSV conversion run.
#[derive(Debug, Clone, Default)]
pub struct CsvOptions {
    /// How colliding source texts are emitted.
    pub duplicate_style: DuplicateStyle,
    /// Emit a translation template, dropping every target.
    pub pot: bool,
}

/// Converts a CSV catalog into a PO catalog.
///
/// Without a template the CSV rows become the catalog directly, keeping their
/// translations. With `template` (an existing PO catalog), the template's
/// units, order, and provenance are kept and the CSV rows act as the
/// reference that supplies translations, matched by location first, then by
/// exact source text, then by normalized source text.
///
/// # Errors
/// Returns [`ConvertError::Format`] when either input fails to parse.
pub fn csv_to_po(
    input: &str,
    template: Option<&str>,
    options: &CsvOptions,
) -> Result<Conversion, ConvertError> {
    let csv_units = csv::parse(input)?;

    let conversion = match template {
        Some(text) => {
            let template_units = po::parse(text)?;
            let mut outcome = merge(template_units, Some(&csv_units));
            if let Some(header) = outcome.units.first_mut().filter(|unit| unit.is_header()) {
                fill_header_placeholders(header);
            }
            if options.pot {
                clear_targets(&mut outcome.units);
            }
            let unit_count = outcome.units.iter().filter(|unit| !unit.is_header()).count();
            Conversion {
                output: po::serialize(&outcome.units),
                unit_count,
                unmatched: outcome.unmatched,
                ambiguous: outcome.ambiguous,
            }
        }
        None => {
            let mut units = apply_duplicate_policy(csv_units, options.duplicate_style);
            if options.pot {
                clear_targets(&mut units);
            }
            units.insert(0, make_header(&HeaderOptions::default()));
            Conversion {
                output: po::serialize(&units),
                unit_count: units.len() - 1,
                unmatched: 0,
                ambiguous: 0,
            }
        }
    };

    tracing::debug!(
        units = conversion.unit_count,
        unmatched = conversion.unmatched,
        ambiguous = conversion.ambiguous,
        "csv conversion finished",
    );

    Ok(conversion)
}

/// Replaces the `CHARSET`/`ENCODING` placeholders a template header ships
/// with. A header without placeholders is left alone.
fn fill_header_placeholders(header: &mut TranslationUnit) {
    header.target = header
        .target
        .replace("charset=CHARSET", "charset=UTF-8")
        .replace("Content-Transfer-Encoding: ENCODING", "Content-Transfer-Encoding: 8bit");
}

/// Drops every translation, leaving source structure intact.
fn clear_targets(units: &mut [TranslationUnit]) {
    for unit in units {
        if unit.is_header() {
            continue;
        }
        unit.target.clear();
        if let Some(plural) = unit.plural.as_mut() {
            plural.target.clear();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    const CSV: &str = "\
location,source,target
dialog.save,Save file,Datei speichern
menu.quit,Quit,Beenden
";

    const TEMPLATE: &str = r#"msgid ""
msgstr ""
"Content-Type: text/plain; charset=CHARSET\n"
"Content-Transfer-Encoding: ENCODING\n"

#: dialog.save
msgid "Save file"
msgstr ""

#: menu.quit
msgid "Quit"
msgstr ""

#: menu.help
msgid "Help"
msgstr ""
"#;

    #[rstest]
    fn fresh_conversion_keeps_csv_translations() {
        let conversion = csv_to_po(CSV, None, &CsvOptions::default()).unwrap();

        assert_that!(conversion.unit_count, eq(2));
        assert_that!(conversion.output, contains_substring("msgid \"Save file\""));
        assert_that!(conversion.output, contains_substring("msgstr \"Datei speichern\""));
    }

    #[rstest]
    fn template_conversion_keeps_template_order_and_provenance() {
        let conversion = csv_to_po(CSV, Some(TEMPLATE), &CsvOptions::default()).unwrap();

        assert_that!(conversion.unit_count, eq(3));
        assert_that!(conversion.unmatched, eq(1));
        let save = conversion.output.find("Datei speichern").unwrap();
        let quit = conversion.output.find("Beenden").unwrap();
        assert_that!(save, lt(quit));
        assert_that!(conversion.output, contains_substring("#: menu.help"));
    }

    #[rstest]
    fn template_header_placeholders_are_filled() {
        let conversion = csv_to_po(CSV, Some(TEMPLATE), &CsvOptions::default()).unwrap();

        assert_that!(conversion.output, contains_substring("charset=UTF-8"));
        assert_that!(conversion.output, contains_substring("Content-Transfer-Encoding: 8bit"));
        assert_that!(conversion.output, not(contains_substring("ENCODING")));
    }

    #[rstest]
    fn pot_flag_drops_translations() {
        let options = CsvOptions { pot: true, ..CsvOptions::default() };
        let conversion = csv_to_po(CSV, None, &options).unwrap();

        assert_that!(conversion.output, not(contains_substring("Datei speichern")));
        assert_that!(conversion.output, contains_substring("msgid \"Save file\""));
    }

    #[rstest]
    fn malformed_input_is_an_error() {
        let result = csv_to_po("only,two\n", None, &CsvOptions::default());

        assert_that!(result, err(anything()));
    }
}
