//! Command-line interface.

use std::io::Write as _;
use std::path::{
    Path,
    PathBuf,
};

use clap::{
    Args,
    Parser,
    Subcommand,
};
use thiserror::Error;

use crate::config::{
    ConfigError,
    ConfigManager,
};
use crate::convert::{
    Conversion,
    ConvertError,
    CsvOptions,
    DtdOptions,
    DuplicateStyle,
    csv_to_po,
    dtd_to_po,
};

/// Converts localization catalogs into gettext PO.
#[derive(Debug, Parser)]
#[command(name = "catmerge", version, about)]
pub struct Cli {
    /// Selected conversion.
    #[command(subcommand)]
    pub command: Command,
}

/// Available conversions.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Convert a markup-entity (DTD) file into a PO catalog
    Dtd2po(ConvertArgs),

    /// Convert a delimited-record (CSV) catalog into a PO catalog
    Csv2po(ConvertArgs),
}

/// Arguments shared by both conversions.
#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Input file
    pub input: PathBuf,

    /// Reference file: the translated DTD for dtd2po, an existing PO
    /// template for csv2po
    #[arg(short, long)]
    pub template: Option<PathBuf>,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Emit a translation template, dropping every translation
    #[arg(long)]
    pub pot: bool,

    /// How colliding source texts are emitted (overrides the config file)
    #[arg(long, value_enum)]
    pub duplicates: Option<DuplicateStyle>,
}

/// Errors surfaced to the user by the CLI.
#[derive(Error, Debug)]
pub enum CliError {
    /// An input file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Offending path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The output could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Offending path (`-` for stdout).
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file was invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The conversion itself failed.
    #[error(transparent)]
    Convert(#[from] ConvertError),
}

impl Cli {
    /// Loads the configuration and runs the selected conversion.
    ///
    /// # Errors
    /// Any [`CliError`]; the caller is expected to report it and exit
    /// non-zero.
    pub fn run(self) -> Result<(), CliError> {
        let mut config = ConfigManager::new();
        config.load_settings(std::env::current_dir().ok())?;
        let settings = config.get_settings();

        match self.command {
            Command::Dtd2po(args) => {
                let options = DtdOptions {
                    rules: settings.pair_rules(),
                    duplicate_style: args.duplicates.unwrap_or(settings.duplicate_style),
                    pot: args.pot,
                };
                let original = read(&args.input)?;
                let translated = args.template.as_deref().map(read).transpose()?;
                let conversion = dtd_to_po(&original, translated.as_deref(), &options)?;
                emit(args.output.as_deref(), &conversion)
            }
            Command::Csv2po(args) => {
                let options = CsvOptions {
                    duplicate_style: args.duplicates.unwrap_or(settings.duplicate_style),
                    pot: args.pot,
                };
                let input = read(&args.input)?;
                let template = args.template.as_deref().map(read).transpose()?;
                let conversion = csv_to_po(&input, template.as_deref(), &options)?;
                emit(args.output.as_deref(), &conversion)
            }
        }
    }
}

/// Reads an input file as UTF-8.
fn read(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path)
        .map_err(|source| CliError::Read { path: path.to_path_buf(), source })
}

/// Writes the converted catalog and reports the tallies.
fn emit(output: Option<&Path>, conversion: &Conversion) -> Result<(), CliError> {
    tracing::info!(
        units = conversion.unit_count,
        unmatched = conversion.unmatched,
        ambiguous = conversion.ambiguous,
        "conversion finished",
    );

    match output {
        Some(path) => std::fs::write(path, &conversion.output)
            .map_err(|source| CliError::Write { path: path.to_path_buf(), source }),
        None => std::io::stdout()
            .lock()
            .write_all(conversion.output.as_bytes())
            .map_err(|source| CliError::Write { path: PathBuf::from("-"), source }),
    }
}
