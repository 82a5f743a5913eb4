//! Core translation unit data model.

/// Marker prefix of a location comment line (`#: some.entity`).
pub const LOCATION_PREFIX: &str = "#:";

/// Kind of a comment attached to a [`TranslationUnit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    /// Note written by a developer for translators (`#. ...`).
    Developer,
    /// Provenance of the unit in the extracted source (`#: ...`).
    Location,
    /// Free-form note written by a translator (`# ...`).
    Translator,
}

/// A single comment line, stored with its marker so it round-trips verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// What the comment describes.
    pub kind: CommentKind,
    /// Raw comment line including its marker, without trailing newline.
    pub text: String,
}

impl Comment {
    /// Creates a developer note.
    #[must_use]
    pub fn developer(text: &str) -> Self {
        Self { kind: CommentKind::Developer, text: format!("#. {text}") }
    }

    /// Creates a location comment.
    #[must_use]
    pub fn location(location: &str) -> Self {
        Self { kind: CommentKind::Location, text: format!("{LOCATION_PREFIX} {location}") }
    }

    /// Creates a translator note.
    #[must_use]
    pub fn translator(text: &str) -> Self {
        Self { kind: CommentKind::Translator, text: format!("# {text}") }
    }
}

/// Plural companion texts of a plural-aware unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluralText {
    /// Plural form of the source text.
    pub source: String,
    /// Plural form of the translation.
    pub target: String,
}

/// One translatable source/target text pair plus provenance metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationUnit {
    /// Structural identifier (entity or record field name), unique within a
    /// well-formed source but not guaranteed present.
    pub key: Option<String>,
    /// The translatable content.
    pub source: String,
    /// The translation. Empty means untranslated.
    pub target: String,
    /// Plural companions, present iff the unit is plural.
    pub plural: Option<PluralText>,
    /// Disambiguation context (`msgctxt`).
    pub context: Option<String>,
    /// Ordered comments, tagged by kind.
    pub comments: Vec<Comment>,
    /// Marks the translation as provisional/needs-review.
    pub fuzzy: bool,
}

impl TranslationUnit {
    /// Creates a unit with the given source text and no translation.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self { source: source.into(), ..Self::default() }
    }

    /// Appends a location comment.
    pub fn add_location(&mut self, location: &str) {
        self.comments.push(Comment::location(location));
    }

    /// All locations of the unit, with the `#:` marker stripped.
    #[must_use]
    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.comments.iter().filter(|c| c.kind == CommentKind::Location).map(|c| {
            c.text.strip_prefix(LOCATION_PREFIX).unwrap_or(&c.text).trim()
        })
    }

    /// The matching location string: all location comments joined with a
    /// single space after stripping the `#:` prefix. Empty when the unit has
    /// no location comments.
    #[must_use]
    pub fn location_string(&self) -> String {
        self.locations().collect::<Vec<_>>().join(" ")
    }

    /// A unit is blank iff its source text is empty and it carries no
    /// location comments. Blank units are never matchable.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.source.is_empty() && !self.comments.iter().any(|c| c.kind == CommentKind::Location)
    }

    /// Recognizes a catalog header unit: empty source and location, with the
    /// header boilerplate (a `Content-Type:` field) in the target.
    #[must_use]
    pub fn is_header(&self) -> bool {
        self.source.is_empty()
            && self.location_string().is_empty()
            && self.target.contains("Content-Type:")
    }
}
