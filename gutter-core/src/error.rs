/// Top-level gutter error type.
///
/// All fallible operations in `gutter-core` return [`Result<T, GutterError>`](Result).
/// Each variant wraps a concern-specific error enum, so callers can match on
/// the source without losing type information.
#[derive(thiserror::Error, Debug)]
pub enum GutterError {
    /// A finding could not be turned into a marker (bad score, kind, or range).
    #[error(transparent)]
    Marker(#[from] MarkerError),

    /// A merge group violated the merger's preconditions.
    #[error(transparent)]
    Merge(#[from] MergeError),

    /// Findings could not be read from their source.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Icon output or sink delivery failed.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Error in configuration parsing or validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl GutterError {
    /// Caller supplied a value outside the domain (negative score, empty kind, inverted range).
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::Marker(_))
    }

    /// Caller broke a merge precondition (empty or incompatible group).
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Merge(_))
    }
}

/// Invalid-argument failures raised while constructing markers or formatting scores.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkerError {
    /// Scores are non-negative; negatives are rejected rather than clamped.
    #[error("Invalid argument: score must be non-negative, got {0}")]
    NegativeScore(i64),

    /// A kind tag, when present, must have at least one character.
    #[error("Invalid argument: complexity kind must have at least one character")]
    EmptyKind,

    /// Text range offsets are inverted.
    #[error("Invalid argument: text range start {start} is after end {end}")]
    InvalidRange {
        /// Start offset of the anchor.
        start: usize,
        /// End offset of the anchor.
        end: usize,
    },
}

/// Precondition failures in [`crate::merge::MarkerMerger`] and the assembler.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    /// Merging or composing requires at least one member.
    #[error("Precondition violated: cannot merge an empty group")]
    EmptyGroup,

    /// Group members do not share the policy's grouping key.
    #[error("Precondition violated: {policy} policy cannot merge {left} with {right}")]
    Incompatible {
        /// Policy that rejected the group.
        policy: &'static str,
        /// Grouping key of the first member.
        left: String,
        /// Grouping key of the offending member.
        right: String,
    },
}

/// Errors reading findings supplied by the host.
#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    /// Findings document is not valid JSON or has the wrong shape.
    #[error("Findings parse error")]
    Parse(#[from] serde_json::Error),

    /// Filesystem I/O error reading findings.
    #[error("IO error")]
    Io(#[from] std::io::Error),
}

/// Errors while producing icon output or handing it to the host.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    /// No renderer is registered under the requested name.
    #[error("Unknown renderer: {0}")]
    UnknownRenderer(String),

    /// The host sink refused an icon.
    #[error("Sink rejected icon: {0}")]
    Sink(String),

    /// Icon layout could not be serialized.
    #[error("Serialization error")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem I/O error writing rendered output.
    #[error("IO error")]
    Io(#[from] std::io::Error),
}

/// Errors in gutter configuration parsing and validation.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The configuration file does not exist at the expected path.
    #[error("Config file not found: {0}")]
    NotFound(String),

    /// Configuration values are present but semantically invalid.
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// Configuration file syntax could not be parsed (TOML error).
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Convenience alias for `Result<T, GutterError>`.
pub type Result<T> = std::result::Result<T, GutterError>;
