use miette::Diagnostic;
use smol_str::SmolStr;
use thiserror::Error;

/// A raw delta record that could not be turned into an [`Op`](crate::Op).
#[derive(Debug, Error, Diagnostic, PartialEq, Eq)]
pub enum DecodeError {
    #[error("op {index} lacks an insert")]
    #[diagnostic(code(delta::decode::missing_insert))]
    MissingInsert { index: usize },

    #[error("op {index} has an unusable insert: {reason}")]
    #[diagnostic(
        code(delta::decode::invalid_insert),
        help("an insert is either a string or an object with exactly one embed key")
    )]
    InvalidInsert { index: usize, reason: String },
}

#[derive(Debug, Error, Diagnostic)]
pub enum RenderError {
    #[error("invalid delta json: {0}")]
    #[diagnostic(code(delta::json))]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Decode(#[from] DecodeError),

    /// Every op must resolve to a formatter through its kind.
    #[error("no format is defined for op {index} of kind `{kind}`")]
    #[diagnostic(
        code(delta::render::unknown_kind),
        help("register a formatter for this kind with `Renderer::with_custom`")
    )]
    UnknownKind { index: usize, kind: SmolStr },

    #[error("failed to write html: {0}")]
    #[diagnostic(code(delta::render::write))]
    Write(#[from] std::fmt::Error),
}
