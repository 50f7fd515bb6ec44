//! Delta HTML
//!
//! Renders Quill Delta documents (a flat list of attribute-annotated insert
//! ops) to an HTML fragment. Inline attributes become tags, classes or
//! styles that open once per run; block attributes on the terminating `\n`
//! merge into a single block element; lists and links wrap whole runs.
//!
//! ```
//! let html = delta_html::render(r#"[{"insert":"hi","attributes":{"bold":true}},{"insert":"\n"}]"#)?;
//! assert_eq!(html, "<p><strong>hi</strong></p>");
//! # Ok::<(), delta_html::RenderError>(())
//! ```

pub mod block;
pub mod error;
pub mod format;
pub mod formats;
pub mod formatter;
pub mod op;
pub mod options;
pub mod raw;
pub mod registry;
pub mod render;
pub mod state;

pub use block::BlockWrap;
pub use error::{DecodeError, RenderError};
pub use format::{Entry, Format, Place, Wrap};
pub use formatter::{EmbedWriter, FormatRule, Formatter, WrapRule};
pub use op::Op;
pub use options::RenderOptions;
pub use raw::{RawOp, decode};
pub use registry::Registry;
pub use render::Renderer;
pub use state::FormatState;

/// Renders a JSON delta with the built-in formats and default options.
pub fn render(json: &str) -> Result<String, RenderError> {
    Renderer::new().render(json)
}

/// Like [`render`], but `custom` gets the first say for every op kind and
/// attribute name. Returning `None` falls back to the built-in formats.
pub fn render_with<F>(json: &str, custom: F) -> Result<String, RenderError>
where
    F: Fn(&str, &Op) -> Option<Formatter>,
{
    Renderer::new().with_custom(custom).render(json)
}

/// Renders already decoded ops.
pub fn render_ops(ops: &[Op], registry: &Registry<'_>) -> Result<String, RenderError> {
    render::render_ops(ops, registry)
}
