use crate::block::BlockWrap;
use crate::error::RenderError;
use crate::format::Entry;
use crate::formats::block::MAX_INDENT;
use crate::formatter::Formatter;
use crate::op::Op;
use crate::options::RenderOptions;
use crate::raw::decode;
use crate::registry::Registry;
use crate::state::FormatState;

/// Renders deltas with a fixed set of options and formatter overrides.
#[derive(Default)]
pub struct Renderer<'a> {
    registry: Registry<'a>,
}

impl<'a> Renderer<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: RenderOptions) -> Self {
        Self {
            registry: Registry::new(options),
        }
    }

    /// Installs a hook that may supply its own [`Formatter`] for any kind or
    /// attribute before the built-in table is consulted.
    pub fn with_custom<F>(self, custom: F) -> Self
    where
        F: Fn(&str, &Op) -> Option<Formatter> + 'a,
    {
        Self {
            registry: self.registry.with_custom(custom),
        }
    }

    pub fn registry(&self) -> &Registry<'a> {
        &self.registry
    }

    /// Renders a JSON delta.
    pub fn render(&self, json: &str) -> Result<String, RenderError> {
        let ops = decode(json)?;
        self.render_ops(&ops)
    }

    pub fn render_ops(&self, ops: &[Op]) -> Result<String, RenderError> {
        render_ops(ops, &self.registry)
    }
}

/// Renders `ops` in one pass, resolving formatters through `registry`.
#[tracing::instrument(level = "debug", skip_all, fields(ops = ops.len()))]
pub fn render_ops(ops: &[Op], registry: &Registry<'_>) -> Result<String, RenderError> {
    let mut pass = RenderPass::new(registry, ops);
    for (index, op) in ops.iter().enumerate() {
        pass.op(index, op)?;
    }
    pass.finish()
}

/// State for a single render call.
struct RenderPass<'r, 'a> {
    registry: &'r Registry<'a>,
    ops: &'r [Op],
    state: FormatState,
    /// Finished blocks.
    html: String,
    /// Inline content of the block in progress. Its opening tag is only
    /// known once the terminating `\n` arrives.
    inline: String,
}

impl<'r, 'a> RenderPass<'r, 'a> {
    fn new(registry: &'r Registry<'a>, ops: &'r [Op]) -> Self {
        Self {
            registry,
            ops,
            state: FormatState::new(),
            html: String::new(),
            inline: String::new(),
        }
    }

    fn op(&mut self, index: usize, op: &'r Op) -> Result<(), RenderError> {
        let formatters = self.formatters(index, op)?;

        if let Some(writer) = formatters.iter().find_map(Formatter::as_writer) {
            writer.write(&mut self.inline)?;
            return Ok(());
        }

        if !op.data.contains('\n') {
            if !op.data.is_empty() {
                self.write_inline(op, &op.data, &formatters)?;
            }
            return Ok(());
        }

        // "a\nb\n" is: inline "a", end of block, inline "b", end of block.
        let segments: Vec<&str> = op.data.split('\n').collect();
        let last = segments.len() - 1;
        for (i, segment) in segments.iter().enumerate() {
            if !segment.is_empty() {
                self.write_inline(op, segment, &formatters)?;
            }
            if i < last {
                let next = if i + 1 < last {
                    Some(op)
                } else {
                    self.next_block(index + 1)
                };
                self.write_block(&formatters, next)?;
            }
        }
        Ok(())
    }

    /// The kind formatter first, then one per set attribute in name order.
    fn formatters(&self, index: usize, op: &Op) -> Result<Vec<Formatter>, RenderError> {
        let kind = self
            .registry
            .resolve(&op.kind, op)
            .ok_or_else(|| RenderError::UnknownKind {
                index,
                kind: op.kind.clone(),
            })?;

        let mut formatters = Vec::with_capacity(op.attrs.len() + 1);
        formatters.push(kind);
        for (name, _) in op.set_attrs() {
            match self.registry.resolve(name, op) {
                Some(formatter) => formatters.push(formatter),
                None => tracing::debug!(attr = %name, index, "ignoring unknown attribute"),
            }
        }
        Ok(formatters)
    }

    /// The op holding the next block terminator at or after `from`.
    fn next_block(&self, from: usize) -> Option<&'r Op> {
        self.ops
            .get(from..)?
            .iter()
            .find(|op| op.data.contains('\n') && !self.is_embed(op))
    }

    fn is_embed(&self, op: &Op) -> bool {
        self.registry
            .resolve(&op.kind, op)
            .is_some_and(|f| f.as_writer().is_some())
    }

    fn write_inline(
        &mut self,
        op: &Op,
        text: &str,
        formatters: &[Formatter],
    ) -> Result<(), RenderError> {
        self.state.close_previous(&mut self.inline, op)?;
        self.state.open_new(&mut self.inline, formatters)?;
        html_escape::encode_text_to_string(text, &mut self.inline);
        Ok(())
    }

    /// Writes the block ended by `op`, then closes any block wrappers that
    /// do not continue into `next`.
    fn write_block(
        &mut self,
        formatters: &[Formatter],
        next: Option<&Op>,
    ) -> Result<(), RenderError> {
        self.state.close_inline(&mut self.inline)?;

        for formatter in formatters.iter().filter(|f| f.is_block()) {
            let Some(wrapper) = formatter.as_wrapper() else {
                continue;
            };
            for _ in 0..=MAX_INDENT {
                match wrapper.open_wrap(self.state.entries()) {
                    Some(wrap) if !wrap.open.is_empty() => {
                        self.html.push_str(&wrap.open);
                        self.state.push(Entry::wrapper(wrap, true, formatter.clone()));
                    }
                    _ => break,
                }
            }
        }

        let block = BlockWrap::merge(formatters);
        block.write_open(&mut self.html)?;
        if self.inline.is_empty() {
            self.html.push_str(&self.registry.options().empty_block);
        } else {
            self.html.push_str(&self.inline);
            self.inline.clear();
        }
        block.write_close(&mut self.html)?;

        tracing::trace!(tag = %block.tag_name, "block");

        match next {
            Some(next) => self.state.close_block_wraps(&mut self.html, next)?,
            None => self.state.close_all(&mut self.html)?,
        }
        Ok(())
    }

    fn finish(mut self) -> Result<String, RenderError> {
        if !self.inline.is_empty() {
            tracing::debug!("delta does not end with a newline, closing the last block");
            let terminator = Op::text("\n");
            let formatters = self.formatters(self.ops.len(), &terminator)?;
            self.write_block(&formatters, None)?;
        }
        self.state.close_all(&mut self.html)?;
        Ok(self.html)
    }
}
