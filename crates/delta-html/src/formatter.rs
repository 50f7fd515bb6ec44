//! How a kind or an attribute gets rendered.
//!
//! Every formatter falls into one of three capability sets, so they are
//! modelled as a closed sum type instead of probing trait objects at each
//! call site:
//!
//! - [`Formatter::Plain`] yields at most one [`Format`] per op and says
//!   whether a later op still has it.
//! - [`Formatter::Wrapper`] additionally injects a literal markup pair
//!   around a whole run of ops (list grouping, link anchors).
//! - [`Formatter::Writer`] does not open or close anything; it writes the
//!   complete element for its op in one go (embeds).

use std::fmt;
use std::rc::Rc;

use crate::format::{Entry, Format, Wrap};
use crate::op::Op;

pub trait FormatRule: fmt::Debug {
    /// The format to apply, if this formatter has one of its own.
    fn format(&self) -> Option<Format>;

    /// Whether `op` still carries the format this formatter was built for.
    fn has_format(&self, op: &Op) -> bool;
}

pub trait WrapRule: FormatRule {
    /// Given the currently open entries, the pair to open now, if any.
    ///
    /// Block-level wrappers are asked again after each pair they return,
    /// until they return `None`, so one call opens at most one level.
    fn open_wrap(&self, open: &[Entry]) -> Option<Wrap>;

    /// Given the open entries up to and including this wrapper's entry and
    /// the upcoming op, the markup that closes the wrap, or `None` to keep
    /// it open.
    fn close_wrap(&self, open: &[Entry], next: &Op) -> Option<String>;
}

pub trait EmbedWriter: fmt::Debug {
    /// Writes the entire element.
    fn write(&self, out: &mut dyn fmt::Write) -> fmt::Result;
}

#[derive(Debug, Clone)]
pub enum Formatter {
    Plain(Rc<dyn FormatRule>),
    Wrapper(Rc<dyn WrapRule>),
    Writer(Rc<dyn EmbedWriter>),
}

impl Formatter {
    pub fn plain(rule: impl FormatRule + 'static) -> Self {
        Self::Plain(Rc::new(rule))
    }

    pub fn wrapper(rule: impl WrapRule + 'static) -> Self {
        Self::Wrapper(Rc::new(rule))
    }

    pub fn writer(writer: impl EmbedWriter + 'static) -> Self {
        Self::Writer(Rc::new(writer))
    }

    pub fn format(&self) -> Option<Format> {
        match self {
            Formatter::Plain(rule) => rule.format(),
            Formatter::Wrapper(rule) => rule.format(),
            Formatter::Writer(_) => None,
        }
    }

    /// Writers never keep anything open, so they never "still have" a format.
    pub fn has_format(&self, op: &Op) -> bool {
        match self {
            Formatter::Plain(rule) => rule.has_format(op),
            Formatter::Wrapper(rule) => rule.has_format(op),
            Formatter::Writer(_) => false,
        }
    }

    pub fn is_block(&self) -> bool {
        self.format().is_some_and(|f| f.block)
    }

    pub fn as_wrapper(&self) -> Option<&dyn WrapRule> {
        match self {
            Formatter::Wrapper(rule) => Some(rule.as_ref()),
            _ => None,
        }
    }

    pub fn as_writer(&self) -> Option<&dyn EmbedWriter> {
        match self {
            Formatter::Writer(writer) => Some(writer.as_ref()),
            _ => None,
        }
    }
}
