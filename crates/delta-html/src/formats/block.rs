use std::num::IntErrorKind;

use crate::format::{Entry, Format, Wrap};
use crate::formatter::{FormatRule, WrapRule};
use crate::op::Op;

/// Deepest list indent the renderer will nest.
pub const MAX_INDENT: u8 = 8;

/// Text ops default to paragraphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paragraph;

impl FormatRule for Paragraph {
    fn format(&self) -> Option<Format> {
        Some(Format::tag("p").block())
    }

    fn has_format(&self, op: &Op) -> bool {
        op.is_text()
    }
}

/// A boolean attribute that swaps the block tag (`blockquote`, `code-block` → `pre`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockTag {
    attr: &'static str,
    tag: &'static str,
}

impl BlockTag {
    pub const BLOCKQUOTE: BlockTag = BlockTag {
        attr: "blockquote",
        tag: "blockquote",
    };
    pub const CODE_BLOCK: BlockTag = BlockTag {
        attr: "code-block",
        tag: "pre",
    };
}

impl FormatRule for BlockTag {
    fn format(&self) -> Option<Format> {
        Some(Format::tag(self.tag).block())
    }

    fn has_format(&self, op: &Op) -> bool {
        op.has_attr(self.attr)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    level: u8,
}

impl Header {
    /// Only levels 1 through 6 exist in HTML.
    pub fn new(level: &str) -> Option<Self> {
        match level.parse::<u8>() {
            Ok(level @ 1..=6) => Some(Self { level }),
            _ => None,
        }
    }
}

impl FormatRule for Header {
    fn format(&self) -> Option<Format> {
        Some(Format::tag(smol_str::format_smolstr!("h{}", self.level)).block())
    }

    fn has_format(&self, op: &Op) -> bool {
        op.attr("header").parse::<u8>().ok() == Some(self.level)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListType {
    Bullet,
    Ordered,
}

impl ListType {
    /// `ordered` is the only numbered type; `bullet`, `checked`, `unchecked`
    /// and anything unrecognised render as a bullet list.
    pub fn from_attr(value: &str) -> Self {
        match value {
            "ordered" => ListType::Ordered,
            _ => ListType::Bullet,
        }
    }

    fn tag(self) -> &'static str {
        match self {
            ListType::Bullet => "ul",
            ListType::Ordered => "ol",
        }
    }

    fn open_tag(self) -> &'static str {
        match self {
            ListType::Bullet => "<ul>",
            ListType::Ordered => "<ol>",
        }
    }

    fn wrap(self) -> Wrap {
        Wrap::new(self.open_tag(), format!("</{}>", self.tag()))
    }

    fn is_wrap_of(self, entry: &Entry) -> bool {
        entry.is_wrap() && entry.value() == self.open_tag()
    }
}

/// List items. The item itself is an `li` block; the `ul`/`ol` around a run
/// of items is a block-level wrap opened and closed by the block assembler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    list_type: ListType,
    indent: u8,
}

impl List {
    pub fn new(list_type: ListType, indent: u8) -> Self {
        Self {
            list_type,
            indent: indent.min(MAX_INDENT),
        }
    }

    pub fn from_op(op: &Op) -> Self {
        Self::new(ListType::from_attr(op.attr("list")), indent_of(op))
    }
}

/// The `indent` attribute as a depth, `0` when absent or garbled.
pub fn indent_of(op: &Op) -> u8 {
    match op.attr("indent").parse::<u64>() {
        Ok(indent) => indent.min(u64::from(MAX_INDENT)) as u8,
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => MAX_INDENT,
        Err(_) => 0,
    }
}

fn is_list_wrap(entry: &Entry) -> bool {
    ListType::Bullet.is_wrap_of(entry) || ListType::Ordered.is_wrap_of(entry)
}

fn list_depth(open: &[Entry]) -> usize {
    open.iter().filter(|e| is_list_wrap(e)).count()
}

impl FormatRule for List {
    fn format(&self) -> Option<Format> {
        Some(Format::tag("li").block())
    }

    fn has_format(&self, op: &Op) -> bool {
        op.has_attr("list")
    }
}

impl WrapRule for List {
    /// An item at indent `n` sits `n + 1` lists deep; open one more level
    /// while that depth is not yet reached.
    fn open_wrap(&self, open: &[Entry]) -> Option<Wrap> {
        (list_depth(open) <= self.indent as usize).then(|| self.list_type.wrap())
    }

    fn close_wrap(&self, open: &[Entry], next: &Op) -> Option<String> {
        let entry = open.last()?;
        let own_type = if ListType::Ordered.is_wrap_of(entry) {
            ListType::Ordered
        } else {
            ListType::Bullet
        };
        let depth = list_depth(open);

        let keep_open = next.has_attr("list") && {
            let next_depth = indent_of(next) as usize + 1;
            let next_type = ListType::from_attr(next.attr("list"));
            next_depth > depth || (next_depth == depth && next_type == own_type)
        };
        (!keep_open).then(|| own_type.wrap().close)
    }
}
