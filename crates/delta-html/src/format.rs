use std::fmt::{self, Write};

use smol_str::SmolStr;

use crate::formatter::Formatter;

/// Where a format ends up in the markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Place {
    /// An HTML tag name such as `strong`.
    Tag,
    /// A CSS class, written on a `span` inline or merged into the block tag.
    Class,
    /// A style declaration such as `color:#a10000;`.
    Style,
}

/// What a formatter wants written for one op.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Format {
    pub value: SmolStr,
    pub place: Place,
    /// Block formats are only written once the terminating `\n` is reached.
    pub block: bool,
}

impl Format {
    pub fn tag(value: impl Into<SmolStr>) -> Self {
        Self {
            value: value.into(),
            place: Place::Tag,
            block: false,
        }
    }

    pub fn class(value: impl Into<SmolStr>) -> Self {
        Self {
            value: value.into(),
            place: Place::Class,
            block: false,
        }
    }

    pub fn style(value: impl Into<SmolStr>) -> Self {
        Self {
            value: value.into(),
            place: Place::Style,
            block: false,
        }
    }

    pub fn block(mut self) -> Self {
        self.block = true;
        self
    }

    pub(crate) fn same_as(&self, other: &Format) -> bool {
        self.place == other.place && self.value == other.value
    }
}

/// A matched pair of literal opening and closing markup, e.g. `<ul>` / `</ul>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wrap {
    pub open: String,
    pub close: String,
}

impl Wrap {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }
}

/// One open format on the state stack, with the formatter that produced it.
///
/// Wrapper entries are Tag-placed, carry their literal opening markup as
/// the value and remember the markup that closes them.
#[derive(Debug, Clone)]
pub struct Entry {
    format: Format,
    origin: Formatter,
    wrap_close: Option<String>,
}

impl Entry {
    pub fn new(format: Format, origin: Formatter) -> Self {
        Self {
            format,
            origin,
            wrap_close: None,
        }
    }

    pub fn wrapper(wrap: Wrap, block: bool, origin: Formatter) -> Self {
        Self {
            format: Format {
                value: SmolStr::from(wrap.open),
                place: Place::Tag,
                block,
            },
            origin,
            wrap_close: Some(wrap.close),
        }
    }

    pub fn format(&self) -> &Format {
        &self.format
    }

    pub fn value(&self) -> &str {
        &self.format.value
    }

    pub fn place(&self) -> Place {
        self.format.place
    }

    pub fn is_block(&self) -> bool {
        self.format.block
    }

    pub fn is_wrap(&self) -> bool {
        self.wrap_close.is_some()
    }

    pub fn origin(&self) -> &Formatter {
        &self.origin
    }

    pub(crate) fn write_open<W: Write + ?Sized>(&self, out: &mut W) -> fmt::Result {
        if self.is_wrap() {
            return out.write_str(&self.format.value);
        }
        let value = html_escape::encode_double_quoted_attribute(&self.format.value);
        match self.format.place {
            Place::Tag => write!(out, "<{}>", value),
            Place::Class => write!(out, "<span class=\"{}\">", value),
            Place::Style => write!(out, "<span style=\"{}\">", value),
        }
    }

    pub(crate) fn write_close<W: Write + ?Sized>(&self, out: &mut W) -> fmt::Result {
        match (&self.wrap_close, self.format.place) {
            (Some(close), _) => out.write_str(close),
            (None, Place::Tag) => close_tag(out, &self.format.value),
            (None, Place::Class | Place::Style) => close_tag(out, "span"),
        }
    }
}

/// Writes `</name>`.
pub(crate) fn close_tag<W: Write + ?Sized>(out: &mut W, name: &str) -> fmt::Result {
    write!(out, "</{}>", name)
}
