use std::fmt::{self, Write};

use smol_str::SmolStr;

use crate::format::{Place, close_tag};
use crate::formatter::Formatter;

/// The single element a block is written as, merged from every block-level
/// format on the terminating op.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BlockWrap {
    pub tag_name: SmolStr,
    pub classes: Vec<SmolStr>,
    pub style: String,
}

impl BlockWrap {
    /// `formatters` starts with the op's kind formatter, which supplies the
    /// default tag; attribute formatters follow in attribute-name order and
    /// a Tag-placed one overrides it.
    pub fn merge(formatters: &[Formatter]) -> Self {
        let mut wrap = BlockWrap::default();
        for format in formatters.iter().filter_map(Formatter::format) {
            if !format.block || format.value.is_empty() {
                continue;
            }
            match format.place {
                Place::Tag => wrap.tag_name = format.value,
                Place::Class => {
                    if !wrap.classes.contains(&format.value) {
                        wrap.classes.push(format.value);
                    }
                }
                Place::Style => wrap.style.push_str(&format.value),
            }
        }
        wrap
    }

    pub fn write_open<W: Write + ?Sized>(&self, out: &mut W) -> fmt::Result {
        if self.tag_name.is_empty() {
            return Ok(());
        }
        write!(out, "<{}", self.tag_name)?;
        if !self.classes.is_empty() {
            let classes = self.classes.join(" ");
            write!(
                out,
                " class=\"{}\"",
                html_escape::encode_double_quoted_attribute(&classes)
            )?;
        }
        if !self.style.is_empty() {
            write!(
                out,
                " style=\"{}\"",
                html_escape::encode_double_quoted_attribute(&self.style)
            )?;
        }
        out.write_char('>')
    }

    pub fn write_close<W: Write + ?Sized>(&self, out: &mut W) -> fmt::Result {
        if self.tag_name.is_empty() {
            return Ok(());
        }
        close_tag(out, &self.tag_name)
    }
}
