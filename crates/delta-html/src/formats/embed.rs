use std::fmt;

use html_escape::encode_double_quoted_attribute as attr;
use smol_str::SmolStr;

use crate::formatter::EmbedWriter;
use crate::op::Op;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    src: String,
    alt: Option<String>,
    width: Option<String>,
}

impl Image {
    pub fn from_op(op: &Op) -> Self {
        let optional = |name: &str| op.has_attr(name).then(|| op.attr(name).to_owned());
        Self {
            src: op.data.clone(),
            alt: optional("alt"),
            width: optional("width"),
        }
    }
}

impl EmbedWriter for Image {
    fn write(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        write!(out, "<img src=\"{}\"", attr(&self.src))?;
        if let Some(alt) = &self.alt {
            write!(out, " alt=\"{}\"", attr(alt))?;
        }
        if let Some(width) = &self.width {
            write!(out, " width=\"{}\"", attr(width))?;
        }
        out.write_char('>')
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Video {
    src: String,
    class: SmolStr,
}

impl Video {
    pub fn new(src: &str, class: SmolStr) -> Self {
        Self {
            src: src.to_owned(),
            class,
        }
    }
}

impl EmbedWriter for Video {
    fn write(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        write!(
            out,
            "<iframe class=\"{}\" src=\"{}\" frameborder=\"0\" allowfullscreen=\"true\"></iframe>",
            attr(&self.class),
            attr(&self.src)
        )
    }
}
