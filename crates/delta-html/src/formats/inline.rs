use smol_str::SmolStr;

use crate::format::{Entry, Format, Wrap};
use crate::formatter::{FormatRule, WrapRule};
use crate::op::Op;

/// A boolean attribute rendered as a plain tag (`bold` → `strong`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggle {
    attr: &'static str,
    tag: &'static str,
}

impl Toggle {
    pub const BOLD: Toggle = Toggle::new("bold", "strong");
    pub const ITALIC: Toggle = Toggle::new("italic", "em");
    pub const UNDERLINE: Toggle = Toggle::new("underline", "u");
    pub const STRIKE: Toggle = Toggle::new("strike", "s");
    pub const CODE: Toggle = Toggle::new("code", "code");

    pub const fn new(attr: &'static str, tag: &'static str) -> Self {
        Self { attr, tag }
    }
}

impl FormatRule for Toggle {
    fn format(&self) -> Option<Format> {
        Some(Format::tag(self.tag))
    }

    fn has_format(&self, op: &Op) -> bool {
        op.has_attr(self.attr)
    }
}

/// `script: sub` / `script: super`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    value: String,
}

impl Script {
    /// `None` for anything other than `sub` or `super`.
    pub fn new(value: &str) -> Option<Self> {
        matches!(value, "sub" | "super").then(|| Self {
            value: value.to_owned(),
        })
    }
}

impl FormatRule for Script {
    fn format(&self) -> Option<Format> {
        let tag = if self.value == "sub" { "sub" } else { "sup" };
        Some(Format::tag(tag))
    }

    fn has_format(&self, op: &Op) -> bool {
        op.attr("script") == self.value
    }
}

/// An attribute whose value lands in a style declaration (`color: #fff` → `color:#fff;`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrStyle {
    attr: &'static str,
    value: String,
    declaration: SmolStr,
}

impl AttrStyle {
    pub fn new(attr: &'static str, property: &str, value: &str) -> Self {
        Self {
            attr,
            value: value.to_owned(),
            declaration: smol_str::format_smolstr!("{}:{};", property, value),
        }
    }

    pub fn color(value: &str) -> Self {
        Self::new("color", "color", value)
    }

    pub fn background(value: &str) -> Self {
        Self::new("background", "background-color", value)
    }
}

impl FormatRule for AttrStyle {
    fn format(&self) -> Option<Format> {
        Some(Format::style(self.declaration.clone()))
    }

    fn has_format(&self, op: &Op) -> bool {
        op.attr(self.attr) == self.value
    }
}

/// An attribute whose value becomes a class, inline (`font`, `size`) or on
/// the block (`align`, `direction`, `indent`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrClass {
    attr: &'static str,
    value: String,
    class: SmolStr,
    block: bool,
}

impl AttrClass {
    pub fn inline(attr: &'static str, value: &str, class: SmolStr) -> Self {
        Self {
            attr,
            value: value.to_owned(),
            class,
            block: false,
        }
    }

    pub fn block(attr: &'static str, value: &str, class: SmolStr) -> Self {
        Self {
            block: true,
            ..Self::inline(attr, value, class)
        }
    }
}

impl FormatRule for AttrClass {
    fn format(&self) -> Option<Format> {
        let format = Format::class(self.class.clone());
        Some(if self.block { format.block() } else { format })
    }

    fn has_format(&self, op: &Op) -> bool {
        op.attr(self.attr) == self.value
    }
}

/// Anchors around a run of ops sharing the same `link`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    href: String,
    target: Option<SmolStr>,
}

impl Link {
    pub fn new(href: &str, target: Option<SmolStr>) -> Self {
        Self {
            href: href.to_owned(),
            target,
        }
    }
}

impl FormatRule for Link {
    // A wrapper only.
    fn format(&self) -> Option<Format> {
        None
    }

    fn has_format(&self, op: &Op) -> bool {
        op.attr("link") == self.href
    }
}

impl WrapRule for Link {
    fn open_wrap(&self, _open: &[Entry]) -> Option<Wrap> {
        let href = html_escape::encode_double_quoted_attribute(&self.href);
        let open = match &self.target {
            Some(target) => format!(
                "<a href=\"{}\" target=\"{}\">",
                href,
                html_escape::encode_double_quoted_attribute(target)
            ),
            None => format!("<a href=\"{}\">", href),
        };
        Some(Wrap::new(open, "</a>"))
    }

    fn close_wrap(&self, _open: &[Entry], next: &Op) -> Option<String> {
        if self.has_format(next) {
            None
        } else {
            Some("</a>".to_owned())
        }
    }
}
