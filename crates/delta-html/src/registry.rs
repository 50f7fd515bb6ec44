use crate::formats::{
    AttrClass, AttrStyle, BlockTag, Header, Image, Link, List, Paragraph, Script, Toggle, Video,
};
use crate::formatter::Formatter;
use crate::op::Op;
use crate::options::RenderOptions;

/// Caller hook consulted before the built-in table for every kind and attribute.
pub type CustomFormats<'a> = dyn Fn(&str, &Op) -> Option<Formatter> + 'a;

/// Maps an op kind or attribute name to the formatter that renders it.
pub struct Registry<'a> {
    options: RenderOptions,
    custom: Option<Box<CustomFormats<'a>>>,
}

impl Default for Registry<'_> {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

impl<'a> Registry<'a> {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            custom: None,
        }
    }

    pub fn with_custom<F>(mut self, custom: F) -> Self
    where
        F: Fn(&str, &Op) -> Option<Formatter> + 'a,
    {
        self.custom = Some(Box::new(custom));
        self
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Looks up `keyword` (the op's kind, or one of its attribute names).
    pub fn resolve(&self, keyword: &str, op: &Op) -> Option<Formatter> {
        if let Some(custom) = &self.custom {
            if let Some(formatter) = custom(keyword, op) {
                return Some(formatter);
            }
        }
        self.builtin(keyword, op)
    }

    fn builtin(&self, keyword: &str, op: &Op) -> Option<Formatter> {
        let value = op.attr(keyword);
        let opts = &self.options;

        let formatter = match keyword {
            // kinds
            "text" => Formatter::plain(Paragraph),
            "image" => Formatter::writer(Image::from_op(op)),
            "video" => Formatter::writer(Video::new(
                &op.data,
                smol_str::format_smolstr!("{}video", opts.class_prefix),
            )),

            // inline attributes
            "bold" => Formatter::plain(Toggle::BOLD),
            "italic" => Formatter::plain(Toggle::ITALIC),
            "underline" => Formatter::plain(Toggle::UNDERLINE),
            "strike" => Formatter::plain(Toggle::STRIKE),
            "code" => Formatter::plain(Toggle::CODE),
            "script" => Formatter::plain(Script::new(value)?),
            "color" => Formatter::plain(AttrStyle::color(value)),
            "background" => Formatter::plain(AttrStyle::background(value)),
            "font" => Formatter::plain(AttrClass::inline("font", value, opts.class("font", value))),
            "size" => Formatter::plain(AttrClass::inline("size", value, opts.class("size", value))),
            "link" => Formatter::wrapper(Link::new(value, opts.link_target.clone())),

            // block attributes
            "header" => Formatter::plain(Header::new(value)?),
            "blockquote" => Formatter::plain(BlockTag::BLOCKQUOTE),
            "code-block" => Formatter::plain(BlockTag::CODE_BLOCK),
            "list" => Formatter::wrapper(List::from_op(op)),
            "align" => Formatter::plain(AttrClass::block("align", value, opts.class("align", value))),
            "direction" => Formatter::plain(AttrClass::block(
                "direction",
                value,
                opts.class("direction", value),
            )),
            // List items carry their indent as nesting depth instead.
            "indent" if !op.has_attr("list") => Formatter::plain(AttrClass::block(
                "indent",
                value,
                opts.class("indent", value),
            )),

            _ => return None,
        };
        Some(formatter)
    }
}
