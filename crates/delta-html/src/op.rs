use std::collections::BTreeMap;

use smol_str::SmolStr;

/// Value stored for an attribute that was `true` on the wire.
pub const TRUE_SENTINEL: &str = "y";

/// The op kind of plain string inserts.
pub const TEXT_KIND: &str = "text";

/// One Delta insert operation, decoded into a form the renderer can work with.
///
/// Attributes live in an ordered map so that walking them never depends on
/// the order they were supplied in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Op {
    /// The text to insert, or the value of the embed (an image URL, say).
    pub data: String,
    /// `"text"` for string inserts, otherwise the embed key.
    pub kind: SmolStr,
    /// Attribute name to value. `"y"` means true, `""` means unset.
    pub attrs: BTreeMap<SmolStr, String>,
}

impl Op {
    pub fn text(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            kind: SmolStr::new_static(TEXT_KIND),
            attrs: BTreeMap::new(),
        }
    }

    pub fn embed(kind: impl Into<SmolStr>, data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            kind: kind.into(),
            attrs: BTreeMap::new(),
        }
    }

    /// Builder-style attribute setter, mostly handy in tests and custom formatters.
    pub fn with_attr(mut self, name: impl Into<SmolStr>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Sets a boolean attribute to the true sentinel.
    pub fn with_flag(self, name: impl Into<SmolStr>) -> Self {
        self.with_attr(name, TRUE_SENTINEL)
    }

    /// The attribute value, or `""` when it is absent.
    pub fn attr(&self, name: &str) -> &str {
        self.attrs.get(name).map(String::as_str).unwrap_or("")
    }

    /// Whether the attribute is set to a non-blank value.
    pub fn has_attr(&self, name: &str) -> bool {
        !self.attr(name).is_empty()
    }

    /// Attributes that are actually set, in name order.
    pub fn set_attrs(&self) -> impl Iterator<Item = (&SmolStr, &str)> {
        self.attrs
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (k, v.as_str()))
    }

    pub fn is_text(&self) -> bool {
        self.kind == TEXT_KIND
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_attr_is_unset() {
        let op = Op::text("x").with_attr("italic", "").with_flag("bold");
        assert!(op.has_attr("bold"));
        assert!(!op.has_attr("italic"));
        assert!(!op.has_attr("underline"));
        assert_eq!(op.attr("bold"), "y");
    }

    #[test]
    fn test_set_attrs_sorted_and_filtered() {
        let op = Op::text("x")
            .with_flag("underline")
            .with_attr("color", "#fff")
            .with_attr("italic", "")
            .with_flag("bold");
        let names: Vec<_> = op.set_attrs().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, ["bold", "color", "underline"]);
    }
}
