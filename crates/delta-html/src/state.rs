//! The stack of currently open formats.
//!
//! Entries are kept in the order they were opened, so the last entry is the
//! innermost element in the output. HTML cannot close an outer element
//! without first closing everything inside it, so closing an entry that is
//! not innermost closes the entries above it, then reopens the ones that
//! still apply.

use std::cmp::Ordering;
use std::fmt::{self, Write};

use crate::format::{Entry, Format, Place, Wrap};
use crate::formatter::Formatter;
use crate::op::Op;

#[derive(Debug, Default)]
pub struct FormatState {
    open: Vec<Entry>,
}

/// What a sweep decides for one entry.
enum Verdict {
    Keep,
    /// Close with the entry's own closing markup.
    Close,
    /// Close by writing this markup instead.
    CloseWith(String),
}

/// A formatter that wants something opened for the current op.
#[derive(Debug)]
pub(crate) struct Candidate {
    formatter: Formatter,
    wrap: Option<Wrap>,
    format: Option<Format>,
}

impl Candidate {
    /// `None` for writers and block formats, which never open inline.
    pub(crate) fn new(formatter: &Formatter, open: &[Entry]) -> Option<Self> {
        if formatter.as_writer().is_some() || formatter.is_block() {
            return None;
        }
        let wrap = formatter.as_wrapper().and_then(|w| w.open_wrap(open));
        let format = formatter.format();
        if wrap.is_none() && format.is_none() {
            return None;
        }
        Some(Self {
            formatter: formatter.clone(),
            wrap,
            format,
        })
    }

    fn is_wrapper(&self) -> bool {
        self.formatter.as_wrapper().is_some()
    }

    fn sort_key(&self) -> (Place, &str) {
        match (&self.wrap, &self.format) {
            (Some(wrap), _) => (Place::Tag, wrap.open.as_str()),
            (None, Some(format)) => (format.place, format.value.as_str()),
            (None, None) => (Place::Tag, ""),
        }
    }
}

impl FormatState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.open
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    /// Whether an entry with the same place and value is already open.
    pub fn is_open(&self, format: &Format) -> bool {
        self.open.iter().any(|e| e.format().same_as(format))
    }

    fn is_wrap_open(&self, wrap: &Wrap) -> bool {
        self.open
            .iter()
            .any(|e| e.is_wrap() && e.value() == wrap.open)
    }

    /// Appends an entry as the innermost one. Entries with an empty value
    /// have nothing to write and are dropped.
    pub fn push(&mut self, entry: Entry) {
        if entry.value().is_empty() {
            tracing::trace!("ignoring format with an empty value");
            return;
        }
        tracing::trace!(value = entry.value(), place = ?entry.place(), "open");
        self.open.push(entry);
    }

    /// Removes the innermost entry.
    ///
    /// Popping an empty stack means the open and close paths went out of
    /// step; that is a bug in the renderer, not in the input.
    pub fn pop(&mut self) -> Option<Entry> {
        let entry = self.open.pop();
        debug_assert!(entry.is_some(), "popped an empty format state");
        match &entry {
            Some(entry) => tracing::trace!(value = entry.value(), "close"),
            None => tracing::error!("popped an empty format state"),
        }
        entry
    }

    /// Orders a batch of formats that open on the same op: wrappers first,
    /// then tags, classes and styles, then by value. Attribute order on the
    /// wire never shows up in the output.
    pub(crate) fn canonical_order(batch: &mut [Candidate]) {
        batch.sort_by(|a, b| match (a.is_wrapper(), b.is_wrapper()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => a.sort_key().cmp(&b.sort_key()),
        });
    }

    /// Closes every inline format the previous ops opened that `op` no
    /// longer has. Block-level entries are left alone.
    pub fn close_previous<W: Write + ?Sized>(&mut self, out: &mut W, op: &Op) -> fmt::Result {
        self.sweep(out, |open| {
            let Some(entry) = open.last() else {
                return Verdict::Keep;
            };
            if entry.is_block() {
                return Verdict::Keep;
            }
            if let Some(wrapper) = entry.origin().as_wrapper().filter(|_| entry.is_wrap()) {
                return match wrapper.close_wrap(open, op) {
                    Some(markup) if !markup.is_empty() => Verdict::CloseWith(markup),
                    _ => Verdict::Keep,
                };
            }
            if entry.origin().has_format(op) {
                Verdict::Keep
            } else {
                Verdict::Close
            }
        })
    }

    /// Asks block-level wrappers whether they end before `next`, the op that
    /// terminates the following block.
    pub fn close_block_wraps<W: Write + ?Sized>(&mut self, out: &mut W, next: &Op) -> fmt::Result {
        self.sweep(out, |open| {
            let Some(entry) = open.last() else {
                return Verdict::Keep;
            };
            let wrapper = entry
                .origin()
                .as_wrapper()
                .filter(|_| entry.is_wrap() && entry.is_block());
            match wrapper.and_then(|w| w.close_wrap(open, next)) {
                Some(markup) if !markup.is_empty() => Verdict::CloseWith(markup),
                _ => Verdict::Keep,
            }
        })
    }

    /// Closes all inline entries, so nothing inline straddles a block boundary.
    pub fn close_inline<W: Write + ?Sized>(&mut self, out: &mut W) -> fmt::Result {
        while self.open.last().is_some_and(|e| !e.is_block()) {
            if let Some(entry) = self.pop() {
                entry.write_close(out)?;
            }
        }
        Ok(())
    }

    /// Closes everything that is still open.
    pub fn close_all<W: Write + ?Sized>(&mut self, out: &mut W) -> fmt::Result {
        while !self.open.is_empty() {
            if let Some(entry) = self.pop() {
                entry.write_close(out)?;
            }
        }
        Ok(())
    }

    /// Opens the formats in `formatters` that are not open yet, in canonical order.
    pub fn open_new<W: Write + ?Sized>(
        &mut self,
        out: &mut W,
        formatters: &[Formatter],
    ) -> fmt::Result {
        let mut batch: Vec<Candidate> = formatters
            .iter()
            .filter_map(|f| Candidate::new(f, &self.open))
            .collect();
        Self::canonical_order(&mut batch);

        for candidate in batch {
            if let Some(wrap) = candidate.wrap {
                if !self.is_wrap_open(&wrap) {
                    out.write_str(&wrap.open)?;
                    self.push(Entry::wrapper(wrap, false, candidate.formatter.clone()));
                }
            }
            if let Some(format) = candidate.format {
                if !self.is_open(&format) {
                    let entry = Entry::new(format, candidate.formatter);
                    entry.write_open(out)?;
                    self.push(entry);
                }
            }
        }
        Ok(())
    }

    /// Walks the stack from the innermost entry outwards, closing whatever
    /// `verdict` says should close. Entries above a closing one are closed
    /// first and reopened, in their original order, once the walk is done.
    fn sweep<W, F>(&mut self, out: &mut W, mut verdict: F) -> fmt::Result
    where
        W: Write + ?Sized,
        F: FnMut(&[Entry]) -> Verdict,
    {
        let mut reopen = Vec::new();

        for i in (0..self.open.len()).rev() {
            let markup = match verdict(&self.open[..=i]) {
                Verdict::Keep => continue,
                Verdict::Close => None,
                Verdict::CloseWith(markup) => Some(markup),
            };

            while self.open.len() > i + 1 {
                if let Some(above) = self.pop() {
                    above.write_close(out)?;
                    reopen.push(above);
                }
            }
            if let Some(entry) = self.pop() {
                match markup {
                    Some(markup) => out.write_str(&markup)?,
                    None => entry.write_close(out)?,
                }
            }
        }

        for entry in reopen.into_iter().rev() {
            entry.write_open(out)?;
            self.push(entry);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;

    fn formatter(keyword: &str, op: &Op) -> Formatter {
        Registry::default().resolve(keyword, op).unwrap()
    }

    fn entry(keyword: &str, op: &Op) -> Entry {
        let f = formatter(keyword, op);
        Entry::new(f.format().unwrap(), f)
    }

    fn values(state: &FormatState) -> Vec<&str> {
        state.entries().iter().map(|e| e.value()).collect()
    }

    #[test]
    fn test_push_does_not_dedupe() {
        let op = Op::text("stuff").with_flag("italic");
        let mut state = FormatState::new();
        state.push(entry("italic", &op));
        state.push(entry("italic", &op));
        assert_eq!(values(&state), ["em", "em"]);
        assert!(state.is_open(&Format::tag("em")));
        assert!(!state.is_open(&Format::class("em")));
    }

    #[test]
    fn test_push_drops_empty_values() {
        let mut state = FormatState::new();
        let f = formatter("bold", &Op::text("x"));
        state.push(Entry::new(Format::tag(""), f));
        assert!(state.is_empty());
    }

    #[test]
    fn test_close_previous_closes_in_reverse_order() {
        let styled = Op::text("x").with_flag("italic").with_flag("bold");
        let mut state = FormatState::new();
        state.push(entry("italic", &styled));
        state.push(entry("bold", &styled));

        let mut out = String::new();
        state.close_previous(&mut out, &Op::text("stuff")).unwrap();
        assert_eq!(out, "</strong></em>");
        assert!(state.is_empty());
    }

    #[test]
    fn test_close_previous_reopens_inner_formats() {
        let styled = Op::text("x")
            .with_flag("italic")
            .with_flag("bold")
            .with_flag("underline");
        let mut state = FormatState::new();
        state.push(entry("italic", &styled));
        state.push(entry("bold", &styled));
        state.push(entry("underline", &styled));

        // Italic ends; bold and underline carry on.
        let next = Op::text("y").with_flag("bold").with_flag("underline");
        let mut out = String::new();
        state.close_previous(&mut out, &next).unwrap();
        assert_eq!(out, "</u></strong></em><strong><u>");
        assert_eq!(values(&state), ["strong", "u"]);
    }

    #[test]
    fn test_close_previous_with_two_gaps() {
        let styled = Op::text("x")
            .with_flag("italic")
            .with_flag("bold")
            .with_flag("underline")
            .with_flag("strike");
        let mut state = FormatState::new();
        for keyword in ["italic", "bold", "underline", "strike"] {
            state.push(entry(keyword, &styled));
        }

        let next = Op::text("y").with_flag("bold").with_flag("strike");
        let mut out = String::new();
        state.close_previous(&mut out, &next).unwrap();
        assert_eq!(out, "</s></u></strong></em><strong><s>");
        assert_eq!(values(&state), ["strong", "s"]);
    }

    #[test]
    fn test_close_previous_skips_block_entries() {
        let item = Op::text("\n").with_attr("list", "bullet");
        let list = formatter("list", &item);
        let wrap = list.as_wrapper().unwrap().open_wrap(&[]).unwrap();

        let mut state = FormatState::new();
        state.push(Entry::wrapper(wrap, true, list));
        state.push(entry("bold", &Op::text("x").with_flag("bold")));

        let mut out = String::new();
        state.close_previous(&mut out, &Op::text("plain")).unwrap();
        assert_eq!(out, "</strong>");
        assert_eq!(values(&state), ["<ul>"]);
    }

    #[test]
    fn test_link_wrapper_closes_when_href_changes() {
        let first = Op::text("a").with_attr("link", "https://a.example");
        let mut state = FormatState::new();
        let mut out = String::new();
        state
            .open_new(&mut out, &[formatter("link", &first)])
            .unwrap();
        assert_eq!(out, "<a href=\"https://a.example\" target=\"_blank\">");

        out.clear();
        state.close_previous(&mut out, &first).unwrap();
        assert_eq!(out, "");

        let second = Op::text("b").with_attr("link", "https://b.example");
        state.close_previous(&mut out, &second).unwrap();
        assert_eq!(out, "</a>");
        assert!(state.is_empty());
    }

    #[test]
    fn test_wrapper_inside_closing_tag_is_reopened() {
        let both = Op::text("x").with_flag("bold").with_attr("link", "/l");
        let mut state = FormatState::new();
        let mut out = String::new();
        state.push(entry("bold", &both));
        state.open_new(&mut out, &[formatter("link", &both)]).unwrap();

        out.clear();
        let link_only = Op::text("y").with_attr("link", "/l");
        state.close_previous(&mut out, &link_only).unwrap();
        assert_eq!(out, "</a></strong><a href=\"/l\" target=\"_blank\">");
        assert_eq!(state.entries().len(), 1);
        assert!(state.entries()[0].is_wrap());
    }

    #[test]
    fn test_canonical_order() {
        let op = Op::text("stuff")
            .with_flag("bold")
            .with_flag("italic")
            .with_flag("underline")
            .with_attr("color", "#e0e0e0")
            .with_attr("font", "serif")
            .with_attr("link", "https://widerwebs.com");

        let cases: &[(&[&str], &[&str])] = &[
            (&["bold", "italic"], &["em", "strong"]),
            (&["underline", "font", "bold"], &["strong", "u", "font-serif"]),
            (&["color", "italic"], &["em", "color:#e0e0e0;"]),
            (
                &["italic", "link"],
                &["<a href=\"https://widerwebs.com\" target=\"_blank\">", "em"],
            ),
        ];

        for (input, want) in cases {
            let mut batch: Vec<Candidate> = input
                .iter()
                .filter_map(|k| Candidate::new(&formatter(k, &op), &[]))
                .collect();
            FormatState::canonical_order(&mut batch);
            let got: Vec<&str> = batch.iter().map(|c| c.sort_key().1).collect();
            assert_eq!(&got, want, "ordering {:?}", input);
        }
    }

    #[test]
    fn test_open_new_is_order_independent() {
        let op = Op::text("x")
            .with_flag("bold")
            .with_flag("italic")
            .with_attr("color", "red");
        let keywords = ["bold", "italic", "color"];
        let mut outputs = Vec::new();
        for rotation in 0..keywords.len() {
            let mut ks = keywords.to_vec();
            ks.rotate_left(rotation);
            let formatters: Vec<_> = ks.iter().map(|k| formatter(k, &op)).collect();
            let mut state = FormatState::new();
            let mut out = String::new();
            state.open_new(&mut out, &formatters).unwrap();
            outputs.push(out);
        }
        assert!(outputs.iter().all(|o| o == &outputs[0]));
        assert_eq!(outputs[0], "<em><strong><span style=\"color:red;\">");
    }

    #[test]
    fn test_open_new_skips_open_and_block_formats() {
        let op = Op::text("x").with_flag("bold").with_attr("header", "1");
        let mut state = FormatState::new();
        state.push(entry("bold", &op));

        let mut out = String::new();
        state
            .open_new(
                &mut out,
                &[formatter("text", &op), formatter("bold", &op), formatter("header", &op)],
            )
            .unwrap();
        assert_eq!(out, "");
        assert_eq!(values(&state), ["strong"]);
    }

    #[test]
    fn test_close_inline_and_close_all() {
        let item = Op::text("\n").with_attr("list", "ordered");
        let list = formatter("list", &item);
        let wrap = list.as_wrapper().unwrap().open_wrap(&[]).unwrap();

        let mut state = FormatState::new();
        state.push(Entry::wrapper(wrap, true, list));
        state.push(entry("italic", &Op::text("x").with_flag("italic")));

        let mut out = String::new();
        state.close_inline(&mut out).unwrap();
        assert_eq!(out, "</em>");
        state.close_all(&mut out).unwrap();
        assert_eq!(out, "</em></ol>");
        assert!(state.is_empty());
    }

    #[test]
    fn test_close_block_wraps_uses_next_block() {
        let item = Op::text("\n").with_attr("list", "bullet");
        let list = formatter("list", &item);
        let wrap = list.as_wrapper().unwrap().open_wrap(&[]).unwrap();
        let mut state = FormatState::new();
        state.push(Entry::wrapper(wrap, true, list));

        let mut out = String::new();
        state.close_block_wraps(&mut out, &item).unwrap();
        assert_eq!(out, "");
        state.close_block_wraps(&mut out, &Op::text("\n")).unwrap();
        assert_eq!(out, "</ul>");
        assert!(state.is_empty());
    }
}
