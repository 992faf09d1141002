// Copyright (c) 2019 Weird Constructor <weirdconstructor@gmail.com>
// This is a part of mushlist. See README.md and COPYING for details.

/*!
Markup aware text.

Markup is ANSI SGR escape sequences (`ESC [ ... m`) embedded in the raw
text. A `MarkupString` keeps the visible text apart from a list of styled
spans. Span offsets are byte offsets into the visible text, so functions
can cut, reorder and splice visible text and re-render the markup that
belongs to each piece afterwards.
*/

const ESC: char = '\x1b';

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start:  usize,
    pub end:    usize,
    /// The concatenated SGR sequences active for this span.
    pub style:  String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MarkupString {
    text:   String,
    spans:  Vec<Span>,
}

/// Quick check whether raw text carries any markup.
pub fn has_markup(raw: &str) -> bool {
    raw.contains(ESC)
}

/// Returns the visible text of `raw`.
pub fn strip_markup(raw: &str) -> String {
    if !has_markup(raw) { return raw.to_string(); }
    MarkupString::parse(raw).text
}

/// Applies `f` to every run of visible text in `raw` and copies the
/// escape sequences between the runs unchanged.
pub fn map_visible<F>(raw: &str, f: F) -> String
    where F: Fn(&str) -> String
{
    let mut out = String::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        match raw[i..].find(ESC).map(|p| p + i) {
            None => {
                out.push_str(&f(&raw[i..]));
                break;
            },
            Some(p) => {
                out.push_str(&f(&raw[i..p]));
                let (seq, after) = read_escape(raw, p);
                out.push_str(seq);
                i = after;
            },
        }
    }
    out
}

/// Reads one escape sequence starting at byte `i` (which holds ESC).
/// Returns the sequence and the offset behind it. Unterminated
/// sequences swallow the rest of the input.
fn read_escape(raw: &str, i: usize) -> (&str, usize) {
    let rest = &raw[i..];
    let b = rest.as_bytes();
    if b.len() < 2 || b[1] != b'[' {
        return (&rest[..1], i + 1);
    }
    for (j, c) in rest.char_indices().skip(2) {
        if c.is_ascii_alphabetic() {
            return (&rest[..=j], i + j + 1);
        }
    }
    (rest, raw.len())
}

fn is_reset(seq: &str) -> bool {
    seq == "\x1b[0m" || seq == "\x1b[m"
}

impl MarkupString {
    pub fn from_plain(text: &str) -> Self {
        Self { text: text.to_string(), spans: vec![] }
    }

    pub fn parse(raw: &str) -> Self {
        let mut text   = String::with_capacity(raw.len());
        let mut spans  = vec![];
        let mut style  = String::new();
        let mut open   = 0;

        let mut i = 0;
        while i < raw.len() {
            let next_esc = raw[i..].find(ESC).map(|p| p + i);
            match next_esc {
                None => {
                    text.push_str(&raw[i..]);
                    break;
                },
                Some(p) => {
                    text.push_str(&raw[i..p]);
                    let (seq, after) = read_escape(raw, p);

                    if !style.is_empty() && text.len() > open {
                        spans.push(Span {
                            start: open,
                            end:   text.len(),
                            style: style.clone(),
                        });
                    }
                    if is_reset(seq) {
                        style.clear();
                    } else if seq.ends_with('m') {
                        style.push_str(seq);
                    }
                    open = text.len();
                    i = after;
                },
            }
        }

        if !style.is_empty() && text.len() > open {
            spans.push(Span { start: open, end: text.len(), style });
        }

        let mut ms = Self { text, spans };
        ms.merge_spans();
        ms
    }

    /// Joins adjacent spans with the same style.
    fn merge_spans(&mut self) {
        let mut merged : Vec<Span> = Vec::with_capacity(self.spans.len());
        for s in self.spans.drain(..) {
            if s.start >= s.end { continue; }
            if let Some(last) = merged.last_mut() {
                if last.end == s.start && last.style == s.style {
                    last.end = s.end;
                    continue;
                }
            }
            merged.push(s);
        }
        self.spans = merged;
    }

    pub fn text(&self) -> &str { &self.text }
    pub fn spans(&self) -> &[Span] { &self.spans }
    pub fn len(&self) -> usize { self.text.len() }
    pub fn is_empty(&self) -> bool { self.text.is_empty() }
    pub fn has_spans(&self) -> bool { !self.spans.is_empty() }

    pub fn render(&self) -> String {
        self.render_range(0, self.text.len())
    }

    /// Renders the visible range `start..end` with every span that
    /// intersects it clipped to the range.
    pub fn render_range(&self, start: usize, end: usize) -> String {
        let end   = end.min(self.text.len());
        let start = start.min(end);
        let mut out = String::with_capacity(end - start);
        let mut pos = start;

        for s in self.spans.iter() {
            if s.end <= start || s.start >= end { continue; }
            let a = s.start.max(start);
            let b = s.end.min(end);
            out.push_str(&self.text[pos..a]);
            out.push_str(&s.style);
            out.push_str(&self.text[a..b]);
            out.push_str("\x1b[0m");
            pos = b;
        }
        out.push_str(&self.text[pos..end]);
        out
    }

    /// Replaces the visible range `start..start+len` with `repl`.
    pub fn splice(&mut self, start: usize, len: usize, repl: &MarkupString) {
        let start = start.min(self.text.len());
        let end   = (start + len).min(self.text.len());
        let new_len = repl.text.len();

        let mut spans = Vec::with_capacity(self.spans.len() + repl.spans.len() + 1);
        let mut tail  = vec![];
        for s in self.spans.drain(..) {
            if s.end <= start {
                spans.push(s);
            } else if s.start >= end {
                tail.push(Span {
                    start: s.start - end + start + new_len,
                    end:   s.end   - end + start + new_len,
                    style: s.style,
                });
            } else {
                if s.start < start {
                    spans.push(Span { start: s.start, end: start, style: s.style.clone() });
                }
                if s.end > end {
                    tail.insert(0, Span {
                        start: start + new_len,
                        end:   s.end - end + start + new_len,
                        style: s.style,
                    });
                }
            }
        }

        for s in repl.spans.iter() {
            spans.push(Span {
                start: s.start + start,
                end:   s.end   + start,
                style: s.style.clone(),
            });
        }
        spans.extend(tail);

        self.text.replace_range(start..end, &repl.text);
        self.spans = spans;
        self.merge_spans();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED:   &str = "\x1b[31m";
    const RESET: &str = "\x1b[0m";

    #[test]
    fn check_parse_plain() {
        let m = MarkupString::parse("hello");
        assert_eq!(m.text(), "hello");
        assert!(!m.has_spans());
        assert_eq!(m.render(), "hello");
    }

    #[test]
    fn check_parse_spans() {
        let raw = format!("a {}red{} b", RED, RESET);
        let m = MarkupString::parse(&raw);
        assert_eq!(m.text(), "a red b");
        assert_eq!(m.spans(), &[Span { start: 2, end: 5, style: RED.to_string() }]);
        assert_eq!(m.render(), raw);
        assert_eq!(strip_markup(&raw), "a red b");
    }

    #[test]
    fn check_render_range_clips() {
        let raw = format!("{}abcdef{}", RED, RESET);
        let m = MarkupString::parse(&raw);
        assert_eq!(m.render_range(2, 4), format!("{}cd{}", RED, RESET));
        assert_eq!(m.render_range(4, 9), format!("{}ef{}", RED, RESET));
    }

    #[test]
    fn check_splice_shifts() {
        let raw = format!("xx{}yy{}zz", RED, RESET);
        let mut m = MarkupString::parse(&raw);
        m.splice(0, 2, &MarkupString::from_plain("abcd"));
        assert_eq!(m.text(), "abcdyyzz");
        assert_eq!(m.spans()[0].start, 4);
        assert_eq!(m.spans()[0].end,   6);

        m.splice(5, 2, &MarkupString::from_plain("-"));
        assert_eq!(m.text(), "abcdy-z");
        assert_eq!(m.spans()[0].start, 4);
        assert_eq!(m.spans()[0].end,   5);
    }

    #[test]
    fn check_map_visible() {
        let raw = format!("a{}bc{}d", RED, RESET);
        assert_eq!(map_visible(&raw, |s| s.to_uppercase()),
                   format!("A{}BC{}D", RED, RESET));
        assert_eq!(map_visible("", |s| s.to_uppercase()), "");
    }

    #[test]
    fn check_splice_markup_replacement() {
        let mut m = MarkupString::from_plain("foo bar");
        let r = MarkupString::parse(&format!("{}X{}", RED, RESET));
        m.splice(4, 3, &r);
        assert_eq!(m.render(), format!("foo {}X{}", RED, RESET));
    }
}
