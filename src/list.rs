// Copyright (c) 2019 Weird Constructor <weirdconstructor@gmail.com>
// This is a part of mushlist. See README.md and COPYING for details.

/*!
List tokenization and reassembly.

A list is text plus a one character separator. A space separator is
special: leading and trailing spaces are trimmed and runs of spaces count
as one separator. Any other separator produces empty elements between
adjacent separators.

The tokenizer never copies, it hands out byte ranges into the source:

```
use mushlist::list::{Tokens, trim_space_sep};

let src = trim_space_sep("  a  b c ", ' ');
let words : Vec<&str> = Tokens::new(src, ' ').map(|(s, e)| &src[s..e]).collect();
assert_eq!(words, vec!["a", "b", "c"]);
```
*/

use crate::buffer::OutBuf;
use crate::markup::{MarkupString, strip_markup};
use crate::util::E_SEP;

/// Trims blanks from both ends, but only for a space separator.
pub fn trim_space_sep(s: &str, sep: char) -> &str {
    if sep == ' ' { s.trim_matches(' ') } else { s }
}

/// Iterator over the `(start, end)` byte ranges of the elements.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    src:    &'a str,
    sep:    char,
    pos:    Option<usize>,
}

impl<'a> Tokens<'a> {
    pub fn new(src: &'a str, sep: char) -> Self {
        Self { src, sep, pos: Some(0) }
    }

    /// Offset of the next token, `None` once the list is exhausted.
    pub fn offset(&self) -> Option<usize> { self.pos }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<(usize, usize)> {
        let start = self.pos?;
        match self.src[start..].find(self.sep) {
            None => {
                self.pos = None;
                Some((start, self.src.len()))
            },
            Some(rel) => {
                let end = start + rel;
                let mut next = end + self.sep.len_utf8();
                if self.sep == ' ' {
                    next += self.src[next..].len()
                            - self.src[next..].trim_start_matches(' ').len();
                }
                self.pos = Some(next);
                Some((start, end))
            },
        }
    }
}

/// Splits off the first element. Returns the element and the rest,
/// the rest is `None` after the last element.
pub fn split_token(s: &str, sep: char) -> (&str, Option<&str>) {
    let mut t = Tokens::new(s, sep);
    match t.next() {
        Some((a, b)) => (&s[a..b], t.offset().map(|o| &s[o..])),
        None         => (s, None),
    }
}

/// Offset of the element after the one at `pos`, if there is one.
pub fn next_token(s: &str, pos: usize, sep: char) -> Option<usize> {
    let mut t = Tokens { src: s, sep, pos: Some(pos) };
    t.next();
    t.offset()
}

/// Number of elements in an already trimmed list. An empty list has none.
pub fn do_wordcount(s: &str, sep: char) -> usize {
    if s.is_empty() { return 0; }
    Tokens::new(s, sep).count()
}

/// Splits `text` into at most `max` elements with the markup removed.
pub fn list2arr(text: &str, sep: char, nullok: bool, max: usize) -> Vec<String> {
    let plain = strip_markup(text);
    let src   = trim_space_sep(&plain, sep);
    if src.is_empty() { return vec![]; }

    Tokens::new(src, sep)
        .map(|(a, b)| &src[a..b])
        .filter(|e| nullok || !e.is_empty())
        .take(max)
        .map(|e| e.to_string())
        .collect()
}

/// Like `list2arr`, but every element keeps the markup that decorated
/// its visible characters.
pub fn list2arr_ansi(text: &str, sep: char, nullok: bool, max: usize) -> Vec<String> {
    let ms   = MarkupString::parse(text);
    let full = ms.text();
    let src  = trim_space_sep(full, sep);
    if src.is_empty() { return vec![]; }

    let base = if sep == ' ' { full.len() - full.trim_start_matches(' ').len() } else { 0 };
    Tokens::new(src, sep)
        .filter(|(a, b)| nullok || a != b)
        .take(max)
        .map(|(a, b)| ms.render_range(base + a, base + b))
        .collect()
}

/// Appends the elements joined by `osep`. Returns `true` if the output
/// was truncated.
pub fn arr2list<S: AsRef<str>>(items: &[S], osep: &str, out: &mut OutBuf) -> bool {
    for (i, item) in items.iter().enumerate() {
        if i > 0 && out.push_str(osep) { return true; }
        if out.push_str(item.as_ref()) { return true; }
    }
    false
}

/// Reads the separator from the 1-based argument `n`. A missing or empty
/// argument is a space. Anything longer than one character writes the
/// separator error and returns `None`.
pub fn delim_check(args: &[String], n: usize, out: &mut OutBuf) -> Option<char> {
    let arg = match args.get(n - 1) {
        Some(a) => strip_markup(a),
        None    => return Some(' '),
    };
    let mut chars = arg.chars();
    match (chars.next(), chars.next()) {
        (None, _)          => Some(' '),
        (Some(c), None)    => Some(c),
        _ => {
            out.push_str(E_SEP);
            None
        },
    }
}

/// The output separator from the 1-based argument `n`, or the input
/// separator if the argument is missing.
pub fn osep_or(args: &[String], n: usize, sep: char) -> String {
    match args.get(n - 1) {
        Some(a) => a.clone(),
        None    => sep.to_string(),
    }
}
