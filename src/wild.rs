// Copyright (c) 2019 Weird Constructor <weirdconstructor@gmail.com>
// This is a part of mushlist. See README.md and COPYING for details.

/*!
Wildcard matching.

Pattern syntax:

```ebnf
    pattern     = { element }
                ;
    element     = "*"                   (* any run of characters *)
                | "?"                   (* exactly one character *)
                | "\", ?any character?  (* the character itself *)
                | ?any other character?
                ;
```

Matching is case insensitive and always anchored at both ends.
*/

use crate::parser::State;

#[derive(Debug, Clone, PartialEq)]
enum WildElem {
    Glob,
    Any,
    Char(char),
}

/// A parsed wildcard pattern.
#[derive(Debug, Clone)]
pub struct WildPattern {
    elems: Vec<WildElem>,
}

fn fold_char(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn parse_pattern(ps: &mut State) -> Vec<WildElem> {
    let mut pat = vec![];

    while let Some(c) = ps.next_char() {
        let element =
            match c {
                '*' => {
                    // Consecutive globs match the same as one.
                    if pat.last() == Some(&WildElem::Glob) { continue; }
                    WildElem::Glob
                },
                '?'  => WildElem::Any,
                '\\' => match ps.next_char() {
                    Some(n) => WildElem::Char(fold_char(n)),
                    None    => WildElem::Char('\\'),
                },
                _    => WildElem::Char(fold_char(c)),
            };
        pat.push(element);
    }

    pat
}

impl WildPattern {
    pub fn new(pattern: &str) -> Self {
        Self { elems: parse_pattern(&mut State::new(pattern)) }
    }

    pub fn matches(&self, text: &str) -> bool {
        let s : Vec<char> = text.chars().map(fold_char).collect();
        let p = &self.elems;

        let mut si = 0;
        let mut pi = 0;
        // Position of the last glob and the text offset it was tried at.
        let mut backtrack : Option<(usize, usize)> = None;

        while si < s.len() {
            match p.get(pi) {
                Some(WildElem::Glob) => {
                    backtrack = Some((pi, si));
                    pi += 1;
                    continue;
                },
                Some(WildElem::Any) => {
                    si += 1;
                    pi += 1;
                    continue;
                },
                Some(WildElem::Char(c)) if *c == s[si] => {
                    si += 1;
                    pi += 1;
                    continue;
                },
                _ => (),
            }

            match backtrack {
                Some((gp, gs)) => {
                    backtrack = Some((gp, gs + 1));
                    pi = gp + 1;
                    si = gs + 1;
                },
                None => return false,
            }
        }

        p[pi..].iter().all(|e| *e == WildElem::Glob)
    }
}

/// Case insensitive wildcard match of the whole `text`.
pub fn quick_wild(pattern: &str, text: &str) -> bool {
    WildPattern::new(pattern).matches(text)
}

/// Whether `sub` is a case insensitive prefix of any word in `src`.
/// Words are runs of letters and digits.
pub fn string_match(src: &str, sub: &str) -> bool {
    if sub.is_empty() { return false; }
    let sub = sub.to_lowercase();

    let mut rest = src;
    while !rest.is_empty() {
        if rest.to_lowercase().starts_with(&sub) { return true; }

        let word_end = rest.find(|c: char| !c.is_alphanumeric()).unwrap_or(rest.len());
        rest = &rest[word_end..];
        let next_word = rest.find(|c: char| c.is_alphanumeric()).unwrap_or(rest.len());
        rest = &rest[next_word..];
    }
    false
}
