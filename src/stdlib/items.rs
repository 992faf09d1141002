// Copyright (c) 2019 Weird Constructor <weirdconstructor@gmail.com>
// This is a part of mushlist. See README.md and COPYING for details.

/*!
Positional mutation of a list in its raw text form.

The list is never split into an array. `do_itemfuns` walks the text
once to find the element at the given position and then writes the
parts around it:

```
use mushlist::buffer::OutBuf;
use mushlist::stdlib::items::{do_itemfuns, ItemOp};

let mut out = OutBuf::new(100);
do_itemfuns(&mut out, "a b c", "2", "", " ", ItemOp::Delete);
assert_eq!(out.as_str(), "a c");
```
*/

use crate::buffer::OutBuf;
use crate::env::Env;
use crate::symbols::{Args, SymbolTable};
use crate::util::{is_integer, parse_integer, E_INT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOp {
    Delete,
    Replace,
    Insert,
}

/// Deletes, replaces or inserts the element at the 1-based position
/// `num` of the list `s`. Only the first character of `sep` is used.
/// Negative positions count from the end and are only valid for
/// inserting. Positions that don't exist leave the list unchanged,
/// except for inserting, which then appends.
pub fn do_itemfuns(out: &mut OutBuf, s: &str, num: &str, word: &str, sep: &str, op: ItemOp) {
    if !is_integer(num) {
        out.push_str(E_INT);
        return;
    }
    let el = parse_integer(num);
    let c  = sep.chars().next().unwrap_or(' ');
    let cl = c.len_utf8();

    if (el < 1 && op != ItemOp::Insert) || el == 0 {
        out.push_str(s);
        return;
    }
    if s.is_empty() && op == ItemOp::Insert {
        out.push_str(word);
        return;
    }

    if el < 0 {
        insert_from_end(out, s, el.unsigned_abs(), word, c);
        return;
    }

    // sptr: start of the element, eptr: the separator after it
    let mut sptr  = 0;
    let mut eptr  = s.find(c);
    let mut count = 1;
    while let Some(e) = eptr {
        if count >= el { break; }
        sptr  = e + cl;
        eptr  = s[sptr..].find(c).map(|p| sptr + p);
        count += 1;
    }

    if eptr.is_none() && count < el {
        out.push_str(s);
        if op == ItemOp::Insert {
            out.push_char(c);
            out.push_str(word);
        }
        return;
    }

    let prefix = if sptr > 0 { &s[..sptr - cl] } else { "" };
    match (op, eptr) {
        (ItemOp::Delete, None) => {
            if el != 1 { out.push_str(prefix); }
        },
        (ItemOp::Delete, Some(e)) if sptr == 0 => {
            out.push_str(&s[e + cl..]);
        },
        (ItemOp::Delete, Some(e)) => {
            out.push_str(prefix);
            out.push_str(&s[e..]);
        },
        (ItemOp::Replace, None) => {
            if el != 1 {
                out.push_str(prefix);
                out.push_char(c);
            }
            out.push_str(word);
        },
        (ItemOp::Replace, Some(e)) => {
            if sptr > 0 {
                out.push_str(prefix);
                out.push_char(c);
            }
            out.push_str(word);
            out.push_str(&s[e..]);
        },
        (ItemOp::Insert, _) if sptr == 0 => {
            out.push_str(word);
            out.push_char(c);
            out.push_str(s);
        },
        (ItemOp::Insert, _) => {
            out.push_str(prefix);
            out.push_char(c);
            out.push_str(word);
            if sptr < s.len() {
                out.push_char(c);
                out.push_str(&s[sptr..]);
            }
        },
    }
}

/// Inserts `word` so that it becomes the `pos`-th element counted
/// from the end.
fn insert_from_end(out: &mut OutBuf, s: &str, pos: u64, word: &str, c: char) {
    let (prefix, rest) =
        if pos == 1 {
            (s, "")
        } else {
            let mut count = 1;
            let found = s.char_indices().rev().find(|(_, ch)| {
                if *ch == c { count += 1; }
                count == pos
            });
            match found {
                Some((i, _)) => (&s[..i], &s[i + c.len_utf8()..]),
                None => {
                    out.push_str(s);
                    return;
                },
            }
        };

    out.push_str(prefix);
    out.push_char(c);
    out.push_str(word);
    if !rest.is_empty() {
        out.push_char(c);
        out.push_str(rest);
    }
}

pub fn add_to_symtable(st: &mut SymbolTable) {
    func!(st, "replace",
        |_env: &mut Env, args: &Args, out: &mut OutBuf| {
            do_itemfuns(out, &args[0], &args[1], &args[2], args.arg(3), ItemOp::Replace);
            Ok(())
        }, Some(3), Some(4), false);

    func!(st, "insert",
        |_env: &mut Env, args: &Args, out: &mut OutBuf| {
            do_itemfuns(out, &args[0], &args[1], &args[2], args.arg(3), ItemOp::Insert);
            Ok(())
        }, Some(3), Some(4), false);
}
