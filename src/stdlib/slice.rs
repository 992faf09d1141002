// Copyright (c) 2019 Weird Constructor <weirdconstructor@gmail.com>
// This is a part of mushlist. See README.md and COPYING for details.

//! Positional access to list elements: picking, slicing, counting and
//! removing elements by position or by value.

use crate::buffer::OutBuf;
use crate::env::Env;
use crate::list::*;
use crate::markup::{MarkupString, strip_markup};
use crate::symbols::{Args, SymbolTable};
use crate::util::{is_integer, parse_integer, E_INT, E_INTS};
use crate::wild::quick_wild;

fn int_arg(args: &Args, i: usize, default: i64) -> Option<i64> {
    match args.get(i) {
        Some(a) if is_integer(a) => Some(parse_integer(a)),
        Some(_)                  => None,
        None                     => Some(default),
    }
}

/// Byte range of the list elements `start..start+len` (1-based) in `s`.
fn extract_range(s: &str, sep: char, start: usize, len: usize) -> Option<(usize, usize)> {
    let mut toks = Tokens::new(s, sep).skip(start - 1);
    let (a, mut b) = toks.next()?;
    if a >= s.len() { return None; }
    for _ in 1..len {
        match toks.next() {
            Some((_, e)) => b = e,
            None         => break,
        }
    }
    Some((a, b))
}

/// The text between list positions `start` and `end` (both 1-based,
/// inclusive), separators included.
fn index_range(s: &str, c: char, start: i64, end: i64) -> Option<&str> {
    let cl = c.len_utf8();
    let mut pos = 0;
    for _ in 1..start {
        pos += s[pos..].find(c)? + cl;
    }
    pos += s[pos..].len() - s[pos..].trim_start_matches(' ').len();
    let first = s[pos..].chars().next()?;

    let mut count = end - start + 1;
    if first == c { count -= 1; }

    let mut p = Some(pos + first.len_utf8());
    while count > 0 {
        count -= 1;
        match p {
            Some(from) => p = s[from..].find(c).map(|i| from + i + cl),
            None       => break,
        }
    }

    let stop = match p {
        Some(after_sep) => after_sep - cl,
        None            => s.len(),
    };
    Some(s[pos..stop.max(pos)].trim_end_matches(' '))
}

/// The 1-based element number the 0-based byte `offs` of `raw` falls into.
fn word_at(raw: &str, offs: usize, sep: char) -> usize {
    let lead = if sep == ' ' { raw.len() - raw.trim_start_matches(' ').len() } else { 0 };
    let s    = trim_space_sep(raw, sep);
    let mut i = 1;
    for (_, e) in Tokens::new(s, sep) {
        if offs < lead + e { break; }
        i += 1;
    }
    i
}

/// Positions from a space separated list of 1-based numbers, as 0-based
/// indices below `n`.
fn positions(spec: &str, n: usize) -> Vec<usize> {
    let s = trim_space_sep(spec, ' ');
    Tokens::new(s, ' ')
        .map(|(a, b)| parse_integer(&s[a..b]) - 1)
        .filter(|p| *p >= 0 && (*p as usize) < n)
        .map(|p| p as usize)
        .collect()
}

pub fn add_to_symtable(st: &mut SymbolTable) {
    func!(st, "first",
        |_env: &mut Env, args: &Args, out: &mut OutBuf| {
            if args[0].is_empty() { return Ok(()); }
            let sep = delim!(args, 2, out);
            out.push_str(split_token(trim_space_sep(&args[0], sep), sep).0);
            Ok(())
        }, Some(1), Some(2), false);

    func!(st, "rest",
        |_env: &mut Env, args: &Args, out: &mut OutBuf| {
            if args[0].is_empty() { return Ok(()); }
            let sep = delim!(args, 2, out);
            if let (_, Some(rest)) = split_token(trim_space_sep(&args[0], sep), sep) {
                out.push_str(rest);
            }
            Ok(())
        }, Some(1), Some(2), false);

    func!(st, "last",
        |_env: &mut Env, args: &Args, out: &mut OutBuf| {
            if args[0].is_empty() { return Ok(()); }
            let sep = delim!(args, 2, out);
            let s   = trim_space_sep(&args[0], sep);
            match s.rfind(sep) {
                Some(p) => out.push_str(&s[p + sep.len_utf8()..]),
                None    => out.push_str(s),
            };
            Ok(())
        }, Some(1), Some(2), false);

    func!(st, "randword",
        |env: &mut Env, args: &Args, out: &mut OutBuf| {
            if args[0].is_empty() { return Ok(()); }
            let sep = delim!(args, 2, out);
            let s   = trim_space_sep(&args[0], sep);
            let n   = do_wordcount(s, sep);
            if n == 0 { return Ok(()); }
            let w = env.random_range(0, n - 1);
            if let Some((a, b)) = Tokens::new(s, sep).nth(w) {
                out.push_str(&s[a..b]);
            }
            Ok(())
        }, Some(1), Some(2), false);

    func!(st, "extract",
        |_env: &mut Env, args: &Args, out: &mut OutBuf| {
            let (start, len) =
                match (int_arg(args, 1, 1), int_arg(args, 2, 1)) {
                    (Some(s), Some(l)) => (s, l),
                    _ => { out.push_str(E_INTS); return Ok(()); },
                };
            let sep = delim!(args, 4, out);
            if start < 1 || len < 1 { return Ok(()); }

            let s = trim_space_sep(&args[0], sep);
            if let Some((a, b)) = extract_range(s, sep, start as usize, len as usize) {
                out.push_str(&s[a..b]);
            }
            Ok(())
        }, Some(1), Some(4), false);

    func!(st, "wordpos",
        |_env: &mut Env, args: &Args, out: &mut OutBuf| {
            if !is_integer(&args[1]) {
                out.push_str(E_INT);
                return Ok(());
            }
            let charpos = parse_integer(&args[1]);
            let sep     = delim!(args, 3, out);
            let raw     = &args[0];

            if charpos <= 0 || charpos as usize > raw.chars().count() {
                out.push_str("#-1");
                return Ok(());
            }
            let offs = raw.char_indices()
                          .nth(charpos as usize - 1)
                          .map(|(i, _)| i)
                          .unwrap_or(0);
            out.push_str(&word_at(raw, offs, sep).to_string());
            Ok(())
        }, Some(2), Some(3), false);

    func!(st, "index",
        |_env: &mut Env, args: &Args, out: &mut OutBuf| {
            if !is_integer(&args[2]) || !is_integer(&args[3]) {
                out.push_str(E_INTS);
                return Ok(());
            }
            let c     = args[1].chars().next().unwrap_or(' ');
            let start = parse_integer(&args[2]);
            let end   = parse_integer(&args[3]);
            if start < 1 || end < start || args[0].is_empty() {
                return Ok(());
            }
            if let Some(s) = index_range(&args[0], c, start, end) {
                out.push_str(s);
            }
            Ok(())
        }, Some(4), Some(4), false);

    func!(st, "element",
        |_env: &mut Env, args: &Args, out: &mut OutBuf| {
            let c = args[2].chars().next().unwrap_or(' ');
            if args[1].contains(c) {
                out.push_str(crate::util::E_ONE_ELEM);
                return Ok(());
            }

            let mut parts : Vec<&str> = args[0].split(c).collect();
            if parts.len() > 1 && parts.last().map(|p| p.is_empty()).unwrap_or(false) {
                parts.pop();
            }
            let pos = parts.iter().position(|p| quick_wild(&args[1], p));
            out.push_str(&pos.map(|p| p + 1).unwrap_or(0).to_string());
            Ok(())
        }, Some(3), Some(3), false);

    func!(st, "elements",
        |env: &mut Env, args: &Args, out: &mut OutBuf| {
            let sep  = delim!(args, 3, out);
            let osep = if args.len() == 4 { args[3].clone() } else { sep.to_string() };
            let words = list2arr_ansi(&args[0], sep, true, env.max_list());

            let picked : Vec<&String> =
                positions(&args[1], words.len()).into_iter()
                    .map(|p| &words[p])
                    .collect();
            arr2list(&picked, &osep, out);
            Ok(())
        }, Some(2), Some(4), false);

    func!(st, "ldelete",
        |env: &mut Env, args: &Args, out: &mut OutBuf| {
            let sep  = delim!(args, 3, out);
            let osep = if args.len() == 4 { args[3].clone() } else { sep.to_string() };
            let words = list2arr_ansi(&args[0], sep, true, env.max_list());

            let mut keep = vec![true; words.len()];
            for p in positions(&args[1], words.len()) {
                keep[p] = false;
            }
            let kept : Vec<&String> =
                words.iter().zip(keep).filter(|(_, k)| *k).map(|(w, _)| w).collect();
            arr2list(&kept, &osep, out);
            Ok(())
        }, Some(2), Some(4), false);

    func!(st, "words",
        |_env: &mut Env, args: &Args, out: &mut OutBuf| {
            let sep   = delim!(args, 2, out);
            let plain = strip_markup(&args[0]);
            out.push_str(&do_wordcount(trim_space_sep(&plain, sep), sep).to_string());
            Ok(())
        }, Some(1), Some(2), false);

    func!(st, "items",
        |_env: &mut Env, args: &Args, out: &mut OutBuf| {
            let c = args[1].chars().next().unwrap_or(' ');
            out.push_str(&(args[0].matches(c).count() + 1).to_string());
            Ok(())
        }, Some(2), Some(2), false);

    func!(st, "revwords",
        |env: &mut Env, args: &Args, out: &mut OutBuf| {
            let sep  = delim!(args, 2, out);
            let osep = osep_or(args, 3, sep);
            let mut words = list2arr_ansi(&args[0], sep, true, env.max_list());
            words.reverse();
            arr2list(&words, &osep, out);
            Ok(())
        }, Some(1), Some(3), false);

    func!(st, "cat",
        |_env: &mut Env, args: &Args, out: &mut OutBuf| {
            arr2list(&args.v, " ", out);
            Ok(())
        }, Some(1), None, false);

    func!(st, "remove",
        |env: &mut Env, args: &Args, out: &mut OutBuf| {
            let sep   = delim!(args, 3, out);
            let words = list2arr_ansi(&args[0], sep, true, env.max_list());
            let rem   = list2arr_ansi(&args[1], sep, true, env.max_list());

            let plain : Vec<String> = words.iter().map(|w| strip_markup(w)).collect();
            let mut skip = vec![false; words.len()];
            for r in rem.iter().map(|r| strip_markup(r)) {
                if let Some(i) = (0..words.len()).find(|i| !skip[*i] && plain[*i] == r) {
                    skip[i] = true;
                }
            }

            let kept : Vec<&String> =
                words.iter().zip(skip).filter(|(_, s)| !*s).map(|(w, _)| w).collect();
            arr2list(&kept, &sep.to_string(), out);
            Ok(())
        }, Some(2), Some(3), false);

    func!(st, "before",
        |_env: &mut Env, args: &Args, out: &mut OutBuf| {
            let needle = if args[1].is_empty() { " ".to_string() } else { strip_markup(&args[1]) };
            let ms = MarkupString::parse(&args[0]);
            match ms.text().find(&needle) {
                Some(p) => out.push_str(&ms.render_range(0, p)),
                None    => out.push_str(&args[0]),
            };
            Ok(())
        }, Some(2), Some(2), false);

    func!(st, "after",
        |_env: &mut Env, args: &Args, out: &mut OutBuf| {
            let needle = if args[1].is_empty() { " ".to_string() } else { strip_markup(&args[1]) };
            let ms = MarkupString::parse(&args[0]);
            if let Some(p) = ms.text().find(&needle) {
                out.push_str(&ms.render_range(p + needle.len(), ms.len()));
            }
            Ok(())
        }, Some(2), Some(2), false);

    func!(st, "splice",
        |env: &mut Env, args: &Args, out: &mut OutBuf| {
            let sep = delim!(args, 4, out);
            let orig = list2arr(&args[0], sep, true, env.max_list());
            let repl = list2arr(&args[1], sep, true, env.max_list());
            let word = strip_markup(&args[2]);

            if word.is_empty() {
                out.push_str("#-1 NEED A WORD");
                return Ok(());
            }
            if do_wordcount(&word, sep) != 1 {
                out.push_str("#-1 TOO MANY WORDS");
                return Ok(());
            }
            if orig.len() != repl.len() {
                out.push_str("#-1 NUMBER OF WORDS MUST BE EQUAL");
                return Ok(());
            }

            let merged : Vec<&String> =
                orig.iter().zip(repl.iter())
                    .map(|(o, r)| if *o == word { r } else { o })
                    .collect();
            arr2list(&merged, &sep.to_string(), out);
            Ok(())
        }, Some(3), Some(4), false);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::eval as ve;

    #[test]
    fn check_index_range() {
        assert_eq!(index_range("one:two:three", ':', 2, 2), Some("two"));
        assert_eq!(index_range("one:two:three", ':', 2, 3), Some("two:three"));
        assert_eq!(index_range("one:two:three", ':', 1, 1), Some("one"));
        assert_eq!(index_range("a: b :c", ':', 2, 2),       Some("b"));
        assert_eq!(index_range("one:two", ':', 5, 5),       None);
        assert_eq!(index_range("a::c", ':', 2, 2),          Some(""));
    }

    #[test]
    fn check_word_at() {
        assert_eq!(word_at("a bc d", 0, ' '), 1);
        assert_eq!(word_at("a bc d", 1, ' '), 2);
        assert_eq!(word_at("a bc d", 3, ' '), 2);
        assert_eq!(word_at("a bc d", 5, ' '), 3);
        assert_eq!(word_at("  a b", 4, ' '), 2);
    }

    #[test]
    fn check_first_rest_last() {
        assert_eq!(ve("first(  a b c)"),    "a");
        assert_eq!(ve("rest(a b  c)"),      "b  c");
        assert_eq!(ve("last(a b c  )"),     "c");
        assert_eq!(ve("last(a|b|c,|)"),     "c");
        assert_eq!(ve("first()"),           "");
        assert_eq!(ve("first(a,xy)"),       "#-1 SEPARATOR MUST BE ONE CHARACTER");
    }

    #[test]
    fn check_extract() {
        assert_eq!(ve("extract(a b c d,2,2)"),   "b c");
        assert_eq!(ve("extract(a b c d,3,10)"),  "c d");
        assert_eq!(ve("extract(a b c d,5)"),     "");
        assert_eq!(ve("extract(a b c d,0,1)"),   "");
        assert_eq!(ve("extract(a b c d,x,1)"),   "#-1 ARGUMENTS MUST BE INTEGERS");
        assert_eq!(ve("extract(a|b|c,2,1,|)"),   "b");
    }

    #[test]
    fn check_counts() {
        assert_eq!(ve("words(  a  b c )"),  "3");
        assert_eq!(ve("words()"),           "0");
        assert_eq!(ve("items(a||b,|)"),     "3");
        assert_eq!(ve("wordpos(ab cd ef,4)"), "2");
        assert_eq!(ve("wordpos(ab cd,9)"),  "#-1");
    }

    #[test]
    fn check_remove_and_splice() {
        assert_eq!(ve("remove(a b a c,a)"),             "b a c");
        assert_eq!(ve("remove(a b a c,a a)"),           "b c");
        assert_eq!(ve("splice(a b c,x y z,b)"),         "a y c");
        assert_eq!(ve("splice(a b c,x y,b)"),           "#-1 NUMBER OF WORDS MUST BE EQUAL");
        assert_eq!(ve("splice(a b c,x y z,b c)"),       "#-1 TOO MANY WORDS");
    }

    #[test]
    fn check_before_after() {
        assert_eq!(ve("before(foo bar,o)"),  "f");
        assert_eq!(ve("after(foo bar,o)"),   "o bar");
        assert_eq!(ve("before(foo,x)"),      "foo");
        assert_eq!(ve("after(foo,x)"),       "");
    }
}
