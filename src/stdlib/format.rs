// Copyright (c) 2019 Weird Constructor <weirdconstructor@gmail.com>
// This is a part of mushlist. See README.md and COPYING for details.

//! Functions that lay out a list for display: English enumerations,
//! fixed width columns and number ranges.

use unicode_width::UnicodeWidthChar;

use crate::buffer::OutBuf;
use crate::env::Env;
use crate::list::*;
use crate::markup::MarkupString;
use crate::symbols::{Args, SymbolTable};
use crate::util::*;

/// Writes what goes in front of item `cur` (1-based) of an enumeration.
/// Returns `true` if the output got truncated.
fn push_itemizer(out: &mut OutBuf, cur: usize, last: bool,
                 punc: &str, conj: &str, space: &str) -> bool
{
    if cur == 1 { return false; }

    let mut trunc = false;
    if last {
        if cur >= 3 { trunc |= out.push_str(punc); }
        trunc |= out.push_str(space);
        trunc |= out.push_str(conj);
    } else {
        trunc |= out.push_str(punc);
    }
    trunc |= out.push_str(space);
    trunc
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
    Center,
}

/// The longest prefix of `text` that fits into `width` columns.
/// Returns its byte length and its width.
fn fit_width(text: &str, width: usize) -> (usize, usize) {
    let mut cols = 0;
    for (i, c) in text.char_indices() {
        let w = c.width().unwrap_or(0);
        if cols + w > width { return (i, cols); }
        cols += w;
    }
    (text.len(), cols)
}

/// Writes the visible range `start..end` of `ms` cut or padded to
/// `width` columns.
fn push_field(out: &mut OutBuf, ms: &MarkupString, start: usize, end: usize,
              width: usize, align: Align) -> bool
{
    let (cut, cols) = fit_width(&ms.text()[start..end], width);
    let field = ms.render_range(start, start + cut);
    let pad   = width - cols;

    match align {
        Align::Left => {
            out.push_str(&field);
            out.push_fill(' ', pad)
        },
        Align::Right => {
            out.push_fill(' ', pad);
            out.push_str(&field)
        },
        Align::Center => {
            out.push_fill(' ', pad / 2);
            out.push_str(&field);
            out.push_fill(' ', (pad + 1) / 2)
        },
    }
}

fn table(out: &mut OutBuf, list: &str, width: usize, align: Align,
         line_len: usize, sep: char, osep: Option<char>)
{
    let ms   = MarkupString::parse(list);
    let full = ms.text();
    let src  = trim_space_sep(full, sep);
    if src.is_empty() { return; }
    let base = if sep == ' ' { full.len() - full.trim_start_matches(' ').len() } else { 0 };

    let cell = width + usize::from(osep.is_some());
    let mut col = 0;
    for (i, (a, b)) in Tokens::new(src, sep).enumerate() {
        if i == 0 {
            col = cell;
        } else {
            col += cell;
            if col > line_len {
                out.push_char('\n');
                col = cell;
            } else if let Some(c) = osep {
                out.push_char(c);
            }
        }
        if push_field(out, &ms, base + a, base + b, width, align) {
            return;
        }
    }
}

/// Appends `start` to `end` stepping by `step`, counting down if `end`
/// is below `start`.
fn lnum(out: &mut OutBuf, start: f64, end: f64, step: f64, osep: &str) {
    let integral = |n: f64| n.fract() == 0.0 && n.abs() < 1e15;

    if integral(start) && integral(end) && integral(step) {
        let (start, end, step) = (start as i64, end as i64, step as i64);
        out.push_str(&start.to_string());
        let mut k = if start <= end { start + step } else { start - step };
        while (start <= end && k <= end) || (start > end && k >= end) {
            out.push_str(osep);
            if out.push_str(&k.to_string()) { break; }
            k = if start <= end { k + step } else { k - step };
        }
    } else {
        out.push_str(&unparse_number(start));
        let mut j = if start <= end { start + step } else { start - step };
        while (start <= end && j <= end) || (start > end && j >= end) {
            out.push_str(osep);
            if out.push_str(&unparse_number(j)) { break; }
            let next = if start <= end { j + step } else { j - step };
            // the step vanishes next to huge magnitudes
            if next == j { break; }
            j = next;
        }
    }
}

pub fn add_to_symtable(st: &mut SymbolTable) {
    func!(st, "itemize",
        |env: &mut Env, args: &Args, out: &mut OutBuf| {
            let elist = args.called_as("ELIST");
            let sep   = if elist { delim!(args, 3, out) } else { delim!(args, 2, out) };

            let (conj, space, punc) =
                if elist {
                    (if args.len() > 1 { args[1].as_str() } else { "and" },
                     if args.len() > 3 { args[3].as_str() } else { " " },
                     if args.len() > 4 { args[4].as_str() } else { "," })
                } else {
                    (if args.len() > 2 { args[2].as_str() } else { "and" },
                     " ",
                     if args.len() > 3 { args[3].as_str() } else { "," })
                };

            let words = list2arr_ansi(&args[0], sep, true, env.max_list());
            let n = words.len();
            for (i, w) in words.iter().enumerate() {
                if push_itemizer(out, i + 1, i + 1 == n, punc, conj, space) { break; }
                if out.push_str(w) { break; }
            }
            Ok(())
        }, Some(1), Some(5), false);

    st.alias("elist", "itemize");

    func!(st, "table",
        |_env: &mut Env, args: &Args, out: &mut OutBuf| {
            let osep = delim!(args, 5, out);
            let osep = if args.len() == 5 && args[4].is_empty() { None } else { Some(osep) };
            let sep  = delim!(args, 4, out);

            let mut line_len = 78;
            if args.len() > 2 {
                if !is_integer(&args[2]) {
                    out.push_str(E_INTS);
                    return Ok(());
                }
                line_len = parse_integer(&args[2]).max(2) as usize;
            }

            let mut width = 10;
            let mut align = Align::Left;
            if args.len() > 1 {
                let mut w = args[1].as_str();
                match w.chars().next() {
                    Some('<') => { w = &w[1..]; },
                    Some('>') => { w = &w[1..]; align = Align::Right; },
                    Some('-') => { w = &w[1..]; align = Align::Center; },
                    _ => (),
                }
                if !is_integer(w) {
                    out.push_str(E_INTS);
                    return Ok(());
                }
                width = parse_integer(w).clamp(1, out.capacity() as i64) as usize;
            }
            if width >= line_len {
                width = line_len - 1;
            }

            table(out, &args[0], width, align, line_len, sep, osep);
            Ok(())
        }, Some(1), Some(5), false);

    func!(st, "lnum",
        |_env: &mut Env, args: &Args, out: &mut OutBuf| {
            if !is_number(&args[0]) {
                out.push_str(E_NUM);
                return Ok(());
            }
            let first = parse_number(&args[0]);

            let (start, end, mut step) =
                if args.len() > 1 {
                    if !is_number(&args[1]) {
                        out.push_str(E_NUM);
                        return Ok(());
                    }
                    let end  = parse_number(&args[1]);
                    let step =
                        if args.len() > 3 && is_number(&args[3]) { parse_number(&args[3]) }
                        else { 1.0 };
                    if first == 0.0 && end == 0.0 {
                        out.push_str("0");
                        return Ok(());
                    }
                    (first, end, step)
                } else {
                    if first == 0.0 {
                        return Ok(());
                    } else if first == 1.0 {
                        out.push_str("0");
                        return Ok(());
                    }
                    if first - 1.0 < 0.0 {
                        out.push_str("#-1 NUMBER OUT OF RANGE");
                        return Ok(());
                    }
                    (0.0, first - 1.0, 1.0)
                };

            if step == 0.0 {
                step = 1.0;
            } else if step < 0.0 {
                step = -step;
            }

            lnum(out, start, end, step, args.get(2).map(|s| s.as_str()).unwrap_or(" "));
            Ok(())
        }, Some(1), Some(4), false);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::eval as ve;

    #[test]
    fn check_itemize() {
        assert_eq!(ve("itemize(a)"),                "a");
        assert_eq!(ve("itemize(a b)"),              "a and b");
        assert_eq!(ve("itemize(a b c)"),            "a, b, and c");
        assert_eq!(ve("itemize(a|b|c,|,or,;)"),     "a; b; or c");
        assert_eq!(ve("itemize()"),                 "");
    }

    #[test]
    fn check_elist() {
        assert_eq!(ve("elist(a b c)"),              "a, b, and c");
        assert_eq!(ve("elist(a b,or)"),             "a or b");
        assert_eq!(ve("elist(a-b-c,&,-,_)"),        "a,_b,_&_c");
        assert_eq!(ve("elist(a b c,and,,_,)"),      "a_b_and_c");
    }

    #[test]
    fn check_fit_width() {
        assert_eq!(fit_width("hello", 3),  (3, 3));
        assert_eq!(fit_width("hi", 5),     (2, 2));
        // wide characters take two columns
        assert_eq!(fit_width("日本語", 5),  (6, 4));
    }

    #[test]
    fn check_table() {
        assert_eq!(ve("table(a b c,3,8)"),          "a   b  \nc  ");
        assert_eq!(ve("table(a b c,>3,20)"),        "  a   b   c");
        assert_eq!(ve("table(ab cd,-4,20)"),        " ab   cd ");
        assert_eq!(ve("table(abcdef,3)"),           "abc");
        assert_eq!(ve("table(a|b,2,20,|,:)"),       "a :b ");
        assert_eq!(ve("table(a b,2,20, ,)"),        "a b ");
        assert_eq!(ve("table(a b,x)"),              "#-1 ARGUMENTS MUST BE INTEGERS");
        assert_eq!(ve("table()"),                   "");
    }

    #[test]
    fn check_lnum() {
        assert_eq!(ve("lnum(3)"),                   "0 1 2");
        assert_eq!(ve("lnum(0)"),                   "");
        assert_eq!(ve("lnum(1)"),                   "0");
        assert_eq!(ve("lnum(-2)"),                  "#-1 NUMBER OUT OF RANGE");
        assert_eq!(ve("lnum(2,5)"),                 "2 3 4 5");
        assert_eq!(ve("lnum(5,2,-)"),               "5-4-3-2");
        assert_eq!(ve("lnum(0,10,|,-5)"),           "0|5|10");
        assert_eq!(ve("lnum(0,1,|,0.5)"),           "0|0.5|1");
        assert_eq!(ve("lnum(0,0)"),                 "0");
        assert_eq!(ve("lnum(x)"),                   "#-1 ARGUMENT MUST BE A NUMBER");
    }

    #[test]
    fn check_lnum_huge_bounds() {
        let mut out = OutBuf::new(1000);
        lnum(&mut out, 1e20, 1e21, 1.0, " ");
        assert_eq!(out.as_str(), "100000000000000000000 100000000000000000000");

        assert!(ve("lnum(-9223372036854775808,9223372036854775807)").len() < 100);
    }
}
