// Copyright (c) 2019 Weird Constructor <weirdconstructor@gmail.com>
// This is a part of mushlist. See README.md and COPYING for details.

/*!
The higher-order list functions.

All of them call back into a user function or an unevaluated body once
per element (or group of elements) and collect the results. Every loop
takes a snapshot of the invocation counter before each call and stops
when the output buffer is full and the callback did not invoke any
function since the snapshot. A callback that aborts ends the loop, the
output produced so far is kept.

`iter()` additionally maintains an iteration frame, which `ilev()`,
`itext()`, `inum()` and `ibreak()` look at.
*/

use crate::buffer::OutBuf;
use crate::env::{Env, EvalFlags, FunResult};
use crate::list::*;
use crate::markup::strip_markup;
use crate::regs::{RegFrame, RF_ITER};
use crate::symbols::{Args, SymbolTable};
use crate::util::*;

/// Substitutes `##` with the element and `#@` with its position in one
/// pass, so substituted text is never scanned again.
fn replace_iter_tokens(body: &str, elem: &str, pos: usize) -> String {
    let mut out  = String::with_capacity(body.len() + elem.len());
    let mut rest = body;
    while let Some(i) = rest.find('#') {
        out.push_str(&rest[..i]);
        let tail = &rest[i..];
        if tail.starts_with("##") {
            out.push_str(elem);
            rest = &tail[2..];
        } else if tail.starts_with("#@") {
            out.push_str(&pos.to_string());
            rest = &tail[2..];
        } else {
            out.push('#');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}

/// The next element of `list`, empty once the list is exhausted.
fn next_elem(list: &str, toks: &mut Tokens) -> String {
    toks.next().map(|(a, b)| list[a..b].to_string()).unwrap_or_default()
}

/// Parses an iteration level argument, `l` is the outermost level.
fn level_arg(env: &Env, arg: &str, out: &mut OutBuf) -> Option<usize> {
    let maxlev = env.regs.ilev();
    let lev =
        if arg.trim().eq_ignore_ascii_case("l") {
            maxlev
        } else if !is_strict_integer(arg) {
            out.push_str(E_INT);
            return None;
        } else {
            parse_integer(arg)
        };

    if lev < 0 || lev > maxlev {
        out.push_str(E_ARGRANGE);
        return None;
    }
    Some(lev as usize)
}

pub fn add_to_symtable(st: &mut SymbolTable) {
    func!(st, "iter",
        |env: &mut Env, args: &Args, out: &mut OutBuf| {
            let sep =
                if args.len() >= 3 {
                    let isep = vec![env.eval_arg(&args[2])?];
                    delim!(&isep, 1, out)
                } else {
                    ' '
                };
            let osep =
                if args.len() >= 4 { env.eval_arg(&args[3])? }
                else { " ".to_string() };

            let list = env.eval_arg(&args[0])?;
            if trim_space_sep(&strip_markup(&list), sep).is_empty() {
                return Ok(());
            }
            let words = list2arr_ansi(&list, sep, true, env.max_list());
            let body  = &args[1];

            env.with_frame(RegFrame::new(RF_ITER, "iter"), |env: &mut Env, idx: usize| -> FunResult {
                for (i, w) in words.iter().enumerate() {
                    let funccount = env.fun_invocations;
                    if i > 0 { out.push_str(&osep); }

                    if let Some(f) = env.regs.frame_mut(idx) {
                        f.itext = w.clone();
                        f.inum  = i + 1;
                    }
                    let code = replace_iter_tokens(body, w, i + 1);
                    env.eval(&code, out, EvalFlags::default())?;

                    if env.regs.is_broken(idx) {
                        log::trace!("iter broken at element {}", i + 1);
                        break;
                    }
                    if env.stalled(out, funccount) { break; }
                }
                Ok(())
            })
        }, Some(2), Some(4), true);

    func!(st, "ibreak",
        |env: &mut Env, args: &Args, out: &mut OutBuf| {
            let arg = args.arg(0).trim();
            let n =
                if arg.is_empty() {
                    1
                } else if !is_strict_integer(arg) {
                    out.push_str(E_INT);
                    return Ok(());
                } else {
                    parse_integer(arg)
                };
            if n == 0 { return Ok(()); }

            if n < 0 || n > env.regs.ilev() + 1 {
                out.push_str(E_RANGE);
                return Ok(());
            }
            env.regs.ibreak(n as usize);
            Ok(())
        }, Some(0), Some(1), false);

    func!(st, "ilev",
        |env: &mut Env, _args: &Args, out: &mut OutBuf| {
            out.push_str(&env.regs.ilev().to_string());
            Ok(())
        }, Some(0), Some(0), false);

    func!(st, "itext",
        |env: &mut Env, args: &Args, out: &mut OutBuf| {
            if let Some(lev) = level_arg(env, &args[0], out) {
                let s = env.regs.itext(lev).unwrap_or("").to_string();
                out.push_str(&s);
            }
            Ok(())
        }, Some(1), Some(1), false);

    func!(st, "inum",
        |env: &mut Env, args: &Args, out: &mut OutBuf| {
            if let Some(lev) = level_arg(env, &args[0], out) {
                let n = env.regs.inum(lev).unwrap_or(0);
                out.push_str(&n.to_string());
            }
            Ok(())
        }, Some(1), Some(1), false);

    func!(st, "map",
        |env: &mut Env, args: &Args, out: &mut OutBuf| {
            let sep  = delim!(args, 3, out);
            let osep = osep_or(args, 4, sep);
            if trim_space_sep(&args[1], sep).is_empty() { return Ok(()); }

            let uf    = ufun!(env, &args[0], false);
            let words = list2arr_ansi(&args[1], sep, true, env.max_list());

            for (i, w) in words.iter().enumerate() {
                let funccount = env.fun_invocations;
                let r = env.call_ufun(&uf, vec![w.clone(), (i + 1).to_string()])?;
                if i > 0 { out.push_str(&osep); }
                out.push_str(&r);
                if env.stalled(out, funccount) { break; }
            }
            Ok(())
        }, Some(2), Some(4), false);

    func!(st, "mix",
        |env: &mut Env, args: &Args, out: &mut OutBuf| {
            let (lists, sep) =
                if args.len() > 3 { (args.len() - 2, delim!(args, args.len(), out)) }
                else              { (2, ' ') };

            let uf = ufun!(env, &args[0], false);
            let max = env.max_list();
            let cols : Vec<Vec<String>> =
                (0..lists).map(|n| list2arr_ansi(args.arg(n + 1), sep, true, max))
                          .collect();
            let rows = cols.iter().map(|c| c.len()).max().unwrap_or(0);

            for i in 0..rows {
                let row : Vec<String> =
                    cols.iter()
                        .map(|c| c.get(i).cloned().unwrap_or_default())
                        .collect();
                let funccount = env.fun_invocations;
                let r = env.call_ufun(&uf, row)?;
                if i > 0 { out.push_char(sep); }
                out.push_str(&r);
                if env.stalled(out, funccount) { break; }
            }
            Ok(())
        }, Some(3), Some(12), false);

    func!(st, "step",
        |env: &mut Env, args: &Args, out: &mut OutBuf| {
            if !is_integer(&args[2]) {
                out.push_str(E_INT);
                return Ok(());
            }
            let step = parse_integer(&args[2]);
            if !(1..=10).contains(&step) {
                out.push_str("#-1 STEP OUT OF RANGE");
                return Ok(());
            }
            let sep  = delim!(args, 4, out);
            let osep = if args.len() == 5 { args[4].clone() } else { sep.to_string() };

            let list = trim_space_sep(&args[1], sep);
            if list.is_empty() { return Ok(()); }
            let uf = ufun!(env, &args[0], false);

            let words = list2arr_ansi(list, sep, true, env.max_list());
            for (g, group) in words.chunks(step as usize).enumerate() {
                let mut a = group.to_vec();
                a.resize(step as usize, String::new());

                let funccount = env.fun_invocations;
                let r = env.call_ufun(&uf, a)?;
                if g > 0 { out.push_str(&osep); }
                out.push_str(&r);
                if env.stalled(out, funccount) { break; }
            }
            Ok(())
        }, Some(3), Some(5), false);

    func!(st, "fold",
        |env: &mut Env, args: &Args, out: &mut OutBuf| {
            let sep  = delim!(args, 4, out);
            let uf   = ufun!(env, &args[0], false);
            let list = trim_space_sep(&args[1], sep);

            let mut toks = Tokens::new(list, sep);
            let mut base =
                if args.len() >= 3 { args[2].clone() }
                else { next_elem(list, &mut toks) };
            let second = next_elem(list, &mut toks);
            base = env.call_ufun(&uf, vec![base, second])?;

            let mut funccount = env.fun_invocations;
            while toks.offset().map(|o| o < list.len()).unwrap_or(false) {
                let elem = next_elem(list, &mut toks);
                let result =
                    match env.call_ufun(&uf, vec![base.clone(), elem]) {
                        Ok(r)  => r,
                        Err(e) => {
                            out.push_str(&base);
                            return Err(e);
                        },
                    };

                if env.fun_invocations >= env.config.function_invocation_limit
                   && env.fun_invocations == funccount
                   && base == result
                {
                    log::debug!("fold stopped at a fixed point after {} invocations",
                                funccount);
                    break;
                }
                funccount = env.fun_invocations;
                base = result;
            }

            out.push_str(&base);
            Ok(())
        }, Some(2), Some(4), false);

    func!(st, "filter",
        |env: &mut Env, args: &Args, out: &mut OutBuf| {
            let sep  = delim!(args, 3, out);
            let osep = osep_or(args, 4, sep);
            let uf   = ufun!(env, &args[0], false);
            let bool_mode = args.called_as("FILTERBOOL");

            let words = list2arr_ansi(&args[1], sep, true, env.max_list());
            let mut first = true;
            for w in words.iter() {
                let funccount = env.fun_invocations;
                let r = env.call_ufun(&uf, vec![w.clone()])?;
                let keep = if bool_mode { parse_boolean(&r) } else { r == "1" };
                if keep {
                    if !first { out.push_str(&osep); }
                    first = false;
                    out.push_str(w);
                }
                if env.stalled(out, funccount) { break; }
            }
            Ok(())
        }, Some(2), Some(4), false);

    st.alias("filterbool", "filter");

    func!(st, "munge",
        |env: &mut Env, args: &Args, out: &mut OutBuf| {
            let sep  = delim!(args, 4, out);
            let osep = if args.len() == 5 { args[4].clone() } else { sep.to_string() };
            let uf   = ufun!(env, &args[0], false);

            let max  = env.max_list();
            let keys = list2arr(&args[1], sep, true, max);
            let vals = list2arr_ansi(&args[2], sep, true, max);
            if keys.len() != vals.len() {
                out.push_str("#-1 LISTS MUST BE OF EQUAL SIZE");
                return Ok(());
            }

            let r = env.call_ufun(&uf, vec![args[1].clone(), sep.to_string()])?;
            let mut used  = vec![false; keys.len()];
            let mut first = true;
            for res in list2arr(&r, sep, true, max) {
                let hit = (0..keys.len()).find(|j| !used[*j] && keys[*j] == res);
                if let Some(j) = hit {
                    used[j] = true;
                    if !first { out.push_str(&osep); }
                    first = false;
                    out.push_str(&vals[j]);
                }
            }
            Ok(())
        }, Some(3), Some(5), false);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::eval as ve;

    #[test]
    fn check_replace_iter_tokens() {
        assert_eq!(replace_iter_tokens("<##:#@>", "x", 3), "<x:3>");
        assert_eq!(replace_iter_tokens("###", "#@", 1),    "#@#");
        assert_eq!(replace_iter_tokens("#a", "x", 1),      "#a");
    }

    #[test]
    fn check_iter() {
        assert_eq!(ve("iter(a b c,<##>)"),             "<a> <b> <c>");
        assert_eq!(ve("iter(a|b,#@:##,|,-)"),          "1:a-2:b");
        assert_eq!(ve("iter(,x)"),                     "");
        assert_eq!(ve("iter(a b c,##[ibreak()])"),     "a");
        assert_eq!(ve("iter(a b,[ilev()]:[itext(0)])"), "0:a 0:b");
        assert_eq!(ve("iter(a b,iter(x y,[itext(1)][inum(0)]))"), "a1 a2 b1 b2");
        assert_eq!(ve("itext(0)"),                     "#-1 ARGUMENT OUT OF RANGE");
        assert_eq!(ve("ibreak()"),                     "#-1 OUT OF RANGE");
    }

    #[test]
    fn check_map_and_friends() {
        assert_eq!(ve("map(#lambda/{<%0:%1>},a b)"),          "<a:1> <b:2>");
        assert_eq!(ve("map(#lambda/{%0},)"),                  "");
        assert_eq!(ve("mix(#lambda/{%0%1},a b c,1 2)"),       "a1 b2 c");
        assert_eq!(ve("step(#lambda/{%0-%1},a b c,2)"),       "a-b c-");
        assert_eq!(ve("step(#lambda/{%0},a,11)"),             "#-1 STEP OUT OF RANGE");
        assert_eq!(ve("filter(#lambda/{eq(%0,2)},1 2 3 2)"),  "2 2");
        assert_eq!(ve("filterbool(#lambda/{%0},1 0 x 2)"),    "1 x 2");
    }

    #[test]
    fn check_fold() {
        assert_eq!(ve("fold(#lambda/{add(%0,%1)},1 2 3 4)"),    "10");
        assert_eq!(ve("fold(#lambda/{add(%0,%1)},1 2 3,10)"),   "16");
        assert_eq!(ve("fold(#lambda/{%0},a b c)"),              "a");
        assert_eq!(ve("fold(#lambda/{[%0][%1]},)"),             "");
    }

    #[test]
    fn check_munge() {
        assert_eq!(ve("munge(#lambda/{sort(%0)},3 1 2,c a b)"), "a b c");
        assert_eq!(ve("munge(#lambda/{%0},1 2,a)"), "#-1 LISTS MUST BE OF EQUAL SIZE");
    }
}
