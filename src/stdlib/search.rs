// Copyright (c) 2019 Weird Constructor <weirdconstructor@gmail.com>
// This is a part of mushlist. See README.md and COPYING for details.

//! Finding elements by wildcard pattern, by exact value or by the name
//! of the object they refer to.
//!
//! Patterns are matched against the visible text of an element. The
//! elements are returned as they were given, markup included.

use crate::buffer::OutBuf;
use crate::env::{Dbref, Env, NOTHING};
use crate::list::*;
use crate::markup::strip_markup;
use crate::symbols::{Args, SymbolTable};
use crate::util::E_ONE_ELEM;
use crate::wild::{quick_wild, string_match};

/// The elements of the trimmed list.
fn elements(list: &str, sep: char) -> impl Iterator<Item = &str> {
    let s = trim_space_sep(list, sep);
    Tokens::new(s, sep).map(move |(a, b)| &s[a..b])
}

fn wild_hit(pattern: &str, elem: &str) -> bool {
    quick_wild(pattern, &strip_markup(elem))
}

/// A good object the executor may see, or `None`.
fn visible_obj(env: &Env, s: &str) -> Option<Dbref> {
    let db  = env.db();
    let obj = db.parse_objid(s)?;
    if db.is_good(obj) { Some(obj) } else { None }
}

pub fn add_to_symtable(st: &mut SymbolTable) {
    func!(st, "match",
        |_env: &mut Env, args: &Args, out: &mut OutBuf| {
            let sep = delim!(args, 3, out);
            let pos = elements(&args[0], sep).position(|e| wild_hit(&args[1], e));
            out.push_str(&pos.map(|p| p + 1).unwrap_or(0).to_string());
            Ok(())
        }, Some(2), Some(3), false);

    func!(st, "matchall",
        |_env: &mut Env, args: &Args, out: &mut OutBuf| {
            let sep  = delim!(args, 3, out);
            let osep = if args.len() == 4 { args[3].clone() } else { sep.to_string() };

            let hits : Vec<String> =
                elements(&args[0], sep).enumerate()
                    .filter(|(_, e)| wild_hit(&args[1], e))
                    .map(|(i, _)| (i + 1).to_string())
                    .collect();
            arr2list(&hits, &osep, out);
            Ok(())
        }, Some(2), Some(4), false);

    func!(st, "grab",
        |_env: &mut Env, args: &Args, out: &mut OutBuf| {
            let sep = delim!(args, 3, out);
            if let Some(e) = elements(&args[0], sep).find(|e| wild_hit(&args[1], e)) {
                out.push_str(e);
            }
            Ok(())
        }, Some(2), Some(3), false);

    func!(st, "graball",
        |_env: &mut Env, args: &Args, out: &mut OutBuf| {
            let sep  = delim!(args, 3, out);
            let osep = if args.len() == 4 { args[3].clone() } else { sep.to_string() };

            let hits : Vec<&str> =
                elements(&args[0], sep).filter(|e| wild_hit(&args[1], e)).collect();
            arr2list(&hits, &osep, out);
            Ok(())
        }, Some(2), Some(4), false);

    func!(st, "member",
        |_env: &mut Env, args: &Args, out: &mut OutBuf| {
            let sep = delim!(args, 3, out);
            if args[1].contains(sep) {
                out.push_str(E_ONE_ELEM);
                return Ok(());
            }
            let pos = elements(&args[0], sep).position(|e| e == args[1]);
            out.push_str(&pos.map(|p| p + 1).unwrap_or(0).to_string());
            Ok(())
        }, Some(2), Some(3), false);

    func!(st, "namegrab",
        |env: &mut Env, args: &Args, out: &mut OutBuf| {
            let sep      = delim!(args, 3, out);
            let name     = &args[1];
            let absolute = visible_obj(env, name).unwrap_or(NOTHING);
            let db       = env.db();

            let mut exact   = None;
            let mut partial = None;
            for e in elements(&args[0], sep) {
                let victim = match visible_obj(env, e) { Some(v) => v, None => continue };
                if !db.can_interact(victim, env.executor) { continue; }

                if victim == absolute {
                    out.push_str(e);
                    return Ok(());
                }
                let vname = db.name(victim).unwrap_or_default();
                if exact.is_none() && vname.to_lowercase() == name.to_lowercase() {
                    exact = Some(e);
                }
                if partial.is_none() && string_match(&vname, name) {
                    partial = Some(e);
                }
            }

            if let Some(e) = exact.or(partial) {
                out.push_str(e);
            }
            Ok(())
        }, Some(2), Some(3), false);

    func!(st, "namegraball",
        |env: &mut Env, args: &Args, out: &mut OutBuf| {
            let sep      = delim!(args, 3, out);
            let name     = &args[1];
            let absolute = visible_obj(env, name).unwrap_or(NOTHING);
            let db       = env.db();

            let hits : Vec<&str> =
                elements(&args[0], sep)
                    .filter(|e| {
                        let victim = match visible_obj(env, e) { Some(v) => v, None => return false };
                        if !name.is_empty() {
                            let vname = db.name(victim).unwrap_or_default();
                            if !(string_match(&vname, name) || absolute == victim) {
                                return false;
                            }
                        }
                        db.can_interact(victim, env.executor)
                    })
                    .collect();
            arr2list(&hits, &sep.to_string(), out);
            Ok(())
        }, Some(2), Some(3), false);
}

#[cfg(test)]
mod tests {
    use crate::eval::eval as ve;

    #[test]
    fn check_match_grab() {
        assert_eq!(ve("match(foo bar baz,b*)"),        "2");
        assert_eq!(ve("match(foo bar,x*)"),            "0");
        assert_eq!(ve("matchall(foo bar baz,b*)"),     "2 3");
        assert_eq!(ve("matchall(a|b|a,a,|,-)"),        "1-3");
        assert_eq!(ve("grab(foo bar baz,*a?)"),        "bar");
        assert_eq!(ve("graball(foo bar baz,ba?)"),     "bar baz");
        assert_eq!(ve("graball(foo bar,x)"),           "");
    }

    #[test]
    fn check_member() {
        assert_eq!(ve("member(a b c,c)"),     "3");
        assert_eq!(ve("member(a b c,C)"),     "0");
        assert_eq!(ve("member(a b c,a b)"),   "#-1 CAN ONLY TEST ONE ELEMENT");
    }
}
