// Copyright (c) 2019 Weird Constructor <weirdconstructor@gmail.com>
// This is a part of mushlist. See README.md and COPYING for details.

//! Sorting, de-duplication, shuffling and the set functions.

use std::cmp::Ordering;

use crate::buffer::OutBuf;
use crate::env::Env;
use crate::list::*;
use crate::sort::*;
use crate::symbols::{Args, SymbolTable};
use crate::util::parse_integer;

#[derive(Debug, Clone, Copy)]
struct SetOp {
    lt: bool,
    gt: bool,
    eq: bool,
}

impl SetOp {
    fn from_name(called_as: &str) -> Self {
        if called_as.contains("DIFF") {
            SetOp { lt: true,  gt: false, eq: false }
        } else if called_as.contains("INTER") {
            SetOp { lt: false, gt: false, eq: true }
        } else {
            SetOp { lt: true,  gt: true,  eq: true }
        }
    }
}

/// Merges two sorted, de-duplicated lists. Returns the elements the
/// set operation selects, in order.
fn merge_sets(a: Vec<String>, b: Vec<String>, spec: SortSpec, op: SetOp) -> Vec<String> {
    let ka : Vec<SortKey> = a.iter().map(|s| spec.key(s)).collect();
    let kb : Vec<SortKey> = b.iter().map(|s| spec.key(s)).collect();

    let mut res = vec![];
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match spec.compare(&ka[i], &kb[j]) {
            Ordering::Less => {
                if op.lt { res.push(a[i].clone()); }
                i += 1;
            },
            Ordering::Greater => {
                if op.gt { res.push(b[j].clone()); }
                j += 1;
            },
            Ordering::Equal => {
                if op.eq { res.push(a[i].clone()); }
                i += 1;
                j += 1;
            },
        }
    }
    if op.lt { res.extend(a[i..].iter().cloned()); }
    if op.gt { res.extend(b[j..].iter().cloned()); }
    res
}

pub fn add_to_symtable(st: &mut SymbolTable) {
    func!(st, "sort",
        |env: &mut Env, args: &Args, out: &mut OutBuf| {
            if args[0].is_empty() { return Ok(()); }
            let sep  = delim!(args, 3, out);
            let osep = osep_or(args, 4, sep);

            let words = list2arr_ansi(&args[0], sep, true, env.max_list());
            let spec  = get_list_type(args, 2, &words);
            arr2list(&sort_items(words, spec), &osep, out);
            Ok(())
        }, Some(1), Some(4), false);

    func!(st, "sortkey",
        |env: &mut Env, args: &Args, out: &mut OutBuf| {
            if args[0].is_empty() || args[1].is_empty() { return Ok(()); }
            let sep  = delim!(args, 4, out);
            let osep = osep_or(args, 5, sep);
            let uf   = ufun!(env, &args[0], false);

            let words = list2arr_ansi(&args[1], sep, true, env.max_list());
            let mut keys = Vec::with_capacity(words.len());
            for w in words.iter() {
                keys.push(env.call_ufun(&uf, vec![w.clone()])?);
            }

            let spec = get_list_type(args, 3, &keys);
            let keys = keys.iter().map(|k| spec.key(k)).collect();
            arr2list(&gensort(words, keys, spec), &osep, out);
            Ok(())
        }, Some(2), Some(5), false);

    func!(st, "sortby",
        |env: &mut Env, args: &Args, out: &mut OutBuf| {
            if args[0].is_empty() { return Ok(()); }
            let sep  = delim!(args, 3, out);
            let osep = if args.len() == 4 { args[3].clone() } else { sep.to_string() };
            let uf   = ufun!(env, &args[0], true);

            let words = list2arr_ansi(&args[1], sep, true, env.max_list());
            let mut abort = None;
            let sorted =
                if words.len() > 1 {
                    merge_sort_by(words, |a, b| {
                        if abort.is_some()
                           || env.fun_invocations >= env.config.function_invocation_limit
                        {
                            return Ordering::Equal;
                        }
                        match env.call_ufun(&uf, vec![a.clone(), b.clone()]) {
                            Ok(r)  => parse_integer(&r).cmp(&0),
                            Err(e) => {
                                abort = Some(e);
                                Ordering::Equal
                            },
                        }
                    })
                } else {
                    words
                };

            arr2list(&sorted, &osep, out);
            match abort {
                Some(e) => Err(e),
                None    => Ok(()),
            }
        }, Some(2), Some(4), false);

    func!(st, "unique",
        |env: &mut Env, args: &Args, out: &mut OutBuf| {
            if args[0].is_empty() { return Ok(()); }
            let sep  = delim!(args, 3, out);
            let osep = if args.len() == 4 { args[3].clone() } else { sep.to_string() };

            let words = list2arr_ansi(&args[0], sep, true, env.max_list());
            let spec  = get_list_type(args, 2, &words);
            arr2list(&sort_uniq(words, spec), &osep, out);
            Ok(())
        }, Some(1), Some(4), false);

    func!(st, "shuffle",
        |env: &mut Env, args: &Args, out: &mut OutBuf| {
            let sep  = delim!(args, 2, out);
            let osep = osep_or(args, 3, sep);
            if args[0].is_empty() { return Ok(()); }

            let mut words = list2arr_ansi(&args[0], sep, true, env.max_list());
            let n = words.len();
            for i in 0..n {
                let j = env.random_range(i, n - 1);
                words.swap(i, j);
            }
            arr2list(&words, &osep, out);
            Ok(())
        }, Some(1), Some(3), false);

    func!(st, "setunion",
        |env: &mut Env, args: &Args, out: &mut OutBuf| {
            if args[0].is_empty() && args[1].is_empty() { return Ok(()); }
            let sep = delim!(args, 3, out);

            let max = env.max_list();
            let a = list2arr_ansi(&args[0], sep, true, max);
            let b = list2arr_ansi(&args[1], sep, true, max);

            let (mut spec, osep) =
                match args.len() {
                    0..=3 => (SortSpec::new(SortType::Unknown), sep.to_string()),
                    4 => {
                        let spec = get_list_type_noauto(args, 4);
                        if spec.is_known() { (spec, sep.to_string()) }
                        else { (SortSpec::new(SortType::Unknown), args[3].clone()) }
                    },
                    _ => (get_list_type_noauto(args, 4), args[4].clone()),
                };
            if !spec.is_known() {
                spec.stype = autodetect_2lists(&a, &b);
            }

            let res = merge_sets(sort_uniq(a, spec), sort_uniq(b, spec), spec,
                                 SetOp::from_name(&args.called_as));
            arr2list(&res, &osep, out);
            Ok(())
        }, Some(2), Some(5), false);

    st.alias("setdiff",  "setunion");
    st.alias("setinter", "setunion");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::eval as ve;

    fn v(s: &str) -> Vec<String> {
        s.split_whitespace().map(|s| s.to_string()).collect()
    }

    #[test]
    fn check_merge_sets() {
        let spec = SortSpec::new(SortType::Alphanum);
        let u = SetOp::from_name("SETUNION");
        let d = SetOp::from_name("SETDIFF");
        let i = SetOp::from_name("SETINTER");
        assert_eq!(merge_sets(v("a b c"), v("b c d"), spec, u), v("a b c d"));
        assert_eq!(merge_sets(v("a b c"), v("b c d"), spec, d), v("a"));
        assert_eq!(merge_sets(v("a b c"), v("b c d"), spec, i), v("b c"));
        assert_eq!(merge_sets(vec![], v("x"), spec, d), Vec::<String>::new());
    }

    #[test]
    fn check_sort() {
        assert_eq!(ve("sort(10 9 2)"),           "2 9 10");
        assert_eq!(ve("sort(10 9 2,a)"),         "10 2 9");
        assert_eq!(ve("sort(b a C,i)"),          "a b C");
        assert_eq!(ve("sort(1 3 2,-n)"),         "3 2 1");
        assert_eq!(ve("sort(c|a|b,,|,-)"),       "a-b-c");
        assert_eq!(ve("sort()"),                 "");
    }

    #[test]
    fn check_unique() {
        assert_eq!(ve("unique(b a b c a)"),      "a b c");
        assert_eq!(ve("unique(1 01 2,n)"),       "1 2");
        assert_eq!(ve("unique(A a,i)"),          "A");
    }

    #[test]
    fn check_sets() {
        assert_eq!(ve("setunion(a b c,b c d)"),      "a b c d");
        assert_eq!(ve("setdiff(a b c,b c d)"),       "a");
        assert_eq!(ve("setinter(a b c,b c d)"),      "b c");
        assert_eq!(ve("setunion(10 9,2)"),           "2 9 10");
        assert_eq!(ve("setunion(a|b,c,|,-)"),        "a-b-c");
        assert_eq!(ve("setunion(2 1,3,,n,:)"),       "1:2:3");
        assert_eq!(ve("setinter(,)"),                "");
    }

    #[test]
    fn check_sortkey_sortby() {
        assert_eq!(ve("sortkey(#lambda/{strlen(%0)},ccc a bb)"),          "a bb ccc");
        assert_eq!(ve("sortby(#lambda/{sub(%1,%0)},1 3 2)"),              "3 2 1");
        assert_eq!(ve("sortby(#lambda/{0},b a)"),                         "b a");
    }

    #[test]
    fn check_shuffle_keeps_elements() {
        let s = ve("shuffle(a b c d e)");
        let mut got = v(&s);
        got.sort();
        assert_eq!(got, v("a b c d e"));
    }
}
