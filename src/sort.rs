// Copyright (c) 2019 Weird Constructor <weirdconstructor@gmail.com>
// This is a part of mushlist. See README.md and COPYING for details.

/*!
Comparator families for sorting, de-duplication and set algebra.

A sort type is given as a single letter, optionally prefixed with `-`
to reverse the order:

| Letter | Order                                              |
|--------|----------------------------------------------------|
| `a`    | byte wise on the visible text                      |
| `i`    | case insensitive                                   |
| `d`    | object ids by number                               |
| `n`    | integers                                           |
| `f`    | decimal numbers                                    |
| `m`    | natural order, digit runs compared by magnitude    |

An empty or unknown type is detected from the list content.
*/

use std::cmp::Ordering;

use crate::markup::strip_markup;
use crate::util::{is_integer, is_number, parse_dbref, parse_integer, parse_number};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortType {
    Alphanum,
    Insensitive,
    Dbref,
    Numeric,
    Float,
    Magnitude,
    Unknown,
}

/// A sort type plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub stype:   SortType,
    pub reverse: bool,
}

impl SortSpec {
    pub fn new(stype: SortType) -> Self {
        Self { stype, reverse: false }
    }

    /// Parses a type name. Returns the direction and the type, `Unknown`
    /// for names that are empty or not known.
    pub fn parse(name: &str) -> Self {
        let name = name.trim();
        let (reverse, name) = match name.strip_prefix('-') {
            Some(rest) => (true, rest),
            None       => (false, name),
        };
        let stype =
            match name.to_ascii_lowercase().as_str() {
                "a" => SortType::Alphanum,
                "i" => SortType::Insensitive,
                "d" => SortType::Dbref,
                "n" => SortType::Numeric,
                "f" => SortType::Float,
                "m" => SortType::Magnitude,
                _   => SortType::Unknown,
            };
        Self { stype, reverse }
    }

    pub fn is_known(&self) -> bool { self.stype != SortType::Unknown }

    pub fn key(&self, item: &str) -> SortKey {
        SortKey::new(self.stype, item)
    }

    /// Compares two keys, honoring the direction.
    pub fn compare(&self, a: &SortKey, b: &SortKey) -> Ordering {
        let o = a.compare(b);
        if self.reverse { o.reverse() } else { o }
    }
}

/// Picks the most specific type all elements satisfy.
pub fn autodetect_list<S: AsRef<str>>(items: &[S]) -> SortType {
    let mut stype = SortType::Numeric;

    for (i, item) in items.iter().enumerate() {
        let s = strip_markup(item.as_ref());
        match stype {
            SortType::Numeric => {
                if !is_number(&s) {
                    if i == 0 && parse_dbref(s.trim()).is_some() {
                        stype = SortType::Dbref;
                    } else {
                        return SortType::Alphanum;
                    }
                } else if !is_integer(&s) {
                    stype = SortType::Float;
                }
            },
            SortType::Float => {
                if !is_number(&s) { return SortType::Alphanum; }
            },
            SortType::Dbref => {
                if parse_dbref(s.trim()).is_none() { return SortType::Alphanum; }
            },
            _ => (),
        }
    }

    stype
}

/// Detects a type shared by two lists.
pub fn autodetect_2lists<S: AsRef<str>>(a: &[S], b: &[S]) -> SortType {
    let x = autodetect_list(a);
    let y = autodetect_list(b);
    if x == y { return x; }
    match (x, y) {
        (SortType::Numeric, SortType::Float)
        | (SortType::Float, SortType::Numeric) => SortType::Float,
        _ => SortType::Alphanum,
    }
}

/// The type named by the 1-based argument `pos`, detected from `items`
/// when the argument is missing, empty or unknown.
pub fn get_list_type<S: AsRef<str>>(args: &[String], pos: usize, items: &[S]) -> SortSpec {
    let mut spec = get_list_type_noauto(args, pos);
    if !spec.is_known() {
        spec.stype = autodetect_list(items);
    }
    spec
}

/// The type named by the 1-based argument `pos`, `Unknown` when
/// there is none.
pub fn get_list_type_noauto(args: &[String], pos: usize) -> SortSpec {
    match args.get(pos - 1) {
        Some(a) => SortSpec::parse(&strip_markup(a)),
        None    => SortSpec::new(SortType::Unknown),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk {
    Digits(String),
    Text(String),
}

fn natural_chunks(s: &str) -> Vec<Chunk> {
    let mut chunks = vec![];
    let mut cur    = String::new();
    let mut digits = false;

    for c in s.chars() {
        let d = c.is_ascii_digit();
        if !cur.is_empty() && d != digits {
            chunks.push(if digits { Chunk::Digits(std::mem::take(&mut cur)) }
                        else      { Chunk::Text(std::mem::take(&mut cur)) });
        }
        digits = d;
        if d { cur.push(c); } else { cur.extend(c.to_lowercase()); }
    }
    if !cur.is_empty() {
        chunks.push(if digits { Chunk::Digits(cur) } else { Chunk::Text(cur) });
    }
    chunks
}

fn cmp_magnitude(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn cmp_chunks(a: &[Chunk], b: &[Chunk]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        let o =
            match (x, y) {
                (Chunk::Digits(x), Chunk::Digits(y)) => cmp_magnitude(x, y),
                (Chunk::Text(x),   Chunk::Text(y))   => x.cmp(y),
                (Chunk::Digits(_), Chunk::Text(_))   => Ordering::Less,
                (Chunk::Text(_),   Chunk::Digits(_)) => Ordering::Greater,
            };
        if o != Ordering::Equal { return o; }
    }
    a.len().cmp(&b.len())
}

/// A comparison key, computed once per element from its visible text.
#[derive(Debug, Clone)]
pub enum SortKey {
    Str(String),
    Int(i64),
    Flt(f64),
    Natural(Vec<Chunk>),
}

impl SortKey {
    pub fn new(stype: SortType, item: &str) -> Self {
        let s = strip_markup(item);
        match stype {
            SortType::Insensitive => SortKey::Str(s.to_lowercase()),
            SortType::Dbref       => SortKey::Int(parse_dbref(s.trim()).unwrap_or(-1)),
            SortType::Numeric     => SortKey::Int(parse_integer(&s)),
            SortType::Float       => SortKey::Flt(parse_number(&s)),
            SortType::Magnitude   => SortKey::Natural(natural_chunks(&s)),
            SortType::Alphanum
            | SortType::Unknown   => SortKey::Str(s),
        }
    }

    /// A total order. Keys of different kinds never meet in one sort,
    /// they are ordered by kind to keep the order total.
    pub fn compare(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Str(a),     SortKey::Str(b))     => a.cmp(b),
            (SortKey::Int(a),     SortKey::Int(b))     => a.cmp(b),
            (SortKey::Flt(a),     SortKey::Flt(b))     => a.total_cmp(b),
            (SortKey::Natural(a), SortKey::Natural(b)) => cmp_chunks(a, b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    /// Equality consistent with `compare`.
    pub fn same(&self, other: &SortKey) -> bool {
        self.compare(other) == Ordering::Equal
    }

    fn rank(&self) -> u8 {
        match self {
            SortKey::Int(_)     => 0,
            SortKey::Flt(_)     => 1,
            SortKey::Natural(_) => 2,
            SortKey::Str(_)     => 3,
        }
    }
}

/// Stable sort of `values` by the parallel `keys`.
pub fn gensort(values: Vec<String>, keys: Vec<SortKey>, spec: SortSpec) -> Vec<String> {
    let mut pairs : Vec<(SortKey, String)> = keys.into_iter().zip(values).collect();
    pairs.sort_by(|a, b| spec.compare(&a.0, &b.0));
    pairs.into_iter().map(|(_, v)| v).collect()
}

/// Sorts `items` by keys computed from themselves.
pub fn sort_items(items: Vec<String>, spec: SortSpec) -> Vec<String> {
    let keys = items.iter().map(|i| spec.key(i)).collect();
    gensort(items, keys, spec)
}

/// Drops elements equal to their predecessor.
pub fn uniq_adjacent(items: Vec<String>, spec: SortSpec) -> Vec<String> {
    let mut out : Vec<String> = Vec::with_capacity(items.len());
    let mut last : Option<SortKey> = None;
    for item in items {
        let k = spec.key(&item);
        if let Some(l) = &last {
            if l.same(&k) { continue; }
        }
        last = Some(k);
        out.push(item);
    }
    out
}

/// Sorts and de-duplicates, the preparation step of the set functions.
pub fn sort_uniq(items: Vec<String>, spec: SortSpec) -> Vec<String> {
    uniq_adjacent(sort_items(items, spec), spec)
}

/// Stable merge sort with a caller supplied comparator. The comparator
/// may be inconsistent, the result is then some permutation of `items`.
pub fn merge_sort_by<T, F>(items: Vec<T>, mut cmp: F) -> Vec<T>
    where F: FnMut(&T, &T) -> Ordering
{
    let n = items.len();
    let mut idx : Vec<usize> = (0..n).collect();
    let mut tmp : Vec<usize> = Vec::with_capacity(n);

    let mut width = 1;
    while width < n {
        tmp.clear();
        let mut lo = 0;
        while lo < n {
            let mid = (lo + width).min(n);
            let hi  = (lo + 2 * width).min(n);
            let (mut i, mut j) = (lo, mid);
            while i < mid && j < hi {
                if cmp(&items[idx[j]], &items[idx[i]]) == Ordering::Less {
                    tmp.push(idx[j]);
                    j += 1;
                } else {
                    tmp.push(idx[i]);
                    i += 1;
                }
            }
            tmp.extend_from_slice(&idx[i..mid]);
            tmp.extend_from_slice(&idx[j..hi]);
            lo = hi;
        }
        std::mem::swap(&mut idx, &mut tmp);
        width *= 2;
    }

    let mut slots : Vec<Option<T>> = items.into_iter().map(Some).collect();
    idx.into_iter().filter_map(|i| slots[i].take()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Vec<String> {
        s.split_whitespace().map(|s| s.to_string()).collect()
    }

    fn sorted(s: &str, t: &str) -> String {
        let items = v(s);
        let mut spec = SortSpec::parse(t);
        if !spec.is_known() { spec.stype = autodetect_list(&items); }
        sort_items(items, spec).join(" ")
    }

    #[test]
    fn check_autodetect() {
        assert_eq!(autodetect_list(&v("10 9 2")),     SortType::Numeric);
        assert_eq!(autodetect_list(&v("1 2.5 3")),    SortType::Float);
        assert_eq!(autodetect_list(&v("#1 #20 #3")),  SortType::Dbref);
        assert_eq!(autodetect_list(&v("1 #20")),      SortType::Alphanum);
        assert_eq!(autodetect_list(&v("#1 2")),       SortType::Alphanum);
        assert_eq!(autodetect_list(&v("1.5 x")),      SortType::Alphanum);
        assert_eq!(autodetect_list(&v("b a")),        SortType::Alphanum);
        assert_eq!(autodetect_list::<String>(&[]),    SortType::Numeric);
        assert_eq!(autodetect_2lists(&v("1 2"), &v("1.5")), SortType::Float);
        assert_eq!(autodetect_2lists(&v("1 2"), &v("x")),   SortType::Alphanum);
        assert_eq!(autodetect_2lists(&v("#1"), &v("#2")),   SortType::Dbref);
    }

    #[test]
    fn check_sort_types() {
        assert_eq!(sorted("10 9 2", ""),         "2 9 10");
        assert_eq!(sorted("10 9 2", "a"),        "10 2 9");
        assert_eq!(sorted("10 9 2", "-n"),       "10 9 2");
        assert_eq!(sorted("b A c", "a"),         "A b c");
        assert_eq!(sorted("b A c", "i"),         "A b c");
        assert_eq!(sorted("b a C", "i"),         "a b C");
        assert_eq!(sorted("#10 #9 #100", "d"),   "#9 #10 #100");
        assert_eq!(sorted("1.5 -2 1e1", "f"),    "-2 1.5 1e1");
        assert_eq!(sorted("a10 a9 a100 b1", "m"), "a9 a10 a100 b1");
    }

    #[test]
    fn check_stable() {
        let items = v("Ab ab AB");
        let spec  = SortSpec::parse("i");
        assert_eq!(sort_items(items.clone(), spec).join(" "), "Ab ab AB");
        let spec  = SortSpec::parse("-i");
        assert_eq!(sort_items(items, spec).join(" "), "Ab ab AB");
    }

    #[test]
    fn check_uniq() {
        let spec = SortSpec::new(SortType::Numeric);
        assert_eq!(sort_uniq(v("3 1 3 2 01"), spec).join(" "), "1 2 3");
        let spec = SortSpec::new(SortType::Insensitive);
        assert_eq!(sort_uniq(v("b B a"), spec).join(" "), "a b");
    }

    #[test]
    fn check_list_type_args() {
        let args = vec!["x".to_string(), "-n".to_string(), "zz".to_string()];
        let items = v("a b");
        assert_eq!(get_list_type(&args, 2, &items), SortSpec { stype: SortType::Numeric, reverse: true });
        assert_eq!(get_list_type(&args, 3, &items).stype, SortType::Alphanum);
        assert_eq!(get_list_type_noauto(&args, 3).stype,  SortType::Unknown);
        assert_eq!(get_list_type_noauto(&args, 9).stype,  SortType::Unknown);
    }

    #[test]
    fn check_merge_sort_by() {
        let v = merge_sort_by(vec![3, 1, 2, 1], |a: &i32, b: &i32| a.cmp(b));
        assert_eq!(v, vec![1, 1, 2, 3]);
        let pairs = vec![(1, 'a'), (0, 'b'), (1, 'c'), (0, 'd')];
        let v = merge_sort_by(pairs, |a, b| a.0.cmp(&b.0));
        assert_eq!(v, vec![(0, 'b'), (0, 'd'), (1, 'a'), (1, 'c')]);
        let v = merge_sort_by(vec![5, 4, 3], |_, _| Ordering::Less);
        assert_eq!(v.len(), 3);
    }
}
