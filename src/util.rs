// Copyright (c) 2019 Weird Constructor <weirdconstructor@gmail.com>
// This is a part of mushlist. See README.md and COPYING for details.

//- splitmix64 (http://xoroshiro.di.unimi.it/splitmix64.c)
//"""
//  Written in 2015 by Sebastiano Vigna (vigna@acm.org)
//
//  To the extent possible under law, the author has dedicated all copyright
//  and related and neighboring rights to this software to the public domain
//  worldwide. This software is distributed without any warranty.
//
//  See <http://creativecommons.org/publicdomain/zero/1.0/>.
//"""
//
// Written by Alexander Stocko <as@coder.gg>
//
// To the extent possible under law, the author has dedicated all copyright
// and related and neighboring rights to this software to the public domain
// worldwide. This software is distributed without any warranty.
//
// See <LICENSE or http://creativecommons.org/publicdomain/zero/1.0/>

use std::num::Wrapping as w;

pub const E_INT:       &str = "#-1 ARGUMENT MUST BE AN INTEGER";
pub const E_INTS:      &str = "#-1 ARGUMENTS MUST BE INTEGERS";
pub const E_NUM:       &str = "#-1 ARGUMENT MUST BE A NUMBER";
pub const E_NUMS:      &str = "#-1 ARGUMENTS MUST BE NUMBERS";
pub const E_RANGE:     &str = "#-1 OUT OF RANGE";
pub const E_ARGRANGE:  &str = "#-1 ARGUMENT OUT OF RANGE";
pub const E_BADREG:    &str = "#-1 REGISTER NAME INVALID";
pub const E_ONE_ELEM:  &str = "#-1 CAN ONLY TEST ONE ELEMENT";
pub const E_SEP:       &str = "#-1 SEPARATOR MUST BE ONE CHARACTER";

/// The `SplitMix64` random number generator.
#[derive(Copy, Clone)]
pub struct SplitMix64(pub u64);

impl SplitMix64 {
    pub fn new(seed: u64) -> Self { Self(seed) }

    /// Seeds from the wall clock. Used when no fixed seed is configured.
    pub fn new_from_time() -> Self {
        Self::new(now_timestamp() ^ 0x5DEE_CE66_D1CE_4E5B)
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let mut z = w(self.0) + w(0x9E37_79B9_7F4A_7C15_u64);
        self.0 = z.0;
        z = (z ^ (z >> 30)) * w(0xBF58_476D_1CE4_E5B9_u64);
        z = (z ^ (z >> 27)) * w(0x94D0_49BB_1331_11EB_u64);
        (z ^ (z >> 31)).0
    }

    /// Returns a number in the inclusive range `lo..=hi`.
    pub fn range(&mut self, lo: usize, hi: usize) -> usize {
        if hi <= lo { return lo; }
        let span = (hi - lo) as u64 + 1;
        lo + (self.next_u64() % span) as usize
    }
}

pub fn now_timestamp() -> u64 {
    std::time::SystemTime::now()
    .duration_since(std::time::SystemTime::UNIX_EPOCH)
    .map(|d| d.as_secs())
    .unwrap_or(0)
}

fn strip_sign(s: &str) -> &str {
    s.strip_prefix('-')
     .or_else(|| s.strip_prefix('+'))
     .unwrap_or(s)
}

/// An optionally signed run of digits, surrounding blanks allowed.
pub fn is_integer(s: &str) -> bool {
    is_strict_integer(s.trim_matches(' '))
}

/// An optionally signed run of digits and nothing else.
pub fn is_strict_integer(s: &str) -> bool {
    let digits = strip_sign(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// `atoi()` semantics: leading blanks, an optional sign, then as many
/// digits as there are. Garbage yields 0.
pub fn parse_integer(s: &str) -> i64 {
    let s = s.trim_start();
    let (neg, digits) =
        if let Some(r) = s.strip_prefix('-')      { (true, r) }
        else if let Some(r) = s.strip_prefix('+') { (false, r) }
        else                                      { (false, s) };

    let mut n : i64 = 0;
    for b in digits.bytes() {
        if !b.is_ascii_digit() { break; }
        n = n.saturating_mul(10).saturating_add((b - b'0') as i64);
    }
    if neg { -n } else { n }
}

/// Length of the longest prefix of `s` that reads as a decimal number.
fn number_prefix_len(s: &str) -> usize {
    let b = s.as_bytes();
    let mut i = 0;
    if i < b.len() && (b[i] == b'-' || b[i] == b'+') { i += 1; }

    let int_start = i;
    while i < b.len() && b[i].is_ascii_digit() { i += 1; }
    let mut digits = i - int_start;

    if i < b.len() && b[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < b.len() && b[j].is_ascii_digit() { j += 1; }
        digits += j - frac_start;
        if digits > 0 { i = j; }
    }
    if digits == 0 { return 0; }

    if i < b.len() && (b[i] == b'e' || b[i] == b'E') {
        let mut j = i + 1;
        if j < b.len() && (b[j] == b'-' || b[j] == b'+') { j += 1; }
        let exp_start = j;
        while j < b.len() && b[j].is_ascii_digit() { j += 1; }
        if j > exp_start { i = j; }
    }

    i
}

/// True if the whole string (blanks aside) is a decimal number.
pub fn is_number(s: &str) -> bool {
    is_strict_number(s.trim_matches(' '))
}

pub fn is_strict_number(s: &str) -> bool {
    !s.is_empty() && number_prefix_len(s) == s.len()
}

/// `strtod()` semantics: the numeric prefix is parsed, garbage yields 0.
pub fn parse_number(s: &str) -> f64 {
    let s = s.trim_start();
    let len = number_prefix_len(s);
    s[..len].parse::<f64>().unwrap_or(0.0)
}

/// Formats a number the way the server prints numbers: integral values
/// without a fraction, others with at most six decimals.
pub fn unparse_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        return format!("{}", n as i64);
    }
    let s = format!("{:.6}", n);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

/// Object id syntax: `#<digits>` with an optional `:<ctime>` suffix.
pub fn parse_dbref(s: &str) -> Option<i64> {
    let body = s.strip_prefix('#')?;
    let body = match body.find(':') {
        Some(i) if is_strict_integer(&body[i + 1..]) => &body[..i],
        Some(_) => return None,
        None    => body,
    };
    if is_strict_integer(body) { Some(parse_integer(body)) } else { None }
}

/// Truth value of a string the way `t()` and `filterbool()` see it.
pub fn parse_boolean(s: &str) -> bool {
    let s = s.trim_matches(' ');
    if s.is_empty() { return false; }
    if s.starts_with('#') {
        return match parse_dbref(s) {
            Some(d) => d >= 0,
            None    => !s.starts_with("#-"),
        };
    }
    if is_strict_number(s) {
        return parse_number(s) != 0.0;
    }
    true
}

pub fn bool_str(b: bool) -> &'static str {
    if b { "1" } else { "0" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_integers() {
        assert!(is_integer(" 12 "));
        assert!(is_integer("-3"));
        assert!(!is_integer("1.5"));
        assert!(!is_integer(""));
        assert!(!is_strict_integer(" 1"));
        assert_eq!(parse_integer("42abc"), 42);
        assert_eq!(parse_integer("  -7"),  -7);
        assert_eq!(parse_integer("x"),      0);
    }

    #[test]
    fn check_numbers() {
        assert!(is_number("1.5"));
        assert!(is_number("-.5"));
        assert!(is_number("1e3"));
        assert!(!is_number("."));
        assert!(!is_number("1.5x"));
        assert_eq!(parse_number("2.5kg"), 2.5);
        assert_eq!(unparse_number(3.0),   "3");
        assert_eq!(unparse_number(0.1 + 0.2), "0.3");
        assert_eq!(unparse_number(-1.25), "-1.25");
    }

    #[test]
    fn check_booleans() {
        assert!(!parse_boolean(""));
        assert!(!parse_boolean("0"));
        assert!(!parse_boolean("#-1 NO MATCH"));
        assert!(parse_boolean("#0"));
        assert!(parse_boolean("yes"));
        assert!(parse_boolean("0.5"));
    }

    #[test]
    fn check_dbrefs() {
        assert_eq!(parse_dbref("#12"),      Some(12));
        assert_eq!(parse_dbref("#12:3456"), Some(12));
        assert_eq!(parse_dbref("#-1"),      Some(-1));
        assert_eq!(parse_dbref("12"),       None);
        assert_eq!(parse_dbref("#x"),       None);
    }

    #[test]
    fn check_rng_range() {
        let mut r = SplitMix64::new(7);
        for _ in 0..100 {
            let v = r.range(3, 5);
            assert!((3..=5).contains(&v));
        }
        assert_eq!(r.range(4, 4), 4);
    }
}
