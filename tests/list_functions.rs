// Copyright (c) 2019 Weird Constructor <weirdconstructor@gmail.com>
// This is a part of mushlist. See README.md and COPYING for details.

use mushlist::config::Config;
use mushlist::markup::strip_markup;

fn ve(s: &str) -> String {
    mushlist::eval::eval(s)
}

fn ve_cfg(cfg: Config, s: &str) -> String {
    mushlist::eval::eval_with(cfg, s)
}

const RED:   &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

#[test]
fn check_positions() {
    assert_eq!(ve("extract(a b c d,2,2)"),                  "b c");
    assert_eq!(ve("index(one:two:three,:,2,2)"),            "two");
    assert_eq!(ve("element(apple:banana:cherry,b*,:)"),     "2");
    assert_eq!(ve("elements(a b c d e,5 1 9 3)"),           "e a c");
    assert_eq!(ve("ldelete(red green blue yellow,2 4)"),    "red blue");
    assert_eq!(ve("ldelete(a b c,-1 0 7)"),                "a b c");
}

#[test]
fn check_space_separator_boundaries() {
    assert_eq!(ve("words({  a   b  })"),            "2");
    assert_eq!(ve("first({   a b})"),              "a");
    assert_eq!(ve("last({a b   })"),               "b");
    assert_eq!(ve("extract({ a  b  c },2,1)"),     "b");
    assert_eq!(ve("revwords({ a   b })"),          "b a");
}

#[test]
fn check_literal_separator_boundaries() {
    assert_eq!(ve("words(a||b,|)"),                "3");
    assert_eq!(ve("extract(a||b,2,1,|)"),          "");
    assert_eq!(ve("extract(a||b,3,1,|)"),          "b");
    assert_eq!(ve("revwords(a||b,|)"),             "b||a");
    assert_eq!(ve("elements(|x|,1 2 3,|,-)"),      "-x-");
}

#[test]
fn check_sorting() {
    assert_eq!(ve("sort(10 9 2)"),                 "2 9 10");
    assert_eq!(ve("sort(#10 #9 #2)"),              "#2 #9 #10");
    assert_eq!(ve("sort(1.5 1.25 -3)"),            "-3 1.25 1.5");
    assert_eq!(ve("sort(b C a)"),                  "C a b");
    assert_eq!(ve("sort(x10 x9 x2,m)"),            "x2 x9 x10");
    assert_eq!(ve("sort(a b,q)"),                  "a b");
}

#[test]
fn check_unique_is_idempotent() {
    let once = ve("unique(c a b a c)");
    assert_eq!(once, "a b c");
    assert_eq!(ve(&format!("unique({})", once)), once);
}

#[test]
fn check_set_laws() {
    let lists = [("a b c", "b c d"), ("x y", ""), ("", "p"), ("1 2 3", "3 2 1")];

    for (a, b) in lists.iter() {
        let u  = ve(&format!("setunion({},{})", a, b));
        let u2 = ve(&format!("setunion({},{})", b, a));
        assert_eq!(u, u2, "union of '{}' and '{}'", a, b);

        let i  = ve(&format!("setinter({},{})", a, b));
        let i2 = ve(&format!("setinter({},{})", b, a));
        assert_eq!(i, i2, "intersection of '{}' and '{}'", a, b);

        // nothing of b survives a difference with b
        let d = ve(&format!("setdiff({},{})", a, b));
        assert_eq!(ve(&format!("setinter({},{})", d, b)), "");

        // a difference and the intersection add up to a
        assert_eq!(ve(&format!("setunion({},{})", d, i)),
                   ve(&format!("unique({})", a)));
    }
}

#[test]
fn check_set_output_separator() {
    assert_eq!(ve("setunion(b|a,c|a,|,,-)"),   "a-b-c");
    assert_eq!(ve("setdiff(3 1 2,2,,n)"),      "1 3");
}

#[test]
fn check_item_mutation() {
    assert_eq!(ve("replace(a b c,2,X)"),       "a X c");
    assert_eq!(ve("insert(a b c,2,X)"),        "a X b c");
    assert_eq!(ve("insert(a b c,-1,X)"),       "a b c X");
    assert_eq!(ve("insert(,1,X)"),             "X");
    assert_eq!(ve("replace(a|b|c,3,X,|)"),     "a|b|X");
    assert_eq!(ve("replace(a b c,4,X)"),       "a b c");
}

#[test]
fn check_markup_is_kept() {
    let list = format!("{}a b{} c", RED, RESET);
    let r = ve(&format!("revwords({})", list));
    assert_eq!(strip_markup(&r), "c b a");
    assert!(r.contains(&format!("{}b{}", RED, RESET)));

    let r = ve(&format!("extract({},2,1)", list));
    assert_eq!(strip_markup(&r), "b");

    assert_eq!(ve(&format!("words({})", list)), "3");
}

#[test]
fn check_output_bound() {
    let cfg = Config { buffer_len: 10, random_seed: Some(1), ..Config::default() };
    assert_eq!(ve_cfg(cfg.clone(), "lnum(1000)"),        "0 1 2 3 4");
    assert_eq!(ve_cfg(cfg.clone(), "itemize(a b c)"),    "a, b, and");
    // arguments are bounded too
    assert_eq!(ve_cfg(cfg,         "revwords(a b c d e f g h)"), "e d c b a");
}

#[test]
fn check_max_list_size() {
    let cfg = Config { max_list_size: 3, random_seed: Some(1), ..Config::default() };
    assert_eq!(ve_cfg(cfg, "revwords(a b c d e)"), "c b a");
}

#[test]
fn check_random() {
    let r = ve("randword(a b c)");
    assert!(["a", "b", "c"].contains(&r.as_str()));
    assert_eq!(ve("randword()"), "");

    let s = ve("shuffle(a b c d e)");
    assert_eq!(ve(&format!("sort({})", s)), "a b c d e");
    // the seed is fixed
    assert_eq!(s, ve("shuffle(a b c d e)"));
}

#[test]
fn check_bad_arguments() {
    assert_eq!(ve("extract(a b,x)"),           "#-1 ARGUMENTS MUST BE INTEGERS");
    assert_eq!(ve("first(a b,::)"),            "#-1 SEPARATOR MUST BE ONE CHARACTER");
    assert_eq!(ve("element(a b,a b, )"),       "#-1 CAN ONLY TEST ONE ELEMENT");
    assert_eq!(ve("first()"),                  "");
    assert_eq!(ve("first(a,b,c)"),             "#-1 FUNCTION (FIRST) EXPECTS BETWEEN 1 AND 2 ARGUMENTS");
}
