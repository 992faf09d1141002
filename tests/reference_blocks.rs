// Copyright (c) 2019 Weird Constructor <weirdconstructor@gmail.com>
// This is a part of mushlist. See README.md and COPYING for details.

#![cfg(feature="regex")]

use std::fs::File;
use regex::Regex;
use std::io::{BufRead, BufReader};

/// Collects the `expression ==> result` lines of all ```mush blocks.
fn get_examples_from_file(filename: &str) -> Vec<(String, String, String)> {
    let f = File::open(filename).expect("Open file");

    let rx     = Regex::new("^```mush").unwrap();
    let rx_end = Regex::new("^```").unwrap();
    let rx_ex  = Regex::new(r"^(.*?) ==> ?(.*)$").unwrap();

    let mut examples = Vec::new();
    let mut in_code  = false;
    for (lidx, l) in BufReader::new(f).lines().enumerate() {
        let line = l.unwrap();

        if in_code && rx_end.is_match(&line) {
            in_code = false;

        } else if !in_code && rx.is_match(&line) {
            in_code = true;

        } else if in_code {
            let caps = rx_ex.captures(&line)
                .unwrap_or_else(|| panic!("{} line {}: not an example", filename, lidx + 1));
            examples.push((
                format!("{} line {}", filename, lidx + 1),
                caps[1].to_string(),
                caps[2].to_string()));
        }
    }

    examples
}

#[test]
fn main() {
    let examples = get_examples_from_file("src/prelude.rs");
    assert!(examples.len() > 50);

    for (name, expr, expected) in examples {
        let got = mushlist::eval::eval(&expr);
        assert_eq!(got, expected, "example at {}: {}", name, expr);
        println!("ok '{}': {} ==> {}", name, expr, got);
    }
}
