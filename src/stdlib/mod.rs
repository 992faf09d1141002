// Copyright (c) 2019 Weird Constructor <weirdconstructor@gmail.com>
// This is a part of mushlist. See README.md and COPYING for details.

//! The builtin function families. Each module registers its functions
//! with `add_to_symtable`.

/// The separator at the 1-based argument `$n`. On a bad separator the
/// error is already written and the function returns.
macro_rules! delim {
    ($args: expr, $n: expr, $out: expr) => {
        match crate::list::delim_check($args, $n, $out) {
            Some(c) => c,
            None    => return Ok(()),
        }
    }
}

/// Resolves a callback reference, an unresolvable one ends the function
/// without output.
macro_rules! ufun {
    ($env: expr, $spec: expr, $require_attr: expr) => {
        match $env.fetch_ufun($spec, $require_attr) {
            Some(uf) => uf,
            None     => return Ok(()),
        }
    }
}

mod slice;
mod iter;
mod sorting;
mod search;
pub mod items;
mod format;
#[cfg(feature="regex")]
mod regexp;

use crate::symbols::SymbolTable;

pub fn add_to_symtable(st: &mut SymbolTable) {
    slice::add_to_symtable(st);
    iter::add_to_symtable(st);
    sorting::add_to_symtable(st);
    search::add_to_symtable(st);
    items::add_to_symtable(st);
    format::add_to_symtable(st);
    #[cfg(feature="regex")]
    regexp::add_to_symtable(st);
}
