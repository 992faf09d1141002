// Copyright (c) 2019 Weird Constructor <weirdconstructor@gmail.com>
// This is a part of mushlist. See README.md and COPYING for details.

//! The function table a dispatcher looks builtins up in.

use std::rc::Rc;
use fnv::FnvHashMap;

use crate::buffer::OutBuf;
use crate::env::{Env, FunResult};

/// The arguments of one function call.
#[derive(Debug, Clone, Default)]
pub struct Args {
    /// The upper cased name the function was called by.
    pub called_as:  String,
    pub v:          Vec<String>,
}

impl Args {
    pub fn new(called_as: &str, v: Vec<String>) -> Self {
        Self { called_as: called_as.to_ascii_uppercase(), v }
    }

    /// Argument `i` (0-based), empty if missing.
    pub fn arg(&self, i: usize) -> &str {
        self.v.get(i).map(|s| s.as_str()).unwrap_or("")
    }

    pub fn called_as(&self, name: &str) -> bool {
        self.called_as == name
    }
}

impl std::ops::Deref for Args {
    type Target = [String];
    fn deref(&self) -> &[String] { &self.v }
}

pub type FunCb = Rc<dyn Fn(&mut Env, &Args, &mut OutBuf) -> FunResult>;

#[derive(Clone)]
pub struct FunDef {
    pub name:       String,
    pub min_args:   usize,
    pub max_args:   Option<usize>,
    /// The arguments are handed over unevaluated.
    pub noparse:    bool,
    pub cb:         FunCb,
}

impl FunDef {
    /// The arity error text for a call with `n` arguments, if any.
    pub fn arity_error(&self, n: usize) -> Option<String> {
        let ok = n >= self.min_args && self.max_args.map(|m| n <= m).unwrap_or(true);
        if ok { return None; }

        let plural = |c: usize| if c == 1 { "ARGUMENT" } else { "ARGUMENTS" };
        Some(match self.max_args {
            Some(max) if max == self.min_args =>
                format!("#-1 FUNCTION ({}) EXPECTS {} {}",
                        self.name, max, plural(max)),
            Some(max) =>
                format!("#-1 FUNCTION ({}) EXPECTS BETWEEN {} AND {} ARGUMENTS",
                        self.name, self.min_args, max),
            None =>
                format!("#-1 FUNCTION ({}) EXPECTS AT LEAST {} {}",
                        self.name, self.min_args, plural(self.min_args)),
        })
    }
}

impl std::fmt::Debug for FunDef {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "FunDef[{},{}..{:?},noparse={}]",
               self.name, self.min_args, self.max_args, self.noparse)
    }
}

/// Maps case insensitive function names to their definitions.
#[derive(Default, Clone)]
pub struct SymbolTable {
    funs: FnvHashMap<String, Rc<FunDef>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self { funs: FnvHashMap::default() }
    }

    /// Registers a function. `min`/`max` of `None` mean no lower and no
    /// upper bound on the argument count.
    pub fn fun<T>(&mut self, name: &str, cb: T,
                  min: Option<usize>, max: Option<usize>, noparse: bool)
        where T: 'static + Fn(&mut Env, &Args, &mut OutBuf) -> FunResult
    {
        let name = name.to_ascii_uppercase();
        self.funs.insert(name.clone(), Rc::new(FunDef {
            name,
            min_args: min.unwrap_or(0),
            max_args: max,
            noparse,
            cb: Rc::new(cb),
        }));
    }

    /// Registers `alias` as another name of the already registered
    /// function `name`. The callback sees the name it was called by.
    pub fn alias(&mut self, alias: &str, name: &str) {
        if let Some(def) = self.get(name) {
            let alias = alias.to_ascii_uppercase();
            let mut def = (*def).clone();
            def.name = alias.clone();
            self.funs.insert(alias, Rc::new(def));
        }
    }

    pub fn get(&self, name: &str) -> Option<Rc<FunDef>> {
        self.funs.get(&name.to_ascii_uppercase()).cloned()
    }

    /// Merges all functions of `other` into this table.
    pub fn import(&mut self, other: SymbolTable) {
        self.funs.extend(other.funs);
    }

    /// The sorted names of all registered functions.
    pub fn list(&self) -> Vec<String> {
        let mut v : Vec<String> = self.funs.keys().cloned().collect();
        v.sort();
        v
    }

    pub fn len(&self) -> usize { self.funs.len() }
    pub fn is_empty(&self) -> bool { self.funs.is_empty() }
}
