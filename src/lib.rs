// Copyright (c) 2019 Weird Constructor <weirdconstructor@gmail.com>
// This is a part of mushlist. See README.md and COPYING for details.

/*!
mushlist - List Functions for an embedded MUSH command language
===============================================================

This crate provides the list, string and pattern functions of a MUSH
style softcode language: slicing lists by position, iterating over them
with callbacks, sorting, set operations, wildcard and regular
expression searches and some text layout.

In this language everything is a string. A list is a string plus a one
character separator. Functions are called as `name(arg, arg, ...)`,
`[...]` evaluates a nested expression and `{...}` protects text from
evaluation. Every result is bounded by an output buffer and every
evaluation by a function invocation budget, so no code can produce
unbounded output or run forever.

The function reference is in the [prelude](prelude/index.html#mushlist-reference).

# Embedding

The evaluator itself is pluggable. The functions only see an
[Env](env/struct.Env.html), which reaches the embedding through the
[Evaluator](env/trait.Evaluator.html) and
[ObjectDb](env/trait.ObjectDb.html) traits. The
[eval](eval/index.html) module has a small implementation of both,
which is good enough for tests and the REPL:

```
use mushlist::eval::EvalContext;

let mut ctx = EvalContext::new_default();
assert_eq!(ctx.eval("sort(banana apple cherry)"), "apple banana cherry");
assert_eq!(ctx.eval("iter(1 2 3,[mul(##,##)])"),   "1 4 9");

let obj = ctx.world().create("Helper");
ctx.world().set_attr(obj, "DOUBLE", "[mul(%0,2)]");
assert_eq!(ctx.eval("map(Helper/double,1 2 3)"),   "2 4 6");
```

The limits come from a [Config](config/struct.Config.html), which can
be read from a TOML file:

```
use mushlist::config::Config;
use mushlist::eval::eval_with;

let cfg = Config::from_toml_str("buffer_len = 8").unwrap();
assert_eq!(eval_with(cfg, "lnum(100)"), "0 1 2 3");
```
*/

pub mod util;
pub mod buffer;
pub mod markup;
pub mod list;
pub mod parser;
pub mod wild;
pub mod sort;
pub mod regs;
pub mod config;
pub mod symbols;
pub mod env;
#[macro_use]
pub mod prelude;
pub mod stdlib;
pub mod eval;

pub use env::Env;
pub use eval::EvalContext;
pub use config::Config;
