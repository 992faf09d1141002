// Copyright (c) 2019 Weird Constructor <weirdconstructor@gmail.com>
// This is a part of mushlist. See README.md and COPYING for details.

/*!
A small reference evaluator and object store.

This is what the test suite and the REPL drive the function library
with. It understands just enough of the command language to write
meaningful callbacks:

| Syntax          | Meaning                                                 |
|-----------------|---------------------------------------------------------|
| `name(a, b)`    | a function call, only at the start of an expression     |
| `[...]`         | evaluates the contents in place                         |
| `{...}`         | groups text, the braces are dropped and nothing inside is evaluated |
| `\c`            | the character `c` literally                             |
| `%0`..`%9`      | callback arguments                                      |
| `%q<name>`      | a q-register, `%qa` for single character names          |
| `%b` `%r` `%t`  | space, newline, tab                                     |
| `%#` `%!` `%@`  | enactor, executor and caller                            |
| `$0`..`$9`      | regexp captures, only in `regedit()` replacements       |
| `$<name>`       | named regexp captures                                   |

Callbacks are referenced as `#<dbref>/<attr>`, `<name>/<attr>` or
`#lambda/<code>`:

```
use mushlist::eval::EvalContext;

let mut ctx = EvalContext::new_default();
let obj = ctx.world().create("Helper");
ctx.world().set_attr(obj, "DOUBLE", "mul(%0,2)");

assert_eq!(ctx.eval("map(Helper/double,1 2 3)"), "2 4 6");
assert_eq!(ctx.eval("map(#lambda/{add(%0,1)},1 2 3)"), "2 3 4");
```
*/

use std::cell::RefCell;
use std::rc::Rc;
use fnv::FnvHashMap;

use crate::buffer::OutBuf;
use crate::config::Config;
use crate::env::*;
use crate::parser::State;
use crate::prelude::default_symbol_table;

#[derive(Debug, Clone, Default)]
pub struct Object {
    pub name:   String,
    pub attrs:  FnvHashMap<String, String>,
    /// Other objects can't find this one by name.
    pub hidden: bool,
}

/// The object store. Objects are never destroyed, their dbref is
/// their index.
#[derive(Debug, Default)]
pub struct World {
    objects: RefCell<Vec<Object>>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, name: &str) -> Dbref {
        let mut objs = self.objects.borrow_mut();
        objs.push(Object { name: name.to_string(), ..Object::default() });
        log::debug!("created #{} '{}'", objs.len() - 1, name);
        (objs.len() - 1) as Dbref
    }

    fn with_obj<R, F: FnOnce(&mut Object) -> R>(&self, obj: Dbref, f: F) -> Option<R> {
        if obj < 0 { return None; }
        self.objects.borrow_mut().get_mut(obj as usize).map(f)
    }

    /// Sets an attribute, an empty value removes it. Returns `false`
    /// if there is no such object.
    pub fn set_attr(&self, obj: Dbref, attr: &str, value: &str) -> bool {
        let attr = attr.trim().to_ascii_uppercase();
        self.with_obj(obj, |o| {
            if value.is_empty() { o.attrs.remove(&attr); }
            else { o.attrs.insert(attr, value.to_string()); }
        }).is_some()
    }

    pub fn get_attr(&self, obj: Dbref, attr: &str) -> Option<String> {
        let attr = attr.trim().to_ascii_uppercase();
        self.with_obj(obj, |o| o.attrs.get(&attr).cloned()).flatten()
    }

    pub fn set_hidden(&self, obj: Dbref, hidden: bool) {
        self.with_obj(obj, |o| o.hidden = hidden);
    }

    /// Finds an object by `me`, dbref or case insensitive name.
    pub fn locate(&self, what: &str, me: Dbref) -> Option<Dbref> {
        let what = what.trim();
        if what.eq_ignore_ascii_case("me") {
            return Some(me);
        }
        if let Some(obj) = self.parse_objid(what) {
            return if self.is_good(obj) { Some(obj) } else { None };
        }
        self.objects.borrow().iter()
            .position(|o| o.name.eq_ignore_ascii_case(what))
            .map(|i| i as Dbref)
    }
}

impl ObjectDb for World {
    fn is_good(&self, obj: Dbref) -> bool {
        obj >= 0 && (obj as usize) < self.objects.borrow().len()
    }

    fn name(&self, obj: Dbref) -> Option<String> {
        self.with_obj(obj, |o| o.name.clone())
    }

    fn can_interact(&self, to: Dbref, from: Dbref) -> bool {
        to == from || !self.with_obj(to, |o| o.hidden).unwrap_or(true)
    }
}

fn is_fun_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Copies a markup escape sequence, the ESC is already consumed.
/// The `[` of the sequence is not a bracket.
fn take_escape(ps: &mut State, s: &mut String) {
    s.push('\x1b');
    if ps.peek() != Some('[') { return; }
    while let Some(c) = ps.next_char() {
        s.push(c);
        if c.is_ascii_alphabetic() { break; }
    }
}

/// Reads up to the `close` that balances the already consumed `open`.
/// Returns the text in between and whether the group was closed.
fn take_balanced(ps: &mut State, open: char, close: char) -> (String, bool) {
    let mut s     = String::new();
    let mut depth = 1;
    while let Some(c) = ps.next_char() {
        if c == '\\' {
            s.push(c);
            if let Some(n) = ps.next_char() { s.push(n); }
            continue;
        }
        if c == '\x1b' {
            take_escape(ps, &mut s);
            continue;
        }
        if c == '{' && open != '{' {
            let (inner, closed) = take_balanced(ps, '{', '}');
            s.push('{');
            s.push_str(&inner);
            if closed { s.push('}'); }
            continue;
        }
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 { return (s, true); }
        }
        s.push(c);
    }
    (s, false)
}

/// Splits the raw arguments of a call, the opening parenthesis is
/// already consumed. Unbalanced input ends the call at the end of the
/// text.
fn split_args(ps: &mut State) -> Vec<String> {
    let mut args    = vec![];
    let mut cur     = String::new();
    let mut parens  = 0;
    let mut bracket = 0;

    while let Some(c) = ps.next_char() {
        match c {
            '\\' => {
                cur.push(c);
                if let Some(n) = ps.next_char() { cur.push(n); }
            },
            '\x1b' => take_escape(ps, &mut cur),
            '{' => {
                let (inner, closed) = take_balanced(ps, '{', '}');
                cur.push('{');
                cur.push_str(&inner);
                if closed { cur.push('}'); }
            },
            '[' => {
                bracket += 1;
                cur.push(c);
            },
            ']' if bracket > 0 => {
                bracket -= 1;
                cur.push(c);
            },
            '(' => {
                parens += 1;
                cur.push(c);
            },
            ')' if parens == 0 && bracket == 0 => {
                args.push(cur);
                return trim_args(args);
            },
            ')' => {
                if parens > 0 { parens -= 1; }
                cur.push(c);
            },
            ',' if parens == 0 && bracket == 0 => {
                args.push(std::mem::take(&mut cur));
            },
            _ => cur.push(c),
        }
    }
    args.push(cur);
    trim_args(args)
}

fn trim_args(args: Vec<String>) -> Vec<String> {
    args.into_iter().map(|a| a.trim_matches(' ').to_string()).collect()
}

/// The `Evaluator` of the reference implementation.
pub struct Interp {
    world: Rc<World>,
}

impl Interp {
    pub fn new(world: Rc<World>) -> Self {
        Self { world }
    }

    /// Calls `name` if the expression starts with a function call.
    fn try_call(&self, env: &mut Env, ps: &mut State, out: &mut OutBuf,
                flags: EvalFlags) -> FunResult
    {
        let mut n = 0;
        while ps.peek_at(n).map(is_fun_char).unwrap_or(false) { n += 1; }
        if n == 0 || ps.peek_at(n) != Some('(') {
            return Ok(());
        }

        let name = ps.take_while(is_fun_char);
        ps.consume();
        let raw = split_args(ps);

        let def =
            match env.lookup(&name) {
                Some(def) => def,
                None      => return env.call_function(&name, vec![], out),
            };

        let raw =
            if raw.len() == 1 && raw[0].is_empty() && def.min_args == 0 { vec![] }
            else { raw };

        let args =
            if def.noparse {
                raw
            } else {
                let mut v = Vec::with_capacity(raw.len());
                for a in raw.iter() {
                    let mut buf = env.new_buf();
                    env.eval(a, &mut buf, flags)?;
                    v.push(buf.into_string());
                }
                v
            };

        env.call_function(&name, args, out)
    }

    fn percent(env: &Env, ps: &mut State, out: &mut OutBuf) {
        let c = match ps.next_char() { Some(c) => c, None => return };
        match c {
            '0'..='9' => {
                out.push_str(env.regs.arg(c as usize - '0' as usize));
            },
            'q' | 'Q' => {
                let name =
                    if ps.consume_if_eq('<') {
                        let n = ps.take_while(|c| c != '>');
                        ps.consume();
                        n
                    } else {
                        ps.next_char().map(|c| c.to_string()).unwrap_or_default()
                    };
                out.push_str(env.regs.get_q(&name));
            },
            'b' | 'B' => { out.push_char(' '); },
            'r' | 'R' => { out.push_char('\n'); },
            't' | 'T' => { out.push_char('\t'); },
            '#' => { out.push_str(&format!("#{}", env.enactor)); },
            '!' => { out.push_str(&format!("#{}", env.executor)); },
            '@' => { out.push_str(&format!("#{}", env.caller)); },
            _   => { out.push_char(c); },
        }
    }

    fn dollar(env: &Env, ps: &mut State, out: &mut OutBuf) {
        match ps.peek() {
            Some(c) if c.is_ascii_digit() => {
                ps.consume();
                out.push_str(env.regs.capture(c as usize - '0' as usize));
            },
            Some('<') => {
                ps.consume();
                let name = ps.take_while(|c| c != '>');
                ps.consume();
                if !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()) {
                    out.push_str(env.regs.capture(name.parse().unwrap_or(0)));
                } else {
                    out.push_str(env.regs.named_capture(&name));
                }
            },
            _ => { out.push_char('$'); },
        }
    }
}

impl Evaluator for Interp {
    fn eval(&self, env: &mut Env, code: &str, out: &mut OutBuf, flags: EvalFlags) -> FunResult {
        let mut ps = State::new(code);
        self.try_call(env, &mut ps, out, flags)?;

        while let Some(c) = ps.next_char() {
            match c {
                '[' => {
                    let (inner, _) = take_balanced(&mut ps, '[', ']');
                    env.eval(&inner, out, flags)?;
                },
                '{' => {
                    let (inner, _) = take_balanced(&mut ps, '{', '}');
                    out.push_str(&inner);
                },
                '\\' => {
                    if let Some(n) = ps.next_char() { out.push_char(n); }
                },
                '\x1b' => {
                    let mut seq = String::new();
                    take_escape(&mut ps, &mut seq);
                    out.push_str(&seq);
                },
                '%' => Self::percent(env, &mut ps, out),
                '$' if flags.dollar => Self::dollar(env, &mut ps, out),
                _ => { out.push_char(c); },
            }
        }
        Ok(())
    }

    fn fetch_ufun(&self, env: &Env, spec: &str, require_attr: bool) -> Option<UFun> {
        let spec = spec.trim();
        if let Some(prefix) = spec.get(..8) {
            if prefix.eq_ignore_ascii_case("#lambda/") {
                return Some(UFun {
                    obj:  env.executor,
                    attr: "#LAMBDA".to_string(),
                    code: spec[8..].to_string(),
                });
            }
        }

        let (obj, attr) =
            match spec.split_once('/') {
                Some((o, a)) => (self.world.locate(o, env.executor)?, a),
                None         => (env.executor, spec),
            };
        let attr = attr.trim().to_ascii_uppercase();

        match self.world.get_attr(obj, &attr) {
            Some(code) =>
                Some(UFun { obj, attr, code }),
            None if !require_attr && self.world.is_good(obj) =>
                Some(UFun { obj, attr, code: String::new() }),
            None => {
                log::debug!("no attribute #{}/{}", obj, attr);
                None
            },
        }
    }
}

/// One interpreter session: the object store, an `Env` over it and the
/// object commands are run as.
pub struct EvalContext {
    pub env:    Env,
    world:      Rc<World>,
    me:         Dbref,
}

impl EvalContext {
    /// A session with a fresh world holding `#0` (Room Zero) and the
    /// executor `#1` (One).
    pub fn new(config: Config) -> Self {
        let world = Rc::new(World::new());
        world.create("Room Zero");
        let me = world.create("One");

        let interp = Rc::new(Interp::new(world.clone()));
        let mut env = Env::new(Rc::new(config), Rc::new(default_symbol_table()),
                               interp, world.clone());
        env.executor = me;
        env.enactor  = me;
        env.caller   = me;

        Self { env, world, me }
    }

    pub fn new_default() -> Self {
        Self::new(Config::default())
    }

    pub fn world(&self) -> &World { &self.world }

    pub fn me(&self) -> Dbref { self.me }

    /// Evaluates one top-level command and returns its output. An
    /// aborted evaluation keeps what was produced and ends with the
    /// abort message.
    pub fn eval(&mut self, code: &str) -> String {
        self.env.reset();
        self.env.executor = self.me;
        self.env.enactor  = self.me;
        self.env.caller   = self.me;

        let mut out = self.env.new_buf();
        if let Err(e) = self.env.eval(code, &mut out, EvalFlags::default()) {
            log::debug!("evaluation of '{}' aborted: {}", code, e);
            let msg = e.to_string();
            if e != Abort::Halted && !out.as_str().ends_with(&msg) {
                out.push_str(&msg);
            }
        }
        out.into_string()
    }
}

/// Evaluates `code` in a fresh session with a fixed random seed.
pub fn eval(code: &str) -> String {
    eval_with(Config { random_seed: Some(1), ..Config::default() }, code)
}

pub fn eval_with(config: Config, code: &str) -> String {
    EvalContext::new(config).eval(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_split_args() {
        let mut ps = State::new("a, b ,{c,d},[x(1,2)],(e,f)) rest");
        assert_eq!(split_args(&mut ps), vec!["a", "b", "{c,d}", "[x(1,2)]", "(e,f)"]);
        assert_eq!(ps.rest(), " rest");

        let mut ps = State::new("a\\,b,c");
        assert_eq!(split_args(&mut ps), vec!["a\\,b", "c"]);
    }

    #[test]
    fn check_syntax() {
        assert_eq!(eval("add(1,2)"),                "3");
        assert_eq!(eval("x add(1,2)"),              "x add(1,2)");
        assert_eq!(eval("x [add(1,2)] y"),          "x 3 y");
        assert_eq!(eval("{add(1,2)}"),              "add(1,2)");
        assert_eq!(eval("a\\[b"),                   "a[b");
        assert_eq!(eval("a%bb%%"),                  "a b%");
        assert_eq!(eval("setq(x,5)%qx-%q<x>"),      "5-5");
        assert_eq!(eval("%!"),                      "#1");
        assert_eq!(eval("$0"),                      "$0");
    }

    #[test]
    fn check_markup_passes_through() {
        let red = "x\x1b[31my\x1b[0m";
        assert_eq!(eval(red), red);
        assert_eq!(eval(&format!("first({} z)", red)), red);
        assert_eq!(eval(&format!("[first({})]", red)), red);

        let mut ps = State::new(&format!("{},b)", red));
        assert_eq!(split_args(&mut ps), vec![red, "b"]);
    }

    #[test]
    fn check_unknown_function() {
        assert_eq!(eval("nosuch(1)"),   "#-1 FUNCTION (NOSUCH) NOT FOUND");
        assert_eq!(eval("first(a,b,c,d)"), "#-1 FUNCTION (FIRST) EXPECTS BETWEEN 1 AND 2 ARGUMENTS");
    }

    #[test]
    fn check_ufun_lookup() {
        let mut ctx = EvalContext::new_default();
        let obj = ctx.world().create("Box");
        ctx.world().set_attr(obj, "fn", "[add(%0,%1)]");

        assert_eq!(ctx.eval("map(Box/fn,1 2)"),     "2 4");
        assert_eq!(ctx.eval("map(#2/FN,5)"),        "6");
        assert_eq!(ctx.eval("map(nobody/fn,1)"),    "");
        assert_eq!(ctx.eval("map(me/none,1 2)"),    " ");
    }

    #[test]
    fn check_world() {
        let w = World::new();
        let a = w.create("Alpha");
        let b = w.create("Beta");
        assert_eq!(w.locate("beta", a), Some(b));
        assert_eq!(w.locate("#0", b),   Some(a));
        assert_eq!(w.locate("me", b),   Some(b));
        assert_eq!(w.locate("#7", b),   None);

        w.set_hidden(b, true);
        assert!(!w.can_interact(b, a));
        assert!(w.can_interact(b, b));
        assert!(w.set_attr(a, "x", "1"));
        assert_eq!(w.get_attr(a, "X"), Some("1".to_string()));
        assert!(!w.set_attr(9, "x", "1"));
    }

    #[test]
    fn check_invocation_limit_message() {
        let cfg = Config { function_invocation_limit: 5, ..Config::default() };
        assert_eq!(eval_with(cfg, "map(#lambda/{add(%0,1)},1 2 3 4 5 6)"),
                   "2 3 4 5#-1 FUNCTION INVOCATION LIMIT EXCEEDED");
    }
}
