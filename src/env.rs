// Copyright (c) 2019 Weird Constructor <weirdconstructor@gmail.com>
// This is a part of mushlist. See README.md and COPYING for details.

/*!
The evaluation context every builtin runs in.

The library does not parse script text itself. It re-enters an injected
`Evaluator` whenever a function needs a nested expression evaluated or a
user defined callback invoked, and asks an injected `ObjectDb` about
object ids and names. Everything that is shared between nested calls of
one top-level command lives in `Env`: the register frames, the invocation
budget and the nesting depth.
*/

use std::fmt;
use std::rc::Rc;

use crate::buffer::OutBuf;
use crate::config::Config;
use crate::regs::{RegFrame, RegStack, RF_NEWATTR};
use crate::symbols::{Args, FunDef, SymbolTable};
use crate::util::{parse_dbref, SplitMix64};

pub type Dbref = i64;
pub const NOTHING: Dbref = -1;

/// Why an evaluation stopped before it was done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Abort {
    InvocationLimit,
    CallLimit,
    Halted,
}

impl fmt::Display for Abort {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Abort::InvocationLimit => write!(f, "#-1 FUNCTION INVOCATION LIMIT EXCEEDED"),
            Abort::CallLimit       => write!(f, "#-1 CALL LIMIT EXCEEDED"),
            Abort::Halted          => write!(f, "#-1 HALTED"),
        }
    }
}

impl std::error::Error for Abort {}

pub type FunResult = Result<(), Abort>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvalFlags {
    /// Substitute `$0`..`$9` and `$<name>` from the capture registers.
    pub dollar: bool,
}

/// A resolved user defined function.
#[derive(Debug, Clone, PartialEq)]
pub struct UFun {
    pub obj:    Dbref,
    pub attr:   String,
    pub code:   String,
}

/// The expression evaluator the library calls back into.
pub trait Evaluator {
    /// Evaluates `code` and appends the result to `out`.
    fn eval(&self, env: &mut Env, code: &str, out: &mut OutBuf, flags: EvalFlags) -> FunResult;

    /// Resolves an `obj/attr` reference. Without `require_attr` a missing
    /// attribute resolves to empty code. Functions produce no output for
    /// references that don't resolve.
    fn fetch_ufun(&self, env: &Env, spec: &str, require_attr: bool) -> Option<UFun>;
}

/// The object identity layer.
pub trait ObjectDb {
    fn parse_objid(&self, s: &str) -> Option<Dbref> {
        parse_dbref(s.trim())
    }

    /// Whether `obj` exists and is not garbage.
    fn is_good(&self, obj: Dbref) -> bool;

    fn name(&self, obj: Dbref) -> Option<String>;

    /// Whether `from` may see `to` when matching names.
    fn can_interact(&self, to: Dbref, from: Dbref) -> bool;
}

pub struct Env {
    pub regs:               RegStack,
    pub fun_invocations:    usize,
    pub depth:              usize,
    pub executor:           Dbref,
    pub enactor:            Dbref,
    pub caller:             Dbref,
    pub config:             Rc<Config>,
    pub rng:                SplitMix64,
    halted:                 bool,
    funs:                   Rc<SymbolTable>,
    evaluator:              Rc<dyn Evaluator>,
    db:                     Rc<dyn ObjectDb>,
}

impl Env {
    pub fn new(config: Rc<Config>, funs: Rc<SymbolTable>,
               evaluator: Rc<dyn Evaluator>, db: Rc<dyn ObjectDb>) -> Self
    {
        let rng =
            match config.random_seed {
                Some(seed) => SplitMix64::new(seed),
                None       => SplitMix64::new_from_time(),
            };

        Self {
            regs:               RegStack::new(),
            fun_invocations:    0,
            depth:              0,
            executor:           NOTHING,
            enactor:            NOTHING,
            caller:             NOTHING,
            halted:             false,
            config,
            rng,
            funs,
            evaluator,
            db,
        }
    }

    /// Clears the budget and the frames, called between top-level commands.
    pub fn reset(&mut self) {
        self.regs.clear();
        self.fun_invocations = 0;
        self.depth           = 0;
        self.halted          = false;
    }

    pub fn db(&self) -> &dyn ObjectDb { &*self.db }

    pub fn lookup(&self, name: &str) -> Option<Rc<FunDef>> {
        self.funs.get(name)
    }

    /// A fresh output buffer of the configured size.
    pub fn new_buf(&self) -> OutBuf {
        OutBuf::new(self.config.buffer_len)
    }

    pub fn max_list(&self) -> usize { self.config.max_list_size }

    /// Stops evaluation at the next function call.
    pub fn halt(&mut self) { self.halted = true; }

    /// Whether a loop can't make progress anymore: the buffer is full and
    /// no function was invoked since `funccount` was taken.
    pub fn stalled(&self, out: &OutBuf, funccount: usize) -> bool {
        let s = out.is_full() && self.fun_invocations == funccount;
        if s {
            log::debug!("loop stopped: buffer full at {} invocations", funccount);
        }
        s
    }

    pub fn random_range(&mut self, lo: usize, hi: usize) -> usize {
        self.rng.range(lo, hi)
    }

    /// Evaluates `code` into `out`.
    pub fn eval(&mut self, code: &str, out: &mut OutBuf, flags: EvalFlags) -> FunResult {
        if self.depth >= self.config.call_limit {
            log::debug!("call limit {} reached", self.config.call_limit);
            out.push_str(&Abort::CallLimit.to_string());
            return Err(Abort::CallLimit);
        }

        let ev = self.evaluator.clone();
        self.depth += 1;
        let r = ev.eval(self, code, out, flags);
        self.depth -= 1;
        r
    }

    /// Evaluates an argument a function got unevaluated.
    pub fn eval_arg(&mut self, code: &str) -> Result<String, Abort> {
        let mut out = self.new_buf();
        self.eval(code, &mut out, EvalFlags::default())?;
        Ok(out.into_string())
    }

    pub fn fetch_ufun(&self, spec: &str, require_attr: bool) -> Option<UFun> {
        let ev = self.evaluator.clone();
        ev.fetch_ufun(self, spec, require_attr)
    }

    /// Calls a user function with `%0`.. bound to `args` and returns
    /// what it evaluated to.
    pub fn call_ufun(&mut self, ufun: &UFun, args: Vec<String>) -> Result<String, Abort> {
        let mut out = self.new_buf();
        let frame = RegFrame::with_args(RF_NEWATTR, "ufun", args);

        let saved = (self.executor, self.caller);
        self.caller   = self.executor;
        self.executor = ufun.obj;
        let r = self.with_frame(frame, |env, _| {
            env.eval(&ufun.code, &mut out, EvalFlags::default())
        });
        self.executor = saved.0;
        self.caller   = saved.1;

        r.map(|_| out.into_string())
    }

    /// Runs `f` with `frame` pushed. The frame is popped on every exit
    /// path. `f` gets the index of the pushed frame.
    pub fn with_frame<R, F>(&mut self, frame: RegFrame, f: F) -> R
        where F: FnOnce(&mut Env, usize) -> R
    {
        let idx = self.regs.push(frame);
        let r = f(self, idx);
        self.regs.pop_to(idx);
        r
    }

    /// Dispatches a function call with already prepared arguments.
    pub fn call_function(&mut self, name: &str, args: Vec<String>, out: &mut OutBuf) -> FunResult {
        let def =
            match self.lookup(name) {
                Some(def) => def,
                None => {
                    out.push_str("#-1 FUNCTION (");
                    out.push_str(&name.to_ascii_uppercase());
                    out.push_str(") NOT FOUND");
                    return Ok(());
                },
            };

        if let Some(err) = def.arity_error(args.len()) {
            out.push_str(&err);
            return Ok(());
        }

        if self.halted {
            return Err(Abort::Halted);
        }

        if self.fun_invocations >= self.config.function_invocation_limit {
            log::debug!("invocation limit reached in {}", def.name);
            out.push_str(&Abort::InvocationLimit.to_string());
            return Err(Abort::InvocationLimit);
        }
        self.fun_invocations += 1;

        let args = Args::new(&def.name, args);
        (def.cb)(self, &args, out)
    }
}
