// Copyright (c) 2019 Weird Constructor <weirdconstructor@gmail.com>
// This is a part of mushlist. See README.md and COPYING for details.

/*!
This module assembles the function tables of mushlist.

There are three tables:

- [core_symbol_table()](fn.core_symbol_table.html) has the handful of
  arithmetic, register and control functions callbacks need.
- [list_symbol_table()](fn.list_symbol_table.html) has the list, string
  and pattern functions, which are the point of this crate.
- [default_symbol_table()](fn.default_symbol_table.html) merges both.

# mushlist Reference

A list is plain text plus a one character separator, usually a space.
A space separator is special: leading and trailing blanks are ignored and
a run of blanks counts as one separator. Every other separator is taken
literally, so `a||b` separated by `|` has three elements, the middle one
being empty.

Functions never fail with an exception. A bad argument puts an error
text like `#-1 ARGUMENT MUST BE AN INTEGER` in place of the result.
Every result is bounded by the configured output buffer size. When the
buffer is full the result is silently truncated, and loops over a
callback stop once the callback can't add anything anymore.

Most functions that take a separator `sep` also take an output
separator `osep`, which defaults to `sep`.

The examples below are in the form `expression ==> result`, they are
run by the test suite.

## Positions and slices

- `first(list[, sep])`, `rest(list[, sep])`, `last(list[, sep])`
- `extract(list[, start[, len[, sep]]])` - `len` elements from `start`
- `index(list, char, start, end)` - the raw text from element `start` up
  to element `end`, separators included
- `element(list, pattern, char)` - position of the first element
  matching a wildcard pattern
- `elements(list, positions[, sep[, osep]])`, `ldelete(...)` - pick or
  drop elements by a list of positions
- `words(list[, sep])`, `items(list, char)`, `wordpos(list, charpos[, sep])`
- `randword(list[, sep])`, `revwords(list[, sep[, osep]])`
- `remove(list, words[, sep])`, `splice(list1, list2, word[, sep])`
- `before(text, needle)`, `after(text, needle)`, `cat(text, ...)`

```mush
first(a b c) ==> a
rest(a b c) ==> b c
last(a|b|c,|) ==> c
extract(a b c d e,2,3) ==> b c d
index(one:two:three,:,2,2) ==> two
index(one:two:three,:,2,3) ==> two:three
element(apple:banana:cherry,b*,:) ==> 2
elements(a b c d,2 4) ==> b d
ldelete(red green blue yellow,2 4) ==> red blue
words(a  b c) ==> 3
items(a||b,|) ==> 3
revwords(a b c) ==> c b a
remove(a b a,a) ==> b a
before(foo=bar,=) ==> foo
after(foo=bar,=) ==> bar
cat(a,b,c) ==> a b c
```

## Iteration

`iter(list, body[, sep[, osep]])` evaluates `body` once per element,
with `##` replaced by the element and `#@` by its position. Inside the
body `ilev()`, `itext(n)` and `inum(n)` tell about the enclosing
iterations and `ibreak([n])` ends the innermost `n` of them after the
current element.

The other loops call a user function: `map`, `filter`/`filterbool`,
`fold`, `step`, `mix` and `munge`. User functions are referenced as
`obj/attr` or written inline as `#lambda/code`.

```mush
iter(a b c,[ucstr(##)]) ==> A B C
iter(a b,#@:##,,-) ==> 1:a-2:b
iter(a b c,##[ibreak()]) ==> a
iter(a b,iter(x y,[itext(1)][itext(0)])) ==> ax ay bx by
map(#lambda/{mul(%0,2)},1 2 3) ==> 2 4 6
filter(#lambda/{gt(%0,2)},1 2 3 4) ==> 3 4
filterbool(#lambda/{%0},1 0 x) ==> 1 x
fold(#lambda/{add(%0,%1)},1 2 3 4) ==> 10
step(#lambda/{%0%1},a b c d,2) ==> ab cd
mix(#lambda/{%0-%1},a b,1 2) ==> a-1 b-2
munge(#lambda/{sort(%0)},3 1 2,c a b) ==> a b c
```

## Sorting and sets

The sort type is a letter: `a` (byte wise), `i` (case insensitive),
`d` (dbrefs), `n` (integers), `f` (decimals), `m` (natural order). A
leading `-` reverses the order. Without a type it is detected from the
list.

```mush
sort(10 9 2) ==> 2 9 10
sort(10 9 2,a) ==> 10 2 9
sort(b a C,i) ==> a b C
sort(1 3 2,-n) ==> 3 2 1
unique(b a b c a) ==> a b c
sortkey(#lambda/{strlen(%0)},ccc a bb) ==> a bb ccc
sortby(#lambda/{sub(%0,%1)},3 1 2) ==> 1 2 3
setunion(a b c,b c d) ==> a b c d
setdiff(a b c,b c d) ==> a
setinter(a b c,b c d) ==> b c
```

## Searching

```mush
match(foo bar baz,b*) ==> 2
matchall(foo bar baz,b*) ==> 2 3
grab(foo bar baz,*a?) ==> bar
graball(foo bar baz,ba?) ==> bar baz
member(a b c,c) ==> 3
```

`namegrab(dbrefs, name)` and `namegraball(dbrefs, name)` match a list of
object ids by object name.

## Positional mutation

```mush
replace(a b c,2,X) ==> a X c
insert(a b c,2,X) ==> a X b c
insert(a b c,9,X) ==> a b c X
```

## Formatting

`table(list[, width[, linelen[, sep[, osep]]]])` lays the list out in
columns. A width of `>10` aligns right, `-10` centers.

```mush
itemize(a b c) ==> a, b, and c
elist(a b,or) ==> a or b
lnum(3) ==> 0 1 2
lnum(1,3,-) ==> 1-2-3
```

## Regular expressions

`regmatch(text, re[, regs])` stores captures in q-registers, `regs` is
a list of `register` or `group:register` entries. `regedit(text, re,
repl, ...)` replaces the first match of each `re`, `regeditall` every
match. Inside `repl` the captures are `$0`..`$9` and `$<name>`. The
variants ending in `i` ignore case.

```mush
regmatch(foo bar,{b[a-z]+}) ==> 1
regmatch(key=5,{(\w+)=(\d+)},- k v)[r(k)]/[r(v)] ==> 1key/5
regedit(foo123bar,{[0-9]+},X) ==> fooXbar
regeditall(a1b2,{([0-9])},<$1>) ==> a<1>b<2>
regraball(foo bar baz,^b) ==> bar baz
isregexp(*a) ==> 0
```

## Helpers

```mush
add(1,2,3) ==> 6
sub(5,7) ==> -2
mul(2,2.5) ==> 5
eq(1,1.0) ==> 1
strlen(hello) ==> 5
setq(a,x)[r(a)] ==> x
lit([add(1,2)]) ==> [add(1,2)]
if(0,yes,no) ==> no
t(#-1) ==> 0
```
*/

use crate::buffer::OutBuf;
use crate::env::Env;
use crate::markup::{map_visible, strip_markup};
use crate::symbols::{Args, SymbolTable};
use crate::util::*;

macro_rules! func {
    ($g: ident, $name: expr, $cb: expr, $min: expr, $max: expr, $noparse: expr) => {
        $g.fun($name, $cb, $min, $max, $noparse);
    }
}

/// All arguments as numbers, or the error written to `out`.
fn numbers(args: &Args, out: &mut OutBuf) -> Option<Vec<f64>> {
    if !args.iter().all(|a| is_number(a)) {
        out.push_str(E_NUMS);
        return None;
    }
    Some(args.iter().map(|a| parse_number(a)).collect())
}

macro_rules! num_cmp {
    ($g: ident, $name: expr, $op: tt) => {
        func!($g, $name,
            |_env: &mut Env, args: &Args, out: &mut OutBuf| {
                if let Some(n) = numbers(args, out) {
                    out.push_str(bool_str(n[0] $op n[1]));
                }
                Ok(())
            }, Some(2), Some(2), false);
    }
}

/// The arithmetic, register and control helpers.
pub fn core_symbol_table() -> SymbolTable {
    let mut st = SymbolTable::new();

    func!(st, "add",
        |_env: &mut Env, args: &Args, out: &mut OutBuf| {
            if let Some(n) = numbers(args, out) {
                out.push_str(&unparse_number(n.iter().sum()));
            }
            Ok(())
        }, Some(2), None, false);

    func!(st, "sub",
        |_env: &mut Env, args: &Args, out: &mut OutBuf| {
            if let Some(n) = numbers(args, out) {
                out.push_str(&unparse_number(n[0] - n[1]));
            }
            Ok(())
        }, Some(2), Some(2), false);

    func!(st, "mul",
        |_env: &mut Env, args: &Args, out: &mut OutBuf| {
            if let Some(n) = numbers(args, out) {
                out.push_str(&unparse_number(n.iter().product()));
            }
            Ok(())
        }, Some(2), None, false);

    num_cmp!(st, "eq", ==);
    num_cmp!(st, "gt", >);
    num_cmp!(st, "lt", <);

    func!(st, "strlen",
        |_env: &mut Env, args: &Args, out: &mut OutBuf| {
            out.push_str(&strip_markup(&args[0]).chars().count().to_string());
            Ok(())
        }, Some(1), Some(1), false);

    func!(st, "ucstr",
        |_env: &mut Env, args: &Args, out: &mut OutBuf| {
            out.push_str(&map_visible(&args[0], |s| s.to_uppercase()));
            Ok(())
        }, Some(1), Some(1), false);

    func!(st, "t",
        |_env: &mut Env, args: &Args, out: &mut OutBuf| {
            out.push_str(bool_str(parse_boolean(&args[0])));
            Ok(())
        }, Some(1), Some(1), false);

    func!(st, "setq",
        |env: &mut Env, args: &Args, out: &mut OutBuf| {
            if args.len() % 2 != 0 {
                out.push_str("#-1 FUNCTION (SETQ) EXPECTS AN EVEN NUMBER OF ARGUMENTS");
                return Ok(());
            }
            for kv in args.chunks_exact(2) {
                env.regs.set_q(kv[0].trim(), &kv[1]);
            }
            Ok(())
        }, Some(2), None, false);

    func!(st, "r",
        |env: &mut Env, args: &Args, out: &mut OutBuf| {
            out.push_str(env.regs.get_q(args[0].trim()));
            Ok(())
        }, Some(1), Some(1), false);

    func!(st, "lit",
        |_env: &mut Env, args: &Args, out: &mut OutBuf| {
            out.push_str(&args.join(","));
            Ok(())
        }, Some(0), None, true);

    func!(st, "if",
        |env: &mut Env, args: &Args, out: &mut OutBuf| {
            let cond = env.eval_arg(&args[0])?;
            if parse_boolean(&cond) {
                let r = env.eval_arg(&args[1])?;
                out.push_str(&r);
            } else if args.len() > 2 {
                let r = env.eval_arg(&args[2])?;
                out.push_str(&r);
            }
            Ok(())
        }, Some(2), Some(3), true);

    func!(st, "halt",
        |env: &mut Env, _args: &Args, _out: &mut OutBuf| {
            log::debug!("halted by #{}", env.executor);
            env.halt();
            Ok(())
        }, Some(0), Some(0), false);

    st
}

/// The list, string and pattern functions.
pub fn list_symbol_table() -> SymbolTable {
    let mut st = SymbolTable::new();
    crate::stdlib::add_to_symtable(&mut st);
    st
}

/// The list functions plus the helpers.
pub fn default_symbol_table() -> SymbolTable {
    let mut st = core_symbol_table();
    st.import(list_symbol_table());
    st
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::eval as ve;

    #[test]
    fn check_tables() {
        let st = default_symbol_table();
        assert!(st.get("ADD").is_some());
        assert!(st.get("setinter").is_some());
        assert!(st.get("elist").is_some());
        assert!(core_symbol_table().get("sort").is_none());
        assert_eq!(st.len(), core_symbol_table().len() + list_symbol_table().len());
    }

    #[test]
    fn check_arith() {
        assert_eq!(ve("add(1,x)"),      "#-1 ARGUMENTS MUST BE NUMBERS");
        assert_eq!(ve("add(0.5,0.25)"), "0.75");
        assert_eq!(ve("lt(1,2)"),       "1");
        assert_eq!(ve("gt(1,2)"),       "0");
    }

    #[test]
    fn check_ucstr_keeps_markup() {
        assert_eq!(ve("ucstr(\x1b[1mbold\x1b[0m)"), "\x1b[1mBOLD\x1b[0m");
    }

    #[test]
    fn check_control() {
        assert_eq!(ve("if(1,[add(1,1)],[nosuch()])"),   "2");
        assert_eq!(ve("if(0,yes)"),                     "");
        assert_eq!(ve("setq(a,1,b,2)%qa%qb"),           "12");
        assert_eq!(ve("setq(a)"),                       "#-1 FUNCTION (SETQ) EXPECTS AT LEAST 2 ARGUMENTS");
        assert_eq!(ve("x[halt()]y[add(1,1)]z"),         "xy");
    }
}
