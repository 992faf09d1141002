// Copyright (c) 2019 Weird Constructor <weirdconstructor@gmail.com>
// This is a part of mushlist. See README.md and COPYING for details.

use mushlist::config::Config;
use mushlist::eval::EvalContext;

fn ve(s: &str) -> String {
    mushlist::eval::eval(s)
}

fn limited(limit: usize) -> Config {
    Config { function_invocation_limit: limit, random_seed: Some(1), ..Config::default() }
}

#[test]
fn check_iter_tokens() {
    assert_eq!(ve("iter(a b c,[ucstr(##)])"),           "A B C");
    assert_eq!(ve("iter(x|y,#@=##,|,{, })"),            "1=x, 2=y");
    assert_eq!(ve("iter({  a   b },<##>)"),             "<a> <b>");
    assert_eq!(ve("iter(a||b,<##>,|)"),                 "<a> <> <b>");
}

#[test]
fn check_iter_break() {
    assert_eq!(ve("iter(a b c d,##[if(eq(#@,2),ibreak())])"),          "a b");
    assert_eq!(ve("iter(a b,iter(x y,[itext(0)][ibreak(2)]))"),        "x");
    assert_eq!(ve("iter(a b,iter(x y,[itext(1)][itext(0)][ibreak()]))"), "ax bx");
    assert_eq!(ve("iter(a,[ibreak(5)])"),               "#-1 OUT OF RANGE");
}

#[test]
fn check_iter_levels() {
    assert_eq!(ve("ilev()"),                                           "-1");
    assert_eq!(ve("iter(a,iter(b,[ilev()]))"),                         "1");
    assert_eq!(ve("iter(a,iter(b,[itext(l)][inum(l)]))"),              "a1");
    assert_eq!(ve("iter(a,[itext(1)])"),                               "#-1 ARGUMENT OUT OF RANGE");
}

#[test]
fn check_callbacks_on_empty_lists() {
    assert_eq!(ve("map(#lambda/{x},)"),                 "");
    assert_eq!(ve("filter(#lambda/{1},)"),              "");
    assert_eq!(ve("fold(#lambda/{%0%1},)"),             "");
    assert_eq!(ve("step(#lambda/{%0},,2)"),             "");
    assert_eq!(ve("sortby(#lambda/{0},)"),              "");
    assert_eq!(ve("mix(#lambda/{%0%1},,)"),             "");
}

#[test]
fn check_fold() {
    assert_eq!(ve("fold(#lambda/{add(%0,%1)},1 2 3 4)"),    "10");
    assert_eq!(ve("fold(#lambda/{%1%0},a b c)"),            "cba");
    assert_eq!(ve("fold(#lambda/{%0-%1},b c,a)"),           "a-b-c");
    assert_eq!(ve("fold(#lambda/{%0},a)"),                  "a");
}

#[test]
fn check_fold_terminates() {
    // the callback keeps its accumulator, so fold ends after the list
    let r = mushlist::eval::eval_with(limited(50), "fold(#lambda/{%0},[lnum(500)])");
    assert_eq!(r, "0");
}

#[test]
fn check_invocation_limit() {
    let r = mushlist::eval::eval_with(limited(20), "iter(lnum(100),add(##,1))");
    let expected : Vec<String> = (1..=18).map(|i| i.to_string()).collect();
    assert_eq!(r, format!("{} #-1 FUNCTION INVOCATION LIMIT EXCEEDED", expected.join(" ")));
}

#[test]
fn check_halt_keeps_output() {
    // the next function call after halt() ends the evaluation
    assert_eq!(ve("iter(a b c,##[if(eq(#@,2),halt())])xyz[add(1,1)]"), "a b c");
    assert_eq!(ve("[halt()]abc"),                                      "abc");
}

#[test]
fn check_callbacks_on_objects() {
    let mut ctx = EvalContext::new_default();
    let lib = ctx.world().create("Lib");
    ctx.world().set_attr(lib, "DOUBLE", "[mul(%0,2)]");
    ctx.world().set_attr(lib, "ISBIG",  "[gt(%0,10)]");
    ctx.world().set_attr(lib, "CMP",    "[sub(%0,%1)]");

    assert_eq!(ctx.eval("map(lib/double,1 2 3)"),              "2 4 6");
    assert_eq!(ctx.eval("filter(#2/isbig,5 50 15,,|)"),        "50|15");
    assert_eq!(ctx.eval("sortby(lib/cmp,30 4 200)"),           "4 30 200");
    assert_eq!(ctx.eval("sortkey(lib/double,3 1 2)"),          "1 2 3");
    assert_eq!(ctx.eval("map(nowhere/double,1 2)"),            "");

    ctx.world().set_attr(lib, "DOUBLE", "");
    assert_eq!(ctx.eval("map(lib/double,1 2)"),                " ");
}

#[test]
fn check_registers_flow_through_callbacks() {
    let mut ctx = EvalContext::new_default();
    let obj = ctx.world().create("Counter");
    ctx.world().set_attr(obj, "F", "[setq(0,%0)][r(0)]");

    assert_eq!(ctx.eval("setq(0,outer)[map(counter/f,a b)]-[r(0)]"), "a b-b");
}

#[test]
fn check_first_setq_inside_callbacks() {
    // no register is set before the loop starts
    assert_eq!(ve("iter(a b c,[setq(x,1)]##[ibreak()])"),      "a");
    assert_eq!(ve("iter(a b c,[setq(x,##)][itext(0)])"),       "a b c");
    assert_eq!(ve("iter(a b,[setq(x,##)][inum(0)])"),          "1 2");
    assert_eq!(ve("iter(a b,iter(x y,[setq(q,##)][itext(1)]##))"), "ax ay bx by");
    assert_eq!(ve("[iter(a,[setq(x,##)])]%qx"),                "a");
    assert_eq!(ve("[map(#lambda/{[setq(a,%0)]%0},x y)]-%qa"),  "x y-y");
}

#[test]
fn check_registers_reset_between_commands() {
    let mut ctx = EvalContext::new_default();
    assert_eq!(ctx.eval("setq(a,1)%qa"),    "1");
    assert_eq!(ctx.eval("%qa"),             "");
}

#[test]
fn check_namegrab() {
    let mut ctx = EvalContext::new_default();
    let w = ctx.world();
    let red   = w.create("Red Apple");
    let green = w.create("Green Apple");
    let apple = w.create("Apple");
    let list  = format!("#{} #{} #{}", red, green, apple);

    assert_eq!(ctx.eval(&format!("namegrab({},apple)", list)),     format!("#{}", apple));
    assert_eq!(ctx.eval(&format!("namegrab({},gre)", list)),       format!("#{}", green));
    assert_eq!(ctx.eval(&format!("namegrab({},#{})", list, red)),  format!("#{}", red));
    assert_eq!(ctx.eval(&format!("namegrab({},pear)", list)),      "");

    assert_eq!(ctx.eval(&format!("namegraball({},app)", list)),    list);
    assert_eq!(ctx.eval(&format!("namegraball({},red)", list)),    format!("#{}", red));
    assert_eq!(ctx.eval("namegraball(#2 #99 junk,)"),              "#2");

    ctx.world().set_hidden(green, true);
    assert_eq!(ctx.eval(&format!("namegraball({},apple)", list)),
               format!("#{} #{}", red, apple));
    assert_eq!(ctx.eval(&format!("namegrab(#{},green)", green)),  "");
}
