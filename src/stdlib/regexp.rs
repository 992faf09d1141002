// Copyright (c) 2019 Weird Constructor <weirdconstructor@gmail.com>
// This is a part of mushlist. See README.md and COPYING for details.

/*!
The regular expression functions.

Patterns are compiled with the `regex` crate, bounded by the configured
`regex_size_limit`. A pattern that doesn't compile writes
`#-1 REGEXP ERROR: <message>` and nothing else.

Subjects are matched on their visible text. Captured groups are taken
from the text with its markup, so a capture keeps the style of the
characters it covers.

`regedit()` and its variants evaluate their arguments themselves. The
replacement is evaluated once per match with `$0`..`$9` and `$<name>`
bound to the captures of that match.
*/

use regex::{CaptureLocations, Regex, RegexBuilder};
use fnv::FnvHashMap;

use crate::buffer::OutBuf;
use crate::env::{Abort, Env, EvalFlags, FunResult};
use crate::list::*;
use crate::markup::{has_markup, strip_markup, MarkupString};
use crate::regs::{RegFrame, RF_REGEXP};
use crate::symbols::{Args, SymbolTable};
use crate::util::{bool_str, is_strict_integer, parse_integer, E_BADREG};

/// The last line of a syntax error is the part worth showing.
fn error_text(e: &regex::Error) -> String {
    match e {
        regex::Error::Syntax(s) =>
            s.lines()
             .find_map(|l| l.strip_prefix("error: "))
             .unwrap_or(s.as_str())
             .to_string(),
        _ => e.to_string(),
    }
}

fn build(env: &Env, pattern: &str, caseless: bool) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .case_insensitive(caseless)
        .size_limit(env.config.regex_size_limit)
        .build()
}

/// Compiles `pattern`, on failure the error is written to `out`.
fn compile(env: &Env, pattern: &str, caseless: bool, out: &mut OutBuf) -> Option<Regex> {
    match build(env, pattern, caseless) {
        Ok(re) => Some(re),
        Err(e) => {
            log::debug!("regexp '{}' did not compile: {}", pattern, e);
            out.push_str("#-1 REGEXP ERROR: ");
            out.push_str(&error_text(&e));
            None
        },
    }
}

/// Length of the character at `pos`, 1 at the end of the text.
fn char_len_at(text: &str, pos: usize) -> usize {
    text[pos..].chars().next().map(|c| c.len_utf8()).unwrap_or(1)
}

/// The numbered and the named groups of the last match, cut out of
/// the text by `cut`.
fn captures<F>(re: &Regex, locs: &CaptureLocations, cut: F)
    -> (Vec<Option<String>>, FnvHashMap<String, String>)
    where F: Fn(usize, usize) -> String
{
    let numbered : Vec<Option<String>> =
        (0..locs.len()).map(|g| locs.get(g).map(|(a, b)| cut(a, b))).collect();

    let mut named = FnvHashMap::default();
    for (g, name) in re.capture_names().enumerate() {
        if let (Some(name), Some(c)) = (name, numbered.get(g).and_then(|c| c.as_ref())) {
            named.insert(name.to_string(), c.clone());
        }
    }
    (numbered, named)
}

fn bind_captures(env: &mut Env, idx: usize,
                 caps: (Vec<Option<String>>, FnvHashMap<String, String>))
{
    if let Some(f) = env.regs.frame_mut(idx) {
        f.captures = caps.0;
        f.named    = caps.1;
    }
}

/// One needle/replacement pair over text without markup.
fn edit_plain(env: &mut Env, idx: usize, re: &Regex, repl: &str,
              text: &str, all: bool) -> Result<String, Abort>
{
    let mut post   = env.new_buf();
    let mut locs   = re.capture_locations();
    let mut start  = 0;
    let mut offset = 0;
    let mut funccount = env.fun_invocations;

    while let Some((m0, m1)) = re.captures_read_at(&mut locs, text, offset).map(|m| (m.start(), m.end())) {
        post.push_str(&text[start..m0]);

        bind_captures(env, idx, captures(re, &locs, |a, b| text[a..b].to_string()));
        env.eval(repl, &mut post, EvalFlags { dollar: true })?;
        if env.stalled(&post, funccount) { break; }
        funccount = env.fun_invocations;

        start  = m1;
        offset = m1;
        if m0 == m1 {
            offset += char_len_at(text, m1);
        }
        if !all || offset >= text.len() { break; }
    }

    post.push_str(&text[start..]);
    Ok(post.into_string())
}

/// One needle/replacement pair over text with markup. The replacements
/// are spliced into `orig`, so the markup around them survives.
fn edit_marked(env: &mut Env, idx: usize, re: &Regex, repl: &str,
               orig: &mut MarkupString, all: bool) -> FunResult
{
    let mut locs   = re.capture_locations();
    let mut search = 0;
    let cap = env.config.buffer_len;

    while search <= orig.len() {
        let (m0, m1) =
            match re.captures_read_at(&mut locs, orig.text(), search) {
                Some(m) => (m.start(), m.end()),
                None    => break,
            };

        let caps = captures(re, &locs, |a, b| orig.render_range(a, b));
        bind_captures(env, idx, caps);

        let mut tmp = env.new_buf();
        env.eval(repl, &mut tmp, EvalFlags { dollar: true })?;
        let repl = MarkupString::parse(tmp.as_str());

        orig.splice(m0, m1 - m0, &repl);
        search = m0 + repl.len();
        if m0 == m1 && search < orig.len() {
            search += char_len_at(orig.text(), search);
        } else if m0 == m1 {
            break;
        }

        if !all || search >= orig.len() { break; }
        if orig.len() > cap {
            log::debug!("regedit stopped: text exceeds {} bytes", cap);
            break;
        }
    }
    Ok(())
}

/// `idx:name` or a plain `name` for the group at `pos`.
fn parse_regspec(spec: &str, pos: usize) -> (Result<usize, &str>, &str) {
    match spec.split_once(':') {
        Some((g, name)) if is_strict_integer(g) => (Ok(parse_integer(g).max(0) as usize), name),
        Some((g, name)) => (Err(g), name),
        None            => (Ok(pos), spec),
    }
}

fn valid_qreg_name(name: &str) -> bool {
    !name.is_empty()
    && name.len() <= 32
    && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub fn add_to_symtable(st: &mut SymbolTable) {
    func!(st, "regedit",
        |env: &mut Env, args: &Args, out: &mut OutBuf| {
            let caseless = args.called_as.ends_with('I');
            let all      = args.called_as.starts_with("REGEDITALL");
            let text     = env.eval_arg(&args[0])?;

            let mut ed_out = env.new_buf();
            let r = env.with_frame(RegFrame::new(RF_REGEXP, "regedit"), |env: &mut Env, idx: usize| -> FunResult {
                let mut text   = text;
                let mut marked : Option<MarkupString> = None;

                for pair in args[1..].chunks_exact(2) {
                    let needle = strip_markup(&env.eval_arg(&pair[0])?);
                    let re =
                        match compile(env, &needle, caseless, &mut ed_out) {
                            Some(re) => re,
                            None     => return Ok(()),
                        };

                    if marked.is_none() && has_markup(&text) {
                        marked = Some(MarkupString::parse(&text));
                    }
                    match marked.as_mut() {
                        Some(ms) => edit_marked(env, idx, &re, &pair[1], ms, all)?,
                        None     => { text = edit_plain(env, idx, &re, &pair[1], &text, all)?; },
                    }
                }

                match marked {
                    Some(ms) => ed_out.push_str(&ms.render()),
                    None     => ed_out.push_str(&text),
                };
                Ok(())
            });

            out.push_str(ed_out.as_str());
            r
        }, Some(3), None, true);

    st.alias("regediti",    "regedit");
    st.alias("regeditall",  "regedit");
    st.alias("regeditalli", "regedit");

    func!(st, "regmatch",
        |env: &mut Env, args: &Args, out: &mut OutBuf| {
            let caseless = args.called_as("REGMATCHI");
            let needle   = strip_markup(&args[1]);
            let re =
                match compile(env, &needle, caseless, out) {
                    Some(re) => re,
                    None     => return Ok(()),
                };

            let subject = MarkupString::parse(&args[0]);
            if args.len() == 2 {
                out.push_str(bool_str(re.is_match(subject.text())));
                return Ok(());
            }

            let mut locs = re.capture_locations();
            let matched  = re.captures_read(&mut locs, subject.text()).is_some();
            out.push_str(bool_str(matched));

            let specs : Vec<&str> = args[2].split(' ').filter(|s| !s.is_empty()).collect();
            for (i, spec) in specs.iter().enumerate() {
                let (_, name) = parse_regspec(spec, i);
                if valid_qreg_name(name) {
                    env.regs.set_q(name, "");
                }
            }

            let (numbered, named) =
                if matched { captures(&re, &locs, |a, b| subject.render_range(a, b)) }
                else { (vec![], FnvHashMap::default()) };

            for (i, spec) in specs.iter().enumerate() {
                let (group, name) = parse_regspec(spec, i);
                if !valid_qreg_name(name) {
                    if name != "-" { out.push_str(E_BADREG); }
                    continue;
                }
                let value =
                    match group {
                        Ok(g)  => numbered.get(g).and_then(|c| c.clone()),
                        Err(n) => named.get(n).cloned(),
                    };
                env.regs.set_q(name, &value.unwrap_or_default());
            }
            Ok(())
        }, Some(2), Some(3), false);

    st.alias("regmatchi", "regmatch");

    func!(st, "regrab",
        |env: &mut Env, args: &Args, out: &mut OutBuf| {
            let sep  = delim!(args, 3, out);
            let osep = if args.len() == 4 { args[3].clone() } else { sep.to_string() };
            let caseless = args.called_as.contains('I');
            let all      = args.called_as.starts_with("REGRABALL");

            let re =
                match compile(env, &strip_markup(&args[1]), caseless, out) {
                    Some(re) => re,
                    None     => return Ok(()),
                };

            let mut first = true;
            for e in list2arr_ansi(&args[0], sep, true, env.max_list()) {
                if !re.is_match(&strip_markup(&e)) { continue; }
                if !first { out.push_str(&osep); }
                first = false;
                if out.push_str(&e) || !all { break; }
            }
            Ok(())
        }, Some(2), Some(4), false);

    st.alias("regrabi",    "regrab");
    st.alias("regraball",  "regrab");
    st.alias("regraballi", "regrab");

    func!(st, "isregexp",
        |env: &mut Env, args: &Args, out: &mut OutBuf| {
            out.push_str(bool_str(build(env, &args[0], false).is_ok()));
            Ok(())
        }, Some(1), Some(1), false);
}
