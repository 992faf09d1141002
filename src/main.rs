// Copyright (c) 2019 Weird Constructor <weirdconstructor@gmail.com>
// This is a part of mushlist. See README.md and COPYING for details.

use clap::{Arg, ArgAction, Command};

use mushlist::config::Config;
use mushlist::eval::EvalContext;

const HISTORY: &str = "mushlist.history";

/// Runs one REPL line. Besides plain expressions there are two object
/// commands: `@create <name>` and `&<attr> <obj>=<code>`.
fn run_line(ctx: &mut EvalContext, line: &str) -> String {
    if let Some(name) = line.strip_prefix("@create ") {
        let obj = ctx.world().create(name.trim());
        return format!("Created #{}", obj);
    }

    if let Some(rest) = line.strip_prefix('&') {
        let parsed =
            rest.split_once(' ')
                .and_then(|(attr, rest)| rest.split_once('=').map(|(o, v)| (attr, o, v)));
        let (attr, obj, code) =
            match parsed {
                Some(p) => p,
                None    => return "Usage: &<attr> <obj>=<code>".to_string(),
            };

        let me = ctx.me();
        return match ctx.world().locate(obj, me) {
            Some(o) => {
                ctx.world().set_attr(o, attr, code);
                if code.is_empty() { format!("#{}/{} - Cleared.", o, attr.to_ascii_uppercase()) }
                else               { format!("#{}/{} - Set.", o, attr.to_ascii_uppercase()) }
            },
            None => format!("I can't see '{}' here.", obj.trim()),
        };
    }

    ctx.eval(line)
}

fn main() {
    env_logger::init();

    let matches =
        Command::new("mushlist")
            .about("Evaluates MUSH softcode list expressions")
            .arg(Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .env("MUSHLIST_CONFIG")
                .help("TOML file with the buffer and invocation limits"))
            .arg(Arg::new("eval")
                .short('e')
                .long("eval")
                .value_name("EXPR")
                .action(ArgAction::Append)
                .help("Evaluates EXPR and prints the result instead of starting the REPL"))
            .get_matches();

    let config =
        match matches.get_one::<String>("config") {
            Some(path) => match Config::from_file(path) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("*** {}", e);
                    std::process::exit(1);
                },
            },
            None => Config::default(),
        };
    log::info!("limits: {:?}", config);

    let mut ctx = EvalContext::new(config);

    if let Some(exprs) = matches.get_many::<String>("eval") {
        for e in exprs {
            println!("{}", run_line(&mut ctx, e));
        }
        return;
    }

    let mut rl = rustyline::Editor::<()>::new();
    if rl.load_history(HISTORY).is_ok() {
        println!("Loaded history from '{}' file.", HISTORY);
    }

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                rl.add_history_entry(line.as_str());
                if line.trim().is_empty() { continue; }
                println!("> {}", run_line(&mut ctx, &line));
            },
            Err(_) => { break; },
        }
    }

    if rl.save_history(HISTORY).is_ok() {
        println!("Saved history to '{}'", HISTORY);
    }
}
