// Copyright 2024 Cornell University
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@cornell.edu>

use clap::Parser;
use std::io::BufRead;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use txnsim::fsm::random_walk;
use txnsim::*;

#[derive(Parser, Debug)]
#[command(name = "txnsim")]
#[command(author = "Kevin Laeufer <laeufer@cornell.edu>")]
#[command(version)]
#[command(about = "Steps through transaction states, a dirty read and GRANT/REVOKE.", long_about = None)]
struct Args {
    #[arg(short, long)]
    verbose: bool,
    #[arg(long, help = "Filename of a session to replay instead of reading stdin.")]
    session: Option<String>,
    #[arg(long, value_name = "STEPS", help = "Take random transaction actions.")]
    auto: Option<usize>,
    #[arg(long, default_value_t = 0, help = "Seed used by --auto.")]
    seed: u64,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);
    let mut app = App::new();

    if let Some(steps) = args.auto {
        let start = std::time::Instant::now();
        for action in random_walk(args.seed, steps) {
            match app.begin_transaction_fsm(action) {
                Ok(state) => println!("{action} -> {state}"),
                Err(e) => {
                    eprintln!("{e}");
                    return ExitCode::FAILURE;
                }
            }
        }
        println!("{}", app.render_active());
        let delta = std::time::Instant::now() - start;
        if args.verbose {
            println!("Took {steps} actions in {delta:?}");
        }
        return ExitCode::SUCCESS;
    }

    if let Some(filename) = args.session {
        let commands = match session::parse_file(&filename) {
            Ok(Some(commands)) => commands,
            Ok(None) => return ExitCode::FAILURE,
            Err(e) => {
                eprintln!("Failed to read {filename}: {e}");
                return ExitCode::FAILURE;
            }
        };
        let rejected = session::run(&mut app, &commands, |app| println!("{}", app.render_active()));
        for (ii, e) in rejected.iter() {
            eprintln!("command #{}: {e}", ii + 1);
        }
        if args.verbose {
            println!("{}", app.render_active());
        }
        return ExitCode::SUCCESS;
    }

    println!("{}", app.render_active());
    for line in std::io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("Failed to read stdin: {e}");
                return ExitCode::FAILURE;
            }
        };
        match session::parse_line(&line) {
            Ok(None) => {}
            Ok(Some(cmd)) => match app.execute(&cmd) {
                Ok(()) => println!("{}", app.render_active()),
                Err(e) => eprintln!("{e}"),
            },
            Err(errors) => session::report_errors(errors, "<stdin>", &line),
        }
    }
    ExitCode::SUCCESS
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
