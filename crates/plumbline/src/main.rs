#![warn(rust_2024_compatibility, clippy::all)]
#![allow(
    clippy::too_many_lines,
    clippy::similar_names,
    clippy::needless_pass_by_value
)]

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use plumbline::check::run_check;
use plumbline::cli::{Args, Command};
use plumbline::fix::run_fix;
use plumbline::init::run_init;
use plumbline::tree::run_tree;

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let dirty = match args.command {
        Command::Check(check) => run_check(check)?,
        Command::Fix(fix) => run_fix(fix)?,
        Command::Tree(tree) => {
            run_tree(tree)?;
            false
        }
        Command::Init(init) => {
            run_init(init)?;
            false
        }
    };

    if dirty {
        std::process::exit(1);
    }
    Ok(())
}
