use clap::Parser;
use prophecy::{RollContext, Roller};
use rand::{rngs::StdRng, SeedableRng};
use std::io::{self, BufRead, Write};

/// Rolls dice expressions such as `(10d20 + 10) * 2`, `^d20 + 5` or `vd20`.
#[derive(Parser, Debug)]
#[command(name = "prophecy", version)]
struct Cli {
    /// Expression to roll (ex: 1d20 + 1d6 + 4). Reads one expression per line from stdin
    /// when omitted.
    expression: Option<String>,

    /// Print the evaluated expression as JSON
    #[arg(long)]
    json: bool,

    /// Seed the dice for reproducible rolls
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.seed {
        Some(seed) => run(&cli, RollContext::with_roller(StdRng::seed_from_u64(seed))),
        None => run(&cli, <RollContext>::default()),
    }
}

fn run<R: Roller>(cli: &Cli, mut ctx: RollContext<R>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(expression) = &cli.expression {
        println!("{}", evaluate(cli, expression, &mut ctx));
        return Ok(());
    }

    print!("> ");
    io::stdout().flush()?;
    for line in io::stdin().lock().lines() {
        let line = line?;
        if !line.trim().is_empty() {
            println!("{}", evaluate(cli, line.trim(), &mut ctx));
        }
        print!("> ");
        io::stdout().flush()?;
    }
    println!();
    Ok(())
}

/// Never fails: any error is reported as the output text.
fn evaluate<R: Roller>(cli: &Cli, expression: &str, ctx: &mut RollContext<R>) -> String {
    if !cli.json {
        return prophecy::cmd_evaluate_with(expression, ctx);
    }

    match prophecy::exec_with(expression, ctx) {
        Ok(result) => serde_json::to_string_pretty(&result).unwrap_or_else(|why| why.to_string()),
        Err(why) => why.to_string(),
    }
}
