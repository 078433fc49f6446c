//! # erpsim REPL
//!
//! A line-oriented Read-Eval-Print Loop over the simulation engine.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin erpsim
//! ```
//!
//! Then enter commands:
//! - `.schema <text>` - Relevant schema snippets
//! - `.ask <question>` - Natural language to SQL
//! - `.sql <sql>` - Simulated execution
//! - `.analytics <period> <metric>` - Dashboard KPIs
//! - `.quit` - Exit

use std::io::{self, BufRead, Write};

use anyhow::Context;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use erpsim::{Config, Engine, EngineResult};

const HELP: &str = "Commands:
  .schema <text>                - Relevant schema snippets
  .ask <question>               - Natural language to SQL
  .sql <sql>                    - Simulated execution
  .analytics <period> <metric>  - KPIs (day|week|month|quarter, revenue|orders)
  .help                         - Show this help
  .quit                         - Exit
";

fn main() -> anyhow::Result<()> {
    let config = Config::load().unwrap_or_default();

    let level = std::env::var("ERPSIM_LOG").unwrap_or_else(|_| "warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .compact()
        .init();

    let engine = Engine::from_config(&config).context("failed to generate synthetic data")?;

    println!("erpsim REPL");
    println!("===========\n");
    let settings = engine.settings();
    println!(
        "Generated {} tables ending {} (seed {})\n",
        engine.catalog().tables().len(),
        settings.anchor,
        settings.master_seed
    );
    println!("{HELP}");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        stdout.flush()?;

        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let line = line?;
        let input = line.trim();

        if input.is_empty() {
            continue;
        }

        let (command, rest) = input
            .split_once(char::is_whitespace)
            .map_or((input, ""), |(c, r)| (c, r.trim()));

        match command {
            ".quit" | ".exit" => {
                println!("Goodbye!");
                break;
            }
            ".help" => println!("{HELP}"),
            ".schema" => print_result(engine.describe_schema(rest)),
            ".ask" => print_result(engine.generate_sql(rest, None)),
            ".sql" => print_result(engine.execute(rest)),
            ".analytics" => {
                let mut parts = rest.split_whitespace();
                let period = parts.next().unwrap_or("month");
                let metric = parts.next().unwrap_or("revenue");
                print_result(engine.analytics(period, metric));
            }
            _ => {
                println!("Unknown command: {input}");
                println!("Type .help for available commands");
            }
        }
    }

    Ok(())
}

fn print_result<T: Serialize>(result: EngineResult<T>) {
    match result {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(json) => println!("{json}"),
            Err(e) => println!("Error: {e}"),
        },
        Err(e) => println!("Error: {e}"),
    }
}
