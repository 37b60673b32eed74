use std::io;

use clap::Parser;
use clap::Subcommand;
use lispy::Repl;
use miette::IntoDiagnostic;
use miette::WrapErr;

#[derive(Parser, Debug)]
#[command(version, about = "A Polish-notation Lisp REPL")]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Start the interactive loop (the default).
    Repl,
    /// Print the tokens of one line.
    Tokenize { expr: String },
    /// Print the parse tree of one line.
    Parse { expr: String },
    /// Evaluate one line and print the result.
    Eval { expr: String },
}

/// Installs a stderr subscriber when `RUST_LOG` is set.
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn main() -> miette::Result<()> {
    init_tracing();
    let args = Args::parse();

    match args.command.unwrap_or(Commands::Repl) {
        Commands::Repl => {
            let stdin = io::stdin();
            let mut repl = Repl::new(stdin.lock(), io::stdout());
            repl.run()
                .into_diagnostic()
                .wrap_err("terminal i/o failed")?;
        }
        Commands::Tokenize { expr } => {
            for token in lispy::Lexer::new(Some("<stdin>"), &expr) {
                println!("{}", token?);
            }
        }
        Commands::Parse { expr } => {
            let ast = lispy::Parser::new(Some("<stdin>"), &expr).parse()?;
            print!("{ast}");
        }
        Commands::Eval { expr } => {
            let value = lispy::Interpreter::new().eval_line(&expr)?;
            println!("{value}");
        }
    }
    Ok(())
}
