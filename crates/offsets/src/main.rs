use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use offsets_core::command::{init_module, CommandInterpreter, CommandResult};
use offsets_core::snapshot::SessionSnapshot;
use offsets_core::OffsetsResult;
use offsets_utils::{debug, info, init_logging, init_logging_with_level, log_format_from_env, LogLevel, LoggingGuard, LoggingError};

const PROMPT: &str = "(offsets) ";

/// Run the `offsets` debugger command against a captured session snapshot.
#[derive(Parser, Debug)]
#[command(name = "offsets")]
#[command(version)]
#[command(about = "Run the offsets debugger command against a captured session snapshot", long_about = None)]
struct Cli
{
    /// Session snapshot (JSON) describing targets, threads, frames and variables
    #[arg(long, short = 's', value_name = "PATH")]
    snapshot: PathBuf,

    /// Command to run, e.g. "offsets point"; may be repeated.
    /// Without any, commands are read interactively from stdin.
    #[arg(long = "command", short = 'c', value_name = "COMMAND")]
    commands: Vec<String>,

    /// Set log level (error, warn, info, debug, trace)
    /// Priority: 1. Command line args, 2. RUST_LOG env var (default: warn)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<LogLevel>,
}

fn main()
{
    let cli = Cli::parse();

    let _guard = match init_logging_for(&cli) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            process::exit(1);
        }
    };

    match run(&cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn init_logging_for(cli: &Cli) -> Result<LoggingGuard, LoggingError>
{
    match cli.log_level {
        Some(level) => init_logging_with_level(level, log_format_from_env()?),
        None => init_logging(),
    }
}

/// Returns `Ok(false)` if any command reported an error.
fn run(cli: &Cli) -> OffsetsResult<bool>
{
    let session = SessionSnapshot::load(&cli.snapshot)?;
    let debugger = &session;

    let mut interpreter = CommandInterpreter::new();
    println!("{}", init_module(&mut interpreter)?);

    if cli.commands.is_empty() {
        run_prompt(&interpreter, &debugger)?;
        return Ok(true);
    }

    let mut all_succeeded = true;
    for command in &cli.commands {
        info!(command = %command, "running command");
        let result = interpreter.handle_command(&debugger, command);
        all_succeeded &= report(&result)?;
    }
    Ok(all_succeeded)
}

fn run_prompt<'a>(interpreter: &CommandInterpreter<&'a SessionSnapshot>, debugger: &&'a SessionSnapshot) -> OffsetsResult<()>
{
    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        print!("{PROMPT}");
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            break;
        }

        let command = line.trim();
        if matches!(command, "quit" | "exit" | "q") {
            break;
        }
        debug!(command, "read command");
        report(&interpreter.handle_command(debugger, command))?;
    }

    Ok(())
}

/// Print a command's output to stdout and its error to stderr.
///
/// Returns whether the command succeeded.
fn report(result: &CommandResult) -> io::Result<bool>
{
    let mut stdout = io::stdout().lock();
    stdout.write_all(result.output().as_bytes())?;
    stdout.flush()?;

    match result.error() {
        Some(message) => {
            eprintln!("error: {message}");
            Ok(false)
        }
        None => Ok(true),
    }
}
