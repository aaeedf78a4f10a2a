use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use miette::Report;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use ls8::output::{file_message, message, set_minimal, MsgColor};
use ls8::{disasm, loader, Error, Machine, VmError};

/// ls8 runs and inspects programs for the LS-8 8-bit virtual CPU.
#[derive(Parser)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Quickly provide a `.ls8` file to run
    path: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Run a `.ls8` program, printing `PRN` output to stdout
    Run {
        /// `.ls8` file to run
        name: PathBuf,
        /// Produce minimal output, suited for blackbox tests
        #[arg(short, long)]
        minimal: bool,
        /// Stop with an error after this many instructions
        #[arg(long, value_name = "N")]
        max_steps: Option<u64>,
        /// Log machine state before every instruction
        #[arg(short, long)]
        trace: bool,
    },
    /// Check that a `.ls8` file loads without running it
    Check {
        /// File to check
        name: PathBuf,
    },
    /// Print a disassembly listing of a `.ls8` file
    Disasm {
        /// File to disassemble
        name: PathBuf,
    },
}

#[derive(Default)]
struct RunOptions {
    minimal: bool,
    max_steps: Option<u64>,
    trace: bool,
}

fn main() -> miette::Result<()> {
    let args = Args::parse();
    ls8::env::init();

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new() //
                .context_lines(ls8::DIAGNOSTIC_CONTEXT_LINES)
                .build(),
        )
    }))?;

    let result = match args.command {
        Some(Command::Run {
            name,
            minimal,
            max_steps,
            trace,
        }) => run(
            &name,
            RunOptions {
                minimal,
                max_steps,
                trace,
            },
        ),
        Some(Command::Check { name }) => {
            init_tracing(false);
            check(&name)
        }
        Some(Command::Disasm { name }) => {
            init_tracing(false);
            disassemble(&name)
        }
        None => {
            if let Some(path) = args.path {
                run(&path, RunOptions::default())
            } else {
                println!("\n~ ls8 v{VERSION} ~");
                println!("{SHORT_INFO}");
                Ok(())
            }
        }
    };

    if let Err(err) = result {
        let code = err.exit_code();
        eprintln!("{:?}", Report::new(err));
        std::process::exit(code);
    }
    Ok(())
}

fn init_tracing(trace: bool) {
    let filter = if trace || ls8::env::is_trace_enabled() {
        EnvFilter::new("ls8=trace")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn run(name: &Path, opts: RunOptions) -> Result<(), Error> {
    init_tracing(opts.trace);
    set_minimal(opts.minimal);

    file_message(MsgColor::Green, "Loading", name);
    let program = loader::load_file(name)?;
    let mut machine = Machine::with_program(&program)?;
    machine.set_step_limit(opts.max_steps.or_else(ls8::env::max_steps));

    message(MsgColor::Green, "Running", format!("{} bytes", program.len()));
    let mut out = io::stdout().lock();
    match machine.run(&mut out) {
        Ok(steps) => {
            message(
                MsgColor::Cyan,
                "Halted",
                format!("after {steps} instructions"),
            );
            Ok(())
        }
        Err(err) => {
            flush_after_fault(&mut out);
            message(
                MsgColor::Red,
                "Faulted",
                format!("at address {:#04x}", machine.pc()),
            );
            Err(Error::from(err))
        }
    }
}

/// Push out any `PRN` output produced before the fault.
fn flush_after_fault<W: Write>(out: &mut W) {
    if let Err(err) = out.flush() {
        debug!(error = %err, "failed to flush program output after fault");
    }
}

fn check(name: &Path) -> Result<(), Error> {
    file_message(MsgColor::Green, "Checking", name);
    let program = loader::load_file(name)?;
    message(
        MsgColor::Green,
        "Success",
        format!("{} bytes, no errors found!", program.len()),
    );
    Ok(())
}

fn disassemble(name: &Path) -> Result<(), Error> {
    let program = loader::load_file(name)?;
    let mut out = io::stdout().lock();
    for line in disasm::disassemble(&program) {
        writeln!(out, "{line}").map_err(VmError::from)?;
    }
    Ok(())
}

const SHORT_INFO: &str = r"
Welcome to ls8, an interpreter for the LS-8 8-bit virtual CPU.
Please use `-h` or `--help` to access the usage instructions and documentation.
";

const VERSION: &str = env!("CARGO_PKG_VERSION");
