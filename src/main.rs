use anyhow::Result;
use clap::{Parser, Subcommand};

use vm16::{
    assembler::{assemble, AssemblyArgs},
    emulator::{emulate, EmulationArgs},
    instrumentation,
};

#[derive(Parser)]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    #[clap(long)]
    #[clap(help = "Enable chrome tracing")]
    #[clap(long_help = "Enable chrome tracing which on program exit will generate
a json file to be opened with a chrome tracing compatible
viewer.")]
    trace: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[clap(about = "Assemble a program")]
    #[clap(aliases = &["a", "asm"])]
    Assemble(AssemblyArgs),
    #[clap(about = "Run a program in the emulator")]
    #[clap(aliases = &["e", "emu"])]
    Emulate(EmulationArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _trace_guard = cli.trace.then(instrumentation::trace);

    match &cli.command {
        Command::Assemble(args) => assemble(args),
        Command::Emulate(args) => emulate(args),
    }
}
