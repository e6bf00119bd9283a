use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Args;

use crate::{
    assembler::assemble_into,
    emulator::{
        console::Console,
        cpu::{Cpu, CpuOptions, RunOption},
        memory::{Memory, Readable, Writeable},
    },
};

pub mod console;
pub mod cpu;
pub mod memory;

/// Parse an address given on the command line, e.g. `0x0100`, `#0100`, `$0100` or `0100`.
fn parse_address(input: &str) -> Result<u16, String> {
    let digits = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix('#'))
        .or_else(|| input.strip_prefix('$'))
        .unwrap_or(input);
    u16::from_str_radix(digits, 16).map_err(|e| format!("Invalid address '{}': {}", input, e))
}

#[derive(Args, Debug)]
pub struct EmulationArgs {
    #[clap(help = "Program to run, assembly source unless --binary is given")]
    pub input: PathBuf,
    #[clap(short, long)]
    #[clap(help = "Treat the input as an assembled binary")]
    pub binary: bool,
    #[clap(long, default_value_t = Memory::MEMORY_SIZE)]
    #[clap(help = "Size of memory in bytes")]
    pub memory_size: usize,
    #[clap(long = "observe", value_parser = parse_address)]
    #[clap(help = "Hex address of a memory window to show alongside the registers")]
    pub observed_addresses: Vec<u16>,
    #[clap(short, long)]
    #[clap(help = "Step through the program in the debug console")]
    pub debug: bool,
    #[clap(long)]
    #[clap(help = "Stop after executing this many instructions")]
    pub max_steps: Option<usize>,
}

/// Load the program described by `args` into a freshly created memory.
fn load_program(args: &EmulationArgs) -> Result<Memory> {
    let mut memory = Memory::with_size(args.memory_size)?;

    if args.binary {
        let bytes = std::fs::read(&args.input)
            .with_context(|| format!("Unable to read file {}", args.input.display()))?;
        if bytes.len() > memory.size() {
            anyhow::bail!(
                "Program of {} bytes does not fit in {} bytes of memory",
                bytes.len(),
                memory.size()
            );
        }
        memory.load(0x0000, &bytes);
    } else {
        let source = std::fs::read_to_string(&args.input)
            .with_context(|| format!("Unable to read file {}", args.input.display()))?;
        assemble_into(&source, &mut memory).with_context(|| "Compilation failed")?;
    }

    Ok(memory)
}

/// Run a program in the emulator, either to completion or in the debug console.
#[tracing::instrument(skip(args))]
pub fn emulate(args: &EmulationArgs) -> Result<()> {
    let memory = load_program(args)?;
    let options = CpuOptions {
        observed_addresses: args.observed_addresses.clone(),
    };
    let mut cpu = Cpu::with_options(memory, options);

    if args.debug {
        let stdin = io::stdin();
        let stdout = io::stdout();
        let mut console = Console::new(&mut cpu, stdin.lock(), stdout.lock());
        console.exec()?;
        return Ok(());
    }

    let option = match args.max_steps {
        Some(limit) => RunOption::StepLimit(limit),
        None => RunOption::UntilHalt,
    };
    let steps = cpu.run(option);

    let mut stdout = io::stdout().lock();
    write!(stdout, "{}", cpu.inspect())?;
    writeln!(stdout, "Executed {} instructions", steps)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address() {
        assert_eq!(parse_address("0x0100"), Ok(0x0100));
        assert_eq!(parse_address("#00ff"), Ok(0x00FF));
        assert_eq!(parse_address("$FFFE"), Ok(0xFFFE));
        assert_eq!(parse_address("42"), Ok(0x0042));
        assert!(parse_address("0x10000").is_err());
        assert!(parse_address("r1").is_err());
    }
}
