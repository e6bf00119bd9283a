use std::io::{BufRead, Write};

use super::cpu::{Cpu, Status};

pub const PROMPT: &str = "(step | hexdump | run | exit) > ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Step,
    Dump,
    Run,
    Exit,
}

/// Line driven debug console for stepping through a program.
pub struct Console<'a, R, W> {
    cpu: &'a mut Cpu,
    input: R,
    output: W,

    last_command: Option<Command>,
    halted: bool,
    exit: bool,
}

impl<'a, R: BufRead, W: Write> Console<'a, R, W> {
    pub fn new(cpu: &'a mut Cpu, input: R, output: W) -> Self {
        Self {
            cpu,
            input,
            output,
            last_command: None,
            halted: false,
            exit: false,
        }
    }

    fn draw(&mut self) -> std::io::Result<()> {
        writeln!(self.output)?;
        write!(self.output, "{}", self.cpu.inspect())
    }

    fn execute_command(&mut self, cmd: Command) -> std::io::Result<()> {
        match cmd {
            Command::Step => {
                if self.halted {
                    writeln!(self.output, "Program halted")?;
                } else {
                    self.halted = self.cpu.step() == Status::Halt;
                    self.draw()?;
                }
            }
            Command::Dump => self.draw()?,
            Command::Run => {
                if !self.halted {
                    let output = &mut self.output;
                    self.cpu.run_complete_program(|cpu| {
                        writeln!(output)?;
                        write!(output, "{}", cpu.inspect())?;
                        output.flush()
                    })?;
                    self.halted = true;
                }
                writeln!(self.output, "Program halted")?;
            }
            Command::Exit => self.exit = true,
        }

        self.last_command = Some(cmd);
        Ok(())
    }

    /// Read and execute commands until `exit` or the end of input.
    pub fn exec(&mut self) -> std::io::Result<()> {
        while !self.exit {
            write!(self.output, "{}", PROMPT)?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }

            let command = match line.trim() {
                "s" | "step" => Some(Command::Step),
                "d" | "dump" | "hexdump" => Some(Command::Dump),
                "r" | "run" => Some(Command::Run),
                "q" | "exit" | "quit" => Some(Command::Exit),
                "" => self.last_command,
                command => {
                    writeln!(self.output, "Unknown command '{}'", command)?;
                    None
                }
            };

            if let Some(command) = command {
                self.execute_command(command)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assembler::assemble_into,
        emulator::memory::{Memory, Readable},
        isa::Register,
    };

    fn init(code: &str) -> Cpu {
        let mut memory = Memory::new();
        assemble_into(code, &mut memory).unwrap();
        Cpu::new(memory)
    }

    fn exec(cpu: &mut Cpu, commands: &str) -> String {
        let mut output = Vec::new();
        Console::new(cpu, commands.as_bytes(), &mut output)
            .exec()
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_step_and_repeat() {
        let mut cpu = init("mov $1, r1\nmov $2, r2\nmov $3, r3\nhlt");
        exec(&mut cpu, "step\n\nexit\nstep\n");
        assert_eq!(cpu.register(Register::R2), 2);
        assert_eq!(cpu.register(Register::R3), 0);
    }

    #[test]
    fn test_run() {
        let mut cpu = init("mov $2, r1\nmov $3, r2\nadd r1, r2\nmov acc, #0100\nhlt");
        let output = exec(&mut cpu, "run\n");
        assert_eq!(cpu.memory().read_word(0x0100), 5);
        assert!(output.contains("Program halted\n"));
        assert!(output.ends_with(PROMPT));
        assert_eq!(output.matches("acc: ").count(), 4);
    }

    /// Accepts writes until `limit` bytes have been written, then fails.
    struct LimitedWriter {
        written: Vec<u8>,
        limit: usize,
    }

    impl Write for LimitedWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if self.written.len() >= self.limit {
                return Err(std::io::ErrorKind::WriteZero.into());
            }
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_run_prints_while_running() {
        // Never halts, acc stays 0
        let mut cpu = init("jne $0001, #0000");
        let mut output = LimitedWriter {
            written: Vec::new(),
            limit: 4096,
        };
        let result = Console::new(&mut cpu, "run\n".as_bytes(), &mut output).exec();

        assert!(result.is_err());
        let output = String::from_utf8_lossy(&output.written);
        assert!(output.contains("ip: 0x0000"));
        assert!(output.contains("next: jne $0001, #0000"));
        assert!(!output.contains("Program halted"));
    }

    #[test]
    fn test_dump_does_not_execute() {
        let mut cpu = init("mov $1, r1");
        let output = exec(&mut cpu, "hexdump\ndump\n");
        assert_eq!(cpu.register(Register::Ip), 0);
        assert_eq!(output.matches("ip: 0x0000").count(), 2);
    }

    #[test]
    fn test_unknown_command() {
        let mut cpu = init("hlt");
        let output = exec(&mut cpu, "jump\n");
        assert!(output.contains("Unknown command 'jump'"));
        assert_eq!(cpu.register(Register::Ip), 0);
    }

    #[test]
    fn test_step_after_halt() {
        let mut cpu = init("hlt");
        let output = exec(&mut cpu, "s\ns\n");
        assert_eq!(cpu.register(Register::Ip), 1);
        assert!(output.contains("Program halted"));
    }
}
