pub mod registers;

use crate::{
    disassembler::decode_instruction,
    emulator::memory::{Memory, Readable, Writeable},
    hexdump::memory_window,
    isa::{Opcode, Register, GENERAL_PURPOSE},
};

pub use registers::Registers;

/// Distance between the end of memory and the initial stack and frame pointers.
pub const STACK_OFFSET: usize = 2;

/// Number of bytes shown per memory window in [`Cpu::inspect`].
pub const WINDOW_SIZE: usize = 8;

/// Outcome of executing a single instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Continue,
    Halt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOption {
    /// Run until an unknown opcode or `hlt` is executed.
    UntilHalt,
    /// Run until halted or until the given number of steps have been executed.
    StepLimit(usize),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CpuOptions {
    /// Addresses whose memory windows are included in [`Cpu::inspect`].
    pub observed_addresses: Vec<u16>,
}

/// A 16-bit CPU owning its memory and register file.
#[derive(Debug, Clone)]
pub struct Cpu {
    registers: Registers,
    memory: Memory,
    /// Bytes pushed since the last call or return.
    stack_frame_size: u16,
    options: CpuOptions,
}

impl Cpu {
    pub fn new(memory: Memory) -> Self {
        Self::with_options(memory, CpuOptions::default())
    }

    pub fn with_options(memory: Memory, options: CpuOptions) -> Self {
        let stack_start = memory.size().saturating_sub(STACK_OFFSET) as u16;
        Self {
            registers: Registers::new(stack_start),
            memory,
            stack_frame_size: 0,
            options,
        }
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn register(&self, register: Register) -> u16 {
        self.registers.get(register)
    }

    pub fn set_register(&mut self, register: Register, value: u16) {
        self.registers.set(register, value);
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    pub fn stack_frame_size(&self) -> u16 {
        self.stack_frame_size
    }

    /// Read the byte at `ip` and advance `ip` by one.
    pub fn fetch(&mut self) -> u8 {
        let address = self.register(Register::Ip);
        let byte = self.memory.read_byte(address);
        self.set_register(Register::Ip, address.wrapping_add(1));
        byte
    }

    /// Read the word at `ip` and advance `ip` by two.
    pub fn fetch16(&mut self) -> u16 {
        let address = self.register(Register::Ip);
        let word = self.memory.read_word(address);
        self.set_register(Register::Ip, address.wrapping_add(2));
        word
    }

    /// Read a register code and turn it into a register file offset.
    ///
    /// Codes outside the register set wrap around rather than fail.
    pub fn fetch_register_index(&mut self) -> usize {
        Register::clamped_offset(self.fetch())
    }

    fn push(&mut self, value: u16) {
        let address = self.register(Register::Sp);
        self.memory.write_word(address, value);
        self.set_register(Register::Sp, address.wrapping_sub(2));
        self.stack_frame_size = self.stack_frame_size.wrapping_add(2);
    }

    fn pop(&mut self) -> u16 {
        let address = self.register(Register::Sp).wrapping_add(2);
        self.set_register(Register::Sp, address);
        self.stack_frame_size = self.stack_frame_size.wrapping_sub(2);
        self.memory.read_word(address)
    }

    /// Save r1..r8 and the return address, then open a new frame.
    fn push_state(&mut self) {
        for register in GENERAL_PURPOSE {
            self.push(self.register(register));
        }
        self.push(self.register(Register::Ip));
        self.push(self.stack_frame_size.wrapping_add(2));

        self.set_register(Register::Fp, self.register(Register::Sp));
        self.stack_frame_size = 0;
    }

    /// Close the current frame and restore the state saved by [`Cpu::push_state`].
    ///
    /// The callee also drops the arguments the caller pushed: the word below the saved registers
    /// holds the argument count.
    fn pop_state(&mut self) {
        let frame_address = self.register(Register::Fp);
        self.set_register(Register::Sp, frame_address);

        let frame_size = self.pop();
        // What remains of the caller's frame once the saved frame size is off the stack
        self.stack_frame_size = frame_size.wrapping_sub(2);

        let ip = self.pop();
        self.set_register(Register::Ip, ip);
        for register in GENERAL_PURPOSE.iter().rev() {
            let value = self.pop();
            self.set_register(*register, value);
        }

        let argument_count = self.pop();
        for _ in 0..argument_count {
            self.pop();
        }

        self.set_register(Register::Fp, frame_address.wrapping_add(frame_size));
    }

    /// Decode the operands of `opcode` and execute it.
    ///
    /// Operands are read in the order the assembler writes them.
    pub fn execute(&mut self, opcode: u8) -> Status {
        let Some(opcode) = Opcode::decode(opcode) else {
            tracing::debug!("Unknown opcode {:#04x}, halting", opcode);
            return Status::Halt;
        };
        tracing::trace!("Executing {:?}", opcode);

        match opcode {
            Opcode::MovLitReg => {
                let literal = self.fetch16();
                let register = self.fetch_register_index();
                self.registers.write_offset(register, literal);
            }
            Opcode::MovRegReg => {
                let from = self.fetch_register_index();
                let to = self.fetch_register_index();
                let value = self.registers.read_offset(from);
                self.registers.write_offset(to, value);
            }
            Opcode::MovRegMem => {
                let from = self.fetch_register_index();
                let address = self.fetch16();
                let value = self.registers.read_offset(from);
                self.memory.write_word(address, value);
            }
            Opcode::MovMemReg => {
                let address = self.fetch16();
                let to = self.fetch_register_index();
                let value = self.memory.read_word(address);
                self.registers.write_offset(to, value);
            }
            Opcode::MovLitMem => {
                let literal = self.fetch16();
                let address = self.fetch16();
                self.memory.write_word(address, literal);
            }
            Opcode::AddRegReg => {
                let r1 = self.fetch_register_index();
                let r2 = self.fetch_register_index();
                let sum = self
                    .registers
                    .read_offset(r1)
                    .wrapping_add(self.registers.read_offset(r2));
                self.set_register(Register::Acc, sum);
            }
            Opcode::JmpNotEq => {
                let value = self.fetch16();
                let address = self.fetch16();
                if value != self.register(Register::Acc) {
                    self.set_register(Register::Ip, address);
                }
            }
            Opcode::PshLit => {
                let value = self.fetch16();
                self.push(value);
            }
            Opcode::PshReg => {
                let register = self.fetch_register_index();
                self.push(self.registers.read_offset(register));
            }
            Opcode::Pop => {
                let register = self.fetch_register_index();
                let value = self.pop();
                self.registers.write_offset(register, value);
            }
            Opcode::CalLit => {
                let address = self.fetch16();
                self.push_state();
                self.set_register(Register::Ip, address);
            }
            Opcode::CalReg => {
                let register = self.fetch_register_index();
                let address = self.registers.read_offset(register);
                self.push_state();
                self.set_register(Register::Ip, address);
            }
            Opcode::Ret => self.pop_state(),
            Opcode::Hlt => return Status::Halt,
        }

        Status::Continue
    }

    /// Fetch and execute a single instruction.
    pub fn step(&mut self) -> Status {
        let opcode = self.fetch();
        self.execute(opcode)
    }

    /// Run until the CPU halts, calling `callback` after every instruction that did not halt.
    ///
    /// Stops early with the first error returned by `callback`.
    #[tracing::instrument(skip_all)]
    pub fn run_complete_program<F, E>(&mut self, mut callback: F) -> Result<(), E>
    where
        F: FnMut(&Cpu) -> Result<(), E>,
    {
        while self.step() == Status::Continue {
            callback(self)?;
        }
        Ok(())
    }

    /// Run the CPU and return the number of executed instructions, the halting one included.
    #[tracing::instrument(skip(self))]
    pub fn run(&mut self, option: RunOption) -> usize {
        let mut steps = 0;
        loop {
            if let RunOption::StepLimit(limit) = option {
                if steps >= limit {
                    break;
                }
            }
            steps += 1;
            if self.step() == Status::Halt {
                break;
            }
        }
        tracing::debug!("Executed {} instructions", steps);
        steps
    }

    /// Render the registers, the memory at `ip` and at every observed address.
    pub fn inspect(&self) -> String {
        let mut output = String::new();
        for (register, value) in self.registers.iter() {
            output.push_str(&format!("{}: 0x{:04x}\n", register, value));
        }
        output.push('\n');

        let ip = self.register(Register::Ip);
        output.push_str(&memory_window(&self.memory, ip, WINDOW_SIZE));
        output.push('\n');
        for address in &self.options.observed_addresses {
            output.push_str(&memory_window(&self.memory, *address, WINDOW_SIZE));
            output.push('\n');
        }

        match decode_instruction(&self.memory.window(ip, 5)) {
            Some(instruction) => output.push_str(&format!("next: {}\n", instruction)),
            None => output.push_str("next: <halt>\n"),
        }

        output
    }
}
