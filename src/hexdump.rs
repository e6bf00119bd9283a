use crate::emulator::memory::Readable;

/// Render `length` bytes of memory starting at `address`.
///
/// E.g. `0x0100: 0x00 0x01 0x00 0x00`
pub fn memory_window(memory: &impl Readable, address: u16, length: usize) -> String {
    let bytes = memory
        .window(address, length)
        .iter()
        .map(|byte| format!("0x{:02x}", byte))
        .collect::<Vec<String>>()
        .join(" ");

    format!("0x{:04x}: {}", address, bytes)
}

/// Hexdump a program, `stride` bytes per line.
pub fn hexdump(program: &[u8], program_offset: u16, addr_width: usize, stride: usize) -> String {
    program
        .chunks(stride)
        .enumerate()
        .map(|(line, bytes)| {
            let offset = program_offset as usize + line * stride;
            let bytes = bytes
                .iter()
                .map(|byte| format!(" {:02x}", byte))
                .collect::<String>();
            format!("{:0width$x}:{}", offset, bytes, width = addr_width)
        })
        .collect::<Vec<String>>()
        .join("\n")
}
