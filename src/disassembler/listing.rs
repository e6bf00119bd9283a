use super::disassemble_code;

/// Generate listing line from an instruction, its address and its encoded bytes
///
/// E.g. `0x0000  10 00 01 02     mov $0001, r1`
fn generate_line(addr: usize, bytes: &[u8], ins: &impl std::fmt::Display) -> String {
    let bytes_str = bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<String>>()
        .join(" ");

    format!("0x{:04x}  {:<14}  {}\n", addr, bytes_str, ins)
}

/// Generate a listing of a program placed at address `0x0000`.
pub fn generate(program: &[u8]) -> String {
    let mut str = String::new();
    str.push_str(" Addr   Hexdump         Instructions\n");
    str.push_str("--------------------------------------\n");

    for (addr, ins) in disassemble_code(program) {
        let bytes = &program[addr..addr + ins.size()];
        str.push_str(&generate_line(addr, bytes, &ins));
    }

    str
}
