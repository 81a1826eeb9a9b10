use super::*;

#[test]
fn immediate_reads_the_operand_byte() {
    let mut cpu = cpu_with_program(&[0xA9, 0xAB]);
    step_n(&mut cpu, 1);
    assert_eq!(cpu.a, 0xAB);
}

#[test]
fn immediate_and_relative_resolve_to_the_operand_address() {
    let mut cpu = cpu_with_program(&[0xA9, 0x00]);
    cpu.pc = cpu.pc.wrapping_add(1); // as the dispatcher leaves it
    assert_eq!(cpu.operand_address(AddressingMode::Immediate), 0x8001);
    assert_eq!(cpu.operand_address(AddressingMode::Relative), 0x8001);
}

#[test]
fn zero_page() {
    let mut cpu = cpu_with_program(&[0xA5, 0x42]);
    cpu.memory.write(0x42, 0xAB);
    step_n(&mut cpu, 1);
    assert_eq!(cpu.a, 0xAB);
}

#[test]
fn zero_page_x_wraps_within_page_zero() {
    // LDX #$FF, LDA $42,X -> effective address 0x41, not 0x141.
    let mut cpu = cpu_with_program(&[0xA2, 0xFF, 0xB5, 0x42]);
    cpu.memory.write(0x41, 0x55);
    cpu.memory.write(0x0141, 0x99);
    step_n(&mut cpu, 2);
    assert_eq!(cpu.a, 0x55);
}

#[test]
fn zero_page_y_wraps_within_page_zero() {
    // LDY #$FF, LDX $42,Y
    let mut cpu = cpu_with_program(&[0xA0, 0xFF, 0xB6, 0x42]);
    cpu.memory.write(0x41, 0x66);
    step_n(&mut cpu, 2);
    assert_eq!(cpu.x, 0x66);
}

#[test]
fn absolute() {
    let mut cpu = cpu_with_program(&[0xAD, 0x34, 0x12]);
    cpu.memory.write(0x1234, 0x77);
    step_n(&mut cpu, 1);
    assert_eq!(cpu.a, 0x77);
}

#[test]
fn absolute_x_crosses_a_page() {
    // LDX #$01, LDA $12FF,X -> 0x1300.
    let mut cpu = cpu_with_program(&[0xA2, 0x01, 0xBD, 0xFF, 0x12]);
    cpu.memory.write(0x1300, 0x88);
    step_n(&mut cpu, 2);
    assert_eq!(cpu.a, 0x88);
}

#[test]
fn absolute_y() {
    let mut cpu = cpu_with_program(&[0xA0, 0x10, 0xB9, 0x00, 0x40]);
    cpu.memory.write(0x4010, 0x99);
    step_n(&mut cpu, 2);
    assert_eq!(cpu.a, 0x99);
}

#[test]
fn indirect_x_indexes_before_the_deref() {
    // LDX #$04, LDA ($20,X): pointer at 0x24/0x25 -> 0x2074.
    let mut cpu = cpu_with_program(&[0xA2, 0x04, 0xA1, 0x20]);
    cpu.memory.write(0x24, 0x74);
    cpu.memory.write(0x25, 0x20);
    cpu.memory.write(0x2074, 0x11);
    step_n(&mut cpu, 2);
    assert_eq!(cpu.a, 0x11);
}

#[test]
fn indirect_x_pointer_wraps_in_page_zero() {
    // LDX #$01, LDA ($FE,X): pointer bytes at 0xFF and 0x00.
    let mut cpu = cpu_with_program(&[0xA2, 0x01, 0xA1, 0xFE]);
    cpu.memory.write(0xFF, 0x34);
    cpu.memory.write(0x00, 0x12);
    cpu.memory.write(0x1234, 0x22);
    step_n(&mut cpu, 2);
    assert_eq!(cpu.a, 0x22);
}

#[test]
fn indirect_y_indexes_after_the_deref() {
    // LDY #$10, LDA ($86),Y: pointer at 0x86/0x87 -> 0x4028, + Y.
    let mut cpu = cpu_with_program(&[0xA0, 0x10, 0xB1, 0x86]);
    cpu.memory.write(0x86, 0x28);
    cpu.memory.write(0x87, 0x40);
    cpu.memory.write(0x4038, 0x33);
    step_n(&mut cpu, 2);
    assert_eq!(cpu.a, 0x33);
}

#[test]
fn indirect_y_pointer_wraps_in_page_zero() {
    // LDA ($FF),Y with Y = 0: pointer bytes at 0xFF and 0x00.
    let mut cpu = cpu_with_program(&[0xB1, 0xFF]);
    cpu.memory.write(0xFF, 0x00);
    cpu.memory.write(0x00, 0x30);
    cpu.memory.write(0x3000, 0x44);
    step_n(&mut cpu, 1);
    assert_eq!(cpu.a, 0x44);
}

#[test]
fn indexed_stores_use_the_same_resolution() {
    // LDA #$5A, LDX #$02, STA $10,X
    let mut cpu = cpu_with_program(&[0xA9, 0x5A, 0xA2, 0x02, 0x95, 0x10]);
    step_n(&mut cpu, 3);
    assert_eq!(cpu.memory.read(0x12), 0x5A);
}

#[test]
fn accumulator_mode_never_touches_memory() {
    // ASL A with a zeroed bus: only the accumulator changes.
    let mut cpu = cpu_with_program(&[0xA9, 0x21, 0x0A]);
    step_n(&mut cpu, 2);
    assert_eq!(cpu.a, 0x42);
    assert_eq!(cpu.memory.read(0x8003), 0x00);
}
