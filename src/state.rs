use log::{trace, warn};
use rand::rngs::StdRng;
use rand::Rng;

use crate::display::{FrameBuffer, HEIGHT};
use crate::input::Keypad;
use crate::instruction::{Instruction, Opcode};
use crate::memory::{Memory, PROGRAM_OFFSET};
use crate::quirks::Quirks;

/// Register V15 doubles as the carry / borrow / collision flag.
pub const FLAG: usize = 0xF;

/// Maximum number of nested subroutine calls.
pub const STACK_DEPTH: usize = 16;

pub const REGISTER_COUNT: usize = 16;

wrapper! {
    pub Registers => REGISTER_COUNT
}

/// Whether an instruction produced a state worth keeping.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Update {
    Changed,
    /// The state is byte-identical to before; don't record it and don't
    /// advance. The machine spins on this instruction.
    Unchanged,
}

/// Everything an instruction may touch besides the machine state itself.
pub struct Context<'a> {
    pub memory: &'a mut Memory,
    pub keypad: &'a mut Keypad,
    pub rng: &'a mut StdRng,
    pub quirks: Quirks,
}

/// A complete snapshot of the CPU: registers, timers, call stack and screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MachineState {
    pub pc: u16,                 // Program counter
    pub ir: u16,                 // Index register
    pub dt: u8,                  // Delay timer
    pub st: u8,                  // Sound timer
    pub sp: u8,                  // Stack depth
    pub v: Registers,            // Variable registers (V0..=VF)
    stack: [u16; STACK_DEPTH],   // Return addresses
    pub display: FrameBuffer,    // Screen
}

impl Default for MachineState {
    fn default() -> Self {
        Self {
            pc: PROGRAM_OFFSET as u16,
            ir: 0,
            dt: 0,
            st: 0,
            sp: 0,
            v: Registers::default(),
            stack: [0; STACK_DEPTH],
            display: FrameBuffer::new(),
        }
    }
}

impl MachineState {
    pub fn new() -> Self {
        Default::default()
    }

    /// Return addresses, oldest first.
    pub fn stack(&self) -> &[u16] {
        &self.stack[..self.sp as usize]
    }

    pub fn register(&self, index: usize) -> Option<u8> {
        self.v.get(index).copied()
    }

    /// Applies one decoded instruction.
    pub fn execute(&mut self, inst: Instruction, ctx: &mut Context) -> Update {
        let (x, y, n, kk, nnn) = (inst.x(), inst.y(), inst.n(), inst.kk(), inst.nnn());
        match inst.opcode() {
            Opcode::CLS => self.cls(),
            Opcode::RET => self.ret(),
            Opcode::JP_Addr => self.jp(nnn),
            Opcode::CALL_Addr => self.call(nnn),
            Opcode::SE_Vx_Byte => self.skip_if_byte(x, kk, true),
            Opcode::SNE_Vx_Byte => self.skip_if_byte(x, kk, false),
            Opcode::SE_Vx_Vy => self.skip_if_register(x, y, true),
            Opcode::LD_Vx_Byte => self.alter(x, |_| kk),
            Opcode::ADD_Vx_Byte => self.alter(x, |vx| vx.wrapping_add(kk)),
            Opcode::LD_Vx_Vy => self.combine(x, y, |_, vy| vy),
            Opcode::OR_Vx_Vy => self.combine(x, y, |vx, vy| vx | vy),
            Opcode::AND_Vx_Vy => self.combine(x, y, |vx, vy| vx & vy),
            Opcode::XOR_Vx_Vy => self.combine(x, y, |vx, vy| vx ^ vy),
            Opcode::ADD_Vx_Vy => self.add(x, y),
            Opcode::SUB_Vx_Vy => self.sub(x, y),
            Opcode::SHR_Vx_Vy => self.shr(x, y, ctx.quirks),
            Opcode::SUBN_Vx_Vy => self.subn(x, y),
            Opcode::SHL_Vx_Vy => self.shl(x, y, ctx.quirks),
            Opcode::SNE_Vx_Vy => self.skip_if_register(x, y, false),
            Opcode::LD_I_Addr => self.ld_i(nnn),
            Opcode::JP_V0_Addr => self.jp_v0(nnn),
            Opcode::RND_Vx_Byte => self.rnd(x, kk, ctx.rng),
            Opcode::DRW_Vx_Vy_Nibble => self.drw(x, y, n, ctx.memory),
            Opcode::SKP_Vx => self.skip_if_key(x, ctx.keypad, true),
            Opcode::SKNP_Vx => self.skip_if_key(x, ctx.keypad, false),
            Opcode::LD_Vx_DT => {
                let dt = self.dt;
                self.alter(x, |_| dt)
            }
            Opcode::LD_Vx_K => self.wait_for_key(x, ctx.keypad),
            Opcode::LD_DT_Vx => self.ld_dt(x),
            Opcode::LD_ST_Vx => self.ld_st(x),
            Opcode::ADD_I_Vx => self.add_i(x),
            Opcode::LD_F_Vx => self.ld_f(x, ctx.memory),
            Opcode::LD_B_Vx => self.ld_b(x, ctx.memory),
            Opcode::LD_IAddr_Vx => self.store(x, ctx.memory, ctx.quirks),
            Opcode::LD_Vx_IAddr => self.load(x, ctx.memory, ctx.quirks),
            Opcode::Invalid => {
                trace!("Invalid instruction [{:?}] at {:#05X}", inst, self.pc);
                Update::Unchanged
            }
        }
    }

    fn next(&mut self) -> Update {
        self.pc = self.pc.wrapping_add(2);
        Update::Changed
    }

    fn skip_next(&mut self, skip: bool) -> Update {
        if skip {
            self.pc = self.pc.wrapping_add(2);
        }
        self.next()
    }

    fn cls(&mut self) -> Update {
        self.display.clear();
        self.next()
    }

    fn ret(&mut self) -> Update {
        if self.sp == 0 {
            warn!("RET with an empty stack at {:#05X}", self.pc);
            return Update::Unchanged;
        }
        self.sp -= 1;
        self.pc = self.stack[self.sp as usize].wrapping_add(2);
        Update::Changed
    }

    fn jp(&mut self, addr: u16) -> Update {
        if self.pc == addr {
            trace!("Self jump at {addr:#05X}");
            return Update::Unchanged;
        }
        self.pc = addr;
        Update::Changed
    }

    fn call(&mut self, addr: u16) -> Update {
        if self.sp as usize >= STACK_DEPTH {
            warn!("CALL with a full stack at {:#05X}", self.pc);
            return Update::Unchanged;
        }
        self.stack[self.sp as usize] = self.pc;
        self.sp += 1;
        self.pc = addr;
        Update::Changed
    }

    fn skip_if_byte(&mut self, x: usize, value: u8, equal: bool) -> Update {
        let Some(vx) = self.register(x) else {
            return Update::Unchanged;
        };
        self.skip_next((vx == value) == equal)
    }

    fn skip_if_register(&mut self, x: usize, y: usize, equal: bool) -> Update {
        let (Some(vx), Some(vy)) = (self.register(x), self.register(y)) else {
            return Update::Unchanged;
        };
        self.skip_next((vx == vy) == equal)
    }

    fn skip_if_key(&mut self, x: usize, keypad: &Keypad, pressed: bool) -> Update {
        let Some(vx) = self.register(x) else {
            return Update::Unchanged;
        };
        self.skip_next(keypad.is_held(vx) == pressed)
    }

    /// Replaces Vx with `f(Vx)`.
    fn alter(&mut self, x: usize, f: impl FnOnce(u8) -> u8) -> Update {
        let Some(vx) = self.register(x) else {
            return Update::Unchanged;
        };
        self.v[x] = f(vx);
        self.next()
    }

    /// Replaces Vx with `f(Vx, Vy)`.
    fn combine(&mut self, x: usize, y: usize, f: impl FnOnce(u8, u8) -> u8) -> Update {
        let (Some(vx), Some(vy)) = (self.register(x), self.register(y)) else {
            return Update::Unchanged;
        };
        self.v[x] = f(vx, vy);
        self.next()
    }

    /// Writes the flag and then replaces Vx with the result, so VF as a
    /// destination ends up holding the result.
    fn with_flag(&mut self, x: usize, y: usize, f: impl FnOnce(u8, u8) -> (u8, bool)) -> Update {
        let (Some(vx), Some(vy)) = (self.register(x), self.register(y)) else {
            return Update::Unchanged;
        };
        let (result, flag) = f(vx, vy);
        self.v[FLAG] = flag as u8;
        self.v[x] = result;
        self.next()
    }

    fn add(&mut self, x: usize, y: usize) -> Update {
        self.with_flag(x, y, |vx, vy| vx.overflowing_add(vy))
    }

    fn sub(&mut self, x: usize, y: usize) -> Update {
        self.with_flag(x, y, |vx, vy| (vx.wrapping_sub(vy), vx > vy))
    }

    fn subn(&mut self, x: usize, y: usize) -> Update {
        self.with_flag(x, y, |vx, vy| (vy.wrapping_sub(vx), vy > vx))
    }

    fn shr(&mut self, x: usize, y: usize, quirks: Quirks) -> Update {
        self.with_flag(x, y, |vx, vy| {
            let source = if quirks.shift_uses_vy { vy } else { vx };
            (source >> 1, source & 0b0000_0001 != 0)
        })
    }

    fn shl(&mut self, x: usize, y: usize, quirks: Quirks) -> Update {
        self.with_flag(x, y, |vx, vy| {
            let source = if quirks.shift_uses_vy { vy } else { vx };
            (source << 1, source & 0b1000_0000 != 0)
        })
    }

    fn ld_i(&mut self, addr: u16) -> Update {
        self.ir = addr;
        self.next()
    }

    fn jp_v0(&mut self, addr: u16) -> Update {
        self.pc = addr + self.v[0] as u16;
        Update::Changed
    }

    fn rnd(&mut self, x: usize, mask: u8, rng: &mut StdRng) -> Update {
        let byte: u8 = rng.gen();
        self.alter(x, |_| byte & mask)
    }

    fn drw(&mut self, x: usize, y: usize, n: u8, memory: &Memory) -> Update {
        let (Some(vx), Some(vy)) = (self.register(x), self.register(y)) else {
            return Update::Unchanged;
        };
        if n == 0 {
            return Update::Unchanged;
        }

        let origin_x = vx as usize;
        let origin_y = if vy as usize >= HEIGHT { 0 } else { vy as usize };
        let mut erased = false;
        for row in 0..n as usize {
            let y = origin_y + row;
            if y >= HEIGHT {
                trace!("Clipped sprite rows from {y}");
                break;
            }
            let byte = memory.read_byte(self.ir.wrapping_add(row as u16));
            erased |= self.display.draw_byte(origin_x, y, byte);
        }
        self.v[FLAG] = erased as u8;
        self.next()
    }

    fn wait_for_key(&mut self, x: usize, keypad: &mut Keypad) -> Update {
        if self.register(x).is_none() {
            return Update::Unchanged;
        }
        match keypad.poll_wait() {
            Some(key) => self.alter(x, |_| key),
            None => Update::Unchanged,
        }
    }

    fn ld_dt(&mut self, x: usize) -> Update {
        let Some(vx) = self.register(x) else {
            return Update::Unchanged;
        };
        self.dt = vx;
        self.next()
    }

    fn ld_st(&mut self, x: usize) -> Update {
        let Some(vx) = self.register(x) else {
            return Update::Unchanged;
        };
        self.st = vx;
        self.next()
    }

    fn add_i(&mut self, x: usize) -> Update {
        let Some(vx) = self.register(x) else {
            return Update::Unchanged;
        };
        self.ir = self.ir.wrapping_add(vx as u16);
        self.next()
    }

    fn ld_f(&mut self, x: usize, memory: &Memory) -> Update {
        let Some(vx) = self.register(x) else {
            return Update::Unchanged;
        };
        self.ir = memory.font_sprite_address(vx);
        self.next()
    }

    fn ld_b(&mut self, x: usize, memory: &mut Memory) -> Update {
        let Some(vx) = self.register(x) else {
            return Update::Unchanged;
        };
        memory.write_byte(self.ir, vx / 100);
        memory.write_byte(self.ir.wrapping_add(1), (vx / 10) % 10);
        memory.write_byte(self.ir.wrapping_add(2), vx % 10);
        self.next()
    }

    fn store(&mut self, x: usize, memory: &mut Memory, quirks: Quirks) -> Update {
        if self.register(x).is_none() {
            return Update::Unchanged;
        }
        for (offset, value) in self.v[..=x].iter().enumerate() {
            memory.write_byte(self.ir.wrapping_add(offset as u16), *value);
        }
        if quirks.increment_index {
            self.ir = self.ir.wrapping_add(x as u16 + 1);
        }
        self.next()
    }

    fn load(&mut self, x: usize, memory: &Memory, quirks: Quirks) -> Update {
        if self.register(x).is_none() {
            return Update::Unchanged;
        }
        for offset in 0..=x {
            self.v[offset] = memory.read_byte(self.ir.wrapping_add(offset as u16));
        }
        if quirks.increment_index {
            self.ir = self.ir.wrapping_add(x as u16 + 1);
        }
        self.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    struct Rig {
        memory: Memory,
        keypad: Keypad,
        rng: StdRng,
        quirks: Quirks,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                memory: Memory::new(),
                keypad: Keypad::new(),
                rng: StdRng::seed_from_u64(7),
                quirks: Quirks::default(),
            }
        }

        fn run(&mut self, state: &mut MachineState, word: u16) -> Update {
            let mut ctx = Context {
                memory: &mut self.memory,
                keypad: &mut self.keypad,
                rng: &mut self.rng,
                quirks: self.quirks,
            };
            state.execute(Instruction::from(word), &mut ctx)
        }
    }

    #[test]
    fn fresh_state() {
        let s = MachineState::new();
        assert_eq!(s.pc, 0x200);
        assert_eq!(s.sp, 0);
        assert!(s.stack().is_empty());
        assert!(s.display.is_blank());
    }

    #[test]
    fn add_sets_carry_for_every_pair() {
        let mut rig = Rig::new();
        for a in 0..=255u8 {
            for b in 0..=255u8 {
                let mut s = MachineState::new();
                s.v[1] = a;
                s.v[2] = b;
                assert_eq!(rig.run(&mut s, 0x8124), Update::Changed);
                let sum = a as u16 + b as u16;
                assert_eq!(s.v[1], (sum % 256) as u8);
                assert_eq!(s.v[FLAG], (sum > 255) as u8);
                assert_eq!(s.pc, 0x202);
            }
        }
    }

    #[test]
    fn sub_and_subn_borrow_for_every_pair() {
        let mut rig = Rig::new();
        for a in 0..=255u8 {
            for b in 0..=255u8 {
                let mut s = MachineState::new();
                s.v[3] = a;
                s.v[4] = b;
                let _ = rig.run(&mut s, 0x8345);
                assert_eq!(s.v[3], a.wrapping_sub(b));
                assert_eq!(s.v[FLAG], (a > b) as u8);

                let mut s = MachineState::new();
                s.v[3] = a;
                s.v[4] = b;
                let _ = rig.run(&mut s, 0x8347);
                assert_eq!(s.v[3], b.wrapping_sub(a));
                assert_eq!(s.v[FLAG], (b > a) as u8);
            }
        }
    }

    #[test]
    fn shifts_in_place_by_default() {
        let mut rig = Rig::new();
        let mut s = MachineState::new();
        s.v[1] = 0b1000_0001;
        s.v[2] = 0b0100_0000;
        let _ = rig.run(&mut s, 0x8126);
        assert_eq!(s.v[1], 0b0100_0000);
        assert_eq!(s.v[FLAG], 1);
        let _ = rig.run(&mut s, 0x812E);
        assert_eq!(s.v[1], 0b1000_0000);
        assert_eq!(s.v[FLAG], 0);
    }

    #[test]
    fn shifts_copy_vy_with_quirk() {
        let mut rig = Rig::new();
        rig.quirks.shift_uses_vy = true;
        let mut s = MachineState::new();
        s.v[1] = 0xFF;
        s.v[2] = 0b1000_0010;
        let _ = rig.run(&mut s, 0x8126);
        assert_eq!(s.v[1], 0b0100_0001);
        assert_eq!(s.v[FLAG], 0);
        let _ = rig.run(&mut s, 0x812E);
        assert_eq!(s.v[1], 0b0000_0100);
        assert_eq!(s.v[FLAG], 1);
        assert_eq!(s.v[2], 0b1000_0010);
    }

    #[test]
    fn vf_as_destination_keeps_the_result() {
        let mut rig = Rig::new();
        let mut s = MachineState::new();
        s.v[FLAG] = 0x10;
        s.v[1] = 0x20;
        let _ = rig.run(&mut s, 0x8F14);
        assert_eq!(s.v[FLAG], 0x30);

        s.v[FLAG] = 0x06;
        let _ = rig.run(&mut s, 0x8F06);
        assert_eq!(s.v[FLAG], 0x03);

        s.v[FLAG] = 0x81;
        let _ = rig.run(&mut s, 0x8F0E);
        assert_eq!(s.v[FLAG], 0x02);
    }

    #[test]
    fn skips() {
        let mut rig = Rig::new();
        let mut s = MachineState::new();
        s.v[5] = 0x42;
        let _ = rig.run(&mut s, 0x3542);
        assert_eq!(s.pc, 0x204);
        let _ = rig.run(&mut s, 0x4542);
        assert_eq!(s.pc, 0x206);
        s.v[6] = 0x42;
        let _ = rig.run(&mut s, 0x5560);
        assert_eq!(s.pc, 0x20A);
        let _ = rig.run(&mut s, 0x9560);
        assert_eq!(s.pc, 0x20C);
    }

    #[test]
    fn key_skips_follow_held_key() {
        let mut rig = Rig::new();
        let mut s = MachineState::new();
        s.v[0] = 0x7;
        let _ = rig.run(&mut s, 0xE09E);
        assert_eq!(s.pc, 0x202);
        rig.keypad.set_held(0x7, true);
        let _ = rig.run(&mut s, 0xE09E);
        assert_eq!(s.pc, 0x206);
        let _ = rig.run(&mut s, 0xE0A1);
        assert_eq!(s.pc, 0x208);
    }

    #[test]
    fn key_skips_see_every_held_key() {
        let mut rig = Rig::new();
        let mut s = MachineState::new();
        s.v[0] = 0x5;
        rig.keypad.set_held(0x3, true);
        rig.keypad.set_held(0x5, true);
        let _ = rig.run(&mut s, 0xE09E);
        assert_eq!(s.pc, 0x204);
        let _ = rig.run(&mut s, 0xE0A1);
        assert_eq!(s.pc, 0x206);
    }

    #[test]
    fn call_and_return() {
        let mut rig = Rig::new();
        let mut s = MachineState::new();
        let _ = rig.run(&mut s, 0x2400);
        assert_eq!(s.pc, 0x400);
        assert_eq!(s.stack(), &[0x200]);
        let _ = rig.run(&mut s, 0x00EE);
        assert_eq!(s.pc, 0x202);
        assert_eq!(s.sp, 0);
    }

    #[test]
    fn return_on_empty_stack_is_unchanged() {
        let mut rig = Rig::new();
        let mut s = MachineState::new();
        let before = s;
        assert_eq!(rig.run(&mut s, 0x00EE), Update::Unchanged);
        assert_eq!(s, before);
    }

    #[test]
    fn call_on_full_stack_is_unchanged() {
        let mut rig = Rig::new();
        let mut s = MachineState::new();
        for _ in 0..STACK_DEPTH {
            assert_eq!(rig.run(&mut s, 0x2300), Update::Changed);
        }
        let before = s;
        assert_eq!(rig.run(&mut s, 0x2300), Update::Unchanged);
        assert_eq!(s, before);
    }

    #[test]
    fn self_jump_is_unchanged() {
        let mut rig = Rig::new();
        let mut s = MachineState::new();
        assert_eq!(rig.run(&mut s, 0x1200), Update::Unchanged);
        assert_eq!(s.pc, 0x200);
        assert_eq!(rig.run(&mut s, 0x1300), Update::Changed);
        assert_eq!(s.pc, 0x300);
    }

    #[test]
    fn jump_with_offset() {
        let mut rig = Rig::new();
        let mut s = MachineState::new();
        s.v[0] = 0x10;
        let _ = rig.run(&mut s, 0xB300);
        assert_eq!(s.pc, 0x310);
    }

    #[test]
    fn random_is_masked() {
        let mut rig = Rig::new();
        let mut s = MachineState::new();
        for _ in 0..64 {
            let _ = rig.run(&mut s, 0xC10F);
            assert_eq!(s.v[1] & 0xF0, 0);
        }
        let _ = rig.run(&mut s, 0xC100);
        assert_eq!(s.v[1], 0);
    }

    #[test]
    fn draw_twice_restores_screen_and_flags_collision() {
        let mut rig = Rig::new();
        let mut s = MachineState::new();
        s.ir = rig.memory.font_sprite_address(0x8);
        s.v[1] = 10;
        s.v[2] = 5;
        let _ = rig.run(&mut s, 0xD125);
        assert_eq!(s.v[FLAG], 0);
        assert!(!s.display.is_blank());
        let _ = rig.run(&mut s, 0xD125);
        assert_eq!(s.v[FLAG], 1);
        assert!(s.display.is_blank());
    }

    #[test]
    fn draw_zero_rows_is_unchanged() {
        let mut rig = Rig::new();
        let mut s = MachineState::new();
        assert_eq!(rig.run(&mut s, 0xD120), Update::Unchanged);
    }

    #[test]
    fn draw_wraps_origin_and_clips_rows() {
        let mut rig = Rig::new();
        let mut s = MachineState::new();
        s.ir = rig.memory.font_sprite_address(0x0);
        s.v[1] = 64 + 3;
        s.v[2] = 30;
        let _ = rig.run(&mut s, 0xD125);
        // x wrapped to 0; only rows 30 and 31 fit
        assert!(s.display.pixel(0, 30));
        assert!(s.display.pixel(0, 31));
        assert!(!s.display.pixel(0, 0));
        assert_eq!(s.display.lit(), 4 + 2);
    }

    #[test]
    fn bcd() {
        let mut rig = Rig::new();
        let mut s = MachineState::new();
        s.v[4] = 254;
        s.ir = 0x300;
        let _ = rig.run(&mut s, 0xF433);
        assert_eq!(rig.memory.read_byte(0x300), 2);
        assert_eq!(rig.memory.read_byte(0x301), 5);
        assert_eq!(rig.memory.read_byte(0x302), 4);
        assert_eq!(s.ir, 0x300);
    }

    #[test]
    fn store_and_load_without_increment() {
        let mut rig = Rig::new();
        let mut s = MachineState::new();
        for i in 0..4 {
            s.v[i] = i as u8 + 1;
        }
        s.v[4] = 0x99;
        s.ir = 0x400;
        let _ = rig.run(&mut s, 0xF355);
        assert_eq!(&rig.memory.as_slice()[0x400..0x405], &[1, 2, 3, 4, 0]);
        assert_eq!(s.ir, 0x400);

        let mut t = MachineState::new();
        t.ir = 0x400;
        let _ = rig.run(&mut t, 0xF265);
        assert_eq!(&t.v[..4], &[1, 2, 3, 0]);
        assert_eq!(t.ir, 0x400);
    }

    #[test]
    fn store_and_load_with_increment() {
        let mut rig = Rig::new();
        rig.quirks.increment_index = true;
        let mut s = MachineState::new();
        s.ir = 0x400;
        let _ = rig.run(&mut s, 0xF355);
        assert_eq!(s.ir, 0x404);
        let _ = rig.run(&mut s, 0xF065);
        assert_eq!(s.ir, 0x405);
    }

    #[test]
    fn timers_and_index() {
        let mut rig = Rig::new();
        let mut s = MachineState::new();
        s.v[2] = 0x30;
        let _ = rig.run(&mut s, 0xF215);
        let _ = rig.run(&mut s, 0xF218);
        assert_eq!((s.dt, s.st), (0x30, 0x30));
        let _ = rig.run(&mut s, 0xF307);
        assert_eq!(s.v[3], 0x30);
        s.ir = 0xFFF0;
        let _ = rig.run(&mut s, 0xF21E);
        assert_eq!(s.ir, 0x0020);
        s.v[2] = 0x1A;
        let _ = rig.run(&mut s, 0xF229);
        assert_eq!(s.ir, rig.memory.font_sprite_address(0xA));
    }

    #[test]
    fn wait_for_key() {
        let mut rig = Rig::new();
        let mut s = MachineState::new();
        let before = s;
        assert_eq!(rig.run(&mut s, 0xF50A), Update::Unchanged);
        assert_eq!(s, before);
        assert!(rig.keypad.is_waiting());
        rig.keypad.press(0xC);
        assert_eq!(rig.run(&mut s, 0xF50A), Update::Changed);
        assert_eq!(s.v[5], 0xC);
        assert_eq!(s.pc, 0x202);
        assert!(!rig.keypad.is_waiting());
    }

    #[test]
    fn invalid_is_unchanged() {
        let mut rig = Rig::new();
        let mut s = MachineState::new();
        assert_eq!(rig.run(&mut s, 0x5121), Update::Unchanged);
        assert_eq!(s.pc, 0x200);
    }
}
