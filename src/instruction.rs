use std::fmt;

/// Every instruction kind the interpreter understands.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    CLS,
    RET,
    JP_Addr,
    CALL_Addr,
    SE_Vx_Byte,
    SNE_Vx_Byte,
    SE_Vx_Vy,
    LD_Vx_Byte,
    ADD_Vx_Byte,
    LD_Vx_Vy,
    OR_Vx_Vy,
    AND_Vx_Vy,
    XOR_Vx_Vy,
    ADD_Vx_Vy,
    SUB_Vx_Vy,
    SHR_Vx_Vy,
    SUBN_Vx_Vy,
    SHL_Vx_Vy,
    SNE_Vx_Vy,
    LD_I_Addr,
    JP_V0_Addr,
    RND_Vx_Byte,
    DRW_Vx_Vy_Nibble,
    SKP_Vx,
    SKNP_Vx,
    LD_Vx_DT,
    LD_Vx_K,
    LD_DT_Vx,
    LD_ST_Vx,
    ADD_I_Vx,
    LD_F_Vx,
    LD_B_Vx,
    LD_IAddr_Vx,
    LD_Vx_IAddr,
    Invalid,
}

/// Classifies a 16-bit word. Total over `u16`; `0x0000` is always invalid.
pub fn decode(word: u16) -> Opcode {
    if word == 0 {
        return Opcode::Invalid;
    }

    let inst = Instruction::from(word);
    match (inst.kind(), inst.kk(), inst.n()) {
        (0x0, 0xE0, _) => Opcode::CLS,
        (0x0, 0xEE, _) => Opcode::RET,
        (0x1, _, _) => Opcode::JP_Addr,
        (0x2, _, _) => Opcode::CALL_Addr,
        (0x3, _, _) => Opcode::SE_Vx_Byte,
        (0x4, _, _) => Opcode::SNE_Vx_Byte,
        (0x5, _, 0x0) => Opcode::SE_Vx_Vy,
        (0x6, _, _) => Opcode::LD_Vx_Byte,
        (0x7, _, _) => Opcode::ADD_Vx_Byte,
        (0x8, _, 0x0) => Opcode::LD_Vx_Vy,
        (0x8, _, 0x1) => Opcode::OR_Vx_Vy,
        (0x8, _, 0x2) => Opcode::AND_Vx_Vy,
        (0x8, _, 0x3) => Opcode::XOR_Vx_Vy,
        (0x8, _, 0x4) => Opcode::ADD_Vx_Vy,
        (0x8, _, 0x5) => Opcode::SUB_Vx_Vy,
        (0x8, _, 0x6) => Opcode::SHR_Vx_Vy,
        (0x8, _, 0x7) => Opcode::SUBN_Vx_Vy,
        (0x8, _, 0xE) => Opcode::SHL_Vx_Vy,
        (0x9, _, 0x0) => Opcode::SNE_Vx_Vy,
        (0xA, _, _) => Opcode::LD_I_Addr,
        (0xB, _, _) => Opcode::JP_V0_Addr,
        (0xC, _, _) => Opcode::RND_Vx_Byte,
        (0xD, _, _) => Opcode::DRW_Vx_Vy_Nibble,
        (0xE, 0x9E, _) => Opcode::SKP_Vx,
        (0xE, 0xA1, _) => Opcode::SKNP_Vx,
        (0xF, 0x07, _) => Opcode::LD_Vx_DT,
        (0xF, 0x0A, _) => Opcode::LD_Vx_K,
        (0xF, 0x15, _) => Opcode::LD_DT_Vx,
        (0xF, 0x18, _) => Opcode::LD_ST_Vx,
        (0xF, 0x1E, _) => Opcode::ADD_I_Vx,
        (0xF, 0x29, _) => Opcode::LD_F_Vx,
        (0xF, 0x33, _) => Opcode::LD_B_Vx,
        (0xF, 0x55, _) => Opcode::LD_IAddr_Vx,
        (0xF, 0x65, _) => Opcode::LD_Vx_IAddr,
        _ => Opcode::Invalid,
    }
}

/// A raw instruction word with accessors for its fixed fields.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    word: u16,
}

impl Instruction {
    pub const fn word(&self) -> u16 {
        self.word
    }

    /// Top nibble.
    pub const fn kind(&self) -> u8 {
        (self.word >> 12) as u8
    }

    pub const fn x(&self) -> usize {
        ((self.word >> 8) & 0xF) as usize
    }

    pub const fn y(&self) -> usize {
        ((self.word >> 4) & 0xF) as usize
    }

    pub const fn n(&self) -> u8 {
        (self.word & 0xF) as u8
    }

    pub const fn kk(&self) -> u8 {
        (self.word & 0xFF) as u8
    }

    pub const fn nnn(&self) -> u16 {
        self.word & 0x0FFF
    }

    pub fn opcode(&self) -> Opcode {
        decode(self.word)
    }

    pub fn nibbles(&self) -> [u8; 4] {
        let [hi, lo] = self.word.to_be_bytes();
        [hi >> 4, hi & 0xF, lo >> 4, lo & 0xF]
    }
}

impl From<u16> for Instruction {
    fn from(word: u16) -> Self {
        Self { word }
    }
}

impl fmt::Debug for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for nibble in self.nibbles().iter() {
            write!(f, "{:X}", nibble)?;
        }
        Ok(())
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x, y, n, kk, nnn) = (self.x(), self.y(), self.n(), self.kk(), self.nnn());
        match self.opcode() {
            Opcode::CLS => write!(f, "CLS"),
            Opcode::RET => write!(f, "RET"),
            Opcode::JP_Addr => write!(f, "JP 0x{nnn:03X}"),
            Opcode::CALL_Addr => write!(f, "CALL 0x{nnn:03X}"),
            Opcode::SE_Vx_Byte => write!(f, "SE V{x:X}, 0x{kk:02X}"),
            Opcode::SNE_Vx_Byte => write!(f, "SNE V{x:X}, 0x{kk:02X}"),
            Opcode::SE_Vx_Vy => write!(f, "SE V{x:X}, V{y:X}"),
            Opcode::LD_Vx_Byte => write!(f, "LD V{x:X}, 0x{kk:02X}"),
            Opcode::ADD_Vx_Byte => write!(f, "ADD V{x:X}, 0x{kk:02X}"),
            Opcode::LD_Vx_Vy => write!(f, "LD V{x:X}, V{y:X}"),
            Opcode::OR_Vx_Vy => write!(f, "OR V{x:X}, V{y:X}"),
            Opcode::AND_Vx_Vy => write!(f, "AND V{x:X}, V{y:X}"),
            Opcode::XOR_Vx_Vy => write!(f, "XOR V{x:X}, V{y:X}"),
            Opcode::ADD_Vx_Vy => write!(f, "ADD V{x:X}, V{y:X}"),
            Opcode::SUB_Vx_Vy => write!(f, "SUB V{x:X}, V{y:X}"),
            Opcode::SHR_Vx_Vy => write!(f, "SHR V{x:X}, V{y:X}"),
            Opcode::SUBN_Vx_Vy => write!(f, "SUBN V{x:X}, V{y:X}"),
            Opcode::SHL_Vx_Vy => write!(f, "SHL V{x:X}, V{y:X}"),
            Opcode::SNE_Vx_Vy => write!(f, "SNE V{x:X}, V{y:X}"),
            Opcode::LD_I_Addr => write!(f, "LD I, 0x{nnn:03X}"),
            Opcode::JP_V0_Addr => write!(f, "JP V0, 0x{nnn:03X}"),
            Opcode::RND_Vx_Byte => write!(f, "RND V{x:X}, 0x{kk:02X}"),
            Opcode::DRW_Vx_Vy_Nibble => write!(f, "DRW V{x:X}, V{y:X}, {n}"),
            Opcode::SKP_Vx => write!(f, "SKP V{x:X}"),
            Opcode::SKNP_Vx => write!(f, "SKNP V{x:X}"),
            Opcode::LD_Vx_DT => write!(f, "LD V{x:X}, DT"),
            Opcode::LD_Vx_K => write!(f, "LD V{x:X}, K"),
            Opcode::LD_DT_Vx => write!(f, "LD DT, V{x:X}"),
            Opcode::LD_ST_Vx => write!(f, "LD ST, V{x:X}"),
            Opcode::ADD_I_Vx => write!(f, "ADD I, V{x:X}"),
            Opcode::LD_F_Vx => write!(f, "LD F, V{x:X}"),
            Opcode::LD_B_Vx => write!(f, "LD B, V{x:X}"),
            Opcode::LD_IAddr_Vx => write!(f, "LD [I], V{x:X}"),
            Opcode::LD_Vx_IAddr => write!(f, "LD V{x:X}, [I]"),
            Opcode::Invalid => write!(f, "???"),
        }
    }
}
