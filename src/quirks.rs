/// Behaviours that differ between historical CHIP-8 interpreters.
///
/// Both default to off, which matches CHIP-48 and most modern ROMs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Quirks {
    /// `SHR`/`SHL` copy Vy into Vx before shifting (COSMAC VIP).
    pub shift_uses_vy: bool,
    /// `LD [I], Vx` and `LD Vx, [I]` leave I pointing past the last register.
    pub increment_index: bool,
}

impl Quirks {
    pub const COSMAC_VIP: Self = Self {
        shift_uses_vy: true,
        increment_index: true,
    };
}
