use log::debug;
use std::collections::HashMap;
use winit::event::VirtualKeyCode;

/// Generates a keymap from a mapping of QWERTY keys to CHIP-8 key codes,
/// represented as a [`HashMap`](std::collections::HashMap).
macro_rules! keymap {
    ($($keycode:ident => $mapping:literal),*) => {
        lazy_static::lazy_static! {
            /// A mapping of QWERTY key codes to the CHIP-8 key it represents.
            pub static ref KEYMAP: HashMap<VirtualKeyCode, u8> = {
                let mut m = HashMap::new();
                $(
                  m.insert(VirtualKeyCode::$keycode, $mapping);
                )*
                m
            };
        }
    };
}

keymap! {
    Key1 => 0x1,
    Key2 => 0x2,
    Key3 => 0x3,
    Key4 => 0xC,
    Q => 0x4,
    W => 0x5,
    E => 0x6,
    R => 0xD,
    A => 0x7,
    S => 0x8,
    D => 0x9,
    F => 0xE,
    Z => 0xA,
    X => 0x0,
    C => 0xB,
    V => 0xF
}

pub const KEY_COUNT: usize = 16;

/// The 16-key hex keypad as seen by the interpreter.
///
/// Held keys are polled by `SKP`/`SKNP`. `LD Vx, K` instead raises the
/// waiting latch and consumes the next key offered through [`Keypad::press`].
#[derive(Debug, Default)]
pub struct Keypad {
    held: [bool; KEY_COUNT],
    waiting: bool,
    pending: Option<u8>,
}

impl Keypad {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn set_held(&mut self, key: u8, down: bool) {
        if let Some(slot) = self.held.get_mut(key as usize) {
            *slot = down;
        }
    }

    /// Whether `key` is held down. Values past 0xF never are.
    pub fn is_held(&self, key: u8) -> bool {
        self.held.get(key as usize).copied().unwrap_or(false)
    }

    /// Offers a fresh key press. Ignored unless an instruction is waiting.
    pub fn press(&mut self, key: u8) {
        if !self.waiting || key as usize >= KEY_COUNT {
            return;
        }
        debug!("Key press satisfies wait [key: {key:X}]");
        self.pending = Some(key);
    }

    pub fn is_waiting(&self) -> bool {
        self.waiting
    }

    /// Raises the waiting latch and hands back a pending key if one arrived.
    pub(crate) fn poll_wait(&mut self) -> Option<u8> {
        self.waiting = true;
        let key = self.pending.take()?;
        self.waiting = false;
        Some(key)
    }

    /// Drops the wait latch and any pending key, keeping held keys.
    pub fn release_wait(&mut self) {
        self.waiting = false;
        self.pending = None;
    }
}
