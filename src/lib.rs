//! A CHIP-8 interpreter that keeps a rewindable history of machine states.
//!
//! [`Interpreter`] is the execution engine. A driver calls
//! [`Interpreter::execute_clock_cycle`] once per CPU tick and
//! [`Interpreter::decrement_timers`] once per frame, and renders
//! [`Interpreter::frame_buffer`] after each frame.

macro_rules! wrapper {
    ($($vis:vis $name:ident => $size:expr),*) => {
        $(
            #[derive(Debug, Clone, Copy, PartialEq, Eq)]
            $vis struct $name([u8; $size]);

            impl Default for $name {
                fn default() -> Self {
                    Self([0; $size])
                }
            }

            impl std::ops::Deref for $name {
                type Target = [u8; $size];

                fn deref(&self) -> &Self::Target {
                    &self.0
                }
            }

            impl std::ops::DerefMut for $name {
                fn deref_mut(&mut self) -> &mut Self::Target {
                    &mut self.0
                }
            }
        )*
    };
}

pub mod cli;
pub mod display;
mod font;
pub mod history;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod memory;
pub mod quirks;
pub mod screen;
pub mod state;

pub use instruction::{decode, Instruction, Opcode};
pub use interpreter::Interpreter;
pub use quirks::Quirks;
