use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt;

use crate::display::FrameBuffer;
use crate::history::History;
use crate::input::Keypad;
use crate::instruction::Instruction;
use crate::memory::{LoadError, Memory, MEMORY_SIZE};
use crate::quirks::Quirks;
use crate::state::{Context, MachineState, Update};

/// One line of the memory view shown next to the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disassembly {
    pub addr: u16,
    pub word: u16,
    pub text: String,
    pub is_pc: bool,
}

impl fmt::Display for Disassembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.is_pc { '>' } else { ' ' };
        write!(f, "{marker} {:03X}  {:04X}  {}", self.addr, self.word, self.text)
    }
}

/// The execution engine: owns memory, the state history and the keypad.
///
/// While running, each clock cycle executes one instruction and commits the
/// new state to the history. While paused, the driver's clock does nothing;
/// the user steps with [`advance_one_clock_cycle`](Self::advance_one_clock_cycle)
/// and [`back_one_clock_cycle`](Self::back_one_clock_cycle). Stepping forward
/// over states that were already computed replays them from the history.
#[derive(Debug)]
pub struct Interpreter {
    memory: Memory,
    history: History<MachineState>,
    keypad: Keypad,
    rng: StdRng,
    quirks: Quirks,
    paused: bool,
    stepped: bool, // a single step happened since the last timer tick
}

impl Interpreter {
    pub fn new(quirks: Quirks) -> Self {
        Self::with_rng(quirks, StdRng::from_entropy())
    }

    /// Same as [`new`](Self::new), with a reproducible `RND` sequence.
    pub fn with_seed(quirks: Quirks, seed: u64) -> Self {
        Self::with_rng(quirks, StdRng::seed_from_u64(seed))
    }

    fn with_rng(quirks: Quirks, rng: StdRng) -> Self {
        Self {
            memory: Memory::new(),
            history: History::new(MachineState::new()),
            keypad: Keypad::new(),
            rng,
            quirks,
            paused: false,
            stepped: false,
        }
    }

    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), LoadError> {
        self.memory.load_program(rom)?;
        self.reset();
        Ok(())
    }

    /// Back to the state right after the last load. Pause is left as is.
    pub fn reset(&mut self) {
        self.memory.reset();
        self.history.reset(MachineState::new());
        self.keypad.release_wait();
        self.stepped = false;
        info!("Reset interpreter [paused: {}]", self.paused);
    }

    /// Runs one cycle unless paused.
    pub fn execute_clock_cycle(&mut self) {
        if self.paused {
            return;
        }
        self.step();
    }

    /// Ticks both timers of the state on show. While paused this only
    /// happens if a single step was taken since the last tick.
    pub fn decrement_timers(&mut self) {
        let stepped = std::mem::take(&mut self.stepped);
        if self.paused && !stepped {
            return;
        }

        let state = self.history.current_mut();
        state.dt = state.dt.saturating_sub(1);
        state.st = state.st.saturating_sub(1);
    }

    pub fn toggle_paused(&mut self) {
        self.paused = !self.paused;
        info!("Toggled pause [paused: {}]", self.paused);
    }

    /// Single step while paused; does nothing while running.
    pub fn advance_one_clock_cycle(&mut self) {
        if !self.paused {
            return;
        }
        self.stepped = true;
        self.step();
    }

    /// Rewinds one state while paused. Returns false when nothing moved.
    pub fn back_one_clock_cycle(&mut self) -> bool {
        if !self.paused {
            return false;
        }
        self.history.step_back()
    }

    /// Offers a key press to a pending `LD Vx, K`.
    pub fn key_pressed(&mut self, key: u8) {
        self.keypad.press(key);
    }

    pub fn set_key_held(&mut self, key: u8, down: bool) {
        self.keypad.set_held(key, down);
    }

    fn step(&mut self) {
        if self.history.step_forward() {
            return;
        }

        let mut next = *self.history.current();
        let pc = next.pc;
        let word = self.memory.read_word(pc);
        if word == 0 {
            trace!("Idle on blank memory at {pc:#05X}");
            return;
        }

        let inst = Instruction::from(word);
        let mut ctx = Context {
            memory: &mut self.memory,
            keypad: &mut self.keypad,
            rng: &mut self.rng,
            quirks: self.quirks,
        };
        match next.execute(inst, &mut ctx) {
            Update::Changed => {
                debug!("Processing instruction [{:?}] {:#05X}: {}", inst, pc, inst);
                self.history.commit(next);
            }
            Update::Unchanged => trace!("No update from [{:?}] at {:#05X}", inst, pc),
        }
    }

    pub fn state(&self) -> &MachineState {
        self.history.current()
    }

    pub fn history(&self) -> &History<MachineState> {
        &self.history
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.state().display
    }

    pub fn program_counter(&self) -> u16 {
        self.state().pc
    }

    pub fn index(&self) -> u16 {
        self.state().ir
    }

    pub fn register(&self, index: usize) -> Option<u8> {
        self.state().register(index)
    }

    pub fn delay_timer(&self) -> u8 {
        self.state().dt
    }

    pub fn sound_timer(&self) -> u8 {
        self.state().st
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_waiting_for_key(&self) -> bool {
        self.keypad.is_waiting()
    }

    pub fn quirks(&self) -> Quirks {
        self.quirks
    }

    /// Disassembles `radius` words either side of the program counter.
    pub fn disassemble_around(&self, radius: u16) -> Vec<Disassembly> {
        let pc = self.program_counter();
        let span = radius.saturating_mul(2);
        let start = pc.saturating_sub(span);
        let end = pc.saturating_add(span).min(MEMORY_SIZE as u16 - 2);
        (start..=end)
            .step_by(2)
            .map(|addr| {
                let word = self.memory.read_word(addr);
                Disassembly {
                    addr,
                    word,
                    text: Instruction::from(word).to_string(),
                    is_pc: addr == pc,
                }
            })
            .collect()
    }
}
