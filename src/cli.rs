use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{debug, error, info};
use std::error::Error;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use winit::event::{Event, VirtualKeyCode};
use winit::event_loop::{ControlFlow, EventLoop};
use winit_input_helper::WinitInputHelper;

use crate::input::KEYMAP;
use crate::instruction::Instruction;
use crate::interpreter::Interpreter;
use crate::memory::DEFAULT_PROGRAM;
use crate::quirks::Quirks;
use crate::screen::Screen;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity of debug logging
    #[arg(short, long, value_enum, global = true)]
    debug: Option<DebugMode>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a ROM in a window
    Run(RunArgs),
    /// Write a disassembly listing of a ROM
    Disassemble {
        /// The path to the ROM
        path: PathBuf,

        /// Where to output the disassembled ROM
        #[arg(short, long)]
        output_file: Option<PathBuf>,
    },
}

#[derive(Args)]
pub struct RunArgs {
    /// The path to the ROM; the built-in demo runs when omitted
    pub path: Option<PathBuf>,

    /// Instructions executed per second
    #[arg(long, default_value_t = 500, value_parser = clap::value_parser!(u32).range(1..))]
    pub hz: u32,

    /// Frames drawn per second; timers tick once per frame
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..))]
    pub fps: u32,

    /// SHR/SHL copy Vy into Vx before shifting
    #[arg(long)]
    pub shift_vy: bool,

    /// LD [I], Vx and LD Vx, [I] advance I past the last register
    #[arg(long)]
    pub increment_i: bool,

    /// Seed for RND, for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Start paused
    #[arg(long)]
    pub paused: bool,
}

impl RunArgs {
    pub fn quirks(&self) -> Quirks {
        Quirks {
            shift_uses_vy: self.shift_vy,
            increment_index: self.increment_i,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
enum DebugMode {
    Info,
    Debug,
    Trace,
    Error,
}

impl ToString for DebugMode {
    fn to_string(&self) -> String {
        match self {
            Self::Info => "info".into(),
            Self::Debug => "debug".into(),
            Self::Trace => "trace".into(),
            Self::Error => "error".into(),
        }
    }
}

pub fn init() -> Cli {
    let cli = Cli::parse();
    std::env::set_var(
        "RUST_LOG",
        format!(
            "chip8_rewind={}",
            cli.debug.unwrap_or(DebugMode::Error).to_string()
        ),
    );

    env_logger::init();

    cli
}

/// Splits `hz` cycles across `fps` frames, giving the remainder to the last
/// frame of each second. Also measures the rates actually achieved.
#[derive(Debug, Clone)]
pub struct Pacer {
    hz: u32,
    fps: u32,
    frame: u32,
    window_start: Instant,
    window_cycles: u32,
    window_frames: u32,
    measured_hz: u32,
    measured_fps: u32,
}

impl Pacer {
    pub fn new(hz: u32, fps: u32, now: Instant) -> Self {
        Self {
            hz,
            fps: fps.max(1),
            frame: 0,
            window_start: now,
            window_cycles: 0,
            window_frames: 0,
            measured_hz: 0,
            measured_fps: 0,
        }
    }

    /// Counts a finished frame that ran `cycles` clock cycles. Once a second
    /// has passed the counts become the measured rates.
    pub fn record(&mut self, now: Instant, cycles: u32) {
        self.window_cycles += cycles;
        self.window_frames += 1;
        if now.duration_since(self.window_start) >= Duration::from_secs(1) {
            self.measured_hz = self.window_cycles;
            self.measured_fps = self.window_frames;
            self.window_cycles = 0;
            self.window_frames = 0;
            self.window_start = now;
        }
    }

    /// Cycles and frames completed over the last full second.
    pub fn measured(&self) -> (u32, u32) {
        (self.measured_hz, self.measured_fps)
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs(1) / self.fps
    }

    /// Cycles to run this frame.
    pub fn next_frame(&mut self) -> u32 {
        let base = self.hz / self.fps;
        let cycles = if self.frame == self.fps - 1 {
            self.hz - base * (self.fps - 1)
        } else {
            base
        };
        self.frame = (self.frame + 1) % self.fps;
        cycles
    }
}

const MEMORY_VIEW_RADIUS: u16 = 10;

fn status(interpreter: &Interpreter, pacer: &Pacer) -> String {
    let history = interpreter.history();
    let (hz, fps) = pacer.measured();
    format!(
        "{} | state {}/{} | {} Hz | {} FPS | PC {:#05X}",
        if interpreter.is_paused() { "PAUSED" } else { "RUNNING" },
        history.depth() - history.behind(),
        history.capacity(),
        hz,
        fps,
        interpreter.program_counter(),
    )
}

fn log_registers(interpreter: &Interpreter) {
    let state = interpreter.state();
    debug!(
        "PC = {:#05X} I = {:#05X} DT = {:#04X} ST = {:#04X} V = {:02X?}",
        state.pc, state.ir, state.dt, state.st, &state.v[..]
    );
    for line in interpreter.disassemble_around(MEMORY_VIEW_RADIUS) {
        debug!("{line}");
    }
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn Error>> {
    let (name, rom) = match &args.path {
        Some(path) => (path.display().to_string(), fs::read(path)?),
        None => ("built-in demo".to_string(), DEFAULT_PROGRAM.to_vec()),
    };
    let mut interpreter = match args.seed {
        Some(seed) => Interpreter::with_seed(args.quirks(), seed),
        None => Interpreter::new(args.quirks()),
    };
    interpreter.load_rom(&rom)?;
    if args.paused {
        interpreter.toggle_paused();
    }
    info!(
        "Running {} [hz: {}] [fps: {}] [quirks: {:?}]",
        name,
        args.hz,
        args.fps,
        interpreter.quirks()
    );

    let event_loop = EventLoop::new();
    let mut screen = Screen::new(&event_loop)?;
    let mut input = WinitInputHelper::new();
    let mut next_frame = Instant::now();
    let mut pacer = Pacer::new(args.hz, args.fps, next_frame);

    event_loop.run(move |event, _, control_flow| {
        if let Event::RedrawRequested(_) = event {
            if let Err(e) = screen.render(interpreter.frame_buffer()) {
                error!("Render failed: {e}");
                *control_flow = ControlFlow::Exit;
                return;
            }
        }

        if !input.update(&event) {
            return;
        }

        if input.key_pressed(VirtualKeyCode::Escape) || input.quit() {
            *control_flow = ControlFlow::Exit;
            return;
        }

        if input.key_pressed(VirtualKeyCode::P) {
            interpreter.toggle_paused();
        }
        if input.key_pressed(VirtualKeyCode::Right) {
            interpreter.advance_one_clock_cycle();
            log_registers(&interpreter);
        }
        if input.key_pressed(VirtualKeyCode::Left) && interpreter.back_one_clock_cycle() {
            log_registers(&interpreter);
        }
        if input.key_pressed(VirtualKeyCode::Back) {
            interpreter.reset();
        }
        for (key, value) in KEYMAP.iter() {
            interpreter.set_key_held(*value, input.key_held(*key));
            if input.key_pressed(*key) {
                interpreter.key_pressed(*value);
            }
        }

        let now = Instant::now();
        if now >= next_frame {
            let cycles = pacer.next_frame();
            let ran = if interpreter.is_paused() { 0 } else { cycles };
            for _ in 0..cycles {
                interpreter.execute_clock_cycle();
            }
            interpreter.decrement_timers();
            pacer.record(now, ran);
            screen.set_status(status(&interpreter, &pacer));
            screen.request_redraw();

            next_frame += pacer.frame_duration();
            if next_frame < now {
                // fell behind; don't try to catch up
                next_frame = now + pacer.frame_duration();
            }
        }
        *control_flow = ControlFlow::WaitUntil(next_frame);
    })
}

/// Writes one `ADDR  WORD  MNEMONIC` line per word of the ROM.
pub fn write_listing(out: &mut impl Write, name: &Path, rom: &[u8]) -> std::io::Result<()> {
    writeln!(out, "== {} ==", name.display())?;
    for (n, chunk) in rom.chunks(2).enumerate() {
        let word = u16::from_be_bytes([chunk[0], chunk.get(1).copied().unwrap_or(0)]);
        let inst = Instruction::from(word);
        let addr = crate::memory::PROGRAM_OFFSET + n * 2;
        writeln!(out, "{:03X}  {:?}  {}", addr, inst, inst)?;
    }
    Ok(())
}

pub fn disassemble(path: &Path, output_file: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    if let Some(mut f) = output_file.clone() {
        if f.extension().is_none() {
            return Err(format!("{} is not a file", f.display()).into());
        }
        f.pop();
        if !f.as_os_str().is_empty() {
            fs::create_dir_all(f)?;
        }
    }

    let output = output_file.unwrap_or(PathBuf::from("output.txt"));
    let mut file = fs::File::create(&output)?;
    let rom = fs::read(path)?;

    write_listing(&mut file, path, &rom)?;
    file.flush()?;

    info!("Wrote disassembled ROM to {}", output.display());

    Ok(())
}
