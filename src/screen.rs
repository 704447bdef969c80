use log::info;
use pixels::{Pixels, SurfaceTexture};
use std::error::Error;
use winit::dpi::LogicalSize;
use winit::event_loop::EventLoop;
use winit::window::{Window, WindowBuilder};

use crate::display::{FrameBuffer, HEIGHT, WIDTH};

const SCALE: f64 = 10.0;
const TITLE: &str = "CHIP-8";

const PIXEL_ON: [u8; 4] = [0x33, 0xFF, 0x66, 0xFF];
const PIXEL_OFF: [u8; 4] = [0x00, 0x00, 0x00, 0xFF];

/// A window that shows the frame buffer of the state on display.
pub struct Screen {
    window: Window,
    pixels: Pixels,
    status: String,
}

impl Screen {
    pub fn new(event_loop: &EventLoop<()>) -> Result<Self, Box<dyn Error>> {
        let window = {
            let size = LogicalSize::new(WIDTH as u32, HEIGHT as u32);
            let scaled_size = LogicalSize::new(WIDTH as f64 * SCALE, HEIGHT as f64 * SCALE);
            WindowBuilder::new()
                .with_title(TITLE)
                .with_inner_size(scaled_size)
                .with_min_inner_size(size)
                .build(event_loop)?
        };

        let pixels = {
            let size = window.inner_size();
            let texture = SurfaceTexture::new(size.width, size.height, &window);
            Pixels::new(WIDTH as u32, HEIGHT as u32, texture)?
        };

        info!("Attached display [success: true]");
        Ok(Self {
            window,
            pixels,
            status: String::new(),
        })
    }

    pub fn render(&mut self, frame_buffer: &FrameBuffer) -> Result<(), pixels::Error> {
        let frame = self.pixels.get_frame_mut();
        for (pixel, lit) in frame.chunks_exact_mut(4).zip(frame_buffer.pixels()) {
            pixel.copy_from_slice(if lit { &PIXEL_ON } else { &PIXEL_OFF });
        }
        self.pixels.render()
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }

    /// Shows a one-line status in the title bar; unchanged text is skipped.
    pub fn set_status(&mut self, status: String) {
        if status == self.status {
            return;
        }
        self.window.set_title(&format!("{TITLE} - {status}"));
        self.status = status;
    }
}
