//! SDL2 window, presentation and input.
//!
//! SDL2 is used only for the window, the streaming texture and the event
//! pump. The frame is rendered on the CPU at an internal resolution and
//! stretched to the window on present, so the render cost is decoupled
//! from the display size.

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;

pub const FPS: u64 = 60;
pub const FRAME_TARGET_TIME: f64 = 1000.0 / FPS as f64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    None,
    Quit,
    Resize(u32, u32),
}

/// Held-key and mouse state consumed by the camera controller each frame.
///
/// Movement flags track held keys; `mouse_delta` and the pipeline
/// selection flags are one-shot and reset on every poll.
#[derive(Debug, Default, Clone, Copy)]
pub struct InputState {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub mouse_delta: (i32, i32),
    pub select_raster: bool,
    pub select_raycast: bool,
}

pub struct FrameLimiter {
    previous_frame_time: u64,
}

impl FrameLimiter {
    pub fn new(window: &Window) -> Self {
        Self {
            previous_frame_time: window.timer().ticks64(),
        }
    }

    /// Waits if necessary to maintain frame rate and returns the delta time in milliseconds.
    /// Delta time represents the time elapsed since the last call to this method.
    pub fn wait_and_get_delta(&mut self, window: &Window) -> u64 {
        let mut current_time = window.timer().ticks64();
        let mut delta_time = current_time - self.previous_frame_time;

        if delta_time < FRAME_TARGET_TIME as u64 {
            let time_to_wait = (FRAME_TARGET_TIME as u64) - delta_time;
            std::thread::sleep(std::time::Duration::from_millis(time_to_wait));
            current_time = window.timer().ticks64();
            delta_time = current_time - self.previous_frame_time;
        }

        self.previous_frame_time = current_time;
        delta_time
    }
}

pub struct Window {
    canvas: sdl2::render::Canvas<sdl2::video::Window>,
    texture_creator: Box<sdl2::render::TextureCreator<sdl2::video::WindowContext>>,
    texture: sdl2::render::Texture<'static>,
    event_pump: sdl2::EventPump,
    timer_subsystem: sdl2::TimerSubsystem,
    internal_width: u32,
    internal_height: u32,
}

impl Window {
    pub fn new(
        title: &str,
        width: u32,
        height: u32,
        internal_width: u32,
        internal_height: u32,
    ) -> Result<Self, String> {
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;
        let timer_subsystem = sdl_context.timer()?;

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .resizable()
            .build()
            .map_err(|e| e.to_string())?;

        let canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
        let texture_creator = Box::new(canvas.texture_creator());
        let event_pump = sdl_context.event_pump()?;

        sdl_context.mouse().set_relative_mouse_mode(true);

        // SAFETY: texture_creator is heap-allocated and lives as long as Window.
        // We ensure texture is dropped before texture_creator by struct field order.
        let texture_creator_ref: &'static sdl2::render::TextureCreator<sdl2::video::WindowContext> =
            unsafe { &*(texture_creator.as_ref() as *const _) };
        let texture = texture_creator_ref
            .create_texture_streaming(PixelFormatEnum::ARGB8888, internal_width, internal_height)
            .map_err(|e| e.to_string())?;

        Ok(Self {
            canvas,
            texture_creator,
            texture,
            event_pump,
            timer_subsystem,
            internal_width,
            internal_height,
        })
    }

    /// Drains pending events, updating held-key state as it goes.
    ///
    /// Quit takes precedence over everything else; the last resize wins.
    pub fn poll_events(&mut self, input: &mut InputState) -> WindowEvent {
        input.mouse_delta = (0, 0);
        input.select_raster = false;
        input.select_raycast = false;

        let mut result = WindowEvent::None;
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => return WindowEvent::Quit,
                Event::Window {
                    win_event: sdl2::event::WindowEvent::Resized(w, h),
                    ..
                } => result = WindowEvent::Resize(w as u32, h as u32),
                Event::KeyDown {
                    keycode: Some(key), ..
                } => match key {
                    Keycode::W => input.forward = true,
                    Keycode::S => input.back = true,
                    Keycode::A => input.left = true,
                    Keycode::D => input.right = true,
                    Keycode::Space => input.up = true,
                    Keycode::LShift => input.down = true,
                    Keycode::Num1 => input.select_raster = true,
                    Keycode::Num2 => input.select_raycast = true,
                    _ => {}
                },
                Event::KeyUp {
                    keycode: Some(key), ..
                } => match key {
                    Keycode::W => input.forward = false,
                    Keycode::S => input.back = false,
                    Keycode::A => input.left = false,
                    Keycode::D => input.right = false,
                    Keycode::Space => input.up = false,
                    Keycode::LShift => input.down = false,
                    _ => {}
                },
                Event::MouseMotion { xrel, yrel, .. } => {
                    input.mouse_delta.0 += xrel;
                    input.mouse_delta.1 += yrel;
                }
                _ => {}
            }
        }
        result
    }

    /// Uploads an ARGB8888 frame at the internal resolution and stretches
    /// it to the whole window.
    pub fn present(&mut self, buffer: &[u8]) -> Result<(), String> {
        self.texture
            .update(None, buffer, (self.internal_width * 4) as usize)
            .map_err(|e| e.to_string())?;

        self.canvas.clear();
        self.canvas.copy(&self.texture, None, None)?;
        self.canvas.present();
        Ok(())
    }

    /// Recreates the streaming texture at a new internal resolution.
    pub fn set_internal_size(&mut self, width: u32, height: u32) -> Result<(), String> {
        self.internal_width = width;
        self.internal_height = height;
        // SAFETY: Same as in new() - texture_creator outlives texture
        let texture_creator_ref: &'static sdl2::render::TextureCreator<sdl2::video::WindowContext> =
            unsafe { &*(self.texture_creator.as_ref() as *const _) };
        self.texture = texture_creator_ref
            .create_texture_streaming(PixelFormatEnum::ARGB8888, width, height)
            .map_err(|e| e.to_string())?;
        Ok(())
    }

    pub fn internal_width(&self) -> u32 {
        self.internal_width
    }

    pub fn internal_height(&self) -> u32 {
        self.internal_height
    }

    pub fn timer(&self) -> &sdl2::TimerSubsystem {
        &self.timer_subsystem
    }
}
