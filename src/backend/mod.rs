//! Collaborator interfaces
//!
//! The policy core never talks to Wayland, GPUs or input devices directly.
//! Everything it needs from the outside world goes through the traits in this
//! module:
//!
//! - [`Shell`]: client surfaces (size, sub-surface geometry, input probe,
//!   configure/activate, pointer event delivery)
//! - [`Cursor`]: pointer position and cursor icon
//! - [`Renderer`]: solid and textured rectangles into the current frame
//! - [`TextureSource`]: turns label text into a texture
//!
//! [`headless`] implements `Shell` and `Cursor` in memory, [`pixmap`]
//! implements `Renderer` and `TextureSource` on the CPU.

pub mod headless;
pub mod pixmap;

use crate::error::RenderError;
use crate::geometry::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Handle to a client surface owned by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u64);

/// Opaque handle to a texture owned by a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Texture {
    pub id: u64,
    pub size: Point<i32>,
}

/// Orientation applied when a texture is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transform {
    #[default]
    Normal,
    FlipX,
    FlipY,
    Rotate180,
}

/// 8-bit RGBA colour, written as `#RRGGBB` or `#RRGGBBAA` in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl FromStr for Color {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let hex = s.trim_start_matches('#');
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            anyhow::bail!("Invalid color '{}': expected #RRGGBB or #RRGGBBAA", s);
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| anyhow::anyhow!("Invalid color '{}': bad hex digits", s))
        };
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Color::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

impl TryFrom<String> for Color {
    type Error = anyhow::Error;

    fn try_from(s: String) -> anyhow::Result<Self> {
        s.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> String {
        c.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Foreground/background pair used to rasterize label text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextStyle {
    pub fg: Color,
    pub bg: Color,
}

/// Pointer button as reported by the input backend (evdev codes).
pub type Button = u32;

pub const BTN_LEFT: Button = 0x110;

/// Client surfaces as seen by the policy core.
pub trait Shell {
    /// Current committed size of the surface's main buffer.
    fn surface_size(&self, surface: SurfaceId) -> Point<i32>;

    /// Geometry of the surface and all of its sub-surfaces, in
    /// surface-local coordinates.
    fn surface_rects(&self, surface: SurfaceId) -> Vec<Rect<i32>>;

    /// Whether the surface takes pointer input at a surface-local point.
    /// Surfaces may be non-rectangular or have input holes.
    fn accepts_input(&self, surface: SurfaceId, local: Point<i32>) -> bool;

    /// Texture holding the surface's current contents, if any.
    fn surface_texture(&self, surface: SurfaceId) -> Option<Texture>;

    fn set_size(&mut self, surface: SurfaceId, size: Point<i32>);
    fn set_activated(&mut self, surface: SurfaceId, activated: bool);

    fn pointer_enter(&mut self, surface: SurfaceId, local: Point<f64>, time: u32);
    fn pointer_motion(&mut self, surface: SurfaceId, local: Point<f64>, time: u32);
    fn pointer_button(&mut self, surface: SurfaceId, time: u32, button: Button, pressed: bool);
}

pub trait Cursor {
    fn position(&self) -> Point<f64>;
    fn set_icon(&mut self, name: &str);
}

/// Draws into the frame currently being built.
pub trait Renderer {
    fn output_size(&self) -> Point<i32>;
    fn clear(&mut self, color: Color);
    fn draw_solid(&mut self, dst: Rect<i32>, color: Color);
    fn draw_texture(
        &mut self,
        texture: &Texture,
        dst: Rect<i32>,
        transform: Transform,
    ) -> Result<(), RenderError>;
}

pub trait TextureSource {
    fn text_texture(&mut self, text: &str, style: &TextStyle) -> Result<Texture, RenderError>;

    /// Hands back a texture obtained from [`TextureSource::text_texture`].
    /// Each call balances exactly one earlier `text_texture` call.
    fn release_text(&mut self, texture: Texture);
}
