//! # Trellis Window Management Library
//!
//! The policy core of a Wayland compositor: where windows go, what the
//! pointer is over, and how interactive moves and resizes behave. Protocol
//! handling, GPU work and input devices live behind the collaborator traits
//! in [`backend`].
//!
//! ## Architecture
//!
//! - `geometry`: integer/float points and half-open rectangles
//! - `tiling`: pure tiling strategies over a bounds rectangle
//! - `widget`: measure/position/render layout tree for on-screen UI
//! - `menu`: pop-up menus built from widgets
//! - `view`: managed windows, stacking order and pointer hit testing
//! - `input`: the Normal/Move/Resize pointer state machine
//! - `bar`: status bar
//! - `compositor`: the context object tying all of the above together
//! - `config`: configuration parsing and validation
//! - `backend`: collaborator traits plus headless and CPU implementations
//!
//! ## Usage
//!
//! ```rust,no_run
//! use trellis::backend::headless::{HeadlessCursor, HeadlessShell};
//! use trellis::backend::pixmap::PixmapRenderer;
//! use trellis::{Compositor, Point, TrellisConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = TrellisConfig::default();
//!     let size = Point::new(config.output.width, config.output.height);
//!     let mut target = PixmapRenderer::new(size, config.font.metrics())?;
//!     let mut compositor = Compositor::new(config, HeadlessShell::new(), HeadlessCursor::new());
//!
//!     let surface = compositor.shell_mut().create_surface(Point::new(640, 480));
//!     compositor.map_view(surface, "terminal");
//!     compositor.tile();
//!     compositor.on_frame(&mut target, 0);
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod bar;
pub mod compositor;
pub mod config;
pub mod error;
pub mod geometry;
pub mod input;
pub mod menu;
pub mod tiling;
pub mod view;
pub mod widget;

// Re-export main types for easy access
pub use compositor::Compositor;
pub use config::TrellisConfig;
pub use error::RenderError;
pub use geometry::{rt, Edges, Point, Rect};
pub use input::InputMode;
pub use menu::{Menu, MenuItem};
pub use tiling::Tiling;
pub use view::{Region, ViewId, ViewList};
pub use widget::Widget;

/// Version information for Trellis
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
