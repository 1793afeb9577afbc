//! In-memory shell and cursor
//!
//! Stands in for real clients when running without a display server: the
//! binary uses it to drive demo views and the tests use it to observe what
//! the policy core asked of its collaborators. Surfaces commit any requested
//! size immediately.

use super::{Button, Cursor, Shell, SurfaceId, Texture};
use crate::geometry::{Point, Rect};
use log::trace;
use std::collections::HashMap;

/// Requests delivered to headless surfaces, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellEvent {
    Enter {
        surface: SurfaceId,
        local: Point<f64>,
    },
    Motion {
        surface: SurfaceId,
        local: Point<f64>,
    },
    Button {
        surface: SurfaceId,
        button: Button,
        pressed: bool,
    },
    Resized {
        surface: SurfaceId,
        size: Point<i32>,
    },
    Activated {
        surface: SurfaceId,
        activated: bool,
    },
}

#[derive(Debug, Clone, Default)]
struct HeadlessSurface {
    size: Point<i32>,
    subsurfaces: Vec<Rect<i32>>,
    holes: Vec<Rect<i32>>,
    texture: Option<Texture>,
    activated: bool,
}

#[derive(Debug, Default)]
pub struct HeadlessShell {
    surfaces: HashMap<SurfaceId, HeadlessSurface>,
    next_id: u64,
    events: Vec<ShellEvent>,
}

impl HeadlessShell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_surface(&mut self, size: Point<i32>) -> SurfaceId {
        self.next_id += 1;
        let id = SurfaceId(self.next_id);
        self.surfaces.insert(
            id,
            HeadlessSurface {
                size,
                ..HeadlessSurface::default()
            },
        );
        id
    }

    pub fn destroy_surface(&mut self, surface: SurfaceId) -> bool {
        self.surfaces.remove(&surface).is_some()
    }

    /// Adds a sub-surface, in coordinates local to the parent surface.
    pub fn add_subsurface(&mut self, surface: SurfaceId, rect: Rect<i32>) {
        if let Some(s) = self.surfaces.get_mut(&surface) {
            s.subsurfaces.push(rect);
        }
    }

    /// Marks a surface-local area as not accepting pointer input.
    pub fn add_hole(&mut self, surface: SurfaceId, rect: Rect<i32>) {
        if let Some(s) = self.surfaces.get_mut(&surface) {
            s.holes.push(rect);
        }
    }

    pub fn set_texture(&mut self, surface: SurfaceId, texture: Texture) {
        if let Some(s) = self.surfaces.get_mut(&surface) {
            s.texture = Some(texture);
        }
    }

    pub fn is_activated(&self, surface: SurfaceId) -> bool {
        self.surfaces.get(&surface).map_or(false, |s| s.activated)
    }

    pub fn events(&self) -> &[ShellEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<ShellEvent> {
        std::mem::take(&mut self.events)
    }

    fn record(&mut self, event: ShellEvent) {
        trace!("Headless shell: {:?}", event);
        self.events.push(event);
    }
}

impl Shell for HeadlessShell {
    fn surface_size(&self, surface: SurfaceId) -> Point<i32> {
        self.surfaces
            .get(&surface)
            .map(|s| s.size)
            .unwrap_or_default()
    }

    fn surface_rects(&self, surface: SurfaceId) -> Vec<Rect<i32>> {
        match self.surfaces.get(&surface) {
            Some(s) => std::iter::once(Rect::from_size(s.size))
                .chain(s.subsurfaces.iter().copied())
                .collect(),
            None => Vec::new(),
        }
    }

    fn accepts_input(&self, surface: SurfaceId, local: Point<i32>) -> bool {
        let Some(s) = self.surfaces.get(&surface) else {
            return false;
        };
        let inside = Rect::from_size(s.size).contains(local)
            || s.subsurfaces.iter().any(|r| r.contains(local));
        inside && !s.holes.iter().any(|r| r.contains(local))
    }

    fn surface_texture(&self, surface: SurfaceId) -> Option<Texture> {
        self.surfaces.get(&surface).and_then(|s| s.texture)
    }

    fn set_size(&mut self, surface: SurfaceId, size: Point<i32>) {
        if let Some(s) = self.surfaces.get_mut(&surface) {
            s.size = size;
            self.record(ShellEvent::Resized { surface, size });
        }
    }

    fn set_activated(&mut self, surface: SurfaceId, activated: bool) {
        if let Some(s) = self.surfaces.get_mut(&surface) {
            s.activated = activated;
            self.record(ShellEvent::Activated { surface, activated });
        }
    }

    fn pointer_enter(&mut self, surface: SurfaceId, local: Point<f64>, _time: u32) {
        self.record(ShellEvent::Enter { surface, local });
    }

    fn pointer_motion(&mut self, surface: SurfaceId, local: Point<f64>, _time: u32) {
        self.record(ShellEvent::Motion { surface, local });
    }

    fn pointer_button(&mut self, surface: SurfaceId, _time: u32, button: Button, pressed: bool) {
        self.record(ShellEvent::Button {
            surface,
            button,
            pressed,
        });
    }
}

/// Pointer that only moves when told to.
#[derive(Debug, Clone)]
pub struct HeadlessCursor {
    position: Point<f64>,
    icon: String,
}

impl HeadlessCursor {
    pub fn new() -> Self {
        Self {
            position: Point::zero(),
            icon: String::from("left_ptr"),
        }
    }

    pub fn warp_to(&mut self, position: Point<f64>) {
        self.position = position;
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }
}

impl Default for HeadlessCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl Cursor for HeadlessCursor {
    fn position(&self) -> Point<f64> {
        self.position
    }

    fn set_icon(&mut self, name: &str) {
        if self.icon != name {
            trace!("Cursor icon -> {}", name);
            self.icon = name.to_string();
        }
    }
}
