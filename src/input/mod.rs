//! Pointer input mode state machine
//!
//! The compositor is always in exactly one [`InputMode`]. `Normal` hit-tests
//! every motion event; `Move` and `Resize` hold the grab captured when the
//! host started a drag and ignore what is under the pointer until the button
//! is released. Transitions consume the current mode and return the next one.

use crate::geometry::{Edges, Point, Rect};
use crate::view::{Region, ViewId};
use log::{debug, trace};
use std::fmt;

/// Grab state for an interactive move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveGrab {
    pub view: ViewId,
    /// Pointer position relative to the view origin when the grab started.
    pub offset: Point<f64>,
}

impl MoveGrab {
    pub fn new(view: ViewId, view_position: Point<i32>, pointer: Point<f64>) -> Self {
        Self {
            view,
            offset: pointer - view_position.to_f64(),
        }
    }

    /// View position that keeps the grab offset under `pointer`. Unbounded,
    /// views may be dragged off screen.
    pub fn position_for(&self, pointer: Point<f64>) -> Point<i32> {
        (pointer - self.offset).floor()
    }
}

/// Grab state for an interactive resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeGrab {
    pub view: ViewId,
    pub edges: Edges,
    pub pointer_start: Point<f64>,
    /// View geometry when the grab started.
    pub origin: Point<i32>,
    pub size: Point<i32>,
}

impl ResizeGrab {
    /// New geometry after the pointer moved to `pointer`.
    ///
    /// Grabbed min-side edges move the origin and keep the opposite edge in
    /// place, max-side edges only change the size. Width and height never
    /// drop below `min_size`; on a min-side edge the clamp is taken out of
    /// the origin so the opposite edge still stays fixed.
    pub fn geometry_for(&self, pointer: Point<f64>, min_size: i32) -> Rect<i32> {
        let d = (pointer - self.pointer_start).floor();
        let mut min = self.origin;
        let mut max = self.origin + self.size;

        if self.edges.contains(Edges::LEFT) {
            min.x += d.x;
        } else if self.edges.contains(Edges::RIGHT) {
            max.x += d.x;
        }
        if self.edges.contains(Edges::TOP) {
            min.y += d.y;
        } else if self.edges.contains(Edges::BOTTOM) {
            max.y += d.y;
        }

        if max.x - min.x < min_size {
            if self.edges.contains(Edges::LEFT) {
                min.x = max.x - min_size;
            } else {
                max.x = min.x + min_size;
            }
        }
        if max.y - min.y < min_size {
            if self.edges.contains(Edges::TOP) {
                min.y = max.y - min_size;
            } else {
                max.y = min.y + min_size;
            }
        }
        Rect::new(min, max)
    }
}

/// What a grab wants done to its view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GrabUpdate {
    Move { view: ViewId, position: Point<i32> },
    Resize { view: ViewId, geometry: Rect<i32> },
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Move(MoveGrab),
    Resize(ResizeGrab),
}

impl InputMode {
    pub fn begin_move(view: ViewId, view_position: Point<i32>, pointer: Point<f64>) -> Self {
        let grab = MoveGrab::new(view, view_position, pointer);
        debug!("Entering move mode for {:?} (offset {})", view, grab.offset);
        InputMode::Move(grab)
    }

    pub fn begin_resize(
        view: ViewId,
        edges: Edges,
        geometry: Rect<i32>,
        pointer: Point<f64>,
    ) -> Self {
        debug!("Entering resize mode for {:?} ({:?})", view, edges);
        InputMode::Resize(ResizeGrab {
            view,
            edges,
            pointer_start: pointer,
            origin: geometry.min,
            size: geometry.size(),
        })
    }

    pub fn is_normal(&self) -> bool {
        matches!(self, InputMode::Normal)
    }

    pub fn grabbed_view(&self) -> Option<ViewId> {
        match self {
            InputMode::Normal => None,
            InputMode::Move(grab) => Some(grab.view),
            InputMode::Resize(grab) => Some(grab.view),
        }
    }

    /// Icon forced for the whole grab, `None` when the icon follows the
    /// region under the pointer.
    pub fn cursor_icon(&self) -> Option<&'static str> {
        match self {
            InputMode::Normal => None,
            InputMode::Move(_) => Some("grabbing"),
            InputMode::Resize(grab) => Some(Region::from_edges(grab.edges).cursor_name()),
        }
    }

    /// Update for the grabbed view, `None` in normal mode.
    pub fn on_motion(&self, pointer: Point<f64>, min_size: i32) -> Option<GrabUpdate> {
        let update = match self {
            InputMode::Normal => return None,
            InputMode::Move(grab) => GrabUpdate::Move {
                view: grab.view,
                position: grab.position_for(pointer),
            },
            InputMode::Resize(grab) => GrabUpdate::Resize {
                view: grab.view,
                geometry: grab.geometry_for(pointer, min_size),
            },
        };
        trace!("{} grab -> {:?}", self, update);
        Some(update)
    }

    /// Grabs are only entered while a button is held, so a press during one
    /// means the event source is broken.
    pub fn on_press(&self) {
        if !self.is_normal() {
            panic!(
                "button press while in {} mode for {:?}: a grab is only entered with a button held",
                self,
                self.grabbed_view()
            );
        }
    }

    /// Ends any grab. Returns the next mode and the final geometry to commit.
    pub fn on_release(self, pointer: Point<f64>, min_size: i32) -> (InputMode, Option<GrabUpdate>) {
        let last = self.on_motion(pointer, min_size);
        if !self.is_normal() {
            debug!("Leaving {} mode", self);
        }
        (InputMode::Normal, last)
    }
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InputMode::Normal => "normal",
            InputMode::Move(_) => "move",
            InputMode::Resize(_) => "resize",
        })
    }
}
