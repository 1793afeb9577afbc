//! Views and pointer hit testing
//!
//! A view is a managed client window: a screen position plus a surface owned
//! by the shell. Views live in a [`ViewList`] ordered bottom to top; the last
//! entry is the topmost one.
//!
//! Hit testing classifies a screen point against a view as either its surface
//! or one of eight border bands around the view's bounding box.

use crate::backend::{Shell, SurfaceId};
use crate::geometry::{Edges, Point, Rect};
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub id: ViewId,
    pub surface: SurfaceId,
    pub title: String,
    /// Top-left corner in screen space.
    pub position: Point<i32>,
    pub mapped: bool,
    pub activated: bool,
}

impl View {
    /// Union of the view's surface and sub-surfaces, in screen space.
    pub fn bounding_box(&self, shell: &dyn Shell) -> Rect<i32> {
        shell
            .surface_rects(self.surface)
            .into_iter()
            .fold(Rect::zero(), |acc, r| acc.union(r))
            .translate(self.position)
    }
}

/// Views in stacking order, bottom first.
#[derive(Debug, Default)]
pub struct ViewList {
    views: Vec<View>,
    next_id: u64,
}

impl ViewList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an unmapped view on top of the stack.
    pub fn add(&mut self, surface: SurfaceId, title: &str) -> ViewId {
        self.next_id += 1;
        let id = ViewId(self.next_id);
        self.views.push(View {
            id,
            surface,
            title: title.to_string(),
            position: Point::zero(),
            mapped: false,
            activated: false,
        });
        debug!("Created view {:?} for surface {:?}", id, surface);
        id
    }

    pub fn remove(&mut self, id: ViewId) -> Option<View> {
        let index = self.views.iter().position(|v| v.id == id)?;
        Some(self.views.remove(index))
    }

    pub fn get(&self, id: ViewId) -> Option<&View> {
        self.views.iter().find(|v| v.id == id)
    }

    pub fn get_mut(&mut self, id: ViewId) -> Option<&mut View> {
        self.views.iter_mut().find(|v| v.id == id)
    }

    pub fn by_surface(&self, surface: SurfaceId) -> Option<&View> {
        self.views.iter().find(|v| v.surface == surface)
    }

    /// Moves the view to the top of the stack. Returns false if unknown.
    pub fn raise(&mut self, id: ViewId) -> bool {
        match self.remove(id) {
            Some(view) => {
                self.views.push(view);
                true
            }
            None => false,
        }
    }

    /// Bottom to top.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &View> {
        self.views.iter()
    }

    /// Top to bottom, mapped views only.
    pub fn iter_topmost(&self) -> impl Iterator<Item = &View> {
        self.views.iter().rev().filter(|v| v.mapped)
    }

    pub fn topmost(&self) -> Option<&View> {
        self.iter_topmost().next()
    }

    /// The activated view, if any.
    pub fn focused(&self) -> Option<&View> {
        self.views.iter().rev().find(|v| v.activated)
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn mapped_count(&self) -> usize {
        self.views.iter().filter(|v| v.mapped).count()
    }
}

/// Where a point falls relative to a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    None = 0,
    SurfaceArea,
    BorderTop,
    BorderBottom,
    BorderLeft,
    BorderRight,
    BorderTopLeft,
    BorderTopRight,
    BorderBottomLeft,
    BorderBottomRight,
}

/// Cursor icon per region, indexed by `Region as usize`.
const CURSOR_NAMES: [&str; 10] = [
    "left_ptr",
    "left_ptr",
    "top_side",
    "bottom_side",
    "left_side",
    "right_side",
    "top_left_corner",
    "top_right_corner",
    "bottom_left_corner",
    "bottom_right_corner",
];

impl Region {
    pub fn cursor_name(self) -> &'static str {
        CURSOR_NAMES[self as usize]
    }

    pub fn is_border(self) -> bool {
        !matches!(self, Region::None | Region::SurfaceArea)
    }

    /// Edges a resize grab on this region moves.
    pub fn edges(self) -> Edges {
        match self {
            Region::None | Region::SurfaceArea => Edges::empty(),
            Region::BorderTop => Edges::TOP,
            Region::BorderBottom => Edges::BOTTOM,
            Region::BorderLeft => Edges::LEFT,
            Region::BorderRight => Edges::RIGHT,
            Region::BorderTopLeft => Edges::TOP | Edges::LEFT,
            Region::BorderTopRight => Edges::TOP | Edges::RIGHT,
            Region::BorderBottomLeft => Edges::BOTTOM | Edges::LEFT,
            Region::BorderBottomRight => Edges::BOTTOM | Edges::RIGHT,
        }
    }

    /// Border region for an edge set; anything that is not a single edge or
    /// an adjacent corner pair maps to `None`.
    pub fn from_edges(edges: Edges) -> Region {
        BORDER_ORDER
            .iter()
            .copied()
            .find(|r| r.edges() == edges)
            .unwrap_or(Region::None)
    }
}

/// Corners first, so they win where two edge bands overlap.
const BORDER_ORDER: [Region; 8] = [
    Region::BorderTopLeft,
    Region::BorderTopRight,
    Region::BorderBottomLeft,
    Region::BorderBottomRight,
    Region::BorderTop,
    Region::BorderBottom,
    Region::BorderLeft,
    Region::BorderRight,
];

fn border_band(region: Region, bb: Rect<i32>, thickness: i32) -> Rect<i32> {
    let outer = bb.inset(-thickness);
    let edges = region.edges();
    let (x0, x1) = if edges.contains(Edges::LEFT) {
        (outer.min.x, bb.min.x)
    } else if edges.contains(Edges::RIGHT) {
        (bb.max.x, outer.max.x)
    } else {
        (outer.min.x, outer.max.x)
    };
    let (y0, y1) = if edges.contains(Edges::TOP) {
        (outer.min.y, bb.min.y)
    } else if edges.contains(Edges::BOTTOM) {
        (bb.max.y, outer.max.y)
    } else {
        (outer.min.y, outer.max.y)
    };
    Rect::new(Point::new(x0, y0), Point::new(x1, y1))
}

/// Classifies `p` against one view.
///
/// The surface is probed first through the shell, so holes in a surface are
/// not hits. Otherwise the border bands, each `thickness` wide and outside
/// the bounding box, are checked corners first.
pub fn region_at(view: &View, p: Point<i32>, shell: &dyn Shell, thickness: i32) -> Region {
    let bb = view.bounding_box(shell);
    if bb.contains(p) && shell.accepts_input(view.surface, p - view.position) {
        return Region::SurfaceArea;
    }
    BORDER_ORDER
        .iter()
        .copied()
        .find(|r| border_band(*r, bb, thickness).contains(p))
        .unwrap_or(Region::None)
}

/// Finds the topmost mapped view under `p`.
pub fn view_at(
    views: &ViewList,
    p: Point<i32>,
    shell: &dyn Shell,
    thickness: i32,
) -> Option<(ViewId, Region)> {
    views.iter_topmost().find_map(|view| {
        match region_at(view, p, shell, thickness) {
            Region::None => None,
            region => Some((view.id, region)),
        }
    })
}
