//! Widget layout tree
//!
//! On-screen UI (status bar, menus) is built from a small, closed set of
//! nodes. Each node owns its children. Layout runs in two passes:
//!
//! 1. [`Widget::size`] measures under inclusive `[min, max]` constraints.
//!    Results are cached per node and reused until the constraints change or
//!    something below the node is invalidated.
//! 2. [`Widget::position`] places the node inside a rectangle proposed by its
//!    parent, using the sizes from pass 1, and returns the area it occupies.
//!
//! [`Widget::render`] then draws from the state fixed by those two passes.

use crate::backend::{Color, Renderer, TextStyle, Texture, TextureSource, Transform};
use crate::error::RenderError;
use crate::geometry::{Edges, Point, Rect};
use log::warn;
use std::fmt;

/// Pluggable child arrangement for [`Widget::container`].
pub trait Layout: fmt::Debug {
    /// Measures `children` and returns one rectangle per child, relative to
    /// the container's origin.
    fn arrange(&self, min: Point<i32>, max: Point<i32>, children: &mut [Widget]) -> Vec<Rect<i32>>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Measured {
    min: Point<i32>,
    max: Point<i32>,
    size: Point<i32>,
}

/// Text rasterized into a texture.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    text: String,
    style: TextStyle,
    texture: Texture,
}

impl Label {
    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug)]
enum Node {
    Padding {
        top: i32,
        bottom: i32,
        left: i32,
        right: i32,
        child: Box<Widget>,
    },
    Center(Box<Widget>),
    Align {
        edges: Edges,
        child: Box<Widget>,
    },
    Box {
        vertical: bool,
        children: Vec<Widget>,
    },
    Stack(Vec<Widget>),
    Fill {
        color: Color,
        size: Option<Point<i32>>,
    },
    Label(Label),
    Texture(Texture),
    Container {
        layout: Box<dyn Layout>,
        children: Vec<Widget>,
        tiles: Vec<Rect<i32>>,
    },
}

/// A node in the layout tree together with its cached layout state.
#[derive(Debug)]
pub struct Widget {
    node: Node,
    measured: Option<Measured>,
    bounds: Rect<i32>,
}

impl Widget {
    fn new(node: Node) -> Self {
        Self {
            node,
            measured: None,
            bounds: Rect::zero(),
        }
    }

    pub fn padding(top: i32, bottom: i32, left: i32, right: i32, child: Widget) -> Self {
        Self::new(Node::Padding {
            top,
            bottom,
            left,
            right,
            child: Box::new(child),
        })
    }

    pub fn center(child: Widget) -> Self {
        Self::new(Node::Center(Box::new(child)))
    }

    /// Pins the child to `edges`. Requesting both opposing edges of an axis
    /// stretches the child along it; no edge on an axis centers it.
    pub fn align(edges: Edges, child: Widget) -> Self {
        Self::new(Node::Align {
            edges,
            child: Box::new(child),
        })
    }

    pub fn hbox(children: Vec<Widget>) -> Self {
        Self::new(Node::Box {
            vertical: false,
            children,
        })
    }

    pub fn vbox(children: Vec<Widget>) -> Self {
        Self::new(Node::Box {
            vertical: true,
            children,
        })
    }

    pub fn stack(children: Vec<Widget>) -> Self {
        Self::new(Node::Stack(children))
    }

    /// A solid rectangle filling whatever it is given.
    pub fn fill(color: Color) -> Self {
        Self::new(Node::Fill { color, size: None })
    }

    /// A solid rectangle with a fixed natural size.
    pub fn fill_sized(color: Color, size: Point<i32>) -> Self {
        Self::new(Node::Fill {
            color,
            size: Some(size),
        })
    }

    pub fn label(
        text: &str,
        style: TextStyle,
        source: &mut dyn TextureSource,
    ) -> Result<Self, RenderError> {
        let texture = source.text_texture(text, &style)?;
        Ok(Self::new(Node::Label(Label {
            text: text.to_string(),
            style,
            texture,
        })))
    }

    pub fn texture(texture: Texture) -> Self {
        Self::new(Node::Texture(texture))
    }

    pub fn container(layout: Box<dyn Layout>, children: Vec<Widget>) -> Self {
        Self::new(Node::Container {
            layout,
            children,
            tiles: Vec::new(),
        })
    }

    pub fn children(&self) -> &[Widget] {
        match &self.node {
            Node::Padding { child, .. } | Node::Center(child) | Node::Align { child, .. } => {
                std::slice::from_ref(&**child)
            }
            Node::Box { children, .. } | Node::Stack(children) | Node::Container { children, .. } => {
                children
            }
            Node::Fill { .. } | Node::Label(_) | Node::Texture(_) => &[],
        }
    }

    fn children_mut(&mut self) -> &mut [Widget] {
        match &mut self.node {
            Node::Padding { child, .. } | Node::Center(child) | Node::Align { child, .. } => {
                std::slice::from_mut(&mut **child)
            }
            Node::Box { children, .. } | Node::Stack(children) | Node::Container { children, .. } => {
                children
            }
            Node::Fill { .. } | Node::Label(_) | Node::Texture(_) => &mut [],
        }
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut Widget> {
        self.children_mut().get_mut(index)
    }

    pub fn as_label(&self) -> Option<&Label> {
        match &self.node {
            Node::Label(label) => Some(label),
            _ => None,
        }
    }

    /// Appends a child to a box, stack or container. Returns false for
    /// nodes with a fixed number of children.
    pub fn push(&mut self, child: Widget) -> bool {
        match &mut self.node {
            Node::Box { children, .. } | Node::Stack(children) | Node::Container { children, .. } => {
                children.push(child);
                self.measured = None;
                true
            }
            _ => false,
        }
    }

    pub fn remove(&mut self, index: usize) -> Option<Widget> {
        let removed = match &mut self.node {
            Node::Box { children, .. } | Node::Stack(children) | Node::Container { children, .. }
                if index < children.len() =>
            {
                Some(children.remove(index))
            }
            _ => None,
        };
        if removed.is_some() {
            self.measured = None;
        }
        removed
    }

    /// Replaces a label's text. Returns false if this node is not a label.
    pub fn set_text(
        &mut self,
        text: &str,
        source: &mut dyn TextureSource,
    ) -> Result<bool, RenderError> {
        let Node::Label(label) = &mut self.node else {
            return Ok(false);
        };
        if label.text != text {
            let texture = source.text_texture(text, &label.style)?;
            source.release_text(std::mem::replace(&mut label.texture, texture));
            label.text = text.to_string();
            self.measured = None;
        }
        Ok(true)
    }

    /// Consumes the tree, handing every label texture back to `source`.
    pub fn release(self, source: &mut dyn TextureSource) {
        match self.node {
            Node::Label(label) => source.release_text(label.texture),
            Node::Padding { child, .. } | Node::Center(child) | Node::Align { child, .. } => {
                (*child).release(source)
            }
            Node::Box { children, .. } | Node::Stack(children) | Node::Container { children, .. } => {
                for child in children {
                    child.release(source);
                }
            }
            Node::Fill { .. } | Node::Texture(_) => {}
        }
    }

    /// Drops the cached size so the next [`Widget::size`] re-measures this
    /// node and every ancestor that asks for it.
    pub fn invalidate(&mut self) {
        self.measured = None;
    }

    pub fn is_dirty(&self) -> bool {
        self.measured.is_none() || self.children().iter().any(Widget::is_dirty)
    }

    /// Size computed by the last measuring pass.
    pub fn measured_size(&self) -> Point<i32> {
        self.measured.map(|m| m.size).unwrap_or_default()
    }

    /// Area occupied after the last positioning pass.
    pub fn bounds(&self) -> Rect<i32> {
        self.bounds
    }

    /// Measures the node under `[min, max]`.
    ///
    /// Nodes try to stay within the constraints but are not clamped to them;
    /// a parent that cares must clamp the result itself.
    pub fn size(&mut self, min: Point<i32>, max: Point<i32>) -> Point<i32> {
        if let Some(m) = self.measured {
            if m.min == min && m.max == max && !self.children().iter().any(Widget::is_dirty) {
                return m.size;
            }
        }
        let size = self.measure(min, max);
        self.measured = Some(Measured { min, max, size });
        size
    }

    fn measure(&mut self, min: Point<i32>, max: Point<i32>) -> Point<i32> {
        match &mut self.node {
            Node::Padding {
                top,
                bottom,
                left,
                right,
                child,
            } => {
                let pad = Point::new(*left + *right, *top + *bottom);
                let inner_min = (min - pad).max(Point::zero());
                let inner_max = (max - pad).max(Point::zero());
                child.size(inner_min, inner_max) + pad
            }
            Node::Center(child) | Node::Align { child, .. } => {
                child.size(min, max);
                max
            }
            Node::Box { vertical, children } => {
                if children.is_empty() {
                    return min;
                }
                let n = i32::try_from(children.len()).unwrap_or(i32::MAX);
                let (child_min, child_max) = if *vertical {
                    (Point::new(min.x, 0), Point::new(max.x, max.y / n))
                } else {
                    (Point::new(0, min.y), Point::new(max.x / n, max.y))
                };
                children.iter_mut().fold(Point::zero(), |acc, child| {
                    let s = child.size(child_min, child_max);
                    if *vertical {
                        Point::new(acc.x.max(s.x), acc.y + s.y)
                    } else {
                        Point::new(acc.x + s.x, acc.y.max(s.y))
                    }
                })
            }
            Node::Stack(children) => children
                .iter_mut()
                .fold(Point::zero(), |acc, child| acc.max(child.size(min, max))),
            Node::Fill { size, .. } => size.unwrap_or(max),
            Node::Label(label) => label.texture.size,
            Node::Texture(texture) => texture.size,
            Node::Container {
                layout,
                children,
                tiles,
            } => {
                *tiles = layout.arrange(min, max, children);
                tiles
                    .iter()
                    .fold(Rect::zero(), |acc, t| acc.union(*t))
                    .size()
            }
        }
    }

    /// Places the node inside `base` and returns the area it occupies, which
    /// may be smaller than `base`. Does not re-measure.
    pub fn position(&mut self, base: Rect<i32>) -> Rect<i32> {
        let size = self.measured_size();
        self.bounds = self.place(base, size);
        self.bounds
    }

    fn place(&mut self, base: Rect<i32>, size: Point<i32>) -> Rect<i32> {
        match &mut self.node {
            Node::Padding {
                top,
                bottom,
                left,
                right,
                child,
            } => {
                let inner = child.position(base.pad(*top, *bottom, *left, *right));
                Rect::new(
                    inner.min - Point::new(*left, *top),
                    inner.max + Point::new(*right, *bottom),
                )
            }
            Node::Center(child) => {
                let r = Rect::from_size(child.measured_size()).align(base);
                child.position(r);
                base
            }
            Node::Align { edges, child } => {
                let r = aligned(*edges, child.measured_size(), base);
                child.position(r);
                base
            }
            Node::Box { vertical, children } => {
                let mut cursor = base.min;
                let mut bounds = Rect::zero();
                for child in children.iter_mut() {
                    let s = child.measured_size();
                    bounds = bounds.union(child.position(Rect::from_origin_size(cursor, s)));
                    if *vertical {
                        cursor.y += s.y;
                    } else {
                        cursor.x += s.x;
                    }
                }
                bounds
            }
            Node::Stack(children) => children
                .iter_mut()
                .fold(Rect::zero(), |acc, child| acc.union(child.position(base))),
            Node::Fill { size: None, .. } => base,
            Node::Fill { .. } | Node::Label(_) | Node::Texture(_) => {
                Rect::from_origin_size(base.min, size)
            }
            Node::Container { children, tiles, .. } => children
                .iter_mut()
                .zip(tiles.iter())
                .fold(Rect::zero(), |acc, (child, tile)| {
                    acc.union(child.position(tile.translate(base.min)))
                }),
        }
    }

    /// Draws the subtree. Children are drawn in order, so later children end
    /// up on top. A failed texture draw is logged and skipped.
    pub fn render(&self, target: &mut dyn Renderer) {
        match &self.node {
            Node::Fill { color, .. } => target.draw_solid(self.bounds, *color),
            Node::Label(Label { texture, .. }) | Node::Texture(texture) => {
                if let Err(e) = target.draw_texture(texture, self.bounds, Transform::Normal) {
                    warn!("Skipping widget draw at {}: {}", self.bounds, e);
                }
            }
            _ => {
                for child in self.children() {
                    child.render(target);
                }
            }
        }
    }
}

/// Child rectangle of `size` pinned inside `base` according to `edges`.
fn aligned(edges: Edges, size: Point<i32>, base: Rect<i32>) -> Rect<i32> {
    let axis = |lo_edge: Edges, hi_edge: Edges, lo: i32, hi: i32, len: i32| {
        match (edges.contains(lo_edge), edges.contains(hi_edge)) {
            (true, true) => (lo, hi),
            (true, false) => (lo, lo + len),
            (false, true) => (hi - len, hi),
            (false, false) => {
                let start = lo + (hi - lo - len) / 2;
                (start, start + len)
            }
        }
    };
    let (x0, x1) = axis(Edges::LEFT, Edges::RIGHT, base.min.x, base.max.x, size.x);
    let (y0, y1) = axis(Edges::TOP, Edges::BOTTOM, base.min.y, base.max.y, size.y);
    Rect::new(Point::new(x0, y0), Point::new(x1, y1)).canon()
}
