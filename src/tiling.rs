//! Tiling layout algorithms
//!
//! Pure functions that partition a bounds rectangle among `n` tiles, plus the
//! vertical stacking used by menus and list containers. None of them keep
//! state between calls.

use crate::geometry::{Point, Rect};
use crate::widget::{Layout, Widget};
use serde::{Deserialize, Serialize};

/// Named tiling strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Tiling {
    /// Alternating vertical/horizontal halving, spiralling into the
    /// bottom-right corner.
    #[default]
    RightThenDown,
    /// First tile takes the left two thirds, the rest share the right third.
    TwoThirdsSidebar,
    /// Equal-height horizontal bands.
    EvenVertically,
}

impl Tiling {
    pub fn tile(self, bounds: Rect<i32>, n: usize) -> Vec<Rect<i32>> {
        match self {
            Tiling::RightThenDown => right_then_down(bounds, n),
            Tiling::TwoThirdsSidebar => two_thirds_sidebar(bounds, n),
            Tiling::EvenVertically => even_vertically(bounds, n),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Tiling::RightThenDown => "right-then-down",
            Tiling::TwoThirdsSidebar => "two-thirds-sidebar",
            Tiling::EvenVertically => "even-vertically",
        }
    }
}

impl std::str::FromStr for Tiling {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "right-then-down" => Ok(Tiling::RightThenDown),
            "two-thirds-sidebar" => Ok(Tiling::TwoThirdsSidebar),
            "even-vertically" => Ok(Tiling::EvenVertically),
            other => anyhow::bail!("Unknown tiling strategy: {}", other),
        }
    }
}

/// Each tile but the last takes half of what is left: the left half on even
/// steps, the top half on odd steps. The last tile takes the remainder, so
/// the tiles always reconstruct `bounds` exactly.
pub fn right_then_down(bounds: Rect<i32>, n: usize) -> Vec<Rect<i32>> {
    let mut tiles = Vec::with_capacity(n);
    let mut rest = bounds;
    for i in 0..n {
        if i + 1 == n {
            tiles.push(rest);
            break;
        }
        if i % 2 == 0 {
            let split = rest.min.x + rest.dx() / 2;
            tiles.push(Rect::new(rest.min, Point::new(split, rest.max.y)));
            rest.min.x = split;
        } else {
            let split = rest.min.y + rest.dy() / 2;
            tiles.push(Rect::new(rest.min, Point::new(rest.max.x, split)));
            rest.min.y = split;
        }
    }
    tiles
}

/// The first tile gets the left two thirds of the width (rounded down), the
/// remaining tiles split the right third with [`even_vertically`].
pub fn two_thirds_sidebar(bounds: Rect<i32>, n: usize) -> Vec<Rect<i32>> {
    match n {
        0 => Vec::new(),
        1 => vec![bounds],
        _ => {
            let split = bounds.min.x + bounds.dx() * 2 / 3;
            let main = Rect::new(bounds.min, Point::new(split, bounds.max.y));
            let side = Rect::new(Point::new(split, bounds.min.y), bounds.max);
            let mut tiles = Vec::with_capacity(n);
            tiles.push(main);
            tiles.extend(even_vertically(side, n - 1));
            tiles
        }
    }
}

/// `n` full-width bands of `dy / n` rows each.
///
/// The division truncates: the `dy % n` leftover rows at the bottom of
/// `bounds` belong to no band.
pub fn even_vertically(bounds: Rect<i32>, n: usize) -> Vec<Rect<i32>> {
    if n == 0 {
        return Vec::new();
    }
    let count = i32::try_from(n).unwrap_or(i32::MAX);
    let height = bounds.dy() / count;
    (0..count)
        .map(|i| {
            let y = bounds.min.y + i * height;
            Rect::new(
                Point::new(bounds.min.x, y),
                Point::new(bounds.max.x, y + height),
            )
        })
        .collect()
}

/// Stacks pre-measured sizes downwards from `origin`. Every rectangle is
/// widened to the widest input; heights are kept.
pub fn vertical_stack(origin: Point<i32>, sizes: &[Point<i32>]) -> Vec<Rect<i32>> {
    let width = sizes.iter().map(|s| s.x).max().unwrap_or(0);
    let mut y = origin.y;
    sizes
        .iter()
        .map(|s| {
            let r = Rect::new(
                Point::new(origin.x, y),
                Point::new(origin.x + width, y + s.y),
            );
            y += s.y;
            r
        })
        .collect()
}

impl Layout for Tiling {
    fn arrange(&self, _min: Point<i32>, max: Point<i32>, children: &mut [Widget]) -> Vec<Rect<i32>> {
        let tiles = self.tile(Rect::from_size(max), children.len());
        for (child, tile) in children.iter_mut().zip(&tiles) {
            child.size(tile.size(), tile.size());
        }
        tiles
    }
}

/// Container layout that measures every child under the container's own
/// constraints and stacks them with [`vertical_stack`].
#[derive(Debug, Clone, Copy, Default)]
pub struct VerticalStack;

impl Layout for VerticalStack {
    fn arrange(&self, min: Point<i32>, max: Point<i32>, children: &mut [Widget]) -> Vec<Rect<i32>> {
        let sizes: Vec<Point<i32>> = children
            .iter_mut()
            .map(|child| child.size(Point::new(min.x, 0), max))
            .collect();
        vertical_stack(Point::zero(), &sizes)
    }
}
