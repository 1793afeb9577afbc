//! Pop-up menus
//!
//! A menu is a vertical list of selectable items. Every item carries two
//! externally built widgets (active and inactive look) and a callback. Item
//! slots are recomputed on every add/remove: items are stacked with a uniform
//! border and all slots share the width of the widest item.

use crate::backend::{Color, Renderer, TextStyle, TextureSource};
use crate::error::RenderError;
use crate::geometry::{Point, Rect};
use crate::tiling::vertical_stack;
use crate::widget::Widget;
use log::debug;
use std::fmt;

/// Upper bound handed to item widgets when measuring them.
const ITEM_MAX: Point<i32> = Point::new(4096, 4096);

/// Stable identifier of an item within its menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(u64);

pub struct MenuItem {
    active: Widget,
    inactive: Widget,
    on_select: Box<dyn FnMut()>,
}

impl MenuItem {
    pub fn new(active: Widget, inactive: Widget, on_select: impl FnMut() + 'static) -> Self {
        Self {
            active,
            inactive,
            on_select: Box::new(on_select),
        }
    }

    /// Item showing `text` in one of two styles, with `padding` on all sides.
    pub fn labelled(
        text: &str,
        active: TextStyle,
        inactive: TextStyle,
        padding: i32,
        source: &mut dyn TextureSource,
        on_select: impl FnMut() + 'static,
    ) -> Result<Self, RenderError> {
        let pad = |label| Widget::padding(padding, padding, padding, padding, label);
        let active = Widget::label(text, active, source)?;
        let inactive = match Widget::label(text, inactive, source) {
            Ok(inactive) => inactive,
            Err(e) => {
                active.release(source);
                return Err(e);
            }
        };
        Ok(Self::new(pad(active), pad(inactive), on_select))
    }

    /// Hands the textures of both looks back to `source`.
    pub fn release(self, source: &mut dyn TextureSource) {
        self.active.release(source);
        self.inactive.release(source);
    }
}

impl fmt::Debug for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuItem")
            .field("active", &self.active)
            .field("inactive", &self.inactive)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
struct Entry {
    id: ItemId,
    item: MenuItem,
    size: Point<i32>,
    slot: Rect<i32>,
}

#[derive(Debug)]
pub struct Menu {
    origin: Point<i32>,
    border: i32,
    background: Color,
    entries: Vec<Entry>,
    next_id: u64,
    prev: Option<ItemId>,
    hovered: Option<ItemId>,
    bounds: Rect<i32>,
}

impl Menu {
    pub fn new(origin: Point<i32>, border: i32, background: Color) -> Self {
        Self {
            origin,
            border,
            background,
            entries: Vec::new(),
            next_id: 1,
            prev: None,
            hovered: None,
            bounds: Rect::zero(),
        }
    }

    pub fn add(&mut self, mut item: MenuItem) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        let size = item
            .active
            .size(Point::zero(), ITEM_MAX)
            .max(item.inactive.size(Point::zero(), ITEM_MAX));
        self.entries.push(Entry {
            id,
            item,
            size,
            slot: Rect::zero(),
        });
        self.recompute();
        debug!("Menu item {:?} added ({} items)", id, self.entries.len());
        id
    }

    pub fn remove(&mut self, id: ItemId) -> Option<MenuItem> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        let entry = self.entries.remove(index);
        if self.hovered == Some(id) {
            self.hovered = None;
        }
        self.recompute();
        Some(entry.item)
    }

    fn recompute(&mut self) {
        let gap = Point::new(0, self.border);
        let sizes: Vec<Point<i32>> = self.entries.iter().map(|e| e.size + gap).collect();
        let slots = vertical_stack(self.origin + Point::new(self.border, self.border), &sizes);
        let mut bounds = Rect::zero();
        for (entry, slot) in self.entries.iter_mut().zip(slots) {
            entry.slot = Rect::new(slot.min, slot.max - gap);
            entry.item.active.position(entry.slot);
            entry.item.inactive.position(entry.slot);
            bounds = bounds.union(entry.slot);
        }
        self.bounds = if bounds.is_empty() {
            Rect::zero()
        } else {
            bounds.inset(-self.border)
        };
    }

    pub fn move_to(&mut self, origin: Point<i32>) {
        self.origin = origin;
        self.recompute();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Area covered by the menu, border included.
    pub fn bounds(&self) -> Rect<i32> {
        self.bounds
    }

    /// Slot of an item, or `None` if it is not in the menu.
    pub fn item_bounds(&self, id: ItemId) -> Option<Rect<i32>> {
        self.entries.iter().find(|e| e.id == id).map(|e| e.slot)
    }

    pub fn item_at(&self, p: Point<i32>) -> Option<ItemId> {
        self.entries
            .iter()
            .find(|e| e.slot.contains(p))
            .map(|e| e.id)
    }

    /// Runs the item's callback and remembers it as the previous selection.
    /// Returns false, doing nothing, if the item is no longer in the menu.
    pub fn select(&mut self, id: ItemId) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) else {
            return false;
        };
        (entry.item.on_select)();
        self.prev = Some(id);
        true
    }

    /// The last selected item, as long as it is still in the menu.
    pub fn prev(&self) -> Option<ItemId> {
        self.prev.filter(|id| self.contains(*id))
    }

    /// Updates the highlighted item from the pointer position.
    pub fn hover(&mut self, p: Point<i32>) -> Option<ItemId> {
        self.hovered = self.item_at(p);
        self.hovered
    }

    pub fn hovered(&self) -> Option<ItemId> {
        self.hovered
    }

    /// Consumes the menu, releasing every item's textures.
    pub fn release(self, source: &mut dyn TextureSource) {
        for entry in self.entries {
            entry.item.release(source);
        }
    }

    pub fn render(&self, target: &mut dyn Renderer) {
        if self.entries.is_empty() {
            return;
        }
        target.draw_solid(self.bounds, self.background);
        for entry in &self.entries {
            if self.hovered == Some(entry.id) {
                entry.item.active.render(target);
            } else {
                entry.item.inactive.render(target);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Texture;
    use crate::geometry::rt;
    use std::cell::Cell;
    use std::rc::Rc;

    fn block(w: i32, h: i32) -> Widget {
        Widget::texture(Texture {
            id: 0,
            size: Point::new(w, h),
        })
    }

    fn item(w: i32, counter: &Rc<Cell<u32>>) -> MenuItem {
        let counter = Rc::clone(counter);
        MenuItem::new(block(w, 10), block(w, 10), move || counter.set(counter.get() + 1))
    }

    #[test]
    fn test_slots_widen_to_widest_item() {
        let hits = Rc::new(Cell::new(0));
        let mut menu = Menu::new(Point::zero(), 4, Color::BLACK);
        let ids: Vec<ItemId> = [40, 60, 30].iter().map(|&w| menu.add(item(w, &hits))).collect();

        for id in &ids {
            assert_eq!(menu.item_bounds(*id).unwrap().dx(), 60);
        }
        assert_eq!(menu.item_bounds(ids[0]), Some(rt(4, 4, 64, 14)));
        assert_eq!(menu.item_bounds(ids[1]), Some(rt(4, 18, 64, 28)));
        assert_eq!(menu.item_bounds(ids[2]), Some(rt(4, 32, 64, 42)));
        assert_eq!(menu.bounds(), rt(0, 0, 68, 46));

        menu.remove(ids[1]);
        assert_eq!(menu.item_bounds(ids[0]).unwrap().dx(), 40);
        assert_eq!(menu.item_bounds(ids[2]), Some(rt(4, 18, 44, 28)));
        assert_eq!(menu.item_bounds(ids[1]), None);
    }

    #[test]
    fn test_item_at() {
        let hits = Rc::new(Cell::new(0));
        let mut menu = Menu::new(Point::new(100, 100), 2, Color::BLACK);
        let a = menu.add(item(20, &hits));
        let b = menu.add(item(20, &hits));
        assert_eq!(menu.item_at(Point::new(105, 105)), Some(a));
        assert_eq!(menu.item_at(Point::new(105, 115)), Some(b));
        // in the border between the two slots
        assert_eq!(menu.item_at(Point::new(105, 112)), None);
        assert_eq!(menu.item_at(Point::new(0, 0)), None);
    }

    #[test]
    fn test_select_runs_callback_and_records_prev() {
        let hits = Rc::new(Cell::new(0));
        let mut menu = Menu::new(Point::zero(), 1, Color::BLACK);
        let a = menu.add(item(10, &hits));
        let b = menu.add(item(10, &hits));

        assert!(menu.select(b));
        assert_eq!(hits.get(), 1);
        assert_eq!(menu.prev(), Some(b));

        assert!(menu.remove(b).is_some());
        assert_eq!(menu.prev(), None);
        assert!(!menu.select(b));
        assert_eq!(hits.get(), 1);

        assert!(menu.select(a));
        assert_eq!(menu.prev(), Some(a));
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let hits = Rc::new(Cell::new(0));
        let mut menu = Menu::new(Point::zero(), 1, Color::BLACK);
        let a = menu.add(item(10, &hits));
        menu.remove(a);
        assert!(menu.remove(a).is_none());
        assert!(menu.is_empty());
        assert_eq!(menu.bounds(), Rect::zero());
    }

    #[test]
    fn test_hover_clears_on_remove() {
        let hits = Rc::new(Cell::new(0));
        let mut menu = Menu::new(Point::zero(), 0, Color::BLACK);
        let a = menu.add(item(10, &hits));
        assert_eq!(menu.hover(Point::new(1, 1)), Some(a));
        menu.remove(a);
        assert_eq!(menu.hovered(), None);
    }

    #[test]
    fn test_move_to_shifts_slots() {
        let hits = Rc::new(Cell::new(0));
        let mut menu = Menu::new(Point::zero(), 2, Color::BLACK);
        let a = menu.add(item(10, &hits));
        menu.move_to(Point::new(50, 60));
        assert_eq!(menu.item_bounds(a), Some(rt(52, 62, 62, 72)));
    }
}
