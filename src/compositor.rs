//! Compositor context
//!
//! [`Compositor`] owns every piece of window-management state (view list,
//! input mode, status bar, open menu) and exposes the three entry points an
//! event loop drives: [`Compositor::on_pointer_motion`],
//! [`Compositor::on_pointer_button`] and [`Compositor::on_frame`]. All calls
//! are synchronous and must be made from the thread that owns the context,
//! in event order.
//!
//! Everything outside the policy core is reached through the collaborator
//! traits in [`crate::backend`].

use crate::backend::{Button, Color, Cursor, Renderer, Shell, SurfaceId, TextureSource, Transform};
use crate::bar::StatusBar;
use crate::config::TrellisConfig;
use crate::geometry::{Edges, Point, Rect};
use crate::input::{GrabUpdate, InputMode};
use crate::menu::Menu;
use crate::view::{view_at, Region, View, ViewId, ViewList};
use log::{debug, info, trace, warn};

pub struct Compositor<S: Shell, C: Cursor> {
    config: TrellisConfig,
    shell: S,
    cursor: C,
    views: ViewList,
    mode: InputMode,
    /// Surface currently receiving pointer events.
    pointer_focus: Option<SurfaceId>,
    hovered: Option<(ViewId, Region)>,
    bar: StatusBar,
    menu: Option<Menu>,
    /// Menus closed by input, released on the next frame.
    retired: Vec<Menu>,
    output: Rect<i32>,
    frames: u64,
}

/// The four bands of width `t` just outside `r`.
fn outline(r: Rect<i32>, t: i32) -> [Rect<i32>; 4] {
    let o = r.inset(-t);
    [
        Rect::new(o.min, Point::new(o.max.x, r.min.y)),
        Rect::new(Point::new(o.min.x, r.max.y), o.max),
        Rect::new(Point::new(o.min.x, r.min.y), Point::new(r.min.x, r.max.y)),
        Rect::new(Point::new(r.max.x, r.min.y), Point::new(o.max.x, r.max.y)),
    ]
}

impl<S: Shell, C: Cursor> Compositor<S, C> {
    pub fn new(config: TrellisConfig, shell: S, cursor: C) -> Self {
        let output = Rect::from_size(Point::new(config.output.width, config.output.height));
        let bar = StatusBar::new(config.bar.clone());
        info!(
            "Compositor ready: {}x{} output, {} tiling",
            output.dx(),
            output.dy(),
            config.window.tiling.name()
        );
        Self {
            config,
            shell,
            cursor,
            views: ViewList::new(),
            mode: InputMode::Normal,
            pointer_focus: None,
            hovered: None,
            bar,
            menu: None,
            retired: Vec::new(),
            output,
            frames: 0,
        }
    }

    pub fn config(&self) -> &TrellisConfig {
        &self.config
    }

    pub fn shell(&self) -> &S {
        &self.shell
    }

    pub fn shell_mut(&mut self) -> &mut S {
        &mut self.shell
    }

    pub fn cursor(&self) -> &C {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut C {
        &mut self.cursor
    }

    pub fn views(&self) -> &ViewList {
        &self.views
    }

    pub fn view(&self, id: ViewId) -> Option<&View> {
        self.views.get(id)
    }

    pub fn mode(&self) -> &InputMode {
        &self.mode
    }

    pub fn hovered(&self) -> Option<(ViewId, Region)> {
        self.hovered
    }

    pub fn bar(&self) -> &StatusBar {
        &self.bar
    }

    pub fn output(&self) -> Rect<i32> {
        self.output
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Area views are tiled into: the output minus the bar.
    pub fn usable_area(&self) -> Rect<i32> {
        self.bar.usable_area(self.output)
    }

    fn refresh_bar(&mut self) {
        let title = self
            .views
            .focused()
            .map(|v| v.title.clone())
            .unwrap_or_default();
        self.bar.set_status(&title, self.views.mapped_count());
    }

    /// Starts managing `surface` and shows it on top, focused.
    pub fn map_view(&mut self, surface: SurfaceId, title: &str) -> ViewId {
        let id = self.views.add(surface, title);
        let origin = self.usable_area().min;
        if let Some(view) = self.views.get_mut(id) {
            view.position = origin;
            view.mapped = true;
        }
        info!("Mapped view {:?} '{}'", id, title);
        self.focus_view(id);
        self.refresh_bar();
        id
    }

    /// Hides a view without forgetting it.
    pub fn unmap_view(&mut self, id: ViewId) -> bool {
        let Some(view) = self.views.get_mut(id) else {
            return false;
        };
        view.mapped = false;
        let (surface, was_focused) = (view.surface, view.activated);
        debug!("Unmapped view {:?}", id);
        self.forget_surface(id, surface, was_focused);
        true
    }

    /// Stops managing a view. Any grab on it ends.
    pub fn destroy_view(&mut self, id: ViewId) -> Option<View> {
        let view = self.views.remove(id)?;
        info!("Destroyed view {:?} '{}'", id, view.title);
        self.forget_surface(id, view.surface, view.activated);
        Some(view)
    }

    fn forget_surface(&mut self, id: ViewId, surface: SurfaceId, was_focused: bool) {
        if self.mode.grabbed_view() == Some(id) {
            debug!("Cancelling {} grab on {:?}", self.mode, id);
            self.mode = InputMode::Normal;
            self.cursor.set_icon(Region::None.cursor_name());
        }
        if self.pointer_focus == Some(surface) {
            self.pointer_focus = None;
        }
        if self.hovered.map(|(v, _)| v) == Some(id) {
            self.hovered = None;
        }
        if was_focused {
            if let Some(view) = self.views.get_mut(id) {
                view.activated = false;
                self.shell.set_activated(surface, false);
            }
            if let Some(next) = self.views.topmost().map(|v| v.id) {
                self.focus_view(next);
            }
        }
        self.refresh_bar();
    }

    /// Raises a mapped view and moves keyboard focus to it.
    pub fn focus_view(&mut self, id: ViewId) -> bool {
        let Some(surface) = self.views.get(id).filter(|v| v.mapped).map(|v| v.surface) else {
            return false;
        };
        if let Some(prev) = self.views.focused().filter(|v| v.id != id).map(|v| (v.id, v.surface)) {
            if let Some(view) = self.views.get_mut(prev.0) {
                view.activated = false;
            }
            self.shell.set_activated(prev.1, false);
        }
        self.views.raise(id);
        if let Some(view) = self.views.get_mut(id) {
            if !view.activated {
                view.activated = true;
                self.shell.set_activated(surface, true);
                debug!("Focused view {:?}", id);
            }
        }
        self.refresh_bar();
        true
    }

    /// Focuses the bottom-most mapped view, cycling through the stack.
    pub fn focus_next(&mut self) -> Option<ViewId> {
        let next = self.views.iter().find(|v| v.mapped).map(|v| v.id)?;
        self.focus_view(next);
        Some(next)
    }

    /// Arranges all mapped views with the configured strategy.
    pub fn tile(&mut self) {
        let tiling = self.config.window.tiling;
        let ids: Vec<(ViewId, SurfaceId)> = self
            .views
            .iter()
            .filter(|v| v.mapped)
            .map(|v| (v.id, v.surface))
            .collect();
        let tiles = tiling.tile(self.usable_area(), ids.len());
        for ((id, surface), tile) in ids.into_iter().zip(tiles) {
            if let Some(view) = self.views.get_mut(id) {
                view.position = tile.min;
            }
            self.shell.set_size(surface, tile.size());
        }
        info!("Tiled {} views ({})", self.views.mapped_count(), tiling.name());
    }

    fn grabbable(&self, id: ViewId) -> Option<&View> {
        if !self.mode.is_normal() {
            warn!("Ignoring grab request for {:?} while in {} mode", id, self.mode);
            return None;
        }
        self.views.get(id).filter(|v| v.mapped)
    }

    fn enter_mode(&mut self, mode: InputMode) {
        self.mode = mode;
        if let Some(icon) = self.mode.cursor_icon() {
            self.cursor.set_icon(icon);
        }
    }

    /// Starts an interactive move of `id` from the current pointer position.
    pub fn begin_move(&mut self, id: ViewId) -> bool {
        let Some(position) = self.grabbable(id).map(|v| v.position) else {
            return false;
        };
        let mode = InputMode::begin_move(id, position, self.cursor.position());
        self.enter_mode(mode);
        true
    }

    /// Starts an interactive resize of `id` dragging `edges`.
    pub fn begin_resize(&mut self, id: ViewId, edges: Edges) -> bool {
        if edges.is_empty() {
            return false;
        }
        let Some((position, surface)) = self.grabbable(id).map(|v| (v.position, v.surface)) else {
            return false;
        };
        let geometry = Rect::from_origin_size(position, self.shell.surface_size(surface));
        let mode = InputMode::begin_resize(id, edges, geometry, self.cursor.position());
        self.enter_mode(mode);
        true
    }

    /// Starts the grab matching a hit-test region: move for the surface,
    /// resize for a border.
    pub fn begin_drag(&mut self, id: ViewId, region: Region) -> bool {
        match region {
            Region::None => false,
            Region::SurfaceArea => self.begin_move(id),
            border => self.begin_resize(id, border.edges()),
        }
    }

    /// A menu positioned at `origin` styled from the configuration.
    pub fn new_menu(&self, origin: Point<i32>) -> Menu {
        Menu::new(origin, self.config.menu.border, self.config.menu.background)
    }

    /// Shows `menu`, replacing any open one.
    pub fn open_menu(&mut self, menu: Menu) {
        debug!("Opening menu with {} items", menu.len());
        if let Some(old) = self.menu.replace(menu) {
            self.retired.push(old);
        }
    }

    /// Takes the open menu back. Its textures become the caller's to release.
    pub fn close_menu(&mut self) -> Option<Menu> {
        self.menu.take()
    }

    fn retire_menu(&mut self) {
        if let Some(menu) = self.menu.take() {
            self.retired.push(menu);
        }
    }

    pub fn menu(&self) -> Option<&Menu> {
        self.menu.as_ref()
    }

    pub fn menu_mut(&mut self) -> Option<&mut Menu> {
        self.menu.as_mut()
    }

    fn apply(&mut self, update: GrabUpdate) {
        match update {
            GrabUpdate::Move { view, position } => {
                if let Some(v) = self.views.get_mut(view) {
                    v.position = position;
                }
            }
            GrabUpdate::Resize { view, geometry } => {
                let Some(v) = self.views.get_mut(view) else {
                    return;
                };
                v.position = geometry.min;
                let surface = v.surface;
                self.shell.set_size(surface, geometry.size());
            }
        }
    }

    /// Hit-tests the pointer, updates the cursor icon and delivers
    /// enter/motion to the surface under it.
    fn hover(&mut self, p: Point<f64>, time: u32) {
        let pixel = p.floor();
        if let Some(menu) = self.menu.as_mut() {
            let over_menu = menu.bounds().contains(pixel);
            menu.hover(pixel);
            if over_menu {
                self.cursor.set_icon(Region::None.cursor_name());
                self.hovered = None;
                self.pointer_focus = None;
                return;
            }
        }

        self.hovered = view_at(
            &self.views,
            pixel,
            &self.shell,
            self.config.window.border_thickness,
        );
        let region = self.hovered.map_or(Region::None, |(_, r)| r);
        self.cursor.set_icon(region.cursor_name());

        let target = match self.hovered {
            Some((id, Region::SurfaceArea)) => self.views.get(id).map(|v| (v.surface, v.position)),
            _ => None,
        };
        match target {
            Some((surface, origin)) => {
                let local = p - origin.to_f64();
                if self.pointer_focus == Some(surface) {
                    self.shell.pointer_motion(surface, local, time);
                } else {
                    trace!("Pointer entered {:?} at {}", surface, local);
                    self.shell.pointer_enter(surface, local, time);
                    self.pointer_focus = Some(surface);
                }
            }
            None => self.pointer_focus = None,
        }
    }

    pub fn on_pointer_motion(&mut self, time: u32) {
        let p = self.cursor.position();
        match self.mode.on_motion(p, self.config.window.min_size) {
            Some(update) => self.apply(update),
            None => self.hover(p, time),
        }
    }

    /// # Panics
    ///
    /// On a press while a move or resize grab is active.
    pub fn on_pointer_button(&mut self, time: u32, button: Button, pressed: bool) {
        let p = self.cursor.position();
        if !pressed {
            if self.mode.is_normal() {
                if let Some(surface) = self.pointer_focus {
                    self.shell.pointer_button(surface, time, button, false);
                }
                return;
            }
            let (next, last) = self.mode.on_release(p, self.config.window.min_size);
            if let Some(update) = last {
                self.apply(update);
            }
            self.mode = next;
            self.hover(p, time);
            return;
        }

        self.mode.on_press();

        if let Some(menu) = self.menu.as_mut() {
            let pixel = p.floor();
            if menu.bounds().contains(pixel) {
                if let Some(item) = menu.item_at(pixel) {
                    menu.select(item);
                    self.retire_menu();
                }
                return;
            }
            debug!("Press outside menu, closing it");
            self.retire_menu();
        }

        let hit = view_at(
            &self.views,
            p.floor(),
            &self.shell,
            self.config.window.border_thickness,
        );
        if let Some((id, Region::SurfaceArea)) = hit {
            self.focus_view(id);
            if let Some(surface) = self.views.get(id).map(|v| v.surface) {
                self.shell.pointer_button(surface, time, button, true);
            }
        }
    }

    /// Draws one frame: background, views bottom to top, the focus outline,
    /// the bar and any open menu.
    pub fn on_frame<R>(&mut self, target: &mut R, time: u32)
    where
        R: Renderer + TextureSource,
    {
        self.output = Rect::from_size(target.output_size());
        for menu in self.retired.drain(..) {
            menu.release(&mut *target);
        }
        target.clear(self.config.output.background);

        let t = self.config.window.border_thickness;
        let mut focus_box = None;
        for view in self.views.iter().filter(|v| v.mapped) {
            let bb = view.bounding_box(&self.shell);
            if view.activated {
                focus_box = Some(bb);
            }
            draw_outline(&mut *target, bb, t, self.config.window.border_color);
            let Some(texture) = self.shell.surface_texture(view.surface) else {
                trace!("View {:?} has no content yet", view.id);
                continue;
            };
            let dst = Rect::from_origin_size(view.position, self.shell.surface_size(view.surface));
            if let Err(e) = target.draw_texture(&texture, dst, Transform::Normal) {
                warn!("Skipping view {:?} this frame: {}", view.id, e);
            }
        }
        if let Some(bb) = focus_box {
            draw_outline(&mut *target, bb, t, self.config.window.focus_color);
        }

        self.refresh_bar();
        self.bar.render(self.output, &mut *target);

        if let Some(menu) = &self.menu {
            menu.render(target);
        }

        self.frames += 1;
        trace!("Frame {} at {}ms", self.frames, time);
    }
}

fn draw_outline(target: &mut dyn Renderer, r: Rect<i32>, t: i32, color: Color) {
    if t <= 0 || r.is_empty() {
        return;
    }
    for band in outline(r, t) {
        target.draw_solid(band, color);
    }
}
