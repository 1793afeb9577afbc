//! Status bar
//!
//! A strip along the top or bottom of the output showing the focused view's
//! title on the left and the number of mapped views on the right. The widget
//! tree is built on first render and afterwards only its labels change, so a
//! frame without status changes reuses every cached size.

use crate::backend::{Renderer, TextStyle, TextureSource};
use crate::config::{BarConfig, BarPosition};
use crate::error::RenderError;
use crate::geometry::{Edges, Point, Rect};
use crate::widget::Widget;
use log::{debug, warn};

const TITLE: usize = 1;
const COUNT: usize = 2;

#[derive(Debug)]
pub struct StatusBar {
    config: BarConfig,
    title: String,
    count: String,
    root: Option<Widget>,
    dirty: bool,
}

impl StatusBar {
    pub fn new(config: BarConfig) -> Self {
        Self {
            config,
            title: String::new(),
            count: count_text(0),
            root: None,
            dirty: true,
        }
    }

    /// Updates the shown status. Returns true if anything changed.
    pub fn set_status(&mut self, title: &str, views: usize) -> bool {
        let count = count_text(views);
        if self.title == title && self.count == count {
            return false;
        }
        debug!("Bar status: '{}' / {}", title, count);
        self.title = title.to_string();
        self.count = count;
        self.dirty = true;
        true
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn count(&self) -> &str {
        &self.count
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Strip of `output` covered by the bar; empty when disabled.
    pub fn area(&self, output: Rect<i32>) -> Rect<i32> {
        if !self.config.enabled || output.is_empty() {
            return Rect::zero();
        }
        let h = self.config.height.min(output.dy());
        match self.config.position {
            BarPosition::Top => Rect::new(output.min, Point::new(output.max.x, output.min.y + h)),
            BarPosition::Bottom => Rect::new(Point::new(output.min.x, output.max.y - h), output.max),
        }
    }

    /// Part of `output` left for views.
    pub fn usable_area(&self, output: Rect<i32>) -> Rect<i32> {
        let bar = self.area(output);
        if bar.is_empty() {
            return output;
        }
        match self.config.position {
            BarPosition::Top => Rect::new(Point::new(output.min.x, bar.max.y), output.max),
            BarPosition::Bottom => Rect::new(output.min, Point::new(output.max.x, bar.min.y)),
        }
    }

    fn style(&self) -> TextStyle {
        TextStyle {
            fg: self.config.foreground,
            bg: self.config.background,
        }
    }

    fn build(&self, source: &mut dyn TextureSource) -> Result<Widget, RenderError> {
        let pad = self.config.padding;
        let style = self.style();
        let side = |edge, label| Widget::padding(0, 0, pad, pad, Widget::align(edge, label));
        let title = Widget::label(&self.title, style, source)?;
        let count = match Widget::label(&self.count, style, source) {
            Ok(count) => count,
            Err(e) => {
                title.release(source);
                return Err(e);
            }
        };
        Ok(Widget::stack(vec![
            Widget::fill(self.config.background),
            side(Edges::LEFT, title),
            side(Edges::RIGHT, count),
        ]))
    }

    fn refresh(&mut self, source: &mut dyn TextureSource) -> Result<(), RenderError> {
        let Some(root) = self.root.as_mut() else {
            self.root = Some(self.build(source)?);
            return Ok(());
        };
        for (index, text) in [(TITLE, &self.title), (COUNT, &self.count)] {
            if let Some(label) = root
                .child_mut(index)
                .and_then(|p| p.child_mut(0))
                .and_then(|a| a.child_mut(0))
            {
                label.set_text(text, source)?;
            }
        }
        Ok(())
    }

    /// Lays out and draws the bar, rebuilding labels first if the status
    /// changed. A failed label upload skips the bar for this frame.
    pub fn render<R>(&mut self, output: Rect<i32>, target: &mut R)
    where
        R: Renderer + TextureSource,
    {
        let area = self.area(output);
        if area.is_empty() {
            return;
        }
        if self.dirty {
            if let Err(e) = self.refresh(target) {
                warn!("Failed to update status bar: {}", e);
                return;
            }
            self.dirty = false;
        }
        if let Some(root) = self.root.as_mut() {
            root.size(area.size(), area.size());
            root.position(area);
            root.render(target);
        }
    }
}

fn count_text(views: usize) -> String {
    match views {
        1 => String::from("1 view"),
        n => format!("{} views", n),
    }
}
