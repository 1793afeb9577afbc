//! Frame composition tests
//!
//! Renders whole frames through `Compositor::on_frame` into the CPU pixmap
//! renderer and checks individual pixels.

use anyhow::Result;
use trellis::backend::headless::{HeadlessCursor, HeadlessShell};
use trellis::backend::pixmap::PixmapRenderer;
use trellis::backend::{Color, Texture};
use trellis::{Compositor, MenuItem, Point, TrellisConfig, ViewId};

type Headless = Compositor<HeadlessShell, HeadlessCursor>;

const RED: Color = Color::rgb(200, 0, 0);
const GREEN: Color = Color::rgb(0, 200, 0);

fn config() -> TrellisConfig {
    let mut config = TrellisConfig::default();
    config.output.width = 200;
    config.output.height = 150;
    config.window.border_thickness = 2;
    config.bar.height = 10;
    config.bar.padding = 8;
    config.font.advance = 4;
    config.font.line_height = 8;
    config
}

fn setup() -> Result<(Headless, PixmapRenderer)> {
    let config = config();
    let target = PixmapRenderer::new(
        Point::new(config.output.width, config.output.height),
        config.font.metrics(),
    )?;
    Ok((
        Compositor::new(config, HeadlessShell::new(), HeadlessCursor::new()),
        target,
    ))
}

fn spawn(
    c: &mut Headless,
    target: &mut PixmapRenderer,
    size: Point<i32>,
    color: Color,
    title: &str,
) -> Result<ViewId> {
    let texture = target.upload_solid(size, color)?;
    let shell = c.shell_mut();
    let surface = shell.create_surface(size);
    shell.set_texture(surface, texture);
    Ok(c.map_view(surface, title))
}

#[test]
fn test_views_stack_bottom_to_top() -> Result<()> {
    let (mut c, mut target) = setup()?;
    let cfg = config();
    // both land at the top-left of the area below the bar
    spawn(&mut c, &mut target, Point::new(50, 50), RED, "a")?;
    spawn(&mut c, &mut target, Point::new(30, 30), GREEN, "b")?;
    c.on_frame(&mut target, 16);

    assert_eq!(c.frames(), 1);
    // the upper view covers the lower one where they overlap
    assert_eq!(target.pixel(5, 15), Some(GREEN));
    assert_eq!(target.pixel(40, 40), Some(RED));
    // unfocused outline to the right of the lower view
    assert_eq!(target.pixel(51, 30), Some(cfg.window.border_color));
    // the focus outline goes on top of everything else
    assert_eq!(target.pixel(31, 20), Some(cfg.window.focus_color));
    // empty output
    assert_eq!(target.pixel(150, 100), Some(cfg.output.background));
    // bar strip between its labels
    assert_eq!(target.pixel(100, 2), Some(cfg.bar.background));
    Ok(())
}

#[test]
fn test_focus_change_moves_outline() -> Result<()> {
    let (mut c, mut target) = setup()?;
    let cfg = config();
    let a = spawn(&mut c, &mut target, Point::new(50, 50), RED, "a")?;
    spawn(&mut c, &mut target, Point::new(30, 30), GREEN, "b")?;
    c.focus_view(a);
    c.on_frame(&mut target, 16);

    // raised, so it now hides the smaller view entirely
    assert_eq!(target.pixel(5, 15), Some(RED));
    assert_eq!(target.pixel(51, 30), Some(cfg.window.focus_color));
    Ok(())
}

#[test]
fn test_tiled_views_fill_usable_area() -> Result<()> {
    let (mut c, mut target) = setup()?;
    spawn(&mut c, &mut target, Point::new(10, 10), RED, "a")?;
    spawn(&mut c, &mut target, Point::new(10, 10), GREEN, "b")?;
    c.tile();
    c.on_frame(&mut target, 16);

    // textures are scaled to the tiled surface size
    assert_eq!(target.pixel(50, 80), Some(RED));
    assert_eq!(target.pixel(150, 80), Some(GREEN));
    assert_eq!(target.pixel(97, 149), Some(RED));
    Ok(())
}

#[test]
fn test_broken_view_texture_is_skipped() -> Result<()> {
    let (mut c, mut target) = setup()?;
    let cfg = config();
    spawn(&mut c, &mut target, Point::new(40, 40), RED, "a")?;

    let shell = c.shell_mut();
    let broken = shell.create_surface(Point::new(20, 20));
    shell.set_texture(
        broken,
        Texture {
            id: 9999,
            size: Point::new(20, 20),
        },
    );
    c.map_view(broken, "broken");
    c.on_frame(&mut target, 16);

    // the broken view draws nothing, the one below it still shows
    assert_eq!(target.pixel(5, 15), Some(RED));
    assert_eq!(target.pixel(100, 100), Some(cfg.output.background));
    assert_eq!(c.frames(), 1);
    Ok(())
}

#[test]
fn test_unmapped_views_are_not_drawn() -> Result<()> {
    let (mut c, mut target) = setup()?;
    let cfg = config();
    let a = spawn(&mut c, &mut target, Point::new(40, 40), RED, "a")?;
    c.unmap_view(a);
    c.on_frame(&mut target, 16);
    assert_eq!(target.pixel(5, 15), Some(cfg.output.background));
    Ok(())
}

#[test]
fn test_menu_highlights_hovered_item() -> Result<()> {
    let (mut c, mut target) = setup()?;
    let cfg = config();
    let active = cfg.menu.active_style();
    let inactive = cfg.menu.inactive_style();

    let mut menu = c.new_menu(Point::new(100, 60));
    for text in ["one", "two"] {
        menu.add(MenuItem::labelled(text, active, inactive, 2, &mut target, || {})?);
    }
    c.open_menu(menu);

    c.cursor_mut().warp_to(Point::new(110.0, 70.0));
    c.on_pointer_motion(0);
    c.on_frame(&mut target, 16);

    // label background of each item, above its glyph row
    assert_eq!(target.pixel(107, 67), Some(cfg.menu.active_bg));
    assert_eq!(target.pixel(107, 83), Some(cfg.menu.inactive_bg));
    // padding around the label shows the menu background
    assert_eq!(target.pixel(105, 65), Some(cfg.menu.background));
    Ok(())
}

#[test]
fn test_label_textures_do_not_accumulate() -> Result<()> {
    let (mut c, mut target) = setup()?;
    for i in 0..200 {
        let surface = c.shell_mut().create_surface(Point::new(30, 30));
        let view = c.map_view(surface, &format!("title {}", i));
        c.on_frame(&mut target, i);
        assert_eq!(target.texture_count(), 2);
        c.destroy_view(view);
        c.on_frame(&mut target, i);
        // the bar's title and count labels are all that stay resident
        assert_eq!(target.texture_count(), 2);
    }
    Ok(())
}

#[test]
fn test_closed_menus_release_their_labels() -> Result<()> {
    let (mut c, mut target) = setup()?;
    let cfg = config();
    c.on_frame(&mut target, 0);
    let baseline = target.texture_count();

    for (press, time) in [(Point::new(5.0, 140.0), 16), (Point::new(110.0, 70.0), 32)] {
        let mut menu = c.new_menu(Point::new(100, 60));
        for text in ["one", "two"] {
            menu.add(MenuItem::labelled(
                text,
                cfg.menu.active_style(),
                cfg.menu.inactive_style(),
                2,
                &mut target,
                || {},
            )?);
        }
        c.open_menu(menu);
        c.on_frame(&mut target, time);
        assert_eq!(target.texture_count(), baseline + 4);

        c.cursor_mut().warp_to(press);
        c.on_pointer_button(time, trellis::backend::BTN_LEFT, true);
        assert!(c.menu().is_none());
        c.on_frame(&mut target, time);
        assert_eq!(target.texture_count(), baseline);
    }
    Ok(())
}
