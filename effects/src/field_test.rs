#![allow(clippy::float_cmp)]

use super::*;
use crate::config::RandomRange;
use crate::consts::{MAX_TICK_SECS, SYMBOLS};
use crate::surface::{DrawOp, RecordingSurface};
use crate::theme::Theme;

const FRAME: f64 = 1.0 / 60.0;

// =============================================================
// Helpers
// =============================================================

fn field_with(theme: Theme) -> (ParticleField, ThemeFlag) {
    let flag = ThemeFlag::new(theme);
    let mut field = ParticleField::new(FieldConfig::default(), flag.clone(), 7);
    field.initialize(800.0, 600.0);
    (field, flag)
}

fn field() -> ParticleField {
    field_with(Theme::Dark).0
}

fn positions(field: &ParticleField) -> Vec<(f64, f64, f64)> {
    field.sprites().iter().map(|s| (s.x, s.y, s.speed)).collect()
}

// =============================================================
// initialize / on_resize
// =============================================================

#[test]
fn new_field_is_empty() {
    let field = ParticleField::new(FieldConfig::default(), ThemeFlag::default(), 1);
    assert!(field.sprites().is_empty());
    assert_eq!(field.rebuilds(), 0);
}

#[test]
fn initialize_fills_pool_to_configured_count() {
    assert_eq!(field().sprites().len(), 25);
}

#[test]
fn initialize_respects_custom_count() {
    let config = FieldConfig { count: 3, ..FieldConfig::default() };
    let mut field = ParticleField::new(config, ThemeFlag::default(), 1);
    field.initialize(100.0, 100.0);
    assert_eq!(field.sprites().len(), 3);
}

#[test]
fn sprites_start_inside_viewport_with_bounded_attributes() {
    let field = field();
    for s in field.sprites() {
        assert!((0.0..800.0).contains(&s.x), "x {}", s.x);
        assert!((0.0..600.0).contains(&s.y), "y {}", s.y);
        assert!((14.0..34.0).contains(&s.size), "size {}", s.size);
        assert!((0.1..0.6).contains(&s.speed), "speed {}", s.speed);
        assert!((0.1..0.6).contains(&s.opacity), "opacity {}", s.opacity);
        assert!(SYMBOLS.contains(&s.text.as_str()), "text {}", s.text);
    }
}

#[test]
fn same_seed_is_deterministic() {
    let a = field();
    let b = field();
    assert_eq!(a.sprites(), b.sprites());
}

#[test]
fn resize_rebuilds_exactly_once_with_fixed_count() {
    let mut field = field();
    let before = field.rebuilds();
    field.on_resize(1024.0, 300.0);
    assert_eq!(field.rebuilds(), before + 1);
    assert_eq!(field.sprites().len(), 25);
    assert_eq!(field.viewport(), (1024.0, 300.0));
    for s in field.sprites() {
        assert!(s.x < 1024.0 && s.y < 300.0);
    }
}

#[test]
fn resize_discards_previous_sprites() {
    let mut field = field();
    let before = positions(&field);
    field.on_resize(800.0, 600.0);
    assert_ne!(positions(&field), before);
}

#[test]
fn zero_viewport_yields_empty_pool_until_valid_resize() {
    let mut field = field();
    field.on_resize(0.0, 600.0);
    assert!(field.sprites().is_empty());
    field.on_resize(800.0, -1.0);
    assert!(field.sprites().is_empty());
    field.on_resize(f64::NAN, 10.0);
    assert!(field.sprites().is_empty());
    field.on_resize(320.0, 240.0);
    assert_eq!(field.sprites().len(), 25);
}

#[test]
fn opacity_is_clamped_into_unit_interval() {
    let config = FieldConfig { opacity: RandomRange::new(0.9, 5.0), ..FieldConfig::default() };
    let mut field = ParticleField::new(config, ThemeFlag::default(), 3);
    field.initialize(100.0, 100.0);
    assert!(field.sprites().iter().all(|s| (0.0..=1.0).contains(&s.opacity)));
}

// =============================================================
// tick
// =============================================================

#[test]
fn tick_moves_sprites_up_by_speed() {
    let mut field = field();
    let before = field.sprites().to_vec();
    field.tick(FRAME);
    for (old, new) in before.iter().zip(field.sprites()) {
        assert!((old.y - old.speed - new.y).abs() < 1e-9);
        assert_eq!(old.x, new.x);
    }
}

#[test]
fn tick_zero_or_negative_dt_does_not_move() {
    let mut field = field();
    let before = positions(&field);
    field.tick(0.0);
    field.tick(-1.0);
    field.tick(f64::NAN);
    assert_eq!(positions(&field), before);
}

#[test]
fn tick_clamps_long_gaps() {
    let mut a = field();
    let mut b = field();
    a.tick(10.0);
    b.tick(MAX_TICK_SECS);
    assert_eq!(positions(&a), positions(&b));
}

#[test]
fn sprite_past_top_margin_wraps_below_bottom() {
    let config = FieldConfig { count: 1, speed: RandomRange::new(10.0, 0.0), ..FieldConfig::default() };
    let mut field = ParticleField::new(config, ThemeFlag::default(), 11);
    field.initialize(400.0, 100.0);
    let mut wrapped = false;
    for _ in 0..100 {
        let before = field.sprites()[0].y;
        field.tick(FRAME);
        let after = field.sprites()[0].y;
        if after > before {
            wrapped = true;
            assert_eq!(after, 150.0);
            assert!((0.0..400.0).contains(&field.sprites()[0].x));
        }
        assert!(after >= -50.0, "sprite left the wrap margin: {after}");
    }
    assert!(wrapped);
}

#[test]
fn sprites_persist_and_stay_bounded_over_many_ticks() {
    let mut field = field();
    for _ in 0..10_000 {
        field.tick(FRAME);
    }
    assert_eq!(field.sprites().len(), 25);
    for s in field.sprites() {
        assert!((0.0..=1.0).contains(&s.opacity));
        assert!(s.y >= -50.0 && s.y <= 650.0, "y {}", s.y);
    }
}

#[test]
fn wrap_keeps_size_speed_and_opacity() {
    let config = FieldConfig { count: 1, speed: RandomRange::new(30.0, 0.0), ..FieldConfig::default() };
    let mut field = ParticleField::new(config, ThemeFlag::default(), 5);
    field.initialize(200.0, 50.0);
    let before = field.sprites()[0].clone();
    for _ in 0..10 {
        field.tick(FRAME);
    }
    let after = &field.sprites()[0];
    assert_eq!(after.size, before.size);
    assert_eq!(after.speed, before.speed);
    assert_eq!(after.opacity, before.opacity);
}

// =============================================================
// draw / theme
// =============================================================

#[test]
fn draw_paints_background_then_every_glyph() {
    let mut field = field();
    let mut surface = RecordingSurface::new();
    field.draw(&mut surface).unwrap();

    assert_eq!(
        surface.ops[0],
        DrawOp::FillRect { x: 0.0, y: 0.0, w: 800.0, h: 600.0, color: "#020617".into() }
    );
    assert_eq!(surface.texts().count(), 25);
    assert_eq!(surface.alpha(), 1.0);
}

#[test]
fn glyphs_use_per_sprite_opacity_and_monospace_font() {
    let mut field = field();
    let mut surface = RecordingSurface::new();
    field.draw(&mut surface).unwrap();
    for (op, sprite) in surface.texts().zip(field.sprites()) {
        let DrawOp::FillText { alpha, font, color, .. } = op else {
            panic!("expected text op");
        };
        assert_eq!(*alpha, sprite.opacity);
        assert!(font.ends_with("\"JetBrains Mono\", monospace"));
        assert_eq!(color, "#334155");
    }
}

#[test]
fn theme_toggle_changes_colors_without_moving_sprites() {
    let (mut field, flag) = field_with(Theme::Dark);
    let before = positions(&field);

    flag.set(Theme::Light);
    field.on_theme_change();
    assert_eq!(positions(&field), before);

    let mut surface = RecordingSurface::new();
    field.draw(&mut surface).unwrap();
    let DrawOp::FillRect { color, .. } = &surface.ops[0] else {
        panic!("expected background fill");
    };
    assert_eq!(color, "#f8fafc");
    assert!(surface.texts().all(|op| matches!(op, DrawOp::FillText { color, .. } if color == "#e2e8f0")));
    assert_eq!(field.palette(), Palette::LIGHT);
}

#[test]
fn draw_rereads_flag_even_without_notification() {
    let (mut field, flag) = field_with(Theme::Light);
    let mut surface = RecordingSurface::new();
    field.draw(&mut surface).unwrap();
    flag.set(Theme::Dark);
    surface.clear_ops();
    field.draw(&mut surface).unwrap();
    assert!(matches!(&surface.ops[0], DrawOp::FillRect { color, .. } if color == "#020617"));
}

#[test]
fn draw_failure_is_reported() {
    let mut field = field();
    let mut surface = RecordingSurface::failing();
    assert!(field.draw(&mut surface).is_err());
}

#[test]
fn empty_pool_still_paints_background() {
    let mut field = ParticleField::new(FieldConfig::default(), ThemeFlag::default(), 1);
    field.initialize(0.0, 0.0);
    let mut surface = RecordingSurface::new();
    field.draw(&mut surface).unwrap();
    assert_eq!(surface.ops.len(), 1);
}
