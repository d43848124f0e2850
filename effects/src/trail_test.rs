#![allow(clippy::float_cmp)]

use super::*;
use crate::surface::{DrawOp, RecordingSurface};

const FRAME: f64 = 1.0 / 60.0;

// =============================================================
// Helpers
// =============================================================

fn trail() -> CursorTrail {
    let mut trail = CursorTrail::new(TrailConfig::default());
    trail.on_resize(1280.0, 720.0);
    trail
}

fn run(trail: &mut CursorTrail, frames: usize) {
    for _ in 0..frames {
        trail.tick(FRAME);
    }
}

fn distances(trail: &CursorTrail) -> Vec<f64> {
    let p = trail.pointer();
    trail.positions().iter().map(|pos| pos.distance(p)).collect()
}

// =============================================================
// Construction
// =============================================================

#[test]
fn new_chain_starts_at_origin() {
    let trail = trail();
    assert_eq!(trail.links().len(), 5);
    assert!(trail.positions().iter().all(|p| *p == Point::ORIGIN));
    assert_eq!(trail.pointer(), Point::ORIGIN);
}

#[test]
fn hover_defaults_to_false() {
    assert!(!trail().is_hovering());
}

#[test]
fn link_params_follow_config() {
    let trail = trail();
    let dampings: Vec<f64> = trail.links().iter().map(|l| l.params.damping).collect();
    assert_eq!(dampings, vec![25.0, 30.0, 35.0, 40.0, 45.0]);
}

#[test]
fn chain_length_follows_point_styles() {
    let mut config = TrailConfig::default();
    config.points.truncate(2);
    assert_eq!(CursorTrail::new(config).links().len(), 3);
}

// =============================================================
// Pointer input
// =============================================================

#[test]
fn pointer_move_does_not_move_links_until_tick() {
    let mut trail = trail();
    trail.on_pointer_move(400.0, 300.0);
    assert_eq!(trail.pointer(), Point::new(400.0, 300.0));
    assert!(trail.positions().iter().all(|p| *p == Point::ORIGIN));
}

#[test]
fn hover_flag_tracks_last_report() {
    let mut trail = trail();
    trail.on_pointer_over_target(true);
    assert!(trail.is_hovering());
    trail.on_pointer_over_target(false);
    assert!(!trail.is_hovering());
    trail.on_pointer_over_target(true);
    trail.on_pointer_over_target(true);
    assert!(trail.is_hovering());
}

// =============================================================
// tick
// =============================================================

#[test]
fn single_tick_moves_but_does_not_snap() {
    let mut trail = trail();
    trail.on_pointer_move(400.0, 300.0);
    trail.tick(FRAME);
    let head = trail.positions()[0];
    assert!(head.distance(Point::ORIGIN) > 0.0);
    assert!(head.distance(trail.pointer()) > 1.0);
}

#[test]
fn zero_dt_tick_is_noop() {
    let mut trail = trail();
    trail.on_pointer_move(400.0, 300.0);
    trail.tick(0.0);
    assert!(trail.positions().iter().all(|p| *p == Point::ORIGIN));
}

#[test]
fn latency_increases_along_chain() {
    let mut trail = trail();
    trail.on_pointer_move(500.0, 250.0);
    run(&mut trail, 6);
    let d = distances(&trail);
    for pair in d.windows(2) {
        assert!(pair[0] < pair[1], "distances not increasing: {d:?}");
    }
}

#[test]
fn distance_to_held_pointer_never_grows() {
    let mut trail = trail();
    trail.on_pointer_move(640.0, 360.0);
    let mut prev = distances(&trail);
    for _ in 0..300 {
        trail.tick(FRAME);
        let now = distances(&trail);
        for (i, (a, b)) in prev.iter().zip(&now).enumerate() {
            assert!(b <= &(a + 1e-9), "link {i} moved away: {a} -> {b}");
        }
        prev = now;
    }
}

#[test]
fn chain_converges_to_held_pointer() {
    let mut trail = trail();
    trail.on_pointer_move(640.0, 360.0);
    run(&mut trail, 300);
    for (i, d) in distances(&trail).iter().enumerate() {
        assert!(*d < 0.5, "link {i} still {d} px away");
    }
}

#[test]
fn chain_follows_a_moved_pointer() {
    let mut trail = trail();
    trail.on_pointer_move(100.0, 100.0);
    run(&mut trail, 300);
    trail.on_pointer_move(-200.0, 50.0);
    run(&mut trail, 300);
    assert!(distances(&trail).iter().all(|d| *d < 0.5));
}

#[test]
fn long_frame_gap_stays_stable() {
    let mut trail = trail();
    trail.on_pointer_move(1000.0, 1000.0);
    trail.tick(5.0);
    for p in trail.positions() {
        assert!(p.x.is_finite() && p.y.is_finite());
        assert!(p.x <= 1000.0 + 1e-9 && p.y <= 1000.0 + 1e-9);
    }
}

#[test]
fn head_size_springs_toward_hover_size() {
    let mut trail = trail();
    assert_eq!(trail.head_diameter(), 16.0);
    trail.on_pointer_over_target(true);
    trail.tick(FRAME);
    let mid = trail.head_diameter();
    assert!(mid > 16.0 && mid < 19.2, "diameter {mid}");
    run(&mut trail, 120);
    assert!((trail.head_diameter() - 24.0 * 0.8).abs() < 0.05);
    assert!((trail.head_radius() - 24.0 * 0.8 / 2.0).abs() < 0.05);
}

#[test]
fn hover_start_never_shrinks_head_below_idle() {
    let mut trail = trail();
    let idle = trail.head_radius();
    trail.on_pointer_over_target(true);
    for frame in 0..180 {
        trail.tick(FRAME);
        let r = trail.head_radius();
        assert!(r >= idle, "frame {frame}: radius {r} below idle {idle}");
    }
}

#[test]
fn leaving_hover_returns_head_to_idle_size() {
    let mut trail = trail();
    trail.on_pointer_over_target(true);
    run(&mut trail, 120);
    trail.on_pointer_over_target(false);
    run(&mut trail, 120);
    assert!((trail.head_diameter() - 16.0).abs() < 0.05);
    assert!(trail.hover_mix().abs() < 0.01);
}

#[test]
fn hover_mix_springs_in_rather_than_jumping() {
    let mut trail = trail();
    trail.on_pointer_over_target(true);
    assert_eq!(trail.hover_mix(), 0.0);
    trail.tick(FRAME);
    let first = trail.hover_mix();
    assert!(first > 0.0 && first < 0.5, "mix {first}");
    run(&mut trail, 120);
    assert!((trail.hover_mix() - 1.0).abs() < 0.01);
}

// =============================================================
// draw
// =============================================================

#[test]
fn draw_clears_then_paints_tail_first_head_last() {
    let trail = trail();
    let mut surface = RecordingSurface::new();
    trail.draw(&mut surface).unwrap();

    assert_eq!(surface.ops[0], DrawOp::ClearRect { x: 0.0, y: 0.0, w: 1280.0, h: 720.0 });
    let radii: Vec<f64> = surface
        .circles()
        .map(|op| match op {
            DrawOp::FillCircle { radius, .. } => *radius,
            _ => 0.0,
        })
        .collect();
    assert_eq!(radii, vec![3.0, 4.0, 5.0, 6.0, 8.0]);
}

#[test]
fn idle_trail_uses_gradient_colors_and_opacity() {
    let trail = trail();
    let mut surface = RecordingSurface::new();
    trail.draw(&mut surface).unwrap();
    let styles: Vec<(String, f64)> = surface
        .circles()
        .filter_map(|op| match op {
            DrawOp::FillCircle { color, alpha, .. } => Some((color.clone(), *alpha)),
            _ => None,
        })
        .collect();
    assert_eq!(styles[0], ("#9333ea".to_owned(), 0.4));
    assert_eq!(styles[3], ("#0891b2".to_owned(), 0.7));
    assert_eq!(styles[4], ("#ffffff".to_owned(), 1.0));
    assert!(!surface.ops.iter().any(|op| matches!(op, DrawOp::StrokeCircle { .. })));
}

fn fill_circles(surface: &RecordingSurface) -> Vec<(f64, String)> {
    surface
        .circles()
        .filter_map(|op| match op {
            DrawOp::FillCircle { radius, color, .. } => Some((*radius, color.clone())),
            _ => None,
        })
        .collect()
}

fn ring_alpha(surface: &RecordingSurface) -> Option<f64> {
    surface.ops.iter().find_map(|op| match op {
        DrawOp::StrokeCircle { alpha, line_width, .. } if *line_width == 2.0 => Some(*alpha),
        _ => None,
    })
}

#[test]
fn settled_hover_recolors_and_enlarges_trail_and_rings_head() {
    let mut trail = trail();
    trail.on_pointer_over_target(true);
    run(&mut trail, 120);
    let mut surface = RecordingSurface::new();
    trail.draw(&mut surface).unwrap();

    let points = fill_circles(&surface);
    assert!((points[0].0 - 4.5).abs() < 0.01, "{points:?}");
    assert!((points[3].0 - 9.0).abs() < 0.01, "{points:?}");
    assert!(points[..4].iter().all(|(_, color)| color == "#22d3ee"), "{points:?}");
    let alpha = ring_alpha(&surface).unwrap();
    assert!((alpha - 1.0).abs() < 0.01);
}

#[test]
fn hover_restyle_is_gradual() {
    let mut trail = trail();
    trail.on_pointer_over_target(true);

    let mut surface = RecordingSurface::new();
    trail.draw(&mut surface).unwrap();
    assert_eq!(fill_circles(&surface)[0], (3.0, "#9333ea".to_owned()));
    assert_eq!(ring_alpha(&surface), None);

    trail.tick(FRAME);
    surface.clear_ops();
    trail.draw(&mut surface).unwrap();
    let (radius, color) = fill_circles(&surface)[0].clone();
    assert!(radius > 3.0 && radius < 4.5, "radius {radius}");
    assert!(color != "#9333ea" && color != "#22d3ee", "color {color}");
    let alpha = ring_alpha(&surface).unwrap();
    assert!(alpha > 0.0 && alpha < 1.0, "ring alpha {alpha}");
}

#[test]
fn ring_disappears_when_hover_ends() {
    let mut trail = trail();
    trail.on_pointer_over_target(true);
    run(&mut trail, 30);
    trail.on_pointer_over_target(false);
    let mut surface = RecordingSurface::new();
    trail.draw(&mut surface).unwrap();
    assert_eq!(ring_alpha(&surface), None);
}

#[test]
fn only_the_head_uses_the_blend_mode() {
    let trail = trail();
    let mut surface = RecordingSurface::new();
    trail.draw(&mut surface).unwrap();

    let blend_at = surface
        .ops
        .iter()
        .position(|op| *op == DrawOp::Composite { op: "difference".into() })
        .unwrap();
    let fills_before = surface.ops[..blend_at].iter().filter(|op| matches!(op, DrawOp::FillCircle { .. })).count();
    assert_eq!(fills_before, 4);
    assert!(matches!(&surface.ops[blend_at + 1], DrawOp::FillCircle { color, .. } if color == "#ffffff"));
    assert_eq!(surface.composite(), "source-over");
}

#[test]
fn draw_leaves_alpha_at_one() {
    let trail = trail();
    let mut surface = RecordingSurface::new();
    trail.draw(&mut surface).unwrap();
    assert_eq!(surface.alpha(), 1.0);
}

#[test]
fn draw_failure_is_reported() {
    let trail = trail();
    assert!(trail.draw(&mut RecordingSurface::failing()).is_err());
}

// =============================================================
// blend_color
// =============================================================

#[test]
fn blend_color_endpoints_return_inputs_verbatim() {
    assert_eq!(blend_color("#ABCDEF", "#22d3ee", 0.0), "#ABCDEF");
    assert_eq!(blend_color("#ABCDEF", "#22d3ee", 1.0), "#22d3ee");
    assert_eq!(blend_color("#ABCDEF", "#22d3ee", -0.2), "#ABCDEF");
    assert_eq!(blend_color("#ABCDEF", "#22d3ee", 1.1), "#22d3ee");
}

#[test]
fn blend_color_mixes_hex_channels() {
    assert_eq!(blend_color("#000000", "#ffffff", 0.5), "#808080");
    assert_eq!(blend_color("#ff0000", "#0000ff", 0.25), "#bf0040");
}

#[test]
fn blend_color_switches_non_hex_at_midpoint() {
    assert_eq!(blend_color("red", "#22d3ee", 0.4), "red");
    assert_eq!(blend_color("red", "#22d3ee", 0.6), "#22d3ee");
    assert_eq!(blend_color("#fff", "#22d3ee", 0.6), "#22d3ee");
}
