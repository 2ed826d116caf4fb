//! egui Painter rasterization of a [`SceneFrame`].
//!
//! Shapes are drawn back to front. Additive primitives use premultiplied
//! colors with zero alpha so they brighten whatever is underneath. Bloom is
//! approximated with stacked additive halos around surfaces brighter than
//! the luminance threshold.

use egui::{Color32, Pos2, Rect, Shape, Stroke};
use rayon::prelude::*;

use crate::render::camera::{OrbitCamera, Projected, View};
use crate::render::math::{self, Vec3};
use crate::render::scene::{luminance, Blend, BloomSettings, Material, Primitive, SceneFrame};
use crate::render::starfield::{Star, Starfield};

/// Rings used to shade a sphere from limb to center.
const LIMB_RINGS: usize = 6;
const HALO_LAYERS: usize = 5;
/// Bright patches on a sphere's equator that reveal its spin.
const SPIN_SPOTS: usize = 3;

/// Buffers reused across frames.
#[derive(Default)]
pub struct PaintScratch {
    stars: Vec<Option<Projected>>,
    points: Vec<Option<Projected>>,
    order: Vec<(f32, usize)>,
}

impl PaintScratch {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Paint the whole scene into `rect`.
pub fn paint_scene(
    painter: &egui::Painter,
    rect: Rect,
    frame: &SceneFrame<'_>,
    camera: &OrbitCamera,
    starfield: &Starfield,
    scratch: &mut PaintScratch,
) {
    painter.rect_filled(rect, 0.0, to_color(frame.background, 1.0));

    let view = camera.view([rect.width(), rect.height()]);
    paint_stars(painter, rect, &view, starfield.stars(), frame.time, &mut scratch.stars);

    scratch.order.clear();
    scratch
        .order
        .extend(frame.primitives.iter().enumerate().map(|(i, p)| (view.depth_of(p.anchor()), i)));
    // Far first; ties keep emission order.
    scratch
        .order
        .sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    for k in 0..scratch.order.len() {
        let index = scratch.order[k].1;
        let Some(primitive) = frame.primitives.get(index) else {
            continue;
        };
        match primitive {
            Primitive::Sphere { center, radius, spin, material } => {
                paint_sphere(painter, rect, &view, *center, *radius, *spin, material, frame);
            }
            Primitive::Shell { center, radius, material } => {
                paint_shell(painter, rect, &view, *center, *radius, material);
            }
            Primitive::Cone { base, tip, base_radius, tip_radius, material } => {
                paint_cone(painter, rect, &view, [*base, *tip], [*base_radius, *tip_radius], material);
            }
            Primitive::Points { positions, transform, size, material } => {
                positions
                    .par_iter()
                    .map(|p| view.project(transform.apply(*p)))
                    .collect_into_vec(&mut scratch.points);
                paint_points(painter, rect, &view, &scratch.points, *size, material);
            }
            Primitive::PointLight { position, color, intensity, range } => {
                paint_light_glow(painter, rect, &view, *position, *color, *intensity, *range);
            }
        }
    }
}

fn screen(rect: Rect, p: &Projected) -> Pos2 {
    Pos2::new(rect.min.x + p.pos[0], rect.min.y + p.pos[1])
}

fn paint_stars(
    painter: &egui::Painter,
    rect: Rect,
    view: &View,
    stars: &[Star],
    time: f32,
    projected: &mut Vec<Option<Projected>>,
) {
    stars
        .par_iter()
        .map(|s| view.project(s.position))
        .collect_into_vec(projected);

    for (star, p) in stars.iter().zip(projected.iter()) {
        let Some(p) = p else { continue };
        let pos = screen(rect, p);
        if !rect.expand(4.0).contains(pos) {
            continue;
        }
        let diameter = Starfield::point_size(star, p.depth, time);
        // Soft edge: faint outer disc, brighter core.
        let grey = star.brightness;
        painter.circle_filled(pos, (diameter * 0.5).max(0.4), additive([grey; 3], 0.35));
        painter.circle_filled(pos, (diameter * 0.25).max(0.3), additive([grey; 3], 0.65));
    }
}

#[allow(clippy::too_many_arguments)]
fn paint_sphere(
    painter: &egui::Painter,
    rect: Rect,
    view: &View,
    center: Vec3,
    radius: f32,
    spin: f32,
    material: &Material,
    frame: &SceneFrame<'_>,
) {
    let Some(p) = view.project(center) else { return };
    let pos = screen(rect, &p);
    let r = radius * p.scale;
    if r < 0.5 {
        return;
    }

    let radiance = material.radiance(frame.ambient);
    paint_bloom(painter, pos, r, radiance, &frame.bloom);

    // Limb darkening: concentric discs, darkest at the rim.
    for i in 0..LIMB_RINGS {
        let f = 1.0 - i as f32 / LIMB_RINGS as f32;
        let shade = 0.6 + 0.4 * (1.0 - f * f);
        painter.circle_filled(pos, r * f, to_color(math::scale(radiance, shade), material.opacity));
    }

    // Spin markers on the equator; only the near hemisphere is visible.
    for k in 0..SPIN_SPOTS {
        let lon = spin + k as f32 * std::f32::consts::TAU / SPIN_SPOTS as f32;
        let facing = lon.cos();
        if facing <= 0.0 {
            continue;
        }
        let offset = Pos2::new(pos.x + r * 0.7 * lon.sin(), pos.y);
        painter.circle_filled(offset, r * 0.12 * facing, additive(radiance, 0.15 * facing));
    }
}

fn paint_bloom(painter: &egui::Painter, pos: Pos2, r: f32, radiance: Vec3, bloom: &BloomSettings) {
    let excess = luminance(radiance) - bloom.threshold;
    if excess <= 0.0 {
        return;
    }
    let strength = (excess * bloom.intensity).min(4.0) / HALO_LAYERS as f32;
    let glow = math::normalize(radiance);
    for i in (1..=HALO_LAYERS).rev() {
        let spread = 1.0 + bloom.radius * 4.0 * i as f32 / HALO_LAYERS as f32;
        painter.circle_filled(pos, r * spread, additive(glow, 0.12 * strength));
    }
}

fn paint_shell(
    painter: &egui::Painter,
    rect: Rect,
    view: &View,
    center: Vec3,
    radius: f32,
    material: &Material,
) {
    if radius <= 0.0 || material.opacity <= 0.0 {
        return;
    }
    // Camera inside the shell: its far side covers the whole view.
    if math::length(math::sub(view.eye, center)) < radius {
        painter.rect_filled(rect, 0.0, to_color(material.color, material.opacity * 0.5));
        return;
    }
    let Some(p) = view.project(center) else { return };
    let pos = screen(rect, &p);
    let r = radius * p.scale;
    painter.circle_filled(pos, r, to_color(material.color, material.opacity * 0.5));
    painter.circle_stroke(
        pos,
        r,
        Stroke::new(2.0, to_color(material.color, material.opacity)),
    );
}

fn paint_cone(
    painter: &egui::Painter,
    rect: Rect,
    view: &View,
    ends: [Vec3; 2],
    radii: [f32; 2],
    material: &Material,
) {
    let (Some(a), Some(b)) = (view.project(ends[0]), view.project(ends[1])) else {
        return;
    };
    let (pa, pb) = (screen(rect, &a), screen(rect, &b));
    let axis = pb - pa;
    let len = axis.length();
    if len < 0.5 {
        return;
    }
    let normal = egui::vec2(-axis.y, axis.x) / len;
    let wa = radii[0] * a.scale;
    let wb = radii[1] * b.scale;
    let quad = vec![pa + normal * wa, pb + normal * wb, pb - normal * wb, pa - normal * wa];
    painter.add(Shape::convex_polygon(quad, fill(material), Stroke::NONE));
    // Bright core line.
    painter.line_segment([pa, pb], Stroke::new((wb * 0.8).max(1.0), fill(material)));
}

fn paint_points(
    painter: &egui::Painter,
    rect: Rect,
    view: &View,
    projected: &[Option<Projected>],
    size: f32,
    material: &Material,
) {
    let half_h = view.viewport_height() * 0.5;
    let color = fill(material);
    for p in projected.iter().flatten() {
        let pos = screen(rect, p);
        if !rect.contains(pos) {
            continue;
        }
        let diameter = size * half_h / p.depth;
        painter.circle_filled(pos, (diameter * 0.5).max(0.5), color);
    }
}

fn paint_light_glow(
    painter: &egui::Painter,
    rect: Rect,
    view: &View,
    position: Vec3,
    color: Vec3,
    intensity: f32,
    range: f32,
) {
    let Some(p) = view.project(position) else { return };
    let pos = screen(rect, &p);
    let r = range * 0.25 * p.scale;
    let strength = (intensity / 15.0).min(1.0) * 0.05;
    for i in 1..=3 {
        painter.circle_filled(pos, r * i as f32 / 3.0, additive(color, strength));
    }
}

fn channel(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Clamped color with straight alpha.
fn to_color(c: Vec3, opacity: f32) -> Color32 {
    Color32::from_rgba_unmultiplied(channel(c[0]), channel(c[1]), channel(c[2]), channel(opacity))
}

/// Color that adds to what is already drawn.
fn additive(c: Vec3, strength: f32) -> Color32 {
    let s = strength.clamp(0.0, 1.0);
    Color32::from_rgba_premultiplied(channel(c[0] * s), channel(c[1] * s), channel(c[2] * s), 0)
}

fn fill(material: &Material) -> Color32 {
    match material.blend {
        Blend::Additive => additive(material.color, material.opacity),
        Blend::Normal => to_color(material.color, material.opacity),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_clamp() {
        assert_eq!(channel(-1.0), 0);
        assert_eq!(channel(0.5), 128);
        assert_eq!(channel(3.0), 255);
    }

    #[test]
    fn additive_has_zero_alpha() {
        let c = additive([1.0, 0.5, 0.0], 0.5);
        assert_eq!(c.a(), 0);
        assert_eq!(c.r(), 128);
        assert_eq!(c.g(), 64);
        assert_eq!(c.b(), 0);
    }

    #[test]
    fn fill_follows_blend_mode() {
        let jet = Material::basic([0.0, 1.0, 1.0], 0.6, Blend::Additive);
        assert_eq!(fill(&jet).a(), 0);
        let shell = Material::basic([1.0; 3], 0.5, Blend::Normal);
        assert!(fill(&shell).a() > 0);
    }

    #[test]
    fn paints_every_stage_without_panicking() {
        use crate::render::scene::SceneRenderer;
        use crate::stage::STAGE_ORDER;

        let ctx = egui::Context::default();
        let mut scratch = PaintScratch::new();
        for stage in STAGE_ORDER {
            let mut scene = SceneRenderer::with_seed(stage, 9);
            scene.update(1.3);
            let _ = ctx.run(egui::RawInput::default(), |ctx| {
                egui::CentralPanel::default().show(ctx, |ui| {
                    let rect = ui.max_rect();
                    let frame = scene.frame();
                    paint_scene(ui.painter(), rect, &frame, scene.camera(), scene.starfield(), &mut scratch);
                });
            });
        }
        assert_eq!(scratch.stars.len(), crate::render::starfield::STAR_COUNT);
    }
}
