//! Per-stage visuals and their animation state.
//!
//! Exactly one visual is mounted at a time. Mounting builds any buffers the
//! visual needs (the supernova particle cloud); [`StageVisual::update`] runs
//! once per frame with the scene clock, and [`StageVisual::emit`] turns the
//! current state into primitives.
//!
//! Some rotations accumulate a fixed step per frame rather than per second,
//! so their speed follows the frame rate.

use rand::Rng;

use crate::render::math::{self, Vec3};
use crate::render::scene::{Blend, Material, Primitive};
use crate::stage::Stage;

/// Position, Euler rotation (XYZ order) and uniform scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: [0.0; 3],
        rotation: [0.0; 3],
        scale: 1.0,
    };

    /// Local point to parent space.
    pub fn apply(&self, p: Vec3) -> Vec3 {
        math::add(self.position, math::rotate_xyz(math::scale(p, self.scale), self.rotation))
    }
}

// ── Main sequence ──

const MAIN_SEQUENCE_RADIUS: f32 = 2.5;
const MAIN_SEQUENCE_SPIN: f32 = 0.002;
const MAIN_SEQUENCE_SURFACE: Material =
    Material::standard(math::rgb(0x4488ff), math::rgb(0x0044aa), 2.0);

#[derive(Debug, Clone)]
pub struct MainSequenceStar {
    spin: f32,
    scale: f32,
}

impl MainSequenceStar {
    fn mount() -> Self {
        Self { spin: 0.0, scale: 1.0 }
    }

    pub fn spin(&self) -> f32 {
        self.spin
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    fn update(&mut self, t: f32) {
        self.spin += MAIN_SEQUENCE_SPIN;
        self.scale = 1.0 + (t * 0.5).sin() * 0.02;
    }

    fn emit(&self, out: &mut Vec<Primitive<'_>>) {
        out.push(Primitive::PointLight {
            position: [0.0; 3],
            color: math::rgb(0x4488ff),
            intensity: 5.0,
            range: 20.0,
        });
        out.push(Primitive::Sphere {
            center: [0.0; 3],
            radius: MAIN_SEQUENCE_RADIUS * self.scale,
            spin: self.spin,
            material: MAIN_SEQUENCE_SURFACE,
        });
    }
}

// ── Red supergiant ──

const SUPERGIANT_SPIN: f32 = 0.0005;
const SUPERGIANT_SURFACE: Material =
    Material::standard(math::rgb(0xff3300), math::rgb(0xaa1100), 0.8);

#[derive(Debug, Clone)]
pub struct RedSupergiant {
    spin: f32,
    scale: f32,
}

impl RedSupergiant {
    fn mount() -> Self {
        Self { spin: 0.0, scale: 4.5 }
    }

    pub fn spin(&self) -> f32 {
        self.spin
    }

    /// Radius of the unit sphere after scaling.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    fn update(&mut self, t: f32) {
        self.spin += SUPERGIANT_SPIN;
        self.scale = 4.5 + (t * 0.2).sin() * 0.1;
    }

    fn emit(&self, out: &mut Vec<Primitive<'_>>) {
        out.push(Primitive::PointLight {
            position: [0.0; 3],
            color: math::rgb(0xff5500),
            intensity: 3.0,
            range: 30.0,
        });
        out.push(Primitive::Sphere {
            center: [0.0; 3],
            radius: self.scale,
            spin: self.spin,
            material: SUPERGIANT_SURFACE,
        });
    }
}

// ── Supernova ──

pub const SUPERNOVA_PARTICLES: usize = 3000;
/// Particles spread over `[-SPREAD/2, SPREAD/2)` on each axis.
const SUPERNOVA_SPREAD: f32 = 15.0;
/// Shockwave loop length in seconds.
pub const SHOCKWAVE_PERIOD: f32 = 2.5;
const PARTICLE_SIZE: f32 = 0.15;
const PARTICLE_MATERIAL: Material = Material::basic(math::rgb(0xffaa00), 0.9, Blend::Additive);

#[derive(Debug, Clone)]
pub struct SupernovaExplosion {
    particles: Vec<Vec3>,
    cloud: Transform,
    shock_scale: f32,
    shock_opacity: f32,
}

impl SupernovaExplosion {
    fn mount<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let particles = (0..SUPERNOVA_PARTICLES)
            .map(|_| {
                let r = (rng.random::<f32>() - 0.5) * SUPERNOVA_SPREAD;
                [r, r, r]
            })
            .collect();
        Self {
            particles,
            cloud: Transform::IDENTITY,
            shock_scale: 0.0,
            shock_opacity: 1.0,
        }
    }

    pub fn particles(&self) -> &[Vec3] {
        &self.particles
    }

    pub fn cloud(&self) -> Transform {
        self.cloud
    }

    pub fn shockwave(&self) -> (f32, f32) {
        (self.shock_scale, self.shock_opacity)
    }

    fn update(&mut self, t: f32) {
        self.cloud.rotation[1] = t * 0.1;
        self.cloud.scale = ((t * 2.0).sin() + 1.0) * 4.0 + 1.0;

        let phase = t.rem_euclid(SHOCKWAVE_PERIOD);
        self.shock_scale = phase * 20.0;
        self.shock_opacity = (1.0 - phase / 2.0).max(0.0);
    }

    fn emit<'a>(&'a self, out: &mut Vec<Primitive<'a>>) {
        out.push(Primitive::PointLight {
            position: [0.0; 3],
            color: math::rgb(0xffaa00),
            intensity: 15.0,
            range: 50.0,
        });
        out.push(Primitive::Points {
            positions: &self.particles,
            transform: self.cloud,
            size: PARTICLE_SIZE,
            material: PARTICLE_MATERIAL,
        });
        out.push(Primitive::Shell {
            center: [0.0; 3],
            radius: self.shock_scale,
            material: Material::basic([1.0; 3], self.shock_opacity, Blend::Normal),
        });
    }
}

// ── Neutron star ──

const NEUTRON_RADIUS: f32 = 0.8;
const NEUTRON_SPIN: f32 = 0.5;
const NEUTRON_SURFACE: Material = Material::standard([1.0; 3], math::rgb(0x00ffff), 4.0);
const JET_MATERIAL: Material = Material::basic(math::rgb(0x00ffff), 0.6, Blend::Additive);
const JET_TIP_RADIUS: f32 = 0.05;
const JET_BASE_RADIUS: f32 = 0.3;
const JET_LENGTH: f32 = 12.0;
const JET_OFFSET: f32 = 4.0;

/// Bobbing motion parameters.
const FLOAT_SPEED: f32 = 2.0;
const FLOAT_ROTATION_INTENSITY: f32 = 0.2;
const FLOAT_INTENSITY: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct NeutronStar {
    star_spin: f32,
    jets: Transform,
    /// Whole-group transform from the bobbing motion.
    float: Transform,
    float_offset: f32,
}

impl NeutronStar {
    fn mount<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            star_spin: 0.0,
            jets: Transform::IDENTITY,
            float: Transform::IDENTITY,
            float_offset: rng.random::<f32>() * 10_000.0,
        }
    }

    pub fn star_spin(&self) -> f32 {
        self.star_spin
    }

    pub fn jets(&self) -> Transform {
        self.jets
    }

    pub fn float(&self) -> Transform {
        self.float
    }

    fn update(&mut self, t: f32) {
        self.star_spin += NEUTRON_SPIN;

        let half = t * 0.5;
        self.jets.rotation = [
            half.cos() * 0.2,
            self.jets.rotation[1] + NEUTRON_SPIN,
            half.sin() * 0.2,
        ];

        let s = (self.float_offset + t) / 4.0 * FLOAT_SPEED;
        self.float.rotation = [
            s.cos() / 8.0 * FLOAT_ROTATION_INTENSITY,
            s.sin() / 8.0 * FLOAT_ROTATION_INTENSITY,
            s.sin() / 20.0 * FLOAT_ROTATION_INTENSITY,
        ];
        self.float.position[1] = s.sin() / 10.0 * FLOAT_INTENSITY;
    }

    /// Jet endpoints in the jet group's local space: `(base, tip)` pairs.
    fn jet_segments() -> [(Vec3, Vec3); 2] {
        let half = JET_LENGTH / 2.0;
        [
            // Upper jet, narrow end up.
            ([0.0, JET_OFFSET - half, 0.0], [0.0, JET_OFFSET + half, 0.0]),
            // Lower jet, flipped about X.
            ([0.0, -JET_OFFSET + half, 0.0], [0.0, -JET_OFFSET - half, 0.0]),
        ]
    }

    fn emit(&self, out: &mut Vec<Primitive<'_>>) {
        let center = self.float.apply([0.0; 3]);
        out.push(Primitive::PointLight {
            position: center,
            color: math::rgb(0x00ffff),
            intensity: 5.0,
            range: 30.0,
        });
        out.push(Primitive::Sphere {
            center,
            radius: NEUTRON_RADIUS,
            spin: self.star_spin,
            material: NEUTRON_SURFACE,
        });
        for (base, tip) in Self::jet_segments() {
            out.push(Primitive::Cone {
                base: self.float.apply(self.jets.apply(base)),
                tip: self.float.apply(self.jets.apply(tip)),
                base_radius: JET_BASE_RADIUS,
                tip_radius: JET_TIP_RADIUS,
                material: JET_MATERIAL,
            });
        }
    }
}

/// The mounted visual for the current stage.
#[derive(Debug, Clone)]
pub enum StageVisual {
    MainSequence(MainSequenceStar),
    RedSupergiant(RedSupergiant),
    Supernova(SupernovaExplosion),
    NeutronStar(NeutronStar),
}

impl StageVisual {
    /// Build a fresh visual with zeroed accumulators.
    pub fn mount<R: Rng + ?Sized>(stage: Stage, rng: &mut R) -> Self {
        match stage {
            Stage::MainSequence => Self::MainSequence(MainSequenceStar::mount()),
            Stage::RedSupergiant => Self::RedSupergiant(RedSupergiant::mount()),
            Stage::Supernova => Self::Supernova(SupernovaExplosion::mount(rng)),
            Stage::NeutronStar => Self::NeutronStar(NeutronStar::mount(rng)),
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            Self::MainSequence(_) => Stage::MainSequence,
            Self::RedSupergiant(_) => Stage::RedSupergiant,
            Self::Supernova(_) => Stage::Supernova,
            Self::NeutronStar(_) => Stage::NeutronStar,
        }
    }

    /// One frame at scene time `t` seconds.
    pub fn update(&mut self, t: f32) {
        match self {
            Self::MainSequence(v) => v.update(t),
            Self::RedSupergiant(v) => v.update(t),
            Self::Supernova(v) => v.update(t),
            Self::NeutronStar(v) => v.update(t),
        }
    }

    pub fn emit<'a>(&'a self, out: &mut Vec<Primitive<'a>>) {
        match self {
            Self::MainSequence(v) => v.emit(out),
            Self::RedSupergiant(v) => v.emit(out),
            Self::Supernova(v) => v.emit(out),
            Self::NeutronStar(v) => v.emit(out),
        }
    }
}
