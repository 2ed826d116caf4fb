//! Scene description and the stage-driven renderer.
//!
//! [`SceneRenderer`] owns the camera, the starfield and exactly one mounted
//! [`StageVisual`]. Each frame it emits a flat list of [`Primitive`]s that
//! the painter rasterizes; nothing here touches egui.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::render::animator::{StageVisual, Transform};
use crate::render::camera::OrbitCamera;
use crate::render::math::{self, Vec3};
use crate::render::starfield::Starfield;
use crate::stage::Stage;

pub const BACKGROUND: Vec3 = math::rgb(0x05050a);
pub const AMBIENT_INTENSITY: f32 = 0.2;

/// Threshold-and-glow parameters for the bloom pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomSettings {
    /// Luminance above which a surface glows.
    pub threshold: f32,
    pub intensity: f32,
    /// Halo extent relative to the glowing shape.
    pub radius: f32,
}

pub const BLOOM: BloomSettings = BloomSettings {
    threshold: 1.0,
    intensity: 1.5,
    radius: 0.5,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blend {
    Normal,
    Additive,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Vec3,
    pub emissive: Vec3,
    pub emissive_intensity: f32,
    pub opacity: f32,
    pub blend: Blend,
    /// Lit surfaces take ambient light; unlit ones show `color` as is.
    pub lit: bool,
}

impl Material {
    /// Lit surface with an emissive term.
    pub const fn standard(color: Vec3, emissive: Vec3, emissive_intensity: f32) -> Self {
        Self {
            color,
            emissive,
            emissive_intensity,
            opacity: 1.0,
            blend: Blend::Normal,
            lit: true,
        }
    }

    /// Flat color, optionally transparent or additive.
    pub const fn basic(color: Vec3, opacity: f32, blend: Blend) -> Self {
        Self {
            color,
            emissive: [0.0; 3],
            emissive_intensity: 0.0,
            opacity,
            blend,
            lit: false,
        }
    }

    /// Outgoing light before tone mapping; may exceed 1.
    pub fn radiance(&self, ambient: f32) -> Vec3 {
        let base = if self.lit {
            math::scale(self.color, ambient)
        } else {
            self.color
        };
        math::add(base, math::scale(self.emissive, self.emissive_intensity))
    }
}

/// Rec. 709 luma.
pub fn luminance(c: Vec3) -> f32 {
    0.2126 * c[0] + 0.7152 * c[1] + 0.0722 * c[2]
}

/// One drawable item for the current frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive<'a> {
    Sphere {
        center: Vec3,
        radius: f32,
        /// Accumulated rotation about the sphere's own Y axis.
        spin: f32,
        material: Material,
    },
    /// Sphere seen from the inside only (expanding shockwave).
    Shell {
        center: Vec3,
        radius: f32,
        material: Material,
    },
    /// Open truncated cone between two world points.
    Cone {
        base: Vec3,
        tip: Vec3,
        base_radius: f32,
        tip_radius: f32,
        material: Material,
    },
    /// Point cloud in local space, placed by `transform`.
    Points {
        positions: &'a [Vec3],
        transform: Transform,
        /// World size; attenuated by depth.
        size: f32,
        material: Material,
    },
    PointLight {
        position: Vec3,
        color: Vec3,
        intensity: f32,
        range: f32,
    },
}

impl Primitive<'_> {
    /// Reference point used for back-to-front ordering.
    pub fn anchor(&self) -> Vec3 {
        match self {
            Primitive::Sphere { center, .. } | Primitive::Shell { center, .. } => *center,
            Primitive::Cone { base, tip, .. } => math::scale(math::add(*base, *tip), 0.5),
            Primitive::Points { transform, .. } => transform.position,
            Primitive::PointLight { position, .. } => *position,
        }
    }
}

/// Everything the painter needs for one frame.
#[derive(Debug)]
pub struct SceneFrame<'a> {
    pub time: f32,
    pub background: Vec3,
    pub ambient: f32,
    pub bloom: BloomSettings,
    pub primitives: Vec<Primitive<'a>>,
}

pub struct SceneRenderer {
    stage: Stage,
    visual: StageVisual,
    camera: OrbitCamera,
    starfield: Starfield,
    rng: StdRng,
    time: f32,
}

impl SceneRenderer {
    pub fn new(stage: Stage) -> Self {
        Self::with_rng(stage, StdRng::from_os_rng())
    }

    /// Deterministic particles and stars.
    pub fn with_seed(stage: Stage, seed: u64) -> Self {
        Self::with_rng(stage, StdRng::seed_from_u64(seed))
    }

    fn with_rng(stage: Stage, mut rng: StdRng) -> Self {
        let starfield = Starfield::generate(&mut rng);
        let visual = StageVisual::mount(stage, &mut rng);
        Self {
            stage,
            visual,
            camera: OrbitCamera::default(),
            starfield,
            rng,
            time: 0.0,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn visual(&self) -> &StageVisual {
        &self.visual
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    pub fn starfield(&self) -> &Starfield {
        &self.starfield
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    /// Swap the mounted visual when the stage differs. The old visual and
    /// all of its state are dropped. Camera and lighting are left alone.
    pub fn sync_stage(&mut self, stage: Stage) -> bool {
        if stage == self.stage {
            return false;
        }
        log::debug!("Remounting scene: {} -> {}", self.stage, stage);
        self.stage = stage;
        self.visual = StageVisual::mount(stage, &mut self.rng);
        true
    }

    /// Advance one frame to scene time `t` in seconds.
    pub fn update(&mut self, t: f32) {
        self.time = t;
        self.visual.update(t);
    }

    /// Move the camera to the stage's suggested viewing distance.
    pub fn frame_stage(&mut self) {
        self.camera.set_distance(self.stage.info().camera_distance);
    }

    pub fn frame(&self) -> SceneFrame<'_> {
        let mut primitives = Vec::with_capacity(6);
        self.visual.emit(&mut primitives);
        SceneFrame {
            time: self.time,
            background: BACKGROUND,
            ambient: AMBIENT_INTENSITY,
            bloom: BLOOM,
            primitives,
        }
    }
}
