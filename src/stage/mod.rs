//! Stellar evolution stages and their static display metadata.
//!
//! The catalog is a fixed table built at compile time. Every `Stage` maps to
//! exactly one `StageInfo` whose `id` is that stage.

/// One of the four fixed points in the simulated stellar-evolution timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    MainSequence,
    RedSupergiant,
    Supernova,
    NeutronStar,
}

/// Forward order used by autoplay.
pub const STAGE_ORDER: [Stage; 4] = [
    Stage::MainSequence,
    Stage::RedSupergiant,
    Stage::Supernova,
    Stage::NeutronStar,
];

impl Stage {
    /// First stage of the timeline.
    pub const INITIAL: Stage = Stage::MainSequence;
    /// Last stage of the timeline; autoplay stops here.
    pub const TERMINAL: Stage = Stage::NeutronStar;

    /// Stable identifier, as sent to the advisory backend.
    pub fn id(self) -> &'static str {
        match self {
            Stage::MainSequence => "MAIN_SEQUENCE",
            Stage::RedSupergiant => "RED_SUPERGIANT",
            Stage::Supernova => "SUPERNOVA",
            Stage::NeutronStar => "NEUTRON_STAR",
        }
    }

    /// Identifier with its first underscore replaced by a space
    /// (`RED_SUPERGIANT` -> `RED SUPERGIANT`).
    pub fn prompt_name(self) -> String {
        self.id().replacen('_', " ", 1)
    }

    /// Short label for the stage selector buttons.
    pub fn label(self) -> &'static str {
        match self {
            Stage::MainSequence => "Main Sequence",
            Stage::RedSupergiant => "Red Supergiant",
            Stage::Supernova => "Supernova",
            Stage::NeutronStar => "Neutron Star",
        }
    }

    /// Position in [`STAGE_ORDER`].
    pub fn index(self) -> usize {
        match self {
            Stage::MainSequence => 0,
            Stage::RedSupergiant => 1,
            Stage::Supernova => 2,
            Stage::NeutronStar => 3,
        }
    }

    /// Next stage in forward order, `None` at the terminal stage.
    pub fn next(self) -> Option<Stage> {
        STAGE_ORDER.get(self.index() + 1).copied()
    }

    pub fn is_terminal(self) -> bool {
        self == Self::TERMINAL
    }

    /// Display metadata for this stage.
    pub fn info(self) -> &'static StageInfo {
        stage_info(self)
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Immutable display record for one stage.
#[derive(Debug, Clone, PartialEq)]
pub struct StageInfo {
    pub id: Stage,
    pub title: &'static str,
    pub description: &'static str,
    /// Long-form narrative shown in the info card.
    pub details: &'static str,
    /// Accent color as a `#rrggbb` string.
    pub color_hex: &'static str,
    pub color: [u8; 3],
    /// Suggested camera distance for framing this stage.
    pub camera_distance: f32,
    /// HUD readout.
    pub core_temperature: &'static str,
    /// HUD readout.
    pub radius: &'static str,
}

static STAGE_DATA: [StageInfo; 4] = [
    StageInfo {
        id: Stage::MainSequence,
        title: "Massive Main Sequence Star",
        description: "A blue supergiant burning hydrogen into helium.",
        details: "This star is 10-25 times the mass of our Sun. It burns bright and hot (blue) \
                  and lives a relatively short life (millions of years vs billions). Gravity is \
                  balanced by the outward pressure of nuclear fusion.",
        color_hex: "#4488ff",
        color: [0x44, 0x88, 0xff],
        camera_distance: 12.0,
        core_temperature: "30,000 K",
        radius: "10 Gm",
    },
    StageInfo {
        id: Stage::RedSupergiant,
        title: "Red Supergiant",
        description: "Running out of fuel, the star expands massively.",
        details: "As hydrogen runs out, the core contracts and heats up, causing the outer \
                  layers to expand and cool, turning red. It begins fusing heavier elements: \
                  helium -> carbon -> neon -> oxygen -> silicon -> iron.",
        color_hex: "#ff3300",
        color: [0xff, 0x33, 0x00],
        camera_distance: 18.0,
        core_temperature: "3,500 K",
        radius: "600 Gm",
    },
    StageInfo {
        id: Stage::Supernova,
        title: "Type II Supernova",
        description: "Core collapse and catastrophic explosion.",
        details: "Once iron is formed, fusion stops. The core collapses under gravity in a \
                  fraction of a second, rebounding and sending a shockwave that blasts the \
                  outer layers into space. This explosion outshines entire galaxies.",
        color_hex: "#ffaa00",
        color: [0xff, 0xaa, 0x00],
        camera_distance: 25.0,
        core_temperature: "100 Billion K",
        radius: "Expanding...",
    },
    StageInfo {
        id: Stage::NeutronStar,
        title: "Neutron Star",
        description: "The ultra-dense city-sized remnant.",
        details: "Protons and electrons are crushed together to form neutrons. The result is a \
                  sphere only ~20km wide but with 1.5x the mass of the Sun. It spins rapidly \
                  and possesses an incredibly strong magnetic field.",
        color_hex: "#00f3ff",
        color: [0x00, 0xf3, 0xff],
        camera_distance: 8.0,
        core_temperature: "1,000,000 K",
        radius: "12 km",
    },
];

/// Look up the display metadata for `stage`.
pub fn stage_info(stage: Stage) -> &'static StageInfo {
    &STAGE_DATA[stage.index()]
}
