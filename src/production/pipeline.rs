use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};
use utoipa::ToSchema;

/// A single production step. Variants are declared in pipeline order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    IntoStaticStr,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    WarehouseIn,
    Sanding,
    Assembly,
    Coloring,
    Accessories,
    Welding,
    Inspection,
    Coating,
    Packaging,
    WarehouseOut,
}

/// The fixed production pipeline shared by every order.
pub const PIPELINE: [Stage; 10] = [
    Stage::WarehouseIn,
    Stage::Sanding,
    Stage::Assembly,
    Stage::Coloring,
    Stage::Accessories,
    Stage::Welding,
    Stage::Inspection,
    Stage::Coating,
    Stage::Packaging,
    Stage::WarehouseOut,
];

/// When a stage takes part in an order's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Applicability {
    Always,
    RequiresAccessories,
    RequiresWelding,
}

/// The per-order flags that switch optional stages on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementFlags {
    pub requires_accessories: bool,
    pub requires_welding: bool,
}

impl RequirementFlags {
    pub fn new(requires_accessories: bool, requires_welding: bool) -> Self {
        Self {
            requires_accessories,
            requires_welding,
        }
    }
}

impl Applicability {
    pub fn holds_for(self, flags: RequirementFlags) -> bool {
        match self {
            Applicability::Always => true,
            Applicability::RequiresAccessories => flags.requires_accessories,
            Applicability::RequiresWelding => flags.requires_welding,
        }
    }
}

impl Stage {
    /// Stage name as stored on tracking records.
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Zero-based position in [`PIPELINE`].
    pub fn position(self) -> usize {
        self as usize
    }

    pub fn applicability(self) -> Applicability {
        match self {
            Stage::Accessories => Applicability::RequiresAccessories,
            Stage::Welding => Applicability::RequiresWelding,
            _ => Applicability::Always,
        }
    }

    pub fn is_applicable(self, flags: RequirementFlags) -> bool {
        self.applicability().holds_for(flags)
    }

    /// Label shown on the shop-floor dashboard.
    pub fn display_name(self) -> &'static str {
        match self {
            Stage::WarehouseIn => "Gudang Masuk",
            Stage::Sanding => "Amplas",
            Stage::Assembly => "Perakitan",
            Stage::Coloring => "Pewarnaan",
            Stage::Accessories => "Aksesoris",
            Stage::Welding => "Las",
            Stage::Inspection => "Inspeksi",
            Stage::Coating => "Pelapisan",
            Stage::Packaging => "Packaging & Kode",
            Stage::WarehouseOut => "Gudang Akhir",
        }
    }

    /// Looks a stage up by its stored name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Stage> {
        name.parse().ok()
    }
}

/// Returns the stages that count towards progress for an order with `flags`,
/// in pipeline order.
pub fn applicable_stages(flags: RequirementFlags) -> Vec<Stage> {
    PIPELINE
        .iter()
        .copied()
        .filter(|stage| stage.is_applicable(flags))
        .collect()
}

/// Default efficiency targets for a stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StageTarget {
    pub name: String,
    /// Target hours per batch.
    pub target_time: u32,
    /// Target first-pass quality, percent.
    pub target_quality: u32,
    /// Target output, percent of plan.
    pub target_output: u32,
}

impl Stage {
    pub fn default_target(self) -> StageTarget {
        let (target_time, target_quality, target_output) = match self {
            Stage::WarehouseIn => (2, 99, 100),
            Stage::Sanding => (4, 95, 90),
            Stage::Assembly => (6, 97, 95),
            Stage::Coloring => (3, 98, 92),
            Stage::Accessories => (2, 96, 94),
            Stage::Welding => (5, 95, 88),
            Stage::Inspection => (1, 100, 100),
            Stage::Coating => (4, 97, 90),
            Stage::Packaging => (2, 99, 98),
            Stage::WarehouseOut => (1, 100, 100),
        };
        StageTarget {
            name: self.display_name().to_string(),
            target_time,
            target_quality,
            target_output,
        }
    }
}
