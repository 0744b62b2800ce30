pub mod project;
pub mod settings;

pub use project::{NewProject, Project, ProjectPatch};
pub use settings::{EfficiencyTargets, Settings};
