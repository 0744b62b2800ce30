//! Business logic between the HTTP handlers and the repositories.

use chrono::Utc;
use uuid::Uuid;

pub mod export;
pub mod orders;
pub mod projects;
pub mod settings;

pub use export::{ExportFile, ExportService, ExportTarget};
pub use orders::OrderService;
pub use projects::ProjectService;
pub use settings::SettingsService;

/// Builds a `<prefix>-<millis>-<suffix>` identifier. The millisecond part keeps
/// ids roughly sortable; the random suffix keeps same-millisecond ids apart.
pub fn generate_id(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{}-{}-{}",
        prefix,
        Utc::now().timestamp_millis(),
        &suffix[..6].to_uppercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_carry_prefix_and_differ() {
        let a = generate_id("ORD");
        let b = generate_id("ORD");
        assert!(a.starts_with("ORD-"));
        assert_eq!(a.split('-').count(), 3);
        assert_ne!(a, b);
    }
}
