//! Region binding report
//!
//! Records, per build, which body regions found a joint (and how), which
//! did not, the volume mode that resulted and every recoverable condition
//! hit along the way.

use crate::error::HitboxError;
use crate::hitbox::bounds_builder::RegionBinding;
use crate::hitbox::region::{BodyRegion, RegionSet};
use crate::hitbox::volume_set::HitVolumeMode;

/// Outcome of the most recent hit volume build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionReport {
    /// Volume layout the build settled on
    pub mode: HitVolumeMode,
    /// One entry per region in the table, in test order
    pub bindings: Vec<RegionBinding>,
    /// Recoverable conditions encountered while building
    pub diagnostics: Vec<HitboxError>,
}

impl RegionReport {
    /// Empty report for a given mode
    pub fn new(mode: HitVolumeMode) -> Self {
        Self {
            mode,
            bindings: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Regions that found a joint
    pub fn resolved(&self) -> RegionSet {
        self.bindings
            .iter()
            .filter(|binding| binding.is_resolved())
            .map(|binding| binding.region)
            .collect()
    }

    /// Regions from the table that have no joint
    pub fn unresolved(&self) -> impl Iterator<Item = BodyRegion> + '_ {
        self.bindings
            .iter()
            .filter(|binding| !binding.is_resolved())
            .map(|binding| binding.region)
    }

    /// Write the report to the log at `info`
    pub fn log(&self) {
        let resolved = self.bindings.iter().filter(|b| b.is_resolved()).count();
        log::info!(
            "hit volumes built in {:?} mode: {}/{} regions bound",
            self.mode,
            resolved,
            self.bindings.len()
        );

        for binding in &self.bindings {
            match (&binding.joint_name, binding.strategy) {
                (Some(joint), Some(strategy)) => log::info!(
                    "  {:<16} -> '{}' ({:?} match for '{}')",
                    binding.region,
                    joint,
                    strategy,
                    binding.canonical
                ),
                _ => log::info!(
                    "  {:<16} -> unbound (no joint like '{}')",
                    binding.region,
                    binding.canonical
                ),
            }
        }

        for diagnostic in &self.diagnostics {
            log::info!("  note: {diagnostic}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::MatchStrategy;

    fn binding(region: BodyRegion, joint: Option<&str>) -> RegionBinding {
        RegionBinding {
            region,
            canonical: "Canonical".to_string(),
            joint_name: joint.map(str::to_string),
            strategy: joint.map(|_| MatchStrategy::Exact),
        }
    }

    #[test]
    fn test_resolved_and_unresolved_partition_bindings() {
        let mut report = RegionReport::new(HitVolumeMode::Full);
        report.bindings = vec![
            binding(BodyRegion::Head, Some("Head")),
            binding(BodyRegion::Torso, None),
            binding(BodyRegion::LeftShin, Some("LeftLeg")),
        ];

        assert_eq!(report.resolved(), RegionSet::HEAD | RegionSet::LEFT_SHIN);
        assert_eq!(report.unresolved().collect::<Vec<_>>(), vec![BodyRegion::Torso]);
        report.log();
    }
}
