//! Hit volume settings
//!
//! Everything a [`HitVolumeSet`](crate::hitbox::HitVolumeSet) build reads:
//! the outer box, the region table, resolver behaviour and the debug
//! toggles. Loadable from TOML or RON through [`Config`].

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;
use crate::hitbox::bounds_builder::{default_region_shapes, RegionShape};
use crate::physics::BoundingBox;
use crate::skeleton::resolver::ResolverConfig;

use super::{Config, ConfigError};

/// Hit volume configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitboxConfig {
    /// Outer box minimum corner in the character's local frame
    pub outer_min: Vec3,
    /// Outer box maximum corner in the character's local frame
    pub outer_max: Vec3,
    /// Log the region binding report after every build
    pub report_regions: bool,
    /// Skip per-region volumes and always use the simplified root volume
    pub force_simplified: bool,
    /// Joint name matching
    pub resolver: ResolverConfig,
    /// Region table, tested in this order
    pub regions: Vec<RegionShape>,
}

impl HitboxConfig {
    /// Load a configuration file and validate it
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let config = Self::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the outer box from two opposite corners
    pub fn with_outer_box(mut self, a: Vec3, b: Vec3) -> Self {
        let outer = BoundingBox::new(a, b);
        self.outer_min = outer.min();
        self.outer_max = outer.max();
        self
    }

    /// Enable or disable the region binding report
    pub fn with_report_regions(mut self, enabled: bool) -> Self {
        self.report_regions = enabled;
        self
    }

    /// Force simplified hit volumes
    pub fn with_force_simplified(mut self, enabled: bool) -> Self {
        self.force_simplified = enabled;
        self
    }

    /// Replace the resolver settings
    pub fn with_resolver(mut self, resolver: ResolverConfig) -> Self {
        self.resolver = resolver;
        self
    }

    /// Replace the region table
    pub fn with_regions(mut self, regions: Vec<RegionShape>) -> Self {
        self.regions = regions;
        self
    }

    /// Outer box in the character's local frame
    pub fn outer_box(&self) -> BoundingBox {
        BoundingBox::new(self.outer_min, self.outer_max)
    }

    /// Check the configuration describes usable volumes
    pub fn validate(&self) -> Result<(), ConfigError> {
        let outer = self.outer_box();
        let size = outer.max() - outer.min();
        if size.iter().any(|extent| *extent <= 0.0 || !extent.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "outer box must have positive finite size, got {size:?}"
            )));
        }

        if self.resolver.strategies.is_empty() && !self.force_simplified {
            return Err(ConfigError::Invalid(
                "resolver needs at least one matching strategy".to_string(),
            ));
        }

        for (index, shape) in self.regions.iter().enumerate() {
            if shape.canonical.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "region {} has an empty canonical joint name",
                    shape.region
                )));
            }
            if shape.half_extents.iter().any(|h| *h < 0.0 || !h.is_finite()) {
                return Err(ConfigError::Invalid(format!(
                    "region {} has invalid half extents {:?}",
                    shape.region, shape.half_extents
                )));
            }
            if self.regions[..index].iter().any(|other| other.region == shape.region) {
                return Err(ConfigError::Invalid(format!(
                    "region {} is listed more than once",
                    shape.region
                )));
            }
        }

        Ok(())
    }
}

impl Default for HitboxConfig {
    fn default() -> Self {
        Self {
            outer_min: Vec3::new(-0.5, 0.0, -0.5),
            outer_max: Vec3::new(0.5, 1.8, 0.5),
            report_regions: false,
            force_simplified: false,
            resolver: ResolverConfig::default(),
            regions: default_region_shapes(),
        }
    }
}

impl Config for HitboxConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hitbox::region::BodyRegion;
    use crate::skeleton::MatchStrategy;

    #[test]
    fn test_default_config_is_valid() {
        let config = HitboxConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.regions.len(), 10);
        assert_eq!(config.outer_box().max(), Vec3::new(0.5, 1.8, 0.5));
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config: HitboxConfig = toml::from_str(
            r#"
            report_regions = true
            outer_max = [0.6, 2.0, 0.6]

            [resolver]
            strategies = ["Exact", "Aliased"]
            "#,
        )
        .unwrap();

        assert!(config.report_regions);
        assert_eq!(config.outer_max, Vec3::new(0.6, 2.0, 0.6));
        assert_eq!(config.outer_min, Vec3::new(-0.5, 0.0, -0.5));
        assert_eq!(
            config.resolver.strategies,
            vec![MatchStrategy::Exact, MatchStrategy::Aliased]
        );
        assert_eq!(config.resolver.prefixes, ResolverConfig::default().prefixes);
        assert_eq!(config.regions.len(), 10);
    }

    #[test]
    fn test_ron_region_table() {
        let config: HitboxConfig = ron::from_str(
            r#"(
                regions: [
                    (
                        region: Head,
                        canonical: "Head",
                        aliases: ["head"],
                        offset: (0.0, 0.1, 0.0),
                        half_extents: (0.1, 0.1, 0.1),
                    ),
                ],
            )"#,
        )
        .unwrap();

        assert_eq!(config.regions.len(), 1);
        assert_eq!(config.regions[0].region, BodyRegion::Head);
        assert_eq!(config.regions[0].aliases, vec!["head".to_string()]);
    }

    #[test]
    fn test_file_round_trip_and_unsupported_extension() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("hitbox_config_{}.toml", std::process::id()));
        let path = path.to_string_lossy().into_owned();

        let config = HitboxConfig::default().with_report_regions(true);
        config.save_to_file(&path).unwrap();
        let loaded = HitboxConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);

        assert!(matches!(
            HitboxConfig::load_from_file("hitboxes.yaml"),
            Err(ConfigError::Io(_) | ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let flat = HitboxConfig::default()
            .with_outer_box(Vec3::new(-0.5, 0.0, -0.5), Vec3::new(0.5, 0.0, 0.5));
        assert!(matches!(flat.validate(), Err(ConfigError::Invalid(_))));

        let mut duplicated = HitboxConfig::default();
        let head = duplicated.regions[0].clone();
        duplicated.regions.push(head);
        assert!(matches!(duplicated.validate(), Err(ConfigError::Invalid(_))));

        let mut negative = HitboxConfig::default();
        negative.regions[1].half_extents.x = -0.1;
        assert!(matches!(negative.validate(), Err(ConfigError::Invalid(_))));
    }
}
