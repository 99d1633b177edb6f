//! Joint name resolution across rigging conventions
//!
//! Skeletons coming out of different pipelines name the same bone in
//! different ways (`mixamorig:LeftForeArm`, `lowerarm_l`,
//! `Bip01 L Forearm`). The resolver maps a canonical joint name onto a
//! concrete joint by trying an ordered list of matching strategies and
//! stopping at the first one that finds something.

use serde::{Deserialize, Serialize};

use super::{JointId, Skeleton};

/// One way of matching a canonical name against skeleton joint names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchStrategy {
    /// Joint name equals the canonical name
    Exact,
    /// Joint name equals `prefix + canonical + suffix` for a known affix
    Affixed,
    /// Joint name equals one of the region's alternate names
    Aliased,
    /// Names are equal ignoring case, separators and known prefixes
    FormatInsensitive,
    /// Joint name contains the canonical name, ignoring case and separators
    Substring,
}

impl MatchStrategy {
    /// Default strategy order, strictest first
    pub const DEFAULT_ORDER: [Self; 5] = [
        Self::Exact,
        Self::Affixed,
        Self::Aliased,
        Self::FormatInsensitive,
        Self::Substring,
    ];
}

/// A resolved joint and the strategy that found it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Matched joint
    pub joint: JointId,
    /// Strategy that produced the match
    pub strategy: MatchStrategy,
}

/// Resolver settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Strategies in the order they are tried
    pub strategies: Vec<MatchStrategy>,
    /// Pipeline prefixes such as `mixamorig:`
    pub prefixes: Vec<String>,
    /// Pipeline suffixes such as `_jnt`
    pub suffixes: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            strategies: MatchStrategy::DEFAULT_ORDER.to_vec(),
            prefixes: ["mixamorig:", "mixamorig_", "mixamorig1:", "Armature_", "Bip01_"]
                .map(String::from)
                .to_vec(),
            suffixes: ["_jnt", "_joint", "_bone"].map(String::from).to_vec(),
        }
    }
}

/// Finds skeleton joints for canonical joint names
#[derive(Debug, Clone)]
pub struct JointResolver {
    config: ResolverConfig,
    normalized_prefixes: Vec<String>,
}

impl JointResolver {
    /// Create a resolver from settings
    pub fn new(config: ResolverConfig) -> Self {
        let mut normalized_prefixes: Vec<String> = config
            .prefixes
            .iter()
            .map(|prefix| normalize(prefix))
            .filter(|prefix| !prefix.is_empty())
            .collect();
        // Longest first so `mixamorig1` wins over `mixamorig`
        normalized_prefixes.sort_by_key(|prefix| std::cmp::Reverse(prefix.len()));

        Self {
            config,
            normalized_prefixes,
        }
    }

    /// Settings this resolver was built from
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve `canonical` (with alternate names `aliases`) to a joint
    ///
    /// Returns `None` when nothing matches; callers treat that as the body
    /// region being unavailable rather than as a failure.
    pub fn resolve(
        &self,
        skeleton: &Skeleton,
        canonical: &str,
        aliases: &[String],
    ) -> Option<Resolution> {
        self.config.strategies.iter().find_map(|&strategy| {
            self.try_strategy(strategy, skeleton, canonical, aliases)
                .map(|joint| Resolution { joint, strategy })
        })
    }

    /// Run a single strategy in isolation
    pub fn try_strategy(
        &self,
        strategy: MatchStrategy,
        skeleton: &Skeleton,
        canonical: &str,
        aliases: &[String],
    ) -> Option<JointId> {
        match strategy {
            MatchStrategy::Exact => skeleton.find_by_name(canonical),
            MatchStrategy::Affixed => self.match_affixed(skeleton, canonical),
            MatchStrategy::Aliased => aliases
                .iter()
                .find_map(|alias| skeleton.find_by_name(alias)),
            MatchStrategy::FormatInsensitive => {
                self.match_format_insensitive(skeleton, canonical, aliases)
            }
            MatchStrategy::Substring => {
                let needle = normalize(canonical);
                if needle.is_empty() {
                    return None;
                }
                skeleton
                    .joints()
                    .find(|(_, joint)| normalize(joint.name()).contains(&needle))
                    .map(|(id, _)| id)
            }
        }
    }

    fn match_affixed(&self, skeleton: &Skeleton, canonical: &str) -> Option<JointId> {
        let prefixes = std::iter::once("").chain(self.config.prefixes.iter().map(String::as_str));
        for prefix in prefixes {
            let suffixes =
                std::iter::once("").chain(self.config.suffixes.iter().map(String::as_str));
            for suffix in suffixes {
                if prefix.is_empty() && suffix.is_empty() {
                    continue;
                }
                let candidate = format!("{prefix}{canonical}{suffix}");
                if let Some(id) = skeleton.find_by_name(&candidate) {
                    return Some(id);
                }
            }
        }
        None
    }

    fn match_format_insensitive(
        &self,
        skeleton: &Skeleton,
        canonical: &str,
        aliases: &[String],
    ) -> Option<JointId> {
        let targets: Vec<String> = std::iter::once(canonical)
            .chain(aliases.iter().map(String::as_str))
            .map(|name| self.strip_prefix(normalize(name)))
            .filter(|name| !name.is_empty())
            .collect();

        skeleton
            .joints()
            .find(|(_, joint)| {
                let name = self.strip_prefix(normalize(joint.name()));
                targets.contains(&name)
            })
            .map(|(id, _)| id)
    }

    fn strip_prefix(&self, name: String) -> String {
        self.normalized_prefixes
            .iter()
            .find_map(|prefix| name.strip_prefix(prefix.as_str()))
            .map_or_else(|| name.clone(), str::to_string)
    }
}

impl Default for JointResolver {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}

/// Lower-case a name and drop separator characters
pub fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
