//! Recoverable hit-detection conditions
//!
//! None of these abort a build or a ray test. They are recorded in the
//! build report or logged at `warn` level, and the affected region or
//! joint degrades locally.

use crate::hitbox::region::BodyRegion;

/// Conditions the hit volume system recovers from
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HitboxError {
    /// A canonical body region has no matching joint in the skeleton
    #[error("no joint matches body region {region} (canonical name '{canonical}')")]
    MissingJoint {
        /// Region that could not be bound
        region: BodyRegion,
        /// Canonical joint name that was searched for
        canonical: String,
    },

    /// The character has no skeleton at all
    #[error("character has no skeleton; falling back to simplified hit volumes")]
    MissingSkeleton,

    /// A joint reference held by a hitbox no longer resolves
    #[error("joint for body region {region} is no longer part of the skeleton; hitbox skipped")]
    StaleJointReference {
        /// Region whose hitbox was skipped
        region: BodyRegion,
    },

    /// A joint transform could not be inverted
    #[error("transform of joint '{joint}' is not invertible; substituting identity")]
    DegenerateTransform {
        /// Name of the offending joint
        joint: String,
    },
}
