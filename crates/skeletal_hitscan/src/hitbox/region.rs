//! Body region identities reported with hits

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Body region a hit is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyRegion {
    /// Head
    Head,
    /// Torso / spine
    Torso,
    /// Right upper arm
    RightUpperArm,
    /// Right forearm
    RightForearm,
    /// Left upper arm
    LeftUpperArm,
    /// Left forearm
    LeftForearm,
    /// Right thigh
    RightThigh,
    /// Right shin
    RightShin,
    /// Left thigh
    LeftThigh,
    /// Left shin
    LeftShin,
    /// Unspecified part of the body (simplified hit volumes)
    Body,
}

impl BodyRegion {
    /// The canonical regions, in narrow-phase test order
    pub const CANONICAL: [Self; 10] = [
        Self::Head,
        Self::Torso,
        Self::RightUpperArm,
        Self::RightForearm,
        Self::LeftUpperArm,
        Self::LeftForearm,
        Self::RightThigh,
        Self::RightShin,
        Self::LeftThigh,
        Self::LeftShin,
    ];

    /// Flag for this region in a [`RegionSet`]
    pub fn flag(self) -> RegionSet {
        match self {
            Self::Head => RegionSet::HEAD,
            Self::Torso => RegionSet::TORSO,
            Self::RightUpperArm => RegionSet::RIGHT_UPPER_ARM,
            Self::RightForearm => RegionSet::RIGHT_FOREARM,
            Self::LeftUpperArm => RegionSet::LEFT_UPPER_ARM,
            Self::LeftForearm => RegionSet::LEFT_FOREARM,
            Self::RightThigh => RegionSet::RIGHT_THIGH,
            Self::RightShin => RegionSet::RIGHT_SHIN,
            Self::LeftThigh => RegionSet::LEFT_THIGH,
            Self::LeftShin => RegionSet::LEFT_SHIN,
            Self::Body => RegionSet::BODY,
        }
    }
}

impl fmt::Display for BodyRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Head => "head",
            Self::Torso => "torso",
            Self::RightUpperArm => "right upper arm",
            Self::RightForearm => "right forearm",
            Self::LeftUpperArm => "left upper arm",
            Self::LeftForearm => "left forearm",
            Self::RightThigh => "right thigh",
            Self::RightShin => "right shin",
            Self::LeftThigh => "left thigh",
            Self::LeftShin => "left shin",
            Self::Body => "body",
        };
        f.pad(name)
    }
}

bitflags! {
    /// Set of body regions, e.g. the regions a build managed to bind
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RegionSet: u16 {
        /// Head
        const HEAD = 1 << 0;
        /// Torso
        const TORSO = 1 << 1;
        /// Right upper arm
        const RIGHT_UPPER_ARM = 1 << 2;
        /// Right forearm
        const RIGHT_FOREARM = 1 << 3;
        /// Left upper arm
        const LEFT_UPPER_ARM = 1 << 4;
        /// Left forearm
        const LEFT_FOREARM = 1 << 5;
        /// Right thigh
        const RIGHT_THIGH = 1 << 6;
        /// Right shin
        const RIGHT_SHIN = 1 << 7;
        /// Left thigh
        const LEFT_THIGH = 1 << 8;
        /// Left shin
        const LEFT_SHIN = 1 << 9;
        /// Generic body
        const BODY = 1 << 10;
    }
}

impl FromIterator<BodyRegion> for RegionSet {
    fn from_iter<I: IntoIterator<Item = BodyRegion>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::empty(), |set, region| set | region.flag())
    }
}
