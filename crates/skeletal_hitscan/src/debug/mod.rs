//! Debug tooling for hit volumes
//!
//! - [`region_report`] - which regions a build could bind, and how
//! - [`draw`] - renderer-agnostic debug shapes
//! - [`hitbox_debug`] - wire boxes, rays and hit points for hit volumes

pub mod draw;
pub mod hitbox_debug;
pub mod region_report;

pub use draw::{DebugDrawSystem, DebugShape};
pub use hitbox_debug::{HitboxDebugColors, HitboxDebugVisualizer};
pub use region_report::RegionReport;
