//! Skeleton container written by the animation system
//!
//! Joints live in a slot map so that references handed out to hit volumes
//! stay cheap and non-owning: a removed joint simply stops resolving, and a
//! reference taken from one skeleton never resolves against another.

pub mod resolver;
pub mod rig;

use std::sync::atomic::{AtomicU64, Ordering};

use slotmap::SlotMap;

use crate::foundation::math::Mat4;

pub use resolver::{JointResolver, MatchStrategy, Resolution};
pub use rig::{HumanoidBone, HumanoidRig, RigNaming};

slotmap::new_key_type! {
    /// Key of a joint within one [`Skeleton`]
    pub struct JointId;
}

static NEXT_SKELETON_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a skeleton instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SkeletonId(u64);

impl SkeletonId {
    fn next() -> Self {
        Self(NEXT_SKELETON_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Non-owning reference to a joint of a specific skeleton instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JointRef {
    /// Skeleton the joint belonged to when the reference was taken
    pub skeleton: SkeletonId,
    /// Joint key within that skeleton
    pub joint: JointId,
}

/// Skeleton container errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SkeletonError {
    /// The joint key is not (or no longer) part of this skeleton
    #[error("unknown joint {0:?}")]
    UnknownJoint(JointId),
}

/// A named node of the skeleton graph
#[derive(Debug, Clone)]
pub struct Joint {
    name: String,
    parent: Option<JointId>,
    local: Mat4,
    world: Mat4,
}

impl Joint {
    /// Joint name as authored in the asset
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent joint, `None` for roots
    pub fn parent(&self) -> Option<JointId> {
        self.parent
    }

    /// Transform relative to the parent joint
    pub fn local_transform(&self) -> &Mat4 {
        &self.local
    }

    /// Current world-space transform
    pub fn world_transform(&self) -> &Mat4 {
        &self.world
    }
}

/// Hierarchy of named joints with per-step world transforms
#[derive(Debug)]
pub struct Skeleton {
    id: SkeletonId,
    joints: SlotMap<JointId, Joint>,
    /// Evaluation order: every parent precedes its children
    order: Vec<JointId>,
}

impl Skeleton {
    /// Create an empty skeleton with a fresh identity
    pub fn new() -> Self {
        Self {
            id: SkeletonId::next(),
            joints: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    /// Identity of this skeleton instance
    pub fn id(&self) -> SkeletonId {
        self.id
    }

    /// Number of joints
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the skeleton has no joints
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Add a joint under `parent` (or as a root)
    ///
    /// The world transform is initialised from the parent's current world
    /// transform; call [`Skeleton::propagate`] to re-evaluate the hierarchy.
    pub fn add_joint(
        &mut self,
        name: impl Into<String>,
        parent: Option<JointId>,
        local: Mat4,
    ) -> Result<JointId, SkeletonError> {
        let parent_world = match parent {
            Some(parent_id) => self
                .joints
                .get(parent_id)
                .map(|p| p.world)
                .ok_or(SkeletonError::UnknownJoint(parent_id))?,
            None => Mat4::identity(),
        };

        let id = self.joints.insert(Joint {
            name: name.into(),
            parent,
            local,
            world: parent_world * local,
        });
        self.order.push(id);
        Ok(id)
    }

    /// Remove a joint together with all of its descendants
    ///
    /// Returns the number of joints removed. References to removed joints
    /// stop resolving.
    pub fn remove_joint(&mut self, id: JointId) -> Result<usize, SkeletonError> {
        if !self.joints.contains_key(id) {
            return Err(SkeletonError::UnknownJoint(id));
        }

        let mut removed = Vec::new();
        for &candidate in &self.order {
            let doomed = candidate == id
                || self.joints[candidate]
                    .parent
                    .is_some_and(|parent| removed.contains(&parent));
            if doomed {
                removed.push(candidate);
            }
        }

        for joint in &removed {
            self.joints.remove(*joint);
        }
        self.order.retain(|joint| self.joints.contains_key(*joint));
        Ok(removed.len())
    }

    /// Replace a joint's parent-relative transform
    pub fn set_local_transform(&mut self, id: JointId, local: Mat4) -> Result<(), SkeletonError> {
        let joint = self.joints.get_mut(id).ok_or(SkeletonError::UnknownJoint(id))?;
        joint.local = local;
        Ok(())
    }

    /// Overwrite a joint's world transform directly
    ///
    /// For animation systems that evaluate world matrices themselves. The
    /// value is replaced again by the next [`Skeleton::propagate`].
    pub fn set_world_transform(&mut self, id: JointId, world: Mat4) -> Result<(), SkeletonError> {
        let joint = self.joints.get_mut(id).ok_or(SkeletonError::UnknownJoint(id))?;
        joint.world = world;
        Ok(())
    }

    /// Recompute every world transform root-to-leaf
    ///
    /// Roots are placed by `root_world` (normally the character's world
    /// transform).
    pub fn propagate(&mut self, root_world: &Mat4) {
        for &id in &self.order {
            let parent_world = self.joints[id]
                .parent
                .and_then(|parent| self.joints.get(parent))
                .map_or(*root_world, |parent| parent.world);
            let joint = &mut self.joints[id];
            joint.world = parent_world * joint.local;
        }
    }

    /// Look up a joint by key
    pub fn joint(&self, id: JointId) -> Option<&Joint> {
        self.joints.get(id)
    }

    /// Build a non-owning reference to a joint of this skeleton
    pub fn joint_ref(&self, id: JointId) -> Option<JointRef> {
        self.joints.contains_key(id).then_some(JointRef {
            skeleton: self.id,
            joint: id,
        })
    }

    /// Whether a reference still points at a live joint of this skeleton
    pub fn contains(&self, joint: JointRef) -> bool {
        joint.skeleton == self.id && self.joints.contains_key(joint.joint)
    }

    /// Current world transform for a reference, `None` if it is stale
    pub fn world_transform(&self, joint: JointRef) -> Option<Mat4> {
        if joint.skeleton != self.id {
            return None;
        }
        self.joints.get(joint.joint).map(|j| j.world)
    }

    /// Name of the referenced joint, `None` if it is stale
    pub fn joint_name(&self, joint: JointRef) -> Option<&str> {
        if joint.skeleton != self.id {
            return None;
        }
        self.joints.get(joint.joint).map(Joint::name)
    }

    /// First joint (in evaluation order) with exactly this name
    pub fn find_by_name(&self, name: &str) -> Option<JointId> {
        self.joints().find(|(_, joint)| joint.name == name).map(|(id, _)| id)
    }

    /// All joints in evaluation order
    pub fn joints(&self) -> impl Iterator<Item = (JointId, &Joint)> + '_ {
        self.order.iter().map(move |&id| (id, &self.joints[id]))
    }

    /// First root joint
    pub fn root(&self) -> Option<JointId> {
        self.joints()
            .find(|(_, joint)| joint.parent.is_none())
            .map(|(id, _)| id)
    }
}

impl Default for Skeleton {
    fn default() -> Self {
        Self::new()
    }
}
