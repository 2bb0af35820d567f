//! Parent and child links between world entities

use hecs::Entity;
use smallvec::SmallVec;

/// Link from a child to the entity it hangs under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parent(pub Entity);

impl Parent {
    #[must_use]
    pub const fn entity(&self) -> Entity {
        self.0
    }
}

/// Direct children of an entity, in link order
#[derive(Debug, Clone, Default)]
pub struct Children(SmallVec<[Entity; 4]>);

impl Children {
    /// Children list holding a single entity
    #[must_use]
    pub fn of(child: Entity) -> Self {
        Self(SmallVec::from_elem(child, 1))
    }

    /// Record a child. Returns `false` if it was already linked.
    pub fn link(&mut self, child: Entity) -> bool {
        if self.0.contains(&child) {
            return false;
        }
        self.0.push(child);
        true
    }

    /// Forget a child. Returns whether it was linked.
    pub fn unlink(&mut self, child: Entity) -> bool {
        let before = self.0.len();
        self.0.retain(|linked| *linked != child);
        self.0.len() != before
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Entity] {
        &self.0
    }
}
