//! Slot registry for placed objects.
//!
//! Every placed object gets the next sequential slot. Removing an object
//! vacates its slot instead of compacting the list, so the indices of the
//! remaining objects stay valid for the physics world that refers to them.

use glam::Mat4;

use crate::error::{ArPlaceError, Result};
use crate::scene::{NodeId, Parent};

/// Stable index of a slot in the placed-object registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotIndex(pub usize);

/// An object the user has placed in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedObject {
    /// Slot this object occupies.
    pub index: SlotIndex,
    /// The cloned scene node.
    pub node: NodeId,
    /// Template node the object was cloned from.
    pub template: NodeId,
    /// Transform relative to `parent`.
    pub transform: Mat4,
    /// Where the node is attached.
    pub parent: Parent,
}

#[derive(Debug, Clone, PartialEq)]
enum Slot {
    Occupied(PlacedObject),
    Vacated,
}

impl Slot {
    fn as_object(&self) -> Option<&PlacedObject> {
        match self {
            Slot::Occupied(object) => Some(object),
            Slot::Vacated => None,
        }
    }
}

/// Registry of placed objects, indexed by slot.
#[derive(Debug, Default)]
pub struct PlacedObjects {
    slots: Vec<Slot>,
}

impl PlacedObjects {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new object in the next slot and returns its index.
    pub fn insert(&mut self, node: NodeId, template: NodeId, transform: Mat4, parent: Parent) -> SlotIndex {
        let index = SlotIndex(self.slots.len());
        self.slots.push(Slot::Occupied(PlacedObject {
            index,
            node,
            template,
            transform,
            parent,
        }));
        index
    }

    /// Gets the object in a slot, if the slot is occupied.
    pub fn get(&self, index: SlotIndex) -> Option<&PlacedObject> {
        self.slots.get(index.0).and_then(Slot::as_object)
    }

    /// Updates the transform of the object in a slot.
    ///
    /// Returns false if the slot is not occupied.
    pub fn set_transform(&mut self, index: SlotIndex, transform: Mat4) -> bool {
        match self.slots.get_mut(index.0) {
            Some(Slot::Occupied(object)) => {
                object.transform = transform;
                true
            }
            _ => false,
        }
    }

    /// Finds the slot holding a scene node.
    pub fn slot_of(&self, node: NodeId) -> Option<SlotIndex> {
        self.iter().find(|object| object.node == node).map(|object| object.index)
    }

    /// Vacates a slot and returns the object that was in it.
    ///
    /// Vacating an already vacated slot returns `Ok(None)`. An index that was
    /// never assigned is an error.
    pub fn remove(&mut self, index: SlotIndex) -> Result<Option<PlacedObject>> {
        let slot = self
            .slots
            .get_mut(index.0)
            .ok_or(ArPlaceError::UnknownSlot(index.0))?;
        match std::mem::replace(slot, Slot::Vacated) {
            Slot::Occupied(object) => Ok(Some(object)),
            Slot::Vacated => Ok(None),
        }
    }

    /// Vacates the last occupied slot, if any.
    pub fn remove_last(&mut self) -> Option<PlacedObject> {
        let position = self.slots.iter().rposition(|slot| matches!(slot, Slot::Occupied(_)))?;
        match std::mem::replace(&mut self.slots[position], Slot::Vacated) {
            Slot::Occupied(object) => Some(object),
            Slot::Vacated => None,
        }
    }

    /// Applies the contact rule: the object in the higher slot is removed.
    ///
    /// The order of `a` and `b` does not matter. A contact involving a slot
    /// that is already vacated is stale and removes nothing. An index that was
    /// never assigned is an error.
    pub fn remove_contact(&mut self, a: SlotIndex, b: SlotIndex) -> Result<Option<PlacedObject>> {
        let (lower, higher) = (a.min(b), a.max(b));
        if higher.0 >= self.slots.len() {
            return Err(ArPlaceError::UnknownSlot(higher.0));
        }
        if self.get(lower).is_none() {
            return Ok(None);
        }
        self.remove(higher)
    }

    /// Vacates every slot and returns the objects that were still placed.
    ///
    /// Slot numbering starts over after a clear.
    pub fn clear(&mut self) -> Vec<PlacedObject> {
        self.slots
            .drain(..)
            .filter_map(|slot| match slot {
                Slot::Occupied(object) => Some(object),
                Slot::Vacated => None,
            })
            .collect()
    }

    /// Iterates over the placed objects in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &PlacedObject> {
        self.slots.iter().filter_map(Slot::as_object)
    }

    /// Returns the number of occupied slots.
    pub fn occupied(&self) -> usize {
        self.iter().count()
    }

    /// Returns the number of slots ever assigned since the last clear.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}
