use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::geometry::DEFAULT_ANCHOR;
use crate::model::{FurnitureTemplate, PlacedFurniture, PlacementId, Position, Rotation};

/// Ordered collection of the placements in the room being edited.
///
/// Ids are allocated from a counter owned by the store and never reused, so
/// adding can never overwrite an existing placement. Operations on an unknown
/// id are no-ops: they can legitimately race with async completions.
#[derive(Debug, Clone)]
pub struct PlacementStore {
    items: IndexMap<PlacementId, PlacedFurniture>,
    next_id: u64,
    revision: u64,
    anchor: Position,
}

impl Default for PlacementStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PlacementStore {
    /// Creates an empty store placing new items at the default anchor.
    pub fn new() -> Self {
        Self::with_anchor(DEFAULT_ANCHOR)
    }

    pub fn with_anchor(anchor: Position) -> Self {
        Self {
            items: IndexMap::new(),
            next_id: 0,
            revision: 0,
            anchor,
        }
    }

    fn allocate_id(&mut self) -> PlacementId {
        loop {
            self.next_id += 1;
            let id = PlacementId(self.next_id);
            if !self.items.contains_key(&id) {
                return id;
            }
        }
    }

    /// Places a new instance at the anchor with no rotation.
    pub fn add(&mut self, template: Arc<FurnitureTemplate>) -> PlacedFurniture {
        let anchor = self.anchor;
        self.add_at(template, anchor, Rotation::Deg0)
    }

    /// Places a new instance at an explicit position and rotation.
    pub fn add_at(
        &mut self,
        template: Arc<FurnitureTemplate>,
        position: Position,
        rotation: Rotation,
    ) -> PlacedFurniture {
        let id = self.allocate_id();
        let placed = PlacedFurniture {
            id,
            template,
            position,
            rotation,
        };
        debug!(%id, furniture = %placed.name(), "placed furniture");
        self.items.insert(id, placed.clone());
        self.revision += 1;
        placed
    }

    /// Removes a placement, preserving the order of the rest.
    pub fn remove(&mut self, id: PlacementId) -> Option<PlacedFurniture> {
        let removed = self.items.shift_remove(&id)?;
        debug!(%id, "removed placement");
        self.revision += 1;
        Some(removed)
    }

    /// Advances the rotation by 90 degrees. Returns false if `id` is unknown.
    pub fn rotate(&mut self, id: PlacementId) -> bool {
        let Some(item) = self.items.get_mut(&id) else {
            return false;
        };
        item.rotation = item.rotation.next();
        debug!(%id, rotation = %item.rotation, "rotated placement");
        self.revision += 1;
        true
    }

    /// Replaces the position. Out-of-room coordinates are kept as given.
    pub fn move_to(&mut self, id: PlacementId, position: Position) -> bool {
        let Some(item) = self.items.get_mut(&id) else {
            return false;
        };
        item.position = position;
        debug!(%id, x = position.x, y = position.y, "moved placement");
        self.revision += 1;
        true
    }

    pub fn get(&self, id: PlacementId) -> Option<&PlacedFurniture> {
        self.items.get(&id)
    }

    pub fn contains(&self, id: PlacementId) -> bool {
        self.items.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlacedFurniture> {
        self.items.values()
    }

    /// Incremented by every successful mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Immutable, ordered copy of the current placements.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            revision: self.revision,
            items: self.items.values().cloned().collect::<Vec<_>>().into(),
        }
    }
}

/// Point-in-time read of a [`PlacementStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    revision: u64,
    items: Arc<[PlacedFurniture]>,
}

impl Snapshot {
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlacedFurniture> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[PlacedFurniture] {
        &self.items
    }

    pub fn get(&self, id: PlacementId) -> Option<&PlacedFurniture> {
        self.items.iter().find(|item| item.id == id)
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a PlacedFurniture;
    type IntoIter = std::slice::Iter<'a, PlacedFurniture>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
