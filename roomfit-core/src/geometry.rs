//! Mapping from room space (feet) to display space (pixels).
//!
//! The transform is a single uniform scale: rooms that would be wider than the
//! display budget at the base scale are shrunk to fit the width exactly. Depth
//! is never constrained on its own.

use serde::{Deserialize, Serialize};

use crate::model::{PlacedFurniture, PlacementId, Position, Room};

/// Pixels per foot before any shrink-to-fit.
pub const DEFAULT_BASE_SCALE: f64 = 15.0;

/// Horizontal space reserved around the room outline.
pub const DEFAULT_HORIZONTAL_MARGIN: f64 = 60.0;

/// Distance moved by one arrow press, in feet.
pub const DEFAULT_NUDGE_STEP: f64 = 0.5;

/// Where newly added furniture lands, in feet.
pub const DEFAULT_ANCHOR: Position = Position::new(2.0, 2.0);

/// Display constants, passed by value into whatever needs them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub base_scale: f64,
    pub horizontal_margin: f64,
    pub nudge_step: f64,
    pub anchor_x: f64,
    pub anchor_y: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            base_scale: DEFAULT_BASE_SCALE,
            horizontal_margin: DEFAULT_HORIZONTAL_MARGIN,
            nudge_step: DEFAULT_NUDGE_STEP,
            anchor_x: DEFAULT_ANCHOR.x,
            anchor_y: DEFAULT_ANCHOR.y,
        }
    }
}

impl LayoutConfig {
    pub fn anchor(&self) -> Position {
        Position::new(self.anchor_x, self.anchor_y)
    }

    /// Width available for the room given the full window width.
    pub fn display_budget(&self, window_width: f64) -> f64 {
        (window_width - self.horizontal_margin).max(0.0)
    }

    /// Pixels per foot for a room of the given width.
    ///
    /// A NaN or negative budget counts as zero. A room without a positive
    /// width keeps the base scale.
    pub fn scale_for(&self, room_width: f64, budget_width: f64) -> f64 {
        let budget = budget_width.max(0.0);
        if room_width > 0.0 && room_width * self.base_scale > budget {
            budget / room_width
        } else {
            self.base_scale
        }
    }

    pub fn layout(
        &self,
        room: &Room,
        placements: &[PlacedFurniture],
        budget_width: f64,
    ) -> RoomLayout {
        let scale = self.scale_for(room.width, budget_width);

        let rects = placements
            .iter()
            .map(|item| {
                let footprint = item.footprint();
                PixelRect {
                    id: item.id,
                    x: item.position.x * scale,
                    y: item.position.y * scale,
                    w: footprint.width * scale,
                    h: footprint.depth * scale,
                }
            })
            .collect();

        // Shrinking by budget / width can land one ulp above the budget.
        let room_pixel_width = (room.width * scale).min(budget_width.max(0.0));

        RoomLayout {
            scale,
            room_pixel_width,
            room_pixel_height: room.depth * scale,
            rects,
        }
    }
}

/// Lays out a room with the default configuration.
pub fn layout(room: &Room, placements: &[PlacedFurniture], budget_width: f64) -> RoomLayout {
    LayoutConfig::default().layout(room, placements, budget_width)
}

/// A placement's rectangle in display space, origin at the room's top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PixelRect {
    pub id: PlacementId,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl PixelRect {
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px < self.x + self.w && py >= self.y && py < self.y + self.h
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomLayout {
    pub scale: f64,
    pub room_pixel_width: f64,
    pub room_pixel_height: f64,
    pub rects: Vec<PixelRect>,
}

impl RoomLayout {
    pub fn rect(&self, id: PlacementId) -> Option<&PixelRect> {
        self.rects.iter().find(|r| r.id == id)
    }

    /// Topmost placement under a display-space point. Later placements are
    /// drawn over earlier ones.
    pub fn hit_test(&self, px: f64, py: f64) -> Option<PlacementId> {
        self.rects
            .iter()
            .rev()
            .find(|r| r.contains(px, py))
            .map(|r| r.id)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::model::{FurnitureKind, FurnitureTemplate, Rotation};
    use crate::store::PlacementStore;

    fn room(width: f64, depth: f64) -> Room {
        Room {
            id: 1,
            name: "Test".to_string(),
            width,
            depth,
        }
    }

    fn bed() -> Arc<FurnitureTemplate> {
        Arc::new(FurnitureTemplate {
            id: 3,
            name: "Bed".to_string(),
            kind: FurnitureKind::Bed,
            width: 5.0,
            depth: 6.5,
        })
    }

    #[test]
    fn room_that_fits_keeps_base_scale() {
        let out = layout(&room(12.0, 10.0), &[], 300.0);
        assert_eq!(out.scale, 15.0);
        assert_eq!(out.room_pixel_width, 180.0);
        assert_eq!(out.room_pixel_height, 150.0);
    }

    #[test]
    fn wide_room_shrinks_to_budget() {
        let out = layout(&room(30.0, 10.0), &[], 300.0);
        assert_eq!(out.scale, 10.0);
        assert_eq!(out.room_pixel_width, 300.0);
        assert_eq!(out.room_pixel_height, 100.0);
    }

    #[test]
    fn shrunk_width_never_exceeds_budget() {
        for budget in [100.0, 299.0, 300.0, 333.0, 500.0, 1000.0, 1234.0] {
            for tenths in 1..=2000 {
                let width = f64::from(tenths) / 10.0;
                let out = layout(&room(width, 10.0), &[], budget);
                assert!(
                    out.room_pixel_width <= budget,
                    "width {width} budget {budget} gave {}",
                    out.room_pixel_width
                );
            }
        }

        let out = layout(&room(9.6, 10.0), &[], 100.0);
        assert_eq!(out.room_pixel_width, 100.0);
        assert_eq!(out.scale, 100.0 / 9.6);
    }

    #[test]
    fn depth_is_not_constrained() {
        let out = layout(&room(10.0, 100.0), &[], 300.0);
        assert_eq!(out.scale, 15.0);
        assert_eq!(out.room_pixel_height, 1500.0);
    }

    #[test]
    fn rects_follow_rotation() {
        let mut store = PlacementStore::new();
        let bed = store.add(bed());
        store.move_to(bed.id, Position::new(1.0, 2.0));
        store.rotate(bed.id);

        let snapshot = store.snapshot();
        let out = layout(&room(12.0, 10.0), snapshot.as_slice(), 300.0);
        let rect = out.rect(bed.id).unwrap();

        assert_eq!(snapshot.get(bed.id).unwrap().rotation, Rotation::Deg90);
        assert_eq!((rect.x, rect.y), (15.0, 30.0));
        assert_eq!((rect.w, rect.h), (6.5 * 15.0, 5.0 * 15.0));
    }

    #[test]
    fn negative_positions_map_outside_the_room() {
        let mut store = PlacementStore::new();
        let bed = store.add(bed());
        store.move_to(bed.id, Position::new(-1.0, -2.0));

        let out = layout(&room(12.0, 10.0), store.snapshot().as_slice(), 300.0);
        let rect = out.rect(bed.id).unwrap();
        assert_eq!((rect.x, rect.y), (-15.0, -30.0));
    }

    #[test]
    fn degenerate_budget_and_room() {
        let out = layout(&room(12.0, 10.0), &[], f64::NAN);
        assert_eq!(out.scale, 0.0);
        assert_eq!(out.room_pixel_width, 0.0);

        let out = layout(&room(12.0, 10.0), &[], -50.0);
        assert_eq!(out.scale, 0.0);

        let out = layout(&room(0.0, 10.0), &[], 300.0);
        assert_eq!(out.scale, 15.0);
    }

    #[test]
    fn hit_test_prefers_topmost() {
        let mut store = PlacementStore::new();
        let under = store.add(bed());
        let over = store.add(bed());

        let out = layout(&room(12.0, 10.0), store.snapshot().as_slice(), 300.0);
        let (x, y) = (2.5 * 15.0, 2.5 * 15.0);

        assert_eq!(out.hit_test(x, y), Some(over.id));
        assert_ne!(out.hit_test(x, y), Some(under.id));
        assert_eq!(out.hit_test(0.0, 0.0), None);
    }

    #[test]
    fn custom_config_and_budget() {
        let config = LayoutConfig {
            base_scale: 20.0,
            ..LayoutConfig::default()
        };
        assert_eq!(config.display_budget(360.0), 300.0);
        assert_eq!(config.display_budget(40.0), 0.0);

        let out = config.layout(&room(12.0, 10.0), &[], 300.0);
        assert_eq!(out.scale, 20.0);

        let out = config.layout(&room(20.0, 10.0), &[], 300.0);
        assert_eq!(out.scale, 15.0);
        assert_eq!(out.room_pixel_width, 300.0);
    }
}
