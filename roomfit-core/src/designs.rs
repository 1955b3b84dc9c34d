//! Queries over saved designs.

use chrono::{DateTime, Duration, Utc};

use crate::model::{Design, FurnitureKind, FurnitureTemplate, Room, RoomId};

/// Designs created within this many days count as recent.
pub const RECENT_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DesignFilter {
    #[default]
    All,
    Recent,
}

impl DesignFilter {
    /// Designs without a readable timestamp are never recent.
    pub fn matches(self, design: &Design, now: DateTime<Utc>) -> bool {
        match self {
            DesignFilter::All => true,
            DesignFilter::Recent => design
                .created_at()
                .is_some_and(|created| created > now - Duration::days(RECENT_DAYS)),
        }
    }

    pub fn apply(self, designs: &[Design], now: DateTime<Utc>) -> Vec<&Design> {
        designs.iter().filter(|d| self.matches(d, now)).collect()
    }
}

pub fn room_name(rooms: &[Room], room_id: RoomId) -> &str {
    rooms
        .iter()
        .find(|r| r.id == room_id)
        .map(|r| r.name.as_str())
        .unwrap_or("Unknown Room")
}

/// Number of items in `design` whose template is of `kind`.
pub fn count_kind<T: AsRef<FurnitureTemplate>>(
    design: &Design,
    catalog: &[T],
    kind: FurnitureKind,
) -> usize {
    design
        .furniture_items
        .iter()
        .filter(|item| {
            catalog
                .iter()
                .map(AsRef::<FurnitureTemplate>::as_ref)
                .any(|t| t.id == item.furniture_id && t.kind == kind)
        })
        .count()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::model::{DesignItem, Rotation};

    fn design(id: u64, created_at: Option<&str>) -> Design {
        Design {
            id,
            name: format!("Design {}", id),
            room_id: 1,
            furniture_items: vec![
                DesignItem {
                    furniture_id: 1,
                    position_x: 0.0,
                    position_y: 0.0,
                    rotation: Rotation::Deg0,
                },
                DesignItem {
                    furniture_id: 2,
                    position_x: 3.0,
                    position_y: 0.0,
                    rotation: Rotation::Deg90,
                },
                DesignItem {
                    furniture_id: 1,
                    position_x: 6.0,
                    position_y: 0.0,
                    rotation: Rotation::Deg0,
                },
            ],
            created_at: created_at.map(str::to_string),
        }
    }

    #[test]
    fn recent_filter_uses_seven_day_window() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let designs = vec![
            design(1, Some("2024-06-14T09:00:00Z")),
            design(2, Some("2024-06-01")),
            design(3, None),
            design(4, Some("not a date")),
        ];

        let recent = DesignFilter::Recent.apply(&designs, now);
        assert_eq!(recent.iter().map(|d| d.id).collect::<Vec<_>>(), vec![1]);
        assert_eq!(DesignFilter::All.apply(&designs, now).len(), 4);
    }

    #[test]
    fn unknown_room_name() {
        let rooms = vec![Room {
            id: 1,
            name: "Bedroom".to_string(),
            width: 10.0,
            depth: 12.0,
        }];
        assert_eq!(room_name(&rooms, 1), "Bedroom");
        assert_eq!(room_name(&rooms, 2), "Unknown Room");
    }

    #[test]
    fn counts_items_by_kind() {
        let catalog = vec![
            FurnitureTemplate {
                id: 1,
                name: "Sofa".to_string(),
                kind: FurnitureKind::Sofa,
                width: 7.0,
                depth: 3.0,
            },
            FurnitureTemplate {
                id: 2,
                name: "Desk".to_string(),
                kind: FurnitureKind::Table,
                width: 4.0,
                depth: 2.0,
            },
        ];
        let d = design(1, None);
        assert_eq!(count_kind(&d, &catalog, FurnitureKind::Sofa), 2);
        assert_eq!(count_kind(&d, &catalog, FurnitureKind::Table), 1);
        assert_eq!(count_kind(&d, &catalog, FurnitureKind::Bed), 0);
    }
}
