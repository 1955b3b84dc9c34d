//! One-shot subcommands that talk to the backend and print plain text.

use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use roomfit_client::RoomfitClient;
use roomfit_core::catalog::{CatalogQuery, count_by_kind};
use roomfit_core::designs::{DesignFilter, count_kind, room_name};
use roomfit_core::{
    Design, DesignId, DesignItem, Feedback, FurnitureKind, FurnitureTemplate, LayoutConfig,
    NewRoom, Room, RoomId, Studio,
};

use crate::error::RfError;

pub async fn rooms(client: &RoomfitClient) -> Result<(), RfError> {
    let rooms = client.list_rooms().await?;
    print!("{}", format_rooms(&rooms));
    Ok(())
}

pub async fn create_room(client: &RoomfitClient, room: NewRoom) -> Result<(), RfError> {
    let room = client.create_room(&room).await?;
    println!(
        "Created room {} \"{}\" ({} x {} ft)",
        room.id, room.name, room.width, room.depth
    );
    Ok(())
}

pub async fn catalog(client: &RoomfitClient, query: CatalogQuery) -> Result<(), RfError> {
    let catalog = client.list_furniture().await?;
    print!("{}", format_catalog(&catalog, &query));
    Ok(())
}

pub async fn designs(client: &RoomfitClient, filter: DesignFilter) -> Result<(), RfError> {
    let (designs, rooms, catalog) = tokio::try_join!(
        client.list_designs(),
        client.list_rooms(),
        client.list_furniture()
    )?;
    let shown = filter.apply(&designs, Utc::now());
    print!("{}", format_designs(&shown, &rooms, &catalog));
    Ok(())
}

pub async fn delete_design(client: &RoomfitClient, id: DesignId) -> Result<(), RfError> {
    client.delete_design(id).await?;
    println!("Deleted design {}", id);
    Ok(())
}

pub async fn find_room(client: &RoomfitClient, id: RoomId) -> Result<Room, RfError> {
    client
        .list_rooms()
        .await?
        .into_iter()
        .find(|r| r.id == id)
        .ok_or(RfError::RoomNotFound(id))
}

pub async fn shared_catalog(
    client: &RoomfitClient,
) -> Result<Vec<Arc<FurnitureTemplate>>, RfError> {
    Ok(client
        .list_furniture()
        .await?
        .into_iter()
        .map(Arc::new)
        .collect())
}

pub fn read_layout(path: &Path) -> Result<Vec<DesignItem>, RfError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Builds a studio holding `items` as an unsaved layout for `room`.
pub fn studio_from_items(
    room: Room,
    items: Vec<DesignItem>,
    catalog: &[Arc<FurnitureTemplate>],
    config: LayoutConfig,
) -> (Studio, Vec<DesignItem>) {
    let draft = Design {
        id: 0,
        name: String::new(),
        room_id: room.id,
        furniture_items: items,
        created_at: None,
    };
    Studio::from_design(room, &draft, catalog, config)
}

pub async fn check(
    client: &RoomfitClient,
    room_id: RoomId,
    layout: &Path,
    config: LayoutConfig,
) -> Result<(), RfError> {
    let items = read_layout(layout)?;
    let (room, catalog) = tokio::try_join!(find_room(client, room_id), shared_catalog(client))?;

    let (mut studio, skipped) = studio_from_items(room, items, &catalog, config);
    for item in &skipped {
        eprintln!("Skipping unknown furniture id {}", item.furniture_id);
    }

    let ticket = studio.begin_fitness_check()?;
    let report = client.check_fitness(ticket.room_id, &ticket.snapshot).await?;
    studio.finish_fitness_check(ticket.id, Ok(report));

    print!("{}", format_check(&studio));
    Ok(())
}

pub fn format_rooms(rooms: &[Room]) -> String {
    if rooms.is_empty() {
        return "No rooms yet. Create one with `rf create-room`.\n".to_string();
    }
    let mut out = String::new();
    for room in rooms {
        let _ = writeln!(
            out,
            "{:>4}  {:<24} {} x {} ft",
            room.id, room.name, room.width, room.depth
        );
    }
    out
}

pub fn format_catalog<T: AsRef<FurnitureTemplate>>(catalog: &[T], query: &CatalogQuery) -> String {
    let shown = query.apply(catalog);
    let mut out = String::new();

    for template in &shown {
        let t = (*template).as_ref();
        let _ = writeln!(
            out,
            "{:>4}  {:<24} {:<12} {} x {} ft",
            t.id,
            t.name,
            t.kind.as_str(),
            t.width,
            t.depth
        );
    }

    let counts = count_by_kind(catalog);
    let summary: Vec<String> = FurnitureKind::ALL
        .iter()
        .filter_map(|kind| counts.get(kind).map(|n| format!("{} {}", n, kind)))
        .collect();
    let _ = writeln!(
        out,
        "{} of {} items shown ({})",
        shown.len(),
        catalog.len(),
        summary.join(", ")
    );
    out
}

pub fn format_designs<T: AsRef<FurnitureTemplate>>(
    designs: &[&Design],
    rooms: &[Room],
    catalog: &[T],
) -> String {
    if designs.is_empty() {
        return "No saved designs.\n".to_string();
    }
    let mut out = String::new();
    for design in designs {
        let created = design
            .created_at()
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{:>4}  {:<24} {:<16} {:>3} items {:>2} sofas  {}",
            design.id,
            design.name,
            room_name(rooms, design.room_id),
            design.furniture_items.len(),
            count_kind(design, catalog, FurnitureKind::Sofa),
            created
        );
    }
    out
}

pub fn format_check(studio: &Studio) -> String {
    let mut out = String::new();

    for placed in studio.store().iter() {
        let _ = write!(
            out,
            "{} {} at ({}, {}) {}: ",
            placed.id,
            placed.name(),
            placed.position.x,
            placed.position.y,
            placed.rotation
        );
        match studio.feedback_for(placed.id) {
            Feedback::NoResult => {
                let _ = writeln!(out, "no result");
            }
            Feedback::Result { result, ambiguous } => {
                let verdict = if result.is_clear() { "fits" } else { "problem" };
                let _ = write!(out, "{} - {}", verdict, result.message);
                if !result.collisions.is_empty() {
                    let _ = write!(out, " (collides with {})", result.collisions.join(", "));
                }
                if ambiguous {
                    let _ = write!(out, " [ambiguous]");
                }
                out.push('\n');
            }
        }
    }

    if let Some(feedback) = studio.fitness_feedback() {
        let verdict = if feedback.all_fits() {
            "All furniture fits"
        } else {
            "Some furniture does not fit"
        };
        let _ = writeln!(out, "{}. {}", verdict, feedback.overall_message());
    }
    out
}

#[cfg(test)]
mod tests {
    use roomfit_core::{FitnessReport, FitnessResult, Position, Rotation};

    use super::*;

    fn room() -> Room {
        Room {
            id: 3,
            name: "Den".to_string(),
            width: 12.0,
            depth: 10.0,
        }
    }

    fn template(id: u64, name: &str, kind: FurnitureKind, width: f64, depth: f64) -> Arc<FurnitureTemplate> {
        Arc::new(FurnitureTemplate {
            id,
            name: name.to_string(),
            kind,
            width,
            depth,
        })
    }

    fn item(furniture_id: u64, x: f64, y: f64) -> DesignItem {
        DesignItem {
            furniture_id,
            position_x: x,
            position_y: y,
            rotation: Rotation::Deg0,
        }
    }

    #[test]
    fn reads_layout_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        std::fs::write(
            &path,
            r#"[{"furniture_id": 1, "position_x": 1.5, "position_y": 2, "rotation": 90}]"#,
        )
        .unwrap();

        let items = read_layout(&path).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].rotation, Rotation::Deg90);
        assert_eq!(items[0].position(), Position::new(1.5, 2.0));
    }

    #[test]
    fn bad_rotation_in_layout_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        std::fs::write(
            &path,
            r#"[{"furniture_id": 1, "position_x": 0, "position_y": 0, "rotation": 45}]"#,
        )
        .unwrap();

        assert!(matches!(read_layout(&path), Err(RfError::Layout(_))));
    }

    #[test]
    fn studio_from_items_skips_unknown() {
        let catalog = vec![template(1, "Sofa", FurnitureKind::Sofa, 7.0, 3.0)];
        let (studio, skipped) = studio_from_items(
            room(),
            vec![item(1, 0.0, 0.0), item(9, 1.0, 1.0)],
            &catalog,
            LayoutConfig::default(),
        );

        assert_eq!(studio.store().len(), 1);
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].furniture_id, 9);
    }

    #[test]
    fn check_output_distinguishes_missing_results() {
        let catalog = vec![
            template(1, "Sofa", FurnitureKind::Sofa, 7.0, 3.0),
            template(2, "Desk", FurnitureKind::Table, 4.0, 2.0),
        ];
        let (mut studio, _) = studio_from_items(
            room(),
            vec![item(1, 0.0, 0.0), item(2, 8.0, 0.0)],
            &catalog,
            LayoutConfig::default(),
        );

        let ticket = studio.begin_fitness_check().unwrap();
        let report = FitnessReport {
            all_fits: true,
            overall_message: "Looks good".to_string(),
            results: vec![FitnessResult {
                furniture_id: 1,
                furniture_name: "Sofa".to_string(),
                fits: true,
                collisions: vec![],
                adequate_space: true,
                walking_space_x: 3.0,
                walking_space_y: 3.0,
                message: "Plenty of space".to_string(),
            }],
        };
        studio.finish_fitness_check(ticket.id, Ok(report));

        let text = format_check(&studio);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].contains("Sofa") && lines[0].ends_with("fits - Plenty of space"));
        assert!(lines[1].contains("Desk") && lines[1].ends_with("no result"));
        assert_eq!(lines[2], "All furniture fits. Looks good");
    }

    #[test]
    fn catalog_listing_filters_and_counts() {
        let catalog = vec![
            template(1, "sofa bed", FurnitureKind::Sofa, 7.0, 3.0),
            template(2, "Armchair", FurnitureKind::Chair, 3.0, 3.0),
            template(3, "Bench", FurnitureKind::Chair, 4.0, 1.5),
        ];
        let query = CatalogQuery {
            category: Some(FurnitureKind::Chair),
            ..CatalogQuery::default()
        };

        let text = format_catalog(&catalog, &query);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Armchair"));
        assert!(lines[1].contains("Bench"));
        assert!(lines[2].starts_with("2 of 3 items shown"));
    }

    #[test]
    fn designs_listing_uses_room_names() {
        let design = Design {
            id: 5,
            name: "Cozy".to_string(),
            room_id: 42,
            furniture_items: vec![item(1, 0.0, 0.0)],
            created_at: Some("2024-03-09T10:00:00".to_string()),
        };
        let text = format_designs(&[&design], &[room()], &[] as &[FurnitureTemplate]);
        assert!(text.contains("Unknown Room"));
        assert!(text.contains("2024-03-09"));
        assert_eq!(
            format_designs(&[], &[], &[] as &[FurnitureTemplate]),
            "No saved designs.\n"
        );
    }

    #[test]
    fn designs_listing_counts_sofas() {
        let catalog = vec![
            template(1, "Loveseat", FurnitureKind::Sofa, 5.0, 3.0),
            template(2, "Armchair", FurnitureKind::Chair, 3.0, 3.0),
        ];
        let design = Design {
            id: 8,
            name: "Lounge".to_string(),
            room_id: 1,
            furniture_items: vec![
                item(1, 0.0, 0.0),
                item(1, 6.0, 0.0),
                item(2, 0.0, 5.0),
                item(99, 8.0, 5.0),
            ],
            created_at: None,
        };

        let text = format_designs(&[&design], &[room()], &catalog);
        assert!(text.contains("  4 items  2 sofas  -"), "{text}");
    }
}
