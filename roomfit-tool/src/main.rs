mod commands;
mod config;
mod error;
mod logging;

#[cfg(feature = "studio")]
mod studio;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use roomfit_client::RoomfitClient;
use roomfit_core::catalog::{CatalogQuery, SortKey};
use roomfit_core::designs::DesignFilter;
use roomfit_core::{DesignId, FurnitureKind, NewRoom, RoomId};

use crate::config::{API_URL_ENV, load_config, resolve_base_url};

#[derive(Parser)]
#[command(name = "rf")]
#[command(about = "Plan furniture layouts and check whether they fit", long_about = None)]
struct Cli {
    /// Backend base URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List rooms
    Rooms,

    /// Create a room
    CreateRoom {
        #[arg(long)]
        name: String,

        /// Width in feet
        #[arg(long)]
        width: f64,

        /// Depth in feet
        #[arg(long)]
        depth: f64,
    },

    /// Browse the furniture catalog
    Catalog {
        /// Case-insensitive search over name and type
        #[arg(short, long, default_value = "")]
        search: String,

        /// Only show one type: sofa, table, bed, chair, storage, other
        #[arg(short, long)]
        category: Option<FurnitureKind>,

        /// Sort by name or size
        #[arg(long, default_value = "name")]
        sort: SortKey,
    },

    /// List saved designs
    Designs {
        /// Only designs from the last week
        #[arg(long)]
        recent: bool,
    },

    /// Delete a saved design
    DeleteDesign { id: DesignId },

    /// Check a layout file against a room
    Check {
        #[arg(long)]
        room: RoomId,

        /// JSON list of {furniture_id, position_x, position_y, rotation}
        #[arg(long)]
        layout: PathBuf,
    },

    #[cfg(feature = "studio")]
    /// Open the interactive design studio
    Studio {
        #[arg(long)]
        room: RoomId,

        /// Start from a saved design
        #[arg(long)]
        design: Option<DesignId>,
    },
}

impl Command {
    fn is_interactive(&self) -> bool {
        match self {
            #[cfg(feature = "studio")]
            Command::Studio { .. } => true,
            _ => false,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.command.is_interactive() {
        logging::init_file(&config::data_dir())?;
    } else {
        logging::init_stderr();
    }

    let config = load_config();
    let base_url = resolve_base_url(cli.api_url, std::env::var(API_URL_ENV).ok(), &config);
    let client = RoomfitClient::with_base_url(base_url);

    match cli.command {
        Command::Rooms => commands::rooms(&client).await?,
        Command::CreateRoom { name, width, depth } => {
            commands::create_room(&client, NewRoom { name, width, depth }).await?
        }
        Command::Catalog {
            search,
            category,
            sort,
        } => {
            let query = CatalogQuery {
                search,
                category,
                sort,
            };
            commands::catalog(&client, query).await?
        }
        Command::Designs { recent } => {
            let filter = if recent {
                DesignFilter::Recent
            } else {
                DesignFilter::All
            };
            commands::designs(&client, filter).await?
        }
        Command::DeleteDesign { id } => commands::delete_design(&client, id).await?,
        Command::Check { room, layout } => {
            commands::check(&client, room, &layout, config.layout).await?
        }
        #[cfg(feature = "studio")]
        Command::Studio { room, design } => {
            let app = open_studio(client, room, design, config.layout).await?;
            studio::run(app).await?;
        }
    }

    Ok(())
}

#[cfg(feature = "studio")]
async fn open_studio(
    client: RoomfitClient,
    room_id: RoomId,
    design_id: Option<DesignId>,
    layout: roomfit_core::LayoutConfig,
) -> Result<studio::StudioApp, error::RfError> {
    use roomfit_core::Studio;

    let (room, catalog) = tokio::try_join!(
        commands::find_room(&client, room_id),
        commands::shared_catalog(&client)
    )?;

    let (session, skipped) = match design_id {
        None => (Studio::new(room, layout), Vec::new()),
        Some(id) => {
            let design = client
                .list_designs()
                .await?
                .into_iter()
                .find(|d| d.id == id)
                .ok_or(error::RfError::DesignNotFound(id))?;
            if design.room_id != room_id {
                return Err(error::RfError::DesignRoomMismatch {
                    design: id,
                    requested: room_id,
                    actual: design.room_id,
                });
            }
            Studio::from_design(room, &design, &catalog, layout)
        }
    };

    let mut app = studio::StudioApp::new(session, client, catalog);
    if !skipped.is_empty() {
        app.status = Some(format!(
            "{} item(s) skipped: furniture no longer in catalog",
            skipped.len()
        ));
    }
    Ok(app)
}
