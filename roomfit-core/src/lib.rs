//! Client-side room layout model for roomfit.
//!
//! Core concepts:
//! - **Placement**: one catalog template positioned and rotated in the room
//! - **PlacementStore**: the ordered placements of the room being edited
//! - **Snapshot**: an immutable read of the store used to build requests
//! - **Layout**: the room and its placements mapped into display pixels
//! - **Studio**: selection, panels and modals driving the store
//!
//! Nothing here performs I/O. The fitness check itself is done by a remote
//! service; this crate builds the inputs for it and binds its results back to
//! placements.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use roomfit_core::{FurnitureKind, FurnitureTemplate, LayoutConfig, Room, Studio};
//!
//! let room = Room { id: 1, name: "Den".into(), width: 12.0, depth: 10.0 };
//! let mut studio = Studio::new(room, LayoutConfig::default());
//!
//! let sofa = Arc::new(FurnitureTemplate {
//!     id: 4,
//!     name: "Sofa".into(),
//!     kind: FurnitureKind::Sofa,
//!     width: 7.0,
//!     depth: 3.0,
//! });
//! let id = studio.add_furniture(sofa);
//! studio.rotate(id);
//!
//! let layout = studio.layout(300.0);
//! assert_eq!(layout.scale, 15.0);
//! assert_eq!(layout.rect(id).unwrap().w, 45.0);
//! ```

pub mod catalog;
pub mod designs;
mod error;
pub mod fitness;
pub mod geometry;
mod model;
mod store;
pub mod studio;

pub use error::{InvalidRotation, RequestFailure, StudioError, ValidationError};
pub use fitness::{Feedback, FeedbackStatus, FitnessFeedback};
pub use geometry::{LayoutConfig, PixelRect, RoomLayout, layout};
pub use model::{
    Design, DesignId, DesignItem, FitnessReport, FitnessResult, Footprint, FurnitureId,
    FurnitureKind, FurnitureTemplate, NewRoom, PlacedFurniture, PlacementId, Position, Room,
    RoomId, Rotation,
};
pub use store::{PlacementStore, Snapshot};
pub use studio::{Applied, InfoKind, Modal, Panel, Selection, Studio};
