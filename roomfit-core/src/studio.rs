//! Interactive editing session for one room.
//!
//! `Studio` owns the placement store and the interaction state around it:
//! which placement is selected, which side panel is showing and which modal
//! (if any) is open. Network calls happen elsewhere; the studio hands out a
//! ticket when a request starts and only accepts the outcome carrying the
//! ticket of the request still in flight.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{RequestFailure, StudioError, ValidationError};
use crate::fitness::{Feedback, FitnessFeedback};
use crate::geometry::{LayoutConfig, RoomLayout};
use crate::model::{
    Design, DesignItem, FitnessReport, FurnitureTemplate, PlacedFurniture, PlacementId, Position,
    Room, RoomId,
};
use crate::store::{PlacementStore, Snapshot};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    Selected(PlacementId),
}

impl Selection {
    pub fn id(self) -> Option<PlacementId> {
        match self {
            Selection::None => None,
            Selection::Selected(id) => Some(id),
        }
    }
}

/// Side panel: the catalog to add from, or the controls for the selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Panel {
    #[default]
    Catalog,
    Controls,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoKind {
    Success,
    Error,
    Info,
}

/// At most one modal is open at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Modal {
    #[default]
    Closed,
    Info {
        kind: InfoKind,
        title: String,
        message: String,
    },
    /// Results of the last fitness check, read from [`Studio::fitness_feedback`].
    FitnessResults,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

/// Everything needed to issue a fitness check.
#[derive(Debug, Clone)]
pub struct FitnessTicket {
    pub id: RequestId,
    pub room_id: RoomId,
    pub snapshot: Snapshot,
}

/// Everything needed to issue a design save.
#[derive(Debug, Clone)]
pub struct SaveTicket {
    pub id: RequestId,
    pub room_id: RoomId,
    pub name: String,
    pub snapshot: Snapshot,
}

/// Outcome of handing a completed request back to the studio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Applied,
    /// The request is no longer the one in flight; nothing changed.
    Discarded,
}

/// Pending request to pick a template from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickToken(u64);

#[derive(Debug, Clone)]
struct PendingFitness {
    id: RequestId,
    snapshot: Snapshot,
}

#[derive(Debug, Clone)]
struct PendingSave {
    id: RequestId,
    name: String,
}

pub struct Studio {
    room: Room,
    config: LayoutConfig,
    store: PlacementStore,
    selection: Selection,
    panel: Panel,
    modal: Modal,
    feedback: Option<FitnessFeedback>,
    design_name: String,
    next_request: u64,
    fitness_pending: Option<PendingFitness>,
    save_pending: Option<PendingSave>,
    next_pick: u64,
    pick_pending: Option<PickToken>,
}

impl Studio {
    pub fn new(room: Room, config: LayoutConfig) -> Self {
        Self {
            room,
            store: PlacementStore::with_anchor(config.anchor()),
            config,
            selection: Selection::None,
            panel: Panel::Catalog,
            modal: Modal::Closed,
            feedback: None,
            design_name: String::new(),
            next_request: 0,
            fitness_pending: None,
            save_pending: None,
            next_pick: 0,
            pick_pending: None,
        }
    }

    /// Rebuilds a session from a saved design.
    ///
    /// Items whose template is not in `catalog` cannot be placed and are
    /// returned so the caller can report them.
    pub fn from_design(
        room: Room,
        design: &Design,
        catalog: &[Arc<FurnitureTemplate>],
        config: LayoutConfig,
    ) -> (Self, Vec<DesignItem>) {
        let mut studio = Self::new(room, config);
        let mut skipped = Vec::new();

        for item in &design.furniture_items {
            match catalog.iter().find(|t| t.id == item.furniture_id) {
                Some(template) => {
                    studio
                        .store
                        .add_at(Arc::clone(template), item.position(), item.rotation);
                }
                None => {
                    warn!(furniture_id = item.furniture_id, design = %design.name, "skipping design item with unknown furniture");
                    skipped.push(item.clone());
                }
            }
        }

        studio.design_name = design.name.clone();
        (studio, skipped)
    }

    pub fn room(&self) -> &Room {
        &self.room
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn store(&self) -> &PlacementStore {
        &self.store
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn selected(&self) -> Option<&PlacedFurniture> {
        self.selection.id().and_then(|id| self.store.get(id))
    }

    pub fn panel(&self) -> Panel {
        self.panel
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn design_name(&self) -> &str {
        &self.design_name
    }

    pub fn fitness_feedback(&self) -> Option<&FitnessFeedback> {
        self.feedback.as_ref()
    }

    /// True when placements changed after the attached results were checked.
    pub fn feedback_is_stale(&self) -> bool {
        self.feedback
            .as_ref()
            .is_some_and(|feedback| feedback.revision() != self.store.revision())
    }

    pub fn feedback_for(&self, id: PlacementId) -> Feedback<'_> {
        match &self.feedback {
            Some(feedback) => feedback.for_placement(id),
            None => Feedback::NoResult,
        }
    }

    pub fn layout(&self, budget_width: f64) -> RoomLayout {
        self.config
            .layout(&self.room, self.store.snapshot().as_slice(), budget_width)
    }

    // Placement intents

    /// Adds a placement, selects it and shows its controls.
    pub fn add_furniture(&mut self, template: Arc<FurnitureTemplate>) -> PlacementId {
        let placed = self.store.add(template);
        self.selection = Selection::Selected(placed.id);
        self.panel = Panel::Controls;
        placed.id
    }

    /// Selects an existing placement. Unknown ids are ignored.
    pub fn select(&mut self, id: PlacementId) {
        if self.store.contains(id) {
            self.selection = Selection::Selected(id);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::None;
    }

    /// Selects whatever is under a display-space point, if anything.
    pub fn tap(&mut self, layout: &RoomLayout, px: f64, py: f64) -> Option<PlacementId> {
        let id = layout.hit_test(px, py)?;
        self.select(id);
        self.selection.id()
    }

    pub fn remove(&mut self, id: PlacementId) {
        if self.store.remove(id).is_none() {
            return;
        }
        if self.selection == Selection::Selected(id) {
            self.selection = Selection::None;
        }
        if let Some(feedback) = &mut self.feedback {
            feedback.discard(id);
        }
    }

    pub fn remove_selected(&mut self) {
        if let Some(id) = self.selection.id() {
            self.remove(id);
        }
    }

    pub fn rotate(&mut self, id: PlacementId) {
        self.store.rotate(id);
    }

    pub fn rotate_selected(&mut self) {
        if let Some(id) = self.selection.id() {
            self.store.rotate(id);
        }
    }

    pub fn move_to(&mut self, id: PlacementId, position: Position) {
        self.store.move_to(id, position);
    }

    /// Moves the selection by one nudge step. Up decreases `y`.
    pub fn nudge_selected(&mut self, direction: Direction) {
        let Some(item) = self.selected() else {
            return;
        };
        let step = self.config.nudge_step;
        let (dx, dy) = match direction {
            Direction::Left => (-step, 0.0),
            Direction::Right => (step, 0.0),
            Direction::Up => (0.0, -step),
            Direction::Down => (0.0, step),
        };
        let (id, position) = (item.id, item.position.offset(dx, dy));
        self.store.move_to(id, position);
    }

    pub fn set_panel(&mut self, panel: Panel) {
        self.panel = panel;
    }

    pub fn set_design_name(&mut self, name: impl Into<String>) {
        self.design_name = name.into();
    }

    // Modals

    pub fn show_info(&mut self, kind: InfoKind, title: impl Into<String>, message: impl Into<String>) {
        self.modal = Modal::Info {
            kind,
            title: title.into(),
            message: message.into(),
        };
    }

    pub fn show_fitness_results(&mut self) {
        self.modal = Modal::FitnessResults;
    }

    pub fn close_modal(&mut self) {
        self.modal = Modal::Closed;
    }

    // Catalog picking

    /// Starts a catalog pick. Any earlier pick is superseded.
    pub fn request_pick(&mut self) -> PickToken {
        self.next_pick += 1;
        let token = PickToken(self.next_pick);
        self.pick_pending = Some(token);
        token
    }

    pub fn pick_pending(&self) -> bool {
        self.pick_pending.is_some()
    }

    pub fn cancel_pick(&mut self) {
        self.pick_pending = None;
    }

    /// Completes a catalog pick by adding the chosen template.
    pub fn resolve_pick(
        &mut self,
        token: PickToken,
        template: Arc<FurnitureTemplate>,
    ) -> Option<PlacementId> {
        if self.pick_pending != Some(token) {
            debug!(?token, "ignoring stale catalog pick");
            return None;
        }
        self.pick_pending = None;
        Some(self.add_furniture(template))
    }

    // Requests

    fn next_request_id(&mut self) -> RequestId {
        self.next_request += 1;
        RequestId(self.next_request)
    }

    /// True while a fitness check is outstanding.
    pub fn is_busy(&self) -> bool {
        self.fitness_pending.is_some()
    }

    pub fn is_saving(&self) -> bool {
        self.save_pending.is_some()
    }

    /// Validates and snapshots the layout for a fitness check.
    pub fn begin_fitness_check(&mut self) -> Result<FitnessTicket, StudioError> {
        if self.fitness_pending.is_some() {
            return Err(StudioError::Busy);
        }
        if self.store.is_empty() {
            self.show_info(
                InfoKind::Error,
                "Nothing to Check",
                "Please add furniture to the room first.",
            );
            return Err(ValidationError::EmptyLayout.into());
        }

        let id = self.next_request_id();
        let snapshot = self.store.snapshot();
        debug!(?id, items = snapshot.len(), "starting fitness check");
        self.fitness_pending = Some(PendingFitness {
            id,
            snapshot: snapshot.clone(),
        });

        Ok(FitnessTicket {
            id,
            room_id: self.room.id,
            snapshot,
        })
    }

    /// Applies the outcome of the fitness check started with `id`.
    pub fn finish_fitness_check(
        &mut self,
        id: RequestId,
        outcome: Result<FitnessReport, RequestFailure>,
    ) -> Applied {
        let pending = match self.fitness_pending.take() {
            Some(pending) if pending.id == id => pending,
            other => {
                self.fitness_pending = other;
                warn!(?id, "discarding stale fitness result");
                return Applied::Discarded;
            }
        };

        match outcome {
            Ok(report) => {
                let mut feedback = FitnessFeedback::correlate(&pending.snapshot, report);
                feedback.retain_present(&self.store);
                self.feedback = Some(feedback);
                self.show_fitness_results();
            }
            Err(failure) => {
                if matches!(failure, RequestFailure::Service { .. }) {
                    self.feedback = None;
                }
                warn!(error = %failure, "fitness check failed");
                self.show_info(
                    InfoKind::Error,
                    "Fitness Check Failed",
                    "Unable to check fitness. Please try again.",
                );
            }
        }
        Applied::Applied
    }

    /// Validates and snapshots the layout for saving under the current name.
    pub fn begin_save(&mut self) -> Result<SaveTicket, StudioError> {
        if self.save_pending.is_some() {
            return Err(StudioError::Busy);
        }
        let name = self.design_name.trim().to_string();
        if name.is_empty() {
            self.show_info(
                InfoKind::Error,
                "Design Name Required",
                "Please enter a name for your design before saving.",
            );
            return Err(ValidationError::MissingDesignName.into());
        }
        if self.store.is_empty() {
            self.show_info(
                InfoKind::Info,
                "No Furniture Added",
                "Add some furniture to your room before saving the design.",
            );
            return Err(ValidationError::EmptyLayout.into());
        }

        let id = self.next_request_id();
        debug!(?id, %name, "starting design save");
        self.save_pending = Some(PendingSave {
            id,
            name: name.clone(),
        });

        Ok(SaveTicket {
            id,
            room_id: self.room.id,
            name,
            snapshot: self.store.snapshot(),
        })
    }

    /// Applies the outcome of the save started with `id`.
    pub fn finish_save(&mut self, id: RequestId, outcome: Result<Design, RequestFailure>) -> Applied {
        let pending = match self.save_pending.take() {
            Some(pending) if pending.id == id => pending,
            other => {
                self.save_pending = other;
                warn!(?id, "discarding stale save result");
                return Applied::Discarded;
            }
        };

        match outcome {
            Ok(design) => {
                debug!(design_id = design.id, "design saved");
                self.show_info(
                    InfoKind::Success,
                    "Design Saved!",
                    format!(
                        "Your design \"{}\" has been saved successfully. You can find it in your saved designs.",
                        pending.name
                    ),
                );
                self.design_name.clear();
            }
            Err(failure) => {
                warn!(error = %failure, "design save failed");
                self.show_info(
                    InfoKind::Error,
                    "Save Failed",
                    "Unable to save your design. Please check your connection and try again.",
                );
            }
        }
        Applied::Applied
    }
}
