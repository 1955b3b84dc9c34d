use std::sync::Arc;

use roomfit_client::{ClientError, RoomfitClient};
use roomfit_core::catalog::{CatalogQuery, SortKey};
use roomfit_core::studio::{Direction, PickToken, RequestId};
use roomfit_core::{
    Design, FitnessReport, FurnitureKind, FurnitureTemplate, Modal, Panel, RequestFailure,
    Studio,
};
use tokio::sync::oneshot;
use tracing::debug;

use super::ui::RoomView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Studio,
    PickFurniture,
    EditName,
}

/// A request running on the runtime, reported back through a oneshot.
pub struct InFlight<T> {
    id: RequestId,
    rx: oneshot::Receiver<Result<T, RequestFailure>>,
}

impl<T> InFlight<T> {
    /// `Some` once the task has reported or gone away.
    fn try_take(&mut self) -> Option<(RequestId, Result<T, RequestFailure>)> {
        match self.rx.try_recv() {
            Ok(outcome) => Some((self.id, outcome)),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some((
                self.id,
                Err(RequestFailure::Network("request task ended".to_string())),
            )),
        }
    }
}

pub struct StudioApp {
    pub mode: AppMode,
    pub should_quit: bool,
    pub studio: Studio,
    pub client: RoomfitClient,
    pub catalog: Vec<Arc<FurnitureTemplate>>,
    pub fitness_rx: Option<InFlight<FitnessReport>>,
    pub save_rx: Option<InFlight<Design>>,
    pub status: Option<String>,

    // Catalog picker state
    pub pick: Option<PickToken>,
    pub query: CatalogQuery,
    pub popup_selected: usize,

    // Design name input
    pub input: String,
    pub cursor_pos: usize,

    /// Where the room was last drawn, for mouse hit-testing.
    pub room_view: Option<RoomView>,
}

impl StudioApp {
    pub fn new(studio: Studio, client: RoomfitClient, catalog: Vec<Arc<FurnitureTemplate>>) -> Self {
        Self {
            mode: AppMode::Studio,
            should_quit: false,
            studio,
            client,
            catalog,
            fitness_rx: None,
            save_rx: None,
            status: None,
            pick: None,
            query: CatalogQuery::default(),
            popup_selected: 0,
            input: String::new(),
            cursor_pos: 0,
            room_view: None,
        }
    }

    pub fn modal_open(&self) -> bool {
        !matches!(self.studio.modal(), Modal::Closed)
    }

    pub fn close_modal(&mut self) {
        self.studio.close_modal();
    }

    pub fn visible_catalog(&self) -> Vec<&Arc<FurnitureTemplate>> {
        self.query.apply(&self.catalog)
    }

    // Requests

    pub fn start_fitness_check(&mut self) {
        let ticket = match self.studio.begin_fitness_check() {
            Ok(ticket) => ticket,
            Err(e) => {
                debug!(error = %e, "fitness check not started");
                return;
            }
        };

        let (tx, rx) = oneshot::channel();
        let client = self.client.clone();

        tokio::spawn(async move {
            let result = client
                .check_fitness(ticket.room_id, &ticket.snapshot)
                .await
                .map_err(ClientError::into_failure);
            let _ = tx.send(result);
        });

        self.fitness_rx = Some(InFlight { id: ticket.id, rx });
        self.status = None;
    }

    pub fn start_save(&mut self) {
        let ticket = match self.studio.begin_save() {
            Ok(ticket) => ticket,
            Err(e) => {
                debug!(error = %e, "save not started");
                return;
            }
        };

        let (tx, rx) = oneshot::channel();
        let client = self.client.clone();

        tokio::spawn(async move {
            let result = client
                .save_design(ticket.room_id, &ticket.name, &ticket.snapshot)
                .await
                .map_err(ClientError::into_failure);
            let _ = tx.send(result);
        });

        self.save_rx = Some(InFlight { id: ticket.id, rx });
        self.status = None;
    }

    pub fn poll_responses(&mut self) {
        if let Some((id, outcome)) = self.fitness_rx.as_mut().and_then(InFlight::try_take) {
            self.fitness_rx = None;
            self.studio.finish_fitness_check(id, outcome);
        }

        if let Some((id, outcome)) = self.save_rx.as_mut().and_then(InFlight::try_take) {
            self.save_rx = None;
            self.studio.finish_save(id, outcome);
            self.input = self.studio.design_name().to_string();
            self.cursor_pos = self.input.len();
        }
    }

    // Placement controls

    pub fn rotate(&mut self) {
        self.studio.rotate_selected();
    }

    pub fn remove(&mut self) {
        self.studio.remove_selected();
    }

    pub fn nudge(&mut self, direction: Direction) {
        self.studio.nudge_selected(direction);
    }

    pub fn toggle_panel(&mut self) {
        let next = match self.studio.panel() {
            Panel::Catalog => Panel::Controls,
            Panel::Controls => Panel::Catalog,
        };
        self.studio.set_panel(next);
    }

    /// Moves the selection through the placements in store order.
    pub fn cycle_selection(&mut self, forward: bool) {
        let ids: Vec<_> = self.studio.store().iter().map(|p| p.id).collect();
        if ids.is_empty() {
            return;
        }
        let current = self
            .studio
            .selection()
            .id()
            .and_then(|id| ids.iter().position(|&i| i == id));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => ids.len() - 1,
            (Some(i), true) => (i + 1) % ids.len(),
            (Some(i), false) => (i + ids.len() - 1) % ids.len(),
        };
        self.studio.select(ids[next]);
    }

    pub fn click(&mut self, column: u16, row: u16) {
        let Some(view) = &self.room_view else {
            return;
        };
        let Some((px, py)) = view.cell_to_pixel(column, row) else {
            return;
        };
        if self.studio.tap(&view.layout, px, py).is_none() {
            self.studio.clear_selection();
        }
    }

    // Catalog picker

    pub fn open_picker(&mut self) {
        self.pick = Some(self.studio.request_pick());
        self.popup_selected = 0;
        self.mode = AppMode::PickFurniture;
    }

    pub fn close_picker(&mut self) {
        self.studio.cancel_pick();
        self.pick = None;
        self.mode = AppMode::Studio;
    }

    pub fn popup_up(&mut self) {
        if self.popup_selected > 0 {
            self.popup_selected -= 1;
        }
    }

    pub fn popup_down(&mut self) {
        let max = self.visible_catalog().len().saturating_sub(1);
        if self.popup_selected < max {
            self.popup_selected += 1;
        }
    }

    pub fn popup_select(&mut self) {
        let Some(template) = self.visible_catalog().get(self.popup_selected).map(|t| Arc::clone(t))
        else {
            return;
        };
        if let Some(token) = self.pick.take() {
            self.studio.resolve_pick(token, template);
        }
        self.mode = AppMode::Studio;
    }

    pub fn search_char(&mut self, c: char) {
        self.query.search.push(c);
        self.popup_selected = 0;
    }

    pub fn search_backspace(&mut self) {
        self.query.search.pop();
        self.popup_selected = 0;
    }

    pub fn cycle_category(&mut self) {
        self.query.category = match self.query.category {
            None => Some(FurnitureKind::ALL[0]),
            Some(kind) => FurnitureKind::ALL
                .iter()
                .position(|&k| k == kind)
                .and_then(|i| FurnitureKind::ALL.get(i + 1).copied()),
        };
        self.popup_selected = 0;
    }

    pub fn toggle_sort(&mut self) {
        self.query.sort = match self.query.sort {
            SortKey::Name => SortKey::Size,
            SortKey::Size => SortKey::Name,
        };
        self.popup_selected = 0;
    }

    // Design name input

    pub fn edit_name(&mut self) {
        self.input = self.studio.design_name().to_string();
        self.cursor_pos = self.input.len();
        self.mode = AppMode::EditName;
    }

    pub fn commit_name(&mut self) {
        self.studio.set_design_name(self.input.clone());
        self.mode = AppMode::Studio;
    }

    pub fn cancel_name(&mut self) {
        self.mode = AppMode::Studio;
    }

    pub fn input_char(&mut self, c: char) {
        self.input.insert(self.cursor_pos, c);
        self.cursor_pos += c.len_utf8();
    }

    pub fn input_backspace(&mut self) {
        if self.cursor_pos > 0 {
            let prev_char_boundary = self.input[..self.cursor_pos]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.input.remove(prev_char_boundary);
            self.cursor_pos = prev_char_boundary;
        }
    }

    pub fn input_left(&mut self) {
        if self.cursor_pos > 0 {
            self.cursor_pos = self.input[..self.cursor_pos]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn input_right(&mut self) {
        if self.cursor_pos < self.input.len() {
            self.cursor_pos = self.input[self.cursor_pos..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_pos + i)
                .unwrap_or(self.input.len());
        }
    }
}
