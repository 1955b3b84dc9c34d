use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};
use roomfit_core::studio::Direction;

use super::app::{AppMode, StudioApp};

pub fn handle_event(app: &mut StudioApp, event: Event) {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(app, key),
        Event::Mouse(mouse) => {
            if mouse.kind == MouseEventKind::Down(MouseButton::Left)
                && app.mode == AppMode::Studio
                && !app.modal_open()
            {
                app.click(mouse.column, mouse.row);
            }
        }
        _ => {}
    }
}

fn handle_key(app: &mut StudioApp, key: KeyEvent) {
    if app.modal_open() {
        handle_modal_key(app, key);
        return;
    }
    match app.mode {
        AppMode::Studio => handle_studio_key(app, key),
        AppMode::PickFurniture => handle_picker_key(app, key),
        AppMode::EditName => handle_name_key(app, key),
    }
}

fn handle_modal_key(app: &mut StudioApp, key: KeyEvent) {
    if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ')) {
        app.close_modal();
    }
}

fn handle_studio_key(app: &mut StudioApp, key: KeyEvent) {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) | (KeyCode::Char('q'), _) => {
            app.should_quit = true;
        }
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        (KeyCode::Char('a'), _) => app.open_picker(),
        (KeyCode::Tab, _) => app.toggle_panel(),
        (KeyCode::Char('n'), _) => app.cycle_selection(true),
        (KeyCode::Char('p'), _) => app.cycle_selection(false),
        (KeyCode::Char('r'), _) => app.rotate(),
        (KeyCode::Char('x'), _) | (KeyCode::Delete, _) => app.remove(),
        (KeyCode::Left, _) => app.nudge(Direction::Left),
        (KeyCode::Right, _) => app.nudge(Direction::Right),
        (KeyCode::Up, _) => app.nudge(Direction::Up),
        (KeyCode::Down, _) => app.nudge(Direction::Down),
        (KeyCode::Char('c'), _) => {
            if !app.studio.is_busy() {
                app.start_fitness_check();
            }
        }
        (KeyCode::Char('e'), _) => app.edit_name(),
        (KeyCode::Char('s'), _) => {
            if !app.studio.is_saving() {
                app.start_save();
            }
        }
        _ => {}
    }
}

fn handle_picker_key(app: &mut StudioApp, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_picker(),
        KeyCode::Enter => app.popup_select(),
        KeyCode::Up => app.popup_up(),
        KeyCode::Down => app.popup_down(),
        KeyCode::F(2) => app.cycle_category(),
        KeyCode::F(3) => app.toggle_sort(),
        KeyCode::Backspace => app.search_backspace(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => app.search_char(c),
        _ => {}
    }
}

fn handle_name_key(app: &mut StudioApp, key: KeyEvent) {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => app.cancel_name(),
        (KeyCode::Enter, _) => app.commit_name(),
        (KeyCode::Backspace, _) => app.input_backspace(),
        (KeyCode::Left, _) => app.input_left(),
        (KeyCode::Right, _) => app.input_right(),
        (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => app.input_char(c),
        _ => {}
    }
}
