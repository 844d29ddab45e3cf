//! Application state and logic.

use crate::config::Config;
use crate::theme::Palette;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use progress_core::{Cadence, Granularity, NoteList, Settings, YearProgress};
use ratatui::layout::{Position, Rect};
use tracing::{info, warn};

/// Application state.
pub struct App {
    /// Configuration.
    pub config: Config,
    /// Persisted settings.
    settings: Settings,
    /// Latest published progress.
    pub progress: YearProgress,
    /// Refresh cadence currently in use.
    pub cadence: Cadence,
    /// Grid cell unit.
    pub granularity: Granularity,
    /// Dark or light palette.
    pub dark_mode: bool,
    /// Notes.
    pub notes: NoteList,
    /// Selected note index.
    pub selected_note: usize,
    /// Input mode.
    pub mode: Mode,
    /// Input buffer for a new note.
    pub input_buffer: String,
    /// Card offset from its centered position, in cells.
    pub card_offset: (i16, i16),
    /// Where the card was last drawn.
    pub card_area: Option<Rect>,
    /// Active mouse drag.
    drag: Option<Drag>,
    /// Message to display.
    pub message: Option<(String, MessageType)>,
    /// Show help popup.
    pub show_help: bool,
}

/// Input mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    AddingNote,
}

/// Message type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Info,
    Error,
}

/// What the event loop should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    /// Cadence changed; restart the refresh loop.
    RestartRefresh,
}

/// Pointer position and card offset when a drag began.
#[derive(Debug, Clone, Copy)]
struct Drag {
    column: u16,
    row: u16,
    offset: (i16, i16),
}

impl App {
    /// Create new application.
    pub fn new(config: Config, settings: Settings, progress: YearProgress) -> Self {
        let notes = NoteList::from(settings.notes());
        let dark_mode = settings.dark_mode();

        Self {
            cadence: config.display.cadence,
            granularity: config.display.grid,
            config,
            settings,
            progress,
            dark_mode,
            notes,
            selected_note: 0,
            mode: Mode::Normal,
            input_buffer: String::new(),
            card_offset: (0, 0),
            card_area: None,
            drag: None,
            message: None,
            show_help: false,
        }
    }

    pub fn set_progress(&mut self, progress: YearProgress) {
        self.progress = progress;
    }

    pub fn palette(&self) -> Palette {
        Palette::for_mode(self.dark_mode)
    }

    /// Check if in editing mode.
    pub fn is_editing(&self) -> bool {
        self.mode == Mode::AddingNote
    }

    /// Handle a terminal event.
    pub fn handle_event(&mut self, event: Event) -> Action {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => {
                self.handle_mouse(mouse);
                Action::None
            }
            _ => Action::None,
        }
    }

    /// Handle key input.
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        // Handle help popup
        if self.show_help {
            self.show_help = false;
            return Action::None;
        }

        if self.is_editing() {
            self.handle_edit_key(key);
            return Action::None;
        }

        // Clear message on any key
        self.message = None;

        match key.code {
            KeyCode::Char('q') => return Action::Quit,

            // Notes
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::Char('n') | KeyCode::Char('a') => self.start_add_note(),
            KeyCode::Char('x') | KeyCode::Delete => self.delete_selected_note(),

            // Display
            KeyCode::Char('d') => self.toggle_dark_mode(),
            KeyCode::Char('g') => self.cycle_grid(),
            KeyCode::Char('c') => return self.toggle_cadence(),
            KeyCode::Char('0') => self.card_offset = (0, 0),

            // Help
            KeyCode::Char('?') => self.show_help = true,

            _ => {}
        }

        Action::None
    }

    /// Handle editing keys.
    fn handle_edit_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                self.input_buffer.clear();
            }
            KeyCode::Enter => self.finish_note(),
            KeyCode::Backspace => {
                self.input_buffer.pop();
            }
            KeyCode::Char(c) => {
                self.input_buffer.push(c);
            }
            _ => {}
        }
    }

    /// Drag the card with the left mouse button.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let on_card = self
                    .card_area
                    .is_some_and(|card| card.contains(Position::new(mouse.column, mouse.row)));
                if !on_card {
                    return;
                }
                self.drag = Some(Drag {
                    column: mouse.column,
                    row: mouse.row,
                    offset: self.card_offset,
                });
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(drag) = self.drag {
                    let dx = i32::from(mouse.column) - i32::from(drag.column);
                    let dy = i32::from(mouse.row) - i32::from(drag.row);
                    self.card_offset = (
                        clamp_offset(i32::from(drag.offset.0) + dx),
                        clamp_offset(i32::from(drag.offset.1) + dy),
                    );
                }
            }
            MouseEventKind::Up(MouseButton::Left) => self.drag = None,
            _ => {}
        }
    }

    /// Move selection by delta.
    fn move_selection(&mut self, delta: i32) {
        if self.notes.is_empty() {
            return;
        }

        let new_index = self.selected_note as i32 + delta;
        self.selected_note = new_index.clamp(0, self.notes.len() as i32 - 1) as usize;
    }

    fn start_add_note(&mut self) {
        self.mode = Mode::AddingNote;
        self.input_buffer.clear();
    }

    fn finish_note(&mut self) {
        if self.notes.add(&self.input_buffer) {
            self.selected_note = self.notes.len() - 1;
            self.persist_notes();
        }
        self.mode = Mode::Normal;
        self.input_buffer.clear();
    }

    fn delete_selected_note(&mut self) {
        if self.notes.remove(self.selected_note).is_some() {
            if self.selected_note >= self.notes.len() {
                self.selected_note = self.notes.len().saturating_sub(1);
            }
            self.persist_notes();
        }
    }

    fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
        if let Err(e) = self.settings.save_dark_mode(self.dark_mode) {
            warn!(error = %e, "failed to save dark mode");
            self.message = Some(("Theme not saved".to_string(), MessageType::Error));
        }
    }

    fn cycle_grid(&mut self) {
        self.granularity = self.granularity.next();
        self.message = Some((
            format!("Grid: {}", self.granularity.label()),
            MessageType::Info,
        ));
    }

    fn toggle_cadence(&mut self) -> Action {
        self.cadence = self.cadence.toggle();
        info!(cadence = self.cadence.label(), "cadence changed");
        self.message = Some((
            format!("Refreshing every {}", self.cadence.label()),
            MessageType::Info,
        ));
        Action::RestartRefresh
    }

    fn persist_notes(&mut self) {
        if let Err(e) = self.settings.save_notes(self.notes.as_slice()) {
            warn!(error = %e, "failed to save notes");
            self.message = Some(("Notes not saved".to_string(), MessageType::Error));
        }
    }
}

/// Keep offsets within a range any terminal can show.
fn clamp_offset(value: i32) -> i16 {
    value.clamp(-500, 500) as i16
}
