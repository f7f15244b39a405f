use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use log::debug;
use ratatui::layout::{Position, Rect};

use crate::document::{Action, ElementId};
use crate::markup::PollDefinition;
use crate::session;
use crate::state::{AppState, Dispatched};

/// Screen area occupied by an element during the last draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hitbox {
    pub area: Rect,
    pub element: ElementId,
}

/// The terminal host: keyboard focus, pointer hit-testing and quitting on top
/// of the application state.
#[derive(Debug)]
pub struct App {
    pub state: AppState,
    pub focus: Option<ElementId>,
    pub hitboxes: Vec<Hitbox>,
    /// Index of the first poll drawn
    pub scroll: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(definitions: &[PollDefinition]) -> Self {
        let state = AppState::new(definitions);
        let focus = Some(state.user_input.element);
        Self {
            state,
            focus,
            hitboxes: Vec::new(),
            scroll: 0,
            should_quit: false,
        }
    }

    /// Signs in as `name` right away, as if it was typed into the field.
    pub fn with_user(mut self, name: &str) -> Self {
        if !name.trim().is_empty() {
            session::sign_in_as(&mut self.state, name.trim());
        }
        self
    }

    pub fn focused_poll(&self) -> Option<usize> {
        self.focus.and_then(|id| self.state.poll_of(id))
    }

    /// Moves focus, firing the name field's change check when it loses focus.
    pub fn set_focus(&mut self, next: Option<ElementId>) {
        if self.focus == Some(self.state.user_input.element) && next != self.focus {
            session::input_changed(&mut self.state);
        }
        self.focus = next;
    }

    fn step_focus(&mut self, forward: bool) {
        let focusable = self.state.document.focusable();
        if focusable.is_empty() {
            self.set_focus(None);
            return;
        }
        let len = focusable.len();
        let next = match self.focus.and_then(|id| focusable.iter().position(|f| *f == id)) {
            Some(pos) if forward => (pos + 1) % len,
            Some(pos) => (pos + len - 1) % len,
            None if forward => 0,
            None => len - 1,
        };
        self.set_focus(Some(focusable[next]));
    }

    pub fn focus_next(&mut self) {
        self.step_focus(true);
    }

    pub fn focus_prev(&mut self) {
        self.step_focus(false);
    }

    /// Activates `element` the way a click, Enter or Space would.
    pub fn activate(&mut self, element: ElementId) -> Option<Dispatched> {
        let target = self.state.document.activation_target(element)?;
        let action = self.state.document.get(target).action.clone()?;
        self.set_focus(Some(target));
        debug!("activating {:?}: {}", target, action);

        let dispatched = self.state.dispatch(&action);
        if let Action::ToggleVotes { poll } = action {
            self.refocus_in_poll(poll);
        }
        Some(dispatched)
    }

    // after a panel toggle the focused control may no longer be reachable
    fn refocus_in_poll(&mut self, poll: usize) {
        let reachable = self
            .focus
            .is_some_and(|id| self.state.document.is_attached(id) && self.state.document.get(id).tab_index >= 0);
        if reachable {
            return;
        }
        let poll_element = self.state.polls[poll].element;
        let next = self
            .state
            .document
            .descendants(poll_element)
            .into_iter()
            .find(|id| self.state.document.get(*id).tab_index >= 0);
        self.set_focus(next);
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::Down => self.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.focus_prev(),
            _ if self.focus == Some(self.state.user_input.element) => self.on_input_key(key),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(focus) = self.focus {
                    self.activate(focus);
                }
            }
            _ => {}
        }
    }

    fn on_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(_)
                if key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {}
            KeyCode::Char(c) => self.state.user_input.push(c),
            KeyCode::Backspace => self.state.user_input.backspace(),
            KeyCode::Enter => {
                session::input_changed(&mut self.state);
                self.set_focus(Some(self.state.user_input.button));
            }
            _ => {}
        }
        let value = self.state.user_input.value.clone();
        self.state
            .document
            .get_mut(self.state.user_input.element)
            .text = value;
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let position = Position::new(mouse.column, mouse.row);
        // later hitboxes are drawn on top
        let hit = self
            .hitboxes
            .iter()
            .rev()
            .find(|hitbox| hitbox.area.contains(position))
            .map(|hitbox| hitbox.element);

        match hit {
            Some(element) if element == self.state.user_input.element => {
                self.set_focus(Some(element));
            }
            Some(element) => {
                self.activate(element);
            }
            None => {}
        }
    }
}
