use log::{debug, info};

use crate::document::ElementId;
use crate::state::AppState;

/// The name text field and its sign-in button
#[derive(Debug, Clone)]
pub struct UserInput {
    pub value: String,
    pub invalid: bool,
    /// Set on every edit, consumed by the next change check
    pub dirty: bool,
    pub element: ElementId,
    pub button: ElementId,
}

impl UserInput {
    pub fn new(element: ElementId, button: ElementId) -> Self {
        Self {
            value: String::new(),
            invalid: false,
            dirty: false,
            element,
            button,
        }
    }

    pub fn push(&mut self, c: char) {
        self.value.push(c);
        self.dirty = true;
    }

    pub fn backspace(&mut self) {
        if self.value.pop().is_some() {
            self.dirty = true;
        }
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.dirty = true;
    }
}

fn sync_input(state: &mut AppState) {
    let element = state.document.get_mut(state.user_input.element);
    element.text = state.user_input.value.clone();
    let invalid = state.user_input.invalid;
    state
        .document
        .set_class(state.user_input.element, "invalid", invalid);
}

/// Change event of the name field: flags it when the trimmed text differs
/// from the signed-in user. Only a visual hint, sign-in is never blocked.
pub fn input_changed(state: &mut AppState) {
    if !state.user_input.dirty {
        return;
    }
    state.user_input.dirty = false;
    state.user_input.invalid = state.user_input.value.trim() != state.current_user;
    debug!("name field changed, invalid = {}", state.user_input.invalid);
    sync_input(state);
}

/// Signs in with the trimmed field value and refreshes every item's check-mark
/// for that identity.
pub fn sign_in(state: &mut AppState) {
    state.user_input.invalid = false;
    state.user_input.dirty = false;
    state.current_user = state.user_input.value.trim().to_string();
    sync_input(state);

    for poll_index in 0..state.polls.len() {
        for item_index in 0..state.polls[poll_index].items.len() {
            let checked = state.polls[poll_index].items[item_index].is_checked_by(&state.current_user);
            state.refresh_item(poll_index, item_index, checked);
        }
    }

    if state.current_user.is_empty() {
        info!("signed out");
    } else {
        info!("signed in as {}", state.current_user);
    }
}

/// Fills the field with `name` and signs in as if the button was pressed.
pub fn sign_in_as(state: &mut AppState, name: &str) {
    state.current_user = name.to_string();
    state.user_input.set_value(name);
    sign_in(state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::PollDefinition;
    use crate::selection::activate_item;

    fn state() -> AppState {
        AppState::new(&[
            PollDefinition::new("Colour", "Red|Blue"),
            PollDefinition::new("Pets", "Cat|Dog"),
        ])
    }

    fn type_name(state: &mut AppState, name: &str) {
        state.user_input.set_value(name);
    }

    #[test]
    fn sign_in_trims_name() {
        let mut state = state();
        type_name(&mut state, "  Alice \t");
        sign_in(&mut state);
        assert_eq!(state.current_user, "Alice");
        assert_eq!(state.document.get(state.user_input.element).text, "  Alice \t");
    }

    #[test]
    fn change_flags_mismatch_without_blocking() {
        let mut state = state();
        type_name(&mut state, "Alice");
        sign_in(&mut state);

        type_name(&mut state, "Bob");
        input_changed(&mut state);
        assert!(state.user_input.invalid);
        assert!(state
            .document
            .get(state.user_input.element)
            .has_class("invalid"));
        assert_eq!(state.current_user, "Alice");

        sign_in(&mut state);
        assert!(!state.user_input.invalid);
        assert_eq!(state.current_user, "Bob");
        assert!(!state
            .document
            .get(state.user_input.element)
            .has_class("invalid"));
    }

    #[test]
    fn change_matching_current_user_is_valid() {
        let mut state = state();
        type_name(&mut state, "Alice");
        sign_in(&mut state);
        type_name(&mut state, " Alice ");
        input_changed(&mut state);
        assert!(!state.user_input.invalid);
    }

    #[test]
    fn unedited_field_does_not_fire_change() {
        let mut state = state();
        state.user_input.value = "Bob".into();
        input_changed(&mut state);
        assert!(!state.user_input.invalid);
    }

    #[test]
    fn sign_in_refreshes_checked_visual_for_new_identity() {
        let mut state = state();
        type_name(&mut state, "Alice");
        sign_in(&mut state);
        activate_item(&mut state, 0, 0);
        activate_item(&mut state, 1, 1);

        type_name(&mut state, "Bob");
        sign_in(&mut state);
        assert!(state.polls.iter().flat_map(|p| &p.items).all(|i| !i.checked));
        activate_item(&mut state, 0, 1);

        type_name(&mut state, "Alice");
        sign_in(&mut state);
        let checked: Vec<Vec<bool>> = state
            .polls
            .iter()
            .map(|p| p.items.iter().map(|i| i.checked).collect())
            .collect();
        assert_eq!(checked, vec![vec![true, false], vec![false, true]]);
        assert_eq!(state.polls[0].items[0].percentage(), 50);
        assert_eq!(state.polls[0].items[1].percentage(), 50);
    }

    #[test]
    fn signing_in_with_blank_name_signs_out() {
        let mut state = state();
        type_name(&mut state, "Alice");
        sign_in(&mut state);
        type_name(&mut state, "   ");
        sign_in(&mut state);
        assert!(state.current_user.is_empty());
    }

    #[test]
    fn sign_in_as_fills_the_field() {
        let mut state = state();
        sign_in_as(&mut state, "Carol");
        assert_eq!(state.current_user, "Carol");
        assert_eq!(state.user_input.value, "Carol");
        assert!(!state.user_input.dirty);
    }
}
