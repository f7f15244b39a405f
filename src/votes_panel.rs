use log::{debug, warn};

use crate::document::{Action, ElementId};
use crate::state::AppState;

pub const EMPTY_MESSAGE: &str = "There are no participants in this poll yet.";

/// Opens or closes the votes panel of `poll_index` and returns whether it is
/// now open. Exactly one of poll and panel stays keyboard reachable; an open
/// panel shows a fresh snapshot of the participants.
pub fn toggle_votes_panel(state: &mut AppState, poll_index: usize) -> bool {
    let poll_element = state.polls[poll_index].element;
    let document = &mut state.document;
    let (Some(panel), Some(view_button), Some(close_button)) = (
        document.query_class(poll_element, "view-votes-panel"),
        document.query_class(poll_element, "view-votes-button"),
        document.query_class(poll_element, "view-votes-close-button"),
    ) else {
        warn!("poll #{} has no votes panel", poll_index);
        return false;
    };

    document.toggle_class(panel, "disabled");
    document.toggle_class(poll_element, "disabled");
    let open = !document.get(panel).has_class("disabled");

    document.get_mut(view_button).tab_index = if open { -1 } else { 0 };
    document.get_mut(close_button).tab_index = if open { 0 } else { -1 };
    for item in &state.polls[poll_index].items {
        document.get_mut(item.element).tab_index = if open { -1 } else { 0 };
    }

    let stale: Vec<ElementId> = document
        .query_class_all(panel, "participant-empty")
        .into_iter()
        .chain(document.query_class_all(panel, "participant-container"))
        .collect();
    for element in stale {
        document.remove(element);
    }

    debug!("votes panel of poll #{} open = {}", poll_index, open);
    if open {
        render_participants(state, poll_index, panel);
    }
    open
}

fn render_participants(state: &mut AppState, poll_index: usize, panel: ElementId) {
    let poll = &state.polls[poll_index];
    let document = &mut state.document;

    if poll.participated_users.is_empty() {
        let empty = document.create_element("div", panel, "participant-empty", "");
        document.get_mut(empty).text = EMPTY_MESSAGE.to_string();
        return;
    }

    for user in &poll.participated_users {
        let container = document.create_element("div", panel, "participant-container", "");
        let image = document.create_element("button", container, "participant-image", "");
        let name = document.create_element("p", container, "participant-name", "");
        let item = document.create_element("p", container, "participant-item", "");

        let avatar = document.get_mut(image);
        avatar.text = user.name.chars().next().map(String::from).unwrap_or_default();
        avatar.title = format!("Click to sign in with {} account.", user.name);
        avatar.action = Some(Action::SignInAs {
            name: user.name.clone(),
        });

        document.get_mut(name).text = user.name.clone();
        document.get_mut(item).text = poll.selected_value(user).unwrap_or_default().to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::PollDefinition;
    use crate::selection::activate_item;
    use crate::session::sign_in_as;

    fn state() -> AppState {
        AppState::new(&[
            PollDefinition::new("Colour", "Red|Blue"),
            PollDefinition::new("Pets", "Cat|Dog"),
        ])
    }

    fn rows(state: &AppState, poll: usize) -> Vec<(String, String, String)> {
        let doc = &state.document;
        doc.query_class_all(state.polls[poll].element, "participant-container")
            .into_iter()
            .map(|row| {
                let children = doc.get(row).children();
                (
                    doc.get(children[0]).text.clone(),
                    doc.get(children[1]).text.clone(),
                    doc.get(children[2]).text.clone(),
                )
            })
            .collect()
    }

    #[test]
    fn toggle_flips_classes_and_tab_indices_in_lockstep() {
        let mut state = state();
        let poll = state.polls[0].element;

        assert!(toggle_votes_panel(&mut state, 0));
        let doc = &state.document;
        let panel = doc.query_class(poll, "view-votes-panel").unwrap();
        assert!(!doc.get(panel).has_class("disabled"));
        assert!(doc.get(poll).has_class("disabled"));
        assert_eq!(
            doc.get(doc.query_class(poll, "view-votes-button").unwrap()).tab_index,
            -1
        );
        assert_eq!(
            doc.get(doc.query_class(poll, "view-votes-close-button").unwrap()).tab_index,
            0
        );
        assert!(state.polls[0]
            .items
            .iter()
            .all(|i| doc.get(i.element).tab_index == -1));
        // the other poll is untouched
        assert!(state.polls[1]
            .items
            .iter()
            .all(|i| doc.get(i.element).tab_index == 0));

        assert!(!toggle_votes_panel(&mut state, 0));
        let doc = &state.document;
        assert!(doc.get(panel).has_class("disabled"));
        assert!(!doc.get(poll).has_class("disabled"));
        assert!(state.polls[0]
            .items
            .iter()
            .all(|i| doc.get(i.element).tab_index == 0));
    }

    #[test]
    fn empty_poll_shows_single_message() {
        let mut state = state();
        toggle_votes_panel(&mut state, 0);
        let doc = &state.document;
        let empty = doc.query_class_all(state.polls[0].element, "participant-empty");
        assert_eq!(empty.len(), 1);
        assert_eq!(doc.get(empty[0]).text, EMPTY_MESSAGE);
        assert!(rows(&state, 0).is_empty());
    }

    #[test]
    fn rows_list_participants_and_their_items() {
        let mut state = state();
        sign_in_as(&mut state, "Alice");
        activate_item(&mut state, 0, 0);
        sign_in_as(&mut state, "Bob");
        activate_item(&mut state, 0, 0);

        toggle_votes_panel(&mut state, 0);
        assert_eq!(
            rows(&state, 0),
            vec![
                ("A".into(), "Alice".into(), "Red".into()),
                ("B".into(), "Bob".into(), "Red".into()),
            ]
        );
        assert!(state
            .document
            .query_class(state.polls[0].element, "participant-empty")
            .is_none());
    }

    #[test]
    fn closing_clears_rows_and_reopening_takes_fresh_snapshot() {
        let mut state = state();
        sign_in_as(&mut state, "Alice");
        activate_item(&mut state, 0, 0);

        toggle_votes_panel(&mut state, 0);
        assert_eq!(rows(&state, 0).len(), 1);
        toggle_votes_panel(&mut state, 0);
        assert!(rows(&state, 0).is_empty());

        activate_item(&mut state, 0, 1);
        sign_in_as(&mut state, "Bob");
        activate_item(&mut state, 0, 1);
        toggle_votes_panel(&mut state, 0);
        assert_eq!(
            rows(&state, 0),
            vec![
                ("A".into(), "Alice".into(), "Blue".into()),
                ("B".into(), "Bob".into(), "Blue".into()),
            ]
        );
    }

    #[test]
    fn reopening_the_panel_does_not_grow_the_document() {
        let mut state = state();
        for name in ["Alice", "Bob", "Carol"] {
            sign_in_as(&mut state, name);
            activate_item(&mut state, 0, 0);
        }

        toggle_votes_panel(&mut state, 0);
        toggle_votes_panel(&mut state, 0);
        let slots = state.document.slots();
        for _ in 0..20 {
            toggle_votes_panel(&mut state, 0);
            toggle_votes_panel(&mut state, 0);
        }
        assert_eq!(state.document.slots(), slots);

        toggle_votes_panel(&mut state, 0);
        assert_eq!(rows(&state, 0).len(), 3);
    }

    #[test]
    fn avatar_signs_in_as_participant() {
        let mut state = state();
        sign_in_as(&mut state, "Alice");
        activate_item(&mut state, 0, 1);
        sign_in_as(&mut state, "Bob");

        toggle_votes_panel(&mut state, 0);
        let avatar = state
            .document
            .query_class(state.polls[0].element, "participant-image")
            .unwrap();
        let element = state.document.get(avatar);
        assert_eq!(element.title, "Click to sign in with Alice account.");
        let action = element.action.clone().unwrap();

        state.dispatch(&action);
        assert_eq!(state.current_user, "Alice");
        assert_eq!(state.user_input.value, "Alice");
        assert!(state.polls[0].items[1].checked);
        assert!(!state.polls[0].items[0].checked);
    }
}
