use log::{debug, info};

use crate::poll::Participant;
use crate::state::AppState;

/// What an item activation did to the current user's selection in a poll
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Transition {
    /// Nobody is signed in
    Ignored,
    Selected { item: usize },
    Switched { from: usize, to: usize },
    Unselected { item: usize },
}

/// Single-choice voting: select, switch or unselect `item` of `poll` for the
/// current user. Activations without a signed-in user are ignored.
pub fn activate_item(state: &mut AppState, poll_index: usize, item_index: usize) -> Transition {
    if state.current_user.is_empty() {
        debug!("ignoring activation of poll #{} item #{}: no user", poll_index, item_index);
        return Transition::Ignored;
    }
    let user = state.current_user.clone();
    let poll = &mut state.polls[poll_index];

    let transition = if poll.items[item_index].is_checked_by(&user) {
        poll.participated_users.retain(|participant| participant.name != user);
        clear_user(state, poll_index, &user);
        Transition::Unselected { item: item_index }
    } else {
        let transition = match poll.participant_mut(&user) {
            Some(participant) => {
                let from = participant.selected_item_index;
                participant.selected_item_index = item_index;
                Transition::Switched {
                    from,
                    to: item_index,
                }
            }
            None => {
                poll.participated_users
                    .push(Participant::new(user.clone(), item_index));
                Transition::Selected { item: item_index }
            }
        };

        // every item drops the user before the chosen one takes them back,
        // otherwise the recompute would count them twice
        clear_user(state, poll_index, &user);
        state.polls[poll_index].items[item_index]
            .checked_by
            .push(user.clone());
        state.refresh_item(poll_index, item_index, true);
        transition
    };

    info!(
        "{} in '{}' by {}",
        transition, state.polls[poll_index].title, user
    );
    transition
}

fn clear_user(state: &mut AppState, poll_index: usize, user: &str) {
    for item_index in 0..state.polls[poll_index].items.len() {
        state.polls[poll_index].items[item_index]
            .checked_by
            .retain(|name| name != user);
        state.refresh_item(poll_index, item_index, false);
    }
}
