use crate::document::{Action, Document, ElementId};
use crate::markup::PollDefinition;
use crate::poll::Poll;
use crate::selection::{activate_item, Transition};
use crate::session::{self, UserInput};
use crate::setup::{render_item, setup_polls, setup_user_signing_in};
use crate::votes_panel::toggle_votes_panel;

/// Everything a handler may touch: the poll registry, the signed-in user,
/// the name field and the element tree they render into.
#[derive(Debug, Clone)]
pub struct AppState {
    pub document: Document,
    pub polls: Vec<Poll>,
    pub current_user: String,
    pub user_input: UserInput,
}

/// Result of dispatching an [`Action`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    Item(Transition),
    VotesPanel { open: bool },
    SignedIn(String),
    EditName,
}

impl AppState {
    pub fn new(definitions: &[PollDefinition]) -> Self {
        let mut document = Document::new();
        let user_input = setup_user_signing_in(&mut document);
        let polls = setup_polls(&mut document, definitions);
        Self {
            document,
            polls,
            current_user: String::new(),
            user_input,
        }
    }

    pub fn dispatch(&mut self, action: &Action) -> Dispatched {
        match action {
            Action::ActivateItem { poll, item } => Dispatched::Item(activate_item(self, *poll, *item)),
            Action::ToggleVotes { poll } => Dispatched::VotesPanel {
                open: toggle_votes_panel(self, *poll),
            },
            Action::SignIn => {
                session::sign_in(self);
                Dispatched::SignedIn(self.current_user.clone())
            }
            Action::SignInAs { name } => {
                session::sign_in_as(self, name);
                Dispatched::SignedIn(self.current_user.clone())
            }
            Action::EditName => Dispatched::EditName,
        }
    }

    /// Recomputes one item's checked visual and percentage, then renders it.
    pub fn refresh_item(&mut self, poll: usize, item: usize, checked: bool) {
        let poll = &mut self.polls[poll];
        let participants = poll.participated_users.len();
        let item = &mut poll.items[item];
        item.update_checked_visual(checked, participants);
        render_item(&mut self.document, item);
    }

    /// Poll whose subtree contains `element`
    pub fn poll_of(&self, element: ElementId) -> Option<usize> {
        let mut current = Some(element);
        while let Some(id) = current {
            if let Some(index) = self.polls.iter().position(|poll| poll.element == id) {
                return Some(index);
            }
            current = self.document.get(id).parent();
        }
        None
    }
}
