use log::{debug, info};

use crate::document::{Action, Document, ElementId};
use crate::markup::PollDefinition;
use crate::poll::{Poll, PollItem, NO_USER_TOOLTIP};
use crate::session::UserInput;

pub const VIEW_VOTES_ICON: &str = "📢";
pub const VIEW_VOTES_TITLE: &str = "View Votes";
pub const SIGN_IN_LABEL: &str = "Sign in";

/// Builds the element tree for every definition and returns the poll registry.
pub fn setup_polls(document: &mut Document, definitions: &[PollDefinition]) -> Vec<Poll> {
    let polls: Vec<Poll> = definitions
        .iter()
        .enumerate()
        .map(|(poll_index, definition)| setup_poll(document, poll_index, definition))
        .collect();
    info!("set up {} polls", polls.len());
    polls
}

fn setup_poll(document: &mut Document, poll_index: usize, definition: &PollDefinition) -> Poll {
    let root = document.root();
    let poll_element = document.create_element("poll", root, "", "");

    let header = document.create_element("header", poll_element, "", "");
    let header_content = document.create_element("p", header, "", "");
    document.get_mut(header_content).text = definition.title.clone();

    let view_votes_button = document.create_element("button", header, "view-votes-button", "");
    let button = document.get_mut(view_votes_button);
    button.text = VIEW_VOTES_ICON.to_string();
    button.title = VIEW_VOTES_TITLE.to_string();
    button.action = Some(Action::ToggleVotes { poll: poll_index });

    let list = document.create_element("ul", poll_element, "", "");
    let items = definition
        .item_values()
        .into_iter()
        .enumerate()
        .map(|(item_index, value)| {
            let list_item = document.create_element("li", list, "", "");
            let element = document.get_mut(list_item);
            element.tab_index = 0;
            element.title = NO_USER_TOOLTIP.to_string();
            element.action = Some(Action::ActivateItem {
                poll: poll_index,
                item: item_index,
            });

            document.create_element("div", list_item, "checkbox", "");
            let label = document.create_element("p", list_item, "", "");
            document.get_mut(label).text = value.to_string();
            document.create_element("div", list_item, "percentage", "");

            let mut item = PollItem::new(poll_index, value, list_item);
            item.set_percentage(0.0);
            render_item(document, &item);
            item
        })
        .collect();

    let panel = document.create_element(
        "div",
        poll_element,
        ["view-votes-panel", "disabled"],
        "",
    );
    let close_button = document.create_element("button", panel, "view-votes-close-button", "");
    let close = document.get_mut(close_button);
    close.text = "×".to_string();
    close.title = "Close".to_string();
    close.tab_index = -1;
    close.action = Some(Action::ToggleVotes { poll: poll_index });

    debug!("poll #{} '{}' built", poll_index, definition.title);
    Poll::new(definition.title.clone(), items, poll_element)
}

/// Builds the name field and sign-in button.
pub fn setup_user_signing_in(document: &mut Document) -> UserInput {
    let root = document.root();
    let section = document.create_element("section", root, "", "user");

    let input = document.create_element("input", section, "", "user-input");
    document.get_mut(input).action = Some(Action::EditName);

    let button = document.create_element("button", section, "", "sign-in");
    let sign_in = document.get_mut(button);
    sign_in.text = SIGN_IN_LABEL.to_string();
    sign_in.action = Some(Action::SignIn);

    UserInput::new(input, button)
}

/// Writes an item's state into its elements: check-mark, tooltip and the
/// percentage readout/indicator.
pub fn render_item(document: &mut Document, item: &PollItem) {
    let element = item.element;
    let children: Vec<ElementId> = document.get(element).children().to_vec();
    for child in children {
        if document.get(child).has_class("checkbox") {
            document.set_class(child, "checked", item.checked);
        } else if document.get(child).has_class("percentage") {
            document.get_mut(child).text = format!("{}%", item.percentage());
        }
    }
    document.set_property(element, "--percentage", item.percentage());
    document.get_mut(element).title = item.tooltip();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build() -> (Document, Vec<Poll>) {
        let mut document = Document::new();
        let polls = setup_polls(
            &mut document,
            &[
                PollDefinition::new("Colour", "Red|Blue"),
                PollDefinition::new("Pets", "Cat|Dog|Fish"),
            ],
        );
        (document, polls)
    }

    #[test]
    fn builds_one_item_per_value() {
        let (document, polls) = build();
        assert_eq!(polls.len(), 2);
        assert_eq!(polls[0].title, "Colour");
        assert_eq!(polls[1].items.len(), 3);
        assert_eq!(polls[1].items[2].value, "Fish");
        assert!(polls.iter().all(|p| p.participated_users.is_empty()));
        assert!(polls[1].items.iter().all(|i| i.poll_index == 1));

        let item = document.get(polls[0].items[1].element);
        assert_eq!(item.tag, "li");
        assert_eq!(item.tab_index, 0);
        assert_eq!(item.title, "Selected by no user.");
        assert_eq!(item.property("--percentage"), Some("0"));
        assert_eq!(item.action, Some(Action::ActivateItem { poll: 0, item: 1 }));
    }

    #[test]
    fn item_children_hold_checkbox_label_and_percentage() {
        let (document, polls) = build();
        let li = polls[0].items[0].element;
        let children = document.get(li).children();
        assert_eq!(children.len(), 3);
        assert!(document.get(children[0]).has_class("checkbox"));
        assert!(!document.get(children[0]).has_class("checked"));
        assert_eq!(document.get(children[1]).text, "Red");
        assert_eq!(document.get(children[2]).text, "0%");
    }

    #[test]
    fn votes_panel_starts_hidden() {
        let (document, polls) = build();
        let poll = polls[0].element;
        let panel = document.query_class(poll, "view-votes-panel").unwrap();
        assert!(document.get(panel).has_class("disabled"));
        assert!(!document.get(poll).has_class("disabled"));

        let close = document.query_class(poll, "view-votes-close-button").unwrap();
        assert_eq!(document.get(close).tab_index, -1);

        let view = document.query_class(poll, "view-votes-button").unwrap();
        assert_eq!(document.get(view).tab_index, 0);
        assert_eq!(document.get(view).title, "View Votes");
        assert_eq!(document.get(view).action, Some(Action::ToggleVotes { poll: 0 }));
    }

    #[test]
    fn user_section_has_input_and_button() {
        let mut document = Document::new();
        let input = setup_user_signing_in(&mut document);
        assert_eq!(document.find_by_id("user-input"), Some(input.element));
        assert_eq!(document.find_by_id("sign-in"), Some(input.button));
        assert_eq!(document.get(input.button).action, Some(Action::SignIn));
    }

    #[test]
    fn render_item_reflects_item_state() {
        let (mut document, mut polls) = build();
        let item = &mut polls[0].items[0];
        item.checked_by.push("alice".into());
        item.update_checked_visual(true, 2);
        render_item(&mut document, item);

        let li = document.get(item.element);
        assert_eq!(li.title, "Selected by 1 user.");
        assert_eq!(li.property("--percentage"), Some("50"));
        let checkbox = document.get(li.children()[0]);
        assert!(checkbox.has_class("checked"));
        assert_eq!(document.get(li.children()[2]).text, "50%");
    }
}
