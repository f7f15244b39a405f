use crate::document::ElementId;

pub const NO_USER_TOOLTIP: &str = "Selected by no user.";

/// A user holding a selection in one poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub name: String,
    pub selected_item_index: usize,
}

impl Participant {
    pub fn new(name: impl Into<String>, selected_item_index: usize) -> Self {
        Self {
            name: name.into(),
            selected_item_index,
        }
    }
}

/// One selectable option of a poll
#[derive(Debug, Clone)]
pub struct PollItem {
    pub poll_index: usize,
    pub value: String,
    pub checked_by: Vec<String>,
    pub checked: bool,
    pub element: ElementId,
    percentage: u8,
}

impl PollItem {
    pub fn new(poll_index: usize, value: impl Into<String>, element: ElementId) -> Self {
        Self {
            poll_index,
            value: value.into(),
            checked_by: Vec::new(),
            checked: false,
            element,
            percentage: 0,
        }
    }

    pub fn percentage(&self) -> u8 {
        self.percentage
    }

    /// Stores `raw` clamped to [0, 100]; NaN counts as 0.
    pub fn set_percentage(&mut self, raw: f64) {
        self.percentage = clamp_percentage(raw);
    }

    pub fn is_checked_by(&self, name: &str) -> bool {
        self.checked_by.iter().any(|user| user == name)
    }

    pub fn tooltip(&self) -> String {
        match self.checked_by.len() {
            0 => NO_USER_TOOLTIP.to_string(),
            1 => "Selected by 1 user.".to_string(),
            n => format!("Selected by {} users.", n),
        }
    }

    /// Applies the check-mark state and recomputes the share of
    /// `participant_count` voters holding this item.
    pub fn update_checked_visual(&mut self, checked: bool, participant_count: usize) {
        self.checked = checked;
        self.set_percentage(share_of(self.checked_by.len(), participant_count));
    }
}

pub fn clamp_percentage(raw: f64) -> u8 {
    if raw.is_nan() || raw < 0.0 {
        0
    } else if raw > 100.0 {
        100
    } else {
        raw.round() as u8
    }
}

/// `count / total * 100`, or 0 when there is nobody to divide by
pub fn share_of(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// A titled group of mutually exclusive items
#[derive(Debug, Clone)]
pub struct Poll {
    pub title: String,
    pub items: Vec<PollItem>,
    pub participated_users: Vec<Participant>,
    pub element: ElementId,
}

impl Poll {
    pub fn new(title: impl Into<String>, items: Vec<PollItem>, element: ElementId) -> Self {
        Self {
            title: title.into(),
            items,
            participated_users: Vec::new(),
            element,
        }
    }

    pub fn participant(&self, name: &str) -> Option<&Participant> {
        self.participated_users.iter().find(|user| user.name == name)
    }

    pub fn participant_mut(&mut self, name: &str) -> Option<&mut Participant> {
        self.participated_users
            .iter_mut()
            .find(|user| user.name == name)
    }

    /// Value of the item the participant currently holds
    pub fn selected_value(&self, participant: &Participant) -> Option<&str> {
        self.items
            .get(participant.selected_item_index)
            .map(|item| item.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    fn item() -> PollItem {
        PollItem::new(0, "Red", Document::new().root())
    }

    #[test]
    fn clamp_law() {
        assert_eq!(clamp_percentage(f64::NAN), 0);
        assert_eq!(clamp_percentage(-0.5), 0);
        assert_eq!(clamp_percentage(-120.0), 0);
        assert_eq!(clamp_percentage(100.1), 100);
        assert_eq!(clamp_percentage(f64::INFINITY), 100);
        assert_eq!(clamp_percentage(33.333), 33);
        assert_eq!(clamp_percentage(66.666), 67);
        assert_eq!(clamp_percentage(12.5), 13);
        assert_eq!(clamp_percentage(0.0), 0);
        assert_eq!(clamp_percentage(100.0), 100);
    }

    #[test]
    fn set_percentage_stores_clamped_value() {
        let mut item = item();
        item.set_percentage(250.0);
        assert_eq!(item.percentage(), 100);
        item.set_percentage(f64::NAN);
        assert_eq!(item.percentage(), 0);
    }

    #[test]
    fn share_of_zero_participants_is_zero() {
        assert_eq!(share_of(0, 0), 0.0);
        assert_eq!(share_of(3, 0), 0.0);
        assert_eq!(share_of(1, 4), 25.0);
    }

    #[test]
    fn tooltip_pluralizes_only_above_one() {
        let mut item = item();
        assert_eq!(item.tooltip(), "Selected by no user.");
        item.checked_by.push("alice".into());
        assert_eq!(item.tooltip(), "Selected by 1 user.");
        item.checked_by.push("bob".into());
        assert_eq!(item.tooltip(), "Selected by 2 users.");
    }

    #[test]
    fn update_checked_visual_recomputes_percentage() {
        let mut item = item();
        item.checked_by.push("alice".into());
        item.update_checked_visual(true, 3);
        assert!(item.checked);
        assert_eq!(item.percentage(), 33);

        item.checked_by.clear();
        item.update_checked_visual(false, 0);
        assert!(!item.checked);
        assert_eq!(item.percentage(), 0);
    }

    #[test]
    fn selected_value_resolves_by_index() {
        let root = Document::new().root();
        let mut poll = Poll::new(
            "Colour",
            vec![PollItem::new(0, "Red", root), PollItem::new(0, "Blue", root)],
            root,
        );
        poll.participated_users.push(Participant::new("alice", 1));
        let alice = poll.participant("alice").cloned().unwrap();
        assert_eq!(poll.selected_value(&alice), Some("Blue"));
        assert!(poll.participant("bob").is_none());
    }
}
