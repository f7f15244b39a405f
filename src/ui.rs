use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::{App, Hitbox},
    document::{Document, ElementId},
    state::AppState,
    util::{filled_cells, fit_width, tail_width},
};

const HORIZONTAL_MARGIN: u16 = 1;
const FIELD_WIDTH: u16 = 24;
const BAR_WIDTH: usize = 10;
const NAME_LABEL: &str = "Name: ";
const HELP: &str = "tab/↑↓ move · enter/space vote or press · click works too · esc quit";

pub fn draw(app: &mut App, f: &mut Frame) {
    let area = f.area();
    render(app, area, f.buffer_mut());
}

/// Draws the whole document and records where each interactive element ended up.
pub fn render(app: &mut App, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .horizontal_margin(HORIZONTAL_MARGIN)
    .split(area);

    let heights: Vec<u16> = (0..app.state.polls.len())
        .map(|poll| poll_height(&app.state, poll))
        .collect();
    app.scroll = scroll_to_focus(app.scroll, app.focused_poll(), &heights, chunks[1].height);

    let mut painter = Painter {
        state: &app.state,
        focus: app.focus,
        hitboxes: Vec::new(),
    };
    painter.user_bar(chunks[0], buf);
    painter.polls(app.scroll, &heights, chunks[1], buf);
    painter.status(chunks[2], buf);
    Line::from(Span::styled(
        HELP,
        Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[3], buf);

    app.hitboxes = painter.hitboxes;
}

/// First poll to draw so that the focused one is on screen
fn scroll_to_focus(scroll: usize, focused: Option<usize>, heights: &[u16], available: u16) -> usize {
    let mut scroll = scroll.min(heights.len().saturating_sub(1));
    if let Some(focused) = focused {
        if focused < scroll {
            scroll = focused;
        }
        while scroll < focused
            && heights[scroll..=focused].iter().map(|h| *h as u32).sum::<u32>() > available as u32
        {
            scroll += 1;
        }
    }
    scroll
}

fn panel_of(document: &Document, poll_element: ElementId) -> Option<ElementId> {
    document.query_class(poll_element, "view-votes-panel")
}

fn is_open(document: &Document, panel: Option<ElementId>) -> bool {
    panel.is_some_and(|panel| !document.get(panel).has_class("disabled"))
}

/// Panel children drawn as rows (everything but the close button)
fn panel_rows(document: &Document, panel: ElementId) -> Vec<ElementId> {
    document
        .get(panel)
        .children()
        .iter()
        .copied()
        .filter(|child| !document.get(*child).has_class("view-votes-close-button"))
        .collect()
}

fn poll_height(state: &AppState, poll: usize) -> u16 {
    let document = &state.document;
    let panel = panel_of(document, state.polls[poll].element);
    let body = match panel {
        Some(panel) if is_open(document, Some(panel)) => panel_rows(document, panel).len().max(1),
        _ => state.polls[poll].items.len(),
    };
    // borders + header + body
    (body as u16).saturating_add(3)
}

fn child_by_tag(document: &Document, parent: ElementId, tag: &str) -> Option<ElementId> {
    document
        .get(parent)
        .children()
        .iter()
        .copied()
        .find(|child| document.get(*child).tag == tag)
}

struct Painter<'a> {
    state: &'a AppState,
    focus: Option<ElementId>,
    hitboxes: Vec<Hitbox>,
}

impl Painter<'_> {
    fn styled(&self, element: ElementId, style: Style) -> Style {
        if self.focus == Some(element) {
            style.add_modifier(Modifier::REVERSED)
        } else {
            style
        }
    }

    fn hit(&mut self, area: Rect, bounds: Rect, element: ElementId) {
        let area = area.intersection(bounds);
        if area.area() > 0 {
            self.hitboxes.push(Hitbox { area, element });
        }
    }

    fn user_bar(&mut self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Who are you? ");
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let state = self.state;
        let document = &state.document;
        let input = state.user_input.element;
        let button = state.user_input.button;
        let button_text = format!("[ {} ]", document.get(button).text);

        let label_width = NAME_LABEL.width() as u16;
        let field_width = FIELD_WIDTH.min(
            inner
                .width
                .saturating_sub(label_width + button_text.width() as u16 + 1),
        );
        let focused = self.focus == Some(input);
        let shown = tail_width(
            &document.get(input).text,
            field_width.saturating_sub(1) as usize,
        );
        let cursor = if focused { "▏" } else { " " };
        let padding = " ".repeat((field_width as usize).saturating_sub(shown.width() + 1));

        let mut field_style = Style::default().add_modifier(Modifier::UNDERLINED);
        if document.get(input).has_class("invalid") {
            field_style = field_style.fg(Color::Red);
        }
        if focused {
            field_style = field_style.add_modifier(Modifier::BOLD);
        }

        let line = Line::from(vec![
            Span::raw(NAME_LABEL),
            Span::styled(format!("{shown}{cursor}{padding}"), field_style),
            Span::raw(" "),
            Span::styled(
                button_text.clone(),
                self.styled(button, Style::default().fg(Color::Cyan)),
            ),
        ]);
        line.render(inner, buf);

        let field = Rect::new(inner.x + label_width, inner.y, field_width, 1);
        let button_area = Rect::new(
            field.right() + 1,
            inner.y,
            button_text.width() as u16,
            1,
        );
        self.hit(field, inner, input);
        self.hit(button_area, inner, button);
    }

    fn polls(&mut self, scroll: usize, heights: &[u16], area: Rect, buf: &mut Buffer) {
        let mut y = area.y;
        for (poll, height) in heights.iter().enumerate().skip(scroll) {
            if y >= area.bottom() {
                break;
            }
            let rect = Rect::new(area.x, y, area.width, (*height).min(area.bottom() - y));
            self.poll(poll, rect, buf);
            y = y.saturating_add(*height);
        }
    }

    fn poll(&mut self, poll: usize, area: Rect, buf: &mut Buffer) {
        let state = self.state;
        let document = &state.document;
        let poll_element = state.polls[poll].element;
        let focused_here = self.focus.and_then(|id| state.poll_of(id)) == Some(poll);

        let border = if focused_here {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default().borders(Borders::ALL).border_style(border);
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let panel = panel_of(document, poll_element);
        let open = is_open(document, panel);

        // header: title on the left, view votes or close button on the right
        let header_row = Rect { height: 1, ..inner };
        let header = child_by_tag(document, poll_element, "header");
        let title = header
            .and_then(|header| child_by_tag(document, header, "p"))
            .map(|p| document.get(p).text.as_str())
            .unwrap_or_default();
        let button = if open {
            panel.and_then(|panel| document.query_class(panel, "view-votes-close-button"))
        } else {
            document.query_class(poll_element, "view-votes-button")
        };
        let button_text = button
            .map(|b| format!("[{}]", document.get(b).text))
            .unwrap_or_default();
        let button_width = button_text.width() as u16;

        Line::from(Span::styled(
            fit_width(title, inner.width.saturating_sub(button_width + 1) as usize),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .render(header_row, buf);
        if let Some(button) = button {
            let button_area = Rect::new(
                inner.right().saturating_sub(button_width),
                inner.y,
                button_width,
                1,
            );
            Line::from(Span::styled(
                button_text,
                self.styled(button, Style::default().fg(Color::Yellow)),
            ))
            .render(button_area.intersection(inner), buf);
            self.hit(button_area, inner, button);
        }

        let body = Rect {
            y: inner.y + 1,
            height: inner.height - 1,
            ..inner
        };
        match panel {
            Some(panel) if open => self.panel(panel, body, buf),
            _ => self.items(poll, body, buf),
        }
    }

    fn items(&mut self, poll: usize, area: Rect, buf: &mut Buffer) {
        let state = self.state;
        let document = &state.document;
        let label_width = (area.width as usize).saturating_sub(4 + 1 + BAR_WIDTH + 5);

        for (row, item) in state.polls[poll].items.iter().enumerate() {
            let y = area.y + row as u16;
            if y >= area.bottom() {
                break;
            }
            let element = document.get(item.element);
            let mut checkbox = "[ ]";
            let mut label = "";
            let mut percentage = "";
            for child in element.children() {
                let child = document.get(*child);
                if child.has_class("checkbox") {
                    checkbox = if child.has_class("checked") { "[x]" } else { "[ ]" };
                } else if child.has_class("percentage") {
                    percentage = child.text.as_str();
                } else if child.tag == "p" {
                    label = child.text.as_str();
                }
            }
            let value: u8 = element
                .property("--percentage")
                .and_then(|p| p.parse().ok())
                .unwrap_or(0);
            let filled = filled_cells(value, BAR_WIDTH);

            let label = fit_width(label, label_width);
            let gap = " ".repeat(label_width.saturating_sub(label.width()) + 1);
            let check_style = if checkbox == "[x]" {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let line = Line::from(vec![
                Span::styled(format!("{checkbox} "), check_style),
                Span::raw(label),
                Span::raw(gap),
                Span::styled("█".repeat(filled), Style::default().fg(Color::Magenta)),
                Span::styled(
                    "░".repeat(BAR_WIDTH - filled),
                    Style::default().add_modifier(Modifier::DIM),
                ),
                Span::raw(format!("{percentage:>5}")),
            ])
            .style(self.styled(item.element, Style::default()));

            let row_area = Rect { y, height: 1, ..area };
            line.render(row_area, buf);
            self.hit(row_area, area, item.element);
        }
    }

    fn panel(&mut self, panel: ElementId, area: Rect, buf: &mut Buffer) {
        let state = self.state;
        let document = &state.document;
        let rows = panel_rows(document, panel);

        for (row, element) in rows.into_iter().enumerate() {
            let y = area.y + row as u16;
            if y >= area.bottom() {
                break;
            }
            let row_area = Rect { y, height: 1, ..area };
            let container = document.get(element);

            if container.has_class("participant-empty") {
                Line::from(Span::styled(
                    container.text.clone(),
                    Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
                ))
                .render(row_area, buf);
                continue;
            }

            let mut spans = Vec::new();
            let mut avatar_area = None;
            let mut x = row_area.x;
            for child in container.children() {
                let child_element = document.get(*child);
                let span = if child_element.has_class("participant-image") {
                    let text = format!(" {} ", child_element.text);
                    avatar_area = Some((Rect::new(x, y, text.width() as u16, 1), *child));
                    Span::styled(
                        text,
                        self.styled(
                            *child,
                            Style::default().bg(Color::Magenta).fg(Color::Black),
                        ),
                    )
                } else if child_element.has_class("participant-name") {
                    Span::styled(
                        format!(" {}", child_element.text),
                        Style::default().add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(
                        format!("  {}", child_element.text),
                        Style::default().fg(Color::Cyan),
                    )
                };
                x = x.saturating_add(span.width() as u16);
                spans.push(span);
            }
            Line::from(spans).render(row_area, buf);
            if let Some((rect, avatar)) = avatar_area {
                self.hit(rect, row_area, avatar);
            }
        }
    }

    fn status(&mut self, area: Rect, buf: &mut Buffer) {
        let user = &self.state.current_user;
        let who = if user.is_empty() {
            Span::styled(
                "Not signed in: type a name and press Sign in",
                Style::default().fg(Color::Yellow),
            )
        } else {
            Span::styled(
                format!("Signed in as {user}"),
                Style::default().fg(Color::Green),
            )
        };
        Line::from(who).render(area, buf);

        let tooltip = self
            .focus
            .map(|id| self.state.document.get(id).title.clone())
            .unwrap_or_default();
        if !tooltip.is_empty() {
            Line::from(Span::styled(
                tooltip,
                Style::default().add_modifier(Modifier::ITALIC),
            ))
            .alignment(Alignment::Right)
            .render(area, buf);
        }
    }
}
