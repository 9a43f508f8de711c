use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::render::render as render_item;
use crate::ui::truncate;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Jobs ");
    let snapshot = &app.snapshot;

    if snapshot.index_len.is_none() {
        let text = if app.error.is_some() {
            "Could not load jobs"
        } else {
            "Loading..."
        };
        let waiting = Paragraph::new(text)
            .block(block)
            .style(Style::default().fg(Color::Yellow));
        frame.render_widget(waiting, area);
        return;
    }

    if snapshot.items.is_empty() && snapshot.is_exhausted() {
        let empty = Paragraph::new("No jobs found")
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, area);
        return;
    }

    let width = area.width.saturating_sub(2).max(10) as usize;

    let mut items: Vec<ListItem> = snapshot
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let record = render_item(item);
            let is_selected = i == app.selected;

            let mut title_style = if record.link.is_some() {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::UNDERLINED)
            } else {
                Style::default()
            };
            if is_selected {
                title_style = title_style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
            }

            ListItem::new(vec![
                Line::from(Span::styled(truncate(&record.title, width), title_style)),
                Line::from(Span::styled(
                    truncate(&record.metadata(), width),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();

    if !snapshot.items.is_empty() && snapshot.has_more() {
        let label = if snapshot.is_loading() {
            "Loading..."
        } else {
            "See more jobs (n)"
        };
        items.push(ListItem::new(Line::from(Span::styled(
            label,
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ))));
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default();
    if !snapshot.items.is_empty() {
        state.select(Some(app.selected));
    }

    frame.render_stateful_widget(list, area, &mut state);
}
