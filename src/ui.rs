//! UI rendering helpers for the terminal user interface.
//!
//! This module renders the single player screen using `ratatui`: header,
//! now-playing box, seek bar, track list and controls footer.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::App;
use crate::config::{ControlsSettings, UiSettings};
use crate::library::Catalog;
use crate::session::{PlaybackState, PlaybackView, TransportIcon, format_time};

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("j/k", "up/down");
    map.insert("gg/G", "top/bottom");
    map.insert("enter", "play selected song");
    map.insert("space/p", "play/pause");
    map.insert("h/l", "prev/next song");
    // H/L is filled dynamically from config.
    map.insert("s", "shuffle");
    map.insert("r", "repeat");
    map.insert("K", "track info");
    map.insert("q", "quit");
    map
});

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    let order = [
        "j/k", "h/l", "H/L", "enter", "space/p", "gg/G", "s", "r", "K", "q",
    ];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] seek -/+{}s", scrub_seconds))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Transport row: previous, play/pause glyph, next, shuffle and repeat.
fn transport_text(view: &PlaybackView) -> String {
    let play_pause = match view.icon {
        TransportIcon::Play => "▶",
        TransportIcon::Pause => "⏸",
    };
    let shuffle = if view.shuffle { "[shuffle]" } else { " shuffle " };
    let repeat = if view.repeat { "[repeat]" } else { " repeat " };
    format!("⏮  {}  ⏭    {}  {}", play_pause, shuffle, repeat)
}

fn state_label(state: PlaybackState) -> &'static str {
    match state {
        PlaybackState::Idle => "Stopped",
        PlaybackState::Preparing => "Loading",
        PlaybackState::Playing => "Playing",
        PlaybackState::Paused => "Paused",
    }
}

/// Window `[start, end)` of a list of `total` rows that keeps `selected`
/// centered in `height` rows, plus the selected row's offset in the window.
fn visible_window(total: usize, height: usize, selected: usize) -> (usize, usize, usize) {
    if total <= height || height == 0 {
        return (0, total, selected);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height, selected - start)
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn left_padding() -> Padding {
    Padding {
        left: 1,
        right: 0,
        top: 0,
        bottom: 0,
    }
}

/// Render the entire UI into the provided `frame`.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    catalog: &Catalog,
    view: &PlaybackView,
    state: PlaybackState,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" cadenza ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Now playing
    let mut lines: Vec<String> = Vec::new();
    if view.title.is_empty() {
        lines.push(state_label(state).to_string());
    } else {
        lines.push(format!("{}  ({})", view.title, state_label(state)));
        lines.push(view.artist.clone());
    }
    lines.push(transport_text(view));
    if let Some(err) = &view.error {
        lines.push(format!("Error: {}", err));
    }
    let now_playing = Paragraph::new(lines.join("\n"))
        .block(Block::bordered().padding(left_padding()).title(" now playing "))
        .wrap(Wrap { trim: true });
    frame.render_widget(now_playing, chunks[1]);

    // Seek bar
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .ratio(view.progress())
        .label(format!("{} / {}", view.elapsed_text, view.total_text));
    frame.render_widget(gauge, chunks[2]);

    // Track list
    {
        let total = app.titles.len();
        let (start, end, selected_in_window) =
            visible_window(total, chunks[3].height.saturating_sub(2) as usize, app.selected);

        let items: Vec<ListItem> = app.titles[start..end]
            .iter()
            .map(|t| ListItem::new(t.as_str()))
            .collect();

        let title = if total == 0 {
            " tracks (none found) ".to_string()
        } else {
            format!(" tracks ({}) ", total)
        };
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut list_state = ListState::default();
        if total > 0 {
            list_state.select(Some(selected_in_window));
        }
        frame.render_stateful_widget(list, chunks[3], &mut list_state);
    }

    // Overlay track info popup (keeps list visible under it)
    if app.info_window {
        let popup_area = centered_rect_sized(72, 8, chunks[3]);
        frame.render_widget(Clear, popup_area);

        let info = match catalog.get(app.selected) {
            Some(track) => format!(
                "Title: {}\nArtist: {}\nDuration: {}\nSource: {}",
                track.title,
                track.artist,
                format_time(track.duration_ms),
                track.source
            ),
            None => "No track selected".to_string(),
        };
        let info_paragraph = Paragraph::new(info)
            .block(
                Block::default()
                    .padding(left_padding())
                    .borders(Borders::ALL)
                    .title(" track info (K closes) "),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(info_paragraph, popup_area);
    }

    let footer = Paragraph::new(controls_text(controls_settings.scrub_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(left_padding()),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);
}
