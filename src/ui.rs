//! UI rendering for the terminal user interface.
//!
//! `layout` computes where everything goes; `draw` renders into those areas
//! and hands the layout back so the event loop can hit-test mouse clicks
//! against exactly what was drawn.

mod cover;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock, time::Duration};

use crate::app::{App, Page, PlaybackState};
use crate::audio::PlaybackInfo;
use crate::config::{Settings, UiSettings};
use crate::grid::Grid;
use crate::library::Track;
use crate::transport::{format_mmss, progress_ratio, volume_fill};

pub use cover::CoverView;

const TILE_BG: Color = Color::Rgb(45, 49, 48);
const ACCENT: Color = Color::Cyan;
const TRANSPORT_COVER_WIDTH: u16 = 6;
const VOLUME_WIDTH: u16 = 12;
const VOLUME_POPUP_WIDTH: u16 = 7;
const VOLUME_POPUP_HEIGHT: u16 = 12;
/// Borders plus the title and artist lines.
const MIN_TILE_HEIGHT: u16 = 4;
const TIME_LABEL_WIDTH: u16 = 6;

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("arrows/hjkl", "move");
    map.insert("gg/G", "first/last");
    map.insert("enter/click", "play");
    map.insert("space/p", "play/pause");
    map.insert("s", "stop");
    // H/L is filled from config.
    map.insert("+/-", "volume");
    map.insert("v", "volume slider");
    map.insert("f", "favorite");
    map.insert("1-3/tab", "pages");
    map.insert("o", "open folder");
    map.insert("K", "metadata");
    map.insert("q", "quit");
    map
});

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    let order = [
        "arrows/hjkl",
        "enter/click",
        "space/p",
        "s",
        "H/L",
        "+/-",
        "v",
        "f",
        "1-3/tab",
        "o",
        "gg/G",
        "K",
        "q",
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

/// Where each interactive piece of the screen ended up.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameLayout {
    pub tabs: Vec<(Page, Rect)>,
    pub header: Rect,
    /// The bordered grid block; tiles live in `grid_area`.
    pub grid_block: Rect,
    pub grid_area: Rect,
    pub grid: Grid,
    pub first_row: usize,
    /// Library indices in the order their tiles are laid out.
    pub display: Vec<usize>,
    pub transport: Rect,
    pub transport_cover: Rect,
    pub transport_info: Rect,
    pub seek_bar: Rect,
    pub volume_button: Rect,
    pub volume_popup: Option<Rect>,
    /// Inside of the popup; row 0 is full volume.
    pub volume_slider: Option<Rect>,
    pub footer: Rect,
}

impl FrameLayout {
    /// Library index of the tile under `(x, y)`.
    pub fn track_at(&self, x: u16, y: u16) -> Option<usize> {
        let pos = self.grid.tile_at(self.grid_area, self.first_row, x, y)?;
        self.display.get(pos).copied()
    }

    pub fn page_at(&self, x: u16, y: u16) -> Option<Page> {
        self.tabs
            .iter()
            .find(|(_, r)| contains(*r, x, y))
            .map(|(p, _)| *p)
    }
}

pub fn contains(r: Rect, x: u16, y: u16) -> bool {
    x >= r.x && x < r.right() && y >= r.y && y < r.bottom()
}

fn tab_label(n: usize, page: Page) -> String {
    format!(" {}:{} ", n + 1, page.title())
}

/// Compute the screen layout for `app` in `area`.
pub fn layout(area: Rect, app: &App, ui: &UiSettings) -> FrameLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(3),
        ])
        .split(area);

    // Tabs sit on the single inner row of the header.
    let header_inner = Block::bordered().inner(chunks[0]);
    let mut tabs = Vec::with_capacity(Page::ALL.len());
    let mut x = header_inner.x;
    for (n, page) in Page::ALL.iter().enumerate() {
        let width = (tab_label(n, *page).chars().count() as u16)
            .min(header_inner.right().saturating_sub(x));
        tabs.push((*page, Rect::new(x, header_inner.y, width, header_inner.height.min(1))));
        x = x.saturating_add(width);
    }

    let grid_block = chunks[1];
    let grid_area = Block::bordered().inner(grid_block);
    let display = app.display_indices();
    // Short terminals get shorter tiles rather than none.
    let tile_height = ui.tile_height.min(grid_area.height).max(MIN_TILE_HEIGHT);
    let grid = Grid::new(grid_area.width, display.len(), ui.tile_width, tile_height);
    let selected_pos = display.iter().position(|&i| i == app.selected).unwrap_or(0);
    let first_row = grid.first_visible_row(
        grid.cell(selected_pos).0,
        grid.visible_rows(grid_area.height),
    );

    let transport = Block::bordered().inner(chunks[2]);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(TRANSPORT_COVER_WIDTH),
            Constraint::Min(10),
            Constraint::Length(VOLUME_WIDTH),
        ])
        .split(transport);
    let transport_cover = columns[0];
    let transport_info = Rect {
        x: columns[1].x + 1,
        width: columns[1].width.saturating_sub(2),
        ..columns[1]
    };
    let volume_button = columns[2];

    let seek_bar = if transport_info.height >= 2 {
        Rect::new(
            transport_info.x + TIME_LABEL_WIDTH,
            transport_info.y + 1,
            transport_info.width.saturating_sub(TIME_LABEL_WIDTH * 2),
            1,
        )
    } else {
        Rect::default()
    };

    let (volume_popup, volume_slider) = if app.volume_popup {
        let room = chunks[2].y.saturating_sub(area.y);
        let height = VOLUME_POPUP_HEIGHT.min(room);
        if height >= 3 {
            let width = VOLUME_POPUP_WIDTH.min(area.width);
            let x = volume_button.x + volume_button.width.saturating_sub(width) / 2;
            let popup = Rect::new(x, chunks[2].y - height, width, height);
            (Some(popup), Some(Block::bordered().inner(popup)))
        } else {
            (None, None)
        }
    } else {
        (None, None)
    };

    FrameLayout {
        tabs,
        header: chunks[0],
        grid_block,
        grid_area,
        grid,
        first_row,
        display,
        transport: chunks[2],
        transport_cover,
        transport_info,
        seek_bar,
        volume_button,
        volume_popup,
        volume_slider,
        footer: chunks[3],
    }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10).min(r.width);
    height = height.min(r.height.saturating_sub(2)).max(3).min(r.height);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Format an optional duration, rounding up partial seconds, showing total seconds.
fn format_duration_mmss_ceil(d: Option<Duration>) -> String {
    let Some(d) = d else {
        return "-".to_string();
    };

    let mut total_secs = d.as_secs();
    if d.subsec_nanos() > 0 {
        total_secs = total_secs.saturating_add(1);
    }

    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    format!("{}:{:02} ({}s)", minutes, seconds, total_secs)
}

/// Cut `text` to `width` characters, ending in `…` when shortened.
fn fit_text(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(width - 1).collect();
    out.push('…');
    out
}

/// Render the entire UI into `frame` and return the layout that was drawn.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    info: &PlaybackInfo,
    settings: &Settings,
) -> FrameLayout {
    let lay = layout(frame.area(), app, &settings.ui);

    draw_header(frame, app, &lay, &settings.ui);
    draw_grid(frame, app, &lay);
    draw_transport(frame, app, info, &lay);

    let footer = Paragraph::new(controls_text(settings.controls.scrub_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, lay.footer);

    if app.metadata_window {
        draw_metadata(frame, app, lay.grid_block);
    }
    if let (Some(popup), Some(slider)) = (lay.volume_popup, lay.volume_slider) {
        draw_volume_popup(frame, app.volume, popup, slider);
    }
    if let Some(text) = &app.folder_prompt {
        let area = frame.area();
        draw_folder_prompt(frame, text, area);
    }

    lay
}

fn draw_header(frame: &mut Frame, app: &App, lay: &FrameLayout, ui: &UiSettings) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(ui.header_text.as_str())
        .title_alignment(Alignment::Center);
    frame.render_widget(block, lay.header);

    for (n, (page, rect)) in lay.tabs.iter().enumerate() {
        let style = if *page == app.page {
            Style::default().fg(Color::Black).bg(ACCENT).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        frame.render_widget(Paragraph::new(tab_label(n, *page)).style(style), *rect);
    }

    if let (Some(last), Some(dir)) = (lay.tabs.last(), &app.current_dir) {
        let inner = Block::bordered().inner(lay.header);
        let x = last.1.right() + 2;
        if x < inner.right() {
            let area = Rect::new(x, inner.y, inner.right() - x, inner.height.min(1));
            let text = fit_text(&dir.display().to_string(), usize::from(area.width));
            frame.render_widget(
                Paragraph::new(text)
                    .alignment(Alignment::Right)
                    .fg(Color::DarkGray),
                area,
            );
        }
    }
}

fn empty_page_text(page: Page) -> &'static str {
    match page {
        Page::Library => "No audio files here. Press o to open a folder.",
        Page::Favorites => "No favorites yet. Press f on a tile to add one.",
        Page::Recents => "Nothing played yet.",
    }
}

fn draw_grid(frame: &mut Frame, app: &App, lay: &FrameLayout) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ({}) ", app.page.title(), lay.display.len()));
    frame.render_widget(block, lay.grid_block);

    if lay.display.is_empty() {
        let area = lay.grid_area;
        let middle = Rect::new(area.x, area.y + area.height / 2, area.width, area.height.min(1));
        frame.render_widget(
            Paragraph::new(empty_page_text(app.page))
                .alignment(Alignment::Center)
                .fg(Color::DarkGray),
            middle,
        );
        return;
    }

    for (pos, &idx) in lay.display.iter().enumerate() {
        let Some(rect) = lay.grid.tile_rect(lay.grid_area, lay.first_row, pos) else {
            continue;
        };
        draw_tile(
            frame,
            rect,
            &app.tracks[idx],
            TileMarks {
                selected: idx == app.selected,
                playing: app.now_playing == Some(idx),
                favorite: app.is_favorite(idx),
            },
        );
    }
}

#[derive(Copy, Clone)]
struct TileMarks {
    selected: bool,
    playing: bool,
    favorite: bool,
}

fn draw_tile(frame: &mut Frame, rect: Rect, track: &Track, marks: TileMarks) {
    let border = if marks.selected {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else if marks.playing {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let mut badges = String::new();
    if marks.playing {
        badges.push_str(" ▶");
    }
    if marks.favorite {
        badges.push_str(" ♥");
    }
    let mut block = Block::bordered()
        .border_style(border)
        .style(Style::default().bg(TILE_BG));
    if !badges.is_empty() {
        badges.push(' ');
        block = block.title(Line::from(badges).right_aligned());
    }

    let inner = block.inner(rect);
    frame.render_widget(block, rect);
    if inner.is_empty() {
        return;
    }

    let text_rows = inner.height.min(2);
    let cover_area = Rect {
        height: inner.height - text_rows,
        ..inner
    };
    frame.render_widget(CoverView::new(track.cover.as_deref()), cover_area);

    let width = usize::from(inner.width);
    let lines = vec![
        Line::from(fit_text(&track.title, width)).white().bold(),
        Line::from(fit_text(&track.artist, width)).gray(),
    ];
    let text_area = Rect {
        y: cover_area.bottom(),
        height: text_rows,
        ..inner
    };
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        text_area,
    );
}

fn playback_symbol(state: PlaybackState) -> &'static str {
    match state {
        PlaybackState::Playing => "▶",
        PlaybackState::Paused => "⏸",
        PlaybackState::Stopped => "■",
    }
}

fn draw_transport(frame: &mut Frame, app: &App, info: &PlaybackInfo, lay: &FrameLayout) {
    frame.render_widget(Block::bordered().title(" now playing "), lay.transport);

    let track = app.now_playing_track();
    frame.render_widget(
        CoverView::new(track.and_then(|t| t.cover.as_deref())),
        lay.transport_cover,
    );

    let area = lay.transport_info;
    if area.is_empty() {
        return;
    }

    // Row 0: state and song.
    let song = match (track, &info.track) {
        (Some(t), _) => format!("{} — {}", t.title, t.artist),
        (None, Some(path)) => path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        (None, None) => "Nothing playing".to_string(),
    };
    let (symbol, song) = if info.finished {
        (playback_symbol(PlaybackState::Stopped), format!("{song} (ended)"))
    } else {
        (playback_symbol(app.playback), song)
    };
    let row0 = Line::from(vec![
        Span::styled(format!("{symbol} "), Style::default().fg(ACCENT).bold()),
        Span::raw(fit_text(&song, usize::from(area.width.saturating_sub(2)))),
    ]);
    frame.render_widget(Paragraph::new(row0), Rect { height: 1, ..area });

    // Row 1: elapsed, seek bar, total.
    if area.height >= 2 {
        let total = info.duration.or(track.and_then(|t| t.duration));
        let y = area.y + 1;
        frame.render_widget(
            Paragraph::new(format_mmss(info.elapsed)),
            Rect::new(area.x, y, TIME_LABEL_WIDTH.min(area.width), 1),
        );
        let total_text = total.map(format_mmss).unwrap_or_else(|| "--:--".to_string());
        let right = lay.seek_bar.right();
        if right < area.right() {
            frame.render_widget(
                Paragraph::new(total_text).alignment(Alignment::Right),
                Rect::new(right, y, area.right() - right, 1),
            );
        }
        let loaded = info.track.is_some();
        frame.render_widget(
            Paragraph::new(seek_bar_line(
                progress_ratio(info.elapsed, total),
                lay.seek_bar.width,
                loaded,
            )),
            lay.seek_bar,
        );
    }

    // Row 2: errors win over status messages.
    if area.height >= 3 {
        let row = Rect::new(area.x, area.y + 2, area.width, 1);
        let width = usize::from(area.width);
        let line = match (&app.error, &app.status) {
            (Some(e), _) => Line::from(fit_text(&format!("⚠ {e}"), width)).red(),
            (None, Some(s)) => Line::from(fit_text(s, width)).dark_gray(),
            (None, None) => Line::default(),
        };
        frame.render_widget(Paragraph::new(line), row);
    }

    draw_volume_button(frame, app.volume, app.volume_popup, lay.volume_button);
}

/// One row of seek bar cells: filled up to the knob, empty after it.
fn seek_bar_line(ratio: f64, width: u16, loaded: bool) -> Line<'static> {
    if width == 0 {
        return Line::default();
    }
    let knob = (ratio * f64::from(width - 1)).round() as u16;
    let mut spans = Vec::with_capacity(3);
    spans.push(Span::styled(
        "━".repeat(usize::from(knob)),
        Style::default().fg(ACCENT),
    ));
    if loaded {
        spans.push(Span::styled("●", Style::default().fg(Color::White)));
    } else {
        spans.push(Span::styled("─", Style::default().fg(Color::DarkGray)));
    }
    spans.push(Span::styled(
        "─".repeat(usize::from(width - 1 - knob)),
        Style::default().fg(Color::DarkGray),
    ));
    Line::from(spans)
}

fn draw_volume_button(frame: &mut Frame, volume: u8, open: bool, area: Rect) {
    if area.is_empty() {
        return;
    }
    let label_style = if open {
        Style::default().fg(ACCENT).bold()
    } else {
        Style::default()
    };
    let bar_width = usize::from(area.width.saturating_sub(2));
    let filled = bar_width * usize::from(volume) / 100;
    let lines = vec![
        Line::from(Span::styled(format!("vol {volume:>3}%"), label_style)),
        Line::from(vec![
            Span::styled("▮".repeat(filled), Style::default().fg(ACCENT)),
            Span::styled("▯".repeat(bar_width - filled), Style::default().fg(Color::DarkGray)),
        ]),
        Line::from("[v] slider").dark_gray(),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn draw_volume_popup(frame: &mut Frame, volume: u8, popup: Rect, slider: Rect) {
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Block::bordered()
            .border_style(Style::default().fg(ACCENT))
            .title(Line::from(format!("{volume}")).centered()),
        popup,
    );

    let fill = volume_fill(volume, slider.height);
    let empty_rows = slider.height - fill;
    let width = usize::from(slider.width);
    let lines: Vec<Line> = (0..slider.height)
        .map(|row| {
            if row < empty_rows {
                Line::from("░".repeat(width)).dark_gray()
            } else {
                Line::from("█".repeat(width)).fg(ACCENT)
            }
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), slider);
}

fn draw_metadata(frame: &mut Frame, app: &App, within: Rect) {
    let popup_area = centered_rect_sized(72, 10, within);
    frame.render_widget(Clear, popup_area);

    let meta = match app.selected_track() {
        Some(track) => {
            let cover = match &track.cover {
                Some(art) => format!("embedded ({}x{} thumbnail)", art.width(), art.height()),
                None => "none".to_string(),
            };
            format!(
                "Title: {}\nArtist: {}\nAlbum: {}\nDuration: {}\nCover: {}\nPath: {}",
                track.title,
                track.artist,
                track.album.as_deref().unwrap_or("-"),
                format_duration_mmss_ceil(track.duration),
                cover,
                track.path.display()
            )
        }
        None => "No track selected".to_string(),
    };
    let meta_paragraph = Paragraph::new(meta)
        .block(
            Block::default()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .borders(Borders::ALL)
                .title(" metadata (K closes) "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(meta_paragraph, popup_area);
}

fn draw_folder_prompt(frame: &mut Frame, text: &str, within: Rect) {
    let area = centered_rect_sized(64, 3, within);
    frame.render_widget(Clear, area);
    let width = usize::from(area.width.saturating_sub(3));
    // Keep the end of long paths visible.
    let count = text.chars().count();
    let shown: String = text.chars().skip(count.saturating_sub(width)).collect();
    let prompt = Paragraph::new(Line::from(vec![
        Span::raw(shown),
        Span::styled("█", Style::default().fg(ACCENT)),
    ]))
    .block(
        Block::bordered()
            .border_style(Style::default().fg(ACCENT))
            .title(" open folder (enter opens, esc cancels) "),
    );
    frame.render_widget(prompt, area);
}

#[cfg(test)]
mod tests;
