use super::*;
use crate::library::Track;
use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};
use std::path::PathBuf;

fn t(name: &str) -> Track {
    Track {
        path: PathBuf::from(format!("/music/{name}.mp3")),
        title: name.into(),
        artist: "Artist".into(),
        album: None,
        duration: Some(Duration::from_secs(90)),
        cover: None,
    }
}

fn app_with(names: &[&str]) -> App {
    App::new(names.iter().map(|n| t(n)).collect())
}

fn screen() -> Rect {
    Rect::new(0, 0, 100, 40)
}

fn buffer_text(buf: &Buffer) -> String {
    let area = buf.area;
    let mut out = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            out.push_str(buf[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

#[test]
fn controls_text_includes_scrub_seconds() {
    let text = controls_text(7);
    assert!(text.contains("[H/L] seek -/+7s"));
    assert!(text.contains("[v] volume slider"));
    assert!(text.contains("[q] quit"));
}

#[test]
fn fit_text_shortens_with_ellipsis() {
    assert_eq!(fit_text("short", 10), "short");
    assert_eq!(fit_text("a long title", 6), "a lon…");
    assert_eq!(fit_text("abc", 0), "");
}

#[test]
fn tabs_are_hit_testable() {
    let app = app_with(&["a"]);
    let lay = layout(screen(), &app, &UiSettings::default());

    assert_eq!(lay.tabs.len(), 3);
    let (page, rect) = lay.tabs[1];
    assert_eq!(page, Page::Favorites);
    assert_eq!(lay.page_at(rect.x, rect.y), Some(Page::Favorites));
    assert_eq!(lay.page_at(0, 0), None);
}

#[test]
fn tiles_are_laid_out_inside_the_grid_block() {
    let app = app_with(&["a", "b", "c", "d", "e"]);
    let lay = layout(screen(), &app, &UiSettings::default());

    // 98 inner columns / 24 per tile
    assert_eq!(lay.grid.columns, 4);
    assert_eq!(lay.display, vec![0, 1, 2, 3, 4]);

    let rect = lay
        .grid
        .tile_rect(lay.grid_area, lay.first_row, 1)
        .unwrap();
    assert!(contains(lay.grid_block, rect.x, rect.y));
    assert_eq!(lay.track_at(rect.x + 1, rect.y + 1), Some(1));
}

#[test]
fn seek_bar_sits_between_time_labels() {
    let app = app_with(&[]);
    let lay = layout(screen(), &app, &UiSettings::default());

    assert!(lay.seek_bar.width > 0);
    assert!(contains(lay.transport_info, lay.seek_bar.x, lay.seek_bar.y));
    assert_eq!(lay.seek_bar.x, lay.transport_info.x + TIME_LABEL_WIDTH);
    assert!(!contains(lay.volume_button, lay.seek_bar.x, lay.seek_bar.y));
}

#[test]
fn volume_popup_opens_above_the_button() {
    let mut app = app_with(&[]);
    let closed = layout(screen(), &app, &UiSettings::default());
    assert!(closed.volume_popup.is_none());

    app.toggle_volume_popup();
    let lay = layout(screen(), &app, &UiSettings::default());
    let popup = lay.volume_popup.unwrap();
    let slider = lay.volume_slider.unwrap();
    assert_eq!(popup.bottom(), lay.transport.y);
    assert!(popup.x >= lay.volume_button.x);
    assert!(popup.right() <= lay.volume_button.right());
    assert_eq!(slider.height, VOLUME_POPUP_HEIGHT - 2);
}

#[test]
fn seek_bar_line_places_the_knob() {
    let line = seek_bar_line(0.5, 11, true);
    let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
    assert_eq!(text, "━━━━━●─────");

    let idle = seek_bar_line(0.0, 4, false);
    let text: String = idle.spans.iter().map(|s| s.content.as_ref()).collect();
    assert_eq!(text, "────");
}

#[test]
fn draw_shows_tiles_tabs_and_transport() {
    let mut app = app_with(&["alpha", "beta"]);
    app.set_tracks(app.tracks.clone(), PathBuf::from("/music"));
    let settings = Settings::default();
    let info = PlaybackInfo::default();

    let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
    let mut drawn = None;
    terminal
        .draw(|f| drawn = Some(draw(f, &app, &info, &settings)))
        .unwrap();

    let text = buffer_text(terminal.backend().buffer());
    assert!(text.contains("1:Library"));
    assert!(text.contains("alpha"));
    assert!(text.contains("beta"));
    assert!(text.contains("Nothing playing"));
    assert!(text.contains("2 tracks in /music"));
    assert_eq!(drawn.unwrap().display, vec![0, 1]);
}

#[test]
fn draw_shows_playback_errors() {
    let mut app = app_with(&["alpha"]);
    app.error = Some("failed to decode /music/x.mp3".into());
    let settings = Settings::default();

    let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
    terminal
        .draw(|f| {
            draw(f, &app, &PlaybackInfo::default(), &settings);
        })
        .unwrap();

    let text = buffer_text(terminal.backend().buffer());
    assert!(text.contains("failed to decode"));
}

#[test]
fn empty_favorites_page_explains_itself() {
    let mut app = app_with(&["alpha"]);
    app.set_page(Page::Favorites);
    let settings = Settings::default();

    let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
    terminal
        .draw(|f| {
            draw(f, &app, &PlaybackInfo::default(), &settings);
        })
        .unwrap();

    let text = buffer_text(terminal.backend().buffer());
    assert!(text.contains("No favorites yet"));
}

#[test]
fn finished_track_is_marked_as_ended() {
    let mut app = app_with(&["alpha"]);
    let info = PlaybackInfo {
        track: Some(PathBuf::from("/music/alpha.mp3")),
        elapsed: Duration::from_secs(90),
        duration: Some(Duration::from_secs(90)),
        finished: true,
        ..PlaybackInfo::default()
    };
    app.sync_playback(&info);
    let settings = Settings::default();

    let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
    terminal
        .draw(|f| {
            draw(f, &app, &info, &settings);
        })
        .unwrap();

    let text = buffer_text(terminal.backend().buffer());
    assert!(text.contains("alpha — Artist (ended)"));
    assert!(text.contains("01:30"));
}

#[test]
fn tiles_shrink_to_fit_a_standard_terminal() {
    let app = app_with(&["alpha", "beta"]);
    let settings = Settings::default();
    let area = Rect::new(0, 0, 80, 24);

    let lay = layout(area, &app, &settings.ui);
    assert_eq!(lay.grid.tile_height, lay.grid_area.height);
    let rect = lay
        .grid
        .tile_rect(lay.grid_area, lay.first_row, 0)
        .unwrap();
    assert_eq!(lay.track_at(rect.x + 1, rect.y + 1), Some(0));

    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    terminal
        .draw(|f| {
            draw(f, &app, &PlaybackInfo::default(), &settings);
        })
        .unwrap();

    let text = buffer_text(terminal.backend().buffer());
    assert!(text.contains("alpha"));
    assert!(text.contains("Artist"));
}

#[test]
fn tiles_keep_a_minimum_height() {
    let app = app_with(&["alpha"]);
    let lay = layout(Rect::new(0, 0, 80, 14), &app, &UiSettings::default());
    assert_eq!(lay.grid.tile_height, MIN_TILE_HEIGHT);
}
