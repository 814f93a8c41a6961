//! Cover art as terminal cells.
//!
//! Each cell shows two vertical pixels with the upper half block `▀`: the
//! foreground colour is the top pixel, the background colour the bottom one.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::library::CoverArt;

const PLACEHOLDER: &str = "♪";

pub struct CoverView<'a> {
    art: Option<&'a CoverArt>,
}

impl<'a> CoverView<'a> {
    pub fn new(art: Option<&'a CoverArt>) -> Self {
        Self { art }
    }
}

fn rgb(p: [u8; 3]) -> Color {
    Color::Rgb(p[0], p[1], p[2])
}

impl Widget for CoverView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let Some(art) = self.art else {
            let x = area.x + area.width / 2;
            let y = area.y + area.height / 2;
            buf.set_string(x, y, PLACEHOLDER, Style::default().fg(Color::DarkGray));
            return;
        };

        let cols = u32::from(area.width);
        let px_rows = u32::from(area.height) * 2;
        let (w, h) = art.fit(cols, px_rows);
        if w == 0 || h == 0 {
            return;
        }
        let off_x = (cols - w) / 2;
        let off_y = (px_rows - h) / 2;

        let sample = |x: u32, y: u32| -> Option<[u8; 3]> {
            if x < off_x || x >= off_x + w || y < off_y || y >= off_y + h {
                return None;
            }
            Some(art.pixel(
                (x - off_x) * art.width() / w,
                (y - off_y) * art.height() / h,
            ))
        };

        for cy in 0..area.height {
            for cx in 0..area.width {
                let px = u32::from(cx);
                let top = sample(px, u32::from(cy) * 2);
                let bottom = sample(px, u32::from(cy) * 2 + 1);
                let Some(cell) = buf.cell_mut((area.x + cx, area.y + cy)) else {
                    continue;
                };
                match (top, bottom) {
                    (Some(t), Some(b)) => {
                        cell.set_char('▀').set_fg(rgb(t)).set_bg(rgb(b));
                    }
                    (Some(t), None) => {
                        cell.set_char('▀').set_fg(rgb(t));
                    }
                    (None, Some(b)) => {
                        cell.set_char('▄').set_fg(rgb(b));
                    }
                    (None, None) => {}
                }
            }
        }
    }
}
