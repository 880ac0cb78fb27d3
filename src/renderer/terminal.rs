//! Terminal render surface
//!
//! Rasterises the field into character cells: each tile is three columns
//! wide and one row tall. Frames are composed in a buffer and flushed in one
//! write.

use std::io::{self, Stdout, Write};

use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
        enable_raw_mode, supports_keyboard_enhancement,
    },
};
use glam::Vec2;

use super::{RenderSurface, Sprite, Terrain};
use crate::sim::{Facing, Field, LogSize, VehicleClass};

/// Character columns per tile
pub const COLS_PER_TILE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    const BLANK: Cell = Cell {
        ch: ' ',
        fg: Color::White,
        bg: Color::Black,
    };
}

/// Off-screen character grid
#[derive(Debug, Clone)]
pub struct CellBuffer {
    field: Field,
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl CellBuffer {
    pub fn new(field: Field) -> Self {
        let width = field.cols as usize * COLS_PER_TILE;
        let height = field.rows as usize;
        Self {
            field,
            width,
            height,
            cells: vec![Cell::BLANK; width * height],
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn px_per_col(&self) -> f32 {
        self.field.tile_size / COLS_PER_TILE as f32
    }

    fn put(&mut self, col: i64, row: i64, cell: Cell) {
        if col < 0 || row < 0 || col as usize >= self.width || row as usize >= self.height {
            return;
        }
        self.cells[row as usize * self.width + col as usize] = cell;
    }

    /// Fill the cells whose centres fall inside the pixel rectangle
    pub fn fill_rect(&mut self, min: Vec2, size: Vec2, ch: char, fg: Color, bg: Option<Color>) {
        let px = self.px_per_col();
        let row = (min.y + size.y / 2.0).div_euclid(self.field.tile_size) as i64;
        let first = ((min.x / px) - 0.5).ceil() as i64;
        let last = (((min.x + size.x) / px) - 0.5).ceil() as i64;

        for col in first..last.max(first + 1) {
            let under = self.cell(col, row);
            let bg = bg.or(under.map(|c| c.bg)).unwrap_or(Color::Black);
            self.put(col, row, Cell { ch, fg, bg });
        }
    }

    pub fn write_centered(&mut self, center: Vec2, text: &str) {
        let row = center.y.div_euclid(self.field.tile_size) as i64;
        let center_col = (center.x / self.px_per_col()) as i64;
        let start = center_col - text.chars().count() as i64 / 2;
        for (i, ch) in text.chars().enumerate() {
            let bg = self.cell(start + i as i64, row).map_or(Color::Black, |c| c.bg);
            self.put(
                start + i as i64,
                row,
                Cell {
                    ch,
                    fg: Color::White,
                    bg,
                },
            );
        }
    }

    fn cell(&self, col: i64, row: i64) -> Option<Cell> {
        if col < 0 || row < 0 || col as usize >= self.width || row as usize >= self.height {
            return None;
        }
        Some(self.cells[row as usize * self.width + col as usize])
    }

    /// The characters of one row, for inspection
    pub fn row_text(&self, row: usize) -> String {
        self.cells[row * self.width..(row + 1) * self.width]
            .iter()
            .map(|c| c.ch)
            .collect()
    }

    fn flush_to(&self, out: &mut impl Write) -> io::Result<()> {
        for row in 0..self.height {
            queue!(out, MoveTo(0, row as u16))?;
            for cell in &self.cells[row * self.width..(row + 1) * self.width] {
                queue!(
                    out,
                    SetForegroundColor(cell.fg),
                    SetBackgroundColor(cell.bg),
                    Print(cell.ch)
                )?;
            }
        }
        queue!(out, ResetColor)?;
        out.flush()
    }
}

/// Glyph, foreground and optional background for a sprite
fn glyph(sprite: Sprite) -> (char, Color, Option<Color>) {
    match sprite {
        Sprite::Ground(Terrain::Bushes) => ('"', Color::DarkGreen, Some(Color::Black)),
        Sprite::Ground(Terrain::Water) => ('~', Color::Cyan, Some(Color::DarkBlue)),
        Sprite::Ground(Terrain::Road) => (' ', Color::White, Some(Color::DarkGrey)),
        Sprite::Ground(Terrain::Verge) => ('.', Color::DarkMagenta, Some(Color::Black)),
        Sprite::Vehicle { class, facing_right } => {
            let ch = match (class, facing_right) {
                (VehicleClass::Truck, _) => '#',
                (VehicleClass::Bulldozer, _) => 'B',
                (_, true) => '>',
                (_, false) => '<',
            };
            let fg = match class {
                VehicleClass::Sedan => Color::Yellow,
                VehicleClass::Racer => Color::Magenta,
                VehicleClass::Bulldozer => Color::Green,
                VehicleClass::Truck => Color::White,
            };
            (ch, fg, None)
        }
        Sprite::Log(size) => {
            let ch = if size == LogSize::Long { '=' } else { '-' };
            (ch, Color::Yellow, Some(Color::DarkYellow))
        }
        Sprite::Turtles { frame } => {
            let ch = ['o', 'O', '0'][frame as usize % 3];
            (ch, Color::Red, None)
        }
        Sprite::Goal => ('_', Color::Green, None),
        Sprite::Landed => ('@', Color::Green, None),
        Sprite::Player { facing, frame } => {
            let ch = if frame > 0 {
                '*'
            } else {
                match facing {
                    Facing::Up => '^',
                    Facing::Down => 'v',
                    Facing::Left => '<',
                    Facing::Right => '>',
                }
            };
            (ch, Color::Green, None)
        }
    }
}

/// Keyboard protocol flags requested from terminals that support them.
/// Event types are what let auto-repeat arrive as `Repeat` instead of `Press`.
pub fn keyboard_flags() -> KeyboardEnhancementFlags {
    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
        | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
}

/// Alternate-screen terminal surface. Restores the terminal on drop.
pub struct TerminalSurface {
    buffer: CellBuffer,
    out: Stdout,
    key_events: bool,
}

impl TerminalSurface {
    pub fn new(field: Field) -> Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let mut out = io::stdout();
        execute!(out, EnterAlternateScreen, Hide, Clear(ClearType::All))
            .context("failed to enter alternate screen")?;

        // Must be queried after raw mode is on
        let key_events = supports_keyboard_enhancement().unwrap_or(false)
            && match execute!(out, PushKeyboardEnhancementFlags(keyboard_flags())) {
                Ok(()) => true,
                Err(err) => {
                    log::warn!("failed to enable key event types: {err}");
                    false
                }
            };

        Ok(Self {
            buffer: CellBuffer::new(field),
            out,
            key_events,
        })
    }

    /// Whether the terminal tells presses, repeats and releases apart
    pub fn reports_key_events(&self) -> bool {
        self.key_events
    }
}

impl RenderSurface for TerminalSurface {
    fn begin_frame(&mut self) -> Result<()> {
        self.buffer.clear();
        Ok(())
    }

    fn draw(&mut self, sprite: Sprite, min: Vec2, size: Vec2) {
        let (ch, fg, bg) = glyph(sprite);
        self.buffer.fill_rect(min, size, ch, fg, bg);
    }

    fn text(&mut self, center: Vec2, text: &str) {
        self.buffer.write_centered(center, text);
    }

    fn end_frame(&mut self) -> Result<()> {
        self.buffer
            .flush_to(&mut self.out)
            .context("failed to write frame")
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        if self.key_events {
            if let Err(err) = execute!(self.out, PopKeyboardEnhancementFlags) {
                log::warn!("failed to restore keyboard mode: {err}");
            }
        }
        if let Err(err) = execute!(self.out, ResetColor, Show, LeaveAlternateScreen) {
            log::warn!("failed to leave alternate screen: {err}");
        }
        if let Err(err) = disable_raw_mode() {
            log::warn!("failed to disable raw mode: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_maps_to_three_columns() {
        let mut buffer = CellBuffer::new(Field::default());
        buffer.fill_rect(Vec2::new(60.0, 120.0), Vec2::new(60.0, 60.0), 'x', Color::White, None);
        assert_eq!(&buffer.row_text(2)[..9], "   xxx   ");
    }

    #[test]
    fn test_offscreen_parts_are_clipped() {
        let mut buffer = CellBuffer::new(Field::default());
        buffer.fill_rect(Vec2::new(-100.0, 450.0), Vec2::new(140.0, 40.0), '<', Color::White, None);
        assert_eq!(&buffer.row_text(7)[..3], "<< ");
        buffer.fill_rect(Vec2::new(700.0, 450.0), Vec2::new(77.0, 40.0), '>', Color::White, None);
        assert!(!buffer.row_text(7).contains('>'));
    }

    #[test]
    fn test_text_is_centred() {
        let mut buffer = CellBuffer::new(Field::default());
        buffer.write_centered(Vec2::new(330.0, 30.0), "GO");
        let row = buffer.row_text(0);
        assert_eq!(row.find("GO"), Some(15));
    }

    #[test]
    fn test_requests_key_event_types() {
        assert!(keyboard_flags().contains(KeyboardEnhancementFlags::REPORT_EVENT_TYPES));
    }

    #[test]
    fn test_player_glyph_tracks_facing() {
        assert_eq!(glyph(Sprite::Player { facing: Facing::Left, frame: 0 }).0, '<');
        assert_eq!(glyph(Sprite::Player { facing: Facing::Left, frame: 3 }).0, '*');
    }
}
