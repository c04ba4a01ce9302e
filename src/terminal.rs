//! Terminal backend for `Surface`, built on crossterm.
//!
//! The game draws in canvas pixels; this backend scales them onto the
//! terminal's character grid.  Commands are queued and only flushed in
//! `present`, once per frame.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use crate::entities::{Image, Position};
use crate::surface::{Rgb, Surface};

const C_SPRITE: Color = Color::Green;

const GLYPH_FILL: &str = "█";
const GLYPH_STROKE: &str = "▪";
const GLYPH_LINE_THIN: &str = "│";
const GLYPH_LINE_THICK: &str = "║";

#[derive(Clone, Copy, Debug)]
struct DrawState {
    origin: Position,
    stroke: Rgb,
    fill: Rgb,
    line_width: f32,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            origin: Position::default(),
            stroke: Rgb::WHITE,
            fill: Rgb::WHITE,
            line_width: 1.0,
        }
    }
}

pub struct TerminalSurface<W: Write> {
    out: W,
    canvas_width: f32,
    canvas_height: f32,
    cols: u16,
    rows: u16,
    state: DrawState,
    saved: Vec<DrawState>,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, canvas_width: f32, canvas_height: f32, cols: u16, rows: u16) -> Self {
        Self {
            out,
            canvas_width,
            canvas_height,
            cols,
            rows,
            state: DrawState::default(),
            saved: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Terminal cell under a point given in the current (translated) space.
    /// Points off the grid have no cell.
    pub fn cell_at(&self, p: Position) -> Option<(u16, u16)> {
        let (col, row) = self.cell_unclipped(p);
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return None;
        }
        Some((col as u16, row as u16))
    }

    fn cell_unclipped(&self, p: Position) -> (i32, i32) {
        let x = self.state.origin.x + p.x;
        let y = self.state.origin.y + p.y;
        let col = (x * self.cols as f32 / self.canvas_width).floor() as i32;
        let row = (y * self.rows as f32 / self.canvas_height).floor() as i32;
        (col, row)
    }

    fn put(&mut self, col: i32, row: i32, text: &str) -> std::io::Result<()> {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return Ok(());
        }
        // Clip the tail of text running off the right edge.
        let room = (self.cols as i32 - col) as usize;
        let clipped: String = text.chars().take(room).collect();
        self.out.queue(cursor::MoveTo(col as u16, row as u16))?;
        self.out.queue(Print(clipped))?;
        Ok(())
    }

    /// Fill the cell rectangle spanned by two opposite corners.
    fn fill_cells(&mut self, a: (i32, i32), b: (i32, i32), glyph: &str) -> std::io::Result<()> {
        let col0 = a.0.min(b.0).max(0);
        let col1 = a.0.max(b.0).min(self.cols as i32 - 1);
        let row0 = a.1.min(b.1).max(0);
        let row1 = a.1.max(b.1).min(self.rows as i32 - 1);
        if col0 > col1 || row0 > row1 {
            return Ok(());
        }
        let line = glyph.repeat((col1 - col0 + 1) as usize);
        for row in row0..=row1 {
            self.put(col0, row, &line)?;
        }
        Ok(())
    }

    fn plot_line(&mut self, from: Position, to: Position, glyph: &str) -> std::io::Result<()> {
        let a = self.cell_unclipped(from);
        let b = self.cell_unclipped(to);
        let steps = (b.0 - a.0).abs().max((b.1 - a.1).abs());
        if steps == 0 {
            return self.put(a.0, a.1, glyph);
        }
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let col = a.0 + ((b.0 - a.0) as f32 * t).round() as i32;
            let row = a.1 + ((b.1 - a.1) as f32 * t).round() as i32;
            self.put(col, row, glyph)?;
        }
        Ok(())
    }

    fn bounds(&self, points: &[Position]) -> Option<((i32, i32), (i32, i32))> {
        let first = points.first()?;
        let mut min = *first;
        let mut max = *first;
        for p in points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Some((self.cell_unclipped(min), self.cell_unclipped(max)))
    }
}

fn term_color(c: Rgb) -> Color {
    Color::Rgb { r: c.r, g: c.g, b: c.b }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) -> std::io::Result<()> {
        let whole = x + self.state.origin.x <= 0.0
            && y + self.state.origin.y <= 0.0
            && x + self.state.origin.x + width >= self.canvas_width
            && y + self.state.origin.y + height >= self.canvas_height;
        if whole {
            self.out.queue(terminal::Clear(terminal::ClearType::All))?;
            return Ok(());
        }
        let a = self.cell_unclipped(Position::new(x, y));
        let b = self.cell_unclipped(Position::new(x + width, y + height));
        self.out.queue(style::ResetColor)?;
        self.fill_cells(a, (b.0 - 1, b.1 - 1), " ")
    }

    fn save(&mut self) -> std::io::Result<()> {
        self.saved.push(self.state);
        Ok(())
    }

    fn restore(&mut self) -> std::io::Result<()> {
        // Unbalanced restores are ignored, as on a canvas.
        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
        Ok(())
    }

    fn translate(&mut self, dx: f32, dy: f32) -> std::io::Result<()> {
        self.state.origin.x += dx;
        self.state.origin.y += dy;
        Ok(())
    }

    fn set_stroke(&mut self, color: Rgb) -> std::io::Result<()> {
        self.state.stroke = color;
        Ok(())
    }

    fn set_fill(&mut self, color: Rgb) -> std::io::Result<()> {
        self.state.fill = color;
        Ok(())
    }

    fn set_line_width(&mut self, width: f32) -> std::io::Result<()> {
        self.state.line_width = width;
        Ok(())
    }

    fn stroke_polygon(&mut self, points: &[Position]) -> std::io::Result<()> {
        if points.is_empty() {
            return Ok(());
        }
        self.out.queue(style::SetForegroundColor(term_color(self.state.stroke)))?;
        for (i, &from) in points.iter().enumerate() {
            let to = points[(i + 1) % points.len()];
            self.plot_line(from, to, GLYPH_STROKE)?;
        }
        Ok(())
    }

    fn fill_polygon(&mut self, points: &[Position]) -> std::io::Result<()> {
        let Some((a, b)) = self.bounds(points) else {
            return Ok(());
        };
        self.out.queue(style::SetForegroundColor(term_color(self.state.fill)))?;
        self.fill_cells(a, b, GLYPH_FILL)
    }

    fn stroke_line(&mut self, from: Position, to: Position) -> std::io::Result<()> {
        self.out.queue(style::SetForegroundColor(term_color(self.state.stroke)))?;
        let glyph = if self.state.line_width >= 2.0 {
            GLYPH_LINE_THICK
        } else {
            GLYPH_LINE_THIN
        };
        self.plot_line(from, to, glyph)
    }

    fn draw_image(
        &mut self,
        image: &Image,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> std::io::Result<()> {
        let Some(rows) = image.rows.as_ref() else {
            return Ok(());
        };
        let (col0, row0) = self.cell_unclipped(Position::new(x, y));
        let (col1, row1) = self.cell_unclipped(Position::new(x + width, y + height));
        let rect_cols = (col1 - col0).max(1);
        let rect_rows = (row1 - row0).max(1);

        self.out.queue(style::SetForegroundColor(C_SPRITE))?;
        let top = row0 + (rect_rows - rows.len() as i32).max(0) / 2;
        for (i, line) in rows.iter().enumerate() {
            let line_cols = line.chars().count() as i32;
            let left = col0 + (rect_cols - line_cols).max(0) / 2;
            self.put(left, top + i as i32, line)?;
        }
        Ok(())
    }

    fn present(&mut self) -> std::io::Result<()> {
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, self.rows.saturating_sub(1)))?;
        self.out.flush()
    }
}
