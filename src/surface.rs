//! The drawing-surface abstraction the game renders onto.
//!
//! Modelled on a 2D canvas context: a save/restore stack, a translated
//! origin, stroke and fill colours, and a handful of primitives.  Backends
//! decide what the primitives look like; the game only issues commands.

use crate::entities::{Image, Position};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb { r: 0xFF, g: 0xFF, b: 0xFF };
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
}

pub trait Surface {
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) -> std::io::Result<()>;
    fn save(&mut self) -> std::io::Result<()>;
    fn restore(&mut self) -> std::io::Result<()>;
    fn translate(&mut self, dx: f32, dy: f32) -> std::io::Result<()>;
    fn set_stroke(&mut self, color: Rgb) -> std::io::Result<()>;
    fn set_fill(&mut self, color: Rgb) -> std::io::Result<()>;
    fn set_line_width(&mut self, width: f32) -> std::io::Result<()>;
    fn stroke_polygon(&mut self, points: &[Position]) -> std::io::Result<()>;
    fn fill_polygon(&mut self, points: &[Position]) -> std::io::Result<()>;
    fn stroke_line(&mut self, from: Position, to: Position) -> std::io::Result<()>;
    /// Draw `image` with its top-left corner at (x, y), scaled to the size.
    fn draw_image(
        &mut self,
        image: &Image,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> std::io::Result<()>;
    /// End of frame.  Buffered backends flush here.
    fn present(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

// ── Recording backend ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    ClearRect { x: f32, y: f32, width: f32, height: f32 },
    Save,
    Restore,
    Translate { dx: f32, dy: f32 },
    SetStroke(Rgb),
    SetFill(Rgb),
    SetLineWidth(f32),
    StrokePolygon(Vec<Position>),
    FillPolygon(Vec<Position>),
    StrokeLine { from: Position, to: Position },
    DrawImage { path: String, x: f32, y: f32, width: f32, height: f32 },
    Present,
}

/// A surface that only remembers what it was asked to draw.
#[derive(Debug, Default)]
pub struct Recorder {
    pub commands: Vec<DrawCommand>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    fn push(&mut self, command: DrawCommand) -> std::io::Result<()> {
        self.commands.push(command);
        Ok(())
    }
}

impl Surface for Recorder {
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) -> std::io::Result<()> {
        self.push(DrawCommand::ClearRect { x, y, width, height })
    }

    fn save(&mut self) -> std::io::Result<()> {
        self.push(DrawCommand::Save)
    }

    fn restore(&mut self) -> std::io::Result<()> {
        self.push(DrawCommand::Restore)
    }

    fn translate(&mut self, dx: f32, dy: f32) -> std::io::Result<()> {
        self.push(DrawCommand::Translate { dx, dy })
    }

    fn set_stroke(&mut self, color: Rgb) -> std::io::Result<()> {
        self.push(DrawCommand::SetStroke(color))
    }

    fn set_fill(&mut self, color: Rgb) -> std::io::Result<()> {
        self.push(DrawCommand::SetFill(color))
    }

    fn set_line_width(&mut self, width: f32) -> std::io::Result<()> {
        self.push(DrawCommand::SetLineWidth(width))
    }

    fn stroke_polygon(&mut self, points: &[Position]) -> std::io::Result<()> {
        self.push(DrawCommand::StrokePolygon(points.to_vec()))
    }

    fn fill_polygon(&mut self, points: &[Position]) -> std::io::Result<()> {
        self.push(DrawCommand::FillPolygon(points.to_vec()))
    }

    fn stroke_line(&mut self, from: Position, to: Position) -> std::io::Result<()> {
        self.push(DrawCommand::StrokeLine { from, to })
    }

    fn draw_image(
        &mut self,
        image: &Image,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> std::io::Result<()> {
        self.push(DrawCommand::DrawImage {
            path: image.path.display().to_string(),
            x,
            y,
            width,
            height,
        })
    }

    fn present(&mut self) -> std::io::Result<()> {
        self.push(DrawCommand::Present)
    }
}
