use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};

use crate::geometry::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Move,
    Press,
}

/// Pointer input already mapped into field coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub at: Point,
}

impl PointerEvent {
    pub fn moved(x: f64, y: f64) -> Self {
        Self {
            kind: PointerKind::Move,
            at: Point::new(x, y),
        }
    }

    pub fn pressed(x: f64, y: f64) -> Self {
        Self {
            kind: PointerKind::Press,
            at: Point::new(x, y),
        }
    }
}

/// Maps terminal cells onto a game's logical field.
///
/// The area is recorded on every render, so mouse input always lines up with
/// what was last drawn.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    area: Rect,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            area: Rect::default(),
        }
    }

    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    /// Centre of the cell at `column`/`row` in field units, or `None` when the
    /// cell lies outside the drawn field.
    pub fn cell_to_field(&self, column: u16, row: u16) -> Option<Point> {
        if self.area.width == 0 || self.area.height == 0 {
            return None;
        }
        if !self.area.contains(Position::new(column, row)) {
            return None;
        }
        let fx = (column - self.area.x) as f64 + 0.5;
        let fy = (row - self.area.y) as f64 + 0.5;
        Some(Point::new(
            fx / self.area.width as f64 * self.width,
            fy / self.area.height as f64 * self.height,
        ))
    }

    /// Translates a crossterm mouse event. Drags count as moves so touch-style
    /// steering works while a button is held.
    pub fn translate(&self, mouse: MouseEvent) -> Option<PointerEvent> {
        let kind = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => PointerKind::Press,
            MouseEventKind::Moved | MouseEventKind::Drag(MouseButton::Left) => PointerKind::Move,
            _ => return None,
        };
        let at = self.cell_to_field(mouse.column, mouse.row)?;
        Some(PointerEvent { kind, at })
    }
}
