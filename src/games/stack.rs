use std::time::Duration;

use ratatui::prelude::*;
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine};

use crate::games::{Game, GameKind};
use crate::geometry::{span_overlap, Rect as FieldRect};
use crate::input::{PointerEvent, PointerKind, Viewport};
use crate::session::{Outcome, Session};
use crate::ui::hud;

const BASE_WIDTH: f64 = 100.0;
const BLOCK_HEIGHT: f64 = 30.0;
const HOVER_GAP: f64 = 10.0;
const START_SPEED: f64 = 2.0;
const SPEED_STEP: f64 = 0.5;
const PLACEMENTS_PER_SPEEDUP: u32 = 5;
const PERFECT_TOLERANCE: f64 = 5.0;
const PERFECT_POINTS: f64 = 50.0;
const TRIM_POINTS: f64 = 10.0;
const MIN_WIDTH: f64 = 20.0;

#[derive(Debug, Clone, PartialEq)]
struct Block {
    rect: FieldRect,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Placement {
    Missed,
    Perfect,
    Trimmed { width: f64 },
    TooThin { width: f64 },
}

/// Drop sliding blocks onto a tower; overhangs are sliced away.
pub struct StackGame {
    session: Session,
    viewport: Viewport,
    tower: Vec<Block>,
    moving: Option<Block>,
    direction: f64,
    speed: f64,
    placements: u32,
    clock: Duration,
    best: u32,
}

impl StackGame {
    pub fn new(width: f64, height: f64) -> Self {
        let mut game = Self {
            session: Session::new(GameKind::Stack),
            viewport: Viewport::new(width, height),
            tower: Vec::new(),
            moving: None,
            direction: 1.0,
            speed: START_SPEED,
            placements: 0,
            clock: Duration::ZERO,
            best: 0,
        };
        game.lay_base();
        game
    }

    fn lay_base(&mut self) {
        let (w, h) = (self.viewport.width, self.viewport.height);
        self.tower = vec![Block {
            rect: FieldRect::new(w / 2.0 - BASE_WIDTH / 2.0, h - BLOCK_HEIGHT, BASE_WIDTH, BLOCK_HEIGHT),
        }];
    }

    fn top(&self) -> &Block {
        // The base is laid on construction and the tower only grows.
        &self.tower[self.tower.len() - 1]
    }

    fn spawn_block(&mut self) {
        let top = self.top().rect;
        self.moving = Some(Block {
            rect: FieldRect::new(0.0, top.y - BLOCK_HEIGHT - HOVER_GAP, top.width, BLOCK_HEIGHT),
        });
        self.direction = 1.0;
    }

    fn drop_block(&mut self) -> Option<Placement> {
        if !self.session.is_running() {
            return None;
        }
        let mut block = self.moving.take()?;
        let top = self.top().rect;

        let left = block.rect.x.max(top.x);
        let overlap = span_overlap(block.rect.x, block.rect.right(), top.x, top.right());
        if overlap <= 0.0 {
            return Some(Placement::Missed);
        }

        let perfect = (block.rect.x - top.x).abs() <= PERFECT_TOLERANCE;
        if perfect {
            self.session.add_score(PERFECT_POINTS);
            block.rect.x = top.x;
            block.rect.width = top.width;
        } else {
            self.session.add_score(TRIM_POINTS);
            block.rect.x = left;
            block.rect.width = overlap;
        }
        block.rect.y = top.y - BLOCK_HEIGHT;
        let width = block.rect.width;
        self.tower.push(block);

        self.placements += 1;
        if self.placements % PLACEMENTS_PER_SPEEDUP == 0 {
            self.speed += SPEED_STEP;
            log::debug!("stack speed raised to {}", self.speed);
        }

        if width < MIN_WIDTH {
            return Some(Placement::TooThin { width });
        }
        self.spawn_block();
        Some(if perfect {
            Placement::Perfect
        } else {
            Placement::Trimmed { width }
        })
    }

    fn drop_outcomes(&mut self, now: Duration) -> Vec<Outcome> {
        match self.drop_block() {
            None => Vec::new(),
            Some(Placement::Missed) | Some(Placement::TooThin { .. }) => {
                let outcome = self.session.terminate(now);
                self.best = self.best.max(self.session.score());
                vec![outcome]
            }
            Some(Placement::Perfect) | Some(Placement::Trimmed { .. }) => vec![Outcome::ScoreChanged {
                score: self.session.score(),
            }],
        }
    }

    /// How far the view scrolls down so the top of the tower stays visible.
    fn camera_offset(&self) -> f64 {
        let reach = self
            .moving
            .as_ref()
            .map(|b| b.rect.y)
            .unwrap_or_else(|| self.top().rect.y);
        let headroom = self.viewport.height / 3.0;
        (headroom - reach).max(0.0)
    }
}

impl Game for StackGame {
    fn kind(&self) -> GameKind {
        GameKind::Stack
    }

    fn session(&self) -> &Session {
        &self.session
    }

    fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    fn start(&mut self, now: Duration) {
        self.session.start(now);
        self.speed = START_SPEED;
        self.placements = 0;
        self.clock = now;
        self.lay_base();
        self.spawn_block();
    }

    fn step(&mut self, now: Duration) -> Vec<Outcome> {
        self.clock = now;
        let width = self.viewport.width;
        if let Some(block) = self.moving.as_mut() {
            block.rect.x += self.speed * self.direction;
            if block.rect.x <= 0.0 || block.rect.right() >= width {
                self.direction = -self.direction;
            }
        }
        Vec::new()
    }

    fn pointer(&mut self, event: PointerEvent, now: Duration) -> Vec<Outcome> {
        match event.kind {
            PointerKind::Press => self.drop_outcomes(now),
            PointerKind::Move => Vec::new(),
        }
    }

    fn primary(&mut self, now: Duration) -> Vec<Outcome> {
        self.drop_outcomes(now)
    }

    fn best(&self) -> u32 {
        self.best
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [status, field, help] =
            hud::game_layout(frame, area, "🧱 Stack Game", Color::Rgb(80, 220, 80));
        self.viewport.set_area(field);

        hud::render_status(
            frame,
            status,
            vec![
                hud::stat("Score", format!("{:05}", self.session.score()), Color::Yellow),
                hud::stat("Level", (self.placements + 1).to_string(), Color::Cyan),
                hud::stat(
                    "Time",
                    format!("{}s", self.session.elapsed(self.clock).as_secs()),
                    Color::Green,
                ),
                hud::stat("Best", self.best.to_string(), Color::Magenta),
            ],
        );

        let (w, h) = (self.viewport.width, self.viewport.height);
        let offset = self.camera_offset();
        let tower = &self.tower;
        let moving = self.moving.as_ref();
        let canvas = Canvas::default()
            .background_color(hud::FIELD_BG)
            .x_bounds([0.0, w])
            .y_bounds([0.0, h])
            .paint(move |ctx| {
                ctx.draw(&CanvasLine {
                    x1: w / 2.0,
                    y1: 0.0,
                    x2: w / 2.0,
                    y2: h,
                    color: Color::Rgb(50, 50, 50),
                });
                ctx.layer();
                for block in tower {
                    let mut r = block.rect;
                    r.y += offset;
                    ctx.draw(&hud::rect_shape(&r, h, Color::White));
                }
                if let Some(block) = moving {
                    let mut r = block.rect;
                    r.y += offset;
                    ctx.draw(&hud::rect_shape(&r, h, Color::Rgb(204, 204, 204)));
                }
            });
        frame.render_widget(canvas, field);

        hud::render_help(frame, help, self.session.phase(), "Click/SPACE Drop");
    }
}
