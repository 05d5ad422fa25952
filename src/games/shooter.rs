use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::prelude::*;
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine};

use crate::games::{Game, GameKind};
use crate::geometry::{within, Point, Rect as FieldRect};
use crate::input::{PointerEvent, PointerKind, Viewport};
use crate::session::{Outcome, Session};
use crate::ui::hud;

const TIME_BUDGET: Duration = Duration::from_secs(60);
const SPAWN_INTERVAL: Duration = Duration::from_millis(1500);
const BULLET_SPEED: f64 = 10.0;
const BULLET_RADIUS: f64 = 3.0;
const OFFSCREEN_SLACK: f64 = 100.0;
const CROSSHAIR_STEP: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TargetTier {
    Large,
    Medium,
    Small,
}

impl TargetTier {
    const ALL: [TargetTier; 3] = [TargetTier::Large, TargetTier::Medium, TargetTier::Small];

    fn size(self) -> f64 {
        match self {
            TargetTier::Large => 30.0,
            TargetTier::Medium => 20.0,
            TargetTier::Small => 15.0,
        }
    }

    fn speed(self) -> f64 {
        match self {
            TargetTier::Large => 1.0,
            TargetTier::Medium => 2.0,
            TargetTier::Small => 3.0,
        }
    }

    fn points(self) -> u32 {
        match self {
            TargetTier::Large => 10,
            TargetTier::Medium => 20,
            TargetTier::Small => 50,
        }
    }

    fn color(self) -> Color {
        match self {
            TargetTier::Large => Color::Rgb(255, 255, 255),
            TargetTier::Medium => Color::Rgb(204, 204, 204),
            TargetTier::Small => Color::Rgb(170, 170, 170),
        }
    }

    /// Bullet-centre distance below which a bullet hits this tier.
    fn hit_threshold(self) -> f64 {
        self.size() / 2.0 + BULLET_RADIUS
    }
}

#[derive(Debug, Clone)]
struct Target {
    tier: TargetTier,
    pos: Point,
    vx: f64,
    vy: f64,
    active: bool,
}

#[derive(Debug, Clone)]
struct Bullet {
    pos: Point,
    vx: f64,
    vy: f64,
    active: bool,
}

/// Sixty seconds of shooting targets from a fixed cannon.
pub struct TargetShooter {
    session: Session,
    viewport: Viewport,
    rng: StdRng,
    crosshair: Point,
    targets: Vec<Target>,
    bullets: Vec<Bullet>,
    hits: u32,
    last_spawn: Option<Duration>,
    clock: Duration,
    best: u32,
}

impl TargetShooter {
    pub fn new(width: f64, height: f64) -> Self {
        Self::with_rng(width, height, StdRng::from_entropy())
    }

    pub fn with_rng(width: f64, height: f64, rng: StdRng) -> Self {
        Self {
            session: Session::new(GameKind::Shooter),
            viewport: Viewport::new(width, height),
            rng,
            crosshair: Point::new(width / 2.0, height / 2.0),
            targets: Vec::new(),
            bullets: Vec::new(),
            hits: 0,
            last_spawn: None,
            clock: Duration::ZERO,
            best: 0,
        }
    }

    fn cannon(&self) -> Point {
        Point::new(self.viewport.width / 2.0, self.viewport.height)
    }

    fn shoot(&mut self, aim: Point) {
        if !self.session.is_running() {
            return;
        }
        let origin = self.cannon();
        let distance = origin.distance(aim);
        if distance == 0.0 {
            return;
        }
        self.bullets.push(Bullet {
            pos: origin,
            vx: (aim.x - origin.x) / distance * BULLET_SPEED,
            vy: (aim.y - origin.y) / distance * BULLET_SPEED,
            active: true,
        });
    }

    fn spawn_target(&mut self, now: Duration) {
        if let Some(last) = self.last_spawn {
            if now.saturating_sub(last) < SPAWN_INTERVAL {
                return;
            }
        }
        let tier = TargetTier::ALL[self.rng.gen_range(0..TargetTier::ALL.len())];
        let from_left = self.rng.gen_bool(0.5);
        let (w, h) = (self.viewport.width, self.viewport.height);
        let target = Target {
            tier,
            pos: Point::new(
                if from_left { -tier.size() } else { w + tier.size() },
                self.rng.gen_range(0.0..1.0) * (h / 2.0) + 50.0,
            ),
            vx: if from_left { tier.speed() } else { -tier.speed() },
            vy: self.rng.gen_range(-1.0..1.0),
            active: true,
        };
        self.targets.push(target);
        self.last_spawn = Some(now);
    }

    fn remaining(&self) -> Duration {
        TIME_BUDGET.saturating_sub(self.session.elapsed(self.clock))
    }
}

impl Game for TargetShooter {
    fn kind(&self) -> GameKind {
        GameKind::Shooter
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
        self.hits = 0;
        self.targets.clear();
        self.bullets.clear();
        self.last_spawn = None;
        self.clock = now;
    }

    fn step(&mut self, now: Duration) -> Vec<Outcome> {
        self.clock = now;
        if self.session.elapsed(now) >= TIME_BUDGET {
            let outcome = self.session.terminate_with_time(now, TIME_BUDGET.as_secs());
            self.best = self.best.max(self.session.score());
            return vec![outcome];
        }

        let (w, h) = (self.viewport.width, self.viewport.height);

        // One pass per collection: drop what the last frame consumed, move the
        // rest and cull anything that left the field.
        self.bullets.retain_mut(|b| {
            if !b.active {
                return false;
            }
            b.pos.x += b.vx;
            b.pos.y += b.vy;
            b.pos.x >= 0.0 && b.pos.x <= w && b.pos.y >= 0.0 && b.pos.y <= h
        });
        self.targets.retain_mut(|t| {
            if !t.active {
                return false;
            }
            t.pos.x += t.vx;
            t.pos.y += t.vy;
            if t.pos.y <= 0.0 || t.pos.y >= h / 2.0 {
                t.vy = -t.vy;
            }
            let slack = t.tier.size() + OFFSCREEN_SLACK;
            t.pos.x > -slack && t.pos.x < w + slack
        });

        let mut outcomes = Vec::new();
        for bullet in &mut self.bullets {
            for target in &mut self.targets {
                if !bullet.active || !target.active {
                    continue;
                }
                if within(bullet.pos, target.pos, target.tier.hit_threshold()) {
                    bullet.active = false;
                    target.active = false;
                    self.hits += 1;
                    outcomes.push(self.session.add_score(target.tier.points() as f64));
                }
            }
        }

        self.spawn_target(now);
        outcomes
    }

    fn pointer(&mut self, event: PointerEvent, _now: Duration) -> Vec<Outcome> {
        self.crosshair = event.at;
        if event.kind == PointerKind::Press {
            self.shoot(event.at);
        }
        Vec::new()
    }

    fn primary(&mut self, _now: Duration) -> Vec<Outcome> {
        self.shoot(self.crosshair);
        Vec::new()
    }

    fn steer(&mut self, dx: f64, dy: f64) {
        self.crosshair.x = (self.crosshair.x + dx * CROSSHAIR_STEP).clamp(0.0, self.viewport.width);
        self.crosshair.y = (self.crosshair.y + dy * CROSSHAIR_STEP).clamp(0.0, self.viewport.height);
    }

    fn best(&self) -> u32 {
        self.best
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [status, field, help] =
            hud::game_layout(frame, area, "🎯 Target Shooter", Color::Rgb(255, 160, 60));
        self.viewport.set_area(field);

        let left = if self.session.is_running() || self.session.is_over() {
            self.remaining().as_secs()
        } else {
            TIME_BUDGET.as_secs()
        };
        hud::render_status(
            frame,
            status,
            vec![
                hud::stat("Score", format!("{:05}", self.session.score()), Color::Yellow),
                hud::stat("Hits", self.hits.to_string(), Color::Cyan),
                hud::stat("Time", format!("{}s", left), Color::Green),
                hud::stat("Best", self.best.to_string(), Color::Magenta),
            ],
        );

        let (w, h) = (self.viewport.width, self.viewport.height);
        let cannon = FieldRect::new(w / 2.0 - 15.0, h - 20.0, 30.0, 20.0);
        let crosshair = self.crosshair;
        let targets = &self.targets;
        let bullets = &self.bullets;
        let canvas = Canvas::default()
            .background_color(hud::FIELD_BG)
            .x_bounds([0.0, w])
            .y_bounds([0.0, h])
            .paint(move |ctx| {
                for t in targets.iter().filter(|t| t.active) {
                    let r = t.tier.size() / 2.0;
                    ctx.draw(&hud::circle_shape(t.pos, r, h, t.tier.color()));
                    ctx.draw(&hud::circle_shape(t.pos, t.tier.size() / 3.0, h, t.tier.color()));
                }
                for b in bullets.iter().filter(|b| b.active) {
                    ctx.draw(&hud::circle_shape(b.pos, BULLET_RADIUS, h, Color::Yellow));
                }
                ctx.draw(&hud::rect_shape(&cannon, h, Color::White));
                ctx.layer();
                let (cx, cy) = (crosshair.x, h - crosshair.y);
                ctx.draw(&CanvasLine {
                    x1: cx - 10.0,
                    y1: cy,
                    x2: cx + 10.0,
                    y2: cy,
                    color: Color::Red,
                });
                ctx.draw(&CanvasLine {
                    x1: cx,
                    y1: cy - 10.0,
                    x2: cx,
                    y2: cy + 10.0,
                    color: Color::Red,
                });
            });
        frame.render_widget(canvas, field);

        hud::render_help(frame, help, self.session.phase(), "Click/SPACE Shoot │ ←↑↓→ Aim");
    }
}
