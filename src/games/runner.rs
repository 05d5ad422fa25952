use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::prelude::*;
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine};

use crate::games::{Game, GameKind};
use crate::geometry::{approach, Rect as FieldRect};
use crate::input::{PointerEvent, PointerKind, Viewport};
use crate::session::{Outcome, Session};
use crate::ui::hud;

const PLAYER_X: f64 = 50.0;
const PLAYER_SIZE: f64 = 20.0;
const EASING: f64 = 0.1;
const START_SPEED: f64 = 2.0;
const SPEED_STEP: f64 = 0.001; // per frame, never capped
const OBSTACLE_REWARD: f64 = 10.0;
const LANE_MARGIN: f64 = 10.0;
const STEER_STEP: f64 = 25.0;

#[derive(Debug, Clone)]
struct Runner {
    y: f64,
    target_y: f64,
}

#[derive(Debug, Clone)]
struct Obstacle {
    rect: FieldRect,
}

/// Steer a square through walls scrolling in from the right.
pub struct AvoidanceRunner {
    session: Session,
    viewport: Viewport,
    rng: StdRng,
    player: Runner,
    obstacles: Vec<Obstacle>,
    speed: f64,
    last_spawn: Option<Duration>,
    clock: Duration,
    best: u32,
}

impl AvoidanceRunner {
    pub fn new(width: f64, height: f64) -> Self {
        Self::with_rng(width, height, StdRng::from_entropy())
    }

    pub fn with_rng(width: f64, height: f64, rng: StdRng) -> Self {
        Self {
            session: Session::new(GameKind::Runner),
            viewport: Viewport::new(width, height),
            rng,
            player: Runner {
                y: height / 2.0,
                target_y: height / 2.0,
            },
            obstacles: Vec::new(),
            speed: START_SPEED,
            last_spawn: None,
            clock: Duration::ZERO,
            best: 0,
        }
    }

    fn player_rect(&self) -> FieldRect {
        FieldRect::new(PLAYER_X, self.player.y, PLAYER_SIZE, PLAYER_SIZE)
    }

    fn set_target(&mut self, y: f64) {
        if !self.session.is_running() {
            return;
        }
        // A field shorter than the lanes pins the runner to the top margin.
        let max = (self.viewport.height - PLAYER_SIZE - LANE_MARGIN).max(LANE_MARGIN);
        self.player.target_y = y.clamp(LANE_MARGIN, max);
    }

    /// Faster runs spawn more often.
    fn spawn_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.speed)
    }

    fn spawn_obstacle(&mut self, now: Duration) {
        if let Some(last) = self.last_spawn {
            if now.saturating_sub(last) < self.spawn_interval() {
                return;
            }
        }
        let (w, h) = (self.viewport.width, self.viewport.height);
        let rect = FieldRect::new(
            w,
            self.rng.gen_range(0.0..1.0) * (h - 60.0) + 10.0,
            self.rng.gen_range(20.0..60.0),
            self.rng.gen_range(40.0..120.0),
        );
        self.obstacles.push(Obstacle { rect });
        self.last_spawn = Some(now);
    }
}

impl Game for AvoidanceRunner {
    fn kind(&self) -> GameKind {
        GameKind::Runner
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
        self.obstacles.clear();
        self.last_spawn = None;
        self.clock = now;
        let mid = self.viewport.height / 2.0;
        self.player = Runner {
            y: mid,
            target_y: mid,
        };
    }

    fn step(&mut self, now: Duration) -> Vec<Outcome> {
        self.clock = now;
        let mut outcomes = Vec::new();

        self.player.y = approach(self.player.y, self.player.target_y, EASING);

        let dx = self.speed * 2.0;
        let mut passed = 0u32;
        self.obstacles.retain_mut(|o| {
            o.rect.x -= dx;
            if o.rect.right() < 0.0 {
                passed += 1;
                false
            } else {
                true
            }
        });
        for _ in 0..passed {
            outcomes.push(self.session.add_score(OBSTACLE_REWARD));
        }

        self.spawn_obstacle(now);

        let player = self.player_rect();
        if self.obstacles.iter().any(|o| o.rect.overlaps(&player)) {
            outcomes.push(self.session.terminate(now));
            self.best = self.best.max(self.session.score());
            return outcomes;
        }

        self.speed += SPEED_STEP;
        outcomes
    }

    fn pointer(&mut self, event: PointerEvent, _now: Duration) -> Vec<Outcome> {
        // Any pointer activity steers; the runner has no click intent.
        match event.kind {
            PointerKind::Move | PointerKind::Press => self.set_target(event.at.y),
        }
        Vec::new()
    }

    fn primary(&mut self, _now: Duration) -> Vec<Outcome> {
        Vec::new()
    }

    fn steer(&mut self, _dx: f64, dy: f64) {
        let target = self.player.target_y + dy * STEER_STEP;
        self.set_target(target);
    }

    fn best(&self) -> u32 {
        self.best
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [status, field, help] =
            hud::game_layout(frame, area, "🏃 Avoidance Runner", Color::Rgb(200, 120, 255));
        self.viewport.set_area(field);

        hud::render_status(
            frame,
            status,
            vec![
                hud::stat("Score", format!("{:05}", self.session.score()), Color::Yellow),
                hud::stat("Speed", format!("{:.1}", self.speed), Color::Green),
                hud::stat(
                    "Time",
                    format!("{}s", self.session.elapsed(self.clock).as_secs()),
                    Color::Cyan,
                ),
                hud::stat("Best", self.best.to_string(), Color::Magenta),
            ],
        );

        let (w, h) = (self.viewport.width, self.viewport.height);
        let player = self.player_rect();
        let obstacles = &self.obstacles;
        let canvas = Canvas::default()
            .background_color(hud::FIELD_BG)
            .x_bounds([0.0, w])
            .y_bounds([0.0, h])
            .paint(move |ctx| {
                let rail = Color::Rgb(60, 60, 60);
                for y in [LANE_MARGIN, h - LANE_MARGIN] {
                    ctx.draw(&CanvasLine {
                        x1: 0.0,
                        y1: y,
                        x2: w,
                        y2: y,
                        color: rail,
                    });
                }
                ctx.layer();
                for o in obstacles {
                    ctx.draw(&hud::rect_shape(&o.rect, h, Color::White));
                }
                ctx.draw(&hud::rect_shape(&player, h, Color::Rgb(200, 120, 255)));
            });
        frame.render_widget(canvas, field);

        hud::render_help(frame, help, self.session.phase(), "Mouse/↑↓ Steer");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> AvoidanceRunner {
        AvoidanceRunner::with_rng(800.0, 600.0, StdRng::seed_from_u64(11))
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_target_is_clamped() {
        let mut g = game();
        g.start(ms(0));
        g.pointer(PointerEvent::moved(0.0, -50.0), ms(0));
        assert_eq!(g.player.target_y, 10.0);
        g.pointer(PointerEvent::moved(0.0, 900.0), ms(0));
        assert_eq!(g.player.target_y, 570.0);
    }

    #[test]
    fn test_short_field_pins_target_to_margin() {
        let mut g = AvoidanceRunner::with_rng(800.0, 35.0, StdRng::seed_from_u64(3));
        g.start(ms(0));
        g.pointer(PointerEvent::moved(0.0, 20.0), ms(0));
        assert_eq!(g.player.target_y, 10.0);
        g.steer(0.0, 1.0);
        assert_eq!(g.player.target_y, 10.0);
    }

    #[test]
    fn test_pointer_ignored_when_idle() {
        let mut g = game();
        g.pointer(PointerEvent::moved(0.0, 10.0), ms(0));
        assert_eq!(g.player.target_y, 300.0);
    }

    #[test]
    fn test_player_eases_toward_target() {
        let mut g = game();
        g.start(ms(0));
        g.last_spawn = Some(ms(0));
        g.pointer(PointerEvent::moved(0.0, 100.0), ms(0));
        g.tick(ms(0));
        assert!((g.player.y - 280.0).abs() < 1e-9);
    }

    #[test]
    fn test_collision_terminates() {
        let mut g = game();
        g.start(ms(0));
        g.last_spawn = Some(ms(0));
        g.obstacles.push(Obstacle {
            rect: FieldRect::new(60.0, 290.0, 30.0, 60.0),
        });
        let out = g.tick(ms(0));
        assert!(matches!(out.as_slice(), [Outcome::Terminated(_)]));
        assert!(g.session.is_over());
    }

    #[test]
    fn test_spawn_interval_shrinks_with_speed() {
        let mut g = game();
        g.start(ms(0));
        g.tick(ms(0));
        assert_eq!(g.obstacles.len(), 1);
        g.tick(ms(499));
        assert_eq!(g.obstacles.len(), 1);
        g.speed = 4.0;
        g.tick(ms(250));
        assert_eq!(g.obstacles.len(), 2);
    }

    #[test]
    fn test_end_to_end_obstacle_crossing() {
        let mut g = game();
        g.start(ms(0));
        // Keep `now` fixed so the only obstacle is the one placed here.
        g.last_spawn = Some(ms(0));
        g.obstacles.push(Obstacle {
            rect: FieldRect::new(800.0, 400.0, 40.0, 100.0),
        });
        g.pointer(PointerEvent::moved(0.0, 10.0), ms(0));

        let mut frames = 0u32;
        let mut crossed_at = None;
        while frames < 1000 {
            let before = g.speed;
            let out = g.tick(ms(0));
            frames += 1;
            assert!(g.speed > before);
            assert!(!out.iter().any(|o| matches!(o, Outcome::Terminated(_))));
            if !out.is_empty() {
                assert_eq!(out, vec![Outcome::ScoreChanged { score: 10 }]);
                crossed_at = Some(frames);
                break;
            }
            assert_eq!(g.session.score(), 0);
            assert_eq!(g.obstacles.len(), 1);
            assert!(g.obstacles[0].rect.right() >= 0.0);
        }

        let frames = crossed_at.expect("obstacle should leave the field");
        assert!(g.obstacles.is_empty());
        assert_eq!(g.session.score(), 10);
        let expected = START_SPEED + SPEED_STEP * frames as f64;
        assert!((g.speed - expected).abs() < 1e-9);
    }

    #[test]
    fn test_paused_frames_change_nothing() {
        let mut g = game();
        g.start(ms(0));
        g.tick(ms(16));
        g.toggle_pause();
        let (speed, y, count) = (g.speed, g.player.y, g.obstacles.len());
        let x = g.obstacles[0].rect.x;
        for frame in 2..50u64 {
            assert!(g.tick(ms(frame * 16)).is_empty());
        }
        assert_eq!((g.speed, g.player.y, g.obstacles.len()), (speed, y, count));
        assert_eq!(g.obstacles[0].rect.x, x);
    }
}
