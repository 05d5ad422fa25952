use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::prelude::*;
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine};

use crate::games::{Game, GameKind};
use crate::geometry::{circle_hits_rect, Point, Rect as FieldRect};
use crate::input::{PointerEvent, PointerKind, Viewport};
use crate::session::{Outcome, Session};
use crate::ui::hud;

const BALL_RADIUS: f64 = 10.0;
const GRAVITY: f64 = 0.5;
const BOUNCE_VELOCITY: f64 = -12.0;
const BOUNCE_POINTS: f64 = 5.0;
const SURVIVAL_POINTS: f64 = 0.1; // per frame
const SPAWN_INTERVAL: Duration = Duration::from_millis(2000);
const OBSTACLE_HEIGHT: f64 = 20.0;

#[derive(Debug, Clone)]
struct Ball {
    pos: Point,
    vy: f64,
}

#[derive(Debug, Clone)]
struct FallingObstacle {
    rect: FieldRect,
    speed: f64,
}

/// Keep the ball off the floor by clicking; falling bars end the run.
pub struct BouncingBall {
    session: Session,
    viewport: Viewport,
    rng: StdRng,
    ball: Ball,
    obstacles: Vec<FallingObstacle>,
    bounces: u32,
    last_spawn: Option<Duration>,
    clock: Duration,
    best: u32,
}

impl BouncingBall {
    pub fn new(width: f64, height: f64) -> Self {
        Self::with_rng(width, height, StdRng::from_entropy())
    }

    pub fn with_rng(width: f64, height: f64, rng: StdRng) -> Self {
        Self {
            session: Session::new(GameKind::Bouncing),
            viewport: Viewport::new(width, height),
            rng,
            ball: Ball {
                pos: Point::new(width / 2.0, height - 100.0),
                vy: 0.0,
            },
            obstacles: Vec::new(),
            bounces: 0,
            last_spawn: None,
            clock: Duration::ZERO,
            best: 0,
        }
    }

    fn bounce(&mut self) -> Vec<Outcome> {
        if !self.session.is_running() {
            return Vec::new();
        }
        self.ball.vy = BOUNCE_VELOCITY;
        self.bounces += 1;
        vec![self.session.add_score(BOUNCE_POINTS)]
    }

    fn spawn_obstacle(&mut self, now: Duration) {
        if let Some(last) = self.last_spawn {
            if now.saturating_sub(last) < SPAWN_INTERVAL {
                return;
            }
        }
        let width = self.viewport.width;
        let obstacle = FallingObstacle {
            rect: FieldRect::new(
                self.rng.gen_range(0.0..1.0) * (width - 60.0) + 30.0,
                -OBSTACLE_HEIGHT,
                self.rng.gen_range(40.0..80.0),
                OBSTACLE_HEIGHT,
            ),
            speed: self.rng.gen_range(1.0..3.0),
        };
        self.obstacles.push(obstacle);
        self.last_spawn = Some(now);
    }

    fn finish(&mut self, now: Duration) -> Vec<Outcome> {
        let outcome = self.session.terminate(now);
        self.best = self.best.max(self.session.score());
        vec![outcome]
    }
}

impl Game for BouncingBall {
    fn kind(&self) -> GameKind {
        GameKind::Bouncing
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
        self.bounces = 0;
        self.obstacles.clear();
        self.last_spawn = None;
        self.clock = now;
        self.ball = Ball {
            pos: Point::new(self.viewport.width / 2.0, self.viewport.height - 300.0),
            vy: 0.0,
        };
    }

    fn step(&mut self, now: Duration) -> Vec<Outcome> {
        self.clock = now;
        let height = self.viewport.height;

        self.ball.vy += GRAVITY;
        self.ball.pos.y += self.ball.vy;

        if self.ball.pos.y + BALL_RADIUS >= height {
            return self.finish(now);
        }

        for obstacle in &mut self.obstacles {
            obstacle.rect.y += obstacle.speed;
        }
        self.obstacles.retain(|o| o.rect.y < height + 50.0);

        self.spawn_obstacle(now);

        let ball = self.ball.pos;
        if self
            .obstacles
            .iter()
            .any(|o| circle_hits_rect(ball, BALL_RADIUS, &o.rect))
        {
            return self.finish(now);
        }

        vec![self.session.add_score(SURVIVAL_POINTS)]
    }

    fn pointer(&mut self, event: PointerEvent, _now: Duration) -> Vec<Outcome> {
        match event.kind {
            PointerKind::Press => self.bounce(),
            PointerKind::Move => Vec::new(),
        }
    }

    fn primary(&mut self, _now: Duration) -> Vec<Outcome> {
        self.bounce()
    }

    fn best(&self) -> u32 {
        self.best
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [status, field, help] =
            hud::game_layout(frame, area, "⚪ Bouncing Ball", Color::Rgb(120, 200, 255));
        self.viewport.set_area(field);

        hud::render_status(
            frame,
            status,
            vec![
                hud::stat("Score", format!("{:05}", self.session.score()), Color::Yellow),
                hud::stat("Bounces", self.bounces.to_string(), Color::Cyan),
                hud::stat(
                    "Time",
                    format!("{}s", self.session.elapsed(self.clock).as_secs()),
                    Color::Green,
                ),
                hud::stat("Best", self.best.to_string(), Color::Magenta),
            ],
        );

        let (w, h) = (self.viewport.width, self.viewport.height);
        let ball = self.ball.pos;
        let obstacles = &self.obstacles;
        let show_hint = self.session.is_running() && ball.y < h / 2.0;
        let canvas = Canvas::default()
            .background_color(hud::FIELD_BG)
            .x_bounds([0.0, w])
            .y_bounds([0.0, h])
            .paint(move |ctx| {
                for o in obstacles {
                    ctx.draw(&hud::rect_shape(&o.rect, h, Color::White));
                }
                ctx.draw(&CanvasLine {
                    x1: 0.0,
                    y1: 0.0,
                    x2: w,
                    y2: 0.0,
                    color: Color::White,
                });
                ctx.layer();
                ctx.draw(&hud::circle_shape(ball, BALL_RADIUS, h, Color::White));
                if show_hint {
                    ctx.print(
                        w / 2.0 - 60.0,
                        30.0,
                        Span::styled("TAP TO BOUNCE", Style::default().fg(Color::DarkGray)),
                    );
                }
            });
        frame.render_widget(canvas, field);

        hud::render_help(frame, help, self.session.phase(), "Click/SPACE Bounce");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> BouncingBall {
        BouncingBall::with_rng(800.0, 600.0, StdRng::seed_from_u64(7))
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_start_places_ball() {
        let mut g = game();
        g.start(ms(0));
        assert_eq!(g.ball.pos, Point::new(400.0, 300.0));
        assert!(g.session.is_running());
    }

    #[test]
    fn test_bounce_sets_impulse_and_scores() {
        let mut g = game();
        g.start(ms(0));
        let out = g.pointer(PointerEvent::pressed(1.0, 1.0), ms(0));
        assert_eq!(out, vec![Outcome::ScoreChanged { score: 5 }]);
        assert_eq!(g.ball.vy, BOUNCE_VELOCITY);
        assert_eq!(g.bounces, 1);
    }

    #[test]
    fn test_bounce_ignored_when_idle() {
        let mut g = game();
        assert!(g.primary(ms(0)).is_empty());
        assert_eq!(g.bounces, 0);
    }

    #[test]
    fn test_gravity_integration() {
        let mut g = game();
        g.start(ms(0));
        g.tick(ms(16));
        assert_eq!(g.ball.vy, 0.5);
        assert_eq!(g.ball.pos.y, 300.5);
        g.tick(ms(32));
        assert_eq!(g.ball.pos.y, 301.5);
    }

    #[test]
    fn test_floor_contact_terminates() {
        let mut g = game();
        g.start(ms(0));
        let mut summary = None;
        for frame in 1..200u64 {
            for outcome in g.tick(ms(frame * 16)) {
                if let Outcome::Terminated(s) = outcome {
                    summary = Some(s);
                }
            }
            if summary.is_some() {
                break;
            }
        }
        let summary = summary.expect("ball should hit the floor");
        assert_eq!(summary.game, GameKind::Bouncing);
        assert!(g.session.is_over());
        assert!(g.ball.pos.y + BALL_RADIUS >= 600.0);
        assert!(g.tick(ms(10_000)).is_empty());
    }

    #[test]
    fn test_obstacle_collision_terminates() {
        let mut g = game();
        g.start(ms(0));
        g.last_spawn = Some(ms(0));
        g.obstacles.push(FallingObstacle {
            rect: FieldRect::new(390.0, 290.0, 40.0, 20.0),
            speed: 1.0,
        });
        let out = g.tick(ms(16));
        assert!(matches!(out.as_slice(), [Outcome::Terminated(_)]));
    }

    #[test]
    fn test_obstacles_dropped_fifty_below_the_floor() {
        let mut g = game();
        g.start(ms(0));
        g.last_spawn = Some(ms(0));
        for y in [647.0, 648.0] {
            g.obstacles.push(FallingObstacle {
                rect: FieldRect::new(0.0, y, 40.0, OBSTACLE_HEIGHT),
                speed: 2.0,
            });
        }
        g.tick(ms(16));
        assert_eq!(g.obstacles.len(), 1);
        assert_eq!(g.obstacles[0].rect.y, 649.0);
        g.tick(ms(32));
        assert!(g.obstacles.is_empty());
    }

    #[test]
    fn test_survival_adds_a_tenth_per_frame() {
        let mut g = game();
        g.start(ms(0));
        g.last_spawn = Some(ms(0));
        let mut total = 0.0_f64;
        for frame in 1..=20u64 {
            total += SURVIVAL_POINTS;
            let out = g.tick(ms(frame * 16));
            assert_eq!(
                out,
                vec![Outcome::ScoreChanged {
                    score: total.floor() as u32
                }]
            );
            match frame {
                9 => assert_eq!(g.session.score(), 0),
                11 => assert_eq!(g.session.score(), 1),
                _ => {}
            }
        }
    }

    #[test]
    fn test_spawn_interval() {
        let mut g = game();
        g.start(ms(0));
        g.primary(ms(0));
        g.tick(ms(16));
        assert_eq!(g.obstacles.len(), 1);
        g.tick(ms(1999));
        assert_eq!(g.obstacles.len(), 1);
        g.primary(ms(2016));
        g.tick(ms(2016));
        assert_eq!(g.obstacles.len(), 2);
        for o in &g.obstacles {
            assert!(o.rect.width >= 40.0 && o.rect.width < 80.0);
            assert!(o.speed >= 1.0 && o.speed < 3.0);
            assert!(o.rect.x >= 30.0 && o.rect.x < 770.0);
        }
    }

    #[test]
    fn test_paused_frames_change_nothing() {
        let mut g = game();
        g.start(ms(0));
        g.tick(ms(16));
        assert!(g.toggle_pause());
        let (y, vy, score, count) = (g.ball.pos.y, g.ball.vy, g.session.score(), g.obstacles.len());
        for frame in 2..100u64 {
            assert!(g.tick(ms(frame * 16)).is_empty());
        }
        assert_eq!(g.ball.pos.y, y);
        assert_eq!(g.ball.vy, vy);
        assert_eq!(g.session.score(), score);
        assert_eq!(g.obstacles.len(), count);
    }
}
