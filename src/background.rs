//! Decorative drifting orbs on the home screen. Clicking an orb bursts it into
//! short-lived particles. Nothing here touches scores or sessions.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::prelude::*;
use ratatui::widgets::canvas::Canvas;
use ratatui::widgets::*;

use crate::geometry::Point;
use crate::input::Viewport;
use crate::ui::hud;

const ORB_COUNT: usize = 30;
const ORB_RADIUS: f64 = 8.0;
const BURST_SIZE: usize = 20;
const PARTICLE_RADIUS: f64 = 2.0;
const PARTICLE_LIFE: u32 = 60; // frames
// Field units per terminal cell; cells are roughly twice as tall as wide.
const CELL_WIDTH: f64 = 8.0;
const CELL_HEIGHT: f64 = 16.0;

#[derive(Debug, Clone)]
struct Orb {
    pos: Point,
    dx: f64,
    dy: f64,
}

#[derive(Debug, Clone)]
struct Particle {
    pos: Point,
    dx: f64,
    dy: f64,
    life: u32,
}

pub struct ParticleField {
    viewport: Viewport,
    rng: StdRng,
    orbs: Vec<Orb>,
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn new(width: f64, height: f64) -> Self {
        Self::with_rng(width, height, StdRng::from_entropy())
    }

    pub fn with_rng(width: f64, height: f64, rng: StdRng) -> Self {
        let mut field = Self {
            viewport: Viewport::new(width, height),
            rng,
            orbs: Vec::with_capacity(ORB_COUNT),
            particles: Vec::new(),
        };
        field.fill();
        field
    }

    fn fill(&mut self) {
        while self.orbs.len() < ORB_COUNT {
            let orb = Orb {
                pos: Point::new(
                    self.rng.gen_range(0.0..1.0) * self.viewport.width,
                    self.rng.gen_range(0.0..1.0) * self.viewport.height,
                ),
                dx: self.rng.gen_range(-1.0..1.0),
                dy: self.rng.gen_range(-1.0..1.0),
            };
            self.orbs.push(orb);
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Updates the bounds and pulls every orb back inside them, so none is
    /// left stranded beyond an edge it can never bounce back from.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.width = width;
        self.viewport.height = height;
        for orb in &mut self.orbs {
            orb.pos.x = orb.pos.x.min(width - ORB_RADIUS).max(ORB_RADIUS);
            orb.pos.y = orb.pos.y.min(height - ORB_RADIUS).max(ORB_RADIUS);
        }
    }

    /// Scatters a fresh set of orbs over the current bounds.
    fn reseed(&mut self) {
        self.orbs.clear();
        self.fill();
    }

    /// Advances orbs and particles by one frame.
    pub fn update(&mut self) {
        let (w, h) = (self.viewport.width, self.viewport.height);
        for orb in &mut self.orbs {
            orb.pos.x += orb.dx;
            orb.pos.y += orb.dy;
            if orb.pos.x + ORB_RADIUS > w || orb.pos.x - ORB_RADIUS < 0.0 {
                orb.dx = -orb.dx;
            }
            if orb.pos.y + ORB_RADIUS > h || orb.pos.y - ORB_RADIUS < 0.0 {
                orb.dy = -orb.dy;
            }
        }

        self.particles.retain_mut(|p| {
            p.pos.x += p.dx;
            p.pos.y += p.dy;
            p.life = p.life.saturating_sub(1);
            p.life > 0
        });

        if self.orbs.is_empty() && self.particles.is_empty() {
            self.fill();
        }
    }

    /// Bursts the newest orb under `at`. Returns whether one was hit.
    pub fn click(&mut self, at: Point) -> bool {
        let Some(idx) = self
            .orbs
            .iter()
            .rposition(|orb| orb.pos.distance(at) < ORB_RADIUS)
        else {
            return false;
        };
        let orb = self.orbs.remove(idx);
        for _ in 0..BURST_SIZE {
            let particle = Particle {
                pos: orb.pos,
                dx: self.rng.gen_range(-3.0..3.0),
                dy: self.rng.gen_range(-3.0..3.0),
                life: PARTICLE_LIFE,
            };
            self.particles.push(particle);
        }
        log::trace!("burst orb at ({:.0}, {:.0})", orb.pos.x, orb.pos.y);
        true
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(60, 60, 80)))
            .title(" ✨ Pop the orbs ")
            .title_style(Style::default().fg(Color::Rgb(120, 120, 140)));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let width = inner.width as f64 * CELL_WIDTH;
        let height = inner.height as f64 * CELL_HEIGHT;
        if width != self.viewport.width || height != self.viewport.height {
            let first_draw = self.viewport.area().width == 0;
            self.resize(width, height);
            if first_draw {
                self.reseed();
            }
        }
        self.viewport.set_area(inner);

        let (w, h) = (self.viewport.width, self.viewport.height);
        let orbs = &self.orbs;
        let particles = &self.particles;
        let canvas = Canvas::default()
            .background_color(hud::FIELD_BG)
            .x_bounds([0.0, w])
            .y_bounds([0.0, h])
            .paint(move |ctx| {
                for orb in orbs {
                    ctx.draw(&hud::circle_shape(orb.pos, ORB_RADIUS, h, Color::White));
                }
                for p in particles {
                    let fade = (p.life * 255 / PARTICLE_LIFE) as u8;
                    ctx.draw(&hud::circle_shape(
                        p.pos,
                        PARTICLE_RADIUS,
                        h,
                        Color::Rgb(fade, fade, fade),
                    ));
                }
            });
        frame.render_widget(canvas, inner);
    }
}
