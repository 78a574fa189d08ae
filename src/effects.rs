//! Decorative particles and the drag-scroll pointer trail.

use std::collections::VecDeque;

use rand::Rng;

use crate::assets::Asset;
use crate::geometry::{Flip, Point, Rect, Rgba};
use crate::scene::{Frame, TextureKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Particle {
    pub position: Point,
    pub velocity: Point,
    pub life: u32,
    pub max_life: u32,
    pub size: i32,
}

#[derive(Debug)]
pub struct ParticleField {
    bounds: Rect,
    spawn_chance: f64,
    particles: Vec<Particle>,
}

impl ParticleField {
    pub const fn new(bounds: Rect, spawn_chance: f64) -> Self {
        Self {
            bounds,
            spawn_chance,
            particles: Vec::new(),
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Maybe spawn one particle, then move and age the rest.
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if rng.random_bool(self.spawn_chance) {
            let life = rng.random_range(60..120);
            self.particles.push(Particle {
                position: Point::new(
                    rng.random_range(self.bounds.x..self.bounds.right().max(self.bounds.x + 1)),
                    rng.random_range(self.bounds.y..self.bounds.bottom().max(self.bounds.y + 1)),
                ),
                velocity: Point::new(rng.random_range(-1..=1), rng.random_range(-1..=1)),
                life,
                max_life: life,
                size: rng.random_range(10..30),
            });
        }
        for p in &mut self.particles {
            p.position.x += p.velocity.x;
            p.position.y += p.velocity.y;
            p.life = p.life.saturating_sub(1);
        }
        self.particles.retain(|p| p.life > 0);
    }

    pub fn compose(&self, frame: &mut Frame) {
        for p in &self.particles {
            #[allow(clippy::cast_possible_truncation)]
            let alpha = (255 * p.life / p.max_life.max(1)) as u8;
            frame.textured(
                TextureKey::Asset(Asset::Orb),
                Rect::new(p.position.x, p.position.y, p.size, p.size),
                Flip::NONE,
                Rgba::WHITE.with_alpha(alpha),
            );
        }
    }
}

/// Ghost copies of the pointer left behind while drag-scrolling.
#[derive(Debug)]
pub struct PointerTrail {
    capacity: usize,
    points: VecDeque<Point>,
    color: Rgba,
}

impl PointerTrail {
    pub fn new(capacity: usize, color: Rgba) -> Self {
        Self {
            capacity,
            points: VecDeque::with_capacity(capacity),
            color,
        }
    }

    pub fn push(&mut self, p: Point) {
        if self.capacity == 0 {
            return;
        }
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(p);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Older ghosts are drawn smaller.
    #[allow(clippy::cast_precision_loss)]
    pub fn compose(&self, frame: &mut Frame) {
        let n = self.points.len().max(1) as f32;
        for (i, p) in self.points.iter().enumerate() {
            let radius = 6.0 + 14.0 * (i + 1) as f32 / n;
            frame.circle(*p, radius, self.color);
        }
    }
}
