//! The shared world: grid bounds, the obstacle set, the robot registry and
//! the randomized placement algorithms.
//!
//! One process owns exactly one `World` instance, passed explicitly to the
//! command processor and every connection handler. The world is the single
//! source of truth for robot state so that every connection can see, scan
//! and target every robot.

use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};
use shared::Position;
use std::collections::HashSet;

use crate::config::WorldConfig;
use crate::obstacle::{Obstacle, ObstacleKind};
use crate::robot::Robot;

/// Retry budget for one random placement, shared by obstacle generation and
/// the open-position search. Exhausting it is not an error: a crowded world
/// just yields fewer obstacles, or no launch position.
const MAX_PLACEMENT_ATTEMPTS: u32 = 100;

/// Why a launch was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchError {
    /// The name is already registered (case-insensitive).
    NameTaken,
    /// No open cell was found within the retry budget.
    NoSpace,
}

pub struct World {
    config: WorldConfig,
    obstacles: Vec<Obstacle>,
    robots: Vec<Robot>,
    rng: StdRng,
}

impl World {
    /// Builds a world from config, generating the requested obstacles with
    /// a randomly seeded generator.
    pub fn new(config: WorldConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Like [`World::new`] but with a caller-supplied generator, so tests
    /// can seed placement deterministically.
    pub fn with_rng(config: WorldConfig, rng: StdRng) -> Self {
        let mut world = World {
            config: config.clone(),
            obstacles: Vec::new(),
            robots: Vec::new(),
            rng,
        };
        world.generate_obstacles(config.num_mountains, config.num_lakes, config.num_pits);
        world
    }

    /// Builds a world from config plus an explicit obstacle layout, the
    /// entry point a persistence layer uses when restoring a saved world.
    /// No additional random obstacles are generated.
    pub fn with_obstacles(config: WorldConfig, obstacles: Vec<Obstacle>) -> Self {
        World {
            config,
            obstacles,
            robots: Vec::new(),
            rng: StdRng::from_entropy(),
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn width(&self) -> u32 {
        self.config.width
    }

    pub fn height(&self) -> u32 {
        self.config.height
    }

    pub fn visibility_range(&self) -> u32 {
        self.config.visibility_range
    }

    pub fn max_shield_strength(&self) -> u32 {
        self.config.max_shield_strength
    }

    pub fn max_shots(&self) -> u32 {
        self.config.max_shots
    }

    pub fn reload_ticks(&self) -> u32 {
        self.config.reload_ticks
    }

    pub fn repair_ticks(&self) -> u32 {
        self.config.repair_ticks
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Strict in-bounds check: `0 <= x < width`, `0 <= y < height`.
    pub fn is_position_valid(&self, position: Position) -> bool {
        position.x >= 0
            && position.x < self.config.width as i32
            && position.y >= 0
            && position.y < self.config.height as i32
    }

    /// True if any movement-blocking obstacle covers the cell.
    pub fn is_position_blocked(&self, position: Position) -> bool {
        self.obstacles
            .iter()
            .any(|o| o.kind.blocks_movement() && o.covers(position))
    }

    /// True if any sight-blocking obstacle covers the cell.
    pub fn blocks_visibility(&self, position: Position) -> bool {
        self.obstacles
            .iter()
            .any(|o| o.kind.blocks_visibility() && o.covers(position))
    }

    pub fn robot_at(&self, position: Position) -> Option<&Robot> {
        self.robots.iter().find(|r| r.position == position)
    }

    /// Case-insensitive name lookup.
    pub fn robot_by_name(&self, name: &str) -> Option<&Robot> {
        self.robots
            .iter()
            .find(|r| r.name().eq_ignore_ascii_case(name))
    }

    pub fn robot_by_name_mut(&mut self, name: &str) -> Option<&mut Robot> {
        self.robots
            .iter_mut()
            .find(|r| r.name().eq_ignore_ascii_case(name))
    }

    pub fn add_robot(&mut self, robot: Robot) {
        self.robots.push(robot);
    }

    /// Removes a robot by name. Returns true if one was removed.
    pub fn remove_robot(&mut self, name: &str) -> bool {
        let before = self.robots.len();
        self.robots.retain(|r| !r.name().eq_ignore_ascii_case(name));
        let removed = self.robots.len() < before;
        if removed {
            info!("Removed robot {} from the world", name);
        }
        removed
    }

    /// Snapshot copy of the registry, safe to iterate while other commands
    /// mutate the world.
    pub fn robots(&self) -> Vec<Robot> {
        self.robots.clone()
    }

    pub fn robot_count(&self) -> usize {
        self.robots.len()
    }

    /// Places an explicit obstacle, bypassing random generation. Used by
    /// the CLI obstacle flag and by restored layouts.
    pub fn add_obstacle(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    /// Launches a robot with the loadout the world config prescribes; the
    /// socket protocol path.
    pub fn launch_robot(&mut self, name: &str, make: &str) -> Result<Robot, LaunchError> {
        let shields = self.config.max_shield_strength;
        let shots = self.config.max_shots;
        self.launch_robot_with_loadout(name, make, shields, shots)
    }

    /// Launches a robot with an explicit loadout; the entry point used by
    /// transports that let the caller choose shields and shots.
    pub fn launch_robot_with_loadout(
        &mut self,
        name: &str,
        make: &str,
        shields: u32,
        shots: u32,
    ) -> Result<Robot, LaunchError> {
        if self.robot_by_name(name).is_some() {
            return Err(LaunchError::NameTaken);
        }

        let position = self
            .find_random_open_position()
            .ok_or(LaunchError::NoSpace)?;

        let robot = Robot::new(name, make, position, shields, shots);
        info!("Launched robot {} ({}) at {}", name, make, position);
        self.robots.push(robot.clone());
        Ok(robot)
    }

    /// Attempt-and-reject search for a cell that is in bounds, unblocked
    /// and unoccupied. Returns None when the retry budget runs out, which
    /// launch must surface as "no more space".
    pub fn find_random_open_position(&mut self) -> Option<Position> {
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let x = self.rng.gen_range(0..self.config.width) as i32;
            let y = self.rng.gen_range(0..self.config.height) as i32;
            let candidate = Position::new(x, y);

            if self.is_position_blocked(candidate) || self.robot_at(candidate).is_some() {
                continue;
            }
            return Some(candidate);
        }
        None
    }

    /// Dense random placement: for each requested obstacle, try random
    /// positions and sizes until one fits fully in bounds without
    /// overlapping what was already placed, or the attempt budget runs out.
    fn generate_obstacles(&mut self, mountains: u32, lakes: u32, pits: u32) {
        let mut occupied: HashSet<Position> = HashSet::new();
        let requests = [
            (ObstacleKind::Mountain, mountains),
            (ObstacleKind::Lake, lakes),
            (ObstacleKind::Pit, pits),
        ];

        for (kind, count) in requests {
            for _ in 0..count {
                match self.place_random_obstacle(kind, &mut occupied) {
                    Some(obstacle) => self.obstacles.push(obstacle),
                    None => {
                        // Not fatal: a crowded world just gets fewer obstacles.
                        warn!(
                            "Could not place {} after {} attempts, skipping",
                            kind.label(),
                            MAX_PLACEMENT_ATTEMPTS
                        );
                    }
                }
            }
        }
    }

    fn place_random_obstacle(
        &mut self,
        kind: ObstacleKind,
        occupied: &mut HashSet<Position>,
    ) -> Option<Obstacle> {
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let x = self.rng.gen_range(0..self.config.width) as i32;
            let y = self.rng.gen_range(0..self.config.height) as i32;
            let width: u32 = self.rng.gen_range(1..=3);
            let height: u32 = self.rng.gen_range(1..=3);

            if x + width as i32 > self.config.width as i32
                || y + height as i32 > self.config.height as i32
            {
                continue;
            }

            let obstacle = Obstacle::new(kind, x, y, width, height);
            let cells = obstacle.cells();
            if cells.iter().any(|c| occupied.contains(c)) {
                continue;
            }

            occupied.extend(cells);
            return Some(obstacle);
        }
        None
    }

    /// World-wide description for the admin `dump` command: dimensions,
    /// obstacle layout and robot states. Also the read surface an external
    /// persistence layer serializes.
    pub fn dump(&self) -> Value {
        let obstacles: Vec<Value> = self
            .obstacles
            .iter()
            .map(|o| {
                json!({
                    "type": o.kind.label(),
                    "x": o.x,
                    "y": o.y,
                    "width": o.width,
                    "height": o.height,
                })
            })
            .collect();

        let robots: Vec<Value> = self
            .robots
            .iter()
            .map(|r| {
                json!({
                    "name": r.name(),
                    "make": r.make(),
                    "state": r.state(),
                })
            })
            .collect();

        json!({
            "width": self.config.width,
            "height": self.config.height,
            "visibilityRange": self.config.visibility_range,
            "obstacles": obstacles,
            "robots": robots,
        })
    }
}
