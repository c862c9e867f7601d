//! The robot entity: a named, stateful agent owned by the world registry.

use log::info;
use shared::{Direction, Position, RobotState, Status};

/// A robot in the world. Identity (`name`, `make`) is fixed at launch;
/// position, facing, shields, shots and status change as commands execute.
///
/// The world registry is the single owner. Connections refer to robots by
/// name only, so every connection sees the same entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Robot {
    name: String,
    make: String,
    pub position: Position,
    pub direction: Direction,
    pub shields: u32,
    pub shots: u32,
    pub status: Status,
}

impl Robot {
    /// A freshly launched robot: facing NORTH, status NORMAL.
    pub fn new(name: &str, make: &str, position: Position, shields: u32, shots: u32) -> Self {
        Robot {
            name: name.to_string(),
            make: make.to_string(),
            position,
            direction: Direction::North,
            shields,
            shots,
            status: Status::Normal,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn make(&self) -> &str {
        &self.make
    }

    pub fn is_dead(&self) -> bool {
        self.status == Status::Dead
    }

    /// Applies one hit: shields drop by one, and hitting zero is the
    /// one-way transition to DEAD. The robot stays in the registry either
    /// way; only session teardown removes it.
    pub fn take_hit(&mut self) {
        self.shields = self.shields.saturating_sub(1);
        if self.shields == 0 {
            self.status = Status::Dead;
            info!("Robot {} was destroyed at {}", self.name, self.position);
        }
    }

    /// The wire-facing state snapshot.
    pub fn state(&self) -> RobotState {
        RobotState {
            position: self.position.to_array(),
            direction: self.direction,
            shields: self.shields,
            shots: self.shots,
            status: self.status,
        }
    }
}
