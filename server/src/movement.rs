//! Stepwise collision-aware movement used by the forward and back commands.

use shared::{Direction, Position};

use crate::robot::Robot;
use crate::world::World;

/// Whether the full requested distance was covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Done,
    Obstructed,
}

impl MoveOutcome {
    pub fn message(self) -> &'static str {
        match self {
            MoveOutcome::Done => "Done",
            MoveOutcome::Obstructed => "Obstructed",
        }
    }
}

/// The planned result of a move: where the robot ends up and whether it got
/// the whole way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovePlan {
    pub destination: Position,
    pub outcome: MoveOutcome,
}

/// Plans moves one cell at a time against the world's bounds, obstacles and
/// other robots. Planning is a pure read; the caller commits the resulting
/// position, so a rejected move never leaves partial state behind.
pub struct MovementValidator<'a> {
    world: &'a World,
}

impl<'a> MovementValidator<'a> {
    pub fn new(world: &'a World) -> Self {
        MovementValidator { world }
    }

    /// Advances from the robot's position along `heading`, stopping before
    /// the first cell that is out of bounds, obstacle-blocked, or occupied
    /// by another robot. The destination is the last cell successfully
    /// entered, possibly the origin.
    pub fn plan(&self, robot: &Robot, heading: Direction, steps: u32) -> MovePlan {
        let mut current = robot.position;

        for _ in 0..steps {
            let next = current.step(heading);

            if !self.world.is_position_valid(next)
                || self.world.is_position_blocked(next)
                || self.occupied_by_other(next, robot)
            {
                return MovePlan {
                    destination: current,
                    outcome: MoveOutcome::Obstructed,
                };
            }
            current = next;
        }

        MovePlan {
            destination: current,
            outcome: MoveOutcome::Done,
        }
    }

    fn occupied_by_other(&self, position: Position, mover: &Robot) -> bool {
        self.world
            .robot_at(position)
            .map(|r| !r.name().eq_ignore_ascii_case(mover.name()))
            .unwrap_or(false)
    }
}
