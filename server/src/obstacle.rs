//! Obstacles: fixed rectangular blockers placed in the grid at world
//! generation time.
//!
//! The set of kinds is closed, so a kind tag indexing a constant behavior
//! table replaces any per-kind polymorphism.

use serde::{Deserialize, Serialize};
use shared::Position;

/// The closed set of obstacle kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Mountain,
    Lake,
    Pit,
    Mine,
}

/// Per-kind behavior flags. Server policy, not physics: today every kind
/// blocks both movement and sight, but the table is the single place that
/// would change.
struct KindTraits {
    label: &'static str,
    blocks_movement: bool,
    blocks_visibility: bool,
}

const KIND_TRAITS: [KindTraits; 4] = [
    KindTraits {
        label: "Mountain",
        blocks_movement: true,
        blocks_visibility: true,
    },
    KindTraits {
        label: "Lake",
        blocks_movement: true,
        blocks_visibility: true,
    },
    KindTraits {
        label: "Pit",
        blocks_movement: true,
        blocks_visibility: true,
    },
    KindTraits {
        label: "Mine",
        blocks_movement: true,
        blocks_visibility: true,
    },
];

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 4] = [
        ObstacleKind::Mountain,
        ObstacleKind::Lake,
        ObstacleKind::Pit,
        ObstacleKind::Mine,
    ];

    fn traits(self) -> &'static KindTraits {
        &KIND_TRAITS[self as usize]
    }

    pub fn label(self) -> &'static str {
        self.traits().label
    }

    pub fn blocks_movement(self) -> bool {
        self.traits().blocks_movement
    }

    pub fn blocks_visibility(self) -> bool {
        self.traits().blocks_visibility
    }
}

/// An axis-aligned obstacle occupying `width x height` cells with its
/// bottom-left corner at `(x, y)`. Immutable for the life of the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Obstacle {
    pub fn new(kind: ObstacleKind, x: i32, y: i32, width: u32, height: u32) -> Self {
        Obstacle {
            kind,
            x,
            y,
            width,
            height,
        }
    }

    /// True if this obstacle's bounding box covers the cell.
    pub fn covers(&self, position: Position) -> bool {
        position.x >= self.x
            && position.x < self.x + self.width as i32
            && position.y >= self.y
            && position.y < self.y + self.height as i32
    }

    /// Every cell inside the bounding box.
    pub fn cells(&self) -> Vec<Position> {
        let mut cells = Vec::with_capacity((self.width * self.height) as usize);
        for dx in 0..self.width as i32 {
            for dy in 0..self.height as i32 {
                cells.push(Position::new(self.x + dx, self.y + dy));
            }
        }
        cells
    }
}
