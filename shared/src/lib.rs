//! Protocol types shared by the Robot Worlds server and any client or
//! alternate transport.
//!
//! The wire protocol is newline-delimited UTF-8 JSON: one [`Request`] per
//! line in, one [`Response`] per line out. Every transport (the TCP server,
//! an HTTP mirror, a test harness) submits the same request shape and gets
//! the same envelope back, so everything here is plain serde data with no
//! I/O attached.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A cardinal facing on the grid.
///
/// NORTH is +y, SOUTH is -y, EAST is +x, WEST is -x. Movement, vision and
/// fire all use this one convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// All four directions in scan order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Unit step vector for this direction.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::East => (1, 0),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
        }
    }

    /// The direction after a right (clockwise) turn.
    pub fn right(self) -> Direction {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }

    /// The direction after a left (counter-clockwise) turn.
    pub fn left(self) -> Direction {
        match self {
            Direction::North => Direction::West,
            Direction::West => Direction::South,
            Direction::South => Direction::East,
            Direction::East => Direction::North,
        }
    }

    /// The reverse direction, used by the `back` command.
    pub fn opposite(self) -> Direction {
        self.right().right()
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::North => "NORTH",
            Direction::East => "EAST",
            Direction::South => "SOUTH",
            Direction::West => "WEST",
        };
        write!(f, "{}", name)
    }
}

/// A robot's life-cycle flag. DEAD is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Normal,
    Dead,
}

/// A grid cell. Coordinates may go negative while stepping off-world;
/// the world's bounds check decides what is actually inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// The neighboring cell one step in the given direction.
    pub fn step(self, direction: Direction) -> Position {
        let (dx, dy) = direction.offset();
        Position {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Wire form: `[x, y]`.
    pub fn to_array(self) -> [i32; 2] {
        [self.x, self.y]
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Snapshot of a robot's externally visible state, attached to most
/// successful responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotState {
    pub position: [i32; 2],
    pub direction: Direction,
    pub shields: u32,
    pub shots: u32,
    pub status: Status,
}

/// What a single look scan found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScanType {
    Obstacle,
    Robot,
    Edge,
}

/// One entry in the `look` result: the first thing seen in a direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanObject {
    pub direction: Direction,
    #[serde(rename = "type")]
    pub scan_type: ScanType,
    pub distance: u32,
}

/// One client request. `robot` and `arguments` are optional because the
/// admin commands (`dump`, `robots`) take neither.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub robot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<Value>>,
}

impl Request {
    /// A robot-addressed request with arguments.
    pub fn new(robot: &str, command: &str, arguments: Vec<Value>) -> Self {
        Request {
            robot: Some(robot.to_string()),
            command: Some(command.to_string()),
            arguments: Some(arguments),
        }
    }

    /// A robot-addressed request without arguments.
    pub fn simple(robot: &str, command: &str) -> Self {
        Request {
            robot: Some(robot.to_string()),
            command: Some(command.to_string()),
            arguments: None,
        }
    }

    /// An admin request (`dump`, `robots`).
    pub fn admin(command: &str) -> Self {
        Request {
            robot: None,
            command: Some(command.to_string()),
            arguments: None,
        }
    }
}

/// The response envelope: `{"result": "OK"|"ERROR", "data": ..., "state": ...}`.
///
/// Errors always use the nested shape `{"result":"ERROR","data":{"message":...}}`
/// on every path; there is no top-level `message` variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub result: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<RobotState>,
}

pub const RESULT_OK: &str = "OK";
pub const RESULT_ERROR: &str = "ERROR";

impl Response {
    pub fn ok(data: Option<Value>, state: Option<RobotState>) -> Self {
        Response {
            result: RESULT_OK.to_string(),
            data,
            state,
        }
    }

    /// Success with a `data.message` string, the shape used by movement,
    /// turn, fire, reload and repair.
    pub fn message(message: &str, state: RobotState) -> Self {
        Response::ok(
            Some(serde_json::json!({ "message": message })),
            Some(state),
        )
    }

    pub fn error(message: impl Into<String>) -> Self {
        Response {
            result: RESULT_ERROR.to_string(),
            data: Some(serde_json::json!({ "message": message.into() })),
            state: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.result == RESULT_OK
    }

    pub fn is_error(&self) -> bool {
        self.result == RESULT_ERROR
    }

    /// The `data.message` string, if any.
    pub fn data_message(&self) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(|d| d.get("message"))
            .and_then(Value::as_str)
    }
}
