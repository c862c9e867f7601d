//! The player-facing command set: one handler per verb, dispatched through
//! a closed enum.
//!
//! Every handler takes the world, the addressed robot's name and the raw
//! JSON arguments, and returns either a success envelope or a
//! [`CommandError`]. A failed command leaves the world exactly as it was.

use serde_json::{json, Value};
use shared::Response;
use std::fmt;

use crate::movement::MovementValidator;
use crate::robot::Robot;
use crate::vision::VisionFinder;
use crate::world::{LaunchError, World};

/// Command failure taxonomy. Protocol errors are malformed requests,
/// validation errors are bad arguments, domain errors are legal requests
/// the world refuses. All become the same ERROR envelope on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Protocol(String),
    Validation(String),
    Domain(String),
}

impl CommandError {
    pub fn protocol(message: impl Into<String>) -> Self {
        CommandError::Protocol(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CommandError::Validation(message.into())
    }

    pub fn domain(message: impl Into<String>) -> Self {
        CommandError::Domain(message.into())
    }

    pub fn message(&self) -> &str {
        match self {
            CommandError::Protocol(m) | CommandError::Validation(m) | CommandError::Domain(m) => m,
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for CommandError {}

/// The closed set of robot-addressed verbs. Admin verbs (`dump`, `robots`)
/// and `exit` are handled before dispatch reaches this table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Launch,
    Look,
    State,
    Forward,
    Back,
    Turn,
    Fire,
    Reload,
    Repair,
}

impl Verb {
    pub fn parse(command: &str) -> Option<Verb> {
        match command {
            "launch" => Some(Verb::Launch),
            "look" => Some(Verb::Look),
            "state" => Some(Verb::State),
            "forward" => Some(Verb::Forward),
            "back" => Some(Verb::Back),
            "turn" => Some(Verb::Turn),
            "fire" => Some(Verb::Fire),
            "reload" => Some(Verb::Reload),
            "repair" => Some(Verb::Repair),
            _ => None,
        }
    }
}

/// Executes one verb against the world. The caller has already resolved the
/// robot name and applied the DEAD gate.
pub fn execute(
    world: &mut World,
    verb: Verb,
    robot_name: &str,
    arguments: &[Value],
) -> Result<Response, CommandError> {
    match verb {
        Verb::Launch => launch(world, robot_name, arguments),
        Verb::Look => look(world, robot_name),
        Verb::State => state(world, robot_name),
        Verb::Forward => step_move(world, robot_name, arguments, false),
        Verb::Back => step_move(world, robot_name, arguments, true),
        Verb::Turn => turn(world, robot_name, arguments),
        Verb::Fire => fire(world, robot_name),
        Verb::Reload => reload(world, robot_name),
        Verb::Repair => repair(world, robot_name),
    }
}

/// Admin: the full world description, no robot required.
pub fn dump(world: &World) -> Response {
    Response::ok(Some(world.dump()), None)
}

/// Admin: every robot's name and state, no robot required.
pub fn robots(world: &World) -> Response {
    let robots: Vec<Value> = world
        .robots()
        .iter()
        .map(|r| {
            json!({
                "name": r.name(),
                "make": r.make(),
                "state": r.state(),
            })
        })
        .collect();
    Response::ok(Some(json!({ "robots": robots })), None)
}

fn launch(world: &mut World, name: &str, arguments: &[Value]) -> Result<Response, CommandError> {
    let make = match arguments.first() {
        None => {
            return Err(CommandError::validation("Launch requires arguments: [make]"));
        }
        Some(value) => value
            .as_str()
            .ok_or_else(|| CommandError::validation("Launch requires make"))?,
    };

    let robot = world.launch_robot(name, make).map_err(|e| match e {
        LaunchError::NameTaken => CommandError::domain("Too many of you in this world"),
        LaunchError::NoSpace => CommandError::domain("No more space in this world"),
    })?;

    Ok(Response::ok(
        Some(json!({ "position": robot.position.to_array() })),
        Some(robot.state()),
    ))
}

fn look(world: &mut World, name: &str) -> Result<Response, CommandError> {
    let robot = resolve(world, name)?;
    let objects = VisionFinder::new(world).scan(robot);

    Ok(Response::ok(
        Some(json!({
            "objects": objects,
            "visibilityRange": world.visibility_range(),
        })),
        Some(robot.state()),
    ))
}

fn state(world: &mut World, name: &str) -> Result<Response, CommandError> {
    let robot = resolve(world, name)?;
    Ok(Response::ok(None, Some(robot.state())))
}

fn step_move(
    world: &mut World,
    name: &str,
    arguments: &[Value],
    reverse: bool,
) -> Result<Response, CommandError> {
    let steps = parse_steps(arguments)?;

    let plan = {
        let robot = resolve(world, name)?;
        let heading = if reverse {
            robot.direction.opposite()
        } else {
            robot.direction
        };
        MovementValidator::new(world).plan(robot, heading, steps)
    };

    let robot = resolve_mut(world, name)?;
    robot.position = plan.destination;
    Ok(Response::message(plan.outcome.message(), robot.state()))
}

fn turn(world: &mut World, name: &str, arguments: &[Value]) -> Result<Response, CommandError> {
    let side = arguments
        .first()
        .and_then(Value::as_str)
        .ok_or_else(|| CommandError::validation("Turn requires direction argument"))?;

    let robot = resolve_mut(world, name)?;
    robot.direction = match side.to_lowercase().as_str() {
        "left" => robot.direction.left(),
        "right" => robot.direction.right(),
        _ => {
            return Err(CommandError::validation(
                "Invalid direction. Must be 'left' or 'right'",
            ));
        }
    };

    Ok(Response::message("Done", robot.state()))
}

/// What a shot hit, decided before any state is touched.
enum ShotResult {
    Miss,
    Obstacle,
    Robot(String),
}

fn fire(world: &mut World, name: &str) -> Result<Response, CommandError> {
    let (origin, facing, shots) = {
        let robot = resolve(world, name)?;
        (robot.position, robot.direction, robot.shots)
    };

    // Checked before any shot is consumed.
    if shots == 0 {
        return Err(CommandError::domain("No shots available"));
    }

    let mut result = ShotResult::Miss;
    let mut current = origin;
    for _ in 1..=world.visibility_range() {
        current = current.step(facing);
        if !world.is_position_valid(current) {
            break;
        }
        if world.is_position_blocked(current) {
            result = ShotResult::Obstacle;
            break;
        }
        if let Some(target) = world.robot_at(current) {
            if !target.name().eq_ignore_ascii_case(name) {
                result = ShotResult::Robot(target.name().to_string());
                break;
            }
        }
    }

    let message = match &result {
        ShotResult::Miss => "Miss",
        ShotResult::Obstacle => "Hit Obstacle",
        ShotResult::Robot(_) => "Hit",
    };

    if let ShotResult::Robot(target_name) = &result {
        if let Some(target) = world.robot_by_name_mut(target_name) {
            target.take_hit();
        }
    }

    let shooter = resolve_mut(world, name)?;
    shooter.shots -= 1;
    Ok(Response::message(message, shooter.state()))
}

fn reload(world: &mut World, name: &str) -> Result<Response, CommandError> {
    let max_shots = world.max_shots();
    let robot = resolve_mut(world, name)?;
    robot.shots = max_shots;
    Ok(Response::message("Done", robot.state()))
}

fn repair(world: &mut World, name: &str) -> Result<Response, CommandError> {
    let max_shields = world.max_shield_strength();
    let robot = resolve_mut(world, name)?;
    robot.shields = max_shields;
    Ok(Response::message("Done", robot.state()))
}

/// Steps argument: defaults to 1, must be a non-negative integer.
fn parse_steps(arguments: &[Value]) -> Result<u32, CommandError> {
    match arguments.first() {
        None => Ok(1),
        Some(value) => value
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| CommandError::validation("Steps must be a number")),
    }
}

fn resolve<'w>(world: &'w World, name: &str) -> Result<&'w Robot, CommandError> {
    world
        .robot_by_name(name)
        .ok_or_else(|| CommandError::domain("Robot not found"))
}

fn resolve_mut<'w>(world: &'w mut World, name: &str) -> Result<&'w mut Robot, CommandError> {
    world
        .robot_by_name_mut(name)
        .ok_or_else(|| CommandError::domain("Robot not found"))
}
