//! Request parsing and dispatch against the shared world.
//!
//! Each connection task hands raw lines to a single shared
//! [`CommandProcessor`]. The processor parses the line, resolves the robot,
//! applies the DEAD gate, dispatches to the command table, and always comes
//! back with a response envelope. The world lock is held for the whole of a
//! command, so commands from different connections never interleave.

use log::{debug, warn};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

use shared::{Request, Response};

use crate::commands::{self, Verb};
use crate::world::World;

/// What the connection loop should do with a processed command.
#[derive(Debug)]
pub struct ProcessOutcome {
    pub response: Response,
    /// Set when the command launched a robot, so the connection can claim
    /// ownership for later cleanup.
    pub launched: Option<String>,
    /// Set by `exit`: send the response, then close the connection.
    pub disconnect: bool,
}

impl ProcessOutcome {
    fn reply(response: Response) -> Self {
        ProcessOutcome {
            response,
            launched: None,
            disconnect: false,
        }
    }
}

/// Owns the world behind an async mutex and turns request lines into
/// response envelopes.
pub struct CommandProcessor {
    world: Arc<Mutex<World>>,
}

impl CommandProcessor {
    pub fn new(world: Arc<Mutex<World>>) -> Self {
        CommandProcessor { world }
    }

    pub fn world(&self) -> Arc<Mutex<World>> {
        Arc::clone(&self.world)
    }

    /// Parses one raw line and executes it. A line that is not valid JSON
    /// still gets a well-formed ERROR envelope back.
    pub async fn process(&self, line: &str) -> ProcessOutcome {
        match serde_json::from_str::<Request>(line) {
            Ok(request) => self.submit(request).await,
            Err(e) => {
                debug!("Rejected malformed request line: {}", e);
                ProcessOutcome::reply(Response::error("Invalid JSON format"))
            }
        }
    }

    /// Executes an already-parsed request.
    pub async fn submit(&self, request: Request) -> ProcessOutcome {
        let command = match request.command.as_deref() {
            Some(c) if !c.trim().is_empty() => c.trim().to_lowercase(),
            _ => return ProcessOutcome::reply(Response::error("Missing command")),
        };
        let arguments: Vec<Value> = request.arguments.unwrap_or_default();

        let mut world = self.world.lock().await;

        // Admin commands are not addressed to a robot.
        match command.as_str() {
            "dump" => return ProcessOutcome::reply(commands::dump(&world)),
            "robots" => return ProcessOutcome::reply(commands::robots(&world)),
            _ => {}
        }

        let robot_name = match request.robot.as_deref() {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => return ProcessOutcome::reply(Response::error("Robot not found")),
        };

        // Exit always closes the connection, whether or not the named robot
        // was ever launched.
        if command == "exit" {
            let response = match world.robot_by_name(&robot_name) {
                Some(robot) => Response::message("Done", robot.state()),
                None => Response::error("Robot not found"),
            };
            return ProcessOutcome {
                response,
                launched: None,
                disconnect: true,
            };
        }

        // A destroyed robot refuses everything, including re-launch under
        // the same name.
        if let Some(robot) = world.robot_by_name(&robot_name) {
            if robot.is_dead() {
                return ProcessOutcome::reply(Response::error(
                    "Robot is DEAD and cannot execute commands",
                ));
            }
        }

        let verb = match Verb::parse(&command) {
            Some(verb) => verb,
            None => {
                warn!("Unsupported command '{}' from robot {}", command, robot_name);
                return ProcessOutcome::reply(Response::error("Unsupported command"));
            }
        };

        if verb != Verb::Launch && world.robot_by_name(&robot_name).is_none() {
            return ProcessOutcome::reply(Response::error("Robot not found"));
        }

        match commands::execute(&mut world, verb, &robot_name, &arguments) {
            Ok(response) => ProcessOutcome {
                response,
                launched: (verb == Verb::Launch).then(|| robot_name),
                disconnect: false,
            },
            Err(error) => ProcessOutcome::reply(Response::error(error.message())),
        }
    }

    /// Removes the robots a closing connection launched. Dead robots are
    /// cleaned up here too.
    pub async fn release_robots(&self, names: &[String]) {
        let mut world = self.world.lock().await;
        for name in names {
            world.remove_robot(name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::robot::Robot;
    use serde_json::json;
    use shared::Position;

    fn processor(width: u32, height: u32) -> CommandProcessor {
        let world = World::new(WorldConfig::sized(width, height));
        CommandProcessor::new(Arc::new(Mutex::new(world)))
    }

    #[tokio::test]
    async fn test_malformed_json_yields_error_envelope() {
        let processor = processor(10, 10);
        let outcome = processor.process("this is not json").await;
        assert!(outcome.response.is_error());
        assert_eq!(outcome.response.data_message(), Some("Invalid JSON format"));
        assert!(!outcome.disconnect);
    }

    #[tokio::test]
    async fn test_missing_command_field() {
        let processor = processor(10, 10);
        let outcome = processor.process(r#"{"robot": "Hal"}"#).await;
        assert_eq!(outcome.response.data_message(), Some("Missing command"));
    }

    #[tokio::test]
    async fn test_empty_command_counts_as_missing() {
        let processor = processor(10, 10);
        let outcome = processor
            .process(r#"{"robot": "Hal", "command": "  "}"#)
            .await;
        assert_eq!(outcome.response.data_message(), Some("Missing command"));
    }

    #[tokio::test]
    async fn test_command_is_case_insensitive() {
        let processor = processor(10, 10);
        let outcome = processor
            .process(r#"{"robot": "Hal", "command": "LAUNCH", "arguments": ["Sniper"]}"#)
            .await;
        assert!(outcome.response.is_ok());
        assert_eq!(outcome.launched.as_deref(), Some("Hal"));
    }

    #[tokio::test]
    async fn test_unsupported_command() {
        let processor = processor(10, 10);
        processor
            .process(r#"{"robot": "Hal", "command": "launch", "arguments": ["Sniper"]}"#)
            .await;

        let outcome = processor
            .process(r#"{"robot": "Hal", "command": "teleport"}"#)
            .await;
        assert_eq!(outcome.response.data_message(), Some("Unsupported command"));
    }

    #[tokio::test]
    async fn test_command_for_unlaunched_robot() {
        let processor = processor(10, 10);
        let outcome = processor
            .process(r#"{"robot": "Ghost", "command": "state"}"#)
            .await;
        assert_eq!(outcome.response.data_message(), Some("Robot not found"));
    }

    #[tokio::test]
    async fn test_missing_robot_field() {
        let processor = processor(10, 10);
        let outcome = processor.process(r#"{"command": "state"}"#).await;
        assert_eq!(outcome.response.data_message(), Some("Robot not found"));
    }

    #[tokio::test]
    async fn test_launch_then_state_round_trip() {
        let processor = processor(10, 10);
        let launch = processor
            .submit(Request::new("Hal", "launch", vec![json!("Sniper")]))
            .await;
        assert!(launch.response.is_ok());

        let state = processor.submit(Request::simple("Hal", "state")).await;
        assert!(state.response.is_ok());
        assert!(state.response.state.is_some());
        assert!(state.launched.is_none());
    }

    #[tokio::test]
    async fn test_dead_robot_is_gated_before_verb_parse() {
        let processor = processor(10, 10);
        {
            let world = processor.world();
            let mut world = world.lock().await;
            let mut robot = Robot::new("Hal", "Tank", Position::new(5, 5), 1, 0);
            robot.take_hit();
            world.add_robot(robot);
        }

        // Even an unknown verb reports the DEAD error for a dead robot.
        let outcome = processor
            .process(r#"{"robot": "Hal", "command": "teleport"}"#)
            .await;
        assert_eq!(
            outcome.response.data_message(),
            Some("Robot is DEAD and cannot execute commands")
        );

        // And a re-launch under the dead name is refused the same way.
        let relaunch = processor
            .submit(Request::new("Hal", "launch", vec![json!("Sniper")]))
            .await;
        assert_eq!(
            relaunch.response.data_message(),
            Some("Robot is DEAD and cannot execute commands")
        );
    }

    #[tokio::test]
    async fn test_exit_disconnects_with_ok() {
        let processor = processor(10, 10);
        processor
            .submit(Request::new("Hal", "launch", vec![json!("Sniper")]))
            .await;

        let outcome = processor.submit(Request::simple("Hal", "exit")).await;
        assert!(outcome.response.is_ok());
        assert!(outcome.disconnect);
    }

    #[tokio::test]
    async fn test_exit_for_unknown_robot_still_disconnects() {
        let processor = processor(10, 10);
        let outcome = processor.submit(Request::simple("Ghost", "exit")).await;
        assert!(outcome.response.is_error());
        assert!(outcome.disconnect);
    }

    #[tokio::test]
    async fn test_release_robots_removes_owned_names() {
        let processor = processor(10, 10);
        processor
            .submit(Request::new("Hal", "launch", vec![json!("Sniper")]))
            .await;
        processor
            .submit(Request::new("Sal", "launch", vec![json!("Tank")]))
            .await;

        processor.release_robots(&["Hal".to_string()]).await;

        let world = processor.world();
        let world = world.lock().await;
        assert!(world.robot_by_name("Hal").is_none());
        assert!(world.robot_by_name("Sal").is_some());
    }

    #[tokio::test]
    async fn test_admin_dump_needs_no_robot() {
        let processor = processor(7, 9);
        let outcome = processor.process(r#"{"command": "dump"}"#).await;
        assert!(outcome.response.is_ok());
        let data = outcome.response.data.unwrap();
        assert_eq!(data["width"], 7);
        assert_eq!(data["height"], 9);
    }

    #[tokio::test]
    async fn test_admin_robots_lists_launched() {
        let processor = processor(10, 10);
        processor
            .submit(Request::new("Hal", "launch", vec![json!("Sniper")]))
            .await;

        let outcome = processor.process(r#"{"command": "robots"}"#).await;
        let data = outcome.response.data.unwrap();
        assert_eq!(data["robots"].as_array().unwrap().len(), 1);
        assert_eq!(data["robots"][0]["name"], "Hal");
    }
}
