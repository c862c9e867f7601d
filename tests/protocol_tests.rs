//! Wire protocol shape tests
//!
//! These pin the exact JSON the server emits and accepts, so a client
//! written against these fixtures keeps working across refactors.

use serde_json::json;
use shared::{Direction, Request, Response, RobotState, ScanObject, ScanType, Status};

/// REQUEST SHAPE TESTS
mod request_tests {
    use super::*;

    #[test]
    fn robot_command_request_shape() {
        let request = Request::new("Hal", "forward", vec![json!(5)]);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({"robot": "Hal", "command": "forward", "arguments": [5]})
        );
    }

    #[test]
    fn admin_request_omits_robot_and_arguments() {
        let request = Request::admin("dump");
        let line = serde_json::to_string(&request).unwrap();
        assert_eq!(line, r#"{"command":"dump"}"#);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let parsed: Request = serde_json::from_str(
            r#"{"robot": "Hal", "command": "state", "extra": {"nested": true}}"#,
        )
        .unwrap();
        assert_eq!(parsed.robot.as_deref(), Some("Hal"));
        assert_eq!(parsed.command.as_deref(), Some("state"));
    }

    #[test]
    fn arguments_accept_mixed_types() {
        let parsed: Request = serde_json::from_str(
            r#"{"robot": "Hal", "command": "launch", "arguments": ["Sniper", 5, 3]}"#,
        )
        .unwrap();
        let arguments = parsed.arguments.unwrap();
        assert_eq!(arguments[0], json!("Sniper"));
        assert_eq!(arguments[1], json!(5));
    }
}

/// RESPONSE ENVELOPE TESTS
mod response_tests {
    use super::*;

    fn state_fixture() -> RobotState {
        RobotState {
            position: [3, 8],
            direction: Direction::South,
            shields: 4,
            shots: 2,
            status: Status::Normal,
        }
    }

    #[test]
    fn ok_with_message_and_state() {
        let response = Response::message("Done", state_fixture());
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({
                "result": "OK",
                "data": {"message": "Done"},
                "state": {
                    "position": [3, 8],
                    "direction": "SOUTH",
                    "shields": 4,
                    "shots": 2,
                    "status": "NORMAL",
                }
            })
        );
    }

    #[test]
    fn error_always_nests_message_under_data() {
        for text in [
            "Invalid JSON format",
            "Missing command",
            "Unsupported command",
            "Robot not found",
            "Robot is DEAD and cannot execute commands",
            "Too many of you in this world",
            "No more space in this world",
            "No shots available",
        ] {
            let value = serde_json::to_value(Response::error(text)).unwrap();
            assert_eq!(value["result"], "ERROR");
            assert_eq!(value["data"]["message"], text);
            assert!(value.get("message").is_none());
            assert!(value.get("state").is_none());
        }
    }

    #[test]
    fn dead_status_serializes_uppercase() {
        let mut state = state_fixture();
        state.status = Status::Dead;
        let value = serde_json::to_value(Response::ok(None, Some(state))).unwrap();
        assert_eq!(value["state"]["status"], "DEAD");
    }

    #[test]
    fn response_parses_back_from_wire() {
        let line = r#"{"result":"OK","data":{"message":"Obstructed"},"state":{"position":[0,9],"direction":"NORTH","shields":5,"shots":5,"status":"NORMAL"}}"#;
        let response: Response = serde_json::from_str(line).unwrap();
        assert!(response.is_ok());
        assert_eq!(response.data_message(), Some("Obstructed"));
        assert_eq!(response.state.unwrap().position, [0, 9]);
    }

    #[test]
    fn look_objects_use_generic_type_names() {
        let objects = vec![
            ScanObject {
                direction: Direction::North,
                scan_type: ScanType::Obstacle,
                distance: 2,
            },
            ScanObject {
                direction: Direction::East,
                scan_type: ScanType::Robot,
                distance: 1,
            },
        ];
        let value = serde_json::to_value(&objects).unwrap();
        assert_eq!(
            value,
            json!([
                {"direction": "NORTH", "type": "OBSTACLE", "distance": 2},
                {"direction": "EAST", "type": "ROBOT", "distance": 1},
            ])
        );
    }
}
