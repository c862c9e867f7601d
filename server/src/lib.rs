//! # Robot Worlds Server Library
//!
//! This library provides the authoritative server for the Robot Worlds
//! game. It owns the one true copy of the world, processes client commands,
//! and answers every request with a JSON response envelope.
//!
//! ## Core Responsibilities
//!
//! ### Authoritative World
//! The world is a bounded grid holding obstacles and robots. All game rule
//! decisions happen here: placement at launch, collision during movement,
//! line-of-sight for looking and firing, and the one-way transition to DEAD
//! when a robot's shields run out.
//!
//! ### Command Processing
//! Clients speak newline-delimited JSON over TCP. Each line is parsed into
//! a request, resolved against the robot registry, and dispatched to a
//! handler. Malformed input never kills a connection; it gets an ERROR
//! envelope like everything else.
//!
//! ### Connection Lifecycle
//! Every connection runs in its own tokio task. Robots launched on a
//! connection belong to it and leave the world when the connection does,
//! whether through an explicit `exit` or a dropped socket.
//!
//! ## Architecture Design
//!
//! The world sits behind a single async mutex. A command holds the lock
//! from validation through mutation, so concurrent clients always observe
//! whole commands and never partial ones. There is no tick loop; the world
//! only changes when a command says so.
//!
//! ## Module Organization
//!
//! - [`config`]: world dimensions, obstacle counts and robot loadout
//! - [`obstacle`]: obstacle kinds and their footprints
//! - [`robot`]: the robot entity and its wire-facing state
//! - [`world`]: the registry of robots and obstacles, placement and lookups
//! - [`movement`]: stepwise collision-aware move planning
//! - [`vision`]: directional scanning for the look command
//! - [`commands`]: per-verb handlers and the error taxonomy
//! - [`processor`]: request parsing, the DEAD gate and dispatch
//! - [`connection`]: the TCP accept loop and per-client tasks

pub mod commands;
pub mod config;
pub mod connection;
pub mod movement;
pub mod obstacle;
pub mod processor;
pub mod robot;
pub mod vision;
pub mod world;
