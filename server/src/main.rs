use clap::Parser;
use log::info;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use server::config::WorldConfig;
use server::connection;
use server::obstacle::{Obstacle, ObstacleKind};
use server::processor::CommandProcessor;
use server::world::World;

/// Main-method of the application.
/// Parses command-line arguments, builds the world, then serves TCP clients
/// until interrupted.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Command line arguments
    #[derive(Parser, Debug)]
    #[clap(author, version, about)]
    struct Args {
        /// Server IP address to bind to
        #[clap(short = 'H', long, default_value = "127.0.0.1")]
        host: String,
        /// Server port to listen on
        #[clap(short, long, default_value = "5000")]
        port: u16,
        /// World width in cells
        #[clap(long, default_value = "50")]
        width: u32,
        /// World height in cells
        #[clap(long, default_value = "50")]
        height: u32,
        /// Number of randomly placed mountains
        #[clap(long, default_value = "2")]
        mountains: u32,
        /// Number of randomly placed lakes
        #[clap(long, default_value = "2")]
        lakes: u32,
        /// Number of randomly placed pits
        #[clap(long, default_value = "2")]
        pits: u32,
        /// How far robots can see and shoot
        #[clap(long, default_value = "5")]
        visibility: u32,
        /// Shield strength robots launch with
        #[clap(long, default_value = "5")]
        max_shields: u32,
        /// Shots robots launch with
        #[clap(long, default_value = "5")]
        max_shots: u32,
        /// Nominal weapon reload duration in ticks
        #[clap(long, default_value = "5")]
        reload_ticks: u32,
        /// Nominal shield repair duration in ticks
        #[clap(long, default_value = "5")]
        repair_ticks: u32,
        /// Fixed 1x1 mountain at "x,y"; repeatable
        #[clap(short, long)]
        obstacle: Vec<String>,
    }

    env_logger::init();

    let args = Args::parse();

    let config = WorldConfig {
        width: args.width,
        height: args.height,
        num_mountains: args.mountains,
        num_lakes: args.lakes,
        num_pits: args.pits,
        visibility_range: args.visibility,
        max_shield_strength: args.max_shields,
        max_shots: args.max_shots,
        reload_ticks: args.reload_ticks,
        repair_ticks: args.repair_ticks,
    };

    let mut world = World::new(config);
    for value in &args.obstacle {
        let (x, y) = parse_obstacle(value)?;
        world.add_obstacle(Obstacle::new(ObstacleKind::Mountain, x, y, 1, 1));
        info!("Placed fixed obstacle at ({}, {})", x, y);
    }

    info!(
        "World is {}x{} with {} obstacles",
        world.width(),
        world.height(),
        world.obstacles().len()
    );

    let processor = Arc::new(CommandProcessor::new(Arc::new(Mutex::new(world))));

    let address = format!("{}:{}", args.host, args.port);
    let listener = TcpListener::bind(&address).await?;
    info!("Robot Worlds server listening on {}", address);

    // Serve until interrupted
    tokio::select! {
        _ = connection::serve(listener, processor) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, stopping server");
        }
    }

    Ok(())
}

/// Parses an `--obstacle` flag value of the form "x,y".
fn parse_obstacle(value: &str) -> Result<(i32, i32), String> {
    let mut parts = value.splitn(2, ',');
    let x = parts
        .next()
        .and_then(|p| p.trim().parse::<i32>().ok());
    let y = parts
        .next()
        .and_then(|p| p.trim().parse::<i32>().ok());
    match (x, y) {
        (Some(x), Some(y)) => Ok((x, y)),
        _ => Err(format!("Invalid obstacle position '{}', expected x,y", value)),
    }
}
