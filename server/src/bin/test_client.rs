//! Minimal interactive client for poking at a running server.
//!
//! Reads commands from stdin, one per line, in the form
//! `<command> [args...]` (for example `launch Sniper`, `forward 3`,
//! `turn left`), wraps them in the JSON request envelope and prints the
//! server's response lines.

use clap::Parser;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Server address to connect to
    #[clap(short, long, default_value = "127.0.0.1:5000")]
    address: String,
    /// Robot name to address commands to
    #[clap(short, long, default_value = "TestBot")]
    robot: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let socket = TcpStream::connect(&args.address).await?;
    println!("Connected to {}", args.address);
    let (read_half, mut writer) = socket.into_split();
    let mut responses = BufReader::new(read_half).lines();

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    println!("Enter commands like: launch Sniper | forward 3 | turn left | look | state | exit");

    while let Some(line) = stdin.next_line().await? {
        let mut parts = line.split_whitespace();
        let command = match parts.next() {
            Some(c) => c,
            None => continue,
        };

        // Bare words become strings, digits become numbers.
        let arguments: Vec<Value> = parts
            .map(|p| match p.parse::<u64>() {
                Ok(n) => json!(n),
                Err(_) => json!(p),
            })
            .collect();

        let request = json!({
            "robot": args.robot,
            "command": command,
            "arguments": arguments,
        });

        writer.write_all(request.to_string().as_bytes()).await?;
        writer.write_all(b"\n").await?;

        match responses.next_line().await? {
            Some(reply) => println!("{}", reply),
            None => {
                println!("Server closed the connection");
                break;
            }
        }

        if command.eq_ignore_ascii_case("exit") {
            break;
        }
    }

    Ok(())
}
