//! Kache CLI Client
//!
//! Interactive prompt that sends each typed line as one command.

use std::io::{self, BufRead, Write};

use clap::Parser;
use kache::network::Client;
use kache::protocol::encode_reply;

/// Kache CLI
#[derive(Parser, Debug)]
#[command(name = "kache-cli")]
#[command(about = "Interactive client for the Kache key-value server")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:6379")]
    server: String,
}

fn main() {
    let args = Args::parse();

    let mut client = match Client::connect(&args.server) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Connection to Kache server on {} failed: {}", args.server, e);
            std::process::exit(1);
        }
    };

    println!("Connected to Kache server. Type 'exit' or 'quit' to close.");

    if let Err(e) = repl(&mut client) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

/// Read-eval-print loop; ends on EOF or `exit`/`quit`
fn repl(client: &mut Client) -> kache::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();

    loop {
        write!(stdout, "kache> ")?;
        stdout.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            [] => continue,
            ["exit"] | ["quit"] => return Ok(()),
            _ => {}
        }

        let reply = match client.send(&tokens) {
            Ok(reply) => reply,
            Err(e) if e.is_disconnect() => {
                println!("Server disconnected.");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        // Raw reply bytes, exactly as received
        stdout.write_all(&encode_reply(&reply))?;
        stdout.flush()?;
    }
}
