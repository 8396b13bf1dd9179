//! Tictactoe Client Binary
//!
//! Terminal driver for the client session: reads commands from stdin and
//! ticks the session at a fixed rate.

use std::io::BufRead;
use std::time::Duration;

use clap::Parser;
use crossbeam::channel::{unbounded, Receiver, TryRecvError};
use tictactoe_client::network::UdpConnector;
use tictactoe_client::protocol::Cell;
use tictactoe_client::{ClientConfig, ClientSession, ClientState, SessionEvent};
use tracing_subscriber::{fmt, EnvFilter};

/// Tictactoe Client
#[derive(Parser, Debug)]
#[command(name = "tictactoe-client")]
#[command(about = "Terminal client for the two-player tic-tac-toe server")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1")]
    server: String,

    /// Server UDP port
    #[arg(short, long, default_value = "9999")]
    port: u16,

    /// Player name used by a bare `join`
    #[arg(short, long, default_value = "")]
    name: String,

    /// Milliseconds between ticks
    #[arg(short, long, default_value = "16")]
    tick_ms: u64,

    /// Receive timeout in milliseconds (0 = non-blocking)
    #[arg(short, long, default_value = "0")]
    recv_timeout_ms: u64,
}

/// A line of user input
#[derive(Debug, PartialEq)]
enum UserCommand {
    Join(Option<String>),
    Create,
    Target(u32),
    Challenge(Option<u32>),
    Move(usize),
    Rooms,
    Board,
    Help,
    Quit,
}

impl UserCommand {
    fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let verb = words.next()?;
        let arg = words.next();

        let command = match verb {
            "join" => UserCommand::Join(arg.map(str::to_string)),
            "create" => UserCommand::Create,
            "target" => UserCommand::Target(arg?.parse().ok()?),
            "challenge" => match arg {
                Some(id) => UserCommand::Challenge(Some(id.parse().ok()?)),
                None => UserCommand::Challenge(None),
            },
            "move" => UserCommand::Move(arg?.parse().ok()?),
            "rooms" => UserCommand::Rooms,
            "board" => UserCommand::Board,
            "help" => UserCommand::Help,
            "quit" => UserCommand::Quit,
            _ => return None,
        };
        Some(command)
    }
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tictactoe_client=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("Tictactoe Client v{}", tictactoe_client::VERSION);
    tracing::info!("Server: {}:{}", args.server, args.port);

    // Build config from args
    let config = ClientConfig::builder()
        .server_address(&args.server)
        .server_port(args.port)
        .player_name(&args.name)
        .tick_interval_ms(args.tick_ms)
        .recv_timeout_ms(args.recv_timeout_ms)
        .build();

    let connector = UdpConnector::from_config(&config);
    let mut session = match ClientSession::new(config, connector) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to start session: {}", e);
            std::process::exit(1);
        }
    };

    let input = spawn_input_reader();
    print_help();

    let tick = Duration::from_millis(session.config().tick_interval_ms);
    while !session.should_quit() {
        session.tick();

        for event in session.drain_events() {
            report_event(&session, &event);
        }

        match input.try_recv() {
            Ok(line) => handle_line(&mut session, &line),
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                // stdin closed
                if let Err(e) = session.request_quit() {
                    tracing::warn!("Quit failed: {}", e);
                }
            }
        }

        std::thread::sleep(tick);
    }

    tracing::info!("Client stopped");
}

/// Forward stdin lines over a channel so the tick loop never blocks on input
fn spawn_input_reader() -> Receiver<String> {
    let (tx, rx) = unbounded();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn handle_line(session: &mut ClientSession<UdpConnector>, line: &str) {
    let Some(command) = UserCommand::parse(line) else {
        if !line.trim().is_empty() {
            println!("Unknown command: {} (try `help`)", line.trim());
        }
        return;
    };

    let result = match command {
        UserCommand::Join(name) => {
            let name = name.unwrap_or_else(|| session.config().player_name.clone());
            session.request_join(&name)
        }
        UserCommand::Create => session.request_create_room(),
        UserCommand::Target(room_id) => {
            session.set_target_room(room_id);
            Ok(true)
        }
        UserCommand::Challenge(Some(room_id)) => session.request_challenge(room_id),
        UserCommand::Challenge(None) => session.request_challenge_target(),
        UserCommand::Move(cell) => session.request_move(cell),
        UserCommand::Rooms => {
            print_rooms(session);
            Ok(true)
        }
        UserCommand::Board => {
            print_board(session);
            Ok(true)
        }
        UserCommand::Help => {
            print_help();
            Ok(true)
        }
        UserCommand::Quit => session.request_quit(),
    };

    match result {
        Ok(true) => {}
        Ok(false) => println!("Not now ({}).", session.state()),
        Err(e) => tracing::error!("{}", e),
    }
}

fn report_event(session: &ClientSession<UdpConnector>, event: &SessionEvent) {
    match event {
        SessionEvent::StateChanged { to, .. } => {
            println!("== {} ==", to);
            if *to == ClientState::Play {
                print_board(session);
            }
        }
        SessionEvent::JoinRejected => println!("Server refused the join."),
        SessionEvent::ServerDead => println!("Server is dead."),
        SessionEvent::Kicked => println!("Kicked by the server."),
        SessionEvent::RoomCreated(id) => println!("Room {} was created!", id),
        SessionEvent::RoomDestroyed(id) => println!("Room {} was destroyed!", id),
        SessionEvent::TurnUpdated { my_turn } => {
            print_board(session);
            println!("{}", if *my_turn { "Your turn!" } else { "Not your turn!" });
        }
        SessionEvent::ResetPressedInput => {}
    }
}

fn print_rooms(session: &ClientSession<UdpConnector>) {
    let rooms = session.rooms();
    if rooms.is_empty() {
        println!("No open rooms.");
        return;
    }
    for room_id in rooms.open_rooms() {
        println!("Room ID : {}", room_id);
    }
}

fn print_board(session: &ClientSession<UdpConnector>) {
    for row in session.play().rows() {
        let line: Vec<&str> = row
            .iter()
            .map(|cell| match cell {
                Cell::Empty => ".",
                Cell::X => "X",
                Cell::O => "O",
            })
            .collect();
        println!(" {}", line.join(" "));
    }
}

fn print_help() {
    println!("Commands:");
    println!("  join [name]        log into the server");
    println!("  create             create a room");
    println!("  target <id>        remember a room to challenge");
    println!("  challenge [id]     challenge a room (default: target)");
    println!("  move <0-8>         claim a cell");
    println!("  rooms | board      show open rooms / playfield");
    println!("  quit               leave");
}
