//! Morris - headless terminal player
//!
//! Drives a [`GameContext`] with a fixed frame loop and reads human moves
//! from stdin on a separate thread.

#![warn(missing_docs)]

use anyhow::{Context, Result};
use clap::Parser;
use crossbeam_channel::{Receiver, TryRecvError};
use morris_core::{
    Board, BoardView, COMMAND_HELP, Cli, Command, ContextState, GameContext, MatchConfig, Move,
    PlayArgs, UserCommand,
};
use std::io::BufRead;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Play(args) => run_play(args),
        Command::Nodes => {
            print_nodes();
            Ok(())
        }
    }
}

/// Spawns a thread forwarding stdin lines. The channel closes on EOF.
fn spawn_input_reader() -> Result<Receiver<String>> {
    let (tx, rx) = crossbeam_channel::unbounded();
    std::thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        })
        .context("Failed to spawn stdin reader")?;
    Ok(rx)
}

/// Runs a match until it ends, the player quits or the frame limit is hit.
#[instrument(skip(args))]
fn run_play(args: PlayArgs) -> Result<()> {
    let base = match &args.config {
        Some(path) => MatchConfig::from_file(path)?,
        None => MatchConfig::default(),
    };
    let config = args.apply(base);
    config.validate()?;
    info!(?config, "Starting match");

    let mut ctx = config.build_context();
    let input = spawn_input_reader()?;
    let frame = Duration::from_millis(*config.frame_interval_ms());

    let mut frames: u64 = 0;
    let mut shown: Option<ContextState> = None;
    let mut input_closed = false;

    loop {
        ctx.update();

        if shown.as_ref() != Some(ctx.state()) {
            render(&ctx);
            shown = Some(ctx.state().clone());
        }

        if matches!(ctx.state(), ContextState::GameOver) && input_closed {
            break;
        }

        if !input_closed {
            match input.try_recv() {
                Ok(line) if line.trim().is_empty() => {}
                Ok(line) => match line.parse::<UserCommand>() {
                    Ok(UserCommand::Quit) => break,
                    Ok(command) => {
                        handle_command(&mut ctx, command);
                        shown = None;
                    }
                    Err(e) => println!("{e}"),
                },
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    debug!("Input closed");
                    input_closed = true;
                    if waiting_for_human(&ctx) {
                        warn!("Input closed while a human is to move, stopping");
                        break;
                    }
                }
            }
        }

        frames += 1;
        if config.max_frames().is_some_and(|max| frames >= max) {
            info!(frames, "Frame limit reached");
            break;
        }

        std::thread::sleep(frame);
    }

    if let Some(ending) = ctx.board().ending() {
        println!("{ending}");
    }
    Ok(())
}

fn waiting_for_human(ctx: &GameContext) -> bool {
    matches!(
        ctx.state(),
        ContextState::HumanTurn { .. } | ContextState::ApplyCapture { .. }
    )
}

fn handle_command(ctx: &mut GameContext, command: UserCommand) {
    let side = ctx.board().position().to_move();
    let outcome = match command {
        UserCommand::Place(target) => ctx.submit_move(Move::place(side, target)),
        UserCommand::Move(source, destination) => {
            ctx.submit_move(Move::relocate(side, source, destination))
        }
        UserCommand::Take(node) => ctx.submit_capture(node),
        UserCommand::Undo => ctx.undo().map(|mv| report_history("Took back", mv)),
        UserCommand::Redo => ctx.redo().map(|mv| report_history("Replayed", mv)),
        UserCommand::New => {
            ctx.reset();
            Ok(())
        }
        UserCommand::Mode(side, mode) => ctx.set_control_mode(side, mode),
        UserCommand::Help => {
            println!("{COMMAND_HELP}");
            Ok(())
        }
        UserCommand::Quit => Ok(()),
    };

    if let Err(e) = outcome {
        println!("{e}");
    }
}

fn report_history(verb: &str, mv: Option<Move>) {
    match mv {
        Some(mv) => println!("{verb} {mv}"),
        None => println!("Nothing to do"),
    }
}

fn render(ctx: &GameContext) {
    match ctx.state() {
        ContextState::HumanTurn { .. } | ContextState::ApplyCapture { .. } => {
            println!("\n{}\n{}", ctx.board().display(), ctx.state());
        }
        ContextState::GameOver => {
            println!("\n{}", ctx.board().display());
            println!("Type 'new' for another match or 'quit' to leave.");
        }
        ContextState::ComputerTurnThinking { side } => println!("{side} is thinking..."),
        ContextState::NextPlayer | ContextState::ComputerTurnBegin { .. } => {}
    }
}

fn print_nodes() {
    println!("{}", Board::new().display());
    println!("Nodes are numbered 0-23, left to right and top to bottom.");
    println!("{COMMAND_HELP}");
}
