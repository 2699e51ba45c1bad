//! Command-line interface for morris.

use crate::config::MatchConfig;
use crate::context::ControlMode;
use crate::games::morris::{Node, Side};
use crate::search::{StrategyKind, WorkerMode};
use clap::{Args, Parser, Subcommand};
use std::str::FromStr;

/// Morris - Nine Men's Morris in the terminal
#[derive(Parser, Debug)]
#[command(name = "morris")]
#[command(about = "Play Nine Men's Morris against a background search", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a match in the terminal
    Play(PlayArgs),

    /// Print the empty board with node numbers
    Nodes,
}

/// Options for `play`. Flags override values from the config file.
#[derive(Args, Debug, Default)]
pub struct PlayArgs {
    /// Path to a TOML match config
    #[arg(short, long)]
    pub config: Option<std::path::PathBuf>,

    /// Controller of White (human, computer, none)
    #[arg(long)]
    pub white: Option<ControlMode>,

    /// Controller of Black (human, computer, none)
    #[arg(long)]
    pub black: Option<ControlMode>,

    /// Search strategy (first_legal, random, minimax)
    #[arg(long)]
    pub strategy: Option<StrategyKind>,

    /// Minimax depth in plies
    #[arg(long)]
    pub depth: Option<u8>,

    /// Seed for the random strategy
    #[arg(long)]
    pub seed: Option<u64>,

    /// Worker mode (spawn, pooled)
    #[arg(long)]
    pub worker: Option<WorkerMode>,

    /// Stop after this many frames
    #[arg(long)]
    pub max_frames: Option<u64>,
}

impl PlayArgs {
    /// Applies the given flags on top of `config`.
    pub fn apply(&self, config: MatchConfig) -> MatchConfig {
        let mut config = config;
        if let Some(mode) = self.white {
            config = config.with_white(mode);
        }
        if let Some(mode) = self.black {
            config = config.with_black(mode);
        }
        if let Some(strategy) = self.strategy {
            config = config.with_strategy(strategy);
        }
        if let Some(depth) = self.depth {
            config = config.with_depth(depth);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(worker) = self.worker {
            config = config.with_worker(worker);
        }
        if let Some(frames) = self.max_frames {
            config = config.with_max_frames(frames);
        }
        config
    }
}

/// A line typed by the player during `play`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCommand {
    /// `place N`
    Place(Node),
    /// `move A B`
    Move(Node, Node),
    /// `take N`
    Take(Node),
    /// `undo`
    Undo,
    /// `redo`
    Redo,
    /// `new`
    New,
    /// `mode white|black human|computer|none`
    Mode(Side, ControlMode),
    /// `help`
    Help,
    /// `quit`
    Quit,
}

/// Usage text for [`UserCommand`].
pub const COMMAND_HELP: &str = "\
place N        put a piece on node N
move A B       move a piece from A to B
take N         capture the piece on N after closing a mill
undo | redo    step through history
new            start a new match
mode SIDE M    set white/black to human, computer or none
quit           leave";

fn parse_node(word: Option<&str>) -> Result<Node, String> {
    let word = word.ok_or_else(|| "missing node number".to_string())?;
    let index: usize = word
        .parse()
        .map_err(|_| format!("'{word}' is not a node number"))?;
    Node::new(index).ok_or_else(|| format!("node {index} does not exist (0-23)"))
}

impl FromStr for UserCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or_else(|| "empty command".to_string())?;
        let command = match verb.to_lowercase().as_str() {
            "place" | "p" => UserCommand::Place(parse_node(words.next())?),
            "move" | "m" => {
                let source = parse_node(words.next())?;
                UserCommand::Move(source, parse_node(words.next())?)
            }
            "take" | "t" => UserCommand::Take(parse_node(words.next())?),
            "undo" | "u" => UserCommand::Undo,
            "redo" | "r" => UserCommand::Redo,
            "new" => UserCommand::New,
            "help" | "h" | "?" => UserCommand::Help,
            "quit" | "q" | "exit" => UserCommand::Quit,
            "mode" => {
                let side = match words.next().map(str::to_lowercase).as_deref() {
                    Some("white") => Side::White,
                    Some("black") => Side::Black,
                    _ => return Err("mode needs 'white' or 'black'".to_string()),
                };
                let mode = words
                    .next()
                    .ok_or_else(|| "mode needs human, computer or none".to_string())?
                    .parse::<ControlMode>()
                    .map_err(|e| e.to_string())?;
                UserCommand::Mode(side, mode)
            }
            other => return Err(format!("unknown command '{other}', try 'help'")),
        };

        match words.next() {
            Some(extra) => Err(format!("unexpected '{extra}'")),
            None => Ok(command),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(index: usize) -> Node {
        Node::new(index).expect("index in range")
    }

    #[test]
    fn parses_player_commands() {
        assert_eq!("place 3".parse::<UserCommand>(), Ok(UserCommand::Place(n(3))));
        assert_eq!("move 1 2".parse::<UserCommand>(), Ok(UserCommand::Move(n(1), n(2))));
        assert_eq!("TAKE 23".parse::<UserCommand>(), Ok(UserCommand::Take(n(23))));
        assert_eq!(
            "mode black none".parse::<UserCommand>(),
            Ok(UserCommand::Mode(Side::Black, ControlMode::None))
        );
    }

    #[test]
    fn rejects_bad_commands() {
        assert!("place 24".parse::<UserCommand>().is_err());
        assert!("move 1".parse::<UserCommand>().is_err());
        assert!("place 1 2".parse::<UserCommand>().is_err());
        assert!("jump 3".parse::<UserCommand>().is_err());
        assert!("".parse::<UserCommand>().is_err());
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from(["morris", "play", "--white", "computer", "--depth", "2"]);
        let Command::Play(args) = cli.command else {
            panic!("expected play subcommand");
        };
        let config = args.apply(MatchConfig::default());
        assert_eq!(*config.white(), ControlMode::Computer);
        assert_eq!(*config.depth(), 2);
        assert_eq!(*config.black(), ControlMode::Computer);
    }
}
