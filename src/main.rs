use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::io::{self, Write};
use std::time::Duration;

use lmsctl::cmd::{self, ArgumentError, COMMANDS_HELP, DEFAULT_SEARCH_MAX, DispatchOptions, Session};
use lmsctl::lms::{DEFAULT_PORT, EnqueueMethod, Endpoint, IndexMode, Player, Transport};
use lmsctl::utils;

/// lmsctl - control a Logitech Media Server player from scripts
///
/// Usage:
///   lmsctl -a <host> -n <player> [options] [COMMAND [ARGS...]]
///
/// Environment fallbacks (flag wins):
///   LMS_HOST     server host   (--host)
///   LMS_PORT     server port   (--port)
///   LMS_PLAYER   player name   (--player)
///
/// Examples:
///   lmsctl -a lms.local -n Kitchen -s play
///   lmsctl -a lms.local -n Kitchen search albums "dark side"
///   lmsctl -a lms.local -n Kitchen search tracks "money" | lmsctl -t -n Kitchen -a lms.local enqueue tracks -
///   lmsctl -a lms.local -n Kitchen -f search tracks albums:123
#[derive(Parser, Debug)]
#[command(
    name = "lmsctl",
    version,
    about = "A simple client for interacting with the Logitech Media Server",
    after_help = COMMANDS_HELP
)]
pub struct Cli {
    /// LMS hostname (or LMS_HOST)
    #[arg(short = 'a', long)]
    host: Option<String>,

    /// LMS port (or LMS_PORT) [default: 9000]
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Player name (or LMS_PLAYER)
    #[arg(short = 'n', long)]
    player: Option<String>,

    /// Use zero indexing for playlist entries
    #[arg(short = 'Z', long)]
    zero_indexing: bool,

    /// Item id is taken from the first column of args rather than the full line
    #[arg(short = 't', long)]
    trim_id: bool,

    /// Print a one line status for the player at the end of execution
    #[arg(short = 's', long)]
    status: bool,

    /// Print a one line status for the player at the start of execution
    #[arg(short = 'S', long)]
    status_header: bool,

    /// Maximum number of search results
    #[arg(short = 'm', long, default_value_t = DEFAULT_SEARCH_MAX)]
    search_max: u32,

    /// Apply the search term as a filter expression (key:value)
    #[arg(short = 'f', long)]
    filter_term: bool,

    /// Enqueueing method
    #[arg(short = 'e', long, value_enum, default_value_t = EnqueueMethod::Add)]
    enqueue_method: EnqueueMethod,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10, value_name = "SECS")]
    timeout: u64,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Errors only on stderr
    #[arg(short, long)]
    quiet: bool,

    /// Player command
    command: Option<String>,

    /// Command arguments
    #[arg(allow_negative_numbers = true)]
    args: Vec<String>,
}

/// Flag value, else a non-blank environment variable.
fn flag_or_env(flag: Option<String>, var: &str) -> Option<String> {
    flag.or_else(|| std::env::var(var).ok().filter(|s| !s.trim().is_empty()))
}

fn usage_error(kind: ErrorKind, msg: impl std::fmt::Display) -> ! {
    Cli::command().error(kind, msg).exit()
}

fn print_status(player: &Player, out: &mut impl Write) -> Result<()> {
    if let Some(line) = cmd::render_status(player) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = utils::derive_level(cli.verbose, cli.quiet);
    utils::init_logging(level);

    // Connection settings (CLI flag > env)
    let Some(host) = flag_or_env(cli.host.clone(), "LMS_HOST") else {
        usage_error(
            ErrorKind::MissingRequiredArgument,
            "the following required argument was not provided: --host <HOST> (or LMS_HOST)",
        );
    };
    let Some(player_name) = flag_or_env(cli.player.clone(), "LMS_PLAYER") else {
        usage_error(
            ErrorKind::MissingRequiredArgument,
            "the following required argument was not provided: --player <PLAYER> (or LMS_PLAYER)",
        );
    };
    let port = match (cli.port, flag_or_env(None, "LMS_PORT")) {
        (Some(p), _) => p,
        (None, Some(raw)) => raw.trim().parse().unwrap_or_else(|_| {
            usage_error(ErrorKind::InvalidValue, format!("invalid LMS_PORT value '{raw}'"))
        }),
        (None, None) => DEFAULT_PORT,
    };

    let transport =
        Transport::new(Endpoint::new(host, port)).with_timeout(Duration::from_secs(cli.timeout));
    let player = Player::connect(
        &player_name,
        transport,
        IndexMode::from_zero_indexing(cli.zero_indexing),
    );

    let mut stdout = io::stdout().lock();

    if cli.status_header {
        print_status(&player, &mut stdout)?;
    }

    if let Some(command) = &cli.command {
        let options = DispatchOptions {
            trim_id: cli.trim_id,
            filter_term: cli.filter_term,
            search_max: cli.search_max,
            enqueue_method: cli.enqueue_method,
        };
        let mut stdin = io::stdin().lock();
        let mut session = Session {
            player: &player,
            options: &options,
            out: &mut stdout,
            input: &mut stdin,
        };
        if let Err(e) = cmd::dispatch_command(&mut session, command, &cli.args) {
            if let Some(arg_err) = e.downcast_ref::<ArgumentError>() {
                usage_error(ErrorKind::InvalidValue, arg_err);
            }
            return Err(e);
        }
    }

    if cli.status {
        print_status(&player, &mut stdout)?;
    }

    stdout.flush()?;
    Ok(())
}
