//! Interactive code polisher.
//!
//! Asks a chat-completion service to refactor, optimize or improve one source
//! file, optionally looping until the service has nothing left to change.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use tracing::info;

use polisher::core::types::Mode;
use polisher::exit_codes;
use polisher::improve::run_loop;
use polisher::interact::{InputClosedError, Presets, collect_session};
use polisher::io::completion::ChatCompleter;
use polisher::io::config::{DEFAULT_CONFIG_FILE, PolisherConfig, load_config, write_config};
use polisher::io::console::Terminal;
use polisher::io::credentials::Credentials;
use polisher::io::prompt::PromptEngine;
use polisher::io::retry::RetryingCompleter;
use polisher::logging;
use polisher::preview::build_preview;

#[derive(Parser)]
#[command(
    name = "polisher",
    version,
    about = "Refactor, optimize or improve a source file with a chat-completion service"
)]
struct Cli {
    /// File to polish. Asked interactively when omitted.
    file: Option<PathBuf>,

    /// What to do with the code. Asked interactively when omitted.
    #[arg(long, value_enum)]
    mode: Option<Mode>,

    /// Keep improving and saving until the service converges.
    /// Asked interactively when omitted.
    #[arg(long, value_name = "BOOL", action = ArgAction::Set)]
    recursive: Option<bool>,

    /// Config file. A missing file means built-in defaults.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Print the prompts that would be sent and exit without contacting the service.
    #[arg(long)]
    dry_run: bool,

    /// Write the built-in defaults to the config file and exit.
    #[arg(long, conflicts_with = "dry_run")]
    init_config: bool,

    /// With `--init-config`, overwrite an existing config file.
    #[arg(short, long, requires = "init_config")]
    force: bool,
}

fn main() {
    logging::init();
    let code = match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            if err.downcast_ref::<InputClosedError>().is_some() {
                exit_codes::INPUT_CLOSED
            } else {
                exit_codes::FAILED
            }
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<i32> {
    if cli.init_config {
        init_config(&cli.config, cli.force)?;
        return Ok(exit_codes::OK);
    }

    let config = load_config(&cli.config)?;
    let prompts = PromptEngine::new()?;

    if cli.dry_run {
        let file = cli.file.context("--dry-run needs a FILE argument")?;
        let preview = build_preview(&file, cli.mode.unwrap_or(Mode::All), &prompts, &config)?;
        print!("{}", preview.render());
        return Ok(exit_codes::OK);
    }

    let credentials = Credentials::from_env();
    let mut console = Terminal;
    let session = collect_session(
        &mut console,
        Presets {
            file_path: cli.file,
            mode: cli.mode,
            recursive: cli.recursive,
        },
    )?;

    let completer = RetryingCompleter::new(
        ChatCompleter::new(&config, credentials)?,
        config.retry.policy(),
    );
    let outcome = run_loop(&session, &completer, &mut console, &prompts, &config)?;
    info!(
        rounds = outcome.rounds,
        saves = outcome.saves,
        stop = ?outcome.stop,
        "session finished"
    );

    Ok(if outcome.stop.is_failure() {
        exit_codes::FAILED
    } else {
        exit_codes::OK
    })
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if !force && path.exists() {
        bail!(
            "config {} already exists (pass --force to overwrite)",
            path.display()
        );
    }
    write_config(path, &PolisherConfig::default())?;
    println!("wrote {}", path.display());
    Ok(())
}
