use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use lnpos_core::{Confirm, StaticConfirm};

use lnpos_cli::cli::{Cli, Commands};
use lnpos_cli::commands::{self, Session, config_path, load_config};
use lnpos_cli::config::Config;
use lnpos_cli::util::TerminalConfirm;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // When quiet mode is enabled, suppress info-level logging
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let path = config_path(&cli);
    let config = load_config(&cli)?;

    match cli.command {
        Commands::List { filter, format } => {
            let mut session = open_session(&config, StaticConfirm(false))?;
            commands::cmd_list(&mut session, filter, format).await?;
        }
        Commands::Show { id, format } => {
            let mut session = open_session(&config, StaticConfirm(false))?;
            commands::cmd_show(&mut session, &id, format).await?;
        }
        Commands::Create { title, fields } => {
            let mut session = open_session(&config, StaticConfirm(false))?;
            commands::cmd_create(&mut session, title, &fields).await?;
        }
        Commands::Update { id, title, fields } => {
            let mut session = open_session(&config, StaticConfirm(false))?;
            commands::cmd_update(&mut session, &id, title, &fields).await?;
        }
        Commands::Delete { id, yes } => {
            let mut session = if yes {
                open_session(&config, StaticConfirm(true))?
            } else {
                open_session(&config, TerminalConfirm)?
            };
            commands::cmd_delete(&mut session, &id).await?;
        }
        Commands::Export { output } => {
            let mut session = open_session(&config, StaticConfirm(false))?;
            commands::cmd_export(&mut session, output.as_ref()).await?;
        }
        Commands::Currencies => {
            // The currency list needs no wallet key
            config.validate_server()?;
            let session = Session::open(&config, StaticConfirm(false))?;
            commands::cmd_currencies(&session).await?;
        }
        Commands::Config { action } => {
            commands::cmd_config(action, &path, &config)?;
        }
    }

    Ok(())
}

fn open_session(config: &Config, confirm: impl Confirm + 'static) -> Result<Session> {
    config.validate_for_requests()?;
    Session::open(config, confirm)
}
