use crate::api::HttpStudentApi;
use crate::cleanup::Deduplicator;
use crate::config::Config;
use clap::Parser;
use eyre::Error;
use std::path::{Path, PathBuf};
use tracing::{Level, debug, info};

mod api;
mod cleanup;
mod config;
mod dedup;
mod display;
mod model;

const DEFAULT_CONFIG: &str = "rfid-dedup.toml";

/// Delete students whose RFID tag is already used by another student
#[derive(Parser, Debug)]
#[command(version, about)]
struct Opt {
    /// Configuration file (rfid-dedup.toml is used if present)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Students collection URL, overrides the configuration file
    #[arg(short = 'u', long, value_name = "URL")]
    base_url: Option<String>,
    /// List duplicates without deleting them
    #[arg(short = 'n', long)]
    dry_run: bool,
    /// Increase verbosity (can be repeated)
    #[arg(short, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Opt {
    fn level(&self) -> Level {
        match self.verbose {
            0 => Level::ERROR,
            1 => Level::WARN,
            2 => Level::INFO,
            3 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    fn config(&self) -> Result<Config, Error> {
        let mut config = match &self.config {
            Some(file) => Config::load(file)?,
            None if Path::new(DEFAULT_CONFIG).exists() => Config::load(Path::new(DEFAULT_CONFIG))?,
            None => Config::default(),
        };
        if let Some(base_url) = &self.base_url {
            config.api.base_url.clone_from(base_url);
        }
        Ok(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Error> {
    color_eyre::install()?;
    let opt = Opt::parse();
    tracing_subscriber::fmt()
        .with_max_level(opt.level())
        .with_writer(std::io::stderr)
        .init();
    let config = opt.config()?;
    debug!(?config, "configuration loaded");
    let api = HttpStudentApi::new(&config.api)?;
    let report = Deduplicator::new(api, opt.dry_run)
        .run(&mut std::io::stdout().lock())
        .await?;
    if report.fetch_rejected {
        info!("student list unavailable, nothing deleted");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli() {
        use clap::CommandFactory;
        Opt::command().debug_assert();
    }

    #[test]
    fn test_no_arguments() {
        let opt = Opt::try_parse_from(["rfid-dedup"]).unwrap();
        assert!(!opt.dry_run);
        assert_eq!(opt.level(), Level::ERROR);
    }

    #[test]
    fn test_base_url_override() {
        let opt = Opt::try_parse_from(["rfid-dedup", "-n", "-vv", "-u", "http://10.0.0.2/api/students"])
            .unwrap();
        assert!(opt.dry_run);
        assert_eq!(opt.level(), Level::INFO);
        assert_eq!(
            opt.config().unwrap().api.base_url,
            "http://10.0.0.2/api/students"
        );
    }
}
