use std::path::PathBuf;

use clap::Parser;
use directories::BaseDirs;
use log::warn;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".cd-inventory";
/// Snapshot file name used when no path is given.
pub const DEFAULT_FILE_NAME: &str = "CDInventory.dat";
/// Log file name placed next to the snapshot.
const LOG_FILE_NAME: &str = "cd-inventory.log";

/// Command line options for the inventory manager.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "cd-inventory", version, about = "Manage a CD collection from the terminal")]
pub struct Cli {
    /// Snapshot file to load from and save to.
    #[arg(short, long, env = "CD_INVENTORY_FILE", value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Where to write the log. Defaults to the data directory.
    #[arg(long, env = "CD_INVENTORY_LOG", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Start with an empty inventory instead of reading the snapshot.
    #[arg(long)]
    pub no_load: bool,
}

/// Settings resolved from the command line, environment and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_file: PathBuf,
    pub log_file: PathBuf,
    pub load_on_start: bool,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Self {
        Self::resolve(cli, data_dir())
    }

    fn resolve(cli: Cli, data_dir: PathBuf) -> Self {
        let data_file = cli
            .file
            .unwrap_or_else(|| data_dir.join(DEFAULT_FILE_NAME));
        let log_file = cli.log_file.unwrap_or_else(|| {
            data_file
                .parent()
                .map(|parent| parent.join(LOG_FILE_NAME))
                .unwrap_or_else(|| PathBuf::from(LOG_FILE_NAME))
        });

        Self {
            data_file,
            log_file,
            load_on_start: !cli.no_load,
        }
    }
}

/// `~/.cd-inventory`, or the working directory when no home can be found.
fn data_dir() -> PathBuf {
    match BaseDirs::new() {
        Some(base_dirs) => base_dirs.home_dir().join(DATA_DIR_NAME),
        None => {
            warn!("could not locate home directory, using the working directory");
            PathBuf::new()
        }
    }
}
