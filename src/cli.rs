use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use capcache::SortMode;

#[derive(Parser)]
#[command(name = "rcmenu")]
#[command(version)]
#[command(about = "Interactive menu for browsing rclone remotes", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Browse remotes interactively (default)
    Menu,

    /// Refresh the capacity cache for every remote, in the foreground
    Refresh,

    /// Print cached capacity for every remote
    List {
        /// Sort order
        #[arg(short, long, value_enum, default_value_t = SortArg::Name)]
        sort: SortArg,

        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Background cache refresh (spawned by the menu)
    #[command(hide = true)]
    RefreshWorker {
        /// Remotes to query
        remotes: Vec<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Sort order for `list`
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Name,
    Free,
    Total,
    Used,
}

impl From<SortArg> for SortMode {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Name => SortMode::Name,
            SortArg::Free => SortMode::Free,
            SortArg::Total => SortMode::Total,
            SortArg::Used => SortMode::Used,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_is_menu() {
        let cli = Cli::try_parse_from(["rcmenu"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_list_sort() {
        let cli = Cli::try_parse_from(["rcmenu", "list", "--sort", "free", "--json"]).unwrap();
        match cli.command {
            Some(Command::List { sort, json }) => {
                assert_eq!(SortMode::from(sort), SortMode::Free);
                assert!(json);
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn test_worker_takes_remote_names() {
        let cli = Cli::try_parse_from(["rcmenu", "refresh-worker", "--", "gdrive", "-odd"]).unwrap();
        match cli.command {
            Some(Command::RefreshWorker { remotes }) => assert_eq!(remotes, ["gdrive", "-odd"]),
            _ => panic!("expected refresh-worker"),
        }
    }
}
