//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod clean;
pub mod get;
pub mod init;
pub mod list;
pub mod make;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::cli::output::OutputConfig;
use crate::core::session::Session;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new Arduino project
    Init {
        /// The directory in which to create the new project
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Project name
        #[arg(short, long)]
        name: String,

        /// The short name of your Arduino board (run `xuino list` for a list)
        #[arg(short, long)]
        board: String,

        /// Libraries the project depends on
        #[arg(long, num_args = 1..)]
        libraries: Vec<String>,
    },

    /// Clear out the cache of compiled library code
    Clean,

    /// List all available boards
    List,

    /// Make the project in the current directory (verbosely)
    Make,

    /// Get compiler flags, compiled libraries, etc.
    Get {
        #[command(subcommand)]
        command: GetCommands,
    },
}

/// Get subcommands
#[derive(Subcommand, Debug)]
pub enum GetCommands {
    /// Get a board property from boards.txt
    Property {
        /// The name of the property as it appears in boards.txt, e.g. uno.build.f_cpu
        property: String,
    },

    /// Get the compiler flags for a specific board
    Cflags {
        /// The short name of your Arduino board
        board: String,
    },

    /// Get a list of directories containing library source code
    Src {
        /// Libraries to get source directories for
        libraries: Vec<String>,

        /// The short name of your Arduino board
        #[arg(long)]
        board: Option<String>,

        /// Add a -I before each directory (see gcc's -I option)
        #[arg(short = 'I')]
        dash_i: bool,
    },

    /// Get the names of all the .o files for a library
    Obj {
        /// The name of the library
        library: String,
    },

    /// Get the libraries to build, dependencies included, in build order
    Deps {
        /// Libraries to resolve
        libraries: Vec<String>,
    },

    /// Get the location(s) of compiled libraries
    Lib {
        /// Libraries to obtain compiled versions of
        libraries: Vec<String>,

        /// The short name of your Arduino board
        #[arg(long)]
        board: String,

        /// Add a -L before each directory (see gcc's -L option)
        #[arg(short = 'L')]
        dash_big_l: bool,

        /// Add the compiled archive names beginning with -l, e.g. -lethernet -lspi -lcore
        #[arg(short = 'l')]
        dash_little_l: bool,
    },
}

impl Commands {
    /// Execute the command
    pub async fn run(self, output: &OutputConfig) -> Result<()> {
        match self {
            Self::Init {
                dir,
                name,
                board,
                libraries,
            } => {
                let current_dir = std::env::current_dir()?;
                init::execute(&current_dir, &dir, &name, &board, &libraries, output).await
            }
            Self::Clean => {
                let current_dir = std::env::current_dir()?;
                clean::execute(&current_dir, output).await
            }
            Self::List => {
                let current_dir = std::env::current_dir()?;
                list::execute(&current_dir, output).await
            }
            Self::Make => {
                let current_dir = std::env::current_dir()?;
                make::execute(&current_dir, output).await
            }
            Self::Get { command } => {
                let current_dir = std::env::current_dir()?;
                match command {
                    GetCommands::Property { property } => {
                        get::execute_property(&current_dir, &property).await
                    }
                    GetCommands::Cflags { board } => {
                        get::execute_cflags(&current_dir, &board).await
                    }
                    GetCommands::Src {
                        libraries,
                        board,
                        dash_i,
                    } => {
                        get::execute_src(&current_dir, &libraries, board.as_deref(), dash_i, output)
                            .await
                    }
                    GetCommands::Obj { library } => {
                        get::execute_obj(&current_dir, &library).await
                    }
                    GetCommands::Deps { libraries } => {
                        get::execute_deps(&current_dir, &libraries, output).await
                    }
                    GetCommands::Lib {
                        libraries,
                        board,
                        dash_big_l,
                        dash_little_l,
                    } => {
                        let options = get::LibOptions {
                            dash_big_l,
                            dash_little_l,
                        };
                        get::execute_lib(&current_dir, &libraries, &board, options, output).await
                    }
                }
            }
        }
    }
}

/// Load the session for the project in `dir`
pub(crate) fn load_session(dir: &std::path::Path) -> Result<Session> {
    Session::load(dir).with_context(|| format!("Failed to load configuration for {}", dir.display()))
}
