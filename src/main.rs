#[warn(clippy::pedantic, clippy::cargo)]
mod build;
mod config;
mod engine;
mod navigation;
mod path_util;
mod prepare;
mod search;
mod site;

use clap::{Parser, Subcommand};
use env_logger::Env;
use log::error;

use crate::build::{run_build, run_clean};
use crate::path_util::SiteDir;
use crate::search::{list_engines, run_search};

#[derive(Parser)]
#[command(name = "homenav", about = "Link navigation homepage generator", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands
}

#[derive(Subcommand)]
enum Commands {
    /// Build the homepage
    Build {
        /// Minify the html output
        #[arg(short, long)]
        minify: bool,
        /// The site directory to build
        #[arg(short, long, default_value_t = SiteDir::from("./"))]
        dir: SiteDir
    },

    /// Cleans the site directory, ie deletes the output folder
    Clean {
        /// The site directory to clean
        #[arg(short, long, default_value_t = SiteDir::from("./"))]
        dir: SiteDir
    },

    /// List the configured search engines, `*` marks the default selection
    Engines {
        #[arg(short, long, default_value_t = SiteDir::from("./"))]
        dir: SiteDir
    },

    /// Search with the selected engines in the browser
    Search {
        #[arg(short, long, default_value_t = SiteDir::from("./"))]
        dir: SiteDir,
        /// Flip an engine in or out of the default selection, repeatable
        #[arg(short, long = "toggle", value_name = "ID")]
        toggle: Vec<String>,
        /// Print the result URLs instead of opening them
        #[arg(short, long)]
        print: bool,
        /// The search query
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>
    }
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { minify, dir } => {
            if let Err(e) = run_build(dir, minify) {
                error!("Build failed: {}", e);
            }
        }
        Commands::Clean { dir } => {
            if let Err(e) = run_clean(dir) {
                error!("Failed: {}", e);
            }
        }
        Commands::Engines { dir } => {
            if let Err(e) = list_engines(&dir) {
                error!("Failed: {}", e);
            }
        }
        Commands::Search {
            dir,
            toggle,
            print,
            query
        } => {
            if let Err(e) = run_search(&dir, &toggle, &query.join(" "), print) {
                error!("Search failed: {}", e);
            }
        }
    }
}
