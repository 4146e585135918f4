// Command-line interface

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pantry")]
#[command(about = "Pantry - ingredient-based recipe recommendations", long_about = None)]
pub struct Cli {
    /// Recipe dataset (.csv or .json)
    #[arg(long, global = true, env = "RECIPES_PATH")]
    pub recipes: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the recommendation server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long, env = "HOST")]
        host: Option<String>,
    },

    /// Recommend recipes for a list of ingredients
    Search {
        /// Ingredients, e.g. "chicken onion garlic"
        query: String,

        /// Keep only this diet (case-insensitive)
        #[arg(long)]
        diet: Option<String>,

        /// Keep only this difficulty
        #[arg(long)]
        difficulty: Option<String>,

        /// Maximum cooking time in minutes
        #[arg(long)]
        time: Option<String>,

        /// Number of ranked candidates before filtering
        #[arg(long)]
        top_n: Option<usize>,
    },

    /// Show the daily specials
    Specials {
        /// Date as YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Number of specials
        #[arg(short, long)]
        n: Option<usize>,
    },

    /// Show one recipe by id
    Show {
        /// Recipe ID
        id: usize,
    },

    /// Load the dataset and report missing values
    Validate,
}
