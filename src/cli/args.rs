//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum, ValueHint};

/// Sunburst wheel layout engine: radial partition, Lab colors, ancestry highlighting and zoom
#[derive(Parser, Debug)]
#[command(name = "sunwheel")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Local config file (default: ./.sunwheel.toml)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Override the leaf color scheme (hue, hue-lab, hue-parents, hash)
    #[arg(long, global = true, env = "SUNWHEEL_COLOR_SCHEME")]
    pub scheme: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print per-node geometry, color and label placement
    Layout {
        /// Hierarchy JSON file
        #[arg(value_hint = ValueHint::FilePath)]
        hierarchy: PathBuf,
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Show the hierarchy as a tree with node colors
    Tree {
        /// Hierarchy JSON file
        #[arg(value_hint = ValueHint::FilePath)]
        hierarchy: PathBuf,
    },

    /// Show which nodes a hover highlights on the wheel and the map
    Highlight {
        /// Hierarchy JSON file
        #[arg(value_hint = ValueHint::FilePath)]
        hierarchy: PathBuf,
        /// Hovered node, as a slash path below the root (e.g. A/A1)
        #[arg(short, long)]
        node: String,
        /// Highlight mode (lineage, focus, wheel-subtree, show-all); default from config
        #[arg(short, long)]
        mode: Option<String>,
        /// Wheel focus before hovering (default: root)
        #[arg(long)]
        focus: Option<String>,
        /// Treat an unknown mode as show-all instead of failing
        #[arg(long)]
        lenient: bool,
    },

    /// Evaluate one ancestry relation of every node against a basis node
    Relate {
        /// Hierarchy JSON file
        #[arg(value_hint = ValueHint::FilePath)]
        hierarchy: PathBuf,
        /// Basis node path
        #[arg(short, long)]
        node: String,
        /// Relation (node, ancestors, lineage, subtree, wheel-subtree, all)
        #[arg(short, long)]
        relation: String,
        /// Wheel focus for wheel-subtree (default: root)
        #[arg(long)]
        focus: Option<String>,
        /// Treat an unknown relation as all instead of failing
        #[arg(long)]
        lenient: bool,
    },

    /// Sample the zoom transition after clicking a node
    Zoom {
        /// Hierarchy JSON file
        #[arg(value_hint = ValueHint::FilePath)]
        hierarchy: PathBuf,
        /// Clicked node path
        #[arg(short, long)]
        node: String,
        /// Number of ticks to sample over the zoom duration
        #[arg(long, default_value_t = 4)]
        frames: u32,
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Bind companion-map region names to hierarchy nodes
    Regions {
        /// Hierarchy JSON file
        #[arg(value_hint = ValueHint::FilePath)]
        hierarchy: PathBuf,
        /// Region names, one per line (or a JSON array)
        #[arg(value_hint = ValueHint::FilePath)]
        regions: PathBuf,
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Sample Lab and HSL color-space planes as hex grids
    Swatch {
        /// Single plane (la, lb, ab, hs, hl, sl or the long names); default all six
        #[arg(short, long)]
        plane: Option<String>,
        /// Grid step over -100..100
        #[arg(long, default_value_t = crate::domain::DEFAULT_SWATCH_STEP)]
        step: u32,
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Show config file locations
    Path,
    /// Print a commented config template
    Template,
}
