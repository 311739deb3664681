use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "action-annotator")]
#[command(about = "Annotate actions of tracked players in video clips", long_about = None)]
pub struct Cli {
    /// Dataset root containing videos_tracked/ and annotations/
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    #[command(flatten)]
    pub video: VideoArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Overrides for the configured video properties.
#[derive(Debug, Args)]
pub struct VideoArgs {
    #[arg(long, global = true)]
    pub fps: Option<f64>,
    #[arg(long, global = true)]
    pub width: Option<f64>,
    #[arg(long, global = true)]
    pub height: Option<f64>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the videos found under the dataset root
    Videos,
    /// List the annotations of a video
    Annotations { video: String },
    /// Show which tracked subject is under a click
    Hit {
        video: String,
        /// Playback position, MM:SS or milliseconds
        #[arg(long)]
        at: String,
        /// Click position in widget pixels, X,Y
        #[arg(long)]
        point: String,
        /// Display region bounds X1,Y1,X2,Y2
        #[arg(long)]
        region: String,
    },
    /// Add an annotation to a video
    Add {
        video: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        stop: String,
        /// Click position in widget pixels, X,Y
        #[arg(long)]
        click: String,
        /// Display region bounds X1,Y1,X2,Y2
        #[arg(long)]
        region: String,
        /// Playback position of the click, defaults to --start
        #[arg(long)]
        at: Option<String>,
        /// Action class, defaults to the first configured class
        #[arg(long)]
        label: Option<String>,
    },
    /// Delete an annotation by its position in the list
    Delete { video: String, index: usize },
    /// Print configuration values
    PrintConfig,
}
