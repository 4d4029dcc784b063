use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::config::DEFAULT_DONE_DIR;
use crate::super_resolution::resample::MAX_SCALE;

#[derive(Parser)]
#[command(name = "manga_utils")]
#[command(about = "Rename, upscale and pack manga chapter folders into CBZ archives")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG overrides this)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rename images in every subfolder to 01.ext, 02.ext, ...
    Rename {
        /// Directory whose immediate subfolders are renamed
        parent_directory: PathBuf,
    },

    /// Compress every subfolder into a .cbz archive
    Compress {
        /// Directory whose immediate subfolders are archived
        source: PathBuf,

        /// Delete each subfolder after its archive is written
        #[arg(short, long)]
        delete: bool,

        /// Leave archived subfolders in place instead of moving them
        #[arg(long)]
        no_move: bool,

        /// Upscale images before archiving
        #[arg(short = 's', long)]
        super_resolution: bool,

        /// Scale factor of the resampling model (1-8)
        #[arg(
            long,
            default_value = "2",
            value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_SCALE))
        )]
        scale: u32,

        /// Directory name (under the source) receiving archived subfolders
        #[arg(long, default_value = DEFAULT_DONE_DIR)]
        done_dir: String,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,

        /// Hide progress bars and messages
        #[arg(short, long)]
        quiet: bool,
    },

    /// Write a details.json series descriptor into a folder
    Describe {
        /// Destination folder
        folder: PathBuf,

        /// Series title (defaults to the folder name)
        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long, default_value = "")]
        author: String,

        #[arg(long, default_value = "")]
        artist: String,

        /// Description; <br> and <i> tags are cleaned up
        #[arg(short, long, default_value = "")]
        description: String,

        /// Comma separated genres
        #[arg(short, long, default_value = "")]
        genres: String,

        /// Publication status ("1" finished, "0" ongoing)
        #[arg(long, default_value = "1")]
        status: String,

        /// Mark the series as adult content (adds NSFW)
        #[arg(long)]
        nsfw: bool,
    },
}
