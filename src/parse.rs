use clap::{Parser, Subcommand};
use finscan::DEFAULT_RECENT_LIMIT;
use finscan::config::{DEFAULT_BASE_URL, DEFAULT_DEVICE_ID};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "finscan")]
#[command(about = "A CLI client for the fish identification service")]
#[command(version)]
pub(crate) struct Args {
    /// Base URL of the API, including its `/api` prefix
    #[arg(short, long, env = "FINSCAN_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Device the requests are made for
    #[arg(short, long, env = "FINSCAN_DEVICE_ID", default_value = DEFAULT_DEVICE_ID)]
    pub device_id: String,

    /// Print catches as JSON instead of a summary
    #[arg(short, long)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Register the device with the service
    Register,

    /// Show the device record
    Device,

    /// List every catch of the device
    List,

    /// Show the most recent catches
    Recent {
        #[arg(short, long, default_value_t = DEFAULT_RECENT_LIMIT)]
        limit: usize,
    },

    /// Show one catch by fish id
    Details { id: String },

    /// Look a fish up by name
    Name { name: String },

    /// Attach an already known fish to the device
    AddExisting { name: String, image_url: String },

    /// Upload a photo for identification
    Identify {
        path: PathBuf,

        /// MIME type of the photo, e.g. image/jpeg
        #[arg(short, long)]
        mime: Option<String>,
    },

    /// Ask the assistant a question
    Chat { message: String },

    /// Device record and recent catches, fetched together
    Home {
        #[arg(short, long, default_value_t = DEFAULT_RECENT_LIMIT)]
        limit: usize,
    },

    /// Save every catch to a CSV file
    Export {
        #[arg(short, long, default_value = "catches.csv")]
        output: PathBuf,
    },
}
