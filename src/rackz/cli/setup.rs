use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rackz", bin_name = "rackz", version)]
#[command(about = "Records-room inventory: racks, boxes and filed documents", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true, help_heading = "Options")]
    pub verbose: u8,

    /// Skip confirmation prompts
    #[arg(short = 'y', long, global = true, help_heading = "Options")]
    pub yes: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show what is open and the inventory totals
    #[command(display_order = 1)]
    Status,

    /// Add, delete, list and open racks
    #[command(subcommand, display_order = 2)]
    Rack(RackCommands),

    /// Add, delete, open and close boxes in a rack
    #[command(subcommand, name = "box", display_order = 3)]
    Boxes(BoxCommands),

    /// File and remove documents in a box
    #[command(subcommand, display_order = 4)]
    File(FileCommands),

    /// Search documents by box number, file number, name or label
    #[command(alias = "s", display_order = 5)]
    Search {
        /// Search terms (joined with spaces)
        #[arg(num_args = 0..)]
        terms: Vec<String>,
    },

    /// List every filed document with its rack and box
    #[command(display_order = 6)]
    Ledger,

    /// Show rack, box and document totals
    #[command(display_order = 7)]
    Stats,

    /// Write the inventory to a JSON snapshot file
    #[command(display_order = 8)]
    Export {
        /// Destination file (defaults to ./inventory.json)
        path: Option<PathBuf>,
    },

    /// Replace the inventory with a JSON snapshot file
    #[command(display_order = 9)]
    Import {
        /// Snapshot file to read
        path: PathBuf,
    },

    /// Get or set configuration
    #[command(display_order = 10)]
    Config {
        /// Configuration key (backend, remote-url, remote-auth)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum RackCommands {
    /// Add a new empty rack
    Add,

    /// Delete a rack and everything in it
    #[command(alias = "rm")]
    Delete {
        /// Rack identifier (e.g. SSS-RACK-2) or position
        rack: String,
    },

    /// Show the shelf: every rack with its box count
    #[command(alias = "ls")]
    List,

    /// Open a rack and list its boxes
    Open {
        /// Rack identifier or 1-based position
        rack: String,
    },

    /// Close the open rack
    Close,
}

#[derive(Subcommand, Debug)]
pub enum BoxCommands {
    /// Add an empty box to a rack
    Add {
        /// Rack identifier or position (defaults to the open rack)
        #[arg(long)]
        rack: Option<String>,
    },

    /// Delete a box and its documents
    #[command(alias = "rm")]
    Delete {
        /// Box number
        box_id: u32,

        /// Rack identifier or position (defaults to the open rack)
        #[arg(long)]
        rack: Option<String>,
    },

    /// Open a box and list its documents
    Open {
        /// Box number
        box_id: u32,

        /// Rack identifier or position (defaults to the open rack)
        #[arg(long)]
        rack: Option<String>,
    },

    /// Close the open box and go back to the rack
    Close,
}

#[derive(Subcommand, Debug)]
pub enum FileCommands {
    /// File a document into a box
    Add {
        /// File number (required)
        #[arg(short, long)]
        number: Option<String>,

        /// Full name (required)
        #[arg(long)]
        name: Option<String>,

        /// Free-form label
        #[arg(short, long)]
        label: Option<String>,

        /// Filing date (defaults to today, YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,

        /// Rack identifier or position (defaults to the open rack)
        #[arg(long)]
        rack: Option<String>,

        /// Box number (defaults to the open box)
        #[arg(long = "box")]
        box_id: Option<u32>,
    },

    /// Remove the document at a 1-based position in a box
    #[command(alias = "rm")]
    Delete {
        /// Position inside the box
        position: usize,

        /// Rack identifier or position (defaults to the open rack)
        #[arg(long)]
        rack: Option<String>,

        /// Box number (defaults to the open box)
        #[arg(long = "box")]
        box_id: Option<u32>,
    },
}
