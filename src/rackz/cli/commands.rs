//! # CLI Layer
//!
//! This module is **one possible UI client** for rackz, not the application itself.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr, stdin prompts)
//! - Uses `std::process::exit` (via `main.rs`)
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: Convert shell arguments into typed commands via clap
//! 2. **Logging**: Install the `tracing` subscriber according to `-v`
//! 3. **Context Setup**: Pick the backend from config, open `RackzApi`, restore
//!    the navigation context saved by the previous invocation
//! 4. **API Dispatch**: Call the appropriate `RackzApi` method
//! 5. **Output Formatting**: Convert `CmdResult` into terminal output
//!
//! ## Navigation Across Invocations
//!
//! Each invocation is a short-lived client. What the user has open (`rack
//! open`, `box open`) is written to `nav.json` in the data directory after a
//! successful command and restored on the next start. `--rack` and `--box`
//! default to whatever is open.

use super::logging::{init_logging, LogConfig};
use super::print::{
    print_messages, render_boxes, render_documents, render_location, render_racks, render_search,
    render_stats,
};
use super::setup::{BoxCommands, Cli, Commands, FileCommands, RackCommands};
use clap::Parser;
use colored::Colorize;
use directories::ProjectDirs;
use rackz::api::{self, AssumeYes, ConfigAction, NewDocument, RackzApi};
use rackz::commands::Confirm;
use rackz::config::{Backend, RackzConfig};
use rackz::error::{RackzError, Result};
use rackz::navigation::NavigationContext;
use rackz::store::remote::{RemoteStore, RestDatabase};
use rackz::store::snapshot::{SnapshotStore, SNAPSHOT_FILENAME};
use rackz::store::InventoryStore;
use std::fs;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Overrides the platform data directory.
const DATA_DIR_ENV: &str = "RACKZ_DATA_DIR";
const NAV_FILENAME: &str = "nav.json";

struct AppContext {
    api: RackzApi<Box<dyn InventoryStore>>,
    data_dir: PathBuf,
    assume_yes: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&LogConfig::from_verbosity(cli.verbose).with_ansi(io::stderr().is_terminal()));

    let data_dir = data_dir()?;

    // Config never opens the store, so a broken backend setting can still be fixed.
    match cli.command.unwrap_or(Commands::Status) {
        Commands::Config { key, value } => handle_config(&data_dir, key, value),
        command => {
            let mut ctx = init_context(data_dir, cli.yes)?;
            dispatch(&mut ctx, command)?;
            save_navigation(&ctx.data_dir, ctx.api.navigation())
        }
    }
}

fn dispatch(ctx: &mut AppContext, command: Commands) -> Result<()> {
    match command {
        Commands::Status => handle_status(ctx),
        Commands::Rack(cmd) => match cmd {
            RackCommands::Add => handle_rack_add(ctx),
            RackCommands::Delete { rack } => handle_rack_delete(ctx, &rack),
            RackCommands::List => handle_rack_list(ctx),
            RackCommands::Open { rack } => handle_rack_open(ctx, &rack),
            RackCommands::Close => handle_rack_close(ctx),
        },
        Commands::Boxes(cmd) => match cmd {
            BoxCommands::Add { rack } => handle_box_add(ctx, rack),
            BoxCommands::Delete { box_id, rack } => handle_box_delete(ctx, rack, box_id),
            BoxCommands::Open { box_id, rack } => handle_box_open(ctx, rack, box_id),
            BoxCommands::Close => handle_box_close(ctx),
        },
        Commands::File(cmd) => match cmd {
            FileCommands::Add {
                number,
                name,
                label,
                date,
                rack,
                box_id,
            } => {
                let fields = NewDocument {
                    date: date.unwrap_or_else(today),
                    file_number: number.unwrap_or_default(),
                    full_name: name.unwrap_or_default(),
                    label: label.unwrap_or_default(),
                };
                handle_file_add(ctx, rack, box_id, fields)
            }
            FileCommands::Delete {
                position,
                rack,
                box_id,
            } => handle_file_delete(ctx, rack, box_id, position),
        },
        Commands::Search { terms } => handle_search(ctx, &terms.join(" ")),
        Commands::Ledger => handle_ledger(ctx),
        Commands::Stats => handle_stats(ctx),
        Commands::Export { path } => handle_export(ctx, path),
        Commands::Import { path } => handle_import(ctx, &path),
        Commands::Config { key, value } => handle_config(&ctx.data_dir, key, value),
    }
}

fn data_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "rackz", "rackz")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| RackzError::Api("Could not determine data directory".into()))
}

fn open_store(data_dir: &Path, config: &RackzConfig) -> Result<Box<dyn InventoryStore>> {
    match config.backend {
        Backend::Snapshot => Ok(Box::new(SnapshotStore::new(
            data_dir.join(SNAPSHOT_FILENAME),
        ))),
        Backend::Remote => {
            let url = config.remote_url.as_deref().ok_or_else(|| {
                RackzError::Api(
                    "Remote backend selected but remote-url is not set (rackz config remote-url <url>)"
                        .into(),
                )
            })?;
            let db = RestDatabase::new(url, config.remote_auth.clone())?;
            Ok(Box::new(RemoteStore::new(db)))
        }
    }
}

fn init_context(data_dir: PathBuf, assume_yes: bool) -> Result<AppContext> {
    let config = RackzConfig::load(&data_dir)?;
    let store = open_store(&data_dir, &config)?;
    let mut api = RackzApi::open(store)?;
    api.set_navigation(load_navigation(&data_dir));

    info!(
        data_dir = %data_dir.display(),
        store = %api.store().describe(),
        racks = api.inventory().racks.len(),
        "ready"
    );

    Ok(AppContext {
        api,
        data_dir,
        assume_yes,
    })
}

fn load_navigation(data_dir: &Path) -> NavigationContext {
    let path = data_dir.join(NAV_FILENAME);
    if !path.exists() {
        return NavigationContext::new();
    }
    let parsed = fs::read_to_string(&path)
        .map_err(RackzError::Io)
        .and_then(|content| {
            serde_json::from_str::<NavigationContext>(&content).map_err(RackzError::Serialization)
        });
    match parsed {
        Ok(nav) => nav,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable navigation state");
            NavigationContext::new()
        }
    }
}

fn save_navigation(data_dir: &Path, nav: &NavigationContext) -> Result<()> {
    if !data_dir.exists() {
        fs::create_dir_all(data_dir).map_err(RackzError::Io)?;
    }
    let content = serde_json::to_string_pretty(nav).map_err(RackzError::Serialization)?;
    fs::write(data_dir.join(NAV_FILENAME), content).map_err(RackzError::Io)?;
    Ok(())
}

fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// Asks on stdout, reads the answer from stdin. Only `y`/`yes` confirm.
struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{} [y/N] ", prompt);
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(0) | Err(_) => {
                println!();
                false
            }
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        }
    }
}

impl AppContext {
    fn confirmer(&self) -> Box<dyn Confirm> {
        if self.assume_yes {
            Box::new(AssumeYes)
        } else {
            Box::new(StdinConfirm)
        }
    }

    fn target_rack(&self, rack: Option<String>) -> Result<String> {
        rack.or_else(|| self.api.navigation().rack_id().map(str::to_string))
            .ok_or_else(|| {
                RackzError::Api("No rack open. Pass --rack or run `rackz rack open <rack>`".into())
            })
    }

    /// Rack and box for document operations. The open box is only used when
    /// it belongs to the rack being addressed.
    fn target_box(&self, rack: Option<String>, box_id: Option<u32>) -> Result<(String, u32)> {
        let rack = self.target_rack(rack)?;
        let nav = self.api.navigation();
        let open_box = if nav.rack_id() == Some(rack.as_str()) {
            nav.box_id()
        } else {
            None
        };
        let box_id = box_id.or(open_box).ok_or_else(|| {
            RackzError::Api("No box open. Pass --box or run `rackz box open <n>`".into())
        })?;
        Ok((rack, box_id))
    }
}

fn handle_status(ctx: &AppContext) -> Result<()> {
    println!("Location:  {}", render_location(ctx.api.navigation()).bold());
    println!("Backend:   {}", ctx.api.store().describe());
    let result = ctx.api.stats()?;
    if let Some(stats) = &result.stats {
        print!("{}", render_stats(stats));
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_rack_add(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.add_rack()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_rack_delete(ctx: &mut AppContext, rack: &str) -> Result<()> {
    let confirm = ctx.confirmer();
    let result = ctx.api.delete_rack(rack, &*confirm)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_rack_list(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.list_racks()?;
    print!(
        "{}",
        render_racks(&result.listed_racks, ctx.api.navigation())
    );
    print_messages(&result.messages);
    Ok(())
}

fn handle_rack_open(ctx: &mut AppContext, rack: &str) -> Result<()> {
    let result = ctx.api.open_rack(rack)?;
    print_messages(&result.messages);
    print!(
        "{}",
        render_boxes(&result.listed_boxes, ctx.api.navigation())
    );
    Ok(())
}

fn handle_rack_close(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.close_rack()?;
    print!(
        "{}",
        render_racks(&result.listed_racks, ctx.api.navigation())
    );
    Ok(())
}

fn handle_box_add(ctx: &mut AppContext, rack: Option<String>) -> Result<()> {
    let rack = ctx.target_rack(rack)?;
    let result = ctx.api.add_box(&rack)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_box_delete(ctx: &mut AppContext, rack: Option<String>, box_id: u32) -> Result<()> {
    let rack = ctx.target_rack(rack)?;
    let confirm = ctx.confirmer();
    let result = ctx.api.delete_box(&rack, box_id, &*confirm)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_box_open(ctx: &mut AppContext, rack: Option<String>, box_id: u32) -> Result<()> {
    let rack = ctx.target_rack(rack)?;
    let result = ctx.api.open_box(&rack, box_id)?;
    print_messages(&result.messages);
    if result.listed_documents.is_empty() {
        println!("{}", "This box is empty.".dimmed());
    } else {
        print!("{}", render_documents(&result.listed_documents, false));
    }
    Ok(())
}

fn handle_box_close(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.close_box()?;
    print_messages(&result.messages);
    if ctx.api.navigation().rack_id().is_some() {
        print!(
            "{}",
            render_boxes(&result.listed_boxes, ctx.api.navigation())
        );
    } else {
        print!(
            "{}",
            render_racks(&result.listed_racks, ctx.api.navigation())
        );
    }
    Ok(())
}

fn handle_file_add(
    ctx: &mut AppContext,
    rack: Option<String>,
    box_id: Option<u32>,
    fields: NewDocument,
) -> Result<()> {
    let (rack, box_id) = ctx.target_box(rack, box_id)?;
    let result = ctx.api.add_document(&rack, box_id, fields)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_file_delete(
    ctx: &mut AppContext,
    rack: Option<String>,
    box_id: Option<u32>,
    position: usize,
) -> Result<()> {
    let (rack, box_id) = ctx.target_box(rack, box_id)?;
    let result = ctx.api.delete_document(&rack, box_id, position)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_search(ctx: &AppContext, query: &str) -> Result<()> {
    let result = ctx.api.search(query)?;
    if let Some(outcome) = &result.search {
        print!("{}", render_search(outcome));
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_ledger(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.ledger()?;
    if result.listed_documents.is_empty() {
        println!("{}", "No records found.".dimmed());
    } else {
        print!("{}", render_documents(&result.listed_documents, true));
    }
    Ok(())
}

fn handle_stats(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.stats()?;
    if let Some(stats) = &result.stats {
        print!("{}", render_stats(stats));
    }
    Ok(())
}

fn handle_export(ctx: &AppContext, path: Option<PathBuf>) -> Result<()> {
    let path = path.unwrap_or_else(|| PathBuf::from(SNAPSHOT_FILENAME));
    let result = ctx.api.export(&path)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_import(ctx: &mut AppContext, path: &Path) -> Result<()> {
    let result = ctx.api.import(path)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(data_dir: &Path, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };
    let show_all = matches!(action, ConfigAction::ShowAll);

    let result = api::config(data_dir, action)?;
    if let (true, Some(config)) = (show_all, &result.config) {
        for key in RackzConfig::KEYS {
            println!("{} = {}", key, config.get(key).unwrap_or_default());
        }
    }
    print_messages(&result.messages);
    Ok(())
}
