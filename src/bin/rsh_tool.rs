//! rsh_tool - inspection tool for Rsh/Rsb data files
//!
//! Usage:
//!   rsh_tool info <file>                 - Show header summary
//!   rsh_tool text-header <file>          - Render header as text config
//!   rsh_tool event <file> <index> [-n N] - Show one event
//!   rsh_tool dump-json <file>            - Print header as JSON

use std::path::Path;

use anyhow::Context;
use clap::Parser;
use rsh_rs::common::{ToolArgs, ToolCommand};
use rsh_rs::config::Config;
use rsh_rs::store::{EventStore, StoreOptions};
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let args = ToolArgs::parse();

    let config = match &args.common.config_file {
        Some(path) => {
            Config::load(path).with_context(|| format!("loading config {}", path.display()))?
        }
        None => Config::default(),
    };

    // Initialize tracing (logging)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&config.logging.filter))?,
        )
        .init();

    // Inspection never writes
    let options = StoreOptions {
        writable: false,
        ..config.store.to_options()?
    };
    debug!(codepage = options.codepage.name(), "Store options resolved");

    match args.command {
        ToolCommand::Info { file } => show_info(&file, options),
        ToolCommand::TextHeader { file } => {
            let store = open(&file, options)?;
            print!("{}", store.params().to_text_header()?);
            Ok(())
        }
        ToolCommand::Event {
            file,
            index,
            samples,
        } => show_event(&file, options, index, samples),
        ToolCommand::DumpJson { file } => {
            let store = open(&file, options)?;
            println!("{}", serde_json::to_string_pretty(store.params())?);
            Ok(())
        }
    }
}

fn open(path: &Path, options: StoreOptions) -> anyhow::Result<EventStore<std::fs::File>> {
    EventStore::open_with(path, options).with_context(|| format!("opening {}", path.display()))
}

fn show_info(path: &Path, options: StoreOptions) -> anyhow::Result<()> {
    let store = open(path, options)?;
    let p = store.params();

    println!("File: {}", path.display());
    println!("Size: {} bytes", std::fs::metadata(path)?.len());
    println!();

    println!("=== Header ===");
    println!("  Board:          {} (id {})", p.board_name, p.board_id);
    println!("  Original path:  {}", p.filepath);
    println!("  Start Time:     {}", p.start_time);
    println!("  End Time:       {}", p.end_time);
    println!("  Events:         {}", p.events_num);
    println!("  Sample Freq:    {} Hz", p.sample_freq);
    println!("  Block Size:     {}", p.b_size);
    println!("  Pre-history:    {}", p.pre_history);
    println!("  Threshold:      {}", p.threshold);
    println!("  Synchro:        {}", p.synchro_control);
    println!(
        "  Synchro Chan:   {} [{}] gain {}",
        p.synchro_channel.channel_type, p.synchro_channel.params, p.synchro_channel.gain
    );

    println!();
    println!("=== Channels ({}) ===", p.channel_number);
    for (i, ch) in p.channel.iter().enumerate() {
        println!(
            "  [{}] gain {:>4}  adjustment {:>10}  {}",
            i, ch.gain, ch.adjustment, ch.params
        );
    }

    println!();
    println!("=== Geometry ===");
    println!("  Samples/Event:  {}", store.samples_per_event());
    println!("  Event Stride:   {} bytes", store.event_stride());

    Ok(())
}

fn show_event(
    path: &Path,
    options: StoreOptions,
    index: i64,
    samples: usize,
) -> anyhow::Result<()> {
    let mut store = open(path, options)?;
    let ev = store.event(index)?;

    println!("Event {}", index);
    println!("  Tag:            {}", ev.tag_lossy());
    println!("  Sequence:       {}", ev.sequence);
    println!("  Start Time:     {}", ev.start_time);
    if let Some(ns) = ev.ns_since_epoch {
        println!("  ns since epoch: {}", ns);
    }

    let shown = samples.min(ev.data.len());
    println!("  Samples:        {:?}", &ev.data[..shown]);
    if shown < ev.data.len() {
        println!("                  ... {} more", ev.data.len() - shown);
    }

    Ok(())
}
