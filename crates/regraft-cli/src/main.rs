// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Regraft developer CLI: inspect a network document, list replacement
//! candidates, and run retype batches.
#![allow(clippy::print_stdout)]

mod doc;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::Table;
use regraft_app_core::config::ConfigService;
use regraft_app_core::prefs::{ReplacerPrefs, PREFS_KEY};
use regraft_config_fs::FsConfigStore;
use regraft_core::{
    classify, make_type_key, Category, CategorySet, FilterOptions, RetypeSession,
};

use crate::doc::NetworkDoc;

#[derive(Parser)]
#[command(name = "regraft", version, about = "Inspect and retype typed network documents")]
struct Cli {
    /// Path to the JSON network document.
    #[arg(long, global = true, default_value = "network.json")]
    network: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum CategoryArg {
    Road,
    Rail,
    Metro,
    Pedestrian,
    Decoration,
    Other,
}

impl From<CategoryArg> for Category {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Road => Category::Road,
            CategoryArg::Rail => Category::RailTrack,
            CategoryArg::Metro => Category::MetroTrack,
            CategoryArg::Pedestrian => Category::Pedestrian,
            CategoryArg::Decoration => Category::Decoration,
            CategoryArg::Other => Category::Other,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// List every type in the document with its resolved attributes.
    Inspect,
    /// List valid replacement candidates for a source type.
    Candidates {
        /// Source type display name.
        #[arg(long)]
        source: String,
        /// Admit candidates of any width.
        #[arg(long)]
        any_width: bool,
        /// Restrict candidates to matching station flag.
        #[arg(long)]
        station_only: bool,
        /// Allowed categories (repeatable); all when omitted.
        #[arg(long, value_enum)]
        category: Vec<CategoryArg>,
        /// Case-insensitive name substring filter.
        #[arg(long, default_value = "")]
        name: String,
        /// Hide built-in types.
        #[arg(long)]
        hide_built_in: bool,
        /// Persist the resulting toggles as the session default.
        #[arg(long)]
        save_prefs: bool,
    },
    /// Replace every interior edge of one type with another.
    Retype {
        /// Source type display name.
        #[arg(long)]
        source: String,
        /// Target type display name.
        #[arg(long)]
        target: String,
        /// Report counts without writing the document back.
        #[arg(long)]
        dry_run: bool,
        /// Revert immediately after retyping (round-trip check).
        #[arg(long)]
        verify_undo: bool,
    },
}

fn load(path: &Path) -> Result<NetworkDoc> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading network document {}", path.display()))?;
    NetworkDoc::from_json(&text)
}

fn prefs_service() -> Option<ConfigService<FsConfigStore>> {
    FsConfigStore::new().ok().map(ConfigService::new)
}

/// Starts from the saved session defaults and layers the explicit flags on
/// top (boolean flags only ever tighten; absent flags keep the saved value).
fn options_for(
    any_width: bool,
    station_only: bool,
    categories: &[CategoryArg],
    name: &str,
    hide_built_in: bool,
) -> FilterOptions {
    let saved = prefs_service()
        .and_then(|svc| svc.load::<ReplacerPrefs>(PREFS_KEY).ok().flatten())
        .map(|prefs| prefs.filter)
        .unwrap_or_default();
    let mut options = saved;
    if any_width {
        options.same_width_only = false;
    }
    if station_only {
        options.station_only = true;
    }
    if !categories.is_empty() {
        options.categories = categories
            .iter()
            .fold(CategorySet::EMPTY, |mask, &c| mask.with(c.into()));
    }
    if !name.is_empty() {
        options.name_filter = name.to_owned();
    }
    if hide_built_in {
        options.hide_built_in = true;
    }
    options
}

fn save_prefs(options: &FilterOptions) -> Result<()> {
    let Some(service) = prefs_service() else {
        bail!("could not resolve the platform config directory");
    };
    let prefs = ReplacerPrefs {
        filter: options.clone(),
        last_categories: options.categories,
        confirm_above: 0,
    };
    service
        .save(PREFS_KEY, &prefs)
        .context("saving session prefs")
}

fn run_inspect(doc: &NetworkDoc) -> Result<()> {
    let catalog = doc.build_catalog()?;
    let mut table = Table::new();
    table.set_header(["Name", "Category", "Half width", "Role", "Station", "Provenance", "Key"]);
    for record in catalog.iter() {
        table.add_row([
            record.name.clone(),
            format!("{:?}", record.category),
            format!("{}", record.half_width),
            format!("{:?}", record.role),
            format!("{}", record.station),
            format!("{:?}", classify(record)),
            record.key.short_hex(),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn run_candidates(doc: &NetworkDoc, source: &str, options: &FilterOptions) -> Result<()> {
    let catalog = doc.build_catalog()?;
    let source_key = make_type_key(source);
    if !catalog.contains(source_key) {
        bail!("unknown source type {source:?}");
    }
    let session = RetypeSession::new(catalog);
    let candidates = session.find_candidates(source_key, options);
    let mut table = Table::new();
    table.set_header(["Name", "Category", "Half width", "Role", "Provenance"]);
    for key in &candidates {
        let Some(record) = session.catalog().get(*key) else {
            continue;
        };
        table.add_row([
            record.name.clone(),
            format!("{:?}", record.category),
            format!("{}", record.half_width),
            format!("{:?}", record.role),
            format!("{:?}", session.classify(record)),
        ]);
    }
    println!("{table}");
    println!("{} candidate(s) for {source:?}", candidates.len());
    Ok(())
}

fn run_retype(
    doc: &mut NetworkDoc,
    path: &Path,
    source: &str,
    target: &str,
    dry_run: bool,
    verify_undo: bool,
) -> Result<()> {
    let catalog = doc.build_catalog()?;
    let mut net = doc.build_network(&catalog)?;
    let source_key = make_type_key(source);
    let target_key = make_type_key(target);
    let mut session = RetypeSession::new(catalog);
    let outcome = session
        .retype(&mut net, source_key, target_key)
        .with_context(|| format!("retyping {source:?} -> {target:?}"))?;
    println!(
        "replaced {}, skipped {} boundary edge(s), {} failed create(s)",
        outcome.created.len(),
        outcome.skipped_boundary,
        outcome.failed_creates
    );
    if verify_undo {
        if session.revert(&mut net, &mut regraft_core::NoPaths) {
            println!("undo verified: edge types restored");
        } else {
            println!("nothing to revert");
        }
        return Ok(());
    }
    if dry_run {
        return Ok(());
    }
    doc.refresh_edges(session.catalog(), &net)?;
    fs::write(path, doc.to_json()?)
        .with_context(|| format!("writing network document {}", path.display()))?;
    println!("wrote {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Inspect => {
            let doc = load(&cli.network)?;
            run_inspect(&doc)
        }
        Command::Candidates {
            source,
            any_width,
            station_only,
            category,
            name,
            hide_built_in,
            save_prefs: persist,
        } => {
            let doc = load(&cli.network)?;
            let options = options_for(any_width, station_only, &category, &name, hide_built_in);
            if persist {
                save_prefs(&options)?;
            }
            run_candidates(&doc, &source, &options)
        }
        Command::Retype {
            source,
            target,
            dry_run,
            verify_undo,
        } => {
            let mut doc = load(&cli.network)?;
            run_retype(&mut doc, &cli.network, &source, &target, dry_run, verify_undo)
        }
    }
}
