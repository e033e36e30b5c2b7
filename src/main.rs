use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use folio_store::{
    embed::{decode_data_url, encode_data_url, mime_for_path},
    schema::{active_resume, Setting},
    summarize, Collection, DownloadLog, Fields, FileStorage, FolioConfig, Record, RecordStore,
};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Edit the content collections behind a portfolio site.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Data directory (overrides FOLIO_HOME)
    #[arg(long, global = true)]
    home: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every record in a collection
    List { collection: Collection },
    /// Print one record
    Get { collection: Collection, id: String },
    /// Add a record; the id is generated
    Add {
        collection: Collection,
        /// Field assignment; values that parse as JSON are stored as JSON
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
        /// Fields as a JSON object, applied before --set
        #[arg(long)]
        json: Option<String>,
    },
    /// Merge fields into an existing record
    Update {
        collection: Collection,
        id: String,
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
        #[arg(long)]
        json: Option<String>,
    },
    /// Delete a record
    Delete { collection: Collection, id: String },
    /// Export the whole document as pretty JSON
    Export {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Replace the whole document with the contents of a JSON file
    Import { file: PathBuf },
    /// Delete the document; the next read restores the defaults
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
    /// Check the document's structure
    Audit,
    /// Record counts per collection
    Overview,
    /// Store a file inside a record field as a data URL
    Attach {
        collection: Collection,
        id: String,
        field: String,
        file: PathBuf,
    },
    /// Write a data-URL field of a record out to a file
    Extract {
        collection: Collection,
        id: String,
        field: String,
        out: PathBuf,
    },
    /// Show the active resume setting
    Resume,
    /// Download log
    Downloads {
        #[command(subcommand)]
        action: DownloadCommands,
    },
}

#[derive(Subcommand)]
enum DownloadCommands {
    /// Record that a file was downloaded
    Record { subject_id: String, title: String },
    /// Print every recorded download
    List,
    /// Downloads grouped by subject
    Stats,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = FolioConfig::from_env()?;
    if let Some(home) = cli.home {
        config.home = home;
    }
    info!("📂 Using data directory {}", config.home.display());

    let storage = config.open_storage()?;
    let store = RecordStore::with_key(storage.clone(), config.storage_key.clone());

    match cli.command {
        Commands::List { collection } => {
            let records = store.get_all(collection)?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Commands::Get { collection, id } => {
            let record = store
                .get_one(collection, &id)?
                .ok_or_else(|| anyhow!("no record {id} in {collection}"))?;
            print_record(&record)?;
        }
        Commands::Add {
            collection,
            set,
            json,
        } => {
            let fields = build_fields(&set, json.as_deref())?;
            let record = store.add(collection, fields)?;
            print_record(&record)?;
        }
        Commands::Update {
            collection,
            id,
            set,
            json,
        } => {
            let fields = build_fields(&set, json.as_deref())?;
            let record = store
                .update(collection, &id, fields)?
                .ok_or_else(|| anyhow!("no record {id} in {collection}"))?;
            print_record(&record)?;
        }
        Commands::Delete { collection, id } => {
            if !store.delete(collection, &id)? {
                bail!("no record {id} in {collection}");
            }
            println!("🗑️  Deleted {id} from {collection}");
        }
        Commands::Export { out } => {
            let json = store.export_all()?;
            match out {
                Some(path) => {
                    fs::write(&path, json)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("✅ Exported to {}", path.display());
                }
                None => println!("{json}"),
            }
        }
        Commands::Import { file } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            store.import_all(&text)?;
            println!("✅ Imported {}", file.display());
            report_audit(&store)?;
        }
        Commands::Reset { yes } => {
            if !yes {
                bail!("refusing to reset without --yes");
            }
            store.reset()?;
            println!("♻️  Document reset; defaults return on next read");
        }
        Commands::Audit => {
            if !report_audit(&store)? {
                bail!("document has structural problems");
            }
        }
        Commands::Overview => {
            println!("📋 Collections:");
            println!("{}", "─".repeat(30));
            for (collection, count) in store.counts()? {
                println!("{:<16} {:>5}", collection.as_str(), count);
            }
        }
        Commands::Attach {
            collection,
            id,
            field,
            file,
        } => attach(&store, collection, &id, &field, &file)?,
        Commands::Extract {
            collection,
            id,
            field,
            out,
        } => extract(&store, collection, &id, &field, &out)?,
        Commands::Resume => {
            let settings: Vec<Setting> = store.get_all_as(Collection::Settings)?;
            match active_resume(&settings) {
                Some(setting) => match decode_data_url(&setting.value) {
                    Ok(data) => println!(
                        "📄 Resume in setting {} ({}, {} bytes)",
                        setting.id,
                        data.mime,
                        data.bytes.len()
                    ),
                    Err(_) => println!("📄 Resume in setting {}: {}", setting.id, setting.value),
                },
                None => bail!("no resume uploaded"),
            }
        }
        Commands::Downloads { action } => {
            let log = DownloadLog::with_key(storage, config.downloads_key.clone());
            match action {
                DownloadCommands::Record { subject_id, title } => {
                    let event = log.record(&subject_id, &title)?;
                    println!("{}", serde_json::to_string_pretty(&event)?);
                }
                DownloadCommands::List => {
                    println!("{}", serde_json::to_string_pretty(&log.read_all()?)?);
                }
                DownloadCommands::Stats => {
                    let events = log.read_all()?;
                    println!("📈 Downloads ({} total)", events.len());
                    println!("{}", "─".repeat(50));
                    for summary in summarize(&events) {
                        println!(
                            "{:>4}  {}  {} (last {})",
                            summary.count,
                            summary.subject_id,
                            summary.subject_title,
                            summary.last_downloaded.format("%Y-%m-%d %H:%M:%S")
                        );
                    }
                }
            }
        }
    }

    Ok(())
}

fn print_record(record: &Record) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(record)?);
    Ok(())
}

/// `--json` first, then each `--set KEY=VALUE`. A value that is not valid
/// JSON is kept as a plain string.
fn build_fields(set: &[String], json: Option<&str>) -> anyhow::Result<Fields> {
    let mut fields = match json {
        Some(raw) => match serde_json::from_str::<Value>(raw).context("parsing --json")? {
            Value::Object(map) => map,
            _ => bail!("--json must be a JSON object"),
        },
        None => Fields::new(),
    };
    for assignment in set {
        let (key, raw) = assignment
            .split_once('=')
            .ok_or_else(|| anyhow!("expected KEY=VALUE, got {assignment:?}"))?;
        if key.is_empty() {
            bail!("empty field name in {assignment:?}");
        }
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        fields.insert(key.to_string(), value);
    }
    Ok(fields)
}

/// Prints the audit; returns whether the document is clean.
fn report_audit(store: &RecordStore<FileStorage>) -> anyhow::Result<bool> {
    let audit = store.audit()?;
    if audit.is_clean() {
        println!("✅ Document structure looks good");
        return Ok(true);
    }
    if audit.root_not_object {
        println!("⚠️  Document root is not a JSON object");
    }
    for collection in &audit.missing {
        println!("⚠️  Missing collection: {collection}");
    }
    for collection in &audit.not_arrays {
        println!("⚠️  Collection is not a list: {collection}");
    }
    for (collection, index) in &audit.invalid_entries {
        println!("⚠️  {collection}[{index}] has no string id");
    }
    for (collection, id) in &audit.duplicate_ids {
        println!("⚠️  Duplicate id {id} in {collection}");
    }
    for key in &audit.unknown_keys {
        println!("⚠️  Unknown top-level key: {key}");
    }
    Ok(false)
}

fn attach(
    store: &RecordStore<FileStorage>,
    collection: Collection,
    id: &str,
    field: &str,
    file: &Path,
) -> anyhow::Result<()> {
    let bytes = fs::read(file).with_context(|| format!("reading {}", file.display()))?;
    let url = encode_data_url(mime_for_path(file), &bytes);
    let mut fields = Fields::new();
    fields.insert(field.to_string(), Value::String(url));
    store
        .update(collection, id, fields)?
        .ok_or_else(|| anyhow!("no record {id} in {collection}"))?;
    println!("📎 Attached {} ({} bytes) to {collection}/{id}.{field}", file.display(), bytes.len());
    Ok(())
}

fn extract(
    store: &RecordStore<FileStorage>,
    collection: Collection,
    id: &str,
    field: &str,
    out: &Path,
) -> anyhow::Result<()> {
    let record = store
        .get_one(collection, id)?
        .ok_or_else(|| anyhow!("no record {id} in {collection}"))?;
    let raw = record
        .get_str(field)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| anyhow!("{collection}/{id} has no {field}"))?;
    let data = decode_data_url(raw)?;
    fs::write(out, &data.bytes).with_context(|| format!("writing {}", out.display()))?;
    println!("💾 Wrote {} ({}, {} bytes)", out.display(), data.mime, data.bytes.len());
    Ok(())
}
