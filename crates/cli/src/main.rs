use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use citadel_client::{CatalogApi, ConnectivityProbe, FixedProbe, RemoteSource, SysfsProbe};
use citadel_core::filter::{FilterDimension, FilterSelection};
use citadel_core::models::{CharacterDetail, CharacterSummary, LocationDetail};
use citadel_core::types::EntityId;
use citadel_db::{CacheStore, CharacterRepository, MemoryCacheStore, SqliteCacheStore};
use citadel_events::EventBus;
use citadel_sync::{CatalogSession, DetailService, LoadReport, StartReport};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;

use config::{AppConfig, ConnectivityMode, LogFormat};

#[derive(Debug, Parser)]
#[command(name = "citadel", about = "Browse the character catalog with an offline cache")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load list pages and print the visible characters.
    List {
        /// Number of pages to fetch. A restored cache does not count.
        #[arg(long, default_value_t = 1)]
        pages: u32,
        /// Name search; also sent to the server for subsequent pages.
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        status: Vec<String>,
        #[arg(long)]
        species: Vec<String>,
        #[arg(long)]
        gender: Vec<String>,
    },
    /// Show one character.
    Character { id: EntityId },
    /// Show one location.
    Location {
        id: EntityId,
        /// Also resolve every resident.
        #[arg(long)]
        residents: bool,
    },
    /// Drop cached summaries and reload the first page.
    Reset,
}

struct App {
    session: CatalogSession,
    details: DetailService,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    init_tracing(config.log_format);

    let app = build(&config).await?;

    match cli.command {
        Command::List {
            pages,
            name,
            status,
            species,
            gender,
        } => list(&app, pages, name, status, species, gender).await,
        Command::Character { id } => {
            let served = app.details.character(id).await?;
            tracing::info!(id, source = ?served.source, "Character loaded");
            print_character(&served.value);
            Ok(())
        }
        Command::Location { id, residents } => {
            let served = app.details.location(id).await?;
            tracing::info!(id, source = ?served.source, "Location loaded");
            print_location(&served.value);
            if residents {
                for resident in app.details.residents(&served.value).await {
                    match resident.character {
                        Some(character) => print_summary(&character.summary()),
                        None => println!("#{:<5} (unavailable)", resident.id),
                    }
                }
            }
            Ok(())
        }
        Command::Reset => {
            let report = app.session.reset_all().await?;
            report_load(&report);
            print_list(&app.session.visible());
            Ok(())
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "citadel=info,citadel_sync=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

async fn build(config: &AppConfig) -> anyhow::Result<App> {
    let store: Arc<dyn CacheStore> = if config.uses_memory_store() {
        tracing::info!("Using in-memory cache");
        Arc::new(MemoryCacheStore::new())
    } else {
        let store = SqliteCacheStore::open(&config.database_url)
            .await
            .with_context(|| format!("Failed to open cache at {}", config.database_url))?;
        citadel_db::health_check(store.pool())
            .await
            .context("Cache health check failed")?;
        tracing::info!("Cache database ready");
        Arc::new(store)
    };

    let probe: Arc<dyn ConnectivityProbe> = match config.connectivity {
        ConnectivityMode::Auto => Arc::new(SysfsProbe::default()),
        ConnectivityMode::Online => Arc::new(FixedProbe::online()),
        ConnectivityMode::Offline => Arc::new(FixedProbe::offline()),
    };

    let remote: Arc<dyn RemoteSource> = Arc::new(CatalogApi::new(config.api_base_url.clone()));
    let repository = CharacterRepository::new(store);
    let events = Arc::new(EventBus::default());

    let mut rx = events.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = rx.recv().await {
            tracing::debug!(kind = %event.kind, entity_id = ?event.entity_id, payload = %event.payload, "Event");
        }
    });

    Ok(App {
        session: CatalogSession::new(remote.clone(), repository.clone(), events.clone()),
        details: DetailService::new(remote, repository, probe, events),
    })
}

async fn list(
    app: &App,
    pages: u32,
    name: Option<String>,
    status: Vec<String>,
    species: Vec<String>,
    gender: Vec<String>,
) -> anyhow::Result<()> {
    let session = &app.session;

    if let Some(name) = name {
        session.set_search_query(name);
    }

    let mut filters = FilterSelection::new();
    for (dimension, values) in [
        (FilterDimension::Status, status),
        (FilterDimension::Species, species),
        (FilterDimension::Gender, gender),
    ] {
        for value in values {
            filters = filters.with(dimension, value);
        }
    }
    session.update_filters(filters);

    let remaining = match session.start().await? {
        StartReport::Restored { count } => {
            println!("Restored {count} cached characters");
            pages
        }
        StartReport::Fetched(report) => {
            report_load(&report);
            pages.saturating_sub(1)
        }
    };

    for _ in 0..remaining {
        let report = session.load_next_characters().await?;
        report_load(&report);
        if matches!(report, LoadReport::Exhausted | LoadReport::Failed { .. }) {
            break;
        }
    }

    print_list(&session.visible());
    Ok(())
}

fn report_load(report: &LoadReport) {
    match report {
        LoadReport::Loaded {
            page,
            count,
            is_last_page,
        } => {
            let suffix = if *is_last_page { " (last page)" } else { "" };
            println!("Loaded page {page}: {count} characters{suffix}");
        }
        LoadReport::InFlight => println!("A load is already running"),
        LoadReport::Exhausted => println!("All pages loaded"),
        LoadReport::Failed { page } => println!("Page {page} could not be loaded"),
    }
}

fn print_list(characters: &[CharacterSummary]) {
    for character in characters {
        print_summary(character);
    }
    println!("{} shown", characters.len());
}

fn print_summary(character: &CharacterSummary) {
    println!(
        "#{:<5} {:<32} {:<8} {:<12} {}",
        character.id, character.name, character.status, character.species, character.gender
    );
}

fn print_character(character: &CharacterDetail) {
    println!("#{} {}", character.id, character.name);
    println!("  status:   {}", character.status);
    println!("  species:  {}", character.species);
    if !character.kind.is_empty() {
        println!("  type:     {}", character.kind);
    }
    println!("  gender:   {}", character.gender);
    println!("  origin:   {}{}", character.origin.name, place_suffix(character.origin_id()));
    println!("  location: {}{}", character.location.name, place_suffix(character.location_id()));
    println!("  episodes: {}", character.episode_labels().join(" "));
}

fn print_location(location: &LocationDetail) {
    println!("#{} {}", location.id, location.name);
    println!("  type:      {}", location.kind);
    println!("  dimension: {}", location.dimension);
    println!("  residents: {}", location.resident_ids().len());
}

fn place_suffix(id: Option<EntityId>) -> String {
    id.map(|id| format!(" (location {id})")).unwrap_or_default()
}
