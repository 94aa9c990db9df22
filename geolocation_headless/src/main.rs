use app_config::{AppConfig, PermissionMode};
use clap::{CommandFactory, Parser};
use common::position::Position;
use location::{
    LocationModule,
    gpsd_source::GpsdProvider,
    permission::{PermissionCollaborator, PromptPermission, StaticPermission},
    provider::LocationProvider,
    replay_source::ReplayProvider,
};
use module_core::{Event, EventBus, EventKind, Module, publish};
use presenter::UpdatePresenter;
use std::{
    io::Read,
    path::{Path, PathBuf},
    sync::Arc,
};
use terminal_view::TerminalView;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

mod app_config;
mod terminal_view;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Read the location from a GPSD daemon.
    #[arg(short = 'd', long)]
    gpsd: bool,
    /// Address of the GPSD daemon, overrides the configuration.
    #[arg(short = 'a', long)]
    gpsd_address: Option<String>,
    /// Replay a recorded track instead of using a receiver.
    #[arg(short, long)]
    gps_fake: bool,
    /// CSV file with the track to replay (longitude, latitude).
    #[arg(short = 'f', long)]
    gps_source_file: Option<PathBuf>,
    /// How the location permission is obtained, overrides the configuration.
    #[arg(short, long, value_enum)]
    permission: Option<PermissionMode>,
    /// Configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn read_track_points<R: Read>(reader: R) -> Result<Vec<Position>, csv::Error> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut positions = Vec::new();
    for record in rdr.deserialize::<(f64, f64)>() {
        let (longitude, latitude) = record?;
        positions.push(Position {
            latitude,
            longitude,
        });
    }
    debug!("length of positions: {}", positions.len());
    Ok(positions)
}

fn read_track_points_from_file(file_path: &Path) -> Result<Vec<Position>, ()> {
    let file = std::fs::File::open(file_path).map_err(|e| {
        error!("Failed to open track file {}. Error: {e}", file_path.display());
    })?;
    read_track_points(file).map_err(|e| {
        error!("Failed to read track file {}. Error: {e}", file_path.display());
    })
}

fn create_permission(mode: PermissionMode) -> Arc<dyn PermissionCollaborator> {
    match mode {
        PermissionMode::Granted => Arc::new(StaticPermission::granted()),
        PermissionMode::Denied => Arc::new(StaticPermission::denied()),
        PermissionMode::Prompt => Arc::new(PromptPermission::new()),
    }
}

fn create_gpsd_provider(
    cli: &Cli,
    config: &AppConfig,
    permission: Arc<dyn PermissionCollaborator>,
) -> Box<dyn LocationProvider> {
    let address = cli
        .gpsd_address
        .as_deref()
        .unwrap_or(config.gpsd().address());
    info!("Using GPSD at {address}");
    Box::new(GpsdProvider::new(address, permission))
}

fn create_fake_gps_provider(
    cli: &Cli,
    config: &AppConfig,
    permission: Arc<dyn PermissionCollaborator>,
) -> Result<Box<dyn LocationProvider>, ()> {
    let Some(source_file) = &cli.gps_source_file else {
        error!("Failed to create the replay provider. Error: gps_source_file not set");
        let _ = Cli::command().print_help();
        return Err(());
    };
    let positions = read_track_points_from_file(source_file)?;
    let replay = config.replay();
    let provider = ReplayProvider::new(
        &positions,
        replay.interval(),
        replay.velocity(),
        replay.accuracy(),
        permission,
    )
    .map_err(|e| error!("Failed to create the replay provider. Error: {e}"))?;
    Ok(Box::new(provider))
}

fn register_quit_handler(eb: &EventBus) -> Result<(), ()> {
    let sender = eb.sender();
    ctrlc::set_handler(move || {
        info!("Stopping modules...");
        publish(&sender, EventKind::PauseEvent);
        publish(&sender, EventKind::QuitEvent);
    })
    .map_err(|e| error!("Failed to register the Ctrl-C handler. Error: {e}"))
}

#[tokio::main]
async fn main() -> Result<(), ()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = AppConfig::load(cli.config.as_deref())
        .map_err(|e| error!("Failed to load the configuration. Error: {e}"))?;
    let permission = create_permission(cli.permission.unwrap_or(config.permission()));

    let eb = EventBus::default();
    let provider = if cli.gpsd {
        create_gpsd_provider(&cli, &config, permission.clone())
    } else if cli.gps_fake {
        create_fake_gps_provider(&cli, &config, permission.clone())?
    } else {
        error!("No GPS source specified. Use --gpsd or --gps-fake");
        let _ = Cli::command().print_help();
        return Err(());
    };
    let mut presenter = UpdatePresenter::new(eb.context(), Box::new(TerminalView::default()));
    let mut location = LocationModule::new(eb.context(), provider, permission);
    register_quit_handler(&eb)?;

    // The terminal is visible for the whole session.
    eb.publish(&Event {
        kind: EventKind::ResumeEvent,
    });

    info!("Starting modules...");
    let (location_result, presenter_result) = tokio::join!(location.run(), presenter.run());
    location_result.and(presenter_result)
}
