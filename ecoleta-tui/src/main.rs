//! Terminal UI for Ecoleta that registers recycling collection points.

mod app;
mod effects;
mod input;
mod ui;

use std::{
    fs::OpenOptions,
    io,
    path::PathBuf,
    sync::{Arc, Mutex},
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ecoleta_core::{
    config::EcoletaConfig, plugin::ProviderSet, service::RegistrationService,
};
use ecoleta_provider_backend::{BackendCatalogPort, BackendCollectPointPort};
use ecoleta_provider_geoip as geoip;
use ecoleta_provider_ibge::IbgeGeographyPort;
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use reqwest::Client;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;
use crate::effects::Completion;
use crate::input::Action;

#[derive(Debug, Parser)]
#[command(name = "ecoleta", about = "Register recycling collection points from the terminal")]
struct Args {
    /// TOML configuration file
    #[arg(long, short)]
    config: Option<PathBuf>,
    /// Base URL of the collection point backend
    #[arg(long)]
    backend_url: Option<String>,
    /// File receiving log output
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = EcoletaConfig::load(args.config.as_deref())?;
    if let Some(url) = args.backend_url {
        config.backend_url = url;
    }
    if let Some(path) = args.log_file {
        config.log_file = path;
    }
    config.validate()?;

    init_tracing(&config)?;
    info!(backend = %config.backend_url, "starting ecoleta");

    // HTTP + service setup
    let client = Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()?;

    let providers = ProviderSet {
        catalog_port: Arc::new(BackendCatalogPort::new(client.clone(), &config.backend_url)),
        collect_point_port: Arc::new(BackendCollectPointPort::new(
            client.clone(),
            &config.backend_url,
        )),
        geography_port: Arc::new(IbgeGeographyPort::with_base_url(
            client.clone(),
            &config.geography_url,
        )),
        location_port: geoip::plugin(client, &config.location),
    };
    let service = Arc::new(RegistrationService::new(providers));

    // App state
    let app = App::new(config.map_zoom);

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let res = run(&mut terminal, app, &service).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!("ecoleta stopped");
    res
}

fn init_tracing(config: &EcoletaConfig) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("cannot open log file {}", config.log_file.display()))?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str())),
        )
        // Log to a file; stdout belongs to the terminal UI
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .try_init()?;
    Ok(())
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
    service: &Arc<RegistrationService>,
) -> Result<()> {
    let (completions, mut pending): (UnboundedSender<Completion>, UnboundedReceiver<Completion>) =
        unbounded_channel();

    loop {
        // Apply finished requests of the current form; older forms are gone
        while let Ok((session, event)) = pending.try_recv() {
            if session != app.session {
                debug!(session, current = app.session, "dropping completion of closed form");
                continue;
            }
            let effects = app.handle(event);
            effects::spawn(effects, app.session, service, &completions);
        }

        let size = terminal.size()?;
        app.map_area = ui::map_inner_area(Rect::new(0, 0, size.width, size.height));

        // Draw current UI
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll for input (non-blocking, small timeout to keep CPU low)
        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        let action = match event::read()? {
            CEvent::Key(key) => input::handle_key_event(key, &mut app),
            CEvent::Mouse(mouse) => input::handle_mouse_event(mouse, &mut app),
            _ => Action::None,
        };

        match action {
            Action::Quit => break,
            Action::None => {}
            Action::Run(effects) => effects::spawn(effects, app.session, service, &completions),
        }
    }

    Ok(())
}
