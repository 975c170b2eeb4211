use tracing::info;
use tracing_subscriber::EnvFilter;

use transit_router::config::AppConfig;
use transit_router::geocode::{
    CachedGeocoder, GeocodeCacheConfig, GeocoderBackend, NominatimClient, NominatimConfig,
    StaticGeocoder,
};
use transit_router::planner::{SearchConfig, TimetableRouter};
use transit_router::render::HtmlMapRenderer;
use transit_router::road::{OsrmClient, OsrmConfig, RoadBackend, StraightLineRouter};
use transit_router::timetable::{LoaderConfig, load_timetable};
use transit_router::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env()?;

    // Load the timetable (fail fast if unreadable)
    let loader = LoaderConfig::default().with_delimiter(config.csv_delimiter);
    let loaded = load_timetable(&config.timetable_csv, &loader)?;

    let router = TimetableRouter::new(loaded.graph, SearchConfig::default());

    let geocoder = match &config.geocode_file {
        Some(path) => {
            let table = StaticGeocoder::from_json_file(path)?;
            info!(addresses = table.len(), "Using address table");
            GeocoderBackend::Static(table)
        }
        None => {
            let mut nominatim = NominatimConfig::default();
            if let Some(url) = &config.nominatim_url {
                nominatim = nominatim.with_base_url(url);
            }
            let client = NominatimClient::new(nominatim)?;
            GeocoderBackend::Nominatim(CachedGeocoder::new(client, &GeocodeCacheConfig::default()))
        }
    };

    let road = match &config.osrm_url {
        Some(url) => {
            let client = OsrmClient::new(OsrmConfig::default().with_base_url(url))?;
            RoadBackend::Osrm(client)
        }
        None => {
            info!("OSRM_URL not set, walks are straight lines");
            RoadBackend::StraightLine(StraightLineRouter::new())
        }
    };

    let maps = HtmlMapRenderer::new(&config.map_output_dir);

    let state = AppState::new(router, geocoder, road, maps);
    let app = create_router(state);

    let addr = config.bind_addr;
    info!("Transit router listening on http://{addr}");
    info!("  GET /health             - Health check");
    info!("  GET /api/stops/resolve  - Match a stop name");
    info!("  GET /api/stops/nearest  - Stop nearest to a position");
    info!("  GET /api/route          - Plan a journey");
    info!("  GET /api/road           - Street route without transit");
    info!("  GET /map                - Journey on a map");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
