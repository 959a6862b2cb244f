//! Single binary web server: Swiss tournament API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, SWISS_MAX_PAIRING_ATTEMPTS.

use actix_web::{
    get, post,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use swiss_tournament_web::{
    parse_results_csv, record_results, standings, standings_to_csv, MatchResult,
    PairingConfig, Snapshot, Tournament, TournamentError, TournamentId,
};

/// Per-tournament entry: tournament data + last activity time (for auto-cleanup).
struct TournamentEntry {
    tournament: Tournament,
    last_activity: Instant,
}

impl TournamentEntry {
    fn new(tournament: Tournament) -> Self {
        Self {
            tournament,
            last_activity: Instant::now(),
        }
    }
}

/// In-memory state: many tournaments by ID. Entries are removed after 12h inactivity.
type AppState = Data<RwLock<HashMap<TournamentId, TournamentEntry>>>;

/// Inactivity threshold: tournaments not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    players: Vec<String>,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

fn bad_request(e: TournamentError) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" }))
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

/// Run `action` against one tournament (refreshing its activity time) and reply with the
/// tournament on success.
fn update_tournament<F>(state: &AppState, id: TournamentId, action: F) -> HttpResponse
where
    F: FnOnce(&mut Tournament) -> Result<(), TournamentError>,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;
    match action(t) {
        Ok(()) => HttpResponse::Ok().json(t),
        Err(e) => {
            log::debug!("Rejected request for tournament {}: {}", id, e);
            bad_request(e)
        }
    }
}

/// Read-only counterpart of `update_tournament`; `render` builds the whole response.
fn read_tournament<F>(state: &AppState, id: TournamentId, render: F) -> HttpResponse
where
    F: FnOnce(&Tournament) -> HttpResponse,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.get_mut(&id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            render(&entry.tournament)
        }
        None => not_found(),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "swiss-tournament-web",
    })
}

/// Create a new tournament at round 0 (returns it with id; client stores id for subsequent requests).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    let body = body.into_inner();
    let tournament = match Tournament::new(body.name, &body.players) {
        Ok(t) => t,
        Err(e) => return bad_request(e),
    };
    let id = tournament.id;
    log::info!(
        "Created tournament {} ({}) with {} player(s)",
        tournament.name,
        id,
        tournament.registry.len()
    );
    let response = HttpResponse::Ok().json(&tournament);
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    g.insert(id, TournamentEntry::new(tournament));
    response
}

/// Resume a tournament from a snapshot previously returned by the snapshot endpoint.
#[post("/api/tournaments/import")]
async fn api_import_tournament(state: AppState, body: String) -> HttpResponse {
    let snapshot = match Snapshot::from_json(&body) {
        Ok(s) => s,
        Err(e) => return bad_request(e),
    };
    let tournament = snapshot.tournament;
    let id = tournament.id;
    log::info!(
        "Imported tournament {} ({}) at round {}, saved {}",
        tournament.name,
        id,
        tournament.round,
        snapshot.saved_at
    );
    let response = HttpResponse::Ok().json(&tournament);
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    g.insert(id, TournamentEntry::new(tournament));
    response
}

/// Get a tournament by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    read_tournament(&state, path.id, |t| HttpResponse::Ok().json(t))
}

/// Generate pairings for the next round from the active roster.
#[post("/api/tournaments/{id}/pairings")]
async fn api_generate_pairings(
    state: AppState,
    config: Data<PairingConfig>,
    path: Path<TournamentPath>,
) -> HttpResponse {
    let config = *config.get_ref();
    update_tournament(&state, path.id, |t| {
        t.new_pairings(&mut rand::thread_rng(), &config).map(|_| ())
    })
}

/// Submit the round's results as JSON: one entry per match, byes as single-player matches.
#[post("/api/tournaments/{id}/results")]
async fn api_submit_results(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<Vec<MatchResult>>,
) -> HttpResponse {
    update_tournament(&state, path.id, |t| record_results(t, &body))
}

/// Submit the round's results as a results sheet (`Alice:2,Bob:1,1,-Bob`).
#[post("/api/tournaments/{id}/results/csv")]
async fn api_submit_results_csv(
    state: AppState,
    path: Path<TournamentPath>,
    body: String,
) -> HttpResponse {
    update_tournament(&state, path.id, |t| {
        let results = parse_results_csv(&body)?;
        record_results(t, &results)
    })
}

#[get("/api/tournaments/{id}/standings")]
async fn api_standings(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    read_tournament(&state, path.id, |t| HttpResponse::Ok().json(standings(t)))
}

#[get("/api/tournaments/{id}/standings.csv")]
async fn api_standings_csv(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    read_tournament(&state, path.id, |t| match standings_to_csv(&standings(t)) {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .body(csv),
        Err(e) => bad_request(e),
    })
}

/// Download the tournament as a snapshot for later import.
#[get("/api/tournaments/{id}/snapshot")]
async fn api_snapshot(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    read_tournament(&state, path.id, |t| {
        HttpResponse::Ok().json(Snapshot::new(t.clone()))
    })
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn pairing_config_from_env() -> PairingConfig {
    let mut config = PairingConfig::default();
    if let Some(max_attempts) = std::env::var("SWISS_MAX_PAIRING_ATTEMPTS")
        .ok()
        .and_then(|v| v.parse().ok())
    {
        config.max_attempts = max_attempts;
    }
    config
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    let pairing_config = pairing_config_from_env();
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);
    log::info!(
        "Pairing search limited to {} attempts per round",
        pairing_config.max_attempts
    );

    let state = Data::new(RwLock::new(HashMap::<TournamentId, TournamentEntry>::new()));
    let config = Data::new(pairing_config);

    // Background task: every 30 minutes, remove tournaments inactive for 12+ hours
    let state_cleanup = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive tournament(s) (no activity for 12h)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(config.clone())
            .service(api_health)
            .service(api_create_tournament)
            .service(api_import_tournament)
            .service(api_get_tournament)
            .service(api_generate_pairings)
            .service(api_submit_results)
            .service(api_submit_results_csv)
            .service(api_standings)
            .service(api_standings_csv)
            .service(api_snapshot)
    })
    .bind(bind)?
    .run()
    .await
}
