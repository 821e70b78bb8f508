//! Single binary web server: JSON API for operators plus live update streams for viewers.
//! Run with: cargo run --bin web -- --db memory
//! Listens on 0.0.0.0:8080 by default; see `--help` for HOST, PORT and database options.

use actix_web::{
    delete, get, post, put,
    web::{Bytes, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use clap::Parser;
use cribbage_league_web::{
    BracketEngine, Config, Database, LeagueError, Notifier, Roster, ScoreLedger, Side, Subscription,
};
use futures::stream::{self, Stream};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Services shared by all workers.
struct AppState {
    roster: Roster,
    ledger: ScoreLedger,
    bracket: BracketEngine,
    score_updates: Notifier,
    bracket_updates: Notifier,
}

type State = Data<AppState>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct NameBody {
    name: String,
}

#[derive(Deserialize)]
struct CreateDivisionBody {
    name: String,
    #[serde(default = "default_division_size")]
    size: i64,
}

fn default_division_size() -> i64 {
    4
}

#[derive(Deserialize)]
struct SizeBody {
    size: i64,
}

#[derive(Deserialize)]
struct AssignTeamBody {
    team_id: String,
}

#[derive(Deserialize)]
struct CreateGameBody {
    team_1_id: String,
    team_2_id: String,
}

#[derive(Deserialize)]
struct ScoresBody {
    team_1_id: String,
    team_1_score: i64,
    team_2_id: String,
    team_2_score: i64,
}

#[derive(Deserialize)]
struct GenerateTournamentBody {
    size: usize,
}

#[derive(Deserialize)]
struct PutTeamBody {
    round: usize,
    slot: usize,
    side: Side,
    team_id: String,
}

#[derive(Deserialize)]
struct AdvanceBody {
    round: usize,
    slot: usize,
    team_id: String,
}

#[derive(Deserialize)]
struct IdPath {
    id: String,
}

#[derive(Deserialize)]
struct DivisionTeamPath {
    id: String,
    team_id: String,
}

/// Map a league error onto a status code. Store failures are logged and hidden.
fn error_response(e: LeagueError) -> HttpResponse {
    if e.is_not_found() {
        HttpResponse::NotFound().json(serde_json::json!({ "error": e.to_string() }))
    } else if e.is_validation() {
        HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
    } else {
        log::error!("Request failed: {e}");
        HttpResponse::InternalServerError().json(serde_json::json!({ "error": "Something went wrong" }))
    }
}

fn respond<T: Serialize>(result: Result<T, LeagueError>) -> HttpResponse {
    match result {
        Ok(body) => HttpResponse::Ok().json(body),
        Err(e) => error_response(e),
    }
}

fn no_content(result: Result<(), LeagueError>) -> HttpResponse {
    match result {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "cribbage-league-web",
    })
}

#[get("/api/teams")]
async fn api_list_teams(state: State) -> HttpResponse {
    respond(state.roster.all_teams().await)
}

#[post("/api/teams")]
async fn api_create_team(state: State, body: Json<NameBody>) -> HttpResponse {
    respond(state.roster.create_team(&body.name).await)
}

#[put("/api/teams/{id}/name")]
async fn api_rename_team(state: State, path: Path<IdPath>, body: Json<NameBody>) -> HttpResponse {
    no_content(state.roster.rename_team(&path.id, &body.name).await)
}

#[delete("/api/teams/{id}")]
async fn api_delete_team(state: State, path: Path<IdPath>) -> HttpResponse {
    no_content(state.roster.delete_team(&path.id).await)
}

#[get("/api/divisions")]
async fn api_list_divisions(state: State) -> HttpResponse {
    respond(state.roster.all_divisions().await)
}

#[post("/api/divisions")]
async fn api_create_division(state: State, body: Json<CreateDivisionBody>) -> HttpResponse {
    respond(state.roster.create_division(&body.name, body.size).await)
}

#[get("/api/divisions/{id}")]
async fn api_get_division(state: State, path: Path<IdPath>) -> HttpResponse {
    respond(state.roster.division_with_teams(&path.id).await)
}

#[put("/api/divisions/{id}/name")]
async fn api_rename_division(state: State, path: Path<IdPath>, body: Json<NameBody>) -> HttpResponse {
    no_content(state.roster.rename_division(&path.id, &body.name).await)
}

#[put("/api/divisions/{id}/size")]
async fn api_resize_division(state: State, path: Path<IdPath>, body: Json<SizeBody>) -> HttpResponse {
    no_content(state.roster.resize_division(&path.id, body.size).await)
}

#[delete("/api/divisions/{id}")]
async fn api_delete_division(state: State, path: Path<IdPath>) -> HttpResponse {
    no_content(state.roster.delete_division(&path.id).await)
}

#[post("/api/divisions/{id}/teams")]
async fn api_assign_team(state: State, path: Path<IdPath>, body: Json<AssignTeamBody>) -> HttpResponse {
    no_content(state.roster.assign_to_division(&body.team_id, &path.id).await)
}

/// Remove a team from a division. The team must currently be in that division.
#[delete("/api/divisions/{id}/teams/{team_id}")]
async fn api_unassign_team(state: State, path: Path<DivisionTeamPath>) -> HttpResponse {
    no_content(state.roster.unassign_from_division(&path.team_id, &path.id).await)
}

#[get("/api/games")]
async fn api_list_games(state: State) -> HttpResponse {
    respond(state.ledger.all_games().await)
}

#[post("/api/games")]
async fn api_create_game(state: State, body: Json<CreateGameBody>) -> HttpResponse {
    respond(state.ledger.create_game(&body.team_1_id, &body.team_2_id).await)
}

/// Generate the round-robin games for every division.
#[post("/api/games/generate")]
async fn api_generate_games(state: State) -> HttpResponse {
    respond(state.ledger.generate_round_robin().await)
}

#[get("/api/games/{id}")]
async fn api_get_game(state: State, path: Path<IdPath>) -> HttpResponse {
    respond(state.ledger.game(&path.id).await)
}

/// Save a finished (or reset) game.
#[put("/api/games/{id}/scores")]
async fn api_save_scores(state: State, path: Path<IdPath>, body: Json<ScoresBody>) -> HttpResponse {
    no_content(
        state
            .ledger
            .record_result(
                &path.id,
                &body.team_1_id,
                body.team_1_score,
                &body.team_2_id,
                body.team_2_score,
            )
            .await,
    )
}

#[delete("/api/games")]
async fn api_delete_games(state: State) -> HttpResponse {
    no_content(state.ledger.delete_all().await)
}

#[get("/api/teams/{id}/games")]
async fn api_team_games(state: State, path: Path<IdPath>) -> HttpResponse {
    respond(state.ledger.games_for_team(&path.id).await)
}

#[get("/api/standings")]
async fn api_standings(state: State) -> HttpResponse {
    respond(state.ledger.standings().await)
}

#[get("/api/tournament")]
async fn api_get_tournament(state: State) -> HttpResponse {
    respond(state.bracket.load_tournament().await)
}

/// Create the bracket from the top `size` teams in the standings.
#[post("/api/tournament")]
async fn api_generate_tournament(state: State, body: Json<GenerateTournamentBody>) -> HttpResponse {
    if let Err(e) = state.bracket.seed_from_standings(body.size).await {
        return error_response(e);
    }
    respond(state.bracket.load_tournament().await)
}

/// Manually place a team into an empty side of a bracket slot.
#[post("/api/tournament/slots")]
async fn api_put_team(state: State, body: Json<PutTeamBody>) -> HttpResponse {
    no_content(
        state
            .bracket
            .put_team_into_slot(body.round, body.slot, body.side, &body.team_id)
            .await,
    )
}

#[post("/api/tournament/advance")]
async fn api_advance_team(state: State, body: Json<AdvanceBody>) -> HttpResponse {
    if let Err(e) = state
        .bracket
        .advance_winner(body.round, body.slot, &body.team_id)
        .await
    {
        return error_response(e);
    }
    respond(state.bracket.load_tournament().await)
}

#[delete("/api/tournament")]
async fn api_delete_tournament(state: State) -> HttpResponse {
    no_content(state.bracket.delete_tournament().await)
}

/// One server-sent event carrying `body` as JSON.
fn sse_event<T: Serialize>(name: &str, body: &T) -> Result<Bytes, actix_web::Error> {
    let data = serde_json::to_string(body)?;
    Ok(Bytes::from(format!("event: {name}\ndata: {data}\n\n")))
}

/// Stream a fresh snapshot now and after every notification. When the client
/// disconnects actix drops the stream, and with it the subscription.
fn live_stream<T, F, Fut>(
    sub: Subscription,
    event: &'static str,
    load: F,
) -> impl Stream<Item = Result<Bytes, actix_web::Error>>
where
    T: Serialize,
    F: Fn() -> Fut + Clone,
    Fut: Future<Output = Result<T, LeagueError>>,
{
    stream::unfold((sub, load, true), move |(mut sub, load, first)| async move {
        if !first {
            sub.recv().await?;
        }
        let item = match load().await {
            Ok(snapshot) => sse_event(event, &snapshot),
            Err(e) => {
                log::error!("Live {event} stream stopped: {e}");
                return None;
            }
        };
        Some((item, (sub, load, false)))
    })
}

fn event_stream_response(
    body: impl Stream<Item = Result<Bytes, actix_web::Error>> + 'static,
) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(("Cache-Control", "no-cache"))
        .streaming(body)
}

#[get("/api/games/stream")]
async fn api_games_stream(state: State) -> HttpResponse {
    let sub = state.score_updates.subscribe();
    log::debug!("Score viewer connected ({})", sub.id());
    let ledger = state.ledger.clone();
    event_stream_response(live_stream(sub, "games", move || {
        let ledger = ledger.clone();
        async move { ledger.all_games().await }
    }))
}

#[get("/api/standings/stream")]
async fn api_standings_stream(state: State) -> HttpResponse {
    let sub = state.score_updates.subscribe();
    let ledger = state.ledger.clone();
    event_stream_response(live_stream(sub, "standings", move || {
        let ledger = ledger.clone();
        async move { ledger.standings().await }
    }))
}

#[get("/api/tournament/stream")]
async fn api_tournament_stream(state: State) -> HttpResponse {
    let sub = state.bracket_updates.subscribe();
    log::debug!("Bracket viewer connected ({})", sub.id());
    let bracket = state.bracket.clone();
    event_stream_response(live_stream(sub, "tournament", move || {
        let bracket = bracket.clone();
        async move { bracket.load_tournament().await }
    }))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::parse();
    let db = Database::open(&config)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    let score_updates = Notifier::new();
    let bracket_updates = Notifier::new();
    let state = Data::new(AppState {
        roster: Roster::new(db.clone()),
        ledger: ScoreLedger::new(db.clone(), score_updates.clone()),
        bracket: BracketEngine::new(db, bracket_updates.clone()),
        score_updates,
        bracket_updates,
    });

    let (host, port) = config.bind_addr();
    log::info!("Starting server at http://{}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_list_teams)
            .service(api_create_team)
            .service(api_rename_team)
            .service(api_delete_team)
            .service(api_team_games)
            .service(api_list_divisions)
            .service(api_create_division)
            .service(api_get_division)
            .service(api_rename_division)
            .service(api_resize_division)
            .service(api_delete_division)
            .service(api_assign_team)
            .service(api_unassign_team)
            // Streams before /api/games/{id} so "stream" isn't taken as an id.
            .service(api_games_stream)
            .service(api_standings_stream)
            .service(api_tournament_stream)
            .service(api_list_games)
            .service(api_create_game)
            .service(api_generate_games)
            .service(api_get_game)
            .service(api_save_scores)
            .service(api_delete_games)
            .service(api_standings)
            .service(api_get_tournament)
            .service(api_generate_tournament)
            .service(api_put_team)
            .service(api_advance_team)
            .service(api_delete_tournament)
    })
    .bind((host, port))?
    .run()
    .await
}
