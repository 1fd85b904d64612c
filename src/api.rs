//! REST API over the bracket engine (actix-web handlers).
//!
//! Errors are returned as `{"error": msg, "kind": kind, "retryable": bool}` with
//! 400 for validation, 404 for unknown ids, 409 for state and concurrency
//! conflicts.

use crate::engine::BracketEngine;
use crate::logic::SeedingPolicy;
use crate::models::{
    ErrorKind, MatchId, Participant, ParticipantId, TournamentError, TournamentFormat,
    TournamentId,
};
use actix_web::{
    delete, get, post, put,
    web::{Bytes, Data, Json, Path, ServiceConfig},
    HttpResponse, Responder,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type AppState = Data<BracketEngine>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    capacity: Option<usize>,
    #[serde(default)]
    format: TournamentFormat,
}

#[derive(Deserialize)]
struct AddParticipantBody {
    name: String,
    club: Option<String>,
    seed: Option<u32>,
}

#[derive(Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct GenerateBracketBody {
    #[serde(default)]
    seeding: SeedingPolicy,
}

#[derive(Deserialize)]
struct ScheduleMatchBody {
    scheduled_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RecordResultBody {
    score1: i64,
    score2: i64,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

#[derive(Deserialize)]
struct TournamentParticipantPath {
    id: TournamentId,
    participant_id: ParticipantId,
}

#[derive(Deserialize)]
struct TournamentMatchPath {
    id: TournamentId,
    match_id: MatchId,
}

fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({
        "error": e.to_string(),
        "kind": e.kind(),
        "retryable": e.is_retryable(),
    });
    match e.kind() {
        ErrorKind::Validation => HttpResponse::BadRequest().json(body),
        ErrorKind::NotFound => HttpResponse::NotFound().json(body),
        ErrorKind::StateConflict | ErrorKind::Concurrency => HttpResponse::Conflict().json(body),
        ErrorKind::Internal => HttpResponse::InternalServerError().json(body),
    }
}

fn respond<T: Serialize>(result: Result<T, TournamentError>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => {
            if e.kind() == ErrorKind::Internal {
                log::error!("{}", e);
            } else {
                log::debug!("Request rejected: {}", e);
            }
            error_response(&e)
        }
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "bracket-engine",
    })
}

/// Create a new tournament in Draft.
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    if body.name.trim().is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Tournament name is empty",
            "kind": ErrorKind::Validation,
            "retryable": false,
        }));
    }
    respond(state.create_tournament(&body.name, body.capacity, body.format))
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.get_tournament(path.id))
}

#[post("/api/tournaments/{id}/participants")]
async fn api_add_participant(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<AddParticipantBody>,
) -> HttpResponse {
    let body = body.into_inner();
    let mut participant = Participant::new(body.name);
    participant.club = body.club;
    participant.seed = body.seed;
    respond(state.add_participant(path.id, participant))
}

#[delete("/api/tournaments/{id}/participants/{participant_id}")]
async fn api_remove_participant(
    state: AppState,
    path: Path<TournamentParticipantPath>,
) -> HttpResponse {
    respond(state.remove_participant(path.id, path.participant_id))
}

/// Import participants from a CSV body with header `name,club,seed`.
#[post("/api/tournaments/{id}/roster")]
async fn api_import_roster(
    state: AppState,
    path: Path<TournamentPath>,
    body: String,
) -> HttpResponse {
    respond(state.import_roster(path.id, &body))
}

#[post("/api/tournaments/{id}/open")]
async fn api_open_registration(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.open_registration(path.id))
}

#[post("/api/tournaments/{id}/cancel")]
async fn api_cancel_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.cancel(path.id))
}

/// Parse the optional GenerateBracket body. Only an empty body falls back to
/// random seeding; anything else must be a valid request.
fn parse_generate_body(body: &[u8]) -> Result<GenerateBracketBody, TournamentError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(GenerateBracketBody::default());
    }
    serde_json::from_slice(body).map_err(|e| TournamentError::InvalidRequest(e.to_string()))
}

/// GenerateBracket. An empty body means random seeding.
#[post("/api/tournaments/{id}/bracket")]
async fn api_generate_bracket(
    state: AppState,
    path: Path<TournamentPath>,
    body: Bytes,
) -> HttpResponse {
    let result = parse_generate_body(&body)
        .and_then(|b| state.generate_bracket(path.id, &b.seeding));
    respond(result)
}

/// ListMatches, grouped by round.
#[get("/api/tournaments/{id}/matches")]
async fn api_list_matches(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.list_matches(path.id))
}

#[put("/api/tournaments/{id}/matches/{match_id}/schedule")]
async fn api_schedule_match(
    state: AppState,
    path: Path<TournamentMatchPath>,
    body: Json<ScheduleMatchBody>,
) -> HttpResponse {
    respond(state.schedule_match(path.id, path.match_id, body.scheduled_at))
}

#[post("/api/tournaments/{id}/matches/{match_id}/start")]
async fn api_start_match(state: AppState, path: Path<TournamentMatchPath>) -> HttpResponse {
    respond(state.start_match(path.id, path.match_id))
}

/// RecordMatchResult.
#[post("/api/tournaments/{id}/matches/{match_id}/result")]
async fn api_record_result(
    state: AppState,
    path: Path<TournamentMatchPath>,
    body: Json<RecordResultBody>,
) -> HttpResponse {
    respond(state.record_match_result(path.id, path.match_id, body.score1, body.score2))
}

/// Register every route on an actix `App`.
pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(api_health)
        .service(api_create_tournament)
        .service(api_get_tournament)
        .service(api_add_participant)
        .service(api_remove_participant)
        .service(api_import_roster)
        .service(api_open_registration)
        .service(api_cancel_tournament)
        .service(api_generate_bracket)
        .service(api_list_matches)
        .service(api_schedule_match)
        .service(api_start_match)
        .service(api_record_result);
}
