//! Handlers for the `/films` resource: catalog CRUD, localized listings and
//! the details page.
//!
//! Films are never serialized straight from the row. [`FilmResponse`] is the
//! field allowlist, with title/overview/tagline resolved for the request
//! language and the cast attached.

use std::collections::{BTreeMap, HashMap};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, Utc};
use kino_core::catalog::{
    rank_by_popularity, DateRange, PopularityInput, DETAILS_WINDOW_DAYS, LISTING_LIMIT,
    NOW_PLAYING_WINDOW_DAYS, POPULAR_LOOKBACK_DAYS, UPCOMING_WINDOW_DAYS,
};
use kino_core::error::CoreError;
use kino_core::language::{pick_translation, LanguageCode};
use kino_core::pricing::{price_list, PriceList};
use kino_core::types::DbId;
use kino_db::models::actor::CastMember;
use kino_db::models::cinema::Cinema;
use kino_db::models::film::{CreateFilm, Film, FilmTranslation, UpdateFilm, UpsertFilmTranslation};
use kino_db::models::movie_session::{MovieSession, SessionFilter, SessionListing};
use kino_db::repositories::{
    ActorRepo, CinemaRepo, FilmRepo, FilmTranslationRepo, MovieSessionRepo,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::language::RequestLanguage;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Public representation of a film.
#[derive(Debug, Serialize)]
pub struct FilmResponse {
    pub id: DbId,
    pub title: String,
    pub overview: String,
    pub tagline: String,
    pub release_date: NaiveDate,
    pub runtime: i32,
    pub poster_url: Option<String>,
    pub background_url: Option<String>,
    pub genres: Vec<String>,
    pub vote_average: f64,
    pub vote_count: i32,
    pub actors: Vec<CastMember>,
    /// Language the text fields are in.
    pub language: String,
}

/// One screening on the details page.
#[derive(Debug, Serialize)]
pub struct SessionEntry {
    pub id: DbId,
    /// `HH:MM`.
    pub time: String,
    pub cinema: String,
    pub cinema_id: DbId,
    pub hall: String,
    pub hall_id: DbId,
    /// Display name, e.g. `"English"`.
    pub language: &'static str,
    pub language_code: &'static str,
    pub prices: PriceList,
    pub available_seats: i32,
}

#[derive(Debug, Serialize)]
pub struct FilmDetailsResponse {
    pub film: FilmResponse,
    /// Screenings keyed by ISO date, ascending.
    pub sessions: BTreeMap<String, Vec<SessionEntry>>,
    pub dates: DateRange,
}

#[derive(Debug, Serialize)]
pub struct PagedFilms {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dates: Option<DateRange>,
    pub page: u32,
    pub results: Vec<FilmResponse>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// POST /api/v1/films
///
/// The film row and its actor links are written in one transaction.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    lang: RequestLanguage,
    Json(input): Json<CreateFilm>,
) -> AppResult<(StatusCode, Json<FilmResponse>)> {
    validate_film_fields(Some(&input.title), Some(input.runtime))?;

    let mut tx = state.pool.begin().await?;
    let film = FilmRepo::create(&mut *tx, &input).await?;
    FilmRepo::add_actors(&mut *tx, film.id, &input.actor_ids).await?;
    tx.commit().await?;

    tracing::info!(film_id = film.id, title = %film.title, "Film created");

    let response = render_one(&state, film, &lang.0).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/films
pub async fn list(
    State(state): State<AppState>,
    lang: RequestLanguage,
) -> AppResult<Json<Vec<FilmResponse>>> {
    let films = FilmRepo::list(&state.pool).await?;
    Ok(Json(render_films(&state, films, &lang.0).await?))
}

/// GET /api/v1/films/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    lang: RequestLanguage,
) -> AppResult<Json<FilmResponse>> {
    let film = find_film(&state, id).await?;
    Ok(Json(render_one(&state, film, &lang.0).await?))
}

/// PUT /api/v1/films/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    lang: RequestLanguage,
    Json(input): Json<UpdateFilm>,
) -> AppResult<Json<FilmResponse>> {
    validate_film_fields(input.title.as_deref(), input.runtime)?;
    let film = FilmRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Film", id))?;
    Ok(Json(render_one(&state, film, &lang.0).await?))
}

/// DELETE /api/v1/films/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if FilmRepo::delete(&state.pool, id).await? {
        tracing::info!(film_id = id, "Film deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Film", id))
    }
}

/// GET /api/v1/films/search?query=
///
/// Case-insensitive substring match on the base title or any translated
/// title. An empty query returns an empty list.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
    lang: RequestLanguage,
) -> AppResult<Json<Vec<FilmResponse>>> {
    let term = params.query.as_deref().map(str::trim).unwrap_or_default();
    if term.is_empty() {
        return Ok(Json(Vec::new()));
    }
    let films = FilmRepo::search(&state.pool, term).await?;
    Ok(Json(render_films(&state, films, &lang.0).await?))
}

// ---------------------------------------------------------------------------
// Cast and translations
// ---------------------------------------------------------------------------

/// POST /api/v1/films/{id}/actors/{actor_id}
pub async fn attach_actor(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path((film_id, actor_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    find_film(&state, film_id).await?;
    ActorRepo::find_by_id(&state.pool, actor_id)
        .await?
        .ok_or_else(|| AppError::not_found("Actor", actor_id))?;
    ActorRepo::attach_to_film(&state.pool, film_id, actor_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/films/{id}/actors/{actor_id}
pub async fn detach_actor(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path((film_id, actor_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if ActorRepo::detach_from_film(&state.pool, film_id, actor_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Actor", actor_id))
    }
}

/// PUT /api/v1/films/{id}/translations/{lang}
pub async fn upsert_translation(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path((film_id, lang)): Path<(DbId, String)>,
    Json(input): Json<UpsertFilmTranslation>,
) -> AppResult<Json<FilmTranslation>> {
    let code = LanguageCode::parse(&lang).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "Invalid language code '{lang}'"
        )))
    })?;
    if input.title.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Translated title must not be empty".into(),
        )));
    }
    find_film(&state, film_id).await?;
    let translation =
        FilmTranslationRepo::upsert(&state.pool, film_id, code.as_str(), &input).await?;
    Ok(Json(translation))
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

/// GET /api/v1/films/{id}/details
///
/// The film with its screenings for the next [`DETAILS_WINDOW_DAYS`] days,
/// grouped by date.
pub async fn details(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    lang: RequestLanguage,
) -> AppResult<Json<FilmDetailsResponse>> {
    let film = find_film(&state, id).await?;
    let dates = DateRange::starting(today(), DETAILS_WINDOW_DAYS);
    let listings = MovieSessionRepo::list_listings_for_film_between(
        &state.pool,
        id,
        dates.minimum,
        dates.maximum,
    )
    .await?;

    let mut sessions: BTreeMap<String, Vec<SessionEntry>> = BTreeMap::new();
    for listing in listings {
        let date = listing.session.date.format("%Y-%m-%d").to_string();
        sessions.entry(date).or_default().push(session_entry(listing)?);
    }

    Ok(Json(FilmDetailsResponse {
        film: render_one(&state, film, &lang.0).await?,
        sessions,
        dates,
    }))
}

/// GET /api/v1/films/popular
pub async fn popular(
    State(state): State<AppState>,
    lang: RequestLanguage,
) -> AppResult<Json<PagedFilms>> {
    let today = today();
    let since = today - chrono::Duration::days(POPULAR_LOOKBACK_DAYS);
    let candidates = FilmRepo::list_popularity_candidates(&state.pool, since).await?;

    let ranked = rank_by_popularity(candidates, today, LISTING_LIMIT, |c| PopularityInput {
        vote_average: c.film.vote_average,
        vote_count: c.film.vote_count,
        release_date: c.film.release_date,
        booking_count: c.booking_count,
    });
    let films = ranked.into_iter().map(|c| c.film).collect();

    Ok(Json(PagedFilms {
        dates: None,
        page: 1,
        results: render_films(&state, films, &lang.0).await?,
    }))
}

/// GET /api/v1/films/upcoming
pub async fn upcoming(
    State(state): State<AppState>,
    lang: RequestLanguage,
) -> AppResult<Json<PagedFilms>> {
    let today = today();
    let films = FilmRepo::list_upcoming(&state.pool, today, LISTING_LIMIT as i64).await?;
    Ok(Json(PagedFilms {
        dates: Some(DateRange::starting(today, UPCOMING_WINDOW_DAYS)),
        page: 1,
        results: render_films(&state, films, &lang.0).await?,
    }))
}

/// GET /api/v1/films/now-playing
pub async fn now_playing(
    State(state): State<AppState>,
    lang: RequestLanguage,
) -> AppResult<Json<PagedFilms>> {
    let dates = DateRange::starting(today(), NOW_PLAYING_WINDOW_DAYS);
    let films = FilmRepo::list_now_playing(&state.pool, dates.minimum, dates.maximum).await?;
    Ok(Json(PagedFilms {
        dates: Some(dates),
        page: 1,
        results: render_films(&state, films, &lang.0).await?,
    }))
}

/// GET /api/v1/films/{id}/cinemas
pub async fn cinemas(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<Cinema>>> {
    find_film(&state, id).await?;
    let cinemas = CinemaRepo::list_for_film(&state.pool, id).await?;
    Ok(Json(cinemas))
}

/// GET /api/v1/films/{id}/sessions
pub async fn sessions(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<MovieSession>>> {
    find_film(&state, id).await?;
    let filter = SessionFilter {
        film_id: Some(id),
        ..Default::default()
    };
    let sessions = MovieSessionRepo::list(&state.pool, &filter).await?;
    Ok(Json(sessions))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

async fn find_film(state: &AppState, id: DbId) -> AppResult<Film> {
    FilmRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Film", id))
}

fn validate_film_fields(title: Option<&str>, runtime: Option<i32>) -> AppResult<()> {
    if matches!(title, Some(t) if t.trim().is_empty()) {
        return Err(AppError::Core(CoreError::Validation(
            "Title must not be empty".into(),
        )));
    }
    if matches!(runtime, Some(r) if r <= 0) {
        return Err(AppError::Core(CoreError::Validation(
            "Runtime must be positive".into(),
        )));
    }
    Ok(())
}

fn session_entry(listing: SessionListing) -> AppResult<SessionEntry> {
    let session = listing.session;
    let language = session.language()?;
    Ok(SessionEntry {
        id: session.id,
        time: session.time.format("%H:%M").to_string(),
        cinema: listing.cinema_name,
        cinema_id: session.cinema_id,
        hall: listing.hall_name,
        hall_id: session.hall_id,
        language: language.display_name(),
        language_code: language.code(),
        prices: price_list(&session.price_fields(), session.time),
        available_seats: session.available_seats,
    })
}

async fn render_one(state: &AppState, film: Film, lang: &LanguageCode) -> AppResult<FilmResponse> {
    let mut rendered = render_films(state, vec![film], lang).await?;
    rendered
        .pop()
        .ok_or_else(|| AppError::InternalError("Film rendering produced no output".into()))
}

/// Localize and attach casts to a batch of films, preserving order.
///
/// Two queries regardless of batch size: one for translations in the
/// requested and default languages, one for the casts.
async fn render_films(
    state: &AppState,
    films: Vec<Film>,
    lang: &LanguageCode,
) -> AppResult<Vec<FilmResponse>> {
    if films.is_empty() {
        return Ok(Vec::new());
    }
    let default = &state.config.default_language;
    let ids: Vec<DbId> = films.iter().map(|f| f.id).collect();

    let translations =
        FilmTranslationRepo::list_for_films(&state.pool, &ids, &[lang.as_str(), default.as_str()])
            .await?;
    let mut translations_by_film: HashMap<DbId, Vec<FilmTranslation>> = HashMap::new();
    for t in translations {
        translations_by_film.entry(t.film_id).or_default().push(t);
    }

    let mut cast_by_film: HashMap<DbId, Vec<CastMember>> = HashMap::new();
    for actor in ActorRepo::list_for_films(&state.pool, &ids).await? {
        cast_by_film
            .entry(actor.film_id)
            .or_default()
            .push(CastMember::from(actor));
    }

    let rendered = films
        .into_iter()
        .map(|film| {
            let candidates = translations_by_film
                .get(&film.id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            let picked = pick_translation(candidates, lang, default, |t| t.language_code.as_str());
            let (title, overview, tagline, language) = match picked {
                Some(t) => (
                    t.title.clone(),
                    t.overview.clone(),
                    t.tagline.clone(),
                    t.language_code.clone(),
                ),
                None => (
                    film.title,
                    film.overview,
                    film.tagline,
                    default.to_string(),
                ),
            };
            FilmResponse {
                id: film.id,
                title,
                overview,
                tagline,
                release_date: film.release_date,
                runtime: film.runtime,
                poster_url: film.poster_url,
                background_url: film.background_url,
                genres: film.genres.0,
                vote_average: film.vote_average,
                vote_count: film.vote_count,
                actors: cast_by_film.remove(&film.id).unwrap_or_default(),
                language,
            }
        })
        .collect();
    Ok(rendered)
}
