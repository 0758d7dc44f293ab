use askama::Template;
use askama_axum::IntoResponse as AskamaTemplateResponse;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;
use url::Url;

use crate::{
    error::AppError,
    flash::{set_flash, take_flash},
    models::trip::Trip,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/add", get(add_form).post(add_submit))
        .route("/edit/:id", get(edit_form).post(edit_submit))
        .route("/delete/:id", get(delete_confirm).post(delete_submit))
        .route("/search", post(search))
        .route("/trip/:id", get(trip_detail).post(comment_submit))
        .route("/trip/:id/delete_comment/:index", post(delete_comment))
        .route("/trips/:id/rate", get(rate_trip))
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    trips: Vec<Trip>,
    show_notice: bool,
    notice: String,
}

async fn index(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
) -> Result<impl IntoResponse, AppError> {
    let (jar, notice) = take_flash(jar);
    let trips = state.store.find_all().await?;
    Ok((
        jar,
        AskamaTemplateResponse::into_response(IndexTemplate {
            trips,
            show_notice: notice.is_some(),
            notice: notice.unwrap_or_default(),
        }),
    ))
}

#[derive(Template)]
#[template(path = "new_trip.html")]
struct NewTripTemplate {
    show_error: bool,
    error_message: String,
    attraction: String,
    city: String,
    country: String,
}

async fn add_form() -> impl IntoResponse {
    AskamaTemplateResponse::into_response(NewTripTemplate {
        show_error: false,
        error_message: String::new(),
        attraction: String::new(),
        city: String::new(),
        country: String::new(),
    })
}

#[derive(Deserialize)]
struct TravelForm {
    attraction: String,
    city: String,
    country: String,
}

async fn add_submit(
    State(state): State<AppState>,
    Form(form): Form<TravelForm>,
) -> Result<Response, AppError> {
    let attraction = form.attraction.trim();
    let city = form.city.trim();
    let country = form.country.trim();

    if attraction.is_empty() || city.is_empty() || country.is_empty() {
        return Ok((
            StatusCode::BAD_REQUEST,
            AskamaTemplateResponse::into_response(NewTripTemplate {
                show_error: true,
                error_message: "Attraction, city, and country are all required.".into(),
                attraction: attraction.to_string(),
                city: city.to_string(),
                country: country.to_string(),
            }),
        )
            .into_response());
    }

    let trip = Trip::new(attraction, city, country);
    state.store.insert(&trip).await?;
    Ok(Redirect::to("/").into_response())
}

#[derive(Template)]
#[template(path = "trip_form.html")]
struct EditTripTemplate {
    id: String,
    attraction: String,
    city: String,
    country: String,
    travel_days: String,
    best_season: String,
    tags: String,
    description: String,
    video_link: String,
}

impl EditTripTemplate {
    fn from_trip(trip: &Trip) -> Self {
        Self {
            id: trip.id.clone(),
            attraction: trip.attraction.clone(),
            city: trip.city.clone(),
            country: trip.country.clone(),
            travel_days: trip.travel_days.join("\n"),
            best_season: trip.best_season.join("\n"),
            tags: trip.tags.join("\n"),
            description: trip.description_display().to_string(),
            video_link: trip.video_link_display().to_string(),
        }
    }
}

async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let trip = state.store.find_one(&id).await?.ok_or(AppError::NotFound)?;
    Ok(AskamaTemplateResponse::into_response(
        EditTripTemplate::from_trip(&trip),
    ))
}

#[derive(Deserialize)]
struct ExtendedTravelForm {
    travel_days: Option<String>,
    best_season: Option<String>,
    tags: Option<String>,
    description: Option<String>,
    video_link: Option<String>,
}

async fn edit_submit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<ExtendedTravelForm>,
) -> Result<Redirect, AppError> {
    let mut trip = state.store.find_one(&id).await?.ok_or(AppError::NotFound)?;

    // Only the descriptive fields change; identity, rating, and
    // comments stay as stored.
    trip.travel_days = parse_lines(form.travel_days);
    trip.best_season = parse_lines(form.best_season);
    trip.tags = parse_lines(form.tags);
    trip.description = normalize_optional(form.description);
    trip.video_link = normalize_optional(form.video_link)
        .filter(|link| Url::parse(link).is_ok());

    state.store.replace(&id, &trip).await?;
    Ok(Redirect::to(&format!("/trip/{id}")))
}

#[derive(Template)]
#[template(path = "delete_trip.html")]
struct DeleteTripTemplate {
    trip: Trip,
}

async fn delete_confirm(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    match state.store.find_one(&id).await? {
        Some(trip) => Ok(AskamaTemplateResponse::into_response(DeleteTripTemplate {
            trip,
        })),
        None => Ok((set_flash(jar, "Trip not found."), Redirect::to("/")).into_response()),
    }
}

async fn delete_submit(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    if state.store.delete(&id).await? {
        Ok(Redirect::to("/").into_response())
    } else {
        Ok((set_flash(jar, "Trip not found."), Redirect::to("/")).into_response())
    }
}

#[derive(Deserialize)]
struct SearchForm {
    query: String,
}

async fn search(
    State(state): State<AppState>,
    Form(form): Form<SearchForm>,
) -> Result<Redirect, AppError> {
    match state.store.search(&form.query).await? {
        Some(trip) => Ok(Redirect::to(&format!("/trip/{}", trip.id))),
        None => Ok(Redirect::to("/add")),
    }
}

#[derive(Template)]
#[template(path = "trip_info.html")]
struct TripInfoTemplate {
    trip: Trip,
}

async fn trip_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let trip = state.store.find_one(&id).await?.ok_or(AppError::NotFound)?;
    Ok(AskamaTemplateResponse::into_response(TripInfoTemplate {
        trip,
    }))
}

#[derive(Deserialize)]
struct CommentForm {
    comment: Option<String>,
}

async fn comment_submit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<CommentForm>,
) -> Result<Redirect, AppError> {
    let mut trip = state.store.find_one(&id).await?.ok_or(AppError::NotFound)?;

    if let Some(content) = normalize_optional(form.comment) {
        trip.add_comment(content);
        state.store.replace(&id, &trip).await?;
    }

    // Redirect even when the comment was blank, so a refresh never
    // resubmits the form.
    Ok(Redirect::to(&format!("/trip/{id}")))
}

async fn delete_comment(
    State(state): State<AppState>,
    Path((id, index)): Path<(String, usize)>,
) -> Result<Redirect, AppError> {
    let mut trip = state.store.find_one(&id).await?.ok_or(AppError::NotFound)?;

    if !trip.remove_comment(index) {
        return Err(AppError::NotFound);
    }
    state.store.replace(&id, &trip).await?;
    Ok(Redirect::to(&format!("/trip/{id}")))
}

#[derive(Deserialize)]
struct RateQuery {
    rating: i32,
}

async fn rate_trip(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<RateQuery>,
) -> Result<Redirect, AppError> {
    let mut trip = state.store.find_one(&id).await?.ok_or(AppError::NotFound)?;
    trip.set_rating(query.rating);
    state.store.replace(&id, &trip).await?;
    Ok(Redirect::to(&format!("/trip/{id}")))
}

fn normalize_optional(input: Option<String>) -> Option<String> {
    input.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn parse_lines(input: Option<String>) -> Vec<String> {
    input
        .map(|value| {
            value
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
