//! # API REST
//!
//! REST API and browser surface for RxPad.
//!
//! Handles:
//! - The HTML entry page (form, settings panel, print button) with axum
//! - The JSON API over settings, form state, composition and printing
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS)
//!
//! Uses `api-shared` for common types and `rxpad-core` for everything else.

#![warn(rust_2018_idioms)]

pub mod page;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, Json, Redirect},
    routing::{get, patch, post},
    Form, Router,
};
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{FieldEditReq, HealthRes, HealthService, PrintRes};
use rxpad_core::form::today;
use rxpad_core::print::browser_print_page;
use rxpad_core::{
    CoreConfig, DispatchOutcome, DocumentComposer, DoctorProfile, FileSlot, FileSurface,
    FormField, FormState, PrescriptionError, PrintDispatcher, ProfileField, Session,
    SettingsStore,
};

type ApiError = (StatusCode, &'static str);

/// Submitted `application/x-www-form-urlencoded` pairs, in submission order.
type FormPairs = Vec<(String, String)>;

/// Application state shared across handlers.
///
/// The one session lives behind a mutex; handlers take the lock, do synchronous work and release
/// it before returning.
#[derive(Clone)]
pub struct AppState {
    cfg: Arc<CoreConfig>,
    session: Arc<Mutex<Session<FileSlot>>>,
    dispatcher: Arc<PrintDispatcher<FileSurface>>,
}

impl AppState {
    /// Open the session for `cfg`: settings are loaded from `<data_dir>/doctorInfo.json` and the
    /// form starts blank, dated today.
    pub fn new(cfg: CoreConfig) -> Self {
        let store = SettingsStore::new(FileSlot::new(cfg.data_dir()));
        let session = Session::open(store, DocumentComposer::new(cfg.date_style()), today());
        let surface = FileSurface::new(
            cfg.output_dir().to_path_buf(),
            cfg.print_command().cloned(),
        );
        let dispatcher = PrintDispatcher::new(surface, cfg.print_delay());

        Self {
            cfg: Arc::new(cfg),
            session: Arc::new(Mutex::new(session)),
            dispatcher: Arc::new(dispatcher),
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    fn session(&self) -> Result<MutexGuard<'_, Session<FileSlot>>, ApiError> {
        self.session.lock().map_err(|_| {
            tracing::error!("session lock poisoned");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        })
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        get_settings,
        put_settings,
        reset_settings,
        get_form,
        put_form,
        patch_form_field,
        reset_form_api,
        compose_document,
        dispatch_print,
    ),
    components(schemas(
        HealthRes,
        FieldEditReq,
        PrintRes,
        api_shared::PrintStatus,
        DoctorProfile,
        FormState,
        rxpad_core::form::PatientRecord,
        rxpad_core::form::MedicalRecord,
        rxpad_core::form::ExaminationRecord,
    ))
)]
pub struct ApiDoc;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/form", post(save_form))
        .route("/form/reset", post(reset_form))
        .route("/settings", post(save_settings))
        .route("/print", post(print_page))
        .route("/health", get(health))
        .route("/api/settings", get(get_settings).put(put_settings))
        .route("/api/settings/reset", post(reset_settings))
        .route("/api/form", get(get_form).put(put_form))
        .route("/api/form/field", patch(patch_form_field))
        .route("/api/form/reset", post(reset_form_api))
        .route("/api/document", post(compose_document))
        .route("/api/print", post(dispatch_print))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn internal(e: PrescriptionError) -> ApiError {
    tracing::error!("request failed: {}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
}

/// Entry page with the current form and settings.
async fn index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let session = state.session()?;
    Ok(Html(page::render_page(session.profile(), session.form())))
}

/// Replace the form with a browser submission.
async fn save_form(
    State(state): State<AppState>,
    Form(pairs): Form<FormPairs>,
) -> Result<Redirect, ApiError> {
    let form = form_from_pairs(&pairs);
    state.session()?.replace_form(form);
    Ok(Redirect::to("/"))
}

async fn reset_form(State(state): State<AppState>) -> Result<Redirect, ApiError> {
    state.session()?.reset_form(today());
    Ok(Redirect::to("/"))
}

/// Save the settings panel.
///
/// An unchecked checkbox is not submitted at all, so a missing `showSignature` switches the
/// signature off. Other missing keys leave their field unchanged.
async fn save_settings(
    State(state): State<AppState>,
    Form(pairs): Form<FormPairs>,
) -> Result<Redirect, ApiError> {
    let mut session = state.session()?;
    let mut profile = session.profile().clone();

    for field in ProfileField::ALL {
        let submitted = pairs
            .iter()
            .find(|(key, _)| key.as_str() == field.key())
            .map(|(_, value)| value.as_str());
        match (field, submitted) {
            (_, Some(value)) => profile.apply_edit(field, value),
            (ProfileField::ShowSignature, None) => profile.apply_edit(field, "false"),
            (_, None) => {}
        }
    }

    session.replace_profile(profile).map_err(internal)?;
    tracing::info!("settings saved from the settings panel");
    Ok(Redirect::to("/"))
}

/// Take the submitted form and return a page that prints itself.
async fn print_page(
    State(state): State<AppState>,
    Form(pairs): Form<FormPairs>,
) -> Result<Html<String>, ApiError> {
    let mut session = state.session()?;
    session.replace_form(form_from_pairs(&pairs));
    let document = session.compose();
    Ok(Html(browser_print_page(
        &document,
        state.config().print_delay(),
    )))
}

fn form_from_pairs(pairs: &[(String, String)]) -> FormState {
    FormState::from_submission(
        today(),
        pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())),
    )
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint.
async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/api/settings",
    responses(
        (status = 200, description = "Current doctor settings", body = DoctorProfile),
        (status = 500, description = "Internal server error")
    )
)]
/// Current doctor settings
///
/// Returns the profile held by the session, as last loaded or saved.
///
/// # Returns
/// * `Ok(Json<DoctorProfile>)` - The letterhead settings
/// * `Err((StatusCode, &str))` - Internal server error if the session is unavailable
async fn get_settings(State(state): State<AppState>) -> Result<Json<DoctorProfile>, ApiError> {
    Ok(Json(state.session()?.profile().clone()))
}

#[utoipa::path(
    put,
    path = "/api/settings",
    request_body = DoctorProfile,
    responses(
        (status = 200, description = "Settings saved", body = DoctorProfile),
        (status = 400, description = "Bad request"),
        (status = 500, description = "Internal server error")
    )
)]
/// Replace and persist the doctor settings.
async fn put_settings(
    State(state): State<AppState>,
    Json(profile): Json<DoctorProfile>,
) -> Result<Json<DoctorProfile>, ApiError> {
    let mut session = state.session()?;
    session.replace_profile(profile).map_err(internal)?;
    Ok(Json(session.profile().clone()))
}

#[utoipa::path(
    post,
    path = "/api/settings/reset",
    responses(
        (status = 200, description = "Default settings restored", body = DoctorProfile),
        (status = 500, description = "Internal server error")
    )
)]
/// Restore the default doctor settings
///
/// Overwrites the settings slot with the default profile.
///
/// # Returns
/// * `Ok(Json<DoctorProfile>)` - The default profile now in effect
/// * `Err((StatusCode, &str))` - Internal server error if the slot cannot be written
async fn reset_settings(State(state): State<AppState>) -> Result<Json<DoctorProfile>, ApiError> {
    let mut session = state.session()?;
    session.reset_profile().map_err(internal)?;
    Ok(Json(session.profile().clone()))
}

#[utoipa::path(
    get,
    path = "/api/form",
    responses(
        (status = 200, description = "Current form state", body = FormState)
    )
)]
/// Current form state
///
/// # Returns
/// * `Ok(Json<FormState>)` - Patient, medical, examination and prescription records
/// * `Err((StatusCode, &str))` - Internal server error if the session is unavailable
async fn get_form(State(state): State<AppState>) -> Result<Json<FormState>, ApiError> {
    Ok(Json(state.session()?.form().clone()))
}

#[utoipa::path(
    put,
    path = "/api/form",
    request_body = FormState,
    responses(
        (status = 200, description = "Form replaced", body = FormState),
        (status = 400, description = "Bad request")
    )
)]
/// Replace the whole form. Missing keys are blank.
async fn put_form(
    State(state): State<AppState>,
    Json(form): Json<FormState>,
) -> Result<Json<FormState>, ApiError> {
    let mut session = state.session()?;
    session.replace_form(form);
    Ok(Json(session.form().clone()))
}

#[utoipa::path(
    patch,
    path = "/api/form/field",
    request_body = FieldEditReq,
    responses(
        (status = 200, description = "Field updated", body = FormState),
        (status = 400, description = "Unknown form field")
    )
)]
/// Set a single form field, e.g. `{"field": "examination.bp", "value": "120/80"}`.
async fn patch_form_field(
    State(state): State<AppState>,
    Json(req): Json<FieldEditReq>,
) -> Result<Json<FormState>, ApiError> {
    let field = req.field.parse::<FormField>().map_err(|e| {
        tracing::debug!("rejected field edit: {}", e);
        (StatusCode::BAD_REQUEST, "Unknown form field")
    })?;

    let mut session = state.session()?;
    session.set_field(field, req.value);
    Ok(Json(session.form().clone()))
}

#[utoipa::path(
    post,
    path = "/api/form/reset",
    responses(
        (status = 200, description = "Blank form dated today", body = FormState)
    )
)]
/// Blank the form
///
/// Every record is cleared and the visit date becomes today.
///
/// # Returns
/// * `Ok(Json<FormState>)` - The blank form
/// * `Err((StatusCode, &str))` - Internal server error if the session is unavailable
async fn reset_form_api(State(state): State<AppState>) -> Result<Json<FormState>, ApiError> {
    let mut session = state.session()?;
    session.reset_form(today());
    Ok(Json(session.form().clone()))
}

#[utoipa::path(
    post,
    path = "/api/document",
    responses(
        (status = 200, description = "Composed print document", content_type = "text/html", body = String)
    )
)]
/// Compose the print document for the current settings and form.
async fn compose_document(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    Ok(Html(state.session()?.compose()))
}

#[utoipa::path(
    post,
    path = "/api/print",
    responses(
        (status = 200, description = "Print scheduled or blocked", body = PrintRes)
    )
)]
/// Compose the current document and dispatch it to the server-side print surface.
///
/// A blocked surface is reported in the body, not as an error status.
async fn dispatch_print(State(state): State<AppState>) -> Result<Json<PrintRes>, ApiError> {
    let session = state.session()?;
    let res = match session.print(&state.dispatcher) {
        DispatchOutcome::Scheduled(handle) => PrintRes::scheduled(handle.location()),
        DispatchOutcome::Blocked => PrintRes::blocked(),
    };
    Ok(Json(res))
}
