//! Client application handlers
//!
//! Every action is proxied to the platform API with the operator's token.
//! Writes answer with a redirect on success and re-render the form with an
//! error banner on failure.

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;

use super::pages::{self, log_api_error, status_for};
use super::redirect::safe_redirect_target;
use super::AppState;
use crate::data::{AccessToken, ApiError, ClientApplicationParams};
use crate::ui::ApplicationForm;

const BLANK_NAME: &str = "Name can't be blank";

/// Fields posted by the create and edit forms
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApplicationInput {
    #[serde(default)]
    name: String,
    #[serde(default)]
    redirect_urls: String,
    #[serde(default)]
    redirect_uri: Option<String>,
}

impl ApplicationInput {
    fn params(&self) -> Option<ClientApplicationParams> {
        let params = ClientApplicationParams::from_form(&self.name, &self.redirect_urls);
        (!params.name.is_empty()).then_some(params)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct NewParams {
    redirect_uri: Option<String>,
}

/// `GET /client_applications`
pub(crate) async fn index(State(state): State<AppState>, token: AccessToken) -> Response {
    match state.api.list_client_applications(&token).await {
        Ok(applications) => pages::html(
            StatusCode::OK,
            state.views.client_applications_index(&applications, None),
        ),
        Err(err) => {
            log_api_error("list client applications", &err);
            let message = err.to_string();
            pages::html(
                status_for(&err),
                state.views.client_applications_index(&[], Some(&message)),
            )
        }
    }
}

/// `GET /client_applications/new`
pub(crate) async fn new(
    State(state): State<AppState>,
    _token: AccessToken,
    Query(params): Query<NewParams>,
) -> Response {
    let form = ApplicationForm {
        redirect_uri: params.redirect_uri.as_deref(),
        ..Default::default()
    };
    pages::html(StatusCode::OK, state.views.client_application_form(&form, None))
}

/// `POST /client_applications`
pub(crate) async fn create(
    State(state): State<AppState>,
    token: AccessToken,
    headers: HeaderMap,
    Form(input): Form<ApplicationInput>,
) -> Response {
    let form = ApplicationForm {
        application: None,
        name: &input.name,
        redirect_urls: &input.redirect_urls,
        redirect_uri: input.redirect_uri.as_deref(),
    };

    let Some(params) = input.params() else {
        return pages::html(
            StatusCode::UNPROCESSABLE_ENTITY,
            state.views.client_application_form(&form, Some(BLANK_NAME)),
        );
    };

    match state.api.create_client_application(&token, &params).await {
        Ok(application) => {
            tracing::info!(id = %application.id, name = %application.name, "created client application");
            let host = headers
                .get(header::HOST)
                .and_then(|value| value.to_str().ok());
            let target = safe_redirect_target(input.redirect_uri.as_deref(), host);
            Redirect::to(&target).into_response()
        }
        Err(err) => {
            log_api_error("create client application", &err);
            let message = err.to_string();
            pages::html(
                status_for(&err),
                state.views.client_application_form(&form, Some(&message)),
            )
        }
    }
}

/// `GET /client_applications/{id}`
pub(crate) async fn show(
    State(state): State<AppState>,
    token: AccessToken,
    Path(id): Path<String>,
) -> Response {
    match state.api.get_client_application(&token, &id).await {
        Ok(application) => pages::html(
            StatusCode::OK,
            state.views.client_application_show(Some(&application), None),
        ),
        Err(err) => show_error(&state, "show client application", err),
    }
}

/// `GET /client_applications/{id}/edit`
pub(crate) async fn edit(
    State(state): State<AppState>,
    token: AccessToken,
    Path(id): Path<String>,
) -> Response {
    match state.api.get_client_application(&token, &id).await {
        Ok(application) => {
            let redirect_urls = application.redirect_urls.join(", ");
            let form = ApplicationForm::edit(&application, &redirect_urls);
            pages::html(StatusCode::OK, state.views.client_application_form(&form, None))
        }
        Err(err) => show_error(&state, "edit client application", err),
    }
}

/// `POST /client_applications/{id}`
pub(crate) async fn update(
    State(state): State<AppState>,
    token: AccessToken,
    Path(id): Path<String>,
    Form(input): Form<ApplicationInput>,
) -> Response {
    let result = match input.params() {
        Some(params) => state
            .api
            .update_client_application(&token, &id, &params)
            .await
            .map_err(|err| {
                log_api_error("update client application", &err);
                (status_for(&err), err.to_string())
            }),
        None => Err((StatusCode::UNPROCESSABLE_ENTITY, BLANK_NAME.to_string())),
    };

    match result {
        Ok(application) => {
            tracing::info!(id = %application.id, "updated client application");
            Redirect::to(&format!("/client_applications/{}", id)).into_response()
        }
        Err((status, message)) => {
            // The edit form needs the stored record for its read-only fields
            match state.api.get_client_application(&token, &id).await {
                Ok(application) => {
                    let form = ApplicationForm {
                        application: Some(&application),
                        name: &input.name,
                        redirect_urls: &input.redirect_urls,
                        redirect_uri: None,
                    };
                    pages::html(status, state.views.client_application_form(&form, Some(&message)))
                }
                Err(err) => show_error(&state, "edit client application", err),
            }
        }
    }
}

/// `GET /client_applications/{id}/delete`
pub(crate) async fn confirm_delete(
    State(state): State<AppState>,
    token: AccessToken,
    Path(id): Path<String>,
) -> Response {
    match state.api.get_client_application(&token, &id).await {
        Ok(application) => pages::html(
            StatusCode::OK,
            state.views.client_application_delete(Some(&application), None),
        ),
        Err(err) => show_error(&state, "confirm client application delete", err),
    }
}

/// `POST /client_applications/{id}/delete`
pub(crate) async fn destroy(
    State(state): State<AppState>,
    token: AccessToken,
    Path(id): Path<String>,
) -> Response {
    match state.api.delete_client_application(&token, &id).await {
        Ok(()) => {
            tracing::info!(id = %id, "deleted client application");
            Redirect::to("/client_applications").into_response()
        }
        Err(err) => {
            log_api_error("delete client application", &err);
            let message = err.to_string();
            pages::html(
                status_for(&err),
                state.views.client_application_delete(None, Some(&message)),
            )
        }
    }
}

/// Renders the detail page holding only an error banner
fn show_error(state: &AppState, operation: &str, err: ApiError) -> Response {
    log_api_error(operation, &err);
    let message = err.to_string();
    pages::html(
        status_for(&err),
        state.views.client_application_show(None, Some(&message)),
    )
}
