use axum::Form;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::header::SET_COOKIE;
use axum::response::{Html, IntoResponse, Redirect, Response};
use edupredict_core::SubmissionError;
use tracing::warn;

use crate::AppState;
use crate::flash::{self, Flash};
use crate::form::{FormValues, PredictForm};
use crate::page::{self, FormView};

pub const FORM_PATH: &str = "/predictdata";

#[tracing::instrument(name = "GET /", skip_all)]
pub async fn index() -> Html<String> {
    Html(page::index_page())
}

#[tracing::instrument(name = "GET /predictdata", skip_all)]
pub async fn form_page(headers: HeaderMap) -> Response {
    let flashes = flash::from_headers(&headers);
    let values = FormValues::default();
    let html = page::form_page(&FormView {
        values: &values,
        flashes: &flashes,
        prediction: None,
    });

    if flashes.is_empty() {
        Html(html).into_response()
    } else {
        ([(SET_COOKIE, flash::clear_cookie())], Html(html)).into_response()
    }
}

#[tracing::instrument(name = "POST /predictdata", skip_all)]
pub async fn predict(State(state): State<AppState>, Form(form): Form<PredictForm>) -> Response {
    let raw = match form.parse() {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "rejected form input");
            return redirect_with(&[Flash::error(e.to_string())]);
        }
    };

    match state.handler.submit(raw).await {
        Ok(prediction) => {
            let values = FormValues::from(&raw);
            let flashes = [Flash::success("Prediction successful!")];
            Html(page::form_page(&FormView {
                values: &values,
                flashes: &flashes,
                prediction: Some(&prediction),
            }))
            .into_response()
        }
        Err(err) => {
            warn!(kind = ?err.kind(), "prediction request failed");
            redirect_with(&flashes_for(&err))
        }
    }
}

fn redirect_with(flashes: &[Flash]) -> Response {
    (
        [(SET_COOKIE, flash::set_cookie(flashes))],
        Redirect::to(FORM_PATH),
    )
        .into_response()
}

/// Messages for a failed submission, headline first.
pub fn flashes_for(err: &SubmissionError) -> Vec<Flash> {
    let mut flashes = vec![Flash::error(err.user_message())];
    if let Some(detail) = err.detail() {
        flashes.push(Flash::error(format!("Error message: {detail}")));
    }
    if let Some((cause, actions)) = err.remediation() {
        flashes.push(Flash::info(format!("Likely cause: {cause}")));
        flashes.push(Flash::info(format!(
            "What you can do: {}",
            actions.join("; ")
        )));
    }
    flashes
}
