//! The kiosk screen and the endpoints behind its scan input and undo button.

use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_htmx::HxRequest;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, ScreenUpdate, endpoints,
    html::{
        BUTTON_UNDO_STYLE, PAGE_CONTAINER_STYLE, RESULT_TEXT_STYLE, STATUS_TEXT_STYLE, base,
    },
};

/// The form data sent by the scan input.
#[derive(Debug, Serialize, Deserialize)]
pub struct ScanForm {
    /// The text typed by the barcode scanner.
    pub code: String,
}

/// Render the kiosk screen as it currently stands.
pub async fn get_kiosk_page(State(state): State<AppState>) -> Response {
    let screen = match state.kiosk.lock() {
        Ok(kiosk) => kiosk.screen().clone(),
        Err(error) => {
            tracing::error!("could not acquire the kiosk lock: {error}");
            return lock_error_response();
        }
    };

    kiosk_view(&screen).into_response()
}

/// Handle a barcode submitted by the scanner.
///
/// HTMX requests get the screen fragment back. Plain form posts are
/// redirected to the kiosk page so reloading it does not sell again.
pub async fn scan_endpoint(
    State(state): State<AppState>,
    HxRequest(is_htmx): HxRequest,
    Form(form): Form<ScanForm>,
) -> Response {
    tokio::time::sleep(state.scan_settle_delay).await;

    let screen = match state.kiosk.lock() {
        Ok(mut kiosk) => kiosk.on_scan_submitted(&form.code),
        Err(error) => {
            tracing::error!("could not acquire the kiosk lock: {error}");
            return lock_error_response();
        }
    };

    respond(&screen, is_htmx)
}

/// Handle a press of the undo button.
pub async fn undo_endpoint(
    State(state): State<AppState>,
    HxRequest(is_htmx): HxRequest,
) -> Response {
    let screen = match state.kiosk.lock() {
        Ok(mut kiosk) => kiosk.on_undo_requested(),
        Err(error) => {
            tracing::error!("could not acquire the kiosk lock: {error}");
            return lock_error_response();
        }
    };

    respond(&screen, is_htmx)
}

fn respond(screen: &ScreenUpdate, is_htmx: bool) -> Response {
    if is_htmx {
        screen_view(screen).into_response()
    } else {
        // The kiosk keeps the screen, so the page shows the result after the
        // redirect.
        Redirect::to(endpoints::ROOT).into_response()
    }
}

fn lock_error_response() -> Response {
    let screen = ScreenUpdate {
        message: Error::DatabaseLockError.to_string(),
        ..Default::default()
    };

    (StatusCode::INTERNAL_SERVER_ERROR, screen_view(&screen)).into_response()
}

fn kiosk_view(screen: &ScreenUpdate) -> Markup {
    let content = html! {
        div class=(PAGE_CONTAINER_STYLE) { (screen_view(screen)) }
    };

    base("Kiosk", &content)
}

fn screen_view(screen: &ScreenUpdate) -> Markup {
    html! {
        div id="screen" class="flex flex-col items-center justify-between w-full min-h-[80vh] gap-8"
        {
            p id="status" class=(STATUS_TEXT_STYLE) { (screen.status) }

            p id="result" class=(RESULT_TEXT_STYLE) { (screen.message) }

            form
                id="scan-form"
                method="post"
                action=(endpoints::SCAN)
                hx-post=(endpoints::SCAN)
                hx-target="#screen"
                hx-swap="outerHTML"
            {
                input
                    id="scan-input"
                    type="text"
                    name="code"
                    autocomplete="off"
                    required
                    autofocus;
            }

            form
                id="undo-form"
                method="post"
                action=(endpoints::UNDO)
                hx-post=(endpoints::UNDO)
                hx-target="#screen"
                hx-swap="outerHTML"
            {
                button
                    type="submit"
                    class=(BUTTON_UNDO_STYLE)
                    disabled[!screen.undo_available]
                {
                    "Undo last sale"
                }
            }
        }
    }
}
