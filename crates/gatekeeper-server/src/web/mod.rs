// ABOUTME: Web UI route handlers serving the client and admin pages via Askama templates.
// ABOUTME: The client page polls the gate endpoint; the admin page drives the real-time channel.

use askama::Template;
use askama_derive_axum::IntoResponse as AskamaIntoResponse;

/// How often the client page re-checks its access status.
const POLL_INTERVAL_MS: u64 = 3000;

/// Client-facing page that waits for approval.
#[derive(Template, AskamaIntoResponse)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub poll_interval_ms: u64,
}

/// GET / - Render the client page.
pub async fn index() -> IndexTemplate {
    IndexTemplate {
        poll_interval_ms: POLL_INTERVAL_MS,
    }
}

/// Administrator panel listing pending requests live.
#[derive(Template, AskamaIntoResponse)]
#[template(path = "admin.html")]
pub struct AdminTemplate {
    pub ws_path: &'static str,
}

/// GET /admin - Render the admin panel.
pub async fn admin() -> AdminTemplate {
    AdminTemplate { ws_path: "/ws" }
}
