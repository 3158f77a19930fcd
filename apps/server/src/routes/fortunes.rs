//! Fortunes endpoint: HTML table of fortune rows plus one synthetic record.

use actix_web::{web, HttpResponse};

use crate::db::executor::DbHandle;
use crate::drift::drift;
use crate::error::AppError;
use crate::models::Fortune;
use crate::state::app_state::AppState;

const SELECT_FORTUNES: &str = "SELECT id, message FROM fortune";
const SYNTHETIC_MESSAGE: &str = "Additional fortune added at request time.";

async fn fortunes(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let conn = DbHandle::connect(state.db_url(), state.query_timeout()).await?;
    let rows = drift(conn.query(SELECT_FORTUNES, Vec::new())).await?;

    let stored = rows
        .iter()
        .map(Fortune::from_row)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(render(prepare(stored))))
}

/// Appends the per-request synthetic fortune and sorts by the raw message.
/// Sorting happens before escaping; escaping is display-only.
fn prepare(mut fortunes: Vec<Fortune>) -> Vec<Fortune> {
    fortunes.push(Fortune {
        id: 0,
        message: SYNTHETIC_MESSAGE.to_string(),
    });
    fortunes.sort_by(|a, b| a.message.cmp(&b.message));
    fortunes
}

fn render(fortunes: Vec<Fortune>) -> String {
    let mut rows = String::new();
    for fortune in &fortunes {
        rows.push_str("<tr><td>");
        rows.push_str(&fortune.id.to_string());
        rows.push_str("</td><td>");
        rows.push_str(&escape_html(&fortune.message));
        rows.push_str("</td></tr>");
    }
    format!(
        "<!DOCTYPE html><html><head><title>Fortunes</title></head><body><table>\
         <tr><th>id</th><th>message</th></tr>{rows}</table></body></html>"
    )
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/fortunes", web::get().to(fortunes));
}
