use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::auth::csrf;
use crate::auth::session::{SessionContext, set_flash};
use crate::errors::{AppError, render};
use crate::handlers::see_other;
use crate::leads::LeadRecord;
use crate::leads::cache::LeadCache;
use crate::leads::charts::{self, ChartWindow};
use crate::leads::export::{CSV_FILENAME, leads_to_csv};
use crate::leads::stats;
use crate::leads::table::table_rows;
use crate::templates_structs::{DashboardTemplate, PageContext, WindowOption};
use crate::webhook::WebhookClient;

#[derive(Deserialize)]
pub struct WindowQuery {
    pub days: Option<String>,
}

#[derive(Deserialize)]
pub struct DeleteForm {
    pub email: String,
    pub csrf_token: String,
}

fn current_context(session: &Session) -> Result<SessionContext, AppError> {
    SessionContext::from_session(session)
        .ok_or_else(|| AppError::Session("no admin token in session".to_string()))
}

fn build_template(
    ctx: PageContext,
    leads: &[LeadRecord],
    window: ChartWindow,
    load_error: Option<String>,
) -> DashboardTemplate {
    let growth = charts::growth_series(leads, window);
    let levels = charts::level_distribution(leads);
    DashboardTemplate {
        ctx,
        rows: table_rows(leads),
        stats: stats::compute(leads),
        load_error,
        window_options: WindowOption::all_for(window),
        growth_json: serde_json::to_string(&growth).unwrap_or_else(|_| "{}".to_string()),
        levels_json: serde_json::to_string(&levels).unwrap_or_else(|_| "{}".to_string()),
    }
}

/// GET /dashboard — fetch leads fresh and render table, stats and charts.
pub async fn index(
    session: Session,
    query: web::Query<WindowQuery>,
    webhook: web::Data<WebhookClient>,
    cache: web::Data<LeadCache>,
) -> Result<HttpResponse, AppError> {
    let sc = current_context(&session)?;
    let window = ChartWindow::parse(query.days.as_deref());

    match webhook.fetch_leads(sc.token()).await {
        Ok(leads) => {
            let batch = sc.store_leads(&cache, leads);
            let ctx = PageContext::build(&session);
            render(build_template(ctx, &batch, window, None))
        }
        Err(e) if e.is_credential_error() => {
            log::warn!("admin token rejected, ending session: {e}");
            sc.teardown(&session, &cache);
            Ok(see_other("/login"))
        }
        Err(e) => {
            log::error!("failed to load leads: {e}");
            let ctx = PageContext::build(&session);
            let message = format!("Error loading data: {}", e.user_message());
            render(build_template(ctx, &[], window, Some(message)))
        }
    }
}

/// GET /dashboard/growth?days=N — growth series from the cached batch.
pub async fn growth(
    session: Session,
    query: web::Query<WindowQuery>,
    cache: web::Data<LeadCache>,
) -> Result<HttpResponse, AppError> {
    let sc = current_context(&session)?;
    let window = ChartWindow::parse(query.days.as_deref());
    let leads = sc.leads(&cache);
    Ok(HttpResponse::Ok().json(charts::growth_series(&leads, window)))
}

/// GET /dashboard/export.csv — download the cached batch.
pub async fn export_csv(
    session: Session,
    cache: web::Data<LeadCache>,
) -> Result<HttpResponse, AppError> {
    let sc = current_context(&session)?;
    let leads = sc.leads(&cache);
    if leads.is_empty() {
        set_flash(&session, "No data to export");
        return Ok(see_other("/dashboard"));
    }

    let body = leads_to_csv(&leads)?;
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{CSV_FILENAME}\""),
        ))
        .body(body))
}

/// POST /dashboard/leads/delete — always lands back on the dashboard, which re-fetches.
pub async fn delete_lead(
    session: Session,
    form: web::Form<DeleteForm>,
    webhook: web::Data<WebhookClient>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let sc = current_context(&session)?;
    let email = form.email.trim();

    if let Err(e) = webhook.delete_lead(sc.token(), email).await {
        log::error!("delete of {email} failed: {e}");
        set_flash(&session, &format!("Delete failed: {}", e.user_message()));
    }
    Ok(see_other("/dashboard"))
}
