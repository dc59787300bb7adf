use actix_web::HttpResponse;

pub mod auth_handlers;
pub mod dashboard;
pub mod intake_handlers;

/// 303 redirect, used after every form POST and for auth bounces.
pub(crate) fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", location))
        .finish()
}
