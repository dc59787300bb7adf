// Template context structures for Askama templates, organized by page.

use actix_session::Session;

use crate::auth::csrf;
use crate::auth::session::take_flash;

mod common;
mod dashboard;
mod intake;

pub use self::common::LoginTemplate;
pub use self::dashboard::{DashboardTemplate, WindowOption};
pub use self::intake::{CountryOption, IntakeSuccessTemplate, IntakeTemplate, LevelOption};

pub const APP_NAME: &str = "Estonian Course Leads";

/// Common context shared by all authenticated pages.
/// Templates access these as `ctx.app_name`, `ctx.flash`, etc.
pub struct PageContext {
    pub app_name: String,
    pub csrf_token: String,
    pub flash: Option<String>,
}

impl PageContext {
    pub fn build(session: &Session) -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            csrf_token: csrf::get_or_create_token(session),
            flash: take_flash(session),
        }
    }
}
