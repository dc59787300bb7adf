use actix_web::{App, HttpServer, middleware};

use lead_intake::app::{AppState, session_middleware};
use lead_intake::config::AppConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenvy::dotenv();
    env_logger::init();

    let config = AppConfig::from_env();

    let state = AppState::new(config.clone())
        .map_err(|e| std::io::Error::other(format!("Failed to build webhook client: {e}")))?;

    // Cookie key: from SESSION_KEY when long enough, else random per process
    let secret_key = config.cookie_key();
    let cookie_secure = config.cookie_secure;

    log::info!("Forwarding leads to {}", state.webhook.url());
    log::info!("Starting server at http://{}", config.bind_addr);

    HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(session_middleware(secret_key.clone(), cookie_secure))
            .wrap(middleware::Logger::default())
            .configure(|cfg| state.configure(cfg))
    })
    .bind(&config.bind_addr)?
    .run()
    .await
}
