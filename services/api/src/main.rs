use sea_orm::Database;
use tracing::info;

use teamsync_api::config::ApiConfig;
use teamsync_api::infra::assistant::OpenAiAssistant;
use teamsync_api::infra::mailer::SmtpMailer;
use teamsync_api::infra::outbox::OutboxDispatcher;
use teamsync_api::router::build_router;
use teamsync_api::state::AppState;
use teamsync_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = ApiConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let mailer = SmtpMailer::new(&config).expect("failed to build SMTP mailer");
    let assistant = OpenAiAssistant::from_config(&config);

    let state = AppState {
        db,
        jwt_secret: config.jwt_secret.clone(),
        assistant,
    };

    // Mail delivery runs beside the HTTP server; requests never wait on SMTP.
    let dispatcher = OutboxDispatcher {
        outbox: state.outbox_repo(),
        mailer,
    };
    tokio::spawn(dispatcher.run());

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.api_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("api service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
