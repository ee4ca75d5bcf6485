//! Parley server binary.
//!
//! Boots the transfer endpoint over the configured message repository and
//! media store. With `DATABASE_URL` set, messages persist to `PostgreSQL`;
//! without it, the in-memory repository is used and history is lost on
//! restart. Image blobs always persist to the media directory.

use std::io;
use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use diesel::{Connection, PgConnection};
use diesel::r2d2::{ConnectionManager, Pool};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use mockable::{Clock, DefaultClock};
use tracing_subscriber::EnvFilter;

use parley::config::Config;
use parley::media::fs::FsMediaStore;
use parley::media::store::MediaStore;
use parley::message::adapters::memory::InMemoryMessageRepository;
use parley::message::adapters::postgres::PostgresMessageRepository;
use parley::message::ports::repository::MessageRepository;
use parley::message::ports::validator::{MessageValidator, ValidationConfig};
use parley::message::services::send::MessageService;
use parley::message::validation::service::DefaultMessageValidator;
use parley::transfer;

#[actix_web::main]
async fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;

    std::fs::create_dir_all(&config.media_dir)?;
    let media_dir = Dir::open_ambient_dir(&config.media_dir, ambient_authority())?;
    let media = Arc::new(FsMediaStore::new(media_dir, config.max_image_bytes));

    let validator = DefaultMessageValidator::with_config(ValidationConfig::with_max_text_length(
        config.max_text_length,
    ));

    match config.database_url.clone() {
        Some(url) => {
            run_migrations(&url)?;
            let manager = ConnectionManager::<PgConnection>::new(url);
            let pool = Pool::builder().build(manager).map_err(io::Error::other)?;
            tracing::info!("messages persist to PostgreSQL");

            let service = MessageService::new(
                Arc::new(PostgresMessageRepository::new(pool)),
                media,
                validator,
                Arc::new(DefaultClock),
            );
            serve(config, service).await
        }
        None => {
            tracing::warn!("DATABASE_URL not set; messages are held in memory only");

            let service = MessageService::new(
                Arc::new(InMemoryMessageRepository::new()),
                media,
                validator,
                Arc::new(DefaultClock),
            );
            serve(config, service).await
        }
    }
}

/// Bundled schema migrations, applied on startup when PostgreSQL is used.
const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Brings the database schema up to date before the pool is built.
///
/// The messages table's unique (conversation, sequence) index is what turns
/// racing appends into retryable unique violations, so the server refuses to
/// start if the schema cannot be applied.
fn run_migrations(url: &str) -> io::Result<()> {
    let mut conn = PgConnection::establish(url)
        .map_err(|e| io::Error::new(io::ErrorKind::ConnectionRefused, e.to_string()))?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| io::Error::other(e.to_string()))?;
    for version in applied {
        tracing::info!(%version, "applied schema migration");
    }
    Ok(())
}

/// Runs the HTTP server over a fully wired send service.
async fn serve<R, M, V, K>(config: Config, service: MessageService<R, M, V, K>) -> io::Result<()>
where
    R: MessageRepository + 'static,
    M: MediaStore + 'static,
    V: MessageValidator + 'static,
    K: Clock + Send + Sync + 'static,
{
    let bind = config.bind_address();
    tracing::info!(host = %bind.0, port = bind.1, "starting transfer endpoint");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(service.clone()))
            .app_data(web::Data::new(config.clone()))
            .configure(transfer::configure::<R, M, V, K>)
    })
    .bind(bind)?
    .run()
    .await
}
