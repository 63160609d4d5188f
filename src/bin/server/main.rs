use actix_session::{config::PersistentSession, storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::{Key, SameSite};
use actix_web::http::header;
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use campus_connect::db::init_db;
use env_logger::Env;
use rand::{distributions::Alphanumeric, Rng};

/// Signing keys shorter than this are rejected by the cookie crate.
const MIN_SECRET_KEY_LEN: usize = 64;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_lib_mods();
    init_our_mods();

    let db = init_db(std::env::var("DATABASE_URL").expect("DATABASE_URL must be set.")).await;
    let secret_key = load_secret_key();
    let bind_address = campus_connect::app_config::server().bind_address;

    log::info!("Listening on {}", bind_address);

    HttpServer::new(move || {
        // Order of middleware IS IMPORTANT and is in REVERSE EXECUTION ORDER.
        App::new()
            .app_data(Data::new(db.clone()))
            .wrap(
                DefaultHeaders::new()
                    .add((header::X_FRAME_OPTIONS, "DENY"))
                    .add((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
                    .add(("Referrer-Policy", "strict-origin-when-cross-origin")),
            )
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_same_site(SameSite::Lax)
                    .cookie_secure(false) // Allow HTTP for development
                    .session_lifecycle(PersistentSession::default())
                    .build(),
            )
            .wrap(Logger::new("%a %r %s %Dms"))
            .configure(campus_connect::web::configure)
    })
    .bind(bind_address)?
    .run()
    .await
}

fn load_secret_key() -> Key {
    match std::env::var("SECRET_KEY") {
        Ok(key) if key.len() >= MIN_SECRET_KEY_LEN => Key::from(key.as_bytes()),
        other => {
            let random_string: String = rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(128)
                .map(char::from)
                .collect();
            let reason = match other {
                Ok(_) => format!("shorter than {} bytes", MIN_SECRET_KEY_LEN),
                Err(err) => err.to_string(),
            };
            log::warn!("SECRET_KEY was invalid. Reason: {}\r\nSession cookies will be invalidated every time the application is restarted.", reason);
            Key::from(random_string.as_bytes())
        }
    }
}

/// Initialize third party crates we rely on but don't have control over.
pub fn init_lib_mods() {
    if let Err(err) = dotenv::dotenv() {
        eprintln!("No .env file loaded: {}", err);
    }
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
}

/// Initialize all local mods.
pub fn init_our_mods() {
    campus_connect::app_config::init();
}
