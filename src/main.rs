use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use sqlx::PgPool;

use taskboard::{
    auth::{AuthMiddleware, AuthService, TokenIssuer},
    config::Config,
    error::AppError,
    routes::{self, health},
    store::PgStore,
    tasks::TaskService,
};

fn startup_error(err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(startup_error)?;
    let tokens = TokenIssuer::new(&config.jwt_secret, config.jwt_ttl).map_err(startup_error)?;

    let pool = PgPool::connect(&config.database_url)
        .await
        .map_err(|e| startup_error(AppError::from(e)))?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(startup_error)?;

    let store = Arc::new(PgStore::new(pool));
    let auth = web::Data::new(AuthService::new(store.clone(), tokens, config.bcrypt_cost));
    let tasks = web::Data::new(TaskService::new(store));

    log::info!("Starting taskboard server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(auth.clone())
            .app_data(tasks.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            )
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
