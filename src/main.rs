use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use guilt_tracker::{
    auth::{PasswordHasher, TokenService},
    config::Config,
    routes, store,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    let store = store::from_config(&config)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    let store: web::Data<dyn store::Store> = web::Data::from(store);

    let hasher = PasswordHasher::new(config.bcrypt_cost)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    let hasher = web::Data::new(hasher);
    let tokens = web::Data::new(TokenService::new(&config.jwt_secret, config.token_ttl()));

    let cors_origins = config.cors_allowed_origins.clone();

    log::info!("Starting guilt-tracker at {}", config.server_url());
    HttpServer::new(move || {
        let cors = cors_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);

        App::new()
            .app_data(store.clone())
            .app_data(hasher.clone())
            .app_data(tokens.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
