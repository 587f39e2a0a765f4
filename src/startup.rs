use std::net::TcpListener;

use actix_web::{dev::Server, error::InternalError, web, App, HttpServer};
use anyhow::Context;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing_actix_web::TracingLogger;

use crate::{
    auth::jwt::Tokenizer,
    configuration::Settings,
    routes::{get_product, get_products, get_purchases, get_sales, get_users, health_check, login, post_product, post_purchase, register},
    utils::{get_connection_pool, DbPool, ErrorBody, ErrorKind}
};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

pub struct Application{
    pub host: String,
    pub port: u16,
    pub server: Server
}

impl Application {
    pub async fn new(settings: Settings) -> Result<Self, anyhow::Error>{
        let pool = get_connection_pool(&settings.database)
            .context("Failed to build connection pool")?;
        run_migrations(&pool)?;

        let listener = TcpListener::bind((settings.application.host.as_str(), settings.application.port))
            .context("Failed to bind listener")?;
        let port = listener.local_addr()?.port();

        let tokenizer = Tokenizer::new(&settings.jwt);
        let server = run(listener, pool, tokenizer)?;

        tracing::info!(host = %settings.application.host, port, "Marketplace listening");

        Ok(Application{
            host: settings.application.host,
            port,
            server
        })
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error>{
        self.server.await
    }
}

#[tracing::instrument(
    "Running pending migrations",
    skip_all
)]
pub fn run_migrations(pool: &DbPool) -> Result<(), anyhow::Error>{
    let mut conn = pool.get()
        .context("Failed to get connection for migrations")?;

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;

    Ok(())
}

pub fn run(
    listener: TcpListener,
    pool: DbPool,
    tokenizer: Tokenizer
) -> Result<Server, anyhow::Error>{
    let pool = web::Data::new(pool);
    let tokenizer = web::Data::new(tokenizer);

    let server = HttpServer::new(move || {
        // Malformed bodies share the error shape of every other failure
        let json_config = web::JsonConfig::default().error_handler(|err, _req| {
            let response = ErrorBody::new(ErrorKind::InvalidRequest, err.to_string()).into_response();
            InternalError::from_response(err, response).into()
        });

        App::new()
            .wrap(TracingLogger::default())
            .app_data(json_config)
            .app_data(pool.clone())
            .app_data(tokenizer.clone())
            .route("/health", web::get().to(health_check))
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/users", web::get().to(get_users))
            .service(
                web::resource("/products")
                    .route(web::get().to(get_products))
                    .route(web::post().to(post_product))
            )
            .route("/products/{id}", web::get().to(get_product))
            .service(
                web::resource("/purchases")
                    .route(web::get().to(get_purchases))
                    .route(web::post().to(post_purchase))
            )
            .route("/sales", web::get().to(get_sales))
    })
    .listen(listener)?
    .run();

    Ok(server)
}
