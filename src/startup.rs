use actix_web::dev::Server;
use actix_web::{middleware::Logger, web, App, HttpServer};
use sqlx::PgPool;
use std::net::TcpListener;

use crate::configuration::JwtSettings;
use crate::logger::LoggerMiddleware;
use crate::middleware::JwtMiddleware;
use crate::routes::{health_check, login, me, refresh_token, register, revoke_token};

pub fn run(
    listener: TcpListener,
    connection: PgPool,
    jwt_config: JwtSettings,
) -> Result<Server, std::io::Error> {
    let connection = web::Data::new(connection);
    let jwt_config_data = web::Data::new(jwt_config.clone());

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(LoggerMiddleware)
            .app_data(connection.clone())
            .app_data(jwt_config_data.clone())
            .route("/health_check", web::get().to(health_check))
            // Public auth endpoints
            .route("/auth/register", web::post().to(register))
            .route("/auth/login", web::post().to(login))
            .route("/auth/refresh-token", web::post().to(refresh_token))
            .route("/auth/revoke-token", web::post().to(revoke_token))
            // Protected: requires a valid access token
            .service(
                web::scope("/auth/me")
                    .wrap(JwtMiddleware::new(jwt_config.clone()))
                    .route("", web::get().to(me)),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
