use actix_web::dev::Server;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::net::TcpListener;

use crate::auth::Authenticator;
use crate::routes::{health_check, login, logout, protected, refresh, signup, UserDirectory};

pub fn run(listener: TcpListener, authenticator: Authenticator) -> Result<Server, std::io::Error> {
    let authenticator_data = web::Data::new(authenticator.clone());
    let users = web::Data::new(UserDirectory::default());

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            // Shared state
            .app_data(authenticator_data.clone())
            .app_data(users.clone())
            // Public routes
            .route("/health_check", web::get().to(health_check))
            .route("/signup", web::post().to(signup))
            .route("/login", web::post().to(login))
            .route("/refresh-token", web::post().to(refresh))
            .route("/logout", web::post().to(logout))
            // Protected routes
            .service(
                web::resource("/protected")
                    .wrap(authenticator.authenticate())
                    .route(web::get().to(protected)),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
