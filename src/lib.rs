#[macro_use]
extern crate rocket;

#[cfg(test)]
#[macro_use]
extern crate backend_test;

use rocket::{fs::FileServer, Build, Rocket};

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod notify;
pub mod render;
pub mod store;

pub use config::Config;

/// Build a server ready for launch. The database connection and the mailer
/// are established by fairings when the server ignites.
pub fn build() -> Rocket<Build> {
    mount(rocket::build())
        .attach(logging::LoggerFairing)
        .attach(config::ConfigFairing)
        .attach(config::DatabaseFairing)
        .attach(config::MailerFairing)
}

/// Build a server over an already-constructed store and mailer.
pub fn rocket_for_store_and_mailer(store: store::Store, mailer: notify::Mailer) -> Rocket<Build> {
    mount(rocket::build())
        .attach(config::ConfigFairing)
        .manage(store)
        .manage(mailer)
}

fn mount(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket
        .mount("/", api::routes())
        .mount("/resources", FileServer::from(rocket::fs::relative!("resources")))
        .register("/", api::catchers())
}
