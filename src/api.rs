use rocket::{Catcher, Route};

mod admin;
mod create;
mod public;
mod vote;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(create::routes());
    routes.extend(vote::routes());
    routes.extend(admin::routes());
    routes.extend(public::routes());
    routes
}

pub fn catchers() -> Vec<Catcher> {
    public::catchers()
}
