use rocket::{http::Status, response::content::RawHtml, Catcher, Request, Route};

use crate::{error::Result, render};

pub fn routes() -> Vec<Route> {
    routes![about]
}

pub fn catchers() -> Vec<Catcher> {
    catchers![not_found, unprocessable, internal_error]
}

#[get("/about")]
pub fn about() -> Result<RawHtml<String>> {
    Ok(RawHtml(render::about_page()?))
}

/// Render a catcher's message, or the bare message if even that fails.
fn caught(status: Status, message: &str) -> (Status, RawHtml<String>) {
    let body = render::message_page("Error", message).unwrap_or_else(|_| message.to_string());
    (status, RawHtml(body))
}

#[catch(404)]
fn not_found(req: &Request) -> (Status, RawHtml<String>) {
    caught(Status::NotFound, &format!("Nothing here: {}", req.uri()))
}

#[catch(422)]
fn unprocessable(_req: &Request) -> (Status, RawHtml<String>) {
    caught(
        Status::UnprocessableEntity,
        "The submitted form is missing fields or could not be understood.",
    )
}

#[catch(500)]
fn internal_error(_req: &Request) -> (Status, RawHtml<String>) {
    caught(Status::InternalServerError, "Something went wrong.")
}
