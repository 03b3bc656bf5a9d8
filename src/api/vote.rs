use std::net::IpAddr;

use rocket::{form::Form, response::content::RawHtml, Route, State};

use crate::{
    error::Result,
    model::{
        form::FormFields,
        mongodb::Id,
        survey::lifecycle::{self, VoteOutcome},
    },
    notify::Mailer,
    render,
    store::Store,
};

pub fn routes() -> Vec<Route> {
    routes![voting_page, submit_vote]
}

#[get("/vote?<id>")]
pub async fn voting_page(id: Option<&str>, store: &State<Store>) -> Result<RawHtml<String>> {
    let id = Id::decode(id.unwrap_or_default())?;
    Ok(RawHtml(lifecycle::voting_page(store, id).await?))
}

#[post("/vote", data = "<form>")]
pub async fn submit_vote(
    form: Form<FormFields>,
    remote: Option<IpAddr>,
    store: &State<Store>,
    mailer: &State<Mailer>,
) -> Result<RawHtml<String>> {
    let fields = form.into_inner();
    let id = Id::decode(fields.first("id").unwrap_or_default())?;
    let host = remote.map_or_else(|| "unknown".to_string(), |ip| ip.to_string());

    let page = match lifecycle::submit_vote(store, mailer, id, &fields, host).await? {
        VoteOutcome::Saved => render::message_page("Thanks", "Your response has been recorded.")?,
        VoteOutcome::Forwarded => render::message_page(
            "Thank You",
            "Your response has been sent to the creator of the survey.",
        )?,
    };
    Ok(RawHtml(page))
}
