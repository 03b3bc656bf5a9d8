use rocket::{form::Form, response::content::RawHtml, Route, State};

use crate::{
    error::Result,
    model::{
        form::{FormFields, SurveyTokens},
        survey::lifecycle,
    },
    notify::Mailer,
    render,
    store::Store,
    Config,
};

pub fn routes() -> Vec<Route> {
    routes![create_form, create]
}

#[get("/create")]
pub fn create_form() -> Result<RawHtml<String>> {
    Ok(RawHtml(render::create_page()?))
}

#[post("/create", data = "<form>")]
pub async fn create(
    form: Form<FormFields>,
    store: &State<Store>,
    mailer: &State<Mailer>,
    config: &State<Config>,
) -> Result<RawHtml<String>> {
    let tokens = SurveyTokens::from(form.into_inner());
    let survey = lifecycle::create_survey(store, mailer, config.hostname(), &tokens).await?;
    Ok(RawHtml(render::survey_created_page(&survey, config.hostname())?))
}
