use rocket::{form::Form, response::content::RawHtml, Route, State};

use crate::{
    error::Result,
    model::{
        mongodb::Id,
        survey::{lifecycle, AdminAction, SurveyState},
    },
    render,
    store::Store,
};

pub fn routes() -> Vec<Route> {
    routes![admin_form, admin]
}

/// The fields of the admin form.
#[derive(Debug, FromForm)]
pub struct AdminRequest<'r> {
    id: &'r str,
    admin_password: &'r str,
    admin_action: &'r str,
}

#[get("/admin?<id>")]
pub fn admin_form(id: Option<&str>) -> Result<RawHtml<String>> {
    Ok(RawHtml(render::admin_page(id)?))
}

#[post("/admin", data = "<request>")]
pub async fn admin(
    request: Form<AdminRequest<'_>>,
    store: &State<Store>,
) -> Result<RawHtml<String>> {
    let id = Id::decode(request.id)?;
    let action = request.admin_action.parse::<AdminAction>()?;

    let page = match action {
        AdminAction::ViewResponses => {
            let table = lifecycle::view_results(store, id, request.admin_password).await?;
            render::results_page(&table)?
        }
        AdminAction::SetState(target) => {
            lifecycle::set_state(store, id, target, request.admin_password).await?;
            match target {
                SurveyState::Open => render::message_page(
                    "Survey Opened",
                    "The survey is open and accepting responses.",
                )?,
                SurveyState::Closed => render::message_page(
                    "Survey Closed",
                    "The survey is closed and no longer accepts responses.",
                )?,
            }
        }
    };
    Ok(RawHtml(page))
}

#[cfg(test)]
mod tests {
    use rocket::{
        http::{ContentType, Status},
        local::asynchronous::Client,
    };

    use crate::model::{
        response::ResponseRecord,
        survey::{examples::ADMIN_PASSWORD, Survey},
    };
    use crate::store::{MemoryStore, SurveyStore};

    use super::*;

    fn admin_body(survey: &Survey, password: &str, action: &str) -> String {
        format!(
            "id={}&admin_password={password}&admin_action={action}",
            survey.id.encode()
        )
    }

    #[backend_test]
    async fn admin_form_is_prefilled(client: Client) {
        let id = Id::new().encode();
        let response = client.get(format!("/admin?id={id}")).dispatch().await;
        assert_eq!(Status::Ok, response.status());
        let body = response.into_string().await.unwrap();
        assert!(body.contains(&format!("name=\"id\" value=\"{id}\"")));
        assert!(body.contains("value=\"closesurvey\""));

        let response = client.get("/admin").dispatch().await;
        assert_eq!(Status::Ok, response.status());
    }

    #[backend_test]
    async fn view_responses(client: Client, store: MemoryStore) {
        let survey = Survey::example();
        store.insert(survey.clone()).await;
        for answers in [
            &[("question3", &["c"][..]), ("question1", &["a", "b"][..])][..],
            &[("question2", &["y"][..])][..],
        ] {
            store
                .insert_response(&ResponseRecord::example(&survey, answers))
                .await
                .unwrap();
        }

        let response = client
            .post(uri!(admin))
            .header(ContentType::Form)
            .body(admin_body(&survey, ADMIN_PASSWORD, "viewresponses"))
            .dispatch()
            .await;
        assert_eq!(Status::Ok, response.status());
        let body = response.into_string().await.unwrap();
        assert!(body.contains("<th>Q1</th><th>Q2</th><th>Q3</th>"));
        assert!(body.contains("<tr><td>1)</td><td>a b</td><td></td><td>c</td></tr>"));
        assert!(body.contains("<tr><td>2)</td><td></td><td>y</td><td></td></tr>"));
    }

    #[backend_test]
    async fn close_and_reopen(client: Client, store: MemoryStore) {
        let survey = Survey::example();
        store.insert(survey.clone()).await;

        for _ in 0..2 {
            let response = client
                .post(uri!(admin))
                .header(ContentType::Form)
                .body(admin_body(&survey, ADMIN_PASSWORD, "closesurvey"))
                .dispatch()
                .await;
            assert_eq!(Status::Ok, response.status());
            assert!(response.into_string().await.unwrap().contains("Survey Closed"));
            assert_eq!(store.surveys().await[0].state, SurveyState::Closed);
        }

        let response = client
            .post(uri!(admin))
            .header(ContentType::Form)
            .body(admin_body(&survey, ADMIN_PASSWORD, "opensurvey"))
            .dispatch()
            .await;
        assert_eq!(Status::Ok, response.status());
        assert!(response.into_string().await.unwrap().contains("Survey Opened"));
        assert_eq!(store.surveys().await[0].state, SurveyState::Open);
    }

    #[backend_test]
    async fn wrong_password(client: Client, store: MemoryStore) {
        let survey = Survey::example();
        store.insert(survey.clone()).await;

        for action in ["viewresponses", "closesurvey"] {
            let response = client
                .post(uri!(admin))
                .header(ContentType::Form)
                .body(admin_body(&survey, "guess", action))
                .dispatch()
                .await;
            assert_eq!(Status::Unauthorized, response.status());
        }
        assert_eq!(store.surveys().await, vec![survey]);
    }

    #[backend_test]
    async fn bad_requests(client: Client, store: MemoryStore) {
        let survey = Survey::example();
        store.insert(survey.clone()).await;

        // Unknown action.
        let response = client
            .post(uri!(admin))
            .header(ContentType::Form)
            .body(admin_body(&survey, ADMIN_PASSWORD, "deletesurvey"))
            .dispatch()
            .await;
        assert_eq!(Status::BadRequest, response.status());

        // Malformed id.
        let response = client
            .post(uri!(admin))
            .header(ContentType::Form)
            .body(format!(
                "id=nothex&admin_password={ADMIN_PASSWORD}&admin_action=viewresponses"
            ))
            .dispatch()
            .await;
        assert_eq!(Status::BadRequest, response.status());

        // Unknown survey.
        let response = client
            .post(uri!(admin))
            .header(ContentType::Form)
            .body(admin_body(&Survey::example(), ADMIN_PASSWORD, "viewresponses"))
            .dispatch()
            .await;
        assert_eq!(Status::NotFound, response.status());

        // Missing fields.
        let response = client
            .post(uri!(admin))
            .header(ContentType::Form)
            .body(format!("id={}", survey.id.encode()))
            .dispatch()
            .await;
        assert_eq!(Status::UnprocessableEntity, response.status());
        assert_eq!(store.surveys().await, vec![survey]);
    }
}
