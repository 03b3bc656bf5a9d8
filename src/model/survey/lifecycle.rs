//! Creating surveys, gating who may answer them, and admin access.

use log::info;

use crate::error::{Error, Result};
use crate::model::{
    form::{FormFields, SurveyTokens},
    mongodb::Id,
    response::{ResponseRecord, ResultsTable},
};
use crate::notify::{Mail, Mailer};
use crate::store::Store;

use super::{compiler, password, Survey, SurveyState};

/// What happened to an accepted vote.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    /// Stored, and mailed to the creator if they asked for that.
    Saved,
    /// Mailed to the creator only; the survey never stores responses.
    Forwarded,
}

/// Compile, hash, and store a new survey, then mail its links to the creator.
pub async fn create_survey(
    store: &Store,
    mailer: &Mailer,
    hostname: &str,
    tokens: &SurveyTokens,
) -> Result<Survey> {
    let id = Id::new();
    let compiled = compiler::compile(id, tokens)?;
    let discard_responses = tokens.flag("survey_donotsave_responses");

    let survey = Survey {
        id,
        creator_name: tokens.text("survey_creator_name").to_string(),
        creator_email: tokens.text("survey_creator_email").to_string(),
        admin_password_hash: password::hash_password(tokens.text("survey_admin_password"))?,
        state: SurveyState::Open,
        question_count: compiled.question_count(),
        title: compiled.title,
        html: compiled.html,
        // Responses that aren't stored have to go somewhere.
        email_responses: discard_responses || tokens.flag("survey_email_responses"),
        discard_responses,
    };

    store.insert_survey(&survey).await?;
    info!(
        "Created survey {} '{}' with {} questions",
        survey.id, survey.title, survey.question_count
    );

    mailer.dispatch(Mail::survey_created(&survey, hostname));
    Ok(survey)
}

/// Fetch a survey, failing if it doesn't exist.
pub async fn fetch_survey(store: &Store, id: Id) -> Result<Survey> {
    store
        .get_survey(id)
        .await?
        .ok_or_else(|| Error::not_found(format!("Survey {id}")))
}

/// Fetch a survey and check its admin password.
///
/// A survey that doesn't exist is rejected before any password comparison.
pub async fn authorized_survey(store: &Store, id: Id, password: &str) -> Result<Survey> {
    let survey = fetch_survey(store, id).await?;
    survey.authorize(password)?;
    Ok(survey)
}

/// The voting page of an open survey.
pub async fn voting_page(store: &Store, id: Id) -> Result<String> {
    let survey = fetch_survey(store, id).await?;
    survey.ensure_open()?;
    Ok(survey.html)
}

/// Accept a submitted voting form for an open survey.
///
/// Nothing is stored or mailed unless the survey is open. Mail is only
/// queued once the response has been dealt with.
pub async fn submit_vote(
    store: &Store,
    mailer: &Mailer,
    id: Id,
    fields: &FormFields,
    host: String,
) -> Result<VoteOutcome> {
    let survey = fetch_survey(store, id).await?;
    survey.ensure_open()?;

    let mut record = ResponseRecord::from_fields(&survey, fields, host);
    let outcome = if survey.discard_responses {
        info!("Forwarding response to survey {} without storing it", survey.id);
        VoteOutcome::Forwarded
    } else {
        let record_id = store.insert_response(&record).await?;
        record.id = Some(record_id);
        info!("Stored response {record_id} to survey {}", survey.id);
        VoteOutcome::Saved
    };

    if survey.email_responses {
        mailer.dispatch(Mail::new_response(&survey, &record));
    }
    Ok(outcome)
}

/// Open or close a survey. Setting a survey to the state it is already in
/// succeeds and changes nothing.
///
/// Concurrent changes are not coordinated; the last one to reach the store
/// wins.
pub async fn set_state(store: &Store, id: Id, target: SurveyState, password: &str) -> Result<()> {
    authorized_survey(store, id, password).await?;
    if !store.set_survey_state(id, target).await? {
        return Err(Error::not_found(format!("Survey {id}")));
    }
    info!("Survey {id} is now {target:?}");
    Ok(())
}

/// Every stored response to a survey, aligned to its questions.
pub async fn view_results(store: &Store, id: Id, password: &str) -> Result<ResultsTable> {
    let survey = authorized_survey(store, id, password).await?;
    let records = store.responses_for(id).await?;
    Ok(ResultsTable::build(&survey, &records))
}
