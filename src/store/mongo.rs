use log::debug;
use mongodb::{
    bson::{doc, Document},
    Database,
};
use rocket::futures::TryStreamExt;

use crate::error::{Error, Result};
use crate::model::{
    mongodb::{Coll, Id},
    response::ResponseRecord,
    survey::{Survey, SurveyState},
};

use super::SurveyStore;

/// Surveys in the `questions` collection, responses in `responses`.
#[derive(Clone)]
pub struct MongoStore {
    surveys: Coll<Survey>,
    responses: Coll<ResponseRecord>,
}

impl MongoStore {
    pub fn new(db: &Database) -> Self {
        Self {
            surveys: Coll::from_db(db),
            responses: Coll::from_db(db),
        }
    }
}

fn state_update(state: SurveyState) -> Document {
    doc! {
        "$set": {
            "state": state,
        }
    }
}

fn responses_filter(survey_id: Id) -> Document {
    doc! {
        "survey_id": survey_id,
    }
}

#[rocket::async_trait]
impl SurveyStore for MongoStore {
    async fn insert_survey(&self, survey: &Survey) -> Result<()> {
        self.surveys.insert_one(survey, None).await?;
        Ok(())
    }

    async fn get_survey(&self, id: Id) -> Result<Option<Survey>> {
        Ok(self.surveys.find_one(id.as_doc(), None).await?)
    }

    async fn set_survey_state(&self, id: Id, state: SurveyState) -> Result<bool> {
        let result = self
            .surveys
            .update_one(id.as_doc(), state_update(state), None)
            .await?;
        debug!(
            "Set state of survey {id}: matched {}, modified {}",
            result.matched_count, result.modified_count
        );
        Ok(result.matched_count == 1)
    }

    async fn insert_response(&self, response: &ResponseRecord) -> Result<Id> {
        let id = self
            .responses
            .insert_one(response, None)
            .await?
            .inserted_id
            .as_object_id()
            .ok_or_else(|| Error::Storage("Inserted response has no object ID".to_string()))?;
        Ok(id.into())
    }

    async fn responses_for(&self, survey_id: Id) -> Result<Vec<ResponseRecord>> {
        let responses: Vec<ResponseRecord> = self
            .responses
            .find(responses_filter(survey_id), None)
            .await?
            .try_collect()
            .await?;
        Ok(responses)
    }
}
