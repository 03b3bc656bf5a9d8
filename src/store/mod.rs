//! Persistence of surveys and their responses.

use std::ops::Deref;
use std::sync::Arc;

use crate::error::Result;
use crate::model::{
    mongodb::Id,
    response::ResponseRecord,
    survey::{Survey, SurveyState},
};

#[cfg(test)]
mod memory;
mod mongo;

#[cfg(test)]
pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// A document store for surveys and responses.
///
/// Single-document operations are assumed to be atomic; nothing else is
/// coordinated.
#[rocket::async_trait]
pub trait SurveyStore: Send + Sync {
    /// Insert a new survey under its own ID.
    async fn insert_survey(&self, survey: &Survey) -> Result<()>;

    async fn get_survey(&self, id: Id) -> Result<Option<Survey>>;

    /// Overwrite the lifecycle state of a survey.
    /// Returns whether a survey with the given ID exists.
    async fn set_survey_state(&self, id: Id, state: SurveyState) -> Result<bool>;

    /// Insert a response, returning its newly assigned ID.
    async fn insert_response(&self, response: &ResponseRecord) -> Result<Id>;

    /// Every response to the given survey, in the order the store returns them.
    async fn responses_for(&self, survey_id: Id) -> Result<Vec<ResponseRecord>>;
}

/// A shared handle on the configured store. This is what lives in Rocket's
/// managed state.
#[derive(Clone)]
pub struct Store(Arc<dyn SurveyStore>);

impl Store {
    pub fn new(store: impl SurveyStore + 'static) -> Self {
        Self(Arc::new(store))
    }
}

impl Deref for Store {
    type Target = dyn SurveyStore;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}
