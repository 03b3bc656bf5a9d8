use rocket::tokio::sync::Mutex;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::model::{
    mongodb::Id,
    response::ResponseRecord,
    survey::{Survey, SurveyState},
};

use super::SurveyStore;

#[derive(Default)]
struct Inner {
    surveys: Vec<Survey>,
    responses: Vec<ResponseRecord>,
    fail_writes: bool,
}

impl Inner {
    fn check_writable(&self) -> Result<()> {
        if self.fail_writes {
            Err(Error::Storage("writes are disabled".to_string()))
        } else {
            Ok(())
        }
    }
}

/// An in-memory store. Clones share the same contents.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    /// Make every subsequent write fail (or succeed again).
    pub async fn fail_writes(&self, fail: bool) {
        self.inner.lock().await.fail_writes = fail;
    }

    /// Insert a survey directly, bypassing any failure switch.
    pub async fn insert(&self, survey: Survey) {
        self.inner.lock().await.surveys.push(survey);
    }

    pub async fn surveys(&self) -> Vec<Survey> {
        self.inner.lock().await.surveys.clone()
    }

    pub async fn responses(&self) -> Vec<ResponseRecord> {
        self.inner.lock().await.responses.clone()
    }
}

#[rocket::async_trait]
impl SurveyStore for MemoryStore {
    async fn insert_survey(&self, survey: &Survey) -> Result<()> {
        let mut inner = self.inner.lock().await;
        inner.check_writable()?;
        if inner.surveys.iter().any(|s| s.id == survey.id) {
            return Err(Error::Storage(format!("duplicate survey {}", survey.id)));
        }
        inner.surveys.push(survey.clone());
        Ok(())
    }

    async fn get_survey(&self, id: Id) -> Result<Option<Survey>> {
        let inner = self.inner.lock().await;
        Ok(inner.surveys.iter().find(|s| s.id == id).cloned())
    }

    async fn set_survey_state(&self, id: Id, state: SurveyState) -> Result<bool> {
        let mut inner = self.inner.lock().await;
        inner.check_writable()?;
        match inner.surveys.iter_mut().find(|s| s.id == id) {
            Some(survey) => {
                survey.state = state;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn insert_response(&self, response: &ResponseRecord) -> Result<Id> {
        let mut inner = self.inner.lock().await;
        inner.check_writable()?;
        let id = Id::new();
        inner.responses.push(ResponseRecord {
            id: Some(id),
            ..response.clone()
        });
        Ok(id)
    }

    async fn responses_for(&self, survey_id: Id) -> Result<Vec<ResponseRecord>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .responses
            .iter()
            .filter(|r| r.survey_id == survey_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rocket::async_test]
    async fn responses_are_kept_per_survey_in_arrival_order() {
        let store = MemoryStore::default();
        let first = Survey::example();
        let second = Survey::example();
        for survey in [&first, &second] {
            store.insert_survey(survey).await.unwrap();
        }

        let a = ResponseRecord::example(&first, &[("question1", &["a"])]);
        let b = ResponseRecord::example(&second, &[("question1", &["b"])]);
        let c = ResponseRecord::example(&first, &[("question1", &["c"])]);
        for record in [&a, &b, &c] {
            store.insert_response(record).await.unwrap();
        }

        let found = store.responses_for(first.id).await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].responses, a.responses);
        assert_eq!(found[1].responses, c.responses);
        assert!(found.iter().all(|r| r.id.is_some()));
    }

    #[rocket::async_test]
    async fn state_of_missing_survey() {
        let store = MemoryStore::default();
        assert!(!store.set_survey_state(Id::new(), SurveyState::Closed).await.unwrap());
    }

    #[rocket::async_test]
    async fn failing_writes() {
        let store = MemoryStore::default();
        let survey = Survey::example();
        store.insert(survey.clone()).await;
        store.fail_writes(true).await;
        assert!(store.set_survey_state(survey.id, SurveyState::Closed).await.is_err());
        assert!(store.insert_survey(&Survey::example()).await.is_err());
        // Reads still work.
        assert_eq!(store.get_survey(survey.id).await.unwrap(), Some(survey));
    }
}
