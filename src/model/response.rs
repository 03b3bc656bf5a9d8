use std::collections::HashMap;

use chrono::{DateTime, Utc};
use log::debug;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::model::{form::FormFields, mongodb::Id, survey::Survey};

/// The answer field name of question `index`.
pub fn question_key(index: u32) -> String {
    format!("question{index}")
}

/// The question index named by an answer field, if it is one.
///
/// Only the canonical spelling is accepted, so `question01` is not question 1.
pub fn question_index(key: &str) -> Option<u32> {
    let digits = key.strip_prefix("question")?;
    let index = digits.parse::<u32>().ok()?;
    (index.to_string() == digits).then_some(index)
}

/// One voter's answers to one survey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    pub survey_id: Id,
    /// Answer field name to submitted values. Checkbox answers have several.
    pub responses: HashMap<String, Vec<String>>,
    /// The submitting client.
    pub host: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub time: DateTime<Utc>,
}

impl ResponseRecord {
    /// Collect the answers to `survey` from a submitted voting form.
    ///
    /// Only `question1` to `question<N>` are kept, where `N` is the survey's
    /// question count; in particular the `id` field is dropped.
    pub fn from_fields(survey: &Survey, fields: &FormFields, host: String) -> Self {
        let mut responses: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in fields.iter() {
            match question_index(name) {
                Some(index) if (1..=survey.question_count).contains(&index) => {
                    responses
                        .entry(name.to_string())
                        .or_default()
                        .push(value.to_string());
                }
                _ if name == "id" => {}
                _ => debug!("Dropping unknown answer field '{name}' for survey {}", survey.id),
            }
        }

        Self {
            id: None,
            survey_id: survey.id,
            responses,
            host,
            time: Utc::now(),
        }
    }

    /// The answers to each of the first `question_count` questions, in
    /// question order. Unanswered questions yield an empty slice.
    pub fn ordered_answers(&self, question_count: u32) -> Vec<&[String]> {
        (1..=question_count)
            .map(|index| {
                self.responses
                    .get(&question_key(index))
                    .map(Vec::as_slice)
                    .unwrap_or_default()
            })
            .collect()
    }
}

/// One row of the results table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    /// One-based arrival position.
    pub number: usize,
    /// One cell per question, in question order; multiple values are joined
    /// by a space.
    pub answers: Vec<String>,
}

/// Every stored response to a survey, aligned to its questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsTable {
    pub title: String,
    pub question_count: u32,
    pub rows: Vec<ResultRow>,
}

impl ResultsTable {
    /// Project each record onto the survey's questions, keeping the order in
    /// which the records are given.
    pub fn build(survey: &Survey, records: &[ResponseRecord]) -> Self {
        let rows = records
            .iter()
            .enumerate()
            .map(|(position, record)| ResultRow {
                number: position + 1,
                answers: record
                    .ordered_answers(survey.question_count)
                    .into_iter()
                    .map(|values| values.join(" "))
                    .collect(),
            })
            .collect();

        Self {
            title: survey.title.clone(),
            question_count: survey.question_count,
            rows,
        }
    }
}

/// Example data for tests.
#[cfg(test)]
pub(crate) mod examples {
    use super::*;

    impl ResponseRecord {
        /// A response to `survey` with the given answers.
        pub fn example(survey: &Survey, answers: &[(&str, &[&str])]) -> Self {
            Self {
                id: None,
                survey_id: survey.id,
                responses: answers
                    .iter()
                    .map(|(key, values)| {
                        (key.to_string(), values.iter().map(|v| v.to_string()).collect())
                    })
                    .collect(),
                host: "127.0.0.1".to_string(),
                time: Utc::now(),
            }
        }
    }
}
