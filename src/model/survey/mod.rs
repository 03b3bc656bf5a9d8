use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::mongodb::Id;

pub mod answer;
pub mod compiler;
pub mod lifecycle;
pub mod password;
mod state;

pub use answer::{AnswerKind, InputType};
pub use state::{AdminAction, SurveyState};

/// A survey definition, as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Survey {
    #[serde(rename = "_id")]
    pub id: Id,
    pub creator_name: String,
    pub creator_email: String,
    pub admin_password_hash: String,
    pub state: SurveyState,
    pub title: String,
    /// Always equal to the number of question fragments in `html`.
    pub question_count: u32,
    /// The pre-rendered voting page.
    pub html: String,
    /// Mail every response to the creator.
    pub email_responses: bool,
    /// Never store responses; only mail them.
    pub discard_responses: bool,
}

impl Survey {
    pub fn is_open(&self) -> bool {
        self.state == SurveyState::Open
    }

    /// Fail unless the survey is accepting responses.
    pub fn ensure_open(&self) -> Result<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(Error::NotOpen)
        }
    }

    /// Fail unless `password` is this survey's admin password.
    pub fn authorize(&self, password: &str) -> Result<()> {
        if password::verify_password(&self.admin_password_hash, password) {
            Ok(())
        } else {
            Err(Error::Unauthorized)
        }
    }

    /// The public link to answer this survey.
    pub fn vote_link(&self, hostname: &str) -> String {
        format!("http://{hostname}/vote?id={}", self.id.encode())
    }

    /// The link to the admin page of this survey.
    pub fn admin_link(&self, hostname: &str) -> String {
        format!("http://{hostname}/admin?id={}", self.id.encode())
    }
}
