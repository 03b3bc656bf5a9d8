use std::str::FromStr;

use mongodb::bson::{to_bson, Bson};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// States in the survey lifecycle.
///
/// There is no terminal state: a closed survey may be reopened at any time.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurveyState {
    /// Accepting responses from anyone with the link.
    Open,
    /// Rejecting all responses until reopened.
    Closed,
}

impl From<SurveyState> for Bson {
    fn from(state: SurveyState) -> Self {
        to_bson(&state).expect("Serialisation is infallible")
    }
}

/// Something the survey admin can ask for, once authenticated.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AdminAction {
    ViewResponses,
    SetState(SurveyState),
}

impl FromStr for AdminAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "viewresponses" => Ok(Self::ViewResponses),
            "opensurvey" => Ok(Self::SetState(SurveyState::Open)),
            "closesurvey" => Ok(Self::SetState(SurveyState::Closed)),
            other => Err(Error::BadRequest(format!("Invalid action '{other}'"))),
        }
    }
}
