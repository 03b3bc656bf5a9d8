use std::fmt::{Display, Formatter};
use std::ops::Deref;

use data_encoding::{HEXLOWER, HEXLOWER_PERMISSIVE};
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A unique document ID. Exposed to the outside world as lowercase hex.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Id(ObjectId);

impl Id {
    /// Generate a fresh ID.
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    /// Decode an externally supplied hex ID.
    ///
    /// Anything that is not exactly twelve hex-encoded bytes is rejected.
    pub fn decode(hex: &str) -> Result<Self> {
        let bytes = HEXLOWER_PERMISSIVE
            .decode(hex.trim().as_bytes())
            .map_err(|_| Error::InvalidSurveyId(hex.to_string()))?;
        let bytes: [u8; 12] = bytes
            .try_into()
            .map_err(|_| Error::InvalidSurveyId(hex.to_string()))?;
        Ok(Self(ObjectId::from_bytes(bytes)))
    }

    /// Encode as lowercase hex, suitable for URLs.
    pub fn encode(&self) -> String {
        HEXLOWER.encode(&self.0.bytes())
    }

    /// A filter document matching this ID.
    pub fn as_doc(&self) -> Document {
        doc! { "_id": self.0 }
    }
}

impl Default for Id {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for Id {
    type Target = ObjectId;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<ObjectId> for Id {
    fn from(id: ObjectId) -> Self {
        Self(id)
    }
}

impl From<Id> for Bson {
    fn from(id: Id) -> Self {
        Bson::ObjectId(id.0)
    }
}

impl Display for Id {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.encode())
    }
}
