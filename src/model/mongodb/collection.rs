use std::ops::Deref;

use log::debug;
use mongodb::{bson::doc, error::Error as DbError, Collection, Database, IndexModel};

use crate::model::{response::ResponseRecord, survey::Survey};

/// A type that can be directly inserted/read to/from the database.
pub trait MongoCollection {
    /// The name of the collection.
    const NAME: &'static str;
}

/// A database collection of the given type.
pub struct Coll<T>(Collection<T>);

impl<T> Coll<T>
where
    T: MongoCollection,
{
    /// Get a handle on this collection in the given database.
    pub fn from_db(db: &Database) -> Self {
        Self(db.collection(T::NAME))
    }
}

// `Derive(Clone)` would only derive if `T: Clone`, but we don't need that bound.
impl<T> Clone for Coll<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Deref for Coll<T> {
    type Target = Collection<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

// Survey definitions.
const QUESTIONS: &str = "questions";
impl MongoCollection for Survey {
    const NAME: &'static str = QUESTIONS;
}

// Survey responses.
const RESPONSES: &str = "responses";
impl MongoCollection for ResponseRecord {
    const NAME: &'static str = RESPONSES;
}

/// Ensure that all the required indexes exist on the given database.
///
/// This operation is idempotent.
pub async fn ensure_indexes_exist(db: &Database) -> Result<(), DbError> {
    debug!("Ensuring collection indexes exist");

    // Responses are only ever looked up by their survey.
    let response_index = IndexModel::builder()
        .keys(doc! {"survey_id": 1})
        .build();
    Coll::<ResponseRecord>::from_db(db)
        .create_index(response_index, None)
        .await?;

    Ok(())
}
