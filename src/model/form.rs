//! Raw HTML form submissions.
//!
//! The survey forms have a variable number of dynamically named fields
//! (`question1`, `q1o2`, ...), so instead of a fixed `FromForm` struct every
//! submitted field is collected as-is, in arrival order.

use std::collections::HashMap;

use rocket::form::{self, DataField, FromForm, Options, ValueField};

/// Every (name, value) pair of a submitted form, in the order received.
/// Names may repeat, e.g. for checkbox answers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    fields: Vec<(String, String)>,
}

impl FormFields {
    /// The first value submitted under `name`, if any.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(n, v)| (n.into(), v.into()))
                .collect(),
        }
    }
}

#[rocket::async_trait]
impl<'r> FromForm<'r> for FormFields {
    type Context = Vec<(String, String)>;

    fn init(_opts: Options) -> Self::Context {
        Vec::new()
    }

    fn push_value(ctxt: &mut Self::Context, field: ValueField<'r>) {
        ctxt.push((
            field.name.source().as_str().to_string(),
            field.value.to_string(),
        ));
    }

    async fn push_data(_ctxt: &mut Self::Context, field: DataField<'r, '_>) {
        // None of our forms upload files.
        log::debug!(
            "Ignoring uploaded form field '{}'",
            field.name.source().as_str()
        );
    }

    fn finalize(ctxt: Self::Context) -> form::Result<'r, Self> {
        Ok(Self { fields: ctxt })
    }
}

/// Single-valued view of a form, as used when creating a survey.
///
/// Only the first value of each name is kept, and empty values are treated as
/// absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurveyTokens(HashMap<String, String>);

impl SurveyTokens {
    /// The non-empty value of the given token.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// The value of the given token, or the empty string.
    pub fn text(&self, name: &str) -> &str {
        self.get(name).unwrap_or_default()
    }

    /// Whether the given token was submitted with a non-empty value.
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

impl From<FormFields> for SurveyTokens {
    fn from(fields: FormFields) -> Self {
        let mut tokens = HashMap::new();
        for (name, value) in fields.fields {
            tokens.entry(name).or_insert(value);
        }
        Self(tokens)
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for SurveyTokens {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        iter.into_iter().collect::<FormFields>().into()
    }
}
