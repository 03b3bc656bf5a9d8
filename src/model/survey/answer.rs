use std::fmt::{Display, Formatter};
use std::str::FromStr;

use thiserror::Error;

/// The widget a question is answered with.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AnswerKind {
    /// Pick exactly one of the options.
    Radio,
    /// Pick any number of the options.
    Checkbox,
    /// Free multi-line text.
    TextArea,
    /// A single-line `<input>` of the given type.
    Input(InputType),
}

/// The single-line `<input type="...">` widgets a question may use.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InputType {
    Text,
    Number,
    Email,
    Url,
    Tel,
    Date,
    Time,
    DateTimeLocal,
    Month,
    Week,
    Color,
    Range,
    Password,
}

impl InputType {
    pub const ALL: [InputType; 13] = [
        Self::Text,
        Self::Number,
        Self::Email,
        Self::Url,
        Self::Tel,
        Self::Date,
        Self::Time,
        Self::DateTimeLocal,
        Self::Month,
        Self::Week,
        Self::Color,
        Self::Range,
        Self::Password,
    ];

    /// The HTML `type` attribute value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Email => "email",
            Self::Url => "url",
            Self::Tel => "tel",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTimeLocal => "datetime-local",
            Self::Month => "month",
            Self::Week => "week",
            Self::Color => "color",
            Self::Range => "range",
            Self::Password => "password",
        }
    }
}

impl AnswerKind {
    /// Every kind, in the order offered on the creation form.
    pub fn all() -> impl Iterator<Item = AnswerKind> {
        [Self::Radio, Self::Checkbox, Self::TextArea]
            .into_iter()
            .chain(InputType::ALL.into_iter().map(Self::Input))
    }

    /// The token value naming this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
            Self::TextArea => "textarea",
            Self::Input(input) => input.as_str(),
        }
    }

    /// Whether the answer is picked from a list of options.
    pub fn is_choice(self) -> bool {
        matches!(self, Self::Radio | Self::Checkbox)
    }
}

impl Display for AnswerKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported answer type '{0}'")]
pub struct UnsupportedAnswerKind(pub String);

impl FromStr for AnswerKind {
    type Err = UnsupportedAnswerKind;

    /// An empty name means plain text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name.is_empty() {
            return Ok(Self::Input(InputType::Text));
        }
        Self::all()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| UnsupportedAnswerKind(s.to_string()))
    }
}
