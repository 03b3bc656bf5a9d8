//! Turns the tokens of a survey creation form into the markup of its voting
//! page.
//!
//! Questions are discovered by probing `question1`, `question2`, ... and stop
//! at the first missing or empty one; options of a choice question are
//! probed the same way through `q<i>o1`, `q<i>o2`, .... Anything after a gap
//! is silently ignored.

use std::fmt::Write;

use crate::error::{Error, Result};
use crate::model::{form::SurveyTokens, mongodb::Id};
use crate::render::{self, escape_html};

use super::answer::AnswerKind;

/// A single question, as parsed from the creation tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSpec {
    /// One-based position in the survey.
    pub index: u32,
    pub text: String,
    pub kind: AnswerKind,
    pub mandatory: bool,
    /// Only populated for choice questions.
    pub options: Vec<String>,
}

impl QuestionSpec {
    /// Read question `index` from the tokens, or `None` if it is absent.
    fn from_tokens(tokens: &SurveyTokens, index: u32) -> Result<Option<Self>> {
        let Some(text) = tokens.get(&format!("question{index}")) else {
            return Ok(None);
        };
        let kind = tokens
            .text(&format!("anstype{index}"))
            .parse::<AnswerKind>()
            .map_err(|err| Error::BadRequest(format!("Question {index}: {err}")))?;
        let options = if kind.is_choice() {
            (1..)
                .map_while(|option| tokens.get(&format!("q{index}o{option}")))
                .map(str::to_string)
                .collect()
        } else {
            Vec::new()
        };

        Ok(Some(Self {
            index,
            text: text.to_string(),
            kind,
            mandatory: tokens.flag(&format!("mandatory{index}")),
            options,
        }))
    }

    /// The answer field name the voting form submits for this question.
    pub fn field_name(&self) -> String {
        format!("question{}", self.index)
    }

    /// Render the markup fragment for this question.
    pub fn to_html(&self) -> Result<String> {
        let name = self.field_name();
        let required = if self.mandatory { " required" } else { "" };
        let mut html = String::new();

        writeln!(html, "<div class=\"question\">")?;
        write!(html, "  <p class=\"question-text\">{}) {}", self.index, escape_html(&self.text))?;
        if self.mandatory {
            write!(html, " *")?;
        }
        writeln!(html, "</p>")?;

        match self.kind {
            AnswerKind::Radio | AnswerKind::Checkbox => {
                for option in &self.options {
                    let option = escape_html(option);
                    write!(html, "  <label><input type=\"{}\" name=\"{name}\"", self.kind)?;
                    writeln!(html, " value=\"{option}\"{required}>{option}</label><br>")?;
                }
            }
            AnswerKind::TextArea => {
                writeln!(html, "  <textarea name=\"{name}\"{required}></textarea>")?;
            }
            AnswerKind::Input(input) => {
                writeln!(
                    html,
                    "  <input type=\"{}\" name=\"{name}\"{required}>",
                    input.as_str()
                )?;
            }
        }

        writeln!(html, "</div>")?;
        Ok(html)
    }
}

/// The output of compiling a survey: ordered question fragments and the full
/// voting page built from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledSurvey {
    pub title: String,
    pub description: String,
    pub questions: Vec<QuestionSpec>,
    /// One fragment per question, in question order.
    pub fragments: Vec<String>,
    /// The complete voting page.
    pub html: String,
}

impl CompiledSurvey {
    /// The canonical number of questions, used to replay question order
    /// when reading responses back.
    pub fn question_count(&self) -> u32 {
        self.fragments.len() as u32
    }
}

/// Read every question from the tokens, in order, up to the first gap.
pub fn parse_questions(tokens: &SurveyTokens) -> Result<Vec<QuestionSpec>> {
    let mut questions = Vec::new();
    for index in 1.. {
        match QuestionSpec::from_tokens(tokens, index)? {
            Some(question) => questions.push(question),
            None => break,
        }
    }
    Ok(questions)
}

/// Compile the creation tokens into the voting page of survey `id`.
///
/// Nothing is produced unless every question renders.
pub fn compile(id: Id, tokens: &SurveyTokens) -> Result<CompiledSurvey> {
    let title = tokens.text("survey_title").to_string();
    let description = tokens.text("survey_description").to_string();
    let questions = parse_questions(tokens)?;
    let fragments = questions
        .iter()
        .map(QuestionSpec::to_html)
        .collect::<Result<Vec<_>>>()?;
    let html = render::vote_page(id, &title, &description, &fragments)?;

    Ok(CompiledSurvey {
        title,
        description,
        questions,
        fragments,
        html,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::survey::answer::InputType;

    fn tokens(pairs: &[(&str, &str)]) -> SurveyTokens {
        pairs.iter().copied().collect()
    }

    fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    #[test]
    fn lunch_poll() {
        let id = Id::new();
        let compiled = compile(
            id,
            &tokens(&[
                ("survey_title", "Lunch Poll"),
                ("question1", "What should we order?"),
                ("anstype1", "checkbox"),
                ("q1o1", "Pizza"),
                ("q1o2", "Salad"),
            ]),
        )
        .unwrap();

        assert_eq!(compiled.title, "Lunch Poll");
        assert_eq!(compiled.question_count(), 1);
        let fragment = &compiled.fragments[0];
        assert_eq!(count(fragment, "<input type=\"checkbox\""), 2);
        let pizza = fragment
            .find("<input type=\"checkbox\" name=\"question1\" value=\"Pizza\">Pizza</label>")
            .unwrap();
        let salad = fragment
            .find("<input type=\"checkbox\" name=\"question1\" value=\"Salad\">Salad</label>")
            .unwrap();
        assert!(pizza < salad);
        assert!(!fragment.contains("required"));
        assert!(!fragment.contains('*'));

        // The page carries the title, the fragment and the survey id.
        assert!(compiled.html.contains("Lunch Poll"));
        assert!(compiled.html.contains(fragment.as_str()));
        assert!(compiled.html.contains(&format!("value=\"{}\"", id.encode())));
    }

    #[test]
    fn no_questions_is_a_valid_survey() {
        let compiled = compile(Id::new(), &tokens(&[("survey_title", "Empty")])).unwrap();
        assert_eq!(compiled.question_count(), 0);
        assert!(compiled.fragments.is_empty());
        assert!(compiled.html.contains("Empty"));
    }

    #[test]
    fn questions_are_emitted_in_order() {
        let compiled = compile(
            Id::new(),
            &tokens(&[
                ("question3", "Third"),
                ("question1", "First"),
                ("question2", "Second"),
                ("anstype2", "textarea"),
                ("anstype3", "date"),
            ]),
        )
        .unwrap();

        assert_eq!(compiled.question_count(), 3);
        assert!(compiled.fragments[0].contains("1) First"));
        assert!(compiled.fragments[1].contains("2) Second"));
        assert!(compiled.fragments[2].contains("3) Third"));
        let first = compiled.html.find("1) First").unwrap();
        let second = compiled.html.find("2) Second").unwrap();
        let third = compiled.html.find("3) Third").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn gap_stops_enumeration() {
        let questions = parse_questions(&tokens(&[
            ("question1", "First"),
            ("question2", ""),
            ("question3", "Orphaned"),
        ]))
        .unwrap();
        assert_eq!(questions.len(), 1);

        let questions = parse_questions(&tokens(&[
            ("question1", "Pick"),
            ("anstype1", "radio"),
            ("q1o1", "A"),
            ("q1o3", "C"),
        ]))
        .unwrap();
        assert_eq!(questions[0].options, ["A"]);
    }

    #[test]
    fn options_are_ignored_for_non_choice_questions() {
        let questions = parse_questions(&tokens(&[
            ("question1", "Comments"),
            ("anstype1", "textarea"),
            ("q1o1", "Stray"),
        ]))
        .unwrap();
        assert!(questions[0].options.is_empty());
        assert!(!questions[0].to_html().unwrap().contains("Stray"));
    }

    #[test]
    fn mandatory_flag() {
        let questions = parse_questions(&tokens(&[
            ("question1", "Pick one"),
            ("anstype1", "radio"),
            ("mandatory1", "on"),
            ("q1o1", "Yes"),
            ("q1o2", "No"),
            ("question2", "Why?"),
            ("anstype2", "textarea"),
            ("mandatory2", ""),
            ("question3", "Email"),
            ("anstype3", "email"),
            ("mandatory3", "yes"),
        ]))
        .unwrap();

        let radio = questions[0].to_html().unwrap();
        assert!(radio.contains("1) Pick one *</p>"));
        assert_eq!(count(&radio, " required>"), 2);

        let textarea = questions[1].to_html().unwrap();
        assert!(textarea.contains("2) Why?</p>"));
        assert!(textarea.contains("<textarea name=\"question2\"></textarea>"));

        let email = questions[2].to_html().unwrap();
        assert!(email.contains("3) Email *</p>"));
        assert!(email.contains("<input type=\"email\" name=\"question3\" required>"));
    }

    #[test]
    fn answer_kinds() {
        let questions = parse_questions(&tokens(&[
            ("question1", "Name"),
            ("question2", "Age"),
            ("anstype2", "number"),
            ("question3", "When"),
            ("anstype3", "datetime-local"),
        ]))
        .unwrap();
        assert_eq!(questions[0].kind, AnswerKind::Input(InputType::Text));
        assert_eq!(questions[1].kind, AnswerKind::Input(InputType::Number));
        assert!(questions[2]
            .to_html()
            .unwrap()
            .contains("<input type=\"datetime-local\" name=\"question3\">"));
    }

    #[test]
    fn unsupported_answer_kind_is_rejected() {
        let result = compile(
            Id::new(),
            &tokens(&[
                ("question1", "Fine"),
                ("question2", "Upload"),
                ("anstype2", "file"),
            ]),
        );
        match result {
            Err(Error::BadRequest(message)) => assert!(message.contains("Question 2")),
            other => panic!("expected a bad request, got {other:?}"),
        }
    }

    #[test]
    fn creator_text_is_escaped() {
        let compiled = compile(
            Id::new(),
            &tokens(&[
                ("survey_title", "<script>"),
                ("question1", "Tom & Jerry?"),
                ("anstype1", "radio"),
                ("q1o1", "\"quoted\""),
            ]),
        )
        .unwrap();
        assert!(!compiled.html.contains("<script>"));
        let fragment = &compiled.fragments[0];
        assert!(fragment.contains("Tom &amp; Jerry?"));
        assert!(fragment.contains("value=\"&quot;quoted&quot;\">&quot;quoted&quot;</label>"));
    }
}
