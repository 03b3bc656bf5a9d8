//! HTML pages served by the backend.
//!
//! Pages are assembled with `std::fmt::Write`, so any failure surfaces as
//! [`Error::Render`](crate::error::Error::Render). Every piece of
//! user-supplied text goes through [`escape_html`].

use std::fmt::Write;

use crate::error::Result;
use crate::model::{
    mongodb::Id,
    response::ResultsTable,
    survey::{AnswerKind, Survey},
};

/// Question slots offered by the creation form.
pub const CREATE_QUESTION_SLOTS: u32 = 10;
/// Option slots offered for each question on the creation form.
pub const CREATE_OPTION_SLOTS: u32 = 4;

/// Escape text for use in element content and quoted attribute values.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Wrap `body` in the common document chrome. `title` is escaped here.
pub fn page(title: &str, body: &str) -> Result<String> {
    let mut html = String::new();
    writeln!(html, "<!DOCTYPE html>")?;
    writeln!(html, "<html lang=\"en\">")?;
    writeln!(html, "<head>")?;
    writeln!(html, "  <meta charset=\"UTF-8\">")?;
    writeln!(
        html,
        "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">"
    )?;
    writeln!(html, "  <title>{}</title>", escape_html(title))?;
    writeln!(html, "  <link rel=\"stylesheet\" href=\"/resources/style.css\">")?;
    writeln!(html, "</head>")?;
    writeln!(html, "<body>")?;
    writeln!(
        html,
        "<nav><a href=\"/create\">Create a survey</a> | \
         <a href=\"/admin\">Admin</a> | <a href=\"/about\">About</a></nav>"
    )?;
    writeln!(html, "<main>")?;
    html.push_str(body);
    writeln!(html, "</main>")?;
    writeln!(html, "</body>")?;
    writeln!(html, "</html>")?;
    Ok(html)
}

/// A page showing a short plain-text message. Line breaks are kept.
pub fn message_page(title: &str, message: &str) -> Result<String> {
    let body = format!(
        "<h1>{}</h1>\n<p class=\"message\">{}</p>\n",
        escape_html(title),
        escape_html(message).replace('\n', "<br>\n")
    );
    page(title, &body)
}

/// The voting page of a survey, built from its compiled question fragments.
pub fn vote_page(id: Id, title: &str, description: &str, fragments: &[String]) -> Result<String> {
    let mut body = String::new();
    writeln!(body, "<h1>{}</h1>", escape_html(title))?;
    if !description.is_empty() {
        writeln!(body, "<p class=\"description\">{}</p>", escape_html(description))?;
    }
    writeln!(body, "<form action=\"/vote\" method=\"post\">")?;
    writeln!(body, "<input type=\"hidden\" name=\"id\" value=\"{}\">", id.encode())?;
    for fragment in fragments {
        body.push_str(fragment);
    }
    writeln!(body, "<button type=\"submit\">Submit</button>")?;
    writeln!(body, "</form>")?;
    page(title, &body)
}

/// The responses to a survey, one row per response.
pub fn results_page(table: &ResultsTable) -> Result<String> {
    let mut body = String::new();
    writeln!(body, "<h1>{}</h1>", escape_html(&table.title))?;
    writeln!(body, "<p>{} responses</p>", table.rows.len())?;
    writeln!(body, "<table class=\"results\">")?;
    write!(body, "<tr><th></th>")?;
    for index in 1..=table.question_count {
        write!(body, "<th>Q{index}</th>")?;
    }
    writeln!(body, "</tr>")?;
    for row in &table.rows {
        write!(body, "<tr><td>{})</td>", row.number)?;
        for answer in &row.answers {
            write!(body, "<td>{}</td>", escape_html(answer))?;
        }
        writeln!(body, "</tr>")?;
    }
    writeln!(body, "</table>")?;
    page(&format!("Responses: {}", table.title), &body)
}

/// The survey creation form.
pub fn create_page() -> Result<String> {
    let mut body = String::new();
    writeln!(body, "<h1>Create a survey</h1>")?;
    writeln!(body, "<form action=\"/create\" method=\"post\">")?;
    writeln!(body, "<fieldset>")?;
    writeln!(
        body,
        "  <label>Title <input type=\"text\" name=\"survey_title\" required></label><br>"
    )?;
    writeln!(
        body,
        "  <label>Description <textarea name=\"survey_description\"></textarea></label><br>"
    )?;
    writeln!(
        body,
        "  <label>Your name <input type=\"text\" name=\"survey_creator_name\"></label><br>"
    )?;
    writeln!(
        body,
        "  <label>Your email <input type=\"email\" name=\"survey_creator_email\"></label><br>"
    )?;
    writeln!(
        body,
        "  <label>Admin password \
         <input type=\"password\" name=\"survey_admin_password\" required></label><br>"
    )?;
    writeln!(
        body,
        "  <label><input type=\"checkbox\" name=\"survey_email_responses\"> \
         Email me every response</label><br>"
    )?;
    writeln!(
        body,
        "  <label><input type=\"checkbox\" name=\"survey_donotsave_responses\"> \
         Do not save responses, only email them</label>"
    )?;
    writeln!(body, "</fieldset>")?;

    for index in 1..=CREATE_QUESTION_SLOTS {
        writeln!(body, "<fieldset class=\"question-slot\">")?;
        writeln!(body, "  <legend>Question {index}</legend>")?;
        writeln!(body, "  <input type=\"text\" name=\"question{index}\">")?;
        writeln!(body, "  <select name=\"anstype{index}\">")?;
        for kind in AnswerKind::all() {
            writeln!(body, "    <option value=\"{kind}\">{kind}</option>")?;
        }
        writeln!(body, "  </select>")?;
        writeln!(
            body,
            "  <label><input type=\"checkbox\" name=\"mandatory{index}\"> Mandatory</label><br>"
        )?;
        for option in 1..=CREATE_OPTION_SLOTS {
            writeln!(
                body,
                "  <input type=\"text\" name=\"q{index}o{option}\" placeholder=\"Option {option}\">"
            )?;
        }
        writeln!(body, "</fieldset>")?;
    }

    writeln!(body, "<p>Questions and options end at the first blank one.</p>")?;
    writeln!(body, "<button type=\"submit\">Create</button>")?;
    writeln!(body, "</form>")?;
    page("Create a survey", &body)
}

/// Shown once a survey has been created.
pub fn survey_created_page(survey: &Survey, hostname: &str) -> Result<String> {
    let vote = escape_html(&survey.vote_link(hostname));
    let admin = escape_html(&survey.admin_link(hostname));
    let mut body = String::new();
    writeln!(body, "<h1>Survey created</h1>")?;
    writeln!(
        body,
        "<p>Your survey <strong>{}</strong> is open. Share this link with anyone:</p>",
        escape_html(&survey.title)
    )?;
    writeln!(body, "<p><a href=\"{vote}\">{vote}</a></p>")?;
    writeln!(body, "<p>See the responses or close the survey here:</p>")?;
    writeln!(body, "<p><a href=\"{admin}\">{admin}</a></p>")?;
    page("Survey created", &body)
}

/// The admin form, optionally pre-filled with a survey id.
pub fn admin_page(id: Option<&str>) -> Result<String> {
    let id = escape_html(id.unwrap_or_default());
    let mut body = String::new();
    writeln!(body, "<h1>Survey admin</h1>")?;
    writeln!(body, "<form action=\"/admin\" method=\"post\">")?;
    writeln!(
        body,
        "  <label>Survey id <input type=\"text\" name=\"id\" value=\"{id}\" required></label><br>"
    )?;
    writeln!(
        body,
        "  <label>Admin password \
         <input type=\"password\" name=\"admin_password\" required></label><br>"
    )?;
    writeln!(body, "  <select name=\"admin_action\">")?;
    writeln!(body, "    <option value=\"viewresponses\">View responses</option>")?;
    writeln!(body, "    <option value=\"opensurvey\">Open survey</option>")?;
    writeln!(body, "    <option value=\"closesurvey\">Close survey</option>")?;
    writeln!(body, "  </select>")?;
    writeln!(body, "  <button type=\"submit\">Go</button>")?;
    writeln!(body, "</form>")?;
    page("Survey admin", &body)
}

pub fn about_page() -> Result<String> {
    let body = "<h1>About</h1>\n\
        <p>Create a short survey, share its link, and read the answers when you are done.</p>\n\
        <p>Responses are anonymous. Only the address they were sent from is kept.\n\
        Anyone with the admin password can view the responses, \
        and close or reopen the survey.</p>\n";
    page("About", body)
}
