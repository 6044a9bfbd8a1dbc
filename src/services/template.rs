//! Message template rendering.
//!
//! Templates are plain text with six literal placeholders. Substitution is a
//! single left-to-right scan: replacement text is copied to the output and is
//! never scanned again, so a culprit literally named `${result}` comes out as
//! `${result}`.

use crate::models::BuildOutcome;

/// A recognized template token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    User,
    Result,
    Project,
    Number,
    Url,
    ChangeSet,
}

impl Placeholder {
    pub const ALL: [Placeholder; 6] = [
        Placeholder::User,
        Placeholder::Result,
        Placeholder::Project,
        Placeholder::Number,
        Placeholder::Url,
        Placeholder::ChangeSet,
    ];

    /// The literal text matched in a template (case-sensitive)
    pub fn token(&self) -> &'static str {
        match self {
            Placeholder::User => "${user}",
            Placeholder::Result => "${result}",
            Placeholder::Project => "${project}",
            Placeholder::Number => "${number}",
            Placeholder::Url => "${url}",
            Placeholder::ChangeSet => "${changeSet}",
        }
    }

    fn match_prefix(text: &str) -> Option<Placeholder> {
        Self::ALL.into_iter().find(|p| text.starts_with(p.token()))
    }
}

/// Values substituted for each placeholder of one build
struct Replacements {
    user: String,
    result: String,
    project: String,
    number: String,
    url: String,
    change_set: String,
}

impl Replacements {
    fn new(outcome: &BuildOutcome, host_base_url: &str) -> Self {
        Self {
            user: culprit_names(outcome),
            result: outcome.result.to_string(),
            project: outcome.project_name.clone(),
            number: outcome.build_number.to_string(),
            url: format!("{}{}", host_base_url, outcome.build_url),
            change_set: change_set(outcome),
        }
    }

    fn get(&self, placeholder: Placeholder) -> &str {
        match placeholder {
            Placeholder::User => &self.user,
            Placeholder::Result => &self.result,
            Placeholder::Project => &self.project,
            Placeholder::Number => &self.number,
            Placeholder::Url => &self.url,
            Placeholder::ChangeSet => &self.change_set,
        }
    }
}

/// Culprit full names, each followed by a single space.
///
/// The trailing space is kept so existing templates keep rendering the same.
pub fn culprit_names(outcome: &BuildOutcome) -> String {
    outcome
        .culprits
        .iter()
        .map(|culprit| format!("{} ", culprit.full_name))
        .collect()
}

/// One `"<author> : <message>\n"` line per change entry
pub fn change_set(outcome: &BuildOutcome) -> String {
    outcome
        .change_entries
        .iter()
        .map(|entry| format!("{} : {}\n", entry.author, entry.message))
        .collect()
}

/// Render `template` for a finished build.
///
/// `host_base_url` is the CI host's root URL; `${url}` is that value with the
/// build's relative path appended as-is. Text that is not one of the six
/// placeholders is copied unchanged.
pub fn render(template: &str, outcome: &BuildOutcome, host_base_url: &str) -> String {
    let replacements = Replacements::new(outcome, host_base_url);
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("${") {
        rendered.push_str(&rest[..start]);
        let candidate = &rest[start..];

        match Placeholder::match_prefix(candidate) {
            Some(placeholder) => {
                rendered.push_str(replacements.get(placeholder));
                rest = &candidate[placeholder.token().len()..];
            }
            None => {
                rendered.push_str("${");
                rest = &candidate[2..];
            }
        }
    }

    rendered.push_str(rest);
    rendered
}
