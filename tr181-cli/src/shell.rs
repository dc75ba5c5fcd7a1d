//! Line editor support for the interactive shell
//!
//! [`LookupPrompt`] shows which model is open and how much of it the current search shows.
//! [`CommandCompleter`] completes shell commands and their arguments from the [`Cli`] definition.
use std::{borrow::Cow, ffi::OsString, path::Path};

use clap::CommandFactory;
use reedline::{PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus, Span, Suggestion};
use tr181_common::{session::Session, AccessFilter};

use crate::command::Cli;

/// Prompt rendered from a snapshot of the session state
///
/// ```text
/// device.xml [Aa rw]>                                        12/840
/// ```
///
/// `Aa` marks a case sensitive search and `aa` a folded one. The access filter follows when one is
/// active.
#[derive(Debug)]
pub struct LookupPrompt {
    model: String,
    shown: usize,
    total: usize,
    case_sensitive: bool,
    access: AccessFilter,
}

impl LookupPrompt {
    /// Capture the prompt state for the next line read
    pub fn new(session: &Session) -> Self {
        let model = match session.model() {
            Some(m) => Path::new(m.source())
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| m.source().to_owned()),
            None => "no model".to_owned(),
        };
        let query = session.query();
        Self {
            model,
            shown: session.result_count(),
            total: session.total_count(),
            case_sensitive: query.case_sensitive(),
            access: query.access_filter(),
        }
    }

    fn search_mode(&self) -> String {
        let case = if self.case_sensitive { "Aa" } else { "aa" };
        match self.access {
            AccessFilter::Any => case.to_owned(),
            AccessFilter::ReadOnlyOnly => format!("{case} ro"),
            AccessFilter::ReadWriteOnly => format!("{case} rw"),
        }
    }
}

impl reedline::Prompt for LookupPrompt {
    fn render_prompt_left(&self) -> Cow<str> {
        Cow::Borrowed(self.model.as_str())
    }

    fn render_prompt_right(&self) -> Cow<str> {
        format!("{}/{}", self.shown, self.total).into()
    }

    fn render_prompt_indicator(&self, _edit_mode: PromptEditMode) -> Cow<str> {
        format!(" [{}]> ", self.search_mode()).into()
    }

    // Commands are single line
    fn render_prompt_multiline_indicator(&self) -> Cow<str> {
        Cow::Borrowed("| ")
    }

    fn render_prompt_history_search_indicator(&self, search: PromptHistorySearch) -> Cow<str> {
        let label = match search.status {
            PromptHistorySearchStatus::Passing => "history",
            PromptHistorySearchStatus::Failing => "no history match",
        };
        format!("[{label}: {}] ", search.term).into()
    }
}

/// Tab completion for shell commands
#[derive(Clone, Copy, Debug, Default)]
pub struct CommandCompleter;

impl CommandCompleter {
    /// Every shell command, with its help text
    fn commands(span: Span) -> Vec<Suggestion> {
        Cli::command()
            .get_subcommands()
            .map(|sub| Suggestion {
                value: sub.get_name().to_owned(),
                description: sub.get_about().map(|about| about.to_string()),
                span,
                append_whitespace: true,
                ..Default::default()
            })
            .collect()
    }
}

impl reedline::Completer for CommandCompleter {
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        let line = &line[..pos.min(line.len())];
        if line.trim().is_empty() {
            return Self::commands(Span::new(pos, pos));
        }

        // clap expects a binary name first, and an empty word when the cursor starts a new one
        let mut words: Vec<OsString> = std::iter::once(OsString::new())
            .chain(shlex::Shlex::new(line).map(OsString::from))
            .collect();
        if line.ends_with(char::is_whitespace) {
            words.push(OsString::new());
        }
        let current = words.len() - 1;
        let span = Span::new(pos.saturating_sub(words[current].len()), pos);

        let cwd = std::env::current_dir().ok();
        let mut cmd = Cli::command();
        match clap_complete::engine::complete(&mut cmd, words, current, cwd.as_deref()) {
            Ok(candidates) => candidates
                .into_iter()
                .map(|c| Suggestion {
                    value: c.get_value().to_string_lossy().into_owned(),
                    description: c.get_help().map(|help| help.to_string()),
                    span,
                    ..Default::default()
                })
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reedline::{Completer, Prompt};
    use tr181_common::{DataModel, Query};

    const XML: &str = r#"<document>
        <object name="Device.WiFi.">
            <parameter name="RadioNumberOfEntries" access="readOnly"/>
            <parameter name="Enable" access="readWrite"/>
        </object>
    </document>"#;

    #[test]
    fn test_prompt_tracks_session() {
        let mut session = Session::new(Query::new(""));
        let prompt = LookupPrompt::new(&session);
        assert_eq!(prompt.render_prompt_left(), "no model");
        assert_eq!(prompt.render_prompt_right(), "0/0");
        assert_eq!(
            prompt.render_prompt_indicator(PromptEditMode::Default),
            " [aa]> "
        );

        session.set_model(DataModel::load_from_str(XML).unwrap());
        session.set_text("Radio");
        session.set_case_sensitive(true);
        session.set_access_filter(AccessFilter::ReadOnlyOnly);
        let prompt = LookupPrompt::new(&session);
        assert_eq!(prompt.render_prompt_left(), "<string>");
        assert_eq!(prompt.render_prompt_right(), "1/2");
        assert_eq!(
            prompt.render_prompt_indicator(PromptEditMode::Default),
            " [Aa ro]> "
        );
    }

    #[test]
    fn test_complete_empty_line_lists_commands() {
        let suggestions = CommandCompleter.complete("", 0);
        let names: Vec<&str> = suggestions.iter().map(|s| s.value.as_str()).collect();
        for name in ["open", "find", "case", "access", "select", "copy", "exit"] {
            assert!(names.contains(&name), "missing {name} in {names:?}");
        }
        assert!(suggestions.iter().all(|s| s.span == Span::new(0, 0)));
    }

    #[test]
    fn test_complete_partial_command() {
        let suggestions = CommandCompleter.complete("acc", 3);
        assert!(suggestions.iter().any(|s| s.value == "access"));
        assert!(suggestions.iter().all(|s| s.span == Span::new(0, 3)));
    }

    #[test]
    fn test_complete_access_kind() {
        let suggestions = CommandCompleter.complete("access read-", 12);
        let values: Vec<&str> = suggestions.iter().map(|s| s.value.as_str()).collect();
        assert!(values.contains(&"read-only"), "{values:?}");
        assert!(values.contains(&"read-write"), "{values:?}");
        assert!(suggestions.iter().all(|s| s.span == Span::new(7, 12)));
    }
}
