use crate::error::Error;

/// ANSI bold, used for markdown headings on stderr.
const BOLD: &str = "\x1b[1m";
/// ANSI reset.
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and, where there is one,
/// how to fix it.
pub fn render_error(e: &Error) -> String {
    return match e {
        Error::CommandFailed { command, reason } => render_command_failed(command, reason),
        Error::CommandTimedOut { command, timeout_secs } => render_command_timed_out(command, *timeout_secs),
        Error::FileNotFound { path } => format!(
            "\
# Error: File Not Found

`{}` does not exist.
",
            path.display()
        ),
        Error::SuggestionsUnreadable { reason } => render_suggestions_unreadable(reason),
        Error::TomlDe(inner) => format!(
            "\
# Error: Invalid Config

`.blogport.toml` could not be read:

{inner}

## Fix

Run `blogport info` for the list of accepted keys.
"
        ),
        Error::WatcherFailed { reason } => format!(
            "\
# Error: Watcher Failed

{reason}
"
        ),
        Error::DiagramUnavailable | Error::Io(_) | Error::Json(_) | Error::RasterizerUnavailable => render_generic(e),
    };
}

/// Missing or failing collaborator program.
fn render_command_failed(command: &str, reason: &str) -> String {
    return format!(
        "\
# Error: Command Failed

`{command}` did not succeed: {reason}

## Fix

Install `{command}`, point `command` at another program in `.blogport.toml`,
or turn the collaborator off:

    [diagram]
    enabled = false
"
    );
}

/// Collaborator program ran past its timeout.
fn render_command_timed_out(command: &str, timeout_secs: u64) -> String {
    return format!(
        "\
# Error: Command Timed Out

`{command}` was stopped after {timeout_secs}s.

## Fix

Raise the limit in `.blogport.toml`:

    [diagram]
    timeout_secs = {}
",
        timeout_secs.saturating_mul(2)
    );
}

/// Fallback for variants without a dedicated explanation.
fn render_generic(e: &Error) -> String {
    return format!(
        "\
# Error

{e}
"
    );
}

/// The `--suggestions` file holds no usable JSON.
fn render_suggestions_unreadable(reason: &str) -> String {
    return format!(
        "\
# Error: Suggestions Unreadable

{reason}

## Expected

A JSON array, optionally inside a ```json fence or an object with a
`diagnoses` key:

    [{{\"issue\": \"...\", \"original\": \"...\", \"suggestion\": \"...\"}}]
"
    );
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn command_failure_names_the_program_and_fix() {
        let md = render_error(&Error::CommandFailed { command: "mmdc".to_string(), reason: "not found".to_string() });
        assert!(md.starts_with("# Error: Command Failed"));
        assert!(md.contains("Install `mmdc`"));
        assert!(md.contains("enabled = false"));
    }

    #[test]
    fn timeout_suggests_a_larger_limit() {
        let md = render_error(&Error::CommandTimedOut { command: "mmdc".to_string(), timeout_secs: 30 });
        assert!(md.contains("timeout_secs = 60"));
    }

    #[test]
    fn missing_file_shows_path() {
        let md = render_error(&Error::FileNotFound { path: PathBuf::from("posts/missing.md") });
        assert!(md.contains("`posts/missing.md` does not exist."));
    }

    #[test]
    fn suggestions_error_shows_expected_shape() {
        let md = render_error(&Error::SuggestionsUnreadable { reason: "empty input".to_string() });
        assert!(md.contains("[{\"issue\""));
    }
}
