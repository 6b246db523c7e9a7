//! Colored terminal output utilities.

use console::{Style, Term};

/// How a status line is styled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tone {
    Plain,
    Success,
    Warning,
    Error,
    Heading,
    Muted,
}

impl Tone {
    fn style(self) -> Option<Style> {
        match self {
            Self::Plain => None,
            Self::Success => Some(Style::new().green()),
            Self::Warning => Some(Style::new().yellow()),
            Self::Error => Some(Style::new().red()),
            Self::Heading => Some(Style::new().cyan().bold()),
            Self::Muted => Some(Style::new().dim()),
        }
    }
}

/// Terminal output for the `book` commands.
///
/// Status lines go to stderr so that `show` and `render` results on stdout
/// stay pipeable.
pub(crate) struct Output {
    status: Term,
    results: Term,
}

impl Output {
    pub(crate) fn new() -> Self {
        Self {
            status: Term::stderr(),
            results: Term::stdout(),
        }
    }

    /// Write one status line; terminal write failures are ignored.
    fn line(&self, tone: Tone, msg: &str) {
        let _ = match tone.style() {
            Some(style) => self.status.write_line(&style.apply_to(msg).to_string()),
            None => self.status.write_line(msg),
        };
    }

    pub(crate) fn info(&self, msg: &str) {
        self.line(Tone::Plain, msg);
    }

    pub(crate) fn success(&self, msg: &str) {
        self.line(Tone::Success, msg);
    }

    pub(crate) fn warning(&self, msg: &str) {
        self.line(Tone::Warning, msg);
    }

    pub(crate) fn error(&self, msg: &str) {
        self.line(Tone::Error, msg);
    }

    /// Section heading (cyan bold).
    pub(crate) fn highlight(&self, msg: &str) {
        self.line(Tone::Heading, msg);
    }

    /// Secondary detail such as edit links.
    pub(crate) fn muted(&self, msg: &str) {
        self.line(Tone::Muted, msg);
    }

    /// Write a command result to stdout.
    pub(crate) fn data(&self, text: &str) -> std::io::Result<()> {
        self.results.write_str(text)
    }
}
