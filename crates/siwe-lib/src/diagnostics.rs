//! Builder-pattern printer for parse errors.

use std::fmt::Write;
use std::ops::Range;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};

use crate::error::SiweError;

/// Renders a [`SiweError`] against the message it was found in.
pub struct ErrorPrinter<'e, 's> {
    error: &'e SiweError,
    source: Option<&'s str>,
    path: Option<&'s str>,
    colored: bool,
}

impl<'e, 's> ErrorPrinter<'e, 's> {
    pub fn new(error: &'e SiweError) -> Self {
        Self {
            error,
            source: None,
            path: None,
            colored: false,
        }
    }

    pub fn source(mut self, source: &'s str) -> Self {
        self.source = Some(source);
        self
    }

    pub fn path(mut self, path: &'s str) -> Self {
        self.path = Some(path);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let message = self.error.to_string();
        let (Some(source), Some(span)) = (self.source, self.error.span()) else {
            return write!(w, "error: {}", message);
        };

        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        let mut snippet = Snippet::source(source).line_start(1).annotation(
            AnnotationKind::Primary
                .span(adjust_range(span, source.len()))
                .label(label(self.error)),
        );
        if let Some(p) = self.path {
            snippet = snippet.path(p);
        }

        let report: Vec<Group> = vec![Level::ERROR.primary_title(&message).element(snippet)];
        write!(w, "{}", renderer.render(&report))
    }
}

fn label(error: &SiweError) -> &'static str {
    match error {
        SiweError::MissingLine { .. } => "expected here",
        SiweError::Syntax { .. } => "message structure ends here",
        SiweError::NotErc55 { .. } => "not ERC-55 checksummed",
        SiweError::NotANumber { .. } | SiweError::Infinity { .. } => "not a usable integer",
        _ => "rejected by the field grammar",
    }
}

/// Widen empty spans so the caret is visible; clamp to the source.
fn adjust_range(range: Range<usize>, limit: usize) -> Range<usize> {
    let start = range.start.min(limit);
    let end = range.end.min(limit);

    if start == end {
        return start..(start + 1).min(limit);
    }

    start..end
}

impl SiweError {
    pub fn printer(&self) -> ErrorPrinter<'_, '_> {
        ErrorPrinter::new(self)
    }
}
