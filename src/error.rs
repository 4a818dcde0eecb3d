use std::fmt;

use thiserror::Error;

/// The grammar could not match the requested entry rule against the whole input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct SyntaxFailure {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
    pub rule_stack: Vec<String>,
    pub expected: Vec<String>,
}

impl fmt::Display for SyntaxFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "syntax failure at line {}, column {}: expected {}",
            self.line,
            self.column,
            if self.expected.is_empty() {
                "more input".to_string()
            } else {
                self.expected.join(" or ")
            }
        )?;
        if !self.rule_stack.is_empty() {
            write!(f, " (while parsing {})", self.rule_stack.join(" > "))?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("identifier {id} is used twice within one document scope")]
    DuplicateIdentifier { id: String },

    #[error("{node} is missing its {field}")]
    MissingField {
        node: &'static str,
        field: &'static str,
    },

    #[error("failed to write markup")]
    Write(#[from] std::io::Error),

    #[error("rendered markup is not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Syntax(#[from] SyntaxFailure),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("failed to compile {name} pattern")]
    Pattern {
        name: &'static str,
        #[source]
        source: regex::Error,
    },
}
