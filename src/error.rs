use thiserror::Error;

/// Errors raised while turning raw template text into a parsed structure.
/// All of them fire before any SQL string is assembled.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// `#` followed by a word that is not `if` / `elif` / `else` / `endif`,
    /// or a directive with malformed trailing text.
    #[error("line {line}: {message}")]
    DirectiveSyntax { line: usize, message: String },

    /// Unmatched or misordered `#if` / `#elif` / `#else` / `#endif`.
    #[error("line {line}: {message}")]
    Structure { line: usize, message: String },

    /// Condition text failed the whitelist grammar.
    #[error("line {line}: condition rejected: {message}")]
    ConditionSyntax { line: usize, message: String },
}

impl ParseError {
    pub(crate) fn directive(line: usize, message: impl Into<String>) -> Self {
        ParseError::DirectiveSyntax {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn structure(line: usize, message: impl Into<String>) -> Self {
        ParseError::Structure {
            line,
            message: message.into(),
        }
    }
}

/// Errors raised while evaluating a compiled condition against a parameter
/// mapping. Bare-identifier truthiness never fails; comparisons do.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvalError {
    #[error("parameter `{0}` is not bound but is used in a comparison")]
    UnboundParameter(String),

    #[error("parameter `{name}` of type {type_name} cannot be ordered in a comparison")]
    NotComparable {
        name: String,
        type_name: &'static str,
    },

    #[error("cannot compare a {lhs} with a {rhs}")]
    TypeMismatch {
        lhs: &'static str,
        rhs: &'static str,
    },

    #[error("number literal `{0}` is not representable")]
    BadNumber(String),
}

/// Unified error for a single render call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("unknown template `{0}`")]
    UnknownTemplate(String),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Errors raised while constructing or validating a template registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("duplicated template name `{0}`")]
    DuplicateName(String),

    #[error("template `{name}` is invalid: {source}")]
    Invalid {
        name: String,
        #[source]
        source: ParseError,
    },

    #[error("failed to load template table: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Opaque driver failure. The core never interprets or retries these; it
/// only aborts the surrounding transaction scope.
#[derive(Debug, Error)]
#[error("execution failed: {0}")]
pub struct ExecutionError(pub String);

/// Top-level error for the client facade.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}
