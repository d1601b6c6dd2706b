use thiserror::Error;

pub type Result<T> = std::result::Result<T, RouterError>;

#[derive(Error, Debug)]
pub enum RouterError {
    /// No registered route matches the descriptor
    #[error("no route matches `{0}`")]
    NotFound(String),

    /// A `:param` segment had no value supplied
    #[error("missing value for `:{param}` in `{pattern}`")]
    MissingParam { param: String, pattern: String },

    /// A route pattern was rejected by the matcher
    #[error("invalid route pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Two route definitions share a name
    #[error("duplicate route name `{0}`")]
    DuplicateName(String),
}
