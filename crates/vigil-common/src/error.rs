/// Errors raised by the transform engine and the trigger evaluator.
///
/// Every error is synchronous and local: components never catch and
/// suppress an error raised by a component they call, so whatever a
/// transform stage returns reaches the caller of the chain unchanged.
///
/// # Examples
///
/// ```rust
/// use vigil_common::error::EngineError;
///
/// let err = EngineError::InvalidConstant {
///     function: "SCALE".to_string(),
///     constant: "abc".to_string(),
/// };
/// assert!(err.to_string().contains("abc"));
/// ```
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// Malformed or missing required input: empty metric lists, wrong
    /// constant arity, a missing limit.
    #[error("Engine: invalid argument: {0}")]
    InvalidArgument(String),

    /// A string constant handed to a named function is not a numeric literal.
    #[error("Engine: illegal constant '{constant}' supplied to {function}")]
    InvalidConstant { function: String, constant: String },

    /// A string could not be parsed as an exact-integer or floating literal.
    #[error("Engine: cannot parse '{0}' as a number")]
    Parse(String),

    /// A function was invoked in a mode it does not support.
    #[error("Engine: unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// The transform registry has no function under this name.
    #[error("Engine: unknown function '{0}'")]
    UnknownFunction(String),

    /// A trigger kind string that matches none of the supported kinds.
    #[error("Engine: unknown trigger type '{0}'")]
    UnknownTriggerType(String),
}

impl EngineError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedOperation(message.into())
    }

    pub fn invalid_constant(function: impl Into<String>, constant: impl Into<String>) -> Self {
        Self::InvalidConstant {
            function: function.into(),
            constant: constant.into(),
        }
    }
}

/// Convenience `Result` alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
