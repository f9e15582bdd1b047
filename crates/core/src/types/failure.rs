use std::borrow::Cow;
use std::fmt;

/// Boxed error returned by a fallible cleanup callback
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Why a cleanup callback failed
#[derive(Debug)]
pub enum FailureCause {
    /// The callback returned an error
    Error(BoxError),
    /// The callback panicked; holds the rendered panic payload
    Panic(String),
}

/// One failed callback from a cleanup pass
#[derive(Debug)]
pub struct CleanupFailure {
    /// Position of the callback in registration order within its session
    pub index: usize,
    /// Label given at registration, if any
    pub label: Option<Cow<'static, str>>,
    pub cause: FailureCause,
}

impl CleanupFailure {
    pub fn new(index: usize, label: Option<Cow<'static, str>>, cause: FailureCause) -> Self {
        Self {
            index,
            label,
            cause,
        }
    }

    pub fn is_panic(&self) -> bool {
        matches!(self.cause, FailureCause::Panic(_))
    }

    /// Label if one was given, otherwise `#index`
    pub fn name(&self) -> Cow<'_, str> {
        match &self.label {
            Some(label) => Cow::Borrowed(label.as_ref()),
            None => Cow::Owned(format!("#{}", self.index)),
        }
    }
}

impl fmt::Display for CleanupFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cause {
            FailureCause::Error(err) => write!(f, "cleanup {} failed: {}", self.name(), err),
            FailureCause::Panic(message) => {
                write!(f, "cleanup {} panicked: {}", self.name(), message)
            }
        }
    }
}

impl std::error::Error for CleanupFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.cause {
            FailureCause::Error(err) => Some(err.as_ref()),
            FailureCause::Panic(_) => None,
        }
    }
}
