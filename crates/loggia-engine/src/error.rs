use std::borrow::Cow;

/// A specialized [`Result`](std::result::Result) for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// All error kinds an engine operation may produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A device or room does not exist in the registry.
    NotFound,
    /// A state patch does not fit the state of the device it targets.
    State,
    /// The underlying store could not be read or written.
    ///
    /// This is the only class that is fatal to a turn. No partial state is
    /// left committed when it occurs.
    Persistence,
    /// A session transport operation failed.
    Session,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => "not found",
            Self::State => "state",
            Self::Persistence => "persistence",
            Self::Session => "session",
        }
        .fmt(f)
    }
}

/// An engine error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    info: Cow<'static, str>,
}

impl Error {
    /// Creates an [`Error`] from an [`ErrorKind`] and a description.
    #[must_use]
    #[inline]
    pub fn new(kind: ErrorKind, info: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            info: info.into(),
        }
    }

    /// Returns the [`ErrorKind`].
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error description.
    #[must_use]
    pub fn info(&self) -> &str {
        &self.info
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.info)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind};

    #[test]
    fn test_error() {
        let error = Error::new(ErrorKind::NotFound, "No device with identifier `7`.");

        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert_eq!(error.info(), "No device with identifier `7`.");
        assert_eq!(
            error.to_string(),
            "not found: No device with identifier `7`."
        );
    }
}
