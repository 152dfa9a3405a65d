use std::fmt::Display;

pub trait ResultExt<T, InitialError> {
    /// Map an error to a string-based error variant
    ///
    /// This allows converting `Result<T, InitialError>` to `Result<T, FinalError>` where FinalError has a variant
    /// that takes a String, using the Display implementation of InitialError.
    ///
    /// # Example
    /// ```rust
    /// use rollcall_util::result_ext::ResultExt;
    ///
    /// #[derive(Debug, thiserror::Error)]
    /// enum UploadError {
    ///     #[error("io error: {0}")]
    ///     Io(String),
    /// }
    ///
    /// fn example() -> Result<(), UploadError> {
    ///     std::fs::read("students.xlsx").map_err_str(UploadError::Io)?;
    ///     Ok(())
    /// }
    /// ```
    fn map_err_str<FinalError, F>(self, f: F) -> Result<T, FinalError>
    where
        InitialError: Display,
        F: FnOnce(String) -> FinalError;
}

impl<Type, InitialError> ResultExt<Type, InitialError> for Result<Type, InitialError> {
    fn map_err_str<FinalError, F>(self, f: F) -> Result<Type, FinalError>
    where
        InitialError: Display,
        F: FnOnce(String) -> FinalError,
    {
        self.map_err(|e| f(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Eq, thiserror::Error)]
    enum TestError {
        #[error("wrapped: {0}")]
        Wrapped(String),
    }

    #[test]
    fn map_err_str_uses_display() {
        let result: Result<(), std::num::ParseIntError> = "x".parse::<u8>().map(|_| ());
        let mapped = result.map_err_str(TestError::Wrapped);

        assert_eq!(
            mapped,
            Err(TestError::Wrapped("invalid digit found in string".to_string()))
        );
    }
}
