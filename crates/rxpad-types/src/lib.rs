/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input text was empty
    #[error("Text cannot be empty")]
    Empty,
}

/// A string type that guarantees non-empty content.
///
/// Form fields are "present" as soon as they hold any character at all, so unlike a
/// trimmed identifier this type keeps the input exactly as typed. Whitespace-only input is
/// accepted; only the empty string is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Arguments
    ///
    /// * `input` - Any type that can be converted to a string reference
    ///
    /// # Returns
    ///
    /// Returns `Ok(NonEmptyText)` if the input holds at least one character,
    /// or `Err(TextError::Empty)` otherwise.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let input = input.as_ref();
        if input.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(input.to_owned()))
    }

    /// Borrows `input` back when it is non-empty.
    ///
    /// This is the allocation-free form of [`NonEmptyText::new`] used for inclusion checks.
    pub fn present(input: &str) -> Option<&str> {
        (!input.is_empty()).then_some(input)
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
