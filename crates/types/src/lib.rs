//! Validated value types shared between the symptom service crates.

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty
    #[error("Input field is empty")]
    Empty,
}

/// Free text submitted by a user, guaranteed to be non-empty.
///
/// Unlike a trimmed identifier, the content is stored exactly as received so that every
/// symptom reported back is a verbatim substring of what the user typed (after lowercasing).
/// Whitespace-only text is accepted; it simply contains no symptoms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputText(String);

impl InputText {
    /// Creates a new `InputText` from the given input.
    ///
    /// # Arguments
    ///
    /// * `input` - Any type that can be converted into a `String`
    ///
    /// # Returns
    ///
    /// Returns `Ok(InputText)` if the input has at least one character,
    /// or `Err(TextError::Empty)` if it's the empty string.
    pub fn new(input: impl Into<String>) -> Result<Self, TextError> {
        let input = input.into();
        if input.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(input))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for InputText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for InputText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for InputText {
    type Error = TextError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl serde::Serialize for InputText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for InputText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        InputText::new(s).map_err(serde::de::Error::custom)
    }
}
