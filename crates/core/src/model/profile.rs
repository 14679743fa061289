use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProfileError {
    #[error("exam title cannot be empty")]
    EmptyTitle,

    #[error("storage key cannot be empty")]
    EmptyStorageKey,
}

/// Static configuration of one exam track.
///
/// The storage key scopes the used-question ledger: two profiles sharing a key
/// share their history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExamProfile {
    title: String,
    description: String,
    landing_description: Option<String>,
    storage_key: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ExamProfileDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub landing_description: Option<String>,
    pub storage_key: String,
}

impl ExamProfileDraft {
    #[must_use]
    pub fn new(title: impl Into<String>, storage_key: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            storage_key: storage_key.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_landing_description(mut self, text: impl Into<String>) -> Self {
        self.landing_description = Some(text.into());
        self
    }

    /// Trim and validate the draft.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError` when the title or storage key is blank.
    pub fn validate(self) -> Result<ExamProfile, ProfileError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(ProfileError::EmptyTitle);
        }
        let storage_key = self.storage_key.trim().to_string();
        if storage_key.is_empty() {
            return Err(ProfileError::EmptyStorageKey);
        }

        Ok(ExamProfile {
            title,
            description: self.description.trim().to_string(),
            landing_description: self
                .landing_description
                .map(|text| text.trim().to_string())
                .filter(|text| !text.is_empty()),
            storage_key,
        })
    }
}

impl ExamProfile {
    /// Parse and validate a profile from JSON.
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` for malformed input; validation failures are
    /// reported as custom deserialization errors.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let draft: ExamProfileDraft = serde_json::from_str(json)?;
        draft.validate().map_err(serde::de::Error::custom)
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn landing_description(&self) -> Option<&str> {
        self.landing_description.as_deref()
    }

    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }
}
