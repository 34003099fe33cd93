//! Selectable voices and the three-part voice identifier.
//!
//! A [`VoiceId`] is this application's own token (`en-US-female`), not a
//! platform voice identifier. The matcher in `texttunes-voice` maps it onto
//! whatever voices the host happens to have installed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Voice selected when the user has not picked one.
pub const DEFAULT_VOICE_ID: &str = "en-US-female";

// ── Gender ─────────────────────────────────────────────────────────

/// Voice gender tag, the third part of a [`VoiceId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    /// Lower-case tag as it appears in a voice identifier.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Female => "female",
            Self::Male => "male",
        }
    }

    /// Display label ("Female" / "Male").
    pub const fn label(self) -> &'static str {
        match self {
            Self::Female => "Female",
            Self::Male => "Male",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("female") {
            Ok(Self::Female)
        } else if s.eq_ignore_ascii_case("male") {
            Ok(Self::Male)
        } else {
            Err(ValidationError::InvalidVoiceId(s.to_string()))
        }
    }
}

// ── VoiceId ────────────────────────────────────────────────────────

/// Three-part voice identifier: `language-REGION-gender`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VoiceId {
    language: String,
    region: String,
    gender: Gender,
}

impl VoiceId {
    /// Parse a voice identifier such as `en-GB-male`.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidVoiceId(raw.to_string());

        let mut parts = raw.trim().split('-');
        let (Some(language), Some(region), Some(gender), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        if language.is_empty() || region.is_empty() {
            return Err(invalid());
        }
        let gender = gender.parse::<Gender>().map_err(|_| invalid())?;

        Ok(Self {
            language: language.to_string(),
            region: region.to_string(),
            gender,
        })
    }

    /// Language code (`en`).
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Region code (`US`).
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Gender tag.
    pub const fn gender(&self) -> Gender {
        self.gender
    }

    /// Combined locale tag (`en-US`) used to match platform language tags.
    pub fn locale(&self) -> String {
        format!("{}-{}", self.language, self.region)
    }
}

impl fmt::Display for VoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.language, self.region, self.gender)
    }
}

impl FromStr for VoiceId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for VoiceId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<VoiceId> for String {
    fn from(id: VoiceId) -> Self {
        id.to_string()
    }
}

impl Default for VoiceId {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            region: "US".to_string(),
            gender: Gender::Female,
        }
    }
}

// ── Catalog ────────────────────────────────────────────────────────

/// A selectable voice as shown in the voice picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceDescriptor {
    /// Voice identifier passed to the dispatcher.
    pub id: VoiceId,
    /// Display name.
    pub name: String,
    /// Display language.
    pub language: String,
    /// Gender.
    pub gender: Gender,
}

const CATALOG: [(&str, &str, &str); 8] = [
    ("en-US-female", "Sarah", "English (US)"),
    ("en-US-male", "David", "English (US)"),
    ("en-GB-female", "Emma", "English (UK)"),
    ("en-GB-male", "Oliver", "English (UK)"),
    ("es-ES-female", "Sofia", "Spanish"),
    ("fr-FR-female", "Camille", "French"),
    ("de-DE-male", "Hans", "German"),
    ("it-IT-female", "Giulia", "Italian"),
];

/// The fixed list of selectable voices, in picker order.
pub fn voice_catalog() -> Vec<VoiceDescriptor> {
    CATALOG
        .iter()
        .filter_map(|(id, name, language)| {
            let id = VoiceId::parse(id).ok()?;
            Some(VoiceDescriptor {
                gender: id.gender(),
                id,
                name: (*name).to_string(),
                language: (*language).to_string(),
            })
        })
        .collect()
}

/// Look up a catalog entry by identifier.
pub fn find_voice(id: &VoiceId) -> Option<VoiceDescriptor> {
    voice_catalog().into_iter().find(|v| &v.id == id)
}
