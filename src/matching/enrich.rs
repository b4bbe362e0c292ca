//! Profile enrichment before recall.

use crate::core::UserProfile;
use crate::ranking::features::known_skills;
use crate::search::tokenizer::token_set;

/// Skills from the skill vocabulary that appear in `resume`, sorted.
///
/// Plain ASCII skills must appear as whole tokens so "go" does not match
/// "good"; skills with punctuation, spaces or CJK text match as substrings.
pub fn extract_skills(resume: &str) -> Vec<String> {
    let lowered = resume.to_lowercase();
    let tokens = token_set(resume);
    let mut skills: Vec<String> = known_skills()
        .filter(|skill| {
            if skill.chars().all(|c| c.is_ascii_alphanumeric()) {
                tokens.contains(*skill)
            } else {
                lowered.contains(skill)
            }
        })
        .map(str::to_string)
        .collect();
    skills.sort();
    skills
}

/// Copy of the profile with resume skills merged in and defaults filled.
///
/// The request location becomes the preferred location when the profile
/// names none.
pub fn enrich_profile(profile: Option<&UserProfile>, location: Option<&str>) -> UserProfile {
    let mut enriched = profile.cloned().unwrap_or_default();

    if let Some(resume) = enriched.resume_text.clone() {
        for skill in extract_skills(&resume) {
            if !enriched.has_skill(&skill) {
                enriched.skills.push(skill);
            }
        }
    }

    if enriched.preferred_locations.is_empty() {
        if let Some(location) = location.map(str::trim).filter(|l| !l.is_empty()) {
            enriched.preferred_locations.push(location.to_string());
        }
    }

    enriched
}
