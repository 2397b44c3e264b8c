//! System prompts, fallback texts, and the NEBULA ODYSSEY theme wrapper.

use serde_json::{json, Value};

pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful assistant in the NEBULA ODYSSEY system for personal development.";

pub const REFLECTION_SYSTEM_PROMPT: &str = "You are an expert in personal development and \
    reflection in the NOVA system. Your task is to ask deep, personalised reflection questions \
    and to analyse answers so users can grow.";

/// Returned instead of a completion when the user is rate limited.
pub const RATE_LIMIT_MESSAGE: &str =
    "Your ship's comms array is overheating from too many transmissions. Please try again shortly.";

/// Returned instead of a completion when the provider call fails.
pub const FALLBACK_TEXT: &str =
    "Sorry, I could not generate an answer right now. Please try again later.";

/// Appended to prompts that expect a JSON answer.
pub const JSON_INSTRUCTION: &str = "\n\nRespond in JSON format.";

/// Phrases that mark a prompt as already set in the NEBULA ODYSSEY universe.
const THEME_MARKERS: &[&str] = &["NEBULA ODYSSEY", "spaceship"];

/// Object returned by structured requests that could not be answered.
pub fn default_fallback_object() -> Value {
    json!({ "error": "Could not generate a structured response" })
}

/// Frame `prompt` in the NEBULA ODYSSEY universe unless it already is.
pub fn apply_space_theme(prompt: &str) -> String {
    if THEME_MARKERS.iter().any(|marker| prompt.contains(marker)) {
        return prompt.to_string();
    }
    format!(
        "In the context of the NEBULA ODYSSEY universe with spaceships, planets and space \
         missions: {prompt}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_prompt_gets_themed() {
        let themed = apply_space_theme("Suggest a quest.");
        assert!(themed.starts_with("In the context of the NEBULA ODYSSEY universe"));
        assert!(themed.ends_with(": Suggest a quest."));
    }

    #[test]
    fn themed_prompts_are_left_alone() {
        let prompt = "As captain of the NEBULA ODYSSEY fleet, what next?";
        assert_eq!(apply_space_theme(prompt), prompt);
        let prompt = "Name my spaceship.";
        assert_eq!(apply_space_theme(prompt), prompt);
    }
}
