use super::Responder;
use crate::error::ChatError;

const DEFAULT_REPLY: &str = "I'm here to support you. How can I help you today?";

/// Keyword groups checked in order; the first group with a match wins.
const REPLIES: &[(&[&str], &str)] = &[
    (
        &["sad", "depress"],
        "I'm sorry to hear you're feeling down. It's important to acknowledge these feelings. Would you like to try tracking your mood in our mood tracker? It might help you notice patterns over time. Remember that it's okay to not be okay sometimes, and reaching out for support is a sign of strength.",
    ),
    (
        &["anxious", "worry", "stress"],
        "Anxiety can be really challenging. Have you tried the 4-7-8 breathing technique in our breathing exercises section? It can help calm your nervous system. Also, writing down your worries in the journal section might help you process them better. Remember that you're not alone in feeling this way.",
    ),
    (
        &["sleep", "tired"],
        "Sleep is so important for mental wellbeing. Our resources section has some tips for better sleep hygiene that might help. Creating a consistent bedtime routine and limiting screen time before bed can make a big difference. Would you like to explore some relaxation techniques that could help you wind down?",
    ),
    (
        &["happy", "good", "great"],
        "I'm glad to hear you're feeling good! It's wonderful that you're experiencing positive emotions. Would you like to record this in your mood tracker to help you remember this feeling? Celebrating these moments, no matter how small, can be really beneficial for your overall wellbeing.",
    ),
    (
        &["angry", "frustrat", "upset"],
        "It sounds like you're feeling frustrated. That's completely understandable. Sometimes taking a moment to practice deep breathing can help manage these intense emotions. Our breathing exercises section has some techniques you might find helpful. Would you like to talk more about what's causing these feelings?",
    ),
    (
        &["help", "support"],
        "I'm here to support you. SukoonAI offers several features that might help: you can track your mood, practice breathing exercises, journal your thoughts, or explore our resources section. What would be most helpful for you right now?",
    ),
    (
        &["thank"],
        "You're very welcome. I'm glad I could be of help. Remember that I'm here whenever you need someone to talk to. Is there anything else you'd like to discuss or explore today?",
    ),
];

/// Canned replies chosen by keyword, for use without network access.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordResponder;

impl KeywordResponder {
    pub fn respond(&self, message: &str) -> &'static str {
        let lower = message.to_lowercase();
        REPLIES
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(_, reply)| *reply)
            .unwrap_or(DEFAULT_REPLY)
    }
}

impl Responder for KeywordResponder {
    async fn reply(&self, message: &str) -> Result<String, ChatError> {
        if message.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        Ok(self.respond(message).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_keywords_case_insensitively() {
        let r = KeywordResponder;
        assert!(r.respond("I feel SO stressed").starts_with("Anxiety can be"));
        assert!(r.respond("Can't sleep").starts_with("Sleep is so important"));
        assert!(r.respond("thanks!").starts_with("You're very welcome"));
        assert_eq!(r.respond("hello"), DEFAULT_REPLY);
    }

    #[test]
    fn earlier_groups_win() {
        // "sad" comes before "help".
        let r = KeywordResponder;
        assert!(r.respond("I'm sad, please help").starts_with("I'm sorry to hear"));
    }

    #[tokio::test]
    async fn empty_message_is_rejected() {
        let err = KeywordResponder.reply("   ").await.unwrap_err();
        assert!(matches!(err, ChatError::EmptyMessage));
    }
}
