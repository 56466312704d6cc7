//! Query pre-filters, applied before any backend runs.
//!
//! Two cheap checks keep conversational noise out of retrieval and give
//! translation-style requests the whole corpus instead of a ranked slice.
//! Each filter can be disabled independently.

/// Greetings and pleasantries that should not hit the corpus.
const CONVERSATIONAL_KEYWORDS: &[&str] = &[
    "hello",
    "hi",
    "hey",
    "thanks",
    "thank you",
    "goodbye",
    "bye",
    "how are you",
    "what's up",
    "nice to meet you",
    "good morning",
    "good afternoon",
    "good evening",
    "good night",
];

/// Terms that signal the caller wants the full document, not a ranking.
const TRANSLATION_KEYWORDS: &[&str] = &[
    "translate",
    "translation",
    "spanish",
    "french",
    "german",
    "italian",
    "portuguese",
];

/// Which pre-filters are active.
#[derive(Debug, Clone, Copy)]
pub struct PrefilterConfig {
    pub conversational: bool,
    pub translation: bool,
}

impl Default for PrefilterConfig {
    fn default() -> Self {
        Self {
            conversational: true,
            translation: true,
        }
    }
}

/// What the pre-filters decided for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefilterDecision {
    /// No filter matched; run the backend.
    Proceed,
    /// Short greeting; return the empty result without touching the corpus.
    Conversational,
    /// Translation-style request; return every chunk unranked.
    FullContext,
}

impl PrefilterConfig {
    /// Evaluate both filters. The conversational check wins when both would
    /// match.
    pub fn evaluate(&self, query: &str) -> PrefilterDecision {
        let lowered = query.to_lowercase();

        // a greeting keyword inside a longer question is a real query;
        // the token cap is what separates "hi" from "hi, explain chapter 2
        // please"
        if self.conversational
            && query.split_whitespace().count() <= 3
            && CONVERSATIONAL_KEYWORDS.iter().any(|k| lowered.contains(k))
        {
            return PrefilterDecision::Conversational;
        }

        if self.translation && TRANSLATION_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            return PrefilterDecision::FullContext;
        }

        PrefilterDecision::Proceed
    }
}
