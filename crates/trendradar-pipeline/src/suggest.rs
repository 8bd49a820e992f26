//! Product-idea suggestion from keyword text.

/// One row of the rule table: a product idea and the substrings that trigger it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestionRule {
    pub category: &'static str,
    pub label: &'static str,
    pub triggers: &'static [&'static str],
}

/// Consulted top to bottom; the first rule with a matching trigger wins.
///
/// Order matters for keywords that hit several categories. Triggers are
/// lowercase and matched against the keyword padded with one space on each
/// side, so `" ai "` only matches "ai" as a whole word.
pub const RULES: &[SuggestionRule] = &[
    SuggestionRule {
        category: "template",
        label: "🧾 Create a Notion or Canva template",
        triggers: &["template", "planner", "notion", "spreadsheet"],
    },
    SuggestionRule {
        category: "checklist",
        label: "✅ Make a printable checklist or habit tracker",
        triggers: &["checklist", "habit", "tracker", "routine"],
    },
    SuggestionRule {
        category: "prompt",
        label: "🧠 Bundle AI or ChatGPT prompts",
        triggers: &["prompt", "chatgpt", "gpt", " ai "],
    },
    SuggestionRule {
        category: "manifestation",
        label: "🌙 Design a manifestation or goal-setting workbook",
        triggers: &["manifest", "affirmation", "vision board", "goal"],
    },
    SuggestionRule {
        category: "budget",
        label: "💰 Build a budget or finance tracker",
        triggers: &["budget", "finance", "saving", "expense", "debt"],
    },
    SuggestionRule {
        category: "sticker",
        label: "🎨 Sell a digital sticker or clipart pack",
        triggers: &["sticker", "clipart", "clip art", "svg"],
    },
    SuggestionRule {
        category: "calendar",
        label: "📅 Offer a printable calendar or schedule",
        triggers: &["calendar", "schedule"],
    },
    SuggestionRule {
        category: "study",
        label: "📚 Create study notes or flashcards",
        triggers: &["study", "notes", "flashcard", "exam"],
    },
];

/// Label returned when no rule matches.
pub const FALLBACK_LABEL: &str = "🎯 Create a niche digital download or workbook";

/// First matching rule for `keyword`, if any.
#[must_use]
pub fn matching_rule(keyword: &str) -> Option<&'static SuggestionRule> {
    let padded = format!(" {} ", keyword.to_lowercase());
    RULES
        .iter()
        .find(|rule| rule.triggers.iter().any(|t| padded.contains(t)))
}

/// Product-idea label for `keyword`. Never empty.
#[must_use]
pub fn suggest(keyword: &str) -> &'static str {
    matching_rule(keyword).map_or(FALLBACK_LABEL, |rule| rule.label)
}
