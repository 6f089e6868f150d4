//! Keyword-match reply selection.
//!
//! Input is lower-cased and tested for substring membership against ordered
//! keyword groups; the first group that matches decides the reply.

pub const TAKEN_REPLY: &str = "I've logged your medication as taken. Great job staying on track!";
pub const MISSED_REPLY: &str = "I've noted that you missed your dose. I'll alert your caregiver and help you reschedule. When would be a good time to take it?";
pub const SIDE_EFFECTS_REPLY: &str = "Let me check that information for you. According to MedlinePlus, common side effects include dizziness and nausea. Would you like more detailed information?";
pub const SCHEDULE_REPLY: &str = "I'll add this medication to your schedule. What time would you like to take it?";
pub const GREETING_REPLY: &str = "Hello! How can I help with your medications today?";
pub const FALLBACK_REPLY: &str = "I'm not sure I understand. Could you rephrase that? You can ask me about your medications, log doses as taken, report missed doses, or ask about side effects.";

/// What the user is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    LogTaken,
    ReportMissed,
    SideEffects,
    Schedule,
    Greeting,
    Unknown,
}

impl Intent {
    /// Canned reply for this intent.
    pub fn reply(&self) -> &'static str {
        match self {
            Intent::LogTaken => TAKEN_REPLY,
            Intent::ReportMissed => MISSED_REPLY,
            Intent::SideEffects => SIDE_EFFECTS_REPLY,
            Intent::Schedule => SCHEDULE_REPLY,
            Intent::Greeting => GREETING_REPLY,
            Intent::Unknown => FALLBACK_REPLY,
        }
    }
}

/// Produces a bot reply for a user message.
pub trait Responder {
    fn respond(&self, text: &str) -> String;
}

/// Ordered keyword groups, first match wins.
pub struct KeywordResponder {
    rules: Vec<(Intent, Vec<String>)>,
}

impl Default for KeywordResponder {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordResponder {
    /// Create a responder with the default keyword groups.
    pub fn new() -> Self {
        Self {
            rules: Self::default_rules(),
        }
    }

    /// Classify a message. Total: anything unmatched is `Unknown`.
    pub fn classify(&self, text: &str) -> Intent {
        let lower = text.to_lowercase();
        self.rules
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k.as_str())))
            .map(|(intent, _)| *intent)
            .unwrap_or(Intent::Unknown)
    }

    /// Append a keyword to an intent's group. Group order is unchanged.
    pub fn add_keyword(&mut self, intent: Intent, keyword: &str) {
        let keyword = keyword.to_lowercase();
        if keyword.is_empty() || intent == Intent::Unknown {
            return;
        }
        match self.rules.iter_mut().find(|(i, _)| *i == intent) {
            Some((_, keywords)) => keywords.push(keyword),
            None => self.rules.push((intent, vec![keyword])),
        }
    }

    fn default_rules() -> Vec<(Intent, Vec<String>)> {
        let group = |words: &[&str]| words.iter().map(|w| w.to_string()).collect();
        vec![
            (Intent::LogTaken, group(&["take", "took", "taken"])),
            (Intent::ReportMissed, group(&["miss", "missed"])),
            (Intent::SideEffects, group(&["side effect", "interaction"])),
            (Intent::Schedule, group(&["schedule", "add"])),
            (Intent::Greeting, group(&["hello", "hi"])),
        ]
    }
}

impl Responder for KeywordResponder {
    fn respond(&self, text: &str) -> String {
        self.classify(text).reply().to_string()
    }
}
