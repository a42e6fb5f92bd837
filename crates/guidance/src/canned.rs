//! Built-in phrase tables.
//!
//! These back the [`LocalProvider`](crate::LocalProvider) and provide the
//! fallback text shown whenever a real provider fails. Selection is always by
//! an explicit index or seed so callers control the randomness.

/// A themed one-liner shown on the dashboard when no generated guidance is
/// available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemMessage {
    pub text: &'static str,
    /// Banner label, e.g. `DAILY MISSION BRIEF`.
    pub kind: &'static str,
    /// Attribution line.
    pub source: &'static str,
}

pub const SYSTEM_MESSAGES: [SystemMessage; 5] = [
    SystemMessage {
        text: "Only those who risk going too far can possibly find out how far they can go.",
        kind: "SYSTEM NOTIFICATION",
        source: "Hunter Database",
    },
    SystemMessage {
        text: "The strongest people aren't always the people who win, but the people who don't give up when they lose.",
        kind: "DAILY MISSION BRIEF",
        source: "System Advisory",
    },
    SystemMessage {
        text: "Your current abilities are not your limits. Keep pushing forward, Hunter.",
        kind: "LEVEL UP GUIDANCE",
        source: "System AI",
    },
    SystemMessage {
        text: "Every dungeon cleared brings you closer to S-Rank. Trust the process.",
        kind: "PROGRESS UPDATE",
        source: "Hunter Association",
    },
    SystemMessage {
        text: "Remember: Even the weakest hunter can become the strongest through consistent effort.",
        kind: "MOTIVATION PROTOCOL",
        source: "System Core",
    },
];

/// Returns the system message selected by `seed`.
#[must_use]
pub fn system_message(seed: u64) -> &'static SystemMessage {
    &SYSTEM_MESSAGES[index(seed, SYSTEM_MESSAGES.len())]
}

/// Returns the fallback text selected by `seed`.
///
/// The same seed always yields the same text.
///
/// # Examples
///
/// ```
/// use hunter_guidance::pick_fallback;
///
/// assert_eq!(pick_fallback(2), pick_fallback(7));
/// assert_eq!(
///     pick_fallback(0),
///     "Only those who risk going too far can possibly find out how far they can go."
/// );
/// ```
#[must_use]
pub fn pick_fallback(seed: u64) -> &'static str {
    system_message(seed).text
}

/// Number of motivation templates.
pub const MOTIVATION_COUNT: usize = 5;

/// Renders motivation template `choice`, mentioning `task_title` when given.
#[must_use]
pub fn motivation(choice: usize, task_title: Option<&str>) -> String {
    match choice % MOTIVATION_COUNT {
        0 => {
            let subject = match task_title {
                Some(title) => format!("Completing \"{title}\""),
                None => "Every dungeon you clear".to_string(),
            };
            format!(
                "System Analysis: {subject} increases your hunter ranking significantly. \
                 Your dedication mirrors the top S-Rank hunters."
            )
        }
        1 => "Power Assessment: Like all great hunters, growth comes through facing increasingly \
              difficult challenges. You're on the path to awakening your true potential."
            .to_string(),
        2 => "System Advisory: Consistent effort in clearing dungeons has been proven to unlock \
              hidden abilities. Your persistence is being monitored and evaluated positively."
            .to_string(),
        3 => "Hunter Database: Records show that those who never give up on their missions \
              eventually surpass all expectations. Continue your ascent, Hunter."
            .to_string(),
        _ => "System Core Message: Every task completed strengthens your resolve and increases \
              your capabilities. You're becoming stronger with each cleared objective."
            .to_string(),
    }
}

/// Greeting shown when the assistant is opened.
pub const ASSISTANT_GREETING: &str = "🌟 **Hunter System AI Assistant** 🌟

Greetings, Hunter! I'm here to help you on your journey to S-Rank. Ask me about:

✨ How to use this app effectively
⚔️ Quest suggestions to level up
🎯 Life advice to become your best self
🏆 Strategies to maximize your progress

What would you like to know?";

const USAGE_GUIDE: &str = "🎮 **Hunter System Guide**

**Creating Dungeons (Tasks):**
• Run `hunter add` to register new quests
• Choose difficulty rank (E to S-Rank)
• Higher ranks grant larger XP rewards
• Add objectives with `hunter subtask add` for complex dungeons

**Progress Tracking:**
• Manual progress: `hunter progress <task> <percent>`
• Objective progress: automatically calculated
• Time tracking: `hunter log <task> <minutes>`

**Leveling Up:**
• Complete dungeons to gain XP
• Every 200 XP raises your level
• Reach new hunter ranks as you level up!";

const QUEST_SUGGESTIONS: [&str; 4] = [
    "📚 **Learning Dungeons:**\n• Complete online course (B-Rank)\n• Read 1 book this month (A-Rank)\n• Learn new programming language (S-Rank)",
    "💪 **Fitness Dungeons:**\n• 30-day workout challenge (A-Rank)\n• Run 5km daily for a week (B-Rank)\n• Master a new yoga pose (C-Rank)",
    "🎨 **Creative Dungeons:**\n• Write a short story (B-Rank)\n• Learn to play a song (A-Rank)\n• Complete art project (C-Rank)",
    "🏠 **Life Skills Dungeons:**\n• Organize entire room (C-Rank)\n• Learn to cook new recipe (D-Rank)\n• Fix something broken (B-Rank)",
];

const LIFE_ADVICE: [&str; 5] = [
    "🌱 **Growth Mindset:** Every failure is XP gained. Each setback teaches valuable lessons that make you stronger for the next challenge.",
    "⚡ **Consistency Over Intensity:** Small daily actions compound into extraordinary results. Better to do 15 minutes daily than 3 hours once a week.",
    "🎯 **Focus on Systems:** Don't just set goals, build systems. Good systems create lasting habits that automatically drive you toward success.",
    "🤝 **Build Your Guild:** Surround yourself with people who challenge and support you. Even solo hunters need allies.",
    "🧘 **Rest is Part of Training:** Recovery isn't laziness. It's preparation. Your mind and body need downtime to perform at S-Rank level.",
];

/// What a question is about, decided by keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Usage,
    Quests,
    LifeAdvice,
    Other,
}

impl Topic {
    /// Classifies a question. Earlier topics win when several match.
    ///
    /// # Examples
    ///
    /// ```
    /// use hunter_guidance::canned::Topic;
    ///
    /// assert_eq!(Topic::classify("How does this work?"), Topic::Usage);
    /// assert_eq!(Topic::classify("Suggest a dungeon"), Topic::Quests);
    /// assert_eq!(Topic::classify("Any advice?"), Topic::LifeAdvice);
    /// assert_eq!(Topic::classify("What's the weather?"), Topic::Other);
    /// ```
    #[must_use]
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        let has = |word: &str| lower.contains(word);

        if has("how") && (has("use") || has("work")) {
            Self::Usage
        } else if has("quest") || has("dungeon") || has("task") {
            Self::Quests
        } else if has("life") || has("better") || has("improve") || has("advice") {
            Self::LifeAdvice
        } else {
            Self::Other
        }
    }
}

/// Builds the canned assistant reply to `message`.
///
/// `choice` picks among the variants of topics that have several.
#[must_use]
pub fn assistant_reply(message: &str, choice: usize) -> String {
    match Topic::classify(message) {
        Topic::Usage => USAGE_GUIDE.to_string(),
        Topic::Quests => {
            let suggestion = QUEST_SUGGESTIONS[choice % QUEST_SUGGESTIONS.len()];
            format!(
                "⚔️ **Quest Suggestions for Your Hunter Journey**\n\n{suggestion}\n\n\
                 💡 **Pro Tip:** Start with lower rank dungeons to build momentum, then \
                 challenge yourself with S-Rank quests!"
            )
        }
        Topic::LifeAdvice => {
            let advice = LIFE_ADVICE[choice % LIFE_ADVICE.len()];
            format!(
                "✨ **Wisdom from the Hunter's Path**\n\n{advice}\n\n\
                 🏆 Remember: Becoming S-Rank in life isn't about perfection. It's about \
                 persistent growth and embracing the journey!"
            )
        }
        Topic::Other => format!(
            "🤖 **System Processing...**\n\n\
             I understand you're asking about: \"{message}\"\n\n\
             As your Hunter System AI, I can help you with:\n\n\
             🎮 **App Usage** - How to navigate and use features\n\
             ⚔️ **Quest Planning** - Suggestions for meaningful challenges\n\
             🌟 **Personal Growth** - Life advice and motivation\n\
             📊 **Progress Optimization** - Tips to level up faster\n\n\
             Could you be more specific about what area you'd like guidance on?"
        ),
    }
}

/// Number of reply variants for the given topic.
#[must_use]
pub fn variants(topic: Topic) -> usize {
    match topic {
        Topic::Quests => QUEST_SUGGESTIONS.len(),
        Topic::LifeAdvice => LIFE_ADVICE.len(),
        Topic::Usage | Topic::Other => 1,
    }
}

/// Instructions prepended to system-context requests sent upstream.
pub const SYSTEM_PROMPT: &str = "You are a Hunter System AI Assistant inspired by Solo Leveling. You help users with:
1. App guidance for the Hunter System productivity app
2. Quest/dungeon suggestions for personal growth
3. Life advice and motivation
4. General questions about anything

Always respond in a helpful, encouraging tone with a slight Solo Leveling theme when appropriate. Use emojis and formatting to make responses engaging. Keep responses concise but informative.";

/// Reply used when the upstream model returns no text.
pub const EMPTY_RESPONSE_FALLBACK: &str = "I'm sorry, I couldn't generate a response.";

/// Reply sent alongside an error when the relay cannot answer.
pub const SYSTEM_ERROR_FALLBACK: &str = "🤖 **System Error**: Unable to process request. The AI core is temporarily unavailable. Please try again in a moment, Hunter.";

fn index(seed: u64, len: usize) -> usize {
    (seed % len as u64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_is_deterministic_and_covers_table() {
        for seed in 0..10u64 {
            assert_eq!(pick_fallback(seed), pick_fallback(seed));
        }
        let picked: std::collections::HashSet<_> = (0..5u64).map(pick_fallback).collect();
        assert_eq!(picked.len(), SYSTEM_MESSAGES.len());
    }

    #[test]
    fn fallback_handles_huge_seeds() {
        assert_eq!(pick_fallback(u64::MAX), SYSTEM_MESSAGES[0].text);
    }

    #[test]
    fn system_message_metadata() {
        let message = system_message(3);
        assert_eq!(message.kind, "PROGRESS UPDATE");
        assert_eq!(message.source, "Hunter Association");
    }

    #[test]
    fn first_motivation_mentions_task() {
        let text = motivation(0, Some("Daily Combat Training"));
        assert!(text.starts_with("System Analysis: Completing \"Daily Combat Training\""));

        let text = motivation(0, None);
        assert!(text.starts_with("System Analysis: Every dungeon you clear"));
    }

    #[test]
    fn motivation_choice_wraps() {
        assert_eq!(motivation(1, None), motivation(6, None));
        assert!(motivation(4, Some("ignored")).starts_with("System Core Message"));
    }

    #[test]
    fn usage_needs_how_and_use_or_work() {
        assert_eq!(Topic::classify("how do I use it"), Topic::Usage);
        assert_eq!(Topic::classify("HOW does it WORK"), Topic::Usage);
        assert_eq!(Topic::classify("how are you"), Topic::Other);
    }

    #[test]
    fn usage_beats_quests() {
        assert_eq!(Topic::classify("how do I use tasks"), Topic::Usage);
    }

    #[test]
    fn quest_reply_uses_choice() {
        let reply = assistant_reply("give me a quest", 1);
        assert!(reply.contains("Fitness Dungeons"));
        assert!(reply.contains("Pro Tip"));
        assert_eq!(variants(Topic::Quests), 4);
    }

    #[test]
    fn advice_reply_uses_choice() {
        let reply = assistant_reply("I want to improve", 3);
        assert!(reply.contains("Build Your Guild"));
    }

    #[test]
    fn default_reply_echoes_message() {
        let reply = assistant_reply("what is mana?", 0);
        assert!(reply.contains("I understand you're asking about: \"what is mana?\""));
    }
}
