//! The guidance provider seam and the offline provider.

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::canned::{self, MOTIVATION_COUNT, Topic};
use crate::error::Result;
use crate::wire::GuidanceRequest;

/// What the player asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuidancePrompt {
    /// A motivational message, optionally about a specific dungeon.
    Motivation {
        /// Title of the dungeon the player is working on.
        task_title: Option<String>,
    },
    /// A question for the hunter assistant.
    Question(String),
    /// A message passed upstream without the assistant persona.
    Raw(String),
}

impl GuidancePrompt {
    /// Motivation about a particular dungeon.
    #[must_use]
    pub fn motivation_for(task_title: impl Into<String>) -> Self {
        Self::Motivation {
            task_title: Some(task_title.into()),
        }
    }

    /// The text sent to a remote model.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Motivation {
                task_title: Some(title),
            } => format!(
                "Give me a short motivational message, in the voice of the Hunter System, \
                 for a hunter working on the dungeon \"{title}\"."
            ),
            Self::Motivation { task_title: None } => {
                "Give me a short motivational message, in the voice of the Hunter System, \
                 for a hunter clearing their daily dungeons."
                    .to_string()
            }
            Self::Question(text) | Self::Raw(text) => text.clone(),
        }
    }

    /// Whether the assistant persona should frame the request.
    #[must_use]
    pub fn is_system_context(&self) -> bool {
        !matches!(self, Self::Raw(_))
    }

    /// The relay request body for this prompt.
    #[must_use]
    pub fn to_request(&self) -> GuidanceRequest {
        GuidanceRequest::new(self.message(), self.is_system_context())
    }
}

/// A source of guidance text.
///
/// Providers may be slow or fail; callers are expected to wrap them in a
/// [`GuidanceService`](crate::GuidanceService) for timeouts and fallbacks.
#[async_trait]
pub trait GuidanceProvider: Send + Sync {
    /// Produces text for `prompt`.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot produce any text.
    async fn request_guidance(&self, prompt: &GuidancePrompt) -> Result<String>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// A provider answering from the built-in phrase tables.
///
/// # Examples
///
/// ```
/// use hunter_guidance::{GuidancePrompt, GuidanceProvider, LocalProvider};
///
/// # async fn example() -> hunter_guidance::Result<()> {
/// let provider = LocalProvider::with_seed(1);
/// let text = provider
///     .request_guidance(&GuidancePrompt::motivation_for("Daily Combat Training"))
///     .await?;
/// assert!(!text.is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct LocalProvider {
    rng: Mutex<StdRng>,
}

impl LocalProvider {
    /// Creates a provider whose choices are reproducible from `seed`.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Creates a provider seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::with_seed(rand::random())
    }

    fn choose(&self, variants: usize) -> usize {
        self.rng.lock().gen_range(0..variants.max(1))
    }

    /// Answers synchronously.
    #[must_use]
    pub fn answer(&self, prompt: &GuidancePrompt) -> String {
        match prompt {
            GuidancePrompt::Motivation { task_title } => {
                canned::motivation(self.choose(MOTIVATION_COUNT), task_title.as_deref())
            }
            GuidancePrompt::Question(text) | GuidancePrompt::Raw(text) => {
                let choice = self.choose(canned::variants(Topic::classify(text)));
                canned::assistant_reply(text, choice)
            }
        }
    }
}

#[async_trait]
impl GuidanceProvider for LocalProvider {
    async fn request_guidance(&self, prompt: &GuidancePrompt) -> Result<String> {
        let text = self.answer(prompt);
        debug!(chars = text.len(), "answered from phrase tables");
        Ok(text)
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn motivation_message_mentions_task() {
        let prompt = GuidancePrompt::motivation_for("Gate");
        assert!(prompt.message().contains("\"Gate\""));
        assert!(prompt.is_system_context());
    }

    #[test]
    fn raw_prompt_skips_persona() {
        let prompt = GuidancePrompt::Raw("hello".to_string());
        let request = prompt.to_request();
        assert_eq!(request.message, "hello");
        assert!(!request.is_system_context);
    }

    #[test]
    fn question_prompt_uses_persona() {
        let request = GuidancePrompt::Question("hi".to_string()).to_request();
        assert!(request.is_system_context);
    }

    #[test]
    fn same_seed_same_answers() {
        let a = LocalProvider::with_seed(99);
        let b = LocalProvider::with_seed(99);
        let prompt = GuidancePrompt::Question("suggest a quest".to_string());

        for _ in 0..5 {
            assert_eq!(a.answer(&prompt), b.answer(&prompt));
        }
    }

    #[test]
    fn motivations_are_from_table() {
        let provider = LocalProvider::with_seed(3);
        let prompt = GuidancePrompt::Motivation { task_title: None };
        let known: Vec<String> = (0..MOTIVATION_COUNT)
            .map(|i| canned::motivation(i, None))
            .collect();

        for _ in 0..20 {
            assert!(known.contains(&provider.answer(&prompt)));
        }
    }

    #[test]
    fn usage_question_gets_guide() {
        let provider = LocalProvider::with_seed(0);
        let text = provider.answer(&GuidancePrompt::Question("How do I use this?".to_string()));
        assert!(text.starts_with("🎮 **Hunter System Guide**"));
    }

    #[tokio::test]
    async fn provider_trait_answers() {
        let provider: &dyn GuidanceProvider = &LocalProvider::with_seed(5);
        let text = provider
            .request_guidance(&GuidancePrompt::Question("advice please".to_string()))
            .await
            .expect("local provider never fails");
        assert!(text.contains("Wisdom from the Hunter's Path"));
        assert_eq!(provider.name(), "local");
    }
}
