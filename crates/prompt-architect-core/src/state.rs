//! UI-agnostic session state
//!
//! `Session` owns everything the form shows: the selected category, the
//! keywords being typed, the last generated prompt or error, the loading flag
//! and the theme. Front ends only read it and call its methods.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::category::{Category, CategoryId, DEFAULT_PLACEHOLDER};
use crate::enhance::{EnhanceError, Enhancer};

pub const EMPTY_INPUT_MESSAGE: &str = "Please enter some keywords to generate a prompt.";

/// How long the "Copied!" acknowledgement stays visible
pub const COPY_NOTICE_DURATION: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// Persistence hook for the theme preference
pub trait ThemeStore {
    fn load_theme(&self) -> Option<Theme>;
    fn save_theme(&mut self, theme: Theme) -> anyhow::Result<()>;
}

/// Everything needed to run one enhancement off the UI task
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub category: Option<&'static Category>,
    pub keywords: String,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub selected_category: Option<CategoryId>,
    pub user_input: String,
    pub generated_prompt: String,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub theme: Theme,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_theme(theme: Theme) -> Self {
        Self {
            theme,
            ..Self::default()
        }
    }

    /// Start from whatever theme the store remembers
    pub fn load(store: &dyn ThemeStore) -> Self {
        Self::with_theme(store.load_theme().unwrap_or_default())
    }

    pub fn selected(&self) -> Option<&'static Category> {
        self.selected_category.map(|id| id.category())
    }

    /// Toggle `id`; selecting the current category deselects it
    pub fn select_category(&mut self, id: CategoryId) {
        if self.selected_category == Some(id) {
            self.selected_category = None;
        } else {
            self.selected_category = Some(id);
        }
        debug!(category = ?self.selected_category, "category selection changed");
        self.generated_prompt.clear();
        self.error_message = None;
    }

    /// Validate input and flip into the loading state.
    ///
    /// Returns `None` when the input is blank (the validation error is set) or
    /// when a request is already in flight.
    pub fn begin_generation(&mut self) -> Option<GenerationRequest> {
        if self.is_loading {
            return None;
        }
        if self.user_input.trim().is_empty() {
            self.error_message = Some(EMPTY_INPUT_MESSAGE.to_string());
            return None;
        }

        self.is_loading = true;
        self.error_message = None;
        self.generated_prompt.clear();

        Some(GenerationRequest {
            category: self.selected(),
            keywords: self.user_input.clone(),
        })
    }

    /// Route the outcome of a request started by `begin_generation`
    pub fn finish_generation(&mut self, outcome: Result<String, EnhanceError>) {
        self.is_loading = false;
        match outcome {
            Ok(text) => {
                info!(chars = text.chars().count(), "prompt enhanced");
                self.generated_prompt = text;
            }
            Err(e) => {
                warn!(error = ?e, "prompt enhancement failed");
                self.error_message = Some(e.to_string());
            }
        }
    }

    pub async fn generate(&mut self, enhancer: &dyn Enhancer) {
        let Some(request) = self.begin_generation() else {
            return;
        };
        let outcome = enhancer.enhance(request.category, &request.keywords).await;
        self.finish_generation(outcome);
    }

    pub fn clear(&mut self) {
        self.user_input.clear();
        self.generated_prompt.clear();
        self.error_message = None;
        self.selected_category = None;
    }

    /// Flip the theme and persist it. The in-memory theme changes even when
    /// saving fails.
    pub fn toggle_theme(&mut self, store: &mut dyn ThemeStore) -> anyhow::Result<Theme> {
        self.theme = self.theme.toggled();
        store.save_theme(self.theme)?;
        Ok(self.theme)
    }

    pub fn is_clearable(&self) -> bool {
        !self.user_input.is_empty()
            || !self.generated_prompt.is_empty()
            || self.selected_category.is_some()
            || self.error_message.is_some()
    }

    pub fn can_generate(&self) -> bool {
        !self.is_loading && !self.user_input.trim().is_empty()
    }

    pub fn can_clear(&self) -> bool {
        self.is_clearable() && !self.is_loading
    }

    pub fn placeholder(&self) -> &'static str {
        self.selected()
            .map(|c| c.placeholder)
            .unwrap_or(DEFAULT_PLACEHOLDER)
    }
}

/// Transient "Copied!" acknowledgement. Copying again restarts the window.
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyNotice {
    expires_at: Option<Instant>,
}

impl CopyNotice {
    pub fn show(&mut self, now: Instant) {
        self.expires_at = Some(now + COPY_NOTICE_DURATION);
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|t| now < t)
    }

    /// Drop an expired notice; returns true if it just went away
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.expires_at {
            Some(t) if now >= t => {
                self.expires_at = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FakeEnhancer {
        reply: Result<String, EnhanceError>,
        calls: AtomicUsize,
        seen: Mutex<Vec<(Option<CategoryId>, String)>>,
    }

    impl FakeEnhancer {
        fn replying(reply: Result<String, EnhanceError>) -> Self {
            Self {
                reply,
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Enhancer for FakeEnhancer {
        async fn enhance(
            &self,
            category: Option<&'static Category>,
            keywords: &str,
        ) -> Result<String, EnhanceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen
                .lock()
                .unwrap()
                .push((category.map(|c| c.id), keywords.to_string()));
            self.reply.clone()
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        saved: Option<Theme>,
        fail: bool,
    }

    impl ThemeStore for MemoryStore {
        fn load_theme(&self) -> Option<Theme> {
            self.saved
        }

        fn save_theme(&mut self, theme: Theme) -> anyhow::Result<()> {
            if self.fail {
                anyhow::bail!("read-only");
            }
            self.saved = Some(theme);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_blank_input_never_calls_enhancer() {
        for input in ["", "   ", "\n\t "] {
            let enhancer = FakeEnhancer::replying(Ok("unused".to_string()));
            let mut session = Session::new();
            session.generated_prompt = "previous".to_string();
            session.user_input = input.to_string();

            session.generate(&enhancer).await;

            assert_eq!(enhancer.calls.load(Ordering::SeqCst), 0);
            assert_eq!(session.generated_prompt, "previous");
            assert_eq!(session.error_message.as_deref(), Some(EMPTY_INPUT_MESSAGE));
            assert!(!session.is_loading);
        }
    }

    #[tokio::test]
    async fn test_successful_generation_with_category() {
        let enhancer = FakeEnhancer::replying(Ok("**Write** a blog post...".to_string()));
        let mut session = Session::new();
        session.select_category(CategoryId::ContentWriting);
        session.user_input = "a blog post about remote work".to_string();

        session.generate(&enhancer).await;

        assert_eq!(session.generated_prompt, "**Write** a blog post...");
        assert_eq!(session.error_message, None);
        assert!(!session.is_loading);
        let seen = enhancer.seen.lock().unwrap();
        assert_eq!(
            seen.as_slice(),
            &[(
                Some(CategoryId::ContentWriting),
                "a blog post about remote work".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_missing_key_lands_in_error_slot() {
        let enhancer = FakeEnhancer::replying(Err(EnhanceError::MissingApiKey));
        let mut session = Session::new();
        session.user_input = "a cat".to_string();

        session.generate(&enhancer).await;

        assert_eq!(session.error_message, Some(EnhanceError::MissingApiKey.to_string()));
        assert!(session.generated_prompt.is_empty());
        assert!(!session.is_loading);
    }

    #[tokio::test]
    async fn test_success_text_that_looks_like_an_error_is_output() {
        let text = "An error occurred in the story, and the detective...".to_string();
        let enhancer = FakeEnhancer::replying(Ok(text.clone()));
        let mut session = Session::new();
        session.user_input = "mystery".to_string();

        session.generate(&enhancer).await;

        assert_eq!(session.generated_prompt, text);
        assert_eq!(session.error_message, None);
    }

    #[test]
    fn test_begin_generation_clears_previous_result() {
        let mut session = Session::new();
        session.user_input = "cats".to_string();
        session.generated_prompt = "old".to_string();
        session.error_message = Some("old error".to_string());

        let request = session.begin_generation().unwrap();

        assert_eq!(request.keywords, "cats");
        assert!(request.category.is_none());
        assert!(session.is_loading);
        assert!(session.generated_prompt.is_empty());
        assert!(session.error_message.is_none());

        // A second attempt while loading is refused
        assert!(session.begin_generation().is_none());
    }

    #[test]
    fn test_reselecting_category_deselects() {
        for id in CategoryId::all() {
            let mut session = Session::new();
            session.select_category(id);
            assert_eq!(session.selected_category, Some(id));
            session.select_category(id);
            assert_eq!(session.selected_category, None);
        }
    }

    #[test]
    fn test_select_category_clears_output_and_error() {
        let mut session = Session::new();
        session.generated_prompt = "result".to_string();
        session.error_message = Some("boom".to_string());

        session.select_category(CategoryId::ImageGen);
        session.select_category(CategoryId::VibeCoding);

        assert_eq!(session.selected_category, Some(CategoryId::VibeCoding));
        assert!(session.generated_prompt.is_empty());
        assert!(session.error_message.is_none());
    }

    #[test]
    fn test_clear_resets_everything_but_theme() {
        let mut session = Session::with_theme(Theme::Dark);
        session.user_input = "x".to_string();
        session.generated_prompt = "y".to_string();
        session.error_message = Some("z".to_string());
        session.selected_category = Some(CategoryId::ImageGen);

        session.clear();

        assert!(!session.is_clearable());
        assert_eq!(session.theme, Theme::Dark);
    }

    #[test]
    fn test_is_clearable_truth_table() {
        for mask in 0u8..16 {
            let mut session = Session::new();
            if mask & 1 != 0 {
                session.user_input = "x".to_string();
            }
            if mask & 2 != 0 {
                session.generated_prompt = "y".to_string();
            }
            if mask & 4 != 0 {
                session.selected_category = Some(CategoryId::ScriptWriting);
            }
            if mask & 8 != 0 {
                session.error_message = Some("z".to_string());
            }
            assert_eq!(session.is_clearable(), mask != 0, "mask {:04b}", mask);
        }
    }

    #[test]
    fn test_controls_disabled_while_loading() {
        let mut session = Session::new();
        session.user_input = "cats".to_string();
        assert!(session.can_generate());
        assert!(session.can_clear());

        session.begin_generation();
        assert!(!session.can_generate());
        assert!(!session.can_clear());
    }

    #[test]
    fn test_placeholder_follows_selection() {
        let mut session = Session::new();
        assert_eq!(session.placeholder(), DEFAULT_PLACEHOLDER);
        session.select_category(CategoryId::ImageGen);
        assert!(session.placeholder().starts_with("e.g., a cyberpunk city"));
    }

    #[test]
    fn test_toggle_theme_twice_round_trips() {
        let mut store = MemoryStore::default();
        let mut session = Session::load(&store);
        assert_eq!(session.theme, Theme::Light);

        assert_eq!(session.toggle_theme(&mut store).unwrap(), Theme::Dark);
        assert_eq!(store.saved, Some(Theme::Dark));

        assert_eq!(session.toggle_theme(&mut store).unwrap(), Theme::Light);
        assert_eq!(store.saved, Some(Theme::Light));
    }

    #[test]
    fn test_toggle_theme_flips_even_if_save_fails() {
        let mut store = MemoryStore {
            saved: None,
            fail: true,
        };
        let mut session = Session::new();
        assert!(session.toggle_theme(&mut store).is_err());
        assert_eq!(session.theme, Theme::Dark);
    }

    #[test]
    fn test_copy_notice_expires_after_two_seconds() {
        let start = Instant::now();
        let mut notice = CopyNotice::default();
        assert!(!notice.is_visible(start));

        notice.show(start);
        assert!(notice.is_visible(start + Duration::from_millis(1999)));
        assert!(!notice.expire(start + Duration::from_millis(1999)));
        assert!(notice.expire(start + Duration::from_secs(2)));
        assert!(!notice.is_visible(start + Duration::from_secs(2)));
    }

    #[test]
    fn test_copy_notice_restarts_on_new_copy() {
        let start = Instant::now();
        let mut notice = CopyNotice::default();
        notice.show(start);
        notice.show(start + Duration::from_millis(1500));

        assert!(notice.is_visible(start + Duration::from_millis(3000)));
        assert!(!notice.is_visible(start + Duration::from_millis(3500)));
    }
}
