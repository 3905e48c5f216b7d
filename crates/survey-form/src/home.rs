use survey_spec::SurveySummary;

use crate::api::SurveyApi;
use crate::navigation::Route;

pub const UNTITLED: &str = "no title";

/// One entry of the published-surveys list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyCard {
    pub summary: SurveySummary,
}

impl SurveyCard {
    pub fn display_title(&self) -> &str {
        self.summary
            .title
            .as_deref()
            .filter(|title| !title.is_empty())
            .unwrap_or(UNTITLED)
    }

    pub fn route(&self) -> Route {
        Route::Survey(self.summary.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomeState {
    Loading,
    Loaded(Vec<SurveyCard>),
    /// Load failed; the message is shown as an inline banner.
    Failed(String),
}

/// Landing page listing the published surveys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeView {
    state: HomeState,
}

impl Default for HomeView {
    fn default() -> Self {
        Self::new()
    }
}

impl HomeView {
    pub fn new() -> Self {
        Self {
            state: HomeState::Loading,
        }
    }

    pub fn load(&mut self, api: &impl SurveyApi) {
        self.state = match api.get_surveys() {
            Ok(surveys) => {
                tracing::info!(count = surveys.len(), "published surveys loaded");
                HomeState::Loaded(
                    surveys
                        .into_iter()
                        .map(|summary| SurveyCard { summary })
                        .collect(),
                )
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to load published surveys");
                HomeState::Failed(err.to_string())
            }
        };
    }

    pub fn state(&self) -> &HomeState {
        &self.state
    }

    pub fn cards(&self) -> &[SurveyCard] {
        match &self.state {
            HomeState::Loaded(cards) => cards,
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            HomeState::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }

    /// Route of the card at `index`, if any.
    pub fn open(&self, index: usize) -> Option<Route> {
        self.cards().get(index).map(SurveyCard::route)
    }
}
