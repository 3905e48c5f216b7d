use std::fmt;

use survey_spec::SurveyId;

/// Named views the client can navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Survey(SurveyId),
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => write!(f, "/home"),
            Route::Survey(id) => write!(f, "/survey/{}", id),
        }
    }
}

/// Fire-and-forget navigation collaborator.
pub trait Navigator {
    fn push(&mut self, route: Route);
}

/// Navigator that only remembers where it was sent.
#[derive(Debug, Default, Clone)]
pub struct RecordingNavigator {
    pub history: Vec<Route>,
}

impl RecordingNavigator {
    pub fn last(&self) -> Option<Route> {
        self.history.last().copied()
    }
}

impl Navigator for RecordingNavigator {
    fn push(&mut self, route: Route) {
        tracing::debug!(%route, "navigate");
        self.history.push(route);
    }
}
