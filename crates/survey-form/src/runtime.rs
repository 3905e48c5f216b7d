use survey_spec::SurveyId;

use crate::api::SurveyApi;
use crate::config::FormConfig;
use crate::form::{Effect, Message, SurveyForm};
use crate::navigation::Navigator;

/// Runs a [`SurveyForm`] against concrete collaborators.
///
/// Effects are executed one at a time and their completions fed straight
/// back, so at most one request is ever in flight.
pub struct FormRuntime<A, N> {
    api: A,
    navigator: N,
    form: SurveyForm,
}

impl<A: SurveyApi, N: Navigator> FormRuntime<A, N> {
    pub fn start(api: A, navigator: N, survey_id: SurveyId, config: FormConfig) -> Self {
        let (form, effect) = SurveyForm::open(survey_id, config);
        let mut runtime = Self {
            api,
            navigator,
            form,
        };
        runtime.run(effect);
        runtime
    }

    pub fn dispatch(&mut self, message: Message) {
        let effect = self.form.update(message);
        self.run(effect);
    }

    pub fn reload(&mut self, survey_id: SurveyId) {
        let effect = self.form.reload(survey_id);
        self.run(effect);
    }

    pub fn form(&self) -> &SurveyForm {
        &self.form
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn api_mut(&mut self) -> &mut A {
        &mut self.api
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    fn run(&mut self, mut effect: Effect) {
        loop {
            let message = match effect {
                Effect::None => return,
                Effect::Navigate(route) => {
                    self.navigator.push(route);
                    return;
                }
                Effect::FetchSurvey { request, survey_id } => Message::SurveyLoaded {
                    request,
                    result: self.api.get_survey(survey_id),
                },
                Effect::Submit {
                    request,
                    submission,
                } => Message::SubmissionFinished {
                    request,
                    result: self.api.submit_user_answers(&submission),
                },
            };
            effect = self.form.update(message);
        }
    }
}
