//! Per-question input state.
//!
//! Each renderer tracks its own local value and republishes it into the
//! shared [`AnswerStore`] through its [`AnswerSlot`] on every accepted change.

use crate::answers::AnswerValue;
use crate::spec::{AnswerId, Question, QuestionId, QuestionKind, SelectionMode, Survey};
use crate::store::{AnswerSlot, AnswerStore, StoreError};

pub const MAX_ANSWERS_WARNING: &str =
    "Maximum number of answers reached. Deselect some if you want to change answers.";
pub const REQUIRED_HINT: &str = "This answer is necessary";
pub const OPEN_ANSWER_MAX_LEN: usize = 200;

/// Result of a selection attempt on a closed question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    Changed,
    Unchanged,
    /// The `max` bound was hit; the set was left as it was.
    MaxReached,
    UnknownAnswer,
}

/// Input state of a closed (radio or checkbox) question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosedQuestionState {
    slot: AnswerSlot,
    mode: SelectionMode,
    min: usize,
    max: usize,
    answer_ids: Vec<AnswerId>,
    selected: Vec<AnswerId>,
    message: Option<String>,
}

impl ClosedQuestionState {
    pub fn new(question: &Question, slot: AnswerSlot) -> Result<Self, StoreError> {
        ensure_kind(question, &slot, QuestionKind::Closed)?;
        Ok(Self {
            slot,
            mode: question.selection_mode(),
            min: question.min,
            max: question.max,
            answer_ids: question.answers.iter().map(|answer| answer.id).collect(),
            selected: Vec::new(),
            message: None,
        })
    }

    pub fn question_id(&self) -> QuestionId {
        self.slot.question_id()
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn selected(&self) -> &[AnswerId] {
        &self.selected
    }

    pub fn is_selected(&self, answer_id: AnswerId) -> bool {
        self.selected.contains(&answer_id)
    }

    /// Warning shown after a rejected selection.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn has_error(&self) -> bool {
        self.selected.len() < self.min
    }

    pub fn hints(&self) -> Vec<String> {
        let mut hints = Vec::new();
        if self.min != 0 {
            hints.push(format!("Minimum of {} answers required.", self.min));
        }
        if self.max != 1 {
            hints.push(format!("Maximum of {} answers allowed.", self.max));
        }
        hints
    }

    /// Pick an answer: replaces the selection in radio mode, checks it in checkbox mode.
    pub fn choose(
        &mut self,
        answer_id: AnswerId,
        store: &mut AnswerStore,
    ) -> Result<SelectionOutcome, StoreError> {
        match self.mode {
            SelectionMode::Radio => {
                if !self.answer_ids.contains(&answer_id) {
                    return Ok(SelectionOutcome::UnknownAnswer);
                }
                if self.selected == [answer_id] {
                    return Ok(SelectionOutcome::Unchanged);
                }
                self.selected = vec![answer_id];
                self.publish(store)?;
                Ok(SelectionOutcome::Changed)
            }
            SelectionMode::Checkbox => self.set_checked(answer_id, true, store),
        }
    }

    /// Check or uncheck a single answer.
    pub fn set_checked(
        &mut self,
        answer_id: AnswerId,
        checked: bool,
        store: &mut AnswerStore,
    ) -> Result<SelectionOutcome, StoreError> {
        if !self.answer_ids.contains(&answer_id) {
            return Ok(SelectionOutcome::UnknownAnswer);
        }
        if self.mode == SelectionMode::Radio {
            // radio buttons have no explicit deselect
            return if checked {
                self.choose(answer_id, store)
            } else {
                Ok(SelectionOutcome::Unchanged)
            };
        }

        if checked {
            if self.is_selected(answer_id) {
                return Ok(SelectionOutcome::Unchanged);
            }
            if self.selected.len() >= self.max {
                tracing::debug!(
                    question = self.question_id(),
                    max = self.max,
                    "selection rejected, maximum reached"
                );
                self.message = Some(MAX_ANSWERS_WARNING.to_string());
                return Ok(SelectionOutcome::MaxReached);
            }
            self.selected.push(answer_id);
        } else {
            self.message = None;
            let before = self.selected.len();
            self.selected.retain(|id| *id != answer_id);
            if self.selected.len() == before {
                return Ok(SelectionOutcome::Unchanged);
            }
        }
        self.publish(store)?;
        Ok(SelectionOutcome::Changed)
    }

    fn publish(&self, store: &mut AnswerStore) -> Result<(), StoreError> {
        store.replace(&self.slot, AnswerValue::Choices(self.selected.clone()))
    }
}

/// Input state of a free-text question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenQuestionState {
    slot: AnswerSlot,
    required: bool,
    value: String,
    max_len: usize,
}

impl OpenQuestionState {
    pub fn new(question: &Question, slot: AnswerSlot, max_len: usize) -> Result<Self, StoreError> {
        ensure_kind(question, &slot, QuestionKind::Open)?;
        Ok(Self {
            slot,
            required: question.is_required(),
            value: String::new(),
            max_len,
        })
    }

    pub fn question_id(&self) -> QuestionId {
        self.slot.question_id()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn has_error(&self) -> bool {
        self.required && self.value.is_empty()
    }

    pub fn hints(&self) -> Vec<String> {
        if self.required {
            vec![REQUIRED_HINT.to_string()]
        } else {
            Vec::new()
        }
    }

    /// Replace the text, truncated to `max_len` characters. Returns whether it changed.
    pub fn set_text(&mut self, text: &str, store: &mut AnswerStore) -> Result<bool, StoreError> {
        let value: String = text.chars().take(self.max_len).collect();
        if value == self.value {
            return Ok(false);
        }
        self.value = value;
        store.replace(&self.slot, AnswerValue::Text(self.value.clone()))?;
        Ok(true)
    }
}

/// Renderer state for one question of the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionView {
    Closed(ClosedQuestionState),
    Open(OpenQuestionState),
}

impl QuestionView {
    /// Build one renderer per question, each bound to its own slot.
    pub fn for_survey(
        survey: &Survey,
        store: &AnswerStore,
        open_max_len: usize,
    ) -> Result<Vec<QuestionView>, StoreError> {
        survey
            .questions
            .iter()
            .map(|question| {
                let slot = store.slot(question.id)?;
                Ok(match question.kind {
                    QuestionKind::Closed => {
                        QuestionView::Closed(ClosedQuestionState::new(question, slot)?)
                    }
                    QuestionKind::Open => {
                        QuestionView::Open(OpenQuestionState::new(question, slot, open_max_len)?)
                    }
                })
            })
            .collect()
    }

    pub fn question_id(&self) -> QuestionId {
        match self {
            QuestionView::Closed(state) => state.question_id(),
            QuestionView::Open(state) => state.question_id(),
        }
    }

    pub fn has_error(&self) -> bool {
        match self {
            QuestionView::Closed(state) => state.has_error(),
            QuestionView::Open(state) => state.has_error(),
        }
    }

    pub fn is_answered(&self) -> bool {
        match self {
            QuestionView::Closed(state) => !state.selected().is_empty(),
            QuestionView::Open(state) => !state.value().is_empty(),
        }
    }

    pub fn hints(&self) -> Vec<String> {
        match self {
            QuestionView::Closed(state) => state.hints(),
            QuestionView::Open(state) => state.hints(),
        }
    }
}

fn ensure_kind(
    question: &Question,
    slot: &AnswerSlot,
    expected: QuestionKind,
) -> Result<(), StoreError> {
    if slot.question_id() != question.id {
        return Err(StoreError::StaleSlot(slot.question_id()));
    }
    if question.kind != expected || slot.kind() != expected {
        return Err(StoreError::KindMismatch {
            question: question.id,
            expected: expected.as_str(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::Answer;

    fn closed(id: u64, min: usize, max: usize, answers: &[u64]) -> Question {
        Question {
            id,
            text: format!("Question {id}"),
            kind: QuestionKind::Closed,
            answers: answers
                .iter()
                .map(|answer| Answer {
                    id: *answer,
                    text: format!("Answer {answer}"),
                })
                .collect(),
            min,
            max,
        }
    }

    fn open(id: u64, min: usize) -> Question {
        Question {
            id,
            text: String::new(),
            kind: QuestionKind::Open,
            answers: vec![],
            min,
            max: 1,
        }
    }

    fn setup(question: Question) -> (Survey, AnswerStore) {
        let survey = Survey {
            id: 1,
            title: "t".into(),
            questions: vec![question],
        };
        let store = AnswerStore::for_survey(&survey).expect("store");
        (survey, store)
    }

    fn closed_state(question: &Question, store: &AnswerStore) -> ClosedQuestionState {
        ClosedQuestionState::new(question, store.slot(question.id).expect("slot")).expect("state")
    }

    #[test]
    fn radio_selection_replaces_previous_answer() {
        let question = closed(10, 1, 1, &[100, 101, 102]);
        let (_, mut store) = setup(question.clone());
        let mut state = closed_state(&question, &store);
        assert_eq!(state.mode(), SelectionMode::Radio);

        assert_eq!(state.choose(100, &mut store), Ok(SelectionOutcome::Changed));
        assert_eq!(state.choose(101, &mut store), Ok(SelectionOutcome::Changed));
        assert_eq!(state.selected(), &[101]);
        assert_eq!(
            state.set_checked(102, true, &mut store),
            Ok(SelectionOutcome::Changed)
        );
        assert_eq!(state.selected(), &[102]);
        assert_eq!(
            store.get(10).expect("entry").values,
            Some(AnswerValue::Choices(vec![102]))
        );
    }

    #[test]
    fn optional_single_answer_is_a_checkbox_that_can_be_cleared() {
        let question = closed(10, 0, 1, &[100, 101]);
        let (_, mut store) = setup(question.clone());
        let mut state = closed_state(&question, &store);
        assert_eq!(state.mode(), SelectionMode::Checkbox);

        state.set_checked(100, true, &mut store).expect("check");
        assert_eq!(
            state.set_checked(101, true, &mut store),
            Ok(SelectionOutcome::MaxReached)
        );
        assert_eq!(state.selected(), &[100]);
        assert_eq!(state.message(), Some(MAX_ANSWERS_WARNING));

        assert_eq!(
            state.set_checked(100, false, &mut store),
            Ok(SelectionOutcome::Changed)
        );
        assert!(state.selected().is_empty());
        assert_eq!(state.message(), None);
        assert_eq!(
            store.get(10).expect("entry").values,
            Some(AnswerValue::Choices(vec![]))
        );
    }

    #[test]
    fn radio_unchecking_is_ignored() {
        let question = closed(10, 1, 1, &[100, 101]);
        let (_, mut store) = setup(question.clone());
        let mut state = closed_state(&question, &store);
        state.choose(100, &mut store).expect("choose");
        assert_eq!(
            state.set_checked(100, false, &mut store),
            Ok(SelectionOutcome::Unchanged)
        );
        assert_eq!(state.selected(), &[100]);
    }

    #[test]
    fn checkbox_rejects_selection_past_max_then_allows_after_deselect() {
        let question = closed(10, 0, 2, &[100, 101, 102]);
        let (_, mut store) = setup(question.clone());
        let mut state = closed_state(&question, &store);

        state.set_checked(100, true, &mut store).expect("check");
        state.set_checked(101, true, &mut store).expect("check");
        assert_eq!(
            state.set_checked(102, true, &mut store),
            Ok(SelectionOutcome::MaxReached)
        );
        assert_eq!(state.selected(), &[100, 101]);
        assert_eq!(state.message(), Some(MAX_ANSWERS_WARNING));
        assert_eq!(
            store.get(10).expect("entry").values,
            Some(AnswerValue::Choices(vec![100, 101]))
        );

        state.set_checked(100, false, &mut store).expect("uncheck");
        assert_eq!(state.message(), None);
        assert_eq!(
            state.set_checked(102, true, &mut store),
            Ok(SelectionOutcome::Changed)
        );
        assert_eq!(state.selected(), &[101, 102]);
        assert_eq!(
            store.get(10).expect("entry").values,
            Some(AnswerValue::Choices(vec![101, 102]))
        );
    }

    #[test]
    fn unknown_answers_are_ignored() {
        let question = closed(10, 0, 3, &[100]);
        let (_, mut store) = setup(question.clone());
        let mut state = closed_state(&question, &store);
        assert_eq!(
            state.set_checked(999, true, &mut store),
            Ok(SelectionOutcome::UnknownAnswer)
        );
        assert!(store.get(10).expect("entry").values.is_none());
    }

    #[test]
    fn error_flag_tracks_minimum() {
        let question = closed(10, 2, 3, &[100, 101, 102]);
        let (_, mut store) = setup(question.clone());
        let mut state = closed_state(&question, &store);
        assert!(state.has_error());
        state.set_checked(100, true, &mut store).expect("check");
        assert!(state.has_error());
        state.set_checked(101, true, &mut store).expect("check");
        assert!(!state.has_error());
    }

    #[test]
    fn hints_follow_bounds() {
        let question = closed(10, 1, 1, &[100]);
        let (_, store) = setup(question.clone());
        assert_eq!(
            closed_state(&question, &store).hints(),
            vec!["Minimum of 1 answers required.".to_string()]
        );

        let question = closed(10, 1, 3, &[100]);
        let (_, store) = setup(question.clone());
        assert_eq!(
            closed_state(&question, &store).hints(),
            vec![
                "Minimum of 1 answers required.".to_string(),
                "Maximum of 3 answers allowed.".to_string()
            ]
        );

        let question = closed(10, 0, 1, &[100]);
        let (_, store) = setup(question.clone());
        assert!(closed_state(&question, &store).hints().is_empty());
    }

    #[test]
    fn open_text_is_truncated_and_published() {
        let question = open(11, 1);
        let (_, mut store) = setup(question.clone());
        let mut state =
            OpenQuestionState::new(&question, store.slot(11).expect("slot"), OPEN_ANSWER_MAX_LEN)
                .expect("state");
        assert!(state.has_error());

        let long = "é".repeat(OPEN_ANSWER_MAX_LEN + 20);
        assert_eq!(state.set_text(&long, &mut store), Ok(true));
        assert_eq!(state.value().chars().count(), OPEN_ANSWER_MAX_LEN);
        assert!(!state.has_error());
        assert_eq!(
            store.get(11).and_then(|answer| answer.text()).map(str::len),
            Some(state.value().len())
        );

        assert_eq!(state.set_text("", &mut store), Ok(true));
        assert!(state.has_error());
        assert_eq!(store.get(11).and_then(|answer| answer.text()), Some(""));
    }

    #[test]
    fn renderer_refuses_wrong_kind() {
        let question = open(11, 0);
        let (_, store) = setup(question.clone());
        let result = ClosedQuestionState::new(&question, store.slot(11).expect("slot"));
        assert!(matches!(result, Err(StoreError::KindMismatch { .. })));
    }

    #[test]
    fn views_cover_every_question() {
        let survey = Survey {
            id: 5,
            title: "mixed".into(),
            questions: vec![closed(1, 1, 1, &[10, 11]), open(2, 0)],
        };
        let store = AnswerStore::for_survey(&survey).expect("store");
        let views = QuestionView::for_survey(&survey, &store, 50).expect("views");
        assert_eq!(views.len(), 2);
        assert!(matches!(views[0], QuestionView::Closed(_)));
        assert!(matches!(views[1], QuestionView::Open(_)));
        assert!(views[0].has_error());
        assert!(!views[1].has_error());
    }
}
