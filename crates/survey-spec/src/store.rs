use std::collections::BTreeMap;

use thiserror::Error;

use crate::answers::{AnswerValue, UserAnswer};
use crate::spec::{QuestionId, QuestionKind, Survey, SurveyId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("question {0} is not part of this survey")]
    UnknownQuestion(QuestionId),
    #[error("question id {0} appears more than once in the survey")]
    DuplicateQuestion(QuestionId),
    #[error("question {question} expects a {expected} answer")]
    KindMismatch {
        question: QuestionId,
        expected: &'static str,
    },
    #[error("answer slot for question {0} does not belong to this form")]
    StaleSlot(QuestionId),
}

/// Write handle for exactly one question's answer.
///
/// Renderers hold a slot instead of the store itself, so the only entry they
/// can change is their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerSlot {
    survey_id: SurveyId,
    question_id: QuestionId,
    kind: QuestionKind,
    position: usize,
}

impl AnswerSlot {
    pub fn question_id(&self) -> QuestionId {
        self.question_id
    }

    pub fn kind(&self) -> QuestionKind {
        self.kind
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

/// Per-question answer state for one form session.
///
/// Holds exactly one [`UserAnswer`] per question, in survey order, for its
/// whole lifetime; entries are replaced in place and never removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerStore {
    survey_id: SurveyId,
    entries: Vec<UserAnswer>,
    index: BTreeMap<QuestionId, usize>,
}

impl AnswerStore {
    pub fn for_survey(survey: &Survey) -> Result<Self, StoreError> {
        let mut entries = Vec::with_capacity(survey.questions.len());
        let mut index = BTreeMap::new();
        for (position, question) in survey.questions.iter().enumerate() {
            if index.insert(question.id, position).is_some() {
                return Err(StoreError::DuplicateQuestion(question.id));
            }
            entries.push(UserAnswer::empty(question));
        }
        Ok(Self {
            survey_id: survey.id,
            entries,
            index,
        })
    }

    pub fn survey_id(&self) -> SurveyId {
        self.survey_id
    }

    pub fn slot(&self, question_id: QuestionId) -> Result<AnswerSlot, StoreError> {
        let position = *self
            .index
            .get(&question_id)
            .ok_or(StoreError::UnknownQuestion(question_id))?;
        Ok(AnswerSlot {
            survey_id: self.survey_id,
            question_id,
            kind: self.entries[position].kind,
            position,
        })
    }

    /// Replace the value held by `slot`.
    pub fn replace(&mut self, slot: &AnswerSlot, value: AnswerValue) -> Result<(), StoreError> {
        if slot.survey_id != self.survey_id {
            return Err(StoreError::StaleSlot(slot.question_id));
        }
        let entry = self
            .entries
            .get_mut(slot.position)
            .filter(|entry| entry.id == slot.question_id)
            .ok_or(StoreError::StaleSlot(slot.question_id))?;
        if value.kind() != entry.kind {
            return Err(StoreError::KindMismatch {
                question: entry.id,
                expected: entry.kind.as_str(),
            });
        }
        tracing::trace!(question = entry.id, ?value, "answer slot updated");
        entry.values = Some(value);
        Ok(())
    }

    pub fn get(&self, question_id: QuestionId) -> Option<&UserAnswer> {
        self.index
            .get(&question_id)
            .and_then(|position| self.entries.get(*position))
    }

    /// Snapshot of every answer in question order.
    pub fn answers(&self) -> &[UserAnswer] {
        &self.entries
    }

    pub fn into_answers(self) -> Vec<UserAnswer> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{Answer, Question};

    fn survey() -> Survey {
        Survey {
            id: 1,
            title: "Store".into(),
            questions: vec![
                Question {
                    id: 10,
                    text: "Closed".into(),
                    kind: QuestionKind::Closed,
                    answers: vec![Answer {
                        id: 100,
                        text: "A".into(),
                    }],
                    min: 1,
                    max: 1,
                },
                Question {
                    id: 11,
                    text: "Open".into(),
                    kind: QuestionKind::Open,
                    answers: vec![],
                    min: 0,
                    max: 1,
                },
            ],
        }
    }

    #[test]
    fn starts_with_one_empty_entry_per_question() {
        let store = AnswerStore::for_survey(&survey()).expect("store");
        let ids: Vec<_> = store.answers().iter().map(|answer| answer.id).collect();
        assert_eq!(ids, vec![10, 11]);
        assert!(store.answers().iter().all(|answer| answer.values.is_none()));
    }

    #[test]
    fn slot_writes_only_its_own_entry() {
        let mut store = AnswerStore::for_survey(&survey()).expect("store");
        let slot = store.slot(11).expect("slot");
        store
            .replace(&slot, AnswerValue::Text("hi".into()))
            .expect("replace");
        assert_eq!(store.get(11).and_then(UserAnswer::text), Some("hi"));
        assert!(store.get(10).expect("entry").values.is_none());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn kind_mismatch_is_rejected() {
        let mut store = AnswerStore::for_survey(&survey()).expect("store");
        let slot = store.slot(10).expect("slot");
        let err = store
            .replace(&slot, AnswerValue::Text("nope".into()))
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::KindMismatch {
                question: 10,
                expected: "closed"
            }
        );
    }

    #[test]
    fn slot_from_another_survey_is_stale() {
        let mut other = survey();
        other.id = 2;
        let foreign = AnswerStore::for_survey(&other)
            .expect("store")
            .slot(10)
            .expect("slot");
        let mut store = AnswerStore::for_survey(&survey()).expect("store");
        assert_eq!(
            store.replace(&foreign, AnswerValue::Choices(vec![100])),
            Err(StoreError::StaleSlot(10))
        );
    }

    #[test]
    fn duplicate_question_ids_are_refused() {
        let mut dup = survey();
        dup.questions[1].id = 10;
        assert_eq!(
            AnswerStore::for_survey(&dup),
            Err(StoreError::DuplicateQuestion(10))
        );
    }

    #[test]
    fn unknown_question_has_no_slot() {
        let store = AnswerStore::for_survey(&survey()).expect("store");
        assert_eq!(store.slot(99), Err(StoreError::UnknownQuestion(99)));
    }
}
