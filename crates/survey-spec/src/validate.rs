use crate::answers::{UserAnswer, ValidationError};
use crate::spec::{Question, QuestionKind};

/// Check the current answers against every question's minimum.
///
/// Questions are matched to answers by position; a missing answer counts as
/// unanswered. An empty result means the survey is complete.
pub fn validate(questions: &[Question], answers: &[UserAnswer]) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (index, question) in questions.iter().enumerate() {
        let answer = answers.get(index);
        let number = index + 1;
        match question.kind {
            QuestionKind::Closed => {
                let given = answer.map(UserAnswer::selected_count).unwrap_or(0);
                if given < question.min {
                    errors.push(ValidationError {
                        index,
                        question_id: question.id,
                        message: format!(
                            "Question {} require {} answers, {} were given",
                            number, question.min, given
                        ),
                        code: "min_answers".into(),
                    });
                }
            }
            QuestionKind::Open => {
                if question.min > 0 && answer.is_none_or(UserAnswer::is_blank) {
                    errors.push(ValidationError {
                        index,
                        question_id: question.id,
                        message: format!("Question {} require an answer", number),
                        code: "required".into(),
                    });
                }
            }
        }
    }

    errors
}
