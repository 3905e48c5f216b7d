use crate::spec::Question;

/// Result of an edit on a [`QuestionList`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Moved { from: usize, to: usize },
    Removed(Question),
    Unchanged,
}

/// Ordered, editable list of questions for a draft survey.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionList {
    questions: Vec<Question>,
}

impl QuestionList {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn push(&mut self, question: Question) {
        self.questions.push(question);
    }

    pub fn can_move_up(&self, position: usize) -> bool {
        position != 0 && position < self.questions.len()
    }

    pub fn can_move_down(&self, position: usize) -> bool {
        position + 1 < self.questions.len()
    }

    /// Swap the question at `position` with the one above it.
    pub fn move_up(&mut self, position: usize) -> EditOutcome {
        if !self.can_move_up(position) {
            return EditOutcome::Unchanged;
        }
        self.questions.swap(position - 1, position);
        EditOutcome::Moved {
            from: position,
            to: position - 1,
        }
    }

    /// Swap the question at `position` with the one below it.
    pub fn move_down(&mut self, position: usize) -> EditOutcome {
        if !self.can_move_down(position) {
            return EditOutcome::Unchanged;
        }
        self.questions.swap(position, position + 1);
        EditOutcome::Moved {
            from: position,
            to: position + 1,
        }
    }

    pub fn remove(&mut self, position: usize) -> EditOutcome {
        if position >= self.questions.len() {
            return EditOutcome::Unchanged;
        }
        EditOutcome::Removed(self.questions.remove(position))
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn into_questions(self) -> Vec<Question> {
        self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
