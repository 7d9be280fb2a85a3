use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizKind {
    /// One correct answer per question, worth a point.
    Standard,
    /// Every answer is rated; good adds a point, bad takes one away.
    GoodNeutralBad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerRating {
    Good,
    #[default]
    Neutral,
    Bad,
}

impl AnswerRating {
    fn points(self) -> i32 {
        match self {
            AnswerRating::Good => 1,
            AnswerRating::Neutral => 0,
            AnswerRating::Bad => -1,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question: String,
    pub answers: Vec<String>,
    #[serde(default)]
    pub correct_answer_index: Option<usize>,
    #[serde(default)]
    pub ratings: Vec<AnswerRating>,
}

impl Question {
    fn points_for(&self, kind: QuizKind, answer_index: usize) -> i32 {
        match kind {
            QuizKind::Standard => i32::from(self.correct_answer_index == Some(answer_index)),
            QuizKind::GoodNeutralBad => self
                .ratings
                .get(answer_index)
                .copied()
                .unwrap_or_default()
                .points(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Quiz {
    kind: QuizKind,
    questions: Vec<Question>,
    score: i32,
    question_index: usize,
}

impl Quiz {
    pub fn new(kind: QuizKind, questions: Vec<Question>) -> Self {
        Self {
            kind,
            questions,
            score: 0,
            question_index: 0,
        }
    }

    pub fn from_json(kind: QuizKind, json: &str) -> Result<Self, serde_json::Error> {
        let questions: Vec<Question> = serde_json::from_str(json)?;
        Ok(Self::new(kind, questions))
    }

    pub fn kind(&self) -> QuizKind {
        self.kind
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.question_index)
    }

    /// Scores the answer to the current question and moves on. Answers
    /// submitted after the last question are ignored.
    pub fn submit_answer(&mut self, answer_index: usize) {
        let Some(question) = self.current_question() else {
            return;
        };
        let points = question.points_for(self.kind, answer_index);
        self.score += points;
        self.question_index += 1;
    }

    pub fn is_ended(&self) -> bool {
        self.question_index >= self.questions.len()
    }

    pub fn reset(&mut self) {
        self.score = 0;
        self.question_index = 0;
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }
}
