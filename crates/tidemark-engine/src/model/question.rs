use super::Item;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub text: String,
}

/// An ordered run of questions under an optional plain-text title.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuestionGroup {
    pub title: Option<String>,
    pub questions: Vec<Item<Question>>,
}
