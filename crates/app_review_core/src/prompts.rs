//! crates/app_review_core/src/prompts.rs
//!
//! The curated example questions offered before the first question is asked.

/// A clickable example: the short label shown, and the question submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExampleQuestion {
    pub label: &'static str,
    pub question: &'static str,
}

pub static EXAMPLE_QUESTIONS: [ExampleQuestion; 3] = [
    ExampleQuestion {
        label: "What are the most common topics since 2023?",
        question: "What are the top 10 topics since 2023-01-01?",
    },
    ExampleQuestion {
        label: "What is the average rating of reviews since 2023?",
        question: "What is the average rating of reviews since 2023-01-01?",
    },
    ExampleQuestion {
        label: "What do customer say regarding login issues?",
        question: "What do customer say regarding login issues?",
    },
];

/// Looks up an example by its 1-based position in the list.
pub fn example(position: usize) -> Option<&'static ExampleQuestion> {
    position
        .checked_sub(1)
        .and_then(|index| EXAMPLE_QUESTIONS.get(index))
}
