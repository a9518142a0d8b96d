//! Answer generation: prompt construction, composition, citation formatting

pub mod citation;
pub mod composer;
pub mod prompt;

pub use composer::AnswerComposer;
pub use prompt::PromptBuilder;
