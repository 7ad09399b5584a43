mod category;
mod ids;
mod question;
mod result;
mod specimen;

pub use ids::{CategoryId, ParseIdError};

pub use category::{Category, Difficulty, ParseDifficultyError, slugify};
pub use question::{Question, QuestionError};
pub use result::{ActivityType, ParseActivityTypeError, QuizResult, ResultError};
pub use specimen::{AnimalFacts, Characteristics, Specimen, Taxonomy};
