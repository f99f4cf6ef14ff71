pub mod error;
pub mod models;
pub mod outcome;
pub mod types;

pub use error::{Error, Result};
pub use models::{SentimentModel, SummarizationModel};
pub use outcome::OperationOutcome;
pub use types::{
    AnalysisRequest, SentimentResult, SummarizationRequest, SummaryParams, SummaryResult,
};
