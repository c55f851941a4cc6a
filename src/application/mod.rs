pub mod token_data;

pub use token_data::{
    QuoteInScenario, QuoteScenario, ResolvedToken, ScenarioAmount, TokenDataError,
    TokenDataProvider, TokenPair,
};
