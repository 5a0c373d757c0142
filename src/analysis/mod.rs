pub mod classify;
pub mod edge;
pub mod estimate;
pub mod market_analysis;

pub use classify::{adjust_confidence, classify_sentiment, Confidence, Sentiment};
pub use edge::{calc_edge, calc_ev, calc_roi};
pub use estimate::{
    extract_tag, normalize_probabilities, parse_edge_block, parse_recommendation, parse_response,
    EstimateError, NormalizedProbabilities, ParsedResponse, ProbabilityEstimate,
};
pub use market_analysis::{build_market_analysis, MarketAnalysis};
