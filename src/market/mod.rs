pub mod filters;
pub mod grouping;
pub mod models;
pub mod sports;
pub mod ticker;

pub use filters::{apply_filters, MarketFilter};
pub use grouping::{group_by_event, group_markets_by_game, GameGroup};
pub use models::MarketSnapshot;
pub use sports::{is_sports_market, sport_for_event, Sport};
