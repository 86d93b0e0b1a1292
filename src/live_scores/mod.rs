pub mod api_football;
pub mod normalize;
pub mod provider;

pub use api_football::ApiFootballClient;
pub use normalize::{normalize_leagues, normalize_matches};
pub use provider::{Endpoint, FootballDataSource};
