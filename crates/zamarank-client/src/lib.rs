pub mod aggregate;
pub mod client;
pub mod error;
pub mod matcher;
pub mod timeframe;
pub mod types;

pub use client::{ZamaClient, ZamaClientConfig};
pub use error::ZamaError;
pub use matcher::find_user_row;
pub use types::{LeaderboardRow, PageShape, SeasonalDocument, SeasonalResult};
