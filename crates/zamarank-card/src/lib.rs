//! PNG summary card for a [`NormalizedProfile`](zamarank_core::NormalizedProfile).

pub mod background;
pub mod error;
pub mod font;
pub mod render;

pub use background::Background;
pub use error::CardError;
pub use render::{format_mindshare, format_rank, render_card, CARD_HEIGHT, CARD_WIDTH};
