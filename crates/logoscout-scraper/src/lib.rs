pub mod client;
pub mod error;
pub mod extract;
pub mod resolve;
pub mod score;
pub mod select;
pub mod transparency;
pub mod types;

mod retry;

pub use client::PageClient;
pub use error::ScraperError;
pub use select::{LogoSelector, SelectorLimits};
pub use transparency::{AlphaVerdict, RasterAlphaProbe, TransparencyProbe};
pub use types::{Candidate, SelectionOutcome, TagSource};
