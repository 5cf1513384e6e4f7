pub mod dedup;
pub mod mapper;
pub mod planner;
pub mod providers;
pub mod recommendations;
pub mod resolver;
pub mod scanner;
pub mod transport;

pub use recommendations::RecommendationEngine;
pub use transport::{HttpTransport, ReqwestTransport};
