pub mod calculate;
pub mod loki;

pub use calculate::calculate;
pub use loki::loki_query;
