pub mod dataset;
pub mod distance;
pub mod location;
pub mod parser;
pub mod pipeline;
pub mod ranking;
pub mod render;
