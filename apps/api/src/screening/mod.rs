pub mod handlers;
pub mod models;
pub mod normalize;
pub mod scoring;
pub mod similarity;
pub mod skills;
pub mod store;
