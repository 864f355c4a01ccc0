pub mod engine;
pub mod highlight;
