pub mod classifier;
pub mod extractor;
pub mod feature_model;
pub mod region;
