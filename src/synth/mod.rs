pub mod synthesizer;
pub mod templates;
pub mod test_case;
pub mod workflow;
