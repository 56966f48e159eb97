pub mod locators;
pub mod login_model;
pub mod orchestrator;
