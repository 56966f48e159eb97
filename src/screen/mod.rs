pub mod screen_model;
pub mod url;
