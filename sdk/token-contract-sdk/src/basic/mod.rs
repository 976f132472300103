pub mod actions;
pub mod submit;
pub mod token;
