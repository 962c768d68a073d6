pub mod save_prompt;
pub mod status;
