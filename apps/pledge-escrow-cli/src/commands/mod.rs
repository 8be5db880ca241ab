pub mod default_config;
pub mod prompt_hash;
pub mod simulate;
