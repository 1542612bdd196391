/// X Auto Poster Library
///
/// Core functionality for the scheduled tweet bot: the deterministic
/// rotation selector, prompt construction, the Gemini generation client,
/// the X posting client, and configuration.

pub mod config;
pub mod generate;
pub mod poster;
pub mod prompts;
pub mod rotation;
