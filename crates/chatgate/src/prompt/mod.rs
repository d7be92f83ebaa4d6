//! Prompt construction: fixed instructions, conversation turns, and history bounding

mod assembly;
mod instructions;
mod turn;

pub use assembly::{assemble_prompt, bound_history};
pub use instructions::SYSTEM_INSTRUCTIONS;
pub use turn::{Role, Turn};
