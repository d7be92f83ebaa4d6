mod error;
mod handlers;
pub mod middleware;
mod server;

pub use error::ApiError;
pub use handlers::{ChatReply, ChatRequest, chat_handler, health_handler};
pub use server::{AppState, ChatServer, create_router};
