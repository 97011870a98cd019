pub mod config;
pub mod error;
pub mod event;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod sanitize;
pub mod state;

pub use event::InvocationEvent;
pub use handlers::{ChatDetailHandler, ChatListHandler};
pub use response::InvocationResponse;
