pub mod http;
pub mod pipeline;
pub mod stage;
pub mod subsystems;
