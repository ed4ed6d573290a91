pub mod application;
pub mod menu;
pub mod welcome;

// Modular workflow modules
pub mod board_list;
pub mod flash;

// Unified message system
pub mod messages;

pub use application::MeshFlasher;
pub use messages::Message;
