pub mod health;
pub mod structure;
pub mod content;

pub use health::health_handler;
pub use structure::structure_handler;
pub use content::content_handler;
