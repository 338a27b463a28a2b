// Export all route modules
pub mod articles;
pub mod categories;

pub use articles::*;
pub use categories::*;
