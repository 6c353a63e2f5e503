pub mod classify;
pub mod error;
pub mod manager;
pub mod state;

pub use classify::{classify_title, display_attributes, LineKind};
pub use error::CartError;
pub use manager::{AddonSubmission, CartManager, FrameSubmission};
pub use state::{CartState, DisplayItem, JsonFileStore, MemoryStore, StateStore};
