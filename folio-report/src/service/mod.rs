//! Service layer
//!
//! Services sit at the edge between a report run and the environment hosting
//! it. They are trait-based so runs can be tested without touching a real
//! presentation environment.

mod delivery;

// Re-export traits
pub use delivery::ArtifactDelivery;

// Re-export implementations
pub use delivery::{CollisionPolicy, DeliveryReceipt, FileDelivery, sanitize_file_name};
