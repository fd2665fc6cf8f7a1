//! Public types for the Photoreel API.

mod photo;
mod policy;
mod slot;

pub use photo::PhotoRecord;
pub use policy::MissingSlotPolicy;
pub use slot::Slot;
