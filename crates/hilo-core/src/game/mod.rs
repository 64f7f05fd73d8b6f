pub mod events;
pub mod round;
pub mod serialization;
pub mod settings;
pub mod store;
