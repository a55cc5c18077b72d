// ============================================================
// Layer 3 - Domain Layer
// ============================================================
// Plain Rust structs and traits describing what the trainer
// works on. No Burn types, no file I/O, no tensor code.
//
//   image.rs  - an in-memory, channel-first pixel array
//   traits.rs - the ImageSource abstraction the data layer
//               implements
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// A decoded image, ready to be wrapped in a dataset
pub mod image;

// Core abstractions (traits) that other layers implement
pub mod traits;
