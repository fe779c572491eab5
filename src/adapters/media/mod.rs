//! Asset host adapters.

mod cloudinary;

pub use cloudinary::{CloudinaryConfig, CloudinaryMediaStorage};
