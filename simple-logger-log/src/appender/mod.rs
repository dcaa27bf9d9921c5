pub mod builder;

pub use builder::{Builder, InitError, SessionFile, Stage};
