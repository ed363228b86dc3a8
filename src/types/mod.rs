//! Shared data types for decoded readings

pub mod reading;

pub use reading::{FrameFields, InfoFields, Reading, ReadingContext, TempHumidityFields};
