pub mod executor;

pub use executor::{DbHandle, Param, Row, Value};
