//! Ground values are what binding cells eventually hold.  The engine
//! only ever compares them for equality and checks their type against
//! a parameter's declared type, so the value model is a small closed
//! union rather than an open, reflective one.

mod value;

pub use value::FromValue;
pub use value::Value;
pub use value::ValueType;
