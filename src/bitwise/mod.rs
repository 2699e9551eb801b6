// Low-level field access for fixed-layout binary structures.

pub mod bcd;
pub mod element;

pub use bcd::{BcdError, decode_be, decode_le, encode_be, encode_le};
pub use element::Element;
