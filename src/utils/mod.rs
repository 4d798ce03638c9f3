pub mod text;
pub mod unique_value;

pub use unique_value::UniqueValue;
