mod field;
mod subscribe;
pub use field::*;
pub use subscribe::*;
