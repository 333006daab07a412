mod r#type;
mod value;
pub mod codec;

pub use r#type::*;
pub use value::*;
