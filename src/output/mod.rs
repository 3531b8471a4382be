mod response;
mod text;

pub use response::*;
pub use text::*;
