pub mod object;
pub mod user;

pub use object::*;
pub use user::*;
