pub mod base;
pub mod object;
pub mod user;

pub use base::BaseDao;
pub use object::ObjectDao;
pub use user::UserDao;
