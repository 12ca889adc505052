mod application;
mod authorization;
mod organization;
mod session;
mod token;
mod user;

pub use application::*;
pub use authorization::*;
pub use organization::*;
pub use session::*;
pub use token::*;
pub use user::*;
