//! Data models organized by type.

pub mod claims;
pub mod requests;
pub mod responses;
pub mod thread;
pub mod user;

pub use claims::*;
pub use requests::*;
pub use responses::*;
pub use thread::*;
pub use user::*;
