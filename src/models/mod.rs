//! Data structures shared between the database layer, the JSON API and the
//! page handlers: row types, request payloads and response shapes.

pub mod profile;
pub mod session;
pub mod skill;
pub mod stats;
pub mod user;

pub use profile::*;
pub use session::*;
pub use skill::*;
pub use stats::*;
pub use user::*;
