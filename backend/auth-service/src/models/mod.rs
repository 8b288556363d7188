pub mod user;

pub use user::{User, ROLE_CUSTOMER};
