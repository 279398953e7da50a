pub mod authenticator;
pub mod config;
pub mod hasher;
pub mod key;
pub mod password;
pub mod privilege;
pub mod subject;

pub use authenticator::*;
pub use self::config::*;
pub use hasher::*;
pub use key::*;
pub use password::*;
pub use privilege::*;
pub use subject::*;
