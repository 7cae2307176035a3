mod cos;
mod credentials;
mod error;
mod file;
mod operator;
mod oss;
mod progress;
mod provider;
mod s3;

pub use cos::*;
pub use credentials::*;
pub use error::*;
pub use file::*;
pub use operator::*;
pub use oss::*;
pub use progress::*;
pub use provider::*;
