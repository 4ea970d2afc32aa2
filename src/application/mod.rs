// Application layer - the session service the console talks to.
// The ledger itself lives in `domain`; file formats live in `io`.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
