pub mod backup;
pub mod config;
pub mod error;
pub mod hasher;
pub mod progress;
pub mod remote;
pub mod scanner;
pub mod sweep;
pub mod verifier;

pub use config::AppConfig;
pub use error::Error;
pub use progress::{SilentReporter, SweepReporter};
pub use remote::{RemoteHashes, RemoteItem, SearchBackend};
pub use sweep::{FileOutcome, SweepEngine, SweepResult};
pub use verifier::{Rejection, Verdict, Verifier};
