//! Thunder wallet client.
//!
//! REST wrappers for the Thunder backend (`api`) and headless view-models
//! for the wallet's screens (`screens`), plus the configuration, logging and
//! session plumbing the `thunder` binary is built from.

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod screens;
pub mod session;

pub use api::{ThunderClient, TransferService, UserService, WalletService};
pub use config::AppConfig;
pub use error::{ClientError, ClientResult};
pub use session::{BearerToken, FileTokenStore, MemoryTokenStore, TokenStore};
