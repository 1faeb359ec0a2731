//! Core domain entities
//!
//! Pure data structures with presence checks - no I/O or external
//! dependencies.

mod filter;
mod session;
mod user;
mod wallet;
pub mod result;

pub use filter::{FilterCriteria, RiskFilter};
pub use session::{Guard, Navigation, Session, SessionStatus};
pub use user::Identity;
pub use wallet::{Draft, RiskLevel, Wallet, WalletId, DEFAULT_CHAIN, KNOWN_CHAINS};
