//! Service layer - session and watchlist orchestration
//!
//! Each service owns one piece of state and exposes a read-only snapshot
//! plus a narrow mutation API. Services reach the outside world only
//! through the ports.

pub mod logging;
mod session;
mod view_filter;
mod wallets;

pub use logging::{EntryPoint, EventCount, LogEntry, LogEvent, LogQuery, LoggingService};
pub use session::SessionManager;
pub use view_filter::{filter_wallets, FilteredView, ViewFilter};
pub use wallets::WalletStore;
