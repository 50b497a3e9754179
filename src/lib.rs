//! tellernode: wallet session + transaction lifecycle for one contract.
//!
//! The coordinator behind a single-page teller: connect a browser-injected
//! wallet, read the contract balance, run deposits and withdrawals through
//! their full confirmation lifecycle, and keep a session-local, filterable
//! history. All state-changing work is delegated to the wallet provider
//! and the contract; nothing persists past the page session.
//!
//! # Architecture
//!
//! ```text
//! Teller (facade)
//!   │
//!   ├── Session ── Disconnected → Connecting → Connected
//!   │       └── WalletProvider (injected; EIP-1193 in the browser)
//!   │               └── AtmContract (bound once per session)
//!   │
//!   ├── BalanceOracle ── wide chain value → display integer, cached
//!   │
//!   ├── TransactionExecutor ── submit → pending → confirmed
//!   │       │                   → refresh → record, one in flight
//!   │       └── Mood (cosmetic side output)
//!   │
//!   └── HistoryLedger ── append-only ──► HistoryFilter projection
//! ```
//!
//! # Features
//!
//! - `native` - tokio runtime + tracing subscriber (tests, embedding)
//! - `wasm` - browser bindings (`TellerPage`) + EIP-1193 adapter
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use tellernode::{Teller, TellerConfig};
//!
//! let teller = Teller::new(TellerConfig::default())?
//!     .with_provider(Arc::new(provider));
//! let account = teller.connect().await?;
//! let outcome = teller.deposit(5, "payday").await?;
//! println!("{} -> {}", account, outcome.new_balance);
//! ```

// =============================================================================
// Shared modules (compile everywhere)
// =============================================================================
pub mod chain;
pub mod core;
pub mod error;
pub mod executor;
pub mod history;
pub mod oracle;
pub mod provider;
pub mod session;
pub mod teller;

// =============================================================================
// Native-only modules
// =============================================================================
#[cfg(feature = "native")]
pub mod logging;

// =============================================================================
// WASM-only modules (browser, wasm-bindgen)
// =============================================================================
#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub mod wasm;

// =============================================================================
// Re-exports
// =============================================================================
pub use chain::{AtmContract, PendingTx};
pub use error::{TellerError, TellerResult};
pub use executor::{AmountRange, Mood, Outcome, TransactionExecutor};
pub use history::{project, Action, HistoryEntry, HistoryFilter, HistoryLedger};
pub use oracle::BalanceOracle;
pub use provider::WalletProvider;
pub use session::{Phase, Session};
pub use teller::{Teller, TellerConfig, DEFAULT_CONTRACT_ADDRESS};

#[cfg(feature = "native")]
pub use logging::init_logging;

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub use wasm::TellerPage;
