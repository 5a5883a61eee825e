//! Order Sync Engine
//!
//! The engine keeps a local, sorted copy of the marketplace order list in step with the order backend. It is
//! backend-agnostic: anything implementing [`OrderSource`] can feed it, and [`marketplace_tools::MarketplaceApi`] does
//! so out of the box.
//!
//! The library is divided into a few parts:
//! 1. Pure list handling. [`sorter`] puts a freshly fetched list into display order and [`reconciler`] decides whether
//!    it differs enough from the displayed list to replace it.
//! 2. The [`board`], which holds the displayed list, the loading and error states, and the fetch sequencing rules.
//! 3. The [`controller`], a task that drives the board: an initial fetch, a recurring background poll, manual
//!    refreshes on request, and teardown.
//! 4. Stock tools for individual order lines: [`inventory`] lookups and [`withdrawal`] requests sent over LINE.
pub mod board;
pub mod config;
pub mod controller;
pub mod errors;
pub mod inventory;
pub mod reconciler;
pub mod sorter;
pub mod traits;
pub mod withdrawal;

pub use board::{BoardStatus, BoardView, OrderBoard};
pub use config::BoardConfig;
pub use controller::{start_board, BoardHandle};
pub use errors::{BoardError, FetchError, InventoryError, WithdrawalError};
pub use inventory::{InventoryDesk, InventoryOutcome, SelectedInventory};
pub use reconciler::{reconcile, OrderList};
pub use sorter::sort_orders;
pub use traits::{InventorySource, MessageSender, OrderSource};
pub use withdrawal::WithdrawalRequest;
