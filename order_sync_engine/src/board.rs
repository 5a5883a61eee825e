//! The state behind the order dashboard.
//!
//! [`OrderBoard`] owns the displayed order list and the view status. It knows nothing about timers or tasks; the
//! controller drives it by asking for a [`FetchTicket`] before every fetch and handing the result back through
//! [`OrderBoard::settle`].
//!
//! Tickets are numbered in the order fetches were started. A result is only applied if no newer fetch has already
//! been settled, so a slow request can never overwrite fresher data.
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::*;
use marketplace_tools::Order;

use crate::{
    errors::FetchError,
    reconciler::{reconcile, OrderList},
    sorter::sort_orders,
};

/// A snapshot of everything the dashboard renders.
#[derive(Debug, Clone)]
pub struct BoardView {
    pub orders: OrderList,
    pub loading: bool,
    pub error: Option<FetchError>,
    /// When the order list was last fetched successfully, whether or not it changed.
    pub last_updated: Option<DateTime<Utc>>,
    /// Incremented every time `orders` is replaced.
    pub revision: u64,
}

impl Default for BoardView {
    fn default() -> Self {
        Self { orders: Arc::from(Vec::<Order>::new()), loading: false, error: None, last_updated: None, revision: 0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardStatus {
    Loading,
    Failed,
    Empty,
    Ready,
}

impl BoardView {
    /// Loading wins over an error, and an error wins over whatever list is currently held.
    pub fn status(&self) -> BoardStatus {
        if self.loading {
            BoardStatus::Loading
        } else if self.error.is_some() {
            BoardStatus::Failed
        } else if self.orders.is_empty() {
            BoardStatus::Empty
        } else {
            BoardStatus::Ready
        }
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// True if the two views would render differently. `last_updated` is ignored, so a background poll that changes
    /// nothing does not count as a change.
    pub fn differs_from(&self, other: &BoardView) -> bool {
        self.revision != other.revision || self.loading != other.loading || self.error != other.error
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    /// Whether the fetch shows the loading state while it runs.
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    /// The fetched list differed from the displayed one and replaced it.
    Replaced,
    /// The fetched list was equivalent to the displayed one, which was kept.
    Unchanged,
    Failed(FetchError),
    /// A newer fetch had already been settled. The result was discarded.
    Stale,
}

#[derive(Debug, Default)]
pub struct OrderBoard {
    view: BoardView,
    last_issued: u64,
    last_settled: u64,
    loading_ticket: Option<u64>,
}

impl OrderBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &BoardView {
        &self.view
    }

    /// Registers a new fetch. Visible fetches switch the board into the loading state and clear any error.
    pub fn begin_fetch(&mut self, show_loading: bool) -> FetchTicket {
        self.last_issued += 1;
        let ticket = FetchTicket { seq: self.last_issued, visible: show_loading };
        if show_loading {
            self.loading_ticket = Some(ticket.seq);
            self.view.loading = true;
            self.view.error = None;
        }
        trace!("🔄️ Fetch #{} started (visible: {show_loading})", ticket.seq);
        ticket
    }

    pub fn settle(&mut self, ticket: FetchTicket, result: Result<Vec<Order>, FetchError>) -> Settlement {
        // A result from the latest visible fetch, or a newer one, ends the loading state
        if self.loading_ticket.is_some_and(|t| ticket.seq >= t) {
            self.loading_ticket = None;
            self.view.loading = false;
        }
        if ticket.seq <= self.last_settled {
            debug!(
                "🔄️ Discarding result of fetch #{}. Fetch #{} has already been applied",
                ticket.seq, self.last_settled
            );
            return Settlement::Stale;
        }
        self.last_settled = ticket.seq;
        match result {
            Ok(orders) => {
                let incoming: OrderList = sort_orders(orders).into();
                let current = Arc::clone(&self.view.orders);
                let kept = reconcile(current, incoming);
                self.view.error = None;
                self.view.last_updated = Some(Utc::now());
                if Arc::ptr_eq(&kept, &self.view.orders) {
                    Settlement::Unchanged
                } else {
                    self.view.orders = kept;
                    self.view.revision += 1;
                    Settlement::Replaced
                }
            },
            Err(e) => {
                self.view.error = Some(e.clone());
                Settlement::Failed(e)
            },
        }
    }
}

#[cfg(test)]
mod test {
    use marketplace_tools::OrderNumber;

    use super::*;

    fn order(number: i64, status: &str, create_time: i64) -> Order {
        Order {
            order_number: OrderNumber::Number(number),
            status: status.into(),
            create_time: Some(create_time),
            ..Default::default()
        }
    }

    fn transport_error() -> FetchError {
        FetchError::Transport("connection refused".into())
    }

    #[test]
    fn initial_load() {
        let mut board = OrderBoard::new();
        assert_eq!(board.view().status(), BoardStatus::Empty);
        let ticket = board.begin_fetch(true);
        assert_eq!(board.view().status(), BoardStatus::Loading);
        let result = board.settle(ticket, Ok(vec![order(1, "pending", 10), order(2, "pending", 20)]));
        assert_eq!(result, Settlement::Replaced);
        let view = board.view();
        assert_eq!(view.status(), BoardStatus::Ready);
        assert_eq!(view.revision, 1);
        assert!(view.last_updated.is_some());
        // Sorted newest first
        assert_eq!(view.orders[0].order_number, OrderNumber::Number(2));
    }

    #[test]
    fn empty_response_is_an_explicit_state() {
        let mut board = OrderBoard::new();
        let ticket = board.begin_fetch(true);
        assert_eq!(board.settle(ticket, Ok(vec![])), Settlement::Unchanged);
        assert_eq!(board.view().status(), BoardStatus::Empty);
        assert!(board.view().last_updated.is_some());
    }

    #[test]
    fn silent_fetches_keep_equivalent_lists() {
        let mut board = OrderBoard::new();
        let t = board.begin_fetch(true);
        board.settle(t, Ok(vec![order(1, "pending", 10)]));
        let before = Arc::clone(&board.view().orders);
        let t = board.begin_fetch(false);
        assert!(!board.view().loading);
        let mut changed_price = order(1, "pending", 10);
        changed_price.total_price = "999".into();
        assert_eq!(board.settle(t, Ok(vec![changed_price])), Settlement::Unchanged);
        assert!(Arc::ptr_eq(&before, &board.view().orders));
        assert_eq!(board.view().revision, 1);
    }

    #[test]
    fn failures_keep_the_previous_list() {
        let mut board = OrderBoard::new();
        let t = board.begin_fetch(true);
        board.settle(t, Ok(vec![order(1, "pending", 10)]));
        let t = board.begin_fetch(false);
        assert_eq!(board.settle(t, Err(transport_error())), Settlement::Failed(transport_error()));
        let view = board.view();
        assert_eq!(view.status(), BoardStatus::Failed);
        assert_eq!(view.orders.len(), 1);
    }

    #[test]
    fn visible_fetch_clears_the_error() {
        let mut board = OrderBoard::new();
        let t = board.begin_fetch(true);
        board.settle(t, Err(transport_error()));
        assert_eq!(board.view().status(), BoardStatus::Failed);
        let t = board.begin_fetch(true);
        assert!(board.view().error.is_none());
        assert_eq!(board.view().status(), BoardStatus::Loading);
        board.settle(t, Ok(vec![order(5, "pending", 1)]));
        assert_eq!(board.view().status(), BoardStatus::Ready);
    }

    #[test]
    fn successful_silent_fetch_clears_the_error() {
        let mut board = OrderBoard::new();
        let t = board.begin_fetch(true);
        board.settle(t, Err(transport_error()));
        let t = board.begin_fetch(false);
        // The error is still showing while the silent fetch runs
        assert_eq!(board.view().status(), BoardStatus::Failed);
        board.settle(t, Ok(vec![]));
        assert_eq!(board.view().status(), BoardStatus::Empty);
    }

    #[test]
    fn late_results_are_discarded() {
        let mut board = OrderBoard::new();
        let first = board.begin_fetch(true);
        let second = board.begin_fetch(true);
        assert_eq!(board.settle(second, Ok(vec![order(2, "shipped", 10)])), Settlement::Replaced);
        assert!(!board.view().loading);
        assert_eq!(board.settle(first, Ok(vec![order(1, "pending", 10)])), Settlement::Stale);
        assert_eq!(board.view().orders[0].order_number, OrderNumber::Number(2));
        // A late failure is discarded too
        let third = board.begin_fetch(false);
        let fourth = board.begin_fetch(false);
        board.settle(fourth, Ok(vec![order(2, "shipped", 10)]));
        assert_eq!(board.settle(third, Err(transport_error())), Settlement::Stale);
        assert!(board.view().error.is_none());
    }

    #[test]
    fn loading_lasts_until_the_latest_visible_fetch_settles() {
        let mut board = OrderBoard::new();
        let first = board.begin_fetch(true);
        let second = board.begin_fetch(true);
        board.settle(first, Ok(vec![order(1, "pending", 10)]));
        assert!(board.view().loading);
        board.settle(second, Ok(vec![order(1, "pending", 10)]));
        assert!(!board.view().loading);
    }

    #[test]
    fn views_differ_only_on_visible_changes() {
        let a = BoardView::default();
        let mut b = a.clone();
        b.last_updated = Some(Utc::now());
        assert!(!a.differs_from(&b));
        b.loading = true;
        assert!(a.differs_from(&b));
    }
}
