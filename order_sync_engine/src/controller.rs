//! The task that keeps an [`OrderBoard`] up to date.
//!
//! [`start_board`] spawns a single task that owns the board. It fetches once with the loading state showing, then
//! silently every `poll_interval` until it is shut down. Manual refreshes can be requested at any time through the
//! returned [`BoardHandle`], including while another fetch is still running.
//!
//! Fetches run as their own tasks so the board task is never blocked on the network. Their results come back to the
//! board task, which is the only place the board is mutated. Once the board is shut down, no further results are
//! applied and any fetches still running are aborted.
use std::{collections::HashMap, sync::Arc};

use log::*;
use marketplace_tools::Order;
use tokio::{
    sync::{mpsc, oneshot, watch},
    task::{AbortHandle, Id, JoinHandle, JoinSet},
    time::{interval_at, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::{
    board::{BoardView, FetchTicket, OrderBoard, Settlement},
    config::BoardConfig,
    errors::{BoardError, FetchError},
    traits::OrderSource,
};

const COMMAND_BUFFER_SIZE: usize = 16;

pub enum BoardCommand {
    /// Fetch now, showing the loading state. If a reply channel is given, the view is sent back once this fetch has
    /// settled.
    Refresh { reply: Option<oneshot::Sender<BoardView>> },
}

#[derive(Clone)]
pub struct BoardHandle {
    commands: mpsc::Sender<BoardCommand>,
    view: watch::Receiver<BoardView>,
    cancel: CancellationToken,
}

impl BoardHandle {
    /// Requests a manual refresh and returns immediately.
    pub async fn refresh(&self) -> Result<(), BoardError> {
        self.commands.send(BoardCommand::Refresh { reply: None }).await.map_err(|_| BoardError::Closed)
    }

    /// Requests a manual refresh and waits for it to settle. The returned view reflects the outcome of this refresh,
    /// unless a newer fetch settled first.
    pub async fn refresh_and_wait(&self) -> Result<BoardView, BoardError> {
        let (tx, rx) = oneshot::channel();
        self.commands.send(BoardCommand::Refresh { reply: Some(tx) }).await.map_err(|_| BoardError::Closed)?;
        rx.await.map_err(|_| BoardError::Closed)
    }

    /// The current view.
    pub fn view(&self) -> BoardView {
        self.view.borrow().clone()
    }

    /// A receiver that is notified whenever the view changes in a way that affects what is rendered.
    pub fn subscribe(&self) -> watch::Receiver<BoardView> {
        self.view.clone()
    }

    /// Tears the board down. The recurring poll stops and results of fetches still in flight are never applied.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

type FetchResult = Result<Vec<Order>, FetchError>;

/// Starts the board task. The task runs until [`BoardHandle::shutdown`] is called or every handle has been dropped.
pub fn start_board<S>(source: Arc<S>, config: BoardConfig) -> (BoardHandle, JoinHandle<()>)
where S: OrderSource + ?Sized + 'static {
    let (command_tx, mut commands) = mpsc::channel(COMMAND_BUFFER_SIZE);
    let (view_tx, view_rx) = watch::channel(BoardView::default());
    let cancel = CancellationToken::new();
    let handle = BoardHandle { commands: command_tx, view: view_rx, cancel: cancel.clone() };
    let task = tokio::spawn(async move {
        let mut board = OrderBoard::new();
        let mut in_flight = JoinSet::<FetchResult>::new();
        let mut tickets = HashMap::<Id, FetchTicket>::new();
        let mut waiting = HashMap::<u64, oneshot::Sender<BoardView>>::new();
        let period = config.poll_interval;
        let mut timer = interval_at(Instant::now() + period, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!("🔄️ Order board started. Refreshing every {}s", period.as_secs());

        let ticket = board.begin_fetch(true);
        publish(&view_tx, &board);
        let fetch = spawn_fetch(&mut in_flight, &source);
        tickets.insert(fetch.id(), ticket);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("🔄️ Order board cancelled");
                    break;
                },
                command = commands.recv() => match command {
                    Some(BoardCommand::Refresh { reply }) => {
                        info!("🔄️ Manual refresh requested");
                        let ticket = board.begin_fetch(true);
                        if let Some(reply) = reply {
                            waiting.insert(ticket.seq, reply);
                        }
                        publish(&view_tx, &board);
                        let fetch = spawn_fetch(&mut in_flight, &source);
                        tickets.insert(fetch.id(), ticket);
                    },
                    None => {
                        debug!("🔄️ All board handles have been dropped");
                        break;
                    },
                },
                _ = timer.tick() => {
                    trace!("🔄️ Scheduled refresh");
                    let ticket = board.begin_fetch(false);
                    let fetch = spawn_fetch(&mut in_flight, &source);
                    tickets.insert(fetch.id(), ticket);
                },
                Some(joined) = in_flight.join_next_with_id(), if !in_flight.is_empty() => {
                    let (id, result) = match joined {
                        Ok((id, result)) => (id, result),
                        Err(e) => {
                            error!("🔄️ An order fetch task did not complete. {e}");
                            (e.id(), Err(FetchError::Transport("fetch task failed".to_string())))
                        },
                    };
                    let Some(ticket) = tickets.remove(&id) else {
                        warn!("🔄️ Fetch task {id} finished without a ticket");
                        continue;
                    };
                    if cancel.is_cancelled() {
                        debug!("🔄️ Board was torn down. Dropping result of fetch #{}", ticket.seq);
                        break;
                    }
                    log_settlement(ticket, &board.settle(ticket, result));
                    publish(&view_tx, &board);
                    if let Some(reply) = waiting.remove(&ticket.seq) {
                        let _ = reply.send(board.view().clone());
                    }
                },
            }
        }
        in_flight.abort_all();
        info!("🔄️ Order board stopped");
    });
    (handle, task)
}

fn spawn_fetch<S>(in_flight: &mut JoinSet<FetchResult>, source: &Arc<S>) -> AbortHandle
where S: OrderSource + ?Sized + 'static {
    let source = Arc::clone(source);
    in_flight.spawn(async move { source.fetch_orders().await })
}

/// Stores the board's current view, notifying subscribers only if something visible changed.
fn publish(view_tx: &watch::Sender<BoardView>, board: &OrderBoard) {
    let next = board.view();
    view_tx.send_if_modified(|current| {
        let changed = current.differs_from(next);
        *current = next.clone();
        changed
    });
}

fn log_settlement(ticket: FetchTicket, settlement: &Settlement) {
    match settlement {
        Settlement::Replaced => info!("🔄️ Fetch #{} brought a new order list", ticket.seq),
        Settlement::Unchanged => debug!("🔄️ Fetch #{}: no changes", ticket.seq),
        Settlement::Failed(e) => warn!("🔄️ Fetch #{} failed. {e}", ticket.seq),
        Settlement::Stale => debug!("🔄️ Fetch #{} was superseded", ticket.seq),
    }
}
