use std::sync::Arc;

use anyhow::{anyhow, Result};
use log::*;
use marketplace_tools::MarketplaceApi;
use order_sync_engine::{
    start_board,
    InventoryDesk,
    InventoryOutcome,
    OrderBoard,
    OrderSource,
    WithdrawalRequest,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{
    cli::ItemArgs,
    interactive::formatting::{format_board, format_inventory_outcome},
    profile_manager::Settings,
};

/// Fetches the order list once and renders it.
pub async fn print_orders(settings: Settings) -> Result<String> {
    let api = MarketplaceApi::new(settings.marketplace)?;
    let mut board = OrderBoard::new();
    let ticket = board.begin_fetch(true);
    let result = api.fetch_orders().await;
    if let Err(e) = &result {
        error!("🔄️ Could not fetch orders. {e}");
    }
    board.settle(ticket, result);
    Ok(format_board(board.view()))
}

/// Keeps the order list on screen, redrawing it whenever it changes. Reads `r` (refresh) and `q` (quit) from stdin.
pub async fn watch_orders(settings: Settings) -> Result<()> {
    let api = Arc::new(MarketplaceApi::new(settings.marketplace)?);
    let (board, task) = start_board(api, settings.board);
    let mut updates = board.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("Watching orders from {}. Type r to refresh or q to quit.", settings.name);
    println!("{}", format_board(&board.view()));
    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = updates.borrow_and_update().clone();
                println!("{}", format_board(&view));
            },
            line = lines.next_line() => match line?.as_deref().map(str::trim) {
                Some("r") => board.refresh().await?,
                Some("q") | None => break,
                Some("") => {},
                Some(other) => println!("Unknown command '{other}'. Type r to refresh or q to quit."),
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    board.shutdown();
    task.await?;
    Ok(())
}

pub async fn print_inventory(settings: Settings, item: ItemArgs) -> Result<String> {
    let desk = InventoryDesk::new(Arc::new(MarketplaceApi::new(settings.marketplace)?));
    let outcome = desk.check(&item.sku, &item.model_sku, item.image.as_deref().unwrap_or_default()).await?;
    format_inventory_outcome(&outcome)
}

/// Looks up the item, checks the requested quantity against the branch's stock and sends the withdrawal request.
pub async fn withdraw(settings: Settings, item: ItemArgs, branch: &str, quantity: i64) -> Result<String> {
    let api = Arc::new(MarketplaceApi::new(settings.marketplace.clone())?);
    let desk = InventoryDesk::new(Arc::clone(&api));
    let selected = match desk.check(&item.sku, &item.model_sku, item.image.as_deref().unwrap_or_default()).await? {
        InventoryOutcome::Found(selected) => selected,
        InventoryOutcome::NotFound { sku } => return Err(anyhow!("No inventory found for {sku}")),
    };
    let request = WithdrawalRequest::new(&selected, branch, quantity)?;
    request.send(api.as_ref(), settings.marketplace.line_recipient.as_deref()).await?;
    Ok(format!("Withdrawal request sent: {}", request.message()))
}
