use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use log::*;
use marketplace_tools::InventoryItem;

use crate::{errors::InventoryError, traits::InventorySource};

/// An inventory record together with the product image of the order line it was looked up from.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedInventory {
    pub item: InventoryItem,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InventoryOutcome {
    Found(SelectedInventory),
    NotFound { sku: String },
}

/// Runs stock lookups, one at a time.
///
/// A lookup that fails for any reason is reported as [`InventoryOutcome::NotFound`]; the failure itself is logged.
pub struct InventoryDesk<S: ?Sized> {
    source: Arc<S>,
    checking: Arc<AtomicBool>,
}

impl<S: ?Sized> Clone for InventoryDesk<S> {
    fn clone(&self) -> Self {
        Self { source: Arc::clone(&self.source), checking: Arc::clone(&self.checking) }
    }
}

impl<S: InventorySource + ?Sized> InventoryDesk<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self { source, checking: Arc::new(AtomicBool::new(false)) }
    }

    /// True while a check is running.
    pub fn is_checking(&self) -> bool {
        self.checking.load(Ordering::SeqCst)
    }

    pub async fn check(&self, sku: &str, model_sku: &str, image_url: &str) -> Result<InventoryOutcome, InventoryError> {
        let _guard = CheckGuard::acquire(&self.checking)?;
        info!("📦️ Checking stock for {sku} ({model_sku})");
        match self.source.inventory_check(sku, model_sku).await {
            Ok(items) => match items.into_iter().next() {
                Some(item) => {
                    debug!("📦️ {sku} is stocked in {} branches", item.branches.len());
                    Ok(InventoryOutcome::Found(SelectedInventory { item, image_url: image_url.to_string() }))
                },
                None => {
                    info!("📦️ No inventory record for {sku}");
                    Ok(InventoryOutcome::NotFound { sku: sku.to_string() })
                },
            },
            Err(e) => {
                error!("📦️ Failed to fetch inventory for {sku}. {e}");
                Ok(InventoryOutcome::NotFound { sku: sku.to_string() })
            },
        }
    }
}

/// Holds the in-flight flag for the duration of a check and releases it on drop, including when the check future is
/// dropped before completing.
struct CheckGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> CheckGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, InventoryError> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| InventoryError::CheckInFlight)?;
        Ok(Self { flag })
    }
}

impl Drop for CheckGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
