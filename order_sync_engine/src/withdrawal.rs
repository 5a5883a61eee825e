use log::*;
use marketplace_tools::SendMessageRequest;
use serde_json::Value;

use crate::{errors::WithdrawalError, inventory::SelectedInventory, traits::MessageSender};

/// A validated request to pull stock out of a branch. It is delivered as a LINE message to whoever handles
/// withdrawals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalRequest {
    pub sku: String,
    pub quantity: i64,
    pub branch_name: String,
    pub image_url: String,
}

impl WithdrawalRequest {
    /// Builds a request for `quantity` items from the named branch. The quantity must be at least one and no more than
    /// the branch currently holds.
    pub fn new(selected: &SelectedInventory, branch_name: &str, quantity: i64) -> Result<Self, WithdrawalError> {
        let branch =
            selected.item.branch(branch_name).ok_or_else(|| WithdrawalError::UnknownBranch(branch_name.to_string()))?;
        if quantity < 1 || quantity > branch.quantity {
            return Err(WithdrawalError::InvalidQuantity {
                branch: branch.branch_name.clone(),
                requested: quantity,
                available: branch.quantity,
            });
        }
        Ok(Self {
            sku: selected.item.sku.clone(),
            quantity,
            branch_name: branch.branch_name.clone(),
            image_url: selected.image_url.clone(),
        })
    }

    pub fn message(&self) -> String {
        format!("Sku: {} จำนวน {} ชิ้น จากสาขา {}", self.sku, self.quantity, self.branch_name)
    }

    pub fn to_message_request(&self, recipient: &str) -> SendMessageRequest {
        SendMessageRequest { user_id: recipient.to_string(), message: self.message(), image_url: self.image_url.clone() }
    }

    pub async fn send<M>(&self, sender: &M, recipient: Option<&str>) -> Result<Value, WithdrawalError>
    where M: MessageSender + ?Sized {
        let recipient = recipient.filter(|r| !r.trim().is_empty()).ok_or(WithdrawalError::NoRecipient)?;
        let request = self.to_message_request(recipient);
        info!("💬️ Requesting withdrawal of {} x {} from {}", self.quantity, self.sku, self.branch_name);
        sender.send_message(&request).await.map_err(|e| {
            error!("💬️ Could not send withdrawal request. {e}");
            WithdrawalError::SendFailed(e.to_string())
        })
    }
}
