use log::info;

use crate::config::MintConfig;
use crate::error::PurchaseError;
use crate::issuer::{AccountProvider, ContractCall, IssueDispatcher};
use crate::pricing::Price;
use crate::state::Selection;

/// The pending purchase shown after a drag ends.
///
/// Holds its own copy of the selection; nothing here mutates it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PurchaseDialog {
    selection: Selection,
    price: Price,
}

impl PurchaseDialog {
    pub fn open(selection: Selection, unit_price: Price) -> Self {
        Self {
            selection,
            price: Price::for_cells(selection.cell_count(), unit_price),
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn cell_count(&self) -> usize {
        self.selection.cell_count()
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn summary(&self) -> String {
        let unit = if self.cell_count() == 1 { "cell" } else { "cells" };
        format!("Price: {} ETH for {} {}", self.price, self.cell_count(), unit)
    }

    pub fn can_confirm(&self, account: &dyn AccountProvider) -> bool {
        account.address().is_some()
    }

    /// Hand the mint call to the dispatcher. Returns the call that was sent.
    ///
    /// Does not wait for the issuer; its outcome arrives on the dispatcher's channel.
    pub fn confirm(
        &self,
        account: &dyn AccountProvider,
        config: &MintConfig,
        dispatcher: &IssueDispatcher,
    ) -> Result<ContractCall, PurchaseError> {
        let address = account.address().ok_or(PurchaseError::NoAccount)?;
        let call = ContractCall::mint(config, &address, &self.selection);
        info!(
            "minting {} ({} cells, {} ETH) via {}",
            self.selection.range_label(),
            self.cell_count(),
            self.price(),
            call.entrypoint
        );
        dispatcher.dispatch(call.clone());
        Ok(call)
    }
}
