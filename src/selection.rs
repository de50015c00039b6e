//! Drag-to-select state machine for the mint grid.
//!
//! Pointer-down on a cell starts a drag, entering cells while dragging grows
//! the rectangle from the anchor, and pointer-up opens the purchase dialog.
//! Confirm and cancel both return to [`Phase::Idle`].

use log::debug;

use crate::config::MintConfig;
use crate::dialog::PurchaseDialog;
use crate::error::PurchaseError;
use crate::issuer::{AccountProvider, ContractCall, IssueDispatcher};
use crate::pricing::Price;
use crate::state::{CellPosition, Selection};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Dragging {
        anchor: CellPosition,
        cursor: CellPosition,
    },
    DialogOpen(PurchaseDialog),
}

#[derive(Clone, Debug)]
pub struct SelectionController {
    phase: Phase,
    unit_price: Price,
}

impl SelectionController {
    pub fn new(unit_price: Price) -> Self {
        Self {
            phase: Phase::Idle,
            unit_price,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging { .. })
    }

    pub fn dialog(&self) -> Option<&PurchaseDialog> {
        match &self.phase {
            Phase::DialogOpen(dialog) => Some(dialog),
            _ => None,
        }
    }

    /// The live selection while dragging, or the pending one while the dialog is open
    pub fn selection(&self) -> Option<Selection> {
        match &self.phase {
            Phase::Idle => None,
            Phase::Dragging { anchor, cursor } => Some(Selection::between(*anchor, *cursor)),
            Phase::DialogOpen(dialog) => Some(*dialog.selection()),
        }
    }

    pub fn is_selected(&self, cell: CellPosition) -> bool {
        self.selection().is_some_and(|sel| sel.contains(cell))
    }

    pub fn cell_count(&self) -> usize {
        self.selection().map_or(0, |sel| sel.cell_count())
    }

    pub fn price(&self) -> Price {
        Price::for_cells(self.cell_count(), self.unit_price)
    }

    pub fn pointer_down(&mut self, cell: CellPosition) {
        if matches!(self.phase, Phase::DialogOpen(_)) {
            return;
        }
        debug!("drag started at {}", cell.to_reference());
        self.phase = Phase::Dragging {
            anchor: cell,
            cursor: cell,
        };
    }

    /// Returns true if the selection changed
    pub fn pointer_enter(&mut self, cell: CellPosition) -> bool {
        match &mut self.phase {
            Phase::Dragging { cursor, .. } if *cursor != cell => {
                *cursor = cell;
                true
            }
            _ => false,
        }
    }

    pub fn pointer_up(&mut self) {
        if let Phase::Dragging { anchor, cursor } = self.phase {
            let dialog = PurchaseDialog::open(Selection::between(anchor, cursor), self.unit_price);
            debug!("drag ended: {}", dialog.summary());
            self.phase = Phase::DialogOpen(dialog);
        }
    }

    /// Confirm the pending purchase.
    ///
    /// With an account connected the call is dispatched once and the
    /// controller goes back to idle whatever the issuer later reports. Without
    /// one nothing is sent and the dialog stays open.
    pub fn confirm(
        &mut self,
        account: &dyn AccountProvider,
        config: &MintConfig,
        dispatcher: &IssueDispatcher,
    ) -> Result<Option<ContractCall>, PurchaseError> {
        let Phase::DialogOpen(dialog) = &self.phase else {
            return Ok(None);
        };
        let call = dialog.confirm(account, config, dispatcher)?;
        self.phase = Phase::Idle;
        Ok(Some(call))
    }

    /// Discard the pending purchase. A drag in progress only ends on pointer-up.
    pub fn cancel(&mut self) {
        if let Phase::DialogOpen(dialog) = &self.phase {
            debug!("purchase of {} cancelled", dialog.selection().range_label());
            self.phase = Phase::Idle;
        }
    }
}
