use gpui::*;

use crate::grid::{CancelPurchase, ConfirmPurchase, Quit};

/// Set up the application menu bar
pub fn setup_menu(cx: &mut App) {
    cx.set_menus(vec![
        Menu {
            name: "cellmint".into(),
            items: vec![
                MenuItem::action("About cellmint", About),
                MenuItem::separator(),
                MenuItem::action("Quit", Quit),
            ],
        },
        Menu {
            name: "Purchase".into(),
            items: vec![
                MenuItem::action("Mint Selection", ConfirmPurchase),
                MenuItem::action("Discard Selection", CancelPurchase),
            ],
        },
    ]);
}

// Menu-specific actions that don't fit elsewhere
actions!(menu, [About]);
