use std::sync::Arc;

use gpui::prelude::FluentBuilder;
use gpui::*;
use log::warn;

use crate::config::MintConfig;
use crate::issuer::{AccountProvider, DryRunIssuer, IssueDispatcher, IssueOutcome, StaticAccount};
use crate::selection::{Phase, SelectionController};
use crate::state::{CellPosition, GRID_COLS, GRID_ROWS};
use crate::Theme;

pub const CELL_SIZE: f32 = 10.0;
pub const GRID_PADDING: f32 = 16.0;
pub const HEADER_HEIGHT: f32 = 32.0;
pub const FOOTER_HEIGHT: f32 = 24.0;
pub const DIALOG_WIDTH: f32 = 320.0;

// Enough to show the whole grid without scrolling
pub const WINDOW_WIDTH: f32 = GRID_COLS as f32 * CELL_SIZE + 2.0 * GRID_PADDING;
pub const WINDOW_HEIGHT: f32 =
    GRID_ROWS as f32 * CELL_SIZE + 2.0 * GRID_PADDING + HEADER_HEIGHT + FOOTER_HEIGHT;

// Minimum window size: header + footer + a strip of cells, and room for the dialog
pub const MIN_WINDOW_WIDTH: f32 = DIALOG_WIDTH + 2.0 * GRID_PADDING;
pub const MIN_WINDOW_HEIGHT: f32 = HEADER_HEIGHT + FOOTER_HEIGHT + 20.0 * CELL_SIZE;

// Actions for the purchase dialog
actions!(purchase, [ConfirmPurchase, CancelPurchase]);

// Global actions
actions!(cellmint, [Quit]);

/// The top-level window component
pub struct MintApp {
    grid: Entity<MintGrid>,
}

impl MintApp {
    pub fn new(config: MintConfig, cx: &mut Context<Self>) -> Self {
        let grid = cx.new(|cx| MintGrid::new(config, cx));
        Self { grid }
    }
}

impl Render for MintApp {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.global::<Theme>();

        div()
            .flex()
            .flex_col()
            .size_full()
            .bg(theme.base)
            .text_color(theme.text)
            .font_family("Berkeley Mono")
            .child(self.grid.clone())
    }
}

impl Focusable for MintApp {
    fn focus_handle(&self, cx: &App) -> FocusHandle {
        self.grid.read(cx).focus_handle.clone()
    }
}

/// The 100x100 mint grid and its purchase dialog
pub struct MintGrid {
    focus_handle: FocusHandle,
    controller: SelectionController,
    config: MintConfig,
    account: StaticAccount,
    dispatcher: IssueDispatcher,
    last_outcome: Option<IssueOutcome>,
    status_message: Option<String>,
}

impl MintGrid {
    pub fn new(config: MintConfig, cx: &mut Context<Self>) -> Self {
        let (dispatcher, outcomes) = IssueDispatcher::new(Arc::new(DryRunIssuer));

        // Surface issuer results as they arrive; the grid never waits on them
        cx.spawn(async move |this: WeakEntity<Self>, cx: &mut AsyncApp| {
            while let Ok(outcome) = outcomes.recv().await {
                let updated = this.update(cx, |grid, cx| {
                    grid.last_outcome = Some(outcome);
                    cx.notify();
                });
                if updated.is_err() {
                    break;
                }
            }
        })
        .detach();

        Self {
            focus_handle: cx.focus_handle(),
            controller: SelectionController::new(config.unit_price_wei),
            account: StaticAccount(config.account.clone()),
            config,
            dispatcher,
            last_outcome: None,
            status_message: None,
        }
    }

    fn on_cell_down(&mut self, row: usize, col: usize, cx: &mut Context<Self>) {
        self.status_message = None;
        self.controller.pointer_down(CellPosition::new(row, col));
        cx.notify();
    }

    fn on_cell_enter(&mut self, row: usize, col: usize, cx: &mut Context<Self>) {
        // Only redraw if the rectangle actually changed
        if self.controller.pointer_enter(CellPosition::new(row, col)) {
            cx.notify();
        }
    }

    fn on_pointer_up(&mut self, cx: &mut Context<Self>) {
        if self.controller.is_dragging() {
            self.controller.pointer_up();
            cx.notify();
        }
    }

    fn confirm_purchase(&mut self, _: &ConfirmPurchase, _window: &mut Window, cx: &mut Context<Self>) {
        match self.controller.confirm(&self.account, &self.config, &self.dispatcher) {
            Ok(Some(_)) => self.status_message = Some("Mint sent".to_string()),
            Ok(None) => {}
            Err(e) => {
                warn!("mint not sent: {}", e);
                self.status_message = Some("Connect a wallet to mint".to_string());
            }
        }
        cx.notify();
    }

    fn cancel_purchase(&mut self, _: &CancelPurchase, _window: &mut Window, cx: &mut Context<Self>) {
        self.controller.cancel();
        self.status_message = None;
        cx.notify();
    }

    fn render_header(&self, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.global::<Theme>();
        let summary = match self.controller.selection() {
            Some(sel) => format!(
                "{}  {} cells  {} ETH",
                sel.range_label(),
                sel.cell_count(),
                self.controller.price()
            ),
            None => "Drag across the grid to pick cells".to_string(),
        };

        div()
            .flex()
            .flex_row()
            .w_full()
            .h(px(HEADER_HEIGHT))
            .flex_none()
            .bg(theme.mantle)
            .border_b_1()
            .border_color(theme.surface0)
            .items_center()
            .justify_between()
            .px(px(8.))
            .child(
                div()
                    .text_size(px(14.))
                    .font_weight(FontWeight::BOLD)
                    .child("cellmint")
            )
            .child(
                div()
                    .text_size(px(12.))
                    .text_color(if self.controller.is_dragging() { theme.accent } else { theme.subtext0 })
                    .child(summary)
            )
    }

    fn render_grid(&self, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.global::<Theme>();

        div()
            .id("mint-grid")
            .flex_1()
            .overflow_scroll()
            .p(px(GRID_PADDING))
            .child(
                div()
                    .flex()
                    .flex_col()
                    .flex_none()
                    .children((0..GRID_ROWS).map(|row| {
                        div()
                            .flex()
                            .flex_row()
                            .flex_none()
                            .children((0..GRID_COLS).map(|col| {
                                let is_selected = self.controller.is_selected(CellPosition::new(row, col));

                                div()
                                    .w(px(CELL_SIZE))
                                    .h(px(CELL_SIZE))
                                    .flex_none()
                                    .border_1()
                                    .border_color(theme.crust)
                                    .bg(if is_selected { theme.selection } else { theme.surface0 })
                                    .on_mouse_down(
                                        MouseButton::Left,
                                        cx.listener(move |this, _: &MouseDownEvent, _, cx| {
                                            this.on_cell_down(row, col, cx);
                                        }),
                                    )
                                    .on_mouse_move(cx.listener(move |this, _: &MouseMoveEvent, _, cx| {
                                        this.on_cell_enter(row, col, cx);
                                    }))
                            }))
                    })),
            )
    }

    fn render_footer(&self, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.global::<Theme>();

        let account_text = match self.account.address() {
            Some(address) => format!("Account {}", short_address(&address)),
            None => "No account connected".to_string(),
        };

        let (outcome_text, outcome_failed) = match &self.last_outcome {
            Some(IssueOutcome { call, result: Ok(hash) }) => {
                (format!("{} sent {}", call.entrypoint, short_address(&hash.0)), false)
            }
            Some(IssueOutcome { call, result: Err(e) }) => (format!("{} failed: {}", call.entrypoint, e), true),
            None => (String::new(), false),
        };

        div()
            .flex()
            .flex_row()
            .w_full()
            .h(px(FOOTER_HEIGHT))
            .flex_none()
            .bg(theme.mantle)
            .border_t_1()
            .border_color(theme.surface0)
            .items_center()
            .justify_between()
            .px(px(8.))
            .text_size(px(12.))
            .text_color(theme.subtext0)
            .child(account_text)
            .child(
                div()
                    .flex()
                    .flex_row()
                    .gap(px(8.))
                    .when_some(self.status_message.clone(), |d, message| d.child(message))
                    .child(
                        div()
                            .when(outcome_failed, |d| d.text_color(theme.error))
                            .child(outcome_text)
                    )
            )
    }

    fn render_dialog(&self, cx: &mut Context<Self>) -> Option<impl IntoElement> {
        let dialog = self.controller.dialog()?;
        let theme = cx.global::<Theme>();
        let can_confirm = dialog.can_confirm(&self.account);

        Some(
            div()
                .absolute()
                .size_full()
                .top_0()
                .left_0()
                .flex()
                .items_center()
                .justify_center()
                .bg(theme.backdrop)
                .occlude()
                // Clicking the backdrop discards the pending selection
                .on_mouse_down(MouseButton::Left, cx.listener(|this, _: &MouseDownEvent, window, cx| {
                    this.cancel_purchase(&CancelPurchase, window, cx);
                }))
                .child(
                    div()
                        .flex()
                        .flex_col()
                        .gap(px(12.))
                        .w(px(DIALOG_WIDTH))
                        .p(px(24.))
                        .bg(theme.mantle)
                        .border_1()
                        .border_color(theme.surface1)
                        .rounded(px(8.))
                        .shadow_lg()
                        .on_mouse_down(MouseButton::Left, |_, _, cx| {
                            // Keep clicks inside the dialog away from the backdrop
                            cx.stop_propagation();
                        })
                        .child(
                            div()
                                .text_size(px(18.))
                                .font_weight(FontWeight::BOLD)
                                .child("Mint NFT")
                        )
                        .child(
                            div()
                                .text_size(px(12.))
                                .text_color(theme.subtext1)
                                .child(dialog.selection().range_label())
                        )
                        .child(div().text_size(px(14.)).child(dialog.summary()))
                        .when(!can_confirm, |d| {
                            d.child(
                                div()
                                    .text_size(px(12.))
                                    .text_color(theme.overlay0)
                                    .child("Connect a wallet to mint")
                            )
                        })
                        .child(
                            div()
                                .flex()
                                .flex_row()
                                .justify_end()
                                .gap(px(8.))
                                .child(dialog_button("cancel-purchase", "Cancel", true, theme).on_click(
                                    cx.listener(|this, _: &ClickEvent, window, cx| {
                                        this.cancel_purchase(&CancelPurchase, window, cx);
                                    }),
                                ))
                                .child(
                                    dialog_button("confirm-purchase", "Mint", can_confirm, theme).when(
                                        can_confirm,
                                        |button| {
                                            button.on_click(cx.listener(|this, _: &ClickEvent, window, cx| {
                                                this.confirm_purchase(&ConfirmPurchase, window, cx);
                                            }))
                                        },
                                    ),
                                ),
                        ),
                ),
        )
    }
}

fn dialog_button(id: &'static str, label: &'static str, enabled: bool, theme: &Theme) -> Stateful<Div> {
    div()
        .id(id)
        .px(px(12.))
        .py(px(4.))
        .rounded(px(4.))
        .text_size(px(14.))
        .bg(theme.surface0)
        .text_color(if enabled { theme.text } else { theme.overlay0 })
        .when(enabled, |d| d.cursor_pointer().hover(|s| s.bg(theme.surface1)))
        .child(label)
}

/// `0x05eefc…de75` style abbreviation for long hex strings
fn short_address(address: &str) -> String {
    if address.len() <= 14 || !address.is_ascii() {
        return address.to_string();
    }
    format!("{}…{}", &address[..8], &address[address.len() - 4..])
}

impl Render for MintGrid {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let key_context = if matches!(self.controller.phase(), Phase::DialogOpen(_)) {
            "PurchaseDialog"
        } else {
            "MintGrid"
        };

        div()
            .flex()
            .flex_col()
            .size_full()
            .key_context(key_context)
            .track_focus(&self.focus_handle)
            .on_action(cx.listener(Self::confirm_purchase))
            .on_action(cx.listener(Self::cancel_purchase))
            // A drag ends wherever the button is released
            .on_mouse_up(MouseButton::Left, cx.listener(|this, _: &MouseUpEvent, _, cx| {
                this.on_pointer_up(cx);
            }))
            .child(self.render_header(cx))
            .child(self.render_grid(cx))
            .child(self.render_footer(cx))
            .children(self.render_dialog(cx))
    }
}

impl Focusable for MintGrid {
    fn focus_handle(&self, _: &App) -> FocusHandle {
        self.focus_handle.clone()
    }
}
