mod config;
mod dialog;
mod error;
mod grid;
mod issuer;
mod menu;
mod pricing;
mod selection;
mod state;
mod theme;

use gpui::*;
use log::{error, info};

use config::{CONFIG_ENV, MintConfig};
use grid::*;
use theme::Theme;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = MintConfig::resolve_path(std::env::args().nth(1), std::env::var(CONFIG_ENV).ok());
    let config = match MintConfig::load_or_seed(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    info!(
        "minting via {} at {} ETH per cell ({:?} payload)",
        config.entrypoint, config.unit_price_wei, config.payload
    );

    Application::new().run(move |cx| {
        // Initialize theme
        Theme::init(cx);

        // Set up menu bar
        menu::setup_menu(cx);

        // Register keybindings
        cx.bind_keys([
            KeyBinding::new("enter", ConfirmPurchase, Some("PurchaseDialog")),
            KeyBinding::new("escape", CancelPurchase, Some("PurchaseDialog")),

            // Global
            KeyBinding::new("cmd-q", Quit, None),
        ]);

        // Register quit action
        cx.on_action::<Quit>(|_, cx| {
            cx.quit();
        });

        let window_options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                None,
                size(px(WINDOW_WIDTH), px(WINDOW_HEIGHT)),
                cx,
            ))),
            titlebar: Some(TitlebarOptions {
                title: Some("cellmint".into()),
                appears_transparent: false,
                ..Default::default()
            }),
            window_min_size: Some(size(px(MIN_WINDOW_WIDTH), px(MIN_WINDOW_HEIGHT))),
            ..Default::default()
        };

        let opened = cx.open_window(window_options, |window, cx| {
            let app = cx.new(|cx| MintApp::new(config, cx));
            app.focus_handle(cx).focus(window);
            app
        });
        if let Err(e) = opened {
            error!("failed to open window: {}", e);
            cx.quit();
        }
    });
}
