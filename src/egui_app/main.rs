/**
 * Finboard desktop app - Main Entry Point
 *
 * Loads configuration, installs logging and hands an AppState to eframe.
 */
use eframe::egui;
use finboard::egui_app::{theme, views, AppState};
use finboard::shared::AppConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(err) = finboard::logging::init() {
        eprintln!("[STARTUP] logging unavailable: {}", err);
    }

    let config = finboard::shared::config::load()?;
    tracing::info!(api = %config.api_base_url, "configuration loaded");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Finboard",
        options,
        Box::new(move |cc| {
            theme::apply_global_theme(&cc.egui_ctx);
            let app = FinboardApp::new(config, &cc.egui_ctx)?;
            Ok(Box::new(app))
        }),
    )?;
    Ok(())
}

struct FinboardApp {
    state: AppState,
}

impl FinboardApp {
    fn new(config: AppConfig, ctx: &egui::Context) -> Result<Self, finboard::egui_app::StartupError> {
        Ok(Self {
            state: AppState::new(config, ctx)?,
        })
    }
}

impl eframe::App for FinboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll();

        let decision = self.state.decision();
        let chrome = decision.chrome();

        views::render_top_bar(ctx, &mut self.state, chrome);
        views::render_admin_sidebar(ctx, &mut self.state, chrome);
        views::render_main_panel(ctx, &mut self.state, &decision);
    }
}
