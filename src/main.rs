use anyhow::anyhow;
use clap::Parser;
use eframe::egui::ViewportBuilder;
use log::info;
use mediacontrol::{app::PanelApp, cli::Args, config::Config, logging};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?.apply_args(&args);
    let _logger = logging::init(config.ui.debug)?;

    info!(
        "starting with {} and {}, refresh every {}s",
        config.backend.media_tool, config.backend.mixer_tool, config.refresh.interval_secs
    );

    let native_options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_title("🎧 Media Control")
            .with_inner_size([400.0, 650.0])
            .with_resizable(false),
        ..Default::default()
    };

    eframe::run_native(
        "Media Control",
        native_options,
        Box::new(
            move |_cc| -> std::result::Result<
                Box<dyn eframe::App>,
                Box<dyn std::error::Error + Send + Sync>,
            > { Ok(Box::new(PanelApp::new(&config))) },
        ),
    )
    .map_err(|err| anyhow!("failed to open the control panel: {err}"))
}
