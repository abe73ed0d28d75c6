//! Camera + accelerometer panel GUI
//!
//! One screen: live camera preview with a flip control on top, accelerometer
//! panel below with a subscribe toggle and slow/fast rate buttons. The
//! preview shows a grant-permission prompt until camera access is granted.

mod app;
mod state;

use app::PanelApp;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([480.0, 800.0])
            .with_min_inner_size([360.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Motion Viewfinder",
        options,
        Box::new(|cc| Ok(Box::new(PanelApp::new(cc)))),
    )
}
