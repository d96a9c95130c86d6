mod app;
mod structure;

const APP_NAME: &str = "Nox Studio";

fn main() -> eframe::Result {
    env_logger::init();

    let native_options = eframe::NativeOptions::default();
    eframe::run_native(
        APP_NAME,
        native_options,
        Box::new(|cc| Ok(Box::new(app::StudioApp::new(cc)))),
    )
}
