use artifact_render_engine::engine::core::app_setup::create_app;
use artifact_render_engine::settings::EngineSettings;

fn main() {
    let mut app = create_app(EngineSettings::default());

    #[cfg(target_arch = "wasm32")]
    {
        wasm_bindgen_futures::spawn_local(async move {
            app.run();
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.run();
    }
}
