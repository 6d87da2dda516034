#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set up logging; RUST_LOG controls the level
    env_logger::init();

    // File dialogs run as tokio tasks, so the UI thread needs a runtime entered
    let runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();

    exhibit_layout::run_app()?;
    Ok(())
}

// The web build is hosted through the library's `FloorplanApp`
#[cfg(target_arch = "wasm32")]
fn main() {}
