/// Replay a recorded input script against a headless viewer (native builds)
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::PathBuf;

    use folio::replay::{self, ReplayScript};

    let mut args = std::env::args().skip(1);
    let Some(script_path) = args.next().map(PathBuf::from) else {
        eprintln!("Usage: folio-replay <script.json> [image]");
        std::process::exit(2);
    };
    let image_path = args.next().map(PathBuf::from);

    let script = ReplayScript::load(&script_path);

    // RUST_LOG still overrides the script's level
    let level = match &script {
        Ok(script) => script.config.log_level.to_level_filter(),
        Err(_) => log::LevelFilter::Info,
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str()))
        .init();

    let result = script.and_then(|mut script| {
        if let Some(path) = &image_path {
            let natural = replay::natural_size_of(path)?;
            log::info!(
                "Using {}x{} from {}",
                natural.width,
                natural.height,
                path.display()
            );
            script.natural = Some(natural);
        }
        replay::run(&script)
    });

    match result {
        Ok(report) => {
            log::info!(
                "Replayed {} step(s); closed: {}, listeners left: {}",
                report.records.len(),
                report.closed,
                report.live_listeners
            );
            if let Some(frame) = report.last_frame() {
                println!("{}", frame.zoom_label());
            }
        }
        Err(e) => {
            eprintln!("Replay failed: {}", e);
            std::process::exit(1);
        }
    }
}

// WASM doesn't use main(), it uses wasm_bindgen's start function
#[cfg(target_arch = "wasm32")]
fn main() {}
