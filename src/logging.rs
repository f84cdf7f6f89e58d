use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_wasm::WASMLayerConfigBuilder;

/// Install a console subscriber. Calling it again is a no-op.
pub fn init(level: Option<&str>) {
    let default_level = if cfg!(debug_assertions) {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let max_level = level
        .and_then(|l| l.parse::<tracing::Level>().ok())
        .unwrap_or(default_level);

    let mut builder = WASMLayerConfigBuilder::new();
    builder.set_max_level(max_level);
    let config = builder.build();
    let _ = tracing_subscriber::registry()
        .with(tracing_wasm::WASMLayer::new(config))
        .try_init();

    console_error_panic_hook::set_once();
}
