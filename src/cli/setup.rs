use env_logger::Env;

/// Initialize the logger from `RUST_LOG`, defaulting to warnings only.
/// Called once from the binary; the library never touches global state.
pub fn init_logging() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
}
