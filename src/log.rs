use log::LevelFilter;

/// 初始化日志。
///
/// 默认 `Info` 级别，`debug_enabled` 时为 `Debug`；
/// 设置了 `RUST_LOG` 时以它为准。
pub fn init_logger(debug_enabled: bool) {
    let level = if debug_enabled {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder
        .filter(None, level)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false);

    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }

    // 测试或重复调用时 logger 可能已经初始化
    if builder.try_init().is_ok() {
        log::debug!("logger initialized at {level:?} level");
    }
}
