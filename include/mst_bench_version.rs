const MST_BENCH_VERSION: &str = env!("CARGO_PKG_VERSION");
