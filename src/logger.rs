use crate::prelude::*;
use chrono;
use slog::{o, Drain, Logger};

fn get_datetime_str() -> String {
    chrono::offset::Local::now()
        .format("%d-%m-%Y_%H-%M")
        .to_string()
}

/// Root logger writing full records to the terminal
pub fn configure_term_root() -> Logger {
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator)
        .use_local_timestamp()
        .build()
        .fuse();
    let drain = slog_async::Async::new(drain).build().fuse();

    Logger::root(drain, o!())
}

/// Root logger with compact output into a datetime-stamped file
pub fn configure_compact_root() -> UResult<Logger> {
    let file = {
        let filename = format!("{}.txt", get_datetime_str());
        let file_path = std::path::Path::new(&filename);
        std::fs::File::create(file_path)?
    };
    let decorator = slog_term::PlainDecorator::new(file);
    let drain = slog_term::CompactFormat::new(decorator)
        .use_local_timestamp()
        .build()
        .fuse();
    let drain = slog_async::Async::new(drain).build().fuse();

    Ok(Logger::root(drain, o!()))
}

/// Root logger that swallows every record, for tests and embeddings
/// that bring their own logging
pub fn configure_discard_root() -> Logger {
    Logger::root(slog::Discard, o!())
}
