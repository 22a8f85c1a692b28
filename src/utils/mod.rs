pub mod socket_finder;

pub use socket_finder::SocketFinder;

// Макросы условного логирования
#[macro_export]
macro_rules! debug_if_enabled {
    ($($arg:tt)*) => {
        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! trace_if_enabled {
    ($($arg:tt)*) => {
        if tracing::enabled!(tracing::Level::TRACE) {
            tracing::trace!($($arg)*);
        }
    };
}
