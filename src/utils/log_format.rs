//! 日志宏：关闭 `logging` 特性时日志调用整体编译消除

/// debug 级日志
macro_rules! like_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "logging")]
        tracing::debug!($($arg)*);
    }};
}

/// trace 级日志
macro_rules! like_trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "logging")]
        tracing::trace!($($arg)*);
    }};
}
