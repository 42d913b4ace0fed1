/// Runs `$block`, logging how long it took at debug level.
#[macro_export]
macro_rules! timer_debug {
    ($msg:literal, $block:expr) => {{
        let now = $crate::__macro_support::jiff::Timestamp::now();
        let result = $block;
        let elapsed = $crate::__macro_support::jiff::Timestamp::now().duration_since(now);

        $crate::__macro_support::tracing::debug!("{}: Took {:?}", $msg, elapsed);

        result
    }};
}
