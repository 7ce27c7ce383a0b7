/// Checks that a numerical value is in the provided interval `[a,b]` and returns early
/// with [`Error::InvalidParameter`](crate::Error::InvalidParameter) if not
///
/// ### Example
/// ```ignore
/// fn check(alpha: f32) -> maze_rl::Result<()> {
///     ensure_interval!(alpha, 0.0, 1.0);
///     Ok(())
/// }
/// ```
/// A value of `2.0` produces "invalid value for \`alpha\`: 2 (must be in the interval \[0, 1\])".
#[macro_export]
macro_rules! ensure_interval {
    ($var:expr, $a:expr, $b:expr) => {
        if !($var >= $a && $var <= $b) {
            return Err($crate::Error::InvalidParameter {
                name: stringify!($var),
                value: $var as f64,
                min: $a as f64,
                max: $b as f64,
            });
        }
    };
}
