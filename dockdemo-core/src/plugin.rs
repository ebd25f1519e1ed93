//! Plugins are composable units of functionality installed into an
//! [`AppBuilder`] with `.with(plugin)`.

use crate::builder::AppBuilder;

/// A composable unit of functionality that can be installed into an [`AppBuilder`].
///
/// Plugins can add layers, register routes, or register lifecycle hooks.
///
/// ```ignore
/// pub struct Ping;
///
/// impl Plugin for Ping {
///     fn install<T: Clone + Send + Sync + 'static>(self, app: AppBuilder<T>) -> AppBuilder<T> {
///         app.register_routes(Router::new().route("/ping", get(|| async { "pong" })))
///     }
/// }
/// ```
pub trait Plugin: Send + 'static {
    fn install<T: Clone + Send + Sync + 'static>(self, app: AppBuilder<T>) -> AppBuilder<T>;

    /// Whether this plugin must be the outermost layer.
    ///
    /// The builder warns when another plugin is installed after one that
    /// returns `true`.
    fn should_be_last() -> bool
    where
        Self: Sized,
    {
        false
    }

    /// The name of this plugin (for diagnostics).
    fn name() -> &'static str
    where
        Self: Sized,
    {
        std::any::type_name::<Self>()
    }
}
