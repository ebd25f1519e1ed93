use std::future::Future;
use std::pin::Pin;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A startup hook that receives a clone of the application state.
pub type StartupHook<T> =
    Box<dyn FnOnce(T) -> Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send>> + Send>;

/// A shutdown hook that runs after the server has stopped accepting requests.
pub type ShutdownHook = Box<dyn FnOnce() -> Pin<Box<dyn Future<Output = ()> + Send>> + Send>;
