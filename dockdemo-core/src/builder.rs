use std::convert::Infallible;
use std::future::Future;

use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::Route;
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::lifecycle::{BoxError, ShutdownHook, StartupHook};
use crate::plugin::Plugin;

type LayerFn = Box<dyn FnOnce(Router) -> Router + Send>;

/// Marker type: application state has not been set yet.
#[derive(Clone)]
pub struct NoState;

/// Builder for assembling the application.
///
/// Collects state, route fragments, and Tower layers, then produces an
/// `axum::Router` (or starts serving directly) with everything wired together.
///
/// The builder starts in the `NoState` phase. [`with_state`](AppBuilder::with_state)
/// moves it to `AppBuilder<T>`, where routes, plugins and hooks are added.
pub struct AppBuilder<T: Clone + Send + Sync + 'static = NoState> {
    state: T,
    routes: Vec<Router<T>>,
    layers: Vec<LayerFn>,
    normalize_path: bool,
    last_plugin_name: Option<&'static str>,
    startup_hooks: Vec<StartupHook<T>>,
    shutdown_hooks: Vec<ShutdownHook>,
}

impl AppBuilder<NoState> {
    pub fn new() -> Self {
        Self {
            state: NoState,
            routes: Vec::new(),
            layers: Vec::new(),
            normalize_path: false,
            last_plugin_name: None,
            startup_hooks: Vec::new(),
            shutdown_hooks: Vec::new(),
        }
    }

    /// Provide the application state. Layers and hooks registered so far are kept.
    pub fn with_state<S: Clone + Send + Sync + 'static>(self, state: S) -> AppBuilder<S> {
        if !self.routes.is_empty() || !self.startup_hooks.is_empty() {
            tracing::warn!("routes and startup hooks registered before with_state() are dropped");
        }
        AppBuilder {
            state,
            routes: Vec::new(),
            layers: self.layers,
            normalize_path: self.normalize_path,
            last_plugin_name: self.last_plugin_name,
            startup_hooks: Vec::new(),
            shutdown_hooks: self.shutdown_hooks,
        }
    }
}

impl Default for AppBuilder<NoState> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync + 'static> AppBuilder<T> {
    /// Install a [`Plugin`] into this builder.
    ///
    /// ```ignore
    /// AppBuilder::new()
    ///     .with_state(state)
    ///     .with(Health)
    ///     .with(Cors::permissive())
    ///     .with(Tracing)
    ///     .with(ErrorHandling)
    /// ```
    pub fn with<Pl: Plugin>(mut self, plugin: Pl) -> Self {
        if let Some(last) = self.last_plugin_name {
            tracing::warn!(
                previous = last,
                current = Pl::name(),
                "plugin installed after one that should be last"
            );
        }
        if Pl::should_be_last() {
            self.last_plugin_name = Some(Pl::name());
        }
        plugin.install(self)
    }

    /// Apply a Tower layer to the entire application.
    ///
    /// Layers are applied during `build()` in registration order, so the
    /// last registered layer is the outermost one.
    pub fn with_layer<L>(mut self, layer: L) -> Self
    where
        L: tower::Layer<Route> + Clone + Send + Sync + 'static,
        L::Service: tower::Service<Request> + Clone + Send + Sync + 'static,
        <L::Service as tower::Service<Request>>::Response: IntoResponse + 'static,
        <L::Service as tower::Service<Request>>::Error: Into<Infallible> + 'static,
        <L::Service as tower::Service<Request>>::Future: Send + 'static,
    {
        self.layers.push(Box::new(move |router| router.layer(layer)));
        self
    }

    /// Merge a router fragment into the application.
    pub fn register_routes(mut self, routes: Router<T>) -> Self {
        self.routes.push(routes);
        self
    }

    /// Register a hook that runs before the server starts listening.
    /// An error aborts startup.
    pub fn on_start<F, Fut>(mut self, hook: F) -> Self
    where
        F: FnOnce(T) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        self.startup_hooks
            .push(Box::new(move |state| Box::pin(hook(state))));
        self
    }

    /// Register a hook that runs after graceful shutdown completes.
    pub fn on_stop<F, Fut>(mut self, hook: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.shutdown_hooks.push(Box::new(move || Box::pin(hook())));
        self
    }

    pub(crate) fn enable_normalize_path(mut self) -> Self {
        self.normalize_path = true;
        self
    }

    /// Assemble the final `axum::Router`.
    pub fn build(self) -> Router {
        self.build_inner().0
    }

    fn build_inner(self) -> (Router, Vec<StartupHook<T>>, Vec<ShutdownHook>, T) {
        let mut routes: Router<T> = Router::new();
        for r in self.routes {
            routes = routes.merge(r);
        }
        // Applies to the routes merged so far, so it must follow the merges.
        let routes = routes.method_not_allowed_fallback(method_not_allowed);

        let strict = routes
            .clone()
            .fallback(not_found)
            .with_state(self.state.clone());

        let mut app = if self.normalize_path {
            // Unmatched paths with a trailing slash are re-dispatched without it.
            let inner = strict;
            routes
                .fallback(move |req: Request| async move {
                    let path = req.uri().path();
                    if path.len() <= 1 || !path.ends_with('/') {
                        return not_found().await.into_response();
                    }
                    let trimmed = path.trim_end_matches('/');
                    let trimmed = if trimmed.is_empty() { "/" } else { trimmed };
                    let new_uri = match req.uri().query() {
                        Some(q) => format!("{trimmed}?{q}"),
                        None => trimmed.to_string(),
                    };
                    let (mut parts, body) = req.into_parts();
                    parts.uri = new_uri.parse().unwrap_or(parts.uri);
                    match tower::ServiceExt::oneshot(inner.clone(), Request::from_parts(parts, body)).await {
                        Ok(resp) => resp,
                        Err(infallible) => match infallible {},
                    }
                })
                .with_state(self.state.clone())
        } else {
            strict
        };

        for layer_fn in self.layers {
            app = layer_fn(app);
        }

        (app, self.startup_hooks, self.shutdown_hooks, self.state)
    }

    /// Bind `addr` and serve until Ctrl-C / SIGTERM.
    pub async fn serve(self, addr: &str) -> Result<(), BoxError> {
        let listener = TcpListener::bind(addr).await?;
        self.serve_with_listener(listener).await
    }

    /// Serve on an already bound listener until Ctrl-C / SIGTERM.
    ///
    /// Runs startup hooks before accepting connections, and shutdown hooks
    /// after graceful shutdown completes.
    pub async fn serve_with_listener(self, listener: TcpListener) -> Result<(), BoxError> {
        let (app, startup_hooks, shutdown_hooks, state) = self.build_inner();

        for hook in startup_hooks {
            hook(state.clone()).await?;
        }

        let addr = listener.local_addr()?;
        info!(%addr, "server listening");
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        for hook in shutdown_hooks {
            hook().await;
        }

        info!("server stopped");
        Ok(())
    }
}

async fn not_found() -> impl IntoResponse {
    crate::error::error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn method_not_allowed() -> impl IntoResponse {
    crate::error::error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

/// Wait for a shutdown signal (Ctrl-C or SIGTERM on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received, starting graceful shutdown");
}
