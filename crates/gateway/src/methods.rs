use std::{collections::HashMap, future::Future, pin::Pin, sync::Arc};

use tracing::{debug, warn};

use crate::{
    protocol::{error_codes, ErrorShape, ResponseFrame},
    services::CatalogService,
};

// ── Types ────────────────────────────────────────────────────────────────────

/// Services available to method handlers.
#[derive(Clone)]
pub struct Services {
    pub catalog: Arc<dyn CatalogService>,
}

/// Context passed to every method handler.
pub struct MethodContext {
    pub request_id: String,
    pub method: String,
    pub params: serde_json::Value,
    pub services: Services,
}

/// The result a method handler produces.
pub type MethodResult = Result<serde_json::Value, ErrorShape>;

/// A boxed async method handler.
pub type HandlerFn =
    Box<dyn Fn(MethodContext) -> Pin<Box<dyn Future<Output = MethodResult> + Send>> + Send + Sync>;

// ── Method registry ──────────────────────────────────────────────────────────

pub struct MethodRegistry {
    handlers: HashMap<String, HandlerFn>,
}

impl Default for MethodRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MethodRegistry {
    pub fn new() -> Self {
        let mut reg = Self {
            handlers: HashMap::new(),
        };
        reg.register_catalog_methods();
        reg
    }

    pub fn register(&mut self, method: impl Into<String>, handler: HandlerFn) {
        self.handlers.insert(method.into(), handler);
    }

    pub async fn dispatch(&self, ctx: MethodContext) -> ResponseFrame {
        let method = ctx.method.clone();
        let request_id = ctx.request_id.clone();

        let Some(handler) = self.handlers.get(&method) else {
            warn!(method, "unknown method");
            return ResponseFrame::err(
                &request_id,
                ErrorShape::new(
                    error_codes::METHOD_NOT_FOUND,
                    format!("unknown method: {method}"),
                ),
            );
        };

        debug!(method, request_id = %request_id, "dispatching method");
        match handler(ctx).await {
            Ok(payload) => {
                debug!(method, request_id = %request_id, "method ok");
                ResponseFrame::ok(&request_id, payload)
            },
            Err(err) => {
                warn!(method, request_id = %request_id, code = %err.code, msg = %err.message,
                      "method error");
                ResponseFrame::err(&request_id, err)
            },
        }
    }

    pub fn method_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }

    fn register_catalog_methods(&mut self) {
        // Repositories
        self.register(
            "repos.fetch",
            Box::new(|ctx| {
                Box::pin(async move {
                    ctx.services
                        .catalog
                        .fetch_repo(ctx.params.clone())
                        .await
                        .map_err(ErrorShape::from)
                })
            }),
        );
        self.register(
            "repos.list",
            Box::new(|ctx| {
                Box::pin(async move {
                    ctx.services
                        .catalog
                        .repos_list()
                        .await
                        .map_err(ErrorShape::from)
                })
            }),
        );
        self.register(
            "repos.add",
            Box::new(|ctx| {
                Box::pin(async move {
                    ctx.services
                        .catalog
                        .repos_add(ctx.params.clone())
                        .await
                        .map_err(ErrorShape::from)
                })
            }),
        );
        self.register(
            "repos.remove",
            Box::new(|ctx| {
                Box::pin(async move {
                    ctx.services
                        .catalog
                        .repos_remove(ctx.params.clone())
                        .await
                        .map_err(ErrorShape::from)
                })
            }),
        );
        self.register(
            "repos.readme",
            Box::new(|ctx| {
                Box::pin(async move {
                    ctx.services
                        .catalog
                        .repo_readme(ctx.params.clone())
                        .await
                        .map_err(ErrorShape::from)
                })
            }),
        );

        // Skills
        self.register(
            "skills.list",
            Box::new(|ctx| {
                Box::pin(async move {
                    ctx.services
                        .catalog
                        .skills_list()
                        .await
                        .map_err(ErrorShape::from)
                })
            }),
        );
        self.register(
            "skills.install",
            Box::new(|ctx| {
                Box::pin(async move {
                    ctx.services
                        .catalog
                        .skill_install(ctx.params.clone())
                        .await
                        .map_err(ErrorShape::from)
                })
            }),
        );
        self.register(
            "skills.uninstall",
            Box::new(|ctx| {
                Box::pin(async move {
                    ctx.services
                        .catalog
                        .skill_uninstall(ctx.params.clone())
                        .await
                        .map_err(ErrorShape::from)
                })
            }),
        );
        self.register(
            "skills.installed",
            Box::new(|ctx| {
                Box::pin(async move {
                    ctx.services
                        .catalog
                        .installed_list()
                        .await
                        .map_err(ErrorShape::from)
                })
            }),
        );

        // Favorites
        self.register(
            "favorites.get",
            Box::new(|ctx| {
                Box::pin(async move {
                    ctx.services
                        .catalog
                        .favorites_get()
                        .await
                        .map_err(ErrorShape::from)
                })
            }),
        );
        self.register(
            "favorites.skill.toggle",
            Box::new(|ctx| {
                Box::pin(async move {
                    ctx.services
                        .catalog
                        .favorite_skill_toggle(ctx.params.clone())
                        .await
                        .map_err(ErrorShape::from)
                })
            }),
        );
        self.register(
            "favorites.repo.toggle",
            Box::new(|ctx| {
                Box::pin(async move {
                    ctx.services
                        .catalog
                        .favorite_repo_toggle(ctx.params.clone())
                        .await
                        .map_err(ErrorShape::from)
                })
            }),
        );

        // Settings
        self.register(
            "settings.get",
            Box::new(|ctx| {
                Box::pin(async move {
                    ctx.services
                        .catalog
                        .settings_get()
                        .await
                        .map_err(ErrorShape::from)
                })
            }),
        );
        self.register(
            "settings.save",
            Box::new(|ctx| {
                Box::pin(async move {
                    ctx.services
                        .catalog
                        .settings_save(ctx.params.clone())
                        .await
                        .map_err(ErrorShape::from)
                })
            }),
        );

        // Index
        self.register(
            "index.build",
            Box::new(|ctx| {
                Box::pin(async move {
                    ctx.services
                        .catalog
                        .build_index()
                        .await
                        .map_err(ErrorShape::from)
                })
            }),
        );
    }
}
