use crate::model::TransferRequest;
use std::collections::HashMap;
use std::sync::Arc;

/// Rewrite path of the protected endpoint when no override is supplied.
pub const DEFAULT_ENDPOINT_PATH: &str = "transfer-session";

/// Where a flow lands after the handoff. Pages resolve through the host
/// platform's permalink lookup, endpoints through its endpoint-URL lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Destination {
    Page(&'static str),
    Endpoint(&'static str),
}

/// One row of the flow registry: a named target flow with its nonce
/// parameter name and nonce action prefix.
#[derive(Clone, Copy, Debug)]
pub struct FlowTarget {
    pub flow_key: &'static str,
    pub nonce_name: &'static str,
    pub nonce_prefix: &'static str,
    pub destination: Destination,
}

/// Immutable flow/nonce table, built once at startup and injected into the
/// router and handler rather than reached through ambient state.
#[derive(Clone, Debug)]
pub struct TargetRegistry {
    flows: Vec<FlowTarget>,
}

impl TargetRegistry {
    /// The four standard storefront flows.
    pub fn standard() -> Self {
        Self {
            flows: vec![
                FlowTarget {
                    flow_key: "cart_url",
                    nonce_name: "_wc_cart",
                    nonce_prefix: "load-cart_",
                    destination: Destination::Page("cart"),
                },
                FlowTarget {
                    flow_key: "checkout_url",
                    nonce_name: "_wc_checkout",
                    nonce_prefix: "load-checkout_",
                    destination: Destination::Endpoint("checkout"),
                },
                FlowTarget {
                    flow_key: "account_url",
                    nonce_name: "_wc_account",
                    nonce_prefix: "load-account_",
                    destination: Destination::Page("my-account"),
                },
                FlowTarget {
                    flow_key: "add_payment_method_url",
                    nonce_name: "_wc_payment",
                    nonce_prefix: "add-payment-method_",
                    destination: Destination::Endpoint("add-payment-method"),
                },
            ],
        }
    }

    pub fn flows(&self) -> &[FlowTarget] {
        &self.flows
    }

    /// Looks up a flow by its key. Unknown keys are a normal absent result.
    pub fn find(&self, flow_key: &str) -> Option<&FlowTarget> {
        self.flows.iter().find(|f| f.flow_key == flow_key)
    }

    /// Looks up the flow whose nonce parameter name matches `marker`.
    pub fn flow_for_marker(&self, marker: &str) -> Option<&FlowTarget> {
        self.flows.iter().find(|f| f.nonce_name == marker)
    }

    /// Whether the request carries at least one registered flow marker.
    pub fn contains_marker(&self, request: &TransferRequest) -> bool {
        self.flows.iter().any(|f| request.has_marker(f.nonce_name))
    }

    /// The flow-key to nonce-name mapping, exactly one entry per flow.
    pub fn nonce_names(&self) -> HashMap<&'static str, &'static str> {
        self.flows
            .iter()
            .map(|f| (f.flow_key, f.nonce_name))
            .collect()
    }

    /// The nonce action prefix for a flow, `None` for unknown keys.
    pub fn nonce_prefix(&self, flow_key: &str) -> Option<&'static str> {
        self.find(flow_key).map(|f| f.nonce_prefix)
    }
}

impl Default for TargetRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Host-platform URL resolution for flow destinations.
pub trait TargetResolver: Send + Sync {
    /// Permalink of a named page (`cart`, `my-account`).
    fn page_permalink(&self, page: &str) -> Option<String>;

    /// URL of a named endpoint (`checkout`, `add-payment-method`).
    fn endpoint_url(&self, endpoint: &str) -> Option<String>;
}

/// Host routing system the protected endpoint registers itself with.
pub trait RouteRegistry {
    fn add_rewrite_rule(&mut self, pattern: &str, query: &str);
}

/// Endpoint path configuration with a pluggable override.
///
/// The override receives the default path and returns the effective one,
/// preserving the host platform's filter-hook behavior as a construction-time
/// strategy instead of a runtime-wide hook.
pub struct EndpointConfig {
    default_path: String,
    override_path: Option<Box<dyn Fn(&str) -> String + Send + Sync>>,
}

impl EndpointConfig {
    pub fn new() -> Self {
        Self {
            default_path: DEFAULT_ENDPOINT_PATH.to_owned(),
            override_path: None,
        }
    }

    /// Replaces the default path.
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            default_path: path.into(),
            override_path: None,
        }
    }

    /// Installs an override strategy applied on every path resolution.
    pub fn with_override<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.override_path = Some(Box::new(f));
        self
    }

    /// The path requests must hit, after applying any override.
    pub fn effective_path(&self) -> String {
        match &self.override_path {
            Some(f) => f(&self.default_path),
            None => self.default_path.clone(),
        }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns the single externally reachable transfer endpoint and the static
/// flow registry.
pub struct ProtectedRouter {
    config: EndpointConfig,
    registry: TargetRegistry,
    resolver: Arc<dyn TargetResolver>,
}

impl ProtectedRouter {
    pub fn new(
        config: EndpointConfig,
        registry: TargetRegistry,
        resolver: Arc<dyn TargetResolver>,
    ) -> Self {
        Self {
            config,
            registry,
            resolver,
        }
    }

    pub fn registry(&self) -> &TargetRegistry {
        &self.registry
    }

    pub fn endpoint_path(&self) -> String {
        self.config.effective_path()
    }

    /// Computes the rewrite pattern for the endpoint, registers it with the
    /// host routing system, and returns the pattern.
    pub fn register_route(&self, routes: &mut dyn RouteRegistry) -> String {
        let path = self.endpoint_path();
        let pattern = format!("^{path}/?$");
        let query = format!("index.php?{path}=1");
        routes.add_rewrite_rule(&pattern, &query);
        tracing::debug!(%pattern, "registered transfer endpoint");
        pattern
    }

    /// Appends the endpoint's query variable to the recognized set.
    /// Existing entries are preserved; repeated calls do not duplicate.
    pub fn add_query_var(&self, mut vars: Vec<String>) -> Vec<String> {
        let path = self.endpoint_path();
        if !vars.iter().any(|v| *v == path) {
            vars.push(path);
        }
        vars
    }

    /// The flow-key to nonce-name table.
    pub fn nonce_names(&self) -> HashMap<&'static str, &'static str> {
        self.registry.nonce_names()
    }

    /// The nonce action prefix for a flow key, `None` when unknown.
    pub fn nonce_prefix(&self, flow_key: &str) -> Option<&'static str> {
        self.registry.nonce_prefix(flow_key)
    }

    /// Resolves the live destination URL for a flow key through the host
    /// platform. `None` for unknown keys or unresolvable destinations.
    pub fn target_endpoint(&self, flow_key: &str) -> Option<String> {
        let flow = self.registry.find(flow_key)?;
        match flow.destination {
            Destination::Page(page) => self.resolver.page_permalink(page),
            Destination::Endpoint(endpoint) => self.resolver.endpoint_url(endpoint),
        }
    }

    /// Picks the redirect destination for a request: the first registered
    /// flow whose marker the request carries. A request with no recognized
    /// marker has no destination.
    pub fn resolve_redirect(&self, request: &TransferRequest) -> Option<String> {
        let flow = self
            .registry
            .flows()
            .iter()
            .find(|f| request.has_marker(f.nonce_name))?;
        let url = self.target_endpoint(flow.flow_key);
        if url.is_none() {
            tracing::debug!(flow = flow.flow_key, "flow marker present but target unresolved");
        }
        url
    }
}
