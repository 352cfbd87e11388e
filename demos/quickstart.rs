use serde_json::json;
use std::sync::Arc;
use storefront_session::model::{CLIENT_SESSION_ID, CLIENT_SESSION_ID_EXPIRATION};
use storefront_session::{
    create_session_store, EndpointConfig, NonceFactory, ProtectedRouter, RouteRegistry,
    SessionBackendConfig, TargetRegistry, TargetResolver, TransferRequest, TransferSessionHandler,
};
use time::OffsetDateTime;

struct DemoResolver;

impl TargetResolver for DemoResolver {
    fn page_permalink(&self, page: &str) -> Option<String> {
        Some(format!("https://shop.example/{page}/"))
    }

    fn endpoint_url(&self, endpoint: &str) -> Option<String> {
        Some(format!("https://shop.example/checkout/{endpoint}/"))
    }
}

#[derive(Default)]
struct DemoRoutes(Vec<(String, String)>);

impl RouteRegistry for DemoRoutes {
    fn add_rewrite_rule(&mut self, pattern: &str, query: &str) {
        self.0.push((pattern.to_owned(), query.to_owned()));
    }
}

fn main() {
    let store = create_session_store(SessionBackendConfig::InMemory).expect("store");
    let registry = TargetRegistry::standard();
    let router = ProtectedRouter::new(
        EndpointConfig::new(),
        registry.clone(),
        Arc::new(DemoResolver),
    );

    let mut routes = DemoRoutes::default();
    let pattern = router.register_route(&mut routes);
    println!("endpoint pattern: {pattern}");
    println!("rewrite rules installed: {}", routes.0.len());

    // Storefront side: mint a nonce-keyed cart URL for a known session.
    let nonces = NonceFactory::new("demo-secret");
    let prefix = router.nonce_prefix("cart_url").expect("cart flow");
    let nonce = nonces.create(&format!("{prefix}client-42"));
    println!("cart transfer nonce: {nonce}");

    // Commerce side: a request arrives at the protected endpoint.
    let request = TransferRequest::from_pairs([
        ("session_id", "customer-42"),
        ("_wc_cart", nonce.as_str()),
    ]);

    let mut handler = TransferSessionHandler::new(store, registry, request.clone());
    handler.init_session_cookie();
    println!("customer id: {}", handler.get_customer_id().as_str());

    let expiration = OffsetDateTime::now_utc().unix_timestamp() + 3600;
    handler.set(CLIENT_SESSION_ID, json!("client-42"));
    handler.set(CLIENT_SESSION_ID_EXPIRATION, json!(expiration));
    println!("client session id: {}", handler.get_client_session_id());

    let redirect = router.resolve_redirect(&request).expect("cart target");
    println!("redirecting to: {redirect}");
}
