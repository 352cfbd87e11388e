use std::collections::HashMap;
use std::sync::Arc;
use storefront_session::router::DEFAULT_ENDPOINT_PATH;
use storefront_session::{
    EndpointConfig, ProtectedRouter, RouteRegistry, TargetRegistry, TargetResolver,
    TransferRequest,
};

struct FakeResolver;

impl TargetResolver for FakeResolver {
    fn page_permalink(&self, page: &str) -> Option<String> {
        match page {
            "cart" => Some("https://shop.test/cart/".to_owned()),
            "my-account" => Some("https://shop.test/my-account/".to_owned()),
            _ => None,
        }
    }

    fn endpoint_url(&self, endpoint: &str) -> Option<String> {
        match endpoint {
            "checkout" => Some("https://shop.test/checkout/".to_owned()),
            "add-payment-method" => {
                Some("https://shop.test/my-account/add-payment-method/".to_owned())
            }
            _ => None,
        }
    }
}

#[derive(Default)]
struct CapturedRoutes {
    rules: Vec<(String, String)>,
}

impl RouteRegistry for CapturedRoutes {
    fn add_rewrite_rule(&mut self, pattern: &str, query: &str) {
        self.rules.push((pattern.to_owned(), query.to_owned()));
    }
}

fn router() -> ProtectedRouter {
    ProtectedRouter::new(
        EndpointConfig::new(),
        TargetRegistry::standard(),
        Arc::new(FakeResolver),
    )
}

#[test]
fn nonce_names_is_exactly_the_four_flows() {
    let names = router().nonce_names();
    let expected: HashMap<&str, &str> = [
        ("cart_url", "_wc_cart"),
        ("checkout_url", "_wc_checkout"),
        ("account_url", "_wc_account"),
        ("add_payment_method_url", "_wc_payment"),
    ]
    .into_iter()
    .collect();
    assert_eq!(names, expected);
}

#[test]
fn nonce_prefix_lookup() {
    let router = router();
    assert_eq!(router.nonce_prefix("cart_url"), Some("load-cart_"));
    assert_eq!(router.nonce_prefix("checkout_url"), Some("load-checkout_"));
    assert_eq!(router.nonce_prefix("account_url"), Some("load-account_"));
    assert_eq!(
        router.nonce_prefix("add_payment_method_url"),
        Some("add-payment-method_")
    );
    assert_eq!(router.nonce_prefix("invalid"), None);
}

#[test]
fn target_endpoints_resolve_through_the_host() {
    let router = router();
    assert_eq!(
        router.target_endpoint("cart_url").as_deref(),
        Some("https://shop.test/cart/")
    );
    assert_eq!(
        router.target_endpoint("checkout_url").as_deref(),
        Some("https://shop.test/checkout/")
    );
    assert_eq!(
        router.target_endpoint("account_url").as_deref(),
        Some("https://shop.test/my-account/")
    );
    assert_eq!(
        router.target_endpoint("add_payment_method_url").as_deref(),
        Some("https://shop.test/my-account/add-payment-method/")
    );
    assert_eq!(router.target_endpoint("invalid"), None);
}

#[test]
fn add_query_var_is_an_idempotent_union() {
    let router = router();
    assert_eq!(
        router.add_query_var(vec![]),
        vec![DEFAULT_ENDPOINT_PATH.to_owned()]
    );

    let vars = router.add_query_var(vec!["x".to_owned()]);
    assert_eq!(vars, vec!["x".to_owned(), DEFAULT_ENDPOINT_PATH.to_owned()]);

    let again = router.add_query_var(vars.clone());
    assert_eq!(again, vars);
}

#[test]
fn register_route_emits_the_rewrite_rule() {
    let router = router();
    let mut routes = CapturedRoutes::default();
    let pattern = router.register_route(&mut routes);
    assert_eq!(pattern, "^transfer-session/?$");
    assert_eq!(
        routes.rules,
        vec![(
            "^transfer-session/?$".to_owned(),
            "index.php?transfer-session=1".to_owned()
        )]
    );
}

#[test]
fn endpoint_override_changes_path_pattern_and_query_var() {
    let config = EndpointConfig::new().with_override(|default| format!("secure-{default}"));
    let router = ProtectedRouter::new(config, TargetRegistry::standard(), Arc::new(FakeResolver));

    assert_eq!(router.endpoint_path(), "secure-transfer-session");

    let mut routes = CapturedRoutes::default();
    assert_eq!(router.register_route(&mut routes), "^secure-transfer-session/?$");
    assert_eq!(
        router.add_query_var(vec![]),
        vec!["secure-transfer-session".to_owned()]
    );
}

#[test]
fn resolve_redirect_follows_the_present_marker() {
    let router = router();

    let cart = TransferRequest::from_pairs([("_wc_cart", "nonce")]);
    assert_eq!(
        router.resolve_redirect(&cart).as_deref(),
        Some("https://shop.test/cart/")
    );

    let payment = TransferRequest::from_pairs([("_wc_payment", "nonce")]);
    assert_eq!(
        router.resolve_redirect(&payment).as_deref(),
        Some("https://shop.test/my-account/add-payment-method/")
    );

    let unmarked = TransferRequest::from_pairs([("session_id", "abc")]);
    assert_eq!(router.resolve_redirect(&unmarked), None);
}
