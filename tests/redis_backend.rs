#![cfg(feature = "redis")]

use serde_json::json;
use storefront_session::model::{CustomerId, SessionRecord};
use storefront_session::{create_session_store, SessionBackendConfig};
use uuid::Uuid;

#[test]
fn redis_backend_round_trip_when_url_provided() {
    let url = match std::env::var("REDIS_URL") {
        Ok(val) => val,
        Err(_) => {
            eprintln!("skipping redis_backend_round_trip_when_url_provided: REDIS_URL not set");
            return;
        }
    };

    let namespace = format!("storefront:session:test:{}", Uuid::new_v4());
    let store = create_session_store(SessionBackendConfig::Redis {
        url,
        namespace: Some(namespace),
    })
    .expect("construct redis store");

    let mut record = SessionRecord::new(CustomerId::from("redis-customer"));
    record.set("cart_hash", json!("cafef00d"));
    let id = record.customer_id.clone();

    store.save(record).expect("save succeeds");
    let fetched = store
        .load(&id)
        .expect("load succeeds")
        .expect("record present");
    assert_eq!(fetched.get("cart_hash"), Some(&json!("cafef00d")));

    let mut updated = fetched;
    updated.set("cart_hash", json!("feedface"));
    store.save(updated).expect("overwrite succeeds");
    let refreshed = store
        .load(&id)
        .expect("load after overwrite")
        .expect("present");
    assert_eq!(refreshed.get("cart_hash"), Some(&json!("feedface")));

    assert!(store.touch(&id, Some(120)).expect("touch succeeds"));

    assert!(store.delete(&id).expect("delete succeeds"));
    let missing = store.load(&id).expect("load after delete");
    assert!(missing.is_none());
}
