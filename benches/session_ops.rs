use std::hint::black_box;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use serde_json::json;
use storefront_session::inmemory::InMemorySessionStore;
use storefront_session::model::{CustomerId, SessionRecord};
use storefront_session::{
    SessionStore, TargetRegistry, TransferRequest, TransferSessionHandler,
};

fn bench_record(id: &str) -> SessionRecord {
    let mut record = SessionRecord::new(CustomerId::from(id));
    record.set("client_session_id", json!("bench-client"));
    record.set("cart_hash", json!("bench-hash"));
    record
}

fn store_benches(c: &mut Criterion) {
    let store = InMemorySessionStore::new();
    let counter = AtomicU64::new(0);

    c.bench_function("inmemory_save", |b| {
        b.iter(|| {
            let n = counter.fetch_add(1, Ordering::Relaxed);
            let record = bench_record(&format!("bench-{n}"));
            store.save(black_box(record)).expect("save");
        })
    });

    let record = bench_record("bench-hot");
    let id = record.customer_id.clone();
    store.save(record).expect("seed");
    c.bench_function("inmemory_load", |b| {
        b.iter(|| {
            let loaded = store.load(black_box(&id)).expect("load");
            black_box(loaded);
        })
    });
}

fn handler_benches(c: &mut Criterion) {
    let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
    store.save(bench_record("bound-customer")).expect("seed");

    c.bench_function("handler_init_bound", |b| {
        b.iter(|| {
            let request = TransferRequest::from_pairs([
                ("session_id", "bound-customer"),
                ("_wc_cart", "nonce"),
            ]);
            let mut handler =
                TransferSessionHandler::new(store.clone(), TargetRegistry::standard(), request);
            handler.init_session_cookie();
            black_box(handler.get_customer_id());
        })
    });

    c.bench_function("handler_init_anonymous", |b| {
        b.iter(|| {
            let request = TransferRequest::from_pairs::<_, &str, &str>([]);
            let mut handler =
                TransferSessionHandler::new(store.clone(), TargetRegistry::standard(), request);
            handler.init_session_cookie();
            black_box(handler.get_customer_id());
        })
    });
}

criterion_group!(benches, store_benches, handler_benches);
criterion_main!(benches);
