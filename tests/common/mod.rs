//! Shared fixtures for integration tests.

use serde_json::{json, Value};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use delivery_core::config::{DeliveryConfig, DomainConfig};
use delivery_core::routing::{Domain, DomainTable};
use delivery_core::ContentElement;

/// The two-domain table used throughout: `localhost/en` and `localhost/jp`, both rooted at 1000.
#[allow(dead_code)]
pub fn localhost_table() -> DomainTable {
    DomainTable::new(
        vec![
            Domain::new(1, "localhost/en", 1000, "en-US").unwrap(),
            Domain::new(2, "localhost/jp", 1000, "ja-JP").unwrap().with_sort_order(1),
        ],
        1,
    )
}

#[allow(dead_code)]
pub fn domain_config(id: i32, name: &str, root: i32, culture: &str) -> DomainConfig {
    DomainConfig {
        id,
        name: name.to_string(),
        root_content_id: root,
        culture: culture.to_string(),
        wildcard: false,
        sort_order: 0,
    }
}

#[allow(dead_code)]
pub fn localhost_config() -> DeliveryConfig {
    let mut config = DeliveryConfig::default();
    config.domains.push(domain_config(1, "localhost/en", 1000, "en-US"));
    config.domains.push(domain_config(2, "localhost/jp", 1000, "ja-JP"));
    config
}

#[allow(dead_code)]
pub fn element(id: i32) -> Arc<ContentElement> {
    Arc::new(ContentElement::new(id, Uuid::new_v4(), "article"))
}

/// A non-idempotent computation: every call yields the next integer.
#[derive(Clone, Default)]
#[allow(dead_code)]
pub struct Counter(Arc<AtomicI64>);

#[allow(dead_code)]
impl Counter {
    pub fn next(&self) -> Result<Value, std::convert::Infallible> {
        Ok(json!(self.0.fetch_add(1, Ordering::SeqCst) + 1))
    }

    pub fn calls(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}
