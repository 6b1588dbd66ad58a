//! `#[docwire::hooks]` end to end.

#![cfg(feature = "macros")]

mod common;

use docwire::{Hookable, prelude::*};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};

struct Orders {
    saved: AtomicU64,
    api: ApiMetadata,
}

impl Lifecycle for Orders {
    type Args = ();

    fn construct(_: Construct) -> Self {
        let api = ApiMetadata::new();
        api.add_route("/orders", json!({ "methods": ["GET", "POST"] }));
        Orders {
            saved: AtomicU64::new(0),
            api,
        }
    }

    fn hooks() -> Option<Reflection<Self>> {
        Some(Self::reflection())
    }
}

impl ApiComponent for Orders {
    fn api(&self) -> &ApiMetadata {
        &self.api
    }
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
struct Totals {
    net: u32,
    tax: u32,
}

/// Order handling.
///
/// @api-namespace shop
/// @api-version 3
#[docwire::hooks(api)]
impl Orders {
    /// Remember the last saved order.
    ///
    /// @action save_order, 20
    fn on_save(&self, order_id: u64, _draft: bool) {
        self.saved.store(order_id, Ordering::SeqCst);
    }

    /// @filter order_totals
    fn totals(&self, totals: Totals) -> Totals {
        Totals {
            net: totals.net,
            tax: totals.net / 5,
        }
    }

    /// @ajax
    #[allow(non_snake_case)]
    fn handleRefund(&self, order_id: u64) -> String {
        format!("refunded {order_id}")
    }

    /// @command shop orders list
    fn list(&self, inv: Invocation<'_>) -> usize {
        inv.args().len()
    }

    /// @shortcode last_order
    fn r#type(&self) -> u64 {
        self.saved.load(Ordering::SeqCst)
    }

    #[allow(dead_code)]
    fn helper(&self, _: &str) {}

    /// Questions go to support@example.com.
    #[allow(dead_code)]
    fn contact(&self, _: &str) -> &'static str {
        "support@example.com"
    }
}

#[test]
fn test_reflection_lists_tagged_methods() {
    let reflection = Orders::reflection();
    let names: Vec<_> = reflection.methods().iter().map(|m| m.name()).collect();
    assert_eq!(names, vec!["on_save", "totals", "handleRefund", "list", "type"]);
    assert_eq!(reflection.methods()[0].arg_count(), 2);
    assert_eq!(reflection.methods()[3].arg_count(), 0);
    assert!(reflection.class_doc().contains("@api-namespace shop"));
    assert!(reflection.has_api());
    assert!(reflection.component().ends_with("Orders"));
}

#[test]
fn test_macro_component_is_wired() {
    let (registry, host) = common::setup();
    let orders = registry.instance::<Orders>(()).unwrap();

    let save = host.actions("save_order");
    assert_eq!(save[0].priority, 20);
    assert_eq!(save[0].arg_count, ArgCount::Exact(2));
    host.do_action("save_order", &[json!(42), json!(false)]).unwrap();
    assert_eq!(orders.saved.load(Ordering::SeqCst), 42);

    let totals = host
        .apply_filters("order_totals", json!({ "net": 100, "tax": 0 }), &[])
        .unwrap();
    assert_eq!(
        serde_json::from_value::<Totals>(totals).unwrap(),
        Totals { net: 100, tax: 20 }
    );

    let refund = &host.actions("wp_ajax_handle_refund")[0];
    assert_eq!(refund.callback.call(&[json!(7)]).unwrap(), json!("refunded 7"));
    assert_eq!(host.actions("wp_ajax_nopriv_handle_refund").len(), 1);

    let (name, list) = &host.commands()[0];
    assert_eq!(name, "shop orders list");
    assert_eq!(list.call(&[json!("a"), json!("b")]).unwrap(), json!(2));

    let (name, last) = &host.shortcodes()[0];
    assert_eq!(name, "last_order");
    assert_eq!(last.call(&[]).unwrap(), json!(42));
}

#[test]
fn test_macro_component_exposes_routes() {
    let (registry, host) = common::setup();
    registry.instance::<Orders>(()).unwrap();

    host.do_action("init", &[]).unwrap();
    host.do_action("rest_api_init", &[]).unwrap();

    let routes = host.routes();
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].prefix, "shop/v3");
    assert_eq!(routes[0].base_path, "/orders");
}

#[test]
fn test_bad_argument_is_reported() {
    let (registry, host) = common::setup();
    registry.instance::<Orders>(()).unwrap();

    let err = host
        .do_action("save_order", &[json!("not a number"), json!(true)])
        .unwrap_err();
    assert!(matches!(err, CallbackError::Argument { index: 0, .. }));
}

struct Beacon;

impl Lifecycle for Beacon {
    type Args = ();

    fn construct(_: Construct) -> Self {
        Beacon
    }

    fn hooks() -> Option<Reflection<Self>> {
        Some(Self::reflection())
    }
}

#[docwire::hooks(autoload)]
impl Beacon {
    /// @action wp_footer
    fn ping(&self) {}
}

#[test]
fn test_autoload_instantiates_submitted_components() {
    let (registry, host) = common::setup();
    assert!(registry.get::<Beacon>().is_none());

    assert!(registry.load_registered().unwrap() >= 1);
    assert!(registry.get::<Beacon>().is_some());
    assert_eq!(host.actions("wp_footer").len(), 1);
}
