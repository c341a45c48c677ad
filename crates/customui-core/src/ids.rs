//! Identifiers.
//!
//! Widget ids are scoped to their proxy. Ids written in markup are positive;
//! ids the parser assigns itself are negative and come from a single
//! process-wide counter that only ever decreases, so the sign of an id tells
//! you where it came from.

use std::sync::atomic::{AtomicI32, AtomicU64, Ordering};

pub type WidgetId = i32;

/// Host-visible handle of a [`crate::Proxy`].
pub type ProxyHandle = i32;

/// Process-unique identity of one widget instance. Never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetKey(u64);

/// Identity of one native control, as handed out by the toolkit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NativeHandle(pub u64);

static NEXT_AUTO_ID: AtomicI32 = AtomicI32::new(-1);
static NEXT_KEY: AtomicU64 = AtomicU64::new(1);
static NEXT_PROXY: AtomicI32 = AtomicI32::new(1);

/// Next automatically assigned widget id: -1, -2, -3, ...
pub fn next_auto_id() -> WidgetId {
    NEXT_AUTO_ID.fetch_sub(1, Ordering::Relaxed)
}

pub(crate) fn next_key() -> WidgetKey {
    WidgetKey(NEXT_KEY.fetch_add(1, Ordering::Relaxed))
}

pub(crate) fn next_proxy_handle() -> ProxyHandle {
    NEXT_PROXY.fetch_add(1, Ordering::Relaxed)
}

pub fn is_auto_id(id: WidgetId) -> bool {
    id < 0
}
