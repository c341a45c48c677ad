//! Process-wide widget registries.
//!
//! Three tables live behind one lock:
//!
//! - the existence set: every widget instance that has been parsed and not yet
//!   destroyed, keyed by [`WidgetKey`];
//! - the native reverse lookup: native control → widget, consulted on every
//!   native event;
//! - per-proxy id tables: widget id → widget, one per open proxy.
//!
//! The render context mutates them while building and tearing down trees; the
//! host context reads them (`by_id`, `proxy_exists`, ...). Both sides go
//! through the same `parking_lot::Mutex`, so reads never observe a half-done
//! registration.
//!
//! Init: empty at start. Teardown: when the last proxy closes, anything still
//! registered is reported and cleared.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use parking_lot::Mutex;

use crate::class::WidgetClass;
use crate::error::UiError;
use crate::ids::{NativeHandle, ProxyHandle, WidgetId, WidgetKey, next_key};

/// Copyable description of a live widget, as returned by every lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WidgetRef {
    pub key: WidgetKey,
    pub proxy: ProxyHandle,
    pub id: WidgetId,
    pub class: WidgetClass,
}

struct Entry {
    widget: WidgetRef,
    native: Option<NativeHandle>,
}

#[derive(Default)]
struct Registry {
    widgets: HashMap<WidgetKey, Entry>,
    by_native: HashMap<NativeHandle, WidgetKey>,
    proxies: HashMap<ProxyHandle, HashMap<WidgetId, WidgetKey>>,
}

static REGISTRY: Lazy<Mutex<Registry>> = Lazy::new(|| Mutex::new(Registry::default()));

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegistryStats {
    pub widgets: usize,
    pub native_handles: usize,
    pub proxies: usize,
}

pub fn stats() -> RegistryStats {
    let r = REGISTRY.lock();
    RegistryStats {
        widgets: r.widgets.len(),
        native_handles: r.by_native.len(),
        proxies: r.proxies.len(),
    }
}

pub fn exists(key: WidgetKey) -> bool {
    REGISTRY.lock().widgets.contains_key(&key)
}

pub fn proxy_exists(proxy: ProxyHandle) -> bool {
    REGISTRY.lock().proxies.contains_key(&proxy)
}

/// Looks `id` up in the table of `proxy`. A miss on either is `None`.
pub fn by_id(proxy: ProxyHandle, id: WidgetId) -> Option<WidgetRef> {
    let r = REGISTRY.lock();
    let key = r.proxies.get(&proxy)?.get(&id)?;
    r.widgets.get(key).map(|e| e.widget)
}

/// Reverse lookup from a native control. Unknown handles are `None`.
pub fn by_native(handle: NativeHandle) -> Option<WidgetRef> {
    let r = REGISTRY.lock();
    let key = r.by_native.get(&handle)?;
    r.widgets.get(key).map(|e| e.widget)
}

pub fn native_of(key: WidgetKey) -> Option<NativeHandle> {
    REGISTRY.lock().widgets.get(&key).and_then(|e| e.native)
}

/// All widgets currently registered under `proxy`, sorted by id.
pub fn widgets_of(proxy: ProxyHandle) -> Vec<WidgetRef> {
    let r = REGISTRY.lock();
    let Some(ids) = r.proxies.get(&proxy) else {
        return Vec::new();
    };
    let mut out: Vec<WidgetRef> = ids
        .values()
        .filter_map(|k| r.widgets.get(k).map(|e| e.widget))
        .collect();
    out.sort_by_key(|w| w.id);
    out
}

pub(crate) fn open_proxy(proxy: ProxyHandle) {
    REGISTRY.lock().proxies.entry(proxy).or_default();
}

/// Idempotent: closing an unknown or already closed proxy does nothing.
pub(crate) fn close_proxy(proxy: ProxyHandle) {
    let mut r = REGISTRY.lock();
    if r.proxies.remove(&proxy).is_none() {
        return;
    }
    if r.proxies.is_empty() && !r.widgets.is_empty() {
        log::warn!(
            "last proxy closed with {} widget(s) still registered; clearing",
            r.widgets.len()
        );
        r.widgets.clear();
        r.by_native.clear();
    }
}

pub(crate) fn bind_native(key: WidgetKey, handle: NativeHandle) -> Result<(), UiError> {
    let mut r = REGISTRY.lock();
    let entry = r
        .widgets
        .get_mut(&key)
        .ok_or_else(|| UiError::InvalidArgument("widget is not registered".into()))?;
    if entry.native.is_some() {
        return Err(UiError::AlreadyBound);
    }
    entry.native = Some(handle);
    r.by_native.insert(handle, key);
    Ok(())
}

/// Registration of one widget instance. Dropping it removes the instance
/// from every table, at most once.
#[derive(Debug)]
pub struct Registration {
    widget: WidgetRef,
}

impl Registration {
    /// Registers a freshly parsed widget with the existence set and with its
    /// proxy's id table.
    pub(crate) fn register(
        proxy: ProxyHandle,
        id: WidgetId,
        class: WidgetClass,
    ) -> Result<Registration, UiError> {
        let mut r = REGISTRY.lock();
        let ids = r.proxies.entry(proxy).or_default();
        if ids.contains_key(&id) {
            return Err(UiError::DuplicateId(id));
        }
        let widget = WidgetRef {
            key: next_key(),
            proxy,
            id,
            class,
        };
        ids.insert(id, widget.key);
        r.widgets.insert(
            widget.key,
            Entry {
                widget,
                native: None,
            },
        );
        Ok(Registration { widget })
    }

    pub fn widget(&self) -> WidgetRef {
        self.widget
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        let mut r = REGISTRY.lock();
        let key = self.widget.key;
        if let Some(entry) = r.widgets.remove(&key)
            && let Some(native) = entry.native
            && r.by_native.get(&native) == Some(&key)
        {
            r.by_native.remove(&native);
        }
        if let Some(ids) = r.proxies.get_mut(&self.widget.proxy)
            && ids.get(&self.widget.id) == Some(&key)
        {
            ids.remove(&self.widget.id);
        }
    }
}
