//! One host-visible UI session.

use crate::class::WidgetClass;
use crate::error::{ParseErrors, UiError};
use crate::ids::{NativeHandle, ProxyHandle, WidgetId, next_proxy_handle};
use crate::kinds::Window;
use crate::markup::Element;
use crate::registry;
use crate::widget::{Widget, WidgetKind};

/// Owns one widget tree (rooted at a window) and the id table its widgets
/// register in. Addressed by the host through [`Proxy::handle`].
#[derive(Debug)]
pub struct Proxy {
    handle: ProxyHandle,
    root: Option<Widget>,
}

impl Proxy {
    pub fn new() -> Proxy {
        let handle = next_proxy_handle();
        registry::open_proxy(handle);
        log::info!("proxy {handle} opened");
        Proxy { handle, root: None }
    }

    /// Parses a whole document into a new proxy. The root must be `<ui>`.
    pub fn parse(xml: &str) -> Result<Proxy, ParseErrors> {
        let el = Element::parse_document(xml)?;
        let mut proxy = Proxy::new();
        proxy.load(&el)?;
        Ok(proxy)
    }

    pub fn load(&mut self, el: &Element) -> Result<(), ParseErrors> {
        if self.root.is_some() {
            return Err(UiError::InvalidArgument(format!(
                "proxy {} already holds a window",
                self.handle
            ))
            .into());
        }
        self.root = Some(Widget::parse(el, WidgetClass::Window, self.handle)?);
        Ok(())
    }

    pub fn handle(&self) -> ProxyHandle {
        self.handle
    }

    /// Whether `handle` names a proxy that is still open.
    pub fn exists(handle: ProxyHandle) -> bool {
        registry::proxy_exists(handle)
    }

    pub fn root(&self) -> Option<&Widget> {
        self.root.as_ref()
    }

    pub fn root_mut(&mut self) -> Option<&mut Widget> {
        self.root.as_mut()
    }

    pub fn window(&self) -> Option<&Window> {
        match &self.root.as_ref()?.kind {
            WidgetKind::Window(w) => Some(w),
            _ => None,
        }
    }

    pub fn get_widget_by_id(&self, id: WidgetId) -> Option<&Widget> {
        self.root.as_ref()?.find(id)
    }

    pub fn get_widget_by_id_mut(&mut self, id: WidgetId) -> Option<&mut Widget> {
        self.root.as_mut()?.find_mut(id)
    }

    /// Tears the tree down, handing every native control to `release`, and
    /// closes the id table.
    pub fn destroy(mut self, release: &mut dyn FnMut(NativeHandle)) {
        if let Some(root) = self.root.take() {
            root.destroy(release);
        }
        registry::close_proxy(self.handle);
        log::info!("proxy {} destroyed", self.handle);
    }
}

impl Default for Proxy {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Proxy {
    fn drop(&mut self) {
        if let Some(root) = self.root.take() {
            let mut leaked = 0;
            root.destroy(&mut |_| leaked += 1);
            if leaked > 0 {
                log::warn!(
                    "proxy {} dropped with {leaked} native control(s) still bound",
                    self.handle
                );
            }
        }
        registry::close_proxy(self.handle);
    }
}
