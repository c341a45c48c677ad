//! The rendering context: owns every proxy and every native control.
//!
//! Commands are executed strictly in the order they arrive. A command whose
//! target has vanished in the meantime is dropped with a log line.

use std::collections::HashMap;
use std::ops::ControlFlow;
use std::sync::mpsc::{Sender, SyncSender};

use customui_core::{
    Mutation, Notification, Proxy, ProxyHandle, Query, UiError, Value, Widget, WidgetId, WindowOp,
    registry,
};

use crate::render::render;
use crate::toolkit::Toolkit;

pub type Reply<T> = SyncSender<Result<T, UiError>>;

pub enum Command {
    Create(Proxy),
    Destroy(ProxyHandle),
    Window {
        proxy: ProxyHandle,
        op: WindowOp,
    },
    Mutate {
        proxy: ProxyHandle,
        widget: WidgetId,
        mutation: Mutation,
        suppress: bool,
        reply: Option<Reply<()>>,
    },
    Query {
        proxy: ProxyHandle,
        widget: WidgetId,
        query: Query,
        reply: Reply<Value>,
    },
    Shutdown,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Create(p) => write!(f, "Create({})", p.handle()),
            Command::Destroy(p) => write!(f, "Destroy({p})"),
            Command::Window { proxy, op } => write!(f, "Window({proxy}, {op:?})"),
            Command::Mutate {
                proxy,
                widget,
                mutation,
                suppress,
                ..
            } => write!(
                f,
                "Mutate({proxy}/{widget}, {}, suppress={suppress})",
                mutation.name()
            ),
            Command::Query {
                proxy,
                widget,
                query,
                ..
            } => write!(f, "Query({proxy}/{widget}, {query:?})"),
            Command::Shutdown => write!(f, "Shutdown"),
        }
    }
}

pub struct RenderContext<T: Toolkit> {
    toolkit: T,
    proxies: HashMap<ProxyHandle, Proxy>,
    events: Sender<Notification>,
}

impl<T: Toolkit> RenderContext<T> {
    pub fn new(toolkit: T, events: Sender<Notification>) -> Self {
        Self {
            toolkit,
            proxies: HashMap::new(),
            events,
        }
    }

    pub fn toolkit(&mut self) -> &mut T {
        &mut self.toolkit
    }

    pub fn proxy(&self, handle: ProxyHandle) -> Option<&Proxy> {
        self.proxies.get(&handle)
    }

    pub fn execute(&mut self, command: Command) -> ControlFlow<()> {
        log::trace!("execute {command:?}");
        match command {
            Command::Create(proxy) => self.create(proxy),
            Command::Destroy(handle) => self.destroy(handle),
            Command::Window { proxy, op } => {
                let root = self
                    .proxies
                    .get(&proxy)
                    .and_then(Proxy::root)
                    .map(Widget::id);
                match root {
                    Some(id) => {
                        if let Err(e) = self.mutate(proxy, id, &Mutation::Window(op), false) {
                            log::warn!("window operation on proxy {proxy} rejected: {e}");
                        }
                    }
                    None => log::debug!("window operation on closed proxy {proxy} dropped"),
                }
            }
            Command::Mutate {
                proxy,
                widget,
                mutation,
                suppress,
                reply,
            } => {
                let result = self.mutate(proxy, widget, &mutation, suppress);
                match reply {
                    Some(reply) => {
                        let _ = reply.send(result);
                    }
                    None => match result {
                        Ok(()) => {}
                        Err(UiError::Destroyed(_)) => log::debug!(
                            "{} for vanished widget {proxy}/{widget} dropped",
                            mutation.name()
                        ),
                        Err(e) => log::warn!(
                            "{} on widget {proxy}/{widget} rejected: {e}",
                            mutation.name()
                        ),
                    },
                }
            }
            Command::Query {
                proxy,
                widget,
                query,
                reply,
            } => {
                let result = self
                    .widget(proxy, widget)
                    .ok_or(UiError::Destroyed(widget))
                    .and_then(|w| w.query(&query));
                let _ = reply.send(result);
            }
            Command::Shutdown => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    fn create(&mut self, mut proxy: Proxy) {
        let handle = proxy.handle();
        if let Some(root) = proxy.root_mut()
            && let Err(e) = render(&mut self.toolkit, root, None)
        {
            log::warn!("rendering proxy {handle} failed: {e}");
        }
        log::info!("proxy {handle} rendered");
        self.proxies.insert(handle, proxy);
    }

    fn destroy(&mut self, handle: ProxyHandle) {
        match self.proxies.remove(&handle) {
            Some(proxy) => {
                let toolkit = &mut self.toolkit;
                proxy.destroy(&mut |h| toolkit.release(h));
            }
            None => log::debug!("proxy {handle} already destroyed"),
        }
    }

    fn widget(&self, proxy: ProxyHandle, id: WidgetId) -> Option<&Widget> {
        registry::by_id(proxy, id)?;
        self.proxies.get(&proxy)?.get_widget_by_id(id)
    }

    fn mutate(
        &mut self,
        proxy: ProxyHandle,
        id: WidgetId,
        mutation: &Mutation,
        suppress: bool,
    ) -> Result<(), UiError> {
        if registry::by_id(proxy, id).is_none() {
            return Err(UiError::Destroyed(id));
        }
        let widget = self
            .proxies
            .get_mut(&proxy)
            .and_then(|p| p.get_widget_by_id_mut(id))
            .ok_or(UiError::Destroyed(id))?;
        widget.apply(mutation)?;

        let Some(handle) = widget.native() else {
            return Ok(());
        };
        if suppress {
            let was = self.toolkit.block_signals(handle, true);
            self.toolkit.update(handle, widget, mutation);
            self.toolkit.block_signals(handle, was);
        } else {
            self.toolkit.update(handle, widget, mutation);
        }
        Ok(())
    }

    /// Turns pending native input into host notifications. Returns how many
    /// were sent.
    pub fn pump(&mut self) -> usize {
        let mut sent = 0;
        for event in self.toolkit.poll_events() {
            let Some(target) = registry::by_native(event.handle) else {
                log::debug!("input from unknown control {:?} dropped", event.handle);
                continue;
            };
            let Some(widget) = self
                .proxies
                .get_mut(&target.proxy)
                .and_then(|p| p.get_widget_by_id_mut(target.id))
            else {
                continue;
            };
            if let Some(notification) = widget.handle_input(event.input) {
                if self.events.send(notification).is_err() {
                    log::debug!("no one is listening for notifications");
                }
                sent += 1;
            }
        }
        sent
    }

    /// Destroys every proxy still alive.
    pub fn shutdown(&mut self) {
        let handles: Vec<ProxyHandle> = self.proxies.keys().copied().collect();
        for handle in handles {
            self.destroy(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessToolkit;
    use customui_core::{Event, UserInput};
    use std::sync::mpsc;

    fn context() -> (
        RenderContext<HeadlessToolkit>,
        crate::headless::HeadlessProbe,
        mpsc::Receiver<Notification>,
    ) {
        let (tk, probe) = HeadlessToolkit::new();
        let (tx, rx) = mpsc::channel();
        (RenderContext::new(tk, tx), probe, rx)
    }

    fn create(ctx: &mut RenderContext<HeadlessToolkit>, xml: &str) -> ProxyHandle {
        let proxy = Proxy::parse(xml).unwrap();
        let handle = proxy.handle();
        let _ = ctx.execute(Command::Create(proxy));
        handle
    }

    fn set_int(proxy: ProxyHandle, widget: WidgetId, v: i32, suppress: bool) -> Command {
        Command::Mutate {
            proxy,
            widget,
            mutation: Mutation::SetInt(v),
            suppress,
            reply: None,
        }
    }

    #[test]
    fn test_suppress_flag() {
        let (mut ctx, _probe, rx) = context();
        let p = create(&mut ctx, r#"<ui><hslider id="1" onchange="moved"/></ui>"#);

        let _ = ctx.execute(set_int(p, 1, 30, true));
        assert_eq!(ctx.pump(), 0);
        assert!(rx.try_recv().is_err());

        let _ = ctx.execute(set_int(p, 1, 40, false));
        assert_eq!(ctx.pump(), 1);
        let n = rx.try_recv().unwrap();
        assert_eq!(n.event, Event::ValueChangedInt(40));
        assert_eq!(n.handler.as_deref(), Some("moved"));
    }

    #[test]
    fn test_vanished_target_is_noop() {
        let (mut ctx, probe, rx) = context();
        let p = create(&mut ctx, r#"<ui><hslider id="1"/></ui>"#);
        let slider = probe.handle_of(p, 1).unwrap();
        probe.user(slider, UserInput::IntChanged(3));

        let _ = ctx.execute(Command::Destroy(p));
        let _ = ctx.execute(set_int(p, 1, 5, false));
        let _ = ctx.execute(Command::Destroy(p));
        assert_eq!(ctx.pump(), 0);
        assert!(rx.try_recv().is_err());
        assert_eq!(probe.live_controls(), 0);
    }

    #[test]
    fn test_blocking_mutation_reports_errors() {
        let (mut ctx, _probe, _rx) = context();
        let p = create(&mut ctx, r#"<ui><label id="1"/></ui>"#);
        let (tx, rx) = mpsc::sync_channel(1);
        let _ = ctx.execute(Command::Mutate {
            proxy: p,
            widget: 1,
            mutation: Mutation::SetInt(1),
            suppress: false,
            reply: Some(tx),
        });
        assert!(matches!(
            rx.recv().unwrap(),
            Err(UiError::Unsupported { class: "label", .. })
        ));
    }

    #[test]
    fn test_window_show_hide() {
        let (mut ctx, probe, _rx) = context();
        let p = create(&mut ctx, r#"<ui id="1" title="T"/>"#);
        let root = probe.handle_of(p, 1).unwrap();
        assert!(probe.control(root).unwrap().shown);
        let _ = ctx.execute(Command::Window {
            proxy: p,
            op: WindowOp::Hide,
        });
        assert!(!probe.control(root).unwrap().shown);
        let _ = ctx.execute(Command::Window {
            proxy: p,
            op: WindowOp::Show,
        });
        assert!(probe.control(root).unwrap().shown);
        ctx.shutdown();
        assert_eq!(probe.live_controls(), 0);
    }
}
