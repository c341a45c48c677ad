//! Host ↔ render thread bridge.
//!
//! The host side parses markup, queues commands and reads notifications.
//! The render thread owns the toolkit and a [`RenderContext`]; it executes
//! commands in submission order and forwards native input back as
//! [`Notification`]s, also in order.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use customui_core::{
    Mutation, Notification, ParseErrors, Point, Proxy, ProxyHandle, Query, Size, UiError, Value,
    WidgetId, WindowOp,
};
use thiserror::Error;

use crate::config::BridgeConfig;
use crate::context::{Command, RenderContext};
use crate::toolkit::Toolkit;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Parse(#[from] ParseErrors),

    #[error(transparent)]
    Ui(#[from] UiError),

    #[error("render thread has stopped")]
    Disconnected,
}

pub struct Bridge {
    commands: Sender<Command>,
    events: Receiver<Notification>,
    thread: Option<JoinHandle<()>>,
}

impl Bridge {
    /// Starts the render thread. `make_toolkit` runs on that thread, so the
    /// toolkit itself does not have to be `Send`.
    pub fn spawn<T, F>(config: BridgeConfig, make_toolkit: F) -> anyhow::Result<Bridge>
    where
        T: Toolkit + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let (commands, command_rx) = mpsc::channel::<Command>();
        let (event_tx, events) = mpsc::channel();
        let poll = config.poll_interval;

        let thread = std::thread::Builder::new()
            .name(config.thread_name.clone())
            .spawn(move || {
                let mut ctx = RenderContext::new(make_toolkit(), event_tx);
                log::info!("render thread started");
                loop {
                    match command_rx.recv_timeout(poll) {
                        Ok(command) => {
                            if ctx.execute(command).is_break() {
                                break;
                            }
                        }
                        Err(RecvTimeoutError::Timeout) => {}
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                    ctx.pump();
                }
                ctx.shutdown();
                log::info!("render thread stopped");
            })?;

        Ok(Bridge {
            commands,
            events,
            thread: Some(thread),
        })
    }

    fn send(&self, command: Command) -> Result<(), BridgeError> {
        self.commands
            .send(command)
            .map_err(|_| BridgeError::Disconnected)
    }

    /// Parses `xml` on the calling thread and queues the tree for rendering.
    /// Parse errors come back immediately; nothing is queued then.
    pub fn create(&self, xml: &str) -> Result<ProxyHandle, BridgeError> {
        let proxy = Proxy::parse(xml)?;
        let handle = proxy.handle();
        self.send(Command::Create(proxy))?;
        Ok(handle)
    }

    pub fn destroy(&self, proxy: ProxyHandle) -> Result<(), BridgeError> {
        self.send(Command::Destroy(proxy))
    }

    pub fn window(&self, proxy: ProxyHandle, op: WindowOp) -> Result<(), BridgeError> {
        self.send(Command::Window { proxy, op })
    }

    pub fn show(&self, proxy: ProxyHandle) -> Result<(), BridgeError> {
        self.window(proxy, WindowOp::Show)
    }

    pub fn hide(&self, proxy: ProxyHandle) -> Result<(), BridgeError> {
        self.window(proxy, WindowOp::Hide)
    }

    pub fn set_position(&self, proxy: ProxyHandle, pos: Point) -> Result<(), BridgeError> {
        self.window(proxy, WindowOp::SetPosition(pos))
    }

    pub fn set_size(&self, proxy: ProxyHandle, size: Size) -> Result<(), BridgeError> {
        self.window(proxy, WindowOp::SetSize(size))
    }

    pub fn set_title(&self, proxy: ProxyHandle, title: impl Into<String>) -> Result<(), BridgeError> {
        self.window(proxy, WindowOp::SetTitle(title.into()))
    }

    /// Queues a mutation and returns at once. Rejections are logged on the
    /// render thread. With `suppress`, the widget's own change notification
    /// does not fire.
    pub fn apply(
        &self,
        proxy: ProxyHandle,
        widget: WidgetId,
        mutation: Mutation,
        suppress: bool,
    ) -> Result<(), BridgeError> {
        self.send(Command::Mutate {
            proxy,
            widget,
            mutation,
            suppress,
            reply: None,
        })
    }

    /// Like [`Bridge::apply`], but waits for the render thread and returns
    /// the outcome.
    pub fn apply_blocking(
        &self,
        proxy: ProxyHandle,
        widget: WidgetId,
        mutation: Mutation,
        suppress: bool,
    ) -> Result<(), BridgeError> {
        let (reply, rx) = mpsc::sync_channel(1);
        self.send(Command::Mutate {
            proxy,
            widget,
            mutation,
            suppress,
            reply: Some(reply),
        })?;
        rx.recv().map_err(|_| BridgeError::Disconnected)??;
        Ok(())
    }

    /// Reads widget state, waiting until every earlier command has run.
    pub fn query(
        &self,
        proxy: ProxyHandle,
        widget: WidgetId,
        query: Query,
    ) -> Result<Value, BridgeError> {
        let (reply, rx) = mpsc::sync_channel(1);
        self.send(Command::Query {
            proxy,
            widget,
            query,
            reply,
        })?;
        Ok(rx.recv().map_err(|_| BridgeError::Disconnected)??)
    }

    pub fn try_recv(&self) -> Option<Notification> {
        self.events.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<Notification> {
        self.events.recv_timeout(timeout).ok()
    }

    pub fn events(&self) -> &Receiver<Notification> {
        &self.events
    }

    /// Stops the render thread after it has finished every queued command.
    /// Proxies still alive are destroyed on the way out.
    pub fn shutdown(mut self) -> anyhow::Result<()> {
        self.stop()
    }

    fn stop(&mut self) -> anyhow::Result<()> {
        let Some(thread) = self.thread.take() else {
            return Ok(());
        };
        let _ = self.commands.send(Command::Shutdown);
        thread
            .join()
            .map_err(|_| anyhow::anyhow!("render thread panicked"))
    }
}

impl Drop for Bridge {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            log::error!("{e}");
        }
    }
}
