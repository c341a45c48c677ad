use std::time::Duration;

use customui_core::{
    ComboboxOp, Event, Mutation, Query, TableOp, UiError, UserInput, Value, WidgetClass,
    registry,
};
use customui_platform::{Bridge, BridgeConfig, BridgeError, HeadlessProbe, HeadlessToolkit};

const WAIT: Duration = Duration::from_secs(2);

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn bridge() -> (Bridge, HeadlessProbe) {
    init();
    let (toolkit, probe) = HeadlessToolkit::new();
    let config = BridgeConfig::default().poll_interval(Duration::from_millis(2));
    let bridge = Bridge::spawn(config, move || toolkit).unwrap();
    (bridge, probe)
}

const DIALOG: &str = r#"
<ui title="Joint" layout="form" closeable="true" onclose="closed">
  <label text="Angle"/>
  <hslider id="1" minimum="-90" maximum="90" onchange="angleChanged"/>
  <label text="Name"/>
  <edit id="2" value="j1" oneditingfinished="renamed"/>
  <label text="Mode"/>
  <combobox id="3" onchange="modeChanged"><item>pos</item><item>vel</item></combobox>
  <button id="4" text="Apply" onclick="apply"/>
  <checkbox id="5" text="Lock"/>
</ui>"#;

#[test]
fn test_user_input_reaches_host() {
    let (bridge, probe) = bridge();
    let p = bridge.create(DIALOG).unwrap();
    // barrier: the create command has run once a query answers
    bridge.query(p, 4, Query::Text).unwrap();

    let button = probe.handle_of(p, 4).unwrap();
    probe.user(button, UserInput::Clicked);
    let n = bridge.recv_timeout(WAIT).unwrap();
    assert_eq!((n.proxy, n.widget), (p, 4));
    assert_eq!(n.handler.as_deref(), Some("apply"));
    assert_eq!(n.event, Event::Clicked);

    let edit = probe.handle_of(p, 2).unwrap();
    probe.user(edit, UserInput::TextChanged("j2".into()));
    probe.user(edit, UserInput::EditingFinished);
    let changed = bridge.recv_timeout(WAIT).unwrap();
    let finished = bridge.recv_timeout(WAIT).unwrap();
    assert_eq!(changed.event, Event::ValueChangedString("j2".into()));
    assert_eq!(changed.handler, None);
    assert_eq!(finished.event, Event::EditingFinished("j2".into()));
    assert_eq!(finished.handler.as_deref(), Some("renamed"));

    bridge.shutdown().unwrap();
}

#[test]
fn test_suppressed_mutation_is_silent() {
    let (bridge, _probe) = bridge();
    let p = bridge.create(DIALOG).unwrap();

    bridge
        .apply_blocking(p, 1, Mutation::SetInt(45), true)
        .unwrap();
    // a second round trip guarantees the render loop pumped after the first
    assert_eq!(bridge.query(p, 1, Query::Value).unwrap(), Value::Int(45));
    assert!(bridge.try_recv().is_none());

    bridge.apply(p, 1, Mutation::SetInt(-10), false).unwrap();
    let n = bridge.recv_timeout(WAIT).unwrap();
    assert_eq!(n.widget, 1);
    assert_eq!(n.event, Event::ValueChangedInt(-10));
    assert_eq!(n.handler.as_deref(), Some("angleChanged"));
}

#[test]
fn test_commands_run_in_order() {
    let (bridge, _probe) = bridge();
    let p = bridge.create(DIALOG).unwrap();
    for v in [10, 20, 30] {
        bridge.apply(p, 1, Mutation::SetInt(v), true).unwrap();
    }
    bridge
        .apply(
            p,
            3,
            Mutation::Combobox(ComboboxOp::Insert {
                index: 0,
                text: "eff".into(),
            }),
            true,
        )
        .unwrap();
    assert_eq!(bridge.query(p, 1, Query::Value).unwrap(), Value::Int(30));
    assert_eq!(
        bridge.query(p, 3, Query::Items).unwrap(),
        Value::List(vec!["eff".into(), "pos".into(), "vel".into()])
    );
    assert_eq!(bridge.query(p, 3, Query::CurrentIndex).unwrap(), Value::Int(1));
}

#[test]
fn test_rejected_mutations() {
    let (bridge, _probe) = bridge();
    let p = bridge.create(DIALOG).unwrap();
    let err = bridge
        .apply_blocking(p, 5, Mutation::Table(TableOp::Clear), false)
        .unwrap_err();
    assert!(matches!(
        err,
        BridgeError::Ui(UiError::Unsupported {
            class: "checkbox",
            ..
        })
    ));
    let err = bridge
        .apply_blocking(p, 77, Mutation::SetEnabled(false), false)
        .unwrap_err();
    assert!(matches!(err, BridgeError::Ui(UiError::Destroyed(77))));
}

#[test]
fn test_parse_errors_come_back_to_host() {
    let (bridge, _probe) = bridge();
    let err = bridge
        .create(r#"<ui layout="form"><button/><label/><button/></ui>"#)
        .unwrap_err();
    let BridgeError::Parse(errors) = err else {
        panic!("expected parse errors, got {err:?}");
    };
    assert!(errors.contains("extra elements in layout"));
}

#[test]
fn test_destroy_releases_everything() {
    let (bridge, probe) = bridge();
    let p = bridge.create(DIALOG).unwrap();
    bridge.show(p).unwrap();
    bridge.query(p, 1, Query::Value).unwrap();
    let slider = probe.handle_of(p, 1).unwrap();
    assert!(probe.children(slider).is_empty());
    assert_eq!(
        probe.control(slider).unwrap().class,
        Some(WidgetClass::HSlider)
    );

    // the window plus its eight children
    assert_eq!(probe.live_controls(), 9);
    assert_eq!(registry::widgets_of(p).len(), 9);

    bridge.destroy(p).unwrap();
    // queued after the destroy: must be a no-op, not a fault
    bridge.apply(p, 1, Mutation::SetInt(5), false).unwrap();
    assert!(matches!(
        bridge.query(p, 1, Query::Value),
        Err(BridgeError::Ui(UiError::Destroyed(1)))
    ));

    assert_eq!(probe.live_controls(), 0);
    assert_eq!(probe.released(), 9);
    assert!(registry::widgets_of(p).is_empty());
    assert_eq!(registry::by_native(slider), None);
    assert!(bridge.try_recv().is_none());
}

#[test]
fn test_window_close_request() {
    let (bridge, probe) = bridge();
    let p = bridge.create(r#"<ui id="100" closeable="true" onclose="closed"/>"#).unwrap();
    // visible as soon as it is created
    assert_eq!(bridge.query(p, 100, Query::Visible).unwrap(), Value::Bool(true));
    let window = probe.handle_of(p, 100).unwrap();
    assert!(probe.control(window).unwrap().shown);
    probe.user(window, UserInput::CloseRequested);
    let n = bridge.recv_timeout(WAIT).unwrap();
    assert_eq!(n.event, Event::WindowClosed);
    assert_eq!(n.handler.as_deref(), Some("closed"));
    assert_eq!(bridge.query(p, 100, Query::Visible).unwrap(), Value::Bool(false));

    bridge.show(p).unwrap();
    assert_eq!(bridge.query(p, 100, Query::Visible).unwrap(), Value::Bool(true));
}

#[test]
fn test_shutdown_destroys_remaining_proxies() {
    let (bridge, probe) = bridge();
    let p = bridge.create(DIALOG).unwrap();
    bridge.query(p, 1, Query::Value).unwrap();
    assert!(probe.live_controls() > 0);
    bridge.shutdown().unwrap();
    assert_eq!(probe.live_controls(), 0);
    assert!(registry::widgets_of(p).is_empty());
}
