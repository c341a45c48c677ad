use std::time::Duration;

use customui_core::{Mutation, Query, TableOp, UserInput};
use customui_platform::{Bridge, BridgeConfig, HeadlessToolkit};

const DIALOG: &str = r#"
<ui id="1" title="Joint settings" layout="vbox" closeable="true" onclose="closed">
  <group text="Motion" layout="form">
    <label text="Target"/>
    <hslider id="10" minimum="-180" maximum="180" onchange="targetChanged"/>
    <label text="Speed"/>
    <spinbox id="11" minimum="0" maximum="10" step="0.5" float="true" suffix=" rad/s"/>
  </group>
  <table id="20" onselectionchange="rowPicked">
    <row><item>j1</item><item>0.0</item></row>
    <row><item>j2</item><item>1.5</item></row>
  </table>
  <group layout="hbox" flat="true">
    <stretch/>
    <button id="30" text="Apply" onclick="apply"/>
  </group>
</ui>"#;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let (toolkit, probe) = HeadlessToolkit::new();
    let bridge = Bridge::spawn(BridgeConfig::default().thread_name("dialog"), move || toolkit)?;

    let dialog = bridge.create(DIALOG)?;
    bridge.show(dialog)?;
    bridge.apply(dialog, 10, Mutation::SetInt(45), true)?;
    bridge.apply(
        dialog,
        20,
        Mutation::Table(TableOp::SetItem {
            row: 1,
            column: 1,
            text: "2.0".into(),
        }),
        false,
    )?;
    log::info!(
        "target = {:?}, rows = {:?}",
        bridge.query(dialog, 10, Query::Value)?,
        bridge.query(dialog, 20, Query::RowCount)?
    );

    // pretend a user is at the controls
    for (id, input) in [
        (10, UserInput::IntChanged(-30)),
        (20, UserInput::CellSelected { row: 1, column: 0 }),
        (30, UserInput::Clicked),
        (1, UserInput::CloseRequested),
    ] {
        match probe.handle_of(dialog, id) {
            Some(handle) => probe.user(handle, input),
            None => log::warn!("no control for widget {id}"),
        }
    }

    while let Some(n) = bridge.recv_timeout(Duration::from_millis(100)) {
        println!(
            "{}/{} {:?} -> {}",
            n.proxy,
            n.widget,
            n.event,
            n.handler.as_deref().unwrap_or("-")
        );
    }

    let state = bridge.query(dialog, 20, Query::SaveState)?;
    log::info!("table state: {state:?}");

    bridge.destroy(dialog)?;
    bridge.shutdown()
}
