#[cfg(test)]
mod tests {
    use crate::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_two_buttons_vbox() {
        init();
        let proxy =
            Proxy::parse(r#"<ui layout="vbox"><button id="5" text="OK"/><button text="Cancel"/></ui>"#)
                .unwrap();
        let root = proxy.root().unwrap();
        let ids: Vec<WidgetId> = root.children().iter().map(|w| w.id()).collect();
        assert_eq!(ids[0], 5);
        assert!(ids[1] < 0);

        let WidgetKind::Window(window) = &root.kind else {
            panic!("root is not a window");
        };
        assert_eq!(window.title, "Custom UI");
        assert_eq!(window.body.layout, Layout::VBox);
        assert_eq!(window.body.rows.len(), 2);
        assert!(window.body.rows.iter().all(|r| r.len() == 1));

        let WidgetKind::Button(ok) = &proxy.get_widget_by_id(5).unwrap().kind else {
            panic!("id 5 is not a button");
        };
        assert_eq!(ok.text, "OK");
    }

    #[test]
    fn test_outline_snapshot() {
        let proxy = Proxy::parse(
            r#"<ui title="Demo" layout="form">
                 <label text="Name"/><edit id="1"/>
                 <label text="Mode"/>
                 <tabs id="2">
                   <tab title="A" layout="grid"><button id="3"/><checkbox/><br/><stretch/></tab>
                   <tab title="B"><group layout="hbox"><radiobutton/></group></tab>
                 </tabs>
               </ui>"#,
        )
        .unwrap();
        insta::assert_snapshot!(proxy.root().unwrap().outline().trim_end(), @r###"
        ui id=auto layout=form
          [0:label] label id=auto
          [0:field] edit id=1
          [1:label] label id=auto
          [1:field] tabs id=2
            tab "A" layout=grid
              [0,0] button id=3
              [0,1] checkbox id=auto
              [1,0] stretch id=auto
            tab "B" layout=vbox
              [0] group id=auto layout=hbox
                [0] radiobutton id=auto
        "###);
    }

    #[test]
    fn test_odd_form_fails() {
        let err = Proxy::parse(r#"<ui><group layout="form"><button/><label/><button/></group></ui>"#)
            .unwrap_err();
        assert!(err.contains("extra elements in layout"));
    }

    #[test]
    fn test_malformed_minimum_uses_default() {
        let proxy = Proxy::parse(r#"<ui><hslider id="1" minimum="abc"/></ui>"#).unwrap();
        let WidgetKind::Slider(s) = &proxy.get_widget_by_id(1).unwrap().kind else {
            panic!("not a slider");
        };
        assert_eq!(s.range.minimum, 0);
        assert_eq!(s.range.maximum, 100);
    }

    #[test]
    fn test_root_must_be_ui() {
        let err = Proxy::parse("<group/>").unwrap_err();
        assert_eq!(err.messages, vec!["element must be <ui>".to_string()]);
    }

    #[test]
    fn test_errors_are_collected() {
        let err = Proxy::parse(r#"<ui layout="diagonal"/>"#).unwrap_err();
        assert!(err.contains("invalid value for attribute 'layout'"));

        let err = Proxy::parse(
            r#"<ui><button id="0"/><slider/><group layout="grid"><label id="-2"/></group></ui>"#,
        )
        .unwrap_err();
        assert_eq!(err.messages.len(), 3, "{err}");
        assert!(err.contains("invalid element <slider>"));
    }

    #[test]
    fn test_duplicate_id_in_document() {
        let err = Proxy::parse(r#"<ui><button id="7"/><label id="7"/></ui>"#).unwrap_err();
        assert!(err.contains("duplicate id 7"));
    }

    #[test]
    fn test_failed_parse_leaves_nothing_registered() {
        let mut proxy = Proxy::new();
        let handle = proxy.handle();
        let el = Element::parse_document(r#"<ui><button id="3"/><nope/></ui>"#).unwrap();
        assert!(proxy.load(&el).is_err());
        assert_eq!(Widget::by_id(handle, 3), None);
        assert!(registry::widgets_of(handle).is_empty());
    }

    #[test]
    fn test_lookup_misses_are_none() {
        assert_eq!(Widget::by_id(i32::MAX, 1), None);
        assert_eq!(Widget::by_native(NativeHandle(u64::MAX)), None);
        let proxy = Proxy::parse("<ui/>").unwrap();
        assert!(proxy.get_widget_by_id(99).is_none());
        assert_eq!(Widget::by_id(proxy.handle(), 99), None);
    }

    #[test]
    fn test_destroy_proxy_clears_registries() {
        init();
        let mut proxy = Proxy::parse(
            r#"<ui><group id="1"><button id="2"/><edit id="3"/></group><label id="4"/></ui>"#,
        )
        .unwrap();
        let handle = proxy.handle();

        let mut next = 0xc0de_0000;
        let mut bound = Vec::new();
        let mut keys = Vec::new();
        for id in [1, 2, 3, 4] {
            let w = proxy.get_widget_by_id_mut(id).unwrap();
            keys.push(w.key());
            next += 1;
            bound.push(w.bind_native(|_| NativeHandle(next)).unwrap());
        }
        assert_eq!(Widget::by_native(bound[1]).map(|r| r.id), Some(2));

        let mut released = Vec::new();
        proxy.destroy(&mut |h| released.push(h));

        // children go before their parents
        let pos = |h| released.iter().position(|r| *r == h).unwrap();
        assert!(pos(bound[1]) < pos(bound[0]));
        assert_eq!(released.len(), 4);

        for (h, key) in bound.iter().zip(&keys) {
            assert_eq!(Widget::by_native(*h), None);
            assert!(!registry::exists(*key));
        }
        assert!(!Proxy::exists(handle));
        assert_eq!(Widget::by_id(handle, 2), None);
    }

    #[test]
    fn test_table_state_through_widget() {
        let mut proxy = Proxy::parse(
            r#"<ui><table id="1"><header><item>a</item><item>b</item></header>
                 <row><item>1</item><item>2</item></row></table></ui>"#,
        )
        .unwrap();
        let table = proxy.get_widget_by_id_mut(1).unwrap();
        table
            .apply(&Mutation::Table(TableOp::SetSelection { row: 0, column: 1 }))
            .unwrap();
        table.handle_input(UserInput::SortChanged {
            column: 1,
            order: SortOrder::Descending,
        });
        table.handle_input(UserInput::ColumnResized {
            column: 0,
            width: 140,
        });
        let blob = table.query(&Query::SaveState).unwrap();
        let blob = blob.as_text().unwrap().to_string();
        let state: serde_json::Value = serde_json::from_str(&blob).unwrap();
        assert_eq!(state["column_widths"], serde_json::json!([140, 100]));
        assert_eq!(state["sort"]["column"], serde_json::json!(1));

        table
            .apply(&Mutation::Table(TableOp::SetSelection { row: -1, column: -1 }))
            .unwrap();
        table.handle_input(UserInput::SortChanged {
            column: 0,
            order: SortOrder::Ascending,
        });
        table.handle_input(UserInput::ColumnResized {
            column: 0,
            width: 60,
        });
        table
            .apply(&Mutation::Table(TableOp::RestoreState(blob)))
            .unwrap();
        assert_eq!(
            table.query(&Query::TableSelection),
            Ok(Value::Cell { row: 0, column: 1 })
        );
        let WidgetKind::Table(t) = &table.kind else {
            panic!("expected a table");
        };
        assert_eq!(
            t.sort,
            Some(SortKey {
                column: 1,
                order: SortOrder::Descending
            })
        );
        assert_eq!(t.columns[0].width, 140);
    }

    #[test]
    fn test_input_becomes_notification() {
        let mut proxy =
            Proxy::parse(r#"<ui><checkbox id="9" onchange="onToggle"/><button id="10"/></ui>"#)
                .unwrap();
        let handle = proxy.handle();
        let n = proxy
            .get_widget_by_id_mut(9)
            .unwrap()
            .handle_input(UserInput::Toggled(true))
            .unwrap();
        assert_eq!(
            n,
            Notification {
                proxy: handle,
                widget: 9,
                handler: Some("onToggle".into()),
                event: Event::ValueChangedInt(1),
            }
        );

        let n = proxy
            .get_widget_by_id_mut(10)
            .unwrap()
            .handle_input(UserInput::Clicked)
            .unwrap();
        assert_eq!(n.handler, None);
        assert_eq!(n.event, Event::Clicked);
    }
}
