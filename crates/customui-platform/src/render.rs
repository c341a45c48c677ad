//! Widget tree → native controls.

use customui_core::{Container, NativeHandle, UiError, Widget, WidgetKind};

use crate::toolkit::Toolkit;

/// Creates and binds the native control of `widget` and, recursively, of
/// every descendant, placing each child in its container's layout slot.
pub fn render<T: Toolkit + ?Sized>(
    toolkit: &mut T,
    widget: &mut Widget,
    parent: Option<NativeHandle>,
) -> Result<NativeHandle, UiError> {
    let handle = widget.bind_native(|w| toolkit.create(w, parent))?;
    toolkit.connect(handle);

    match &mut widget.kind {
        WidgetKind::Tabs(tabs) => {
            for (index, tab) in tabs.pages.iter_mut().enumerate() {
                let page = toolkit.create_page(handle, index, &tab.title);
                tab.page = Some(page);
                place_children(toolkit, &mut tab.body, page)?;
            }
        }
        kind => {
            for container in kind.containers_mut() {
                place_children(toolkit, container, handle)?;
            }
        }
    }
    Ok(handle)
}

fn place_children<T: Toolkit + ?Sized>(
    toolkit: &mut T,
    container: &mut Container,
    parent: NativeHandle,
) -> Result<(), UiError> {
    for (slot, child) in container.cells_mut() {
        let handle = render(toolkit, child, Some(parent))?;
        toolkit.place(parent, handle, slot);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessToolkit;
    use customui_core::{Proxy, Slot, UiError};

    #[test]
    fn test_grid_children_placed_by_cell() {
        let (mut tk, probe) = HeadlessToolkit::new();
        let mut proxy = Proxy::parse(
            r#"<ui layout="grid"><label id="1"/><edit id="2"/><br/><button id="3"/></ui>"#,
        )
        .unwrap();
        let root = render(&mut tk, proxy.root_mut().unwrap(), None).unwrap();

        let children = probe.children(root);
        assert_eq!(
            children.iter().map(|(s, _)| *s).collect::<Vec<_>>(),
            vec![
                Slot::Grid { row: 0, column: 0 },
                Slot::Grid { row: 0, column: 1 },
                Slot::Grid { row: 1, column: 0 },
            ]
        );
        assert_eq!(Some(children[2].1), probe.handle_of(proxy.handle(), 3));
    }

    #[test]
    fn test_tab_pages_get_controls() {
        let (mut tk, probe) = HeadlessToolkit::new();
        let mut proxy = Proxy::parse(
            r#"<ui><tabs id="1"><tab title="A"><button id="2"/></tab><tab title="B"/></tabs></ui>"#,
        )
        .unwrap();
        render(&mut tk, proxy.root_mut().unwrap(), None).unwrap();
        // window, tabs, two pages, button
        assert_eq!(probe.live_controls(), 5);

        let tabs = probe.handle_of(proxy.handle(), 1).unwrap();
        let pages = probe.children(tabs);
        assert_eq!(pages.len(), 2);
        let button = probe.handle_of(proxy.handle(), 2).unwrap();
        assert_eq!(probe.control(button).unwrap().parent, Some(pages[0].1));

        proxy.destroy(&mut |h| tk.release(h));
        assert_eq!(probe.live_controls(), 0);
    }

    #[test]
    fn test_render_twice_fails() {
        let (mut tk, _probe) = HeadlessToolkit::new();
        let mut proxy = Proxy::parse("<ui/>").unwrap();
        let root = proxy.root_mut().unwrap();
        render(&mut tk, root, None).unwrap();
        assert_eq!(render(&mut tk, root, None), Err(UiError::AlreadyBound));
        proxy.destroy(&mut |h| tk.release(h));
    }
}
