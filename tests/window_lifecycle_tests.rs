mod common;

use common::{TestShell, descriptor};
use webdesk::config::defaults::DEFAULT_URL;
use webdesk::descriptor::WindowDescriptor;

#[test]
fn test_first_launch_opens_default_window() {
    let mut shell = TestShell::new();
    shell.open();

    assert_eq!(shell.manager.window_count(), 1);
    let id = shell.ids()[0];
    let window = shell.window(id);
    assert_eq!(window.borrow().current_url(), DEFAULT_URL);
    assert_eq!(shell.host.created_options[0].size, Some((1200, 800)));
    assert_eq!(shell.host.created_options[0].position, None);
    assert!(shell.manager.lifecycle_faults().is_empty());
}

#[test]
fn test_windows_start_hidden_with_loading_title_then_show() {
    let mut shell = TestShell::new();
    shell.open();

    let options = &shell.host.created_options[0];
    assert!(!options.visible);
    assert_eq!(options.title, "Loading - Onshape Desktop");
    assert!(shell.window(shell.ids()[0]).borrow().visible);
}

#[test]
fn test_saved_layout_is_restored_in_order() {
    let mut shell = TestShell::with_saved(
        r#"[
            {"url":"https://cad.onshape.com/documents/1","width":900,"height":700,"x":40,"y":60,"maximized":false},
            {"url":"https://cad.onshape.com/documents/2","width":640,"height":480}
        ]"#,
    );
    shell.open();

    let ids = shell.ids();
    assert_eq!(ids.len(), 2);
    assert_eq!(
        shell.window(ids[0]).borrow().current_url(),
        "https://cad.onshape.com/documents/1"
    );
    assert_eq!(
        shell.window(ids[1]).borrow().current_url(),
        "https://cad.onshape.com/documents/2"
    );
    assert_eq!(shell.host.created_options[0].size, Some((900, 700)));
    assert_eq!(shell.host.created_options[0].position, Some((40, 60)));
    assert_eq!(shell.host.created_options[1].position, None);
}

#[test]
fn test_maximized_descriptor_is_maximized_without_bounds() {
    let mut shell = TestShell::with_saved(r#"[{"url":"https://cad.onshape.com/","maximized":true}]"#);
    shell.open();

    let window = shell.window(shell.ids()[0]);
    assert!(window.borrow().maximized);
    assert_eq!(window.borrow().maximize_calls, 1);
    assert_eq!(shell.host.created_options[0].size, None);
    assert_eq!(shell.host.created_options[0].position, None);
}

#[test]
fn test_invalid_urls_are_replaced_by_default() {
    let mut shell = TestShell::with_saved(r#"[{"url":""},{"url":"about:blank"}]"#);
    shell.open();

    for id in shell.ids() {
        assert_eq!(shell.window(id).borrow().current_url(), DEFAULT_URL);
        assert_eq!(shell.manager.descriptor(id).unwrap().url, DEFAULT_URL);
    }
}

#[test]
fn test_empty_saved_layout_resets_to_default() {
    let mut shell = TestShell::with_saved("[]");
    shell.open();

    assert_eq!(shell.manager.window_count(), 1);
    assert_eq!(
        shell.persisted(),
        vec![WindowDescriptor::with_size(DEFAULT_URL, 1200, 800)]
    );
}

#[test]
fn test_malformed_saved_layout_falls_back_to_default() {
    let mut shell = TestShell::with_saved("{\"url\": 5");
    shell.open();

    assert_eq!(shell.manager.window_count(), 1);
    assert_eq!(
        shell.window(shell.ids()[0]).borrow().current_url(),
        DEFAULT_URL
    );
}

#[test]
fn test_failed_window_creation_is_skipped() {
    let mut shell = TestShell::with_saved(
        r#"[{"url":"https://cad.onshape.com/documents/1"},{"url":"https://cad.onshape.com/documents/2"}]"#,
    );
    shell.host.failures_pending = 1;
    shell.open();

    assert_eq!(shell.host.created_options.len(), 2);
    assert_eq!(shell.manager.window_count(), 1);
    assert_eq!(
        shell.window(shell.ids()[0]).borrow().current_url(),
        "https://cad.onshape.com/documents/2"
    );
}

#[test]
fn test_open_new_window_uses_default_size() {
    let mut shell = TestShell::new();
    let id = shell
        .manager
        .open_new_window(&mut shell.host, Some("https://cad.onshape.com/documents/9"))
        .unwrap();

    assert_eq!(
        shell.manager.descriptor(id),
        Some(&WindowDescriptor::with_size(
            "https://cad.onshape.com/documents/9",
            1200,
            800
        ))
    );

    let default_id = shell.manager.open_new_window(&mut shell.host, None).unwrap();
    assert_eq!(shell.manager.descriptor(default_id).unwrap().url, DEFAULT_URL);
    assert_eq!(shell.manager.window_count(), 2);
}

#[test]
fn test_opening_windows_does_not_write_state() {
    let mut shell = TestShell::with_saved(r#"[{"url":"https://cad.onshape.com/documents/1"}]"#);
    shell.open();
    assert_eq!(shell.store.writes(), 0);
    assert_eq!(
        shell.persisted(),
        vec![descriptor("https://cad.onshape.com/documents/1")]
    );
}
