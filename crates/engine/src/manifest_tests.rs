// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

fn app_fixture(name: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let app_path = dir.path().join(name);
    std::fs::create_dir_all(app_path.join(name)).unwrap();
    (dir, app_path)
}

#[test]
fn hooks_title_wins_over_manifest() {
    let (_dir, app_path) = app_fixture("erpnext");
    std::fs::write(
        app_path.join("erpnext/hooks.py"),
        "app_name = \"erpnext\"\napp_title = \"ERPNext\"\n",
    )
    .unwrap();
    std::fs::write(
        app_path.join("pyproject.toml"),
        "[project]\nname = \"erpnext-manifest\"\n",
    )
    .unwrap();

    assert_eq!(resolve_title(&app_path, "erpnext"), "ERPNext");
}

#[test]
fn manifest_name_used_when_hooks_has_no_title() {
    let (_dir, app_path) = app_fixture("hrms");
    std::fs::write(app_path.join("hrms/hooks.py"), "app_name = \"hrms\"\n").unwrap();
    std::fs::write(
        app_path.join("pyproject.toml"),
        "[project]\nname = \"hrms-app\"\n",
    )
    .unwrap();

    assert_eq!(resolve_title(&app_path, "hrms"), "Hrms App");
}

#[test]
fn poetry_shape_is_supported() {
    let (_dir, app_path) = app_fixture("helpdesk");
    std::fs::write(
        app_path.join("pyproject.toml"),
        "[tool.poetry]\nname = \"helpdesk\"\n",
    )
    .unwrap();

    assert_eq!(resolve_title(&app_path, "helpdesk"), "Helpdesk");
}

#[test]
fn malformed_manifest_falls_back_to_line_scan() {
    let (_dir, app_path) = app_fixture("crm");
    std::fs::write(
        app_path.join("pyproject.toml"),
        "[[[ broken toml\nname = \"crm-suite\"\n",
    )
    .unwrap();

    assert_eq!(resolve_title(&app_path, "crm"), "Crm Suite");
}

#[test]
fn folder_name_prettified_when_nothing_else_exists() {
    let (_dir, app_path) = app_fixture("my_custom-app");
    assert_eq!(resolve_title(&app_path, "my_custom-app"), "My Custom App");
}

#[parameterized(
    single_quotes = { "app_title = 'Lending'", "Lending" },
    double_quotes = { "app_title = \"Lending\"", "Lending" },
    padded = { "app_title   =   \" Lending \"", "Lending" },
)]
fn hooks_literal_forms(line: &str, expected: &str) {
    let (_dir, app_path) = app_fixture("lending");
    std::fs::write(app_path.join("lending/hooks.py"), line).unwrap();
    assert_eq!(resolve_title(&app_path, "lending"), expected);
}

#[test]
fn non_literal_hooks_assignment_is_ignored() {
    let (_dir, app_path) = app_fixture("dyn");
    std::fs::write(app_path.join("dyn/hooks.py"), "app_title = get_title()\n").unwrap();
    assert_eq!(resolve_title(&app_path, "dyn"), "Dyn");
}
