//! End-to-end properties of the merged file, driven through the binary.

use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use predicates::prelude::*;
use std::process::Command;

mod util;

/// Run a merge of `tmp/src` into `tmp/<out>` and return the file content.
fn merge(
    tmp: &assert_fs::TempDir,
    out: &str,
) -> String
{
    let dest = tmp.child(out);
    Command::cargo_bin("oxify")
        .expect("bin")
        .arg(tmp.child("src").path())
        .arg(dest.path())
        .arg("Demo")
        .arg("2.1.0")
        .arg("--quiet")
        .env_remove("OXIFY_LOG")
        .assert()
        .success();

    std::fs::read_to_string(dest.path()).expect("read merged output")
}

#[test]
fn header_reflects_plugin_info_directive()
{
    let tmp = util::make_plugin_fixture();
    let text = merge(&tmp, "Demo.cs");

    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[0].chars().all(|c| c == '/'));
    assert!(lines[1].starts_with("// Demo.cs generated by oxify v"));
    assert_eq!(
        lines[2],
        "// PluginInfo: Title = \"Demo\", Author = \"Alice\", Version = \"2.1.0\", ResourceId = 1234"
    );
    assert_eq!(lines[3], format!("// OxideMod: {}", util::PLUGIN_URL));
    assert_eq!(lines[4], format!("// GitHub: {}", util::REPO_URL));
    assert_eq!(lines[5], lines[0]);

    // Synthesized attribute replaces the directive, keeping its indent
    assert!(text.contains("\n    [Info(\"Demo\", \"Alice\", \"2.1.0\", ResourceId = 1234)]\n"));
    assert!(!text.contains("OX.INSERT"));
}

#[test]
fn imports_collapse_and_generated_metadata_is_skipped()
{
    let tmp = util::make_plugin_fixture();
    let text = merge(&tmp, "Demo.cs");

    assert_eq!(text.matches("using System;").count(), 1);
    assert!(text.contains("using Oxide.Core;\n"));
    assert!(text.contains("using System.Linq;\n"));
    assert!(!text.contains("System.Reflection"));
    assert!(!text.contains("AssemblyTitle"));
}

#[test]
fn shared_namespace_merges_in_discovery_order()
{
    let tmp = util::make_plugin_fixture();
    let text = merge(&tmp, "Demo.cs");

    assert_eq!(text.matches("namespace Oxide.Plugins {").count(), 1);

    // Demo.cs sorts before Hooks/Player.cs
    let init = text.find("void Init()").expect("Init");
    let hook = text.find("void OnPlayerInit()").expect("OnPlayerInit");
    assert!(init < hook);
    assert!(text.ends_with("    }\n}\n"));
}

#[test]
fn debug_regions_dropped_without_flag()
{
    let tmp = util::make_plugin_fixture();
    let text = merge(&tmp, "Demo.cs");

    assert!(!text.contains("TraceHook"));
    assert!(!text.contains("OX.DEBUGSTART"));
    assert!(!text.contains("// Flags:"));
}

#[test]
fn debug_flag_in_any_file_keeps_regions()
{
    let tmp = util::make_plugin_fixture();
    util::enable_debug(&tmp);
    let text = merge(&tmp, "Demo.cs");

    assert!(text.contains("void TraceHook()"));
    assert!(text.contains("// Flags: OX.DEBUGENABLE\n"));
}

#[test]
fn url_without_resource_id_stays_unknown()
{
    let tmp = assert_fs::TempDir::new().expect("tempdir");
    tmp.child("src/Demo.cs")
        .write_str(
            "namespace Oxide.Plugins {\n    //OX.INSERT(PluginInfo, Bob, http://example.com/plugin, http://gh/x)\n}\n",
        )
        .expect("write");

    let text = merge(&tmp, "Demo.cs");
    assert!(text.contains("Author = \"Bob\", Version = \"2.1.0\", ResourceId = UNKNOWN"));
    assert!(text.contains("[Info(\"Demo\", \"Bob\", \"2.1.0\", ResourceId = UNKNOWN)]"));
}

#[test]
fn rerun_is_byte_stable_apart_from_timestamp()
{
    let tmp = util::make_plugin_fixture();

    let first = merge(&tmp, "first.cs");
    let second = merge(&tmp, "second.cs");

    assert_eq!(
        util::without_timestamp(&first),
        util::without_timestamp(&second)
    );
}

#[test]
fn destination_inside_source_is_not_merged_into_itself()
{
    let tmp = util::make_plugin_fixture();

    let first = merge(&tmp, "src/Merged.cs");
    let second = merge(&tmp, "src/Merged.cs");

    assert_eq!(
        util::without_timestamp(&first),
        util::without_timestamp(&second)
    );
    tmp.child("src/Merged.cs")
        .assert(predicate::str::contains("namespace Oxide.Plugins {"));
}

#[test]
fn config_file_changes_markers()
{
    let tmp = assert_fs::TempDir::new().expect("tempdir");
    tmp.child("src/Demo.cs")
        .write_str("namespace P {\n    #DBG\n    int hidden;\n    #END\n    int shown;\n}\n")
        .expect("write");
    tmp.child("oxify.toml")
        .write_str("[markers]\ndebug_start = \"#DBG\"\ndebug_end = \"#END\"\n")
        .expect("write config");

    let dest = tmp.child("Demo.cs");
    Command::cargo_bin("oxify")
        .expect("bin")
        .current_dir(tmp.path())
        .arg("src")
        .arg("Demo.cs")
        .arg("Demo")
        .arg("1.0")
        .arg("--quiet")
        .assert()
        .success();

    dest.assert(predicate::str::contains("    int shown;"));
    dest.assert(predicate::str::contains("hidden").not());
}
