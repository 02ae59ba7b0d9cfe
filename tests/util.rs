//! Shared test utilities for integration tests
//!
//! Builds a small plugin source tree that exercises namespaces shared
//! across files, duplicate imports, debug regions and the PluginInfo
//! directive.

#![allow(dead_code)]

use assert_fs::prelude::*;

pub const PLUGIN_URL: &str = "http://example.com/1234-plugin";
pub const REPO_URL: &str = "http://github.com/x";

/// Create the plugin fixture under `src/` of a fresh temp dir.
pub fn make_plugin_fixture() -> assert_fs::TempDir
{
    // Initialize the temporary project root
    let tmp = assert_fs::TempDir::new().expect("tempdir");

    // Entry file: metadata directive and the main class
    tmp.child("src/Demo.cs")
        .write_str(&format!(
            "using System;\n\
             using Oxide.Core;\n\
             \n\
             namespace Oxide.Plugins {{\n\
             \x20   //OX.INSERT(PluginInfo, Alice, {PLUGIN_URL}, {REPO_URL})\n\
             \x20   partial class Demo : RustPlugin {{\n\
             \x20       void Init() {{ }}\n\
             \x20   }}\n\
             }}\n"
        ))
        .expect("write Demo.cs");

    // Second file in a subdirectory: same namespace, duplicate import,
    // a debug-only region
    tmp.child("src/Hooks/Player.cs")
        .write_str(
            "using System;\n\
             using System.Linq;\n\
             \n\
             namespace Oxide.Plugins {\n\
             \x20   partial class Demo {\n\
             \x20       //OX.DEBUGSTART\n\
             \x20       void TraceHook() { Puts(\"trace\"); }\n\
             \x20       //OX.DEBUGEND\n\
             \x20       void OnPlayerInit() { }\n\
             \x20   }\n\
             }\n",
        )
        .expect("write Player.cs");

    // Generated assembly metadata must never be merged
    tmp.child("src/Properties/AssemblyInfo.cs")
        .write_str("using System.Reflection;\n[assembly: AssemblyTitle(\"Demo\")]\n")
        .expect("write AssemblyInfo.cs");

    // Non-source file is skipped by extension
    tmp.child("src/README.md")
        .write_str("# Demo\n")
        .expect("write README.md");

    // Return the prepared directory to the caller
    tmp
}

/// Add a file that turns debug regions on for the whole merge.
pub fn enable_debug(tmp: &assert_fs::TempDir)
{
    tmp.child("src/Debug.cs")
        .write_str("namespace Oxide.Plugins {\n    //OX.DEBUGENABLE\n}\n")
        .expect("write Debug.cs");
}

/// Drop the timestamp-bearing first header line for comparisons.
pub fn without_timestamp(output: &str) -> String
{
    output
        .lines()
        .filter(|l| !l.contains(" generated by oxify v"))
        .collect::<Vec<_>>()
        .join("\n")
}
