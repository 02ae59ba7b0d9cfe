//! Output assembly: commented header block, imports, then one block per
//! namespace in first-seen order.

use std::fmt::Write as _;

use crate::core::aggregate::Merged;
use crate::core::directive::PluginIdentity;
use crate::infra::config::Config;

/// Header border is this much wider than the longest header line
const BORDER_PAD: usize = 5;

/// Everything the header needs besides the merge result
pub struct RenderContext<'a> {
    pub plugin: &'a PluginIdentity,
    pub config: &'a Config,
    pub tool_version: &'a str,
    pub timestamp: &'a str,
}

fn header_lines(merged: &Merged, ctx: &RenderContext<'_>) -> Vec<String> {
    let meta = &merged.metadata;
    let mut header = vec![
        format!(
            "{}.{} generated by {} v{} - {}",
            ctx.plugin.name,
            ctx.config.source_extension,
            env!("CARGO_PKG_NAME"),
            ctx.tool_version,
            ctx.timestamp
        ),
        format!(
            "PluginInfo: Title = \"{}\", Author = \"{}\", Version = \"{}\", ResourceId = {}",
            ctx.plugin.name, meta.author, ctx.plugin.version, meta.resource_id
        ),
        format!("OxideMod: {}", meta.url),
        format!("GitHub: {}", meta.repo_url),
    ];

    if merged.debug_enabled {
        header.push(format!(
            "Flags: {}",
            ctx.config
                .markers
                .debug_enable
                .trim_start_matches('/')
        ));
    }

    header
}

/// Render the merged plugin into a single text blob.
pub fn render(merged: &Merged, ctx: &RenderContext<'_>) -> String {
    let header = header_lines(merged, ctx);
    let widest = header
        .iter()
        .map(|h| h.chars().count())
        .max()
        .unwrap_or(0);
    let border = "/".repeat(widest + BORDER_PAD);

    let body_len: usize = merged
        .namespaces
        .values()
        .flatten()
        .map(|l| l.len() + 1)
        .sum();
    let mut out = String::with_capacity(body_len + 1024);

    // Writing into a String cannot fail
    let _ = writeln!(out, "{border}");
    for line in &header {
        let _ = writeln!(out, "// {line}");
    }
    let _ = writeln!(out, "{border}");
    out.push_str("\n\n");

    let imports: Vec<&str> = merged.imports.iter().map(String::as_str).collect();
    let _ = writeln!(out, "{}", imports.join("\n"));

    for (name, lines) in &merged.namespaces {
        let _ = writeln!(out, "\nnamespace {name} {{");
        let _ = writeln!(out, "{}", lines.join("\n"));
        out.push_str("}\n");
    }

    out
}
