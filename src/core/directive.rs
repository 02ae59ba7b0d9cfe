//! Insert-marker directives and the plugin metadata they carry.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{info, warn};

pub const UNKNOWN: &str = "UNKNOWN";

static RESOURCE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{4}").expect("valid resource id regex"));

/// Closed set of directive kinds understood by the merger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive<'a> {
    /// `PluginInfo, <author>, <plugin-url>, <source-repo-url>`
    PluginInfo {
        author: &'a str,
        url: &'a str,
        repo: &'a str,
    },
    /// Unknown kind or wrong argument count; the line is dropped
    Unrecognized,
}

impl<'a> Directive<'a> {
    pub fn parse(args: &[&'a str]) -> Self {
        match *args {
            ["PluginInfo", author, url, repo] => Directive::PluginInfo { author, url, repo },
            _ => Directive::Unrecognized,
        }
    }
}

/// Values injected from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginIdentity {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginMetadata {
    pub author: String,
    pub resource_id: String,
    pub url: String,
    pub repo_url: String,
    assigned: bool,
}

impl Default for PluginMetadata {
    fn default() -> Self {
        Self {
            author: UNKNOWN.to_string(),
            resource_id: UNKNOWN.to_string(),
            url: UNKNOWN.to_string(),
            repo_url: UNKNOWN.to_string(),
            assigned: false,
        }
    }
}

impl PluginMetadata {
    pub fn is_assigned(&self) -> bool {
        self.assigned
    }

    /// Record metadata; only the first call has an effect.
    fn assign(&mut self, author: &str, url: &str, repo: &str) -> bool {
        if self.assigned {
            return false;
        }
        self.author = author.to_string();
        self.url = url.to_string();
        self.resource_id = resource_id(url);
        self.repo_url = repo.to_string();
        self.assigned = true;
        true
    }
}

impl fmt::Display for PluginMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.author, self.resource_id)
    }
}

/// First run of four digits in a listing URL, or `UNKNOWN`.
pub fn resource_id(url: &str) -> String {
    RESOURCE_ID_RE
        .find(url)
        .map_or_else(|| UNKNOWN.to_string(), |m| m.as_str().to_string())
}

/// Leading text of the directive line, up to its comment opener.
fn indent_of(line: &str) -> &str {
    match line.find('/') {
        Some(i) => &line[..i],
        None => &line[..line.len() - line.trim_start().len()],
    }
}

/// Expand `directive` found on `line`. Returns the synthesized body line,
/// or `None` when the directive produces nothing.
pub fn expand(
    directive: &Directive<'_>,
    line: &str,
    plugin: &PluginIdentity,
    metadata: &mut PluginMetadata,
) -> Option<String> {
    match directive {
        Directive::PluginInfo { author, url, repo } => {
            if metadata.assign(author, url, repo) {
                info!(author = %author, resource_id = %metadata.resource_id, "Inserted PluginInfo");
            } else {
                warn!(author = %author, "PluginInfo already set, metadata header keeps the first one");
            }

            Some(format!(
                "{}[Info(\"{}\", \"{}\", \"{}\", ResourceId = {})]",
                indent_of(line),
                plugin.name,
                author,
                plugin.version,
                resource_id(url),
            ))
        }
        Directive::Unrecognized => None,
    }
}
