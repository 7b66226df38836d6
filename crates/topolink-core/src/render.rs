// ── Configuration renderer ──
//
// Literal `{{ KEY }}` substitution. The template is scanned once, left to
// right, so substituted values are never rescanned and the order of keys in
// the variable map has no effect on the output.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::context::{ContextKey, ProvisioningContext};
use crate::error::CoreError;

const OPEN: &str = "{{ ";
const CLOSE: &str = " }}";

fn is_key(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Replace every `{{ KEY }}` whose KEY is in `vars`. Anything else, including
/// placeholders for unknown keys, is copied through unchanged.
pub fn render_template(template: &str, vars: &HashMap<&str, &str>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + OPEN.len()..];

        let Some(end) = after_open.find(CLOSE) else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = &after_open[..end];

        if !is_key(key) {
            // Not a placeholder; emit the opener and keep scanning inside it.
            out.push_str(OPEN);
            rest = after_open;
            continue;
        }

        match vars.get(key) {
            Some(value) => out.push_str(value),
            None => {
                out.push_str(OPEN);
                out.push_str(key);
                out.push_str(CLOSE);
            }
        }
        rest = &after_open[end + CLOSE.len()..];
    }

    out.push_str(rest);
    out
}

/// `mikrotik_{hostname}.rsc`, with anything outside `[A-Za-z0-9._-]`
/// replaced by `_`.
pub fn output_file_name(hostname: &str) -> String {
    let safe: String = hostname
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("mikrotik_{safe}.rsc")
}

/// A rendered RouterOS script and the file name it should be saved under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDocument {
    pub file_name: String,
    pub text: String,
}

impl ConfigDocument {
    pub fn for_hostname(hostname: &str, text: String) -> Self {
        Self {
            file_name: output_file_name(hostname),
            text,
        }
    }

    /// Write the document into `dir`, creating it if needed.
    ///
    /// The text goes to a temporary file in `dir` that is renamed over the
    /// target, so a failed write never leaves a truncated script behind.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, CoreError> {
        let path = dir.join(&self.file_name);
        let output_err = |e: std::io::Error| CoreError::Output {
            path: path.clone(),
            reason: e.to_string(),
        };

        let dir = if dir.as_os_str().is_empty() {
            Path::new(".")
        } else {
            dir
        };
        fs::create_dir_all(dir).map_err(output_err)?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(output_err)?;
        tmp.write_all(self.text.as_bytes()).map_err(output_err)?;
        tmp.flush().map_err(output_err)?;
        tmp.persist(&path).map_err(|e| output_err(e.error))?;

        info!(path = %path.display(), bytes = self.text.len(), "configuration written");
        Ok(path)
    }
}

/// Render `template` against a complete context.
pub fn render_context(
    template: &str,
    ctx: &ProvisioningContext,
) -> Result<ConfigDocument, CoreError> {
    let missing = ctx.missing_mandatory();
    if !missing.is_empty() {
        return Err(CoreError::Incomplete { missing });
    }
    let hostname = ctx
        .get(ContextKey::Hostname)
        .ok_or(CoreError::Incomplete {
            missing: vec![ContextKey::Hostname.template_key()],
        })?;

    let vars: HashMap<&str, &str> = ctx.template_vars().collect();
    Ok(ConfigDocument::for_hostname(
        hostname,
        render_template(template, &vars),
    ))
}

/// Read the template at `path` and render it against `ctx`.
///
/// The mandatory key check runs before the template is read, so an
/// incomplete context fails the same way whether or not the file exists.
pub fn render_file(path: &Path, ctx: &ProvisioningContext) -> Result<ConfigDocument, CoreError> {
    let missing = ctx.missing_mandatory();
    if !missing.is_empty() {
        return Err(CoreError::Incomplete { missing });
    }

    let template = fs::read_to_string(path).map_err(|e| CoreError::Render {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    debug!(path = %path.display(), bytes = template.len(), "template loaded");

    render_context(&template, ctx)
}
