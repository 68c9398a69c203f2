//! Import rewriting
//!
//! Bundled modules load local assets through sentinel lines of the form
//!
//! ```text
//! const data = await importWasm(importMeta.url, './data.wasm');
//! ```
//!
//! (`importText` / `importBinary` likewise; bundlers may append a digit to
//! the helper name and rename `import.meta`). Each such line is handed to a
//! sink together with the asset bytes, and replaced by whatever the sink
//! returns. The Workers flavor turns assets into upload parts, the Deploy
//! flavor into content-addressed files.

use std::borrow::Cow;
use std::ops::Range;
use std::path::Path;
use std::sync::LazyLock;

use regex::{NoExpand, Regex};

use crate::domain::entities::{DeployFiles, Part, Parts};
use crate::domain::ports::SourceReader;
use crate::domain::value_objects::GitSha1;
use crate::error::{EdgeError, EdgeResult};

static LOCAL_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?m)^[ \t]*(const\s+([A-Za-z_$][\w$]*)\s*=\s*await\s+import(Wasm|Text|Binary)\d*\(\s*([A-Za-z_$][\w$]*)\.url\s*,\s*['"]((?:\./|\.\./)[^'"]+)['"]\s*\)\s*;?)[ \t]*$"#,
    )
    .expect("local import pattern is valid")
});

static SOCKETS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"const\s+\{\s*connect\s*\}\s*=\s*cloudflareSockets\(\);")
        .expect("sockets pattern is valid")
});

const SOCKETS_IMPORT: &str = r#"import { connect } from "cloudflare:sockets";"#;

/// Asset flavor, from the helper name used in the sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Wasm,
    Text,
    Binary,
}

impl ImportKind {
    fn parse(helper: &str) -> Self {
        match helper {
            "Wasm" => ImportKind::Wasm,
            "Text" => ImportKind::Text,
            _ => ImportKind::Binary,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ImportKind::Wasm => "application/wasm",
            ImportKind::Text => "text/plain",
            ImportKind::Binary => "application/octet-stream",
        }
    }
}

/// One recognized local import
#[derive(Debug)]
pub struct LocalImport<'a> {
    pub kind: ImportKind,
    /// Asset path relative to the root module's directory, normalized
    pub relative_path: String,
    pub bytes: Vec<u8>,
    pub variable_name: &'a str,
    /// The sentinel statement, without indentation
    pub line: &'a str,
    pub import_meta_variable_name: &'a str,
    pub unquoted_module_specifier: &'a str,
    meta_span: Range<usize>,
    specifier_span: Range<usize>,
}

impl LocalImport<'_> {
    /// The sentinel line with the `import.meta` variable and the module
    /// specifier substituted in place
    pub fn patch_line(&self, import_meta: &str, specifier: &str) -> String {
        let line = self.line;
        format!(
            "{}{}{}{}{}",
            &line[..self.meta_span.start],
            import_meta,
            &line[self.meta_span.end..self.specifier_span.start],
            specifier,
            &line[self.specifier_span.end..]
        )
    }
}

/// Replace the first `cloudflareSockets()` destructuring with the sockets import
pub fn rewrite_sockets(source: &str) -> Cow<'_, str> {
    SOCKETS.replace(source, NoExpand(SOCKETS_IMPORT))
}

/// Run `sink` over every local import sentinel in `source`
pub fn replace_imports<R: SourceReader>(
    source: &str,
    root_specifier: &str,
    reader: &R,
    mut sink: impl FnMut(LocalImport<'_>) -> EdgeResult<String>,
) -> EdgeResult<String> {
    let mut out = String::with_capacity(source.len());
    let mut last = 0;
    for caps in LOCAL_IMPORT.captures_iter(source) {
        let (Some(stmt), Some(var), Some(helper), Some(meta), Some(spec)) = (
            caps.get(1),
            caps.get(2),
            caps.get(3),
            caps.get(4),
            caps.get(5),
        ) else {
            continue;
        };
        let relative_path = normalize_relative(spec.as_str());
        let location = resolve_specifier(root_specifier, spec.as_str())?;
        let bytes = reader.read_bytes(&location)?;

        let import = LocalImport {
            kind: ImportKind::parse(helper.as_str()),
            relative_path,
            bytes,
            variable_name: var.as_str(),
            line: stmt.as_str(),
            import_meta_variable_name: meta.as_str(),
            unquoted_module_specifier: spec.as_str(),
            meta_span: meta.start() - stmt.start()..meta.end() - stmt.start(),
            specifier_span: spec.start() - stmt.start()..spec.end() - stmt.start(),
        };
        let replacement = sink(import)?;

        out.push_str(&source[last..stmt.start()]);
        out.push_str(&replacement);
        last = stmt.end();
    }
    out.push_str(&source[last..]);
    Ok(out)
}

/// Workers flavor: sockets sentinel plus one part per imported asset
pub fn rewrite_for_workers<R: SourceReader>(
    source: &str,
    root_specifier: &str,
    reader: &R,
    parts: &mut Parts,
) -> EdgeResult<String> {
    let source = rewrite_sockets(source);
    replace_imports(&source, root_specifier, reader, |import| {
        let part = Part::new(import.relative_path.clone(), import.bytes)
            .with_file_name(import.relative_path.clone())
            .with_content_type(import.kind.content_type());
        parts.insert(part)?;
        Ok(format!(
            "import {} from \"{}\";",
            import.variable_name, import.relative_path
        ))
    })
}

/// Deploy flavor: each asset becomes `_import_<gitSha1>.dat`
pub fn rewrite_for_deploy<R: SourceReader>(
    source: &str,
    root_specifier: &str,
    reader: &R,
    files: &mut DeployFiles,
) -> EdgeResult<String> {
    replace_imports(source, root_specifier, reader, |import| {
        let entry = files.add(
            format!("_import_{}.dat", GitSha1::of(&import.bytes)),
            import.bytes.clone(),
        );
        let specifier = format!("./{}", entry.path);
        Ok(import.patch_line("import.meta", &specifier))
    })
}

/// Location of `specifier` relative to the root module (path or https url)
pub fn resolve_specifier(root_specifier: &str, specifier: &str) -> EdgeResult<String> {
    if root_specifier.starts_with("https://") {
        let base = url::Url::parse(root_specifier).map_err(|e| EdgeError::BadScriptSpec {
            spec: root_specifier.to_string(),
            reason: e.to_string(),
        })?;
        let joined = base.join(specifier).map_err(|e| EdgeError::BadScriptSpec {
            spec: specifier.to_string(),
            reason: e.to_string(),
        })?;
        return Ok(joined.to_string());
    }
    let dir = Path::new(root_specifier).parent().unwrap_or(Path::new(""));
    Ok(dir
        .join(normalize_relative(specifier))
        .to_string_lossy()
        .into_owned())
}

/// `./a/../b/c.txt` → `b/c.txt`; leading `..` segments are kept
fn normalize_relative(specifier: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in specifier.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if matches!(segments.last(), Some(last) if *last != "..") {
                    segments.pop();
                } else {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}
