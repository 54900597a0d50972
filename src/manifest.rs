use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

/// Manifest location, fixed relative to the project root.
const MANIFEST_FILE: &str = "AndroidManifest.xml";

static PACKAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"package\s*=\s*"(?P<package>[^"]+)""#).expect("package pattern compiles")
});

/// First-match textual lookup of the `package="..."` declaration.
///
/// An absent manifest or a manifest without a package declaration yields
/// `None`; the caller passes the empty identity through to the external
/// tool unchanged rather than failing here.
pub fn package_name(root: &Path) -> Option<String> {
    let content = std::fs::read_to_string(root.join(MANIFEST_FILE)).ok()?;
    PACKAGE_RE
        .captures(&content)
        .map(|caps| caps["package"].to_string())
}
