use std::ffi::OsString;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

/// Resolves `uri` below the canonical document `root`.
///
/// The URI is appended to the root as `root + "/" + uri`, canonicalized
/// (`.`, `..` and symlinks resolved) and accepted only if the result starts
/// with the root's bytes. Anything that does not exist or escapes the root
/// yields `None`; callers answer both the same way.
///
/// The check is a plain byte-prefix comparison: with root `/srv/www`, a
/// URI that resolves into a sibling such as `/srv/www2` passes.
pub async fn resolve(root: &Path, uri: &str) -> Option<PathBuf> {
    let mut joined = OsString::from(root.as_os_str());
    joined.push("/");
    joined.push(uri);

    let real = match tokio::fs::canonicalize(&joined).await {
        Ok(real) => real,
        Err(e) => {
            tracing::debug!(uri, error = %e, "Request path does not resolve");
            return None;
        }
    };

    if !within_root(root, &real) {
        tracing::warn!(uri, resolved = %real.display(), "Request escapes document root");
        return None;
    }

    Some(real)
}

fn within_root(root: &Path, real: &Path) -> bool {
    real.as_os_str()
        .as_bytes()
        .starts_with(root.as_os_str().as_bytes())
}
