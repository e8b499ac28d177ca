use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

/// How a resolved path is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestType {
    /// A directory: render a listing.
    Browse,
    /// A readable and executable regular file: run it.
    Cgi,
    /// A readable regular file: stream it.
    File,
    /// Anything else, including paths that cannot be stat'ed.
    Bad,
}

/// Stats `path` and picks the handler.
///
/// Executable-and-readable is tested before plain readable, so an
/// executable file is never served as static content.
pub async fn classify(path: &Path) -> RequestType {
    let meta = match tokio::fs::metadata(path).await {
        Ok(meta) => meta,
        Err(_) => return RequestType::Bad,
    };

    if meta.is_dir() {
        RequestType::Browse
    } else if meta.is_file() && accessible(path, libc::R_OK | libc::X_OK) {
        RequestType::Cgi
    } else if meta.is_file() && accessible(path, libc::R_OK) {
        RequestType::File
    } else {
        RequestType::Bad
    }
}

/// access(2) against the server's real uid/gid.
fn accessible(path: &Path, mode: libc::c_int) -> bool {
    let Ok(cpath) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    // SAFETY: `cpath` is a valid NUL-terminated string that outlives the call.
    unsafe { libc::access(cpath.as_ptr(), mode) == 0 }
}
