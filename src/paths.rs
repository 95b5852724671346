//! Path utilities for the simulated filesystem.
//!
//! Every stored path is absolute and normalized (`/a/b`); user-facing
//! display strips the leading slash. There is no real filesystem behind
//! these paths, so everything here is plain string manipulation.

/// Normalize an absolute path: collapse `.` and `..`, drop empty segments.
pub fn normalize(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for seg in path.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    if parts.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", parts.join("/"))
    }
}

/// Resolve `arg` against the current directory, producing a normalized
/// absolute path. Absolute inputs ignore `cwd`.
pub fn join(cwd: &str, arg: &str) -> String {
    if arg.starts_with('/') {
        normalize(arg)
    } else {
        normalize(&format!("{}/{}", cwd, arg))
    }
}

/// Parent directory of a normalized path. The parent of `/` is `/`.
pub fn dirname(path: &str) -> String {
    match path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(idx) => path[..idx].to_string(),
    }
}

/// Final component of a normalized path.
pub fn basename(path: &str) -> String {
    match path.rfind('/') {
        Some(idx) => path[idx + 1..].to_string(),
        None => path.to_string(),
    }
}

/// User-facing form: the leading slash is an implementation detail.
pub fn display(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}
