use std::hash::Hash;

use itertools::Itertools;
use lazy_static::lazy_static;
use regex::{Captures, Regex};

/// Wraps the argument in double quotes if it contains a space.
///
/// Arguments that already start and end with a double quote are returned
/// unchanged, so quoting is never applied twice.
pub fn quote_argument(argument: impl AsRef<str>) -> String {
    let argument = argument.as_ref();

    let already_quoted =
        argument.len() >= 2 && argument.starts_with('"') && argument.ends_with('"');

    if argument.contains(' ') && !already_quoted {
        format!("\"{}\"", argument)
    } else {
        argument.to_string()
    }
}

/// Removes exact duplicates, keeping the position of the first occurrence.
pub fn dedupe<T, I>(items: I) -> Vec<T>
where
    I: IntoIterator<Item = T>,
    T: Eq + Hash + Clone,
{
    items.into_iter().unique().collect()
}

/// Returns `true` for rooted paths, both POSIX (`/usr`) and Windows style
/// (`C:\tool`, `C:/tool`, `\\server\share`).
///
/// The check is textual so that the result does not depend on the host.
pub fn is_absolute(path: &str) -> bool {
    if path.starts_with('/') || path.starts_with('\\') {
        return true;
    }

    let (drive, rest) = split_drive(path);
    !drive.is_empty() && (rest.starts_with('/') || rest.starts_with('\\'))
}

/// Joins `tail` onto `base` with a forward slash. An absolute `tail`
/// replaces `base` entirely.
pub fn join(base: &str, tail: &str) -> String {
    if is_absolute(tail) || base.is_empty() {
        return tail.to_string();
    }

    if base.ends_with('/') || base.ends_with('\\') {
        format!("{}{}", base, tail)
    } else {
        format!("{}/{}", base, tail)
    }
}

/// Lexically normalizes a path and converts every separator to `/`.
///
/// Empty and `.` components are dropped and `..` components consume the
/// preceding component. `..` at the start of a rooted path is discarded,
/// at the start of a relative path it is kept. The filesystem is never
/// consulted.
pub fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let (drive, rest) = split_drive(&path);

    let root = if rest.starts_with("//") && !rest.starts_with("///") {
        "//"
    } else if rest.starts_with('/') {
        "/"
    } else {
        ""
    };

    let mut components: Vec<&str> = vec![];
    for component in rest.split('/') {
        match component {
            "" | "." => {}
            ".." => match components.last() {
                Some(&last) if last != ".." => {
                    components.pop();
                }
                _ => {
                    if root.is_empty() {
                        components.push(component);
                    }
                }
            },
            _ => components.push(component),
        }
    }

    let body = components.join("/");
    if drive.is_empty() && root.is_empty() && body.is_empty() {
        return ".".to_string();
    }

    format!("{}{}{}", drive, root, body)
}

/// Returns the parent directory of a forward-slash path, or an empty string
/// if the path has a single component.
pub fn parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(index) => &path[..index],
        None => "",
    }
}

/// Replaces `$NAME`, `${NAME}` and `%NAME%` references with the value
/// returned by `lookup`. References `lookup` does not know are left as
/// they are.
pub fn expand_env_vars<F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lazy_static! {
        static ref RE: Regex =
            Regex::new(r"\$\{([^}]+)\}|\$([A-Za-z0-9_]+)|%([A-Za-z0-9_()]+)%").unwrap();
    }

    RE.replace_all(input, |captures: &Captures| {
        let name = captures
            .get(1)
            .or_else(|| captures.get(2))
            .or_else(|| captures.get(3))
            .map(|name| name.as_str())
            .unwrap_or_default();

        lookup(name).unwrap_or_else(|| captures[0].to_string())
    })
    .into_owned()
}

fn split_drive(path: &str) -> (&str, &str) {
    let bytes = path.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        path.split_at(2)
    } else {
        ("", path)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn quote_only_when_space() {
        assert_eq!("/usr/bin/gcc", quote_argument("/usr/bin/gcc"));
        assert_eq!(
            "\"E:/tool/14.2 rel1/bin/gcc.exe\"",
            quote_argument("E:/tool/14.2 rel1/bin/gcc.exe")
        );
    }

    #[test]
    fn quote_is_not_applied_twice() {
        let once = quote_argument("/my project/main.c");
        assert_eq!("\"/my project/main.c\"", once);
        assert_eq!(once, quote_argument(&once));
    }

    #[test]
    fn dedupe_keeps_first_occurrence() {
        assert_eq!(
            vec!["a", "b", "c"],
            dedupe(vec!["a", "b", "a", "c", "b"])
        );
        assert!(dedupe(Vec::<String>::new()).is_empty());
    }

    #[test]
    fn absolute_detection() {
        assert!(is_absolute("/proj"));
        assert!(is_absolute("C:\\tool"));
        assert!(is_absolute("c:/tool"));
        assert!(is_absolute("\\\\server\\share"));
        assert!(!is_absolute("C:tool"));
        assert!(!is_absolute("inc"));
        assert!(!is_absolute("../inc"));
        assert!(!is_absolute(""));
    }

    #[test]
    fn join_paths() {
        assert_eq!("/proj/inc", join("/proj", "inc"));
        assert_eq!("/proj/inc", join("/proj/", "inc"));
        assert_eq!("/other", join("/proj", "/other"));
        assert_eq!("inc", join("", "inc"));
    }

    #[test]
    fn normalize() {
        assert_eq!("/proj/inc", normalize_path("/proj/./inc/"));
        assert_eq!("/proj/inc", normalize_path("/proj//src/../inc"));
        assert_eq!("/inc", normalize_path("/../inc"));
        assert_eq!("../inc", normalize_path("a/../../inc"));
        assert_eq!("C:/IAR/arm/inc", normalize_path("C:\\IAR\\arm\\.\\inc"));
        assert_eq!("//server/share", normalize_path("\\\\server\\share"));
        assert_eq!("/", normalize_path("/"));
        assert_eq!(".", normalize_path(""));
    }

    #[test]
    fn normalize_is_idempotent() {
        for path in &["/proj/a/../b", "C:\\x\\y", "rel/./p", "//srv/x"] {
            let once = normalize_path(path);
            assert_eq!(once, normalize_path(&once));
        }
    }

    #[test]
    fn parent_of_path() {
        assert_eq!("/proj/src", parent("/proj/src/main.c"));
        assert_eq!("/", parent("/main.c"));
        assert_eq!("", parent("main.c"));
    }

    #[test]
    fn expand_known_variables() {
        let mut environment = HashMap::new();
        environment.insert("HOME", "/home/user");
        environment.insert("TOOLS", "C:/tools");

        let lookup = |name: &str| environment.get(name).map(|value| value.to_string());

        assert_eq!("/home/user/gcc", expand_env_vars("$HOME/gcc", lookup));
        assert_eq!("/home/user/gcc", expand_env_vars("${HOME}/gcc", lookup));
        assert_eq!("C:/tools/gcc.exe", expand_env_vars("%TOOLS%/gcc.exe", lookup));
        assert_eq!("$MISSING/gcc", expand_env_vars("$MISSING/gcc", lookup));
        assert_eq!("/usr/bin/gcc", expand_env_vars("/usr/bin/gcc", lookup));
    }
}
