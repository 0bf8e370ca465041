use std::{collections::HashSet, fmt::Display, str::FromStr};

use serde::de::Visitor;

/// A unicode file name, not path, i.e. does not contain '/', '\n', or
/// '\0', and is not ".", "..", or "".
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, serde::Serialize, Hash)]
pub struct ProperFilename(String);

impl ProperFilename {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ProperFilename {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<std::path::Path> for ProperFilename {
    fn as_ref(&self) -> &std::path::Path {
        self.0.as_ref()
    }
}

impl Display for ProperFilename {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

const ERR_MSG: &str = "a file name (not path), must not contain '/', '\\n', '\\0', \
     and must not be \".\", \"..\", the empty string, or longer than 255 bytes";

impl FromStr for ProperFilename {
    type Err = &'static str;

    fn from_str(v: &str) -> Result<Self, Self::Err> {
        if v.is_empty()
            || v == "."
            || v == ".."
            || v.contains('/')
            || v.contains('\n')
            || v.contains('\0')
            || v.len() > 255
        {
            return Err(ERR_MSG);
        }
        Ok(ProperFilename(v.to_owned()))
    }
}

struct FilenameVisitor;
impl<'de> Visitor<'de> for FilenameVisitor {
    type Value = ProperFilename;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str(ERR_MSG)
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        v.parse().map_err(E::custom)
    }
}

impl<'de> serde::Deserialize<'de> for ProperFilename {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(FilenameVisitor)
    }
}

/// Turn an arbitrary identifier (which may be a path like
/// `data/run1.txt`) into a string usable as a file name: path
/// separators become `__`, NUL and newline `_`, and names that would
/// refer to a directory get a `_` prefix. The length is not limited
/// here; `ProperFilename::from_str` checks that.
pub fn sanitize_file_name(identifier: &str) -> String {
    let mut s = String::with_capacity(identifier.len() + 2);
    for c in identifier.chars() {
        match c {
            '/' | '\\' => s.push_str("__"),
            '\0' | '\n' => s.push('_'),
            _ => s.push(c),
        }
    }
    if s.is_empty() || s == "." || s == ".." {
        s.insert(0, '_');
    }
    s
}

/// `sanitize_file_name(identifier)` with `.extension` appended,
/// checked to be a proper file name.
pub fn sanitized_file_name_with_extension(
    identifier: &str,
    extension: &str,
) -> Result<ProperFilename, &'static str> {
    format!("{}.{extension}", sanitize_file_name(identifier)).parse()
}

/// Like `sanitized_file_name_with_extension`, but distinct from all
/// names in `taken`: on a clash, `~2`, `~3` etc. is appended to the
/// sanitized identifier. The result is added to `taken`.
pub fn unique_sanitized_file_name_with_extension(
    identifier: &str,
    extension: &str,
    taken: &mut HashSet<String>,
) -> Result<ProperFilename, &'static str> {
    let base = sanitize_file_name(identifier);
    let mut file_name: ProperFilename = format!("{base}.{extension}").parse()?;
    let mut i: u32 = 1;
    while taken.contains(file_name.as_str()) {
        i += 1;
        file_name = format!("{base}~{i}.{extension}").parse()?;
    }
    taken.insert(file_name.as_str().to_owned());
    Ok(file_name)
}
