//! Strips hot-reload instrumentation from generated or edited source text
//! before it leaves the studio.
//!
//! When a file has been round-tripped through the preview server's dev
//! runtime it can come back with the React Refresh preamble and registration
//! calls baked in. Pushing those back would stack a second copy on the next
//! build, so every outgoing file goes through [`clean`].

use std::sync::LazyLock;

use regex::Regex;

use super::store::FileMap;

/// Present in every preamble the refresh runtime injects.
const RUNTIME_MARKER: &str = "RefreshRuntime";

static FIRST_IMPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"import\s+(React|\{)").expect("valid import pattern"));

static REFRESH_REG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$RefreshReg\$\([\s\S]*?\);?").expect("valid register pattern"));

static REFRESH_SIG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$RefreshSig\$\(\);?").expect("valid signature pattern"));

static SIG_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_s\(\);?").expect("valid signature call pattern"));

fn clean_once(code: &str) -> String {
    let mut cleaned = code;
    if cleaned.contains(RUNTIME_MARKER) {
        if let Some(m) = FIRST_IMPORT.find(cleaned) {
            cleaned = &cleaned[m.start()..];
        }
    }
    let cleaned = REFRESH_REG.replace_all(cleaned, "");
    let cleaned = REFRESH_SIG.replace_all(&cleaned, "");
    let cleaned = SIG_CALL.replace_all(&cleaned, "");
    cleaned.trim().to_string()
}

/// Removes the refresh preamble and marker calls from `code`.
///
/// Idempotent: a removal can splice together a fresh marker (`_s(_s();)`
/// leaves `_s()` behind), so passes repeat until the text stops changing.
/// Every pass only deletes text, which bounds the loop. Empty input comes
/// back untouched.
pub fn clean(code: &str) -> String {
    if code.is_empty() {
        return String::new();
    }
    let mut current = code.to_string();
    loop {
        let next = clean_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Cleaned copy of a whole project. Keys are kept exactly; the input is not
/// touched.
pub fn clean_files(files: &FileMap) -> FileMap {
    files
        .iter()
        .map(|(path, content)| (path.clone(), clean(content)))
        .collect()
}
