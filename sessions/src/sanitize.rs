use std::sync::LazyLock;

use regex_lite::Regex;

static FENCE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    #[expect(clippy::unwrap_used)]
    let re = Regex::new(r"^(?:\s|`)*(?i:java)?\s*").unwrap();
    re
});

static FENCE_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    #[expect(clippy::unwrap_used)]
    let re = Regex::new(r"(?:\s|`)*$").unwrap();
    re
});

/// Trims markdown code-fence markers and an optional `java` language tag
/// from pasted input. Callers often paste fenced blocks verbatim; this is a
/// best-effort prefix/suffix trim, not a parser.
pub(crate) fn sanitize_code(input: &str) -> String {
    let stripped = FENCE_PREFIX.replace(input, "");
    FENCE_SUFFIX.replace(&stripped, "").into_owned()
}
