//! Classification of raw reference strings.

/// Literal UDIM tile token.
pub const UDIM_TOKEN: &str = "<UDIM>";

/// Literal frame sequence tokens.
pub const SEQUENCE_TOKENS: [&str; 2] = ["<f>", "<F>"];

/// Pattern carried by a desired file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PatternKind {
    /// Plain name, matched exactly.
    #[default]
    None,
    /// UDIM tile set: the token stands for exactly four digits.
    Udim,
    /// Frame sequence: the token stands for one or more digits.
    Sequence,
}

impl PatternKind {
    /// Find the token for this pattern in `name`.
    ///
    /// Returns the byte offset and the token found, or `None` for plain
    /// names and names without the token.
    pub fn find_token(&self, name: &str) -> Option<(usize, &'static str)> {
        match self {
            PatternKind::None => None,
            PatternKind::Udim => name.find(UDIM_TOKEN).map(|idx| (idx, UDIM_TOKEN)),
            PatternKind::Sequence => SEQUENCE_TOKENS
                .iter()
                .filter_map(|token| name.find(token).map(|idx| (idx, *token)))
                .min_by_key(|(idx, _)| *idx),
        }
    }
}

/// Result of classifying a raw path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Leaf name to look for.
    pub desired_name: String,
    /// Pattern carried by the leaf name.
    pub pattern: PatternKind,
    /// Whether a directory entry may satisfy the search.
    pub accept_directory: bool,
}

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Strip the parent directory from a path, leaving the leaf name.
///
/// Both `/` and `\` are treated as separators since host documents are
/// often authored on a different platform than the one repairing them.
pub fn leaf_name(raw_path: &str) -> &str {
    match raw_path.rfind(is_separator) {
        Some(idx) => &raw_path[idx + 1..],
        None => raw_path,
    }
}

/// Classify a raw reference string.
///
/// UDIM takes precedence over sequences when both flags are set. A flag
/// whose token is absent from the leaf name degrades to
/// [`PatternKind::None`].
pub fn classify(
    raw_path: &str,
    is_udim: bool,
    is_sequence: bool,
    is_directory_kind: bool,
) -> Classification {
    let path = if is_directory_kind {
        raw_path.trim_end_matches(is_separator)
    } else {
        raw_path
    };
    let desired_name = leaf_name(path).to_string();

    let requested = if is_udim {
        PatternKind::Udim
    } else if is_sequence {
        PatternKind::Sequence
    } else {
        PatternKind::None
    };

    let pattern = if requested.find_token(&desired_name).is_some() {
        requested
    } else {
        PatternKind::None
    };

    Classification {
        desired_name,
        pattern,
        accept_directory: is_directory_kind,
    }
}
