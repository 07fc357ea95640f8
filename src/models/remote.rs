/// Remote copy of a synced file as reported by the contents endpoint.
///
/// `sha` is the version token: a write must echo back the token it last
/// read, and the API rejects the write when the file moved on in between.
#[derive(Debug, Clone)]
pub struct RemoteFile {
    pub path: String,
    pub sha: String,
    pub size: u64,
    /// Decoded file text; absent when the API withheld inline content.
    pub content: Option<String>,
}

/// Outcome of a successful content replace.
#[derive(Debug, Clone)]
pub struct CommitReceipt {
    /// Version token of the newly stored file.
    pub content_sha: String,
    /// The commit that recorded the change.
    pub commit_sha: String,
}

/// Identity and grants behind a verified API token.
#[derive(Debug, Clone)]
pub struct TokenIdentity {
    pub login: String,
    pub scopes: Vec<String>,
}

impl TokenIdentity {
    /// True when the granted scopes include `scope` as an exact entry.
    /// `public_repo` does not satisfy a requirement for `repo`.
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|granted| granted == scope)
    }
}
