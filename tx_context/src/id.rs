use uuid::Uuid;

/// Opaque identifier minted for each transaction scope.
///
/// Exists only for the lifetime of the scope's active transaction; useful
/// for correlating log lines from one unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TxId(Uuid);

impl TxId {
    pub(crate) fn mint() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for TxId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
