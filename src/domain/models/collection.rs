use super::PostingKind;

/// Durable collections owned by the item repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    LostItems,
    FoundItems,
    LostAndFoundLogs,
}

impl Collection {
    /// Collection holding postings of the given kind
    pub fn for_kind(kind: PostingKind) -> Self {
        match kind {
            PostingKind::Lost => Collection::LostItems,
            PostingKind::Found => Collection::FoundItems,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Collection::LostItems => "lostItems",
            Collection::FoundItems => "foundItems",
            Collection::LostAndFoundLogs => "lostAndFoundLogs",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
