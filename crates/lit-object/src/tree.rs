use bstr::{BString, ByteSlice};
use lit_hash::ObjectId;

use crate::ObjectError;

/// The mode string that marks a subtree entry.
pub const TREE_MODE: &[u8] = b"40000";

/// What a tree entry points at, as shown in listings.
///
/// Deliberately closed: symlink, submodule and executable modes are not
/// distinguished and all list as `blob`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Blob,
    Tree,
}

impl EntryKind {
    /// `Tree` iff the mode is exactly [`TREE_MODE`].
    pub fn from_mode(mode: &[u8]) -> Self {
        if mode == TREE_MODE {
            Self::Tree
        } else {
            Self::Blob
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blob => "blob",
            Self::Tree => "tree",
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single entry in a tree object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// Mode exactly as encoded, e.g. `100644` or `40000`.
    pub mode: BString,
    pub name: BString,
    pub oid: ObjectId,
}

impl TreeEntry {
    /// Build an entry that can be serialized back into a tree payload.
    ///
    /// The mode must be non-empty and free of spaces and NULs; the name must
    /// be free of NULs.
    pub fn new(
        mode: impl Into<BString>,
        name: impl Into<BString>,
        oid: ObjectId,
    ) -> Result<Self, ObjectError> {
        let mode = mode.into();
        let name = name.into();
        if mode.is_empty() || mode.contains(&b' ') || mode.contains(&0) {
            return Err(ObjectError::InvalidTreeEntry {
                offset: 0,
                reason: format!("invalid mode {:?}", mode.as_bstr()),
            });
        }
        if name.contains(&0) {
            return Err(ObjectError::InvalidTreeEntry {
                offset: 0,
                reason: "name contains NUL".into(),
            });
        }
        Ok(Self { mode, name, oid })
    }

    pub fn kind(&self) -> EntryKind {
        EntryKind::from_mode(&self.mode)
    }

    pub fn is_tree(&self) -> bool {
        self.kind() == EntryKind::Tree
    }

    /// The entry name as text.
    pub fn name_str(&self) -> Result<&str, ObjectError> {
        self.name.to_str().map_err(|_| ObjectError::InvalidUtf8 {
            context: "tree entry name",
        })
    }

    /// Render as `"<mode padded to 6> <kind> <hex>\t<name>"`.
    pub fn display_line(&self) -> Result<String, ObjectError> {
        let mode = self.mode.to_str().map_err(|_| ObjectError::InvalidUtf8 {
            context: "tree entry mode",
        })?;
        Ok(format!(
            "{:0>6} {} {}\t{}",
            mode,
            self.kind(),
            self.oid,
            self.name_str()?
        ))
    }
}

/// A tree object: an ordered directory listing.
///
/// Entries keep the order they were encoded or inserted in; nothing here
/// sorts or deduplicates them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    pub entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a tree payload.
    ///
    /// Each record is `<mode> <name>\0` followed by exactly 20 raw id bytes.
    /// The id is consumed as a fixed-width field since it may itself contain
    /// NUL or space bytes.
    pub fn parse(content: &[u8]) -> Result<Self, ObjectError> {
        let mut entries = Vec::new();
        let mut pos = 0;

        while pos < content.len() {
            let nul_pos = content[pos..]
                .iter()
                .position(|&b| b == 0)
                .ok_or_else(|| ObjectError::InvalidTreeEntry {
                    offset: pos,
                    reason: "missing NUL after entry name".into(),
                })?
                + pos;

            let head = &content[pos..nul_pos];
            let space = head
                .iter()
                .position(|&b| b == b' ')
                .ok_or_else(|| ObjectError::InvalidTreeEntry {
                    offset: pos,
                    reason: "missing space between mode and name".into(),
                })?;
            if space == 0 {
                return Err(ObjectError::InvalidTreeEntry {
                    offset: pos,
                    reason: "empty mode".into(),
                });
            }

            let oid_start = nul_pos + 1;
            let oid_end = oid_start + ObjectId::LEN;
            if oid_end > content.len() {
                return Err(ObjectError::InvalidTreeEntry {
                    offset: oid_start,
                    reason: format!(
                        "truncated id: need {} bytes, {} remain",
                        ObjectId::LEN,
                        content.len() - oid_start
                    ),
                });
            }

            entries.push(TreeEntry {
                mode: BString::from(&head[..space]),
                name: BString::from(&head[space + 1..]),
                oid: ObjectId::from_bytes(&content[oid_start..oid_end])?,
            });
            pos = oid_end;
        }

        Ok(Self { entries })
    }

    /// Serialize entries, in their current order, to the binary payload.
    pub fn serialize_content(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for entry in &self.entries {
            out.extend_from_slice(&entry.mode);
            out.push(b' ');
            out.extend_from_slice(&entry.name);
            out.push(0);
            out.extend_from_slice(entry.oid.as_bytes());
        }
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = &TreeEntry> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Tree {
    type Item = &'a TreeEntry;
    type IntoIter = std::slice::Iter<'a, TreeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Parse a tree payload into its entries, in encoded order.
pub fn parse_tree(payload: &[u8]) -> Result<Vec<TreeEntry>, ObjectError> {
    Tree::parse(payload).map(|t| t.entries)
}
